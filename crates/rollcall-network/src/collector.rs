//! Collector trait and enum dispatch.

#![allow(async_fn_in_trait)]

use crate::error::CollectorError;
use crate::memory::MemoryCollector;
use crate::tcp::TcpCollector;
use rollcall_core::AttendeeData;

/// Destination for attendance events outside this process.
///
/// Delivery guarantees belong to the implementation; callers submit each
/// event once and treat failures as final.
pub trait Collector: Send + Sync {
    /// Deliver one event.
    async fn submit(&mut self, event: &AttendeeData) -> Result<(), CollectorError>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

/// Enum wrapper for collector dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyCollector {
    /// Remote collector reached over TCP.
    Tcp(TcpCollector),

    /// In-process collector for tests and dry runs.
    Memory(MemoryCollector),
}

impl Collector for AnyCollector {
    async fn submit(&mut self, event: &AttendeeData) -> Result<(), CollectorError> {
        match self {
            Self::Tcp(collector) => collector.submit(event).await,
            Self::Memory(collector) => collector.submit(event).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Tcp(collector) => collector.describe(),
            Self::Memory(collector) => collector.describe(),
        }
    }
}

impl From<TcpCollector> for AnyCollector {
    fn from(collector: TcpCollector) -> Self {
        Self::Tcp(collector)
    }
}

impl From<MemoryCollector> for AnyCollector {
    fn from(collector: MemoryCollector) -> Self {
        Self::Memory(collector)
    }
}
