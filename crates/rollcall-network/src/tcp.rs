//! TCP client for the remote attendance collector.
//!
//! Events travel as newline-delimited JSON, one object per event:
//!
//! ```text
//! {"timestamp":"2025-01-15T12:30:00.250Z","attendee_id":6656}
//! ```
//!
//! # Design Principles
//!
//! - **Lazy connection**: the first submitted event opens the connection.
//! - **No automatic retry**: a failed event is reported to the caller once.
//! - **Reconnect on next event**: any failure drops the connection, so the
//!   following event starts from a fresh connect.
//!
//! All I/O operations share one configurable timeout (default: 3000ms).

use crate::collector::Collector;
use crate::error::CollectorError;
use futures::SinkExt;
use rollcall_core::AttendeeData;
use rollcall_core::constants::DEFAULT_COLLECTOR_TIMEOUT_MS;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{debug, error, info, trace, warn};

/// Default collector port.
pub const DEFAULT_COLLECTOR_PORT: u16 = 4000;

/// Configuration for the TCP collector client
///
/// # Example
///
/// ```
/// use rollcall_network::TcpCollectorConfig;
/// use std::time::Duration;
///
/// let config = TcpCollectorConfig {
///     server_addr: "127.0.0.1:4000".parse().unwrap(),
///     timeout: Duration::from_millis(5000),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct TcpCollectorConfig {
    /// Collector address to connect to
    pub server_addr: SocketAddr,

    /// Timeout for all I/O operations (connect, send)
    pub timeout: Duration,
}

impl Default for TcpCollectorConfig {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_COLLECTOR_PORT)),
            timeout: Duration::from_millis(DEFAULT_COLLECTOR_TIMEOUT_MS),
        }
    }
}

/// TCP client forwarding attendance events to the collector
///
/// # Example
///
/// ```no_run
/// use rollcall_core::{AttendeeData, CardId};
/// use rollcall_network::{Collector, TcpCollector, TcpCollectorConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut collector = TcpCollector::new(TcpCollectorConfig::default());
/// collector.submit(&AttendeeData::new(CardId::new(6656))).await?;
/// assert!(collector.is_connected());
///
/// collector.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TcpCollector {
    /// Collector address to connect to
    server_addr: SocketAddr,

    /// Line-framed TCP stream (None if not connected)
    framed: Option<Framed<TcpStream, LinesCodec>>,

    /// Timeout for all I/O operations
    timeout: Duration,
}

impl TcpCollector {
    /// Create a new client. No connection is made until it is needed.
    pub fn new(config: TcpCollectorConfig) -> Self {
        debug!("Creating collector client for {}", config.server_addr);

        Self {
            server_addr: config.server_addr,
            framed: None,
            timeout: config.timeout,
        }
    }

    /// Connect to the collector
    ///
    /// # Errors
    ///
    /// Returns an error if the connection times out or is refused.
    pub async fn connect(&mut self) -> Result<(), CollectorError> {
        info!("Connecting to collector at {}", self.server_addr);

        let stream =
            match tokio::time::timeout(self.timeout, TcpStream::connect(self.server_addr)).await {
                Ok(Ok(stream)) => stream,
                Ok(Err(e)) => {
                    error!("Collector connection failed: {}", e);
                    return Err(e.into());
                }
                Err(_) => {
                    warn!("Collector connection timeout after {}ms", self.timeout.as_millis());
                    return Err(CollectorError::ConnectionTimeout(
                        self.timeout.as_millis() as u64
                    ));
                }
            };

        // Events are tiny and rare; send each one right away.
        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY: {}", e);
        }

        self.framed = Some(Framed::new(stream, LinesCodec::new()));
        debug!("Collector connected");
        Ok(())
    }

    /// Send one event over the current connection
    ///
    /// The connection is dropped on any failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is not connected, the write times
    /// out, or the connection is lost.
    pub async fn send(&mut self, event: &AttendeeData) -> Result<(), CollectorError> {
        let line = serde_json::to_string(event)?;
        trace!(attendee_id = %event.attendee_id(), "Sending event to collector");

        let framed = self.framed.as_mut().ok_or(CollectorError::NotConnected)?;

        let result = match tokio::time::timeout(self.timeout, framed.send(line)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                error!("Failed to send event: {}", e);
                Err(CollectorError::Codec(e))
            }
            Err(_) => {
                warn!("Send timeout after {}ms", self.timeout.as_millis());
                Err(CollectorError::WriteTimeout(self.timeout.as_millis() as u64))
            }
        };

        if result.is_err() {
            self.framed = None;
        }
        result
    }

    /// Check if the client holds an open connection
    pub fn is_connected(&self) -> bool {
        self.framed.is_some()
    }

    /// Address of the collector
    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    /// Close the connection, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP shutdown fails. The client is
    /// disconnected either way.
    pub async fn close(&mut self) -> Result<(), CollectorError> {
        if let Some(framed) = self.framed.take() {
            let mut stream = framed.into_inner();
            stream.shutdown().await?;
            info!("Collector connection to {} closed", self.server_addr);
        }
        Ok(())
    }
}

impl Collector for TcpCollector {
    async fn submit(&mut self, event: &AttendeeData) -> Result<(), CollectorError> {
        if !self.is_connected() {
            self.connect().await?;
        }
        self.send(event).await
    }

    fn describe(&self) -> String {
        format!("tcp://{}", self.server_addr)
    }
}
