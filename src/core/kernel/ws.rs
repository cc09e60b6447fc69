use crate::core::errors::ExchangeError;
use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::sleep;
use tokio_tungstenite::{
    connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, error, instrument, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone)]
pub struct WsConfig {
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Max connection attempts made by [`ReconnectWs`]
    pub max_reconnect_attempts: u32,
    /// Initial delay between attempts in milliseconds, doubled up to 60s
    pub reconnect_delay_ms: u64,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
            max_reconnect_attempts: 5,
            reconnect_delay_ms: 1_000,
        }
    }
}

/// WebSocket session trait - pure transport layer
///
/// Knows nothing about topics or message formats. Reconnecting is just
/// calling [`WsSession::connect`] again.
#[async_trait]
pub trait WsSession: Send {
    /// Connect (or reconnect) to the WebSocket
    async fn connect(&mut self) -> Result<(), ExchangeError>;

    /// Send a raw message
    async fn send_raw(&mut self, msg: Message) -> Result<(), ExchangeError>;

    /// Receive the next raw message; `None` once the peer closed the stream
    async fn next_raw(&mut self) -> Option<Result<Message, ExchangeError>>;

    /// Close the connection
    async fn close(&mut self) -> Result<(), ExchangeError>;

    /// Check if the connection is alive
    fn is_connected(&self) -> bool;

    /// The URL this session connects to
    fn url(&self) -> &str;
}

/// Connection statistics
#[derive(Debug, Default, Clone)]
pub struct ConnectionStats {
    pub messages_sent: u64,
    pub messages_received: u64,
    pub bytes_received: u64,
    pub connection_count: u32,
    pub last_message_at: Option<std::time::Instant>,
}

/// Tungstenite-based WebSocket implementation
pub struct TungsteniteWs {
    url: String,
    write: Option<SplitSink<WsStream, Message>>,
    read: Option<SplitStream<WsStream>>,
    connected: bool,
    exchange_name: String,
    config: WsConfig,
    connection_stats: ConnectionStats,
}

impl TungsteniteWs {
    /// Create a new WebSocket session
    ///
    /// # Arguments
    /// * `url` - The WebSocket URL to connect to
    /// * `exchange_name` - Name of the exchange for logging/tracing
    pub fn new(url: String, exchange_name: String) -> Self {
        Self {
            url,
            write: None,
            read: None,
            connected: false,
            exchange_name,
            config: WsConfig::default(),
            connection_stats: ConnectionStats::default(),
        }
    }

    /// Set custom WebSocket configuration
    pub fn with_config(mut self, config: WsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn stats(&self) -> &ConnectionStats {
        &self.connection_stats
    }

    fn record_received(&mut self, message: &Message) {
        self.connection_stats.messages_received += 1;
        self.connection_stats.bytes_received += message.len() as u64;
        self.connection_stats.last_message_at = Some(std::time::Instant::now());
    }
}

#[async_trait]
impl WsSession for TungsteniteWs {
    #[instrument(skip(self), fields(exchange = %self.exchange_name, url = %self.url))]
    async fn connect(&mut self) -> Result<(), ExchangeError> {
        let connect_timeout = Duration::from_millis(self.config.connect_timeout_ms);

        let (ws_stream, _) = tokio::time::timeout(connect_timeout, connect_async(&self.url))
            .await
            .map_err(|_| ExchangeError::Timeout {
                endpoint: self.url.clone(),
                params: String::new(),
            })?
            .map_err(|e| {
                ExchangeError::network(&self.url, format!("WebSocket connection failed: {}", e))
            })?;

        let (write, read) = ws_stream.split();
        self.write = Some(write);
        self.read = Some(read);
        self.connected = true;
        self.connection_stats.connection_count += 1;
        debug!("WebSocket connected");

        Ok(())
    }

    #[instrument(skip(self, msg), fields(exchange = %self.exchange_name))]
    async fn send_raw(&mut self, msg: Message) -> Result<(), ExchangeError> {
        if !self.connected {
            return Err(ExchangeError::network(&self.url, "WebSocket not connected"));
        }

        let write = self
            .write
            .as_mut()
            .ok_or_else(|| ExchangeError::network(&self.url, "WebSocket write stream not available"))?;

        if let Err(e) = write.send(msg).await {
            self.connected = false;
            return Err(ExchangeError::network(
                &self.url,
                format!("Failed to send WebSocket message: {}", e),
            ));
        }
        self.connection_stats.messages_sent += 1;

        Ok(())
    }

    async fn next_raw(&mut self) -> Option<Result<Message, ExchangeError>> {
        loop {
            if !self.connected {
                return None;
            }
            let read = self.read.as_mut()?;

            match read.next().await {
                Some(Ok(message)) => {
                    self.record_received(&message);
                    match message {
                        Message::Close(frame) => {
                            debug!(?frame, "WebSocket closed by peer");
                            self.connected = false;
                            return None;
                        }
                        Message::Ping(data) => {
                            // Auto-respond to pings at transport level
                            if let Err(e) = self.send_raw(Message::Pong(data)).await {
                                warn!("Failed to send pong response: {}", e);
                            }
                        }
                        Message::Pong(_) | Message::Frame(_) => {}
                        other => return Some(Ok(other)),
                    }
                }
                Some(Err(e)) => {
                    self.connected = false;
                    return Some(Err(ExchangeError::network(
                        &self.url,
                        format!("WebSocket error: {}", e),
                    )));
                }
                None => {
                    self.connected = false;
                    return None;
                }
            }
        }
    }

    #[instrument(skip(self), fields(exchange = %self.exchange_name))]
    async fn close(&mut self) -> Result<(), ExchangeError> {
        if let Some(write) = self.write.as_mut() {
            let _ = write.send(Message::Close(None)).await;
        }
        self.connected = false;
        self.write = None;
        self.read = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// Wrapper whose `connect` retries with exponential backoff
///
/// Everything else is forwarded untouched; resubscribing after a reconnect
/// belongs to the subscription registry of the client that owns the session.
pub struct ReconnectWs<T: WsSession> {
    inner: T,
    max_reconnect_attempts: u32,
    reconnect_delay: Duration,
}

impl<T: WsSession> ReconnectWs<T> {
    pub fn new(inner: T) -> Self {
        let defaults = WsConfig::default();
        Self {
            inner,
            max_reconnect_attempts: defaults.max_reconnect_attempts,
            reconnect_delay: Duration::from_millis(defaults.reconnect_delay_ms),
        }
    }

    /// Set the maximum number of connection attempts
    pub fn with_max_reconnect_attempts(mut self, max_attempts: u32) -> Self {
        self.max_reconnect_attempts = max_attempts.max(1);
        self
    }

    /// Set the initial delay between connection attempts
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    async fn attempt_connect(&mut self) -> Result<(), ExchangeError> {
        let mut attempts = 0;
        let mut delay = self.reconnect_delay;
        let mut last_error = None;

        while attempts < self.max_reconnect_attempts {
            attempts += 1;

            match self.inner.connect().await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    error!("Connection attempt {} failed: {}", attempts, e);
                    last_error = Some(e);
                    if attempts < self.max_reconnect_attempts {
                        sleep(delay).await;
                        delay = std::cmp::min(delay * 2, Duration::from_secs(60));
                    }
                }
            }
        }

        Err(ExchangeError::network(
            self.inner.url(),
            format!(
                "Failed to connect after {} attempts: {}",
                self.max_reconnect_attempts,
                last_error.map_or_else(String::new, |e| e.to_string())
            ),
        ))
    }
}

#[async_trait]
impl<T: WsSession> WsSession for ReconnectWs<T> {
    async fn connect(&mut self) -> Result<(), ExchangeError> {
        self.attempt_connect().await
    }

    async fn send_raw(&mut self, msg: Message) -> Result<(), ExchangeError> {
        self.inner.send_raw(msg).await
    }

    async fn next_raw(&mut self) -> Option<Result<Message, ExchangeError>> {
        self.inner.next_raw().await
    }

    async fn close(&mut self) -> Result<(), ExchangeError> {
        self.inner.close().await
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    fn url(&self) -> &str {
        self.inner.url()
    }
}
