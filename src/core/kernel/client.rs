use crate::core::errors::ExchangeError;
use crate::core::kernel::codec::{WsCodec, WsFrame};
use crate::core::kernel::dispatch::{Callback, CallbackQueue, ErrorCallback};
use crate::core::kernel::registry::{SubscriptionRegistry, SubscriptionState};
use crate::core::kernel::signer::Signer;
use crate::core::kernel::ws::WsSession;
use futures_util::stream::{self, Stream};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, instrument, trace, warn};
use url::Url;

/// How decoded data leaves the client. The first one used sticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    Pull,
    Callback,
}

#[derive(Debug, Clone)]
pub struct WsClientConfig {
    pub exchange_name: String,
    /// Reconnect and replay subscriptions when the stream ends unexpectedly
    pub auto_reconnect: bool,
    /// Capacity of the callback queue before dispatch starts waiting
    pub callback_queue_size: usize,
    /// How long `connect` waits for the authentication reply
    pub auth_timeout_ms: u64,
}

impl Default for WsClientConfig {
    fn default() -> Self {
        Self {
            exchange_name: "huobi".to_string(),
            auto_reconnect: true,
            callback_queue_size: 1024,
            auth_timeout_ms: 10_000,
        }
    }
}

enum Command<M> {
    Subscribe(String, Option<Callback<M>>),
    Unsubscribe(String),
    Close,
}

/// Sends commands to a client running [`WsClient::run_with_callbacks`].
///
/// Commands are applied by the dispatch loop in the order they were sent.
/// Once the client consumes in pull mode every command fails with
/// `ConfigurationError`.
pub struct DispatchHandle<M> {
    commands: mpsc::UnboundedSender<Command<M>>,
}

impl<M> Clone for DispatchHandle<M> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
        }
    }
}

impl<M> DispatchHandle<M> {
    pub fn subscribe(
        &self,
        topic: impl Into<String>,
        callback: Option<Callback<M>>,
    ) -> Result<(), ExchangeError> {
        self.send(Command::Subscribe(topic.into(), callback))
    }

    pub fn unsubscribe(&self, topic: impl Into<String>) -> Result<(), ExchangeError> {
        self.send(Command::Unsubscribe(topic.into()))
    }

    pub fn close(&self) -> Result<(), ExchangeError> {
        self.send(Command::Close)
    }

    fn send(&self, command: Command<M>) -> Result<(), ExchangeError> {
        self.commands
            .send(command)
            .map_err(|_| {
                ExchangeError::ConfigurationError(
                    "No callback loop can receive commands: client dropped or in pull mode"
                        .to_string(),
                )
            })
    }
}

enum Event<M> {
    Data { topic: String, message: M },
    Error(ExchangeError),
    Closed,
}

/// One persistent WebSocket connection with its subscriptions
///
/// Owns the session, the codec and the topic table. Data is consumed either
/// by pulling ([`Self::next_message`], [`Self::messages`]) or by running the
/// callback loop ([`Self::run_with_callbacks`]), never both.
pub struct WsClient<C: WsCodec, S: WsSession> {
    session: S,
    codec: C,
    registry: SubscriptionRegistry<Callback<C::Message>>,
    signer: Option<Arc<dyn Signer>>,
    authenticated: bool,
    mode: Option<StreamMode>,
    closed: bool,
    config: WsClientConfig,
    commands_tx: mpsc::UnboundedSender<Command<C::Message>>,
    commands_rx: Option<mpsc::UnboundedReceiver<Command<C::Message>>>,
}

impl<C: WsCodec, S: WsSession> WsClient<C, S> {
    pub fn new(session: S, codec: C) -> Self {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        Self {
            session,
            codec,
            registry: SubscriptionRegistry::new(),
            signer: None,
            authenticated: false,
            mode: None,
            closed: false,
            config: WsClientConfig::default(),
            commands_tx,
            commands_rx: Some(commands_rx),
        }
    }

    /// Signer used for the authentication handshake; it must use the
    /// WebSocket signature scheme.
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn with_config(mut self, config: WsClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn handle(&self) -> DispatchHandle<C::Message> {
        DispatchHandle {
            commands: self.commands_tx.clone(),
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn mode(&self) -> Option<StreamMode> {
        self.mode
    }

    /// Registered topics in the order they were subscribed
    pub fn subscriptions(&self) -> Vec<String> {
        self.registry.topics()
    }

    pub fn subscription_state(&self, topic: &str) -> Option<SubscriptionState> {
        self.registry.state(topic)
    }

    /// Open the socket, authenticate when a signer is set, then send every
    /// topic registered so far.
    #[instrument(skip(self), fields(exchange = %self.config.exchange_name, url = %self.session.url()))]
    pub async fn connect(&mut self) -> Result<(), ExchangeError> {
        self.session.connect().await?;
        self.closed = false;
        self.authenticated = false;
        self.authenticate().await?;
        self.resubscribe().await?;
        info!("WebSocket client ready");
        Ok(())
    }

    async fn authenticate(&mut self) -> Result<(), ExchangeError> {
        let Some(signer) = self.signer.clone() else {
            return Ok(());
        };

        let url = Url::parse(self.session.url()).map_err(|e| {
            ExchangeError::ConfigurationError(format!("Invalid WebSocket URL: {}", e))
        })?;
        let host = url.host_str().ok_or_else(|| {
            ExchangeError::ConfigurationError("WebSocket URL has no host".to_string())
        })?;
        let signed = signer.sign_request("GET", host, url.path(), &[], unix_now()?)?;
        let mut params = signed.query_pairs();
        params.push(("authType".to_string(), "api".to_string()));

        let request = self.codec.encode_auth(&params)?;
        self.session.send_raw(request).await?;

        let timeout = Duration::from_millis(self.config.auth_timeout_ms);
        let outcome = match tokio::time::timeout(timeout, self.await_auth_reply()).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ExchangeError::AuthError(
                "Timed out waiting for the authentication reply".to_string(),
            )),
        };

        match outcome {
            Ok(()) => {
                self.authenticated = true;
                debug!("WebSocket authenticated");
                Ok(())
            }
            Err(e) => {
                if let Err(close_err) = self.session.close().await {
                    warn!("Failed to close socket after auth failure: {}", close_err);
                }
                Err(e)
            }
        }
    }

    async fn await_auth_reply(&mut self) -> Result<(), ExchangeError> {
        loop {
            let raw = match self.session.next_raw().await {
                Some(raw) => raw?,
                None => {
                    return Err(ExchangeError::AuthError(
                        "Connection closed before the authentication reply".to_string(),
                    ))
                }
            };
            match self.codec.decode_message(raw) {
                Ok(Some(WsFrame::Authenticated)) => return Ok(()),
                Ok(Some(WsFrame::Rejected { code, message, .. })) => {
                    return Err(ExchangeError::AuthError(format!(
                        "Authentication rejected ({}): {}",
                        code, message
                    )))
                }
                Ok(Some(WsFrame::Ping(ts))) => self.send_pong(ts).await,
                Ok(_) => trace!("Ignoring frame received before authentication"),
                Err(e) => warn!("Ignoring malformed frame during authentication: {}", e),
            }
        }
    }

    async fn resubscribe(&mut self) -> Result<(), ExchangeError> {
        let requests = self.registry.replay();
        if !requests.is_empty() {
            info!(count = requests.len(), "Replaying subscriptions");
        }
        for request in requests {
            let message = self.codec.encode_subscription(&request.topic, &request.id)?;
            self.session.send_raw(message).await?;
        }
        Ok(())
    }

    /// Register a topic and send its subscribe request.
    ///
    /// Subscribing to a topic already present sends nothing and keeps the
    /// existing callback. Before `connect` the topic is only registered and
    /// goes out once the socket opens.
    #[instrument(skip(self, callback), fields(exchange = %self.config.exchange_name, topic = %topic))]
    pub async fn subscribe(
        &mut self,
        topic: &str,
        callback: Option<Callback<C::Message>>,
    ) -> Result<(), ExchangeError> {
        if topic.is_empty() {
            return Err(ExchangeError::validation("Topic can not be empty"));
        }
        if self.codec.requires_auth() && !self.authenticated {
            return Err(ExchangeError::AuthError(
                "Stream is not authenticated; connect with credentials first".to_string(),
            ));
        }

        let Some(request) = self.registry.subscribe(topic, callback) else {
            debug!("Topic already subscribed");
            return Ok(());
        };
        if !self.session.is_connected() {
            debug!("Not connected; subscription sent on connect");
            return Ok(());
        }

        let message = match self.codec.encode_subscription(&request.topic, &request.id) {
            Ok(message) => message,
            Err(e) => {
                self.registry.fail(Some(request.id.as_str()), None);
                return Err(e);
            }
        };
        // A failed send keeps the topic registered so that reconnect replays it.
        self.session.send_raw(message).await
    }

    /// Swap the callback of a registered topic. Returns false for an unknown topic.
    pub fn replace_callback(&mut self, topic: &str, callback: Option<Callback<C::Message>>) -> bool {
        if !self.registry.contains(topic) {
            return false;
        }
        self.registry.replace_handler(topic, callback);
        true
    }

    /// Forget a topic and send its unsubscribe request; unknown topics are ignored.
    #[instrument(skip(self), fields(exchange = %self.config.exchange_name, topic = %topic))]
    pub async fn unsubscribe(&mut self, topic: &str) -> Result<(), ExchangeError> {
        let Some(request) = self.registry.unsubscribe(topic) else {
            debug!("Topic not subscribed");
            return Ok(());
        };
        if !self.session.is_connected() {
            return Ok(());
        }
        let message = self.codec.encode_unsubscription(&request.topic, &request.id)?;
        self.session.send_raw(message).await
    }

    pub async fn unsubscribe_all(&mut self) -> Result<(), ExchangeError> {
        let requests = self.registry.drain();
        if !self.session.is_connected() {
            return Ok(());
        }
        for request in requests {
            let message = self.codec.encode_unsubscription(&request.topic, &request.id)?;
            self.session.send_raw(message).await?;
        }
        Ok(())
    }

    /// Close the socket. Pull iteration ends and the callback loop returns.
    #[instrument(skip(self), fields(exchange = %self.config.exchange_name))]
    pub async fn close(&mut self) -> Result<(), ExchangeError> {
        self.closed = true;
        self.authenticated = false;
        self.session.close().await
    }

    fn lock_mode(&mut self, mode: StreamMode) -> Result<(), ExchangeError> {
        match self.mode {
            None => {
                self.mode = Some(mode);
                if mode == StreamMode::Pull {
                    // Nothing drains commands in pull mode; handles fail from now on.
                    self.commands_rx = None;
                }
                Ok(())
            }
            Some(current) if current == mode => Ok(()),
            Some(current) => Err(ExchangeError::ConfigurationError(format!(
                "Client is already consuming in {:?} mode",
                current
            ))),
        }
    }

    /// Next decoded data message.
    ///
    /// Protocol errors are yielded without ending the iteration. Returns
    /// `None` once the client is closed or the stream can not be resumed.
    pub async fn next_message(&mut self) -> Option<Result<C::Message, ExchangeError>> {
        if let Err(e) = self.lock_mode(StreamMode::Pull) {
            return Some(Err(e));
        }
        loop {
            if self.closed {
                return None;
            }
            let raw = self.session.next_raw().await;
            match self.process(raw).await {
                Some(Event::Data { message, .. }) => return Some(Ok(message)),
                Some(Event::Error(e)) => return Some(Err(e)),
                Some(Event::Closed) => return None,
                None => {}
            }
        }
    }

    /// Pull-mode stream over [`Self::next_message`].
    pub fn messages(&mut self) -> impl Stream<Item = Result<C::Message, ExchangeError>> + '_ {
        stream::unfold(self, |client| async move {
            let item = client.next_message().await?;
            Some((item, client))
        })
    }

    /// Dispatch data to topic callbacks until the client is closed.
    ///
    /// Callbacks run in arrival order on a worker task. Protocol errors go
    /// to `on_error` (or the log) and dispatch continues; a failed reconnect
    /// ends the loop with that error.
    #[instrument(skip(self, on_error), fields(exchange = %self.config.exchange_name))]
    pub async fn run_with_callbacks(
        &mut self,
        on_error: Option<ErrorCallback>,
    ) -> Result<(), ExchangeError> {
        self.lock_mode(StreamMode::Callback)?;
        let Some(mut commands) = self.commands_rx.take() else {
            return Err(ExchangeError::ConfigurationError(
                "Callback loop is already running".to_string(),
            ));
        };

        let queue = CallbackQueue::spawn(self.config.callback_queue_size);
        let result = self
            .dispatch_loop(&mut commands, &queue, on_error.as_ref())
            .await;
        queue.shutdown().await;
        self.commands_rx = Some(commands);
        result
    }

    async fn dispatch_loop(
        &mut self,
        commands: &mut mpsc::UnboundedReceiver<Command<C::Message>>,
        queue: &CallbackQueue,
        on_error: Option<&ErrorCallback>,
    ) -> Result<(), ExchangeError> {
        loop {
            if self.closed {
                return Ok(());
            }

            let raw = tokio::select! {
                command = commands.recv() => {
                    match command {
                        Some(command) => self.apply(command, queue, on_error).await?,
                        None => return Ok(()),
                    }
                    continue;
                }
                raw = self.session.next_raw() => raw,
            };

            match self.process(raw).await {
                Some(Event::Data { topic, message }) => match self.registry.handler(&topic) {
                    Some(callback) => queue.push(callback.job(message)).await?,
                    None => debug!(topic = %topic, "No callback for topic; message skipped"),
                },
                Some(Event::Error(e)) if self.closed => return Err(e),
                Some(Event::Error(e)) => report(queue, on_error, e).await?,
                Some(Event::Closed) => return Ok(()),
                None => {}
            }
        }
    }

    async fn apply(
        &mut self,
        command: Command<C::Message>,
        queue: &CallbackQueue,
        on_error: Option<&ErrorCallback>,
    ) -> Result<(), ExchangeError> {
        let outcome = match command {
            Command::Subscribe(topic, callback) => self.subscribe(&topic, callback).await,
            Command::Unsubscribe(topic) => self.unsubscribe(&topic).await,
            Command::Close => self.close().await,
        };
        match outcome {
            Ok(()) => Ok(()),
            Err(e) => report(queue, on_error, e).await,
        }
    }

    /// Act on one raw read. `None` means nothing to surface.
    async fn process(
        &mut self,
        raw: Option<Result<Message, ExchangeError>>,
    ) -> Option<Event<C::Message>> {
        let raw = match raw {
            Some(Ok(raw)) => raw,
            Some(Err(e)) => return Some(Event::Error(e)),
            None => return self.on_stream_end().await,
        };

        let frame = match self.codec.decode_message(raw) {
            Ok(Some(frame)) => frame,
            Ok(None) => return None,
            Err(e) => return Some(Event::Error(e)),
        };

        match frame {
            WsFrame::Ping(ts) => {
                self.send_pong(ts).await;
                None
            }
            WsFrame::Subscribed { id, topic } => {
                if let Some(topic) = self.registry.acknowledge(id.as_deref(), Some(topic.as_str())) {
                    debug!(topic = %topic, "Subscription active");
                }
                None
            }
            WsFrame::Unsubscribed { id, topic } => {
                self.registry.acknowledge_unsubscribe(id.as_deref(), Some(topic.as_str()));
                debug!(topic = %topic, "Unsubscribed");
                None
            }
            WsFrame::Authenticated => {
                self.authenticated = true;
                None
            }
            WsFrame::Rejected {
                id,
                topic,
                code,
                message,
            } => {
                let failed = self.registry.fail(id.as_deref(), topic.as_deref());
                warn!(topic = ?failed, code = %code, "Request rejected: {}", message);
                Some(Event::Error(ExchangeError::ApiError { code, message }))
            }
            WsFrame::Data { topic, message } => Some(Event::Data { topic, message }),
        }
    }

    async fn on_stream_end(&mut self) -> Option<Event<C::Message>> {
        if self.closed {
            return Some(Event::Closed);
        }
        if !self.config.auto_reconnect || self.registry.is_empty() {
            info!("WebSocket stream ended");
            self.closed = true;
            return Some(Event::Closed);
        }

        warn!("WebSocket stream ended unexpectedly; reconnecting");
        match self.connect().await {
            Ok(()) => None,
            Err(e) => {
                self.closed = true;
                Some(Event::Error(e))
            }
        }
    }

    async fn send_pong(&mut self, timestamp: u64) {
        let pong = match self.codec.encode_pong(timestamp) {
            Ok(pong) => pong,
            Err(e) => {
                warn!("Failed to encode pong: {}", e);
                return;
            }
        };
        if let Err(e) = self.session.send_raw(pong).await {
            warn!("Failed to send pong: {}", e);
        }
    }
}

async fn report(
    queue: &CallbackQueue,
    on_error: Option<&ErrorCallback>,
    error: ExchangeError,
) -> Result<(), ExchangeError> {
    match on_error {
        Some(callback) => queue.push(callback.job(error)).await,
        None => {
            warn!("Unhandled WebSocket error: {}", error);
            Ok(())
        }
    }
}

fn unix_now() -> Result<u64, ExchangeError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| ExchangeError::ConfigurationError(format!("System clock before epoch: {}", e)))
}
