use crate::core::errors::ExchangeError;
use tokio_tungstenite::tungstenite::Message;

/// A decoded frame, split into what the client acts on and what it hands to callers.
#[derive(Debug, Clone, PartialEq)]
pub enum WsFrame<M> {
    /// Application-level heartbeat that must be answered with [`WsCodec::encode_pong`]
    Ping(u64),
    /// Subscription acknowledged; `id` is set when the stream correlates by id
    Subscribed { id: Option<String>, topic: String },
    /// Unsubscription acknowledged
    Unsubscribed { id: Option<String>, topic: String },
    /// Authentication handshake accepted
    Authenticated,
    /// Exchange-reported failure for a request (sub, unsub or auth)
    Rejected {
        id: Option<String>,
        topic: Option<String>,
        code: String,
        message: String,
    },
    /// Data pushed on a topic
    Data { topic: String, message: M },
}

/// Codec trait for handling exchange-specific WebSocket message encoding/decoding
///
/// Control frames (ping, pong, close) of the WebSocket protocol itself are
/// handled by the transport; application heartbeats come back as
/// [`WsFrame::Ping`].
pub trait WsCodec: Send + Sync + 'static {
    /// The type representing pushed data from this exchange
    type Message: Send + 'static;

    /// Encode a subscribe request for one topic
    fn encode_subscription(&self, topic: &str, id: &str) -> Result<Message, ExchangeError>;

    /// Encode an unsubscribe request for one topic
    fn encode_unsubscription(&self, topic: &str, id: &str) -> Result<Message, ExchangeError>;

    /// Encode the answer to an application ping
    fn encode_pong(&self, timestamp: u64) -> Result<Message, ExchangeError>;

    /// Encode the signed authentication request
    ///
    /// Streams without authentication keep the default, which refuses.
    fn encode_auth(&self, params: &[(String, String)]) -> Result<Message, ExchangeError> {
        let _ = params;
        Err(ExchangeError::ConfigurationError(
            "This stream does not support authentication".to_string(),
        ))
    }

    /// Whether subscribing needs a completed authentication handshake
    fn requires_auth(&self) -> bool {
        false
    }

    /// Decode a raw WebSocket message
    ///
    /// # Returns
    /// - `Ok(Some(frame))` - Successfully decoded frame
    /// - `Ok(None)` - Message was ignored by the codec
    /// - `Err(ProtocolError)` - Malformed or unexpected payload
    fn decode_message(&self, message: Message)
        -> Result<Option<WsFrame<Self::Message>>, ExchangeError>;
}
