#![allow(dead_code)]

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use huobix::core::kernel::{ReqwestRest, WsSession};
use huobix::{ExchangeError, HuobiBuilder, HuobiConnector};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use wiremock::MockServer;

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Signed connector pointed at the mock server
pub fn signed_connector(server: &MockServer) -> HuobiConnector<ReqwestRest> {
    HuobiBuilder::new()
        .with_api_url(server.uri())
        .with_credentials("ak".to_string(), "sk".to_string())
        .build_rest_only()
        .expect("connector")
}

pub fn public_connector(server: &MockServer) -> HuobiConnector<ReqwestRest> {
    HuobiBuilder::new()
        .with_api_url(server.uri())
        .build_rest_only()
        .expect("connector")
}

pub fn gzip(text: &str) -> Message {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).expect("gzip");
    Message::Binary(encoder.finish().expect("gzip"))
}

pub fn market_data(topic: &str, ts: u64) -> Message {
    gzip(&json!({"ch": topic, "ts": ts, "tick": {"close": 1.0}}).to_string())
}

/// One step of a scripted connection
#[derive(Debug, Clone)]
pub enum Step {
    Frame(Message),
    End,
}

/// How the fake server answers control requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replies {
    /// Market protocol: ack `sub`, reject topics containing "bogus"
    Market,
    /// Account protocol with a successful auth handshake
    AccountOk,
    /// Account protocol rejecting the auth request
    AccountDenied,
    Silent,
}

/// In-memory session replaying one script per connection.
///
/// Every outgoing text frame is recorded in `sent`; an empty inbox blocks
/// like an idle socket.
pub struct ScriptedSession {
    scripts: VecDeque<Vec<Step>>,
    replies: Replies,
    inbox_tx: mpsc::UnboundedSender<Step>,
    inbox_rx: mpsc::UnboundedReceiver<Step>,
    connected: bool,
    pub sent: Arc<Mutex<Vec<Value>>>,
    pub connects: Arc<Mutex<u32>>,
}

impl ScriptedSession {
    pub fn new(replies: Replies, scripts: Vec<Vec<Step>>) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            scripts: scripts.into(),
            replies,
            inbox_tx,
            inbox_rx,
            connected: false,
            sent: Arc::new(Mutex::new(Vec::new())),
            connects: Arc::new(Mutex::new(0)),
        }
    }

    fn reply(&self, request: &Value) {
        let reply = match self.replies {
            Replies::Silent => None,
            Replies::Market => {
                let id = request["id"].clone();
                match request.get("sub").and_then(Value::as_str) {
                    Some(topic) if topic.contains("bogus") => Some(gzip(
                        &json!({
                            "status": "error",
                            "err-code": "bad-request",
                            "err-msg": "invalid topic",
                            "id": id,
                        })
                        .to_string(),
                    )),
                    Some(topic) => Some(gzip(
                        &json!({"id": id, "status": "ok", "subbed": topic, "ts": 1}).to_string(),
                    )),
                    None => request.get("unsub").map(|topic| {
                        gzip(&json!({"id": id, "status": "ok", "unsubbed": topic}).to_string())
                    }),
                }
            }
            Replies::AccountOk | Replies::AccountDenied => {
                let action = request["action"].as_str().unwrap_or_default();
                let ch = request["ch"].clone();
                match action {
                    "req" if self.replies == Replies::AccountOk => Some(Message::Text(
                        json!({"action": "req", "code": 200, "ch": "auth", "data": {}}).to_string(),
                    )),
                    "req" => Some(Message::Text(
                        json!({"action": "req", "code": 2002, "ch": "auth", "message": "auth.fail"})
                            .to_string(),
                    )),
                    "sub" | "unsub" => Some(Message::Text(
                        json!({"action": action, "code": 200, "ch": ch, "data": {}}).to_string(),
                    )),
                    _ => None,
                }
            }
        };
        if let Some(reply) = reply {
            let _ = self.inbox_tx.send(Step::Frame(reply));
        }
    }

    pub fn sent_log(&self) -> Arc<Mutex<Vec<Value>>> {
        Arc::clone(&self.sent)
    }
}

#[async_trait]
impl WsSession for ScriptedSession {
    async fn connect(&mut self) -> Result<(), ExchangeError> {
        while self.inbox_rx.try_recv().is_ok() {}
        let Some(script) = self.scripts.pop_front() else {
            return Err(ExchangeError::network("ws://scripted", "no more scripted connections"));
        };
        for step in script {
            let _ = self.inbox_tx.send(step);
        }
        *self.connects.lock().unwrap() += 1;
        self.connected = true;
        Ok(())
    }

    async fn send_raw(&mut self, msg: Message) -> Result<(), ExchangeError> {
        if !self.connected {
            return Err(ExchangeError::network("ws://scripted", "not connected"));
        }
        if let Message::Text(text) = msg {
            let value: Value = serde_json::from_str(&text).expect("client sends JSON");
            self.reply(&value);
            self.sent.lock().unwrap().push(value);
        }
        Ok(())
    }

    async fn next_raw(&mut self) -> Option<Result<Message, ExchangeError>> {
        if !self.connected {
            return None;
        }
        match self.inbox_rx.recv().await? {
            Step::Frame(message) => Some(Ok(message)),
            Step::End => {
                self.connected = false;
                None
            }
        }
    }

    async fn close(&mut self) -> Result<(), ExchangeError> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn url(&self) -> &str {
        "wss://api.huobi.pro/ws/v2"
    }
}
