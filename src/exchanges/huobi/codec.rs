use crate::core::errors::ExchangeError;
use crate::core::kernel::{WsCodec, WsFrame};
use crate::exchanges::huobi::types::StreamMessage;
use flate2::read::GzDecoder;
use serde_json::{json, Map, Value};
use std::io::Read;
use tokio_tungstenite::tungstenite::Message;
use tracing::trace;

/// Codec of the public market stream (`/ws`, `/feed`)
///
/// Frames arrive gzip-compressed; plain text frames are accepted too.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketCodec;

impl MarketCodec {
    pub fn new() -> Self {
        Self
    }
}

impl WsCodec for MarketCodec {
    type Message = StreamMessage;

    fn encode_subscription(&self, topic: &str, id: &str) -> Result<Message, ExchangeError> {
        Ok(Message::Text(json!({ "sub": topic, "id": id }).to_string()))
    }

    fn encode_unsubscription(&self, topic: &str, id: &str) -> Result<Message, ExchangeError> {
        Ok(Message::Text(json!({ "unsub": topic, "id": id }).to_string()))
    }

    fn encode_pong(&self, timestamp: u64) -> Result<Message, ExchangeError> {
        Ok(Message::Text(json!({ "pong": timestamp }).to_string()))
    }

    fn decode_message(
        &self,
        message: Message,
    ) -> Result<Option<WsFrame<StreamMessage>>, ExchangeError> {
        let text = match message {
            Message::Binary(bytes) => gunzip(&bytes)?,
            Message::Text(text) => text,
            _ => return Ok(None),
        };
        let value = parse_json(&text)?;

        if let Some(ping) = value.get("ping") {
            return timestamp_of(ping).map(|ts| Some(WsFrame::Ping(ts)));
        }

        let id = value.get("id").and_then(text_value);
        if value.get("status").and_then(Value::as_str) == Some("error") {
            return Ok(Some(WsFrame::Rejected {
                id,
                topic: None,
                code: value
                    .get("err-code")
                    .and_then(text_value)
                    .unwrap_or_else(|| "unknown".to_string()),
                message: value
                    .get("err-msg")
                    .and_then(text_value)
                    .unwrap_or_default(),
            }));
        }
        if let Some(topic) = value.get("subbed").and_then(Value::as_str) {
            return Ok(Some(WsFrame::Subscribed {
                id,
                topic: topic.to_string(),
            }));
        }
        if let Some(topic) = value.get("unsubbed").and_then(Value::as_str) {
            return Ok(Some(WsFrame::Unsubscribed {
                id,
                topic: topic.to_string(),
            }));
        }

        match (value.get("ch").and_then(Value::as_str), value.get("tick")) {
            (Some(topic), Some(tick)) => Ok(Some(WsFrame::Data {
                topic: topic.to_string(),
                message: StreamMessage {
                    topic: topic.to_string(),
                    ts: value.get("ts").and_then(Value::as_u64),
                    data: tick.clone(),
                },
            })),
            _ => {
                trace!("Ignoring market frame: {}", text);
                Ok(None)
            }
        }
    }
}

/// Codec of the authenticated account stream (`/ws/v2`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountCodec;

impl AccountCodec {
    pub fn new() -> Self {
        Self
    }
}

impl WsCodec for AccountCodec {
    type Message = StreamMessage;

    fn encode_subscription(&self, topic: &str, _id: &str) -> Result<Message, ExchangeError> {
        Ok(Message::Text(json!({ "action": "sub", "ch": topic }).to_string()))
    }

    fn encode_unsubscription(&self, topic: &str, _id: &str) -> Result<Message, ExchangeError> {
        Ok(Message::Text(json!({ "action": "unsub", "ch": topic }).to_string()))
    }

    fn encode_pong(&self, timestamp: u64) -> Result<Message, ExchangeError> {
        Ok(Message::Text(
            json!({ "action": "pong", "data": { "ts": timestamp } }).to_string(),
        ))
    }

    fn encode_auth(&self, params: &[(String, String)]) -> Result<Message, ExchangeError> {
        let params: Map<String, Value> = params
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Ok(Message::Text(
            json!({ "action": "req", "ch": "auth", "params": params }).to_string(),
        ))
    }

    fn requires_auth(&self) -> bool {
        true
    }

    fn decode_message(
        &self,
        message: Message,
    ) -> Result<Option<WsFrame<StreamMessage>>, ExchangeError> {
        let text = match message {
            Message::Text(text) => text,
            Message::Binary(bytes) => String::from_utf8(bytes).map_err(|e| {
                ExchangeError::ProtocolError(format!("Account frame is not UTF-8: {}", e))
            })?,
            _ => return Ok(None),
        };
        let value = parse_json(&text)?;

        let action = value.get("action").and_then(Value::as_str).unwrap_or_default();
        let topic = value.get("ch").and_then(Value::as_str).map(str::to_string);
        let code = value.get("code").and_then(Value::as_i64);

        let frame = match (action, code) {
            ("ping", _) => {
                let ts = value.get("data").and_then(|data| data.get("ts")).ok_or_else(|| {
                    ExchangeError::ProtocolError(format!("Ping without timestamp: {}", text))
                })?;
                WsFrame::Ping(timestamp_of(ts)?)
            }
            ("push", _) => {
                let topic = topic.ok_or_else(|| {
                    ExchangeError::ProtocolError(format!("Push without channel: {}", text))
                })?;
                let data = value.get("data").cloned().unwrap_or(Value::Null);
                let ts = data.get("eventTime").and_then(Value::as_u64);
                WsFrame::Data {
                    topic: topic.clone(),
                    message: StreamMessage { topic, ts, data },
                }
            }
            ("req", Some(200)) if topic.as_deref() == Some("auth") => WsFrame::Authenticated,
            ("sub", Some(200)) => match topic {
                Some(topic) => WsFrame::Subscribed { id: None, topic },
                None => return Ok(None),
            },
            ("unsub", Some(200)) => match topic {
                Some(topic) => WsFrame::Unsubscribed { id: None, topic },
                None => return Ok(None),
            },
            ("req" | "sub" | "unsub", Some(code)) => WsFrame::Rejected {
                id: None,
                topic: topic.filter(|t| t != "auth"),
                code: code.to_string(),
                message: value
                    .get("message")
                    .and_then(text_value)
                    .unwrap_or_default(),
            },
            _ => {
                trace!("Ignoring account frame: {}", text);
                return Ok(None);
            }
        };
        Ok(Some(frame))
    }
}

fn gunzip(bytes: &[u8]) -> Result<String, ExchangeError> {
    let mut text = String::new();
    GzDecoder::new(bytes)
        .read_to_string(&mut text)
        .map_err(|e| ExchangeError::ProtocolError(format!("Failed to gunzip frame: {}", e)))?;
    Ok(text)
}

fn parse_json(text: &str) -> Result<Value, ExchangeError> {
    serde_json::from_str(text)
        .map_err(|e| ExchangeError::ProtocolError(format!("Malformed frame {:?}: {}", text, e)))
}

fn timestamp_of(value: &Value) -> Result<u64, ExchangeError> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
        .ok_or_else(|| ExchangeError::ProtocolError(format!("Invalid ping timestamp: {}", value)))
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
