use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::exchanges::huobi::types::Page;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;

/// Query parameters of one request, in insertion order.
#[derive(Debug, Default, Clone)]
pub struct Params {
    pairs: Vec<(&'static str, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: &'static str, value: impl Display) -> Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    pub fn push_opt<V: Display>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    /// Join a list with commas; an empty list adds nothing.
    pub fn push_list<V: Display>(self, key: &'static str, values: &[V]) -> Self {
        if values.is_empty() {
            return self;
        }
        let joined = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.push(key, joined)
    }

    pub fn as_pairs(&self) -> Vec<(&str, &str)> {
        self.pairs
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Thin envelope-aware wrapper around `RestClient` for the Huobi API
#[derive(Debug, Clone)]
pub struct HuobiRest<R: RestClient> {
    client: R,
}

impl<R: RestClient> HuobiRest<R> {
    pub fn new(client: R) -> Self {
        Self { client }
    }

    pub fn inner(&self) -> &R {
        &self.client
    }

    /// GET and return the `data` member of the envelope
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &Params,
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        let envelope = self.get_raw(endpoint, params, authenticated).await?;
        extract(envelope, "data")
    }

    /// GET and return the `tick` member, used by most market endpoints
    pub async fn get_tick<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &Params,
    ) -> Result<T, ExchangeError> {
        let envelope = self.get_raw(endpoint, params, false).await?;
        extract(envelope, "tick")
    }

    /// Signed GET of a v2 listing, keeping the `nextId` cursor
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &Params,
    ) -> Result<Page<T>, ExchangeError> {
        let envelope = self.get_raw(endpoint, params, true).await?;
        serde_json::from_value(envelope).map_err(|e| {
            ExchangeError::DeserializationError(format!("Failed to decode page: {}", e))
        })
    }

    /// GET and return the whole envelope once it has been checked
    pub async fn get_raw(
        &self,
        endpoint: &str,
        params: &Params,
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        let response = self
            .client
            .get(endpoint, &params.as_pairs(), authenticated)
            .await;
        check_envelope(recover_envelope(response)?)
    }

    /// Signed POST returning the `data` member
    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &Value,
    ) -> Result<T, ExchangeError> {
        let envelope = self.post_raw(endpoint, body).await?;
        extract(envelope, "data")
    }

    /// Signed POST returning the checked envelope
    pub async fn post_raw(&self, endpoint: &str, body: &Value) -> Result<Value, ExchangeError> {
        let response = self.client.post(endpoint, body, true).await;
        check_envelope(recover_envelope(response)?)
    }
}

/// Serialize a request body.
pub fn to_body<T: Serialize>(request: &T) -> Result<Value, ExchangeError> {
    serde_json::to_value(request).map_err(|e| {
        ExchangeError::SerializationError(format!("Failed to serialize request body: {}", e))
    })
}

/// A non-2xx answer that still carries an exchange envelope is reported as
/// that envelope, not as a transport failure.
fn recover_envelope(response: Result<Value, ExchangeError>) -> Result<Value, ExchangeError> {
    match response {
        Err(ExchangeError::HttpError {
            endpoint,
            status,
            body,
        }) => match serde_json::from_str::<Value>(&body) {
            Ok(value) if envelope_error(&value).is_some() => Ok(value),
            _ => Err(ExchangeError::HttpError {
                endpoint,
                status,
                body,
            }),
        },
        other => other,
    }
}

/// Turn an error envelope into `ApiError`, pass anything else through.
///
/// v1 endpoints answer `{"status":"ok"|"error", "err-code", "err-msg"}`,
/// v2 endpoints answer `{"code":200|n, "message"}`.
pub fn check_envelope(value: Value) -> Result<Value, ExchangeError> {
    match envelope_error(&value) {
        Some(error) => Err(error),
        None => Ok(value),
    }
}

fn envelope_error(value: &Value) -> Option<ExchangeError> {
    if let Some(status) = value.get("status").and_then(Value::as_str) {
        if status == "ok" {
            return None;
        }
        if status == "error" {
            return Some(ExchangeError::ApiError {
                code: text_of(value.get("err-code")).unwrap_or_else(|| "unknown".to_string()),
                message: text_of(value.get("err-msg")).unwrap_or_default(),
            });
        }
    }

    let code = value.get("code")?;
    let numeric = code
        .as_i64()
        .or_else(|| code.as_str().and_then(|c| c.parse().ok()));
    if numeric == Some(200) {
        return None;
    }
    Some(ExchangeError::ApiError {
        code: text_of(Some(code)).unwrap_or_else(|| "unknown".to_string()),
        message: text_of(value.get("message"))
            .or_else(|| text_of(value.get("msg")))
            .unwrap_or_default(),
    })
}

fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn extract<T: DeserializeOwned>(mut envelope: Value, field: &str) -> Result<T, ExchangeError> {
    let payload = envelope
        .get_mut(field)
        .map(Value::take)
        .ok_or_else(|| {
            ExchangeError::DeserializationError(format!("Response has no '{}' member", field))
        })?;
    serde_json::from_value(payload).map_err(|e| {
        ExchangeError::DeserializationError(format!("Failed to decode '{}': {}", field, e))
    })
}
