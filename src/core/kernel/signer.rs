use crate::core::errors::ExchangeError;
use base64::engine::general_purpose;
use base64::Engine;
use chrono::{TimeZone, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use url::form_urlencoded::byte_serialize;

pub const SIGNATURE_METHOD: &str = "HmacSHA256";

/// A request whose parameters were signed for one exact method, host, path and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: String,
    pub host: String,
    pub path: String,
    /// Every signed parameter, sorted by key, standard parameters included
    pub params: Vec<(String, String)>,
    pub signature: String,
    /// Key under which the signature travels (`Signature` or `signature`)
    pub signature_key: &'static str,
}

impl SignedRequest {
    /// Parameters to append to the URL query, signature last.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.params.clone();
        pairs.push((self.signature_key.to_string(), self.signature.clone()));
        pairs
    }
}

/// Signer trait for request authentication
///
/// Implementations add their standard parameters, sort, and sign the
/// canonical `METHOD\nHOST\nPATH\nquery` string.
pub trait Signer: Send + Sync {
    /// Sign a request
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `host` - Lower-case host the request is sent to
    /// * `path` - Request path, without query string
    /// * `params` - Query parameters, excluding the signature
    /// * `timestamp` - Unix timestamp in seconds
    fn sign_request(
        &self,
        method: &str,
        host: &str,
        path: &str,
        params: &[(&str, &str)],
        timestamp: u64,
    ) -> Result<SignedRequest, ExchangeError>;
}

/// Parameter naming of the two authentication flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    /// REST v2 signing (`AccessKeyId`, `SignatureVersion=2`, ...)
    Rest,
    /// WebSocket v2.1 signing (`accessKey`, `signatureVersion=2.1`, ...)
    Websocket,
}

impl SignatureScheme {
    const fn access_key_param(self) -> &'static str {
        match self {
            Self::Rest => "AccessKeyId",
            Self::Websocket => "accessKey",
        }
    }

    const fn method_param(self) -> &'static str {
        match self {
            Self::Rest => "SignatureMethod",
            Self::Websocket => "signatureMethod",
        }
    }

    const fn version_param(self) -> (&'static str, &'static str) {
        match self {
            Self::Rest => ("SignatureVersion", "2"),
            Self::Websocket => ("signatureVersion", "2.1"),
        }
    }

    const fn timestamp_param(self) -> &'static str {
        match self {
            Self::Rest => "Timestamp",
            Self::Websocket => "timestamp",
        }
    }

    pub const fn signature_param(self) -> &'static str {
        match self {
            Self::Rest => "Signature",
            Self::Websocket => "signature",
        }
    }
}

/// HMAC-SHA256 signer holding the credential pair
pub struct HmacSigner {
    access_key: String,
    secret_key: Secret<String>,
    scheme: SignatureScheme,
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSigner")
            .field("access_key", &self.access_key)
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}

impl HmacSigner {
    /// Create a new HMAC signer
    ///
    /// Fails with `ConfigurationError` when either key is empty, so that
    /// misconfiguration surfaces before any network call.
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        scheme: SignatureScheme,
    ) -> Result<Self, ExchangeError> {
        let access_key = access_key.into();
        let secret_key = secret_key.into();
        if access_key.is_empty() || secret_key.is_empty() {
            return Err(ExchangeError::ConfigurationError(
                "Access key or secret key can not be empty".to_string(),
            ));
        }
        Ok(Self {
            access_key,
            secret_key: Secret::new(secret_key),
            scheme,
        })
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub const fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    fn sign_payload(&self, payload: &str) -> Result<String, ExchangeError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret_key.expose_secret().as_bytes())
            .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
        mac.update(payload.as_bytes());
        Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
    }
}

impl Signer for HmacSigner {
    fn sign_request(
        &self,
        method: &str,
        host: &str,
        path: &str,
        params: &[(&str, &str)],
        timestamp: u64,
    ) -> Result<SignedRequest, ExchangeError> {
        let (version_key, version) = self.scheme.version_param();
        let mut signed: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        signed.push((
            self.scheme.access_key_param().to_string(),
            self.access_key.clone(),
        ));
        signed.push((
            self.scheme.method_param().to_string(),
            SIGNATURE_METHOD.to_string(),
        ));
        signed.push((version_key.to_string(), version.to_string()));
        signed.push((
            self.scheme.timestamp_param().to_string(),
            format_timestamp(timestamp)?,
        ));
        signed.sort_by(|a, b| a.0.cmp(&b.0));

        let method = method.to_uppercase();
        let host = host.to_lowercase();
        let payload = canonical_string(&method, &host, path, &signed);
        let signature = self.sign_payload(&payload)?;

        Ok(SignedRequest {
            method,
            host,
            path: path.to_string(),
            params: signed,
            signature,
            signature_key: self.scheme.signature_param(),
        })
    }
}

/// `YYYY-MM-DDTHH:MM:SS` in UTC.
pub fn format_timestamp(timestamp: u64) -> Result<String, ExchangeError> {
    let secs = i64::try_from(timestamp)
        .map_err(|_| ExchangeError::validation(format!("Timestamp out of range: {}", timestamp)))?;
    Utc.timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        .ok_or_else(|| ExchangeError::validation(format!("Timestamp out of range: {}", timestamp)))
}

/// Form-urlencoded `k=v` pairs joined with `&`, in the given order.
pub fn encode_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                byte_serialize(k.as_bytes()).collect::<String>(),
                byte_serialize(v.as_bytes()).collect::<String>()
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// The exact string the exchange recomputes: `METHOD\nHOST\nPATH\nquery`.
pub fn canonical_string(method: &str, host: &str, path: &str, sorted: &[(String, String)]) -> String {
    format!("{}\n{}\n{}\n{}", method, host, path, encode_query(sorted))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: u64 = 1_622_200_000;

    fn rest_signer() -> HmacSigner {
        HmacSigner::new("ak", "sk", SignatureScheme::Rest).unwrap()
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(format_timestamp(TS).unwrap(), "2021-05-28T11:06:40");
    }

    #[test]
    fn test_canonical_string_encodes_colons() {
        let signed = rest_signer()
            .sign_request("GET", "api.example.com", "/v1/account/accounts", &[], TS)
            .unwrap();
        assert_eq!(
            canonical_string(&signed.method, &signed.host, &signed.path, &signed.params),
            "GET\napi.example.com\n/v1/account/accounts\n\
             AccessKeyId=ak&SignatureMethod=HmacSHA256&SignatureVersion=2&Timestamp=2021-05-28T11%3A06%3A40"
        );
    }

    #[test]
    fn test_golden_signature() {
        let signed = rest_signer()
            .sign_request("GET", "api.example.com", "/v1/account/accounts", &[], TS)
            .unwrap();
        assert_eq!(signed.signature, "Cv14Pgj1Ceo5Y+x5pTdJFaN6BgL7+OgcLZgAOCJsB8I=");
    }

    #[test]
    fn test_golden_signature_with_params_sorted() {
        let signed = rest_signer()
            .sign_request(
                "GET",
                "api.example.com",
                "/v1/order/openOrders",
                &[("symbol", "btcusdt"), ("size", "100")],
                TS,
            )
            .unwrap();
        let keys: Vec<&str> = signed.params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "AccessKeyId",
                "SignatureMethod",
                "SignatureVersion",
                "Timestamp",
                "size",
                "symbol"
            ]
        );
        assert_eq!(signed.signature, "IDdpqKCtVXyBOaBiov/0vUBnKiFmsBP1cNnbJDNKgDI=");
    }

    #[test]
    fn test_websocket_scheme_golden() {
        let signer = HmacSigner::new("ak", "sk", SignatureScheme::Websocket).unwrap();
        let signed = signer
            .sign_request("GET", "api.huobi.pro", "/ws/v2", &[], TS)
            .unwrap();
        assert_eq!(signed.signature_key, "signature");
        assert!(signed
            .params
            .contains(&("signatureVersion".to_string(), "2.1".to_string())));
        assert_eq!(signed.signature, "W6BQM0JPNSHTSjXxIlSoaxQM4IHJ1UCO014SId2T6U4=");
    }

    #[test]
    fn test_signing_is_deterministic() {
        let params = [("symbol", "ethusdt"), ("account-id", "42"), ("size", "7")];
        let a = rest_signer()
            .sign_request("GET", "api.huobi.pro", "/v1/order/openOrders", &params, TS)
            .unwrap();
        let b = rest_signer()
            .sign_request("GET", "api.huobi.pro", "/v1/order/openOrders", &params, TS)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_any_param_change_changes_signature() {
        let base = [("symbol", "btcusdt"), ("size", "100"), ("direct", "next")];
        let reference = rest_signer()
            .sign_request("GET", "api.huobi.pro", "/v1/order/openOrders", &base, TS)
            .unwrap()
            .signature;

        for i in 0..base.len() {
            let mut changed = base;
            let bumped = format!("{}x", changed[i].1);
            changed[i].1 = &bumped;
            let signature = rest_signer()
                .sign_request("GET", "api.huobi.pro", "/v1/order/openOrders", &changed, TS)
                .unwrap()
                .signature;
            assert_ne!(signature, reference, "changing {} kept the signature", base[i].0);
        }

        let later = rest_signer()
            .sign_request("GET", "api.huobi.pro", "/v1/order/openOrders", &base, TS + 1)
            .unwrap()
            .signature;
        assert_ne!(later, reference);

        let post = rest_signer()
            .sign_request("POST", "api.huobi.pro", "/v1/order/openOrders", &base, TS)
            .unwrap()
            .signature;
        assert_ne!(post, reference);
    }

    #[test]
    fn test_encoding_prevents_separator_collisions() {
        let joined = rest_signer()
            .sign_request("GET", "h", "/p", &[("a", "1&b=2")], TS)
            .unwrap();
        let split = rest_signer()
            .sign_request("GET", "h", "/p", &[("a", "1"), ("b", "2")], TS)
            .unwrap();
        assert_ne!(joined.signature, split.signature);
    }

    #[test]
    fn test_missing_keys_is_configuration_error() {
        let err = HmacSigner::new("ak", "", SignatureScheme::Rest).unwrap_err();
        assert!(matches!(err, ExchangeError::ConfigurationError(_)));
        let err = HmacSigner::new("", "sk", SignatureScheme::Rest).unwrap_err();
        assert!(matches!(err, ExchangeError::ConfigurationError(_)));
    }

    #[test]
    fn test_query_pairs_put_signature_last() {
        let signed = rest_signer()
            .sign_request("get", "API.EXAMPLE.COM", "/v1/account/accounts", &[], TS)
            .unwrap();
        assert_eq!(signed.method, "GET");
        assert_eq!(signed.host, "api.example.com");
        let pairs = signed.query_pairs();
        assert_eq!(pairs.last().unwrap().0, "Signature");
        assert_eq!(signed.signature, "Cv14Pgj1Ceo5Y+x5pTdJFaN6BgL7+OgcLZgAOCJsB8I=");
    }
}
