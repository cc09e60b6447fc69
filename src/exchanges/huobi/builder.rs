use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{
    HmacSigner, ReconnectWs, ReqwestRest, RestClientBuilder, RestClientConfig, SignatureScheme,
    TungsteniteWs, WsClient, WsClientConfig, WsConfig,
};
use crate::exchanges::huobi::codec::{AccountCodec, MarketCodec};
use crate::exchanges::huobi::connector::HuobiConnector;
use crate::exchanges::huobi::websocket::{AccountStream, MarketStream};
use std::sync::Arc;
use std::time::Duration;

const EXCHANGE_NAME: &str = "huobi";

/// Builder for Huobi REST connectors and WebSocket streams
///
/// Every `build_*` call creates its own client; nothing is shared between
/// the values it returns.
#[derive(Debug, Clone, Default)]
pub struct HuobiBuilder {
    config: ExchangeConfig,
    ws_config: WsConfig,
    client_config: WsClientConfig,
}

impl HuobiBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the exchange configuration
    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set API credentials, keeping the configured endpoints
    pub fn with_credentials(mut self, access_key: String, secret_key: String) -> Self {
        let mut config = ExchangeConfig::new(access_key, secret_key);
        config.api_url = self.config.api_url.take();
        config.ws_market_url = self.config.ws_market_url.take();
        config.ws_market_feed_url = self.config.ws_market_feed_url.take();
        config.ws_account_url = self.config.ws_account_url.take();
        config.timeout_seconds = self.config.timeout_seconds;
        self.config = config;
        self
    }

    /// Override the REST host, e.g. `https://api-aws.huobi.pro`
    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.config.api_url = Some(api_url);
        self
    }

    pub fn with_ws_market_url(mut self, url: String) -> Self {
        self.config.ws_market_url = Some(url);
        self
    }

    pub fn with_ws_account_url(mut self, url: String) -> Self {
        self.config.ws_account_url = Some(url);
        self
    }

    /// REST request timeout in seconds
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.timeout_seconds = timeout_seconds;
        self
    }

    /// Connection attempts made on every (re)connect
    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.ws_config.max_reconnect_attempts = attempts;
        self
    }

    /// First delay between connection attempts; doubled on each failure
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.ws_config.reconnect_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Reconnect and replay subscriptions when a stream drops
    pub fn with_auto_reconnect(mut self, enabled: bool) -> Self {
        self.client_config.auto_reconnect = enabled;
        self
    }

    pub fn with_callback_queue_size(mut self, size: usize) -> Self {
        self.client_config.callback_queue_size = size;
        self
    }

    /// Build the REST connector; signed endpoints need credentials.
    pub fn build_rest_only(&self) -> Result<HuobiConnector<ReqwestRest>, ExchangeError> {
        let rest_config = RestClientConfig::new(
            self.config.resolved_api_url().to_string(),
            EXCHANGE_NAME.to_string(),
        )
        .with_timeout(self.config.timeout_seconds);

        let mut rest_builder = RestClientBuilder::new(rest_config);
        if self.config.has_credentials() {
            let signer = HmacSigner::new(
                self.config.access_key(),
                self.config.secret_key(),
                SignatureScheme::Rest,
            )?;
            rest_builder = rest_builder.with_signer(Arc::new(signer));
        }

        Ok(HuobiConnector::new(rest_builder.build()?))
    }

    /// Public market stream on `/ws`
    pub fn build_market_stream(&self) -> MarketStream {
        self.market_stream(self.config.resolved_ws_market_url())
    }

    /// Public market stream on `/feed`, which carries the incremental depth topics
    pub fn build_market_feed_stream(&self) -> MarketStream {
        self.market_stream(self.config.resolved_ws_market_feed_url())
    }

    /// Authenticated account stream on `/ws/v2`
    ///
    /// Fails with `ConfigurationError` without credentials; the handshake
    /// itself happens on `connect`.
    pub fn build_account_stream(&self) -> Result<AccountStream, ExchangeError> {
        if !self.config.has_credentials() {
            return Err(ExchangeError::ConfigurationError(
                "Account stream requires an access key and a secret key".to_string(),
            ));
        }
        let signer = HmacSigner::new(
            self.config.access_key(),
            self.config.secret_key(),
            SignatureScheme::Websocket,
        )?;
        let session = self.session(self.config.resolved_ws_account_url());
        Ok(WsClient::new(session, AccountCodec::new())
            .with_signer(Arc::new(signer))
            .with_config(self.client_config.clone()))
    }

    fn market_stream(&self, url: &str) -> MarketStream {
        WsClient::new(self.session(url), MarketCodec::new())
            .with_config(self.client_config.clone())
    }

    fn session(&self, url: &str) -> ReconnectWs<TungsteniteWs> {
        let transport = TungsteniteWs::new(url.to_string(), EXCHANGE_NAME.to_string())
            .with_config(self.ws_config.clone());
        ReconnectWs::new(transport)
            .with_max_reconnect_attempts(self.ws_config.max_reconnect_attempts)
            .with_reconnect_delay(Duration::from_millis(self.ws_config.reconnect_delay_ms))
    }
}

/// REST connector for `config`
pub fn build_connector(config: ExchangeConfig) -> Result<HuobiConnector<ReqwestRest>, ExchangeError> {
    HuobiBuilder::new().with_config(config).build_rest_only()
}
