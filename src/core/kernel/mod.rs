/// Transport kernel shared by every Huobi API surface
///
/// Nothing in here knows endpoint paths or topic names; exchange specifics
/// live in `exchanges::huobi` and plug in through [`RestClient`],
/// [`Signer`] and [`WsCodec`].
///
/// ## REST
/// - `RestClient`: HTTP interface, signs when asked to
/// - `ReqwestRest`: reqwest implementation
/// - `HmacSigner`: HMAC-SHA256 signing for REST and WebSocket auth
///
/// ## WebSocket
/// - `WsSession` / `TungsteniteWs` / `ReconnectWs`: transport and retrying connect
/// - `SubscriptionRegistry`: topic table with ack correlation and replay
/// - `WsClient`: socket lifecycle, pull and callback consumption
///
/// ```rust,no_run
/// use huobix::core::kernel::*;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let signer = Arc::new(HmacSigner::new("ak", "sk", SignatureScheme::Rest)?);
/// let rest = RestClientBuilder::new(RestClientConfig::new(
///     "https://api.huobi.pro".to_string(),
///     "huobi".to_string(),
/// ))
/// .with_signer(signer)
/// .build()?;
///
/// let accounts: serde_json::Value = rest.get_json("/v1/account/accounts", &[], true).await?;
/// # Ok(())
/// # }
/// ```
pub mod client;
pub mod codec;
pub mod dispatch;
pub mod registry;
pub mod rest;
pub mod signer;
pub mod ws;

pub use client::{DispatchHandle, StreamMode, WsClient, WsClientConfig};
pub use codec::{WsCodec, WsFrame};
pub use dispatch::{Callback, ErrorCallback};
pub use registry::{ControlRequest, SubscriptionRegistry, SubscriptionState};
pub use rest::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{HmacSigner, SignatureScheme, SignedRequest, Signer};
pub use ws::{ConnectionStats, ReconnectWs, TungsteniteWs, WsConfig, WsSession};
