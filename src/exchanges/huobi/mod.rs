pub mod builder;
pub mod codec;
pub mod connector;
pub mod requests;
pub mod rest;
pub mod topics;
pub mod types;
pub mod validation;
pub mod websocket;

// Re-export main types for easier importing
pub use builder::{build_connector, HuobiBuilder};
pub use codec::{AccountCodec, MarketCodec};
pub use connector::HuobiConnector;
pub use requests::*;
pub use rest::{HuobiRest, Params};
pub use types::*;
pub use websocket::{AccountStream, MarketStream, StreamCallback};
