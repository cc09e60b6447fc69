use crate::core::kernel::RestClient;

pub mod account;
pub mod algo;
pub mod generic;
pub mod margin;
pub mod market;
pub mod order;
pub mod subuser;
pub mod wallet;

pub use account::Account;
pub use algo::Algo;
pub use generic::Generic;
pub use margin::Margin;
pub use market::Market;
pub use order::Order;
pub use subuser::SubUser;
pub use wallet::Wallet;

/// Huobi REST connector composing every endpoint group
///
/// All groups share one `RestClient`; public groups work without
/// credentials, signed ones fail with `ConfigurationError` when none are configured.
pub struct HuobiConnector<R: RestClient> {
    pub generic: Generic<R>,
    pub market: Market<R>,
    pub account: Account<R>,
    pub wallet: Wallet<R>,
    pub order: Order<R>,
    pub margin: Margin<R>,
    pub subuser: SubUser<R>,
    pub algo: Algo<R>,
}

impl<R: RestClient + Clone> HuobiConnector<R> {
    pub fn new(rest: R) -> Self {
        Self {
            generic: Generic::new(&rest),
            market: Market::new(&rest),
            account: Account::new(&rest),
            wallet: Wallet::new(&rest),
            order: Order::new(&rest),
            margin: Margin::new(&rest),
            subuser: SubUser::new(&rest),
            algo: Algo::new(&rest),
        }
    }
}
