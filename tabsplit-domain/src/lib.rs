#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod services;

pub use error::{EngineError, InvalidPurchaseReason, PersonRole, UnsupportedScale};
pub use model::{Money, Payment, Person, PersonBalances, PersonId, Purchase, PurchaseId, Split};
pub use services::{
    BalanceAggregator, FunnelCascadeResolver, GreedyMatchResolver, MoneyContext, SettlementMethod,
    SettlementStrategy, SplitCalculator, UnknownSettlementMethod,
};
