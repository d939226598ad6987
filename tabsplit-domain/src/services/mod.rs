pub mod balance_aggregator;
pub mod funnel_cascade;
pub mod greedy_match;
pub mod money_context;
pub mod settlement_strategy;
pub mod split_calculator;

pub use balance_aggregator::BalanceAggregator;
pub use funnel_cascade::FunnelCascadeResolver;
pub use greedy_match::GreedyMatchResolver;
pub use money_context::MoneyContext;
pub use settlement_strategy::{SettlementMethod, SettlementStrategy, UnknownSettlementMethod};
pub use split_calculator::SplitCalculator;
