use tabsplit_domain::{
    BalanceAggregator, EngineError, MoneyContext, Person, Purchase, SettlementMethod,
    SettlementStrategy, SplitCalculator,
};

use crate::{
    ledger::Ledger,
    model::{PersonBalance, SplitResult},
};

/// Runs the full recomputation (aggregate, then resolve) over one ledger snapshot.
#[derive(Clone, Copy)]
pub struct SplitProcessor<'a> {
    aggregator: BalanceAggregator,
    strategy: &'a dyn SettlementStrategy,
}

impl SplitProcessor<'static> {
    pub fn with_method(money: MoneyContext, method: SettlementMethod) -> Self {
        Self::new(
            BalanceAggregator::new(SplitCalculator::new(money)),
            method.strategy(),
        )
    }
}

impl<'a> SplitProcessor<'a> {
    pub fn new(aggregator: BalanceAggregator, strategy: &'a dyn SettlementStrategy) -> Self {
        Self {
            aggregator,
            strategy,
        }
    }

    /// Borrowing the ledger for the whole call keeps it from changing mid-computation.
    pub fn split(&self, ledger: &Ledger) -> Result<SplitResult, EngineError> {
        self.split_snapshot(ledger.persons(), ledger.purchases())
    }

    pub fn split_snapshot(
        &self,
        persons: &[Person],
        purchases: &[Purchase],
    ) -> Result<SplitResult, EngineError> {
        let balances = self.aggregator.aggregate(persons, purchases)?;
        let payments = self.strategy.resolve(&balances)?;

        let mut person_balances: Vec<PersonBalance> = balances
            .iter()
            .map(|(id, balance)| PersonBalance {
                id: *id,
                balance: *balance,
            })
            .collect();
        person_balances.sort_by_key(|p| p.id);

        tracing::info!(
            person_count = person_balances.len(),
            payment_count = payments.len(),
            "Computed settlement"
        );

        Ok(SplitResult {
            balances: person_balances,
            payments,
        })
    }
}
