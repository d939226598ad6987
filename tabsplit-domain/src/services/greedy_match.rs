use crate::{
    error::EngineError,
    model::{Payment, PersonBalances, PersonId},
    services::settlement_strategy::{SettlementStrategy, settleable_units},
};

/// Greedy settlement: the largest remaining debtor pays the largest remaining creditor as much as
/// either side still has, until everyone is even.
///
/// Every step clears at least one person, so at most `persons - 1` payments are produced.
/// Equal amounts resolve to whoever comes first in the balance map.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyMatchResolver;

impl SettlementStrategy for GreedyMatchResolver {
    fn resolve(&self, balances: &PersonBalances) -> Result<Vec<Payment>, EngineError> {
        let units = settleable_units(balances)?;

        let mut creditors: Vec<(PersonId, i128)> = Vec::new();
        let mut debtors: Vec<(PersonId, i128)> = Vec::new();
        for &(person, balance) in &units.entries {
            if balance > 0 {
                creditors.push((person, balance));
            } else if balance < 0 {
                let debt = balance.checked_neg().ok_or(EngineError::AmountOutOfRange)?;
                debtors.push((person, debt));
            }
        }

        let mut payments = Vec::with_capacity(balances.len().saturating_sub(1));
        while let (Some(creditor_idx), Some(debtor_idx)) = (largest(&creditors), largest(&debtors))
        {
            let (creditor, credit) = creditors[creditor_idx];
            let (debtor, debt) = debtors[debtor_idx];
            let value = credit.min(debt);

            units.push_payment(&mut payments, debtor, creditor, value)?;
            creditors[creditor_idx].1 -= value;
            debtors[debtor_idx].1 -= value;
        }

        tracing::debug!(
            member_count = balances.len(),
            payment_count = payments.len(),
            "Resolved settlement with greedy matching"
        );

        Ok(payments)
    }
}

/// Index of the first entry holding the largest positive amount.
fn largest(entries: &[(PersonId, i128)]) -> Option<usize> {
    let mut best: Option<(usize, i128)> = None;
    for (idx, &(_, amount)) in entries.iter().enumerate() {
        if amount <= 0 {
            continue;
        }
        match best {
            Some((_, best_amount)) if best_amount >= amount => {}
            _ => best = Some((idx, amount)),
        }
    }
    best.map(|(idx, _)| idx)
}
