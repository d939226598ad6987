use crate::{
    error::EngineError,
    model::{Payment, PersonBalances, PersonId},
    services::settlement_strategy::{SettlementStrategy, settleable_units},
};

/// Funnel-then-cascade settlement.
///
/// Funnel: every debtor, largest debt first, pays the largest creditor in full.
/// Cascade: walking creditors from largest to smallest, each keeps its own credit and hands what
/// is left of the funnelled pool to the next creditor.
///
/// Produces one payment per debtor plus at most one per additional creditor. The graph is a
/// simple star followed by a chain, not a minimal one. Equal balances keep the enumeration order
/// of the balance map.
///
/// The funnelled pool can exceed any single balance, so very large maps may fail with
/// [`EngineError::AmountOutOfRange`] where greedy matching would not.
#[derive(Clone, Copy, Debug, Default)]
pub struct FunnelCascadeResolver;

impl SettlementStrategy for FunnelCascadeResolver {
    fn resolve(&self, balances: &PersonBalances) -> Result<Vec<Payment>, EngineError> {
        let units = settleable_units(balances)?;

        let (mut creditors, mut debtors): (Vec<(PersonId, i128)>, Vec<(PersonId, i128)>) = units
            .entries
            .iter()
            .copied()
            .partition(|&(_, balance)| balance >= 0);
        // `sort_by` is stable, which is what keeps ties in map order.
        creditors.sort_by(|(_, a), (_, b)| b.cmp(a));
        debtors.sort_by(|(_, a), (_, b)| a.cmp(b));

        let Some(&(main_creditor, _)) = creditors.first() else {
            return Err(EngineError::NoParticipants);
        };

        let mut payments = Vec::with_capacity(debtors.len() + creditors.len() - 1);
        let mut pool: i128 = 0;

        for &(debtor, debt) in &debtors {
            let value = debt.checked_neg().ok_or(EngineError::AmountOutOfRange)?;
            pool = pool
                .checked_add(value)
                .ok_or(EngineError::AmountOutOfRange)?;
            units.push_payment(&mut payments, debtor, main_creditor, value)?;
        }

        for (idx, &(creditor, credit)) in creditors.iter().enumerate() {
            pool = pool
                .checked_sub(credit)
                .ok_or(EngineError::AmountOutOfRange)?;
            let Some(&(next_creditor, _)) = creditors.get(idx + 1) else {
                break;
            };
            units.push_payment(&mut payments, creditor, next_creditor, pool)?;
        }
        debug_assert_eq!(pool, 0, "cascade left units undistributed");

        tracing::debug!(
            creditor_count = creditors.len(),
            debtor_count = debtors.len(),
            payment_count = payments.len(),
            "Resolved settlement with funnel-cascade"
        );

        Ok(payments)
    }
}
