use indexmap::IndexMap;

use crate::{
    error::{EngineError, PersonRole},
    model::{Person, PersonBalances, PersonId, Purchase},
    services::SplitCalculator,
};

/// Folds purchases into a net balance per person.
#[derive(Clone, Copy, Debug, Default)]
pub struct BalanceAggregator {
    calculator: SplitCalculator,
}

impl BalanceAggregator {
    pub fn new(calculator: SplitCalculator) -> Self {
        Self { calculator }
    }

    /// Rebuilds every person's balance from scratch.
    ///
    /// Every person in `persons` appears in the result, in snapshot order, even without purchases.
    /// A purchase naming someone outside `persons` aborts the whole aggregation, as does a total
    /// that no longer fits the money scale.
    pub fn aggregate(
        &self,
        persons: &[Person],
        purchases: &[Purchase],
    ) -> Result<PersonBalances, EngineError> {
        let mut units: IndexMap<PersonId, i128> =
            persons.iter().map(|person| (person.id, 0)).collect();

        for purchase in purchases {
            check_references(&units, purchase)?;
            let shares = self.calculator.shares(purchase)?;

            credit(&mut units, purchase.buyer(), shares.buyer_credit)?;
            for participant in purchase.participants() {
                credit(&mut units, participant, -shares.participant_debt)?;
            }
        }

        debug_assert!(
            !matches!(
                units.values().try_fold(0_i128, |sum, &value| sum.checked_add(value)),
                Some(total) if total != 0
            ),
            "aggregated balances drifted"
        );

        let context = self.calculator.context();
        let balances = units
            .into_iter()
            .map(|(person, value)| context.from_units(value).map(|balance| (person, balance)))
            .collect::<Result<PersonBalances, _>>()?;

        tracing::debug!(
            person_count = persons.len(),
            purchase_count = purchases.len(),
            "Aggregated balances"
        );

        Ok(balances)
    }
}

fn check_references(
    units: &IndexMap<PersonId, i128>,
    purchase: &Purchase,
) -> Result<(), EngineError> {
    let roles = std::iter::once((purchase.buyer(), PersonRole::Buyer)).chain(
        purchase
            .participants()
            .map(|participant| (participant, PersonRole::Participant)),
    );

    for (person, role) in roles {
        if !units.contains_key(&person) {
            tracing::warn!(
                purchase = purchase.id().0,
                person = person.0,
                %role,
                "Purchase references a person outside the snapshot"
            );
            return Err(EngineError::UnknownPerson {
                purchase: purchase.id(),
                person,
                role,
            });
        }
    }

    Ok(())
}

fn credit(
    units: &mut IndexMap<PersonId, i128>,
    person: PersonId,
    amount: i128,
) -> Result<(), EngineError> {
    if let Some(balance) = units.get_mut(&person) {
        *balance = balance
            .checked_add(amount)
            .ok_or(EngineError::AmountOutOfRange)?;
    }
    Ok(())
}
