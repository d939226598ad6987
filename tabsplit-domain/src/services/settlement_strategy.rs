use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::{
    error::EngineError,
    model::{Money, Payment, PersonBalances, PersonId},
    services::{FunnelCascadeResolver, GreedyMatchResolver},
};

/// Turns a zero-sum balance map into payments that zero every balance.
pub trait SettlementStrategy: Send + Sync {
    fn resolve(&self, balances: &PersonBalances) -> Result<Vec<Payment>, EngineError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SettlementMethod {
    /// Every debtor pays the largest creditor, who passes the surplus down the creditor chain.
    #[default]
    FunnelCascade,
    /// Repeatedly matches the largest creditor with the largest debtor.
    GreedyMatch,
}

static FUNNEL_CASCADE: FunnelCascadeResolver = FunnelCascadeResolver;
static GREEDY_MATCH: GreedyMatchResolver = GreedyMatchResolver;

impl SettlementMethod {
    pub fn strategy(self) -> &'static dyn SettlementStrategy {
        match self {
            Self::FunnelCascade => &FUNNEL_CASCADE,
            Self::GreedyMatch => &GREEDY_MATCH,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FunnelCascade => "funnel-cascade",
            Self::GreedyMatch => "greedy",
        }
    }
}

impl fmt::Display for SettlementMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown settlement method '{0}' (expected 'funnel-cascade' or 'greedy')")]
pub struct UnknownSettlementMethod(pub String);

impl FromStr for SettlementMethod {
    type Err = UnknownSettlementMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "funnel-cascade" | "funnel" => Ok(Self::FunnelCascade),
            "greedy" | "greedy-match" => Ok(Self::GreedyMatch),
            _ => Err(UnknownSettlementMethod(s.to_string())),
        }
    }
}

/// A settleable balance map, counted in atomic units of its finest amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct UnitBalances {
    pub scale: u32,
    pub entries: Vec<(PersonId, i128)>,
}

/// Rejects maps that no strategy can settle.
pub(crate) fn settleable_units(balances: &PersonBalances) -> Result<UnitBalances, EngineError> {
    if balances.is_empty() {
        return Err(EngineError::NoParticipants);
    }

    let scale = balances
        .values()
        .map(|balance| balance.as_decimal().scale())
        .max()
        .unwrap_or_default();
    let entries = balances
        .iter()
        .map(|(&person, &balance)| {
            balance
                .to_units(scale)
                .map(|units| (person, units))
                .ok_or(EngineError::AmountOutOfRange)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let total = entries
        .iter()
        .try_fold(0_i128, |sum, &(_, units)| sum.checked_add(units))
        .ok_or(EngineError::AmountOutOfRange)?;
    if total != 0 {
        let total = Money::from_units(total, scale).ok_or(EngineError::AmountOutOfRange)?;
        tracing::error!(
            member_count = balances.len(),
            total = %total,
            "Settlement rejected due to imbalanced input"
        );
        return Err(EngineError::ImbalancedBalances { total });
    }

    Ok(UnitBalances { scale, entries })
}

impl UnitBalances {
    /// Appends a payment unless it would move nothing.
    pub fn push_payment(
        &self,
        payments: &mut Vec<Payment>,
        debtor: PersonId,
        creditor: PersonId,
        units: i128,
    ) -> Result<(), EngineError> {
        if units <= 0 {
            return Ok(());
        }
        debug_assert_ne!(debtor, creditor);
        let value = Money::from_units(units, self.scale).ok_or(EngineError::AmountOutOfRange)?;
        tracing::trace!(debtor = debtor.0, creditor = creditor.0, value = %value, "Payment");
        payments.push(Payment {
            debtor,
            creditor,
            value,
        });
        Ok(())
    }
}
