use std::fmt;

use thiserror::Error;

use crate::model::{Money, PersonId, PurchaseId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidPurchaseReason {
    NonPositivePrice,
    BuyerIsParticipant,
    /// The price has more decimal places than the money scale allows.
    PriceFinerThanScale { scale: u32 },
}

impl fmt::Display for InvalidPurchaseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositivePrice => f.write_str("price must be greater than zero"),
            Self::BuyerIsParticipant => f.write_str("buyer is listed among the participants"),
            Self::PriceFinerThanScale { scale } => {
                write!(f, "price has more than {scale} decimal places")
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersonRole {
    Buyer,
    Participant,
}

impl fmt::Display for PersonRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buyer => f.write_str("buyer"),
            Self::Participant => f.write_str("participant"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("purchase {purchase} is invalid: {reason}")]
    InvalidPurchase {
        purchase: PurchaseId,
        reason: InvalidPurchaseReason,
    },
    #[error("purchase {purchase} references unknown {role} {person}")]
    UnknownPerson {
        purchase: PurchaseId,
        person: PersonId,
        role: PersonRole,
    },
    #[error("there is nobody to settle between")]
    NoParticipants,
    #[error("balances must sum to zero (found {total})")]
    ImbalancedBalances { total: Money },
    /// An amount, or a sum of amounts, cannot be held exactly at the money scale.
    #[error("amount is too large to be represented exactly")]
    AmountOutOfRange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("money scale {scale} is not supported (max {max_supported})")]
pub struct UnsupportedScale {
    pub scale: u32,
    pub max_supported: u32,
}
