use crate::{
    error::{EngineError, InvalidPurchaseReason},
    model::{Purchase, Split},
    services::MoneyContext,
};

/// One purchase split into atomic units of the money scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Shares {
    pub buyer_credit: i128,
    pub participant_debt: i128,
}

/// Even-split service for a single purchase.
#[derive(Clone, Copy, Debug, Default)]
pub struct SplitCalculator {
    context: MoneyContext,
}

impl SplitCalculator {
    pub fn new(context: MoneyContext) -> Self {
        Self { context }
    }

    pub(crate) fn context(&self) -> MoneyContext {
        self.context
    }

    /// Splits `purchase` evenly between the buyer and every participant.
    ///
    /// Each share is rounded down to the atomic unit. The leftover (under one unit per head) stays
    /// with the buyer's implicit share, so `buyer_credit` is exactly the sum of participant debts.
    pub fn split(&self, purchase: &Purchase) -> Result<Split, EngineError> {
        let shares = self.shares(purchase)?;
        Ok(Split {
            buyer_credit: self.context.from_units(shares.buyer_credit)?,
            participant_debt: self.context.from_units(shares.participant_debt)?,
        })
    }

    pub(crate) fn shares(&self, purchase: &Purchase) -> Result<Shares, EngineError> {
        purchase.validate()?;
        if !purchase.price().fits_scale(self.context.scale()) {
            return Err(EngineError::InvalidPurchase {
                purchase: purchase.id(),
                reason: InvalidPurchaseReason::PriceFinerThanScale {
                    scale: self.context.scale(),
                },
            });
        }

        let price = self.context.to_units(purchase.price())?;
        let participants =
            i128::try_from(purchase.participant_count()).map_err(|_| EngineError::AmountOutOfRange)?;
        // The price is positive, so integer division rounds toward zero.
        let participant_debt = price / (participants + 1);
        let buyer_credit = participant_debt
            .checked_mul(participants)
            .ok_or(EngineError::AmountOutOfRange)?;

        Ok(Shares {
            buyer_credit,
            participant_debt,
        })
    }
}
