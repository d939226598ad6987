use crate::{
    error::{EngineError, UnsupportedScale},
    model::Money,
};

// A `Decimal` holds 96 bits of mantissa. At 12 places that still leaves about 7.9e16 whole units
// for balances and cascaded pools.
const MAX_MONEY_SCALE: u32 = 12;

/// Fixed-point precision of every amount the engine produces.
///
/// Amounts are whole multiples of the atomic unit `10^-scale` (one cent for scale 2). Arithmetic
/// runs on `i128` unit counts, so sums are exact or fail with [`EngineError::AmountOutOfRange`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoneyContext {
    scale: u32,
}

impl MoneyContext {
    pub fn try_new(scale: u32) -> Result<Self, UnsupportedScale> {
        if scale > MAX_MONEY_SCALE {
            return Err(UnsupportedScale {
                scale,
                max_supported: MAX_MONEY_SCALE,
            });
        }
        Ok(Self { scale })
    }

    /// Two decimal places.
    pub fn cents() -> Self {
        Self { scale: 2 }
    }

    pub fn scale(self) -> u32 {
        self.scale
    }

    pub fn to_units(self, amount: Money) -> Result<i128, EngineError> {
        amount
            .to_units(self.scale)
            .ok_or(EngineError::AmountOutOfRange)
    }

    pub fn from_units(self, units: i128) -> Result<Money, EngineError> {
        Money::from_units(units, self.scale).ok_or(EngineError::AmountOutOfRange)
    }
}

impl Default for MoneyContext {
    fn default() -> Self {
        Self::cents()
    }
}
