use std::{fmt, str::FromStr};

use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;

use crate::error::{EngineError, InvalidPurchaseReason};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PurchaseId(pub u64);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for PurchaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Net position per person, in the enumeration order of the persons snapshot.
///
/// The order matters: settlement strategies break ties between equal balances by it.
pub type PersonBalances = IndexMap<PersonId, Money>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
}

impl Person {
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A shared purchase. The buyer's own share is implicit and never listed among the participants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Purchase {
    id: PurchaseId,
    item: String,
    price: Money,
    buyer: PersonId,
    participants: IndexSet<PersonId>,
}

impl Purchase {
    pub fn try_new<I>(
        id: PurchaseId,
        item: impl Into<String>,
        price: Money,
        buyer: PersonId,
        participants: I,
    ) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = PersonId>,
    {
        let purchase = Self {
            id,
            item: item.into(),
            price,
            buyer,
            participants: participants.into_iter().collect(),
        };
        purchase.validate()?;
        Ok(purchase)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let reason = if !self.price.is_positive() {
            InvalidPurchaseReason::NonPositivePrice
        } else if self.participants.contains(&self.buyer) {
            InvalidPurchaseReason::BuyerIsParticipant
        } else {
            return Ok(());
        };

        Err(EngineError::InvalidPurchase {
            purchase: self.id,
            reason,
        })
    }

    pub fn id(&self) -> PurchaseId {
        self.id
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn buyer(&self) -> PersonId {
        self.buyer
    }

    pub fn participants(&self) -> impl ExactSizeIterator<Item = PersonId> + '_ {
        self.participants.iter().copied()
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn involves(&self, person: PersonId) -> bool {
        self.buyer == person || self.participants.contains(&person)
    }

    /// Returns a copy without `person` among the participants.
    pub fn without_participant(&self, person: PersonId) -> Self {
        let mut purchase = self.clone();
        purchase.participants.shift_remove(&person);
        purchase
    }
}

/// Result of splitting one purchase evenly between its buyer and participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Split {
    /// Owed back to the buyer: every participant's share combined.
    pub buyer_credit: Money,
    /// Owed by each participant.
    pub participant_debt: Money,
}

/// Instruction for `debtor` to transfer `value` to `creditor`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payment {
    pub debtor: PersonId,
    pub creditor: PersonId,
    pub value: Money,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Whether the amount is a whole number of `10^-scale` units.
    pub fn fits_scale(self, scale: u32) -> bool {
        self.0.normalize().scale() <= scale
    }

    /// The amount as a count of `10^-scale` units.
    ///
    /// `None` when the amount is finer than `scale` or the count does not fit in an `i128`.
    pub fn to_units(self, scale: u32) -> Option<i128> {
        let value = if self.0.scale() > scale {
            self.0.normalize()
        } else {
            self.0
        };
        let shift = scale.checked_sub(value.scale())?;
        value.mantissa().checked_mul(10_i128.checked_pow(shift)?)
    }

    /// Inverse of [`Money::to_units`]; `None` when the result exceeds what a `Decimal` holds.
    pub fn from_units(units: i128, scale: u32) -> Option<Self> {
        Decimal::try_from_i128_with_scale(units, scale).ok().map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str_exact(s.trim()).map(Self)
    }
}
