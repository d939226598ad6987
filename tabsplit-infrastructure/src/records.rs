//! On-disk shapes of the stored keys.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tabsplit_domain::{EngineError, Money, Person, PersonId, Purchase, PurchaseId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct PersonRecord {
    pub id: u64,
    pub name: String,
}

/// A person reference inside a purchase.
///
/// Written as a bare id. Older data embedded the whole person object, which is still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum PersonRef {
    Id(u64),
    Embedded { id: u64 },
}

impl PersonRef {
    fn id(self) -> PersonId {
        match self {
            Self::Id(id) | Self::Embedded { id } => PersonId(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct PurchaseRecord {
    pub id: u64,
    pub item: String,
    pub price: Decimal,
    pub buyer: PersonRef,
    #[serde(default)]
    pub participants: Vec<PersonRef>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CountersRecord {
    #[serde(default)]
    pub next_person_id: u64,
    #[serde(default)]
    pub next_purchase_id: u64,
}

impl From<&Person> for PersonRecord {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id.0,
            name: person.name.clone(),
        }
    }
}

impl From<PersonRecord> for Person {
    fn from(record: PersonRecord) -> Self {
        Person::new(PersonId(record.id), record.name)
    }
}

impl From<&Purchase> for PurchaseRecord {
    fn from(purchase: &Purchase) -> Self {
        Self {
            id: purchase.id().0,
            item: purchase.item().to_string(),
            price: purchase.price().as_decimal(),
            buyer: PersonRef::Id(purchase.buyer().0),
            participants: purchase
                .participants()
                .map(|person| PersonRef::Id(person.0))
                .collect(),
        }
    }
}

impl TryFrom<PurchaseRecord> for Purchase {
    type Error = EngineError;

    fn try_from(record: PurchaseRecord) -> Result<Self, Self::Error> {
        Purchase::try_new(
            PurchaseId(record.id),
            record.item,
            Money::from_decimal(record.price),
            record.buyer.id(),
            record.participants.into_iter().map(PersonRef::id),
        )
    }
}
