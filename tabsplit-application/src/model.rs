use tabsplit_domain::{Money, Payment, Person, PersonId, Purchase, PurchaseId};

/// Everything needed to persist and restore a ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerState {
    pub persons: Vec<Person>,
    pub purchases: Vec<Purchase>,
    pub next_person_id: u64,
    pub next_purchase_id: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParticipantSelection {
    /// Every current person except the buyer.
    Everyone,
    Only(Vec<PersonId>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPurchase {
    pub item: String,
    pub price: Money,
    pub buyer: PersonId,
    pub participants: ParticipantSelection,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonRemoval {
    pub person: Person,
    /// Purchases the person had paid for; they were deleted with them.
    pub removed_purchases: Vec<PurchaseId>,
    /// Purchases the person took part in; they no longer list them.
    pub updated_purchases: Vec<PurchaseId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonBalance {
    pub id: PersonId,
    pub balance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResult {
    pub balances: Vec<PersonBalance>,
    pub payments: Vec<Payment>,
}
