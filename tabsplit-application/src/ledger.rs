use indexmap::IndexSet;
use tabsplit_domain::{MoneyContext, Person, PersonId, Purchase, PurchaseId, SplitCalculator};

use crate::{
    error::LedgerError,
    id_policy::IdPolicy,
    model::{LedgerState, NewPurchase, ParticipantSelection, PersonRemoval},
    ports::PersonDirectory,
};

/// Authoritative person and purchase collections, both kept sorted by id.
#[derive(Clone, Debug)]
pub struct Ledger {
    persons: Vec<Person>,
    purchases: Vec<Purchase>,
    next_person_id: u64,
    next_purchase_id: u64,
    id_policy: IdPolicy,
    money: MoneyContext,
}

impl Ledger {
    pub fn new(id_policy: IdPolicy, money: MoneyContext) -> Self {
        Self::from_state(LedgerState::default(), id_policy, money)
    }

    pub fn from_state(state: LedgerState, id_policy: IdPolicy, money: MoneyContext) -> Self {
        let LedgerState {
            mut persons,
            mut purchases,
            next_person_id,
            next_purchase_id,
        } = state;
        persons.sort_by_key(|person| person.id);
        purchases.sort_by_key(Purchase::id);

        Self {
            persons,
            purchases,
            next_person_id,
            next_purchase_id,
            id_policy,
            money,
        }
    }

    pub fn to_state(&self) -> LedgerState {
        LedgerState {
            persons: self.persons.clone(),
            purchases: self.purchases.clone(),
            next_person_id: self.next_person_id,
            next_purchase_id: self.next_purchase_id,
        }
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons
            .binary_search_by_key(&id, |person| person.id)
            .ok()
            .map(|idx| &self.persons[idx])
    }

    pub fn purchase(&self, id: PurchaseId) -> Option<&Purchase> {
        self.purchases
            .binary_search_by_key(&id, Purchase::id)
            .ok()
            .map(|idx| &self.purchases[idx])
    }

    pub fn money(&self) -> MoneyContext {
        self.money
    }

    pub fn add_person(&mut self, name: &str) -> Result<PersonId, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }

        let id = self.id_policy.next_id(
            self.persons.iter().map(|person| person.id.0),
            self.next_person_id,
        );
        self.next_person_id = self.next_person_id.max(id + 1);

        let id = PersonId(id);
        let idx = self.persons.partition_point(|person| person.id < id);
        self.persons.insert(idx, Person::new(id, name));

        tracing::info!(person = id.0, name, "Added person");
        Ok(id)
    }

    /// Removes a person together with every purchase they paid for, and drops them from the
    /// participants of the rest.
    pub fn remove_person(&mut self, id: PersonId) -> Result<PersonRemoval, LedgerError> {
        let idx = self
            .persons
            .binary_search_by_key(&id, |person| person.id)
            .map_err(|_| LedgerError::PersonNotFound(id))?;
        let person = self.persons.remove(idx);

        let mut removed_purchases = Vec::new();
        let mut updated_purchases = Vec::new();
        let mut kept = Vec::with_capacity(self.purchases.len());
        for purchase in self.purchases.drain(..) {
            if purchase.buyer() == id {
                removed_purchases.push(purchase.id());
            } else if purchase.involves(id) {
                updated_purchases.push(purchase.id());
                kept.push(purchase.without_participant(id));
            } else {
                kept.push(purchase);
            }
        }
        self.purchases = kept;

        tracing::info!(
            person = id.0,
            removed_purchases = removed_purchases.len(),
            updated_purchases = updated_purchases.len(),
            "Removed person"
        );

        Ok(PersonRemoval {
            person,
            removed_purchases,
            updated_purchases,
        })
    }

    pub fn add_purchase(&mut self, new_purchase: NewPurchase) -> Result<PurchaseId, LedgerError> {
        let NewPurchase {
            item,
            price,
            buyer,
            participants,
        } = new_purchase;

        let item = item.trim();
        if item.is_empty() {
            return Err(LedgerError::EmptyItem);
        }
        if self.person(buyer).is_none() {
            return Err(LedgerError::PersonNotFound(buyer));
        }

        let participants: IndexSet<PersonId> = match participants {
            ParticipantSelection::Everyone => self.persons.iter().map(|p| p.id).collect(),
            ParticipantSelection::Only(ids) => {
                if let Some(&missing) = ids.iter().find(|&&id| self.person(id).is_none()) {
                    return Err(LedgerError::PersonNotFound(missing));
                }
                ids.into_iter().collect()
            }
        };

        let id = PurchaseId(self.id_policy.next_id(
            self.purchases.iter().map(|purchase| purchase.id().0),
            self.next_purchase_id,
        ));

        let purchase = Purchase::try_new(
            id,
            item,
            price,
            buyer,
            participants.into_iter().filter(|&person| person != buyer),
        )?;
        // A purchase that cannot be split at the money scale would break every later split.
        SplitCalculator::new(self.money).split(&purchase)?;

        self.next_purchase_id = self.next_purchase_id.max(id.0 + 1);
        let idx = self.purchases.partition_point(|existing| existing.id() < id);
        self.purchases.insert(idx, purchase);

        tracing::info!(purchase = id.0, item, %price, buyer = buyer.0, "Added purchase");
        Ok(id)
    }

    pub fn remove_purchase(&mut self, id: PurchaseId) -> Result<Purchase, LedgerError> {
        let idx = self
            .purchases
            .binary_search_by_key(&id, Purchase::id)
            .map_err(|_| LedgerError::PurchaseNotFound(id))?;

        tracing::info!(purchase = id.0, "Removed purchase");
        Ok(self.purchases.remove(idx))
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(IdPolicy::default(), MoneyContext::default())
    }
}

impl PersonDirectory for Ledger {
    fn display_name(&self, person: PersonId) -> Option<&str> {
        self.person(person).map(|person| person.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tabsplit_domain::{EngineError, InvalidPurchaseReason, Money};

    #[fixture]
    fn ledger() -> Ledger {
        let mut ledger = Ledger::default();
        for name in ["Ana", "Bruno", "Carla"] {
            ledger.add_person(name).expect("valid name");
        }
        ledger
    }

    fn new_purchase(price: &str, buyer: u64, participants: ParticipantSelection) -> NewPurchase {
        NewPurchase {
            item: "pizza".to_string(),
            price: price.parse().expect("decimal literal"),
            buyer: PersonId(buyer),
            participants,
        }
    }

    fn participant_ids(purchase: &Purchase) -> Vec<u64> {
        purchase.participants().map(|p| p.0).collect()
    }

    #[rstest]
    fn assigns_sequential_ids(ledger: Ledger) {
        let ids: Vec<u64> = ledger.persons().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("   ")]
    fn rejects_blank_names(mut ledger: Ledger, #[case] name: &str) {
        assert!(matches!(ledger.add_person(name), Err(LedgerError::EmptyName)));
    }

    #[rstest]
    fn trims_names(mut ledger: Ledger) {
        let id = ledger.add_person("  Davi ").expect("valid name");
        assert_eq!(ledger.display_name(id), Some("Davi"));
    }

    #[rstest]
    fn monotonic_policy_never_reuses_ids(mut ledger: Ledger) {
        ledger.remove_person(PersonId(2)).expect("person exists");
        let id = ledger.add_person("Davi").expect("valid name");
        assert_eq!(id, PersonId(4));
    }

    #[test]
    fn fill_gap_policy_reuses_lowest_free_id() {
        let mut ledger = Ledger::new(IdPolicy::FillLowestGap, MoneyContext::cents());
        for name in ["Ana", "Bruno", "Carla"] {
            ledger.add_person(name).expect("valid name");
        }
        ledger.remove_person(PersonId(2)).expect("person exists");

        let id = ledger.add_person("Davi").expect("valid name");

        assert_eq!(id, PersonId(2));
        let ids: Vec<u64> = ledger.persons().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[rstest]
    fn everyone_selection_excludes_buyer(mut ledger: Ledger) {
        let id = ledger
            .add_purchase(new_purchase("30", 2, ParticipantSelection::Everyone))
            .expect("valid purchase");

        let purchase = ledger.purchase(id).expect("stored purchase");
        assert_eq!(participant_ids(purchase), vec![1, 3]);
    }

    #[rstest]
    fn explicit_selection_drops_buyer_and_duplicates(mut ledger: Ledger) {
        let id = ledger
            .add_purchase(new_purchase(
                "30",
                1,
                ParticipantSelection::Only(vec![PersonId(3), PersonId(1), PersonId(3)]),
            ))
            .expect("valid purchase");

        let purchase = ledger.purchase(id).expect("stored purchase");
        assert_eq!(participant_ids(purchase), vec![3]);
        assert_eq!(purchase.item(), "pizza");
    }

    #[rstest]
    #[case::zero_price("0", InvalidPurchaseReason::NonPositivePrice)]
    #[case::negative_price("-1", InvalidPurchaseReason::NonPositivePrice)]
    #[case::sub_cent("1.001", InvalidPurchaseReason::PriceFinerThanScale { scale: 2 })]
    fn rejects_bad_prices(
        mut ledger: Ledger,
        #[case] price: &str,
        #[case] expected: InvalidPurchaseReason,
    ) {
        let result = ledger.add_purchase(new_purchase(price, 1, ParticipantSelection::Everyone));

        assert!(matches!(
            result,
            Err(LedgerError::Engine(EngineError::InvalidPurchase { reason, .. })) if reason == expected
        ));
        assert!(ledger.purchases().is_empty());
    }

    #[rstest]
    fn rejects_price_beyond_money_range(mut ledger: Ledger) {
        let result = ledger.add_purchase(new_purchase(
            "79228162514264337593543950335",
            1,
            ParticipantSelection::Only(vec![PersonId(2)]),
        ));

        assert!(matches!(
            result,
            Err(LedgerError::Engine(EngineError::AmountOutOfRange))
        ));
        assert!(ledger.purchases().is_empty());
    }

    #[rstest]
    fn rejects_unknown_people(mut ledger: Ledger) {
        let unknown_buyer = ledger.add_purchase(new_purchase(
            "10",
            9,
            ParticipantSelection::Everyone,
        ));
        assert!(matches!(
            unknown_buyer,
            Err(LedgerError::PersonNotFound(PersonId(9)))
        ));

        let unknown_participant = ledger.add_purchase(new_purchase(
            "10",
            1,
            ParticipantSelection::Only(vec![PersonId(2), PersonId(7)]),
        ));
        assert!(matches!(
            unknown_participant,
            Err(LedgerError::PersonNotFound(PersonId(7)))
        ));
    }

    #[rstest]
    fn rejects_blank_item(mut ledger: Ledger) {
        let mut purchase = new_purchase("10", 1, ParticipantSelection::Everyone);
        purchase.item = " ".to_string();

        assert!(matches!(
            ledger.add_purchase(purchase),
            Err(LedgerError::EmptyItem)
        ));
    }

    #[rstest]
    fn removing_a_person_cascades_to_purchases(mut ledger: Ledger) {
        let bought = ledger
            .add_purchase(new_purchase("30", 2, ParticipantSelection::Everyone))
            .expect("valid purchase");
        let shared = ledger
            .add_purchase(new_purchase("20", 1, ParticipantSelection::Everyone))
            .expect("valid purchase");
        let untouched = ledger
            .add_purchase(new_purchase(
                "5",
                1,
                ParticipantSelection::Only(vec![PersonId(3)]),
            ))
            .expect("valid purchase");

        let removal = ledger.remove_person(PersonId(2)).expect("person exists");

        assert_eq!(removal.person.name, "Bruno");
        assert_eq!(removal.removed_purchases, vec![bought]);
        assert_eq!(removal.updated_purchases, vec![shared]);
        assert!(ledger.purchase(bought).is_none());
        assert_eq!(
            participant_ids(ledger.purchase(shared).expect("kept")),
            vec![3]
        );
        assert_eq!(
            participant_ids(ledger.purchase(untouched).expect("kept")),
            vec![3]
        );
        assert!(ledger.person(PersonId(2)).is_none());
    }

    #[rstest]
    fn removing_unknown_entries_fails(mut ledger: Ledger) {
        assert!(matches!(
            ledger.remove_person(PersonId(42)),
            Err(LedgerError::PersonNotFound(PersonId(42)))
        ));
        assert!(matches!(
            ledger.remove_purchase(PurchaseId(1)),
            Err(LedgerError::PurchaseNotFound(PurchaseId(1)))
        ));
    }

    #[rstest]
    fn state_round_trip_keeps_counters(mut ledger: Ledger) {
        ledger
            .add_purchase(new_purchase("12.50", 1, ParticipantSelection::Everyone))
            .expect("valid purchase");
        ledger.remove_purchase(PurchaseId(1)).expect("exists");

        let mut restored = Ledger::from_state(
            ledger.to_state(),
            IdPolicy::Monotonic,
            MoneyContext::cents(),
        );
        let id = restored
            .add_purchase(new_purchase("3", 1, ParticipantSelection::Everyone))
            .expect("valid purchase");

        assert_eq!(id, PurchaseId(2));
        assert_eq!(restored.persons(), ledger.persons());
        assert_eq!(
            restored.purchase(id).map(|p| p.price()),
            Some(Money::from_i64(3))
        );
    }
}
