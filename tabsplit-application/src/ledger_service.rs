use tabsplit_domain::{MoneyContext, PersonId, Purchase, PurchaseId};

use crate::{
    error::LedgerError,
    id_policy::IdPolicy,
    ledger::Ledger,
    model::{NewPurchase, PersonRemoval},
    ports::LedgerStore,
};

/// Ledger operations backed by a store; the whole state is written back after every mutation.
pub struct LedgerService<S> {
    store: S,
    id_policy: IdPolicy,
    money: MoneyContext,
}

impl<S: LedgerStore> LedgerService<S> {
    pub fn new(store: S, id_policy: IdPolicy, money: MoneyContext) -> Self {
        Self {
            store,
            id_policy,
            money,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the stored ledger, or an empty one if nothing was saved yet.
    pub fn load(&self) -> Result<Ledger, LedgerError> {
        let ledger = match self.store.load()? {
            Some(state) => Ledger::from_state(state, self.id_policy, self.money),
            None => {
                tracing::debug!("No stored ledger, starting empty");
                Ledger::new(self.id_policy, self.money)
            }
        };
        Ok(ledger)
    }

    pub fn add_person(&self, name: &str) -> Result<PersonId, LedgerError> {
        self.mutate(|ledger| ledger.add_person(name))
    }

    pub fn remove_person(&self, id: PersonId) -> Result<PersonRemoval, LedgerError> {
        self.mutate(|ledger| ledger.remove_person(id))
    }

    pub fn add_purchase(&self, purchase: NewPurchase) -> Result<PurchaseId, LedgerError> {
        self.mutate(|ledger| ledger.add_purchase(purchase))
    }

    pub fn remove_purchase(&self, id: PurchaseId) -> Result<Purchase, LedgerError> {
        self.mutate(|ledger| ledger.remove_purchase(id))
    }

    fn mutate<T, F>(&self, operation: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Ledger) -> Result<T, LedgerError>,
    {
        let mut ledger = self.load()?;
        let output = operation(&mut ledger)?;
        self.store.save(&ledger.to_state())?;
        Ok(output)
    }
}
