use std::collections::HashMap;

use tabsplit_domain::PersonId;

use crate::{error::StoreError, model::LedgerState};

/// Key-value persistence of the whole ledger.
pub trait LedgerStore: Send + Sync {
    /// Returns `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<LedgerState>, StoreError>;

    fn save(&self, state: &LedgerState) -> Result<(), StoreError>;
}

pub trait PersonDirectory: Send + Sync {
    fn display_name(&self, person: PersonId) -> Option<&str>;
}

impl PersonDirectory for HashMap<PersonId, String> {
    fn display_name(&self, person: PersonId) -> Option<&str> {
        self.get(&person).map(String::as_str)
    }
}
