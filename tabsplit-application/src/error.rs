use std::{io, path::PathBuf};

use tabsplit_domain::{EngineError, PersonId, PurchaseId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("stored '{key}' is corrupt: {detail}")]
    Corrupt { key: &'static str, detail: String },
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("person name must not be empty")]
    EmptyName,
    #[error("purchase item must not be empty")]
    EmptyItem,
    #[error("no person with id {0}")]
    PersonNotFound(PersonId),
    #[error("no purchase with id {0}")]
    PurchaseNotFound(PurchaseId),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
