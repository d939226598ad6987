#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod id_policy;
pub mod ledger;
pub mod ledger_service;
pub mod model;
pub mod ports;
pub mod split_processor;

pub use error::{LedgerError, StoreError};
pub use id_policy::{IdPolicy, UnknownIdPolicy};
pub use ledger::Ledger;
pub use ledger_service::LedgerService;
pub use model::{
    LedgerState, NewPurchase, ParticipantSelection, PersonBalance, PersonRemoval, SplitResult,
};
pub use ports::{LedgerStore, PersonDirectory};
pub use split_processor::SplitProcessor;
