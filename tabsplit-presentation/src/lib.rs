#![warn(clippy::uninlined_format_args)]

pub mod ledger_presenter;
pub mod settlement_presenter;
pub mod text_table;

pub use ledger_presenter::LedgerPresenter;
pub use settlement_presenter::SettlementPresenter;
pub use text_table::{Alignment, TextTableBuilder};
