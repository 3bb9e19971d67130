//! Domain events emitted by the reconciliation engine

mod ledger_event;

pub use ledger_event::{InviteCandidate, LedgerEvent};
