//! Trait seams between the pool core and its collaborators.
//!
//! The only seam is [`TokenLedger`]: the capability that actually moves
//! token units, which the core invokes but does not implement.

mod token_ledger;

pub use token_ledger::TokenLedger;
