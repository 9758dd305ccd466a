//! Fundamental domain value types used throughout the pool engine.
//!
//! Raw token amounts, share units, asset and owner identities, fee
//! rates, and the notifications emitted by committed operations. All
//! types are newtypes with validated constructors where a range applies.

mod account;
mod amount;
mod decimals;
mod event;
mod fee_rate;
mod rounding;
mod shares;
mod token;
mod token_address;

pub use account::AccountId;
pub use amount::Amount;
pub use decimals::{Decimals, NORMALIZED_DECIMALS};
pub use event::PoolEvent;
pub use fee_rate::{FeeRate, FEE_DENOMINATOR, MAX_SWAP_FEE};
pub use rounding::Rounding;
pub use shares::Shares;
pub use token::Token;
pub use token_address::TokenAddress;
