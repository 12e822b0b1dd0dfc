//! Core entity definitions for the loyalty points ledger.
//!
//! This crate defines the rows persisted by the record store: ledger users,
//! registration log entries, and the fixed set of programs a visitor can
//! register under.

mod program;
mod registration;
mod user;

pub use program::*;
pub use registration::*;
pub use user::*;
