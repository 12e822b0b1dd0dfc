//! Ledger and registration log storage.
//!
//! Both collections live in flat CSV files that are read in full and
//! rewritten in full on every mutation. The [`RecordStore`] trait abstracts
//! over the on-disk implementation and an in-memory one used in tests.

mod csv_store;
mod error;
mod memory;
pub mod table;
mod traits;

pub use csv_store::*;
pub use error::*;
pub use memory::*;
pub use traits::*;
