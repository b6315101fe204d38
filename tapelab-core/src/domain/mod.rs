//! Domain types for daily trading records.

pub mod record;

pub use record::{CleanRecord, RawRecord, NANOS_PER_SEC};
