//! Persistence layer over the SQLite pool: country records plus the
//! single-row refresh metadata slot.

pub mod countries;
pub mod metadata;

pub use countries::{CountryFilter, CountryStore, SortKey};
pub use metadata::MetadataStore;
