//! Collection-oriented record storage.
//!
//! A collection is an ordered set of records of one type that is read
//! and replaced as a whole; there are no partial writes at the backend.
//! This crate provides:
//! - the [`Record`] and [`Collection`] traits
//! - [`MemoryCollection`], a volatile backend for tests and embedding
//! - [`JsonFileCollection`], one JSON array file per collection
//! - [`RecordTable`], the keyed repository layer running serialized
//!   read-modify-write cycles over a backend

pub mod collection;
pub mod error;
pub mod file;
pub mod memory;
pub mod record;
pub mod table;

pub use collection::Collection;
pub use error::{Result, StoreError};
pub use file::JsonFileCollection;
pub use memory::MemoryCollection;
pub use record::Record;
pub use table::RecordTable;
