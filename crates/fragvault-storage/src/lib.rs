//! fragvault-storage: fragment store and catalog collaborators
//!
//! The engine only ever touches storage through the `FragmentStore` and
//! `Catalog` traits, so tests run against the deterministic in-memory
//! implementations in `memory` while production uses OpenDAL S3 and a
//! JSON-file catalog.

pub mod catalog;
pub mod memory;
pub mod operator;
pub mod store;

pub use catalog::{Catalog, JsonCatalog};
pub use memory::{FailingStore, MemoryCatalog, MemoryStore};
pub use operator::build_operator;
pub use store::{FragmentStore, OpendalStore};
