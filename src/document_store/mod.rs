//! # Document Store
//!
//! Keyed JSON document access grouped by table: create, point-read,
//! replace, delete and equality queries. Writes are last-write-wins;
//! there are no transactions spanning calls.

mod errors;
mod filter;
mod memory;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use errors::{StoreError, StoreResult};
pub use filter::{matches_all, FilterExpr};
pub use memory::MemoryDocumentStore;

/// Tables known to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Entity,
    Calendar,
    Period,
    Reservation,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Entity => "entity",
            Table::Calendar => "calendar",
            Table::Period => "period",
            Table::Reservation => "reservation",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed record living in one table
pub trait StoredDocument: Serialize + DeserializeOwned + Send + Sync {
    const TABLE: Table;
}

/// Backend trait for document storage
pub trait DocumentStore: Send + Sync + fmt::Debug {
    /// Insert a new document, failing if the id is taken
    fn create(&self, table: Table, id: &str, document: Value) -> StoreResult<()>;

    /// Point read by id
    fn get(&self, table: Table, id: &str) -> StoreResult<Option<Value>>;

    /// Replace an existing document, failing if the id is absent
    fn replace(&self, table: Table, id: &str, document: Value) -> StoreResult<()>;

    /// Delete by id. Returns whether a document was removed.
    fn delete(&self, table: Table, id: &str) -> StoreResult<bool>;

    /// All documents in `table` matching every filter, in unspecified order
    fn query(&self, table: Table, filters: &[FilterExpr]) -> StoreResult<Vec<Value>>;
}
