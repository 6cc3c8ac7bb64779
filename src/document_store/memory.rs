//! # In-Memory Document Store

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::filter::{matches_all, FilterExpr};
use super::{DocumentStore, Table};

/// Process-local document store, one map per table
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    tables: RwLock<HashMap<Table, HashMap<String, Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_object(document: &Value) -> StoreResult<()> {
        if document.is_object() {
            Ok(())
        } else {
            Err(StoreError::InvalidDocument(
                "document must be a JSON object".to_string(),
            ))
        }
    }
}

fn poisoned() -> StoreError {
    StoreError::Internal("Lock poisoned".to_string())
}

impl DocumentStore for MemoryDocumentStore {
    fn create(&self, table: Table, id: &str, document: Value) -> StoreResult<()> {
        Self::ensure_object(&document)?;

        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        let documents = tables.entry(table).or_default();
        if documents.contains_key(id) {
            return Err(StoreError::DocumentExists {
                table,
                id: id.to_string(),
            });
        }
        documents.insert(id.to_string(), document);
        Ok(())
    }

    fn get(&self, table: Table, id: &str) -> StoreResult<Option<Value>> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables.get(&table).and_then(|docs| docs.get(id)).cloned())
    }

    fn replace(&self, table: Table, id: &str, document: Value) -> StoreResult<()> {
        Self::ensure_object(&document)?;

        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        match tables.get_mut(&table).and_then(|docs| docs.get_mut(id)) {
            Some(existing) => {
                *existing = document;
                Ok(())
            }
            None => Err(StoreError::DocumentNotFound {
                table,
                id: id.to_string(),
            }),
        }
    }

    fn delete(&self, table: Table, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        Ok(tables
            .get_mut(&table)
            .map(|docs| docs.remove(id).is_some())
            .unwrap_or(false))
    }

    fn query(&self, table: Table, filters: &[FilterExpr]) -> StoreResult<Vec<Value>> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables
            .get(&table)
            .map(|docs| {
                docs.values()
                    .filter(|doc| matches_all(filters, doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_and_get() {
        let store = MemoryDocumentStore::new();
        store
            .create(Table::Calendar, "c1", json!({"id": "c1", "ownerId": "o1"}))
            .unwrap();

        let doc = store.get(Table::Calendar, "c1").unwrap().unwrap();
        assert_eq!(doc["ownerId"], "o1");

        // Tables are independent namespaces
        assert!(store.get(Table::Period, "c1").unwrap().is_none());
    }

    #[test]
    fn test_create_rejects_duplicate_id() {
        let store = MemoryDocumentStore::new();
        store.create(Table::Entity, "e1", json!({"id": "e1"})).unwrap();

        let result = store.create(Table::Entity, "e1", json!({"id": "e1"}));
        assert!(matches!(result, Err(StoreError::DocumentExists { .. })));
    }

    #[test]
    fn test_replace_requires_existing() {
        let store = MemoryDocumentStore::new();

        let result = store.replace(Table::Calendar, "missing", json!({"id": "missing"}));
        assert!(matches!(result, Err(StoreError::DocumentNotFound { .. })));

        store.create(Table::Calendar, "c1", json!({"id": "c1", "ownerId": "a"})).unwrap();
        store
            .replace(Table::Calendar, "c1", json!({"id": "c1", "ownerId": "b"}))
            .unwrap();
        assert_eq!(store.get(Table::Calendar, "c1").unwrap().unwrap()["ownerId"], "b");
    }

    #[test]
    fn test_delete() {
        let store = MemoryDocumentStore::new();
        store.create(Table::Reservation, "r1", json!({"id": "r1"})).unwrap();

        assert!(store.delete(Table::Reservation, "r1").unwrap());
        assert!(!store.delete(Table::Reservation, "r1").unwrap());
        assert!(store.get(Table::Reservation, "r1").unwrap().is_none());
    }

    #[test]
    fn test_query_filters() {
        let store = MemoryDocumentStore::new();
        for (id, period) in [("r1", "p1"), ("r2", "p1"), ("r3", "p2")] {
            store
                .create(Table::Reservation, id, json!({"id": id, "periodId": period}))
                .unwrap();
        }

        let hits = store
            .query(Table::Reservation, &[FilterExpr::eq("periodId", "p1")])
            .unwrap();
        assert_eq!(hits.len(), 2);

        let all = store.query(Table::Reservation, &[]).unwrap();
        assert_eq!(all.len(), 3);

        let none = store.query(Table::Period, &[]).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_rejects_non_object() {
        let store = MemoryDocumentStore::new();
        let result = store.create(Table::Entity, "e1", json!("scalar"));
        assert!(matches!(result, Err(StoreError::InvalidDocument(_))));
    }
}
