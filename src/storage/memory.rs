use std::collections::BTreeMap;

use tracing::warn;

use crate::{error::Result, sql::schema::Database, storage::engine::Storage};

/// In-memory storage: documents are kept as JSON text keyed by database name
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    documents: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw document as-is, whether or not it is valid
    pub fn insert_document(&mut self, name: &str, document: &str) {
        self.documents.insert(name.to_string(), document.to_string());
    }

    pub fn document(&self, name: &str) -> Option<&str> {
        self.documents.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn load_all(&mut self) -> Result<Vec<Database>> {
        let mut databases = Vec::new();
        for (name, document) in &self.documents {
            match serde_json::from_str::<Database>(document) {
                Ok(db) => databases.push(db),
                Err(err) => warn!(document = %name, %err, "skipping unreadable database document"),
            }
        }
        Ok(databases)
    }

    fn save(&mut self, db: &Database) -> Result<()> {
        let document = serde_json::to_string_pretty(db)?;
        self.documents.insert(db.name.clone(), document);
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        self.documents.remove(name);
        Ok(())
    }
}
