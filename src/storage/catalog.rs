use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::{
    error::{Error, Result},
    sql::schema::Database,
    storage::engine::Storage,
};

/// Catalog of loaded databases plus the currently selected one.
///
/// All mutation goes through `&mut self`, so structural changes (create, drop,
/// save) are already exclusive. A host that shares one catalog between
/// threads wraps the owning session in a `Mutex`.
pub struct Catalog<S: Storage> {
    storage: S,
    databases: BTreeMap<String, Database>,
    current: Option<String>,
}

impl<S: Storage> Catalog<S> {
    /// Loads every database the storage holds
    pub fn open(mut storage: S) -> Result<Self> {
        let mut databases = BTreeMap::new();
        for db in storage.load_all()? {
            if databases.contains_key(&db.name) {
                warn!(database = %db.name, "duplicate database document ignored");
                continue;
            }
            info!(database = %db.name, "loaded database");
            databases.insert(db.name.clone(), db);
        }
        Ok(Self {
            storage,
            databases,
            current: None,
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Creates an empty database and persists it right away
    pub fn create_database(&mut self, name: &str) -> Result<()> {
        let db = Database::new(name)?;
        validate_file_stem(&db.name)?;
        if self.databases.contains_key(&db.name) {
            return Err(Error::Validation(format!(
                "database {} already exists",
                db.name
            )));
        }
        let name = db.name.clone();
        self.databases.insert(name.clone(), db);
        info!(database = %name, "created database");
        self.save(&name)
    }

    /// Removes a database and its document; clears the selection if it was selected
    pub fn drop_database(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if self.databases.remove(name).is_none() {
            return Err(not_found(name));
        }
        if self.current.as_deref() == Some(name) {
            self.current = None;
        }
        info!(database = %name, "dropped database");
        self.storage.remove(name)
    }

    pub fn use_database(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if !self.databases.contains_key(name) {
            return Err(not_found(name));
        }
        self.current = Some(name.to_string());
        Ok(())
    }

    /// Database names, sorted
    pub fn database_names(&self) -> Vec<&str> {
        self.databases.keys().map(String::as_str).collect()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Returns the selected database, or an error if none is selected
    pub fn current_database(&self) -> Result<&Database> {
        self.current
            .as_ref()
            .and_then(|name| self.databases.get(name))
            .ok_or_else(no_selection)
    }

    pub fn current_database_mut(&mut self) -> Result<&mut Database> {
        self.current
            .as_ref()
            .and_then(|name| self.databases.get_mut(name))
            .ok_or_else(no_selection)
    }

    /// Rewrites the document of the selected database
    pub fn save_current(&mut self) -> Result<()> {
        let name = self.current.clone().ok_or_else(no_selection)?;
        self.save(&name)
    }

    pub fn save(&mut self, name: &str) -> Result<()> {
        let db = self.databases.get(name).ok_or_else(|| not_found(name))?;
        self.storage.save(db)
    }

    /// Saves every loaded database, carrying on past failures.
    /// Returns the last failure, if any.
    pub fn flush_all(&mut self) -> Result<()> {
        let mut result = Ok(());
        for db in self.databases.values() {
            match self.storage.save(db) {
                Ok(()) => info!(database = %db.name, "saved database"),
                Err(err) => {
                    warn!(database = %db.name, %err, "failed to save database");
                    result = Err(err);
                }
            }
        }
        result
    }
}

/// The name becomes a file stem inside the data directory
fn validate_file_stem(name: &str) -> Result<()> {
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(Error::Validation(format!("invalid database name {}", name)));
    }
    Ok(())
}

fn not_found(name: &str) -> Error {
    Error::Validation(format!("database {} does not exist", name))
}

fn no_selection() -> Error {
    Error::Validation("no database selected, use 'USE <database_name>;' first".to_string())
}
