use crate::{error::Result, sql::schema::Database};

/// Abstract persistence interface: one document per database.
///
/// Every save is a full rewrite of that database's document; there is no
/// incremental append.
pub trait Storage {
    /// Loads every stored database. Documents that fail to parse are skipped.
    fn load_all(&mut self) -> Result<Vec<Database>>;
    /// Rewrites the document for `db`
    fn save(&mut self, db: &Database) -> Result<()>;
    /// Deletes the document for database `name`, if any
    fn remove(&mut self, name: &str) -> Result<()>;
}
