use crate::{
    error::Result,
    sql::{
        executor::{Executor, ResultSet},
        parser::Parser,
    },
    storage::{catalog::Catalog, engine::Storage},
};

/// Interpreter session: the catalog plus the current selection.
///
/// Each session owns its own catalog, so several can coexist (one per data
/// directory or per in-memory storage).
pub struct Session<S: Storage> {
    catalog: Catalog<S>,
}

impl<S: Storage + 'static> Session<S> {
    /// Opens a session, loading every database the storage holds
    pub fn new(storage: S) -> Result<Self> {
        Ok(Self {
            catalog: Catalog::open(storage)?,
        })
    }

    /// Parses and executes one `;`-terminated statement
    pub fn execute(&mut self, sql: &str) -> Result<ResultSet> {
        let stmt = Parser::new(sql).parse()?;
        <dyn Executor<S>>::build(stmt).execute(&mut self.catalog)
    }

    /// Like [`Session::execute`], but blank and comment lines yield `None`
    pub fn execute_line(&mut self, line: &str) -> Result<Option<ResultSet>> {
        if Parser::is_ignorable(line) {
            return Ok(None);
        }
        self.execute(line).map(Some)
    }

    pub fn catalog(&self) -> &Catalog<S> {
        &self.catalog
    }

    /// Name of the selected database, if any
    pub fn current_database(&self) -> Option<&str> {
        self.catalog.current_name()
    }

    /// Saves every loaded database
    pub fn shutdown(mut self) -> Result<()> {
        self.catalog.flush_all()
    }
}
