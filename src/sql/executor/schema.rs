use tracing::info;

use crate::{
    error::Result,
    sql::{
        executor::{Executor, ResultSet},
        parser::ast,
        schema::Column,
    },
    storage::{catalog::Catalog, engine::Storage},
};

/// CREATE DATABASE executor
pub struct CreateDatabase {
    name: String,
}

impl CreateDatabase {
    pub fn new(name: String) -> Box<Self> {
        Box::new(Self { name })
    }
}

impl<S: Storage> Executor<S> for CreateDatabase {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        catalog.create_database(&self.name)?;
        Ok(ResultSet::CreateDatabase {
            name: self.name.trim().to_string(),
        })
    }
}

/// DROP DATABASE executor
pub struct DropDatabase {
    name: String,
}

impl DropDatabase {
    pub fn new(name: String) -> Box<Self> {
        Box::new(Self { name })
    }
}

impl<S: Storage> Executor<S> for DropDatabase {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        catalog.drop_database(&self.name)?;
        Ok(ResultSet::DropDatabase { name: self.name })
    }
}

/// USE executor, only changes the selection
pub struct UseDatabase {
    name: String,
}

impl UseDatabase {
    pub fn new(name: String) -> Box<Self> {
        Box::new(Self { name })
    }
}

impl<S: Storage> Executor<S> for UseDatabase {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        catalog.use_database(&self.name)?;
        Ok(ResultSet::UseDatabase { name: self.name })
    }
}

pub struct ShowDatabases;

impl ShowDatabases {
    pub fn new() -> Box<Self> {
        Box::new(Self)
    }
}

impl<S: Storage> Executor<S> for ShowDatabases {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        Ok(ResultSet::ShowDatabases {
            names: catalog.database_names().into_iter().map(String::from).collect(),
        })
    }
}

/// CREATE TABLE executor, needs a selected database
pub struct CreateTable {
    name: String,
    columns: Vec<ast::Column>,
}

impl CreateTable {
    pub fn new(name: String, columns: Vec<ast::Column>) -> Box<Self> {
        Box::new(Self { name, columns })
    }
}

impl<S: Storage> Executor<S> for CreateTable {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(&c.name, c.datatype))
            .collect::<Result<Vec<_>>>()?;

        let db = catalog.current_database_mut()?;
        db.create_table(&self.name, columns)?;
        let database = db.name.clone();
        info!(table = %self.name, %database, "created table");

        catalog.save_current()?;
        Ok(ResultSet::CreateTable {
            table_name: self.name,
            database,
        })
    }
}

/// DROP TABLE executor. Tables live inside their database's document,
/// so dropping one is a rewrite of that document.
pub struct DropTable {
    name: String,
}

impl DropTable {
    pub fn new(name: String) -> Box<Self> {
        Box::new(Self { name })
    }
}

impl<S: Storage> Executor<S> for DropTable {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let db = catalog.current_database_mut()?;
        let table = db.drop_table(&self.name)?;
        let database = db.name.clone();
        info!(table = %table.name, %database, "dropped table");

        catalog.save_current()?;
        Ok(ResultSet::DropTable {
            table_name: table.name,
            database,
        })
    }
}

pub struct ShowTables;

impl ShowTables {
    pub fn new() -> Box<Self> {
        Box::new(Self)
    }
}

impl<S: Storage> Executor<S> for ShowTables {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let db = catalog.current_database()?;
        Ok(ResultSet::ShowTables {
            database: db.name.clone(),
            names: db.table_names().into_iter().map(String::from).collect(),
        })
    }
}

pub struct Help;

impl Help {
    pub fn new() -> Box<Self> {
        Box::new(Self)
    }
}

impl<S: Storage> Executor<S> for Help {
    fn execute(self: Box<Self>, _catalog: &mut Catalog<S>) -> Result<ResultSet> {
        Ok(ResultSet::Help)
    }
}
