use std::collections::HashMap;

use tracing::debug;

use crate::{
    error::{Error, Result},
    sql::{
        executor::{Executor, ResultSet, filter::Filter},
        parser::ast::Consts,
        schema::Column,
        types::Value,
    },
    storage::{catalog::Catalog, engine::Storage},
};

/// INSERT executor
pub struct Insert {
    table_name: String,
    values: Vec<Consts>,
}

impl Insert {
    pub fn new(table_name: String, values: Vec<Consts>) -> Box<Self> {
        Box::new(Self { table_name, values })
    }
}

impl<S: Storage> Executor<S> for Insert {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let table = catalog
            .current_database_mut()?
            .must_get_table_mut(&self.table_name)?;

        // VALUES must list exactly one value per column
        if self.values.len() != table.columns().len() {
            return Err(Error::Syntax(format!(
                "table {} has {} columns but {} values were supplied",
                table.name,
                table.columns().len(),
                self.values.len()
            )));
        }

        let row = table
            .columns()
            .iter()
            .map(|c| c.name.clone())
            .zip(self.values.into_iter().map(Value::from))
            .collect::<HashMap<_, _>>();
        table.add_row(row)?;
        let table_name = table.name.clone();
        debug!(table = %table_name, "inserted row");

        catalog.save_current()?;
        Ok(ResultSet::Insert {
            table_name,
            count: 1,
        })
    }
}

/// UPDATE executor.
///
/// Every assignment is converted against its column before any row is
/// touched, so a bad value rejects the whole statement and leaves all rows
/// as they were.
pub struct Update {
    table_name: String,
    columns: Vec<(String, Consts)>,
    where_clause: Option<(String, Consts)>,
}

impl Update {
    pub fn new(
        table_name: String,
        columns: Vec<(String, Consts)>,
        where_clause: Option<(String, Consts)>,
    ) -> Box<Self> {
        Box::new(Self {
            table_name,
            columns,
            where_clause,
        })
    }
}

impl<S: Storage> Executor<S> for Update {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let table = catalog
            .current_database_mut()?
            .must_get_table_mut(&self.table_name)?;

        let mut assignments: Vec<(Column, Value)> = Vec::with_capacity(self.columns.len());
        for (col_name, value) in self.columns {
            let column = table.find_column(&col_name)?;
            if assignments.iter().any(|(c, _)| c.name == column.name) {
                return Err(Error::Validation(format!(
                    "column {} assigned more than once",
                    column.name
                )));
            }
            let value = column.convert(value.into())?;
            assignments.push((column.clone(), value));
        }
        let filter = Filter::build(table, self.where_clause)?;

        let mut count = 0;
        for row in table.rows_mut().iter_mut().filter(|row| filter.matches(row)) {
            // Assignments are applied in statement order
            for (column, value) in &assignments {
                row.set_converted(column, value.clone())?;
            }
            count += 1;
        }
        debug!(table = %self.table_name, count, "updated rows");

        if count > 0 {
            catalog.save_current()?;
        }
        Ok(ResultSet::Update { count })
    }
}

/// DELETE executor
pub struct Delete {
    table_name: String,
    where_clause: Option<(String, Consts)>,
}

impl Delete {
    pub fn new(table_name: String, where_clause: Option<(String, Consts)>) -> Box<Self> {
        Box::new(Self {
            table_name,
            where_clause,
        })
    }
}

impl<S: Storage> Executor<S> for Delete {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let table = catalog
            .current_database_mut()?
            .must_get_table_mut(&self.table_name)?;

        let filter = Filter::build(table, self.where_clause)?;
        let count = table.delete_rows(|row| filter.matches(row));
        debug!(table = %self.table_name, count, "deleted rows");

        if count > 0 {
            catalog.save_current()?;
        }
        Ok(ResultSet::Delete { count })
    }
}
