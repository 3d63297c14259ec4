use crate::{
    error::Result,
    sql::{
        executor::{Executor, ResultSet, filter::Filter},
        parser::ast::Consts,
        types::Value,
    },
    storage::{catalog::Catalog, engine::Storage},
};

/// Table scan executor (SELECT).
///
/// Rows come back in table order; the projection follows the requested
/// column list, or the table definition for `*`.
pub struct Scan {
    table_name: String,
    columns: Option<Vec<String>>,
    filter: Option<(String, Consts)>,
}

impl Scan {
    pub fn new(
        table_name: String,
        columns: Option<Vec<String>>,
        filter: Option<(String, Consts)>,
    ) -> Box<Self> {
        Box::new(Self {
            table_name,
            columns,
            filter,
        })
    }
}

impl<S: Storage> Executor<S> for Scan {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let table = catalog
            .current_database()?
            .must_get_table(&self.table_name)?;

        let columns = match self.columns {
            Some(names) => names
                .iter()
                .map(|name| table.find_column(name).map(|c| c.name.clone()))
                .collect::<Result<Vec<_>>>()?,
            None => table.columns().iter().map(|c| c.name.clone()).collect(),
        };
        let filter = Filter::build(table, self.filter)?;

        let rows: Vec<Vec<Value>> = table
            .rows()
            .iter()
            .filter(|row| filter.matches(row))
            .map(|row| {
                columns
                    .iter()
                    .map(|name| row.get(name).cloned().unwrap_or(Value::Null))
                    .collect::<Vec<_>>()
            })
            .collect();

        Ok(ResultSet::Scan { columns, rows })
    }
}
