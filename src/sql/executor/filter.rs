use crate::{
    error::Result,
    sql::{
        parser::ast::Consts,
        schema::{Row, Table},
        types::Value,
    },
};

/// Single `column = value` predicate from a WHERE clause.
///
/// The value is converted with the column's type up front, so `id = "1"` and
/// `id = 1` match the same rows. NULL only matches NULL.
#[derive(Debug, Default)]
pub struct Filter {
    predicate: Option<(String, Value)>,
}

impl Filter {
    /// Resolves the WHERE column (ignoring case) and converts the value
    pub fn build(table: &Table, where_clause: Option<(String, Consts)>) -> Result<Self> {
        let predicate = match where_clause {
            Some((col_name, value)) => {
                let column = table.find_column(&col_name)?;
                Some((column.name.clone(), column.convert(value.into())?))
            }
            None => None,
        };
        Ok(Self { predicate })
    }

    pub fn matches(&self, row: &Row) -> bool {
        match &self.predicate {
            Some((col_name, value)) => row.get(col_name) == Some(value),
            None => true,
        }
    }
}
