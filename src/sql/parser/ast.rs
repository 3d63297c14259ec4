use crate::sql::types::{DataType, Value};

/// Abstract Syntax Tree (AST) node definitions, one variant per statement
#[derive(Debug, PartialEq)]
pub enum Statement {
    CreateDatabase {
        name: String,
    },
    CreateTable {
        name: String,
        columns: Vec<Column>,
    },
    DropDatabase {
        name: String,
    },
    DropTable {
        name: String,
    },
    Use {
        name: String,
    },
    ShowDatabases,
    ShowTables,
    /// INSERT INTO t VALUES (...): one value per table column, in column order
    Insert {
        table_name: String,
        values: Vec<Consts>,
    },
    Select {
        /// None means `*`
        columns: Option<Vec<String>>,
        table_name: String,
        where_clause: Option<(String, Consts)>,
    },
    /// UPDATE t SET a = x, b = y: assignments are kept in statement order
    Update {
        table_name: String,
        columns: Vec<(String, Consts)>,
        where_clause: Option<(String, Consts)>,
    },
    Delete {
        table_name: String,
        where_clause: Option<(String, Consts)>,
    },
    Help,
}

/// Column definition for CREATE TABLE statements
#[derive(Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub datatype: DataType,
}

/// Literal values as written in a statement.
///
/// Quoted and bare values are both kept as text; the target column decides
/// what they become.
#[derive(Debug, PartialEq, Clone)]
pub enum Consts {
    Null,
    String(String),
}

impl From<Consts> for Value {
    fn from(value: Consts) -> Self {
        match value {
            Consts::Null => Value::Null,
            Consts::String(s) => Value::String(s),
        }
    }
}
