use std::fmt::Display;

use crate::{
    error::Result,
    sql::{
        executor::{
            mutation::{Delete, Insert, Update},
            query::Scan,
            schema::{
                CreateDatabase, CreateTable, DropDatabase, DropTable, Help, ShowDatabases,
                ShowTables, UseDatabase,
            },
        },
        parser::ast::Statement,
        types::Value,
    },
    storage::{catalog::Catalog, engine::Storage},
};

mod filter;
mod mutation;
mod query;
mod schema;

/// Statement executor trait
pub trait Executor<S: Storage> {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet>;
}

/// Builds an executor from a parsed statement
impl<S: Storage + 'static> dyn Executor<S> {
    pub fn build(stmt: Statement) -> Box<dyn Executor<S>> {
        match stmt {
            Statement::CreateDatabase { name } => CreateDatabase::new(name),
            Statement::DropDatabase { name } => DropDatabase::new(name),
            Statement::Use { name } => UseDatabase::new(name),
            Statement::ShowDatabases => ShowDatabases::new(),
            Statement::CreateTable { name, columns } => CreateTable::new(name, columns),
            Statement::DropTable { name } => DropTable::new(name),
            Statement::ShowTables => ShowTables::new(),
            Statement::Insert { table_name, values } => Insert::new(table_name, values),
            Statement::Select {
                columns,
                table_name,
                where_clause,
            } => Scan::new(table_name, columns, where_clause),
            Statement::Update {
                table_name,
                columns,
                where_clause,
            } => Update::new(table_name, columns, where_clause),
            Statement::Delete {
                table_name,
                where_clause,
            } => Delete::new(table_name, where_clause),
            Statement::Help => Help::new(),
        }
    }
}

/// Execution result set
#[derive(Debug, PartialEq)]
pub enum ResultSet {
    CreateDatabase { name: String },
    DropDatabase { name: String },
    UseDatabase { name: String },
    ShowDatabases { names: Vec<String> },
    CreateTable { table_name: String, database: String },
    DropTable { table_name: String, database: String },
    ShowTables { database: String, names: Vec<String> },
    Insert { table_name: String, count: usize },
    Scan { columns: Vec<String>, rows: Vec<Vec<Value>> },
    Update { count: usize },
    Delete { count: usize },
    Help,
}

const HELP_TEXT: &str = "\
Available commands (each statement on one line, ending with ';'):
  Database management:
    CREATE DATABASE <name>;
    DROP DATABASE <name>;
    USE <name>;
    SHOW DATABASES;
  Table management:
    CREATE TABLE <name> (<col> <type>, ...);
      supported types: INTEGER, DOUBLE, STRING, BOOLEAN
    DROP TABLE <name>;
    SHOW TABLES;
  Data manipulation:
    INSERT INTO <table> VALUES (<value>, ...);
      one value per column in table order; quote strings with \"...\", NULL for no value
    SELECT * | <col>, ... FROM <table> [WHERE <col> = <value>];
    UPDATE <table> SET <col> = <value>, ... [WHERE <col> = <value>];
    DELETE FROM <table> [WHERE <col> = <value>];
  Utility:
    HELP;
    EXIT; or QUIT;";

fn plural(count: usize) -> &'static str {
    if count == 1 { "row" } else { "rows" }
}

impl Display for ResultSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultSet::CreateDatabase { name } => write!(f, "Database '{}' created.", name),
            ResultSet::DropDatabase { name } => write!(f, "Database '{}' dropped.", name),
            ResultSet::UseDatabase { name } => write!(f, "Now using database '{}'.", name),
            ResultSet::ShowDatabases { names } if names.is_empty() => {
                write!(f, "No databases found.")
            }
            ResultSet::ShowDatabases { names } => {
                write!(f, "Databases:")?;
                names.iter().try_for_each(|name| write!(f, "\n{}", name))
            }
            ResultSet::CreateTable {
                table_name,
                database,
            } => write!(f, "Table '{}' created in database '{}'.", table_name, database),
            ResultSet::DropTable {
                table_name,
                database,
            } => write!(f, "Table '{}' dropped from database '{}'.", table_name, database),
            ResultSet::ShowTables { database, names } if names.is_empty() => {
                write!(f, "No tables found in database '{}'.", database)
            }
            ResultSet::ShowTables { database, names } => {
                write!(f, "Tables in database '{}':", database)?;
                names.iter().try_for_each(|name| write!(f, "\n{}", name))
            }
            ResultSet::Insert { table_name, count } => {
                write!(f, "{} {} inserted into '{}'.", count, plural(*count), table_name)
            }
            ResultSet::Scan { columns, rows } => {
                writeln!(f, "{}", columns.join("\t|\t"))?;
                for col in columns {
                    write!(f, "{}", "-".repeat(col.len() + 3))?;
                }
                if rows.is_empty() {
                    return write!(f, "\n0 rows returned.");
                }
                for row in rows {
                    let values = row.iter().map(|v| v.to_string()).collect::<Vec<_>>();
                    write!(f, "\n{}", values.join("\t|\t"))?;
                }
                write!(f, "\n({} {})", rows.len(), plural(rows.len()))
            }
            ResultSet::Update { count: 0 } | ResultSet::Delete { count: 0 } => {
                write!(f, "0 rows affected.")
            }
            ResultSet::Update { count } => write!(f, "{} {} updated.", count, plural(*count)),
            ResultSet::Delete { count } => write!(f, "{} {} deleted.", count, plural(*count)),
            ResultSet::Help => f.write_str(HELP_TEXT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ResultSet;
    use crate::sql::types::Value;

    #[test]
    fn test_display_scan() {
        let rs = ResultSet::Scan {
            columns: vec!["id".to_string(), "name".to_string()],
            rows: vec![
                vec![Value::Integer(1), Value::String("Ann".to_string())],
                vec![Value::Integer(2), Value::Null],
            ],
        };
        assert_eq!(
            rs.to_string(),
            "id\t|\tname\n------------\n1\t|\tAnn\n2\t|\tNULL\n(2 rows)"
        );

        let empty = ResultSet::Scan {
            columns: vec!["id".to_string()],
            rows: vec![],
        };
        assert_eq!(empty.to_string(), "id\n-----\n0 rows returned.");
    }

    #[test]
    fn test_display_counts() {
        assert_eq!(ResultSet::Update { count: 1 }.to_string(), "1 row updated.");
        assert_eq!(ResultSet::Delete { count: 3 }.to_string(), "3 rows deleted.");
        assert_eq!(ResultSet::Delete { count: 0 }.to_string(), "0 rows affected.");
        assert_eq!(
            ResultSet::ShowDatabases { names: vec![] }.to_string(),
            "No databases found."
        );
        assert_eq!(
            ResultSet::ShowTables {
                database: "d".to_string(),
                names: vec!["a".to_string(), "b".to_string()],
            }
            .to_string(),
            "Tables in database 'd':\na\nb"
        );
    }
}
