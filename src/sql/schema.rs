use std::{collections::HashMap, fmt, marker::PhantomData};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
};

use crate::{
    error::{Error, Result},
    sql::types::{DataType, Value},
};

/// Column definition, immutable once created
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub datatype: DataType,
}

impl Column {
    pub fn new(name: &str, datatype: DataType) -> Result<Self> {
        Ok(Self {
            name: non_empty_name("column", name)?,
            datatype,
        })
    }

    /// Converts a raw value to this column's type, then checks the result
    pub fn convert(&self, value: Value) -> Result<Value> {
        let converted = self.datatype.convert(value).map_err(|err| match err {
            Error::Conversion(msg) => Error::Conversion(format!("{} for column '{}'", msg, self.name)),
            err => err,
        })?;
        if !self.datatype.is_valid(&converted) {
            return Err(Error::Conversion(format!(
                "invalid value '{}' for column '{}' of type {}",
                converted, self.name, self.datatype
            )));
        }
        Ok(converted)
    }
}

/// A single row: column name to value, kept in the table's column order.
///
/// Rows carry no reference to their table. Every mutation receives the
/// relevant [`Column`] so the value can be converted and checked.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<(String, Value)>,
}

impl Row {
    pub fn get(&self, column_name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == column_name)
            .map(|(_, value)| value)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    /// Converts and checks `value` against `column`, then overwrites that field in place
    pub fn update_value(&mut self, column: &Column, value: Value) -> Result<()> {
        let converted = column.convert(value)?;
        self.set_converted(column, converted)
    }

    /// Overwrites a field with a value already converted for `column`
    pub(crate) fn set_converted(&mut self, column: &Column, value: Value) -> Result<()> {
        match self.values.iter_mut().find(|(name, _)| *name == column.name) {
            Some((_, slot)) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::Validation(format!(
                "column {} not present in row",
                column.name
            ))),
        }
    }

    fn push(&mut self, column_name: String, value: Value) {
        self.values.push((column_name, value));
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.values.iter().map(|(name, value)| (name, value)))
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(Row {
            values: deserialize_entries(deserializer)?,
        })
    }
}

/// Table: fixed column list plus rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableDocument")]
pub struct Table {
    pub name: String,
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table; needs at least one column and unique column names
    pub fn new(name: &str, columns: Vec<Column>) -> Result<Self> {
        let name = non_empty_name("table", name)?;
        if columns.is_empty() {
            return Err(Error::Validation(format!("table {} has no columns", name)));
        }
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(Error::Validation(format!(
                    "duplicate column name {} in table {}",
                    col.name, name
                )));
            }
        }
        Ok(Self {
            name,
            columns,
            rows: Vec::new(),
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Resolves a user-supplied column name, ignoring case
    pub fn find_column(&self, col_name: &str) -> Result<&Column> {
        let wanted = col_name.to_lowercase();
        self.columns
            .iter()
            .find(|c| c.name.to_lowercase() == wanted)
            .ok_or_else(|| {
                Error::Validation(format!(
                    "column {} not found in table {}",
                    col_name, self.name
                ))
            })
    }

    /// Builds a row in column order from `values` and appends it.
    ///
    /// Absent columns become NULL. Nothing is appended if any column fails
    /// conversion or if `values` names a column the table does not have.
    pub fn add_row(&mut self, mut values: HashMap<String, Value>) -> Result<()> {
        let mut row = Row::default();
        for col in &self.columns {
            let value = values.remove(&col.name).unwrap_or(Value::Null);
            row.push(col.name.clone(), col.convert(value)?);
        }
        if let Some(extra) = values.keys().next() {
            return Err(Error::Validation(format!(
                "column {} not found in table {}",
                extra, self.name
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Removes every row matching `predicate`, returning how many were removed
    pub fn delete_rows<F: FnMut(&Row) -> bool>(&mut self, mut predicate: F) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| !predicate(row));
        before - self.rows.len()
    }
}

/// On-disk shape of a table; rows are re-validated when it becomes a [`Table`]
#[derive(Deserialize)]
struct TableDocument {
    name: String,
    columns: Vec<Column>,
    #[serde(default)]
    rows: Vec<Row>,
}

impl TryFrom<TableDocument> for Table {
    type Error = Error;

    fn try_from(doc: TableDocument) -> Result<Self> {
        let columns = doc
            .columns
            .into_iter()
            .map(|c| Column::new(&c.name, c.datatype))
            .collect::<Result<Vec<_>>>()?;
        let mut table = Table::new(&doc.name, columns)?;
        for row in doc.rows {
            table.add_row(row.values.into_iter().collect())?;
        }
        Ok(table)
    }
}

/// Database: a named set of tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DatabaseDocument")]
pub struct Database {
    pub name: String,
    #[serde(serialize_with = "serialize_tables")]
    tables: Vec<Table>,
}

impl Database {
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            name: non_empty_name("database", name)?,
            tables: Vec::new(),
        })
    }

    pub fn create_table(&mut self, name: &str, columns: Vec<Column>) -> Result<()> {
        let table = Table::new(name, columns)?;
        if self.get_table(&table.name).is_some() {
            return Err(Error::Validation(format!(
                "table {} already exists in database {}",
                table.name, self.name
            )));
        }
        self.tables.push(table);
        Ok(())
    }

    pub fn drop_table(&mut self, name: &str) -> Result<Table> {
        let pos = self
            .tables
            .iter()
            .position(|t| t.name == name.trim())
            .ok_or_else(|| self.table_not_found(name))?;
        Ok(self.tables.remove(pos))
    }

    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name.trim())
    }

    pub fn get_table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name == name.trim())
    }

    /// Returns the table, or a validation error if it doesn't exist
    pub fn must_get_table(&self, name: &str) -> Result<&Table> {
        self.get_table(name).ok_or_else(|| self.table_not_found(name))
    }

    pub fn must_get_table_mut(&mut self, name: &str) -> Result<&mut Table> {
        let err = self.table_not_found(name);
        self.get_table_mut(name).ok_or(err)
    }

    /// Table names in definition order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    fn table_not_found(&self, name: &str) -> Error {
        Error::Validation(format!(
            "table {} does not exist in database {}",
            name.trim(),
            self.name
        ))
    }
}

#[derive(Deserialize)]
struct DatabaseDocument {
    name: String,
    #[serde(default, deserialize_with = "deserialize_entries")]
    tables: Vec<(String, Table)>,
}

impl TryFrom<DatabaseDocument> for Database {
    type Error = Error;

    fn try_from(doc: DatabaseDocument) -> Result<Self> {
        let mut db = Database::new(&doc.name)?;
        for (_, table) in doc.tables {
            if db.get_table(&table.name).is_some() {
                return Err(Error::Validation(format!(
                    "duplicate table {} in database {}",
                    table.name, db.name
                )));
            }
            db.tables.push(table);
        }
        Ok(db)
    }
}

fn serialize_tables<S: Serializer>(
    tables: &[Table],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_map(tables.iter().map(|t| (&t.name, t)))
}

/// Reads a JSON object into key/value pairs, keeping document order
fn deserialize_entries<'de, D, T>(deserializer: D) -> std::result::Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct EntriesVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
            let mut entries: Vec<(String, T)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, T>()? {
                match entries.iter_mut().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = value,
                    None => entries.push((key, value)),
                }
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}

fn non_empty_name(kind: &str, name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation(format!("{} name cannot be empty", kind)));
    }
    Ok(name.to_string())
}
