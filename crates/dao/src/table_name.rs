use serde_derive::{
    Deserialize,
    Serialize,
};
use std::fmt;

/// Schema qualified name of a table
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableName {
    pub name: String,
    pub schema: Option<String>,
}

impl TableName {
    /// create table name from `schema.table` or a bare `table`
    pub fn from(arg: &str) -> Self {
        match arg.split_once('.') {
            Some((schema, name)) => {
                TableName {
                    schema: Some(schema.to_owned()),
                    name: name.to_owned(),
                }
            }
            None => {
                TableName {
                    schema: None,
                    name: arg.to_owned(),
                }
            }
        }
    }

    pub fn with_schema(schema: &str, name: &str) -> Self {
        TableName {
            schema: Some(schema.to_owned()),
            name: name.to_owned(),
        }
    }

    /// the schema name, empty when the table is unqualified
    pub fn schema_name(&self) -> &str { self.schema.as_deref().unwrap_or("") }

    /// return the long name of the table using schema.table_name
    pub fn complete_name(&self) -> String {
        match self.schema {
            Some(ref schema) => format!("{}.{}", schema, self.name),
            None => self.name.to_owned(),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.complete_name()) }
}

pub trait ToTableName {
    /// extract the table name from a struct
    fn to_table_name() -> TableName;
}
