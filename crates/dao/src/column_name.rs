use serde_derive::{
    Deserialize,
    Serialize,
};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone)]
pub struct ColumnName {
    pub name: String,
    pub table: Option<String>,
}

impl ColumnName {
    /// create column name from `table.column` or a bare `column`
    pub fn from(arg: &str) -> Self {
        match arg.split_once('.') {
            Some((table, name)) => {
                ColumnName {
                    name: name.to_owned(),
                    table: Some(table.to_owned()),
                }
            }
            None => {
                ColumnName {
                    name: arg.to_owned(),
                    table: None,
                }
            }
        }
    }
}

pub trait ToColumnNames {
    /// extract the columns from struct
    fn to_column_names() -> Vec<ColumnName>;
}
