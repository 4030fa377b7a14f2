//! The catalog objects permissions refer to, as far as error reporting needs them.
use serde::{
    Deserialize,
    Serialize,
};
use sqlgrant_dao::{
    ColumnName,
    TableName,
};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub uuid: Uuid,
    pub name: TableName,

    /// columns of this table, in ordinal order
    pub columns: Vec<ColumnName>,
}

impl TableDescriptor {
    pub fn new(uuid: Uuid, name: TableName, columns: Vec<ColumnName>) -> Self {
        TableDescriptor {
            uuid,
            name,
            columns,
        }
    }

    pub fn schema_name(&self) -> &str { self.name.schema_name() }

    pub fn table_name(&self) -> &str { &self.name.name }

    /// column at zero based ordinal `position`
    pub fn column(&self, position: usize) -> Option<&ColumnName> { self.columns.get(position) }

    pub fn column_count(&self) -> usize { self.columns.len() }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum RoutineKind {
    Function,
    Procedure,
}

impl fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RoutineKind::Function => write!(f, "function"),
            RoutineKind::Procedure => write!(f, "procedure"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RoutineDescriptor {
    pub uuid: Uuid,
    /// schema qualified routine name
    pub name: TableName,
    pub kind: RoutineKind,
}

impl RoutineDescriptor {
    pub fn new(uuid: Uuid, name: TableName, kind: RoutineKind) -> Self {
        RoutineDescriptor { uuid, name, kind }
    }

    pub fn schema_name(&self) -> &str { self.name.schema_name() }

    pub fn routine_name(&self) -> &str { &self.name.name }
}
