#![deny(clippy::all)]

pub use column_name::{
    ColumnName,
    ToColumnNames,
};
pub use dao::{
    Dao,
    FromDao,
    ToDao,
};
pub use error::{
    ConvertError,
    DaoError,
};
pub use rows::Rows;
pub use table_name::{
    TableName,
    ToTableName,
};
pub use value::{
    FromValue,
    ToValue,
    Value,
};

mod column_name;
mod dao;
mod error;
mod rows;
mod table_name;
pub mod value;
