use crate::{
    error::DaoError,
    FromValue,
    ToValue,
    Value,
};
use serde::{
    ser::{
        Serialize,
        Serializer,
    },
    Deserialize,
    Deserializer,
};
use std::collections::BTreeMap;

/// One catalog row, keyed by column name
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Dao(pub BTreeMap<String, Value>);

impl Dao {
    pub fn new() -> Self { Dao::default() }

    pub fn insert<K, V>(&mut self, k: K, v: V)
    where
        K: ToString,
        V: ToValue,
    {
        self.0.insert(k.to_string(), v.to_value());
    }

    pub fn insert_value<K>(&mut self, k: K, value: &Value)
    where
        K: ToString,
    {
        self.0.insert(k.to_string(), value.clone());
    }

    pub fn get<'a, T>(&'a self, s: &str) -> Result<T, DaoError>
    where
        T: FromValue,
    {
        let value: Option<&'a Value> = self.0.get(s);
        match value {
            Some(v) => FromValue::from_value(v).map_err(DaoError::ConvertError),
            None => Err(DaoError::NoSuchValueError(s.into())),
        }
    }

    /// A missing column and an explicit NULL both read as `None`
    pub fn get_opt<'a, T>(&'a self, s: &str) -> Result<Option<T>, DaoError>
    where
        T: FromValue,
    {
        let value: Option<&'a Value> = self.0.get(s);
        match value {
            Some(v) => {
                match v {
                    Value::Nil => Ok(None),
                    _ => {
                        Ok(Some(
                            FromValue::from_value(v).map_err(DaoError::ConvertError)?,
                        ))
                    }
                }
            }
            None => Ok(None),
        }
    }
}

impl Serialize for Dao {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Dao {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        BTreeMap::deserialize(deserializer).map(Dao)
    }
}

pub trait FromDao: Sized {
    /// materialize an instance from a catalog row,
    /// failing when a required column is missing or malformed
    fn from_dao(dao: &Dao) -> Result<Self, DaoError>;
}

pub trait ToDao {
    /// convert from an instance of the struct to a catalog row
    fn to_dao(&self) -> Dao;
}
