use crate::ConvertError;
use serde_derive::{
    Deserialize,
    Serialize,
};
use std::fmt;
use uuid::Uuid;

/// A single cell of a catalog row.
/// Permission catalogs only ever hold identities, uuids, grant markers
/// and column sets, so only those kinds are represented.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Value {
    Nil, // no value
    /// `CHAR(1)` markers such as `Y` or `S`
    Char(char),
    Text(String),
    Uuid(Uuid),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Nil => write!(f, ""),
            Value::Char(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
            Value::Uuid(v) => write!(f, "{}", v),
        }
    }
}

/// A trait to allow building rows ergonomically with `Dao::insert`
pub trait ToValue {
    fn to_value(&self) -> Value;
}

macro_rules! impl_to_value {
    ($ty:ty, $variant:ident) => {
        impl ToValue for $ty {
            fn to_value(&self) -> Value { Value::$variant(self.to_owned()) }
        }
    };
}

impl_to_value!(char, Char);
impl_to_value!(String, Text);
impl_to_value!(Uuid, Uuid);

impl ToValue for &str {
    fn to_value(&self) -> Value { Value::Text(self.to_string()) }
}

impl<T> ToValue for Option<T>
where
    T: ToValue,
{
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Nil,
        }
    }
}

impl<T> ToValue for &T
where
    T: ToValue,
{
    fn to_value(&self) -> Value { (*self).to_value() }
}

impl<T> From<T> for Value
where
    T: ToValue,
{
    fn from(v: T) -> Value { v.to_value() }
}

pub trait FromValue: Sized {
    fn from_value(v: &Value) -> Result<Self, ConvertError>;
}

macro_rules! impl_from_value {
    ($ty: ty, $ty_name: tt, $($variant: ident),*) => {
        /// try from to owned
        impl FromValue for $ty {
            fn from_value(v: &Value) -> Result<Self, ConvertError> {
                match *v {
                    $(Value::$variant(ref v) => Ok(v.to_owned() as $ty),
                    )*
                    _ => Err(ConvertError::NotSupported(format!("{:?}",v), $ty_name.into())),
                }
            }
        }
    }
}

impl_from_value!(char, "char", Char);

/// Char can be casted into String
impl FromValue for String {
    fn from_value(v: &Value) -> Result<Self, ConvertError> {
        match *v {
            Value::Text(ref v) => Ok(v.to_owned()),
            Value::Char(ref v) => Ok(v.to_string()),
            _ => {
                Err(ConvertError::NotSupported(
                    format!("{:?}", v),
                    "String".to_string(),
                ))
            }
        }
    }
}

/// Catalogs written by other tools store uuids as their text form
impl FromValue for Uuid {
    fn from_value(v: &Value) -> Result<Self, ConvertError> {
        match *v {
            Value::Uuid(ref v) => Ok(*v),
            Value::Text(ref v) => {
                Uuid::parse_str(v).map_err(|e| {
                    ConvertError::NotSupported(format!("{:?}", v), format!("Uuid: {}", e))
                })
            }
            _ => {
                Err(ConvertError::NotSupported(
                    format!("{:?}", v),
                    "Uuid".to_string(),
                ))
            }
        }
    }
}

impl<T> FromValue for Option<T>
where
    T: FromValue,
{
    fn from_value(v: &Value) -> Result<Self, ConvertError> {
        match *v {
            Value::Nil => Ok(None),
            _ => FromValue::from_value(v).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types() {
        assert_eq!(Value::Text("Y".into()), "Y".to_value());
        assert_eq!(Value::Nil, None::<String>.to_value());
        assert_eq!(Value::Char('S'), 'S'.to_value());
    }

    #[test]
    fn uuid_from_text() {
        let uuid = Uuid::new_v4();
        let v = Value::Text(uuid.to_string());
        assert_eq!(Uuid::from_value(&v), Ok(uuid));
        assert!(Uuid::from_value(&Value::Text("not-a-uuid".into())).is_err());
    }

    #[test]
    fn char_into_string() {
        let s = String::from_value(&Value::Char('y'));
        assert_eq!(s, Ok("y".to_string()));
    }

    #[test]
    fn nil_into_option() {
        let s: Option<String> = FromValue::from_value(&Value::Nil).unwrap();
        assert_eq!(s, None);
        let c = char::from_value(&Value::Text("Y".into()));
        assert!(c.is_err());
    }
}
