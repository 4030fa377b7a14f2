//! Grantable actions and the grant states a catalog row records for them.
use log::*;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fmt,
    str::FromStr,
};

/// Privileges that can be granted on a table, and for some of them
/// on individual columns of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrivilegeType {
    Select,
    Update,
    References,
    Insert,
    Delete,
    Trigger,
}

impl PrivilegeType {
    pub const ALL: [PrivilegeType; 6] = [
        PrivilegeType::Select,
        PrivilegeType::Update,
        PrivilegeType::References,
        PrivilegeType::Insert,
        PrivilegeType::Delete,
        PrivilegeType::Trigger,
    ];

    /// lowercase name used in authorization error messages
    pub fn name(self) -> &'static str {
        match self {
            PrivilegeType::Select => "select",
            PrivilegeType::Update => "update",
            PrivilegeType::References => "references",
            PrivilegeType::Insert => "insert",
            PrivilegeType::Delete => "delete",
            PrivilegeType::Trigger => "trigger",
        }
    }

    /// numeric code carried by compiled statements
    pub fn code(self) -> i32 {
        match self {
            PrivilegeType::Select => 0,
            PrivilegeType::Update => 1,
            PrivilegeType::References => 2,
            PrivilegeType::Insert => 3,
            PrivilegeType::Delete => 4,
            PrivilegeType::Trigger => 5,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        PrivilegeType::ALL.iter().copied().find(|p| p.code() == code)
    }

    /// Display name of a raw privilege code.
    /// Codes outside the known set render as `"?"`.
    pub fn name_for_code(code: i32) -> &'static str {
        match PrivilegeType::from_code(code) {
            Some(privilege) => privilege.name(),
            None => {
                warn!("no privilege type is mapped to code {}", code);
                "?"
            }
        }
    }

    /// Column of the table permissions catalog holding this privilege's state
    pub fn table_perms_column(self) -> &'static str {
        match self {
            PrivilegeType::Select => "SELECTPRIV",
            PrivilegeType::Update => "UPDATEPRIV",
            PrivilegeType::References => "REFERENCESPRIV",
            PrivilegeType::Insert => "INSERTPRIV",
            PrivilegeType::Delete => "DELETEPRIV",
            PrivilegeType::Trigger => "TRIGGERPRIV",
        }
    }

    /// Only select, update and references can be granted per column
    pub fn is_column_grantable(self) -> bool {
        match self {
            PrivilegeType::Select | PrivilegeType::Update | PrivilegeType::References => true,
            PrivilegeType::Insert | PrivilegeType::Delete | PrivilegeType::Trigger => false,
        }
    }
}

impl fmt::Display for PrivilegeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.name()) }
}

/// What a permission row says about one privilege
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum GrantState {
    #[default]
    NotGranted,
    Granted,
    GrantedWithOption,
}

impl GrantState {
    /// Decode the catalog marker: `"Y"` is granted with grant option,
    /// `"y"` granted without it, anything else is not granted.
    pub fn from_catalog(marker: Option<&str>) -> Self {
        match marker {
            Some("Y") => GrantState::GrantedWithOption,
            Some("y") => GrantState::Granted,
            None => GrantState::NotGranted,
            Some(other) => {
                if !other.is_empty() && other != "N" {
                    warn!("unknown grant state marker {:?}, treated as not granted", other);
                }
                GrantState::NotGranted
            }
        }
    }

    pub fn to_catalog(self) -> Option<&'static str> {
        match self {
            GrantState::NotGranted => None,
            GrantState::Granted => Some("y"),
            GrantState::GrantedWithOption => Some("Y"),
        }
    }

    /// whether this state satisfies a requirement;
    /// re-granting needs the grant option
    pub fn permits(self, for_grant: bool) -> bool {
        match self {
            GrantState::GrantedWithOption => true,
            GrantState::Granted => !for_grant,
            GrantState::NotGranted => false,
        }
    }

    pub fn is_granted(self) -> bool { self != GrantState::NotGranted }

    /// the stronger of two states, used when a grant lands on an existing row
    pub fn merge(self, other: GrantState) -> GrantState { self.max(other) }
}

/// Type marker of a column permission row.
///
/// Column permissions are stored one row per privilege per table, with
/// the grant option folded into the marker letter: lowercase `s`, `u`, `r`
/// without grant option and uppercase `S`, `U`, `R` with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnPrivilegeType {
    privilege: PrivilegeType,
    with_grant_option: bool,
}

impl ColumnPrivilegeType {
    /// `None` for privileges that have no column form
    pub fn new(privilege: PrivilegeType, with_grant_option: bool) -> Option<Self> {
        if privilege.is_column_grantable() {
            Some(ColumnPrivilegeType {
                privilege,
                with_grant_option,
            })
        } else {
            None
        }
    }

    pub fn privilege(&self) -> PrivilegeType { self.privilege }

    pub fn with_grant_option(&self) -> bool { self.with_grant_option }

    pub fn as_char(&self) -> char {
        let c = match self.privilege {
            PrivilegeType::Select => 's',
            PrivilegeType::Update => 'u',
            PrivilegeType::References => 'r',
            // rejected by the constructor
            PrivilegeType::Insert | PrivilegeType::Delete | PrivilegeType::Trigger => '?',
        };
        if self.with_grant_option {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }
}

impl fmt::Display for ColumnPrivilegeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.as_char()) }
}

impl FromStr for ColumnPrivilegeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let privilege = match s {
            "s" | "S" => PrivilegeType::Select,
            "u" | "U" => PrivilegeType::Update,
            "r" | "R" => PrivilegeType::References,
            _ => return Err(format!("unknown column privilege type {:?}", s)),
        };
        let with_grant_option = s.chars().all(|c| c.is_ascii_uppercase());
        Ok(ColumnPrivilegeType {
            privilege,
            with_grant_option,
        })
    }
}
