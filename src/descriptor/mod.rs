//! Granted-permission records as the data dictionary materializes them.
//!
//! Every record is keyed by who holds the privilege, never by who granted
//! it: granting the same privilege again from another grantor lands on
//! the same catalog row. Each record type exposes its identity as an
//! explicit key value and equality and hashing are derived from that key.
use serde::{
    Deserialize,
    Serialize,
};
use sqlgrant_dao::{
    Dao,
    DaoError,
    TableName,
};
use std::{
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{
        Hash,
        Hasher,
    },
};

pub use col_perms::{
    ColPermsDescriptor,
    ColPermsKey,
};
pub use routine_perms::{
    RoutinePermsDescriptor,
    RoutinePermsKey,
};
pub use table_perms::{
    TablePermsDescriptor,
    TablePermsKey,
};

/// Equality and hashing of a permission row go through its key
macro_rules! impl_key_identity {
    ($ty:ty) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                use crate::descriptor::Permissions;
                self.key() == other.key()
            }
        }

        impl Eq for $ty {}

        impl std::hash::Hash for $ty {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                std::hash::Hash::hash(&crate::descriptor::Permissions::key(self), state)
            }
        }
    };
}

mod col_perms;
mod routine_perms;
mod table_perms;

/// The system catalogs holding granted permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogNumber {
    SysTablePerms,
    SysColPerms,
    SysRoutinePerms,
}

impl CatalogNumber {
    pub fn number(self) -> i32 {
        match self {
            CatalogNumber::SysTablePerms => 16,
            CatalogNumber::SysColPerms => 17,
            CatalogNumber::SysRoutinePerms => 18,
        }
    }

    pub fn table_name(self) -> TableName {
        match self {
            CatalogNumber::SysTablePerms => TableName::with_schema("SYS", "SYSTABLEPERMS"),
            CatalogNumber::SysColPerms => TableName::with_schema("SYS", "SYSCOLPERMS"),
            CatalogNumber::SysRoutinePerms => TableName::with_schema("SYS", "SYSROUTINEPERMS"),
        }
    }
}

impl fmt::Display for CatalogNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.table_name().complete_name())
    }
}

/// Grantee and grantor, the part common to every permission row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionsDescriptor {
    grantee: String,
    grantor: String,
}

impl PermissionsDescriptor {
    pub fn new(grantee: &str, grantor: &str) -> Self {
        PermissionsDescriptor {
            grantee: grantee.to_string(),
            grantor: grantor.to_string(),
        }
    }

    pub fn grantee(&self) -> &str { &self.grantee }

    pub fn grantor(&self) -> &str { &self.grantor }

    /// Rename the holder of this row; the grantor stays as is
    pub fn set_grantee(&mut self, grantee: &str) { self.grantee = grantee.to_string(); }

    /// true iff both rows are held by the same grantee
    pub fn key_equals(&self, other: &PermissionsDescriptor) -> bool {
        self.grantee == other.grantee
    }

    pub fn key_hash_code(&self) -> u64 { hash_code(&self.grantee) }

    pub(crate) fn from_dao(dao: &Dao) -> Result<Self, DaoError> {
        Ok(PermissionsDescriptor {
            grantee: dao.get("GRANTEE")?,
            grantor: dao.get("GRANTOR")?,
        })
    }

    pub(crate) fn write_dao(&self, dao: &mut Dao) {
        dao.insert("GRANTEE", &self.grantee);
        dao.insert("GRANTOR", &self.grantor);
    }
}

impl PartialEq for PermissionsDescriptor {
    fn eq(&self, other: &Self) -> bool { self.key_equals(other) }
}

impl Eq for PermissionsDescriptor {}

impl Hash for PermissionsDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) { self.grantee.hash(state) }
}

/// A granted-permission row of one of the permission catalogs.
pub trait Permissions {
    /// The fields that identify the row. Always includes the grantee
    /// and never the grantor.
    type Key: Clone + Eq + Hash + fmt::Debug;

    fn key(&self) -> Self::Key;

    fn descriptor(&self) -> &PermissionsDescriptor;

    fn descriptor_mut(&mut self) -> &mut PermissionsDescriptor;

    fn catalog_number(&self) -> CatalogNumber;

    fn grantee(&self) -> &str { self.descriptor().grantee() }

    fn grantor(&self) -> &str { self.descriptor().grantor() }

    fn set_grantee(&mut self, grantee: &str) { self.descriptor_mut().set_grantee(grantee) }

    fn key_equals(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        self.key() == other.key()
    }

    fn key_hash_code(&self) -> u64 { hash_code(&self.key()) }
}

fn hash_code<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
