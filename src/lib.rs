//!
//! Privilege descriptors and the checks a compiled statement runs to
//! verify that an authorization identity holds the privileges it needs.
//!
//! Checking a table privilege
//!
//! ```rust
//! use sqlgrant::{
//!     ColumnName, GrantState, InMemoryDictionary, PermissionError, PrivilegeType,
//!     StatementPermission, StatementTablePermission, TableDescriptor, TableName,
//!     TablePermsDescriptor, Uuid,
//! };
//!
//! fn main() {
//!     let orders = Uuid::new_v4();
//!     let mut dd = InMemoryDictionary::new();
//!     dd.add_table(TableDescriptor::new(
//!         orders,
//!         TableName::from("APP.ORDERS"),
//!         vec![ColumnName::from("ID"), ColumnName::from("AMOUNT")],
//!     ));
//!     let grant = TablePermsDescriptor::new("ALICE", "DBA", orders)
//!         .with_privilege(PrivilegeType::Select, GrantState::Granted);
//!     dd.grant_table_permissions(grant).unwrap();
//!
//!     let required = StatementTablePermission::new(orders, PrivilegeType::Select);
//!     assert!(required.check(&(), &dd, "ALICE", false).is_ok());
//!
//!     // ALICE may read ORDERS but not pass the privilege on
//!     let err = required.check(&(), &dd, "ALICE", true).unwrap_err();
//!     assert!(matches!(err, PermissionError::NoTablePermissionForGrant { .. }));
//!     assert_eq!(
//!         err.to_string(),
//!         "User 'ALICE' does not have select permission on table 'APP'.'ORDERS' for grant."
//!     );
//! }
//! ```
//!
#![deny(clippy::all)]
use cfg_if::cfg_if;

cfg_if! {if #[cfg(feature = "memory-dictionary")]{
    mod memory;
    pub use memory::InMemoryDictionary;
}}

pub mod catalog;
pub mod descriptor;
pub mod dictionary;
pub mod error;
pub mod permission;
pub mod privilege;
mod util;

pub use catalog::{
    RoutineDescriptor,
    RoutineKind,
    TableDescriptor,
};
pub use descriptor::{
    CatalogNumber,
    ColPermsDescriptor,
    Permissions,
    PermissionsDescriptor,
    RoutinePermsDescriptor,
    TablePermsDescriptor,
};
pub use dictionary::{
    DataDictionary,
    TransactionContext,
    PUBLIC_AUTHORIZATION_ID,
};
pub use error::{
    DictionaryError,
    PermissionError,
};
pub use permission::{
    authorize,
    RequiredPermission,
    StatementColumnPermission,
    StatementPermission,
    StatementRoutinePermission,
    StatementTablePermission,
};
pub use privilege::{
    ColumnPrivilegeType,
    GrantState,
    PrivilegeType,
};
pub use sqlgrant_dao::{
    ColumnName,
    Dao,
    FromDao,
    Rows,
    TableName,
    ToDao,
    Value,
};
pub use uuid::Uuid;
