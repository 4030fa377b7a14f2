use crate::{
    catalog::{
        RoutineDescriptor,
        TableDescriptor,
    },
    descriptor::{
        ColPermsDescriptor,
        RoutinePermsDescriptor,
        TablePermsDescriptor,
    },
    error::DictionaryError,
    privilege::PrivilegeType,
};
use uuid::Uuid;

/// Authorization identity every user implicitly belongs to
pub const PUBLIC_AUTHORIZATION_ID: &str = "PUBLIC";

/// The transaction a check runs in. Permission checks never look
/// inside it; it is handed through so implementations of
/// `DataDictionary` can read within the caller's snapshot.
pub trait TransactionContext {}

impl TransactionContext for () {}

/// Read access to the catalogs the permission checks consult.
///
/// A missing object or row is `Ok(None)`; errors are reserved for
/// failures reading the catalog itself.
pub trait DataDictionary {
    fn table_descriptor(
        &self,
        table_uuid: Uuid,
    ) -> Result<Option<TableDescriptor>, DictionaryError>;

    fn routine_descriptor(
        &self,
        routine_uuid: Uuid,
    ) -> Result<Option<RoutineDescriptor>, DictionaryError>;

    /// the table permissions row of `grantee` on the table
    fn table_permissions(
        &self,
        table_uuid: Uuid,
        grantee: &str,
    ) -> Result<Option<TablePermsDescriptor>, DictionaryError>;

    /// The column permissions row of `grantee` for one privilege.
    /// With `for_grant` only the row granted with grant option is
    /// returned, otherwise only the row granted without it.
    fn column_permissions(
        &self,
        table_uuid: Uuid,
        privilege: PrivilegeType,
        for_grant: bool,
        grantee: &str,
    ) -> Result<Option<ColPermsDescriptor>, DictionaryError>;

    fn routine_permissions(
        &self,
        routine_uuid: Uuid,
        grantee: &str,
    ) -> Result<Option<RoutinePermsDescriptor>, DictionaryError>;
}
