use super::StatementPermission;
use crate::{
    catalog::TableDescriptor,
    dictionary::{
        DataDictionary,
        TransactionContext,
        PUBLIC_AUTHORIZATION_ID,
    },
    error::PermissionError,
    privilege::PrivilegeType,
};
use log::*;
use serde::{
    Deserialize,
    Serialize,
};
use uuid::Uuid;

/// A table privilege a compiled statement needs.
///
/// Two requirements for the same privilege on the same table are equal,
/// whichever statement produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatementTablePermission {
    table_uuid: Uuid,
    privilege: PrivilegeType,
}

impl StatementTablePermission {
    pub fn new(table_uuid: Uuid, privilege: PrivilegeType) -> Self {
        StatementTablePermission {
            table_uuid,
            privilege,
        }
    }

    pub fn table_uuid(&self) -> Uuid { self.table_uuid }

    pub fn privilege_type(&self) -> PrivilegeType { self.privilege }

    pub fn privilege_name(&self) -> &'static str { self.privilege.name() }

    /// Whether `authorization_id` alone holds this privilege, looking
    /// only at its own table permissions row. No row means no permission.
    pub fn has_permission_on_table(
        &self,
        dd: &dyn DataDictionary,
        authorization_id: &str,
        for_grant: bool,
    ) -> Result<bool, PermissionError> {
        let perms = match dd.table_permissions(self.table_uuid, authorization_id)? {
            Some(perms) => perms,
            None => {
                trace!(
                    "no table permissions row for {} on {}",
                    authorization_id,
                    self.table_uuid
                );
                return Ok(false);
            }
        };
        let state = perms.privilege(self.privilege);
        trace!(
            "{} {} on {}: {:?} (for grant: {})",
            authorization_id,
            self.privilege,
            self.table_uuid,
            state,
            for_grant
        );
        Ok(state.permits(for_grant))
    }

    /// PUBLIC is looked up first, then the user
    pub(crate) fn has_permission_via_public_or_user(
        &self,
        dd: &dyn DataDictionary,
        authorization_id: &str,
        for_grant: bool,
    ) -> Result<bool, PermissionError> {
        Ok(self.has_permission_on_table(dd, PUBLIC_AUTHORIZATION_ID, for_grant)?
            || self.has_permission_on_table(dd, authorization_id, for_grant)?)
    }

    /// The table this requirement refers to; a uuid the dictionary does
    /// not know is an internal fault, not an authorization failure
    pub(crate) fn table_descriptor(
        &self,
        dd: &dyn DataDictionary,
    ) -> Result<TableDescriptor, PermissionError> {
        dd.table_descriptor(self.table_uuid)?
            .ok_or_else(|| PermissionError::bad_uuid("table", self.table_uuid))
    }
}

impl StatementPermission for StatementTablePermission {
    fn check(
        &self,
        _tc: &dyn TransactionContext,
        dd: &dyn DataDictionary,
        authorization_id: &str,
        for_grant: bool,
    ) -> Result<(), PermissionError> {
        if self.has_permission_via_public_or_user(dd, authorization_id, for_grant)? {
            return Ok(());
        }
        let td = self.table_descriptor(dd)?;
        debug!(
            "{} denied {} on {} (for grant: {})",
            authorization_id,
            self.privilege,
            td.name,
            for_grant
        );
        let authorization_id = authorization_id.to_string();
        let privilege = self.privilege_name().to_string();
        let schema = td.schema_name().to_string();
        let table = td.table_name().to_string();
        if for_grant {
            Err(PermissionError::NoTablePermissionForGrant {
                authorization_id,
                privilege,
                schema,
                table,
            })
        } else {
            Err(PermissionError::NoTablePermission {
                authorization_id,
                privilege,
                schema,
                table,
            })
        }
    }
}
