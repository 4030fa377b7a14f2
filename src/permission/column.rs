use super::{
    StatementPermission,
    StatementTablePermission,
};
use crate::{
    dictionary::{
        DataDictionary,
        TransactionContext,
        PUBLIC_AUTHORIZATION_ID,
    },
    error::PermissionError,
    privilege::PrivilegeType,
    util::{
        covers_all,
        set_ordinals,
        union_into,
    },
};
use bit_vec::BitVec;
use log::*;
use uuid::Uuid;

/// A privilege a statement needs on some columns of a table.
/// Holding the privilege on the whole table satisfies it as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatementColumnPermission {
    table: StatementTablePermission,
    /// zero based ordinals of the required columns, ending at the last set one
    columns: BitVec,
}

impl StatementColumnPermission {
    /// Trailing unset bits of `columns` are dropped, so requirements on the
    /// same columns compare equal whatever length their sets were built with.
    pub fn new(table_uuid: Uuid, privilege: PrivilegeType, mut columns: BitVec) -> Self {
        let len = set_ordinals(&columns).last().map_or(0, |last| last + 1);
        columns.truncate(len);
        StatementColumnPermission {
            table: StatementTablePermission::new(table_uuid, privilege),
            columns,
        }
    }

    pub fn table_uuid(&self) -> Uuid { self.table.table_uuid() }

    pub fn privilege_type(&self) -> PrivilegeType { self.table.privilege_type() }

    pub fn columns(&self) -> &BitVec { &self.columns }

    /// OR the columns granted to `authorization_id` into `permitted`.
    /// `grantable` selects the rows granted with grant option.
    fn add_permitted_columns(
        &self,
        dd: &dyn DataDictionary,
        grantable: bool,
        authorization_id: &str,
        permitted: Option<BitVec>,
    ) -> Result<Option<BitVec>, PermissionError> {
        let covered = permitted
            .as_ref()
            .map(|p| covers_all(p, &self.columns))
            .unwrap_or(false);
        if covered {
            return Ok(permitted);
        }
        let perms = dd.column_permissions(
            self.table_uuid(),
            self.privilege_type(),
            grantable,
            authorization_id,
        )?;
        let granted = match perms.as_ref().and_then(|p| p.columns()) {
            Some(granted) => granted,
            None => return Ok(permitted),
        };
        trace!(
            "{} holds {} on columns {:?} of {} (grantable: {})",
            authorization_id,
            self.privilege_type(),
            granted,
            self.table_uuid(),
            grantable
        );
        match permitted {
            Some(mut permitted) => {
                union_into(&mut permitted, granted);
                Ok(Some(permitted))
            }
            None => Ok(Some(granted.clone())),
        }
    }
}

impl StatementPermission for StatementColumnPermission {
    fn check(
        &self,
        _tc: &dyn TransactionContext,
        dd: &dyn DataDictionary,
        authorization_id: &str,
        for_grant: bool,
    ) -> Result<(), PermissionError> {
        if self
            .table
            .has_permission_via_public_or_user(dd, authorization_id, for_grant)?
        {
            return Ok(());
        }

        let mut permitted = None;
        if !for_grant {
            permitted = self.add_permitted_columns(dd, false, PUBLIC_AUTHORIZATION_ID, permitted)?;
            permitted = self.add_permitted_columns(dd, false, authorization_id, permitted)?;
        }
        permitted = self.add_permitted_columns(dd, true, PUBLIC_AUTHORIZATION_ID, permitted)?;
        permitted = self.add_permitted_columns(dd, true, authorization_id, permitted)?;

        let missing = set_ordinals(&self.columns).find(|i| {
            !permitted
                .as_ref()
                .and_then(|p| p.get(*i))
                .unwrap_or(false)
        });
        let position = match missing {
            Some(position) => position,
            None => return Ok(()),
        };

        let td = self.table.table_descriptor(dd)?;
        let column = match td.column(position) {
            Some(column) => column.name.clone(),
            None => return Err(PermissionError::bad_uuid("column", td.uuid)),
        };
        debug!(
            "{} denied {} on column {} of {} (for grant: {})",
            authorization_id,
            self.privilege_type(),
            column,
            td.name,
            for_grant
        );
        let authorization_id = authorization_id.to_string();
        let privilege = self.table.privilege_name().to_string();
        let schema = td.schema_name().to_string();
        let table = td.table_name().to_string();
        if for_grant {
            Err(PermissionError::NoColumnPermissionForGrant {
                authorization_id,
                privilege,
                column,
                schema,
                table,
            })
        } else {
            Err(PermissionError::NoColumnPermission {
                authorization_id,
                privilege,
                column,
                schema,
                table,
            })
        }
    }
}
