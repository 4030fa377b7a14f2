use super::StatementPermission;
use crate::{
    dictionary::{
        DataDictionary,
        TransactionContext,
        PUBLIC_AUTHORIZATION_ID,
    },
    error::PermissionError,
};
use log::*;
use serde::{
    Deserialize,
    Serialize,
};
use uuid::Uuid;

/// EXECUTE on a function or procedure, needed by a statement that calls it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatementRoutinePermission {
    routine_uuid: Uuid,
}

impl StatementRoutinePermission {
    pub fn new(routine_uuid: Uuid) -> Self { StatementRoutinePermission { routine_uuid } }

    pub fn routine_uuid(&self) -> Uuid { self.routine_uuid }

    fn has_execute_permission(
        &self,
        dd: &dyn DataDictionary,
        authorization_id: &str,
    ) -> Result<bool, PermissionError> {
        let perms = dd.routine_permissions(self.routine_uuid, authorization_id)?;
        let granted = perms.map(|p| p.has_execute_permission()).unwrap_or(false);
        trace!("{} execute on {}: {}", authorization_id, self.routine_uuid, granted);
        Ok(granted)
    }
}

impl StatementPermission for StatementRoutinePermission {
    /// Routine grants never carry the grant option, so a check
    /// `for_grant` is always refused.
    fn check(
        &self,
        _tc: &dyn TransactionContext,
        dd: &dyn DataDictionary,
        authorization_id: &str,
        for_grant: bool,
    ) -> Result<(), PermissionError> {
        if !for_grant
            && (self.has_execute_permission(dd, PUBLIC_AUTHORIZATION_ID)?
                || self.has_execute_permission(dd, authorization_id)?)
        {
            return Ok(());
        }
        let rd = dd
            .routine_descriptor(self.routine_uuid)?
            .ok_or_else(|| PermissionError::bad_uuid("routine", self.routine_uuid))?;
        debug!(
            "{} denied execute on {} (for grant: {})",
            authorization_id, rd.name, for_grant
        );
        Err(PermissionError::NoExecutePermission {
            authorization_id: authorization_id.to_string(),
            object_kind: rd.kind.to_string(),
            schema: rd.schema_name().to_string(),
            name: rd.routine_name().to_string(),
        })
    }
}
