use sqlgrant_dao::DaoError;
use thiserror::Error;
use uuid::Uuid;

/// Failure of a statement permission check.
///
/// The `No*Permission` variants are ordinary authorization denials: the
/// statement must not proceed and the message is shown to the user.
/// `BadUuid` and `Dictionary` mean something else in the system is broken.
#[derive(Debug, Error, PartialEq)]
pub enum PermissionError {
    #[error(
        "User '{authorization_id}' does not have {privilege} permission on table '{schema}'.'{table}'."
    )]
    NoTablePermission {
        authorization_id: String,
        privilege: String,
        schema: String,
        table: String,
    },
    #[error(
        "User '{authorization_id}' does not have {privilege} permission on table '{schema}'.'{table}' for grant."
    )]
    NoTablePermissionForGrant {
        authorization_id: String,
        privilege: String,
        schema: String,
        table: String,
    },
    #[error(
        "User '{authorization_id}' does not have {privilege} permission on column '{column}' of table '{schema}'.'{table}'."
    )]
    NoColumnPermission {
        authorization_id: String,
        privilege: String,
        column: String,
        schema: String,
        table: String,
    },
    #[error(
        "User '{authorization_id}' does not have {privilege} permission on column '{column}' of table '{schema}'.'{table}' for grant."
    )]
    NoColumnPermissionForGrant {
        authorization_id: String,
        privilege: String,
        column: String,
        schema: String,
        table: String,
    },
    #[error("User '{authorization_id}' does not have execute permission on {object_kind} '{schema}'.'{name}'.")]
    NoExecutePermission {
        authorization_id: String,
        object_kind: String,
        schema: String,
        name: String,
    },
    #[error("Internal error: invalid {object_kind} id {uuid}.")]
    BadUuid { object_kind: String, uuid: Uuid },
    #[error("{0}")]
    Dictionary(#[from] DictionaryError),
}

impl PermissionError {
    /// SQLSTATE reported to the client
    pub fn sql_state(&self) -> &'static str {
        match self {
            PermissionError::NoTablePermission { .. } => "42500",
            PermissionError::NoTablePermissionForGrant { .. } => "42501",
            PermissionError::NoColumnPermission { .. } => "42502",
            PermissionError::NoColumnPermissionForGrant { .. } => "42503",
            PermissionError::NoExecutePermission { .. } => "42504",
            PermissionError::BadUuid { .. } => "XSAI4",
            PermissionError::Dictionary(e) => e.sql_state(),
        }
    }

    /// true when the statement was refused because a privilege is missing
    pub fn is_authorization_denied(&self) -> bool {
        match self {
            PermissionError::NoTablePermission { .. }
            | PermissionError::NoTablePermissionForGrant { .. }
            | PermissionError::NoColumnPermission { .. }
            | PermissionError::NoColumnPermissionForGrant { .. }
            | PermissionError::NoExecutePermission { .. } => true,
            PermissionError::BadUuid { .. } | PermissionError::Dictionary(_) => false,
        }
    }

    /// true for internal consistency faults, never caused by missing grants
    pub fn is_internal(&self) -> bool { !self.is_authorization_denied() }

    pub(crate) fn bad_uuid(object_kind: &str, uuid: Uuid) -> Self {
        PermissionError::BadUuid {
            object_kind: object_kind.to_string(),
            uuid,
        }
    }
}

/// Failure reading or mutating permission catalog rows
#[derive(Debug, Error, PartialEq)]
pub enum DictionaryError {
    #[error("{0}")]
    DaoError(#[from] DaoError),
    #[error("Malformed value in catalog column {column}: {value:?}")]
    MalformedValue { column: String, value: String },
    #[error("Unknown catalog object: {0}")]
    UnknownObject(String),
}

impl DictionaryError {
    pub fn sql_state(&self) -> &'static str {
        match self {
            DictionaryError::DaoError(_) | DictionaryError::MalformedValue { .. } => "XSDA3",
            DictionaryError::UnknownObject(_) => "XSDA4",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_message() {
        let err = PermissionError::NoTablePermissionForGrant {
            authorization_id: "ALICE".into(),
            privilege: "select".into(),
            schema: "APP".into(),
            table: "ORDERS".into(),
        };
        assert_eq!(
            err.to_string(),
            "User 'ALICE' does not have select permission on table 'APP'.'ORDERS' for grant."
        );
        assert_eq!(err.sql_state(), "42501");
        assert!(err.is_authorization_denied());
        assert!(!err.is_internal());
    }

    #[test]
    fn bad_uuid_is_internal() {
        let uuid = Uuid::new_v4();
        let err = PermissionError::bad_uuid("table", uuid);
        assert_eq!(err.to_string(), format!("Internal error: invalid table id {}.", uuid));
        assert!(err.is_internal());
        assert!(!err.is_authorization_denied());
    }

    #[test]
    fn dictionary_error_propagates() {
        let err: PermissionError = DictionaryError::UnknownObject("routine".into()).into();
        assert!(err.is_internal());
        assert_eq!(err.sql_state(), "XSDA4");
    }
}
