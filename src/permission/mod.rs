//! Privileges a compiled statement needs, and the checks that verify an
//! authorization identity holds them.
//!
//! Every check looks at the PUBLIC grants before the identity's own.
//! The outcome is the OR of both lookups.
use crate::{
    dictionary::{
        DataDictionary,
        TransactionContext,
    },
    error::PermissionError,
};

pub use column::StatementColumnPermission;
pub use routine::StatementRoutinePermission;
pub use table::StatementTablePermission;

mod column;
mod routine;
mod table;

/// A privilege a statement requires before it may run
pub trait StatementPermission {
    /// Verify that `authorization_id` holds this privilege. With
    /// `for_grant` the privilege must also be grantable, as when the
    /// user grants it on to someone else.
    fn check(
        &self,
        tc: &dyn TransactionContext,
        dd: &dyn DataDictionary,
        authorization_id: &str,
        for_grant: bool,
    ) -> Result<(), PermissionError>;
}

/// Any of the requirement kinds, so a statement compiler can collect
/// them into one deduplicating set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequiredPermission {
    Table(StatementTablePermission),
    Column(StatementColumnPermission),
    Routine(StatementRoutinePermission),
}

impl StatementPermission for RequiredPermission {
    fn check(
        &self,
        tc: &dyn TransactionContext,
        dd: &dyn DataDictionary,
        authorization_id: &str,
        for_grant: bool,
    ) -> Result<(), PermissionError> {
        match self {
            RequiredPermission::Table(p) => p.check(tc, dd, authorization_id, for_grant),
            RequiredPermission::Column(p) => p.check(tc, dd, authorization_id, for_grant),
            RequiredPermission::Routine(p) => p.check(tc, dd, authorization_id, for_grant),
        }
    }
}

impl From<StatementTablePermission> for RequiredPermission {
    fn from(p: StatementTablePermission) -> Self { RequiredPermission::Table(p) }
}

impl From<StatementColumnPermission> for RequiredPermission {
    fn from(p: StatementColumnPermission) -> Self { RequiredPermission::Column(p) }
}

impl From<StatementRoutinePermission> for RequiredPermission {
    fn from(p: StatementRoutinePermission) -> Self { RequiredPermission::Routine(p) }
}

/// Check every requirement of a statement, stopping at the first failure
pub fn authorize<'a, I, P>(
    tc: &dyn TransactionContext,
    dd: &dyn DataDictionary,
    authorization_id: &str,
    required: I,
    for_grant: bool,
) -> Result<(), PermissionError>
where
    I: IntoIterator<Item = &'a P>,
    P: StatementPermission + ?Sized + 'a,
{
    for permission in required {
        permission.check(tc, dd, authorization_id, for_grant)?;
    }
    Ok(())
}
