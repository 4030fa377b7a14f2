use super::{
    CatalogNumber,
    Permissions,
    PermissionsDescriptor,
};
use sqlgrant_dao::{
    ColumnName,
    Dao,
    DaoError,
    FromDao,
    TableName,
    ToColumnNames,
    ToDao,
    ToTableName,
};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutinePermsKey {
    pub grantee: String,
    pub routine_uuid: Uuid,
}

/// EXECUTE permission on a function or procedure, a row of SYS.SYSROUTINEPERMS.
/// Routine grants never carry the grant option.
#[derive(Debug, Clone)]
pub struct RoutinePermsDescriptor {
    perms: PermissionsDescriptor,
    routine_uuid: Uuid,
    has_execute_permission: bool,
}

impl RoutinePermsDescriptor {
    pub fn new(grantee: &str, grantor: &str, routine_uuid: Uuid) -> Self {
        RoutinePermsDescriptor {
            perms: PermissionsDescriptor::new(grantee, grantor),
            routine_uuid,
            has_execute_permission: true,
        }
    }

    /// key only, nothing granted
    pub fn key_only(grantee: &str, grantor: &str, routine_uuid: Uuid) -> Self {
        RoutinePermsDescriptor {
            has_execute_permission: false,
            ..RoutinePermsDescriptor::new(grantee, grantor, routine_uuid)
        }
    }

    pub fn routine_uuid(&self) -> Uuid { self.routine_uuid }

    pub fn has_execute_permission(&self) -> bool { self.has_execute_permission }
}

impl Permissions for RoutinePermsDescriptor {
    type Key = RoutinePermsKey;

    fn key(&self) -> RoutinePermsKey {
        RoutinePermsKey {
            grantee: self.perms.grantee().to_string(),
            routine_uuid: self.routine_uuid,
        }
    }

    fn descriptor(&self) -> &PermissionsDescriptor { &self.perms }

    fn descriptor_mut(&mut self) -> &mut PermissionsDescriptor { &mut self.perms }

    fn catalog_number(&self) -> CatalogNumber { CatalogNumber::SysRoutinePerms }
}

impl_key_identity!(RoutinePermsDescriptor);

impl fmt::Display for RoutinePermsDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "routinePerms: grantee={},grantor={},routineUUID={},execute={}",
            self.perms.grantee(),
            self.perms.grantor(),
            self.routine_uuid,
            self.has_execute_permission
        )
    }
}

// A stored row always means EXECUTE is granted; GRANTOPTION is kept as "N".
impl FromDao for RoutinePermsDescriptor {
    fn from_dao(dao: &Dao) -> Result<Self, DaoError> {
        let perms = PermissionsDescriptor::from_dao(dao)?;
        let grant_option: Option<String> = dao.get_opt("GRANTOPTION")?;
        if let Some(option) = grant_option {
            if option != "N" {
                return Err(DaoError::InvalidValue {
                    column: "GRANTOPTION".to_string(),
                    reason: format!("routine grants cannot carry grant option, found {:?}", option),
                });
            }
        }
        Ok(RoutinePermsDescriptor::new(
            perms.grantee(),
            perms.grantor(),
            dao.get("ALIASID")?,
        ))
    }
}

impl ToDao for RoutinePermsDescriptor {
    fn to_dao(&self) -> Dao {
        let mut dao = Dao::new();
        self.perms.write_dao(&mut dao);
        dao.insert("ALIASID", self.routine_uuid);
        dao.insert("GRANTOPTION", "N");
        dao
    }
}

impl ToTableName for RoutinePermsDescriptor {
    fn to_table_name() -> TableName { CatalogNumber::SysRoutinePerms.table_name() }
}

impl ToColumnNames for RoutinePermsDescriptor {
    fn to_column_names() -> Vec<ColumnName> {
        ["GRANTEE", "GRANTOR", "ALIASID", "GRANTOPTION"]
            .iter()
            .map(|c| ColumnName::from(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_equality() {
        let routine = Uuid::new_v4();
        let granted = RoutinePermsDescriptor::new("ALICE", "DBA", routine);
        let key = RoutinePermsDescriptor::key_only("ALICE", "BOB", routine);
        assert!(granted.has_execute_permission());
        assert!(!key.has_execute_permission());
        assert_eq!(granted, key);
        assert_eq!(granted.key_hash_code(), key.key_hash_code());
        assert_ne!(granted, RoutinePermsDescriptor::new("BOB", "DBA", routine));
    }

    #[test]
    fn catalog_row() {
        let routine = Uuid::new_v4();
        let dao = RoutinePermsDescriptor::new("ALICE", "DBA", routine).to_dao();
        let back = RoutinePermsDescriptor::from_dao(&dao).unwrap();
        assert_eq!(back.routine_uuid(), routine);
        assert!(back.has_execute_permission());
        assert_eq!(RoutinePermsDescriptor::to_table_name().complete_name(), "SYS.SYSROUTINEPERMS");
    }

    #[test]
    fn grant_option_rejected() {
        let mut dao = RoutinePermsDescriptor::new("ALICE", "DBA", Uuid::new_v4()).to_dao();
        dao.insert("GRANTOPTION", "Y");
        assert!(RoutinePermsDescriptor::from_dao(&dao).is_err());
    }
}
