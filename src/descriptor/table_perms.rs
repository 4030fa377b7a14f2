use super::{
    CatalogNumber,
    Permissions,
    PermissionsDescriptor,
};
use crate::privilege::{
    GrantState,
    PrivilegeType,
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
pub struct TablePermsKey {
    pub grantee: String,
    pub table_uuid: Uuid,
}

/// The table privileges one grantee holds on one table,
/// a row of SYS.SYSTABLEPERMS.
#[derive(Debug, Clone)]
pub struct TablePermsDescriptor {
    perms: PermissionsDescriptor,
    table_uuid: Uuid,
    select_priv: GrantState,
    update_priv: GrantState,
    references_priv: GrantState,
    insert_priv: GrantState,
    delete_priv: GrantState,
    trigger_priv: GrantState,
}

impl TablePermsDescriptor {
    /// A row with nothing granted yet, also usable as a lookup key
    pub fn new(grantee: &str, grantor: &str, table_uuid: Uuid) -> Self {
        TablePermsDescriptor {
            perms: PermissionsDescriptor::new(grantee, grantor),
            table_uuid,
            select_priv: GrantState::NotGranted,
            update_priv: GrantState::NotGranted,
            references_priv: GrantState::NotGranted,
            insert_priv: GrantState::NotGranted,
            delete_priv: GrantState::NotGranted,
            trigger_priv: GrantState::NotGranted,
        }
    }

    pub fn with_privilege(mut self, privilege: PrivilegeType, state: GrantState) -> Self {
        self.set_privilege(privilege, state);
        self
    }

    pub fn table_uuid(&self) -> Uuid { self.table_uuid }

    pub fn privilege(&self, privilege: PrivilegeType) -> GrantState {
        match privilege {
            PrivilegeType::Select => self.select_priv,
            PrivilegeType::Update => self.update_priv,
            PrivilegeType::References => self.references_priv,
            PrivilegeType::Insert => self.insert_priv,
            PrivilegeType::Delete => self.delete_priv,
            PrivilegeType::Trigger => self.trigger_priv,
        }
    }

    fn privilege_mut(&mut self, privilege: PrivilegeType) -> &mut GrantState {
        match privilege {
            PrivilegeType::Select => &mut self.select_priv,
            PrivilegeType::Update => &mut self.update_priv,
            PrivilegeType::References => &mut self.references_priv,
            PrivilegeType::Insert => &mut self.insert_priv,
            PrivilegeType::Delete => &mut self.delete_priv,
            PrivilegeType::Trigger => &mut self.trigger_priv,
        }
    }

    pub fn set_privilege(&mut self, privilege: PrivilegeType, state: GrantState) {
        *self.privilege_mut(privilege) = state;
    }

    /// The catalog marker of a privilege: `"Y"`, `"y"` or absent
    pub fn privilege_marker(&self, privilege: PrivilegeType) -> Option<&'static str> {
        self.privilege(privilege).to_catalog()
    }

    /// Fold another grant to the same key into this row.
    /// Returns true if any state changed.
    pub fn grant(&mut self, other: &TablePermsDescriptor) -> bool {
        let mut changed = false;
        for privilege in PrivilegeType::ALL.iter().copied() {
            let current = self.privilege(privilege);
            let merged = current.merge(other.privilege(privilege));
            if merged != current {
                self.set_privilege(privilege, merged);
                changed = true;
            }
        }
        changed
    }

    /// Clear every privilege `other` holds.
    /// Returns true if any state changed.
    pub fn revoke(&mut self, other: &TablePermsDescriptor) -> bool {
        let mut changed = false;
        for privilege in PrivilegeType::ALL.iter().copied() {
            if other.privilege(privilege).is_granted() && self.privilege(privilege).is_granted() {
                self.set_privilege(privilege, GrantState::NotGranted);
                changed = true;
            }
        }
        changed
    }

    /// true when the row grants nothing and can be dropped
    pub fn is_empty(&self) -> bool {
        PrivilegeType::ALL
            .iter()
            .all(|p| !self.privilege(*p).is_granted())
    }
}

impl Permissions for TablePermsDescriptor {
    type Key = TablePermsKey;

    fn key(&self) -> TablePermsKey {
        TablePermsKey {
            grantee: self.perms.grantee().to_string(),
            table_uuid: self.table_uuid,
        }
    }

    fn descriptor(&self) -> &PermissionsDescriptor { &self.perms }

    fn descriptor_mut(&mut self) -> &mut PermissionsDescriptor { &mut self.perms }

    fn catalog_number(&self) -> CatalogNumber { CatalogNumber::SysTablePerms }
}

impl_key_identity!(TablePermsDescriptor);

impl fmt::Display for TablePermsDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "tablePerms: grantee={},grantor={},tableUUID={}",
            self.perms.grantee(),
            self.perms.grantor(),
            self.table_uuid
        )?;
        for privilege in PrivilegeType::ALL.iter() {
            write!(
                f,
                ",{}Priv={}",
                privilege.name(),
                self.privilege_marker(*privilege).unwrap_or("N")
            )?;
        }
        Ok(())
    }
}

impl FromDao for TablePermsDescriptor {
    fn from_dao(dao: &Dao) -> Result<Self, DaoError> {
        let perms = PermissionsDescriptor::from_dao(dao)?;
        let mut descriptor =
            TablePermsDescriptor::new(perms.grantee(), perms.grantor(), dao.get("TABLEID")?);
        for privilege in PrivilegeType::ALL.iter().copied() {
            let marker: Option<String> = dao.get_opt(privilege.table_perms_column())?;
            descriptor.set_privilege(privilege, GrantState::from_catalog(marker.as_deref()));
        }
        Ok(descriptor)
    }
}

impl ToDao for TablePermsDescriptor {
    fn to_dao(&self) -> Dao {
        let mut dao = Dao::new();
        self.perms.write_dao(&mut dao);
        dao.insert("TABLEID", self.table_uuid);
        for privilege in PrivilegeType::ALL.iter().copied() {
            // the catalog stores "N" rather than NULL for a missing privilege
            dao.insert(
                privilege.table_perms_column(),
                self.privilege_marker(privilege).unwrap_or("N"),
            );
        }
        dao
    }
}

impl ToTableName for TablePermsDescriptor {
    fn to_table_name() -> TableName { CatalogNumber::SysTablePerms.table_name() }
}

impl ToColumnNames for TablePermsDescriptor {
    fn to_column_names() -> Vec<ColumnName> {
        let mut columns = vec![
            ColumnName::from("GRANTEE"),
            ColumnName::from("GRANTOR"),
            ColumnName::from("TABLEID"),
        ];
        columns.extend(
            PrivilegeType::ALL
                .iter()
                .map(|p| ColumnName::from(p.table_perms_column())),
        );
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgrant_dao::Value;

    #[test]
    fn key_ignores_grantor_and_states() {
        let table = Uuid::new_v4();
        let a = TablePermsDescriptor::new("ALICE", "DBA", table)
            .with_privilege(PrivilegeType::Select, GrantState::Granted);
        let b = TablePermsDescriptor::new("ALICE", "BOB", table);
        assert!(a.key_equals(&b));
        assert_eq!(a.key_hash_code(), b.key_hash_code());
        assert_eq!(a, b);
        assert_ne!(a, TablePermsDescriptor::new("ALICE", "DBA", Uuid::new_v4()));
    }

    #[test]
    fn grant_upgrades_and_revoke_clears() {
        let table = Uuid::new_v4();
        let mut row = TablePermsDescriptor::new("ALICE", "DBA", table)
            .with_privilege(PrivilegeType::Select, GrantState::Granted);
        let regrant = TablePermsDescriptor::new("ALICE", "BOB", table)
            .with_privilege(PrivilegeType::Select, GrantState::GrantedWithOption)
            .with_privilege(PrivilegeType::Insert, GrantState::Granted);
        assert!(row.grant(&regrant));
        assert!(!row.grant(&regrant));
        assert_eq!(row.privilege(PrivilegeType::Select), GrantState::GrantedWithOption);
        assert_eq!(row.privilege_marker(PrivilegeType::Select), Some("Y"));
        assert_eq!(row.privilege_marker(PrivilegeType::Insert), Some("y"));

        let revoke = TablePermsDescriptor::new("ALICE", "DBA", table)
            .with_privilege(PrivilegeType::Select, GrantState::Granted);
        assert!(row.revoke(&revoke));
        assert_eq!(row.privilege(PrivilegeType::Select), GrantState::NotGranted);
        assert!(!row.is_empty());
        assert!(row.revoke(&regrant));
        assert!(row.is_empty());
    }

    #[test]
    fn from_catalog_row() {
        let table = Uuid::new_v4();
        let mut dao = Dao::new();
        dao.insert("GRANTEE", "ALICE");
        dao.insert("GRANTOR", "DBA");
        dao.insert("TABLEID", table.to_string());
        dao.insert("SELECTPRIV", "y");
        dao.insert("DELETEPRIV", "Y");
        dao.insert("INSERTPRIV", "N");
        dao.insert_value("UPDATEPRIV", &Value::Nil);
        let row = TablePermsDescriptor::from_dao(&dao).unwrap();
        assert_eq!(row.table_uuid(), table);
        assert_eq!(row.grantor(), "DBA");
        assert_eq!(row.privilege(PrivilegeType::Select), GrantState::Granted);
        assert_eq!(row.privilege(PrivilegeType::Delete), GrantState::GrantedWithOption);
        assert_eq!(row.privilege(PrivilegeType::Insert), GrantState::NotGranted);
        assert_eq!(row.privilege(PrivilegeType::Update), GrantState::NotGranted);
        assert_eq!(row.privilege(PrivilegeType::Trigger), GrantState::NotGranted);
    }

    #[test]
    fn to_catalog_row() {
        let table = Uuid::new_v4();
        let row = TablePermsDescriptor::new("ALICE", "DBA", table)
            .with_privilege(PrivilegeType::Trigger, GrantState::GrantedWithOption);
        let dao = row.to_dao();
        assert_eq!(dao.get::<String>("TRIGGERPRIV").unwrap(), "Y");
        assert_eq!(dao.get::<String>("SELECTPRIV").unwrap(), "N");
        let back = TablePermsDescriptor::from_dao(&dao).unwrap();
        assert_eq!(back.privilege(PrivilegeType::Trigger), GrantState::GrantedWithOption);
        assert_eq!(TablePermsDescriptor::to_column_names().len(), dao.0.len());
    }

    #[test]
    fn missing_table_id() {
        let mut dao = Dao::new();
        dao.insert("GRANTEE", "ALICE");
        dao.insert("GRANTOR", "DBA");
        assert_eq!(
            TablePermsDescriptor::from_dao(&dao).err(),
            Some(DaoError::NoSuchValueError("TABLEID".into()))
        );
    }

    #[test]
    fn diagnostic_form() {
        let table = Uuid::nil();
        let row = TablePermsDescriptor::new("ALICE", "DBA", table)
            .with_privilege(PrivilegeType::Select, GrantState::Granted);
        assert!(row
            .to_string()
            .starts_with("tablePerms: grantee=ALICE,grantor=DBA,tableUUID=00000000"));
        assert!(row.to_string().contains(",selectPriv=y,updatePriv=N"));
    }
}
