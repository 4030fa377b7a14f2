//! A data dictionary held entirely in memory.
//!
//! Rows are stored under their identity key, so a grant arriving from a
//! second grantor folds into the row the first grant created.
use crate::{
    catalog::{
        RoutineDescriptor,
        TableDescriptor,
    },
    descriptor::{
        ColPermsDescriptor,
        ColPermsKey,
        Permissions,
        RoutinePermsDescriptor,
        RoutinePermsKey,
        TablePermsDescriptor,
        TablePermsKey,
    },
    dictionary::DataDictionary,
    error::DictionaryError,
    privilege::{
        ColumnPrivilegeType,
        PrivilegeType,
    },
    util::{
        difference_into,
        set_ordinals,
        union_into,
    },
};
use bit_vec::BitVec;
use log::*;
use sqlgrant_dao::{
    FromDao,
    Rows,
};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Default, Clone)]
pub struct InMemoryDictionary {
    tables: HashMap<Uuid, TableDescriptor>,
    routines: HashMap<Uuid, RoutineDescriptor>,
    table_perms: HashMap<TablePermsKey, TablePermsDescriptor>,
    col_perms: HashMap<ColPermsKey, ColPermsDescriptor>,
    routine_perms: HashMap<RoutinePermsKey, RoutinePermsDescriptor>,
}

impl InMemoryDictionary {
    pub fn new() -> Self { InMemoryDictionary::default() }

    pub fn add_table(&mut self, table: TableDescriptor) { self.tables.insert(table.uuid, table); }

    pub fn add_routine(&mut self, routine: RoutineDescriptor) {
        self.routines.insert(routine.uuid, routine);
    }

    /// Drop a table together with every permission granted on it
    pub fn drop_table(&mut self, table_uuid: Uuid) -> Option<TableDescriptor> {
        self.table_perms.retain(|k, _| k.table_uuid != table_uuid);
        self.col_perms.retain(|k, _| k.table_uuid != table_uuid);
        self.tables.remove(&table_uuid)
    }

    pub fn drop_routine(&mut self, routine_uuid: Uuid) -> Option<RoutineDescriptor> {
        self.routine_perms.retain(|k, _| k.routine_uuid != routine_uuid);
        self.routines.remove(&routine_uuid)
    }

    fn ensure_table(&self, table_uuid: Uuid) -> Result<&TableDescriptor, DictionaryError> {
        self.tables
            .get(&table_uuid)
            .ok_or_else(|| DictionaryError::UnknownObject(format!("table {}", table_uuid)))
    }

    fn ensure_routine(&self, routine_uuid: Uuid) -> Result<(), DictionaryError> {
        if self.routines.contains_key(&routine_uuid) {
            Ok(())
        } else {
            Err(DictionaryError::UnknownObject(format!("routine {}", routine_uuid)))
        }
    }

    /// Record a table grant. Returns true if the catalog changed.
    pub fn grant_table_permissions(
        &mut self,
        perms: TablePermsDescriptor,
    ) -> Result<bool, DictionaryError> {
        self.ensure_table(perms.table_uuid())?;
        if perms.is_empty() {
            return Ok(false);
        }
        debug!("grant {}", perms);
        match self.table_perms.get_mut(&perms.key()) {
            Some(existing) => Ok(existing.grant(&perms)),
            None => {
                self.table_perms.insert(perms.key(), perms);
                Ok(true)
            }
        }
    }

    /// Remove the privileges `perms` names. A row left with
    /// nothing granted is deleted. Returns true if the catalog changed.
    pub fn revoke_table_permissions(&mut self, perms: &TablePermsDescriptor) -> bool {
        let key = perms.key();
        let (changed, now_empty) = match self.table_perms.get_mut(&key) {
            Some(existing) => (existing.revoke(perms), existing.is_empty()),
            None => return false,
        };
        if now_empty {
            self.table_perms.remove(&key);
        }
        debug!("revoke {} changed={}", perms, changed);
        changed
    }

    /// Record a column grant; the column set is added to any set
    /// already granted under the same key.
    pub fn grant_column_permissions(
        &mut self,
        perms: ColPermsDescriptor,
    ) -> Result<bool, DictionaryError> {
        let table = self.ensure_table(perms.table_uuid())?;
        let columns = match (perms.privilege_type(), perms.columns()) {
            (Some(_), Some(columns)) => columns.clone(),
            (None, _) => {
                return Err(DictionaryError::MalformedValue {
                    column: "TYPE".to_string(),
                    value: perms.to_string(),
                })
            }
            (Some(_), None) => {
                return Err(DictionaryError::MalformedValue {
                    column: "COLUMNS".to_string(),
                    value: perms.to_string(),
                })
            }
        };
        if set_ordinals(&columns).any(|i| i >= table.column_count()) {
            return Err(DictionaryError::MalformedValue {
                column: "COLUMNS".to_string(),
                value: perms.to_string(),
            });
        }
        debug!("grant {}", perms);
        match self.col_perms.get_mut(&perms.key()) {
            Some(existing) => {
                let mut merged = existing.columns().cloned().unwrap_or_else(BitVec::new);
                let changed = union_into(&mut merged, &columns);
                existing.set_columns(Some(merged));
                Ok(changed)
            }
            None if columns.none() => Ok(false),
            None => {
                self.col_perms.insert(perms.key(), perms);
                Ok(true)
            }
        }
    }

    /// Remove the named columns; a row with no column left is deleted
    pub fn revoke_column_permissions(&mut self, perms: &ColPermsDescriptor) -> bool {
        let key = perms.key();
        let revoked = match perms.columns() {
            Some(columns) => columns,
            None => return false,
        };
        let (changed, now_empty) = match self.col_perms.get_mut(&key) {
            Some(existing) => {
                let mut remaining = existing.columns().cloned().unwrap_or_else(BitVec::new);
                let changed = difference_into(&mut remaining, revoked);
                let now_empty = remaining.none();
                existing.set_columns(Some(remaining));
                (changed, now_empty)
            }
            None => return false,
        };
        if now_empty {
            self.col_perms.remove(&key);
        }
        debug!("revoke {} changed={}", perms, changed);
        changed
    }

    pub fn grant_routine_permissions(
        &mut self,
        perms: RoutinePermsDescriptor,
    ) -> Result<bool, DictionaryError> {
        self.ensure_routine(perms.routine_uuid())?;
        if !perms.has_execute_permission() || self.routine_perms.contains_key(&perms.key()) {
            return Ok(false);
        }
        debug!("grant {}", perms);
        self.routine_perms.insert(perms.key(), perms);
        Ok(true)
    }

    pub fn revoke_routine_permissions(&mut self, perms: &RoutinePermsDescriptor) -> bool {
        let removed = self.routine_perms.remove(&perms.key()).is_some();
        debug!("revoke {} changed={}", perms, removed);
        removed
    }

    /// Run `f` on a copy of the dictionary. The copy replaces the
    /// dictionary only when `f` succeeds, so a failure changes nothing.
    fn atomically<T, F>(&mut self, f: F) -> Result<T, DictionaryError>
    where
        F: FnOnce(&mut InMemoryDictionary) -> Result<T, DictionaryError>,
    {
        let mut staged = self.clone();
        let result = f(&mut staged)?;
        *self = staged;
        Ok(result)
    }

    /// Move every row held by `from` over to `to`, merging into rows `to`
    /// already holds. Either every row moves or none does.
    pub fn rename_grantee(&mut self, from: &str, to: &str) -> Result<usize, DictionaryError> {
        let renamed = self.atomically(|dd| dd.move_grantee(from, to))?;
        info!("renamed {} permission rows from {} to {}", renamed, from, to);
        Ok(renamed)
    }

    fn move_grantee(&mut self, from: &str, to: &str) -> Result<usize, DictionaryError> {
        let mut renamed = 0;

        let moved: Vec<TablePermsDescriptor> = drain_grantee(&mut self.table_perms, from);
        for mut perms in moved {
            perms.set_grantee(to);
            self.grant_table_permissions(perms)?;
            renamed += 1;
        }

        let moved: Vec<ColPermsDescriptor> = drain_grantee(&mut self.col_perms, from);
        for mut perms in moved {
            perms.set_grantee(to);
            self.grant_column_permissions(perms)?;
            renamed += 1;
        }

        let moved: Vec<RoutinePermsDescriptor> = drain_grantee(&mut self.routine_perms, from);
        for mut perms in moved {
            perms.set_grantee(to);
            self.grant_routine_permissions(perms)?;
            renamed += 1;
        }
        Ok(renamed)
    }

    /// Load SYS.SYSTABLEPERMS rows handed over by the catalog layer.
    /// A malformed row rejects the whole batch.
    pub fn load_table_permissions(&mut self, rows: &Rows) -> Result<usize, DictionaryError> {
        self.atomically(|dd| {
            let mut loaded = 0;
            for dao in rows.iter() {
                dd.grant_table_permissions(TablePermsDescriptor::from_dao(&dao)?)?;
                loaded += 1;
            }
            Ok(loaded)
        })
    }

    /// Load SYS.SYSCOLPERMS rows, all or nothing
    pub fn load_column_permissions(&mut self, rows: &Rows) -> Result<usize, DictionaryError> {
        self.atomically(|dd| {
            let mut loaded = 0;
            for dao in rows.iter() {
                dd.grant_column_permissions(ColPermsDescriptor::from_dao(&dao)?)?;
                loaded += 1;
            }
            Ok(loaded)
        })
    }

    /// Load SYS.SYSROUTINEPERMS rows, all or nothing
    pub fn load_routine_permissions(&mut self, rows: &Rows) -> Result<usize, DictionaryError> {
        self.atomically(|dd| {
            let mut loaded = 0;
            for dao in rows.iter() {
                dd.grant_routine_permissions(RoutinePermsDescriptor::from_dao(&dao)?)?;
                loaded += 1;
            }
            Ok(loaded)
        })
    }
}

fn drain_grantee<K, P>(rows: &mut HashMap<K, P>, grantee: &str) -> Vec<P>
where
    K: std::hash::Hash + Eq + Clone,
    P: Permissions,
{
    let keys: Vec<K> = rows
        .iter()
        .filter(|(_, p)| p.grantee() == grantee)
        .map(|(k, _)| k.clone())
        .collect();
    keys.iter().filter_map(|k| rows.remove(k)).collect()
}

impl DataDictionary for InMemoryDictionary {
    fn table_descriptor(
        &self,
        table_uuid: Uuid,
    ) -> Result<Option<TableDescriptor>, DictionaryError> {
        Ok(self.tables.get(&table_uuid).cloned())
    }

    fn routine_descriptor(
        &self,
        routine_uuid: Uuid,
    ) -> Result<Option<RoutineDescriptor>, DictionaryError> {
        Ok(self.routines.get(&routine_uuid).cloned())
    }

    fn table_permissions(
        &self,
        table_uuid: Uuid,
        grantee: &str,
    ) -> Result<Option<TablePermsDescriptor>, DictionaryError> {
        let key = TablePermsKey {
            grantee: grantee.to_string(),
            table_uuid,
        };
        Ok(self.table_perms.get(&key).cloned())
    }

    fn column_permissions(
        &self,
        table_uuid: Uuid,
        privilege: PrivilegeType,
        for_grant: bool,
        grantee: &str,
    ) -> Result<Option<ColPermsDescriptor>, DictionaryError> {
        let privilege_type = match ColumnPrivilegeType::new(privilege, for_grant) {
            Some(t) => t,
            None => return Ok(None),
        };
        let key = ColPermsKey {
            grantee: grantee.to_string(),
            table_uuid,
            privilege_type: Some(privilege_type),
        };
        Ok(self.col_perms.get(&key).cloned())
    }

    fn routine_permissions(
        &self,
        routine_uuid: Uuid,
        grantee: &str,
    ) -> Result<Option<RoutinePermsDescriptor>, DictionaryError> {
        let key = RoutinePermsKey {
            grantee: grantee.to_string(),
            routine_uuid,
        };
        Ok(self.routine_perms.get(&key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::privilege::GrantState;
    use sqlgrant_dao::{
        ColumnName,
        TableName,
        ToDao,
        Value,
    };

    fn orders() -> TableDescriptor {
        TableDescriptor::new(
            Uuid::new_v4(),
            TableName::from("APP.ORDERS"),
            vec![
                ColumnName::from("ID"),
                ColumnName::from("CUSTOMER"),
                ColumnName::from("AMOUNT"),
            ],
        )
    }

    fn bits(set: &[usize], len: usize) -> BitVec {
        let mut columns = BitVec::from_elem(len, false);
        for i in set {
            columns.set(*i, true);
        }
        columns
    }

    #[test]
    fn regrant_from_other_grantor_collides() {
        let table = orders();
        let uuid = table.uuid;
        let mut dd = InMemoryDictionary::new();
        dd.add_table(table);
        let first = TablePermsDescriptor::new("ALICE", "DBA", uuid)
            .with_privilege(PrivilegeType::Select, GrantState::Granted);
        let second = TablePermsDescriptor::new("ALICE", "BOB", uuid)
            .with_privilege(PrivilegeType::Select, GrantState::GrantedWithOption);
        assert!(dd.grant_table_permissions(first).unwrap());
        assert!(dd.grant_table_permissions(second).unwrap());
        assert_eq!(dd.table_perms.len(), 1);
        let row = dd.table_permissions(uuid, "ALICE").unwrap().unwrap();
        assert_eq!(row.grantor(), "DBA");
        assert_eq!(row.privilege(PrivilegeType::Select), GrantState::GrantedWithOption);
    }

    #[test]
    fn grant_on_unknown_table() {
        let mut dd = InMemoryDictionary::new();
        let perms = TablePermsDescriptor::new("ALICE", "DBA", Uuid::new_v4())
            .with_privilege(PrivilegeType::Select, GrantState::Granted);
        assert!(matches!(
            dd.grant_table_permissions(perms),
            Err(DictionaryError::UnknownObject(_))
        ));
    }

    #[test]
    fn revoke_removes_empty_rows() {
        let table = orders();
        let uuid = table.uuid;
        let mut dd = InMemoryDictionary::new();
        dd.add_table(table);
        let perms = TablePermsDescriptor::new("ALICE", "DBA", uuid)
            .with_privilege(PrivilegeType::Insert, GrantState::Granted);
        dd.grant_table_permissions(perms.clone()).unwrap();
        assert!(dd.revoke_table_permissions(&perms));
        assert!(!dd.revoke_table_permissions(&perms));
        assert_eq!(dd.table_permissions(uuid, "ALICE").unwrap(), None);
    }

    #[test]
    fn column_grants_accumulate() {
        let table = orders();
        let uuid = table.uuid;
        let mut dd = InMemoryDictionary::new();
        dd.add_table(table);
        let select = ColumnPrivilegeType::new(PrivilegeType::Select, false);
        let first = ColPermsDescriptor::new("ALICE", "DBA", uuid, select, bits(&[0], 3));
        let second = ColPermsDescriptor::new("ALICE", "BOB", uuid, select, bits(&[2], 3));
        dd.grant_column_permissions(first).unwrap();
        dd.grant_column_permissions(second).unwrap();
        let row = dd
            .column_permissions(uuid, PrivilegeType::Select, false, "ALICE")
            .unwrap()
            .unwrap();
        assert!(row.covers(0));
        assert!(!row.covers(1));
        assert!(row.covers(2));
        assert_eq!(
            dd.column_permissions(uuid, PrivilegeType::Select, true, "ALICE").unwrap(),
            None
        );
        assert_eq!(
            dd.column_permissions(uuid, PrivilegeType::Insert, false, "ALICE").unwrap(),
            None
        );

        let both = ColPermsDescriptor::new("ALICE", "DBA", uuid, select, bits(&[0, 2], 3));
        assert!(dd.revoke_column_permissions(&both));
        assert_eq!(
            dd.column_permissions(uuid, PrivilegeType::Select, false, "ALICE").unwrap(),
            None
        );
    }

    #[test]
    fn column_grant_needs_type_and_known_columns() {
        let table = orders();
        let uuid = table.uuid;
        let mut dd = InMemoryDictionary::new();
        dd.add_table(table);
        let untyped = ColPermsDescriptor::new("ALICE", "DBA", uuid, None, bits(&[0], 3));
        assert!(matches!(
            dd.grant_column_permissions(untyped),
            Err(DictionaryError::MalformedValue { ref column, .. }) if column == "TYPE"
        ));
        let select = ColumnPrivilegeType::new(PrivilegeType::Select, false);
        let no_columns = ColPermsDescriptor::key_only("ALICE", "DBA", uuid, select);
        assert!(matches!(
            dd.grant_column_permissions(no_columns),
            Err(DictionaryError::MalformedValue { ref column, .. }) if column == "COLUMNS"
        ));
        let too_wide = ColPermsDescriptor::new("ALICE", "DBA", uuid, select, bits(&[5], 6));
        assert!(dd.grant_column_permissions(too_wide).is_err());
        // trailing unset bits beyond the table are harmless
        let padded = ColPermsDescriptor::new("ALICE", "DBA", uuid, select, bits(&[1], 6));
        assert!(dd.grant_column_permissions(padded).unwrap());
    }

    #[test]
    fn rename_merges_rows() {
        let table = orders();
        let uuid = table.uuid;
        let mut dd = InMemoryDictionary::new();
        dd.add_table(table);
        dd.grant_table_permissions(
            TablePermsDescriptor::new("ALICE", "DBA", uuid)
                .with_privilege(PrivilegeType::Select, GrantState::Granted),
        )
        .unwrap();
        dd.grant_table_permissions(
            TablePermsDescriptor::new("CAROL", "DBA", uuid)
                .with_privilege(PrivilegeType::Delete, GrantState::GrantedWithOption),
        )
        .unwrap();
        assert_eq!(dd.rename_grantee("ALICE", "CAROL").unwrap(), 1);
        assert_eq!(dd.table_permissions(uuid, "ALICE").unwrap(), None);
        let carol = dd.table_permissions(uuid, "CAROL").unwrap().unwrap();
        assert_eq!(carol.privilege(PrivilegeType::Select), GrantState::Granted);
        assert_eq!(carol.privilege(PrivilegeType::Delete), GrantState::GrantedWithOption);
    }

    #[test]
    fn drop_table_drops_permissions() {
        let table = orders();
        let uuid = table.uuid;
        let mut dd = InMemoryDictionary::new();
        dd.add_table(table);
        dd.grant_table_permissions(
            TablePermsDescriptor::new("ALICE", "DBA", uuid)
                .with_privilege(PrivilegeType::Select, GrantState::Granted),
        )
        .unwrap();
        assert!(dd.drop_table(uuid).is_some());
        assert_eq!(dd.table_descriptor(uuid).unwrap(), None);
        assert_eq!(dd.table_permissions(uuid, "ALICE").unwrap(), None);
    }

    #[test]
    fn load_rows_from_catalog() {
        let table = orders();
        let uuid = table.uuid;
        let mut dd = InMemoryDictionary::new();
        dd.add_table(table);
        let mut rows = Rows::new(vec![
            "GRANTEE".to_string(),
            "GRANTOR".to_string(),
            "TABLEID".to_string(),
            "SELECTPRIV".to_string(),
        ]);
        rows.push(vec!["ALICE".into(), "DBA".into(), uuid.into(), "y".into()]);
        rows.push(vec!["PUBLIC".into(), "DBA".into(), uuid.into(), Value::Nil]);
        assert_eq!(dd.load_table_permissions(&rows).unwrap(), 2);
        let alice = dd.table_permissions(uuid, "ALICE").unwrap().unwrap();
        assert_eq!(alice.privilege(PrivilegeType::Select), GrantState::Granted);
        // a row granting nothing is not kept
        assert_eq!(dd.table_permissions(uuid, "PUBLIC").unwrap(), None);

        let routine = RoutineDescriptor::new(
            Uuid::new_v4(),
            TableName::from("APP.TOTAL"),
            crate::catalog::RoutineKind::Function,
        );
        let routine_uuid = routine.uuid;
        dd.add_routine(routine);
        let dao = RoutinePermsDescriptor::new("ALICE", "DBA", routine_uuid).to_dao();
        let mut rows = Rows::new(dao.0.keys().cloned().collect());
        rows.push(dao.0.values().cloned().collect());
        assert_eq!(dd.load_routine_permissions(&rows).unwrap(), 1);
        assert!(dd.routine_permissions(routine_uuid, "ALICE").unwrap().is_some());
    }

    #[test]
    fn load_rejects_malformed_rows() {
        let mut dd = InMemoryDictionary::new();
        let mut rows = Rows::new(vec!["GRANTEE".to_string()]);
        rows.push(vec!["ALICE".into()]);
        assert!(matches!(
            dd.load_table_permissions(&rows),
            Err(DictionaryError::DaoError(_))
        ));
    }

    #[test]
    fn failed_rename_changes_nothing() {
        let table = orders();
        let uuid = table.uuid;
        let mut dd = InMemoryDictionary::new();
        dd.add_table(table);
        dd.grant_table_permissions(
            TablePermsDescriptor::new("ALICE", "DBA", uuid)
                .with_privilege(PrivilegeType::Select, GrantState::Granted),
        )
        .unwrap();
        let update = ColumnPrivilegeType::new(PrivilegeType::Update, false);
        let amount = ColPermsDescriptor::new("ALICE", "DBA", uuid, update, bits(&[2], 3));
        dd.grant_column_permissions(amount).unwrap();
        // the table shrinks, so column 2 can no longer be granted to anyone
        dd.add_table(TableDescriptor::new(
            uuid,
            TableName::from("APP.ORDERS"),
            vec![ColumnName::from("ID"), ColumnName::from("CUSTOMER")],
        ));

        assert!(matches!(
            dd.rename_grantee("ALICE", "CAROL"),
            Err(DictionaryError::MalformedValue { .. })
        ));
        assert!(dd.table_permissions(uuid, "ALICE").unwrap().is_some());
        assert_eq!(dd.table_permissions(uuid, "CAROL").unwrap(), None);
        let alice = dd
            .column_permissions(uuid, PrivilegeType::Update, false, "ALICE")
            .unwrap()
            .unwrap();
        assert!(alice.covers(2));
        assert_eq!(
            dd.column_permissions(uuid, PrivilegeType::Update, false, "CAROL").unwrap(),
            None
        );
    }

    #[test]
    fn rename_of_unknown_grantee() {
        let mut dd = InMemoryDictionary::new();
        assert_eq!(dd.rename_grantee("NOBODY", "CAROL").unwrap(), 0);
    }

    #[test]
    fn malformed_row_rejects_whole_batch() {
        let table = orders();
        let uuid = table.uuid;
        let mut dd = InMemoryDictionary::new();
        dd.add_table(table);
        let mut rows = Rows::new(vec![
            "GRANTEE".to_string(),
            "GRANTOR".to_string(),
            "TABLEID".to_string(),
            "SELECTPRIV".to_string(),
        ]);
        rows.push(vec!["ALICE".into(), "DBA".into(), uuid.into(), "Y".into()]);
        rows.push(vec!["BOB".into(), "DBA".into(), "not-a-uuid".into(), "y".into()]);
        rows.push(vec!["CAROL".into(), "DBA".into(), uuid.into(), "y".into()]);
        assert!(matches!(
            dd.load_table_permissions(&rows),
            Err(DictionaryError::DaoError(_))
        ));
        assert_eq!(dd.table_permissions(uuid, "ALICE").unwrap(), None);
        assert_eq!(dd.table_permissions(uuid, "CAROL").unwrap(), None);
        assert!(dd.table_perms.is_empty());

        let mut rows = Rows::new(vec![
            "GRANTEE".to_string(),
            "GRANTOR".to_string(),
            "TABLEID".to_string(),
            "TYPE".to_string(),
            "COLUMNS".to_string(),
        ]);
        rows.push(vec!["ALICE".into(), "DBA".into(), uuid.into(), "S".into(), "011".into()]);
        rows.push(vec!["BOB".into(), "DBA".into(), uuid.into(), "S".into(), "0001".into()]);
        assert!(matches!(
            dd.load_column_permissions(&rows),
            Err(DictionaryError::MalformedValue { .. })
        ));
        assert!(dd.col_perms.is_empty());
    }

    #[test]
    fn dictionary_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InMemoryDictionary>();
    }
}
