use super::{
    CatalogNumber,
    Permissions,
    PermissionsDescriptor,
};
use crate::{
    privilege::ColumnPrivilegeType,
    util::format_column_set,
};
use bit_vec::BitVec;
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
pub struct ColPermsKey {
    pub grantee: String,
    pub table_uuid: Uuid,
    pub privilege_type: Option<ColumnPrivilegeType>,
}

/// A row of SYS.SYSCOLPERMS: the columns of one table on which a grantee
/// holds one privilege type. Column ordinals are zero based.
#[derive(Debug, Clone)]
pub struct ColPermsDescriptor {
    perms: PermissionsDescriptor,
    table_uuid: Uuid,
    privilege_type: Option<ColumnPrivilegeType>,
    columns: Option<BitVec>,
}

impl ColPermsDescriptor {
    pub fn new(
        grantee: &str,
        grantor: &str,
        table_uuid: Uuid,
        privilege_type: Option<ColumnPrivilegeType>,
        columns: BitVec,
    ) -> Self {
        ColPermsDescriptor {
            columns: Some(columns),
            ..ColPermsDescriptor::key_only(grantee, grantor, table_uuid, privilege_type)
        }
    }

    /// Only the key fields; the column set is left unset.
    /// Used to look up or delete a row.
    pub fn key_only(
        grantee: &str,
        grantor: &str,
        table_uuid: Uuid,
        privilege_type: Option<ColumnPrivilegeType>,
    ) -> Self {
        ColPermsDescriptor {
            perms: PermissionsDescriptor::new(grantee, grantor),
            table_uuid,
            privilege_type,
            columns: None,
        }
    }

    pub fn table_uuid(&self) -> Uuid { self.table_uuid }

    pub fn privilege_type(&self) -> Option<ColumnPrivilegeType> { self.privilege_type }

    pub fn columns(&self) -> Option<&BitVec> { self.columns.as_ref() }

    pub fn set_columns(&mut self, columns: Option<BitVec>) { self.columns = columns; }

    /// whether column ordinal `column` is covered by this row
    pub fn covers(&self, column: usize) -> bool {
        self.columns
            .as_ref()
            .and_then(|c| c.get(column))
            .unwrap_or(false)
    }
}

impl Permissions for ColPermsDescriptor {
    type Key = ColPermsKey;

    fn key(&self) -> ColPermsKey {
        ColPermsKey {
            grantee: self.perms.grantee().to_string(),
            table_uuid: self.table_uuid,
            privilege_type: self.privilege_type,
        }
    }

    fn descriptor(&self) -> &PermissionsDescriptor { &self.perms }

    fn descriptor_mut(&mut self) -> &mut PermissionsDescriptor { &mut self.perms }

    fn catalog_number(&self) -> CatalogNumber { CatalogNumber::SysColPerms }
}

impl_key_identity!(ColPermsDescriptor);

impl fmt::Display for ColPermsDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let privilege_type = match self.privilege_type {
            Some(t) => t.to_string(),
            None => "null".to_string(),
        };
        let columns = match self.columns {
            Some(ref c) => format_column_set(c),
            None => "null".to_string(),
        };
        write!(
            f,
            "colPerms: grantee={},grantor={},tableUUID={},type={},columns={}",
            self.perms.grantee(),
            self.perms.grantor(),
            self.table_uuid,
            privilege_type,
            columns
        )
    }
}

/// Column sets are stored as a string of `0`/`1`, one per column ordinal
fn encode_column_set(columns: &BitVec) -> String {
    columns.iter().map(|bit| if bit { '1' } else { '0' }).collect()
}

fn decode_column_set(encoded: &str) -> Result<BitVec, DaoError> {
    let mut columns = BitVec::with_capacity(encoded.len());
    for c in encoded.chars() {
        match c {
            '1' => columns.push(true),
            '0' => columns.push(false),
            _ => {
                return Err(DaoError::InvalidValue {
                    column: "COLUMNS".to_string(),
                    reason: format!("unexpected {:?} in column set {:?}", c, encoded),
                })
            }
        }
    }
    Ok(columns)
}

impl FromDao for ColPermsDescriptor {
    fn from_dao(dao: &Dao) -> Result<Self, DaoError> {
        let perms = PermissionsDescriptor::from_dao(dao)?;
        let privilege_type = match dao.get_opt::<String>("TYPE")? {
            Some(marker) => {
                Some(marker.parse::<ColumnPrivilegeType>().map_err(|reason| {
                    DaoError::InvalidValue {
                        column: "TYPE".to_string(),
                        reason,
                    }
                })?)
            }
            None => None,
        };
        let columns = match dao.get_opt::<String>("COLUMNS")? {
            Some(encoded) => Some(decode_column_set(&encoded)?),
            None => None,
        };
        Ok(ColPermsDescriptor {
            perms,
            table_uuid: dao.get("TABLEID")?,
            privilege_type,
            columns,
        })
    }
}

impl ToDao for ColPermsDescriptor {
    fn to_dao(&self) -> Dao {
        let mut dao = Dao::new();
        self.perms.write_dao(&mut dao);
        dao.insert("TABLEID", self.table_uuid);
        dao.insert("TYPE", self.privilege_type.map(|t| t.to_string()));
        dao.insert("COLUMNS", self.columns.as_ref().map(encode_column_set));
        dao
    }
}

impl ToTableName for ColPermsDescriptor {
    fn to_table_name() -> TableName { CatalogNumber::SysColPerms.table_name() }
}

impl ToColumnNames for ColPermsDescriptor {
    fn to_column_names() -> Vec<ColumnName> {
        ["GRANTEE", "GRANTOR", "TABLEID", "TYPE", "COLUMNS"]
            .iter()
            .map(|c| ColumnName::from(c))
            .collect()
    }
}
