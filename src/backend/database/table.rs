use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Native representation of the primary key column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    SmallInt,
    #[default]
    Int,
    BigInt,
    Uuid,
    Text,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::SmallInt => "smallint",
            KeyType::Int => "int",
            KeyType::BigInt => "bigint",
            KeyType::Uuid => "uuid",
            KeyType::Text => "text",
        }
    }
}

/// Table and column names the repository runs against
///
/// The schema is owned elsewhere; these names are taken as given and only
/// quoted, never inferred.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserTable {
    #[serde(default = "default_table_name")]
    pub name: String,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default = "default_name_column")]
    pub name_column: String,
    #[serde(default = "default_email_column")]
    pub email_column: String,
    #[serde(default)]
    pub id_type: KeyType,
}

fn default_table_name() -> String {
    "users".to_string()
}

fn default_id_column() -> String {
    "id".to_string()
}

fn default_name_column() -> String {
    "name".to_string()
}

fn default_email_column() -> String {
    "email".to_string()
}

impl Default for UserTable {
    fn default() -> Self {
        Self {
            name: default_table_name(),
            id_column: default_id_column(),
            name_column: default_name_column(),
            email_column: default_email_column(),
            id_type: KeyType::default(),
        }
    }
}

impl UserTable {
    pub fn new(name: impl Into<String>, id_type: KeyType) -> Self {
        Self {
            name: name.into(),
            id_type,
            ..Self::default()
        }
    }

    pub fn with_columns(
        mut self,
        id_column: impl Into<String>,
        name_column: impl Into<String>,
        email_column: impl Into<String>,
    ) -> Self {
        self.id_column = id_column.into();
        self.name_column = name_column.into();
        self.email_column = email_column.into();
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        let identifiers = [
            ("table name", &self.name),
            ("id column", &self.id_column),
            ("name column", &self.name_column),
            ("email column", &self.email_column),
        ];

        for (what, ident) in identifiers {
            if ident.trim().is_empty() {
                return Err(AppError::Configuration(format!("{} cannot be empty", what)));
            }
            if ident.contains('\0') {
                return Err(AppError::Configuration(format!(
                    "{} contains a NUL character",
                    what
                )));
            }
        }

        Ok(())
    }
}
