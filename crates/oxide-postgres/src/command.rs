//! Schema commands issued against a blueprint.

use serde::{Deserialize, Serialize};

use crate::schema::{ColumnDefinition, ForeignKeyAction};

/// Parameters shared by index-like commands.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexCommand {
    /// Index or constraint name.
    pub index: String,
    /// Indexed columns.
    pub columns: Vec<String>,
    /// Index method (e.g. `btree`, `hash`).
    pub algorithm: Option<String>,
    /// Full-text language, `english` when unset.
    pub language: Option<String>,
    /// `deferrable` / `not deferrable` for unique constraints.
    pub deferrable: Option<bool>,
    /// `initially immediate` / `initially deferred`, only honoured together
    /// with `deferrable`.
    pub initially_immediate: Option<bool>,
}

impl IndexCommand {
    /// Creates an index command.
    #[must_use]
    pub fn new<S: Into<String>>(
        index: impl Into<String>,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            index: index.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the index method.
    #[must_use]
    pub fn algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    /// Sets the full-text language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the deferrable flag.
    #[must_use]
    pub const fn deferrable(mut self, deferrable: bool) -> Self {
        self.deferrable = Some(deferrable);
        self
    }

    /// Sets the initially immediate flag.
    #[must_use]
    pub const fn initially_immediate(mut self, immediate: bool) -> Self {
        self.initially_immediate = Some(immediate);
        self
    }
}

/// Parameters of a foreign key command.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ForeignKeyCommand {
    /// Constraint name.
    pub index: String,
    /// Referencing columns.
    pub columns: Vec<String>,
    /// Referenced table.
    pub on: String,
    /// Referenced columns.
    pub references: Vec<String>,
    /// Action on delete.
    pub on_delete: Option<ForeignKeyAction>,
    /// Action on update.
    pub on_update: Option<ForeignKeyAction>,
}

impl ForeignKeyCommand {
    /// Creates a foreign key from `columns` to `on(references)`.
    #[must_use]
    pub fn new<S: Into<String>, R: Into<String>>(
        index: impl Into<String>,
        columns: impl IntoIterator<Item = S>,
        on: impl Into<String>,
        references: impl IntoIterator<Item = R>,
    ) -> Self {
        Self {
            index: index.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            on: on.into(),
            references: references.into_iter().map(Into::into).collect(),
            on_delete: None,
            on_update: None,
        }
    }

    /// Sets the ON DELETE action.
    #[must_use]
    pub const fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    /// Sets the ON UPDATE action.
    #[must_use]
    pub const fn on_update(mut self, action: ForeignKeyAction) -> Self {
        self.on_update = Some(action);
        self
    }
}

/// A single schema operation on a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Add a column.
    Add(ColumnDefinition),
    /// Alter an existing column.
    Change(ColumnDefinition),
    /// Set or clear a column comment.
    Comment(ColumnDefinition),
    /// Create the table from the blueprint's columns.
    Create,
    /// Defaults are compiled inline; this command emits nothing.
    Default,
    /// Drop the table.
    Drop,
    /// Drop the table if it exists.
    DropIfExists,
    /// Drop columns.
    DropColumn {
        /// Columns to drop.
        columns: Vec<String>,
    },
    /// Drop a foreign key constraint.
    DropForeign {
        /// Constraint name.
        index: String,
    },
    /// Drop a full-text index.
    DropFullText {
        /// Index name.
        index: String,
    },
    /// Drop an index.
    DropIndex {
        /// Index name.
        index: String,
    },
    /// Drop the primary key constraint.
    DropPrimary,
    /// Drop a unique constraint.
    DropUnique {
        /// Constraint name.
        index: String,
    },
    /// Add a foreign key constraint.
    Foreign(ForeignKeyCommand),
    /// Create a full-text index.
    FullText(IndexCommand),
    /// Create an index.
    Index(IndexCommand),
    /// Add a primary key.
    Primary(IndexCommand),
    /// Rename the table.
    Rename {
        /// New table name.
        to: String,
    },
    /// Rename a column.
    RenameColumn {
        /// Current name.
        from: String,
        /// New name.
        to: String,
    },
    /// Rename an index.
    RenameIndex {
        /// Current name.
        from: String,
        /// New name.
        to: String,
    },
    /// Set or clear the table comment.
    TableComment {
        /// Comment text, `None` clears it.
        value: Option<String>,
    },
    /// Add a unique constraint.
    Unique(IndexCommand),
}

impl Command {
    /// Returns the command name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Change(_) => "change",
            Self::Comment(_) => "comment",
            Self::Create => "create",
            Self::Default => "default",
            Self::Drop => "drop",
            Self::DropIfExists => "dropIfExists",
            Self::DropColumn { .. } => "dropColumn",
            Self::DropForeign { .. } => "dropForeign",
            Self::DropFullText { .. } => "dropFullText",
            Self::DropIndex { .. } => "dropIndex",
            Self::DropPrimary => "dropPrimary",
            Self::DropUnique { .. } => "dropUnique",
            Self::Foreign(_) => "foreign",
            Self::FullText(_) => "fullText",
            Self::Index(_) => "index",
            Self::Primary(_) => "primary",
            Self::Rename { .. } => "rename",
            Self::RenameColumn { .. } => "renameColumn",
            Self::RenameIndex { .. } => "renameIndex",
            Self::TableComment { .. } => "tableComment",
            Self::Unique(_) => "unique",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_command_builder() {
        let command = IndexCommand::new("users_email_unique", ["email"])
            .deferrable(true)
            .initially_immediate(false);

        assert_eq!(command.columns, vec!["email".to_string()]);
        assert_eq!(command.deferrable, Some(true));
        assert_eq!(command.initially_immediate, Some(false));
        assert!(command.algorithm.is_none());
    }

    #[test]
    fn test_foreign_key_builder() {
        let command = ForeignKeyCommand::new("fk_user", ["user_id"], "users", ["id"])
            .on_delete(ForeignKeyAction::Cascade);

        assert_eq!(command.on, "users");
        assert_eq!(command.on_delete, Some(ForeignKeyAction::Cascade));
        assert!(command.on_update.is_none());
    }

    #[test]
    fn test_command_name() {
        assert_eq!(Command::Primary(IndexCommand::default()).name(), "primary");
        assert_eq!(Command::DropIfExists.name(), "dropIfExists");
    }
}
