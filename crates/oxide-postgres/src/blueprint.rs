//! The table blueprint read by the grammar.

use crate::command::Command;
use crate::schema::ColumnDefinition;

/// Read-only view of a table under construction.
///
/// The grammar only goes through these accessors, so schema builders may
/// keep their own representation.
pub trait Blueprint {
    /// Returns the unprefixed table name.
    fn table(&self) -> &str;

    /// Returns the columns added by this blueprint, in declaration order.
    fn added_columns(&self) -> &[ColumnDefinition];

    /// Returns the pending commands.
    fn commands(&self) -> &[Command];

    /// Returns whether a command with the given name is pending.
    fn has_command(&self, name: &str) -> bool {
        self.commands().iter().any(|command| command.name() == name)
    }
}

/// A plain in-memory blueprint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableBlueprint {
    table: String,
    columns: Vec<ColumnDefinition>,
    commands: Vec<Command>,
}

impl TableBlueprint {
    /// Creates an empty blueprint for `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds a pending command.
    #[must_use]
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }
}

impl Blueprint for TableBlueprint {
    fn table(&self) -> &str {
        &self.table
    }

    fn added_columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    fn commands(&self) -> &[Command] {
        &self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::IndexCommand;
    use crate::schema::ColumnType;

    #[test]
    fn test_has_command() {
        let blueprint = TableBlueprint::new("users")
            .column(ColumnDefinition::new("id", ColumnType::Integer))
            .command(Command::Primary(IndexCommand::new("users_pkey", ["id"])));

        assert_eq!(blueprint.table(), "users");
        assert_eq!(blueprint.added_columns().len(), 1);
        assert!(blueprint.has_command("primary"));
        assert!(!blueprint.has_command("unique"));
    }
}
