use sea_orm::sea_query::{Alias, ColumnRef, IntoColumnRef};
use serde::{Deserialize, Serialize};

/// Static configuration describing where a model's hierarchy lives: the entity
/// table, its primary key, and the closure table with its columns.
///
/// Column names are stored in their short (unqualified) form; the qualified
/// `table.column` references are derived on demand.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClosureTableConfig {
    entity_table: String,
    closure_table: String,
    #[serde(default = "default_primary_key")]
    primary_key: String,
    #[serde(default = "default_ancestor")]
    ancestor_column: String,
    #[serde(default = "default_descendant")]
    descendant_column: String,
    #[serde(default = "default_depth")]
    depth_column: String,
    #[serde(default = "default_position")]
    position_column: String,
    #[serde(default)]
    order_strategy: OrderStrategy,
}

fn default_primary_key() -> String {
    "id".to_string()
}

fn default_ancestor() -> String {
    "ancestor".to_string()
}

fn default_descendant() -> String {
    "descendant".to_string()
}

fn default_depth() -> String {
    "depth".to_string()
}

fn default_position() -> String {
    "position".to_string()
}

impl ClosureTableConfig {
    /// Create a configuration for `entity_table` backed by `closure_table`,
    /// using the default column names.
    pub fn new(entity_table: impl Into<String>, closure_table: impl Into<String>) -> Self {
        Self {
            entity_table: entity_table.into(),
            closure_table: closure_table.into(),
            primary_key: default_primary_key(),
            ancestor_column: default_ancestor(),
            descendant_column: default_descendant(),
            depth_column: default_depth(),
            position_column: default_position(),
            order_strategy: OrderStrategy::default(),
        }
    }

    /// Merge options produced by [`ClosureTableOptions`].
    pub(crate) fn apply_options(mut self, options: ClosureTableOptions) -> Self {
        if let Some(primary_key) = options.primary_key {
            self.primary_key = primary_key;
        }
        if let Some(ancestor) = options.ancestor_column {
            self.ancestor_column = ancestor;
        }
        if let Some(descendant) = options.descendant_column {
            self.descendant_column = descendant;
        }
        if let Some(depth) = options.depth_column {
            self.depth_column = depth;
        }
        if let Some(position) = options.position_column {
            self.position_column = position;
        }
        if let Some(order_strategy) = options.order_strategy {
            self.order_strategy = order_strategy;
        }
        self
    }

    /// Table holding the hierarchy's nodes.
    pub fn entity_table(&self) -> &str {
        &self.entity_table
    }

    /// Table holding one row per (ancestor, descendant) pair.
    pub fn closure_table(&self) -> &str {
        &self.closure_table
    }

    /// Primary key column of the entity table.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn ancestor_column(&self) -> &str {
        &self.ancestor_column
    }

    pub fn descendant_column(&self) -> &str {
        &self.descendant_column
    }

    pub fn depth_column(&self) -> &str {
        &self.depth_column
    }

    pub fn position_column(&self) -> &str {
        &self.position_column
    }

    /// Ordering applied to relations returning ordered sets.
    pub fn order_strategy(&self) -> OrderStrategy {
        self.order_strategy
    }

    /// `entity.primary_key`
    pub fn qualified_primary_key(&self) -> ColumnRef {
        qualify(&self.entity_table, &self.primary_key)
    }

    /// `closure.ancestor`
    pub fn qualified_ancestor(&self) -> ColumnRef {
        qualify(&self.closure_table, &self.ancestor_column)
    }

    /// `closure.descendant`
    pub fn qualified_descendant(&self) -> ColumnRef {
        qualify(&self.closure_table, &self.descendant_column)
    }

    /// `closure.depth`
    pub fn qualified_depth(&self) -> ColumnRef {
        qualify(&self.closure_table, &self.depth_column)
    }

    /// `closure.position`
    pub fn qualified_position(&self) -> ColumnRef {
        qualify(&self.closure_table, &self.position_column)
    }
}

pub(crate) fn qualify(table: &str, column: &str) -> ColumnRef {
    (Alias::new(table), Alias::new(column)).into_column_ref()
}

/// Builder-style options consumed by the derive macro.
#[derive(Clone, Debug, Default)]
pub struct ClosureTableOptions {
    primary_key: Option<String>,
    ancestor_column: Option<String>,
    descendant_column: Option<String>,
    depth_column: Option<String>,
    position_column: Option<String>,
    order_strategy: Option<OrderStrategy>,
}

impl ClosureTableOptions {
    pub fn primary_key(mut self, value: impl Into<String>) -> Self {
        self.primary_key = Some(value.into());
        self
    }

    pub fn ancestor_column(mut self, value: impl Into<String>) -> Self {
        self.ancestor_column = Some(value.into());
        self
    }

    pub fn descendant_column(mut self, value: impl Into<String>) -> Self {
        self.descendant_column = Some(value.into());
        self
    }

    pub fn depth_column(mut self, value: impl Into<String>) -> Self {
        self.depth_column = Some(value.into());
        self
    }

    pub fn position_column(mut self, value: impl Into<String>) -> Self {
        self.position_column = Some(value.into());
        self
    }

    pub fn order_strategy(mut self, strategy: OrderStrategy) -> Self {
        self.order_strategy = Some(strategy);
        self
    }

    pub fn apply(self, base: ClosureTableConfig) -> ClosureTableConfig {
        base.apply_options(self)
    }
}

/// Ordering applied to relation queries.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStrategy {
    /// Rows come back in whatever order the database produces.
    #[default]
    Unordered,
    /// Children and siblings by ascending position, ancestors root first.
    Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_override_defaults() {
        let config = ClosureTableOptions::default()
            .primary_key("node_id")
            .depth_column("generations")
            .order_strategy(OrderStrategy::Position)
            .apply(ClosureTableConfig::new("nodes", "node_closure"));

        assert_eq!(config.primary_key(), "node_id");
        assert_eq!(config.depth_column(), "generations");
        assert_eq!(config.ancestor_column(), "ancestor");
        assert_eq!(config.order_strategy(), OrderStrategy::Position);
    }

    #[test]
    fn deserializes_with_default_columns() {
        let config: ClosureTableConfig = serde_json::from_str(
            r#"{
                "entity_table": "pages",
                "closure_table": "page_closure",
                "position_column": "sort",
                "order_strategy": "position"
            }"#,
        )
        .expect("valid config");

        assert_eq!(config.entity_table(), "pages");
        assert_eq!(config.primary_key(), "id");
        assert_eq!(config.descendant_column(), "descendant");
        assert_eq!(config.position_column(), "sort");
        assert_eq!(config.order_strategy(), OrderStrategy::Position);
    }
}
