use sea_orm::Value;

use crate::config::ClosureTableConfig;
use crate::error::{Attribute, ClosureTableError};

/// Table/column names plus the bound values of one "current" node.
///
/// Built fresh for every relation request and never mutated afterwards. Each
/// bound value is optional at construction; the relation that needs it fails
/// with [`ClosureTableError::MissingAttribute`] before composing anything.
#[derive(Clone, Debug)]
pub struct AttributeConfiguration {
    config: ClosureTableConfig,
    pk_value: Option<Value>,
    parent_value: Option<Value>,
    depth_value: Option<i32>,
    position_value: Option<i32>,
}

impl AttributeConfiguration {
    pub fn builder(config: ClosureTableConfig) -> AttributeConfigurationBuilder {
        AttributeConfigurationBuilder {
            config,
            pk_value: None,
            parent_value: None,
            depth_value: None,
            position_value: None,
        }
    }

    pub fn config(&self) -> &ClosureTableConfig {
        &self.config
    }

    /// Primary-key value of the current node.
    pub fn pk_value(&self) -> Result<&Value, ClosureTableError> {
        self.pk_value
            .as_ref()
            .ok_or(ClosureTableError::MissingAttribute(Attribute::PkValue))
    }

    /// Immediate parent of the current node, when the caller scoped sibling
    /// queries to it.
    pub fn parent_value(&self) -> Option<&Value> {
        self.parent_value.as_ref()
    }

    /// Depth of the closure rows that sibling queries compare against.
    pub fn depth_value(&self) -> Result<i32, ClosureTableError> {
        self.depth_value
            .ok_or(ClosureTableError::MissingAttribute(Attribute::DepthValue))
    }

    /// Sibling position of the current node.
    pub fn position_value(&self) -> Result<i32, ClosureTableError> {
        self.position_value
            .ok_or(ClosureTableError::MissingAttribute(Attribute::PositionValue))
    }
}

#[derive(Clone, Debug)]
pub struct AttributeConfigurationBuilder {
    config: ClosureTableConfig,
    pk_value: Option<Value>,
    parent_value: Option<Value>,
    depth_value: Option<i32>,
    position_value: Option<i32>,
}

impl AttributeConfigurationBuilder {
    pub fn pk_value(mut self, value: impl Into<Value>) -> Self {
        self.pk_value = Some(value.into());
        self
    }

    pub fn parent_value(mut self, value: impl Into<Value>) -> Self {
        self.parent_value = Some(value.into());
        self
    }

    pub fn depth_value(mut self, value: i32) -> Self {
        self.depth_value = Some(value);
        self
    }

    pub fn position_value(mut self, value: i32) -> Self {
        self.position_value = Some(value);
        self
    }

    /// Finish the configuration, rejecting empty table or column names.
    pub fn build(self) -> Result<AttributeConfiguration, ClosureTableError> {
        let config = &self.config;
        let names = [
            (Attribute::EntityTable, config.entity_table()),
            (Attribute::PrimaryKey, config.primary_key()),
            (Attribute::ClosureTable, config.closure_table()),
            (Attribute::Ancestor, config.ancestor_column()),
            (Attribute::Descendant, config.descendant_column()),
            (Attribute::Depth, config.depth_column()),
            (Attribute::Position, config.position_column()),
        ];

        if let Some((attribute, _)) = names.iter().find(|(_, name)| name.trim().is_empty()) {
            return Err(ClosureTableError::MissingAttribute(*attribute));
        }

        Ok(AttributeConfiguration {
            config: self.config,
            pk_value: self.pk_value,
            parent_value: self.parent_value,
            depth_value: self.depth_value,
            position_value: self.position_value,
        })
    }
}
