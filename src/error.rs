use std::fmt;

use thiserror::Error;

/// Errors returned by the closure-table query APIs.
#[derive(Debug, Error)]
pub enum ClosureTableError {
    #[error("missing closure-table attribute `{0}`")]
    MissingAttribute(Attribute),

    #[error("invalid sibling find `{0}`, expected `all` or `one`")]
    InvalidFind(String),

    #[error("invalid sibling direction `{0}`, expected `both`, `prev` or `next`")]
    InvalidDirection(String),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("closure-table invariant violation: {0}")]
    Invariant(String),
}

impl ClosureTableError {
    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::Invariant(detail.into())
    }
}

/// Names every field an [`AttributeConfiguration`](crate::AttributeConfiguration)
/// can be asked for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Attribute {
    EntityTable,
    PrimaryKey,
    ClosureTable,
    Ancestor,
    Descendant,
    Depth,
    Position,
    PkValue,
    DepthValue,
    PositionValue,
}

impl Attribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::EntityTable => "entity_table",
            Attribute::PrimaryKey => "primary_key",
            Attribute::ClosureTable => "closure_table",
            Attribute::Ancestor => "ancestor",
            Attribute::Descendant => "descendant",
            Attribute::Depth => "depth",
            Attribute::Position => "position",
            Attribute::PkValue => "pk_value",
            Attribute::DepthValue => "depth_value",
            Attribute::PositionValue => "position_value",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [Attribute; 10] = [
        Attribute::EntityTable,
        Attribute::PrimaryKey,
        Attribute::ClosureTable,
        Attribute::Ancestor,
        Attribute::Descendant,
        Attribute::Depth,
        Attribute::Position,
        Attribute::PkValue,
        Attribute::DepthValue,
        Attribute::PositionValue,
    ];

    #[test]
    fn tags_cover_only_required_fields() {
        for attribute in REQUIRED {
            // Optional bindings such as the sibling parent scope get no tag.
            match attribute {
                Attribute::EntityTable
                | Attribute::PrimaryKey
                | Attribute::ClosureTable
                | Attribute::Ancestor
                | Attribute::Descendant
                | Attribute::Depth
                | Attribute::Position
                | Attribute::PkValue
                | Attribute::DepthValue
                | Attribute::PositionValue => {}
            }
            assert_ne!(attribute.as_str(), "parent_value");
        }

        let err = ClosureTableError::MissingAttribute(Attribute::DepthValue);
        assert_eq!(err.to_string(), "missing closure-table attribute `depth_value`");
    }
}
