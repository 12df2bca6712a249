//! Closure-table hierarchy queries for SeaORM.
//!
//! The crate turns hierarchy-relative requests (parent, ancestors, descendants,
//! siblings, roots, the full tree) into sea-query statements over a closure
//! table: one row per (ancestor, descendant) pair with its depth and a sibling
//! position. Building a query never touches the database; a [`QueryExecutor`]
//! runs it on any SeaORM connection, and [`ClosureTableRepository`] ties both
//! to a model deriving [`ClosureTableModel`].
//!
//! Keeping the closure rows consistent on insert, move and delete is left to
//! the application.

pub mod attributes;
pub mod builder;
pub mod config;
pub mod error;
pub mod executor;
pub mod projection;
pub mod query;
pub mod repository;
pub mod siblings;
pub mod traits;

pub mod prelude {
    //! Convenient re-exports for consumers.
    pub use crate::attributes::AttributeConfiguration;
    pub use crate::builder::HierarchyQueryBuilder;
    pub use crate::config::{ClosureTableConfig, ClosureTableOptions, OrderStrategy};
    pub use crate::executor::QueryExecutor;
    pub use crate::projection::Projection;
    pub use crate::repository::ClosureTableRepository;
    pub use crate::siblings::{Direction, Find};
    pub use crate::traits::ClosureTableModel;
}

#[doc(hidden)]
pub mod __private {
    pub use once_cell;
}

pub use attributes::{AttributeConfiguration, AttributeConfigurationBuilder};
pub use builder::{HierarchyQueryBuilder, EDGE_ANCESTOR, EDGE_DEPTH, EDGE_DESCENDANT};
pub use closure_table_macros::ClosureTableModel as ClosureTableModelDerive;
#[doc(hidden)]
pub use closure_table_macros::ClosureTableModel;
pub use config::{ClosureTableConfig, ClosureTableOptions, OrderStrategy};
pub use error::{Attribute, ClosureTableError};
pub use executor::QueryExecutor;
pub use projection::Projection;
pub use query::{HierarchyQuery, Relation};
pub use repository::{ClosureEdge, ClosureTableRepository, TreeRow};
pub use siblings::{Direction, Find};
pub use traits::ClosureTableModel;
