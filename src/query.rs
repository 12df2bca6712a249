use std::fmt;

use sea_orm::sea_query::{QueryBuilder, SelectStatement};
use sea_orm::{DbBackend, Statement};

/// Relation a [`HierarchyQuery`] was composed for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Relation {
    Parent,
    Ancestors,
    Descendants,
    Children,
    Siblings,
    Neighbors,
    PrevSiblings,
    PrevSibling,
    NextSiblings,
    NextSibling,
    Roots,
    Tree,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Parent => "parent",
            Relation::Ancestors => "ancestors",
            Relation::Descendants => "descendants",
            Relation::Children => "children",
            Relation::Siblings => "siblings",
            Relation::Neighbors => "neighbors",
            Relation::PrevSiblings => "prev_siblings",
            Relation::PrevSibling => "prev_sibling",
            Relation::NextSiblings => "next_siblings",
            Relation::NextSibling => "next_sibling",
            Relation::Roots => "roots",
            Relation::Tree => "tree",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A composed, not yet executed relation query.
///
/// The statement is plain sea-query, so callers may keep refining it (extra
/// filters, ordering, limits) before handing it to an executor.
#[derive(Clone, Debug)]
pub struct HierarchyQuery {
    relation: Relation,
    statement: SelectStatement,
}

impl HierarchyQuery {
    pub(crate) fn new(relation: Relation, statement: SelectStatement) -> Self {
        Self {
            relation,
            statement,
        }
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn statement(&self) -> &SelectStatement {
        &self.statement
    }

    pub fn statement_mut(&mut self) -> &mut SelectStatement {
        &mut self.statement
    }

    pub fn into_statement(self) -> SelectStatement {
        self.statement
    }

    /// Build a parameterised statement for `backend`.
    pub fn build(&self, backend: DbBackend) -> Statement {
        backend.build(&self.statement)
    }

    /// Render the query with inlined values, for logging and tests.
    pub fn to_string<T: QueryBuilder>(&self, query_builder: T) -> String {
        self.statement.to_string(query_builder)
    }
}
