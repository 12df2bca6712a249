use sea_orm::sea_query::{Alias, ColumnRef, Expr, JoinType, Order, Query, SelectStatement};

use crate::attributes::AttributeConfiguration;
use crate::config::{ClosureTableConfig, OrderStrategy};
use crate::error::ClosureTableError;
use crate::projection::Projection;
use crate::query::{HierarchyQuery, Relation};
use crate::siblings::{self, Direction, Find};

/// Alias of the closure copy holding each candidate root's self-row.
const ROOT_ROW: &str = "c";
/// Alias of the closure copy probed for edges above a candidate root.
const UPWARD_ROW: &str = "r";
/// Alias of the closure copy enumerated by [`HierarchyQueryBuilder::tree`].
const EDGE_ROW: &str = "c1";

/// Output name of the edge's ancestor column in a [`Relation::Tree`] query.
pub const EDGE_ANCESTOR: &str = "edge_ancestor";
/// Output name of the edge's descendant column in a [`Relation::Tree`] query.
pub const EDGE_DESCENDANT: &str = "edge_descendant";
/// Output name of the edge's depth column in a [`Relation::Tree`] query.
pub const EDGE_DEPTH: &str = "edge_depth";

/// Composes relation queries for the node bound in an [`AttributeConfiguration`].
///
/// Nothing is executed here; every method returns a [`HierarchyQuery`] that an
/// executor runs later. Bound values are resolved before any statement is
/// built, so a missing attribute never yields a half-composed query.
#[derive(Clone, Copy, Debug)]
pub struct HierarchyQueryBuilder<'a> {
    attrs: &'a AttributeConfiguration,
}

impl<'a> HierarchyQueryBuilder<'a> {
    pub fn new(attrs: &'a AttributeConfiguration) -> Self {
        Self { attrs }
    }

    fn config(&self) -> &'a ClosureTableConfig {
        self.attrs.config()
    }

    /// `SELECT <columns> FROM entity JOIN closure ON closure.<join_on> = entity.pk`
    fn joined(&self, columns: &Projection, join_on: ColumnRef) -> SelectStatement {
        let config = self.config();
        let mut query = Query::select();
        columns.apply(&mut query, config.entity_table());
        query.from(Alias::new(config.entity_table())).inner_join(
            Alias::new(config.closure_table()),
            Expr::col(join_on).equals(config.qualified_primary_key()),
        );
        query
    }

    fn ordered_by_position(&self) -> bool {
        self.config().order_strategy() == OrderStrategy::Position
    }

    /// The immediate parent: at most one row, none for a root.
    pub fn parent(
        &self,
        columns: impl Into<Projection>,
    ) -> Result<HierarchyQuery, ClosureTableError> {
        let pk = self.attrs.pk_value()?.clone();
        let config = self.config();

        let mut query = self.joined(&columns.into(), config.qualified_ancestor());
        query
            .and_where(Expr::col(config.qualified_descendant()).eq(pk))
            .and_where(Expr::col(config.qualified_depth()).eq(1));

        Ok(self.finish(Relation::Parent, query))
    }

    /// Every ancestor, excluding the node's own self-row.
    pub fn ancestors(
        &self,
        columns: impl Into<Projection>,
    ) -> Result<HierarchyQuery, ClosureTableError> {
        let pk = self.attrs.pk_value()?.clone();
        let config = self.config();

        let mut query = self.joined(&columns.into(), config.qualified_ancestor());
        query
            .and_where(Expr::col(config.qualified_descendant()).eq(pk))
            .and_where(Expr::col(config.qualified_depth()).gt(0));

        if self.ordered_by_position() {
            query.order_by(config.qualified_depth(), Order::Desc);
        }

        Ok(self.finish(Relation::Ancestors, query))
    }

    /// Every descendant, or only the immediate children when `immediate_only`.
    pub fn descendants(
        &self,
        columns: impl Into<Projection>,
        immediate_only: bool,
    ) -> Result<HierarchyQuery, ClosureTableError> {
        let pk = self.attrs.pk_value()?.clone();
        let config = self.config();

        let mut query = self.joined(&columns.into(), config.qualified_descendant());
        query.and_where(Expr::col(config.qualified_ancestor()).eq(pk));

        let relation = if immediate_only {
            query.and_where(Expr::col(config.qualified_depth()).eq(1));
            if self.ordered_by_position() {
                query.order_by(config.qualified_position(), Order::Asc);
            }
            Relation::Children
        } else {
            query.and_where(Expr::col(config.qualified_depth()).gt(0));
            Relation::Descendants
        };

        Ok(self.finish(relation, query))
    }

    pub fn children(
        &self,
        columns: impl Into<Projection>,
    ) -> Result<HierarchyQuery, ClosureTableError> {
        self.descendants(columns, true)
    }

    /// Every sibling except the node itself.
    pub fn siblings(
        &self,
        columns: impl Into<Projection>,
    ) -> Result<HierarchyQuery, ClosureTableError> {
        self.sibling_query(Find::All, Direction::Both, columns)
    }

    /// The siblings immediately left and right of the node.
    pub fn neighbors(
        &self,
        columns: impl Into<Projection>,
    ) -> Result<HierarchyQuery, ClosureTableError> {
        self.sibling_query(Find::One, Direction::Both, columns)
    }

    pub fn prev_siblings(
        &self,
        columns: impl Into<Projection>,
    ) -> Result<HierarchyQuery, ClosureTableError> {
        self.sibling_query(Find::All, Direction::Prev, columns)
    }

    pub fn prev_sibling(
        &self,
        columns: impl Into<Projection>,
    ) -> Result<HierarchyQuery, ClosureTableError> {
        self.sibling_query(Find::One, Direction::Prev, columns)
    }

    pub fn next_siblings(
        &self,
        columns: impl Into<Projection>,
    ) -> Result<HierarchyQuery, ClosureTableError> {
        self.sibling_query(Find::All, Direction::Next, columns)
    }

    pub fn next_sibling(
        &self,
        columns: impl Into<Projection>,
    ) -> Result<HierarchyQuery, ClosureTableError> {
        self.sibling_query(Find::One, Direction::Next, columns)
    }

    /// Sibling query for an explicit `(find, direction)` pair.
    pub fn sibling_query(
        &self,
        find: Find,
        direction: Direction,
        columns: impl Into<Projection>,
    ) -> Result<HierarchyQuery, ClosureTableError> {
        siblings::sibling_query(self.attrs, find, direction, &columns.into())
    }

    /// Sibling query from textual tags (`all`/`one`, `both`/`prev`/`next`).
    pub fn sibling_query_by_tags(
        &self,
        find: &str,
        direction: &str,
        columns: impl Into<Projection>,
    ) -> Result<HierarchyQuery, ClosureTableError> {
        let find: Find = find.parse()?;
        let direction: Direction = direction.parse()?;
        self.sibling_query(find, direction, columns)
    }

    /// Nodes with no closure row above them, each listed once.
    ///
    /// The candidate's self-row is joined as `c`; a correlated `NOT EXISTS`
    /// probe looks for any row with `descendant = c.ancestor` and `depth > 0`.
    pub fn roots(
        &self,
        columns: impl Into<Projection>,
    ) -> Result<HierarchyQuery, ClosureTableError> {
        let config = self.config();
        let root_row = Alias::new(ROOT_ROW);
        let upward_row = Alias::new(UPWARD_ROW);
        let ancestor = Alias::new(config.ancestor_column());
        let descendant = Alias::new(config.descendant_column());

        let mut upward = Query::select();
        upward
            .column((upward_row.clone(), ancestor.clone()))
            .from_as(Alias::new(config.closure_table()), upward_row.clone())
            .and_where(
                Expr::col((upward_row.clone(), descendant.clone()))
                    .equals((root_row.clone(), ancestor.clone())),
            )
            .and_where(Expr::col((upward_row, Alias::new(config.depth_column()))).gt(0));

        let mut query = Query::select();
        columns.into().apply(&mut query, config.entity_table());
        query
            .column((root_row.clone(), ancestor.clone()))
            .distinct()
            .from(Alias::new(config.entity_table()))
            .join_as(
                JoinType::InnerJoin,
                Alias::new(config.closure_table()),
                root_row.clone(),
                Expr::col((root_row.clone(), ancestor))
                    .equals(config.qualified_primary_key())
                    .and(Expr::col((root_row, descendant)).equals(config.qualified_primary_key())),
            )
            .and_where(Expr::exists(upward).not());

        Ok(self.finish(Relation::Roots, query))
    }

    /// Every distinct (ancestor, descendant, depth) edge of the closure table,
    /// each joined to its ancestor entity.
    ///
    /// The edge columns come back as [`EDGE_ANCESTOR`], [`EDGE_DESCENDANT`] and
    /// [`EDGE_DEPTH`] so they never collide with entity columns of the same name.
    pub fn tree(
        &self,
        columns: impl Into<Projection>,
    ) -> Result<HierarchyQuery, ClosureTableError> {
        let config = self.config();
        let edge_row = Alias::new(EDGE_ROW);

        let mut query = Query::select();
        columns.into().apply(&mut query, config.entity_table());
        query
            .expr_as(
                Expr::col((edge_row.clone(), Alias::new(config.ancestor_column()))),
                Alias::new(EDGE_ANCESTOR),
            )
            .expr_as(
                Expr::col((edge_row.clone(), Alias::new(config.descendant_column()))),
                Alias::new(EDGE_DESCENDANT),
            )
            .expr_as(
                Expr::col((edge_row.clone(), Alias::new(config.depth_column()))),
                Alias::new(EDGE_DEPTH),
            )
            .distinct()
            .from(Alias::new(config.entity_table()))
            .join_as(
                JoinType::InnerJoin,
                Alias::new(config.closure_table()),
                edge_row.clone(),
                Expr::col(config.qualified_primary_key())
                    .equals((edge_row, Alias::new(config.ancestor_column()))),
            );

        Ok(self.finish(Relation::Tree, query))
    }

    fn finish(&self, relation: Relation, query: SelectStatement) -> HierarchyQuery {
        log::trace!(
            "composed {relation} query over {}/{}",
            self.config().entity_table(),
            self.config().closure_table()
        );
        HierarchyQuery::new(relation, query)
    }
}
