//! Sibling retrieval: every sibling-flavoured relation is one `(Find, Direction)`
//! pair resolved into a depth filter plus a position or identity predicate.

use std::fmt;
use std::str::FromStr;

use sea_orm::sea_query::{Alias, Expr, Order, Query, SimpleExpr};

use crate::attributes::AttributeConfiguration;
use crate::config::OrderStrategy;
use crate::error::ClosureTableError;
use crate::projection::Projection;
use crate::query::{HierarchyQuery, Relation};

/// How many siblings to return in the chosen direction.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Find {
    All,
    One,
}

/// Which side of the current node to look at.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    Both,
    Prev,
    Next,
}

impl Find {
    pub fn as_str(&self) -> &'static str {
        match self {
            Find::All => "all",
            Find::One => "one",
        }
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Both => "both",
            Direction::Prev => "prev",
            Direction::Next => "next",
        }
    }
}

impl FromStr for Find {
    type Err = ClosureTableError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "all" => Ok(Find::All),
            "one" => Ok(Find::One),
            other => Err(ClosureTableError::InvalidFind(other.to_owned())),
        }
    }
}

impl FromStr for Direction {
    type Err = ClosureTableError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "both" => Ok(Direction::Both),
            "prev" => Ok(Direction::Prev),
            "next" => Ok(Direction::Next),
            other => Err(ClosureTableError::InvalidDirection(other.to_owned())),
        }
    }
}

impl fmt::Display for Find {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn relation_for(find: Find, direction: Direction) -> Relation {
    match (find, direction) {
        (Find::All, Direction::Both) => Relation::Siblings,
        (Find::One, Direction::Both) => Relation::Neighbors,
        (Find::All, Direction::Prev) => Relation::PrevSiblings,
        (Find::One, Direction::Prev) => Relation::PrevSibling,
        (Find::All, Direction::Next) => Relation::NextSiblings,
        (Find::One, Direction::Next) => Relation::NextSibling,
    }
}

/// Compose the sibling query for `(find, direction)`.
///
/// Base: closure rows joined on `descendant = pk` at the bound depth, narrowed
/// to the bound parent when there is one.
pub(crate) fn sibling_query(
    attrs: &AttributeConfiguration,
    find: Find,
    direction: Direction,
    columns: &Projection,
) -> Result<HierarchyQuery, ClosureTableError> {
    let config = attrs.config();
    let depth = attrs.depth_value()?;
    let predicate = sibling_predicate(attrs, find, direction)?;

    let mut query = Query::select();
    columns.apply(&mut query, config.entity_table());
    query
        .from(Alias::new(config.entity_table()))
        .inner_join(
            Alias::new(config.closure_table()),
            Expr::col(config.qualified_descendant()).equals(config.qualified_primary_key()),
        )
        .and_where(Expr::col(config.qualified_depth()).eq(depth));

    if let Some(parent) = attrs.parent_value() {
        query.and_where(Expr::col(config.qualified_ancestor()).eq(parent.clone()));
    }

    query.and_where(predicate);

    if config.order_strategy() == OrderStrategy::Position {
        query.order_by(config.qualified_position(), Order::Asc);
    }

    let relation = relation_for(find, direction);
    log::trace!("composed {relation} query at depth {depth}");
    Ok(HierarchyQuery::new(relation, query))
}

fn sibling_predicate(
    attrs: &AttributeConfiguration,
    find: Find,
    direction: Direction,
) -> Result<SimpleExpr, ClosureTableError> {
    let config = attrs.config();
    let column = Expr::col(config.qualified_position());

    let predicate = match (find, direction) {
        (Find::All, Direction::Both) => {
            Expr::col(config.qualified_descendant()).ne(attrs.pk_value()?.clone())
        }
        (Find::One, Direction::Both) => {
            let position = attrs.position_value()?;
            let neighbours: Vec<i32> = [position.checked_sub(1), position.checked_add(1)]
                .into_iter()
                .flatten()
                .collect();
            column.is_in(neighbours)
        }
        (Find::All, Direction::Prev) => column.lt(attrs.position_value()?),
        (Find::All, Direction::Next) => column.gt(attrs.position_value()?),
        (Find::One, Direction::Prev) => column.eq(offset(attrs.position_value()?, -1)?),
        (Find::One, Direction::Next) => column.eq(offset(attrs.position_value()?, 1)?),
    };

    Ok(predicate)
}

fn offset(position: i32, delta: i32) -> Result<i32, ClosureTableError> {
    position.checked_add(delta).ok_or_else(|| {
        ClosureTableError::invariant(format!("sibling position {position} out of range"))
    })
}

#[cfg(test)]
mod tests {
    use sea_orm::sea_query::PostgresQueryBuilder;

    use super::*;
    use crate::config::{ClosureTableConfig, ClosureTableOptions};
    use crate::error::Attribute;

    fn attrs(position: i32) -> AttributeConfiguration {
        AttributeConfiguration::builder(ClosureTableConfig::new("nodes", "node_closure"))
            .pk_value(3)
            .depth_value(1)
            .position_value(position)
            .build()
            .unwrap()
    }

    fn render(attrs: &AttributeConfiguration, find: Find, direction: Direction) -> String {
        sibling_query(attrs, find, direction, &Projection::All)
            .unwrap()
            .to_string(PostgresQueryBuilder)
    }

    #[test]
    fn base_query_joins_descendants_at_bound_depth() {
        let sql = render(&attrs(2), Find::All, Direction::Both);
        assert!(sql.starts_with(
            r#"SELECT "nodes".* FROM "nodes" INNER JOIN "node_closure" ON "node_closure"."descendant" = "nodes"."id""#
        ));
        assert!(sql.contains(r#""node_closure"."depth" = 1"#));
    }

    #[test]
    fn all_both_excludes_self() {
        let sql = render(&attrs(2), Find::All, Direction::Both);
        assert!(sql.ends_with(r#"AND "node_closure"."descendant" <> 3"#));
        assert!(!sql.contains(r#""position""#));
    }

    #[test]
    fn one_both_targets_both_neighbours() {
        let sql = render(&attrs(2), Find::One, Direction::Both);
        assert!(sql.ends_with(r#"AND "node_closure"."position" IN (1, 3)"#));
    }

    #[test]
    fn directions_compare_against_unmodified_position() {
        let attrs = attrs(5);
        assert!(render(&attrs, Find::All, Direction::Prev)
            .ends_with(r#""node_closure"."position" < 5"#));
        assert!(render(&attrs, Find::All, Direction::Next)
            .ends_with(r#""node_closure"."position" > 5"#));
        assert!(render(&attrs, Find::One, Direction::Prev)
            .ends_with(r#""node_closure"."position" = 4"#));
        assert!(render(&attrs, Find::One, Direction::Next)
            .ends_with(r#""node_closure"."position" = 6"#));
        assert_eq!(attrs.position_value().unwrap(), 5);
    }

    #[test]
    fn parent_binding_scopes_to_one_family() {
        let attrs = AttributeConfiguration::builder(ClosureTableConfig::new("nodes", "node_closure"))
            .pk_value(3)
            .parent_value(1)
            .depth_value(1)
            .build()
            .unwrap();

        let sql = render(&attrs, Find::All, Direction::Both);
        assert!(sql.contains(r#""node_closure"."ancestor" = 1"#));
    }

    #[test]
    fn position_ordering_is_opt_in() {
        let config = ClosureTableOptions::default()
            .order_strategy(OrderStrategy::Position)
            .apply(ClosureTableConfig::new("nodes", "node_closure"));
        let attrs = AttributeConfiguration::builder(config)
            .depth_value(1)
            .position_value(2)
            .build()
            .unwrap();

        let sql = render(&attrs, Find::All, Direction::Next);
        assert!(sql.ends_with(r#"ORDER BY "node_closure"."position" ASC"#));
    }

    #[test]
    fn missing_depth_fails_before_composition() {
        let attrs = AttributeConfiguration::builder(ClosureTableConfig::new("nodes", "node_closure"))
            .pk_value(3)
            .position_value(1)
            .build()
            .unwrap();

        let err = sibling_query(&attrs, Find::One, Direction::Next, &Projection::All).unwrap_err();
        assert!(matches!(
            err,
            ClosureTableError::MissingAttribute(Attribute::DepthValue)
        ));
    }

    #[test]
    fn position_is_only_required_for_positional_variants() {
        let attrs = AttributeConfiguration::builder(ClosureTableConfig::new("nodes", "node_closure"))
            .pk_value(3)
            .depth_value(1)
            .build()
            .unwrap();

        assert!(sibling_query(&attrs, Find::All, Direction::Both, &Projection::All).is_ok());
        let err = sibling_query(&attrs, Find::One, Direction::Both, &Projection::All).unwrap_err();
        assert!(matches!(
            err,
            ClosureTableError::MissingAttribute(Attribute::PositionValue)
        ));
    }

    #[test]
    fn position_overflow_is_reported() {
        let err = sibling_query(&attrs(i32::MAX), Find::One, Direction::Next, &Projection::All)
            .unwrap_err();
        assert!(matches!(err, ClosureTableError::Invariant(_)));
    }

    #[test]
    fn neighbours_at_the_range_edge_keep_the_reachable_side() {
        let sql = render(&attrs(i32::MAX), Find::One, Direction::Both);
        assert!(sql.ends_with(r#"AND "node_closure"."position" IN (2147483646)"#));

        let sql = render(&attrs(i32::MIN), Find::One, Direction::Both);
        assert!(sql.ends_with(r#"AND "node_closure"."position" IN (-2147483647)"#));
    }

    #[test]
    fn tags_parse_or_fail_with_their_own_error() {
        assert_eq!("one".parse::<Find>().unwrap(), Find::One);
        assert_eq!("prev".parse::<Direction>().unwrap(), Direction::Prev);
        assert!(matches!(
            "some".parse::<Find>(),
            Err(ClosureTableError::InvalidFind(tag)) if tag == "some"
        ));
        assert!(matches!(
            "up".parse::<Direction>(),
            Err(ClosureTableError::InvalidDirection(tag)) if tag == "up"
        ));
    }
}
