use std::marker::PhantomData;

use crate::attributes::{AttributeConfiguration, AttributeConfigurationBuilder};
use crate::builder::{HierarchyQueryBuilder, EDGE_ANCESTOR, EDGE_DEPTH, EDGE_DESCENDANT};
use crate::config::ClosureTableConfig;
use crate::error::ClosureTableError;
use crate::executor::QueryExecutor;
use crate::projection::Projection;
use crate::siblings::{Direction, Find};
use crate::traits::ClosureTableModel;

/// One closure-table edge as returned by [`ClosureTableRepository::tree`].
#[derive(Clone, Debug, PartialEq)]
pub struct ClosureEdge<Id> {
    pub ancestor: Id,
    pub descendant: Id,
    pub depth: i32,
}

/// An edge together with its ancestor node.
#[derive(Clone, Debug)]
pub struct TreeRow<M>
where
    M: ClosureTableModel,
{
    pub node: M,
    pub edge: ClosureEdge<M::Id>,
}

/// Repository running the relation queries for a given model.
///
/// The node's depth-1 closure row is looked up on demand to bind its parent and
/// sibling position; everything else comes from the model itself.
#[derive(Debug, Default)]
pub struct ClosureTableRepository<M>
where
    M: ClosureTableModel,
{
    _marker: PhantomData<M>,
}

impl<M> ClosureTableRepository<M>
where
    M: ClosureTableModel,
{
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    fn config(&self) -> &'static ClosureTableConfig {
        M::closure_table_config()
    }

    /// Attribute builder with the model's primary key already bound.
    pub fn attributes(&self, model: &M) -> AttributeConfigurationBuilder {
        AttributeConfiguration::builder(self.config().clone())
            .pk_value(M::id_to_value(&model.id()))
    }

    fn unbound(&self) -> Result<AttributeConfiguration, ClosureTableError> {
        AttributeConfiguration::builder(self.config().clone()).build()
    }

    /// Bind parent, depth and position from the model's depth-1 closure row.
    ///
    /// Returns `None` for a root, which has no such row and therefore no siblings.
    pub async fn sibling_attributes<C: QueryExecutor>(
        &self,
        conn: &C,
        model: &M,
    ) -> Result<Option<AttributeConfiguration>, ClosureTableError> {
        let config = self.config();
        let attrs = self.attributes(model).build()?;
        let edge_columns = Projection::columns([
            format!("{}.{}", config.closure_table(), config.ancestor_column()),
            format!("{}.{}", config.closure_table(), config.position_column()),
        ]);
        let query = HierarchyQueryBuilder::new(&attrs).parent(edge_columns)?;

        let rows = conn.fetch_rows(&query).await?;
        let Some(row) = rows.first() else {
            log::debug!("closure-table node {:?} is a root", model.id());
            return Ok(None);
        };

        let parent: M::Id = row.try_get("", config.ancestor_column())?;
        let position: Option<i32> = row.try_get("", config.position_column())?;

        let mut builder = self
            .attributes(model)
            .parent_value(M::id_to_value(&parent))
            .depth_value(1);
        if let Some(position) = position {
            builder = builder.position_value(position);
        }

        builder.build().map(Some)
    }

    pub async fn parent<C: QueryExecutor>(
        &self,
        conn: &C,
        model: &M,
    ) -> Result<Option<M>, ClosureTableError> {
        let attrs = self.attributes(model).build()?;
        let query = HierarchyQueryBuilder::new(&attrs).parent(Projection::All)?;
        conn.fetch_one(&query).await
    }

    pub async fn ancestors<C: QueryExecutor>(
        &self,
        conn: &C,
        model: &M,
    ) -> Result<Vec<M>, ClosureTableError> {
        let attrs = self.attributes(model).build()?;
        let query = HierarchyQueryBuilder::new(&attrs).ancestors(Projection::All)?;
        conn.fetch_all(&query).await
    }

    pub async fn descendants<C: QueryExecutor>(
        &self,
        conn: &C,
        model: &M,
    ) -> Result<Vec<M>, ClosureTableError> {
        let attrs = self.attributes(model).build()?;
        let query = HierarchyQueryBuilder::new(&attrs).descendants(Projection::All, false)?;
        conn.fetch_all(&query).await
    }

    pub async fn children<C: QueryExecutor>(
        &self,
        conn: &C,
        model: &M,
    ) -> Result<Vec<M>, ClosureTableError> {
        let attrs = self.attributes(model).build()?;
        let query = HierarchyQueryBuilder::new(&attrs).children(Projection::All)?;
        conn.fetch_all(&query).await
    }

    pub async fn siblings<C: QueryExecutor>(
        &self,
        conn: &C,
        model: &M,
    ) -> Result<Vec<M>, ClosureTableError> {
        self.sibling_set(conn, model, Find::All, Direction::Both).await
    }

    pub async fn neighbors<C: QueryExecutor>(
        &self,
        conn: &C,
        model: &M,
    ) -> Result<Vec<M>, ClosureTableError> {
        self.sibling_set(conn, model, Find::One, Direction::Both).await
    }

    pub async fn prev_siblings<C: QueryExecutor>(
        &self,
        conn: &C,
        model: &M,
    ) -> Result<Vec<M>, ClosureTableError> {
        self.sibling_set(conn, model, Find::All, Direction::Prev).await
    }

    pub async fn prev_sibling<C: QueryExecutor>(
        &self,
        conn: &C,
        model: &M,
    ) -> Result<Option<M>, ClosureTableError> {
        let mut found = self
            .sibling_set(conn, model, Find::One, Direction::Prev)
            .await?;
        Ok(found.pop())
    }

    pub async fn next_siblings<C: QueryExecutor>(
        &self,
        conn: &C,
        model: &M,
    ) -> Result<Vec<M>, ClosureTableError> {
        self.sibling_set(conn, model, Find::All, Direction::Next).await
    }

    pub async fn next_sibling<C: QueryExecutor>(
        &self,
        conn: &C,
        model: &M,
    ) -> Result<Option<M>, ClosureTableError> {
        let mut found = self
            .sibling_set(conn, model, Find::One, Direction::Next)
            .await?;
        Ok(found.pop())
    }

    pub async fn roots<C: QueryExecutor>(&self, conn: &C) -> Result<Vec<M>, ClosureTableError> {
        let attrs = self.unbound()?;
        let query = HierarchyQueryBuilder::new(&attrs).roots(Projection::All)?;
        conn.fetch_all(&query).await
    }

    /// Every closure edge, each paired with its ancestor node.
    pub async fn tree<C: QueryExecutor>(
        &self,
        conn: &C,
    ) -> Result<Vec<TreeRow<M>>, ClosureTableError> {
        let attrs = self.unbound()?;
        let query = HierarchyQueryBuilder::new(&attrs).tree(Projection::All)?;

        let rows = conn.fetch_rows(&query).await?;
        let mut tree = Vec::with_capacity(rows.len());
        for row in rows {
            let node = M::from_query_result(&row, "")?;
            let edge = ClosureEdge {
                ancestor: row.try_get("", EDGE_ANCESTOR)?,
                descendant: row.try_get("", EDGE_DESCENDANT)?,
                depth: row.try_get("", EDGE_DEPTH)?,
            };
            tree.push(TreeRow { node, edge });
        }
        Ok(tree)
    }

    async fn sibling_set<C: QueryExecutor>(
        &self,
        conn: &C,
        model: &M,
        find: Find,
        direction: Direction,
    ) -> Result<Vec<M>, ClosureTableError> {
        let Some(attrs) = self.sibling_attributes(conn, model).await? else {
            return Ok(Vec::new());
        };
        let query =
            HierarchyQueryBuilder::new(&attrs).sibling_query(find, direction, Projection::All)?;
        conn.fetch_all(&query).await
    }
}
