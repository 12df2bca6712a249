use async_trait::async_trait;
use sea_orm::{ConnectionTrait, FromQueryResult, QueryResult};

use crate::error::ClosureTableError;
use crate::query::HierarchyQuery;

/// Runs composed relation queries.
///
/// Implemented for every SeaORM connection (pools, transactions, mocks), so the
/// caller keeps full control over transactions and pooling.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run `query` and return the raw rows.
    async fn fetch_rows(
        &self,
        query: &HierarchyQuery,
    ) -> Result<Vec<QueryResult>, ClosureTableError>;

    /// Run `query` and map every row onto `T`.
    async fn fetch_all<T>(&self, query: &HierarchyQuery) -> Result<Vec<T>, ClosureTableError>
    where
        T: FromQueryResult + Send,
    {
        let rows = self.fetch_rows(query).await?;
        let mut models = Vec::with_capacity(rows.len());
        for row in rows {
            models.push(T::from_query_result(&row, "")?);
        }
        Ok(models)
    }

    /// Run `query` and map the first row, if any.
    async fn fetch_one<T>(&self, query: &HierarchyQuery) -> Result<Option<T>, ClosureTableError>
    where
        T: FromQueryResult + Send,
    {
        let rows = self.fetch_rows(query).await?;
        match rows.first() {
            Some(row) => Ok(Some(T::from_query_result(row, "")?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<C> QueryExecutor for C
where
    C: ConnectionTrait + Send + Sync,
{
    async fn fetch_rows(
        &self,
        query: &HierarchyQuery,
    ) -> Result<Vec<QueryResult>, ClosureTableError> {
        let statement = query.build(self.get_database_backend());
        log::debug!("closure-table {}: {}", query.relation(), statement);
        let rows = self.query_all(statement).await?;
        log::debug!(
            "closure-table {} returned {} row(s)",
            query.relation(),
            rows.len()
        );
        Ok(rows)
    }
}
