use std::fmt::Debug;

use sea_orm::{FromQueryResult, TryGetable, Value};

use crate::config::ClosureTableConfig;

/// Trait implemented by SeaORM `Model` types whose hierarchy lives in a closure table.
///
/// Implementations are normally provided by the `#[derive(ClosureTableModel)]` macro.
pub trait ClosureTableModel: Clone + Send + Sync + 'static + FromQueryResult {
    type Id: Clone + Debug + PartialEq + Send + Sync + 'static + TryGetable;

    fn closure_table_config() -> &'static ClosureTableConfig;

    fn id(&self) -> Self::Id;
    fn id_to_value(id: &Self::Id) -> Value;
}
