use closure_table::prelude::*;
use sea_orm::{DbBackend, MockDatabase, Transaction};

mod entity {
    pub mod category {
        use closure_table::ClosureTableModelDerive as ClosureTableModel;
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, DeriveEntityModel, ClosureTableModel)]
        #[sea_orm(table_name = "categories")]
        #[closure_table(
            closure_table = "category_tree",
            ancestor_column = "ancestor_id",
            descendant_column = "descendant_id",
            depth_column = "generations",
            position_column = "sort_order",
            order = "position"
        )]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i32,
            pub title: String,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    pub mod folder {
        use closure_table::ClosureTableModelDerive as ClosureTableModel;
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, DeriveEntityModel, ClosureTableModel)]
        #[sea_orm(schema_name = "public", table_name = "folders")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i64,
            pub label: String,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }
}

use entity::{category, folder};

fn category(id: i32, title: &str) -> category::Model {
    category::Model {
        id,
        title: title.to_string(),
    }
}

#[test]
fn derive_builds_the_configuration() {
    let config = category::Model::closure_table_config();

    assert_eq!(config.entity_table(), "categories");
    assert_eq!(config.closure_table(), "category_tree");
    assert_eq!(config.primary_key(), "id");
    assert_eq!(config.ancestor_column(), "ancestor_id");
    assert_eq!(config.descendant_column(), "descendant_id");
    assert_eq!(config.depth_column(), "generations");
    assert_eq!(config.position_column(), "sort_order");
    assert_eq!(config.order_strategy(), OrderStrategy::Position);
}

#[test]
fn derive_skips_other_sea_orm_keys() {
    let config = folder::Model::closure_table_config();

    assert_eq!(config.entity_table(), "folders");
    assert_eq!(config.closure_table(), "folders_closure");
    assert_eq!(config.primary_key(), "id");
    assert_eq!(config.ancestor_column(), "ancestor");
    assert_eq!(config.order_strategy(), OrderStrategy::Unordered);
}

#[tokio::test]
async fn children_statement_is_parameterised() -> Result<(), Box<dyn std::error::Error>> {
    let db = MockDatabase::new(DbBackend::Postgres)
        .append_query_results([vec![category(2, "books"), category(3, "music")]])
        .into_connection();

    let repo = ClosureTableRepository::<category::Model>::new();
    let children = repo.children(&db, &category(1, "all")).await?;
    assert_eq!(children.len(), 2);

    assert_eq!(
        db.into_transaction_log(),
        [Transaction::from_sql_and_values(
            DbBackend::Postgres,
            concat!(
                r#"SELECT "categories".* FROM "categories" "#,
                r#"INNER JOIN "category_tree" ON "category_tree"."descendant_id" = "categories"."id" "#,
                r#"WHERE "category_tree"."ancestor_id" = $1 AND "category_tree"."generations" = $2 "#,
                r#"ORDER BY "category_tree"."sort_order" ASC"#
            ),
            [1i32.into(), 1i32.into()],
        )]
    );
    Ok(())
}

#[tokio::test]
async fn root_parent_lookup_returns_none() -> Result<(), Box<dyn std::error::Error>> {
    let db = MockDatabase::new(DbBackend::Postgres)
        .append_query_results([Vec::<category::Model>::new()])
        .into_connection();

    let repo = ClosureTableRepository::<category::Model>::new();
    assert_eq!(repo.parent(&db, &category(1, "all")).await?, None);

    assert_eq!(
        db.into_transaction_log(),
        [Transaction::from_sql_and_values(
            DbBackend::Postgres,
            concat!(
                r#"SELECT "categories".* FROM "categories" "#,
                r#"INNER JOIN "category_tree" ON "category_tree"."ancestor_id" = "categories"."id" "#,
                r#"WHERE "category_tree"."descendant_id" = $1 AND "category_tree"."generations" = $2"#
            ),
            [1i32.into(), 1i32.into()],
        )]
    );
    Ok(())
}

#[tokio::test]
async fn database_errors_pass_through() {
    let db = MockDatabase::new(DbBackend::Postgres)
        .append_query_errors([sea_orm::DbErr::Custom("boom".to_owned())])
        .into_connection();

    let repo = ClosureTableRepository::<category::Model>::new();
    let err = repo.roots(&db).await.unwrap_err();
    assert!(matches!(err, closure_table::ClosureTableError::Database(_)));
}
