use sea_orm::sea_query::{Alias, Asterisk, Expr, SelectStatement};

/// Select list of a relation query.
///
/// `All` selects every column of the entity table (`entity.*`), so rows map
/// straight onto the entity's model. Explicit columns accept `column`,
/// `table.column`, `table.*` and `*`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Projection {
    #[default]
    All,
    Columns(Vec<String>),
}

impl Projection {
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            Projection::All
        } else {
            Projection::Columns(columns)
        }
    }

    pub(crate) fn apply(&self, query: &mut SelectStatement, entity_table: &str) {
        match self {
            Projection::All => {
                query.expr(Expr::table_asterisk(Alias::new(entity_table)));
            }
            Projection::Columns(columns) => {
                for column in columns {
                    select_column(query, column);
                }
            }
        }
    }
}

fn select_column(query: &mut SelectStatement, column: &str) {
    match column.split_once('.') {
        Some((table, "*")) => {
            query.column((Alias::new(table), Asterisk));
        }
        Some((table, name)) => {
            query.column((Alias::new(table), Alias::new(name)));
        }
        None if column == "*" => {
            query.column(Asterisk);
        }
        None => {
            query.column(Alias::new(column));
        }
    }
}

impl From<&[&str]> for Projection {
    fn from(columns: &[&str]) -> Self {
        Projection::columns(columns.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Projection {
    fn from(columns: [&str; N]) -> Self {
        Projection::columns(columns)
    }
}

impl From<Vec<String>> for Projection {
    fn from(columns: Vec<String>) -> Self {
        Projection::columns(columns)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::sea_query::{PostgresQueryBuilder, Query};

    use super::*;

    fn render(projection: Projection) -> String {
        let mut query = Query::select();
        projection.apply(&mut query, "nodes");
        query.from(Alias::new("nodes"));
        query.to_string(PostgresQueryBuilder)
    }

    #[test]
    fn all_selects_entity_columns() {
        assert_eq!(
            render(Projection::default()),
            r#"SELECT "nodes".* FROM "nodes""#
        );
    }

    #[test]
    fn explicit_columns_keep_their_qualifiers() {
        assert_eq!(
            render(Projection::from(["id", "nodes.name", "closure.*"])),
            r#"SELECT "id", "nodes"."name", "closure".* FROM "nodes""#
        );
    }

    #[test]
    fn empty_list_means_all() {
        assert_eq!(Projection::columns(Vec::<String>::new()), Projection::All);
    }
}
