use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Serialize, Deserialize, sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

pub async fn get_category(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, type FROM categories WHERE categories.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_all_categories(pool: &SqlitePool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, type FROM categories ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_categories_by_type(pool: &SqlitePool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, type FROM categories ORDER BY type, id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn create_category(pool: &SqlitePool, kind: &str) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO categories (type) VALUES (?1)
        "#,
    )
    .bind(kind)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Inserts categories keeping their ids, overwriting rows that share one.
pub async fn import_categories(pool: &SqlitePool, categories: Vec<Category>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for category in categories {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO categories (id, type) VALUES (?1, ?2)
            "#,
        )
        .bind(category.id)
        .bind(category.kind)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{in_memory, run_migrations};

    async fn pool() -> SqlitePool {
        let pool = in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn orders_by_type_or_id() {
        let pool = pool().await;
        create_category(&pool, "Science").await.unwrap();
        create_category(&pool, "Art").await.unwrap();
        create_category(&pool, "Geography").await.unwrap();

        let by_type: Vec<String> = get_categories_by_type(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.kind)
            .collect();
        assert_eq!(by_type, ["Art", "Geography", "Science"]);

        let by_id: Vec<i64> = get_all_categories(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(by_id, [1, 2, 3]);
    }

    #[tokio::test]
    async fn unknown_category_is_none() {
        let pool = pool().await;
        assert_eq!(get_category(&pool, 42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn import_replaces_by_id() {
        let pool = pool().await;
        create_category(&pool, "Sience").await.unwrap();

        import_categories(
            &pool,
            vec![
                Category {
                    id: 1,
                    kind: "Science".into(),
                },
                Category {
                    id: 5,
                    kind: "Sports".into(),
                },
            ],
        )
        .await
        .unwrap();

        let categories = get_all_categories(&pool).await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].kind, "Science");
        assert_eq!(categories[1].id, 5);
    }

    #[test]
    fn serializes_kind_as_type() {
        let category = Category {
            id: 3,
            kind: "History".into(),
        };
        assert_eq!(
            serde_json::to_value(&category).unwrap(),
            serde_json::json!({"id": 3, "type": "History"})
        );
    }
}
