use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::SqlitePool;

#[derive(Serialize, Deserialize, sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

/// Field values exactly as a client submitted them. Type checking is left
/// to the table definition, so a value the store cannot coerce fails the
/// insert instead of being rejected up front.
pub struct NewQuestion<'a> {
    pub question: &'a Value,
    pub answer: &'a Value,
    pub category: &'a Value,
    pub difficulty: &'a Value,
}

fn bind_json<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Number(n) => match n.as_i64() {
            Some(n) => query.bind(n),
            None => query.bind(n.as_f64()),
        },
        Value::String(s) => query.bind(s.clone()),
        other => query.bind(other.to_string()),
    }
}

/// Case-insensitive, Unicode aware substring test. `LIKE` in SQLite only
/// folds ASCII letters, so matching happens here instead of in the query.
pub(crate) fn contains_ignore_case(text: &str, term: &str) -> bool {
    text.to_lowercase().contains(&term.to_lowercase())
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        WHERE questions.category = ?1
        ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let mut questions = get_all_questions(pool).await?;
    questions.retain(|q| contains_ignore_case(&q.question, term));
    Ok(questions)
}

pub async fn create_question(pool: &SqlitePool, new: NewQuestion<'_>) -> sqlx::Result<i64> {
    let query = sqlx::query(
        r#"
        INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    );
    let query = bind_json(query, new.question);
    let query = bind_json(query, new.answer);
    let query = bind_json(query, new.category);
    let query = bind_json(query, new.difficulty);

    let id = query.execute(pool).await?.last_insert_rowid();
    Ok(id)
}

/// Returns `false` when no question had that id.
pub async fn delete_question(pool: &SqlitePool, question_id: i64) -> sqlx::Result<bool> {
    let deleted = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(question_id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(deleted > 0)
}

pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO questions (id, question, answer, category, difficulty)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(question.id)
        .bind(question.question)
        .bind(question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{in_memory, run_migrations};
    use serde_json::json;

    async fn pool() -> SqlitePool {
        let pool = in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    async fn insert(pool: &SqlitePool, question: &str, category: i64) -> i64 {
        let (q, a, c, d) = (json!(question), json!("answer"), json!(category), json!(1));
        create_question(
            pool,
            NewQuestion {
                question: &q,
                answer: &a,
                category: &c,
                difficulty: &d,
            },
        )
        .await
        .unwrap()
    }

    #[test]
    fn matching_folds_case_beyond_ascii() {
        assert!(contains_ignore_case("Où est l'ÉCOLE?", "école"));
        assert!(contains_ignore_case("ΣΟΦΙΑ", "σοφ"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("title", "titles"));
    }

    #[tokio::test]
    async fn numeric_strings_are_coerced() {
        let pool = pool().await;
        let (q, a, c, d) = (json!("Q"), json!("A"), json!("2"), json!(3));
        let id = create_question(
            &pool,
            NewQuestion {
                question: &q,
                answer: &a,
                category: &c,
                difficulty: &d,
            },
        )
        .await
        .unwrap();

        let stored = get_question(&pool, id).await.unwrap().unwrap();
        assert_eq!(stored.category, 2);
        assert_eq!(stored.difficulty, 3);
    }

    #[tokio::test]
    async fn non_integer_difficulty_is_rejected() {
        let pool = pool().await;
        let (q, a, c) = (json!("Q"), json!("A"), json!(1));
        for difficulty in [json!("hard"), json!(2.5), json!([1]), json!(true)] {
            let result = create_question(
                &pool,
                NewQuestion {
                    question: &q,
                    answer: &a,
                    category: &c,
                    difficulty: &difficulty,
                },
            )
            .await;
            assert!(result.is_err(), "{difficulty} was accepted");
        }
        assert!(get_all_questions(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_literal() {
        let pool = pool().await;
        insert(&pool, "What is the Title of the movie?", 5).await;
        insert(&pool, "Whose autobiography is entitled X?", 4).await;
        insert(&pool, "Which planet is closest to the sun?", 1).await;
        insert(&pool, "Is 100% of the moon visible?", 1).await;

        let found = search_questions(&pool, "TITLE").await.unwrap();
        assert_eq!(found.len(), 2);

        let found = search_questions(&pool, "%").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "Is 100% of the moon visible?");

        insert(&pool, "Où est l'ÉCOLE?", 3).await;
        let found = search_questions(&pool, "école").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "Où est l'ÉCOLE?");
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let pool = pool().await;
        let id = insert(&pool, "Q", 1).await;
        assert!(delete_question(&pool, id).await.unwrap());
        assert!(!delete_question(&pool, id).await.unwrap());
    }

    #[tokio::test]
    async fn filters_by_category() {
        let pool = pool().await;
        insert(&pool, "one", 1).await;
        insert(&pool, "two", 2).await;
        insert(&pool, "three", 2).await;

        let questions = get_questions_for_category(&pool, 2).await.unwrap();
        assert_eq!(
            questions.iter().map(|q| q.question.as_str()).collect::<Vec<_>>(),
            ["two", "three"]
        );
    }
}
