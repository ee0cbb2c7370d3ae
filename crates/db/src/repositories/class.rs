use crate::models::{DbClass, DbSection};
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

// Class Repository

pub async fn get_classes_by_user(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Vec<DbClass>> {
    let classes = sqlx::query_as::<_, DbClass>(
        r#"
        SELECT id, user_id, name, created_at
        FROM classes
        WHERE user_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(classes)
}

pub async fn create_class(pool: &Pool<Postgres>, user_id: Uuid, name: &str) -> Result<DbClass> {
    let class = sqlx::query_as::<_, DbClass>(
        r#"
        INSERT INTO classes (id, user_id, name, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, name, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(name)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(class)
}

pub async fn rename_class(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    id: Uuid,
    name: &str,
) -> Result<Option<DbClass>> {
    let class = sqlx::query_as::<_, DbClass>(
        r#"
        UPDATE classes
        SET name = $3
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, name, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(class)
}

/// Sections and their entries go with the class through ON DELETE CASCADE.
pub async fn delete_class(pool: &Pool<Postgres>, user_id: Uuid, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM classes
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// Section Repository

pub async fn get_sections_by_user(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Vec<DbSection>> {
    let sections = sqlx::query_as::<_, DbSection>(
        r#"
        SELECT id, user_id, class_id, name, created_at
        FROM sections
        WHERE user_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(sections)
}

/// Returns `None` when the class does not belong to the user.
pub async fn create_section(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    class_id: Uuid,
    name: &str,
) -> Result<Option<DbSection>> {
    let section = sqlx::query_as::<_, DbSection>(
        r#"
        INSERT INTO sections (id, user_id, class_id, name, created_at)
        SELECT $1, $2, c.id, $4, $5
        FROM classes c
        WHERE c.id = $3 AND c.user_id = $2
        RETURNING id, user_id, class_id, name, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(class_id)
    .bind(name)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(section)
}

pub async fn rename_section(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    class_id: Uuid,
    id: Uuid,
    name: &str,
) -> Result<Option<DbSection>> {
    let section = sqlx::query_as::<_, DbSection>(
        r#"
        UPDATE sections
        SET name = $4
        WHERE id = $1 AND class_id = $2 AND user_id = $3
        RETURNING id, user_id, class_id, name, created_at
        "#,
    )
    .bind(id)
    .bind(class_id)
    .bind(user_id)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(section)
}

pub async fn delete_section(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    class_id: Uuid,
    id: Uuid,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM sections
        WHERE id = $1 AND class_id = $2 AND user_id = $3
        "#,
    )
    .bind(id)
    .bind(class_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
