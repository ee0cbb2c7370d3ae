use crate::models::DbTimetable;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_timetables_by_user(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Vec<DbTimetable>> {
    let timetables = sqlx::query_as::<_, DbTimetable>(
        r#"
        SELECT id, user_id, name, created_at, updated_at
        FROM timetables
        WHERE user_id = $1
        ORDER BY updated_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(timetables)
}

pub async fn get_timetable_by_id(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<DbTimetable>> {
    let timetable = sqlx::query_as::<_, DbTimetable>(
        r#"
        SELECT id, user_id, name, created_at, updated_at
        FROM timetables
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(timetable)
}

pub async fn create_timetable(pool: &Pool<Postgres>, user_id: Uuid, name: &str) -> Result<DbTimetable> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating timetable: id={}, user_id={}, name={}", id, user_id, name);

    let timetable = sqlx::query_as::<_, DbTimetable>(
        r#"
        INSERT INTO timetables (id, user_id, name, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        RETURNING id, user_id, name, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(timetable)
}

pub async fn rename_timetable(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    id: Uuid,
    name: &str,
) -> Result<Option<DbTimetable>> {
    let timetable = sqlx::query_as::<_, DbTimetable>(
        r#"
        UPDATE timetables
        SET name = $3, updated_at = $4
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, name, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(timetable)
}

/// Deletes a timetable after its entries and settings, in one transaction.
/// Returns false when the timetable does not exist for this user.
pub async fn delete_timetable_cascade(pool: &Pool<Postgres>, user_id: Uuid, id: Uuid) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let entries = sqlx::query(
        r#"
        DELETE FROM timetableentries
        WHERE timetable_id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        DELETE FROM timetable_settings
        WHERE timetable_id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    let timetable = sqlx::query(
        r#"
        DELETE FROM timetables
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(
        "Deleted timetable {} with {} entries",
        id,
        entries.rows_affected()
    );
    Ok(timetable.rows_affected() > 0)
}
