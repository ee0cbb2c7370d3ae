use crate::models::DbTimeSlot;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_time_slot(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    start_time: &str,
    end_time: &str,
    is_lunch: bool,
) -> Result<DbTimeSlot> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let time_slot = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        INSERT INTO timeslots (id, user_id, start_time, end_time, is_lunch, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, start_time, end_time, is_lunch, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(start_time)
    .bind(end_time)
    .bind(is_lunch)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(time_slot)
}

pub async fn get_time_slots_by_user(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Vec<DbTimeSlot>> {
    let time_slots = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT id, user_id, start_time, end_time, is_lunch, created_at
        FROM timeslots
        WHERE user_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(time_slots)
}

pub async fn update_time_slot(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    id: Uuid,
    start_time: &str,
    end_time: &str,
    is_lunch: Option<bool>,
) -> Result<Option<DbTimeSlot>> {
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        UPDATE timeslots
        SET start_time = $3, end_time = $4, is_lunch = COALESCE($5, is_lunch)
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, start_time, end_time, is_lunch, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(start_time)
    .bind(end_time)
    .bind(is_lunch)
    .fetch_optional(pool)
    .await?;

    Ok(time_slot)
}

/// Entries in the slot go through ON DELETE CASCADE; the slot id is also
/// removed from every lunch set of the user's timetables.
pub async fn delete_time_slot(pool: &Pool<Postgres>, user_id: Uuid, id: Uuid) -> Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE timetable_settings
        SET lunch_slot_ids = array_remove(lunch_slot_ids, $1)
        WHERE user_id = $2 AND $1 = ANY(lunch_slot_ids)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    let result = sqlx::query(
        r#"
        DELETE FROM timeslots
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}
