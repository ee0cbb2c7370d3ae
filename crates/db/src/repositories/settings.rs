use crate::models::DbTimetableSettings;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use timetable_core::models::settings::{DefaultSettings, SettingsPatch};
use uuid::Uuid;

pub async fn get_settings(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    timetable_id: Uuid,
) -> Result<Option<DbTimetableSettings>> {
    let settings = sqlx::query_as::<_, DbTimetableSettings>(
        r#"
        SELECT id, timetable_id, user_id, enabled_days, max_lunch_slots, lunch_slot_ids,
               created_at, updated_at
        FROM timetable_settings
        WHERE timetable_id = $1 AND user_id = $2
        "#,
    )
    .bind(timetable_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(settings)
}

/// Inserts the default row. When a concurrent caller already created it, the
/// existing row is returned unchanged.
pub async fn create_default_settings(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    timetable_id: Uuid,
    defaults: &DefaultSettings,
) -> Result<DbTimetableSettings> {
    let now = Utc::now();

    let settings = sqlx::query_as::<_, DbTimetableSettings>(
        r#"
        INSERT INTO timetable_settings
            (id, timetable_id, user_id, enabled_days, max_lunch_slots, lunch_slot_ids,
             created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        ON CONFLICT (timetable_id, user_id)
        DO UPDATE SET updated_at = timetable_settings.updated_at
        RETURNING id, timetable_id, user_id, enabled_days, max_lunch_slots, lunch_slot_ids,
                  created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(timetable_id)
    .bind(user_id)
    .bind(defaults.enabled_days.clone())
    .bind(defaults.max_lunch_slots)
    .bind(defaults.lunch_slot_ids.clone())
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(settings)
}

pub async fn update_settings(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    timetable_id: Uuid,
    patch: &SettingsPatch,
) -> Result<Option<DbTimetableSettings>> {
    let settings = sqlx::query_as::<_, DbTimetableSettings>(
        r#"
        UPDATE timetable_settings
        SET enabled_days = COALESCE($3, enabled_days),
            max_lunch_slots = COALESCE($4, max_lunch_slots),
            lunch_slot_ids = COALESCE($5, lunch_slot_ids),
            updated_at = $6
        WHERE timetable_id = $1 AND user_id = $2
        RETURNING id, timetable_id, user_id, enabled_days, max_lunch_slots, lunch_slot_ids,
                  created_at, updated_at
        "#,
    )
    .bind(timetable_id)
    .bind(user_id)
    .bind(patch.enabled_days.clone())
    .bind(patch.max_lunch_slots)
    .bind(patch.lunch_slot_ids.clone())
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(settings)
}
