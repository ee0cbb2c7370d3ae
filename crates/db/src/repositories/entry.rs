use crate::models::DbTimetableEntry;
use eyre::{Result, eyre};
use sqlx::{Pool, Postgres, Transaction};
use timetable_core::{conflict::ConflictProbe, models::entry::NewEntry};
use uuid::Uuid;

const UPSERT_ENTRY: &str = r#"
    INSERT INTO timetableentries
        (id, user_id, timetable_id, class_id, section_id, day_id, time_slot_id, teacher_id, subject_id)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
    ON CONFLICT (user_id, timetable_id, class_id, section_id, day_id, time_slot_id)
    DO UPDATE SET teacher_id = EXCLUDED.teacher_id, subject_id = EXCLUDED.subject_id
    RETURNING id, user_id, timetable_id, class_id, section_id, day_id, time_slot_id, teacher_id, subject_id
"#;

/// Cells of one class/section, by day and then by slot start time.
pub async fn get_entries_for_grid(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    timetable_id: Uuid,
    class_id: Uuid,
    section_id: Uuid,
) -> Result<Vec<DbTimetableEntry>> {
    let entries = sqlx::query_as::<_, DbTimetableEntry>(
        r#"
        SELECT e.id, e.user_id, e.timetable_id, e.class_id, e.section_id, e.day_id,
               e.time_slot_id, e.teacher_id, e.subject_id
        FROM timetableentries e
        JOIN timeslots ts ON ts.id = e.time_slot_id
        WHERE e.user_id = $1 AND e.timetable_id = $2 AND e.class_id = $3 AND e.section_id = $4
        ORDER BY e.day_id ASC, to_timestamp(ts.start_time, 'HH12:MI AM')::time ASC, ts.created_at ASC
        "#,
    )
    .bind(user_id)
    .bind(timetable_id)
    .bind(class_id)
    .bind(section_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

async fn upsert_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    entry: &NewEntry,
) -> Result<DbTimetableEntry> {
    let row = sqlx::query_as::<_, DbTimetableEntry>(UPSERT_ENTRY)
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(entry.key.timetable_id)
        .bind(entry.key.class_id)
        .bind(entry.key.section_id)
        .bind(entry.key.day_id)
        .bind(entry.key.time_slot_id)
        .bind(entry.teacher_id())
        .bind(entry.subject_id())
        .fetch_one(&mut **tx)
        .await?;

    Ok(row)
}

/// Upserts every row on the cell key inside one transaction.
pub async fn upsert_entries(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    entries: &[NewEntry],
) -> Result<Vec<DbTimetableEntry>> {
    let mut tx = pool.begin().await?;
    let mut rows = Vec::with_capacity(entries.len());
    for entry in entries {
        rows.push(upsert_in_tx(&mut tx, user_id, entry).await?);
    }
    tx.commit().await?;

    Ok(rows)
}

pub async fn upsert_entry(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    entry: &NewEntry,
) -> Result<DbTimetableEntry> {
    let mut tx = pool.begin().await?;
    let row = upsert_in_tx(&mut tx, user_id, entry).await?;
    tx.commit().await?;

    Ok(row)
}

pub async fn check_teacher_conflict(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    probe: &ConflictProbe,
) -> Result<bool> {
    let conflict = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT check_teacher_conflict($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(user_id)
    .bind(probe.timetable_id)
    .bind(probe.teacher_id)
    .bind(probe.class_id)
    .bind(probe.section_id)
    .bind(probe.time_slot_id)
    .bind(probe.day_id)
    .fetch_one(pool)
    .await?;

    Ok(conflict)
}

pub async fn count_subject_entries(pool: &Pool<Postgres>, user_id: Uuid, subject_id: Uuid) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM timetableentries
        WHERE user_id = $1 AND subject_id = $2
        "#,
    )
    .bind(user_id)
    .bind(subject_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Conflict check and upsert as one atomic step.
///
/// A transaction-scoped advisory lock on the teacher serializes concurrent
/// assignments of the same teacher, so two writers cannot both pass the
/// check. Returns `None` without writing when the teacher is already booked.
pub async fn assign_if_free(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    entry: &NewEntry,
) -> Result<Option<DbTimetableEntry>> {
    let assignment = entry
        .assignment
        .ok_or_else(|| eyre!("assign_if_free requires a teacher and subject"))?;

    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
        .bind(assignment.teacher_id)
        .execute(&mut *tx)
        .await?;

    let conflict = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT check_teacher_conflict($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(user_id)
    .bind(entry.key.timetable_id)
    .bind(assignment.teacher_id)
    .bind(entry.key.class_id)
    .bind(entry.key.section_id)
    .bind(entry.key.time_slot_id)
    .bind(entry.key.day_id)
    .fetch_one(&mut *tx)
    .await?;

    if conflict {
        tx.rollback().await?;
        return Ok(None);
    }

    let row = upsert_in_tx(&mut tx, user_id, entry).await?;
    tx.commit().await?;

    Ok(Some(row))
}
