use crate::models::{DbSubject, DbTeacher};
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

// Subject Repository

pub async fn get_subjects_by_user(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Vec<DbSubject>> {
    let subjects = sqlx::query_as::<_, DbSubject>(
        r#"
        SELECT id, user_id, name, created_at
        FROM subjects
        WHERE user_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(subjects)
}

pub async fn create_subject(pool: &Pool<Postgres>, user_id: Uuid, name: &str) -> Result<DbSubject> {
    let subject = sqlx::query_as::<_, DbSubject>(
        r#"
        INSERT INTO subjects (id, user_id, name, created_at)
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

    Ok(subject)
}

pub async fn rename_subject(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    id: Uuid,
    name: &str,
) -> Result<Option<DbSubject>> {
    let subject = sqlx::query_as::<_, DbSubject>(
        r#"
        UPDATE subjects
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

    Ok(subject)
}

pub async fn delete_subject(pool: &Pool<Postgres>, user_id: Uuid, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM subjects
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// Teacher Repository

pub async fn get_teachers_by_user(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Vec<DbTeacher>> {
    let teachers = sqlx::query_as::<_, DbTeacher>(
        r#"
        SELECT id, user_id, name, subject_id, created_at
        FROM teachers
        WHERE user_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(teachers)
}

pub async fn create_teacher(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    name: &str,
    subject_id: Uuid,
) -> Result<DbTeacher> {
    let teacher = sqlx::query_as::<_, DbTeacher>(
        r#"
        INSERT INTO teachers (id, user_id, name, subject_id, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, name, subject_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(name)
    .bind(subject_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(teacher)
}

pub async fn update_teacher(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    id: Uuid,
    name: &str,
    subject_id: Uuid,
) -> Result<Option<DbTeacher>> {
    let teacher = sqlx::query_as::<_, DbTeacher>(
        r#"
        UPDATE teachers
        SET name = $3, subject_id = $4
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, name, subject_id, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .bind(subject_id)
    .fetch_optional(pool)
    .await?;

    Ok(teacher)
}

/// Unassigns the teacher's cells, then deletes the teacher.
pub async fn delete_teacher(pool: &Pool<Postgres>, user_id: Uuid, id: Uuid) -> Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE timetableentries
        SET teacher_id = NULL, subject_id = NULL
        WHERE teacher_id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    let result = sqlx::query(
        r#"
        DELETE FROM teachers
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
