use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

const INDEXES: [&str; 9] = [
    "CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_timetables_user_id ON timetables(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_classes_user_id ON classes(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_sections_class_id ON sections(class_id)",
    "CREATE INDEX IF NOT EXISTS idx_subjects_user_id ON subjects(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_teachers_user_id ON teachers(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_timeslots_user_id ON timeslots(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_entries_grid \
     ON timetableentries(user_id, timetable_id, class_id, section_id)",
    "CREATE INDEX IF NOT EXISTS idx_entries_teacher_cell \
     ON timetableentries(user_id, timetable_id, teacher_id, day_id, time_slot_id)",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create sessions table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token VARCHAR(128) PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            expires_at TIMESTAMP WITH TIME ZONE NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create timetables table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS timetables (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create timetable_settings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS timetable_settings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            timetable_id UUID NOT NULL REFERENCES timetables(id),
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            enabled_days SMALLINT[] NOT NULL DEFAULT '{1,2,3,4,5}',
            max_lunch_slots INTEGER NOT NULL DEFAULT 1,
            lunch_slot_ids UUID[] NOT NULL DEFAULT '{}',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT timetable_settings_unique UNIQUE (timetable_id, user_id),
            CONSTRAINT non_negative_max_lunch CHECK (max_lunch_slots >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create classes table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS classes (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create sections table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sections (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            class_id UUID NOT NULL REFERENCES classes(id) ON DELETE CASCADE,
            name VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create subjects table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS subjects (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create teachers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teachers (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name VARCHAR(255) NOT NULL,
            subject_id UUID NOT NULL REFERENCES subjects(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create timeslots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS timeslots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            start_time VARCHAR(16) NOT NULL,
            end_time VARCHAR(16) NOT NULL,
            is_lunch BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create timetableentries table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS timetableentries (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            timetable_id UUID NOT NULL REFERENCES timetables(id),
            class_id UUID NOT NULL REFERENCES classes(id) ON DELETE CASCADE,
            section_id UUID NOT NULL REFERENCES sections(id) ON DELETE CASCADE,
            day_id SMALLINT NOT NULL,
            time_slot_id UUID NOT NULL REFERENCES timeslots(id) ON DELETE CASCADE,
            teacher_id UUID NULL REFERENCES teachers(id),
            subject_id UUID NULL REFERENCES subjects(id),
            CONSTRAINT valid_day CHECK (day_id BETWEEN 1 AND 6),
            CONSTRAINT teacher_subject_paired CHECK ((teacher_id IS NULL) = (subject_id IS NULL)),
            CONSTRAINT timetableentries_cell_unique
                UNIQUE (user_id, timetable_id, class_id, section_id, day_id, time_slot_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Server-side conflict check
    sqlx::query(
        r#"
        CREATE OR REPLACE FUNCTION check_teacher_conflict(
            p_user_id UUID,
            p_timetable_id UUID,
            p_teacher_id UUID,
            p_class_id UUID,
            p_section_id UUID,
            p_time_slot_id UUID,
            p_day_id SMALLINT
        ) RETURNS BOOLEAN AS $$
            SELECT EXISTS (
                SELECT 1
                FROM timetableentries
                WHERE user_id = p_user_id
                  AND timetable_id = p_timetable_id
                  AND teacher_id = p_teacher_id
                  AND time_slot_id = p_time_slot_id
                  AND day_id = p_day_id
                  AND (class_id <> p_class_id OR section_id <> p_section_id)
            );
        $$ LANGUAGE sql STABLE;
        "#,
    )
    .execute(pool)
    .await?;

    // Prepared statements hold one command each
    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
