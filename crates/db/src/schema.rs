use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // btree_gist provides gist equality operators for uuid/date, needed by
    // the booking overlap exclusion constraint below.
    sqlx::query("CREATE EXTENSION IF NOT EXISTS btree_gist;")
        .execute(pool)
        .await?;

    // Create professionals table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS professionals (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            staff_limit INT NOT NULL DEFAULT 0,
            max_advance_days INT NOT NULL DEFAULT 0,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            professional_id UUID NOT NULL REFERENCES professionals(id),
            name VARCHAR(255) NOT NULL,
            duration_minutes INT NOT NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_duration CHECK (duration_minutes > 0 AND duration_minutes < 1440)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create staff_members table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS staff_members (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            professional_id UUID NOT NULL REFERENCES professionals(id),
            name VARCHAR(255) NOT NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create staff_services join table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS staff_services (
            staff_id UUID NOT NULL REFERENCES staff_members(id),
            service_id UUID NOT NULL REFERENCES services(id),
            PRIMARY KEY (staff_id, service_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create weekly_schedules table; times are minutes since midnight,
    // day_of_week is 0 = Sunday .. 6 = Saturday.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS weekly_schedules (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            staff_id UUID NOT NULL REFERENCES staff_members(id),
            day_of_week INT NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
            start_minute INT NOT NULL CHECK (start_minute >= 0 AND start_minute < 1440),
            end_minute INT NOT NULL CHECK (end_minute > 0 AND end_minute < 1440),
            active BOOLEAN NOT NULL DEFAULT TRUE,
            service_ids UUID[] NOT NULL DEFAULT '{}',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_window CHECK (end_minute > start_minute)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create schedule_exceptions table; a NULL staff_id scopes the exception
    // to the whole professional, time_ranges is a JSONB list of
    // {start_minute, end_minute} objects.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schedule_exceptions (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            professional_id UUID NOT NULL REFERENCES professionals(id),
            staff_id UUID NULL REFERENCES staff_members(id),
            date DATE NOT NULL,
            is_closed BOOLEAN NOT NULL DEFAULT FALSE,
            time_ranges JSONB NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table. The exclusion constraint rejects overlapping
    // [start, end) intervals for the same staff member and date at write
    // time, for every status that still occupies the slot; the read-time
    // availability check alone cannot close that race.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            professional_id UUID NOT NULL REFERENCES professionals(id),
            staff_id UUID NOT NULL REFERENCES staff_members(id),
            service_id UUID NOT NULL REFERENCES services(id),
            client_id UUID NOT NULL,
            date DATE NOT NULL,
            start_minute INT NOT NULL CHECK (start_minute >= 0 AND start_minute < 1440),
            end_minute INT NOT NULL CHECK (end_minute > 0 AND end_minute < 1440),
            status TEXT NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'confirmed', 'completed', 'canceled', 'cancelled_system')),
            auto_completed_at TIMESTAMP WITH TIME ZONE NULL,
            completed_by TEXT NULL,
            auto_cancelled_by_exception BOOLEAN NOT NULL DEFAULT FALSE,
            cancelled_at TIMESTAMP WITH TIME ZONE NULL,
            cancellation_reason TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_booking_interval CHECK (end_minute > start_minute),
            CONSTRAINT no_overlapping_bookings EXCLUDE USING gist (
                staff_id WITH =,
                date WITH =,
                int4range(start_minute, end_minute) WITH &&
            ) WHERE (status IN ('pending', 'confirmed', 'completed'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create audit_events table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audit_events (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            booking_id UUID NOT NULL REFERENCES bookings(id),
            action TEXT NOT NULL,
            actor TEXT NOT NULL,
            detail JSONB NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_staff_members_professional_id ON staff_members(professional_id);
        CREATE INDEX IF NOT EXISTS idx_staff_services_service_id ON staff_services(service_id);
        CREATE INDEX IF NOT EXISTS idx_weekly_schedules_staff_day ON weekly_schedules(staff_id, day_of_week);
        CREATE INDEX IF NOT EXISTS idx_schedule_exceptions_professional_date ON schedule_exceptions(professional_id, date);
        CREATE INDEX IF NOT EXISTS idx_bookings_staff_date ON bookings(staff_id, date);
        CREATE INDEX IF NOT EXISTS idx_bookings_status_date ON bookings(status, date);
        CREATE INDEX IF NOT EXISTS idx_audit_events_booking_id ON audit_events(booking_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
