use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Enumerated columns are TEXT with CHECK constraints so the stored values
// match the string values of the entity enums.
const CREATE_TABLES: [&str; 6] = [
    "CREATE TABLE IF NOT EXISTS eventbook.tenants (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name VARCHAR(255) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS eventbook.users (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        tenant_id UUID NOT NULL REFERENCES eventbook.tenants(id),
        email VARCHAR(255) NOT NULL UNIQUE,
        name VARCHAR(255) NOT NULL,
        password VARCHAR(255) NOT NULL,
        role TEXT NOT NULL DEFAULT 'attendee'
            CHECK (role IN ('attendee', 'organizer', 'admin')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS eventbook.events (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        tenant_id UUID NOT NULL REFERENCES eventbook.tenants(id),
        organizer_id UUID NOT NULL REFERENCES eventbook.users(id),
        title VARCHAR(255) NOT NULL,
        description TEXT,
        date TIMESTAMPTZ NOT NULL,
        capacity INTEGER NOT NULL CHECK (capacity > 0),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS eventbook.bookings (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        tenant_id UUID NOT NULL REFERENCES eventbook.tenants(id),
        event_id UUID NOT NULL REFERENCES eventbook.events(id),
        user_id UUID NOT NULL REFERENCES eventbook.users(id),
        status TEXT NOT NULL DEFAULT 'confirmed'
            CHECK (status IN ('confirmed', 'waitlisted', 'canceled')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS eventbook.notifications (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        tenant_id UUID NOT NULL REFERENCES eventbook.tenants(id),
        user_id UUID NOT NULL REFERENCES eventbook.users(id),
        booking_id UUID NOT NULL REFERENCES eventbook.bookings(id),
        notification_type TEXT NOT NULL
            CHECK (notification_type IN
                ('booking_confirmed', 'waitlisted', 'waitlist_promoted', 'booking_canceled')),
        title VARCHAR(255) NOT NULL,
        message TEXT NOT NULL,
        read BOOLEAN NOT NULL DEFAULT false,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS eventbook.booking_logs (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        tenant_id UUID NOT NULL REFERENCES eventbook.tenants(id),
        booking_id UUID NOT NULL REFERENCES eventbook.bookings(id),
        event_id UUID NOT NULL REFERENCES eventbook.events(id),
        user_id UUID NOT NULL REFERENCES eventbook.users(id),
        action TEXT NOT NULL
            CHECK (action IN
                ('auto_confirm', 'auto_waitlist', 'cancel_confirmed', 'promote_from_waitlist')),
        note TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
];

const CREATE_INDEXES: [&str; 6] = [
    // At most one confirmed or waitlisted booking per user and event
    "CREATE UNIQUE INDEX IF NOT EXISTS bookings_event_user_active_unique
        ON eventbook.bookings(event_id, user_id)
        WHERE status <> 'canceled'",
    // Waitlist head lookup and per-status counts
    "CREATE INDEX IF NOT EXISTS bookings_event_status_created_at_idx
        ON eventbook.bookings(event_id, status, created_at, id)",
    "CREATE INDEX IF NOT EXISTS bookings_tenant_status_idx
        ON eventbook.bookings(tenant_id, status)",
    "CREATE INDEX IF NOT EXISTS events_tenant_date_idx
        ON eventbook.events(tenant_id, date)",
    "CREATE INDEX IF NOT EXISTS notifications_user_read_created_at_idx
        ON eventbook.notifications(user_id, read, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS booking_logs_tenant_created_at_idx
        ON eventbook.booking_logs(tenant_id, created_at DESC)",
];

const TABLES: [&str; 6] = [
    "booking_logs",
    "notifications",
    "bookings",
    "events",
    "users",
    "tenants",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for sql in CREATE_TABLES.iter().chain(CREATE_INDEXES.iter()) {
            db.execute_unprepared(sql).await?;
        }

        // Set table ownership to the application user to avoid permission issues
        // when migrations run as a different (super)user
        for table in TABLES {
            db.execute_unprepared(&format!("ALTER TABLE eventbook.{table} OWNER TO eventbook"))
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // Dependents first; dropping a table also drops its indexes
        for table in TABLES {
            db.execute_unprepared(&format!("DROP TABLE IF EXISTS eventbook.{table}"))
                .await?;
        }

        Ok(())
    }
}
