//! SQLite databases with the application tables, plus a tenant populated with
//! an admin, an organizer and attendees.

use crate::authorization::Caller;
use crate::{booking_logs, bookings, events, notifications, roles::Role, tenants, users, Id};
use chrono::{Days, Utc};
use entity_api::{event, tenant};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema, Set,
};
use service::locks::KeyedLocks;
use std::path::PathBuf;
use std::sync::Arc;

pub(crate) async fn setup_db() -> DatabaseConnection {
    // A single connection keeps every query on the same in-memory database.
    connect("sqlite::memory:", 1).await
}

async fn connect(url: &str, max_connections: u32) -> DatabaseConnection {
    let mut opt = ConnectOptions::new(url);
    opt.max_connections(max_connections)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opt).await.expect("sqlite database");

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let statements = [
        schema.create_table_from_entity(tenants::Entity),
        schema.create_table_from_entity(users::Entity),
        schema.create_table_from_entity(events::Entity),
        schema.create_table_from_entity(bookings::Entity),
        schema.create_table_from_entity(notifications::Entity),
        schema.create_table_from_entity(booking_logs::Entity),
    ];
    for statement in statements {
        db.execute(backend.build(&statement))
            .await
            .expect("create table");
    }

    db
}

/// A database file in the temp directory, removed when dropped.
pub(crate) struct DbFile(PathBuf);

impl DbFile {
    fn new() -> Self {
        DbFile(std::env::temp_dir().join(format!("eventbook-test-{}.db", Id::new_v4())))
    }

    fn url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.0.display())
    }
}

impl Drop for DbFile {
    fn drop(&mut self) {
        for suffix in ["", "-journal", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", self.0.display()));
        }
    }
}

pub(crate) struct Fixture {
    pub db: Arc<DatabaseConnection>,
    pub locks: Arc<KeyedLocks<Id>>,
    pub tenant: tenants::Model,
    pub admin: users::Model,
    pub organizer: users::Model,
    pub attendees: Vec<users::Model>,
    _file: Option<DbFile>,
}

impl Fixture {
    pub(crate) async fn new() -> Self {
        Self::with_attendees(3).await
    }

    pub(crate) async fn with_attendees(count: usize) -> Self {
        Self::populate(setup_db().await, None, count).await
    }

    /// Backed by a database file and a pool of several connections, so
    /// concurrent requests really run their transactions side by side.
    pub(crate) async fn pooled(count: usize) -> Self {
        let file = DbFile::new();
        let db = connect(&file.url(), 4).await;
        Self::populate(db, Some(file), count).await
    }

    async fn populate(db: DatabaseConnection, file: Option<DbFile>, count: usize) -> Self {
        let tenant = tenant::create(&db, "TechConf Inc.").await.expect("tenant");

        let admin = create_user(&db, tenant.id, "admin1@techconf.com", Role::Admin).await;
        let organizer =
            create_user(&db, tenant.id, "organizer1@techconf.com", Role::Organizer).await;
        let mut attendees = Vec::with_capacity(count);
        for i in 1..=count {
            attendees.push(
                create_user(
                    &db,
                    tenant.id,
                    &format!("attendee{i}@techconf.com"),
                    Role::Attendee,
                )
                .await,
            );
        }

        Fixture {
            db: Arc::new(db),
            locks: Arc::new(KeyedLocks::new()),
            tenant,
            admin,
            organizer,
            attendees,
            _file: file,
        }
    }

    pub(crate) fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// An event one week out, organized by the fixture's organizer.
    pub(crate) async fn event(&self, capacity: i32) -> events::Model {
        self.event_on(capacity, 7).await
    }

    pub(crate) async fn event_on(&self, capacity: i32, days_ahead: u64) -> events::Model {
        let now = Utc::now();
        let date = now
            .checked_add_days(Days::new(days_ahead))
            .expect("date in range");
        event::create(
            self.db(),
            self.tenant.id,
            self.organizer.id,
            events::Model {
                id: Id::new_v4(),
                tenant_id: self.tenant.id,
                organizer_id: self.organizer.id,
                title: "Web Development Workshop".to_string(),
                description: None,
                date: date.into(),
                capacity,
                created_at: now.into(),
                updated_at: now.into(),
            },
        )
        .await
        .expect("event")
    }

    /// A user of a second, unrelated tenant.
    pub(crate) async fn outsider(&self, role: Role) -> users::Model {
        let other = tenant::create(self.db(), "MusicFest LLC")
            .await
            .expect("tenant");
        create_user(self.db(), other.id, "someone@musicfest.com", role).await
    }
}

pub(crate) fn caller(user: &users::Model) -> Caller {
    Caller::from(user)
}

async fn create_user(
    db: &DatabaseConnection,
    tenant_id: Id,
    email: &str,
    role: Role,
) -> users::Model {
    // Inserted directly; hashing a password per test user is needlessly slow.
    let now = Utc::now();
    users::ActiveModel {
        id: Set(Id::new_v4()),
        tenant_id: Set(tenant_id),
        email: Set(email.to_string()),
        name: Set(email.to_string()),
        password: Set("unused".to_string()),
        role: Set(role),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await
    .expect("user")
}
