use chrono::{Days, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Value};
use std::collections::HashMap;

pub use entity::{
    booking_log_action, booking_logs, bookings, events, notification_type, notifications, roles,
    status, tenants, users, Id,
};

pub mod booking;
pub mod booking_log;
pub mod error;
pub mod event;
pub mod mutate;
pub mod notification;
pub mod query;
pub mod tenant;
pub mod user;

/// `QueryFilterMap` is a data structure that serves as a bridge for translating filter parameters
/// between different layers of the application. It is essentially a wrapper around a `HashMap`
/// where the keys are filter parameter names (as `String`) and the values are optional `Value` types
/// from `sea_orm`.
///
/// # Example
///
/// ```
/// use sea_orm::Value;
/// use entity_api::QueryFilterMap;
///
/// let mut query_filter_map = QueryFilterMap::new();
/// query_filter_map.insert("tenant_id".to_string(), Some(Value::String(Some(Box::new("a_tenant_id".to_string())))));
/// let filter_value = query_filter_map.get("tenant_id");
/// ```
pub struct QueryFilterMap {
    map: HashMap<String, Option<Value>>,
}

impl QueryFilterMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        // HashMap.get returns an Option and so we need to "flatten" this to a single Option
        self.map
            .get(key)
            .and_then(|inner_option| inner_option.clone())
    }

    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }
}

impl Default for QueryFilterMap {
    fn default() -> Self {
        Self::new()
    }
}

/// `IntoQueryFilterMap` is a trait that provides a method for converting a struct into a `QueryFilterMap`.
/// Implementing it for a request parameter struct defines how its fields map onto entity columns.
pub trait IntoQueryFilterMap {
    fn into_query_filter_map(self) -> QueryFilterMap;
}

const SEED_PASSWORD: &str = "password123";

/// Populates an empty database with two demo tenants, their staff, attendees,
/// upcoming events and a booking ledger that is consistent with each event's capacity.
pub async fn seed_database(db: &impl ConnectionTrait) -> Result<(), error::Error> {
    let now = Utc::now();

    for (index, (tenant_name, domain, events)) in [
        (
            "TechConf Inc.",
            "techconf.com",
            [
                ("Web Development Workshop", "Learn the latest web development techniques and tools.", 7, 5, 5, 3),
                ("AI and Machine Learning Conference", "Explore the cutting-edge advancements in AI and machine learning.", 14, 3, 2, 0),
            ],
        ),
        (
            "MusicFest LLC",
            "musicfest.com",
            [
                ("Rock Concert", "An amazing rock concert featuring top bands.", 10, 5, 4, 0),
                ("Jazz Festival", "A celebration of jazz music with renowned artists.", 21, 3, 3, 2),
            ],
        ),
    ]
    .into_iter()
    .enumerate()
    {
        let n = index + 1;
        let tenant = tenant::create(db, tenant_name).await?;
        let short_name = tenant_name.split_whitespace().next().unwrap_or(tenant_name);

        user::create(
            db,
            tenant.id,
            &format!("admin{n}@{domain}"),
            &format!("Admin {short_name}"),
            SEED_PASSWORD,
            roles::Role::Admin,
        )
        .await?;

        let organizer = user::create(
            db,
            tenant.id,
            &format!("organizer{n}@{domain}"),
            &format!("Organizer {short_name}"),
            SEED_PASSWORD,
            roles::Role::Organizer,
        )
        .await?;

        let mut attendees = Vec::with_capacity(10);
        for i in 1..=10 {
            attendees.push(
                user::create(
                    db,
                    tenant.id,
                    &format!("attendee{i}@{domain}"),
                    &format!("Attendee {i} {short_name}"),
                    SEED_PASSWORD,
                    roles::Role::Attendee,
                )
                .await?,
            );
        }

        let mut next_attendee = attendees.iter();
        for (title, description, days_ahead, capacity, confirmed, waitlisted) in events {
            let date = now
                .checked_add_days(Days::new(days_ahead))
                .unwrap_or(now);

            let event = events::ActiveModel {
                id: Set(Id::new_v4()),
                tenant_id: Set(tenant.id),
                organizer_id: Set(organizer.id),
                title: Set(title.to_owned()),
                description: Set(Some(description.to_owned())),
                date: Set(date.into()),
                capacity: Set(capacity),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(db)
            .await?;

            let statuses = std::iter::repeat(status::Status::Confirmed)
                .take(confirmed)
                .chain(std::iter::repeat(status::Status::Waitlisted).take(waitlisted));

            for booking_status in statuses {
                if let Some(attendee) = next_attendee.next() {
                    booking::create(db, tenant.id, event.id, attendee.id, booking_status).await?;
                }
            }
        }
    }

    Ok(())
}
