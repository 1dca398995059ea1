use chrono::{DateTime, FixedOffset};
use sea_orm::Value;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use domain::{Id, IntoQueryFilterMap, IntoUpdateMap, QueryFilterMap, UpdateMap};

/// Query string of `GET /events`. Events are always limited to the caller's tenant.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    #[param(value_type = Option<Uuid>)]
    pub(crate) organizer_id: Option<Id>,
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        if let Some(organizer_id) = self.organizer_id {
            query_filter_map.insert(
                "organizer_id".to_string(),
                Some(Value::Uuid(Some(Box::new(organizer_id)))),
            );
        }

        query_filter_map
    }
}

/// Body of `PUT /events/:id`; absent fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateParams {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub(crate) date: Option<DateTime<FixedOffset>>,
    pub(crate) capacity: Option<i32>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        if let Some(title) = self.title {
            update_map.insert(
                "title".to_string(),
                Some(Value::String(Some(Box::new(title)))),
            );
        }
        if let Some(description) = self.description {
            update_map.insert(
                "description".to_string(),
                Some(Value::String(Some(Box::new(description)))),
            );
        }
        if let Some(date) = self.date {
            update_map.insert(
                "date".to_string(),
                Some(Value::ChronoDateTimeWithTimeZone(Some(Box::new(date)))),
            );
        }
        if let Some(capacity) = self.capacity {
            update_map.insert("capacity".to_string(), Some(Value::Int(Some(capacity))));
        }

        update_map
    }
}
