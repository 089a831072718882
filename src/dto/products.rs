use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::fields::{Flag, Numeric, OneOrMany};

/// Product fields as sent by clients, used both to create a product (where
/// the required ones must be present) and as a partial update patch.
///
/// Unknown keys, `id` and `_id` included, are dropped during deserialization.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct ProductFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<Numeric>,
    #[schema(value_type = Option<bool>)]
    pub status: Option<Flag>,
    #[schema(value_type = Option<i64>)]
    pub stock: Option<Numeric>,
    pub category: Option<String>,
    #[schema(value_type = Option<Vec<String>>)]
    pub thumbnails: Option<OneOrMany>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeletedProduct {
    pub deleted: Uuid,
}
