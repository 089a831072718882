use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{dto::fields::Numeric, models::Product};

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct QuantityRequest {
    #[schema(value_type = Option<f64>)]
    pub quantity: Option<Numeric>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CartLineRequest {
    pub product: String,
    #[schema(value_type = Option<f64>)]
    pub quantity: Option<Numeric>,
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct ReplaceCartRequest {
    #[serde(default)]
    pub products: Vec<CartLineRequest>,
}

/// A cart line with its product resolved; `detail` is absent when the product
/// has been deleted since it was added.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartItemDto {
    pub product: Uuid,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Product>,
}
