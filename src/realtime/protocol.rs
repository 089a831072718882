//! JSON frames exchanged on the realtime channel.
//!
//! Every frame is `{"event": "<name>", "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::{dto::products::ProductFields, models::Product};

/// Server → observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Full current product list.
    #[serde(rename = "products:list")]
    ProductList(Vec<Product>),
    /// Failure of a request sent by this observer.
    #[serde(rename = "products:error")]
    Error(String),
}

/// Observer → server.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "product:create")]
    CreateProduct(ProductFields),
    /// Product id, as sent by the client.
    #[serde(rename = "product:delete")]
    DeleteProduct(String),
}
