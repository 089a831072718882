use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::store::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub code: String,
    pub price: f64,
    pub status: bool,
    pub stock: i64,
    pub category: String,
    #[serde(default)]
    pub thumbnails: Vec<String>,
}

impl Record for Product {
    const COLLECTION: &'static str = "products";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// One product reference inside a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub product: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    pub id: Uuid,
    #[serde(default)]
    pub products: Vec<CartLine>,
}

impl Cart {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            products: Vec::new(),
        }
    }

    pub fn line(&self, product: Uuid) -> Option<&CartLine> {
        self.products.iter().find(|line| line.product == product)
    }

    pub fn line_mut(&mut self, product: Uuid) -> Option<&mut CartLine> {
        self.products.iter_mut().find(|line| line.product == product)
    }
}

impl Record for Cart {
    const COLLECTION: &'static str = "carts";

    fn id(&self) -> Uuid {
        self.id
    }
}
