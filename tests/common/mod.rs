#![allow(dead_code)]

use product_cart_api::{
    dto::{
        fields::{Numeric, OneOrMany},
        products::ProductFields,
    },
    models::Product,
    services::product_service,
    state::AppState,
};
use tempfile::TempDir;

/// App state over a fresh file store. Keep the `TempDir` alive for the test.
pub async fn file_state() -> anyhow::Result<(TempDir, AppState)> {
    let dir = tempfile::tempdir()?;
    let state = AppState::with_file_store(dir.path()).await?;
    Ok((dir, state))
}

pub fn product_fields(code: &str, category: &str, price: f64) -> ProductFields {
    ProductFields {
        title: Some(format!("Product {code}")),
        description: Some("test product".into()),
        code: Some(code.into()),
        price: Some(Numeric::Number(price)),
        status: None,
        stock: Some(Numeric::Number(5.0)),
        category: Some(category.into()),
        thumbnails: None,
    }
}

pub fn chair_fields() -> ProductFields {
    ProductFields {
        title: Some("Chair".into()),
        description: Some("wood".into()),
        code: Some("C-1".into()),
        price: Some(Numeric::Number(100.0)),
        status: None,
        stock: Some(Numeric::Number(5.0)),
        category: Some("chairs".into()),
        thumbnails: Some(OneOrMany::Many(Vec::new())),
    }
}

pub async fn seed(state: &AppState, code: &str, category: &str, price: f64) -> anyhow::Result<Product> {
    Ok(product_service::create_product(state, product_fields(code, category, price)).await?)
}

/// Writes a product straight to the store, bypassing the catalog service and
/// its write gate.
pub async fn insert_raw(state: &AppState, code: &str) -> anyhow::Result<Product> {
    let product = Product {
        id: uuid::Uuid::new_v4(),
        title: format!("Product {code}"),
        description: "test product".into(),
        code: code.into(),
        price: 1.0,
        status: true,
        stock: 1,
        category: "misc".into(),
        thumbnails: Vec::new(),
    };
    Ok(state.products.insert(product).await?)
}
