use uuid::Uuid;

use crate::{
    dto::{
        fields::{Flag, Numeric},
        products::{DeletedProduct, ProductFields},
    },
    error::{AppError, AppResult},
    models::Product,
    routes::params::{PageWindow, ProductQuery, SortOrder},
    state::AppState,
    store::Predicate,
};

/// One page of a filtered, sorted product listing.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub window: PageWindow,
}

pub async fn list_products(state: &AppState, query: &ProductQuery) -> AppResult<ProductPage> {
    let filter = query.filter();
    let mut items = if filter.is_empty() {
        state.products.find(None).await?
    } else {
        let keep: &Predicate<'_, Product> = &|p: &Product| filter.matches(p);
        state.products.find(Some(keep)).await?
    };

    match query.sort_order() {
        Some(SortOrder::Asc) => items.sort_by(|a, b| a.price.total_cmp(&b.price)),
        Some(SortOrder::Desc) => items.sort_by(|a, b| b.price.total_cmp(&a.price)),
        None => {}
    }

    let window = query.pagination().window(items.len() as u64);
    let items = items
        .into_iter()
        .skip(window.offset())
        .take(window.limit as usize)
        .collect();

    Ok(ProductPage { items, window })
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    state
        .products
        .find_by_id(id)
        .await?
        .ok_or_else(product_not_found)
}

pub async fn create_product(state: &AppState, payload: ProductFields) -> AppResult<Product> {
    let _gate = state.write_gate.lock().await;

    let product = new_product(Uuid::new_v4(), payload)?;
    ensure_code_free(state, &product.code, None).await?;
    let product = state.products.insert(product).await?;
    tracing::info!(product_id = %product.id, code = %product.code, "product created");

    broadcast_products(state).await;
    Ok(product)
}

pub async fn update_product(
    state: &AppState,
    id: Uuid,
    payload: ProductFields,
) -> AppResult<Product> {
    let _gate = state.write_gate.lock().await;

    let mut product = state
        .products
        .find_by_id(id)
        .await?
        .ok_or_else(product_not_found)?;

    if let Some(code) = payload.code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        ensure_code_free(state, code, Some(id)).await?;
    }
    apply_patch(&mut product, payload)?;

    let product = state
        .products
        .replace(id, product)
        .await?
        .ok_or_else(product_not_found)?;
    tracing::info!(product_id = %product.id, "product updated");

    broadcast_products(state).await;
    Ok(product)
}

pub async fn delete_product(state: &AppState, id: Uuid) -> AppResult<DeletedProduct> {
    let _gate = state.write_gate.lock().await;

    if !state.products.delete(id).await? {
        return Err(product_not_found());
    }
    tracing::info!(product_id = %id, "product deleted");

    broadcast_products(state).await;
    Ok(DeletedProduct { deleted: id })
}

pub(crate) fn product_not_found() -> AppError {
    AppError::not_found("Product not found")
}

async fn broadcast_products(state: &AppState) {
    if let Err(err) = state.notifier.broadcast_product_list().await {
        tracing::warn!(error = %err, "product list broadcast failed");
    }
}

/// Fails when another product (any other than `except`) already uses `code`.
async fn ensure_code_free(state: &AppState, code: &str, except: Option<Uuid>) -> AppResult<()> {
    let taken: &Predicate<'_, Product> = &|p: &Product| p.code == code && Some(p.id) != except;
    if state.products.find(Some(taken)).await?.is_empty() {
        Ok(())
    } else {
        Err(AppError::Conflict(format!(
            "product code `{code}` already exists"
        )))
    }
}

fn new_product(id: Uuid, payload: ProductFields) -> AppResult<Product> {
    let title = present_text(payload.title);
    let description = present_text(payload.description);
    let code = present_text(payload.code);
    let category = present_text(payload.category);

    let missing: Vec<&str> = [
        ("title", title.is_none()),
        ("description", description.is_none()),
        ("code", code.is_none()),
        ("price", payload.price.is_none()),
        ("stock", payload.stock.is_none()),
        ("category", category.is_none()),
    ]
    .into_iter()
    .filter_map(|(name, absent)| absent.then_some(name))
    .collect();

    let (Some(title), Some(description), Some(code), Some(price), Some(stock), Some(category)) =
        (title, description, code, payload.price, payload.stock, category)
    else {
        return Err(AppError::validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    };

    Ok(Product {
        id,
        title,
        description,
        code,
        price: normalize_price(&price)?,
        status: match payload.status {
            Some(flag) => normalize_status(&flag)?,
            None => true,
        },
        stock: normalize_stock(&stock)?,
        category,
        thumbnails: payload.thumbnails.map(|t| t.into_vec()).unwrap_or_default(),
    })
}

/// Merges every provided field over `product`. The id is never touched.
fn apply_patch(product: &mut Product, payload: ProductFields) -> AppResult<()> {
    if let Some(title) = payload.title {
        product.title = required_text("title", title)?;
    }
    if let Some(description) = payload.description {
        product.description = required_text("description", description)?;
    }
    if let Some(code) = payload.code {
        product.code = required_text("code", code)?;
    }
    if let Some(category) = payload.category {
        product.category = required_text("category", category)?;
    }
    if let Some(price) = payload.price {
        product.price = normalize_price(&price)?;
    }
    if let Some(stock) = payload.stock {
        product.stock = normalize_stock(&stock)?;
    }
    if let Some(status) = payload.status {
        product.status = normalize_status(&status)?;
    }
    if let Some(thumbnails) = payload.thumbnails {
        product.thumbnails = thumbnails.into_vec();
    }
    Ok(())
}

fn present_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_text(field: &str, value: String) -> AppResult<String> {
    present_text(Some(value))
        .ok_or_else(|| AppError::validation(format!("{field} cannot be empty")))
}

fn normalize_price(raw: &Numeric) -> AppResult<f64> {
    raw.as_f64()
        .filter(|p| *p >= 0.0)
        .ok_or_else(|| AppError::validation("price must be a non-negative number"))
}

fn normalize_stock(raw: &Numeric) -> AppResult<i64> {
    raw.as_f64()
        .filter(|s| *s >= 0.0 && s.fract() == 0.0 && *s <= i64::MAX as f64)
        .map(|s| s as i64)
        .ok_or_else(|| AppError::validation("stock must be a non-negative integer"))
}

fn normalize_status(raw: &Flag) -> AppResult<bool> {
    raw.as_bool()
        .ok_or_else(|| AppError::validation("status must be a boolean"))
}
