use uuid::Uuid;

use crate::{
    dto::{
        cart::{CartItemDto, CartLineRequest},
        fields::Numeric,
    },
    error::{AppError, AppResult},
    models::{Cart, CartLine},
    services::parse_id,
    state::AppState,
};

pub async fn create_cart(state: &AppState) -> AppResult<Cart> {
    let cart = state.carts.insert(Cart::new(Uuid::new_v4())).await?;
    tracing::info!(cart_id = %cart.id, "cart created");
    Ok(cart)
}

pub async fn get_cart(state: &AppState, cart_id: Uuid) -> AppResult<Cart> {
    state
        .carts
        .find_by_id(cart_id)
        .await?
        .ok_or_else(cart_not_found)
}

/// The cart's lines in insertion order, each joined with its product when it
/// still exists.
pub async fn get_cart_items(state: &AppState, cart_id: Uuid) -> AppResult<Vec<CartItemDto>> {
    let cart = get_cart(state, cart_id).await?;
    let mut items = Vec::with_capacity(cart.products.len());
    for line in cart.products {
        let detail = state.products.find_by_id(line.product).await?;
        items.push(CartItemDto {
            product: line.product,
            quantity: line.quantity,
            detail,
        });
    }
    Ok(items)
}

/// Adds `quantity` of a product, incrementing the existing line if the cart
/// already holds one.
pub async fn add_item(
    state: &AppState,
    cart_id: Uuid,
    product_id: Uuid,
    quantity: Option<&Numeric>,
) -> AppResult<Cart> {
    let _gate = state.write_gate.lock().await;

    let mut cart = get_cart(state, cart_id).await?;
    if state.products.find_by_id(product_id).await?.is_none() {
        return Err(missing_product(product_id));
    }

    let quantity = coerce_quantity(quantity);
    match cart.line_mut(product_id) {
        Some(line) => line.quantity = line.quantity.saturating_add(quantity),
        None => cart.products.push(CartLine {
            product: product_id,
            quantity,
        }),
    }

    let cart = save(state, cart).await?;
    tracing::info!(cart_id = %cart_id, product_id = %product_id, quantity, "cart item added");
    Ok(cart)
}

pub async fn set_item_quantity(
    state: &AppState,
    cart_id: Uuid,
    product_id: Uuid,
    quantity: Option<&Numeric>,
) -> AppResult<Cart> {
    let _gate = state.write_gate.lock().await;

    let mut cart = get_cart(state, cart_id).await?;
    let line = cart
        .line_mut(product_id)
        .ok_or_else(|| AppError::not_found("Product not found in cart"))?;
    line.quantity = coerce_quantity(quantity);

    save(state, cart).await
}

/// Removing a line the cart does not hold leaves the cart as it is.
pub async fn remove_item(state: &AppState, cart_id: Uuid, product_id: Uuid) -> AppResult<Cart> {
    let _gate = state.write_gate.lock().await;

    let mut cart = get_cart(state, cart_id).await?;
    let before = cart.products.len();
    cart.products.retain(|line| line.product != product_id);
    if cart.products.len() == before {
        tracing::debug!(cart_id = %cart_id, product_id = %product_id, "cart line already absent");
        return Ok(cart);
    }

    save(state, cart).await
}

/// Replaces every line of the cart. All references are checked first; one bad
/// reference rejects the whole batch. Repeated products are merged.
pub async fn replace_items(
    state: &AppState,
    cart_id: Uuid,
    items: Vec<CartLineRequest>,
) -> AppResult<Cart> {
    let _gate = state.write_gate.lock().await;

    let mut cart = get_cart(state, cart_id).await?;

    let mut lines: Vec<CartLine> = Vec::with_capacity(items.len());
    for item in &items {
        let product_id = parse_id(&item.product).ok_or_else(|| {
            AppError::validation(format!("Product {} does not exist", item.product))
        })?;
        if state.products.find_by_id(product_id).await?.is_none() {
            return Err(missing_product(product_id));
        }

        let quantity = coerce_quantity(item.quantity.as_ref());
        match lines.iter_mut().find(|line| line.product == product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => lines.push(CartLine {
                product: product_id,
                quantity,
            }),
        }
    }

    cart.products = lines;
    let cart = save(state, cart).await?;
    tracing::info!(cart_id = %cart_id, lines = cart.products.len(), "cart replaced");
    Ok(cart)
}

pub async fn clear_cart(state: &AppState, cart_id: Uuid) -> AppResult<Cart> {
    let _gate = state.write_gate.lock().await;

    let mut cart = get_cart(state, cart_id).await?;
    cart.products.clear();

    let cart = save(state, cart).await?;
    tracing::info!(cart_id = %cart_id, "cart cleared");
    Ok(cart)
}

/// Positive whole quantity; anything missing, non-numeric or below 1 is 1.
pub fn coerce_quantity(raw: Option<&Numeric>) -> i32 {
    raw.and_then(Numeric::as_f64)
        .map(f64::trunc)
        .filter(|q| *q >= 1.0)
        .map(|q| q.min(i32::MAX as f64) as i32)
        .unwrap_or(1)
}

async fn save(state: &AppState, cart: Cart) -> AppResult<Cart> {
    state
        .carts
        .replace(cart.id, cart)
        .await?
        .ok_or_else(cart_not_found)
}

fn cart_not_found() -> AppError {
    AppError::not_found("Cart not found")
}

fn missing_product(product_id: Uuid) -> AppError {
    AppError::validation(format!("Product {product_id} does not exist"))
}
