use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
};
use uuid::Uuid;

use crate::{
    dto::cart::{CartItemDto, QuantityRequest, ReplaceCartRequest},
    error::{AppError, AppResult},
    models::Cart,
    response::{ApiResponse, ErrorResponse},
    routes::extract::{ApiJson, optional_json},
    services::{cart_service, parse_id},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_cart))
        .route(
            "/{cid}",
            axum::routing::get(get_cart).put(replace_cart).delete(clear_cart),
        )
        .route("/{cid}/product/{pid}", post(add_to_cart))
        .route(
            "/{cid}/products/{pid}",
            put(update_cart_item).delete(remove_from_cart),
        )
}

#[utoipa::path(
    post,
    path = "/api/carts",
    responses(
        (status = 201, description = "New empty cart", body = ApiResponse<Cart>)
    ),
    tag = "Cart"
)]
pub async fn create_cart(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<ApiResponse<Cart>>)> {
    let cart = cart_service::create_cart(&state).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(cart))))
}

#[utoipa::path(
    get,
    path = "/api/carts/{cid}",
    params(
        ("cid" = String, Path, description = "Cart ID")
    ),
    responses(
        (status = 200, description = "Cart lines with product details", body = ApiResponse<Vec<CartItemDto>>),
        (status = 404, description = "Cart not found", body = ErrorResponse),
    ),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(cid): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<CartItemDto>>>> {
    let items = cart_service::get_cart_items(&state, cart_id(&cid)?).await?;
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    post,
    path = "/api/carts/{cid}/product/{pid}",
    params(
        ("cid" = String, Path, description = "Cart ID"),
        ("pid" = String, Path, description = "Product ID")
    ),
    request_body(content = QuantityRequest, description = "Quantity to add, default 1; the body may be omitted"),
    responses(
        (status = 201, description = "Item added or incremented", body = ApiResponse<Cart>),
        (status = 400, description = "Product does not exist", body = ErrorResponse),
        (status = 404, description = "Cart not found", body = ErrorResponse),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path((cid, pid)): Path<(String, String)>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<ApiResponse<Cart>>)> {
    let cid = cart_id(&cid)?;
    let pid = parse_id(&pid)
        .ok_or_else(|| AppError::validation(format!("Product {pid} does not exist")))?;
    let payload: QuantityRequest = optional_json(&body)?;

    let cart = cart_service::add_item(&state, cid, pid, payload.quantity.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(cart))))
}

#[utoipa::path(
    put,
    path = "/api/carts/{cid}",
    params(
        ("cid" = String, Path, description = "Cart ID")
    ),
    request_body = ReplaceCartRequest,
    responses(
        (status = 200, description = "Cart contents replaced", body = ApiResponse<Cart>),
        (status = 400, description = "A referenced product does not exist", body = ErrorResponse),
        (status = 404, description = "Cart not found", body = ErrorResponse),
    ),
    tag = "Cart"
)]
pub async fn replace_cart(
    State(state): State<AppState>,
    Path(cid): Path<String>,
    ApiJson(payload): ApiJson<ReplaceCartRequest>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let cart = cart_service::replace_items(&state, cart_id(&cid)?, payload.products).await?;
    Ok(Json(ApiResponse::success(cart)))
}

#[utoipa::path(
    put,
    path = "/api/carts/{cid}/products/{pid}",
    params(
        ("cid" = String, Path, description = "Cart ID"),
        ("pid" = String, Path, description = "Product ID")
    ),
    request_body = QuantityRequest,
    responses(
        (status = 200, description = "Line quantity overwritten", body = ApiResponse<Cart>),
        (status = 404, description = "Cart or line not found", body = ErrorResponse),
    ),
    tag = "Cart"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path((cid, pid)): Path<(String, String)>,
    body: Bytes,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let cid = cart_id(&cid)?;
    let pid = parse_id(&pid).ok_or_else(|| AppError::not_found("Product not found in cart"))?;
    let payload: QuantityRequest = optional_json(&body)?;

    let cart =
        cart_service::set_item_quantity(&state, cid, pid, payload.quantity.as_ref()).await?;
    Ok(Json(ApiResponse::success(cart)))
}

#[utoipa::path(
    delete,
    path = "/api/carts/{cid}/products/{pid}",
    params(
        ("cid" = String, Path, description = "Cart ID"),
        ("pid" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Line removed (no-op when absent)", body = ApiResponse<Cart>),
        (status = 404, description = "Cart not found", body = ErrorResponse),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path((cid, pid)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let cid = cart_id(&cid)?;
    let cart = match parse_id(&pid) {
        Some(pid) => cart_service::remove_item(&state, cid, pid).await?,
        // Not a product id, so the cart cannot hold it.
        None => cart_service::get_cart(&state, cid).await?,
    };
    Ok(Json(ApiResponse::success(cart)))
}

#[utoipa::path(
    delete,
    path = "/api/carts/{cid}",
    params(
        ("cid" = String, Path, description = "Cart ID")
    ),
    responses(
        (status = 200, description = "Cart emptied", body = ApiResponse<Cart>),
        (status = 404, description = "Cart not found", body = ErrorResponse),
    ),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(cid): Path<String>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let cart = cart_service::clear_cart(&state, cart_id(&cid)?).await?;
    Ok(Json(ApiResponse::success(cart)))
}

fn cart_id(raw: &str) -> AppResult<Uuid> {
    parse_id(raw).ok_or_else(|| AppError::not_found("Cart not found"))
}
