use axum::{
    Json, Router,
    extract::{OriginalUri, Path, State},
    http::{HeaderMap, StatusCode, Uri, header},
};
use url::Url;

use crate::{
    dto::products::{DeletedProduct, ProductFields},
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, ErrorResponse, PageInfo, PagedResponse},
    routes::{extract::ApiJson, params::ProductQuery},
    services::{parse_id, product_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create_product))
        .route("/", axum::routing::get(list_products))
        .route("/{id}", axum::routing::get(get_product))
        .route("/{id}", axum::routing::put(update_product))
        .route("/{id}", axum::routing::delete(delete_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Filtered, sorted, paginated products", body = PagedResponse<Product>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> AppResult<Json<PagedResponse<Product>>> {
    let query = ProductQuery::from_query(uri.query());
    let page = product_service::list_products(&state, &query).await?;
    let window = page.window;

    let info = PageInfo {
        total_pages: window.total_pages,
        prev_page: window.prev_page(),
        next_page: window.next_page(),
        page: window.page,
        has_prev_page: window.has_prev(),
        has_next_page: window.has_next(),
        prev_link: window.prev_page().and_then(|p| page_link(&headers, &uri, p)),
        next_link: window.next_page().and_then(|p| page_link(&headers, &uri, p)),
    };
    Ok(Json(PagedResponse::success(page.items, info)))
}

/// Absolute link to `page` of the current listing, keeping every other query
/// parameter where it was. The scheme follows `X-Forwarded-Proto` when a proxy
/// sets it.
pub fn page_link(headers: &HeaderMap, uri: &Uri, page: u64) -> Option<String> {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    let mut url = Url::parse(&format!("{}://{host}{}", request_scheme(headers), uri.path())).ok()?;

    let mut pairs: Vec<(String, String)> = uri
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();
    let mut seen_page = false;
    pairs.retain(|(key, _)| key != "page" || !std::mem::replace(&mut seen_page, true));
    match pairs.iter_mut().find(|(key, _)| key == "page") {
        Some((_, value)) => *value = page.to_string(),
        None => pairs.push(("page".to_string(), page.to_string())),
    }

    url.query_pairs_mut().extend_pairs(pairs);
    Some(url.to_string())
}

fn request_scheme(headers: &HeaderMap) -> &'static str {
    let forwarded = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_ascii_lowercase());
    match forwarded.as_deref() {
        Some("https") => "https",
        _ => "http",
    }
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found", body = ErrorResponse),
    ),
    tag = "Products"
)]
pub async fn get_product(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let id = product_id(&id)?;
    let product = product_service::get_product(&state, id).await?;
    Ok(Json(ApiResponse::success(product)))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductFields,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Missing fields or duplicate code", body = ErrorResponse),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ProductFields>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let product = product_service::create_product(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = ProductFields,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 400, description = "Invalid field or duplicate code", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<ProductFields>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let id = product_id(&id)?;
    let product = product_service::update_product(&state, id, payload).await?;
    Ok(Json(ApiResponse::success(product)))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product", body = ApiResponse<DeletedProduct>),
        (status = 404, description = "Product not found", body = ErrorResponse),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DeletedProduct>>> {
    let id = product_id(&id)?;
    let deleted = product_service::delete_product(&state, id).await?;
    Ok(Json(ApiResponse::success(deleted)))
}

fn product_id(raw: &str) -> AppResult<uuid::Uuid> {
    parse_id(raw).ok_or_else(|| AppError::not_found("Product not found"))
}
