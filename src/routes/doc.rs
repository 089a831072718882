use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{CartItemDto, CartLineRequest, QuantityRequest, ReplaceCartRequest},
        products::{DeletedProduct, ProductFields},
    },
    models::{Cart, CartLine, Product},
    response::{ApiResponse, ErrorResponse, PageInfo, PagedResponse, ResponseStatus},
    routes::{cart, health, params, products as product_routes},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        product_routes::list_products,
        product_routes::create_product,
        product_routes::get_product,
        product_routes::update_product,
        product_routes::delete_product,
        cart::create_cart,
        cart::get_cart,
        cart::add_to_cart,
        cart::replace_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        cart::clear_cart
    ),
    components(
        schemas(
            Product,
            Cart,
            CartLine,
            CartItemDto,
            CartLineRequest,
            QuantityRequest,
            ReplaceCartRequest,
            ProductFields,
            DeletedProduct,
            params::ProductQuery,
            params::SortOrder,
            ResponseStatus,
            PageInfo,
            ErrorResponse,
            health::HealthData,
            ApiResponse<Product>,
            ApiResponse<Cart>,
            PagedResponse<Product>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Cart", description = "Cart endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
