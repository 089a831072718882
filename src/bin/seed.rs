use product_cart_api::{
    config::AppConfig,
    dto::{fields::OneOrMany, products::ProductFields},
    error::AppError,
    services::product_service,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config).await?;

    seed_products(&state).await?;

    println!("Seed completed");
    Ok(())
}

async fn seed_products(state: &AppState) -> anyhow::Result<()> {
    let products = vec![
        ("Chair Divino", "Wooden chair", "CHA-001", 120.0, 15, "chairs"),
        ("Table Punta", "Coffee table", "TAB-101", 280.0, 7, "tables"),
    ];

    for (title, description, code, price, stock, category) in products {
        let fields = ProductFields {
            title: Some(title.into()),
            description: Some(description.into()),
            code: Some(code.into()),
            price: Some(price.into()),
            status: Some(true.into()),
            stock: Some(i64::from(stock).into()),
            category: Some(category.into()),
            thumbnails: Some(OneOrMany::Many(Vec::new())),
        };

        match product_service::create_product(state, fields).await {
            Ok(product) => println!("Seeded product {code} ({})", product.id),
            // Already seeded on a previous run.
            Err(AppError::Conflict(_)) => println!("Product {code} already present"),
            Err(err) => return Err(anyhow::anyhow!("could not seed {code}: {err}")),
        }
    }

    Ok(())
}
