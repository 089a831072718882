use std::sync::Arc;

use product_cart_api::{
    db::{create_orm_conn, run_migrations},
    dto::fields::Numeric,
    error::AppError,
    services::{cart_service, product_service},
    state::AppState,
    store::{Collection, OrmCartStore, OrmProductStore},
};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use uuid::Uuid;

mod common;

async fn setup(database_url: &str) -> anyhow::Result<(DatabaseConnection, AppState)> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm, concat!(env!("CARGO_MANIFEST_DIR"), "/migrations")).await?;
    orm.execute(Statement::from_string(
        orm.get_database_backend(),
        "TRUNCATE TABLE cart_items, carts, products CASCADE;".to_string(),
    ))
    .await?;

    let state = AppState::new(
        Arc::new(OrmProductStore::new(orm.clone())),
        Arc::new(OrmCartStore::new(orm.clone())),
    );
    Ok((orm, state))
}

// Runs against Postgres; both flows share one test so truncation cannot race.
#[tokio::test]
async fn database_backend_round_trip() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run database store tests.");
            return Ok(());
        }
    };
    let (_orm, state) = setup(&database_url).await?;

    // Catalog
    let chair = common::seed(&state, "C-1", "chairs", 120.0).await?;
    let table = common::seed(&state, "T-1", "tables", 280.0).await?;
    // chair_fields() reuses code C-1.
    let duplicate = product_service::create_product(&state, common::chair_fields()).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))), "got {duplicate:?}");

    let listed: Vec<Uuid> = state.products.find(None).await?.iter().map(|p| p.id).collect();
    assert_eq!(&listed[..2], &[chair.id, table.id]);

    let mut changed = chair.clone();
    changed.thumbnails = vec!["a.png".into(), "b.png".into()];
    changed.stock = 42;
    assert_eq!(
        state.products.replace(chair.id, changed.clone()).await?,
        Some(changed.clone())
    );
    assert_eq!(state.products.find_by_id(chair.id).await?, Some(changed));

    // Carts keep line order and merge repeated adds.
    let cart = cart_service::create_cart(&state).await?;
    cart_service::add_item(&state, cart.id, table.id, Some(&Numeric::Number(2.0))).await?;
    cart_service::add_item(&state, cart.id, chair.id, None).await?;
    let cart = cart_service::add_item(&state, cart.id, table.id, Some(&Numeric::Number(3.0))).await?;
    let lines: Vec<(Uuid, i32)> = cart.products.iter().map(|l| (l.product, l.quantity)).collect();
    assert_eq!(lines, vec![(table.id, 5), (chair.id, 1)]);
    assert_eq!(state.carts.find_by_id(cart.id).await?, Some(cart.clone()));

    let cleared = cart_service::clear_cart(&state, cart.id).await?;
    assert!(cleared.products.is_empty());
    assert!(state.carts.delete(cart.id).await?);
    assert_eq!(state.carts.find_by_id(cart.id).await?, None);

    assert!(state.products.delete(table.id).await?);
    assert!(!state.products.delete(table.id).await?);
    Ok(())
}
