use std::collections::HashSet;

use product_cart_api::{
    dto::{fields::OneOrMany, products::ProductFields},
    error::AppError,
    routes::params::ProductQuery,
    services::product_service,
};
use serde_json::json;
use uuid::Uuid;

mod common;

#[tokio::test]
async fn create_assigns_id_and_defaults_then_rejects_duplicate_code() -> anyhow::Result<()> {
    let (_dir, state) = common::file_state().await?;

    let chair = product_service::create_product(&state, common::chair_fields()).await?;
    assert_eq!(chair.title, "Chair");
    assert_eq!(chair.code, "C-1");
    assert_eq!(chair.price, 100.0);
    assert_eq!(chair.stock, 5);
    assert!(chair.status, "status defaults to active");
    assert!(chair.thumbnails.is_empty());

    let stored = product_service::get_product(&state, chair.id).await?;
    assert_eq!(stored, chair);

    let second = product_service::create_product(&state, common::chair_fields()).await;
    assert!(matches!(second, Err(AppError::Conflict(_))), "got {second:?}");
    assert_eq!(state.products.find(None).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn create_missing_any_required_field_fails_without_write() -> anyhow::Result<()> {
    let (_dir, state) = common::file_state().await?;

    let strip: [fn(&mut ProductFields); 6] = [
        |f| f.title = None,
        |f| f.description = None,
        |f| f.code = None,
        |f| f.price = None,
        |f| f.stock = None,
        |f| f.category = None,
    ];
    for remove in strip {
        let mut fields = common::chair_fields();
        remove(&mut fields);
        let result = product_service::create_product(&state, fields).await;
        assert!(matches!(result, Err(AppError::Validation(_))), "got {result:?}");
    }

    let mut blank_title = common::chair_fields();
    blank_title.title = Some("   ".into());
    let result = product_service::create_product(&state, blank_title).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    assert!(state.products.find(None).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn create_normalizes_loose_input() -> anyhow::Result<()> {
    let (_dir, state) = common::file_state().await?;

    let fields: ProductFields = serde_json::from_value(json!({
        "title": "Lamp",
        "description": "desk lamp",
        "code": "L-1",
        "price": "49.5",
        "stock": "12",
        "status": "false",
        "category": "lighting",
        "thumbnails": "lamp.png"
    }))?;
    let lamp = product_service::create_product(&state, fields).await?;

    assert_eq!(lamp.price, 49.5);
    assert_eq!(lamp.stock, 12);
    assert!(!lamp.status);
    assert_eq!(lamp.thumbnails, vec!["lamp.png".to_string()]);
    Ok(())
}

#[tokio::test]
async fn create_rejects_invalid_numbers() -> anyhow::Result<()> {
    let (_dir, state) = common::file_state().await?;

    let negative_price: ProductFields =
        serde_json::from_value(json!({"title": "a", "description": "b", "code": "X-1",
            "price": -1, "stock": 1, "category": "c"}))?;
    let fractional_stock: ProductFields =
        serde_json::from_value(json!({"title": "a", "description": "b", "code": "X-2",
            "price": 1, "stock": 1.5, "category": "c"}))?;
    let text_price: ProductFields =
        serde_json::from_value(json!({"title": "a", "description": "b", "code": "X-3",
            "price": "cheap", "stock": 1, "category": "c"}))?;

    for fields in [negative_price, fractional_stock, text_price] {
        let result = product_service::create_product(&state, fields).await;
        assert!(matches!(result, Err(AppError::Validation(_))), "got {result:?}");
    }
    assert!(state.products.find(None).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn generated_ids_and_codes_stay_unique() -> anyhow::Result<()> {
    let (_dir, state) = common::file_state().await?;

    for i in 0..25 {
        common::seed(&state, &format!("P-{i}"), "misc", i as f64).await?;
    }
    let all = state.products.find(None).await?;
    let ids: HashSet<Uuid> = all.iter().map(|p| p.id).collect();
    let codes: HashSet<&str> = all.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(all.len(), 25);
    assert_eq!(ids.len(), 25);
    assert_eq!(codes.len(), 25);
    Ok(())
}

#[tokio::test]
async fn update_merges_fields_and_keeps_id() -> anyhow::Result<()> {
    let (_dir, state) = common::file_state().await?;
    let chair = product_service::create_product(&state, common::chair_fields()).await?;

    let patch: ProductFields = serde_json::from_value(json!({
        "id": Uuid::new_v4(),
        "_id": "whatever",
        "price": "150",
        "thumbnails": ["a.png", "b.png"]
    }))?;
    let updated = product_service::update_product(&state, chair.id, patch).await?;

    assert_eq!(updated.id, chair.id);
    assert_eq!(updated.price, 150.0);
    assert_eq!(updated.thumbnails, vec!["a.png", "b.png"]);
    assert_eq!(updated.title, chair.title);
    assert_eq!(updated.code, chair.code);

    let stored = product_service::get_product(&state, chair.id).await?;
    assert_eq!(stored, updated);
    Ok(())
}

#[tokio::test]
async fn update_with_code_of_other_product_conflicts_and_changes_nothing() -> anyhow::Result<()> {
    let (_dir, state) = common::file_state().await?;
    let first = common::seed(&state, "A-1", "misc", 10.0).await?;
    let second = common::seed(&state, "B-1", "misc", 20.0).await?;

    let patch = ProductFields {
        code: Some("A-1".into()),
        title: Some("renamed".into()),
        ..Default::default()
    };
    let result = product_service::update_product(&state, second.id, patch).await;
    assert!(matches!(result, Err(AppError::Conflict(_))), "got {result:?}");

    assert_eq!(product_service::get_product(&state, first.id).await?, first);
    assert_eq!(product_service::get_product(&state, second.id).await?, second);

    // Keeping its own code is not a collision.
    let own = ProductFields {
        code: Some("B-1".into()),
        thumbnails: Some(OneOrMany::One("b.png".into())),
        ..Default::default()
    };
    let updated = product_service::update_product(&state, second.id, own).await?;
    assert_eq!(updated.thumbnails, vec!["b.png"]);
    Ok(())
}

#[tokio::test]
async fn update_and_remove_unknown_product_are_not_found() -> anyhow::Result<()> {
    let (_dir, state) = common::file_state().await?;
    let missing = Uuid::new_v4();

    let update = product_service::update_product(&state, missing, ProductFields::default()).await;
    assert!(matches!(update, Err(AppError::NotFound(_))));
    let remove = product_service::delete_product(&state, missing).await;
    assert!(matches!(remove, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn remove_acknowledges_and_forgets_product() -> anyhow::Result<()> {
    let (_dir, state) = common::file_state().await?;
    let chair = product_service::create_product(&state, common::chair_fields()).await?;

    let ack = product_service::delete_product(&state, chair.id).await?;
    assert_eq!(ack.deleted, chair.id);

    let again = product_service::get_product(&state, chair.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));

    // The code is free again.
    product_service::create_product(&state, common::chair_fields()).await?;
    Ok(())
}

#[tokio::test]
async fn list_filters_and_sorts_by_price() -> anyhow::Result<()> {
    let (_dir, state) = common::file_state().await?;
    common::seed(&state, "C-1", "chairs", 120.0).await?;
    common::seed(&state, "T-1", "tables", 280.0).await?;
    common::seed(&state, "C-2", "chairs", 80.0).await?;
    let inactive = common::seed(&state, "C-3", "chairs", 95.0).await?;
    product_service::update_product(
        &state,
        inactive.id,
        ProductFields {
            status: Some(false.into()),
            ..Default::default()
        },
    )
    .await?;

    let query = ProductQuery {
        category: Some("chairs".into()),
        sort: Some("asc".into()),
        ..Default::default()
    };
    let page = product_service::list_products(&state, &query).await?;
    let codes: Vec<&str> = page.items.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(codes, ["C-2", "C-3", "C-1"]);

    let query = ProductQuery {
        query: Some("status:true".into()),
        sort: Some("desc".into()),
        ..Default::default()
    };
    let page = product_service::list_products(&state, &query).await?;
    let codes: Vec<&str> = page.items.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(codes, ["T-1", "C-1", "C-2"]);

    // No sort keeps store order.
    let query = ProductQuery {
        query: Some("chairs".into()),
        ..Default::default()
    };
    let page = product_service::list_products(&state, &query).await?;
    let codes: Vec<&str> = page.items.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(codes, ["C-1", "C-2", "C-3"]);
    Ok(())
}

#[tokio::test]
async fn list_clamps_page_past_the_end() -> anyhow::Result<()> {
    let (_dir, state) = common::file_state().await?;
    for (code, price) in [("P-1", 1.0), ("P-2", 2.0), ("P-3", 3.0)] {
        common::seed(&state, code, "misc", price).await?;
    }

    let query = ProductQuery {
        limit: Some("2".into()),
        page: Some("5".into()),
        ..Default::default()
    };
    let page = product_service::list_products(&state, &query).await?;
    assert_eq!(page.window.page, 2);
    assert_eq!(page.window.total_pages, 2);
    assert!(!page.window.has_next());
    assert!(page.window.has_prev());
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].code, "P-3");
    Ok(())
}
