use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{Collection, Predicate, StoreResult};
use crate::{
    entity::{
        CartItems, Carts, Products, cart_items, carts,
        products::{self, Model as ProductModel},
    },
    models::{Cart, CartLine, Product},
};

/// Products table accessed through sea-orm.
#[derive(Clone)]
pub struct OrmProductStore {
    orm: DatabaseConnection,
}

impl OrmProductStore {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl Collection<Product> for OrmProductStore {
    async fn find(&self, predicate: Option<&Predicate<'_, Product>>) -> StoreResult<Vec<Product>> {
        let rows = Products::find()
            .order_by_asc(products::Column::CreatedAt)
            .order_by_asc(products::Column::Id)
            .all(&self.orm)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let product = product_from_entity(row)?;
            if predicate.is_none_or(|keep| keep(&product)) {
                items.push(product);
            }
        }
        Ok(items)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
        Products::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(product_from_entity)
            .transpose()
    }

    async fn insert(&self, record: Product) -> StoreResult<Product> {
        let active = products::ActiveModel {
            id: Set(record.id),
            title: Set(record.title),
            description: Set(record.description),
            code: Set(record.code),
            price: Set(record.price),
            status: Set(record.status),
            stock: Set(record.stock),
            category: Set(record.category),
            thumbnails: Set(serde_json::to_value(&record.thumbnails)?),
            created_at: NotSet,
        };
        let model = active.insert(&self.orm).await?;
        product_from_entity(model)
    }

    async fn replace(&self, id: Uuid, record: Product) -> StoreResult<Option<Product>> {
        let Some(existing) = Products::find_by_id(id).one(&self.orm).await? else {
            return Ok(None);
        };

        let mut active: products::ActiveModel = existing.into();
        active.title = Set(record.title);
        active.description = Set(record.description);
        active.code = Set(record.code);
        active.price = Set(record.price);
        active.status = Set(record.status);
        active.stock = Set(record.stock);
        active.category = Set(record.category);
        active.thumbnails = Set(serde_json::to_value(&record.thumbnails)?);

        let model = active.update(&self.orm).await?;
        product_from_entity(model).map(Some)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = Products::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }
}

fn product_from_entity(model: ProductModel) -> StoreResult<Product> {
    Ok(Product {
        id: model.id,
        title: model.title,
        description: model.description,
        code: model.code,
        price: model.price,
        status: model.status,
        stock: model.stock,
        category: model.category,
        thumbnails: serde_json::from_value(model.thumbnails)?,
    })
}

/// Carts and their lines, stored as a `carts` row plus ordered `cart_items` rows.
#[derive(Clone)]
pub struct OrmCartStore {
    orm: DatabaseConnection,
}

impl OrmCartStore {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }

    async fn lines_of(&self, cart_id: Uuid) -> StoreResult<Vec<CartLine>> {
        let rows = CartItems::find()
            .filter(cart_items::Column::CartId.eq(cart_id))
            .order_by_asc(cart_items::Column::Position)
            .all(&self.orm)
            .await?;
        Ok(rows.into_iter().map(line_from_entity).collect())
    }
}

#[async_trait]
impl Collection<Cart> for OrmCartStore {
    async fn find(&self, predicate: Option<&Predicate<'_, Cart>>) -> StoreResult<Vec<Cart>> {
        let cart_rows = Carts::find()
            .order_by_asc(carts::Column::CreatedAt)
            .order_by_asc(carts::Column::Id)
            .all(&self.orm)
            .await?;
        let item_rows = CartItems::find()
            .order_by_asc(cart_items::Column::Position)
            .all(&self.orm)
            .await?;

        let mut lines: HashMap<Uuid, Vec<CartLine>> = HashMap::new();
        for row in item_rows {
            lines.entry(row.cart_id).or_default().push(line_from_entity(row));
        }

        Ok(cart_rows
            .into_iter()
            .map(|row| Cart {
                id: row.id,
                products: lines.remove(&row.id).unwrap_or_default(),
            })
            .filter(|cart| predicate.is_none_or(|keep| keep(cart)))
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Cart>> {
        if Carts::find_by_id(id).one(&self.orm).await?.is_none() {
            return Ok(None);
        }
        let products = self.lines_of(id).await?;
        Ok(Some(Cart { id, products }))
    }

    async fn insert(&self, record: Cart) -> StoreResult<Cart> {
        let txn = self.orm.begin().await?;
        carts::ActiveModel {
            id: Set(record.id),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        if !record.products.is_empty() {
            CartItems::insert_many(line_models(record.id, &record.products))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;
        Ok(record)
    }

    async fn replace(&self, id: Uuid, record: Cart) -> StoreResult<Option<Cart>> {
        let txn = self.orm.begin().await?;
        if Carts::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(None);
        }
        CartItems::delete_many()
            .filter(cart_items::Column::CartId.eq(id))
            .exec(&txn)
            .await?;
        if !record.products.is_empty() {
            CartItems::insert_many(line_models(id, &record.products))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;
        Ok(Some(Cart {
            id,
            products: record.products,
        }))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = Carts::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }
}

fn line_from_entity(model: cart_items::Model) -> CartLine {
    CartLine {
        product: model.product_id,
        quantity: model.quantity,
    }
}

fn line_models(cart_id: Uuid, lines: &[CartLine]) -> Vec<cart_items::ActiveModel> {
    lines
        .iter()
        .enumerate()
        .map(|(position, line)| cart_items::ActiveModel {
            cart_id: Set(cart_id),
            product_id: Set(line.product),
            quantity: Set(line.quantity),
            position: Set(position as i32),
        })
        .collect()
}
