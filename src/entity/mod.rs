pub mod cart_items;
pub mod carts;
pub mod products;

pub use cart_items::Entity as CartItems;
pub use carts::Entity as Carts;
pub use products::Entity as Products;
