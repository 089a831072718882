pub mod cart;
pub mod fields;
pub mod products;
