use uuid::Uuid;

pub mod cart_service;
pub mod product_service;

/// Identifiers arrive as path segments or message payloads; anything that is
/// not a UUID cannot name a stored record.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
