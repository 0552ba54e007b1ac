// ============================================================================
// Cart Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("Product id must not be empty")]
    MissingProductId,

    #[error("Invalid quantity {quantity} for product {id:?}")]
    InvalidQuantity { id: String, quantity: u32 },

    #[error("Duplicate product id in cart: {0:?}")]
    DuplicateProductId(String),

    #[error("Malformed cart snapshot: {0}")]
    MalformedSnapshot(#[from] serde_json::Error),
}
