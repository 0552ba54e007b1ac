// ============================================================================
// Cart Domain - Business Logic for the Cart Aggregate
// ============================================================================
//
// This module contains ALL cart-specific code:
// - Value objects (Product, ProductDraft)
// - Commands (CartCommand)
// - Errors (CartError enum)
// - Aggregate (Cart with reducer logic, invariants, snapshot codec)
//
// This layer knows nothing about storage or state publishing.
//
// ============================================================================

pub mod aggregate;
pub mod commands;
pub mod errors;
pub mod value_objects;

// Re-export for convenience
pub use aggregate::*;
pub use commands::*;
pub use errors::*;
pub use value_objects::*;
