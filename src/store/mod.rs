// ============================================================================
// Cart Store - State Container
// ============================================================================
//
// Holds the authoritative in-memory cart, publishes read-only snapshots to
// subscribers, and keeps the persisted snapshot in sync with every mutation.
//
// ============================================================================

pub mod cart_store;

pub use cart_store::{CartStore, CartStoreError};
