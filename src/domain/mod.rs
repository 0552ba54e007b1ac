// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// This module contains domain-specific aggregates and business logic.
// Each aggregate has its own subdirectory with value objects, commands,
// errors, and the aggregate implementation.
//
// This layer is completely separate from the storage infrastructure.
//
// ============================================================================

pub mod cart;
