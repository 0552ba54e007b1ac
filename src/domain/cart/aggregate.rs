use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::commands::CartCommand;
use super::errors::CartError;
use super::value_objects::Product;

// ============================================================================
// Cart Aggregate - Domain Logic
// ============================================================================
//
// The cart is an ordered sequence of product entries. Insertion order is the
// order in which distinct ids were first added; `id` is the uniqueness key.
//
// Invariant: every entry has quantity >= 1. An entry whose quantity would
// drop to 0 is removed from the sequence, never retained at 0.
//
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Apply a command to the cart in place.
    ///
    /// Returns `Ok(true)` when the cart changed and `Ok(false)` for a no-op
    /// (increment/decrement of an id that is not in the cart). A no-op must
    /// not trigger a publish or a persistence write.
    pub fn apply(&mut self, command: &CartCommand) -> Result<bool, CartError> {
        match command {
            CartCommand::Add(draft) => {
                if draft.id.is_empty() {
                    return Err(CartError::MissingProductId);
                }

                // Repeat add: the existing entry is canonical, the draft's
                // non-id fields are ignored.
                if let Some(existing) = self.items.iter_mut().find(|p| p.id == draft.id) {
                    existing.quantity += 1;
                } else {
                    self.items.push(draft.clone().into_entry());
                }

                Ok(true)
            }

            CartCommand::Increment(id) => match self.items.iter_mut().find(|p| &p.id == id) {
                Some(entry) => {
                    entry.quantity += 1;
                    Ok(true)
                }
                None => Ok(false),
            },

            CartCommand::Decrement(id) => {
                let Some(index) = self.items.iter().position(|p| &p.id == id) else {
                    return Ok(false);
                };

                if self.items[index].quantity == 1 {
                    self.items.remove(index);
                } else {
                    self.items[index].quantity -= 1;
                }

                Ok(true)
            }
        }
    }

    /// Check the cart invariants: non-empty unique ids, every quantity >= 1.
    ///
    /// Persisted snapshots are untrusted input and must pass this before
    /// being installed as current state.
    pub fn validate(&self) -> Result<(), CartError> {
        let mut seen = HashSet::with_capacity(self.items.len());

        for entry in &self.items {
            if entry.id.is_empty() {
                return Err(CartError::MissingProductId);
            }
            if entry.quantity == 0 {
                return Err(CartError::InvalidQuantity {
                    id: entry.id.clone(),
                    quantity: entry.quantity,
                });
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(CartError::DuplicateProductId(entry.id.clone()));
            }
        }

        Ok(())
    }

    /// Serialize the full cart as the persisted wire format: a JSON array of
    /// `{id, title, image_url, price, quantity}` objects.
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    /// Parse and validate a persisted snapshot.
    pub fn from_snapshot(json: &str) -> Result<Self, CartError> {
        let items: Vec<Product> = serde_json::from_str(json)?;
        let cart = Self { items };
        cart.validate()?;
        Ok(cart)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
