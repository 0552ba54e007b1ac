use super::value_objects::ProductDraft;

// ============================================================================
// Cart Commands
// ============================================================================

/// The three mutations the cart accepts.
#[derive(Clone, Debug)]
pub enum CartCommand {
    /// Add a product: increments the quantity if the id is already in the
    /// cart, otherwise appends a new entry with quantity 1.
    Add(ProductDraft),
    /// Increase the quantity of an existing entry by 1.
    Increment(String),
    /// Decrease the quantity of an existing entry by 1, removing the entry
    /// when it would drop below 1.
    Decrement(String),
}

impl CartCommand {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            CartCommand::Add(_) => "Add",
            CartCommand::Increment(_) => "Increment",
            CartCommand::Decrement(_) => "Decrement",
        }
    }

    /// The product id this command targets.
    pub fn product_id(&self) -> &str {
        match self {
            CartCommand::Add(draft) => &draft.id,
            CartCommand::Increment(id) | CartCommand::Decrement(id) => id,
        }
    }
}
