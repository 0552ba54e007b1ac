use serde::{Deserialize, Serialize};

// ============================================================================
// Cart Value Objects
// ============================================================================

/// One line item in the cart.
///
/// Serialized field names are the persisted wire format: `id`, `title`,
/// `image_url`, `price`, `quantity`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: u32,
}

/// The add-to-cart input: a product descriptor without a quantity.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProductDraft {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
}

impl ProductDraft {
    /// Promote the draft to a cart entry with an initial quantity of 1.
    pub fn into_entry(self) -> Product {
        Product {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity: 1,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_promotion_starts_at_quantity_one() {
        let draft = ProductDraft {
            id: "sku-1".to_string(),
            title: "Shoe".to_string(),
            image_url: "https://img.example/shoe.png".to_string(),
            price: 10.0,
        };

        let entry = draft.into_entry();

        assert_eq!(entry.id, "sku-1");
        assert_eq!(entry.title, "Shoe");
        assert_eq!(entry.quantity, 1);
    }

    #[test]
    fn test_product_wire_format_field_names() {
        let entry = Product {
            id: "sku-1".to_string(),
            title: "Shoe".to_string(),
            image_url: "u".to_string(),
            price: 10.0,
            quantity: 2,
        };

        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["id"], "sku-1");
        assert_eq!(json["image_url"], "u");
        assert_eq!(json["quantity"], 2);
    }

    #[test]
    fn test_product_round_trips_through_json() {
        let entry = Product {
            id: "sku-2".to_string(),
            title: "Hat".to_string(),
            image_url: "u".to_string(),
            price: 4.5,
            quantity: 3,
        };

        let json = serde_json::to_string(&entry).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();

        assert_eq!(entry, back);
    }
}
