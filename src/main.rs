use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod domain;
mod scope;
mod storage;
mod store;
mod utils;

use domain::cart::ProductDraft;
use scope::CartScope;
use storage::FileStorage;
use store::CartStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cart_mobile=debug"))
        )
        .init();

    tracing::info!("🛒 Starting cart store demo");

    // === 1. Open local on-device storage ===
    let data_dir = std::env::var("CART_DATA_DIR").unwrap_or_else(|_| "./data".to_string());
    tracing::info!(data_dir = %data_dir, "Using file storage");
    let storage = Arc::new(FileStorage::new(data_dir));

    // === 2. Create the store and load any persisted cart ===
    let store = Arc::new(CartStore::new(storage));
    store.hydrate().await?;
    tracing::info!(item_count = store.products().len(), "Cart after hydration");

    // === 3. Run consumers inside a provisioning scope ===
    CartScope::provide(store.clone(), async {
        let cart = CartScope::current();

        let shoe = ProductDraft {
            id: uuid::Uuid::new_v4().to_string(),
            title: "Running Shoe".to_string(),
            image_url: "https://img.example/shoe.png".to_string(),
            price: 59.9,
        };
        let hat = ProductDraft {
            id: uuid::Uuid::new_v4().to_string(),
            title: "Baseball Hat".to_string(),
            image_url: "https://img.example/hat.png".to_string(),
            price: 19.9,
        };

        let shoe_id = shoe.id.clone();
        let hat_id = hat.id.clone();

        cart.add_to_cart(shoe).await?;
        cart.add_to_cart(hat).await?;
        cart.increment(shoe_id.as_str()).await?;
        cart.decrement(hat_id.as_str()).await?;

        anyhow::Ok(())
    })
    .await?;

    for product in store.products() {
        tracing::info!(
            id = %product.id,
            title = %product.title,
            quantity = product.quantity,
            "✅ Cart entry"
        );
    }

    tracing::info!("🎉 Demo complete, cart persisted for the next run");

    Ok(())
}
