//! End-to-end walkthrough against a running backend: add a food to the
//! guest cart, log in (merging the cart), check out, then track the order
//! until it finishes or the watch window runs out.
//!
//! Configure with `API_BASE_URL` plus `DEMO_USERNAME`, `DEMO_PASSWORD`,
//! `DEMO_FOOD_ID`, `DEMO_ADDRESS` and `DEMO_PHONE`.

use std::time::Duration;

use food_delivery_client::{AppConfig, Client, OrderStatus, PaymentMethod};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const WATCH_WINDOW: Duration = Duration::from_secs(120);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,food_delivery_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let client = Client::new(config)?;

    let username = env_or("DEMO_USERNAME", "customer1");
    let password = env_or("DEMO_PASSWORD", "123456");
    let food_id: i64 = env_or("DEMO_FOOD_ID", "1").parse()?;
    let address = env_or("DEMO_ADDRESS", "12 Nguyen Trai, District 1");
    let phone = env_or("DEMO_PHONE", "0900000001");

    // Shop before logging in so the merge has something to do.
    client.logout().await.ok();
    let guest_cart = client.cart().add_item(food_id, 2, None).await?;
    println!(
        "Guest cart: {} items, total {}",
        guest_cart.total_items, guest_cart.total_amount
    );

    let outcome = client.login(&username, &password).await?;
    println!("Logged in as {}", outcome.profile.username);
    if !outcome.merge.is_clean() {
        for failure in &outcome.merge.failed {
            println!(
                "Could not move \"{}\" to the server cart: {}",
                failure.item.name, failure.reason
            );
        }
    }

    let cart = client.cart().fetch().await?;
    println!(
        "Server cart: {} items, total {}",
        cart.total_items, cart.total_amount
    );

    let methods = client.payment_methods().await?;
    let method = methods.first().cloned().unwrap_or(PaymentMethod::Cash);
    println!("Paying with {}", method.label());

    let order = client
        .orders()
        .checkout(&cart, &address, &phone, method, None)
        .await?;
    println!("Order {} placed ({})", order.id, order.status.label());

    watch_order(&client, &order.id).await;
    Ok(())
}

async fn watch_order(client: &Client, order_id: &str) {
    let mut tracker = client.track_order(order_id);
    let mut last_seen: Option<OrderStatus> = None;

    let watched = tokio::time::timeout(WATCH_WINDOW, async {
        while let Some(order) = tracker.next_update().await {
            if last_seen.as_ref() != Some(&order.status) {
                println!("Order {}: {}", order.id, order.status.label());
                last_seen = Some(order.status);
            }
        }
    })
    .await;

    if watched.is_err() {
        tracker.stop();
        println!("Stopped watching after {}s", WATCH_WINDOW.as_secs());
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
