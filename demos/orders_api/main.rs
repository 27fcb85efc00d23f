//! Orders API demonstrating configured hypermedia injection
//!
//! ```sh
//! cargo run --example orders_api
//! curl http://127.0.0.1:3000/orders
//! curl http://127.0.0.1:3000/orders/1
//! ```

use anyhow::Result;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use hypermedia::prelude::*;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const CONFIG: &str = include_str!("hypermedia.yaml");

fn orders() -> Value {
    json!([
        {
            "OrderNo": 1,
            "Customer": {"Id": "c-100", "Name": "Acme"},
            "Lines": [{"Sku": "widget", "Qty": 2}, {"Sku": "gadget", "Qty": 1}]
        },
        {
            "OrderNo": 2,
            "Customer": null,
            "Lines": [{"Sku": "widget", "Qty": 5}]
        }
    ])
}

async fn list_orders() -> Json<Value> {
    Json(json!({ "Results": orders() }))
}

async fn get_order(Path(order_no): Path<u64>) -> impl IntoResponse {
    let found = orders()
        .as_array()
        .and_then(|all| all.iter().find(|o| o["OrderNo"] == order_no).cloned());

    match found {
        Some(order) => (StatusCode::OK, Json(order)),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "code": "ORDER_NOT_FOUND",
                "message": format!("Order {} not found", order_no)
            })),
        ),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hypermedia=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = HypermediaConfig::from_yaml_str(CONFIG)?;

    let list = Router::new()
        .route("/orders", get(list_orders))
        .with_hypermedia(HypermediaState::from_config(&config, "list_orders")?);
    let detail = Router::new()
        .route("/orders/{order_no}", get(get_order))
        .with_hypermedia(HypermediaState::from_config(&config, "get_order")?);

    let app = Router::new()
        .merge(list)
        .merge(detail)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("Orders API listening on {}", listener.local_addr()?);
    tracing::info!("  - GET /orders");
    tracing::info!("  - GET /orders/{{order_no}}");

    axum::serve(listener, app).await?;
    Ok(())
}
