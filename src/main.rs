use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

mod offer_engine;
mod routes;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let engines = Arc::new(routes::rank::build_engines());

    let app = Router::new()
        .route("/health", get(health))
        .merge(routes::rank::routes(engines))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8001").await.unwrap();
    println!("💳 Offer Service running on port 8001");
    axum::serve(listener, app).await.unwrap();
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "offer-service",
        "retailers": ["amazon", "flipkart", "croma", "jiomart"]
    }))
}
