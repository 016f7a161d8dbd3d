//! Offer ranking endpoint: the HTTP boundary between site scrapers and
//! the extraction/ranking core.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::offer_engine::{parse_price_amount, OfferEngine, RankedOffer, RawOffer, Retailer};

pub type EngineMap = HashMap<Retailer, OfferEngine>;

/// One engine per supported retailer, built once at startup.
pub fn build_engines() -> EngineMap {
    Retailer::ALL
        .iter()
        .map(|&retailer| (retailer, OfferEngine::new(retailer)))
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct RankOffersRequest {
    pub retailer: Retailer,
    pub product_price: PriceInput,
    #[serde(default)]
    pub offers: Vec<RawOffer>,
}

/// Product price as scrapers deliver it: already numeric, or a display
/// string like "₹30,999".
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Amount(f64),
    Display(String),
}

impl PriceInput {
    fn normalize(&self) -> f64 {
        match self {
            PriceInput::Amount(value) => *value,
            PriceInput::Display(text) => parse_price_amount(text),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RankOffersResponse {
    pub retailer: Retailer,
    pub product_price: f64,
    pub offer_count: usize,
    pub bank_offer_count: usize,
    pub ranked_offers: Vec<RankedOffer>,
    pub ranked_at: DateTime<Utc>,
}

pub fn routes(engines: Arc<EngineMap>) -> Router {
    Router::new()
        .route("/offers/rank", post(rank_offers))
        .layer(Extension(engines))
}

async fn rank_offers(
    Extension(engines): Extension<Arc<EngineMap>>,
    Json(payload): Json<RankOffersRequest>,
) -> Result<Json<RankOffersResponse>, StatusCode> {
    let engine = engines.get(&payload.retailer).ok_or_else(|| {
        tracing::error!(retailer = ?payload.retailer, "no engine configured for retailer");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let product_price = payload.product_price.normalize();
    let ranked_offers = engine.rank_offers(&payload.offers, product_price);
    let bank_offer_count = ranked_offers.iter().filter(|o| o.rank.is_some()).count();

    Ok(Json(RankOffersResponse {
        retailer: payload.retailer,
        product_price,
        offer_count: ranked_offers.len(),
        bank_offer_count,
        ranked_offers,
        ranked_at: Utc::now(),
    }))
}
