//! Offer extraction and ranking engine
//!
//! This module provides the core components for turning raw card-offer text
//! scraped from retailer product pages into structured, scored and ranked
//! offers: a regex-driven parser, a bank/provider registry, and a heuristic
//! ranker that estimates each offer's value at a given product price.

pub mod notes;
pub mod parser;
pub mod ranker;
pub mod registry;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// One raw offer record as handed over by a site scraper. `card_type`
/// carries the offer card's title text; either field may be empty or
/// missing entirely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOffer {
    #[serde(default)]
    pub card_type: String,
    #[serde(default)]
    pub offer_description: String,
}

/// Offer classification. The source text is not mutually exclusive; the
/// parser resolves every offer to exactly one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum OfferType {
    BankOffer,
    NoCostEmi,
    Cashback,
    ExchangeOffer,
    PartnerOffers,
    /// Anything the keyword tables don't recognize. Carries the raw title,
    /// or the retailer's fallback label when the title is blank.
    Generic(String),
}

impl OfferType {
    pub fn label(&self) -> &str {
        match self {
            OfferType::BankOffer => "Bank Offer",
            OfferType::NoCostEmi => "No Cost EMI",
            OfferType::Cashback => "Cashback",
            OfferType::ExchangeOffer => "Exchange Offer",
            OfferType::PartnerOffers => "Partner Offers",
            OfferType::Generic(label) => label,
        }
    }
}

impl fmt::Display for OfferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for OfferType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardType {
    Credit,
    Debit,
    CreditOrDebit,
}

impl CardType {
    pub fn label(&self) -> &'static str {
        match self {
            CardType::Credit => "Credit",
            CardType::Debit => "Debit",
            CardType::CreditOrDebit => "Credit/Debit",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for CardType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Structured offer parsed from a single raw record. Created once by the
/// parser, consumed read-only by the ranker.
///
/// `amount` and `percentage` are not both authoritative: for
/// percentage-with-cap text the rupee cap lands in `amount` and
/// `percentage` stays unset, so the ranker always has exactly one
/// discount basis (percentage preferred when present).
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub title: String,
    pub description: String,
    pub amount: f64,
    pub percentage: Option<f64>,
    pub offer_type: OfferType,
    pub bank: Option<String>,
    pub card_type: Option<CardType>,
    pub card_provider: Option<String>,
    pub min_spend: Option<f64>,
    pub validity: Option<String>,
    pub is_instant: bool,
}

/// Parsed offer annotated with ranking results. Bank offers carry a score
/// and a 1-based rank; every other type passes through with both unset but
/// still gets applicability, net price and a note.
#[derive(Debug, Clone, Serialize)]
pub struct RankedOffer {
    pub title: String,
    pub description: String,
    pub amount: f64,
    pub percentage: Option<f64>,
    pub bank: Option<String>,
    pub validity: Option<String>,
    pub min_spend: Option<f64>,
    pub score: Option<f64>,
    pub is_instant: bool,
    pub net_effective_price: f64,
    pub is_applicable: bool,
    pub note: String,
    pub offer_type: OfferType,
    pub rank: Option<usize>,
    pub card_type: Option<CardType>,
    pub card_provider: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Retailer {
    Amazon,
    Flipkart,
    Croma,
    JioMart,
}

impl Retailer {
    pub const ALL: [Retailer; 4] = [
        Retailer::Amazon,
        Retailer::Flipkart,
        Retailer::Croma,
        Retailer::JioMart,
    ];
}

/// Per-retailer knobs for the shared engine. Everything else — pattern
/// tables, scoring constants, classification keywords — is common.
#[derive(Debug, Clone)]
pub struct RetailerProfile {
    pub retailer: Retailer,
    /// Type label for offers the keyword tables can't classify.
    pub fallback_label: &'static str,
    /// Lowercase titles treated as blank during title resolution.
    pub placeholder_titles: &'static [&'static str],
    /// Whether UPI/wallet identities count as banks and earn the digital
    /// payment scoring bonus.
    pub digital_payments: bool,
}

impl RetailerProfile {
    pub fn for_retailer(retailer: Retailer) -> Self {
        match retailer {
            Retailer::Amazon => Self {
                retailer,
                fallback_label: "Other Offer",
                placeholder_titles: &["summary"],
                digital_payments: false,
            },
            Retailer::Flipkart => Self {
                retailer,
                fallback_label: "Flipkart Offer",
                placeholder_titles: &["summary", "flipkart offer"],
                digital_payments: false,
            },
            Retailer::Croma => Self {
                retailer,
                fallback_label: "Croma Offer",
                placeholder_titles: &["summary", "croma offer"],
                digital_payments: false,
            },
            Retailer::JioMart => Self {
                retailer,
                fallback_label: "JioMart Offer",
                placeholder_titles: &["summary", "jiomart offer"],
                digital_payments: true,
            },
        }
    }
}

/// Engine facade wiring a parser and a ranker around one shared registry.
pub struct OfferEngine {
    parser: parser::OfferParser,
    ranker: ranker::OfferRanker,
}

impl OfferEngine {
    pub fn new(retailer: Retailer) -> Self {
        let profile = RetailerProfile::for_retailer(retailer);
        let registry = Arc::new(registry::BankRegistry::for_retailer(retailer));
        Self {
            parser: parser::OfferParser::new(profile.clone(), registry.clone()),
            ranker: ranker::OfferRanker::new(profile, registry),
        }
    }

    /// Parse and rank one product's offer list at the given price.
    pub fn rank_offers(&self, offers: &[RawOffer], product_price: f64) -> Vec<RankedOffer> {
        let parsed: Vec<Offer> = offers.iter().map(|o| self.parser.parse_offer(o)).collect();
        self.ranker.rank(parsed, product_price)
    }
}

lazy_static! {
    static ref PRICE_RUN: Regex = Regex::new(r"[\d,]+\.?\d*").unwrap();
}

/// Normalizes a display price like "₹30,999" to its numeric value.
/// Unparseable input maps to 0.0 rather than an error.
pub fn parse_price_amount(price: &str) -> f64 {
    PRICE_RUN
        .find(price)
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .unwrap_or(0.0)
}
