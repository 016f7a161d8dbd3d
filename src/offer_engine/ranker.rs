//! Offer scoring and ranking.
//!
//! Only bank offers are scored and ranked; every other type passes through
//! unscored but still gets applicability, net effective price and a note.

use crate::offer_engine::notes;
use crate::offer_engine::registry::BankRegistry;
use crate::offer_engine::{CardType, Offer, OfferType, RankedOffer, RetailerProfile};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::info;

const BASE_SCORE: f64 = 80.0;

/// Bank strings containing one of these count as digital payment
/// identities under profiles that enable the digital bonus.
const DIGITAL_KEYWORDS: &[&str] = &[
    "upi",
    "wallet",
    "paytm",
    "mobikwik",
    "phonepe",
    "google pay",
    "gpay",
];

pub struct OfferRanker {
    profile: RetailerProfile,
    registry: Arc<BankRegistry>,
}

impl OfferRanker {
    pub fn new(profile: RetailerProfile, registry: Arc<BankRegistry>) -> Self {
        Self { profile, registry }
    }

    /// Heuristic 0–100 value estimate for a bank offer at the given price.
    /// Non-bank offers score 0 here and are never ranked.
    pub fn calculate_offer_score(&self, offer: &Offer, product_price: f64) -> f64 {
        if offer.offer_type != OfferType::BankOffer {
            return 0.0;
        }

        let mut score = BASE_SCORE;

        // Discount size, as a share of the price. Percentage basis wins
        // over the flat amount when both are present.
        if product_price > 0.0 {
            let discount_percent = match offer.percentage {
                Some(pct) if pct > 0.0 => Some(pct),
                _ if offer.amount > 0.0 => Some(offer.amount / product_price * 100.0),
                _ => None,
            };
            if let Some(pct) = discount_percent {
                score += (pct * 2.0).min(50.0);
            }
        }

        // Minimum spend is the dominant factor.
        match offer.min_spend {
            Some(min_spend) if min_spend > product_price => {
                let shortfall_pct = (min_spend - product_price) / product_price * 100.0;
                if shortfall_pct > 50.0 {
                    // Far out of reach: hard reset to a low but rankable score.
                    score = 15.0;
                } else {
                    score = (score - shortfall_pct * 0.5).max(20.0);
                }
            }
            Some(min_spend) => {
                let spend_ratio = if product_price > 0.0 {
                    min_spend / product_price
                } else {
                    0.0
                };
                if spend_ratio <= 0.9 {
                    score += (1.0 - spend_ratio) * 10.0;
                }
            }
            None => score += 20.0,
        }

        if offer.is_instant {
            score += 5.0;
        }

        match &offer.bank {
            Some(bank) => score += (self.registry.score(bank) - 70.0) / 2.0,
            None => score -= 5.0,
        }

        score += match offer.card_type {
            Some(CardType::Credit) => 3.0,
            Some(CardType::CreditOrDebit) => 2.0,
            Some(CardType::Debit) => 1.0,
            None => 0.0,
        };

        if let Some(provider) = &offer.card_provider {
            score += self.registry.provider_bonus(provider);
        }

        if self.profile.digital_payments {
            if let Some(bank) = &offer.bank {
                let lower = bank.to_lowercase();
                if DIGITAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
                    score += 5.0;
                }
            }
        }

        score.clamp(0.0, 100.0)
    }

    /// Applicability and net effective price. An unmet minimum spend means
    /// no discount at all; otherwise percentage basis is preferred and the
    /// result never drops below zero.
    fn evaluate(&self, offer: &Offer, product_price: f64) -> (bool, f64) {
        if let Some(min_spend) = offer.min_spend {
            if product_price < min_spend {
                return (false, product_price);
            }
        }
        let discount = match offer.percentage {
            Some(pct) if pct > 0.0 => pct / 100.0 * product_price,
            _ => offer.amount,
        };
        (true, (product_price - discount).max(0.0))
    }

    /// Scores, sorts and ranks the bank offers, annotates everything else.
    /// Bank offers come first in score-descending order (stable on ties),
    /// followed by the remaining offers in input order.
    pub fn rank(&self, offers: Vec<Offer>, product_price: f64) -> Vec<RankedOffer> {
        let (bank_offers, other_offers): (Vec<Offer>, Vec<Offer>) = offers
            .into_iter()
            .partition(|o| o.offer_type == OfferType::BankOffer);

        info!(
            retailer = ?self.profile.retailer,
            bank = bank_offers.len(),
            other = other_offers.len(),
            product_price,
            "ranking offers"
        );

        let mut ranked: Vec<RankedOffer> = Vec::with_capacity(bank_offers.len() + other_offers.len());

        let mut scored: Vec<RankedOffer> = bank_offers
            .into_iter()
            .map(|offer| {
                let score = self.calculate_offer_score(&offer, product_price);
                self.annotate(offer, Some(score), product_price)
            })
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        for (idx, offer) in scored.iter_mut().enumerate() {
            offer.rank = Some(idx + 1);
        }
        ranked.extend(scored);

        for offer in other_offers {
            ranked.push(self.annotate(offer, None, product_price));
        }
        ranked
    }

    fn annotate(&self, offer: Offer, score: Option<f64>, product_price: f64) -> RankedOffer {
        let (is_applicable, net_effective_price) = self.evaluate(&offer, product_price);
        let note = notes::generate_note(&offer, product_price, is_applicable, net_effective_price);
        RankedOffer {
            title: offer.title,
            description: offer.description,
            amount: offer.amount,
            percentage: offer.percentage,
            bank: offer.bank,
            validity: offer.validity,
            min_spend: offer.min_spend,
            score,
            is_instant: offer.is_instant,
            net_effective_price,
            is_applicable,
            note,
            offer_type: offer.offer_type,
            rank: None,
            card_type: offer.card_type,
            card_provider: offer.card_provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offer_engine::{OfferEngine, RawOffer, Retailer};

    const EPS: f64 = 1e-9;

    fn ranker_for(retailer: Retailer) -> OfferRanker {
        OfferRanker::new(
            RetailerProfile::for_retailer(retailer),
            Arc::new(BankRegistry::for_retailer(retailer)),
        )
    }

    fn bank_offer(description: &str) -> Offer {
        Offer {
            title: "Bank Offer".to_string(),
            description: description.to_string(),
            amount: 0.0,
            percentage: None,
            offer_type: OfferType::BankOffer,
            bank: None,
            card_type: None,
            card_provider: None,
            min_spend: None,
            validity: None,
            is_instant: false,
        }
    }

    fn raw(title: &str, description: &str) -> RawOffer {
        RawOffer {
            card_type: title.to_string(),
            offer_description: description.to_string(),
        }
    }

    const HDFC_FLAT_OFFER: &str =
        "Flat ₹1000 Instant Discount on HDFC Bank Credit Card, Minimum purchase value of INR 20000";

    #[test]
    fn applicable_flat_offer_is_ranked_high() {
        let engine = OfferEngine::new(Retailer::Amazon);
        let ranked = engine.rank_offers(&[raw("Bank Offer", HDFC_FLAT_OFFER)], 25_000.0);
        assert_eq!(ranked.len(), 1);
        let offer = &ranked[0];
        assert!(offer.is_applicable);
        assert_eq!(offer.net_effective_price, 24_000.0);
        assert_eq!(offer.rank, Some(1));
        // 80 base + 8 discount + 2 min-spend + 5 instant + 7.5 bank + 3 credit,
        // clamped to 100.
        assert!((offer.score.unwrap() - 100.0).abs() < EPS);
        assert!(offer.score.unwrap() > 80.0);
    }

    #[test]
    fn unmet_min_spend_resets_the_score() {
        let engine = OfferEngine::new(Retailer::Amazon);
        let ranked = engine.rank_offers(&[raw("Bank Offer", HDFC_FLAT_OFFER)], 10_000.0);
        let offer = &ranked[0];
        assert!(!offer.is_applicable);
        assert_eq!(offer.net_effective_price, 10_000.0);
        // Shortfall is 100% of the price, so the running score collapses to
        // 15 before the instant (+5), HDFC (+7.5) and credit (+3) bonuses.
        assert!((offer.score.unwrap() - 30.5).abs() < EPS);
    }

    #[test]
    fn moderate_shortfall_is_a_penalty_not_a_reset() {
        let ranker = ranker_for(Retailer::Amazon);
        let mut offer = bank_offer("");
        offer.min_spend = Some(12_000.0);
        // Shortfall 20% -> -10 points; no-bank -5; no discount bonus.
        let score = ranker.calculate_offer_score(&offer, 10_000.0);
        assert!((score - 65.0).abs() < EPS);
    }

    #[test]
    fn capped_percentage_offer_uses_the_cap() {
        let engine = OfferEngine::new(Retailer::Amazon);
        let ranked = engine.rank_offers(
            &[raw("Bank Offer", "Up to 10% Discount up to INR 2000 on ICICI Bank Cards")],
            15_000.0,
        );
        let offer = &ranked[0];
        assert_eq!(offer.amount, 2000.0);
        assert_eq!(offer.percentage, None);
        assert!(offer.is_applicable);
        assert_eq!(offer.net_effective_price, 13_000.0);
    }

    #[test]
    fn bankless_offer_without_min_spend() {
        let engine = OfferEngine::new(Retailer::Amazon);
        let ranked =
            engine.rank_offers(&[raw("Bank Offer", "Flat ₹500 Instant Discount")], 5_000.0);
        let offer = &ranked[0];
        assert_eq!(offer.bank, None);
        assert!(offer.is_applicable);
        assert_eq!(offer.net_effective_price, 4_500.0);
        // 80 + 20 discount + 20 no-min-spend + 5 instant - 5 no-bank = 120 -> 100.
        assert!((offer.score.unwrap() - 100.0).abs() < EPS);
    }

    #[test]
    fn no_bank_penalty_and_no_min_spend_bonus_are_visible_unclamped() {
        let ranker = ranker_for(Retailer::Amazon);
        let mut offer = bank_offer("");
        offer.amount = 50.0;
        // 80 + 1% * 2 + 20 - 5 = 97, below the clamp.
        let score = ranker.calculate_offer_score(&offer, 10_000.0);
        assert!((score - 97.0).abs() < EPS);
    }

    #[test]
    fn empty_input_ranks_to_empty_output() {
        let engine = OfferEngine::new(Retailer::Flipkart);
        assert!(engine.rank_offers(&[], 12_345.0).is_empty());
    }

    #[test]
    fn ranks_are_contiguous_and_ties_keep_input_order() {
        let ranker = ranker_for(Retailer::Amazon);
        let mut first = bank_offer("first");
        first.amount = 100.0;
        let mut biggest = bank_offer("biggest");
        biggest.amount = 200.0;
        let mut third = bank_offer("third");
        third.amount = 100.0;

        let ranked = ranker.rank(vec![first, biggest, third], 10_000.0);
        let ranks: Vec<usize> = ranked.iter().map(|o| o.rank.unwrap()).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(ranked[0].description, "biggest");
        // Equal scores: "first" was earlier in the input, so it stays ahead.
        assert_eq!(ranked[1].description, "first");
        assert_eq!(ranked[2].description, "third");
        assert_eq!(ranked[1].score, ranked[2].score);
    }

    #[test]
    fn non_bank_offers_are_never_scored() {
        let engine = OfferEngine::new(Retailer::Croma);
        let ranked = engine.rank_offers(
            &[
                raw("No Cost EMI", "Convert to emi at no extra cost"),
                raw("Cashback", "Get ₹100 cashback on prepaid orders"),
            ],
            8_000.0,
        );
        for offer in &ranked {
            assert_eq!(offer.score, None);
            assert_eq!(offer.rank, None);
            assert!(!offer.note.is_empty());
        }
    }

    #[test]
    fn bank_offers_come_first_then_others_in_input_order() {
        let engine = OfferEngine::new(Retailer::Croma);
        let ranked = engine.rank_offers(
            &[
                raw("Exchange Offer", "Trade in your old device"),
                raw("Bank Offer", "Flat ₹300 off on Axis Bank cards"),
                raw("Partner Offer", "Free subscription with purchase"),
                raw("Bank Offer", "Flat ₹700 off on ICICI Bank cards"),
            ],
            9_000.0,
        );
        assert_eq!(ranked[0].rank, Some(1));
        assert_eq!(ranked[1].rank, Some(2));
        // Both bank offers clamp to 100, so the tie preserves input order.
        assert!(ranked[0].description.contains("₹300"));
        assert_eq!(ranked[2].offer_type, OfferType::ExchangeOffer);
        assert_eq!(ranked[3].offer_type, OfferType::PartnerOffers);
    }

    #[test]
    fn percentage_basis_drives_net_price() {
        let ranker = ranker_for(Retailer::Amazon);
        let mut offer = bank_offer("ten percent");
        offer.percentage = Some(10.0);
        offer.amount = 0.0;
        let ranked = ranker.rank(vec![offer], 15_000.0);
        assert_eq!(ranked[0].net_effective_price, 13_500.0);
    }

    #[test]
    fn percentage_wins_over_flat_amount_when_both_present() {
        let ranker = ranker_for(Retailer::Amazon);
        let mut offer = bank_offer("both bases");
        offer.percentage = Some(5.0);
        offer.amount = 2_000.0;
        let ranked = ranker.rank(vec![offer], 10_000.0);
        // 5% of 10000, not the flat 2000.
        assert_eq!(ranked[0].net_effective_price, 9_500.0);
    }

    #[test]
    fn net_price_never_negative() {
        let ranker = ranker_for(Retailer::Amazon);
        let mut offer = bank_offer("huge");
        offer.amount = 99_999.0;
        let ranked = ranker.rank(vec![offer], 500.0);
        assert_eq!(ranked[0].net_effective_price, 0.0);
    }

    #[test]
    fn min_spend_equal_to_price_is_applicable() {
        let ranker = ranker_for(Retailer::Amazon);
        let mut offer = bank_offer("exact");
        offer.amount = 100.0;
        offer.min_spend = Some(5_000.0);
        let ranked = ranker.rank(vec![offer], 5_000.0);
        assert!(ranked[0].is_applicable);
        assert_eq!(ranked[0].net_effective_price, 4_900.0);
    }

    #[test]
    fn zero_price_never_panics() {
        let ranker = ranker_for(Retailer::Amazon);
        let mut offer = bank_offer("degenerate");
        offer.amount = 250.0;
        offer.min_spend = Some(1_000.0);
        let ranked = ranker.rank(vec![offer], 0.0);
        assert!(!ranked[0].is_applicable);
        assert_eq!(ranked[0].net_effective_price, 0.0);
        let score = ranked[0].score.unwrap();
        assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn score_bounds_hold_for_stacked_bonuses() {
        let ranker = ranker_for(Retailer::Amazon);
        let mut offer = bank_offer("stacked");
        offer.amount = 5_000.0;
        offer.percentage = None;
        offer.bank = Some("ICICI".to_string());
        offer.card_type = Some(CardType::Credit);
        offer.card_provider = Some("American Express".to_string());
        offer.is_instant = true;
        let score = ranker.calculate_offer_score(&offer, 10_000.0);
        assert_eq!(score, 100.0);
    }

    #[test]
    fn digital_payment_bonus_is_jiomart_only() {
        let mut offer = bank_offer("upi");
        offer.bank = Some("Paytm UPI".to_string());
        // Ratio above 0.9 so the min-spend branch adds nothing either way.
        offer.min_spend = Some(9_500.0);

        let amazon_score = ranker_for(Retailer::Amazon).calculate_offer_score(&offer, 10_000.0);
        let jiomart_score = ranker_for(Retailer::JioMart).calculate_offer_score(&offer, 10_000.0);
        // Amazon: neutral default reputation, no digital bonus.
        assert!((amazon_score - 80.0).abs() < EPS);
        // JioMart: Paytm UPI reputation 75 (+2.5) plus the +5 digital bonus.
        assert!((jiomart_score - 87.5).abs() < EPS);
    }
}
