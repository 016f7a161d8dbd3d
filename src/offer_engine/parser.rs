//! Free-text offer parsing: regex-driven field extraction and
//! classification.
//!
//! Offer descriptions are marketing copy, not a grammar; every extractor
//! here is a priority-ordered pattern table where the first hit wins and a
//! miss is an absent field, never an error.

use crate::offer_engine::registry::{BankRegistry, CARD_PROVIDERS};
use crate::offer_engine::{CardType, Offer, OfferType, RawOffer, RetailerProfile};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

pub struct OfferParser {
    profile: RetailerProfile,
    registry: Arc<BankRegistry>,
    patterns: PatternTable,
}

struct PatternTable {
    /// Flat rupee discounts, checked before percentage phrasings: capped
    /// percentage text usually contains a standalone rupee figure that
    /// must win over the percentage.
    flat_amount: Vec<Regex>,
    /// "X% discount up to ₹Y" — group 2 is the rupee cap.
    capped_percent: Vec<Regex>,
    cashback_amount: Vec<Regex>,
    /// Bare percentages; a match with the `cap` group set is a capped
    /// offer in disguise and is skipped.
    percent: Vec<Regex>,
    credit: Vec<Regex>,
    debit: Vec<Regex>,
    card_word: Regex,
    min_spend: Vec<Regex>,
    validity: Vec<Regex>,
}

impl PatternTable {
    fn new() -> Self {
        Self {
            flat_amount: vec![
                Regex::new(r"(?i)(?:additional\s+)?flat\s+(?:INR\s+|₹\s*)([\d,]+\.?\d*)").unwrap(),
                Regex::new(r"(?i)(?:additional\s+)?(?:INR\s+|₹\s*)([\d,]+\.?\d*)\s+(?:instant\s+)?discount").unwrap(),
                Regex::new(r"(?i)(?:get\s+)?(?:INR\s+|₹\s*)([\d,]+\.?\d*)\s+(?:off|discount)").unwrap(),
                Regex::new(r"(?i)(?:save\s+)?(?:INR\s+|₹\s*)([\d,]+\.?\d*)").unwrap(),
                Regex::new(r"(?i)₹\s*([\d,]+\.?\d*)").unwrap(),
                Regex::new(r"(?i)Rs\.?\s*([\d,]+\.?\d*)").unwrap(),
                Regex::new(r"(?i)INR\s*([\d,]+\.?\d*)").unwrap(),
            ],
            capped_percent: vec![
                Regex::new(r"(?i)([\d.]+)%\s+(?:instant\s+)?discount\s+up\s+to\s+(?:INR\s+|₹\s*)([\d,]+\.?\d*)").unwrap(),
                Regex::new(r"(?i)up\s+to\s+([\d.]+)%\s+(?:off|discount).*?(?:max|maximum|up\s+to)\s+(?:INR\s+|₹\s*)([\d,]+\.?\d*)").unwrap(),
                Regex::new(r"(?i)([\d.]+)%\s+(?:off|discount).*?(?:capped\s+at|maximum)\s+(?:INR\s+|₹\s*)([\d,]+\.?\d*)").unwrap(),
            ],
            cashback_amount: vec![
                Regex::new(r"(?i)(?:get\s+)?(?:INR\s+|₹\s*)([\d,]+\.?\d*)\s+(?:cashback|cash\s+back)").unwrap(),
                Regex::new(r"(?i)(?:earn\s+)?(?:INR\s+|₹\s*)([\d,]+\.?\d*)\s+(?:cashback|cash\s+back)").unwrap(),
            ],
            percent: vec![
                Regex::new(r"(?i)(?:up\s+to|upto)\s+(?P<pct>[\d.]+)%").unwrap(),
                Regex::new(r"(?i)(?P<pct>[\d.]+)%\s+(?:off|discount)(?P<cap>\s+up\s+to)?").unwrap(),
                Regex::new(r"(?i)get\s+(?P<pct>[\d.]+)%\s+(?:off|discount)").unwrap(),
                Regex::new(r"(?i)save\s+(?P<pct>[\d.]+)%").unwrap(),
            ],
            credit: vec![
                Regex::new(r"\bcredit\s+card\b").unwrap(),
                Regex::new(r"\bcc\b").unwrap(),
                Regex::new(r"\bcredit\b.*\bcard\b").unwrap(),
                Regex::new(r"\bmaster\s+card\b").unwrap(),
                Regex::new(r"\bvisa\s+card\b.*\bcredit\b").unwrap(),
            ],
            debit: vec![
                Regex::new(r"\bdebit\s+card\b").unwrap(),
                Regex::new(r"\bdc\b").unwrap(),
                Regex::new(r"\bdebit\b.*\bcard\b").unwrap(),
                Regex::new(r"\bvisa\s+card\b.*\bdebit\b").unwrap(),
                Regex::new(r"\bmaster\s+card\b.*\bdebit\b").unwrap(),
            ],
            card_word: Regex::new(r"\bcard\b").unwrap(),
            min_spend: vec![
                Regex::new(r"(?i)(?:mini|minimum)\s+purchase\s+value\s+(?:of\s+)?(?:INR\s+|₹\s*|Rs\.?\s*)([\d,]+\.?\d*)").unwrap(),
                Regex::new(r"(?i)(?:mini|minimum)\s+(?:purchase|spend|transaction)\s+(?:of\s+|value\s+)?(?:INR\s+|₹\s*|Rs\.?\s*)([\d,]+\.?\d*)").unwrap(),
                Regex::new(r"(?i)min(?:imum)?\s+(?:purchase|spend|transaction)\s+(?:of\s+|value\s+)?(?:INR\s+|₹\s*|Rs\.?\s*)([\d,]+\.?\d*)").unwrap(),
                Regex::new(r"(?i)valid\s+on\s+(?:orders?|purchases?)\s+(?:of\s+|above\s+|worth\s+)(?:INR\s+|₹\s*|Rs\.?\s*)([\d,]+\.?\d*)").unwrap(),
                Regex::new(r"(?i)applicable\s+on\s+(?:purchases?|orders?|transactions?)\s+(?:of\s+|above\s+|worth\s+)(?:INR\s+|₹\s*|Rs\.?\s*)([\d,]+\.?\d*)").unwrap(),
                Regex::new(r"(?i)(?:on\s+)?(?:orders?|purchases?|spending)\s+(?:of\s+|above\s+|worth\s+)(?:INR\s+|₹\s*|Rs\.?\s*)([\d,]+\.?\d*)\s+(?:or\s+more|and\s+above)").unwrap(),
                Regex::new(r"(?i)(?:minimum|min)\s+(?:spend|purchase|order)\s*:\s*(?:INR\s+|₹\s*|Rs\.?\s*)([\d,]+\.?\d*)").unwrap(),
                Regex::new(r"(?i)(?:spend|purchase|order)\s+(?:minimum|min|at\s+least)\s+(?:INR\s+|₹\s*|Rs\.?\s*)([\d,]+\.?\d*)").unwrap(),
            ],
            validity: vec![
                Regex::new(r"(?i)valid\s+(?:till|until|up\s+to)\s+([^,\.;]+)").unwrap(),
                Regex::new(r"(?i)offer\s+valid\s+(?:till|until|up\s+to)\s+([^,\.;]+)").unwrap(),
                Regex::new(r"(?i)expires?\s+(?:on|by)?\s+([^,\.;]+)").unwrap(),
                Regex::new(r"(?i)valid\s+(?:from|between).*?(?:to|till|until)\s+([^,\.;]+)").unwrap(),
                Regex::new(r"(?i)(?:validity|valid)\s*:\s*([^,\.;]+)").unwrap(),
            ],
        }
    }
}

fn parse_rupees(group: &str) -> Option<f64> {
    group.replace(',', "").parse::<f64>().ok()
}

impl OfferParser {
    pub fn new(profile: RetailerProfile, registry: Arc<BankRegistry>) -> Self {
        Self {
            profile,
            registry,
            patterns: PatternTable::new(),
        }
    }

    /// Converts one raw record into a structured offer. Every field that
    /// can't be extracted comes back absent or zero; this never fails.
    pub fn parse_offer(&self, raw: &RawOffer) -> Offer {
        let raw_title = raw.card_type.trim();
        let description = raw.offer_description.trim();

        let offer_type = self.classify(raw_title, description);
        let title = self.resolve_title(raw_title, &offer_type);

        let amount = self.extract_amount(description);
        let percentage = self.extract_percentage(description);
        let bank = self.extract_bank(description);
        let validity = self.extract_validity(description);
        let min_spend = self.extract_min_spend(description);
        let card_type = self.extract_card_type(description);
        let card_provider = self.extract_card_provider(description);

        let description_lower = description.to_lowercase();
        let is_instant =
            description_lower.contains("instant") || !description_lower.contains("cashback");

        debug!(
            %title,
            offer_type = offer_type.label(),
            amount,
            ?percentage,
            ?bank,
            ?min_spend,
            "parsed offer"
        );

        Offer {
            title,
            description: description.to_string(),
            amount,
            percentage,
            offer_type,
            bank,
            card_type,
            card_provider,
            min_spend,
            validity,
            is_instant,
        }
    }

    /// Flat rupee figure of the discount: flat phrasings first, then the
    /// rupee cap of capped percentage offers, then cashback phrasings.
    /// No match, or a capture that won't parse, yields 0.
    pub fn extract_amount(&self, description: &str) -> f64 {
        for re in &self.patterns.flat_amount {
            if let Some(caps) = re.captures(description) {
                return match parse_rupees(&caps[1]) {
                    Some(amount) => amount,
                    None => 0.0,
                };
            }
        }
        for re in &self.patterns.capped_percent {
            if let Some(caps) = re.captures(description) {
                return match parse_rupees(&caps[2]) {
                    Some(cap) => cap,
                    None => 0.0,
                };
            }
        }
        for re in &self.patterns.cashback_amount {
            if let Some(caps) = re.captures(description) {
                return match parse_rupees(&caps[1]) {
                    Some(amount) => amount,
                    None => 0.0,
                };
            }
        }
        0.0
    }

    /// Bare percentage for "upto X%" style offers. Suppressed entirely
    /// when a capped-percentage pattern matches: the cap already went into
    /// `amount`, and a percentage here would double-count the discount.
    pub fn extract_percentage(&self, description: &str) -> Option<f64> {
        if self
            .patterns
            .capped_percent
            .iter()
            .any(|re| re.is_match(description))
        {
            return None;
        }
        for re in &self.patterns.percent {
            for caps in re.captures_iter(description) {
                if caps.name("cap").is_some() {
                    continue;
                }
                return caps["pct"].parse::<f64>().ok();
            }
        }
        None
    }

    /// Three-tier bank lookup over the whole description: alias spellings,
    /// then canonical registry names, then colloquial fragments. Each tier
    /// collects every distinct hit; multiple banks come back alphabetical
    /// and comma-joined, never silently reduced to one.
    pub fn extract_bank(&self, description: &str) -> Option<String> {
        if description.is_empty() {
            return None;
        }
        let lower = description.to_lowercase();
        let mut found: BTreeSet<&str> = BTreeSet::new();

        for (alias, canonical) in self.registry.aliases() {
            if lower.contains(alias.as_str()) {
                found.insert(*canonical);
            }
        }
        if found.is_empty() {
            for (name, canonical) in self.registry.canonicals() {
                if lower.contains(name.as_str()) {
                    found.insert(*canonical);
                }
            }
        }
        if found.is_empty() {
            for &(fragment, canonical) in self.registry.variations() {
                if lower.contains(fragment) {
                    found.insert(canonical);
                }
            }
        }

        if found.is_empty() {
            None
        } else {
            Some(found.into_iter().collect::<Vec<_>>().join(", "))
        }
    }

    pub fn extract_card_type(&self, description: &str) -> Option<CardType> {
        let lower = description.to_lowercase();
        let credit = self.patterns.credit.iter().any(|re| re.is_match(&lower));
        let debit = self.patterns.debit.iter().any(|re| re.is_match(&lower));

        match (credit, debit) {
            (true, true) => Some(CardType::CreditOrDebit),
            (true, false) => Some(CardType::Credit),
            (false, true) => Some(CardType::Debit),
            (false, false) => {
                if !self.patterns.card_word.is_match(&lower) {
                    return None;
                }
                // "card" alone: infer from surrounding vocabulary.
                if ["premium", "rewards", "cashback", "points"]
                    .iter()
                    .any(|w| lower.contains(w))
                {
                    Some(CardType::Credit)
                } else if lower.contains("atm") {
                    Some(CardType::Debit)
                } else {
                    None
                }
            }
        }
    }

    pub fn extract_card_provider(&self, description: &str) -> Option<String> {
        let lower = description.to_lowercase();
        for provider in CARD_PROVIDERS {
            if lower.contains(&provider.to_lowercase()) {
                return Some((*provider).to_string());
            }
            if *provider == "Mastercard" && lower.contains("master") {
                return Some("Mastercard".to_string());
            }
            if *provider == "RuPay" && lower.contains("rupay") {
                return Some("RuPay".to_string());
            }
        }
        None
    }

    /// First matching min-spend phrasing wins; a capture that won't parse
    /// falls through to the next pattern.
    pub fn extract_min_spend(&self, description: &str) -> Option<f64> {
        for re in &self.patterns.min_spend {
            if let Some(caps) = re.captures(description) {
                if let Some(value) = parse_rupees(&caps[1]) {
                    return Some(value);
                }
            }
        }
        None
    }

    /// Validity window as free text, trimmed but otherwise untouched —
    /// source strings are too inconsistent to date-parse.
    pub fn extract_validity(&self, description: &str) -> Option<String> {
        for re in &self.patterns.validity {
            if let Some(caps) = re.captures(description) {
                return Some(caps[1].trim().to_string());
            }
        }
        None
    }

    /// Offer classification: title keywords always outrank description
    /// keywords, and unclassifiable offers keep their title (or take the
    /// retailer's fallback label) as a generic type.
    pub fn classify(&self, title: &str, description: &str) -> OfferType {
        let title_lower = title.to_lowercase();
        let description_lower = description.to_lowercase();
        let any = |text: &str, keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

        if any(&title_lower, &["bank offer", "instant discount", "card offer"]) {
            OfferType::BankOffer
        } else if any(&title_lower, &["no cost emi", "no-cost emi", "emi"]) {
            OfferType::NoCostEmi
        } else if any(&title_lower, &["cashback", "cash back"]) {
            OfferType::Cashback
        } else if any(&title_lower, &["exchange offer", "exchange"]) {
            OfferType::ExchangeOffer
        } else if any(&title_lower, &["partner offer", "partner"]) {
            OfferType::PartnerOffers
        } else if any(&description_lower, &["bank", "credit card", "debit card"]) {
            OfferType::BankOffer
        } else if any(&description_lower, &["emi", "no cost"]) {
            OfferType::NoCostEmi
        } else if title.is_empty() {
            OfferType::Generic(self.profile.fallback_label.to_string())
        } else {
            OfferType::Generic(title.to_string())
        }
    }

    /// Bank offers always surface as the literal "Bank Offer"; blank or
    /// placeholder titles take the offer type's label; anything else is
    /// kept verbatim.
    fn resolve_title(&self, raw_title: &str, offer_type: &OfferType) -> String {
        if *offer_type == OfferType::BankOffer {
            return "Bank Offer".to_string();
        }
        let lower = raw_title.to_lowercase();
        if raw_title.is_empty() || self.profile.placeholder_titles.iter().any(|p| *p == lower) {
            offer_type.label().to_string()
        } else {
            raw_title.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offer_engine::Retailer;

    fn parser_for(retailer: Retailer) -> OfferParser {
        OfferParser::new(
            RetailerProfile::for_retailer(retailer),
            Arc::new(BankRegistry::for_retailer(retailer)),
        )
    }

    fn parser() -> OfferParser {
        parser_for(Retailer::Amazon)
    }

    fn raw(title: &str, description: &str) -> RawOffer {
        RawOffer {
            card_type: title.to_string(),
            offer_description: description.to_string(),
        }
    }

    #[test]
    fn flat_discount_offer_is_fully_extracted() {
        let offer = parser().parse_offer(&raw(
            "Bank Offer",
            "Flat ₹1000 Instant Discount on HDFC Bank Credit Card, Minimum purchase value of INR 20000",
        ));
        assert_eq!(offer.amount, 1000.0);
        assert_eq!(offer.percentage, None);
        assert_eq!(offer.bank.as_deref(), Some("HDFC"));
        assert_eq!(offer.card_type, Some(CardType::Credit));
        assert_eq!(offer.min_spend, Some(20_000.0));
        assert_eq!(offer.offer_type, OfferType::BankOffer);
        assert!(offer.is_instant);
    }

    #[test]
    fn capped_percentage_yields_cap_not_percentage() {
        let p = parser();
        let description = "Up to 10% Discount up to INR 2000 on ICICI Bank Cards";
        assert_eq!(p.extract_amount(description), 2000.0);
        assert_eq!(p.extract_percentage(description), None);
    }

    #[test]
    fn bare_percentage_without_cap() {
        let p = parser();
        let description = "Upto 10% off on ICICI Bank Credit Cards";
        assert_eq!(p.extract_amount(description), 0.0);
        assert_eq!(p.extract_percentage(description), Some(10.0));
    }

    #[test]
    fn thousands_separators_are_stripped() {
        assert_eq!(parser().extract_amount("Get ₹2,500 off on your first order"), 2500.0);
    }

    #[test]
    fn cashback_amount_is_extracted() {
        assert_eq!(parser().extract_amount("Earn INR 150 cashback on UPI payments"), 150.0);
    }

    #[test]
    fn no_amount_yields_zero() {
        assert_eq!(parser().extract_amount("Free delivery on your next order"), 0.0);
    }

    #[test]
    fn both_card_families_give_combined_type() {
        let p = parser();
        assert_eq!(
            p.extract_card_type("5% off on SBI credit card and debit card transactions"),
            Some(CardType::CreditOrDebit)
        );
    }

    #[test]
    fn card_abbreviations_match_whole_words_only() {
        let p = parser();
        assert_eq!(p.extract_card_type("Extra savings with your cc today"), Some(CardType::Credit));
        assert_eq!(p.extract_card_type("Pay via dc to get the deal"), Some(CardType::Debit));
        // "accord" and "discount" must not trip the cc/dc patterns.
        assert_eq!(p.extract_card_type("Special discount in accord with terms"), None);
    }

    #[test]
    fn ambiguous_card_mentions_use_context() {
        let p = parser();
        assert_eq!(p.extract_card_type("Exclusive for premium card members"), Some(CardType::Credit));
        assert_eq!(p.extract_card_type("Swipe your atm card at checkout"), Some(CardType::Debit));
        assert_eq!(p.extract_card_type("Valid on all card payments"), None);
    }

    #[test]
    fn bank_alias_resolves_to_canonical_name() {
        let p = parser();
        assert_eq!(
            p.extract_bank("10% off with State Bank cards"),
            Some("SBI".to_string())
        );
        // Overlapping alias text surfaces every bank it names.
        assert_eq!(
            p.extract_bank("10% off with State Bank of India cards"),
            Some("Bank of India, SBI".to_string())
        );
    }

    #[test]
    fn multiple_banks_are_sorted_and_joined() {
        let p = parser();
        assert_eq!(
            p.extract_bank("Joint promotion on SBI and HDFC Bank cards"),
            Some("HDFC, SBI".to_string())
        );
    }

    #[test]
    fn colloquial_variation_is_last_resort() {
        let p = parser();
        assert_eq!(
            p.extract_bank("Special offer for yes cardholders"),
            Some("Yes Bank".to_string())
        );
    }

    #[test]
    fn no_bank_is_not_an_error() {
        assert_eq!(parser().extract_bank("Flat ₹500 off sitewide"), None);
    }

    #[test]
    fn provider_special_cases() {
        let p = parser();
        assert_eq!(p.extract_card_provider("Valid on master card payments"), Some("Mastercard".to_string()));
        assert_eq!(p.extract_card_provider("Extra 3% on RuPay debit cards"), Some("RuPay".to_string()));
        assert_eq!(p.extract_card_provider("Valid on all payment modes"), None);
    }

    #[test]
    fn min_spend_phrasings() {
        let p = parser();
        assert_eq!(p.extract_min_spend("Min spend ₹5,000 to qualify"), Some(5000.0));
        assert_eq!(p.extract_min_spend("Valid on orders above Rs. 2999"), Some(2999.0));
        assert_eq!(p.extract_min_spend("No conditions attached"), None);
    }

    #[test]
    fn validity_is_free_text() {
        let p = parser();
        assert_eq!(
            p.extract_validity("Offer valid till 31st March 2025, T&C apply"),
            Some("31st March 2025".to_string())
        );
        assert_eq!(p.extract_validity("Always on"), None);
    }

    #[test]
    fn title_keywords_outrank_description_keywords() {
        let p = parser();
        // Title says EMI even though the description mentions a bank.
        assert_eq!(
            p.classify("No Cost EMI", "Available on HDFC Bank credit cards"),
            OfferType::NoCostEmi
        );
        assert_eq!(p.classify("Cashback Carnival", "Shop today"), OfferType::Cashback);
        assert_eq!(p.classify("Exchange Offer", "Trade in your old phone"), OfferType::ExchangeOffer);
    }

    #[test]
    fn description_fallback_classification() {
        let p = parser();
        assert_eq!(p.classify("", "10% off with Axis bank cards"), OfferType::BankOffer);
        assert_eq!(p.classify("", "Pay in easy emi installments"), OfferType::NoCostEmi);
        assert_eq!(
            p.classify("", "Free screen guard included"),
            OfferType::Generic("Other Offer".to_string())
        );
        assert_eq!(
            p.classify("Special Deal", "Free screen guard included"),
            OfferType::Generic("Special Deal".to_string())
        );
    }

    #[test]
    fn retailer_fallback_label_is_used() {
        let p = parser_for(Retailer::Croma);
        assert_eq!(
            p.classify("", "Free installation worth a lot"),
            OfferType::Generic("Croma Offer".to_string())
        );
    }

    #[test]
    fn bank_offer_title_is_forced() {
        let offer = parser().parse_offer(&raw("Random Heading", "Extra 5% off on ICICI Bank cards"));
        assert_eq!(offer.title, "Bank Offer");
    }

    #[test]
    fn placeholder_title_becomes_type_label() {
        let offer = parser().parse_offer(&raw("Summary", "Convert to easy emi today"));
        assert_eq!(offer.title, "No Cost EMI");
        let offer = parser().parse_offer(&raw("Festive Deal", "Free gift wrap on request"));
        assert_eq!(offer.title, "Festive Deal");
    }

    #[test]
    fn instant_heuristic() {
        let p = parser();
        assert!(p.parse_offer(&raw("", "Instant discount of ₹100 on SBI cards")).is_instant);
        // Neither keyword present defaults to instant.
        assert!(p.parse_offer(&raw("", "Flat ₹100 off on HDFC cards")).is_instant);
        assert!(!p.parse_offer(&raw("Cashback", "Get ₹100 cashback in 7 days")).is_instant);
        // "instant" wins even when cashback is also mentioned.
        assert!(p.parse_offer(&raw("", "Instant cashback of ₹100 on Axis cards")).is_instant);
    }

    #[test]
    fn empty_record_parses_to_a_valid_offer() {
        let offer = parser().parse_offer(&RawOffer::default());
        assert_eq!(offer.amount, 0.0);
        assert_eq!(offer.offer_type, OfferType::Generic("Other Offer".to_string()));
        assert_eq!(offer.title, "Other Offer");
        assert_eq!(offer.bank, None);
        assert_eq!(offer.min_spend, None);
    }

    #[test]
    fn jiomart_recognizes_digital_identities() {
        let p = parser_for(Retailer::JioMart);
        assert_eq!(
            p.extract_bank("Extra 5% off when paying via phonepe"),
            Some("PhonePe".to_string())
        );
        // The same text finds no bank under the Amazon profile.
        assert_eq!(parser().extract_bank("Extra 5% off when paying via phonepe"), None);
    }
}
