//! Static bank and card-provider registries backing the parser and ranker.
//!
//! All tables are immutable: a registry is built once per retailer at
//! startup and shared read-only behind an `Arc`. Reputation scores are a
//! relative signal only and have no external meaning.

use crate::offer_engine::Retailer;
use std::collections::HashMap;

/// Score assumed for banks the table doesn't know; (70 - 70) / 2 makes the
/// reputation adjustment net out to zero.
pub const DEFAULT_BANK_SCORE: f64 = 70.0;

/// Reputation scores for banks recognized on every retailer.
const BASE_BANK_SCORES: &[(&str, f64)] = &[
    // Public sector banks
    ("SBI", 75.0),
    ("State Bank of India", 75.0),
    ("PNB", 72.0),
    ("Punjab National Bank", 72.0),
    ("BoB", 70.0),
    ("Bank of Baroda", 70.0),
    ("Canara Bank", 68.0),
    ("Union Bank of India", 65.0),
    ("Indian Bank", 65.0),
    ("Bank of India", 65.0),
    ("UCO Bank", 62.0),
    ("Indian Overseas Bank", 62.0),
    ("IOB", 62.0),
    ("Central Bank of India", 62.0),
    ("Bank of Maharashtra", 60.0),
    ("Punjab & Sind Bank", 60.0),
    // Private sector banks
    ("HDFC", 85.0),
    ("HDFC Bank", 85.0),
    ("ICICI", 90.0),
    ("ICICI Bank", 90.0),
    ("Axis", 80.0),
    ("Axis Bank", 80.0),
    ("Kotak", 70.0),
    ("Kotak Mahindra Bank", 70.0),
    ("IndusInd Bank", 68.0),
    ("Yes Bank", 60.0),
    ("IDFC FIRST Bank", 65.0),
    ("IDFC", 65.0),
    ("Federal Bank", 63.0),
    ("South Indian Bank", 60.0),
    ("RBL Bank", 62.0),
    ("DCB Bank", 60.0),
    ("Tamilnad Mercantile Bank", 58.0),
    ("TMB", 58.0),
    ("Karur Vysya Bank", 58.0),
    ("CSB Bank", 58.0),
    ("City Union Bank", 58.0),
    ("Bandhan Bank", 60.0),
    ("Jammu & Kashmir Bank", 58.0),
    // Small finance banks
    ("AU Small Finance Bank", 65.0),
    ("AU Bank", 65.0),
    ("Equitas Small Finance Bank", 62.0),
    ("Equitas", 62.0),
    ("Ujjivan Small Finance Bank", 60.0),
    ("Ujjivan", 60.0),
    ("Suryoday Small Finance Bank", 58.0),
    ("ESAF Small Finance Bank", 58.0),
    ("Fincare Small Finance Bank", 58.0),
    ("Jana Small Finance Bank", 58.0),
    ("North East Small Finance Bank", 58.0),
    ("Capital Small Finance Bank", 58.0),
    ("Unity Small Finance Bank", 58.0),
    ("Shivalik Small Finance Bank", 58.0),
    // Foreign banks
    ("Citi", 80.0),
    ("Citibank", 80.0),
    ("HSBC", 78.0),
    ("Standard Chartered", 75.0),
    ("Deutsche Bank", 75.0),
    ("Barclays Bank", 75.0),
    ("DBS Bank", 72.0),
    ("JP Morgan Chase Bank", 75.0),
    ("Bank of America", 75.0),
    // Co-operative banks
    ("Saraswat Co-operative Bank", 60.0),
    ("Saraswat Bank", 60.0),
    ("Shamrao Vithal Co-operative Bank", 55.0),
    ("PMC Bank", 50.0),
    ("TJSB Sahakari Bank", 55.0),
    // Card companies
    ("Amex", 85.0),
    ("American Express", 85.0),
];

/// Digital payment services and wallets treated as quasi-banks on JioMart.
const DIGITAL_BANK_SCORES: &[(&str, f64)] = &[
    ("Paytm", 75.0),
    ("MobiKwik", 70.0),
    ("Mobikwik", 70.0),
    ("PhonePe", 75.0),
    ("Google Pay", 75.0),
    ("GPay", 75.0),
    ("Amazon Pay", 72.0),
    ("Airtel Money", 65.0),
    ("Jio Money", 65.0),
    ("FreeCharge", 65.0),
    ("PayU", 68.0),
    ("Razorpay", 68.0),
    ("UPI", 78.0),
    ("BHIM UPI", 75.0),
    ("Paytm UPI", 75.0),
    ("Paytm Wallet", 75.0),
    ("MobiKwik Wallet", 70.0),
    ("PhonePe UPI", 75.0),
    ("Google Pay UPI", 75.0),
    ("GPay UPI", 75.0),
    ("Paytm UPI Lite", 73.0),
    ("UPI Lite", 73.0),
    ("Wallet", 65.0),
    ("Digital Wallet", 65.0),
];

/// Known alias spellings per canonical bank name, matched first.
const BANK_ALIASES: &[(&str, &[&str])] = &[
    ("SBI", &["SBI", "State Bank", "State Bank of India"]),
    ("HDFC", &["HDFC", "HDFC Bank"]),
    ("ICICI", &["ICICI", "ICICI Bank"]),
    ("Axis", &["Axis", "Axis Bank"]),
    ("Kotak", &["Kotak", "Kotak Mahindra"]),
    ("Yes Bank", &["Yes Bank", "YES Bank"]),
    ("IDFC", &["IDFC", "IDFC FIRST", "IDFC Bank"]),
    ("IndusInd", &["IndusInd", "IndusInd Bank"]),
    ("Federal", &["Federal", "Federal Bank"]),
    ("RBL", &["RBL", "RBL Bank"]),
    ("Citi", &["Citi", "Citibank", "CitiBank"]),
    ("HSBC", &["HSBC"]),
    ("Standard Chartered", &["Standard Chartered", "StanChart", "SC Bank"]),
    ("AU Bank", &["AU Bank", "AU Small Finance", "AU"]),
    ("Equitas", &["Equitas", "Equitas Bank"]),
    ("Ujjivan", &["Ujjivan", "Ujjivan Bank"]),
    ("PNB", &["PNB", "Punjab National Bank"]),
    ("BoB", &["BoB", "Bank of Baroda", "Baroda"]),
    ("Canara", &["Canara", "Canara Bank"]),
    ("Union Bank", &["Union Bank", "Union Bank of India"]),
    ("Indian Bank", &["Indian Bank"]),
    ("Bank of India", &["Bank of India"]),
    ("UCO Bank", &["UCO", "UCO Bank"]),
    ("IOB", &["IOB", "Indian Overseas Bank"]),
    ("Central Bank", &["Central Bank", "Central Bank of India"]),
    ("Bank of Maharashtra", &["Bank of Maharashtra", "Maharashtra Bank"]),
    ("Amex", &["Amex", "American Express"]),
    ("DBS", &["DBS", "DBS Bank"]),
];

/// Colloquial fragments tried last, when neither aliases nor canonical
/// names matched. Already lowercase.
const BASE_VARIATIONS: &[(&str, &str)] = &[
    ("hdfc", "HDFC"),
    ("icici", "ICICI"),
    ("axis", "Axis"),
    ("sbi", "SBI"),
    ("kotak", "Kotak"),
    ("yes bank", "Yes Bank"),
    ("yes", "Yes Bank"),
    ("idfc", "IDFC"),
    ("indusind", "IndusInd Bank"),
    ("federal", "Federal Bank"),
    ("rbl", "RBL Bank"),
    ("citi", "Citi"),
    ("citibank", "Citi"),
    ("hsbc", "HSBC"),
    ("standard chartered", "Standard Chartered"),
    ("au bank", "AU Bank"),
    ("au", "AU Bank"),
    ("equitas", "Equitas"),
    ("ujjivan", "Ujjivan"),
    ("pnb", "PNB"),
    ("punjab national bank", "PNB"),
    ("bob", "BoB"),
    ("bank of baroda", "BoB"),
    ("baroda", "BoB"),
    ("canara", "Canara Bank"),
    ("canara bank", "Canara Bank"),
    ("union bank", "Union Bank of India"),
    ("indian bank", "Indian Bank"),
    ("bank of india", "Bank of India"),
    ("uco", "UCO Bank"),
    ("uco bank", "UCO Bank"),
    ("iob", "Indian Overseas Bank"),
    ("indian overseas bank", "Indian Overseas Bank"),
    ("central bank", "Central Bank of India"),
    ("amex", "Amex"),
    ("american express", "American Express"),
];

const DIGITAL_VARIATIONS: &[(&str, &str)] = &[
    ("paytm", "Paytm"),
    ("mobikwik", "MobiKwik"),
    ("phonepe", "PhonePe"),
    ("phone pe", "PhonePe"),
    ("google pay", "Google Pay"),
    ("gpay", "Google Pay"),
    ("g pay", "Google Pay"),
    ("amazon pay", "Amazon Pay"),
    ("upi", "UPI"),
    ("paytm upi", "Paytm UPI"),
    ("paytm wallet", "Paytm Wallet"),
    ("mobikwik wallet", "MobiKwik Wallet"),
    ("paytm upi lite", "Paytm UPI Lite"),
    ("upi lite", "UPI Lite"),
    ("bhim upi", "BHIM UPI"),
    ("bhim", "BHIM UPI"),
    ("phonepe upi", "PhonePe UPI"),
    ("google pay upi", "Google Pay UPI"),
    ("gpay upi", "Google Pay UPI"),
    ("airtel money", "Airtel Money"),
    ("jio money", "Jio Money"),
    ("freecharge", "FreeCharge"),
    ("payu", "PayU"),
    ("razorpay", "Razorpay"),
    ("wallet", "Wallet"),
    ("digital wallet", "Digital Wallet"),
];

/// Payment network brands, scanned in order; first hit wins.
pub const CARD_PROVIDERS: &[&str] = &[
    "Visa",
    "Mastercard",
    "RuPay",
    "American Express",
    "Amex",
    "Diners Club",
    "Discover",
    "UnionPay",
    "JCB",
    "Maestro",
    "Cirrus",
    "PLUS",
];

const PROVIDER_BONUSES: &[(&str, f64)] = &[
    ("Visa", 2.0),
    ("Mastercard", 2.0),
    ("RuPay", 3.0),
    ("American Express", 4.0),
    ("Amex", 4.0),
    ("Diners Club", 3.0),
];

const DEFAULT_PROVIDER_BONUS: f64 = 1.0;

/// Immutable lookup tables for bank recognition and reputation.
pub struct BankRegistry {
    scores: HashMap<&'static str, f64>,
    /// (lowercase alias, canonical name), longest alias first so a long
    /// spelling is reported before a fragment it contains.
    aliases: Vec<(String, &'static str)>,
    /// (lowercase canonical name, canonical name), longest first.
    canonicals: Vec<(String, &'static str)>,
    variations: Vec<(&'static str, &'static str)>,
}

impl BankRegistry {
    pub fn for_retailer(retailer: Retailer) -> Self {
        let mut scores: HashMap<&'static str, f64> = BASE_BANK_SCORES.iter().copied().collect();
        let mut variations: Vec<(&'static str, &'static str)> = BASE_VARIATIONS.to_vec();
        if retailer == Retailer::JioMart {
            scores.extend(DIGITAL_BANK_SCORES.iter().copied());
            variations.extend_from_slice(DIGITAL_VARIATIONS);
        }

        let mut aliases: Vec<(String, &'static str)> = BANK_ALIASES
            .iter()
            .flat_map(|(canonical, spellings)| {
                spellings.iter().map(move |alias| (alias.to_lowercase(), *canonical))
            })
            .collect();
        aliases.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        let mut canonicals: Vec<(String, &'static str)> = scores
            .keys()
            .map(|name| (name.to_lowercase(), *name))
            .collect();
        canonicals.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Self {
            scores,
            aliases,
            canonicals,
            variations,
        }
    }

    /// Reputation score for an extracted bank string; unrecognized names
    /// (including comma-joined multi-bank strings) fall back to the
    /// neutral default.
    pub fn score(&self, bank: &str) -> f64 {
        self.scores.get(bank).copied().unwrap_or(DEFAULT_BANK_SCORE)
    }

    pub fn aliases(&self) -> &[(String, &'static str)] {
        &self.aliases
    }

    pub fn canonicals(&self) -> &[(String, &'static str)] {
        &self.canonicals
    }

    pub fn variations(&self) -> &[(&'static str, &'static str)] {
        &self.variations
    }

    pub fn provider_bonus(&self, provider: &str) -> f64 {
        PROVIDER_BONUSES
            .iter()
            .find(|(name, _)| *name == provider)
            .map(|(_, bonus)| *bonus)
            .unwrap_or(DEFAULT_PROVIDER_BONUS)
    }
}
