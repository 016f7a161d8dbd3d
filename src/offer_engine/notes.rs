//! Human-readable note assembly for ranked offers.
//!
//! Presentation glue only: each offer type gets a multi-sentence summary
//! built from conditionally included clauses, with separate wording for
//! the applicable and not-applicable cases.

use crate::offer_engine::{Offer, OfferType};

pub fn generate_note(
    offer: &Offer,
    product_price: f64,
    is_applicable: bool,
    net_effective_price: f64,
) -> String {
    match &offer.offer_type {
        OfferType::BankOffer => bank_note(offer, product_price, is_applicable, net_effective_price),
        OfferType::NoCostEmi => emi_note(offer, product_price, is_applicable),
        OfferType::Cashback => cashback_note(offer, product_price, is_applicable),
        OfferType::PartnerOffers => partner_note(offer, is_applicable),
        _ => generic_note(offer, is_applicable),
    }
}

/// The discount phrased on whichever basis the offer carries.
fn benefit_phrase(offer: &Offer) -> String {
    match offer.percentage {
        Some(pct) if pct > 0.0 => format!("{}%", pct),
        _ => format!("₹{}", inr(offer.amount)),
    }
}

fn payment_phrase(offer: &Offer) -> Option<String> {
    match (&offer.bank, offer.card_type) {
        (Some(bank), Some(ct)) => {
            Some(format!("using your {} {} card", bank, ct.label().to_lowercase()))
        }
        (Some(bank), None) => Some(format!("using your {} card", bank)),
        (None, Some(ct)) => Some(format!("using your {} card", ct.label().to_lowercase())),
        (None, None) => None,
    }
}

fn bank_note(offer: &Offer, price: f64, is_applicable: bool, net_price: f64) -> String {
    let mut parts: Vec<String> = Vec::new();

    if is_applicable {
        let savings = price - net_price;
        let savings_pct = if price > 0.0 { savings / price * 100.0 } else { 0.0 };

        if savings > 0.0 {
            parts.push(format!(
                "🎉 Excellent savings! You'll save ₹{} ({:.1}%) with this offer.",
                inr(savings),
                savings_pct
            ));
        } else {
            parts.push("💡 Great offer available for your purchase!".to_string());
        }

        match payment_phrase(offer) {
            Some(payment) => parts.push(format!(
                "Simply pay {} to get {} instant discount.",
                payment,
                benefit_phrase(offer)
            )),
            None => parts.push(format!(
                "You'll get {} instant discount on your purchase.",
                benefit_phrase(offer)
            )),
        }

        match offer.min_spend {
            Some(min_spend) => parts.push(format!(
                "✅ This product (₹{}) meets the minimum spend requirement of ₹{}.",
                inr(price),
                inr(min_spend)
            )),
            None => parts.push(
                "✅ No minimum purchase requirement - the discount applies immediately!"
                    .to_string(),
            ),
        }

        parts.push(format!(
            "Your final price will be ₹{} instead of ₹{}.",
            inr(net_price),
            inr(price)
        ));

        if let Some(provider) = &offer.card_provider {
            parts.push(format!("Works with {} cards.", provider));
        }
    } else {
        let min_spend = offer.min_spend.unwrap_or(0.0);
        let shortfall = min_spend - price;

        parts.push("⚠️ Unfortunately, this offer isn't applicable for this product.".to_string());
        parts.push(format!(
            "The offer requires a minimum purchase of ₹{}, but this product costs ₹{}.",
            inr(min_spend),
            inr(price)
        ));
        parts.push(format!(
            "You would need to add ₹{} more to your cart to use this offer.",
            inr(shortfall)
        ));

        match (&offer.bank, offer.card_type) {
            (Some(bank), Some(ct)) => parts.push(format!(
                "However, if you reach the minimum spend using your {} {} card, you could save {}!",
                bank,
                ct.label().to_lowercase(),
                benefit_phrase(offer)
            )),
            (Some(bank), None) => parts.push(format!(
                "But if you meet the minimum spend with your {} card, you could save {}!",
                bank,
                benefit_phrase(offer)
            )),
            _ => parts.push(format!(
                "If you meet the minimum spend, you could save {}!",
                benefit_phrase(offer)
            )),
        }
    }

    if let Some(validity) = &offer.validity {
        parts.push(format!("⏰ Offer valid {}.", validity));
    }

    parts.join(" ")
}

fn emi_note(offer: &Offer, price: f64, is_applicable: bool) -> String {
    let mut parts: Vec<String> = Vec::new();
    parts.push(
        "💳 Convert your purchase into easy EMIs without any additional interest charges!"
            .to_string(),
    );

    if offer.amount > 0.0 {
        parts.push(format!(
            "You can save up to ₹{} on interest that you would normally pay.",
            inr(offer.amount)
        ));
    }

    match offer.min_spend {
        Some(min_spend) if !is_applicable => parts.push(format!(
            "⚠️ This EMI option requires a minimum purchase of ₹{}, but this product costs ₹{}.",
            inr(min_spend),
            inr(price)
        )),
        Some(min_spend) => parts.push(format!(
            "✅ This product meets the minimum requirement of ₹{} for no-cost EMI.",
            inr(min_spend)
        )),
        None => parts.push(
            "✅ Available for this purchase with no minimum spend requirement.".to_string(),
        ),
    }

    if let Some(bank) = &offer.bank {
        parts.push(format!("Available with {} cards.", bank));
    }
    if let Some(validity) = &offer.validity {
        parts.push(format!("⏰ Offer valid {}.", validity));
    }

    parts.join(" ")
}

fn cashback_note(offer: &Offer, price: f64, is_applicable: bool) -> String {
    let mut parts: Vec<String> = Vec::new();

    if is_applicable {
        parts.push(format!("💰 Earn ₹{} cashback on your purchase!", inr(offer.amount)));
        parts.push("The cashback will be credited to your account after the purchase.".to_string());
        match offer.min_spend {
            Some(min_spend) => parts.push(format!(
                "✅ This product (₹{}) meets the minimum spend requirement of ₹{}.",
                inr(price),
                inr(min_spend)
            )),
            None => parts.push("✅ No minimum purchase requirement.".to_string()),
        }
    } else {
        let min_spend = offer.min_spend.unwrap_or(0.0);
        parts.push(format!(
            "⚠️ This cashback offer requires a minimum purchase of ₹{}.",
            inr(min_spend)
        ));
        parts.push(format!(
            "This product costs ₹{}, so you'll need to add ₹{} more to qualify.",
            inr(price),
            inr(min_spend - price)
        ));
    }

    if let Some(bank) = &offer.bank {
        parts.push(format!("Available with {} cards.", bank));
    }
    if let Some(validity) = &offer.validity {
        parts.push(format!("⏰ Offer valid {}.", validity));
    }

    parts.join(" ")
}

fn partner_note(offer: &Offer, is_applicable: bool) -> String {
    let mut parts: Vec<String> = Vec::new();
    parts.push(format!(
        "🤝 Special partner offer providing ₹{} value!",
        inr(offer.amount)
    ));

    if is_applicable {
        parts.push("✅ This offer is applicable for your purchase.".to_string());
        if let Some(min_spend) = offer.min_spend {
            parts.push(format!(
                "This product meets the minimum requirement of ₹{}.",
                inr(min_spend)
            ));
        }
    } else if let Some(min_spend) = offer.min_spend {
        parts.push(format!(
            "⚠️ Requires minimum purchase of ₹{} to qualify.",
            inr(min_spend)
        ));
    }

    if let Some(validity) = &offer.validity {
        parts.push(format!("⏰ Offer valid {}.", validity));
    }

    parts.join(" ")
}

fn generic_note(offer: &Offer, is_applicable: bool) -> String {
    let mut parts: Vec<String> = Vec::new();
    let type_label = offer.offer_type.label().to_lowercase();

    if offer.amount > 0.0 {
        parts.push(format!("💫 This {} offers ₹{} value.", type_label, inr(offer.amount)));
    } else {
        parts.push(format!("💫 Special {} available for your purchase.", type_label));
    }

    match offer.min_spend {
        Some(min_spend) if !is_applicable => parts.push(format!(
            "⚠️ Requires minimum purchase of ₹{}.",
            inr(min_spend)
        )),
        Some(min_spend) => parts.push(format!(
            "✅ This product meets the minimum requirement of ₹{}.",
            inr(min_spend)
        )),
        None => {}
    }

    if let Some(validity) = &offer.validity {
        parts.push(format!("⏰ Offer valid {}.", validity));
    }

    parts.join(" ")
}

/// Whole-rupee figure with thousands separators, e.g. 30999 -> "30,999".
fn inr(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
