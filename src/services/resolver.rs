use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Discount, PricingConfig};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub base_price: i64,
    pub effective_price: i64,
    pub applied_discount: Option<Discount>,
}

impl PriceQuote {
    pub fn applied_percent(&self) -> Option<u8> {
        self.applied_discount.as_ref().map(|d| d.percent)
    }
}

/// Prices one slot on one day. Of all discounts that apply, the highest
/// percent wins; on a tie the earliest in `discounts` wins.
pub fn resolve_price(
    date: NaiveDate,
    slot_label: &str,
    config: &PricingConfig,
    discounts: &[Discount],
) -> PriceQuote {
    let base_price = config.base_price(date, slot_label);

    let best = discounts
        .iter()
        .filter(|d| d.applies(date, slot_label))
        .fold(None::<&Discount>, |best, d| match best {
            Some(b) if b.percent >= d.percent => Some(b),
            _ => Some(d),
        });

    let effective_price = match best {
        Some(d) => apply_percent(base_price, d.percent),
        None => base_price,
    };

    PriceQuote {
        base_price,
        effective_price,
        applied_discount: best.cloned(),
    }
}

/// `price * (1 - percent/100)` rounded half up to a whole currency unit.
/// Computed in `i128`, so any stored price is safe.
pub fn apply_percent(price: i64, percent: u8) -> i64 {
    let kept = 100 - i128::from(percent.min(100));
    let discounted = (i128::from(price) * kept + 50).div_euclid(100);
    i64::try_from(discounted).unwrap_or(if discounted < 0 { i64::MIN } else { i64::MAX })
}
