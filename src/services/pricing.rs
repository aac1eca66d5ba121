use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// GST applied to the base booking price, in percent.
pub const GST_RATE_PERCENT: i64 = 18;

/// Derived price summary shown to the guest and copied into the submitted
/// payload. Never stored; recomputed whenever price, nights or room count
/// change, so it must stay a pure function of its inputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    pub base_price: i64,
    pub gst_amount: i64,
    pub gst_rate: String,
    pub total_price: i64,
}

/// Whole-day difference between two dates. Ordering is the date validator's
/// concern, not this function's, so a reversed range yields its absolute
/// length instead of an error.
#[must_use]
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> u32 {
    let days = (check_out - check_in).num_days();
    u32::try_from(days.unsigned_abs()).unwrap_or(u32::MAX)
}

/// Price for `rooms` rooms over `nights` nights plus 18% GST, in whole
/// rupees. GST is rounded half away from zero. Negative prices contribute
/// nothing: this is a display aid, not a ledger, and must never surface a
/// negative total.
#[must_use]
pub fn pricing_breakdown(price_per_night: i64, nights: u32, rooms: u32) -> PricingBreakdown {
    let base_price = price_per_night.max(0) * i64::from(nights) * i64::from(rooms);
    let gst_amount = (base_price * GST_RATE_PERCENT + 50) / 100;
    PricingBreakdown {
        base_price,
        gst_amount,
        gst_rate: format!("{GST_RATE_PERCENT}%"),
        total_price: base_price + gst_amount,
    }
}

/// Rupee display formatting with Indian digit grouping: the last three
/// digits, then groups of two (`₹12,34,567`).
#[must_use]
pub fn format_price(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::new();
    let len = digits.len();
    for (i, ch) in digits.chars().enumerate() {
        let remaining = len - i;
        if i > 0 && remaining >= 3 && (remaining - 3) % 2 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}\u{20b9}{grouped}")
}
