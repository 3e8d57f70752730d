use finscan_core::models::fields::{CanonicalField, ExtractedFields, FieldValue};
use finscan_core::models::metrics::{DerivedMetrics, Metric};

/// Coerce a field value to a number.
///
/// Thousands separators are removed before parsing. A list yields its first
/// parseable entry. Absent, empty, unparseable and non-finite values are
/// unavailable.
pub fn safe_convert(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Absent => None,
        FieldValue::Single(text) => parse_amount(text),
        FieldValue::Multiple(texts) => texts.iter().find_map(|text| parse_amount(text)),
    }
}

fn parse_amount(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `numerator / denominator` when both are available and the denominator
/// is non-zero.
fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (numerator, denominator) = (numerator?, denominator?);
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator).filter(|v| v.is_finite())
}

/// Compute every ratio whose inputs are available.
pub fn calculate_metrics(fields: &ExtractedFields) -> DerivedMetrics {
    let value = |field: CanonicalField| safe_convert(fields.get(field));

    let capital = value(CanonicalField::Capital);
    let net_profit = value(CanonicalField::NetProfit);
    let total_assets = value(CanonicalField::TotalAssets);
    let total_income = value(CanonicalField::TotalIncome);
    let total_liabilities = value(CanonicalField::TotalLiabilities);

    let candidates = [
        (Metric::CurrentRatio, ratio(capital, total_liabilities)),
        (Metric::QuickRatio, ratio(capital, total_liabilities)),
        (
            Metric::NetProfitMargin,
            ratio(net_profit, total_income)
                .map(|r| r * 100.0)
                .filter(|v| v.is_finite()),
        ),
        (Metric::ReturnOnAssets, ratio(net_profit, total_assets)),
        (Metric::ReturnOnEquity, ratio(net_profit, capital)),
        (Metric::DebtToEquityRatio, ratio(total_liabilities, capital)),
        (Metric::DebtToAssetsRatio, ratio(total_liabilities, total_assets)),
        (
            Metric::TotalAssetTurnoverRatio,
            ratio(total_income, total_assets),
        ),
    ];

    let mut metrics = DerivedMetrics::default();
    for (metric, computed) in candidates {
        if let Some(v) = computed {
            metrics.insert(metric, v);
        }
    }
    metrics
}
