use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Ratios derived from the extracted fields.
///
/// Declaration order is output order; `DerivedMetrics` relies on the derived
/// `Ord` for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    /// Capital / Total-Liabilities.
    #[serde(rename = "Current-Ratio")]
    CurrentRatio,
    /// Capital / Total-Liabilities, identical to `CurrentRatio`.
    ///
    /// A conventional quick ratio excludes inventory from current assets,
    /// which the extracted fields do not carry. The duplicate is kept for
    /// compatibility with existing consumers of the output.
    #[serde(rename = "Quick-Ratio")]
    QuickRatio,
    /// (Net-Profit / Total-Income) × 100.
    #[serde(rename = "Net-Profit-Margin")]
    NetProfitMargin,
    /// Net-Profit / Total-Assets.
    #[serde(rename = "Return-on-Assets")]
    ReturnOnAssets,
    /// Net-Profit / Capital.
    #[serde(rename = "Return-on-Equity")]
    ReturnOnEquity,
    /// Total-Liabilities / Capital.
    #[serde(rename = "Debt-to-Equity-Ratio")]
    DebtToEquityRatio,
    /// Total-Liabilities / Total-Assets.
    #[serde(rename = "Debt-to-Assets-Ratio")]
    DebtToAssetsRatio,
    /// Total-Income / Total-Assets.
    #[serde(rename = "Total-Asset-Turnover-Ratio")]
    TotalAssetTurnoverRatio,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::CurrentRatio,
        Metric::QuickRatio,
        Metric::NetProfitMargin,
        Metric::ReturnOnAssets,
        Metric::ReturnOnEquity,
        Metric::DebtToEquityRatio,
        Metric::DebtToAssetsRatio,
        Metric::TotalAssetTurnoverRatio,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::CurrentRatio => "Current-Ratio",
            Metric::QuickRatio => "Quick-Ratio",
            Metric::NetProfitMargin => "Net-Profit-Margin",
            Metric::ReturnOnAssets => "Return-on-Assets",
            Metric::ReturnOnEquity => "Return-on-Equity",
            Metric::DebtToEquityRatio => "Debt-to-Equity-Ratio",
            Metric::DebtToAssetsRatio => "Debt-to-Assets-Ratio",
            Metric::TotalAssetTurnoverRatio => "Total-Asset-Turnover-Ratio",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|metric| metric.as_str() == name)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed metrics. A metric that could not be computed has no entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DerivedMetrics(BTreeMap<Metric, f64>);

impl DerivedMetrics {
    pub fn insert(&mut self, metric: Metric, value: f64) {
        self.0.insert(metric, value);
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.0.get(&metric).copied()
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.0.contains_key(&metric)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Present metrics, in metric order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> {
        self.0.iter().map(|(metric, value)| (*metric, *value))
    }
}
