use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HistoricalRow {
    pub date: String,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
}

impl HistoricalRow {
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Bullish => "Bullish",
            Trend::Bearish => "Bearish",
            Trend::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

/// Model error figures as displayed: four decimals for the error terms,
/// two for accuracy.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ModelMetrics {
    pub mse: String,
    pub rmse: String,
    pub mae: String,
    pub accuracy: String,
    pub trend: Trend,
    /// Unformatted RMSE, kept for recomputing accuracy at full precision.
    #[serde(skip)]
    pub rmse_value: f64,
}

impl Default for ModelMetrics {
    fn default() -> Self {
        Self {
            mse: "0.0000".to_string(),
            rmse: "0.0000".to_string(),
            mae: "0.0000".to_string(),
            accuracy: "0.00".to_string(),
            trend: Trend::Neutral,
            rmse_value: 0.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionResult {
    pub ticker: String,
    pub dates: Vec<String>,
    pub historical_prices: Vec<f64>,
    pub predictions: Vec<f64>,
    pub historical_data: Vec<HistoricalRow>,
    pub metrics: ModelMetrics,
}

impl PredictionResult {
    pub fn current_price(&self) -> Option<f64> {
        self.historical_prices.last().copied()
    }

    pub fn predicted_price(&self) -> Option<f64> {
        self.predictions.last().copied()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Recommendation::Buy => "BUY",
            Recommendation::Sell => "SELL",
            Recommendation::Hold => "HOLD",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Moderate,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => f.write_str("High"),
            Confidence::Moderate => f.write_str("Moderate"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    High,
    Moderate,
    Low,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::High => "HIGH",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::Low => "LOW",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub accuracy: f64,
    pub trend: Trend,
    pub ma7: f64,
    pub ma21: f64,
    pub rsi: f64,
    pub volatility: f64,
    pub volume_trend: f64,
    pub recommendation: Recommendation,
    pub confidence: Confidence,
    pub current_price: f64,
    pub predicted_price: f64,
    /// Percent move from the last close to the last prediction.
    pub prediction_change: f64,
    /// Percent move from the first to the last close.
    pub period_change: f64,
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CompanyProfile {
    pub name: String,
    pub sector: String,
    pub focus: String,
}
