use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::debug;

use super::normalizer::model_accuracy;
use super::recommendation::{evaluate_signals, IndicatorSnapshot, RecommendationOutcome};
use super::risk::{assess_risk, RiskAssessment};
use super::technical_indicators::{
    mean, moving_average, percent_change, price_range, rsi, volatility, volume_trend,
    DEFAULT_RSI_PERIOD,
};
use super::types::{CompanyProfile, DerivedMetrics, PredictionResult, Recommendation};
use crate::config::ProfileBook;
use crate::error::{AppError, Result};

/// Relative weights the prediction model assigns to its input features.
pub const MODEL_FEATURE_WEIGHTS: [(&str, f64); 5] = [
    ("Close Price", 35.0),
    ("MA7", 25.0),
    ("MA21", 20.0),
    ("RSI", 12.0),
    ("MACD", 8.0),
];

const PREDICTION_BAND_PCT: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action")]
pub enum ActionPlan {
    Buy {
        entry_low: f64,
        entry_high: f64,
        target: f64,
        stop_loss: f64,
        risk_reward: f64,
        time_frame: String,
        position_size: String,
    },
    Sell {
        exit_price: f64,
        strategy: String,
        fallback_stop: f64,
    },
    Hold {
        buy_alert_below: f64,
        sell_alert_above: f64,
        reevaluate: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelExplainer {
    pub days_analyzed: usize,
    pub feature_weights: Vec<(String, f64)>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub ticker: String,
    pub profile: CompanyProfile,
    pub metrics: DerivedMetrics,
    pub outcome: RecommendationOutcome,
    pub risk: RiskAssessment,
    pub action_plan: ActionPlan,
    /// `(low, high)` band around the predicted price.
    pub prediction_band: (f64, f64),
    pub history_len: usize,
    pub rmse: String,
    pub explainer: ModelExplainer,
    pub generated_at: DateTime<Local>,
}

pub fn analyze(result: &PredictionResult, profiles: &ProfileBook) -> Result<AnalysisReport> {
    let prices = &result.historical_prices;

    let (Some(current_price), Some(predicted_price)) =
        (result.current_price(), result.predicted_price())
    else {
        return Err(AppError::Processing(format!(
            "{} returned {} historical prices and {} predictions",
            result.ticker,
            prices.len(),
            result.predictions.len()
        )));
    };
    if current_price <= 0.0 || !current_price.is_finite() {
        return Err(AppError::Processing(format!(
            "current price {} is not a positive number",
            current_price
        )));
    }

    let first_price = prices[0];
    let average_price = mean(prices).unwrap_or(current_price);
    let (min_price, max_price) = price_range(prices).unwrap_or((current_price, current_price));
    let ma7 = moving_average(prices, 7).unwrap_or(current_price);
    let ma21 = moving_average(prices, 21).unwrap_or(current_price);
    let rsi_value = rsi(prices, DEFAULT_RSI_PERIOD);
    let volatility_value = volatility(prices)
        .ok_or_else(|| AppError::Processing("average price is zero".to_string()))?;
    let volume_trend_value = volume_trend(prices);
    let prediction_change = percent_change(current_price, predicted_price);
    let period_change = percent_change(first_price, current_price);

    let snapshot = IndicatorSnapshot {
        rsi: rsi_value,
        ma7,
        ma21,
        current_price,
        min_price,
        max_price,
        prediction_change,
        volume_trend: volume_trend_value,
    };
    let outcome = evaluate_signals(&snapshot);

    debug!(
        "{}: {} buy / {} sell signals -> {}",
        result.ticker,
        outcome.buy_signals.len(),
        outcome.sell_signals.len(),
        outcome.recommendation
    );

    let metrics = DerivedMetrics {
        accuracy: model_accuracy(result.metrics.rmse_value, prices),
        trend: result.metrics.trend,
        ma7,
        ma21,
        rsi: rsi_value,
        volatility: volatility_value,
        volume_trend: volume_trend_value,
        recommendation: outcome.recommendation,
        confidence: outcome.confidence,
        current_price,
        predicted_price,
        prediction_change,
        period_change,
        average_price,
        min_price,
        max_price,
    };

    let risk = assess_risk(volatility_value, current_price, min_price, max_price);
    let action_plan = plan_action(&metrics, &risk);

    let band = PREDICTION_BAND_PCT / 100.0;
    let days_analyzed = result.historical_data.len();

    Ok(AnalysisReport {
        ticker: result.ticker.clone(),
        profile: profiles.profile(&result.ticker),
        metrics,
        outcome,
        risk,
        action_plan,
        prediction_band: (predicted_price * (1.0 - band), predicted_price * (1.0 + band)),
        history_len: prices.len(),
        rmse: result.metrics.rmse.clone(),
        explainer: ModelExplainer {
            days_analyzed,
            feature_weights: MODEL_FEATURE_WEIGHTS
                .iter()
                .map(|(name, weight)| (name.to_string(), *weight))
                .collect(),
            summary: format!(
                "GRU model analyzed {} trading days to predict {} price movement",
                days_analyzed, result.ticker
            ),
        },
        generated_at: Local::now(),
    })
}

fn plan_action(m: &DerivedMetrics, risk: &RiskAssessment) -> ActionPlan {
    let price = m.current_price;
    let change = m.prediction_change.abs();

    match m.recommendation {
        Recommendation::Buy => ActionPlan::Buy {
            entry_low: price * 0.99,
            entry_high: price,
            target: m.predicted_price,
            stop_loss: price * 0.95,
            risk_reward: change / 5.0,
            time_frame: if change > 5.0 {
                "1-2 weeks (short-term)".to_string()
            } else {
                "2-4 weeks (medium-term)".to_string()
            },
            position_size: risk.profile.position_size.to_string(),
        },
        Recommendation::Sell => ActionPlan::Sell {
            exit_price: price,
            strategy: if change > 5.0 {
                "Sell immediately".to_string()
            } else {
                "Sell on next bounce to MA7".to_string()
            },
            fallback_stop: price * 0.92,
        },
        Recommendation::Hold => ActionPlan::Hold {
            buy_alert_below: price * 0.97,
            sell_alert_above: price * 1.03,
            reevaluate: "In 2-3 trading days".to_string(),
        },
    }
}
