use serde_json::Value;
use tracing::{debug, warn};

use super::technical_indicators::mean;
use super::types::{HistoricalRow, ModelMetrics, PredictionResult, Trend};

/// Stand-in average price when no history was returned.
pub const BASELINE_AVG_PRICE: f64 = 100.0;

/// Turns whatever the prediction service sent into a fully populated
/// `PredictionResult`. Missing or mistyped fields fall back to defaults.
pub fn normalize_response(json: &Value, requested_ticker: &str) -> PredictionResult {
    let ticker = json["ticker"]
        .as_str()
        .filter(|t| !t.is_empty())
        .unwrap_or(requested_ticker)
        .to_string();

    let (dates, historical_prices) = dated_prices(&json["dates"], &json["historical_prices"]);
    let predictions = number_array(&json["predictions"], "predictions");

    let historical_data: Vec<HistoricalRow> = json["historical_data"]
        .as_array()
        .map(|rows| rows.iter().filter_map(parse_row).collect())
        .unwrap_or_default();

    if dates.len() != historical_prices.len() {
        warn!(
            "{}: {} dates but {} historical prices",
            ticker,
            dates.len(),
            historical_prices.len()
        );
    }

    let metrics_json = &json["metrics"];
    let rmse = metrics_json["rmse"].as_f64().unwrap_or(0.0);

    let metrics = ModelMetrics {
        mse: format_metric(&metrics_json["mse"]),
        rmse: format_metric(&metrics_json["rmse"]),
        mae: format_metric(&metrics_json["mae"]),
        accuracy: format!("{:.2}", model_accuracy(rmse, &historical_prices)),
        trend: prediction_trend(&historical_prices, &predictions),
        rmse_value: rmse,
    };

    debug!(
        "normalized {}: {} prices, {} predictions, {} rows, accuracy {}%",
        ticker,
        historical_prices.len(),
        predictions.len(),
        historical_data.len(),
        metrics.accuracy
    );

    PredictionResult {
        ticker,
        dates,
        historical_prices,
        predictions,
        historical_data,
        metrics,
    }
}

/// `100 - rmse / avg_price * 100`, clamped into `[0, 100]`.
pub fn model_accuracy(rmse: f64, historical_prices: &[f64]) -> f64 {
    let avg_price = mean(historical_prices).unwrap_or(BASELINE_AVG_PRICE);
    let error_percent = rmse / avg_price * 100.0;
    let accuracy = 100.0 - error_percent;
    if accuracy.is_nan() {
        return 0.0;
    }
    accuracy.clamp(0.0, 100.0)
}

pub fn prediction_trend(historical_prices: &[f64], predictions: &[f64]) -> Trend {
    match (mean(historical_prices), mean(predictions)) {
        (Some(hist), Some(pred)) if pred >= hist => Trend::Bullish,
        (Some(_), Some(_)) => Trend::Bearish,
        _ => Trend::Neutral,
    }
}

fn format_metric(value: &Value) -> String {
    match value.as_f64() {
        Some(v) => format!("{:.4}", v),
        None => "0.0000".to_string(),
    }
}

fn date_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Pairs `dates[i]` with `historical_prices[i]`. A pair where either side is
/// unusable is dropped whole so later dates keep their prices. Entries past
/// the end of the shorter array are kept as they are.
fn dated_prices(dates: &Value, prices: &Value) -> (Vec<String>, Vec<f64>) {
    let empty = Vec::new();
    let raw_dates = dates.as_array().unwrap_or(&empty);
    let raw_prices = prices.as_array().unwrap_or_else(|| {
        if !prices.is_null() {
            warn!("historical_prices is not an array, using empty series");
        }
        &empty
    });
    let paired = raw_dates.len().min(raw_prices.len());

    let mut out_dates = Vec::with_capacity(raw_dates.len());
    let mut out_prices = Vec::with_capacity(raw_prices.len());
    let mut dropped = 0;

    for (date, price) in raw_dates.iter().zip(raw_prices) {
        match (date_label(date), price.as_f64()) {
            (Some(d), Some(p)) => {
                out_dates.push(d);
                out_prices.push(p);
            }
            _ => dropped += 1,
        }
    }
    out_dates.extend(raw_dates[paired..].iter().filter_map(date_label));
    let tail_prices = &raw_prices[paired..];
    out_prices.extend(tail_prices.iter().filter_map(Value::as_f64));

    let skipped = tail_prices.iter().filter(|p| p.as_f64().is_none()).count();
    if dropped > 0 || skipped > 0 {
        warn!(
            "dropped {} unusable date/price pairs and {} non-numeric prices",
            dropped, skipped
        );
    }
    (out_dates, out_prices)
}

fn number_array(value: &Value, field: &str) -> Vec<f64> {
    let Some(arr) = value.as_array() else {
        if !value.is_null() {
            warn!("{} is not an array, using empty series", field);
        }
        return Vec::new();
    };

    let numbers: Vec<f64> = arr.iter().filter_map(Value::as_f64).collect();
    if numbers.len() != arr.len() {
        warn!("{}: skipped {} non-numeric entries", field, arr.len() - numbers.len());
    }
    numbers
}

fn parse_row(row: &Value) -> Option<HistoricalRow> {
    let obj = row.as_object()?;
    let price = |key: &str| obj.get(key).and_then(Value::as_f64).unwrap_or(0.0);
    Some(HistoricalRow {
        date: obj
            .get("date")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        open: price("Open"),
        close: price("Close"),
        high: price("High"),
        low: price("Low"),
    })
}
