use rand::Rng;
use serde::Serialize;

use crate::stock_api::PredictionResult;

/// Most predictions drawn on the price chart.
pub const MAX_PREDICTION_POINTS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChart {
    pub title: String,
    pub historical: Vec<(String, f64)>,
    pub predicted: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeBar {
    pub date: String,
    pub volume: u64,
    pub up: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeChart {
    pub title: String,
    pub bars: Vec<VolumeBar>,
}

/// Historical line over every date, with the predictions overlaid on the most
/// recent dates.
pub fn build_price_chart(result: &PredictionResult) -> PriceChart {
    let historical = result
        .dates
        .iter()
        .cloned()
        .zip(result.historical_prices.iter().copied())
        .collect();

    let n = MAX_PREDICTION_POINTS
        .min(result.predictions.len())
        .min(result.dates.len());
    let date_tail = &result.dates[result.dates.len() - n..];
    let pred_tail = &result.predictions[result.predictions.len() - n..];
    let predicted = date_tail
        .iter()
        .cloned()
        .zip(pred_tail.iter().copied())
        .collect();

    PriceChart {
        title: format!("{} Stock Price Analysis", result.ticker),
        historical,
        predicted,
    }
}

/// The service sends no volume, so bars are synthesized from the price with
/// random scatter. A bar is "up" when the close rose from the previous one.
pub fn build_volume_chart<R: Rng + ?Sized>(result: &PredictionResult, rng: &mut R) -> VolumeChart {
    let mut prev = 0.0;
    let bars = result
        .dates
        .iter()
        .zip(result.historical_prices.iter())
        .map(|(date, &price)| {
            let scale = 1000.0 + rng.gen::<f64>() * 500.0;
            let bar = VolumeBar {
                date: date.clone(),
                volume: (price * scale).max(0.0).floor() as u64,
                up: price > prev,
            };
            prev = price;
            bar
        })
        .collect();

    VolumeChart {
        title: format!("{} Trading Volume", result.ticker),
        bars,
    }
}
