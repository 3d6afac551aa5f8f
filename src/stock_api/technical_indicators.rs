pub const DEFAULT_RSI_PERIOD: usize = 14;

const VOLUME_WINDOW: usize = 10;
const LOSS_FLOOR: f64 = 0.01;

pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Mean of the last `min(period, len)` values.
pub fn moving_average(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 {
        return None;
    }
    let start = data.len().saturating_sub(period);
    mean(&data[start..])
}

/// Population standard deviation as a percentage of the mean.
pub fn volatility(data: &[f64]) -> Option<f64> {
    let first = *data.first()?;
    if data.iter().all(|&x| x == first) {
        return Some(0.0);
    }

    let avg = mean(data)?;
    if avg == 0.0 {
        return None;
    }

    let variance = data.iter().map(|p| (p - avg).powi(2)).sum::<f64>() / data.len() as f64;
    Some(variance.sqrt() / avg.abs() * 100.0)
}

/// Simple-average RSI over the last `period` deltas. Neutral 50 until
/// `period + 1` points are available.
pub fn rsi(data: &[f64], period: usize) -> f64 {
    if period == 0 || data.len() < period + 1 {
        return 50.0;
    }

    let deltas: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();
    let recent = &deltas[deltas.len() - period..];

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    let mut gains = 0usize;
    let mut losses = 0usize;
    for &change in recent {
        if change > 0.0 {
            gain_sum += change;
            gains += 1;
        } else if change < 0.0 {
            loss_sum += -change;
            losses += 1;
        }
    }

    let avg_gain = if gains > 0 { gain_sum / period as f64 } else { LOSS_FLOOR };
    let avg_loss = if losses > 0 { loss_sum / period as f64 } else { LOSS_FLOOR };

    let rs = avg_gain / avg_loss;
    (100.0 - (100.0 / (1.0 + rs))).clamp(0.0, 100.0)
}

/// Percent change between the mean of the last ten points and the ten before.
/// Closing prices stand in for volume since the endpoint does not send it.
pub fn volume_trend(data: &[f64]) -> f64 {
    if data.len() < VOLUME_WINDOW * 2 {
        return 0.0;
    }

    let n = data.len();
    let recent = &data[n - VOLUME_WINDOW..];
    let older = &data[n - VOLUME_WINDOW * 2..n - VOLUME_WINDOW];

    let recent_avg = recent.iter().sum::<f64>() / VOLUME_WINDOW as f64;
    let older_avg = older.iter().sum::<f64>() / VOLUME_WINDOW as f64;

    if older_avg == 0.0 {
        return 0.0;
    }
    (recent_avg - older_avg) / older_avg * 100.0
}

/// `(min, max)` of the series.
pub fn price_range(data: &[f64]) -> Option<(f64, f64)> {
    if data.is_empty() {
        return None;
    }
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

/// Percent change from `from` to `to`; 0 when `from` is not positive.
pub fn percent_change(from: f64, to: f64) -> f64 {
    if from > 0.0 {
        (to - from) / from * 100.0
    } else {
        0.0
    }
}
