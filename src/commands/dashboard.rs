use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, info};

use crate::config::ProfileBook;
use crate::error::{AppError, Result};
use crate::render::{build_price_chart, build_volume_chart, Notice, RenderTarget};
use crate::stock_api::{analyze, normalize_response, AnalysisReport, PredictionSource};

/// Holds the target in its busy state; interaction comes back on drop,
/// whichever way the request ended.
pub struct BusyGuard<'a, R: RenderTarget + ?Sized> {
    target: &'a mut R,
}

impl<'a, R: RenderTarget + ?Sized> BusyGuard<'a, R> {
    pub fn new(target: &'a mut R) -> Self {
        target.set_busy(true);
        Self { target }
    }
}

impl<R: RenderTarget + ?Sized> Deref for BusyGuard<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        &*self.target
    }
}

impl<R: RenderTarget + ?Sized> DerefMut for BusyGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut *self.target
    }
}

impl<R: RenderTarget + ?Sized> Drop for BusyGuard<'_, R> {
    fn drop(&mut self) {
        self.target.set_busy(false);
    }
}

/// Upper-cases and checks a ticker against the known list.
pub fn validate_ticker(raw: &str, profiles: &ProfileBook) -> Result<String> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(AppError::Validation("Please enter a stock ticker".to_string()));
    }
    if !profiles.is_known(&ticker) {
        return Err(AppError::Validation("Invalid stock ticker".to_string()));
    }
    Ok(ticker)
}

/// Normalizes a raw reply, runs the analysis and pushes everything to `target`.
pub fn present_prediction<R: RenderTarget + ?Sized>(
    json: &Value,
    ticker: &str,
    profiles: &ProfileBook,
    volume_seed: Option<u64>,
    target: &mut R,
) -> Result<AnalysisReport> {
    let result = normalize_response(json, ticker);
    let report = analyze(&result, profiles)?;

    let mut rng = match volume_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    target.show_overview(&result)?;
    target.show_history_table(&result.historical_data)?;
    target.show_price_chart(&build_price_chart(&result))?;
    target.show_volume_chart(&build_volume_chart(&result, &mut rng))?;
    target.show_report(&report)?;

    Ok(report)
}

pub struct Dashboard<S: PredictionSource> {
    source: S,
    profiles: ProfileBook,
    generation: AtomicU64,
    volume_seed: Option<u64>,
}

impl<S: PredictionSource> Dashboard<S> {
    pub fn new(source: S, profiles: ProfileBook) -> Self {
        Self {
            source,
            profiles,
            generation: AtomicU64::new(0),
            volume_seed: None,
        }
    }

    /// Fixes the scatter of the synthetic volume bars.
    pub fn with_volume_seed(mut self, seed: u64) -> Self {
        self.volume_seed = Some(seed);
        self
    }

    pub fn profiles(&self) -> &ProfileBook {
        &self.profiles
    }

    /// Invalidates any request still in flight.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Runs one prediction end to end. Every failure is reported through
    /// `target` as well as returned. `Ok(None)` means the response arrived
    /// after a `reset` and was dropped.
    pub async fn predict<R: RenderTarget + ?Sized>(
        &self,
        raw_ticker: &str,
        target: &mut R,
    ) -> Result<Option<AnalysisReport>> {
        let ticker = match validate_ticker(raw_ticker, &self.profiles) {
            Ok(t) => t,
            Err(e) => {
                report_failure(target, &e);
                return Err(e);
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut busy = BusyGuard::new(target);

        let json = match self.source.fetch_prediction(&ticker).await {
            Ok(json) => json,
            Err(e) => {
                report_failure(&mut *busy, &e);
                return Err(e);
            }
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("dropping stale response for {} (generation {})", ticker, generation);
            return Ok(None);
        }

        match present_prediction(&json, &ticker, &self.profiles, self.volume_seed, &mut *busy) {
            Ok(report) => {
                info!(
                    "{}: {} ({} confidence)",
                    ticker, report.metrics.recommendation, report.metrics.confidence
                );
                show_notice(
                    &mut *busy,
                    &Notice::success(format!("Successfully analyzed {} with GRU model", ticker)),
                );
                Ok(Some(report))
            }
            Err(e) => {
                report_failure(&mut *busy, &e);
                Err(e)
            }
        }
    }
}

fn report_failure<R: RenderTarget + ?Sized>(target: &mut R, err: &AppError) {
    error!("prediction failed: {}", err);
    show_notice(target, &Notice::error(err.user_message()));
}

/// Notices are best effort: a target that cannot show one is logged, not fatal.
pub(crate) fn show_notice<R: RenderTarget + ?Sized>(target: &mut R, notice: &Notice) {
    if let Err(e) = target.notify(notice) {
        error!("could not show notice {:?}: {}", notice.message, e);
    }
}
