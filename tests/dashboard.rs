use serde_json::{json, Value};
use std::cell::Cell;

use stock_dashboard::commands::Dashboard;
use stock_dashboard::config::ProfileBook;
use stock_dashboard::render::{
    Notice, NoticeLevel, PriceChart, RenderTarget, ReportPanel, TerminalRenderer, VolumeChart,
};
use stock_dashboard::stock_api::{
    HistoricalRow, ModelExplainer, PredictionResult, PredictionSource, Recommendation,
};
use stock_dashboard::{AppError, Result};

/// Serves a canned reply and counts calls.
struct FakeSource {
    reply: std::result::Result<Value, String>,
    calls: Cell<usize>,
}

impl FakeSource {
    fn ok(reply: Value) -> Self {
        Self { reply: Ok(reply), calls: Cell::new(0) }
    }

    fn server_error(message: &str) -> Self {
        Self { reply: Err(message.to_string()), calls: Cell::new(0) }
    }
}

impl PredictionSource for FakeSource {
    async fn fetch_prediction(&self, _ticker: &str) -> Result<Value> {
        self.calls.set(self.calls.get() + 1);
        tokio::task::yield_now().await;
        match &self.reply {
            Ok(v) => Ok(v.clone()),
            Err(m) => Err(AppError::Server(m.clone())),
        }
    }
}

#[derive(Default)]
struct Recorder {
    busy: bool,
    busy_transitions: Vec<bool>,
    notices: Vec<Notice>,
    overview: Option<PredictionResult>,
    table_rows: usize,
    price_chart: Option<PriceChart>,
    volume_chart: Option<VolumeChart>,
    panels: Vec<(ReportPanel, String)>,
    explainer: Option<ModelExplainer>,
}

impl RenderTarget for Recorder {
    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
        self.busy_transitions.push(busy);
    }

    fn notify(&mut self, notice: &Notice) -> Result<()> {
        self.notices.push(notice.clone());
        Ok(())
    }

    fn show_overview(&mut self, result: &PredictionResult) -> Result<()> {
        self.overview = Some(result.clone());
        Ok(())
    }

    fn show_history_table(&mut self, rows: &[HistoricalRow]) -> Result<()> {
        self.table_rows = rows.len();
        Ok(())
    }

    fn show_price_chart(&mut self, chart: &PriceChart) -> Result<()> {
        self.price_chart = Some(chart.clone());
        Ok(())
    }

    fn show_volume_chart(&mut self, chart: &VolumeChart) -> Result<()> {
        self.volume_chart = Some(chart.clone());
        Ok(())
    }

    fn show_panel(&mut self, panel: ReportPanel, text: &str) -> Result<()> {
        self.panels.push((panel, text.to_string()));
        Ok(())
    }

    fn show_explainer(&mut self, explainer: &ModelExplainer) -> Result<()> {
        self.explainer = Some(explainer.clone());
        Ok(())
    }
}

/// Renders normally but cannot display notices.
#[derive(Default)]
struct NoNotices(Recorder);

impl RenderTarget for NoNotices {
    fn set_busy(&mut self, busy: bool) {
        self.0.set_busy(busy);
    }

    fn notify(&mut self, _notice: &Notice) -> Result<()> {
        Err(AppError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed")))
    }

    fn show_overview(&mut self, result: &PredictionResult) -> Result<()> {
        self.0.show_overview(result)
    }

    fn show_history_table(&mut self, rows: &[HistoricalRow]) -> Result<()> {
        self.0.show_history_table(rows)
    }

    fn show_price_chart(&mut self, chart: &PriceChart) -> Result<()> {
        self.0.show_price_chart(chart)
    }

    fn show_volume_chart(&mut self, chart: &VolumeChart) -> Result<()> {
        self.0.show_volume_chart(chart)
    }

    fn show_panel(&mut self, panel: ReportPanel, text: &str) -> Result<()> {
        self.0.show_panel(panel, text)
    }

    fn show_explainer(&mut self, explainer: &ModelExplainer) -> Result<()> {
        self.0.show_explainer(explainer)
    }
}

fn falling_reply() -> Value {
    let prices: Vec<f64> = (0..25).map(|i| 150.0 - i as f64).collect();
    let dates: Vec<String> = (1..=25).map(|d| format!("2024-05-{:02}", d)).collect();
    let rows: Vec<Value> = dates
        .iter()
        .zip(prices.iter())
        .map(|(d, p)| json!({"date": d, "Open": p + 0.5, "Close": p, "High": p + 1.0, "Low": p - 1.0}))
        .collect();
    json!({
        "ticker": "TSLA",
        "dates": dates,
        "historical_prices": prices,
        "predictions": [126.0, 124.0, 120.0],
        "historical_data": rows,
        "metrics": {"mse": 9.0, "rmse": 3.0, "mae": 2.4}
    })
}

#[tokio::test]
async fn test_successful_prediction_renders_everything() {
    let dashboard = Dashboard::new(FakeSource::ok(falling_reply()), ProfileBook::default())
        .with_volume_seed(42);
    let mut target = Recorder::default();

    let report = dashboard.predict(" tsla ", &mut target).await.unwrap().unwrap();

    assert_eq!(report.metrics.recommendation, Recommendation::Sell);
    assert_eq!(target.busy_transitions, vec![true, false]);
    assert!(!target.busy);
    assert_eq!(target.table_rows, 25);
    assert_eq!(target.price_chart.as_ref().unwrap().predicted.len(), 3);
    assert_eq!(target.volume_chart.as_ref().unwrap().bars.len(), 25);
    assert_eq!(target.panels.len(), 6);
    assert_eq!(target.explainer.as_ref().unwrap().days_analyzed, 25);
    assert_eq!(target.overview.as_ref().unwrap().metrics.rmse, "3.0000");

    let last = target.notices.last().unwrap();
    assert_eq!(last.level, NoticeLevel::Success);
    assert_eq!(last.message, "Successfully analyzed TSLA with GRU model");
}

#[tokio::test]
async fn test_empty_ticker_never_calls_service() {
    let source = FakeSource::ok(falling_reply());
    let dashboard = Dashboard::new(source, ProfileBook::default());
    let mut target = Recorder::default();

    let err = dashboard.predict("   ", &mut target).await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(target.notices[0].message, "Please enter a stock ticker");
    assert!(target.busy_transitions.is_empty());
}

#[tokio::test]
async fn test_unknown_ticker_rejected() {
    let dashboard = Dashboard::new(FakeSource::ok(falling_reply()), ProfileBook::default());
    let mut target = Recorder::default();

    let err = dashboard.predict("XYZ", &mut target).await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(target.notices[0].message, "Invalid stock ticker");
}

#[tokio::test]
async fn test_server_error_restores_interaction() {
    let dashboard = Dashboard::new(
        FakeSource::server_error("Could not download data for AAPL"),
        ProfileBook::default(),
    );
    let mut target = Recorder::default();

    let err = dashboard.predict("AAPL", &mut target).await.unwrap_err();

    assert!(matches!(err, AppError::Server(_)));
    assert_eq!(target.busy_transitions, vec![true, false]);
    assert_eq!(target.notices.len(), 1);
    assert_eq!(target.notices[0].level, NoticeLevel::Error);
    assert_eq!(target.notices[0].message, "Could not download data for AAPL");
    assert!(target.overview.is_none());
}

#[tokio::test]
async fn test_empty_reply_is_processing_error() {
    let dashboard = Dashboard::new(FakeSource::ok(json!({})), ProfileBook::default());
    let mut target = Recorder::default();

    let err = dashboard.predict("MSFT", &mut target).await.unwrap_err();

    assert!(matches!(err, AppError::Processing(_)));
    assert!(!target.busy);
    assert!(target.notices[0].message.starts_with("Error processing prediction data"));
}

#[tokio::test]
async fn test_reset_drops_in_flight_response() {
    let dashboard = Dashboard::new(FakeSource::ok(falling_reply()), ProfileBook::default());
    let mut target = Recorder::default();

    let (outcome, _) = tokio::join!(dashboard.predict("TSLA", &mut target), async {
        dashboard.reset();
    });

    assert!(outcome.unwrap().is_none());
    assert!(target.overview.is_none());
    assert!(target.notices.is_empty());
    assert_eq!(target.busy_transitions, vec![true, false]);
}

#[tokio::test]
async fn test_custom_profiles_accept_new_ticker() {
    let profiles = ProfileBook::from_json_str(
        r#"{"profiles": {"SHOP": {"name": "Shopify Inc.", "sector": "E-commerce", "focus": "merchant software"}},
            "tickers": ["SHOP"]}"#,
    )
    .unwrap();
    let mut reply = falling_reply();
    reply["ticker"] = json!("SHOP");
    let dashboard = Dashboard::new(FakeSource::ok(reply), profiles);
    let mut target = Recorder::default();

    let report = dashboard.predict("shop", &mut target).await.unwrap().unwrap();

    assert_eq!(report.profile.name, "Shopify Inc.");
    let summary = &target.panels[0];
    assert_eq!(summary.0, ReportPanel::Summary);
    assert!(summary.1.starts_with("Shopify Inc. (SHOP)"));
}

#[tokio::test]
async fn test_unshown_notice_does_not_change_outcome() {
    let dashboard = Dashboard::new(FakeSource::ok(falling_reply()), ProfileBook::default())
        .with_volume_seed(3);
    let mut target = NoNotices::default();
    let report = dashboard.predict("TSLA", &mut target).await.unwrap();
    assert!(report.is_some());
    assert!(!target.0.busy);

    let dashboard = Dashboard::new(FakeSource::server_error("No data for TSLA"), ProfileBook::default());
    let err = dashboard.predict("TSLA", &mut target).await.unwrap_err();
    assert!(matches!(&err, AppError::Server(m) if m == "No data for TSLA"));
    assert!(!target.0.busy);
}

#[tokio::test]
async fn test_terminal_prints_failure_once() {
    let dashboard = Dashboard::new(FakeSource::ok(json!({})), ProfileBook::default());
    let mut renderer = TerminalRenderer::new(Vec::new());
    assert!(dashboard.predict("ZZZZ", &mut renderer).await.is_err());

    let text = String::from_utf8(renderer.into_inner()).unwrap();
    assert_eq!(text.matches("Invalid stock ticker").count(), 1);
    assert_eq!(text.lines().filter(|l| l.starts_with("[ERROR]")).count(), 1);
}
