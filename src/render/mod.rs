//! Output side of the dashboard. The analysis code hands complete values to a
//! `RenderTarget`; each target decides what it can display.

pub mod chart;
pub mod json;
pub mod narrative;
pub mod terminal;

use serde::Serialize;
use std::fmt;

use crate::error::Result;
use crate::stock_api::{AnalysisReport, HistoricalRow, ModelExplainer, PredictionResult};

pub use chart::{build_price_chart, build_volume_chart, PriceChart, VolumeBar, VolumeChart};
pub use json::JsonRenderer;
pub use narrative::report_panels;
pub use terminal::TerminalRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPanel {
    Summary,
    Historical,
    Technical,
    Reasoning,
    Risk,
    Outlook,
}

impl ReportPanel {
    pub const ALL: [ReportPanel; 6] = [
        ReportPanel::Summary,
        ReportPanel::Historical,
        ReportPanel::Technical,
        ReportPanel::Reasoning,
        ReportPanel::Risk,
        ReportPanel::Outlook,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ReportPanel::Summary => "Company Summary",
            ReportPanel::Historical => "Historical Performance",
            ReportPanel::Technical => "Technical Analysis",
            ReportPanel::Reasoning => "Prediction Reasoning",
            ReportPanel::Risk => "Risk Assessment",
            ReportPanel::Outlook => "Outlook & Recommendation",
        }
    }
}

impl fmt::Display for ReportPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Destination for everything the dashboard shows.
pub trait RenderTarget {
    /// Busy while a request is in flight; the submit control is disabled.
    fn set_busy(&mut self, busy: bool);

    fn notify(&mut self, notice: &Notice) -> Result<()>;

    /// Headline figures straight from the normalized reply.
    fn show_overview(&mut self, result: &PredictionResult) -> Result<()>;

    fn show_history_table(&mut self, rows: &[HistoricalRow]) -> Result<()>;

    fn show_price_chart(&mut self, chart: &PriceChart) -> Result<()>;

    fn show_volume_chart(&mut self, chart: &VolumeChart) -> Result<()>;

    fn show_panel(&mut self, panel: ReportPanel, text: &str) -> Result<()>;

    fn show_explainer(&mut self, explainer: &ModelExplainer) -> Result<()>;

    fn show_report(&mut self, report: &AnalysisReport) -> Result<()> {
        for (panel, text) in report_panels(report) {
            self.show_panel(panel, &text)?;
        }
        self.show_explainer(&report.explainer)
    }
}
