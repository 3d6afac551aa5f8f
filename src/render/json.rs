use serde::Serialize;
use std::io::Write;

use super::{Notice, PriceChart, RenderTarget, ReportPanel, VolumeChart};
use crate::error::Result;
use crate::stock_api::{AnalysisReport, HistoricalRow, ModelExplainer, PredictionResult};

#[derive(Debug, Default, Serialize)]
pub struct DashboardDocument {
    pub notices: Vec<Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<PredictionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_chart: Option<PriceChart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_chart: Option<VolumeChart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<AnalysisReport>,
    pub panels: Vec<(ReportPanel, String)>,
}

/// Collects one dashboard update and writes it as a single JSON document.
pub struct JsonRenderer<W: Write> {
    out: W,
    doc: DashboardDocument,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, doc: DashboardDocument::default() }
    }

    pub fn document(&self) -> &DashboardDocument {
        &self.doc
    }

    pub fn finish(mut self) -> Result<W> {
        serde_json::to_writer_pretty(&mut self.out, &self.doc)?;
        writeln!(self.out)?;
        Ok(self.out)
    }
}

impl<W: Write> RenderTarget for JsonRenderer<W> {
    fn set_busy(&mut self, _busy: bool) {}

    fn notify(&mut self, notice: &Notice) -> Result<()> {
        self.doc.notices.push(notice.clone());
        Ok(())
    }

    fn show_overview(&mut self, result: &PredictionResult) -> Result<()> {
        self.doc.prediction = Some(result.clone());
        Ok(())
    }

    // rows are already part of the prediction
    fn show_history_table(&mut self, _rows: &[HistoricalRow]) -> Result<()> {
        Ok(())
    }

    fn show_price_chart(&mut self, chart: &PriceChart) -> Result<()> {
        self.doc.price_chart = Some(chart.clone());
        Ok(())
    }

    fn show_volume_chart(&mut self, chart: &VolumeChart) -> Result<()> {
        self.doc.volume_chart = Some(chart.clone());
        Ok(())
    }

    fn show_panel(&mut self, panel: ReportPanel, text: &str) -> Result<()> {
        self.doc.panels.push((panel, text.to_string()));
        Ok(())
    }

    fn show_explainer(&mut self, _explainer: &ModelExplainer) -> Result<()> {
        Ok(())
    }

    fn show_report(&mut self, report: &AnalysisReport) -> Result<()> {
        for (panel, text) in super::report_panels(report) {
            self.show_panel(panel, &text)?;
        }
        self.doc.report = Some(report.clone());
        Ok(())
    }
}
