use std::io::Write;

use super::{Notice, NoticeLevel, PriceChart, RenderTarget, ReportPanel, VolumeChart};
use crate::error::Result;
use crate::stock_api::{AnalysisReport, HistoricalRow, ModelExplainer, PredictionResult, Trend};

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 60;
const VOLUME_ROWS: usize = 10;

/// Plain-text dashboard written to any `Write`.
pub struct TerminalRenderer<W: Write> {
    out: W,
    busy: bool,
    max_table_rows: usize,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, busy: false, max_table_rows: 15 }
    }

    pub fn with_table_rows(mut self, rows: usize) -> Self {
        self.max_table_rows = rows;
        self
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn heading(&mut self, title: &str) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "== {} ==", title)?;
        Ok(())
    }
}

/// Block-character sparkline of `values`, resampled to at most `width` points.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }
    let step = (values.len() as f64 / width as f64).max(1.0);
    let sampled: Vec<f64> = (0..values.len().min(width))
        .map(|i| values[((i as f64 * step) as usize).min(values.len() - 1)])
        .collect();

    let min = sampled.iter().copied().fold(f64::INFINITY, f64::min);
    let max = sampled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    sampled
        .iter()
        .map(|v| {
            if span <= 0.0 {
                SPARK[SPARK.len() / 2]
            } else {
                let idx = ((v - min) / span * (SPARK.len() - 1) as f64).round() as usize;
                SPARK[idx.min(SPARK.len() - 1)]
            }
        })
        .collect()
}

impl<W: Write> RenderTarget for TerminalRenderer<W> {
    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
        if busy {
            let _ = writeln!(self.out, "Analyzing...");
        }
        let _ = self.out.flush();
    }

    fn notify(&mut self, notice: &Notice) -> Result<()> {
        let tag = match notice.level {
            NoticeLevel::Success => "OK",
            NoticeLevel::Error => "ERROR",
        };
        writeln!(self.out, "[{}] {}", tag, notice.message)?;
        Ok(())
    }

    fn show_overview(&mut self, result: &PredictionResult) -> Result<()> {
        let last = result.current_price().unwrap_or(0.0);
        let predicted = result.predicted_price().unwrap_or(0.0);
        let change = if last > 0.0 {
            format!("{:.2}", (predicted - last) / last * 100.0)
        } else {
            "0.00".to_string()
        };
        let m = &result.metrics;

        self.heading(&format!("{} prediction", result.ticker))?;
        writeln!(self.out, "Current price:    ${:.2}", last)?;
        writeln!(self.out, "Predicted change: {}%", change)?;
        writeln!(self.out, "Accuracy:         {}%", m.accuracy)?;
        writeln!(self.out, "MSE / RMSE / MAE: {} / {} / {}", m.mse, m.rmse, m.mae)?;
        let arrow = match m.trend {
            Trend::Bullish => "up",
            Trend::Bearish => "down",
            Trend::Neutral => "flat",
        };
        writeln!(self.out, "Trend:            {} ({})", m.trend, arrow)?;
        Ok(())
    }

    fn show_history_table(&mut self, rows: &[HistoricalRow]) -> Result<()> {
        self.heading("Historical data")?;
        writeln!(
            self.out,
            "{:<12} {:>10} {:>10} {:>10} {:>10}",
            "Date", "Open", "Close", "High", "Low"
        )?;
        let skip = rows.len().saturating_sub(self.max_table_rows);
        for row in &rows[skip..] {
            writeln!(
                self.out,
                "{:<12} {:>10.2} {:>9.2}{} {:>10.2} {:>10.2}",
                row.date,
                row.open,
                row.close,
                if row.is_up() { "+" } else { "-" },
                row.high,
                row.low
            )?;
        }
        if skip > 0 {
            writeln!(self.out, "({} earlier rows not shown)", skip)?;
        }
        Ok(())
    }

    fn show_price_chart(&mut self, chart: &PriceChart) -> Result<()> {
        self.heading(&chart.title)?;
        let historical: Vec<f64> = chart.historical.iter().map(|(_, v)| *v).collect();
        let predicted: Vec<f64> = chart.predicted.iter().map(|(_, v)| *v).collect();
        writeln!(self.out, "Historical  {}", sparkline(&historical, SPARK_WIDTH))?;
        writeln!(self.out, "Predictions {}", sparkline(&predicted, SPARK_WIDTH))?;
        if let (Some(first), Some(last)) = (chart.predicted.first(), chart.predicted.last()) {
            writeln!(
                self.out,
                "Predictions cover {} to {} ({} points)",
                first.0,
                last.0,
                chart.predicted.len()
            )?;
        }
        Ok(())
    }

    fn show_volume_chart(&mut self, chart: &VolumeChart) -> Result<()> {
        self.heading(&chart.title)?;
        let skip = chart.bars.len().saturating_sub(VOLUME_ROWS);
        for bar in &chart.bars[skip..] {
            writeln!(
                self.out,
                "{:<12} {:>10} {}",
                bar.date,
                bar.volume,
                if bar.up { "up" } else { "down" }
            )?;
        }
        Ok(())
    }

    fn show_panel(&mut self, panel: ReportPanel, text: &str) -> Result<()> {
        self.heading(panel.title())?;
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    fn show_report(&mut self, report: &AnalysisReport) -> Result<()> {
        for (panel, text) in super::report_panels(report) {
            self.show_panel(panel, &text)?;
        }
        self.show_explainer(&report.explainer)?;
        writeln!(
            self.out,
            "\nReport generated {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        Ok(())
    }

    fn show_explainer(&mut self, explainer: &ModelExplainer) -> Result<()> {
        self.heading("Model explainer")?;
        writeln!(self.out, "{}", explainer.summary)?;
        for (feature, weight) in &explainer.feature_weights {
            let bar = "#".repeat((weight / 2.0).round() as usize);
            writeln!(self.out, "{:<12} {:>5.1}% {}", feature, weight, bar)?;
        }
        Ok(())
    }
}
