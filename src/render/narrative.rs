use std::fmt::Write;

use super::ReportPanel;
use crate::stock_api::{ActionPlan, AnalysisReport, Recommendation, RiskLevel, Signal, Trend};

fn signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.2}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn signal_lines(out: &mut String, bullet: &str, signals: &[Signal]) {
    for signal in signals {
        let values = signal
            .values
            .iter()
            .map(|(name, value)| format!("{} = {:.2}", name, value))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "{} {} [{}]", bullet, signal.description, values);
    }
}

/// Text for every report panel, in display order.
pub fn report_panels(report: &AnalysisReport) -> Vec<(ReportPanel, String)> {
    ReportPanel::ALL
        .iter()
        .map(|&panel| {
            let text = match panel {
                ReportPanel::Summary => summary(report),
                ReportPanel::Historical => historical(report),
                ReportPanel::Technical => technical(report),
                ReportPanel::Reasoning => reasoning(report),
                ReportPanel::Risk => risk(report),
                ReportPanel::Outlook => outlook(report),
            };
            (panel, text)
        })
        .collect()
}

pub fn summary(report: &AnalysisReport) -> String {
    let m = &report.metrics;
    let p = &report.profile;
    format!(
        "{} ({}) operates in the {} sector focusing on {}. Over the past {} trading days, \
         the stock has moved {} by {:.2}%, trading in a range of ${:.2} to ${:.2} with an \
         average price of ${:.2}.",
        p.name,
        report.ticker,
        p.sector,
        p.focus,
        report.history_len,
        if m.period_change >= 0.0 { "upward" } else { "downward" },
        m.period_change.abs(),
        m.min_price,
        m.max_price,
        m.average_price,
    )
}

pub fn historical(report: &AnalysisReport) -> String {
    let m = &report.metrics;
    let swings = match report.risk.profile.level {
        RiskLevel::High => "significant volatility",
        RiskLevel::Moderate => "moderate price swings",
        RiskLevel::Low => "stable trading patterns",
    };
    let rising = m.period_change >= 0.0;
    format!(
        "The stock's recent performance shows {} with a {:.2}% volatility level. Price momentum \
         over the period has been {}. The {}-day average shows the stock trading {} average, \
         which is typical for {}.",
        swings,
        m.volatility,
        if rising {
            "positive, indicating buyer interest"
        } else {
            "negative, suggesting seller pressure"
        },
        report.history_len,
        if m.current_price > m.average_price { "above" } else { "below" },
        if rising { "bullish periods" } else { "bearish periods" },
    )
}

pub fn technical(report: &AnalysisReport) -> String {
    let m = &report.metrics;
    let mut out = String::new();

    let _ = writeln!(out, "Moving averages:");
    let _ = writeln!(out, "  7-day MA  = sum(last 7 closes) / 7  = ${:.2}", m.ma7);
    let _ = writeln!(out, "  21-day MA = sum(last 21 closes) / 21 = ${:.2}", m.ma21);
    let _ = writeln!(out, "  Current price: ${:.2}", m.current_price);
    let _ = writeln!(
        out,
        "  MA7 (${:.2}) {} MA21 (${:.2}): {}",
        m.ma7,
        if m.ma7 > m.ma21 { ">" } else { "<" },
        m.ma21,
        if m.ma7 > m.ma21 {
            "BULLISH, short-term momentum is up"
        } else {
            "BEARISH, short-term momentum is down"
        }
    );

    let _ = writeln!(out, "RSI:");
    let _ = writeln!(out, "  100 - 100 / (1 + avg gain / avg loss) = {:.2}", m.rsi);
    let status = if m.rsi > 70.0 {
        "OVERBOUGHT (>70), sell pressure likely"
    } else if m.rsi < 30.0 {
        "OVERSOLD (<30), buy opportunity"
    } else {
        "NEUTRAL (30-70), balanced market"
    };
    let _ = writeln!(out, "  Status: {}", status);

    let _ = writeln!(out, "Price positioning:");
    let ma7_gap = (m.current_price - m.ma7) / m.ma7 * 100.0;
    let ma21_gap = (m.current_price - m.ma21) / m.ma21 * 100.0;
    let _ = writeln!(
        out,
        "  Distance from MA7: {:.2}% ({})",
        ma7_gap,
        if m.current_price > m.ma7 { "above" } else { "below" }
    );
    let _ = writeln!(
        out,
        "  Distance from MA21: {:.2}% ({})",
        ma21_gap,
        if m.current_price > m.ma21 { "above" } else { "below" }
    );
    let _ = writeln!(out, "  Support: ${:.2} | Resistance: ${:.2}", m.min_price, m.max_price);
    let _ = write!(
        out,
        "  Volume trend: {} ({}{:.1}%)",
        if m.volume_trend > 0.0 { "increasing" } else { "decreasing" },
        if m.volume_trend > 0.0 { "+" } else { "" },
        m.volume_trend
    );
    out
}

pub fn reasoning(report: &AnalysisReport) -> String {
    let m = &report.metrics;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "AI prediction: ${:.2} ({}% from current)",
        m.predicted_price,
        signed(m.prediction_change)
    );

    if m.trend == Trend::Bullish {
        let _ = writeln!(out, "Why bullish:");
        let _ = writeln!(out, "  1. MA7 ${:.2} vs MA21 ${:.2}", m.ma7, m.ma21);
        let _ = writeln!(
            out,
            "  2. Current price ${:.2} is {} the average ${:.2}",
            m.current_price,
            if m.current_price > m.average_price { "above" } else { "near" },
            m.average_price
        );
        let _ = writeln!(out, "  3. Price trajectory: {}%", signed(m.period_change));
        let _ = writeln!(
            out,
            "  4. RSI {:.0}: {}",
            m.rsi,
            if m.rsi < 70.0 { "room to grow, not overbought yet" } else { "strong but near peak" }
        );
        let _ = writeln!(
            out,
            "  5. Volume: {}",
            if m.volume_trend > 0.0 { "increasing, confirms uptrend" } else { "stable" }
        );
    } else {
        let _ = writeln!(out, "Why {}:", if m.trend == Trend::Bearish { "bearish" } else { "neutral" });
        let _ = writeln!(out, "  1. MA7 ${:.2} vs MA21 ${:.2}", m.ma7, m.ma21);
        let _ = writeln!(
            out,
            "  2. Current price ${:.2} vs average ${:.2}",
            m.current_price, m.average_price
        );
        let _ = writeln!(out, "  3. Price trajectory: {}%", signed(m.period_change));
        let _ = writeln!(
            out,
            "  4. RSI {:.0}: {}",
            m.rsi,
            if m.rsi > 30.0 { "downward pressure continues" } else { "oversold, potential bounce ahead" }
        );
        let _ = writeln!(
            out,
            "  5. Volume: {}",
            if m.volume_trend < 0.0 { "decreasing" } else { "mixed" }
        );
    }

    let _ = writeln!(out, "Model:");
    let weights = report
        .explainer
        .feature_weights
        .iter()
        .map(|(name, w)| format!("{} ({:.0}%)", name, w))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "  Features weighted: {}", weights);
    let _ = writeln!(out, "  Accuracy: {:.2}% (error: +/-${})", m.accuracy, report.rmse);
    let _ = write!(
        out,
        "  Confidence range: ${:.2} - ${:.2} (+/-3%)",
        report.prediction_band.0, report.prediction_band.1
    );
    out
}

pub fn risk(report: &AnalysisReport) -> String {
    let r = &report.risk;
    let m = &report.metrics;
    let mut out = String::new();

    let _ = writeln!(out, "Risk level: {} ({})", r.profile.level, r.profile.category_note);
    let _ = writeln!(out, "  Volatility: {:.2}%", r.volatility);
    let _ = writeln!(
        out,
        "  Price range: ${:.2} - ${:.2} (spread ${:.2})",
        m.min_price, m.max_price, r.price_spread
    );
    let _ = writeln!(out, "  Daily swing potential: +/-{:.2}%", r.daily_swing);
    let _ = writeln!(out, "Risk factors:");
    let _ = writeln!(out, "  - Earnings announcements can cause sudden moves");
    let _ = writeln!(
        out,
        "  - {} sector news affects {}",
        report.profile.sector, report.profile.name
    );
    let _ = writeln!(out, "  - Fed policy and inflation data impact stock prices");
    let _ = writeln!(out, "  - Model error margin: +/-${}", report.rmse);
    let _ = writeln!(out, "Recommended stop-loss:");
    let _ = writeln!(
        out,
        "  {}: ${:.2} ({:.0}% from current)",
        r.profile.stop_style, r.stop_loss_price, r.profile.stop_loss_pct
    );
    let _ = write!(out, "  Position size: {}", r.profile.position_note);
    out
}

pub fn outlook(report: &AnalysisReport) -> String {
    let m = &report.metrics;
    let o = &report.outcome;
    let mut out = String::new();

    let _ = writeln!(out, "RECOMMENDATION: {}", o.recommendation);
    let _ = writeln!(
        out,
        "Confidence: {} ({} signals detected)",
        o.confidence,
        o.total_signals()
    );

    match o.recommendation {
        Recommendation::Buy => {
            let _ = writeln!(out, "BUY signals ({}):", o.buy_signals.len());
            signal_lines(&mut out, "  +", &o.buy_signals);
            if !o.sell_signals.is_empty() {
                let _ = writeln!(out, "Warning signs ({}):", o.sell_signals.len());
                signal_lines(&mut out, "  -", &o.sell_signals);
            }
        }
        Recommendation::Sell => {
            let _ = writeln!(out, "SELL signals ({}):", o.sell_signals.len());
            signal_lines(&mut out, "  +", &o.sell_signals);
            if !o.buy_signals.is_empty() {
                let _ = writeln!(out, "Positive factors ({}):", o.buy_signals.len());
                signal_lines(&mut out, "  -", &o.buy_signals);
            }
        }
        Recommendation::Hold => {
            let _ = writeln!(out, "Buy signals ({}):", o.buy_signals.len());
            signal_lines(&mut out, "  +", &o.buy_signals);
            let _ = writeln!(out, "Sell signals ({}):", o.sell_signals.len());
            signal_lines(&mut out, "  +", &o.sell_signals);
        }
    }

    let _ = writeln!(out, "Action plan:");
    match &report.action_plan {
        ActionPlan::Buy {
            entry_low,
            entry_high,
            target,
            stop_loss,
            risk_reward,
            time_frame,
            position_size,
        } => {
            let _ = writeln!(out, "  Entry zone: ${:.2} - ${:.2}", entry_low, entry_high);
            let _ = writeln!(out, "  Target price: ${:.2} ({}%)", target, signed(m.prediction_change));
            let _ = writeln!(out, "  Stop loss: ${:.2} (-5%)", stop_loss);
            let _ = writeln!(out, "  Risk/reward: {:.2}:1", risk_reward);
            let _ = writeln!(out, "  Time frame: {}", time_frame);
            let _ = writeln!(out, "  Position size: {} of portfolio", position_size);
        }
        ActionPlan::Sell { exit_price, strategy, fallback_stop } => {
            let _ = writeln!(out, "  Exit price: ${:.2} or better", exit_price);
            let _ = writeln!(out, "  Strategy: {}", strategy);
            let _ = writeln!(out, "  Avoid: new positions until trend reverses");
            let _ = writeln!(out, "  Watch for: MA7 crossing above MA21");
            let _ = writeln!(out, "  If holding, stop loss at ${:.2} (-8%)", fallback_stop);
        }
        ActionPlan::Hold { buy_alert_below, sell_alert_above, reevaluate } => {
            let _ = writeln!(out, "  Wait for clarity, signals are mixed");
            let _ = writeln!(out, "  Alert: buy if it drops below ${:.2}", buy_alert_below);
            let _ = writeln!(out, "  Alert: sell if it rises above ${:.2}", sell_alert_above);
            let _ = writeln!(out, "  Monitor: {} sector news and earnings dates", report.profile.sector);
            let _ = writeln!(out, "  Re-evaluate: {}", reevaluate);
        }
    }

    let _ = writeln!(out, "Key levels:");
    let _ = writeln!(out, "  Current: ${:.2}", m.current_price);
    let _ = writeln!(
        out,
        "  AI target: ${:.2} ({}%)",
        m.predicted_price,
        signed(m.prediction_change)
    );
    let _ = writeln!(out, "  Support: ${:.2} | Resistance: ${:.2}", m.min_price, m.max_price);
    let _ = writeln!(out, "  MA7: ${:.2} | MA21: ${:.2}", m.ma7, m.ma21);
    let _ = write!(out, "This is model output, not financial advice.");
    out
}
