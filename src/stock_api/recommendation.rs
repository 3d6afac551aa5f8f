use serde::{Deserialize, Serialize};

use super::types::{Confidence, Recommendation};

pub const RSI_OVERSOLD: f64 = 35.0;
pub const RSI_OVERBOUGHT: f64 = 65.0;
/// Within 5% of the period low/high.
pub const SUPPORT_BAND: f64 = 1.05;
pub const RESISTANCE_BAND: f64 = 0.95;
pub const PREDICTION_THRESHOLD: f64 = 2.0;
pub const VOLUME_THRESHOLD: f64 = 5.0;

/// Latest indicator values the signal rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub ma7: f64,
    pub ma21: f64,
    pub current_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub prediction_change: f64,
    pub volume_trend: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalRule {
    RsiOversold,
    RsiOverbought,
    BullishCrossover,
    BearishCrossover,
    NearSupport,
    NearResistance,
    PredictedGain,
    PredictedLoss,
    VolumeIncreasing,
    VolumeDecreasing,
}

impl SignalRule {
    pub const ALL: [SignalRule; 10] = [
        SignalRule::RsiOversold,
        SignalRule::RsiOverbought,
        SignalRule::BullishCrossover,
        SignalRule::BearishCrossover,
        SignalRule::NearSupport,
        SignalRule::NearResistance,
        SignalRule::PredictedGain,
        SignalRule::PredictedLoss,
        SignalRule::VolumeIncreasing,
        SignalRule::VolumeDecreasing,
    ];

    pub fn side(self) -> SignalSide {
        match self {
            SignalRule::RsiOversold
            | SignalRule::BullishCrossover
            | SignalRule::NearSupport
            | SignalRule::PredictedGain
            | SignalRule::VolumeIncreasing => SignalSide::Buy,
            _ => SignalSide::Sell,
        }
    }

    pub fn fires(self, s: &IndicatorSnapshot) -> bool {
        match self {
            SignalRule::RsiOversold => s.rsi < RSI_OVERSOLD,
            SignalRule::RsiOverbought => s.rsi > RSI_OVERBOUGHT,
            SignalRule::BullishCrossover => s.ma7 > s.ma21 && s.current_price > s.ma7,
            SignalRule::BearishCrossover => s.ma7 < s.ma21 && s.current_price < s.ma7,
            SignalRule::NearSupport => s.current_price < s.min_price * SUPPORT_BAND,
            SignalRule::NearResistance => s.current_price > s.max_price * RESISTANCE_BAND,
            SignalRule::PredictedGain => s.prediction_change > PREDICTION_THRESHOLD,
            SignalRule::PredictedLoss => s.prediction_change < -PREDICTION_THRESHOLD,
            SignalRule::VolumeIncreasing => s.volume_trend > VOLUME_THRESHOLD,
            SignalRule::VolumeDecreasing => s.volume_trend < -VOLUME_THRESHOLD,
        }
    }

    /// The indicator values a rule was judged on.
    fn inputs(self, s: &IndicatorSnapshot) -> Vec<(String, f64)> {
        let pairs: Vec<(&str, f64)> = match self {
            SignalRule::RsiOversold | SignalRule::RsiOverbought => vec![("RSI", s.rsi)],
            SignalRule::BullishCrossover | SignalRule::BearishCrossover => vec![
                ("MA7", s.ma7),
                ("MA21", s.ma21),
                ("Price", s.current_price),
            ],
            SignalRule::NearSupport => vec![("Price", s.current_price), ("Support", s.min_price)],
            SignalRule::NearResistance => {
                vec![("Price", s.current_price), ("Resistance", s.max_price)]
            }
            SignalRule::PredictedGain | SignalRule::PredictedLoss => {
                vec![("Predicted change %", s.prediction_change)]
            }
            SignalRule::VolumeIncreasing | SignalRule::VolumeDecreasing => {
                vec![("Volume trend %", s.volume_trend)]
            }
        };
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    fn describe(self, s: &IndicatorSnapshot) -> String {
        match self {
            SignalRule::RsiOversold => format!("RSI oversold ({:.0} < 35)", s.rsi),
            SignalRule::RsiOverbought => format!("RSI overbought ({:.0} > 65)", s.rsi),
            SignalRule::BullishCrossover => "Bullish MA crossover + price above MA7".to_string(),
            SignalRule::BearishCrossover => "Bearish MA crossover + price below MA7".to_string(),
            SignalRule::NearSupport => "Near support level (bounce potential)".to_string(),
            SignalRule::NearResistance => "Near resistance (pullback likely)".to_string(),
            SignalRule::PredictedGain => format!("AI predicts +{:.2}% gain", s.prediction_change),
            SignalRule::PredictedLoss => format!("AI predicts {:.2}% loss", s.prediction_change),
            SignalRule::VolumeIncreasing => format!("Volume increasing (+{:.1}%)", s.volume_trend),
            SignalRule::VolumeDecreasing => format!("Volume decreasing ({:.1}%)", s.volume_trend),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub rule: SignalRule,
    pub side: SignalSide,
    pub description: String,
    pub values: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationOutcome {
    pub recommendation: Recommendation,
    pub confidence: Confidence,
    pub buy_signals: Vec<Signal>,
    pub sell_signals: Vec<Signal>,
}

impl RecommendationOutcome {
    pub fn total_signals(&self) -> usize {
        self.buy_signals.len() + self.sell_signals.len()
    }
}

pub fn evaluate_signals(snapshot: &IndicatorSnapshot) -> RecommendationOutcome {
    let mut buy_signals = Vec::new();
    let mut sell_signals = Vec::new();

    for rule in SignalRule::ALL {
        if !rule.fires(snapshot) {
            continue;
        }
        let signal = Signal {
            rule,
            side: rule.side(),
            description: rule.describe(snapshot),
            values: rule.inputs(snapshot),
        };
        match signal.side {
            SignalSide::Buy => buy_signals.push(signal),
            SignalSide::Sell => sell_signals.push(signal),
        }
    }

    let (recommendation, confidence) = decide(buy_signals.len(), sell_signals.len());

    RecommendationOutcome {
        recommendation,
        confidence,
        buy_signals,
        sell_signals,
    }
}

/// Majority vote; two or more signals of margin is High confidence.
pub fn decide(buy_count: usize, sell_count: usize) -> (Recommendation, Confidence) {
    let recommendation = if buy_count > sell_count {
        Recommendation::Buy
    } else if sell_count > buy_count {
        Recommendation::Sell
    } else {
        Recommendation::Hold
    };

    let confidence = if buy_count.abs_diff(sell_count) >= 2 {
        Confidence::High
    } else {
        Confidence::Moderate
    };

    (recommendation, confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn quiet() -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi: 50.0,
            ma7: 100.0,
            ma21: 100.0,
            current_price: 100.0,
            min_price: 80.0,
            max_price: 120.0,
            prediction_change: 0.0,
            volume_trend: 0.0,
        }
    }

    #[rstest]
    #[case(3, 1, Recommendation::Buy, Confidence::High)]
    #[case(1, 3, Recommendation::Sell, Confidence::High)]
    #[case(2, 1, Recommendation::Buy, Confidence::Moderate)]
    #[case(2, 2, Recommendation::Hold, Confidence::Moderate)]
    #[case(0, 0, Recommendation::Hold, Confidence::Moderate)]
    #[case(0, 5, Recommendation::Sell, Confidence::High)]
    fn test_decide(
        #[case] buy: usize,
        #[case] sell: usize,
        #[case] expected: Recommendation,
        #[case] confidence: Confidence,
    ) {
        assert_eq!(decide(buy, sell), (expected, confidence));
    }

    #[test]
    fn test_quiet_market_holds() {
        let outcome = evaluate_signals(&quiet());
        assert_eq!(outcome.total_signals(), 0);
        assert_eq!(outcome.recommendation, Recommendation::Hold);
    }

    #[test]
    fn test_every_buy_rule_fires() {
        let s = IndicatorSnapshot {
            rsi: 28.4,
            ma7: 102.0,
            ma21: 100.0,
            current_price: 103.0,
            min_price: 100.0,
            max_price: 150.0,
            prediction_change: 3.1,
            volume_trend: 6.2,
        };
        let outcome = evaluate_signals(&s);
        let descriptions: Vec<&str> =
            outcome.buy_signals.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec![
                "RSI oversold (28 < 35)",
                "Bullish MA crossover + price above MA7",
                "Near support level (bounce potential)",
                "AI predicts +3.10% gain",
                "Volume increasing (+6.2%)",
            ]
        );
        assert!(outcome.sell_signals.is_empty());
        assert_eq!(outcome.recommendation, Recommendation::Buy);
        assert_eq!(outcome.confidence, Confidence::High);
    }

    #[test]
    fn test_signal_carries_values() {
        let s = IndicatorSnapshot { rsi: 71.0, ..quiet() };
        let outcome = evaluate_signals(&s);
        assert_eq!(outcome.sell_signals.len(), 1);
        let signal = &outcome.sell_signals[0];
        assert_eq!(signal.rule, SignalRule::RsiOverbought);
        assert_eq!(signal.description, "RSI overbought (71 > 65)");
        assert_eq!(signal.values, vec![("RSI".to_string(), 71.0)]);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let s = IndicatorSnapshot {
            rsi: 35.0,
            prediction_change: 2.0,
            volume_trend: -5.0,
            ..quiet()
        };
        assert_eq!(evaluate_signals(&s).total_signals(), 0);
    }

    #[test]
    fn test_mirrored_inputs_flip_recommendation() {
        let bullish = IndicatorSnapshot {
            rsi: 30.0,
            ma7: 105.0,
            ma21: 100.0,
            current_price: 106.0,
            min_price: 60.0,
            max_price: 200.0,
            prediction_change: 4.0,
            volume_trend: 0.0,
        };
        let bearish = IndicatorSnapshot {
            rsi: 70.0,
            ma7: 95.0,
            ma21: 100.0,
            current_price: 94.0,
            min_price: 60.0,
            max_price: 200.0,
            prediction_change: -4.0,
            volume_trend: 0.0,
        };
        let up = evaluate_signals(&bullish);
        let down = evaluate_signals(&bearish);
        assert_eq!(up.recommendation, Recommendation::Buy);
        assert_eq!(down.recommendation, Recommendation::Sell);
        assert_eq!(up.buy_signals.len(), down.sell_signals.len());
        assert_eq!(up.confidence, down.confidence);
    }
}
