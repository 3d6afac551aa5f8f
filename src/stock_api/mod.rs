pub mod types;
pub mod http_client;
pub mod normalizer;
pub mod technical_indicators;
pub mod recommendation;
pub mod risk;
pub mod analysis;

pub use types::*;
pub use http_client::{interpret_response, HttpPredictionClient, PredictionSource};
pub use normalizer::normalize_response;
pub use analysis::{analyze, ActionPlan, AnalysisReport, ModelExplainer};
pub use recommendation::{evaluate_signals, IndicatorSnapshot, RecommendationOutcome, Signal, SignalRule, SignalSide};
pub use risk::{assess_risk, classify_risk, RiskAssessment, RiskProfile};
