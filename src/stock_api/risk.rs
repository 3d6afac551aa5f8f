use serde::Serialize;

use super::types::RiskLevel;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskProfile {
    pub level: RiskLevel,
    /// Negative percent from the current price.
    pub stop_loss_pct: f64,
    pub stop_style: &'static str,
    pub position_size: &'static str,
    pub position_note: &'static str,
    pub category_note: &'static str,
}

const HIGH: RiskProfile = RiskProfile {
    level: RiskLevel::High,
    stop_loss_pct: -5.0,
    stop_style: "Tight stop",
    position_size: "2-5%",
    position_note: "Keep small (2-5% of capital)",
    category_note: "Large swings expected",
};

const MODERATE: RiskProfile = RiskProfile {
    level: RiskLevel::Moderate,
    stop_loss_pct: -8.0,
    stop_style: "Normal stop",
    position_size: "5-10%",
    position_note: "Moderate (5-10% of capital)",
    category_note: "Normal fluctuations",
};

const LOW: RiskProfile = RiskProfile {
    level: RiskLevel::Low,
    stop_loss_pct: -10.0,
    stop_style: "Wide stop",
    position_size: "10-15%",
    position_note: "Can be larger (up to 15%)",
    category_note: "Stable, predictable",
};

pub fn classify_risk(volatility: f64) -> RiskLevel {
    if volatility > 3.0 {
        RiskLevel::High
    } else if volatility > 1.5 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

impl RiskProfile {
    pub fn for_level(level: RiskLevel) -> RiskProfile {
        match level {
            RiskLevel::High => HIGH,
            RiskLevel::Moderate => MODERATE,
            RiskLevel::Low => LOW,
        }
    }

    pub fn stop_loss_price(&self, current_price: f64) -> f64 {
        current_price * (1.0 + self.stop_loss_pct / 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub profile: RiskProfile,
    pub volatility: f64,
    pub stop_loss_price: f64,
    /// Half the volatility, read as expected daily swing.
    pub daily_swing: f64,
    pub price_spread: f64,
}

pub fn assess_risk(volatility: f64, current_price: f64, min_price: f64, max_price: f64) -> RiskAssessment {
    let profile = RiskProfile::for_level(classify_risk(volatility));
    RiskAssessment {
        profile,
        volatility,
        stop_loss_price: profile.stop_loss_price(current_price),
        daily_swing: volatility / 2.0,
        price_spread: max_price - min_price,
    }
}
