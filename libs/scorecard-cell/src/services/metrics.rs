use chrono::Duration;

use alert_cell::models::Alert;

use crate::models::{Grade, RiskBand, SlaScorecard};

impl SlaScorecard {
    /// Fold a set of alerts into a scorecard against one response window.
    /// Only acknowledged alerts enter the latency and compliance figures;
    /// a doctor with no acknowledgements scores 0.0 compliance.
    pub fn compute(alerts: &[Alert], response_minutes: i64) -> Self {
        let total_alerts = alerts.len();

        let acked: Vec<&Alert> = alerts
            .iter()
            .filter(|a| a.acknowledged_at.is_some())
            .collect();
        let acknowledged = acked.len();

        let avg_ack_time = if acknowledged == 0 {
            "0m".to_string()
        } else {
            let total_seconds: i64 = acked
                .iter()
                .filter_map(|a| a.acknowledged_at.map(|at| (at - a.created_at).num_seconds()))
                .sum();
            let minutes = total_seconds / acknowledged as i64 / 60;
            format!("{}m", minutes)
        };

        let window = Duration::minutes(response_minutes);
        let within_window = acked
            .iter()
            .filter(|a| {
                a.acknowledged_at
                    .map(|at| at <= a.created_at + window)
                    .unwrap_or(false)
            })
            .count();

        let compliance = if acknowledged == 0 {
            0.0
        } else {
            let pct = within_window as f64 / acknowledged as f64 * 100.0;
            (pct * 10.0).round() / 10.0
        };

        let escalations = alerts.iter().filter(|a| a.escalation_level > 0).count();

        Self {
            total_alerts,
            acknowledged,
            avg_ack_time,
            within_window,
            compliance,
            escalations,
            risk: risk_band(compliance),
            grade: performance_grade(compliance, escalations),
        }
    }
}

pub fn risk_band(compliance: f64) -> RiskBand {
    if compliance >= 85.0 {
        RiskBand::Green
    } else if compliance >= 60.0 {
        RiskBand::Amber
    } else {
        RiskBand::Red
    }
}

/// Grade on compliance and escalation count. An A additionally requires a
/// clean escalation record.
pub fn performance_grade(compliance: f64, escalations: usize) -> Grade {
    if compliance >= 90.0 && escalations == 0 {
        Grade::A
    } else if compliance >= 80.0 {
        Grade::B
    } else if compliance >= 70.0 {
        Grade::C
    } else {
        Grade::D
    }
}
