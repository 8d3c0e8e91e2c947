use serde::Serialize;
use uuid::Uuid;

/// SLA performance over one set of alerts. Computed, never stored.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SlaScorecard {
    pub total_alerts: usize,
    pub acknowledged: usize,
    /// Mean acknowledgement latency in whole minutes, e.g. "7m".
    pub avg_ack_time: String,
    /// Acknowledged within the response window.
    pub within_window: usize,
    /// within_window / acknowledged as a percentage, one decimal.
    pub compliance: f64,
    /// Alerts that climbed the chain at least once.
    pub escalations: usize,
    pub risk: RiskBand,
    pub grade: Grade,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Green,
    Amber,
    Red,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorScorecard {
    pub doctor_id: Uuid,
    pub doctor_name: String,
    #[serde(flatten)]
    pub scorecard: SlaScorecard,
}

#[derive(Debug, Clone, Serialize)]
pub struct HospitalScorecard {
    pub hospital_id: Uuid,
    pub doctors: Vec<DoctorScorecard>,
    /// Rollup over every alert assigned to the listed doctors.
    pub overall: SlaScorecard,
}
