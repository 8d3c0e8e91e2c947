use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::Severity;

/// One recorded snapshot of a patient's vital signs. Immutable once
/// stored; absent fields were simply not measured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalReading {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub visit_id: Option<Uuid>,
    pub heart_rate: Option<i32>,
    pub blood_pressure_systolic: Option<i32>,
    pub blood_pressure_diastolic: Option<i32>,
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    pub respiratory_rate: Option<i32>,
    /// Oxygen saturation, percent.
    pub spo2: Option<i32>,
    pub recorded_by: Option<Uuid>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordVitalsRequest {
    pub patient_id: Uuid,
    pub visit_id: Option<Uuid>,
    pub heart_rate: Option<i32>,
    pub blood_pressure_systolic: Option<i32>,
    pub blood_pressure_diastolic: Option<i32>,
    pub temperature: Option<f64>,
    pub respiratory_rate: Option<i32>,
    pub spo2: Option<i32>,
    /// The user submitting the reading, stamped onto the stored row.
    pub recorded_by: Option<Uuid>,
}

/// The metrics the evaluator classifies. Blood pressure is a single
/// metric over both bounds.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum VitalMetric {
    BloodPressure,
    Temperature,
    Pulse,
    Spo2,
}

impl fmt::Display for VitalMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VitalMetric::BloodPressure => write!(f, "blood_pressure"),
            VitalMetric::Temperature => write!(f, "temperature"),
            VitalMetric::Pulse => write!(f, "pulse"),
            VitalMetric::Spo2 => write!(f, "spo2"),
        }
    }
}

/// Transient result of evaluating one reading. Never persisted; only
/// metrics that were actually recorded appear in the map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VitalsClassification {
    pub metrics: BTreeMap<VitalMetric, Severity>,
}

impl VitalsClassification {
    pub fn insert(&mut self, metric: VitalMetric, severity: Severity) {
        self.metrics.insert(metric, severity);
    }

    pub fn get(&self, metric: VitalMetric) -> Option<Severity> {
        self.metrics.get(&metric).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Worst observed severity across all classified metrics.
    pub fn worst(&self) -> Option<Severity> {
        self.metrics.values().copied().max()
    }

    pub fn has_critical(&self) -> bool {
        self.worst() == Some(Severity::Critical)
    }

    pub fn critical_metrics(&self) -> Vec<VitalMetric> {
        self.metrics
            .iter()
            .filter(|(_, severity)| **severity == Severity::Critical)
            .map(|(metric, _)| *metric)
            .collect()
    }
}
