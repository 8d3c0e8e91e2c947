use shared_models::Severity;

use crate::models::{VitalMetric, VitalReading, VitalsClassification};

/// Classify a single reading against fixed clinical thresholds, one
/// verdict per recorded metric. Pure and deterministic: unrecorded or
/// out-of-range-malformed (non-positive) values are skipped, never an
/// error, so the result only contains metrics that were measured.
pub fn evaluate_reading(reading: &VitalReading) -> VitalsClassification {
    let mut classification = VitalsClassification::default();

    // Blood pressure needs both bounds to say anything.
    if let (Some(systolic), Some(diastolic)) = (
        positive(reading.blood_pressure_systolic),
        positive(reading.blood_pressure_diastolic),
    ) {
        let severity = if systolic >= 180 || diastolic >= 120 {
            Severity::Critical
        } else if systolic >= 140 || diastolic >= 90 {
            Severity::High
        } else {
            Severity::Normal
        };
        classification.insert(VitalMetric::BloodPressure, severity);
    }

    if let Some(temperature) = reading.temperature.filter(|t| *t > 0.0) {
        let severity = if temperature >= 39.0 {
            Severity::Critical
        } else if temperature >= 37.5 {
            Severity::High
        } else {
            Severity::Normal
        };
        classification.insert(VitalMetric::Temperature, severity);
    }

    if let Some(pulse) = positive(reading.heart_rate) {
        let severity = if pulse >= 130 || pulse <= 40 {
            Severity::Critical
        } else if pulse >= 100 {
            Severity::High
        } else {
            Severity::Normal
        };
        classification.insert(VitalMetric::Pulse, severity);
    }

    if let Some(spo2) = positive(reading.spo2) {
        let severity = if spo2 < 85 {
            Severity::Critical
        } else if spo2 < 95 {
            Severity::High
        } else {
            Severity::Normal
        };
        classification.insert(VitalMetric::Spo2, severity);
    }

    classification
}

fn positive(value: Option<i32>) -> Option<i32> {
    value.filter(|v| *v > 0)
}
