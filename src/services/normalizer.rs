// src/services/normalizer.rs
use crate::models::{Diagnosis, ParsedFields};
use std::num::IntErrorKind;

pub const MIN_SEVERITY: i64 = 1;
pub const MAX_SEVERITY: i64 = 10;
pub const MIN_AFFECTED_AREA: f64 = 0.0;
pub const MAX_AFFECTED_AREA: f64 = 100.0;

const HEALTHY: &str = "Healthy";
const UNKNOWN: &str = "Unknown";

fn normalize_severity(raw: &str) -> i64 {
    match raw.trim().parse::<i64>() {
        Ok(value) => value.clamp(MIN_SEVERITY, MAX_SEVERITY),
        // Out-of-range integers still clamp to the nearest bound.
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => MAX_SEVERITY,
        Err(e) if *e.kind() == IntErrorKind::NegOverflow => MIN_SEVERITY,
        Err(_) => MIN_SEVERITY,
    }
}

fn normalize_affected_area(raw: &str) -> f64 {
    // NaN parses, but it is treated as unparseable and yields 0. A naive
    // min/max clamp would turn it into 100.
    match raw.trim().parse::<f64>() {
        Ok(value) if !value.is_nan() => value.clamp(MIN_AFFECTED_AREA, MAX_AFFECTED_AREA),
        _ => MIN_AFFECTED_AREA,
    }
}

fn normalize_label(raw: &str) -> String {
    match raw.trim() {
        "" => UNKNOWN.to_string(),
        label => label.to_string(),
    }
}

fn is_healthy_label(disease_type: &str) -> bool {
    let lower = disease_type.to_lowercase();
    lower == "healthy" || lower == "none"
}

/// Coerces parsed fields into a [`Diagnosis`], clamping numbers into range.
/// Blank text fields become "Unknown".
///
/// A severity of 2 or less with no affected area is reported as "Healthy"
/// unless the model already said "Healthy" or "None". The check runs on the
/// clamped values, and it also fires for a defaulted "Unknown" disease.
pub fn normalize(fields: ParsedFields) -> Diagnosis {
    let severity_level = normalize_severity(&fields.severity_level);
    let affected_area_percentage = normalize_affected_area(&fields.affected_area_percentage);
    let mut disease_type = normalize_label(&fields.disease_type);
    let crop_type = normalize_label(&fields.crop_type);

    if severity_level <= 2 && affected_area_percentage == 0.0 && !is_healthy_label(&disease_type) {
        disease_type = HEALTHY.to_string();
    }

    Diagnosis {
        disease_type,
        severity_level,
        affected_area_percentage,
        crop_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::response_parser::parse;

    fn fields(disease: &str, severity: &str, area: &str, crop: &str) -> ParsedFields {
        ParsedFields {
            disease_type: disease.to_string(),
            severity_level: severity.to_string(),
            affected_area_percentage: area.to_string(),
            crop_type: crop.to_string(),
        }
    }

    #[test]
    fn keeps_in_range_values() {
        let diagnosis = normalize(fields("Late Blight", "7", "45.5", "Tomato"));
        assert_eq!(
            diagnosis,
            Diagnosis {
                disease_type: "Late Blight".into(),
                severity_level: 7,
                affected_area_percentage: 45.5,
                crop_type: "Tomato".into(),
            }
        );
    }

    #[test]
    fn clamps_severity() {
        assert_eq!(normalize(fields("Rust", "15", "10", "Wheat")).severity_level, 10);
        assert_eq!(normalize(fields("Rust", "-3", "10", "Wheat")).severity_level, 1);
        assert_eq!(normalize(fields("Rust", "0", "10", "Wheat")).severity_level, 1);
        assert_eq!(
            normalize(fields("Rust", "99999999999999999999", "10", "Wheat")).severity_level,
            10
        );
        assert_eq!(
            normalize(fields("Rust", "-99999999999999999999", "10", "Wheat")).severity_level,
            1
        );
    }

    #[test]
    fn non_numeric_severity_defaults_to_one() {
        for raw in ["n/a", "", "seven", "7.5", "1-10"] {
            assert_eq!(normalize(fields("Rust", raw, "10", "Wheat")).severity_level, 1, "{raw}");
        }
    }

    #[test]
    fn clamps_affected_area() {
        assert_eq!(normalize(fields("Rust", "5", "150", "Wheat")).affected_area_percentage, 100.0);
        assert_eq!(normalize(fields("Rust", "5", "-20", "Wheat")).affected_area_percentage, 0.0);
        assert_eq!(normalize(fields("Rust", "5", "inf", "Wheat")).affected_area_percentage, 100.0);
    }

    #[test]
    fn non_numeric_affected_area_defaults_to_zero() {
        for raw in ["abc", "", "NaN", "40%"] {
            assert_eq!(
                normalize(fields("Rust", "5", raw, "Wheat")).affected_area_percentage,
                0.0,
                "{raw}"
            );
        }
    }

    #[test]
    fn trims_text_fields() {
        let diagnosis = normalize(fields("  Rust \n", "5", "10", "\tWheat "));
        assert_eq!(diagnosis.disease_type, "Rust");
        assert_eq!(diagnosis.crop_type, "Wheat");
    }

    #[test]
    fn blank_tags_become_unknown() {
        let reply = "<disease_type>  </disease_type><severity_level>6</severity_level>\
                     <affected_area_percentage>30</affected_area_percentage><crop_type></crop_type>";
        let diagnosis = normalize(parse(reply));
        assert_eq!(
            diagnosis,
            Diagnosis {
                disease_type: "Unknown".into(),
                severity_level: 6,
                affected_area_percentage: 30.0,
                crop_type: "Unknown".into(),
            }
        );
    }

    #[test]
    fn low_severity_without_damage_is_healthy() {
        let diagnosis = normalize(fields("Leaf Spot", "2", "0", "Tomato"));
        assert_eq!(diagnosis.disease_type, "Healthy");
    }

    #[test]
    fn reclassification_uses_clamped_values() {
        // -4 clamps to 1 and -10 clamps to 0, so the rule fires.
        let diagnosis = normalize(fields("Leaf Spot", "-4", "-10", "Tomato"));
        assert_eq!(diagnosis.disease_type, "Healthy");
    }

    #[test]
    fn reclassification_needs_both_conditions() {
        assert_eq!(normalize(fields("Leaf Spot", "3", "0", "Tomato")).disease_type, "Leaf Spot");
        assert_eq!(normalize(fields("Leaf Spot", "2", "0.5", "Tomato")).disease_type, "Leaf Spot");
    }

    #[test]
    fn existing_healthy_or_none_labels_are_kept() {
        assert_eq!(normalize(fields("none", "1", "0", "Corn")).disease_type, "none");
        assert_eq!(normalize(fields("HEALTHY", "1", "0", "Corn")).disease_type, "HEALTHY");
    }

    #[test]
    fn defaulted_unknown_disease_is_reclassified_healthy() {
        let diagnosis = normalize(parse("no tags at all"));
        assert_eq!(
            diagnosis,
            Diagnosis {
                disease_type: "Healthy".into(),
                severity_level: 1,
                affected_area_percentage: 0.0,
                crop_type: "Unknown".into(),
            }
        );
    }

    #[test]
    fn missing_crop_tag_stays_unknown() {
        let reply = "<disease_type>Rust</disease_type><severity_level>6</severity_level>\
                     <affected_area_percentage>30</affected_area_percentage>";
        let diagnosis = normalize(parse(reply));
        assert_eq!(diagnosis.crop_type, "Unknown");
        assert_eq!(diagnosis.disease_type, "Rust");
    }
}
