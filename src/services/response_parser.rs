// src/services/response_parser.rs
use crate::models::ParsedFields;
use regex::Regex;
use std::sync::OnceLock;

static DISEASE_TYPE_REGEX: OnceLock<Regex> = OnceLock::new();
static SEVERITY_LEVEL_REGEX: OnceLock<Regex> = OnceLock::new();
static AFFECTED_AREA_REGEX: OnceLock<Regex> = OnceLock::new();
static CROP_TYPE_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex(cell: &'static OnceLock<Regex>, tag: &str) -> &'static Regex {
    // (?s) lets the captured value span lines; the lazy group stops at the
    // first closing tag.
    cell.get_or_init(|| Regex::new(&format!(r"(?s)<{tag}>(.*?)</{tag}>")).unwrap())
}

fn extract(text: &str, regex: &Regex, default: &str) -> String {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| default.to_string())
}

/// Pulls the four diagnosis fields out of a model reply.
///
/// Each tag is searched independently, so a missing or mangled tag only
/// falls back to that field's default. Values are trimmed but not coerced.
pub fn parse(raw: &str) -> ParsedFields {
    ParsedFields {
        disease_type: extract(
            raw,
            tag_regex(&DISEASE_TYPE_REGEX, "disease_type"),
            "Unknown",
        ),
        severity_level: extract(raw, tag_regex(&SEVERITY_LEVEL_REGEX, "severity_level"), "1"),
        affected_area_percentage: extract(
            raw,
            tag_regex(&AFFECTED_AREA_REGEX, "affected_area_percentage"),
            "0",
        ),
        crop_type: extract(raw, tag_regex(&CROP_TYPE_REGEX, "crop_type"), "Unknown"),
    }
}
