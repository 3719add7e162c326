//! Chart Suggestion
//!
//! Scans an assistant reply for numeric content and proposes a chart for the
//! analyst panel to render. Replies that mention a share breakdown become a
//! pie chart; replies with year references become a line series. Text with
//! no usable numbers produces no suggestion.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Four-digit years between 1900 and 2099
static YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("Failed to compile year pattern"));

/// Integers and decimals with an optional percent suffix
static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+(?:\.\d+)?%?\b").expect("Failed to compile number pattern"));

/// Keywords that mark a reply as a share breakdown
const PIE_KEYWORDS: [&str; 2] = ["distribution", "percentage"];

const MAX_PIE_SLICES: usize = 4;
const MAX_LINE_POINTS: usize = 5;

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub year: String,
    pub value: f64,
}

/// Chart proposed for a piece of reply text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChartSuggestion {
    Pie { slices: Vec<PieSlice> },
    Line { points: Vec<LinePoint> },
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Propose a chart for the given reply text, if it carries enough data.
///
/// A suggestion needs both a year reference and at least one number in the
/// text. Share-breakdown wording wins a pie chart built from the first few
/// numbers; anything else becomes a line series over the mentioned years.
pub fn suggest_chart(text: &str) -> Option<ChartSuggestion> {
    if !text.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let years: Vec<&str> = YEAR_RE.find_iter(text).map(|m| m.as_str()).collect();
    let numbers: Vec<&str> = NUMBER_RE.find_iter(text).map(|m| m.as_str()).collect();

    if years.is_empty() || numbers.is_empty() {
        return None;
    }

    let lowered = text.to_lowercase();
    if PIE_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        let slices = numbers
            .iter()
            .take(MAX_PIE_SLICES)
            .enumerate()
            .map(|(i, raw)| PieSlice {
                name: format!("Category {}", i + 1),
                value: parse_value(raw),
            })
            .collect();
        return Some(ChartSuggestion::Pie { slices });
    }

    let points = years
        .iter()
        .take(MAX_LINE_POINTS)
        .enumerate()
        .map(|(i, year)| LinePoint {
            year: year.to_string(),
            value: numbers.get(i).map(|raw| parse_value(raw)).unwrap_or(0.0),
        })
        .collect();
    Some(ChartSuggestion::Line { points })
}

fn parse_value(raw: &str) -> f64 {
    raw.trim_end_matches('%').parse().unwrap_or(0.0)
}

// ============================================================================
// TESTS
// ============================================================================
