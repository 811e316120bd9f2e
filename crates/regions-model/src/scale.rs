//! Magnitude prefixes applied to series values.
//!
//! Agency tables describe magnitudes in free text ("Millions", "in thousands",
//! "bn"). Series are stored with a canonical SI prefix instead; the multiplier
//! for each prefix lives in [`STANDARD_SCALES`].

use serde::{Deserialize, Serialize};

/// Prefix used when a series carries no scale information.
pub const DEFAULT_SCALE: &str = "unit";

/// Canonical scale prefixes and their multipliers.
pub const STANDARD_SCALES: &[(&str, f64)] = &[
    ("nano", 1e-9),
    ("micro", 1e-6),
    ("milli", 1e-3),
    ("centi", 1e-2),
    ("deci", 1e-1),
    (DEFAULT_SCALE, 1.0),
    ("deca", 1e1),
    ("hecto", 1e2),
    ("kilo", 1e3),
    ("mega", 1e6),
    ("giga", 1e9),
    ("tera", 1e12),
    ("peta", 1e15),
];

/// A magnitude prefix with its numeric multiplier. Unique by `code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub code: String,
    pub multiplier: f64,
}

/// Returns the multiplier of a canonical prefix.
pub fn multiplier_for(code: &str) -> Option<f64> {
    STANDARD_SCALES
        .iter()
        .find(|(prefix, _)| prefix.eq_ignore_ascii_case(code.trim()))
        .map(|(_, multiplier)| *multiplier)
}

/// Maps a free-text scale description onto a canonical prefix.
///
/// Canonical prefixes map to themselves. Unknown spellings are returned
/// lowercased and trimmed so that callers can still store them.
pub fn normalize_scale(raw: &str) -> String {
    let cleaned = raw.trim().to_lowercase();
    let key = cleaned
        .trim_start_matches("in ")
        .trim_end_matches('s')
        .replace(',', "");
    let prefix = match key.as_str() {
        "" | "unit" | "one" | "none" | "1" => DEFAULT_SCALE,
        "ten" | "10" => "deca",
        "hundred" | "100" => "hecto",
        "thousand" | "k" | "000" | "1000" => "kilo",
        "million" | "m" | "mn" | "mio" | "1000000" => "mega",
        "billion" | "b" | "bn" | "bln" => "giga",
        "trillion" | "t" | "tn" => "tera",
        "quadrillion" => "peta",
        "tenth" => "deci",
        "hundredth" => "centi",
        "thousandth" => "milli",
        "millionth" => "micro",
        "billionth" => "nano",
        other => {
            if let Some((prefix, _)) = STANDARD_SCALES.iter().find(|(p, _)| *p == other) {
                *prefix
            } else if let Some((prefix, _)) = STANDARD_SCALES.iter().find(|(p, _)| *p == cleaned)
            {
                *prefix
            } else {
                return cleaned;
            }
        }
    };
    prefix.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_common_descriptions() {
        assert_eq!(normalize_scale("Millions"), "mega");
        assert_eq!(normalize_scale("in thousands"), "kilo");
        assert_eq!(normalize_scale("Billions"), "giga");
        assert_eq!(normalize_scale("Units"), "unit");
        assert_eq!(normalize_scale("bn"), "giga");
        assert_eq!(normalize_scale(" mega "), "mega");
        assert_eq!(normalize_scale("kilo"), "kilo");
    }

    #[test]
    fn unknown_scales_pass_through_lowercased() {
        assert_eq!(normalize_scale("Percent of GDP"), "percent of gdp");
    }

    #[test]
    fn multipliers_for_canonical_prefixes() {
        assert_eq!(multiplier_for("mega"), Some(1e6));
        assert_eq!(multiplier_for("unit"), Some(1.0));
        assert_eq!(multiplier_for("Millions"), None);
    }
}
