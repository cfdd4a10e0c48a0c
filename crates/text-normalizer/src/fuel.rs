//! Fuel Classification

use crate::fold::fold;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed fuel taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelClass {
    Diesel,
    Petrol,
    Electric,
    Hybrid,
    PluginHybrid,
    MildHybrid,
    Cng,
    Lpg,
    /// Empty or unrecognized text; never used as a filter
    #[default]
    Unknown,
}

impl FuelClass {
    /// Canonical snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelClass::Diesel => "diesel",
            FuelClass::Petrol => "petrol",
            FuelClass::Electric => "electric",
            FuelClass::Hybrid => "hybrid",
            FuelClass::PluginHybrid => "plugin_hybrid",
            FuelClass::MildHybrid => "mild_hybrid",
            FuelClass::Cng => "cng",
            FuelClass::Lpg => "lpg",
            FuelClass::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != FuelClass::Unknown
    }
}

impl fmt::Display for FuelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alias matched against folded text
struct Alias {
    token: &'static str,
    /// Short aliases ("ev") must match a whole alphanumeric word
    whole_word: bool,
}

const fn sub(token: &'static str) -> Alias {
    Alias { token, whole_word: false }
}

const fn word(token: &'static str) -> Alias {
    Alias { token, whole_word: true }
}

/// Checked top to bottom; first hit wins. Specific hybrid markers and gas
/// conversions come first, then diesel and petrol engine codes, and only then
/// the generic hybrid/electric words ("2.0 TDI" must never become hybrid).
const ALIAS_TABLE: &[(FuelClass, &[Alias])] = &[
    (
        FuelClass::PluginHybrid,
        &[sub("plug-in"), sub("plugin"), sub("plug in"), word("phev")],
    ),
    (FuelClass::MildHybrid, &[sub("mild"), word("mhev")]),
    (
        FuelClass::Cng,
        &[sub("cng"), sub("zemni plyn"), sub("g-tec"), word("tgi"), sub("metan")],
    ),
    (FuelClass::Lpg, &[sub("lpg"), sub("autoplyn")]),
    (
        FuelClass::Diesel,
        &[
            sub("nafta"),
            sub("diesel"),
            sub("tdi"),
            sub("dci"),
            sub("cdti"),
            sub("crdi"),
            sub("hdi"),
            sub("multijet"),
            sub("d-4d"),
            word("cdi"),
            word("jtd"),
        ],
    ),
    (
        FuelClass::Petrol,
        &[
            sub("benzin"),
            sub("petrol"),
            sub("gasoline"),
            sub("tsi"),
            sub("mpi"),
            sub("fsi"),
            sub("ecoboost"),
            sub("puretech"),
            word("tce"),
            word("gdi"),
        ],
    ),
    (FuelClass::Hybrid, &[sub("hybrid"), word("hev")]),
    (
        FuelClass::Electric,
        &[sub("elektr"), sub("electric"), word("ev"), word("bev")],
    ),
];

/// Classify a free-text fuel or engine description.
///
/// Input is folded first, so "Benzín", "BENZIN" and "benzin" agree. Empty or
/// unrecognized text yields [`FuelClass::Unknown`].
pub fn classify_fuel(text: &str) -> FuelClass {
    let folded = fold(text);
    if folded.is_empty() {
        return FuelClass::Unknown;
    }

    ALIAS_TABLE
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|a| alias_matches(&folded, a)))
        .map(|(class, _)| *class)
        .unwrap_or(FuelClass::Unknown)
}

fn alias_matches(folded: &str, alias: &Alias) -> bool {
    if alias.whole_word {
        folded
            .split(|c: char| !c.is_alphanumeric())
            .any(|w| w == alias.token)
    } else {
        folded.contains(alias.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_codes() {
        assert_eq!(classify_fuel("TDI 2.0"), FuelClass::Diesel);
        assert_eq!(classify_fuel("1.6 dCi"), FuelClass::Diesel);
        assert_eq!(classify_fuel("TSI"), FuelClass::Petrol);
        assert_eq!(classify_fuel("1.0 MPI"), FuelClass::Petrol);
    }

    #[test]
    fn test_czech_spellings() {
        assert_eq!(classify_fuel("Nafta"), FuelClass::Diesel);
        assert_eq!(classify_fuel("Benzín"), FuelClass::Petrol);
        assert_eq!(classify_fuel("Elektro"), FuelClass::Electric);
        assert_eq!(classify_fuel("Zemní plyn"), FuelClass::Cng);
        assert_eq!(classify_fuel("LPG + benzín"), FuelClass::Lpg);
    }

    #[test]
    fn test_hybrid_variants() {
        assert_eq!(classify_fuel("Plug-in hybrid"), FuelClass::PluginHybrid);
        assert_eq!(classify_fuel("PHEV"), FuelClass::PluginHybrid);
        assert_eq!(classify_fuel("Mild hybrid"), FuelClass::MildHybrid);
        assert_eq!(classify_fuel("Hybrid"), FuelClass::Hybrid);
        assert_eq!(classify_fuel("2.0 TDI hybrid"), FuelClass::Diesel);
    }

    #[test]
    fn test_short_aliases_need_whole_word() {
        assert_eq!(classify_fuel("EV"), FuelClass::Electric);
        assert_eq!(classify_fuel("level"), FuelClass::Unknown);
        assert_eq!(classify_fuel("1.5 TGI G-TEC"), FuelClass::Cng);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify_fuel(""), FuelClass::Unknown);
        assert_eq!(classify_fuel("   "), FuelClass::Unknown);
        assert_eq!(classify_fuel("vodík"), FuelClass::Unknown);
        assert!(!classify_fuel("?").is_known());
    }

    #[test]
    fn test_canonical_names_classify_to_themselves() {
        let all = [
            FuelClass::Diesel,
            FuelClass::Petrol,
            FuelClass::Electric,
            FuelClass::Hybrid,
            FuelClass::PluginHybrid,
            FuelClass::MildHybrid,
            FuelClass::Cng,
            FuelClass::Lpg,
            FuelClass::Unknown,
        ];
        for class in all {
            assert_eq!(classify_fuel(class.as_str()), class);
        }
    }
}
