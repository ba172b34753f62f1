//! Search configuration, read from a JSON file and then overridden from the
//! command line.

use crate::error::Error;
use crate::evaluator::XorShiftStep;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Which predicate models one step of the target program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EvaluatorConfig {
    /// Interpret one pass of the loaded program.
    Machine,
    /// The hard-wired xor/shift formula.
    XorShift {
        #[serde(default = "default_first_mask")]
        first_mask: u32,
        #[serde(default = "default_second_mask")]
        second_mask: u32,
    },
}

fn default_first_mask() -> u32 {
    XorShiftStep::default().first_mask
}

fn default_second_mask() -> u32 {
    XorShiftStep::default().second_mask
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        EvaluatorConfig::Machine
    }
}

/// How to pick from the set of seeds that reproduce the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Selection {
    Minimum,
    Maximum,
    All,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Minimum
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::Minimum => write!(f, "minimum"),
            Selection::Maximum => write!(f, "maximum"),
            Selection::All => write!(f, "all"),
        }
    }
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minimum" | "min" => Ok(Selection::Minimum),
            "maximum" | "max" => Ok(Selection::Maximum),
            "all" => Ok(Selection::All),
            _ => Err(format!(
                "Unknown selection: '{}'. Valid options: minimum, maximum, all",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Branching factor. Must equal the evaluator's radix when it declares one.
    pub radix: u32,
    /// Fail once a level holds more candidates than this. Unlimited if unset.
    pub max_candidates: Option<usize>,
    /// Expand each level on the rayon thread pool.
    pub parallel: bool,
    pub evaluator: EvaluatorConfig,
    pub selection: Selection,
    /// Instruction budget for verifying a seed by full simulation.
    pub max_steps: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            radix: 8,
            max_candidates: None,
            parallel: false,
            evaluator: EvaluatorConfig::default(),
            selection: Selection::default(),
            max_steps: 1_000_000,
        }
    }
}

impl SearchConfig {
    pub fn from_file(path: &Path) -> Result<SearchConfig, Error> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Replace the xor/shift masks. Masks mean nothing to the machine
    /// evaluator, so giving one there is an error.
    pub fn override_masks(&mut self, first: Option<u32>, second: Option<u32>) -> Result<(), Error> {
        match &mut self.evaluator {
            EvaluatorConfig::XorShift { first_mask, second_mask } => {
                if let Some(mask) = first {
                    *first_mask = mask;
                }
                if let Some(mask) = second {
                    *second_mask = mask;
                }
                Ok(())
            }
            EvaluatorConfig::Machine if first.is_some() || second.is_some() => Err(Error::from(
                "--first-mask and --second-mask only apply to the xor-shift evaluator".to_string(),
            )),
            EvaluatorConfig::Machine => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config: SearchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn test_xor_shift_masks_default_individually() {
        let config: SearchConfig = serde_json::from_str(
            r#"{"evaluator": {"kind": "xor-shift", "second_mask": 6}, "max_candidates": 500}"#,
        )
        .unwrap();
        assert_eq!(
            config.evaluator,
            EvaluatorConfig::XorShift { first_mask: 3, second_mask: 6 }
        );
        assert_eq!(config.max_candidates, Some(500));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(serde_json::from_str::<SearchConfig>(r#"{"radx": 8}"#).is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search.json");
        fs::write(&path, r#"{"parallel": true, "selection": "all"}"#).unwrap();
        let config = SearchConfig::from_file(&path).unwrap();
        assert!(config.parallel);
        assert_eq!(config.selection, Selection::All);
        assert_eq!(config.radix, 8);

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(SearchConfig::from_file(&path), Err(Error::Json { .. })));

        let missing = dir.path().join("absent.json");
        assert!(matches!(SearchConfig::from_file(&missing), Err(Error::IO { .. })));
    }

    #[test]
    fn test_masks_only_override_xor_shift() {
        let mut config = SearchConfig {
            evaluator: EvaluatorConfig::XorShift { first_mask: 3, second_mask: 5 },
            ..SearchConfig::default()
        };
        config.override_masks(None, Some(1)).unwrap();
        assert_eq!(config.evaluator, EvaluatorConfig::XorShift { first_mask: 3, second_mask: 1 });

        let mut config = SearchConfig::default();
        assert!(config.override_masks(Some(2), None).is_err());
        assert!(config.override_masks(None, None).is_ok());
        assert_eq!(config.evaluator, EvaluatorConfig::Machine);
    }

    #[test]
    fn test_selection_from_str() {
        assert_eq!("MIN".parse::<Selection>().unwrap(), Selection::Minimum);
        assert_eq!("all".parse::<Selection>().unwrap(), Selection::All);
        assert!("best".parse::<Selection>().is_err());
    }
}
