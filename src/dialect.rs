//! The two input dialects the workbench understands.
//!
//! A dialect decides which canonical example text a fresh session starts
//! from and which `language` value is sent to the analysis engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const FLEX_EXAMPLE: &str = "%%\n[0-9]+    { return NUMBER; }\n[a-z]+    { return WORD; }\n%%";

const BISON_EXAMPLE: &str = "%token NUMBER WORD\n%%\nexpression:\n    expression '+' term { $$ = $1 + $3; }\n  | term { $$ = $1; }\n  ;\n";

/// Scanner-rule (flex) or grammar-rule (bison) source.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Flex,
    Bison,
}

impl Dialect {
    /// Wire name, as sent in the `language` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Flex => "flex",
            Dialect::Bison => "bison",
        }
    }

    /// Human-readable name for toggles and titles.
    pub fn label(self) -> &'static str {
        match self {
            Dialect::Flex => "Flex",
            Dialect::Bison => "Bison",
        }
    }

    /// Canonical example text a session resets to when switching to this dialect.
    pub fn example_source(self) -> &'static str {
        match self {
            Dialect::Flex => FLEX_EXAMPLE,
            Dialect::Bison => BISON_EXAMPLE,
        }
    }

    /// The other dialect of the pair.
    pub fn toggle(self) -> Dialect {
        match self {
            Dialect::Flex => Dialect::Bison,
            Dialect::Bison => Dialect::Flex,
        }
    }

    /// Guess the dialect from a file extension.
    pub fn from_path(path: &Path) -> Option<Dialect> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "l" | "lex" | "flex" => Some(Dialect::Flex),
            "y" | "yy" | "ypp" | "bison" => Some(Dialect::Bison),
            _ => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flex" => Ok(Dialect::Flex),
            "bison" => Ok(Dialect::Bison),
            other => Err(format!("unknown dialect `{other}` (expected flex or bison)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("scanner.l", Some(Dialect::Flex))]
    #[case("scanner.LEX", Some(Dialect::Flex))]
    #[case("grammar.y", Some(Dialect::Bison))]
    #[case("grammar.ypp", Some(Dialect::Bison))]
    #[case("notes.txt", None)]
    #[case("Makefile", None)]
    fn test_from_path(#[case] path: &str, #[case] expected: Option<Dialect>) {
        assert_eq!(Dialect::from_path(Path::new(path)), expected);
    }

    #[test]
    fn test_toggle_round_trip() {
        assert_eq!(Dialect::Flex.toggle(), Dialect::Bison);
        assert_eq!(Dialect::Flex.toggle().toggle(), Dialect::Flex);
    }

    #[test]
    fn test_wire_name() {
        assert_eq!(serde_json::to_string(&Dialect::Bison).unwrap(), "\"bison\"");
        assert_eq!("Flex".parse::<Dialect>(), Ok(Dialect::Flex));
        assert!("yacc".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_examples_differ_per_dialect() {
        assert!(Dialect::Flex.example_source().starts_with("%%"));
        assert!(Dialect::Bison.example_source().starts_with("%token"));
    }
}
