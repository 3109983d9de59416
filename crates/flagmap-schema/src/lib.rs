//! Flag declarations stored as JSON.
//!
//! A schema file lists the flags a program accepts so they can be registered
//! without code:
//!
//! ```json
//! {
//!   "name": "demo",
//!   "flags": [
//!     {
//!       "short": "-d",
//!       "long": "--delay",
//!       "description": "specifies delay",
//!       "required": true,
//!       "default": "10ms"
//!     }
//!   ]
//! }
//! ```

use flagmap::{FlagSpec, Parser, ParserConfig};
use serde::{Deserialize, Serialize};

/// File name looked up when no schema path is given.
pub const DEFAULT_SCHEMA_NAME: &str = "flagmap.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct FlagDecl {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub short: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub long: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl FlagDecl {
    pub fn to_spec(&self) -> FlagSpec {
        let mut spec: FlagSpec = FlagSpec::new(&self.short, &self.long, &self.description);
        spec.required = self.required;
        if let Some(default) = &self.default {
            spec = spec.with_default(default);
        }
        spec
    }

    pub fn from_spec(spec: &FlagSpec) -> Self {
        Self {
            short: spec.short.clone(),
            long: spec.long.clone(),
            description: spec.description.clone(),
            required: spec.required,
            default: (!spec.default_value.is_empty()).then(|| spec.default_value.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Schema {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    /// Flag indicator character (default `-`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicator: Option<char>,
    /// Disable the built-in `-h/--help` flag.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_builtin_help: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagDecl>,
}

impl Schema {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn config(&self) -> ParserConfig {
        ParserConfig {
            indicator: self.indicator.unwrap_or('-'),
            builtin_help: !self.no_builtin_help,
        }
    }

    /// A parser with every declared flag registered, in file order.
    ///
    /// Declarations that collide with an earlier one are skipped, the same as
    /// `Parser::register`.
    pub fn build_parser(&self) -> Parser {
        let mut parser = Parser::with_config(self.config());
        for decl in &self.flags {
            parser.register(decl.to_spec());
        }
        parser
    }

    /// Schema describing the flags already registered on `parser`.
    pub fn from_parser(name: &str, parser: &Parser) -> Self {
        Self {
            name: name.to_string(),
            summary: String::new(),
            indicator: Some(parser.config().indicator),
            no_builtin_help: !parser.config().builtin_help,
            flags: parser.registry().iter().map(FlagDecl::from_spec).collect(),
        }
    }

    /// The delay/iterations example written by `flagmap init`.
    pub fn example(name: &str) -> Self {
        Self {
            name: name.to_string(),
            summary: "Example flag schema".to_string(),
            indicator: None,
            no_builtin_help: false,
            flags: vec![
                FlagDecl {
                    short: "-d".to_string(),
                    long: "--delay".to_string(),
                    description: "specifies delay".to_string(),
                    required: true,
                    default: Some("10ms".to_string()),
                },
                FlagDecl {
                    short: "-i".to_string(),
                    long: "--iterations".to_string(),
                    description: "Specifies iterations of loop".to_string(),
                    required: false,
                    default: Some("20".to_string()),
                },
            ],
        }
    }
}
