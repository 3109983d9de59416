//! Flag registration, argv scanning and typed lookup.
//!
//! The crate is split along the life of a single parse:
//! - `registry` holds declared flags (short/long aliases, description,
//!   required, default) and resolves either spelling to one canonical key
//! - `scan` walks the raw tokens once and fills a `ValueStore`
//! - `store` answers presence, raw and typed lookups
//! - `parser` ties the three together and validates required flags
//! - `help` renders the registry as two column-aligned blocks
//! - `value` converts raw values to typed ones (`bool` also takes `1`/`0`)
//!
//! Lookups can also be done without any registration ("ad-hoc" mode): scan
//! the tokens and ask the store for every spelling you care about.
//!
//! ```
//! use flagmap::{FlagSpec, Parser};
//!
//! let mut parser: Parser = Parser::new();
//! parser.register(
//!     FlagSpec::new("-d", "--delay", "specifies delay")
//!         .required()
//!         .with_default("10ms"),
//! );
//! parser.register(FlagSpec::new("-i", "--iterations", "iterations of loop").with_default("20"));
//!
//! let argv: Vec<String> = ["-d", "10ms", "-i", "20"].iter().map(|s| s.to_string()).collect();
//! parser.parse(&argv).unwrap();
//!
//! assert_eq!(parser.get::<String, _>("-d").unwrap(), "10ms");
//! assert_eq!(parser.get::<i32, _>("--iterations").unwrap(), 20);
//! ```
//!
//! A `Parser` owns its registry and store. There is no internal locking; share
//! one across threads only behind your own synchronization.

pub mod error;
pub mod help;
pub mod parser;
pub mod registry;
pub mod scan;
pub mod store;
pub mod text;
pub mod value;

pub use error::{LookupExt, ParseError, ParseResult};
pub use help::HelpText;
pub use parser::{ParseOutcome, Parser, ParserConfig};
pub use registry::{FlagSpec, Registry};
pub use scan::scan;
pub use store::{FlagNames, ValueEntry, ValueStore};
pub use text::{Text, Transcode, Utf16, WideString};
pub use value::FlagValue;
