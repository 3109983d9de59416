use crate::error::{ParseError, ParseResult};
use crate::help::{self, HelpText};
use crate::registry::{FlagSpec, Registry};
use crate::scan::scan;
use crate::store::{FlagNames, ValueStore, coerce, coerce_non_empty, display_names};
use crate::text::{Text, Transcode};
use crate::value::FlagValue;

const HELP_SHORT: &str = "-h";
const HELP_LONG: &str = "--help";
const HELP_DESCRIPTION: &str = "Generates this message";

#[derive(Debug, Clone)]
pub struct ParserConfig<S: Text = String> {
    /// First code unit of every flag token.
    ///
    /// `Parser::convert` carries only the first code unit of the encoded
    /// indicator across, so an indicator that needs more than one unit in the
    /// target representation (a non-BMP char moved to `WideString`) is
    /// replaced by the target's default indicator.
    pub indicator: S::Unit,
    /// Recognize `-h/--help` unless the caller registers either spelling.
    pub builtin_help: bool,
}

impl<S: Text> Default for ParserConfig<S> {
    fn default() -> Self {
        Self {
            indicator: S::DEFAULT_INDICATOR,
            builtin_help: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed,
    /// `-h/--help` was given. Required flags were not checked.
    Help(String),
}

/// A registry plus the values from the most recent parse.
///
/// Register flags first, then call `parse` once per argv. Lookups accept any
/// spelling: registered names are folded to the flag's long name, anything
/// else is looked up as typed.
#[derive(Debug, Clone)]
pub struct Parser<S: Text = String> {
    config: ParserConfig<S>,
    registry: Registry<S>,
    help_flag: Option<FlagSpec<S>>,
    store: ValueStore<S>,
    /// Set by a parse that returned `Ok`. Registered defaults apply only then.
    parsed: bool,
}

impl<S: Text> Default for Parser<S> {
    fn default() -> Self {
        Self::with_config(ParserConfig::default())
    }
}

impl<S: Text> Parser<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig<S>) -> Self {
        let help_flag = config
            .builtin_help
            .then(|| FlagSpec::new(HELP_SHORT, HELP_LONG, HELP_DESCRIPTION));
        Self {
            config,
            registry: Registry::new(),
            help_flag,
            store: ValueStore::new(),
            parsed: false,
        }
    }

    pub fn config(&self) -> &ParserConfig<S> {
        &self.config
    }

    pub fn registry(&self) -> &Registry<S> {
        &self.registry
    }

    /// Values recorded by the last successful parse.
    pub fn store(&self) -> &ValueStore<S> {
        &self.store
    }

    pub fn into_store(self) -> ValueStore<S> {
        self.store
    }

    /// Declare a flag. Returns `false` (and changes nothing) when its short or
    /// long name is already registered.
    ///
    /// Registering `-h` or `--help` replaces the built-in help flag.
    pub fn register(&mut self, spec: FlagSpec<S>) -> bool {
        let added = self.registry.register(spec);
        if added {
            let takes_help = self.registry.iter().last().is_some_and(|s| {
                s.matches(&S::from_utf8(HELP_SHORT)) || s.matches(&S::from_utf8(HELP_LONG))
            });
            if takes_help {
                self.help_flag = None;
            }
        }
        added
    }

    /// Find the declared flag spelled `name`, including the built-in help flag.
    pub fn spec(&self, name: &S) -> Option<&FlagSpec<S>> {
        self.registry
            .find(name)
            .or_else(|| self.help_flag.as_ref().filter(|h| h.matches(name)))
    }

    fn canonical(&self, name: &S) -> S {
        self.spec(name)
            .map(|s| s.key().clone())
            .unwrap_or_else(|| name.clone())
    }

    /// Scan `tokens` (without the program name) and check required flags.
    ///
    /// Replaces the values of any previous parse. On `MissingRequiredArgument`
    /// the store is left empty and registered defaults stop applying, so no
    /// lookup succeeds until the next successful parse.
    pub fn parse(&mut self, tokens: &[S]) -> ParseResult<ParseOutcome> {
        self.store = ValueStore::new();
        self.parsed = false;
        let store = scan(tokens, self.config.indicator, |t| self.canonical(t));

        if let Some(help_flag) = &self.help_flag {
            if store.seen_raw(help_flag.key()).is_some() {
                self.store = store;
                self.parsed = true;
                return Ok(ParseOutcome::Help(self.help_text().to_string()));
            }
        }

        for spec in self.registry.required() {
            if store.seen_raw(spec.key()).is_none() {
                tracing::debug!(flag = %spec.alias_pair(), "required flag not given");
                return Err(ParseError::MissingRequiredArgument(
                    spec.key().to_utf8().into_owned(),
                ));
            }
        }

        self.store = store;
        self.parsed = true;
        Ok(ParseOutcome::Parsed)
    }

    fn resolve_all<N: FlagNames<S>>(&self, names: N) -> (Vec<S>, Vec<S>) {
        let typed = names.names();
        let keys = typed.iter().map(|n| self.canonical(n)).collect();
        (typed, keys)
    }

    /// Registered non-empty default of the first candidate that has one.
    ///
    /// `None` unless the last parse succeeded.
    fn registered_default(&self, typed: &[S]) -> Option<(&S, &S)> {
        if !self.parsed {
            return None;
        }
        typed.iter().find_map(|n| {
            self.spec(n)
                .filter(|s| !s.default_value.is_empty())
                .map(|s| (s.key(), &s.default_value))
        })
    }

    /// Whether any of `names` was seen. Registered defaults don't count.
    pub fn has<N: FlagNames<S>>(&self, names: N) -> bool {
        let (_, keys) = self.resolve_all(names);
        keys.iter().any(|k| self.store.seen_raw(k).is_some())
    }

    /// Raw value of the first of `names` that was seen, falling back to a
    /// registered default.
    pub fn raw<N: FlagNames<S>>(&self, names: N) -> ParseResult<&S> {
        let (typed, keys) = self.resolve_all(names);
        if let Some(raw) = keys.iter().find_map(|k| self.store.seen_raw(k)) {
            return Ok(raw);
        }
        self.registered_default(&typed)
            .map(|(_, v)| v)
            .ok_or_else(|| ParseError::ArgumentNotFound {
                candidates: display_names(&typed),
            })
    }

    /// Typed value of the first of `names` that was seen.
    ///
    /// A flag seen without a value yields `T::default()`. An unseen flag falls
    /// back to its registered default, then to `ArgumentNotFound`.
    pub fn get<T, N>(&self, names: N) -> ParseResult<T>
    where
        T: FlagValue + Default,
        N: FlagNames<S>,
    {
        let (typed, keys) = self.resolve_all(names);
        for key in &keys {
            if let Some(raw) = self.store.seen_raw(key) {
                return coerce(key, raw);
            }
        }
        match self.registered_default(&typed) {
            Some((key, value)) => coerce(key, value),
            None => Err(ParseError::ArgumentNotFound {
                candidates: display_names(&typed),
            }),
        }
    }

    /// Like `get`, but `default` is used whenever no non-empty value was seen.
    ///
    /// The caller's default takes precedence over a registered one.
    pub fn get_or<T, N>(&self, default: T, names: N) -> ParseResult<T>
    where
        T: FlagValue,
        N: FlagNames<S>,
    {
        let (_, keys) = self.resolve_all(names);
        for key in &keys {
            if let Some(raw) = self.store.seen_raw(key) {
                if raw.is_empty() {
                    return Ok(default);
                }
                return coerce_non_empty(key, raw);
            }
        }
        Ok(default)
    }

    /// Overwrite the value of a registered flag and mark it as seen.
    pub fn set<N: FlagNames<S>>(&mut self, name: N, value: S) -> ParseResult<()> {
        let typed = name.names();
        let key = typed
            .iter()
            .find_map(|n| self.spec(n).map(|s| s.key().clone()))
            .ok_or_else(|| ParseError::ArgumentNotFound {
                candidates: display_names(&typed),
            })?;
        self.store.record(key, value);
        Ok(())
    }

    /// Usage text for every registered flag, plus the built-in help flag.
    pub fn help_text(&self) -> HelpText {
        help::render(self.registry.iter().chain(self.help_flag.iter()))
    }

    /// Deep copy of this parser in another text representation.
    ///
    /// See `ParserConfig::indicator` for how the indicator is carried over.
    pub fn convert<T, C>(&self, codec: &C) -> Parser<T>
    where
        T: Text,
        C: Transcode<S, T>,
    {
        let encoded = codec.encode(&S::from_unit(self.config.indicator));
        let indicator = match encoded.first_unit() {
            Some(unit) if T::from_unit(unit) == encoded => unit,
            _ => {
                tracing::debug!(
                    indicator = ?self.config.indicator,
                    "indicator is not a single unit after conversion, using the default"
                );
                T::DEFAULT_INDICATOR
            }
        };
        Parser {
            config: ParserConfig {
                indicator,
                builtin_help: self.config.builtin_help,
            },
            registry: self.registry.convert(codec),
            help_flag: self.help_flag.as_ref().map(|h| h.convert(codec)),
            store: self.store.convert(|s| codec.encode(s)),
            parsed: self.parsed,
        }
    }
}
