use crate::text::{Text, Transcode};

/// A declared flag.
///
/// The long name is the canonical key the flag's value is stored under. A flag
/// without a long name falls back to its short name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec<S: Text = String> {
    pub short: S,
    pub long: S,
    pub description: S,
    pub required: bool,
    /// Empty means "no default".
    pub default_value: S,
}

impl<S: Text> FlagSpec<S> {
    /// An optional flag without a default.
    pub fn new(short: &str, long: &str, description: &str) -> Self {
        Self {
            short: S::from_utf8(short),
            long: S::from_utf8(long),
            description: S::from_utf8(description),
            required: false,
            default_value: S::default(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = S::from_utf8(value);
        self
    }

    /// Canonical key: the long name, or the short name when no long name is set.
    pub fn key(&self) -> &S {
        if self.long.is_empty() {
            &self.short
        } else {
            &self.long
        }
    }

    /// Whether `name` is exactly one of this flag's spellings.
    pub fn matches(&self, name: &S) -> bool {
        (!self.long.is_empty() && &self.long == name)
            || (!self.short.is_empty() && &self.short == name)
    }

    fn collides_with(&self, other: &Self) -> bool {
        (!self.short.is_empty() && self.short == other.short)
            || (!self.long.is_empty() && self.long == other.long)
    }

    /// `short/long`, or whichever spelling exists.
    pub fn alias_pair(&self) -> String {
        match (self.short.is_empty(), self.long.is_empty()) {
            (false, false) => format!("{}/{}", self.short.to_utf8(), self.long.to_utf8()),
            (false, true) => self.short.to_utf8().into_owned(),
            _ => self.long.to_utf8().into_owned(),
        }
    }

    pub fn convert<T: Text, C: Transcode<S, T>>(&self, codec: &C) -> FlagSpec<T> {
        FlagSpec {
            short: codec.encode(&self.short),
            long: codec.encode(&self.long),
            description: codec.encode(&self.description),
            required: self.required,
            default_value: codec.encode(&self.default_value),
        }
    }
}

/// Declared flags in registration order.
///
/// No two entries share a short or a long name. The registry is meant to be
/// filled before parsing starts; it is never touched by a parse.
#[derive(Debug, Clone)]
pub struct Registry<S: Text = String> {
    flags: Vec<FlagSpec<S>>,
}

impl<S: Text> Default for Registry<S> {
    fn default() -> Self {
        Self { flags: Vec::new() }
    }
}

impl<S: Text> Registry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `spec` unless one of its names is already taken.
    ///
    /// Returns whether the spec was added. Duplicates are ignored, not errors,
    /// so registering the same flag twice is harmless.
    pub fn register(&mut self, spec: FlagSpec<S>) -> bool {
        if spec.short.is_empty() && spec.long.is_empty() {
            tracing::debug!("ignoring flag registration without a name");
            return false;
        }
        if let Some(existing) = self.flags.iter().find(|f| f.collides_with(&spec)) {
            tracing::debug!(
                flag = %spec.alias_pair(),
                existing = %existing.alias_pair(),
                "ignoring duplicate flag registration"
            );
            return false;
        }
        self.flags.push(spec);
        true
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlagSpec<S>> {
        self.flags.iter()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Required flags, in registration order.
    pub fn required(&self) -> impl Iterator<Item = &FlagSpec<S>> {
        self.flags.iter().filter(|f| f.required)
    }

    /// Optional flags, in registration order.
    pub fn optional(&self) -> impl Iterator<Item = &FlagSpec<S>> {
        self.flags.iter().filter(|f| !f.required)
    }

    /// Find the flag spelled `name` (short or long, exact match).
    pub fn find(&self, name: &S) -> Option<&FlagSpec<S>> {
        self.flags.iter().find(|f| f.matches(name))
    }

    /// Resolve a short or long spelling to the flag's canonical key.
    pub fn resolve(&self, name: &S) -> Option<&S> {
        self.find(name).map(FlagSpec::key)
    }

    pub fn convert<T: Text, C: Transcode<S, T>>(&self, codec: &C) -> Registry<T> {
        Registry {
            flags: self.flags.iter().map(|f| f.convert(codec)).collect(),
        }
    }
}

impl<'r, S: Text> IntoIterator for &'r Registry<S> {
    type Item = &'r FlagSpec<S>;
    type IntoIter = std::slice::Iter<'r, FlagSpec<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.flags.iter()
    }
}
