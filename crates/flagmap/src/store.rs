use indexmap::IndexMap;

use crate::error::{ParseError, ParseResult};
use crate::text::{Text, WideString};
use crate::value::FlagValue;

/// Candidate spellings for a lookup, tried in order.
///
/// Accepts a single name or several names via array/slice.
pub trait FlagNames<S: Text> {
    fn names(self) -> Vec<S>;
}

impl<S: Text> FlagNames<S> for &str {
    fn names(self) -> Vec<S> {
        vec![S::from_utf8(self)]
    }
}

impl<S: Text> FlagNames<S> for &String {
    fn names(self) -> Vec<S> {
        vec![S::from_utf8(self)]
    }
}

impl<S: Text> FlagNames<S> for &[&str] {
    fn names(self) -> Vec<S> {
        self.iter().map(|s| S::from_utf8(s)).collect()
    }
}

impl<S: Text> FlagNames<S> for &[String] {
    fn names(self) -> Vec<S> {
        self.iter().map(|s| S::from_utf8(s)).collect()
    }
}

impl<S: Text, const N: usize> FlagNames<S> for [&str; N] {
    fn names(self) -> Vec<S> {
        self.into_iter().map(S::from_utf8).collect()
    }
}

impl FlagNames<WideString> for &WideString {
    fn names(self) -> Vec<WideString> {
        vec![self.clone()]
    }
}

impl FlagNames<WideString> for &[WideString] {
    fn names(self) -> Vec<WideString> {
        self.to_vec()
    }
}

pub(crate) fn display_names<S: Text>(names: &[S]) -> Vec<String> {
    names.iter().map(|n| n.to_utf8().into_owned()).collect()
}

/// What the scanner recorded for one flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueEntry<S: Text = String> {
    /// Set once the flag appears on the command line, with or without a value.
    pub seen: bool,
    /// The token that followed the flag; empty when none did.
    pub raw: S,
}

/// Canonical key -> recorded value, in first-seen order.
///
/// A missing key means the flag was never seen. The store is filled by one
/// scan and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueStore<S: Text = String> {
    entries: IndexMap<S, ValueEntry<S>>,
}

impl<S: Text> Default for ValueStore<S> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<S: Text> ValueStore<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as seen with `raw` as its value. A later call for the same
    /// key replaces the value.
    pub fn record(&mut self, key: S, raw: S) {
        tracing::trace!(key = %key.to_utf8(), raw = %raw.to_utf8(), "recorded flag");
        self.entries.insert(key, ValueEntry { seen: true, raw });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, S, ValueEntry<S>> {
        self.entries.iter()
    }

    pub fn entry(&self, key: &S) -> Option<&ValueEntry<S>> {
        self.entries.get(key)
    }

    pub(crate) fn seen_raw(&self, key: &S) -> Option<&S> {
        self.entries.get(key).filter(|e| e.seen).map(|e| &e.raw)
    }

    /// Whether any of `names` was seen.
    pub fn has<N: FlagNames<S>>(&self, names: N) -> bool {
        names.names().iter().any(|n| self.seen_raw(n).is_some())
    }

    /// Raw value of the first of `names` that was seen.
    pub fn raw<N: FlagNames<S>>(&self, names: N) -> ParseResult<&S> {
        let names = names.names();
        self.first_seen(&names)
            .map(|(_, raw)| raw)
            .ok_or_else(|| ParseError::ArgumentNotFound {
                candidates: display_names(&names),
            })
    }

    /// Typed value of the first of `names` that was seen.
    ///
    /// An empty raw value yields `T::default()`.
    pub fn get<T, N>(&self, names: N) -> ParseResult<T>
    where
        T: FlagValue + Default,
        N: FlagNames<S>,
    {
        let names = names.names();
        match self.first_seen(&names) {
            Some((name, raw)) => coerce(name, raw),
            None => Err(ParseError::ArgumentNotFound {
                candidates: display_names(&names),
            }),
        }
    }

    /// Like `get`, but `default` stands in when the flag is absent or has no value.
    pub fn get_or<T, N>(&self, default: T, names: N) -> ParseResult<T>
    where
        T: FlagValue,
        N: FlagNames<S>,
    {
        let names = names.names();
        match self.first_seen(&names) {
            Some((name, raw)) if !raw.is_empty() => coerce_non_empty(name, raw),
            _ => Ok(default),
        }
    }

    fn first_seen<'n>(&self, names: &'n [S]) -> Option<(&'n S, &S)> {
        names
            .iter()
            .find_map(|n| self.seen_raw(n).map(|raw| (n, raw)))
    }

    /// Re-encode every key and value into another representation.
    ///
    /// The result is an independent copy. `encode` must not map two distinct
    /// keys to the same output.
    pub fn convert<T, F>(&self, mut encode: F) -> ValueStore<T>
    where
        T: Text,
        F: FnMut(&S) -> T,
    {
        let entries = self
            .entries
            .iter()
            .map(|(k, e)| {
                (
                    encode(k),
                    ValueEntry {
                        seen: e.seen,
                        raw: encode(&e.raw),
                    },
                )
            })
            .collect::<IndexMap<_, _>>();
        debug_assert_eq!(entries.len(), self.entries.len(), "transcoding merged keys");
        ValueStore { entries }
    }
}

impl<'s, S: Text> IntoIterator for &'s ValueStore<S> {
    type Item = (&'s S, &'s ValueEntry<S>);
    type IntoIter = indexmap::map::Iter<'s, S, ValueEntry<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Convert `raw` to `T`, mapping an empty value to `T::default()`.
pub(crate) fn coerce<T, S>(flag: &S, raw: &S) -> ParseResult<T>
where
    T: FlagValue + Default,
    S: Text,
{
    if raw.is_empty() {
        return Ok(T::default());
    }
    coerce_non_empty(flag, raw)
}

pub(crate) fn coerce_non_empty<T, S>(flag: &S, raw: &S) -> ParseResult<T>
where
    T: FlagValue,
    S: Text,
{
    let text = raw.to_utf8();
    T::parse_flag(&text).map_err(|message| ParseError::ParseFailure {
        flag: flag.to_utf8().into_owned(),
        raw: text.to_string(),
        target: std::any::type_name::<T>(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupExt;
    use crate::text::{Transcode, Utf16};

    fn store(pairs: &[(&str, &str)]) -> ValueStore {
        let mut s = ValueStore::new();
        for (k, v) in pairs {
            s.record(k.to_string(), v.to_string());
        }
        s
    }

    #[test]
    fn has_and_raw_try_candidates_in_order() {
        let s = store(&[("-o", "file.txt"), ("--output", "other.txt"), ("-q", "")]);
        assert!(s.has("-q"));
        assert!(s.has(["--missing", "-o"]));
        assert!(!s.has("--doesnotexist"));
        assert_eq!(s.raw(["--output", "-o"]).unwrap(), "other.txt");
        assert_eq!(s.raw(["-o", "--output"]).unwrap(), "file.txt");
        assert_eq!(s.raw("-q").unwrap(), "");
    }

    #[test]
    fn raw_miss_reports_all_candidates() {
        let s = store(&[("-i", "10")]);
        let err = s.raw(["-x", "--xname"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::ArgumentNotFound {
                candidates: vec!["-x".to_string(), "--xname".to_string()]
            }
        );
        assert_eq!(s.raw("-x").map(String::clone).or_default_if_missing().unwrap(), "");
    }

    #[test]
    fn typed_get_uses_zero_value_for_empty_raw() {
        let s = store(&[("-i", "20"), ("-q", ""), ("-r", "0.5"), ("-b", "true")]);
        assert_eq!(s.get::<i32, _>("-i").unwrap(), 20);
        assert_eq!(s.get::<i32, _>("-q").unwrap(), 0);
        assert_eq!(s.get::<String, _>("-q").unwrap(), "");
        assert_eq!(s.get::<f64, _>("-r").unwrap(), 0.5);
        assert!(s.get::<bool, _>("-b").unwrap());
    }

    #[test]
    fn bool_values_accept_one_and_zero() {
        let s = store(&[("-v", "1"), ("-w", "0"), ("-x", "yes")]);
        assert!(s.get::<bool, _>("-v").unwrap());
        assert!(!s.get::<bool, _>("-w").unwrap());
        assert!(matches!(
            s.get::<bool, _>("-x"),
            Err(ParseError::ParseFailure { target: "bool", .. })
        ));
    }

    #[test]
    fn typed_get_surfaces_unparsable_values() {
        let s = store(&[("-i", "abc")]);
        match s.get::<i32, _>("-i") {
            Err(ParseError::ParseFailure { flag, raw, target, .. }) => {
                assert_eq!(flag, "-i");
                assert_eq!(raw, "abc");
                assert_eq!(target, "i32");
            }
            other => panic!("expected ParseFailure, got: {other:?}"),
        }
    }

    #[test]
    fn get_or_prefers_caller_default_when_absent_or_empty() {
        let s = store(&[("-i", "7"), ("-q", "")]);
        assert_eq!(s.get_or(5, "-i").unwrap(), 7);
        assert_eq!(s.get_or(5, "-q").unwrap(), 5);
        assert_eq!(s.get_or(5, "--nope").unwrap(), 5);
        assert_eq!(s.get_or("x".to_string(), "--nope").unwrap(), "x");
    }

    #[test]
    fn lookups_do_not_mutate() {
        let s = store(&[("-i", "7")]);
        let before = s.clone();
        let _ = s.get::<i32, _>(["-x", "-i"]);
        let _ = s.get_or(1u8, "-y");
        let _ = s.raw("-z");
        assert_eq!(s, before);
    }

    #[test]
    fn later_record_replaces_value() {
        let mut s = store(&[("-i", "1")]);
        s.record("-i".to_string(), "2".to_string());
        assert_eq!(s.len(), 1);
        assert_eq!(s.raw("-i").unwrap(), "2");
    }

    #[test]
    fn convert_round_trips_through_wide() {
        let s = store(&[("--delay", "10ms"), ("--name", "Zoë"), ("-q", "")]);
        let wide: ValueStore<WideString> = s.convert(|k| Utf16.encode(k));
        assert_eq!(wide.len(), s.len());
        assert_eq!(
            wide.raw(&WideString::from("--name")).unwrap(),
            &WideString::from("Zoë")
        );
        assert!(wide.has("-q"));

        let back: ValueStore<String> = wide.convert(|w| Utf16.decode(w));
        assert_eq!(back, s);
        let keys: Vec<&str> = back.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["--delay", "--name", "-q"]);
    }
}
