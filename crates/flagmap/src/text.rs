//! Character representations a parser can operate on.
//!
//! `String` is the everyday representation. `WideString` holds UTF-16 code
//! units for callers whose argv arrives as wide strings. A parser built for one
//! representation can be moved to another through a `Transcode` codec.

use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;

/// Owned text usable as flag names, keys and raw values.
pub trait Text: Clone + Eq + Hash + Default + fmt::Debug {
    /// A single code unit (`char` for UTF-8 strings, `u16` for wide strings).
    type Unit: Copy + Eq + fmt::Debug;

    /// Code unit that marks a flag token unless configured otherwise.
    const DEFAULT_INDICATOR: Self::Unit;

    fn first_unit(&self) -> Option<Self::Unit>;

    fn is_empty(&self) -> bool;

    /// UTF-8 view, used for value coercion, help output and error messages.
    fn to_utf8(&self) -> Cow<'_, str>;

    fn from_utf8(s: &str) -> Self;

    fn from_unit(unit: Self::Unit) -> Self;

    /// Display width in characters.
    fn width(&self) -> usize {
        self.to_utf8().chars().count()
    }
}

impl Text for String {
    type Unit = char;

    const DEFAULT_INDICATOR: char = '-';

    fn first_unit(&self) -> Option<char> {
        self.chars().next()
    }

    fn is_empty(&self) -> bool {
        String::is_empty(self)
    }

    fn to_utf8(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }

    fn from_utf8(s: &str) -> Self {
        s.to_string()
    }

    fn from_unit(unit: char) -> Self {
        unit.to_string()
    }
}

/// A string of UTF-16 code units.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WideString(Vec<u16>);

impl WideString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_units(units: Vec<u16>) -> Self {
        Self(units)
    }

    pub fn as_units(&self) -> &[u16] {
        self.0.as_slice()
    }

    pub fn into_units(self) -> Vec<u16> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode to UTF-8, replacing unpaired surrogates with U+FFFD.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.0)
    }
}

impl From<&str> for WideString {
    fn from(s: &str) -> Self {
        Self(s.encode_utf16().collect())
    }
}

impl From<Vec<u16>> for WideString {
    fn from(units: Vec<u16>) -> Self {
        Self(units)
    }
}

impl fmt::Debug for WideString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{:?}", self.to_string_lossy())
    }
}

impl fmt::Display for WideString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl Text for WideString {
    type Unit = u16;

    const DEFAULT_INDICATOR: u16 = b'-' as u16;

    fn first_unit(&self) -> Option<u16> {
        self.0.first().copied()
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn to_utf8(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string_lossy())
    }

    fn from_utf8(s: &str) -> Self {
        Self::from(s)
    }

    fn from_unit(unit: u16) -> Self {
        Self(vec![unit])
    }
}

/// Converts text between two representations.
///
/// Implementations are expected to be lossless for the inputs they are given:
/// `decode(encode(a)) == a`.
pub trait Transcode<A, B> {
    fn encode(&self, a: &A) -> B;
    fn decode(&self, b: &B) -> A;
}

/// UTF-8 <-> UTF-16 codec.
///
/// Lossless for any `String`. Wide input with unpaired surrogates is decoded
/// lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf16;

impl Transcode<String, WideString> for Utf16 {
    fn encode(&self, a: &String) -> WideString {
        WideString::from(a.as_str())
    }

    fn decode(&self, b: &WideString) -> String {
        b.to_string_lossy()
    }
}

impl Transcode<WideString, String> for Utf16 {
    fn encode(&self, a: &WideString) -> String {
        a.to_string_lossy()
    }

    fn decode(&self, b: &String) -> WideString {
        WideString::from(b.as_str())
    }
}
