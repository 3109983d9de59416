use crate::store::ValueStore;
use crate::text::Text;

/// Whether `token` starts with the indicator unit.
///
/// Any such token is a flag, so a negative number like `-5` can't be passed
/// as a value: it is read as a flag named `-5`.
pub fn is_flag<S: Text>(token: &S, indicator: S::Unit) -> bool {
    token.first_unit() == Some(indicator)
}

/// Walk `tokens` (program name already stripped) once and record every flag.
///
/// - a flag followed by a non-flag token takes that token as its value
/// - a flag that is last, or followed by another flag, is recorded with an
///   empty value
/// - a non-flag token where a flag was expected is skipped on its own
///
/// Each flag token is stored under `canonical(token)`. Pass a registry lookup
/// to fold short and long spellings together, or `Clone::clone` to keep
/// spellings as typed. Scanning never fails.
pub fn scan<S, F>(tokens: &[S], indicator: S::Unit, mut canonical: F) -> ValueStore<S>
where
    S: Text,
    F: FnMut(&S) -> S,
{
    let mut store = ValueStore::new();
    let mut i = 0usize;
    while i < tokens.len() {
        let token = &tokens[i];
        if !is_flag(token, indicator) {
            tracing::debug!(index = i, token = %token.to_utf8(), "skipping stray value");
            i += 1;
            continue;
        }

        let key = canonical(token);
        match tokens.get(i + 1) {
            Some(next) if !is_flag(next, indicator) => {
                store.record(key, next.clone());
                i += 2;
            }
            _ => {
                store.record(key, S::default());
                i += 1;
            }
        }
    }
    store
}
