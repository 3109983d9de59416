use std::path::PathBuf;

/// Types a raw flag value can be converted to.
///
/// Everything except `bool` defers to `FromStr`. Booleans also accept `1` and
/// `0`, so `-v 1` and `-v true` mean the same thing.
pub trait FlagValue: Sized {
    fn parse_flag(raw: &str) -> Result<Self, String>;
}

macro_rules! from_str_flag_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FlagValue for $ty {
                fn parse_flag(raw: &str) -> Result<Self, String> {
                    raw.parse::<$ty>().map_err(|err| err.to_string())
                }
            }
        )*
    };
}

from_str_flag_value!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char, String,
    PathBuf,
);

impl FlagValue for bool {
    fn parse_flag(raw: &str) -> Result<Self, String> {
        match raw {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err("expected `true`, `false`, `1` or `0`".to_string()),
        }
    }
}
