use std::fmt;

use crate::registry::FlagSpec;
use crate::text::Text;

/// Rendered usage text, split by whether a flag is required.
///
/// Each row is `short/long`, the default value and the description. Columns
/// are sized from every flag together, so the two blocks line up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpText {
    pub required: String,
    pub optional: String,
}

impl fmt::Display for HelpText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Required args:\n{}\nOptional args:\n{}",
            self.required, self.optional
        )
    }
}

/// Render `flags` in iteration order.
pub fn render<'a, S, I>(flags: I) -> HelpText
where
    S: Text + 'a,
    I: IntoIterator<Item = &'a FlagSpec<S>>,
{
    let rows: Vec<(bool, String, String, String)> = flags
        .into_iter()
        .map(|f| {
            (
                f.required,
                f.alias_pair(),
                f.default_value.to_utf8().into_owned(),
                f.description.to_utf8().into_owned(),
            )
        })
        .collect();

    // Both columns get twice the widest entry as breathing room.
    let names = rows
        .iter()
        .map(|(_, alias, _, _)| alias.chars().count())
        .max()
        .unwrap_or(0)
        * 2;
    let defaults = rows
        .iter()
        .map(|(_, _, default, _)| default.chars().count())
        .max()
        .unwrap_or(0)
        * 2;

    let mut out = HelpText::default();
    for (required, alias, default, description) in rows {
        let block = if required {
            &mut out.required
        } else {
            &mut out.optional
        };
        block.push_str(&format!(
            "{:names$}{:defaults$}{}\n",
            alias,
            default,
            description,
            names = names,
            defaults = defaults
        ));
    }
    out
}
