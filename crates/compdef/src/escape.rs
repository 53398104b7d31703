//! Escaping for `_arguments` specs and for the shell words holding them.

/// Which characters are special where the text lands.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Context {
    /// The field may itself sit inside `(...)` or `[...]`.
    brackets: bool,
    /// Free text, where `:` would end the field.
    colon: bool,
    /// Element of a `(a b c)` list.
    space: bool,
}

pub(crate) const ALIAS: Context = Context { brackets: true, colon: true, space: false };
pub(crate) const HELP: Context = Context { brackets: true, colon: true, space: false };
pub(crate) const DISPLAY: Context = Context { brackets: false, colon: true, space: false };
pub(crate) const CHOICE: Context = Context { brackets: true, colon: true, space: true };

pub(crate) fn escape(text: &str, cx: Context) -> String {
    let mut res = String::with_capacity(text.len());
    for c in text.chars() {
        // A spec is a single line.
        let c = if c == '\n' || c == '\r' { ' ' } else { c };
        let special = match c {
            '\\' => true,
            '(' | ')' | '[' | ']' => cx.brackets,
            ':' => cx.colon,
            ' ' => cx.space,
            _ => false,
        };
        if special {
            res.push('\\');
        }
        res.push(c);
    }
    res
}

/// Quotes `word` for the shell, leaving it bare when that is safe.
pub(crate) fn quote(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }
    if word.chars().all(is_safe) {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r#"'"'"'"#))
}

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c)
}
