/// Writes each value through `f`, inserting `separator` between the values
/// that actually produced output.
pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// True when `name` is a plain SQL identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Largest prefix of `value` not longer than `max` bytes that ends on a char boundary.
pub fn prefix_at_boundary(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            $crate::prefix_at_boundary(&$query, 497).trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_identifier("user"));
        assert!(is_identifier("_hidden"));
        assert!(is_identifier("competitor_2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("user; DROP TABLE user"));
        assert!(!is_identifier("name-with-dash"));
    }

    #[test]
    fn separated() {
        let mut out = String::new();
        separated_by(&mut out, ["a", "", "b"], |out, v| out.push_str(v), ", ");
        assert_eq!(out, "a, b");
    }

    #[test]
    fn truncation() {
        let long = "é".repeat(400);
        let text = format!("{}", truncate_long!(long));
        assert!(text.ends_with("..."));
        assert!(text.len() <= 500);
        assert_eq!(format!("{}", truncate_long!("short")), "short");
    }
}
