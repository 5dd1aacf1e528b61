//! Bracket-aware string splitting and arbitrary-value decoding.

/// Splits `input` on `separator`, ignoring separators nested in `()`, `[]`,
/// `{}` or quotes, and escaped with a backslash.
///
/// ```rust
/// use classcss::candidate::segment;
///
/// assert_eq!(segment("hover:[&:focus]:flex", ':'), vec!["hover", "[&:focus]", "flex"]);
/// assert_eq!(segment("bg-[url(a:b)]/50", '/'), vec!["bg-[url(a:b)]", "50"]);
/// ```
pub fn segment(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut stack: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (idx, ch) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '(' => stack.push(')'),
            '[' => stack.push(']'),
            '{' => stack.push('}'),
            ')' | ']' | '}' => {
                if stack.last() == Some(&ch) {
                    stack.pop();
                }
            }
            _ if ch == separator && stack.is_empty() => {
                parts.push(&input[start..idx]);
                start = idx + ch.len_utf8();
            }
            _ => {}
        }
    }

    parts.push(&input[start..]);
    parts
}

/// Decodes the body of an arbitrary value.
///
/// Underscores become spaces and `\_` becomes a literal underscore. Returns
/// `None` when the value is empty, has unbalanced brackets, or contains a
/// top-level `;` (which would escape the declaration).
pub fn decode_arbitrary_value(input: &str) -> Option<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'_') => {
                chars.next();
                out.push('_');
            }
            '_' => out.push(' '),
            other => out.push(other),
        }
    }

    let trimmed = out.trim();
    if trimmed.is_empty() || !is_balanced(trimmed) {
        return None;
    }
    if segment(trimmed, ';').len() > 1 {
        return None;
    }
    Some(trimmed.to_string())
}

pub(crate) fn is_balanced(input: &str) -> bool {
    let mut stack = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for ch in input.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '(' => stack.push(')'),
            '[' => stack.push(']'),
            '{' => stack.push('}'),
            ')' | ']' | '}' => {
                if stack.pop() != Some(ch) {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty() && quote.is_none()
}
