// Embedded list / dict literals
//
// `update User 42 {'first_name': 'Betty', 'age': 30}` carries a literal the
// tokenizer must not split. This module finds that span and parses it.

use serde_json::Value;

/// Byte span `[start, end)` of the one literal recognized in `text`
///
/// A balanced `{...}` wins over a balanced `[...]`. Brackets inside quoted
/// strings are ignored, and an opening bracket without its match is not
/// a literal at all.
pub fn find_literal(text: &str) -> Option<(usize, usize)> {
    find_balanced(text, '{', '}').or_else(|| find_balanced(text, '[', ']'))
}

fn find_balanced(text: &str, open: char, close: char) -> Option<(usize, usize)> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start: Option<usize> = None;
    let mut depth = 0usize;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            c if c == open => {
                if start.is_none() {
                    start = Some(i);
                }
                depth += 1;
            }
            c if c == close && depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return start.map(|s| (s, i + c.len_utf8()));
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse a literal as JSON, retrying once with Python-style syntax
/// (`'single quotes'`, `True`, `False`, `None`) rewritten to JSON.
pub fn parse_literal(text: &str) -> Result<Value, serde_json::Error> {
    let text = text.trim();
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(first) => serde_json::from_str(&pythonic_to_json(text)).map_err(|_| first),
    }
}

fn pythonic_to_json(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                if c == '\\' {
                    match chars.next() {
                        // \' is not a JSON escape
                        Some('\'') => out.push('\''),
                        Some(next) => {
                            out.push('\\');
                            out.push(next);
                        }
                        None => out.push('\\'),
                    }
                } else if c == q {
                    out.push('"');
                    quote = None;
                } else if c == '"' {
                    out.push_str("\\\"");
                } else {
                    out.push(c);
                }
            }
            None => {
                if c == '\'' || c == '"' {
                    quote = Some(c);
                    out.push('"');
                } else if c.is_alphabetic() {
                    let mut word = String::from(c);
                    while let Some(&n) = chars.peek() {
                        if n.is_alphanumeric() || n == '_' {
                            word.push(n);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    out.push_str(match word.as_str() {
                        "True" => "true",
                        "False" => "false",
                        "None" => "null",
                        other => other,
                    });
                } else {
                    out.push(c);
                }
            }
        }
    }

    out
}
