// 🏗️ Command Parser - two syntaxes, one argument list
//
//   show User 1234-abcd                  (shell tokens)
//   User.show("1234-abcd")               (call syntax)
//   User.update("1234", {"age": 30})     (call syntax + dict literal)
//
// Stage 1 strips an optional `<Class>.<command>(...)` wrapper.
// Stage 2 tokenizes the argument text, keeping one trailing `{...}` or
// `[...]` literal intact as the last argument.

use thiserror::Error;
use tracing::debug;

use crate::command::literal::find_literal;

// ============================================================================
// CORE TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// `command Class id ...`
    Shell,
    /// `Class.command(id, ...)`
    Call,
}

/// ParsedLine - output of `parse_line`
///
/// `args` always starts with the class name when one was given, so both
/// syntaxes reach the dispatcher in the same shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub command: String,
    pub args: Vec<String>,
    pub syntax: Syntax,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unterminated quote")]
    UnterminatedQuote,

    #[error("unbalanced parentheses in call syntax")]
    UnbalancedCall,
}

// ============================================================================
// STAGE 1 - LINE
// ============================================================================

/// Parse one input line; `Ok(None)` for a blank line
pub fn parse_line(line: &str) -> Result<Option<ParsedLine>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let parsed = match split_call(line)? {
        Some((class, command, inner)) => {
            let mut args = Vec::new();
            if !class.is_empty() {
                args.push(class.to_string());
            }
            args.extend(split_arguments(inner)?);
            ParsedLine {
                command: command.to_string(),
                args,
                syntax: Syntax::Call,
            }
        }
        None => {
            let (command, rest) = match line.find(char::is_whitespace) {
                Some(i) => (&line[..i], &line[i..]),
                None => (line, ""),
            };
            ParsedLine {
                command: command.to_string(),
                args: split_arguments(rest)?,
                syntax: Syntax::Shell,
            }
        }
    };

    debug!(command = %parsed.command, args = ?parsed.args, syntax = ?parsed.syntax, "parsed line");
    Ok(Some(parsed))
}

/// Detect `<Class>.<command>(<inner>)`
///
/// The text before the first `(` must be one word containing a `.`;
/// anything else is left to the shell syntax. Text after the closing
/// parenthesis is ignored.
fn split_call(line: &str) -> Result<Option<(&str, &str, &str)>, ParseError> {
    let Some(open) = line.find('(') else {
        return Ok(None);
    };
    let head = line[..open].trim_end();
    if head.is_empty() || head.contains(char::is_whitespace) {
        return Ok(None);
    }
    let Some(dot) = head.find('.') else {
        return Ok(None);
    };

    let close = matching_paren(line, open).ok_or(ParseError::UnbalancedCall)?;
    Ok(Some((&head[..dot], &head[dot + 1..], &line[open + 1..close])))
}

/// Index of the `)` closing the `(` at `open`, skipping quoted text
fn matching_paren(line: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in line[open..].char_indices() {
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
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

// ============================================================================
// STAGE 2 - ARGUMENTS
// ============================================================================

/// Tokenize argument text, appending an embedded literal verbatim
///
/// The literal must be a whole trailing argument; `x{y}` or `{..} more`
/// are tokenized like any other text.
pub fn split_arguments(text: &str) -> Result<Vec<String>, ParseError> {
    match find_literal(text) {
        Some((start, end)) if is_trailing_argument(text, start, end) => {
            let mut args = tokenize(&text[..start])?;
            args.push(text[start..end].to_string());
            Ok(args)
        }
        _ => tokenize(text),
    }
}

fn is_trailing_argument(text: &str, start: usize, end: usize) -> bool {
    let is_separator = |c: char| c.is_whitespace() || c == ',';
    let starts_token = text[..start].chars().next_back().map_or(true, is_separator);
    starts_token && text[end..].trim_matches(is_separator).is_empty()
}

/// Shell-like split: whitespace separated, quotes group and are removed,
/// trailing commas are stripped from every token.
pub fn tokenize(text: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                in_token = true;
                quoted = true;
                read_quoted(&mut chars, c, &mut current)?;
            }
            '\\' => {
                in_token = true;
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            c if c.is_whitespace() => {
                if in_token {
                    finish_token(&mut tokens, &mut current, quoted);
                    in_token = false;
                    quoted = false;
                }
            }
            _ => {
                in_token = true;
                current.push(c);
            }
        }
    }
    if in_token {
        finish_token(&mut tokens, &mut current, quoted);
    }

    Ok(tokens)
}

fn read_quoted(chars: &mut std::str::Chars<'_>, quote: char, out: &mut String) -> Result<(), ParseError> {
    while let Some(c) = chars.next() {
        if c == quote {
            return Ok(());
        }
        if c == '\\' && quote == '"' {
            match chars.next() {
                Some(next @ ('"' | '\\')) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => return Err(ParseError::UnterminatedQuote),
            }
        } else {
            out.push(c);
        }
    }
    Err(ParseError::UnterminatedQuote)
}

fn finish_token(tokens: &mut Vec<String>, current: &mut String, quoted: bool) {
    let token = std::mem::take(current);
    let token = token.trim_end_matches(',');
    // a bare "," is a separator, but `""` is a real (empty) value
    if !token.is_empty() || quoted {
        tokens.push(token.to_string());
    }
}

// ============================================================================
// TESTS
// ============================================================================
