//! Expression tokenizer
//!
//! Splits raw expression text into token strings. Operators become their
//! own tokens, two-character operators are merged back together, and a
//! double-quoted span is kept whole (quotes included).

use atomgraph_core::AtomError;

/// Full-width punctuation editors tend to type by accident
const FORBIDDEN: &[char] = &['：', '，', '、', '“', '”', '‘', '’', '（', '）'];

const OPERATOR_CHARS: &[char] = &[
    '+', '-', '*', '/', '%', '(', ')', ',', '!', '<', '>', '=', '&', '|',
];

const TWO_CHAR_OPERATORS: &[&str] = &["&&", "||", ">=", "<=", "==", "!="];

/// Tokenize expression text
pub fn tokenize(input: &str) -> Result<Vec<String>, AtomError> {
    check_forbidden(input)?;
    check_bare_assignment(input)?;
    let pieces = split_pieces(input)?;
    Ok(merge_operators(pieces))
}

fn check_forbidden(input: &str) -> Result<(), AtomError> {
    let mut found: Vec<char> = Vec::new();
    for c in input.chars().filter(|c| FORBIDDEN.contains(c)) {
        if !found.contains(&c) {
            found.push(c);
        }
    }
    if found.is_empty() {
        Ok(())
    } else {
        Err(AtomError::forbidden_chars(&found))
    }
}

/// `=` is only legal as part of `==`, `!=`, `<=` or `>=`
fn check_bare_assignment(input: &str) -> Result<(), AtomError> {
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '=' {
            if chars.get(i + 1) == Some(&'=') {
                i += 2;
                continue;
            }
            let prev = if i > 0 { Some(chars[i - 1]) } else { None };
            if !matches!(prev, Some('!' | '<' | '>')) {
                return Err(AtomError::bare_assignment());
            }
        }
        i += 1;
    }
    Ok(())
}

fn flush(current: &mut String, pieces: &mut Vec<String>) {
    if !current.is_empty() {
        pieces.push(std::mem::take(current));
    }
}

fn split_pieces(input: &str) -> Result<Vec<String>, AtomError> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c == '"' {
            flush(&mut current, &mut pieces);
            let mut quoted = String::from('"');
            loop {
                match chars.next() {
                    Some('"') => {
                        quoted.push('"');
                        break;
                    }
                    Some(ch) => quoted.push(ch),
                    None => return Err(AtomError::unterminated_quote()),
                }
            }
            pieces.push(quoted);
        } else if c.is_whitespace() {
            flush(&mut current, &mut pieces);
        } else if OPERATOR_CHARS.contains(&c) {
            flush(&mut current, &mut pieces);
            pieces.push(c.to_string());
        } else {
            current.push(c);
        }
    }
    flush(&mut current, &mut pieces);

    Ok(pieces)
}

fn merge_operators(pieces: Vec<String>) -> Vec<String> {
    let mut tokens = Vec::with_capacity(pieces.len());
    let mut iter = pieces.into_iter().peekable();

    while let Some(piece) = iter.next() {
        if let Some(next) = iter.peek() {
            let pair = format!("{}{}", piece, next);
            if TWO_CHAR_OPERATORS.contains(&pair.as_str()) {
                iter.next();
                tokens.push(pair);
                continue;
            }
        }
        tokens.push(piece);
    }

    tokens
}
