//! Tokenizer for the C# subset used in fixtures.

use wpf_types::OffsetRange;

use crate::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident(String),
    String(String),
    Char(char),
    Integer(i64),
    Real(String),
    Punct(&'static str),
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub range: OffsetRange,
    /// `///` lines directly before this token.
    pub doc: Option<OffsetRange>,
}

impl Token {
    pub(crate) fn is_punct(&self, punct: &str) -> bool {
        matches!(self.kind, TokenKind::Punct(p) if p == punct)
    }

    pub(crate) fn is_ident(&self, text: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(t) if t == text)
    }

    pub(crate) fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(t) => Some(t),
            _ => None,
        }
    }
}

const PUNCTUATION: &[&str] = &[
    "=>", "==", "!=", "<=", ">=", "&&", "||", "??", "{", "}", "(", ")", "[", "]", ";", ",", ".",
    ":", "=", "<", ">", "+", "-", "*", "/", "%", "!", "?", "&", "|",
];

pub(crate) fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut doc: Option<OffsetRange> = None;

    while pos < bytes.len() {
        let c = bytes[pos];
        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }
        if text[pos..].starts_with("///") {
            let end = line_end(text, pos);
            let range = OffsetRange::new(pos, end);
            doc = Some(doc.map_or(range, |d| d.cover(range)));
            pos = end;
            continue;
        }
        if text[pos..].starts_with("//") {
            pos = line_end(text, pos);
            continue;
        }
        if text[pos..].starts_with("/*") {
            let Some(close) = text[pos + 2..].find("*/") else {
                return Err(ParseError::new("unterminated block comment", pos));
            };
            pos += close + 4;
            continue;
        }
        if c == b'#' {
            pos = line_end(text, pos);
            continue;
        }

        let start = pos;
        let kind = if c.is_ascii_alphabetic() || c == b'_' || (c == b'@' && is_ident_start(bytes, pos + 1)) {
            if c == b'@' {
                pos += 1;
            }
            let ident_start = pos;
            while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                pos += 1;
            }
            TokenKind::Ident(text[ident_start..pos].to_owned())
        } else if c.is_ascii_digit() {
            lex_number(text, &mut pos)?
        } else if c == b'"' || (c == b'@' && bytes.get(pos + 1) == Some(&b'"')) {
            lex_string(text, &mut pos)?
        } else if c == b'\'' {
            lex_char(text, &mut pos)?
        } else if let Some(punct) = PUNCTUATION.iter().find(|p| text[pos..].starts_with(**p)) {
            pos += punct.len();
            TokenKind::Punct(*punct)
        } else {
            return Err(ParseError::new(
                format!("unexpected character {:?}", text[pos..].chars().next().unwrap_or(' ')),
                pos,
            ));
        };
        tokens.push(Token {
            kind,
            range: OffsetRange::new(start, pos),
            doc: doc.take(),
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        range: OffsetRange::at(text.len()),
        doc: None,
    });
    Ok(tokens)
}

fn is_ident_start(bytes: &[u8], pos: usize) -> bool {
    bytes
        .get(pos)
        .is_some_and(|b| b.is_ascii_alphabetic() || *b == b'_')
}

fn line_end(text: &str, pos: usize) -> usize {
    text[pos..].find('\n').map_or(text.len(), |i| pos + i)
}

fn lex_number(text: &str, pos: &mut usize) -> Result<TokenKind, ParseError> {
    let bytes = text.as_bytes();
    let start = *pos;
    while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
        *pos += 1;
    }
    let mut real = false;
    if *pos + 1 < bytes.len() && bytes[*pos] == b'.' && bytes[*pos + 1].is_ascii_digit() {
        real = true;
        *pos += 1;
        while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
            *pos += 1;
        }
    }
    let digits_end = *pos;
    if *pos < bytes.len() && matches!(bytes[*pos], b'd' | b'D' | b'f' | b'F' | b'm' | b'M') {
        real = true;
        *pos += 1;
    } else if *pos < bytes.len() && matches!(bytes[*pos], b'L' | b'l' | b'u' | b'U') {
        *pos += 1;
    }
    let digits = &text[start..digits_end];
    if real {
        Ok(TokenKind::Real(text[start..*pos].to_owned()))
    } else {
        digits
            .parse()
            .map(TokenKind::Integer)
            .map_err(|_| ParseError::new("integer literal out of range", start))
    }
}

fn lex_string(text: &str, pos: &mut usize) -> Result<TokenKind, ParseError> {
    let start = *pos;
    let verbatim = text.as_bytes()[*pos] == b'@';
    *pos += if verbatim { 2 } else { 1 };
    let mut value = String::new();
    let mut chars = text[*pos..].char_indices();
    while let Some((offset, c)) = chars.next() {
        match c {
            '"' if verbatim && text[*pos + offset + 1..].starts_with('"') => {
                value.push('"');
                chars.next();
            }
            '"' => {
                *pos += offset + 1;
                return Ok(TokenKind::String(value));
            }
            '\\' if !verbatim => {
                let (_, escaped) = chars
                    .next()
                    .ok_or_else(|| ParseError::new("unterminated string", start))?;
                value.push(unescape(escaped));
            }
            '\n' if !verbatim => return Err(ParseError::new("newline in string", start)),
            c => value.push(c),
        }
    }
    Err(ParseError::new("unterminated string", start))
}

fn lex_char(text: &str, pos: &mut usize) -> Result<TokenKind, ParseError> {
    let start = *pos;
    let rest = &text[start + 1..];
    let mut chars = rest.char_indices();
    let (value, after) = match chars.next() {
        Some((_, '\\')) => {
            let (i, c) = chars
                .next()
                .ok_or_else(|| ParseError::new("unterminated char", start))?;
            (unescape(c), i + c.len_utf8())
        }
        Some((i, c)) => (c, i + c.len_utf8()),
        None => return Err(ParseError::new("unterminated char", start)),
    };
    if !rest[after..].starts_with('\'') {
        return Err(ParseError::new("unterminated char", start));
    }
    *pos = start + 1 + after + 1;
    Ok(TokenKind::Char(value))
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}
