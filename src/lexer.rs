//! SNBT tokenizer.
//!
//! Turns raw text into [`Token`]s carrying their byte offset. Whitespace
//! separates tokens and is otherwise dropped; the parser decides where a
//! newline stands in for an elided comma.
//!
//! Numbers and bare words share one lexical space. The scanner reads a run of
//! word characters (`A-Z a-z 0-9 _ - + .`) and then classifies it: numeric
//! shape first, identifier shape second, lex error otherwise. A comma never
//! belongs to a run, so `250,` always lexes as `250` followed by `,`.

use crate::value::Sign;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TokenKind<'a> {
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Colon,
    Comma,
    /// Raw body between the quotes, escapes not yet processed.
    Str(&'a str),
    /// Identifier-shaped run: unquoted keys and `true`/`false`.
    Word(&'a str),
    Number(NumberParts<'a>),
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub offset: usize,
}

impl<'a> Token<'a> {
    /// Short description for "expected X, found Y" messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::LeftBrace => "'{'".to_string(),
            TokenKind::RightBrace => "'}'".to_string(),
            TokenKind::LeftBracket => "'['".to_string(),
            TokenKind::RightBracket => "']'".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Str(_) => "string".to_string(),
            TokenKind::Word(w) => format!("bare word `{}`", w),
            TokenKind::Number(parts) => format!("number `{}`", parts.text),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

/// A numeric literal split into its lexical parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NumberParts<'a> {
    pub text: &'a str,
    pub sign: Sign,
    pub int: &'a str,
    pub frac: &'a str,
    pub has_dot: bool,
    pub exponent: Option<&'a str>,
    pub suffix: Option<char>,
}

fn digit_run(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    i
}

/// Splits `text` if it has the shape
/// `[+-]? digits? ('.' digits)? ([eE] [+-]? digits)? suffix?`.
///
/// At least one digit is required, a dot must be followed by a digit and a
/// suffix cannot follow an exponent.
pub(crate) fn split_number(text: &str) -> Option<NumberParts<'_>> {
    let bytes = text.as_bytes();
    let mut i = 0;

    let sign = match bytes.first() {
        Some(b'-') => {
            i += 1;
            Sign::Minus
        }
        Some(b'+') => {
            i += 1;
            Sign::Plus
        }
        _ => Sign::Unsigned,
    };

    let int_start = i;
    i = digit_run(bytes, i);
    let int = &text[int_start..i];

    let mut frac = "";
    let mut has_dot = false;
    if bytes.get(i) == Some(&b'.') {
        has_dot = true;
        let frac_start = i + 1;
        i = digit_run(bytes, frac_start);
        frac = &text[frac_start..i];
        if frac.is_empty() {
            return None;
        }
    }
    if int.is_empty() && frac.is_empty() {
        return None;
    }

    let mut exponent = None;
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let exp_start = i;
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let digits_end = digit_run(bytes, j);
        if digits_end == j {
            return None;
        }
        exponent = Some(&text[exp_start..digits_end]);
        i = digits_end;
    }

    let mut suffix = None;
    if exponent.is_none() {
        if let Some(&b) = bytes.get(i) {
            if crate::value::LiteralKind::from_suffix(b as char).is_some() {
                suffix = Some(b as char);
                i += 1;
            }
        }
    }

    if i != bytes.len() {
        return None;
    }
    Some(NumberParts {
        text,
        sign,
        int,
        frac,
        has_dot,
        exponent,
        suffix,
    })
}

/// Characters allowed in an unquoted key.
pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_word_char(c: char) -> bool {
    is_ident_char(c) || c == '+' || c == '.'
}

/// Tokenizer over an in-memory document.
pub(crate) struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, pos: 0 }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            match ch {
                ' ' | '\t' | '\r' | '\n' => self.pos += 1,
                // A byte order mark only shows up at the start of a file.
                '\u{feff}' if self.pos == 0 => self.pos += ch.len_utf8(),
                _ => break,
            }
        }
    }

    fn punct(&mut self, kind: TokenKind<'a>) -> Result<Token<'a>> {
        let offset = self.pos;
        self.pos += 1;
        Ok(Token { kind, offset })
    }

    /// Reads the next token.
    pub fn next_token(&mut self) -> Result<Token<'a>> {
        self.skip_whitespace();

        let offset = self.pos;
        let ch = match self.peek_char() {
            Some(ch) => ch,
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    offset,
                })
            }
        };

        match ch {
            '{' => self.punct(TokenKind::LeftBrace),
            '}' => self.punct(TokenKind::RightBrace),
            '[' => self.punct(TokenKind::LeftBracket),
            ']' => self.punct(TokenKind::RightBracket),
            ':' => self.punct(TokenKind::Colon),
            ',' => self.punct(TokenKind::Comma),
            '"' => self.read_string(),
            c if is_word_char(c) => self.read_word(),
            c => Err(Error::lex(
                self.input,
                offset,
                &format!("unexpected character `{}`", c.escape_debug()),
            )),
        }
    }

    fn read_string(&mut self) -> Result<Token<'a>> {
        let offset = self.pos;
        let bytes = self.input.as_bytes();
        let body_start = offset + 1;
        let mut i = body_start;

        while i < bytes.len() {
            match bytes[i] {
                b'"' => {
                    self.pos = i + 1;
                    return Ok(Token {
                        kind: TokenKind::Str(&self.input[body_start..i]),
                        offset,
                    });
                }
                // Skip whatever is escaped; `unescape` validates it later.
                b'\\' => i += 2,
                _ => i += 1,
            }
        }

        Err(Error::lex(self.input, offset, "unterminated string"))
    }

    fn read_word(&mut self) -> Result<Token<'a>> {
        let offset = self.pos;
        let end = self.input[offset..]
            .char_indices()
            .find(|&(_, c)| !is_word_char(c))
            .map_or(self.input.len(), |(i, _)| offset + i);
        let text = &self.input[offset..end];
        self.pos = end;

        if let Some(parts) = split_number(text) {
            return Ok(Token {
                kind: TokenKind::Number(parts),
                offset,
            });
        }
        if text.chars().all(is_ident_char) {
            return Ok(Token {
                kind: TokenKind::Word(text),
                offset,
            });
        }
        Err(Error::lex(
            self.input,
            offset,
            &format!("malformed number or identifier `{}`", text),
        ))
    }
}

fn read_hex4(input: &str, body: &str, at: usize, body_offset: usize) -> Result<u32> {
    let digits = body.get(at..at + 4).unwrap_or("");
    if digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        // Four hex digits always fit.
        Ok(u32::from_str_radix(digits, 16).unwrap_or(0))
    } else {
        Err(Error::syntax(
            input,
            body_offset + at - 2,
            "four hex digits after `\\u`",
            &format!("`{}`", digits),
        ))
    }
}

/// Resolves escape sequences in a quoted-string body.
///
/// `body_offset` is the byte offset of the body within `input`, used for error
/// positions. Supported escapes are `\\`, `\"`, `\n`, `\r`, `\t` and
/// `\uXXXX` (with UTF-16 surrogate pairs); anything else is a syntax error.
pub(crate) fn unescape(input: &str, body: &str, body_offset: usize) -> Result<String> {
    if !body.contains('\\') {
        return Ok(body.to_string());
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((i, ch)) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let bad_escape = |found: &str| {
            Error::syntax(
                input,
                body_offset + i,
                "escape sequence (\\\\, \\\", \\n, \\r, \\t or \\uXXXX)",
                found,
            )
        };
        match chars.next() {
            Some((_, '\\')) => out.push('\\'),
            Some((_, '"')) => out.push('"'),
            Some((_, 'n')) => out.push('\n'),
            Some((_, 'r')) => out.push('\r'),
            Some((_, 't')) => out.push('\t'),
            Some((u, 'u')) => {
                let hi = read_hex4(input, body, u + 1, body_offset)?;
                // Consume the four digits.
                for _ in 0..4 {
                    chars.next();
                }
                let code = if (0xD800..0xDC00).contains(&hi) {
                    let lo_at = u + 5;
                    if body.get(lo_at..lo_at + 2) != Some("\\u") {
                        return Err(bad_escape("unpaired high surrogate"));
                    }
                    let lo = read_hex4(input, body, lo_at + 2, body_offset)?;
                    if !(0xDC00..0xE000).contains(&lo) {
                        return Err(bad_escape("unpaired high surrogate"));
                    }
                    for _ in 0..6 {
                        chars.next();
                    }
                    0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00)
                } else {
                    hi
                };
                match char::from_u32(code) {
                    Some(c) => out.push(c),
                    None => return Err(bad_escape("unpaired low surrogate")),
                }
            }
            Some((_, other)) => return Err(bad_escape(&format!("`\\{}`", other))),
            None => return Err(bad_escape("end of string")),
        }
    }
    Ok(out)
}
