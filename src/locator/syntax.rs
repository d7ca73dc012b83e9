use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use crate::foundation::error::PinmentError;

/// Position-tagged locator parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Byte offset into the locator string.
    pub offset: usize,
    /// What went wrong.
    pub message: String,
}

impl SyntaxError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at byte {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for SyntaxError {}

impl From<SyntaxError> for PinmentError {
    fn from(e: SyntaxError) -> Self {
        PinmentError::locator(e.to_string())
    }
}

/// Relationship between a compound and the one to its left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a > b`
    Child,
    /// `a b`
    Descendant,
}

/// `[name]` or `[name="value"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrTest {
    /// Attribute name, lowercase.
    pub name: String,
    /// Required value; `None` tests for presence only.
    pub value: Option<String>,
}

/// A run of simple selectors with no combinator between them (`div.card:nth-of-type(2)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    /// Lowercase tag name; `None` for `*` or when omitted.
    pub tag: Option<String>,
    /// `#id` (more than one can only match if they agree).
    pub ids: Vec<String>,
    /// `.class` (all must be present).
    pub classes: Vec<String>,
    /// `[attr]` / `[attr="v"]`
    pub attrs: Vec<AttrTest>,
    /// `:nth-of-type(n)`
    pub nth_of_type: Option<usize>,
    /// `:scope`
    pub scope: bool,
}

/// One compound plus the combinator joining it to the previous step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// `None` for the leftmost step.
    pub combinator: Option<Combinator>,
    /// What the element at this step must satisfy.
    pub compound: Compound,
}

/// Longest chain of compounds [`Locator::parse`] accepts.
pub const MAX_LOCATOR_STEPS: usize = 256;

/// Parsed locator: a chain of compounds read left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// Steps from the outermost ancestor to the subject.
    pub steps: Vec<Step>,
}

impl Locator {
    /// Parse the structural locator subset used for anchoring.
    ///
    /// Supported: type and universal selectors, `#id`, `.class`, `[attr]`, `[attr="value"]`,
    /// `:nth-of-type(n)`, `:scope`, and the child (`>`) and descendant (whitespace) combinators.
    pub fn parse(input: &str) -> Result<Self, SyntaxError> {
        let tokens = lex(input)?;
        Parser { tokens, pos: 0 }.parse_locator()
    }
}

/// Escape an identifier for use after `#` or `.` (CSS `escape` rules).
pub fn escape_ident(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let first = ident.chars().next();
    let only_dash = ident == "-";
    for (i, c) in ident.chars().enumerate() {
        let leading_digit =
            c.is_ascii_digit() && (i == 0 || (i == 1 && first == Some('-')));
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => push_hex_escape(&mut out, c),
            _ if leading_digit => push_hex_escape(&mut out, c),
            '-' if only_dash => out.push_str("\\-"),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

/// Quote a string for use as an attribute value.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => push_hex_escape(&mut out, c),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn push_hex_escape(out: &mut String, c: char) {
    out.push_str(&format!("\\{:x} ", c as u32));
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(String),
    Hash(String),
    Str(String),
    Dot,
    Star,
    Colon,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Eq,
    Gt,
    Space,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn lex(input: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut out = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
                chars.next();
            }
            out.push(Token {
                kind: TokenKind::Space,
                offset: start,
            });
            continue;
        }

        if is_ident_char(c) || c == '\\' {
            let ident = lex_ident(&mut chars)?;
            out.push(Token {
                kind: TokenKind::Ident(ident),
                offset: start,
            });
            continue;
        }

        chars.next();
        let kind = match c {
            '#' => {
                let ident = lex_ident(&mut chars)?;
                if ident.is_empty() {
                    return Err(SyntaxError::new(start, "expected identifier after '#'"));
                }
                TokenKind::Hash(ident)
            }
            '"' | '\'' => TokenKind::Str(lex_string(&mut chars, c, start)?),
            '.' => TokenKind::Dot,
            '*' => TokenKind::Star,
            ':' => TokenKind::Colon,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '=' => TokenKind::Eq,
            '>' => TokenKind::Gt,
            _ => return Err(SyntaxError::new(start, format!("unexpected character '{c}'"))),
        };
        out.push(Token {
            kind,
            offset: start,
        });
    }

    out.push(Token {
        kind: TokenKind::Eof,
        offset: input.len(),
    });
    Ok(out)
}

fn lex_ident(chars: &mut Peekable<CharIndices<'_>>) -> Result<String, SyntaxError> {
    let mut ident = String::new();
    while let Some(&(offset, c)) = chars.peek() {
        if c == '\\' {
            chars.next();
            ident.push(lex_escape(chars, offset)?);
        } else if is_ident_char(c) {
            chars.next();
            ident.push(c);
        } else {
            break;
        }
    }
    Ok(ident)
}

fn lex_string(
    chars: &mut Peekable<CharIndices<'_>>,
    quote: char,
    start: usize,
) -> Result<String, SyntaxError> {
    let mut value = String::new();
    loop {
        match chars.next() {
            Some((_, c)) if c == quote => return Ok(value),
            Some((offset, '\\')) => value.push(lex_escape(chars, offset)?),
            Some((offset, '\n')) => {
                return Err(SyntaxError::new(offset, "newline in quoted string"));
            }
            Some((_, c)) => value.push(c),
            None => return Err(SyntaxError::new(start, "unterminated string")),
        }
    }
}

/// Decode the escape following a backslash at `offset`.
fn lex_escape(chars: &mut Peekable<CharIndices<'_>>, offset: usize) -> Result<char, SyntaxError> {
    let mut hex = String::new();
    while hex.len() < 6 {
        match chars.peek() {
            Some(&(_, c)) if c.is_ascii_hexdigit() => {
                hex.push(c);
                chars.next();
            }
            _ => break,
        }
    }
    if !hex.is_empty() {
        // A single whitespace terminates a hex escape and is consumed with it.
        if chars.peek().is_some_and(|&(_, c)| c == ' ' || c == '\t' || c == '\n') {
            chars.next();
        }
        let cp = u32::from_str_radix(&hex, 16)
            .map_err(|_| SyntaxError::new(offset, "invalid hex escape"))?;
        return Ok(match char::from_u32(cp) {
            Some(c) if cp != 0 => c,
            _ => '\u{FFFD}',
        });
    }
    match chars.next() {
        Some((_, '\n')) => Err(SyntaxError::new(offset, "escaped newline")),
        Some((_, c)) => Ok(c),
        None => Err(SyntaxError::new(offset, "dangling escape")),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos].offset
    }

    fn bump(&mut self) -> TokenKind {
        let kind = self.tokens[self.pos].kind.clone();
        if !matches!(kind, TokenKind::Eof) {
            self.pos += 1;
        }
        kind
    }

    fn skip_space(&mut self) -> bool {
        let mut skipped = false;
        while matches!(self.peek(), TokenKind::Space) {
            self.pos += 1;
            skipped = true;
        }
        skipped
    }

    fn expect(&mut self, want: TokenKind, what: &str) -> Result<(), SyntaxError> {
        let offset = self.offset();
        if *self.peek() == want {
            self.bump();
            Ok(())
        } else {
            Err(SyntaxError::new(offset, format!("expected {what}")))
        }
    }

    fn parse_locator(mut self) -> Result<Locator, SyntaxError> {
        self.skip_space();
        let mut steps = vec![Step {
            combinator: None,
            compound: self.parse_compound()?,
        }];

        loop {
            let spaced = self.skip_space();
            let combinator = match self.peek() {
                TokenKind::Eof => break,
                TokenKind::Gt => {
                    self.bump();
                    self.skip_space();
                    Combinator::Child
                }
                _ if spaced => Combinator::Descendant,
                _ => {
                    return Err(SyntaxError::new(self.offset(), "expected combinator"));
                }
            };
            if steps.len() >= MAX_LOCATOR_STEPS {
                return Err(SyntaxError::new(
                    self.offset(),
                    format!("more than {MAX_LOCATOR_STEPS} compounds"),
                ));
            }
            steps.push(Step {
                combinator: Some(combinator),
                compound: self.parse_compound()?,
            });
        }

        if steps.iter().skip(1).any(|s| s.compound.scope) {
            return Err(SyntaxError::new(0, ":scope is only allowed at the start"));
        }
        Ok(Locator { steps })
    }

    fn parse_compound(&mut self) -> Result<Compound, SyntaxError> {
        let start = self.offset();
        let mut compound = Compound::default();
        let mut any = false;

        match self.peek().clone() {
            TokenKind::Ident(tag) => {
                self.bump();
                compound.tag = Some(tag.to_ascii_lowercase());
                any = true;
            }
            TokenKind::Star => {
                self.bump();
                any = true;
            }
            _ => {}
        }

        loop {
            let offset = self.offset();
            match self.peek().clone() {
                TokenKind::Hash(id) => {
                    self.bump();
                    compound.ids.push(id);
                }
                TokenKind::Dot => {
                    self.bump();
                    match self.bump() {
                        TokenKind::Ident(class) => compound.classes.push(class),
                        _ => return Err(SyntaxError::new(offset, "expected class name")),
                    }
                }
                TokenKind::LBracket => {
                    self.bump();
                    compound.attrs.push(self.parse_attr(offset)?);
                }
                TokenKind::Colon => {
                    self.bump();
                    self.parse_pseudo(&mut compound, offset)?;
                }
                _ => break,
            }
            any = true;
        }

        if !any {
            return Err(SyntaxError::new(start, "expected selector"));
        }
        Ok(compound)
    }

    fn parse_attr(&mut self, open: usize) -> Result<AttrTest, SyntaxError> {
        self.skip_space();
        let name = match self.bump() {
            TokenKind::Ident(name) => name.to_ascii_lowercase(),
            _ => return Err(SyntaxError::new(open, "expected attribute name")),
        };
        self.skip_space();
        let value = if *self.peek() == TokenKind::Eq {
            self.bump();
            self.skip_space();
            let offset = self.offset();
            match self.bump() {
                TokenKind::Str(v) | TokenKind::Ident(v) => Some(v),
                _ => return Err(SyntaxError::new(offset, "expected attribute value")),
            }
        } else {
            None
        };
        self.skip_space();
        self.expect(TokenKind::RBracket, "']'")?;
        Ok(AttrTest { name, value })
    }

    fn parse_pseudo(&mut self, compound: &mut Compound, colon: usize) -> Result<(), SyntaxError> {
        let name = match self.bump() {
            TokenKind::Ident(name) => name.to_ascii_lowercase(),
            _ => return Err(SyntaxError::new(colon, "expected pseudo-class name")),
        };
        match name.as_str() {
            "scope" => {
                compound.scope = true;
                Ok(())
            }
            "nth-of-type" => {
                self.expect(TokenKind::LParen, "'('")?;
                self.skip_space();
                let offset = self.offset();
                let n = match self.bump() {
                    TokenKind::Ident(n) => n
                        .parse::<usize>()
                        .ok()
                        .filter(|&n| n > 0)
                        .ok_or_else(|| SyntaxError::new(offset, "expected positive integer"))?,
                    _ => return Err(SyntaxError::new(offset, "expected positive integer")),
                };
                self.skip_space();
                self.expect(TokenKind::RParen, "')'")?;
                compound.nth_of_type = Some(n);
                Ok(())
            }
            other => Err(SyntaxError::new(
                colon,
                format!("unsupported pseudo-class ':{other}'"),
            )),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/locator/syntax.rs"]
mod tests;
