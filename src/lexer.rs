//! # lexer.rs
//!
//! Lexical analysis for graphed expressions. Splits an input string into a
//! sequence of [`Token`]s: numeric literals, the free variable `x`, function
//! names (with an optional derivative marker), binary operators, and
//! parentheses.
//!
//! Whitespace carries no meaning and is stripped before scanning. The
//! variable `x` is reserved: it never begins an identifier, so `xsin(1)`
//! lexes as `x` followed by the call `sin(1)`. Every function name must be
//! followed by `(`, directly or through a single derivative marker `'`,
//! because bare names have no meaning in this grammar.

use crate::error::LexError;

/// Classification of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Numeric literal with at most one decimal point.
    Number,
    /// The free variable `x`.
    Variable,
    /// A function name, always followed by `(` in the source.
    Identifier,
    /// A function name with a trailing derivative marker, e.g. `f'`.
    DerivativeIdentifier,
    /// One of the binary operators `+ - * / ^`.
    Operator,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Number => "number",
            Self::Variable => "variable",
            Self::Identifier => "identifier",
            Self::DerivativeIdentifier => "derivative identifier",
            Self::Operator => "operator",
            Self::LeftParen => "left parenthesis",
            Self::RightParen => "right parenthesis",
        };
        write!(f, "{}", s)
    }
}

/// A single token: its kind plus the text it was scanned from.
///
/// The text is kept verbatim (derivative identifiers keep their `'`) so a
/// token sequence can be reported back in error messages exactly as the user
/// typed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: String,
}

impl Token {
    /// Creates a new `Token` from a kind and its source text.
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }

    /// Returns the token classification.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the text the token was scanned from.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

type CharIter<'a> = std::iter::Peekable<std::str::Chars<'a>>;

/// Scans a numeric literal whose first character is `first`.
///
/// Accepts `[0-9]+(.[0-9]+)?`; a leading `.` is normalized to `0.` so that
/// `.5` scans as `0.5`. A second decimal point inside the run is an error,
/// as is a `.` with no digits around it.
fn scan_number(first: char, chars: &mut CharIter) -> Result<String, LexError> {
    let mut text = String::new();
    let mut has_decimal = false;

    if first == '.' {
        match chars.peek() {
            Some(c) if c.is_ascii_digit() => {
                text.push('0');
                text.push('.');
                has_decimal = true;
            }
            _ => return Err(LexError::LoneDecimalPoint),
        }
    } else {
        text.push(first);
    }

    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            text.push(c);
            chars.next();
        } else if c == '.' {
            if has_decimal {
                text.push('.');
                return Err(LexError::DoubleDecimalPoint(text));
            }
            has_decimal = true;
            text.push('.');
            chars.next();
        } else {
            break;
        }
    }

    Ok(text)
}

/// Scans a function name whose first character is `first`.
///
/// The run extends over alphabetic characters (including a mid-name `x`, as
/// in `exp`) and must be followed by `(`, either directly or through one
/// derivative marker. Returns the finished token.
fn scan_identifier(first: char, chars: &mut CharIter) -> Result<Token, LexError> {
    let mut name = String::new();
    name.push(first);
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphabetic() {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }

    match chars.peek() {
        Some('(') => Ok(Token::new(TokenKind::Identifier, name)),
        Some('\'') => {
            chars.next();
            name.push('\'');
            match chars.peek() {
                Some('(') => Ok(Token::new(TokenKind::DerivativeIdentifier, name)),
                _ => Err(LexError::BareIdentifier(name)),
            }
        }
        _ => Err(LexError::BareIdentifier(name)),
    }
}

/// Splits an expression string into tokens.
///
/// # Arguments
///
/// * `expression` - The raw expression text, whitespace allowed anywhere.
///
/// # Returns
///
/// * `Ok(Vec<Token>)` with the tokens in source order.
/// * `Err(LexError)` on a malformed literal, a bare identifier, a misplaced
///   derivative marker, or a character outside the accepted alphabet.
///
/// # Examples
///
/// ```rust
/// use calcgraph::lexer::{tokenize, TokenKind};
///
/// let tokens = tokenize("3*x^2-5").unwrap();
/// let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind()).collect();
/// assert_eq!(kinds, vec![
///     TokenKind::Number, TokenKind::Operator, TokenKind::Variable,
///     TokenKind::Operator, TokenKind::Number, TokenKind::Operator,
///     TokenKind::Number,
/// ]);
/// ```
pub fn tokenize(expression: &str) -> Result<Vec<Token>, LexError> {
    let stripped: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
    let mut tokens = Vec::new();
    let mut chars = stripped.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '0'..='9' | '.' => {
                let text = scan_number(ch, &mut chars)?;
                tokens.push(Token::new(TokenKind::Number, text));
            }
            // `x` is reserved: it never starts an identifier run.
            'x' => tokens.push(Token::new(TokenKind::Variable, "x")),
            c if c.is_ascii_alphabetic() => {
                tokens.push(scan_identifier(c, &mut chars)?);
            }
            '+' | '-' | '*' | '/' | '^' => {
                tokens.push(Token::new(TokenKind::Operator, ch.to_string()));
            }
            '(' => tokens.push(Token::new(TokenKind::LeftParen, "(")),
            ')' => tokens.push(Token::new(TokenKind::RightParen, ")")),
            '\'' => return Err(LexError::MisplacedDerivativeMarker),
            c => return Err(LexError::IllegalCharacter(c)),
        }
    }

    Ok(tokens)
}
