//! # error.rs
//!
//! Error types raised while turning an expression string into a callable
//! function. All of them are synchronous, definition-time failures: once a
//! function has been compiled, evaluating it never raises (invalid samples
//! surface as `NaN` or infinities instead).

use thiserror::Error;

/// Errors raised while splitting an expression string into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A numeric literal contains two or more decimal points.
    #[error("number \"{0}\" has more than one decimal point")]
    DoubleDecimalPoint(String),

    /// A decimal point with no digits around it.
    #[error("decimal point is not part of a number")]
    LoneDecimalPoint,

    /// An alphabetic run that is not followed by a call `(`.
    #[error("identifier \"{0}\" is not followed by \"(\"")]
    BareIdentifier(String),

    /// A derivative marker `'` that does not sit between a function name
    /// and `(`.
    #[error("derivative marker \"'\" must follow a function name and precede \"(\"")]
    MisplacedDerivativeMarker,

    /// Any character outside the accepted alphabet.
    #[error("unknown character {0:?}")]
    IllegalCharacter(char),
}

/// Errors raised while reordering tokens into postfix form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `)` with no matching `(`.
    #[error("right parenthesis used, but left parenthesis not found")]
    UnmatchedRightParen,

    /// A `(` that is never closed.
    #[error("left parenthesis is never closed")]
    UnmatchedLeftParen,
}

/// Errors raised while compiling a postfix token sequence into a function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A binary operator was reached with fewer than two operands on the
    /// stack.
    #[error("operator \"{0}\" requires two operands")]
    MissingOperands(String),

    /// A call or derivative was reached with no argument on the stack.
    #[error("function \"{0}\" is called without an argument")]
    MissingArgument(String),

    /// A numeric literal that does not convert to a value.
    #[error("invalid numeric literal \"{0}\"")]
    InvalidLiteral(String),

    /// An operator symbol with no known implementation.
    #[error("unknown operator \"{0}\"")]
    UnknownOperator(String),

    /// A name that is neither a built-in nor a previously defined function.
    #[error("unknown function \"{0}\"")]
    UnknownIdentifier(String),

    /// A user-defined function may only call entries defined under a
    /// lexically smaller identifier; built-ins are exempt.
    #[error("function \"{callee}\" must be defined before \"{defining}\" to be called from it")]
    ForwardReference { callee: char, defining: char },

    /// The token sequence produced no value at all.
    #[error("expression is empty")]
    EmptyExpression,

    /// The token sequence left more than one value on the stack.
    #[error("expression leaves {0} values instead of one")]
    UnusedOperands(usize),
}

/// Any failure of the tokenize → parse → build pipeline.
///
/// A failed definition reports exactly one of the three stages; callers that
/// keep previous definitions around (an editing UI, the registry) can surface
/// the message and leave their state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = LexError::DoubleDecimalPoint("1.2.3".into());
        assert!(err.to_string().contains("1.2.3"));

        let err = BuildError::ForwardReference { callee: 'f', defining: 'b' };
        let msg = err.to_string();
        assert!(msg.contains('f') && msg.contains('b'));
    }

    #[test]
    fn test_stage_errors_convert_into_compile_error() {
        let err: CompileError = LexError::LoneDecimalPoint.into();
        assert_eq!(err, CompileError::Lex(LexError::LoneDecimalPoint));

        let err: CompileError = ParseError::UnmatchedLeftParen.into();
        assert_eq!(err, CompileError::Parse(ParseError::UnmatchedLeftParen));

        let err: CompileError = BuildError::EmptyExpression.into();
        assert_eq!(err, CompileError::Build(BuildError::EmptyExpression));
    }
}
