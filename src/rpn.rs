//! # rpn.rs
//!
//! Converts an infix token sequence into Reverse Polish Notation (RPN)
//! using the Shunting-yard algorithm. The implementation handles
//! parentheses, operator precedence/associativity, and function-name
//! markers: an identifier rides the operator stack until its closing
//! parenthesis, so a call appears in the output immediately after its
//! argument and binds tighter than any binary operator.

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::operators::BinaryOperatorKind;

/// Handles the case when a right parenthesis `)` is encountered.
///
/// Pops tokens from the stack into the RPN output until a left parenthesis
/// is found, discards the parenthesis, and emits a function-name marker
/// sitting directly beneath it.
///
/// # Errors
///
/// Returns an error if no matching left parenthesis is found.
fn pop_until_left_paren(output: &mut Vec<Token>, stack: &mut Vec<Token>) -> Result<(), ParseError> {
    loop {
        match stack.pop() {
            Some(token) if token.kind() == TokenKind::LeftParen => {
                if matches!(
                    stack.last().map(Token::kind),
                    Some(TokenKind::Identifier | TokenKind::DerivativeIdentifier)
                ) {
                    output.push(stack.pop().unwrap());
                }
                return Ok(());
            }
            Some(token) => output.push(token),
            None => return Err(ParseError::UnmatchedRightParen),
        }
    }
}

/// Handles the case when a binary operator is encountered.
///
/// Pops operators of higher precedence (or equal precedence for a
/// left-associative newcomer) into the output, then pushes the new operator.
/// `^` is right-associative, so it pops strictly-greater precedence only and
/// a chain like `2^3^2` nests to the right.
fn push_operator(oper: BinaryOperatorKind, token: Token, output: &mut Vec<Token>, stack: &mut Vec<Token>) {
    while let Some(top) = stack.last() {
        if top.kind() != TokenKind::Operator {
            break;
        }
        let Some(top_oper) = BinaryOperatorKind::from(top.text()) else {
            break;
        };
        let pops = if oper.is_left_assoc() {
            top_oper.precedence() >= oper.precedence()
        } else {
            top_oper.precedence() > oper.precedence()
        };
        if pops {
            output.push(stack.pop().unwrap());
        } else {
            break;
        }
    }
    stack.push(token);
}

/// Reorders an infix token sequence into postfix (RPN) order.
///
/// Operands (numbers and the variable) are emitted as they appear; operators
/// and function-name markers pass through an explicit stack. Unbalanced
/// grouping in either direction is a hard error rather than being silently
/// absorbed.
///
/// # Arguments
///
/// * `tokens` - The token sequence in source order.
///
/// # Returns
///
/// * `Ok(Vec<Token>)` - The tokens in postfix order.
/// * `Err(ParseError)` - If parentheses do not balance.
///
/// # Examples
///
/// ```rust
/// use calcgraph::lexer::tokenize;
/// use calcgraph::rpn::to_postfix;
///
/// let postfix = to_postfix(tokenize("3*x^2-5").unwrap()).unwrap();
/// let texts: Vec<&str> = postfix.iter().map(|t| t.text()).collect();
/// assert_eq!(texts, vec!["3", "x", "2", "^", "*", "5", "-"]);
/// ```
pub fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, ParseError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token.kind() {
            TokenKind::Number | TokenKind::Variable => output.push(token),

            TokenKind::Identifier | TokenKind::DerivativeIdentifier | TokenKind::LeftParen => {
                stack.push(token)
            }

            TokenKind::RightParen => pop_until_left_paren(&mut output, &mut stack)?,

            TokenKind::Operator => {
                // The lexer only emits the five known operator symbols.
                if let Some(oper) = BinaryOperatorKind::from(token.text()) {
                    push_operator(oper, token, &mut output, &mut stack);
                }
            }
        }
    }

    while let Some(token) = stack.pop() {
        if token.kind() == TokenKind::LeftParen {
            return Err(ParseError::UnmatchedLeftParen);
        }
        output.push(token);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn postfix_texts(input: &str) -> Vec<String> {
        to_postfix(tokenize(input).unwrap())
            .unwrap()
            .iter()
            .map(|t| t.text().to_string())
            .collect()
    }

    #[test]
    fn test_polynomial() {
        assert_eq!(postfix_texts("3*x^2-5"), vec!["3", "x", "2", "^", "*", "5", "-"]);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(postfix_texts("3+4*2"), vec!["3", "4", "2", "*", "+"]);
        assert_eq!(postfix_texts("3*4+2"), vec!["3", "4", "*", "2", "+"]);
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(postfix_texts("8-3-2"), vec!["8", "3", "-", "2", "-"]);
        assert_eq!(postfix_texts("8/4/2"), vec!["8", "4", "/", "2", "/"]);
        // `*` and `/` share a level and associate left to right.
        assert_eq!(postfix_texts("8*4/2"), vec!["8", "4", "*", "2", "/"]);
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(postfix_texts("2^3^2"), vec!["2", "3", "2", "^", "^"]);
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(postfix_texts("(3+4)*2"), vec!["3", "4", "+", "2", "*"]);
    }

    #[test]
    fn test_call_follows_its_argument() {
        assert_eq!(postfix_texts("sin(x)"), vec!["x", "sin"]);
        assert_eq!(postfix_texts("sin(x+1)"), vec!["x", "1", "+", "sin"]);
        // Call precedence binds tighter than the surrounding operator.
        assert_eq!(postfix_texts("sin(x)+x"), vec!["x", "sin", "x", "+"]);
    }

    #[test]
    fn test_nested_calls() {
        assert_eq!(postfix_texts("cos(sin(x))"), vec!["x", "sin", "cos"]);
    }

    #[test]
    fn test_derivative_marker_travels_with_the_name() {
        assert_eq!(postfix_texts("f'(x+1)"), vec!["x", "1", "+", "f'"]);
    }

    #[test]
    fn test_unmatched_right_paren() {
        let err = to_postfix(tokenize("1+2)").unwrap()).unwrap_err();
        assert_eq!(err, ParseError::UnmatchedRightParen);
    }

    #[test]
    fn test_unmatched_left_paren() {
        let err = to_postfix(tokenize("(1+2").unwrap()).unwrap_err();
        assert_eq!(err, ParseError::UnmatchedLeftParen);
    }

    #[test]
    fn test_empty_input() {
        assert!(to_postfix(Vec::new()).unwrap().is_empty());
    }
}
