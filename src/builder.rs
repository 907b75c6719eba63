//! # builder.rs
//!
//! Compiles a postfix token sequence into a [`CompiledFunction`].
//!
//! The builder makes a single left-to-right pass over the postfix tokens,
//! keeping a stack of partial programs: operands push a fresh program,
//! binary operators and calls combine the programs beneath them. Exactly one
//! program must remain at the end.
//!
//! Identifier resolution follows two rules. Built-ins always win and may be
//! called from anywhere. A single-character name is a user-defined function
//! and may only be called if it was defined under a lexically smaller
//! identifier than the one being compiled; that ordering makes forward
//! references, self-recursion, and definition cycles impossible.

use std::collections::BTreeMap;

use crate::builtins::{self, Builtin};
use crate::error::BuildError;
use crate::function::{CompiledFunction, Op};
use crate::lexer::{Token, TokenKind};
use crate::operators::BinaryOperatorKind;
use crate::Real;

/// A resolved callee: either a built-in or a previously compiled user
/// function.
enum Callee {
    Builtin(Builtin),
    User(CompiledFunction),
}

impl Callee {
    /// Lifts the callee to a standalone function, for derivative capture.
    fn into_function(self) -> CompiledFunction {
        match self {
            Self::Builtin(builtin) => CompiledFunction::from_builtin(builtin),
            Self::User(func) => func,
        }
    }
}

/// Resolves a call target by name.
///
/// Built-ins are checked first and are exempt from the ordering rule.
/// Single-character names resolve against the user table, subject to the
/// strictly-smaller-identifier rule when a defining identifier is given.
fn resolve_callee(
    name: &str,
    defining: Option<char>,
    users: &BTreeMap<char, CompiledFunction>,
) -> Result<Callee, BuildError> {
    if let Some(builtin) = builtins::lookup(name) {
        return Ok(Callee::Builtin(*builtin));
    }

    let mut chars = name.chars();
    if let (Some(identifier), None) = (chars.next(), chars.next()) {
        if let Some(defining) = defining {
            if identifier >= defining {
                return Err(BuildError::ForwardReference { callee: identifier, defining });
            }
        }
        if let Some(func) = users.get(&identifier) {
            return Ok(Callee::User(func.clone()));
        }
    }

    Err(BuildError::UnknownIdentifier(name.to_string()))
}

/// Compiles postfix tokens into a callable function.
///
/// # Arguments
///
/// * `postfix` - The token sequence in postfix order, as produced by
///   [`crate::rpn::to_postfix`].
/// * `defining` - The identifier the result will be stored under, if any.
///   `Some(id)` enables the ordering check on user-function calls; `None`
///   compiles a standalone expression.
/// * `users` - Previously compiled user functions, by identifier.
///
/// # Errors
///
/// Returns a [`BuildError`] when an operator or call lacks its operands,
/// when a name resolves to neither a built-in nor a prior user function,
/// when a call violates the ordering rule, or when the sequence leaves
/// anything other than exactly one value.
pub fn build(
    postfix: &[Token],
    defining: Option<char>,
    users: &BTreeMap<char, CompiledFunction>,
) -> Result<CompiledFunction, BuildError> {
    let mut stack: Vec<Vec<Op>> = Vec::new();

    for token in postfix {
        match token.kind() {
            TokenKind::Number => {
                let value: Real = token
                    .text()
                    .parse()
                    .map_err(|_| BuildError::InvalidLiteral(token.text().to_string()))?;
                stack.push(vec![Op::Number(value)]);
            }

            TokenKind::Variable => stack.push(vec![Op::Variable]),

            TokenKind::Operator => {
                let oper = BinaryOperatorKind::from(token.text())
                    .ok_or_else(|| BuildError::UnknownOperator(token.text().to_string()))?;
                let rhs = stack
                    .pop()
                    .ok_or_else(|| BuildError::MissingOperands(token.text().to_string()))?;
                let mut lhs = stack
                    .pop()
                    .ok_or_else(|| BuildError::MissingOperands(token.text().to_string()))?;
                lhs.extend(rhs);
                lhs.push(Op::Binary(oper));
                stack.push(lhs);
            }

            TokenKind::Identifier => {
                let mut arg = stack
                    .pop()
                    .ok_or_else(|| BuildError::MissingArgument(token.text().to_string()))?;
                match resolve_callee(token.text(), defining, users)? {
                    Callee::Builtin(builtin) => arg.push(Op::Builtin(builtin)),
                    Callee::User(func) => arg.push(Op::Call(func)),
                }
                stack.push(arg);
            }

            TokenKind::DerivativeIdentifier => {
                let mut arg = stack
                    .pop()
                    .ok_or_else(|| BuildError::MissingArgument(token.text().to_string()))?;
                let name = token.text().trim_end_matches('\'');
                let callee = resolve_callee(name, defining, users)?.into_function();
                arg.push(Op::Derivative(callee));
                stack.push(arg);
            }

            TokenKind::LeftParen | TokenKind::RightParen => {
                unreachable!("parenthesis in postfix sequence: use parsed tokens")
            }
        }
    }

    match stack.len() {
        0 => Err(BuildError::EmptyExpression),
        1 => Ok(CompiledFunction::from_ops(stack.pop().unwrap())),
        n => Err(BuildError::UnusedOperands(n)),
    }
}
