#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(
    clippy::needless_return,
    clippy::missing_docs_in_private_items,
    clippy::must_use_candidate
)]

//! plotexpr, a crate for compiling mathematical expressions once and
//! evaluating them many times.
//!
//! This crate targets function-plotting hosts: an expression over a single
//! variable is compiled into a short list of address-addressed instructions,
//! and that list is then evaluated for every sample point of the plot
//! without any recompilation. The easiest way to use this crate is with the
//! [`eval`](fn.eval.html) function:
//!
//! ```
//! use std::collections::HashMap;
//! assert_eq!(plotexpr::eval("3 + 5 * 2", &HashMap::new()), Ok(13.0));
//! ```
//!
//! The second argument to `eval` is a [`HashMap`](std::collections::HashMap)
//! that can define single-letter variables:
//!
//! ```
//! use std::collections::HashMap;
//!
//! let mut context: HashMap<char, f64> = HashMap::new();
//! context.insert('a', 3.5);
//! assert_eq!(plotexpr::eval("2 * a", &context), Ok(7.0));
//! ```
//!
//! The compile-once/evaluate-many split is the [`Expr`](struct.Expr.html)
//! type. This is what a plotting host wants: parse the expression one time,
//! then rebind the variable and re-evaluate per sample.
//!
//! ```
//! use plotexpr::Expr;
//!
//! let mut expr = Expr::parse("x^2 + 1").unwrap();
//! expr.set_variable('x', 2.0);
//! assert_eq!(expr.eval(), 5.0);
//! expr.set_variable('x', 3.0);
//! assert_eq!(expr.eval(), 10.0);
//!
//! // or sweep a whole range in one call
//! let points = expr.sample_step(0.0, 2.0, 1.0);
//! assert_eq!(points, [(0.0, 1.0), (1.0, 2.0), (2.0, 5.0)]);
//! ```
//!
//! # Language definition
//!
//! The expression language contains the following elements:
//!
//! - numeric literals: digits with an optional fractional part (`12`,
//!   `0.25`). No exponent notation and no sign; a literal may not end in a
//!   bare dot;
//! - left and right parenthesis;
//! - mathematical operators: `+` for addition, `-` for subtraction, `*` for
//!   multiplication, `/` for division and `^` for exponentiation;
//! - unary `+` and `-`, at the start of an expression or right after an
//!   opening parenthesis;
//! - variables, a single ASCII letter each. Unset variables evaluate to
//!   0.0;
//! - function calls: `sin(x)`, `atan(22.0)`. The available functions are
//!   `sqrt`, `cbrt`, `sin`, `cos`, `tan`, `asin`, `acos`, `atan`, `sinh`,
//!   `cosh`, `tanh`, `asinh`, `acosh`, `atanh`, `exp`, `ln` (natural
//!   logarithm), `log` (base 10) and `abs`, with the meaning of the
//!   corresponding [`libm`] routine. Any other word is an error.
//!
//! Spaces are skipped; any other symbol is forbidden in the input.
//!
//! Operators of the same precedence resolve strictly left to right. That
//! includes `^`: `2^3^2` is `(2^3)^2 = 64`, not `2^(3^2)`.
//!
//! # Technical details
//!
//! Compilation runs three phases: a hand-rolled finite automaton scans the
//! text into tokens, an explicit stack machine checks the token sequence
//! against an LL(1) grammar (no recursion, so nesting depth is bounded by
//! the heap only), and a four-pass generator lowers the tokens into
//! three-address instructions, innermost parentheses first. Evaluation
//! walks the instruction list in order over a result buffer owned by the
//! [`Evaluator`](struct.Evaluator.html); expressions without a variable are
//! folded into a cached constant at compile time.
//!
//! Evaluation works only with `f64` data and never fails: division by zero
//! and domain errors propagate as IEEE-754 `inf`/`NaN` results, which a
//! plotting host simply leaves out of the picture.

#[macro_use]
extern crate lazy_static;

mod codegen;
mod error;
mod eval;
mod expr;
mod grammar;
mod lexer;
mod token;
mod util;

pub use crate::codegen::{generate, Operand, Operation};
pub use crate::error::Error;
pub use crate::eval::Evaluator;
pub use crate::expr::{eval, Expr};
pub use crate::grammar::validate;
pub use crate::lexer::Lexer;
pub use crate::token::{Op, Token, TokenKind};
pub use crate::util::FUNCTIONS;
