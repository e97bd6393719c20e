//! Three-address code generation for validated token sequences.
//!
//! Parentheses are flattened away first: every surviving token is tagged
//! with its nesting depth, and generation walks the depths from innermost to
//! outermost. Within one depth four passes run in fixed precedence order
//! (functions, `^`, `*` `/`, `+` `-`), each resolving its operator against
//! the nearest not-yet-consumed neighbors. A resolved operator leaves its
//! destination address behind in the token slot it anchors on, which is how
//! later passes pick the partial result up by reference instead of by text.
//!
//! Addresses are handed out as a dense increasing sequence, one per emitted
//! instruction, and are never reused. Any address an instruction reads was
//! therefore written by a strictly earlier instruction, and a single
//! left-to-right pass evaluates the whole list.

use crate::token::{Op, Token, TokenKind};
use crate::util::FUNCTIONS;

/// An instruction operand
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    /// A numeric immediate, parsed from the literal's text
    Value(f64),
    /// A variable immediate, resolved against the bindings per evaluation
    Variable(char),
    /// A reference to an earlier instruction's destination slot
    Address(usize),
}

/// One three-address instruction: up to two operands, an operation kind and
/// a write-once destination slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operation {
    /// Left operand, the only one unary operations read
    pub left: Operand,
    /// Right operand, absent for unary operations
    pub right: Option<Operand>,
    /// Destination slot in the result buffer
    pub dest: usize,
    /// The operation to apply
    pub op: Op,
}

/// Generate the instruction list for a token sequence that already passed
/// the grammar check. No re-validation happens here.
///
/// The list is never empty for validated input: a lone literal or variable
/// gets a synthesized unary-identity instruction so the evaluator always has
/// at least one slot to read back.
pub fn generate(tokens: &[Token]) -> Vec<Operation> {
    let (flat, levels, max_level) = strip_parentheses(tokens);
    let n = flat.len();
    let mut instructions = Vec::new();
    if n == 0 {
        return instructions;
    }
    if n == 1 {
        instructions.push(Operation {
            left: operand(flat[0], None),
            right: None,
            dest: 0,
            op: Op::Identity,
        });
        return instructions;
    }

    let mut consumed = vec![false; n];
    let mut slots: Vec<Option<usize>> = vec![None; n];
    let mut next_address = 0;

    for level in (0..=max_level).rev() {
        // Functions bind tightest: each consumes the nearest unconsumed
        // token to its right and leaves the address in its own slot.
        for i in 0..n {
            if levels[i] != level || flat[i].kind != TokenKind::Function {
                continue;
            }
            let right = nearest_right(&consumed, i);
            consumed[right] = true;
            let argument = operand(flat[right], slots[right]);
            let op = FUNCTIONS
                .get(flat[i].lexeme.as_str())
                .copied()
                .unwrap_or(Op::Identity);
            instructions.push(Operation {
                left: argument,
                right: None,
                dest: next_address,
                op,
            });
            slots[i] = Some(next_address);
            next_address += 1;
        }

        for i in 0..n {
            if levels[i] == level && flat[i].is_operator('^') {
                emit_binary(
                    &flat,
                    &mut consumed,
                    &mut slots,
                    &mut instructions,
                    &mut next_address,
                    i,
                    Op::Pow,
                );
            }
        }

        for i in 0..n {
            if levels[i] == level && (flat[i].is_operator('*') || flat[i].is_operator('/')) {
                let op = if flat[i].is_operator('*') {
                    Op::Mul
                } else {
                    Op::Div
                };
                emit_binary(
                    &flat,
                    &mut consumed,
                    &mut slots,
                    &mut instructions,
                    &mut next_address,
                    i,
                    op,
                );
            }
        }

        // `+` and `-` may be unary: at the very start of the flattened
        // sequence, or right after a token from a shallower depth, which is
        // where a sign directly follows an opening parenthesis.
        for i in 0..n {
            if levels[i] != level || !(flat[i].is_operator('+') || flat[i].is_operator('-')) {
                continue;
            }
            let right = nearest_right(&consumed, i);
            consumed[right] = true;
            let right_operand = operand(flat[right], slots[right]);
            if i == 0 || levels[i - 1] < level {
                let op = if flat[i].is_operator('+') {
                    Op::Identity
                } else {
                    Op::Negate
                };
                instructions.push(Operation {
                    left: right_operand,
                    right: None,
                    dest: next_address,
                    op,
                });
                slots[i] = Some(next_address);
            } else {
                let left = nearest_left(&consumed, i);
                let left_operand = operand(flat[left], slots[left]);
                consumed[i] = true;
                let op = if flat[i].is_operator('+') {
                    Op::Add
                } else {
                    Op::Sub
                };
                instructions.push(Operation {
                    left: left_operand,
                    right: Some(right_operand),
                    dest: next_address,
                    op,
                });
                slots[left] = Some(next_address);
            }
            next_address += 1;
        }
    }
    instructions
}

fn emit_binary(
    flat: &[&Token],
    consumed: &mut [bool],
    slots: &mut [Option<usize>],
    instructions: &mut Vec<Operation>,
    next_address: &mut usize,
    i: usize,
    op: Op,
) {
    let left = nearest_left(consumed, i);
    let right = nearest_right(consumed, i);
    consumed[i] = true;
    consumed[right] = true;
    let left_operand = operand(flat[left], slots[left]);
    let right_operand = operand(flat[right], slots[right]);
    // the left neighbor's slot anchors the partial result
    slots[left] = Some(*next_address);
    instructions.push(Operation {
        left: left_operand,
        right: Some(right_operand),
        dest: *next_address,
        op,
    });
    *next_address += 1;
}

/// Nearest not-yet-consumed index left of `i`. The scan stops at index 0
/// without testing it; chained same-precedence operators resolve left to
/// right because of this anchor choice.
fn nearest_left(consumed: &[bool], i: usize) -> usize {
    let mut index = i.saturating_sub(1);
    while index > 0 && consumed[index] {
        index -= 1;
    }
    index
}

/// Nearest not-yet-consumed index right of `i`, clamped to the last token
fn nearest_right(consumed: &[bool], i: usize) -> usize {
    let mut index = (i + 1).min(consumed.len() - 1);
    while index + 1 < consumed.len() && consumed[index] {
        index += 1;
    }
    index
}

fn operand(token: &Token, slot: Option<usize>) -> Operand {
    match slot {
        Some(address) => Operand::Address(address),
        None if token.kind == TokenKind::Variable => {
            Operand::Variable(token.lexeme.chars().next().unwrap_or_default())
        }
        None => Operand::Value(token.lexeme.parse().unwrap_or(f64::NAN)),
    }
}

/// Drop parenthesis tokens, tagging every survivor with its nesting depth
fn strip_parentheses(tokens: &[Token]) -> (Vec<&Token>, Vec<usize>, usize) {
    let mut flat = Vec::with_capacity(tokens.len());
    let mut levels = Vec::with_capacity(tokens.len());
    let mut max_level = 0;
    let mut level: usize = 0;
    for token in tokens {
        match token.kind {
            TokenKind::OpeningParenthesis => {
                level += 1;
                if level > max_level {
                    max_level = level;
                }
            }
            TokenKind::ClosingParenthesis => level = level.saturating_sub(1),
            _ => {
                flat.push(token);
                levels.push(level);
            }
        }
    }
    (flat, levels, max_level)
}
