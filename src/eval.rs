use std::collections::HashMap;

use crate::codegen::{Operand, Operation};
use crate::token::{Token, TokenKind};

/// Executes a compiled instruction list, once per variable binding.
///
/// The evaluator owns a result buffer sized exactly to its instruction
/// count and reuses it in place across calls. Compiling once and calling
/// [`evaluate`](Evaluator::evaluate) per sample point is the whole point of
/// the instruction encoding: producing a plot over a range must never
/// recompile or reallocate.
///
/// Runtime numerics never fail. Division by zero and domain errors on
/// functions come back as IEEE-754 `inf`/`NaN`, which plotting hosts simply
/// skip when rendering.
pub struct Evaluator {
    instructions: Vec<Operation>,
    variables: HashMap<char, f64>,
    results: Vec<f64>,
    constant: bool,
    last_evaluation: f64,
}

impl Evaluator {
    /// Build an evaluator owning `instructions`.
    ///
    /// The token sequence the instructions were generated from is scanned
    /// once: when it holds no variable the expression is constant, gets
    /// evaluated eagerly exactly once, and every later call returns the
    /// cached value no matter what bindings are set. An empty token slice
    /// disables the optimization.
    pub fn new(instructions: Vec<Operation>, tokens: &[Token]) -> Self {
        let mut evaluator = Self {
            results: vec![0.0; instructions.len()],
            instructions,
            variables: HashMap::new(),
            constant: false,
            last_evaluation: 0.0,
        };
        let constant =
            !tokens.is_empty() && tokens.iter().all(|token| token.kind != TokenKind::Variable);
        if constant {
            evaluator.evaluate();
            evaluator.constant = true;
        }
        evaluator
    }

    /// Upsert a variable binding. Takes effect on the next evaluation;
    /// constant expressions ignore bindings entirely.
    pub fn set_variable_value(&mut self, name: char, value: f64) {
        self.variables.insert(name, value);
    }

    /// Check if the compiled expression holds no variable
    pub fn is_constant(&self) -> bool {
        self.constant
    }

    /// Run the instruction list under the current bindings.
    ///
    /// Unset variables resolve to 0.0. The value of the last destination
    /// slot is the expression's result.
    pub fn evaluate(&mut self) -> f64 {
        if self.constant {
            return self.last_evaluation;
        }
        for operation in &self.instructions {
            let left = resolve(operation.left, &self.variables, &self.results);
            let right = operation
                .right
                .map_or(0.0, |operand| resolve(operand, &self.variables, &self.results));
            self.results[operation.dest] = operation.op.apply(left, right);
        }
        self.last_evaluation = self.results.last().copied().unwrap_or_default();
        self.last_evaluation
    }
}

fn resolve(operand: Operand, variables: &HashMap<char, f64>, results: &[f64]) -> f64 {
    match operand {
        Operand::Value(value) => value,
        Operand::Variable(name) => variables.get(&name).copied().unwrap_or(0.0),
        Operand::Address(address) => results[address],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::generate;
    use crate::grammar;
    use crate::lexer::Lexer;

    fn evaluator(input: &str) -> Evaluator {
        let tokens = Lexer::new(input).scan().unwrap();
        grammar::validate(&tokens).unwrap();
        Evaluator::new(generate(&tokens), &tokens)
    }

    #[test]
    fn constant_expressions_are_cached() {
        let mut eval = evaluator("2*3+4");
        assert!(eval.is_constant());
        assert_eq!(eval.evaluate(), 10.0);

        // bindings are irrelevant once constant
        eval.set_variable_value('x', 100.0);
        assert_eq!(eval.evaluate(), 10.0);
    }

    #[test]
    fn variables_rebind_between_evaluations() {
        let mut eval = evaluator("x^2+1");
        assert!(!eval.is_constant());

        eval.set_variable_value('x', 2.0);
        assert_eq!(eval.evaluate(), 5.0);

        eval.set_variable_value('x', 3.0);
        assert_eq!(eval.evaluate(), 10.0);

        // upsert overwrites, the buffer is reused in place
        eval.set_variable_value('x', 2.0);
        assert_eq!(eval.evaluate(), 5.0);
    }

    #[test]
    fn unset_variables_read_as_zero() {
        let mut eval = evaluator("x+5");
        assert_eq!(eval.evaluate(), 5.0);
    }

    #[test]
    fn any_letter_can_bind() {
        let mut eval = evaluator("a*b");
        eval.set_variable_value('a', 3.0);
        eval.set_variable_value('b', 7.0);
        assert_eq!(eval.evaluate(), 21.0);
    }

    #[test]
    fn runtime_numerics_never_fail() {
        let mut eval = evaluator("1/x");
        assert!(eval.evaluate().is_infinite());

        let mut eval = evaluator("sqrt(0-2)");
        assert!(eval.evaluate().is_nan());

        let mut eval = evaluator("ln(0)");
        assert_eq!(eval.evaluate(), f64::NEG_INFINITY);
    }

    #[test]
    fn empty_token_slice_disables_constant_folding() {
        let tokens = Lexer::new("1+1").scan().unwrap();
        let mut eval = Evaluator::new(generate(&tokens), &[]);
        assert!(!eval.is_constant());
        assert_eq!(eval.evaluate(), 2.0);
    }

    #[test]
    fn empty_instruction_list_evaluates_to_zero() {
        let mut eval = Evaluator::new(Vec::new(), &[]);
        assert_eq!(eval.evaluate(), 0.0);
    }
}
