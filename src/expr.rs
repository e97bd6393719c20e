use std::collections::{HashMap, HashSet};

use crate::codegen::generate;
use crate::eval::Evaluator;
use crate::grammar;
use crate::lexer::Lexer;
use crate::token::TokenKind;
use crate::Error;

/// Compile and evaluate a single expression from `input`.
///
/// Returns `Ok(result)` when compilation succeeds, or `Err(cause)` with the
/// failing phase's classification. Variables not present in `context`
/// evaluate as 0.0.
///
/// # Example
///
/// ```
/// # use std::collections::HashMap;
/// # use plotexpr::eval;
///
/// assert_eq!(eval("45 - 2^3", &HashMap::new()), Ok(37.0));
///
/// let mut context: HashMap<char, f64> = HashMap::new();
/// context.insert('a', -5.0);
/// assert_eq!(eval("3 * a", &context), Ok(-15.0));
/// ```
pub fn eval(input: &str, context: &HashMap<char, f64>) -> Result<f64, Error> {
    let mut expr = Expr::parse(input)?;
    for (&name, &value) in context {
        expr.set_variable(name, value);
    }
    Ok(expr.eval())
}

/// A compiled mathematical expression.
///
/// Compilation happens once in [`parse`](Expr::parse); evaluation then runs
/// the compiled instruction list against the current variable bindings, as
/// many times as needed.
///
/// # Examples
/// ```
/// use plotexpr::Expr;
///
/// let mut expr = Expr::parse("3 + 5 * 2").unwrap();
/// assert_eq!(expr.eval(), 13.0);
///
/// let mut expr = Expr::parse("x^2 - 1").unwrap();
/// expr.set_variable('x', 3.0);
/// assert_eq!(expr.eval(), 8.0);
/// expr.set_variable('x', 4.0);
/// assert_eq!(expr.eval(), 15.0);
/// ```
pub struct Expr {
    variables: HashSet<char>,
    evaluator: Evaluator,
}

impl Expr {
    /// Compile `expression`: scan, check the grammar, generate the
    /// instruction list and set up the evaluator.
    ///
    /// The two analysis phases short-circuit: a lexical error comes back
    /// before the grammar is ever consulted.
    ///
    /// # Examples
    /// ```
    /// # use plotexpr::Expr;
    /// assert!(Expr::parse("3 + 5 * 2").is_ok());
    /// assert!(Expr::parse("3,5 + 2").is_err());
    /// ```
    pub fn parse(expression: &str) -> Result<Self, Error> {
        let tokens = Lexer::new(expression).scan()?;
        grammar::validate(&tokens)?;
        let instructions = generate(&tokens);
        let variables = tokens
            .iter()
            .filter(|token| token.kind == TokenKind::Variable)
            .filter_map(|token| token.lexeme.chars().next())
            .collect();
        Ok(Self {
            variables,
            evaluator: Evaluator::new(instructions, &tokens),
        })
    }

    /// Upsert a variable binding, effective on the next evaluation
    pub fn set_variable(&mut self, name: char, value: f64) {
        self.evaluator.set_variable_value(name, value);
    }

    /// Evaluate under the current bindings. Unset variables read as 0.0;
    /// runtime domain errors come back as `inf`/`NaN`, never as failures.
    pub fn eval(&mut self) -> f64 {
        self.evaluator.evaluate()
    }

    /// Check if the expression holds no variable. Constant expressions are
    /// evaluated once at compile time and cached.
    pub fn is_constant(&self) -> bool {
        self.evaluator.is_constant()
    }

    /// The letters the expression reads as variables.
    ///
    /// # Examples
    /// ```
    /// # use plotexpr::Expr;
    /// let expr = Expr::parse("x * sin(x) + a").unwrap();
    /// let mut letters: Vec<char> = expr.variables().iter().copied().collect();
    /// letters.sort_unstable();
    /// assert_eq!(letters, ['a', 'x']);
    /// ```
    pub fn variables(&self) -> &HashSet<char> {
        &self.variables
    }

    /// Sweep `x` from one bound to the other with a fixed `step`, collecting
    /// `(x, f(x))` pairs for plotting.
    ///
    /// Bounds may come in either order. A step that is not strictly positive
    /// yields no points. Non-finite results stay in the output, hosts drop
    /// them at render time.
    ///
    /// # Examples
    /// ```
    /// # use plotexpr::Expr;
    /// let mut expr = Expr::parse("x^2").unwrap();
    /// let points = expr.sample_step(0.0, 2.0, 1.0);
    /// assert_eq!(points, [(0.0, 0.0), (1.0, 1.0), (2.0, 4.0)]);
    /// ```
    pub fn sample_step(&mut self, from: f64, to: f64, step: f64) -> Vec<(f64, f64)> {
        let lower = from.min(to);
        let upper = from.max(to);
        let mut points = Vec::new();
        if !(step > 0.0) || !lower.is_finite() || !upper.is_finite() {
            return points;
        }
        let mut x = lower;
        while x <= upper {
            points.push((x, self.eval_at(x)));
            x += step;
        }
        points
    }

    /// Sweep `x` across the bounds in `count` equal steps, collecting
    /// exactly `count` `(x, f(x))` pairs starting at the lower bound.
    pub fn sample_count(&mut self, from: f64, to: f64, count: usize) -> Vec<(f64, f64)> {
        let lower = from.min(to);
        let upper = from.max(to);
        if count == 0 || !lower.is_finite() || !upper.is_finite() {
            return Vec::new();
        }
        #[allow(clippy::cast_precision_loss)]
        let step = (upper - lower) / count as f64;
        let mut points = Vec::with_capacity(count);
        let mut x = lower;
        for _ in 0..count {
            points.push((x, self.eval_at(x)));
            x += step;
        }
        points
    }

    fn eval_at(&mut self, x: f64) -> f64 {
        // constant expressions keep their cache, no point rebinding
        if !self.is_constant() {
            self.set_variable('x', x);
        }
        self.eval()
    }
}
