use hashbrown::HashMap;

use crate::token::Op;

lazy_static! {
    /// The fixed function-name table. Process-wide, read-only, initialized
    /// once; lookups are case-sensitive.
    pub static ref FUNCTIONS: HashMap<&'static str, Op> = {
        let mut map = HashMap::new();
        // Trigonometric
        map.insert("sin", Op::Sin);
        map.insert("cos", Op::Cos);
        map.insert("tan", Op::Tan);
        map.insert("asin", Op::Asin);
        map.insert("acos", Op::Acos);
        map.insert("atan", Op::Atan);
        // Hyperbolic
        map.insert("sinh", Op::Sinh);
        map.insert("cosh", Op::Cosh);
        map.insert("tanh", Op::Tanh);
        map.insert("acosh", Op::Acosh);
        map.insert("asinh", Op::Asinh);
        map.insert("atanh", Op::Atanh);
        // Miscellaneous
        map.insert("exp", Op::Exp);
        map.insert("ln", Op::Ln);
        map.insert("log", Op::Log);
        map.insert("sqrt", Op::Sqrt);
        map.insert("abs", Op::Abs);
        map.insert("cbrt", Op::Cbrt);
        map.shrink_to_fit();
        map
    };
}

#[cfg(test)]
mod tests {
    use super::FUNCTIONS;

    #[test]
    fn table() {
        assert_eq!(FUNCTIONS.len(), 18);
        assert!(FUNCTIONS.contains_key("sin"));
        assert!(FUNCTIONS.contains_key("cbrt"));
        // case-sensitive, no partial matches
        assert!(!FUNCTIONS.contains_key("Sin"));
        assert!(!FUNCTIONS.contains_key("si"));
        assert!(!FUNCTIONS.contains_key("log2"));
    }
}
