use std::mem;

use crate::error::Error;
use crate::token::{Token, TokenKind};
use crate::util::FUNCTIONS;

/// States of the scanning automaton.
///
/// `Var`, `Func`, `Int`, `Frac` and `OneChar` are acceptors: when the
/// current character has no transition out of them, they emit the buffered
/// token and return to `Begin` without consuming that character. Each input
/// character is therefore examined at most twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Begin,
    Var,
    Func,
    Int,
    Dot,
    Frac,
    OneChar,
}

/// An helper struct for scanning the input
pub struct Lexer<'a> {
    input: &'a str,
}

impl<'a> Lexer<'a> {
    /// Build a scanner over `input`
    pub fn new(input: &str) -> Lexer {
        Lexer { input }
    }

    /// Scan the input into an ordered token sequence.
    ///
    /// Either the whole input is consumed or a `Lexical` error comes back;
    /// partial token sequences are never returned. A single virtual space is
    /// scanned past the end of the input to flush a pending token.
    pub fn scan(&self) -> Result<Vec<Token>, Error> {
        if self.input.is_empty() {
            return Err(Error::Lexical("empty expression".into()));
        }

        let bytes = self.input.as_bytes();
        let n = bytes.len();
        let mut tokens = Vec::new();
        let mut state = State::Begin;
        let mut buffer = String::new();
        let mut i = 0;
        while i <= n {
            let symbol = if i < n { bytes[i] as char } else { ' ' };
            match state {
                State::Begin => {
                    if symbol.is_ascii_alphabetic() {
                        state = State::Var;
                        buffer.push(symbol);
                    } else if symbol.is_ascii_digit() {
                        state = State::Int;
                        buffer.push(symbol);
                    } else if "+-*/^()".contains(symbol) {
                        state = State::OneChar;
                        buffer.push(symbol);
                    } else if symbol != ' ' {
                        return Err(Error::Lexical(format!(
                            "unexpected character '{}' at column {}",
                            symbol, i
                        )));
                    }
                    i += 1;
                }
                State::Var => {
                    if symbol.is_ascii_alphabetic() {
                        state = State::Func;
                        buffer.push(symbol);
                        i += 1;
                    } else {
                        tokens.push(Token::new(TokenKind::Variable, mem::take(&mut buffer), i));
                        state = State::Begin;
                    }
                }
                State::Func => {
                    if symbol.is_ascii_alphabetic() {
                        buffer.push(symbol);
                        i += 1;
                    } else if FUNCTIONS.contains_key(buffer.as_str()) {
                        tokens.push(Token::new(TokenKind::Function, mem::take(&mut buffer), i));
                        state = State::Begin;
                    } else {
                        return Err(Error::Lexical(format!(
                            "unknown function '{}' at column {}",
                            buffer, i
                        )));
                    }
                }
                State::Int => {
                    if symbol.is_ascii_digit() {
                        buffer.push(symbol);
                        i += 1;
                    } else if symbol == '.' {
                        buffer.push(symbol);
                        state = State::Dot;
                        i += 1;
                    } else {
                        tokens.push(Token::new(TokenKind::Value, mem::take(&mut buffer), i));
                        state = State::Begin;
                    }
                }
                State::Dot => {
                    // a literal may not end in a bare dot
                    if symbol.is_ascii_digit() {
                        buffer.push(symbol);
                        state = State::Frac;
                        i += 1;
                    } else {
                        return Err(Error::Lexical(format!(
                            "literal '{}' ends in a dot at column {}",
                            buffer, i
                        )));
                    }
                }
                State::Frac => {
                    if symbol.is_ascii_digit() {
                        buffer.push(symbol);
                        i += 1;
                    } else {
                        tokens.push(Token::new(TokenKind::Value, mem::take(&mut buffer), i));
                        state = State::Begin;
                    }
                }
                State::OneChar => {
                    tokens.push(one_char_token(mem::take(&mut buffer), i));
                    state = State::Begin;
                }
            }
        }
        Ok(tokens)
    }
}

fn one_char_token(lexeme: String, column: usize) -> Token {
    let kind = match lexeme.as_bytes().first() {
        Some(b'+') | Some(b'-') | Some(b'*') | Some(b'/') | Some(b'^') => {
            TokenKind::ArithmeticOperator
        }
        Some(b'(') => TokenKind::OpeningParenthesis,
        Some(b')') => TokenKind::ClosingParenthesis,
        _ => TokenKind::Unrecognized,
    };
    Token::new(kind, lexeme, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn kinds(input: &str) -> Result<Vec<TokenKind>, Error> {
        Lexer::new(input)
            .scan()
            .map(|tokens| tokens.iter().map(|t| t.kind).collect())
    }

    #[test_case("x" => Ok(vec![TokenKind::Variable]) ; "single letter is a variable")]
    #[test_case("42" => Ok(vec![TokenKind::Value]) ; "integer literal")]
    #[test_case("3.25" => Ok(vec![TokenKind::Value]) ; "fractional literal")]
    #[test_case("sin" => Ok(vec![TokenKind::Function]) ; "known function name")]
    #[test_case("sin(x)" => Ok(vec![
        TokenKind::Function,
        TokenKind::OpeningParenthesis,
        TokenKind::Variable,
        TokenKind::ClosingParenthesis,
    ]) ; "function call")]
    #[test_case("2 + 2" => Ok(vec![
        TokenKind::Value,
        TokenKind::ArithmeticOperator,
        TokenKind::Value,
    ]) ; "spaces are skipped")]
    #[test_case("x^2" => Ok(vec![
        TokenKind::Variable,
        TokenKind::ArithmeticOperator,
        TokenKind::Value,
    ]) ; "exponent operator")]
    fn scan(input: &str) -> Result<Vec<TokenKind>, Error> {
        kinds(input)
    }

    #[test]
    fn blank_input_scans_to_no_tokens() {
        // whitespace-only input is the grammar check's problem, not ours
        assert_eq!(Lexer::new("   ").scan(), Ok(vec![]));
    }

    #[test_case("" ; "empty input")]
    #[test_case("xy" ; "two letter word is not a variable")]
    #[test_case("sit" ; "unknown three letter word")]
    #[test_case("sinus(3)" ; "function name with trailing letters")]
    #[test_case("1." ; "literal ending in a dot")]
    #[test_case("3.a" ; "dot followed by a letter")]
    #[test_case("2 = 3" ; "character outside the alphabet")]
    #[test_case("café" ; "non ascii letter")]
    fn lexical_errors(input: &str) {
        assert!(matches!(
            Lexer::new(input).scan(),
            Err(Error::Lexical(_))
        ));
    }

    #[test]
    fn lexemes_and_columns() {
        let tokens = Lexer::new("10.5*x").scan().unwrap();
        let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, ["10.5", "*", "x"]);
        // columns point at the character after the completed token
        assert_eq!(tokens[0].column, 4);
        assert_eq!(tokens[1].column, 5);
        assert_eq!(tokens[2].column, 6);
    }

    #[test]
    fn parentheses_are_lexical_only() {
        // balance is the grammar's business, the scanner accepts any mix
        let tokens = Lexer::new(")(").scan().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::ClosingParenthesis);
        assert_eq!(tokens[1].kind, TokenKind::OpeningParenthesis);
    }

    #[test]
    fn whole_input_or_nothing() {
        // the error is reported even when a valid prefix was already scanned
        assert!(Lexer::new("1+2$3").scan().is_err());
        assert!(Lexer::new("sin(x)+zz").scan().is_err());
    }
}
