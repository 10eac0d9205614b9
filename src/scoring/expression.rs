//! A small boolean combinator language for the `requirements`
//! expression.
//!
//! The expression is parsed once at configuration time into an AST and
//! evaluated by walking it; no code is ever executed at runtime.
//!
//! Grammar (highest precedence first): `not`, `and`, `xor`, `or`,
//! with parentheses for grouping. Everything that is not an operator
//! or a parenthesis is a parameter name.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// One node of the parsed requirements expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Name(String),
    Not(Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Xor(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
}

impl Expression {
    /// Parses an expression string, e.g.
    /// `cdna_length and (exon_num or not monoexonic)`.
    pub fn parse(input: &str) -> Result<Expression, String> {
        let tokens = tokenize(input)?;
        let mut parser = Parser { tokens, position: 0 };
        let expression = parser.or_expression()?;
        if parser.position != parser.tokens.len() {
            return Err(format!(
                "trailing input after position {} in expression `{}`",
                parser.position, input
            ));
        }
        Ok(expression)
    }

    /// All parameter names referenced by the expression.
    pub fn names(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Expression::Name(name) => {
                names.insert(name.as_str());
            }
            Expression::Not(inner) => inner.collect_names(names),
            Expression::And(left, right)
            | Expression::Xor(left, right)
            | Expression::Or(left, right) => {
                left.collect_names(names);
                right.collect_names(names);
            }
        }
    }

    /// Evaluates the expression against the per-parameter outcomes.
    /// Parameters missing from the map count as `false`.
    pub fn evaluate(&self, outcomes: &BTreeMap<String, bool>) -> bool {
        match self {
            Expression::Name(name) => *outcomes.get(name).unwrap_or(&false),
            Expression::Not(inner) => !inner.evaluate(outcomes),
            Expression::And(left, right) => left.evaluate(outcomes) && right.evaluate(outcomes),
            Expression::Xor(left, right) => left.evaluate(outcomes) != right.evaluate(outcomes),
            Expression::Or(left, right) => left.evaluate(outcomes) || right.evaluate(outcomes),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Name(name) => write!(f, "{}", name),
            Expression::Not(inner) => write!(f, "not {}", inner),
            Expression::And(left, right) => write!(f, "({} and {})", left, right),
            Expression::Xor(left, right) => write!(f, "({} xor {})", left, right),
            Expression::Or(left, right) => write!(f, "({} or {})", left, right),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    LParen,
    RParen,
    And,
    Or,
    Not,
    Xor,
    Name(String),
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = vec![];
    let mut current = String::new();
    let mut flush = |current: &mut String, tokens: &mut Vec<Token>| {
        if current.is_empty() {
            return;
        }
        let token = match current.as_str() {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            "xor" => Token::Xor,
            name => Token::Name(name.to_string()),
        };
        tokens.push(token);
        current.clear();
    };
    for ch in input.chars() {
        match ch {
            '(' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::LParen);
            }
            ')' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::RParen);
            }
            c if c.is_whitespace() => flush(&mut current, &mut tokens),
            c => current.push(c),
        }
    }
    flush(&mut current, &mut tokens);
    if tokens.is_empty() {
        return Err("empty requirements expression".to_string());
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn or_expression(&mut self) -> Result<Expression, String> {
        let mut left = self.xor_expression()?;
        while self.peek() == Some(&Token::Or) {
            self.advance();
            let right = self.xor_expression()?;
            left = Expression::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn xor_expression(&mut self) -> Result<Expression, String> {
        let mut left = self.and_expression()?;
        while self.peek() == Some(&Token::Xor) {
            self.advance();
            let right = self.and_expression()?;
            left = Expression::Xor(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_expression(&mut self) -> Result<Expression, String> {
        let mut left = self.factor()?;
        while self.peek() == Some(&Token::And) {
            self.advance();
            let right = self.factor()?;
            left = Expression::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn factor(&mut self) -> Result<Expression, String> {
        match self.advance() {
            Some(Token::Not) => Ok(Expression::Not(Box::new(self.factor()?))),
            Some(Token::LParen) => {
                let inner = self.or_expression()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err("unbalanced parenthesis in requirements expression".to_string()),
                }
            }
            Some(Token::Name(name)) => Ok(Expression::Name(name)),
            other => Err(format!(
                "unexpected token {:?} in requirements expression",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcomes(pairs: &[(&str, bool)]) -> BTreeMap<String, bool> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_single_name() {
        let expr = Expression::parse("cdna_length").unwrap();
        assert!(expr.evaluate(&outcomes(&[("cdna_length", true)])));
        assert!(!expr.evaluate(&outcomes(&[("cdna_length", false)])));
        // missing parameters count as failed
        assert!(!expr.evaluate(&outcomes(&[])));
    }

    #[test]
    fn test_precedence_not_binds_tightest() {
        let expr = Expression::parse("not a and b").unwrap();
        assert_eq!(
            expr,
            Expression::And(
                Box::new(Expression::Not(Box::new(Expression::Name("a".into())))),
                Box::new(Expression::Name("b".into()))
            )
        );
    }

    #[test]
    fn test_precedence_and_over_or() {
        let expr = Expression::parse("a or b and c").unwrap();
        assert!(expr.evaluate(&outcomes(&[("a", true), ("b", false), ("c", false)])));
        assert!(!expr.evaluate(&outcomes(&[("a", false), ("b", true), ("c", false)])));
        assert!(expr.evaluate(&outcomes(&[("a", false), ("b", true), ("c", true)])));
    }

    #[test]
    fn test_parentheses() {
        let expr = Expression::parse("(a or b) and c").unwrap();
        assert!(!expr.evaluate(&outcomes(&[("a", true), ("b", false), ("c", false)])));
        assert!(expr.evaluate(&outcomes(&[("a", true), ("b", false), ("c", true)])));
    }

    #[test]
    fn test_xor() {
        let expr = Expression::parse("a xor b").unwrap();
        assert!(expr.evaluate(&outcomes(&[("a", true), ("b", false)])));
        assert!(!expr.evaluate(&outcomes(&[("a", true), ("b", true)])));
    }

    #[test]
    fn test_dotted_parameter_names() {
        let expr = Expression::parse("cdna_length.mono or cdna_length.multi").unwrap();
        let names = expr.names();
        assert!(names.contains("cdna_length.mono"));
        assert!(names.contains("cdna_length.multi"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Expression::parse("").is_err());
        assert!(Expression::parse("a and").is_err());
        assert!(Expression::parse("(a or b").is_err());
        assert!(Expression::parse("a b").is_err());
        assert!(Expression::parse("and a").is_err());
    }
}
