//! Expression tree, parser and evaluator.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | ':') unary | <implicit> power)*
//! unary   := ('+' | '-') unary | power
//! power   := postfix ('^' unary)?
//! postfix := primary ('%' | '²' | '³' | '!')*
//! primary := number | constant | function | lookup | bracket | '|' expr '|'
//! ```
//!
//! Implicit multiplication starts at a number, a name or an opening bracket,
//! never at `|`: the bar would be ambiguous with the end of an enclosing
//! `|x|`. `2|-3|` is a parse error; write `2*|-3|`.

use std::iter::Peekable;
use std::vec::IntoIter;

use crate::context::EvalContext;
use crate::error::{EvalError, ParseError, ParseErrorKind};
use crate::function::{Aggregate, Function, LookupFunction, factorial};
use crate::lexer::{Token, TokenKind, closing_bracket, tokenize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PostfixOp {
    Percent,
    Square,
    Cube,
    Factorial,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Number(f64),
    Negate(Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    Postfix(PostfixOp, Box<Node>),
    Abs(Box<Node>),
    Call(Function, Box<Node>),
    Aggregate(Aggregate, Vec<Node>),
    Lookup(LookupFunction, String),
}

/// A parsed arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    root: Node,
}

impl Expression {
    /// Parses `text`. Errors carry the 0-based character offset where
    /// parsing failed.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let end = text.chars().count();
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(ParseError::new(0, ParseErrorKind::Empty));
        }
        let mut parser = Parser {
            tokens: tokens.into_iter().peekable(),
            end,
        };
        let root = parser.expr()?;
        if let Some(token) = parser.tokens.next() {
            return Err(ParseError::new(
                token.position,
                ParseErrorKind::UnexpectedToken(token.kind.describe()),
            ));
        }
        Ok(Self { root })
    }

    /// Evaluates against `ctx`; only finite results are returned.
    pub fn eval(&self, ctx: &dyn EvalContext) -> Result<f64, EvalError> {
        let value = eval_node(&self.root, ctx)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::NonFinite)
        }
    }

    /// Whether evaluation needs statistics.
    pub fn has_lookups(&self) -> bool {
        has_lookups(&self.root)
    }
}

impl std::str::FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Evaluates a constant expression; `None` on any parse or evaluation error.
pub fn calc(text: &str) -> Option<f64> {
    Expression::parse(text).ok()?.eval(&()).ok()
}

struct Parser {
    tokens: Peekable<IntoIter<Token>>,
    /// Character count of the source, reported for errors at the end.
    end: usize,
}

impl Parser {
    fn peek(&mut self) -> Option<&TokenKind> {
        self.tokens.peek().map(|token| &token.kind)
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.tokens
            .next()
            .ok_or_else(|| ParseError::new(self.end, ParseErrorKind::UnexpectedEnd))
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        let token = self.tokens.next().ok_or_else(|| {
            ParseError::new(self.end, ParseErrorKind::Expected(expected))
        })?;
        let matches = match token.kind {
            TokenKind::Close(c) | TokenKind::Open(c) => c == expected,
            TokenKind::Pipe => expected == '|',
            _ => false,
        };
        if matches {
            Ok(())
        } else {
            Err(ParseError::new(token.position, ParseErrorKind::Expected(expected)))
        }
    }

    fn expr(&mut self) -> Result<Node, ParseError> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.tokens.next();
            let right = self.term()?;
            left = Node::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn term(&mut self) -> Result<Node, ParseError> {
        let mut left = self.unary()?;
        loop {
            let (op, right) = match self.peek() {
                Some(TokenKind::Star) => {
                    self.tokens.next();
                    (BinaryOp::Mul, self.unary()?)
                }
                Some(TokenKind::Slash | TokenKind::Colon) => {
                    self.tokens.next();
                    (BinaryOp::Div, self.unary()?)
                }
                Some(TokenKind::Number(_) | TokenKind::Ident(_) | TokenKind::Open(_)) => {
                    (BinaryOp::Mul, self.power()?)
                }
                _ => return Ok(left),
            };
            left = Node::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn unary(&mut self) -> Result<Node, ParseError> {
        match self.peek() {
            Some(TokenKind::Minus) => {
                self.tokens.next();
                Ok(Node::Negate(Box::new(self.unary()?)))
            }
            Some(TokenKind::Plus) => {
                self.tokens.next();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Node, ParseError> {
        let base = self.postfix()?;
        if matches!(self.peek(), Some(TokenKind::Caret)) {
            self.tokens.next();
            let exponent = self.unary()?;
            return Ok(Node::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn postfix(&mut self) -> Result<Node, ParseError> {
        let mut node = self.primary()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Percent) => PostfixOp::Percent,
                Some(TokenKind::Squared) => PostfixOp::Square,
                Some(TokenKind::Cubed) => PostfixOp::Cube,
                Some(TokenKind::Bang) => PostfixOp::Factorial,
                _ => return Ok(node),
            };
            self.tokens.next();
            node = Node::Postfix(op, Box::new(node));
        }
    }

    fn primary(&mut self) -> Result<Node, ParseError> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Number(value) => Ok(Node::Number(value)),
            TokenKind::Open(open) => {
                let inner = self.expr()?;
                self.expect(closing_bracket(open))?;
                Ok(inner)
            }
            TokenKind::Pipe => {
                let inner = self.expr()?;
                self.expect('|')?;
                Ok(Node::Abs(Box::new(inner)))
            }
            TokenKind::Ident(name) => self.identifier(&name, token.position),
            other => Err(ParseError::new(
                token.position,
                ParseErrorKind::UnexpectedToken(other.describe()),
            )),
        }
    }

    fn identifier(&mut self, name: &str, position: usize) -> Result<Node, ParseError> {
        match name.to_lowercase().as_str() {
            "pi" | "π" => return Ok(Node::Number(std::f64::consts::PI)),
            "e" => return Ok(Node::Number(std::f64::consts::E)),
            _ => {}
        }
        if let Some(function) = LookupFunction::from_name(name) {
            return self.lookup(function);
        }
        if let Some(aggregate) = Aggregate::from_name(name) {
            return Ok(Node::Aggregate(aggregate, self.argument_list()?));
        }
        if let Some(function) = Function::from_name(name) {
            let argument = if matches!(self.peek(), Some(TokenKind::Open(_))) {
                let start = self.tokens.peek().map_or(self.end, |token| token.position);
                let mut arguments = self.argument_list()?;
                if arguments.len() != 1 {
                    return Err(ParseError::new(
                        start,
                        ParseErrorKind::ArgumentCount {
                            function: function.name(),
                        },
                    ));
                }
                arguments.remove(0)
            } else {
                self.postfix()?
            };
            return Ok(Node::Call(function, Box::new(argument)));
        }
        Err(ParseError::new(
            position,
            ParseErrorKind::UnknownIdentifier(name.to_string()),
        ))
    }

    /// `( expr ; expr ; ... )` with any bracket style.
    fn argument_list(&mut self) -> Result<Vec<Node>, ParseError> {
        let token = self.next_token()?;
        let TokenKind::Open(open) = token.kind else {
            return Err(ParseError::new(token.position, ParseErrorKind::Expected('(')));
        };
        let mut arguments = vec![self.expr()?];
        while matches!(self.peek(), Some(TokenKind::Semicolon)) {
            self.tokens.next();
            arguments.push(self.expr()?);
        }
        self.expect(closing_bracket(open))?;
        Ok(arguments)
    }

    fn lookup(&mut self, function: LookupFunction) -> Result<Node, ParseError> {
        let expected_selector = |position| {
            ParseError::new(
                position,
                ParseErrorKind::ExpectedSelector {
                    function: function.name(),
                },
            )
        };
        let token = self.next_token()?;
        let TokenKind::Open(open) = token.kind else {
            return Err(expected_selector(token.position));
        };
        let token = self
            .tokens
            .next()
            .ok_or_else(|| expected_selector(self.end))?;
        let TokenKind::Str(selector) = token.kind else {
            return Err(expected_selector(token.position));
        };
        self.expect(closing_bracket(open))?;
        Ok(Node::Lookup(function, selector))
    }
}

fn eval_node(node: &Node, ctx: &dyn EvalContext) -> Result<f64, EvalError> {
    Ok(match node {
        Node::Number(value) => *value,
        Node::Negate(inner) => -eval_node(inner, ctx)?,
        Node::Binary(op, left, right) => {
            let left = eval_node(left, ctx)?;
            let right = eval_node(right, ctx)?;
            match op {
                BinaryOp::Add => left + right,
                BinaryOp::Sub => left - right,
                BinaryOp::Mul => left * right,
                BinaryOp::Div if right == 0.0 => return Err(EvalError::DivisionByZero),
                BinaryOp::Div => left / right,
                BinaryOp::Pow => left.powf(right),
            }
        }
        Node::Postfix(op, inner) => {
            let value = eval_node(inner, ctx)?;
            match op {
                PostfixOp::Percent => value / 100.0,
                PostfixOp::Square => value * value,
                PostfixOp::Cube => value * value * value,
                PostfixOp::Factorial => factorial(value)?,
            }
        }
        Node::Abs(inner) => eval_node(inner, ctx)?.abs(),
        Node::Call(function, argument) => function.apply(eval_node(argument, ctx)?)?,
        Node::Aggregate(aggregate, arguments) => {
            let values = arguments
                .iter()
                .map(|argument| eval_node(argument, ctx))
                .collect::<Result<Vec<f64>, EvalError>>()?;
            aggregate.apply(&values)
        }
        Node::Lookup(function, selector) => ctx.lookup(*function, selector)?,
    })
}

fn has_lookups(node: &Node) -> bool {
    match node {
        Node::Number(_) => false,
        Node::Lookup(..) => true,
        Node::Negate(inner)
        | Node::Postfix(_, inner)
        | Node::Abs(inner)
        | Node::Call(_, inner) => has_lookups(inner),
        Node::Binary(_, left, right) => has_lookups(left) || has_lookups(right),
        Node::Aggregate(_, arguments) => arguments.iter().any(has_lookups),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str) -> f64 {
        Expression::parse(text).unwrap().eval(&()).unwrap()
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(eval("1+2*3"), 7.0);
        assert_eq!(eval("2^3^2"), 512.0);
        assert_eq!(eval("-2^2"), -4.0);
        assert_eq!(eval("2^-1"), 0.5);
        assert_eq!(eval("8:2/2"), 2.0);
        assert_eq!(eval("10-4-3"), 3.0);
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(eval("3(1+2)"), 9.0);
        assert_eq!(eval("(1+1)[2+1]"), 6.0);
        assert!((eval("2pi") - 2.0 * std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(eval("2sqrt(9)"), 6.0);
    }

    #[test]
    fn bar_does_not_start_implicit_multiplication() {
        let err = Expression::parse("2|-3|").unwrap_err();
        assert_eq!(err.position, 1);
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken("|".into()));
        assert_eq!(eval("2*|-3|"), 6.0);
        assert_eq!(eval("|2|3"), 6.0);
    }

    #[test]
    fn functions_bind_tighter_than_power() {
        assert_eq!(eval("sqrt 16^2"), 16.0);
        assert_eq!(eval("sqr(3)!"), 362_880.0);
    }

    #[test]
    fn unknown_name_points_at_identifier() {
        let err = Expression::parse("1 + foo(2)").unwrap_err();
        assert_eq!(err.position, 4);
        assert_eq!(err.kind, ParseErrorKind::UnknownIdentifier("foo".into()));
    }

    #[test]
    fn lookup_detection() {
        assert!(Expression::parse("xml('a->b')*2").unwrap().has_lookups());
        assert!(!Expression::parse("max(1;2)").unwrap().has_lookups());
    }
}
