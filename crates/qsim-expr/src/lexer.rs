//! Splits expression text into positioned tokens.

use crate::error::{ParseError, ParseErrorKind};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(f64),
    Ident(String),
    Str(String),
    Plus,
    Minus,
    Star,
    Slash,
    Colon,
    Caret,
    Percent,
    Squared,
    Cubed,
    Bang,
    Open(char),
    Close(char),
    Pipe,
    Semicolon,
}

impl TokenKind {
    /// Source form used in error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Ident(name) => name.clone(),
            Self::Str(text) => format!("\"{text}\""),
            Self::Plus => "+".into(),
            Self::Minus => "-".into(),
            Self::Star => "*".into(),
            Self::Slash => "/".into(),
            Self::Colon => ":".into(),
            Self::Caret => "^".into(),
            Self::Percent => "%".into(),
            Self::Squared => "²".into(),
            Self::Cubed => "³".into(),
            Self::Bang => "!".into(),
            Self::Open(c) | Self::Close(c) => c.to_string(),
            Self::Pipe => "|".into(),
            Self::Semicolon => ";".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// 0-based character offset of the first character.
    pub position: usize,
}

/// Closing bracket for an opening one.
pub(crate) fn closing_bracket(open: char) -> char {
    match open {
        '[' => ']',
        '{' => '}',
        _ => ')',
    }
}

/// Exponent (`e3`, `E-5`) at the start of `rest`, with a lowercase `e`.
///
/// A bare `e` is left alone so `2e` still reads as `2·e`.
fn exponent_suffix(mut rest: impl Iterator<Item = char>) -> Option<String> {
    if !matches!(rest.next(), Some('e' | 'E')) {
        return None;
    }
    let mut exponent = String::from("e");
    let mut next = rest.next();
    if let Some(sign @ ('+' | '-')) = next {
        exponent.push(sign);
        next = rest.next();
    }
    while let Some(digit) = next.filter(char::is_ascii_digit) {
        exponent.push(digit);
        next = rest.next();
    }
    exponent
        .ends_with(|c: char| c.is_ascii_digit())
        .then_some(exponent)
}

pub(crate) fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().enumerate().peekable();

    while let Some((position, c)) = chars.next() {
        let kind = match c {
            c if c.is_whitespace() => continue,
            '0'..='9' | '.' | ',' => {
                let mut literal = String::new();
                let mut seen_separator = false;
                let mut current = Some((position, c));
                while let Some((index, c)) = current {
                    if c.is_ascii_digit() {
                        literal.push(c);
                    } else if seen_separator {
                        return Err(ParseError::new(index, ParseErrorKind::InvalidNumber));
                    } else {
                        seen_separator = true;
                        literal.push('.');
                    }
                    current = chars.next_if(|&(_, c)| c.is_ascii_digit() || c == '.' || c == ',');
                }
                if literal == "." {
                    return Err(ParseError::new(position, ParseErrorKind::InvalidNumber));
                }
                if let Some(exponent) = exponent_suffix(chars.clone().map(|(_, c)| c)) {
                    for _ in 0..exponent.len() {
                        chars.next();
                    }
                    literal.push_str(&exponent);
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| ParseError::new(position, ParseErrorKind::InvalidNumber))?;
                TokenKind::Number(value)
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::from(c);
                while let Some((_, c)) = chars.next_if(|&(_, c)| c.is_alphabetic() || c == '_') {
                    name.push(c);
                }
                TokenKind::Ident(name)
            }
            '"' | '\'' => {
                let quote = c;
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '\\' => match chars.next() {
                            Some((_, escaped)) => value.push(escaped),
                            None => break,
                        },
                        c if c == quote => {
                            closed = true;
                            break;
                        }
                        c => value.push(c),
                    }
                }
                if !closed {
                    return Err(ParseError::new(position, ParseErrorKind::UnterminatedString));
                }
                TokenKind::Str(value)
            }
            '+' => TokenKind::Plus,
            '-' | '−' => TokenKind::Minus,
            '*' | '×' | '·' => TokenKind::Star,
            '/' | '÷' => TokenKind::Slash,
            ':' => TokenKind::Colon,
            '^' => TokenKind::Caret,
            '%' => TokenKind::Percent,
            '²' => TokenKind::Squared,
            '³' => TokenKind::Cubed,
            '!' => TokenKind::Bang,
            '(' | '[' | '{' => TokenKind::Open(c),
            ')' | ']' | '}' => TokenKind::Close(c),
            '|' => TokenKind::Pipe,
            ';' => TokenKind::Semicolon,
            other => {
                return Err(ParseError::new(
                    position,
                    ParseErrorKind::UnexpectedCharacter(other),
                ));
            }
        };
        tokens.push(Token { kind, position });
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn numbers_accept_both_separators() {
        assert_eq!(kinds("1,5 + .25"), [
            TokenKind::Number(1.5),
            TokenKind::Plus,
            TokenKind::Number(0.25)
        ]);
    }

    #[test]
    fn numbers_take_an_exponent() {
        assert_eq!(kinds("1e3"), [TokenKind::Number(1000.0)]);
        assert_eq!(kinds("2,5E-1+1"), [
            TokenKind::Number(0.25),
            TokenKind::Plus,
            TokenKind::Number(1.0)
        ]);
        assert_eq!(kinds("2e"), [TokenKind::Number(2.0), TokenKind::Ident("e".into())]);
        assert_eq!(kinds("3e-x")[..2], [TokenKind::Number(3.0), TokenKind::Ident("e".into())]);
        let tokens = tokenize("1e+2*4").unwrap();
        assert_eq!(tokens[1].position, 4);
    }

    #[test]
    fn second_separator_is_reported_at_its_position() {
        let err = tokenize("12.5.3").unwrap_err();
        assert_eq!(err.position, 4);
        assert_eq!(err.kind, ParseErrorKind::InvalidNumber);
    }

    #[test]
    fn strings_support_escapes_and_both_quotes() {
        assert_eq!(kinds(r#"xml('a[b="c"]')"#)[2], TokenKind::Str(r#"a[b="c"]"#.into()));
        assert_eq!(kinds(r#""a\"b""#), [TokenKind::Str("a\"b".into())]);
        assert_eq!(
            tokenize("xml(\"abc").unwrap_err().kind,
            ParseErrorKind::UnterminatedString
        );
    }

    #[test]
    fn positions_count_characters() {
        let tokens = tokenize("²+ä").unwrap();
        assert_eq!(tokens[1].position, 1);
        assert_eq!(tokens[2].position, 2);
        assert_eq!(tokenize("1 # 2").unwrap_err().position, 2);
    }
}
