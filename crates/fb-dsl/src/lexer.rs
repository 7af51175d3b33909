use logos::Logos;
use std::fmt;

use crate::error::{CompileError, CompileResult};
use crate::span::Spanned;

/// Token type for Fabula story files.
///
/// Keywords are case-sensitive. Any other word is an [`Token::Ident`], so
/// `Factor` or `factors` name things rather than start a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `:`
    Colon,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `=`
    Eq,
    /// `-`
    Minus,
    /// `\`
    Backslash,
    /// `+`
    Plus,
    /// `|`
    Pipe,
    /// `&`
    Amp,
    /// `factor` keyword.
    Factor,
    /// `transition` keyword.
    Transition,
    /// `description` keyword.
    Description,
    /// `spontaneous` keyword.
    Spontaneous,
    /// `choice` keyword.
    Choice,
    /// Bare identifier: factor, value or transition name.
    Ident(String),
    /// Unsigned integer literal.
    Int(u64),
    /// Decimal literal of the form `digits.digits`.
    Float(f64),
    /// Double-quoted text, without the quotes. May span lines.
    StringLiteral(String),
    /// End of input. Returned again on every further call.
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Colon => write!(f, "`:`"),
            Token::LParen => write!(f, "`(`"),
            Token::RParen => write!(f, "`)`"),
            Token::Comma => write!(f, "`,`"),
            Token::Lt => write!(f, "`<`"),
            Token::Gt => write!(f, "`>`"),
            Token::Eq => write!(f, "`=`"),
            Token::Minus => write!(f, "`-`"),
            Token::Backslash => write!(f, "`\\`"),
            Token::Plus => write!(f, "`+`"),
            Token::Pipe => write!(f, "`|`"),
            Token::Amp => write!(f, "`&`"),
            Token::Factor => write!(f, "`factor`"),
            Token::Transition => write!(f, "`transition`"),
            Token::Description => write!(f, "`description`"),
            Token::Spontaneous => write!(f, "`spontaneous`"),
            Token::Choice => write!(f, "`choice`"),
            Token::Ident(name) => write!(f, "`{name}`"),
            Token::Int(n) => write!(f, "`{n}`"),
            Token::Float(x) => write!(f, "`{x}`"),
            Token::StringLiteral(_) => write!(f, "string literal"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

/// Internal logos token. Converted to an owned [`Token`] by the tokenizer.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"%[^\n]*")]
enum RawToken {
    #[token(":")]
    Colon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,
    #[token("-")]
    Minus,
    #[token("\\")]
    Backslash,
    #[token("+")]
    Plus,
    #[token("|")]
    Pipe,
    #[token("&")]
    Amp,

    #[token("factor")]
    Factor,
    #[token("transition")]
    Transition,
    #[token("description")]
    Description,
    #[token("spontaneous")]
    Spontaneous,
    #[token("choice")]
    Choice,

    // The closing quote is found by scanning the remainder.
    #[token("\"")]
    Quote,

    #[regex(r"[0-9]+\.[0-9]*|\.[0-9]+")]
    Float,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
}

/// Pull-based tokenizer over a story source.
pub struct Tokenizer<'src> {
    source: &'src str,
    lexer: logos::Lexer<'src, RawToken>,
}

impl<'src> Tokenizer<'src> {
    /// Start tokenizing `source` from the beginning.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            lexer: RawToken::lexer(source),
        }
    }

    /// The text being tokenized.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Read the next token, skipping whitespace and `%` comments.
    pub fn next_token(&mut self) -> CompileResult<Spanned<Token>> {
        let Some(result) = self.lexer.next() else {
            let end = self.source.len();
            return Ok(Spanned::new(Token::Eof, end..end));
        };
        let span = self.lexer.span();
        let slice = self.lexer.slice();

        let raw = result.map_err(|()| {
            CompileError::syntax(self.source, span.clone(), "a token", format!("{slice:?}"))
        })?;

        let token = match raw {
            RawToken::Colon => Token::Colon,
            RawToken::LParen => Token::LParen,
            RawToken::RParen => Token::RParen,
            RawToken::Comma => Token::Comma,
            RawToken::Lt => Token::Lt,
            RawToken::Gt => Token::Gt,
            RawToken::Eq => Token::Eq,
            RawToken::Minus => Token::Minus,
            RawToken::Backslash => Token::Backslash,
            RawToken::Plus => Token::Plus,
            RawToken::Pipe => Token::Pipe,
            RawToken::Amp => Token::Amp,
            RawToken::Factor => Token::Factor,
            RawToken::Transition => Token::Transition,
            RawToken::Description => Token::Description,
            RawToken::Spontaneous => Token::Spontaneous,
            RawToken::Choice => Token::Choice,
            RawToken::Quote => {
                let remainder = self.lexer.remainder();
                let Some(end) = remainder.find('"') else {
                    return Err(CompileError::syntax(
                        self.source,
                        span,
                        "closing `\"`",
                        "end of input",
                    ));
                };
                let content = remainder[..end].to_string();
                self.lexer.bump(end + 1);
                let full_span = span.start..self.lexer.span().end;
                return Ok(Spanned::new(Token::StringLiteral(content), full_span));
            }
            RawToken::Float => match slice.parse::<f64>() {
                Ok(x) => Token::Float(x),
                Err(_) => {
                    return Err(CompileError::syntax(self.source, span, "a number", slice));
                }
            },
            RawToken::Int => match slice.parse::<u64>() {
                Ok(n) => Token::Int(n),
                Err(_) => {
                    return Err(CompileError::syntax(
                        self.source,
                        span,
                        "an integer that fits in 64 bits",
                        slice,
                    ));
                }
            },
            RawToken::Ident => Token::Ident(slice.to_string()),
        };
        Ok(Spanned::new(token, span))
    }
}

/// Tokenize a whole source, ending with a single [`Token::Eof`].
pub fn tokenize(source: &str) -> CompileResult<Vec<Spanned<Token>>> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token()?;
        let done = token.node == Token::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.node)
            .collect()
    }

    #[test]
    fn lex_factor_declaration() {
        assert_eq!(
            kinds("factor sun : (day, night)"),
            vec![
                Token::Factor,
                Token::Ident("sun".into()),
                Token::Colon,
                Token::LParen,
                Token::Ident("day".into()),
                Token::Comma,
                Token::Ident("night".into()),
                Token::RParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn lex_all_punctuation() {
        assert_eq!(
            kinds(": ( ) , < > = - \\ + | &"),
            vec![
                Token::Colon,
                Token::LParen,
                Token::RParen,
                Token::Comma,
                Token::Lt,
                Token::Gt,
                Token::Eq,
                Token::Minus,
                Token::Backslash,
                Token::Plus,
                Token::Pipe,
                Token::Amp,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(
            kinds("choice Choice choices spontaneous description transition"),
            vec![
                Token::Choice,
                Token::Ident("Choice".into()),
                Token::Ident("choices".into()),
                Token::Spontaneous,
                Token::Description,
                Token::Transition,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn lex_numbers() {
        assert_eq!(
            kinds("1 0.25 42"),
            vec![Token::Int(1), Token::Float(0.25), Token::Int(42), Token::Eof]
        );
    }

    #[test]
    fn lex_numbers_with_a_bare_side() {
        assert_eq!(
            kinds(".5 1. x"),
            vec![
                Token::Float(0.5),
                Token::Float(1.0),
                Token::Ident("x".into()),
                Token::Eof
            ]
        );
    }

    #[test]
    fn lone_dot_is_an_error() {
        let err = tokenize("a . b").unwrap_err();
        assert!(matches!(err, CompileError::Syntax { .. }));
    }

    #[test]
    fn oversized_integer_is_an_error() {
        let err = tokenize("99999999999999999999999").unwrap_err();
        assert!(matches!(err, CompileError::Syntax { .. }));
    }

    #[test]
    fn comments_are_skipped() {
        let source = "% a comment\nfactor % trailing\n% last line without newline";
        assert_eq!(kinds(source), vec![Token::Factor, Token::Eof]);
    }

    #[test]
    fn string_literal_spans_lines() {
        let tokens = tokenize("\"The sun\nsets.\" x").unwrap();
        assert_eq!(tokens[0].node, Token::StringLiteral("The sun\nsets.".into()));
        assert_eq!(tokens[0].span, 0..15);
        assert_eq!(tokens[1].node, Token::Ident("x".into()));
    }

    #[test]
    fn percent_inside_string_is_text() {
        assert_eq!(
            kinds("\"100% sure\""),
            vec![Token::StringLiteral("100% sure".into()), Token::Eof]
        );
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = tokenize("factor x : (a)\n\"never closed").unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"2:1: expected closing `\"`, found end of input");
    }

    #[test]
    fn unknown_character_is_an_error() {
        let err = tokenize("factor $").unwrap_err();
        insta::assert_snapshot!(err.to_string(), @r#"1:8: expected a token, found "$""#);
        assert_eq!(err.span(), Some(7..8));
    }

    #[test]
    fn eof_repeats() {
        let mut tokenizer = Tokenizer::new("  ");
        assert_eq!(tokenizer.next_token().unwrap().node, Token::Eof);
        assert_eq!(tokenizer.next_token().unwrap().node, Token::Eof);
    }

    #[test]
    fn spans_point_into_source() {
        let source = "transition go : (a = b, choice : \"Go\", a -> c)";
        for token in tokenize(source).unwrap() {
            if let Token::Ident(name) = &token.node {
                assert_eq!(&source[token.span.clone()], name);
            }
        }
    }
}
