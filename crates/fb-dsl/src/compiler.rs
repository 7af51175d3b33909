use fb_core::{BoolExpr, CoreError, FactorId, Schedule, Universe, Value};

use crate::diagnostics::Diagnostic;
use crate::error::{CompileError, CompileResult};
use crate::lexer::{Token, Tokenizer};
use crate::span::{Position, Span, Spanned};

/// Probabilities above this still fire every pass, but are probably typos.
const MAX_PROBABILITY: f64 = 1.0;

/// Result of compiling a story file.
#[derive(Debug)]
pub struct Compilation {
    /// The compiled model, ready to instantiate.
    pub universe: Universe,
    /// Non-fatal findings, in source order.
    pub warnings: Vec<Diagnostic>,
    /// `description` blocks. Validated but not part of the universe.
    pub descriptions: Vec<NarrativeBlock>,
}

/// A `description : (CONDITION, "text")` block.
#[derive(Debug, Clone)]
pub struct NarrativeBlock {
    /// When the text applies.
    pub condition: BoolExpr,
    /// The narrative text.
    pub text: String,
    /// Range of the whole block.
    pub span: Span,
}

/// Recursive-descent parser with one token of lookahead.
///
/// Each production consumes exactly its tokens and registers what it built
/// in the universe immediately, so later blocks can refer to earlier ones.
pub(crate) struct Parser<'src> {
    tokens: Tokenizer<'src>,
    current: Spanned<Token>,
    pub(crate) universe: Universe,
    pub(crate) warnings: Vec<Diagnostic>,
    descriptions: Vec<NarrativeBlock>,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(source: &'src str) -> CompileResult<Self> {
        let mut tokens = Tokenizer::new(source);
        let current = tokens.next_token()?;
        Ok(Self {
            tokens,
            current,
            universe: Universe::new(),
            warnings: Vec::new(),
            descriptions: Vec::new(),
        })
    }

    /// Parse blocks until end of input.
    pub(crate) fn compile(mut self) -> CompileResult<Compilation> {
        loop {
            match self.peek() {
                Token::Factor => self.factor()?,
                Token::Transition => self.transition()?,
                Token::Description => self.description()?,
                Token::Eof => break,
                _ => return Err(self.unexpected("`factor`, `transition` or `description`")),
            }
        }
        Ok(Compilation {
            universe: self.universe,
            warnings: self.warnings,
            descriptions: self.descriptions,
        })
    }

    // -----------------------------------------------------------------------
    // Token helpers
    // -----------------------------------------------------------------------

    pub(crate) fn peek(&self) -> &Token {
        &self.current.node
    }

    /// Consume the current token and return it.
    pub(crate) fn advance(&mut self) -> CompileResult<Spanned<Token>> {
        let next = self.tokens.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Consume `expected` or fail.
    pub(crate) fn expect(&mut self, expected: Token) -> CompileResult<Span> {
        if *self.peek() == expected {
            Ok(self.advance()?.span)
        } else {
            Err(self.unexpected(expected.to_string()))
        }
    }

    pub(crate) fn expect_ident(&mut self, what: &str) -> CompileResult<Spanned<String>> {
        match self.peek() {
            Token::Ident(_) => {
                let token = self.advance()?;
                match token.node {
                    Token::Ident(name) => Ok(Spanned::new(name, token.span)),
                    _ => unreachable!("peeked an identifier"),
                }
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn expect_string(&mut self, what: &str) -> CompileResult<Spanned<String>> {
        match self.peek() {
            Token::StringLiteral(_) => {
                let token = self.advance()?;
                match token.node {
                    Token::StringLiteral(text) => Ok(Spanned::new(text, token.span)),
                    _ => unreachable!("peeked a string literal"),
                }
            }
            _ => Err(self.unexpected(what)),
        }
    }

    /// A factor value: an identifier, or an integer compared as its decimal text.
    pub(crate) fn value(&mut self) -> CompileResult<Spanned<Value>> {
        let value = match self.peek() {
            Token::Ident(name) => Value::new(name),
            Token::Int(n) => Value::from(n.to_string()),
            _ => return Err(self.unexpected("a value")),
        };
        let span = self.advance()?.span;
        Ok(Spanned::new(value, span))
    }

    /// Syntax error at the current token.
    pub(crate) fn unexpected(&self, expected: impl Into<String>) -> CompileError {
        CompileError::syntax(
            self.tokens.source(),
            self.current.span.clone(),
            expected,
            self.current.node.to_string(),
        )
    }

    pub(crate) fn position(&self, span: &Span) -> Position {
        Position::locate(self.tokens.source(), span.start)
    }

    // -----------------------------------------------------------------------
    // Blocks
    // -----------------------------------------------------------------------

    /// `factor NAME : ( VALUE (, VALUE)* )`
    fn factor(&mut self) -> CompileResult<()> {
        self.expect(Token::Factor)?;
        let name = self.expect_ident("a factor name")?;
        self.expect(Token::Colon)?;
        self.expect(Token::LParen)?;

        let mut values = vec![self.value()?];
        while *self.peek() == Token::Comma {
            self.advance()?;
            values.push(self.value()?);
        }
        self.expect(Token::RParen)?;

        let mut seen: Vec<&Value> = Vec::new();
        for value in &values {
            if seen.contains(&&value.node) {
                self.warnings.push(
                    Diagnostic::warning(
                        value.span.clone(),
                        format!("value `{}` is listed twice for factor `{}`", value.node, name.node),
                    )
                    .with_label("duplicate ignored"),
                );
            } else {
                seen.push(&value.node);
            }
        }

        let result = self
            .universe
            .add_factor(name.node.clone(), values.into_iter().map(|v| v.node));
        match result {
            Ok(id) => {
                tracing::trace!(factor = %name.node, %id, "declared factor");
                Ok(())
            }
            Err(CoreError::DuplicateFactor(_)) => Err(CompileError::DuplicateFactor {
                position: self.position(&name.span),
                name: name.node,
                span: name.span,
            }),
            Err(CoreError::EmptyFactor(_)) => Err(CompileError::EmptyFactor {
                position: self.position(&name.span),
                name: name.node,
                span: name.span,
            }),
            Err(other) => Err(other.into()),
        }
    }

    /// `transition [NAME] : ( CONDITION , SCHEDULE , EFFECTS [, "text"] )`
    fn transition(&mut self) -> CompileResult<()> {
        self.expect(Token::Transition)?;
        let label = match self.peek() {
            Token::Ident(_) => self.expect_ident("a transition name")?.node,
            _ => String::new(),
        };
        self.expect(Token::Colon)?;
        self.expect(Token::LParen)?;

        let condition = self.conjunction()?;
        self.expect(Token::Comma)?;
        let schedule = self.schedule()?;
        self.expect(Token::Comma)?;
        let effects = self.effects()?;

        let description = if *self.peek() == Token::Comma {
            self.advance()?;
            self.expect_string("a description string")?.node
        } else {
            String::new()
        };
        self.expect(Token::RParen)?;

        let id = self
            .universe
            .add_transition(label, condition, schedule, description, effects)?;
        tracing::trace!(%id, "declared transition");
        Ok(())
    }

    /// `spontaneous (INT | FLOAT)` or `choice : "text"`
    fn schedule(&mut self) -> CompileResult<Schedule> {
        match self.peek() {
            Token::Spontaneous => {
                self.advance()?;
                let probability = match *self.peek() {
                    Token::Int(n) => n as f64,
                    Token::Float(x) => x,
                    _ => return Err(self.unexpected("a probability")),
                };
                let span = self.advance()?.span;
                if probability > MAX_PROBABILITY {
                    self.warnings.push(
                        Diagnostic::warning(
                            span,
                            format!("probability {probability} is above 1"),
                        )
                        .with_label("this transition fires on every pass"),
                    );
                }
                Ok(Schedule::spontaneous(probability))
            }
            Token::Choice => {
                self.advance()?;
                self.expect(Token::Colon)?;
                let text = self.expect_string("the choice text")?;
                Ok(Schedule::chosen(text.node))
            }
            _ => Err(self.unexpected("`spontaneous` or `choice`")),
        }
    }

    /// `FACTOR -> VALUE` or `( FACTOR -> VALUE (, FACTOR -> VALUE)* )`
    fn effects(&mut self) -> CompileResult<Vec<(FactorId, Value)>> {
        if *self.peek() != Token::LParen {
            return Ok(vec![self.effect()?]);
        }
        self.advance()?;
        let mut effects = vec![self.effect()?];
        while *self.peek() == Token::Comma {
            self.advance()?;
            effects.push(self.effect()?);
        }
        self.expect(Token::RParen)?;
        Ok(effects)
    }

    fn effect(&mut self) -> CompileResult<(FactorId, Value)> {
        let name = self.expect_ident("a factor name")?;
        let factor = self.resolve(&name)?;
        self.expect(Token::Minus)?;
        self.expect(Token::Gt)?;
        let value = self.value()?;

        let undeclared = self
            .universe
            .factor(factor)
            .is_some_and(|f| !f.is_possible(&value.node));
        if undeclared {
            self.warnings.push(
                Diagnostic::warning(
                    value.span.clone(),
                    format!(
                        "value `{}` is not declared for factor `{}`",
                        value.node, name.node
                    ),
                )
                .with_label("the factor will hold an invalid value"),
            );
        }
        Ok((factor, value.node))
    }

    /// `description : ( CONDITION , "text" )`
    fn description(&mut self) -> CompileResult<()> {
        let start = self.expect(Token::Description)?.start;
        self.expect(Token::Colon)?;
        self.expect(Token::LParen)?;
        let condition = self.conjunction()?;
        self.expect(Token::Comma)?;
        let text = self.expect_string("a description string")?.node;
        let end = self.expect(Token::RParen)?.end;

        self.descriptions.push(NarrativeBlock {
            condition,
            text,
            span: start..end,
        });
        Ok(())
    }
}
