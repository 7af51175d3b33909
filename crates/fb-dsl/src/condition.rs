//! Condition grammar.
//!
//! ```text
//! Conjunction := Disjunction ('&' Disjunction)*
//! Disjunction := Bool ('|' Bool)*
//! Bool        := '(' Conjunction ')' | FACTOR '=' VALUE
//! ```
//!
//! `&` binds looser than `|`. Single terms are still wrapped, so every
//! parsed condition is an `And` of `Or`s at the top.

use fb_core::{BoolExpr, FactorId, Universe};
use strsim::jaro_winkler;

use crate::compiler::Parser;
use crate::diagnostics::Diagnostic;
use crate::error::{CompileError, CompileResult};
use crate::lexer::Token;
use crate::span::Spanned;

/// Minimum similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

impl Parser<'_> {
    pub(crate) fn conjunction(&mut self) -> CompileResult<BoolExpr> {
        let mut terms = vec![self.disjunction()?];
        while *self.peek() == Token::Amp {
            self.advance()?;
            terms.push(self.disjunction()?);
        }
        Ok(BoolExpr::and(terms))
    }

    fn disjunction(&mut self) -> CompileResult<BoolExpr> {
        let mut terms = vec![self.boolean()?];
        while *self.peek() == Token::Pipe {
            self.advance()?;
            terms.push(self.boolean()?);
        }
        Ok(BoolExpr::or(terms))
    }

    fn boolean(&mut self) -> CompileResult<BoolExpr> {
        if *self.peek() == Token::LParen {
            self.advance()?;
            let inner = self.conjunction()?;
            self.expect(Token::RParen)?;
            return Ok(inner);
        }

        let name = self.expect_ident("a factor name or `(`")?;
        let factor = self.resolve(&name)?;
        self.expect(Token::Eq)?;
        let value = self.value()?;

        let satisfiable = self
            .universe
            .factor(factor)
            .is_some_and(|f| f.is_possible(&value.node));
        if !satisfiable {
            self.warnings.push(
                Diagnostic::warning(
                    name.span.start..value.span.end,
                    format!("comparison `{} = {}` can never hold", name.node, value.node),
                )
                .with_label("not one of the factor's values"),
            );
        }
        Ok(BoolExpr::equals(factor, value.node))
    }

    /// Look up a declared factor by name.
    pub(crate) fn resolve(&self, name: &Spanned<String>) -> CompileResult<FactorId> {
        match self.universe.find_factor(&name.node) {
            Some(factor) => Ok(factor.id()),
            None => Err(CompileError::UndefinedFactor {
                position: self.position(&name.span),
                suggestion: suggest(&self.universe, &name.node),
                name: name.node.clone(),
                span: name.span.clone(),
            }),
        }
    }
}

/// The declared factor name closest to `input`, if any is close enough.
fn suggest(universe: &Universe, input: &str) -> Option<String> {
    let input_lower = input.to_lowercase();
    universe
        .factors()
        .iter()
        .map(|f| (f.label(), jaro_winkler(&input_lower, &f.label().to_lowercase())))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(label, _)| label.to_string())
}
