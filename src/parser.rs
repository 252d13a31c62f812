/*!
Stack-driven predictive parser for MiniJava.

Time & Space Complexity
=======================

* **n** = number of tokens (including the sole EOF).
* **d** = deepest stack reached, bounded by the syntactic nesting of the unit.

| Phase                         | Cost | Rationale                                                |
|-------------------------------|-----:|----------------------------------------------------------|
| `Parser::parse_unit` loop     | Θ(n) | Every terminal pop consumes one token; expansions are    |
|                               |      | bounded by the grammar size per token.                   |
| `NonTerminal::expand`         | O(1) | Linear scan over a fixed, small table.                   |
| Stack                         | O(d) | Explicit `Vec`, no recursion on the call stack.          |

### Logging Policy

| Location                          | Level   | Purpose                                  |
|-----------------------------------|---------|------------------------------------------|
| `Parser::new`, `parse_unit`       | `info`  | Lifecycle milestones.                    |
| Expansions, matches               | `debug` | Trace of the derivation.                 |
| Error paths                       | `debug` | Context before returning the error.      |

Driver
------

The stack starts with the `Initial` nonterminal.  Popping

* a **terminal** matches it against the lookahead, consumes the token and
  pops, or fails with [`SyntacticError::Mismatch`];
* a **nonterminal** asks the grammar for the right-hand side selected by
  the lookahead, pushes a completion marker followed by the right-hand side
  in reverse, or fails with [`SyntacticError::NotInFirsts`];
* a **completion marker** tells the listener that a nonterminal's
  right-hand side has been fully matched.

Parsing succeeds when the stack empties with `EOF` as lookahead.  `EOF` is
matched but never consumed.

Declarations and bodies are built by a [`ParseListener`] passed to the
driver, which keeps the grammar engine free of side effects.
*/

use crate::error::{Result, SyntacticError};
use crate::grammar::{NonTerminal, Symbol};
use crate::source::CharSource;
use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};

use log::{debug, info};

/// Observer of the derivation.  Any error it returns aborts the parse.
pub trait ParseListener {
    /// `non_terminal` is about to be replaced by one of its productions.
    fn on_expand(&mut self, non_terminal: NonTerminal, lookahead: &Token) -> Result<()>;

    /// `token` matched the terminal on top of the stack.
    fn on_match(&mut self, token: &Token) -> Result<()>;

    /// Every symbol of `non_terminal`'s production has been matched.
    fn on_complete(&mut self, non_terminal: NonTerminal) -> Result<()>;
}

/// Grammar-only parsing.
impl ParseListener for () {
    fn on_expand(&mut self, _: NonTerminal, _: &Token) -> Result<()> {
        Ok(())
    }

    fn on_match(&mut self, _: &Token) -> Result<()> {
        Ok(())
    }

    fn on_complete(&mut self, _: NonTerminal) -> Result<()> {
        Ok(())
    }
}

/// What sits on the parse stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackSymbol {
    Terminal(TokenKind),
    NonTerminal(NonTerminal),
    /// Pushed below a right-hand side; popping it reports the completion.
    Complete(NonTerminal),
}

impl From<Symbol> for StackSymbol {
    fn from(symbol: Symbol) -> Self {
        match symbol {
            Symbol::T(kind) => StackSymbol::Terminal(kind),
            Symbol::N(nt) => StackSymbol::NonTerminal(nt),
        }
    }
}

pub struct Parser<S: CharSource> {
    scanner: Scanner<S>,
    lookahead: Token,
    stack: Vec<StackSymbol>,
}

impl<S: CharSource> Parser<S> {
    /// Create a parser and prime the one-token lookahead.
    pub fn new(mut scanner: Scanner<S>) -> Result<Self> {
        info!("Parser created");

        let lookahead = scanner.next_token()?;

        Ok(Self {
            scanner,
            lookahead,
            stack: Vec::new(),
        })
    }

    fn advance(&mut self) -> Result<()> {
        self.lookahead = self.scanner.next_token()?;

        Ok(())
    }

    /// Innermost nonterminal still being derived, for error context.
    fn open_non_terminal(&self) -> NonTerminal {
        self.stack
            .iter()
            .rev()
            .find_map(|symbol| match symbol {
                StackSymbol::Complete(nt) => Some(*nt),
                _ => None,
            })
            .unwrap_or(NonTerminal::Initial)
    }

    /// Validate the whole unit, reporting the derivation to `listener`.
    pub fn parse_unit<L: ParseListener>(&mut self, listener: &mut L) -> Result<()> {
        info!("Beginning predictive parse");

        self.stack.clear();
        self.stack.push(StackSymbol::NonTerminal(NonTerminal::Initial));

        while let Some(top) = self.stack.pop() {
            match top {
                StackSymbol::Terminal(expected) => {
                    if self.lookahead.kind != expected {
                        debug!(
                            "Mismatch: expected {:?}, found {}",
                            expected, self.lookahead
                        );

                        // Running out of input is a missing production, not a
                        // wrong token.
                        if self.lookahead.kind == TokenKind::EOF {
                            return Err(SyntacticError::not_in_firsts(
                                self.open_non_terminal(),
                                vec![expected],
                                self.lookahead.clone(),
                            )
                            .into());
                        }

                        return Err(
                            SyntacticError::mismatch(expected, self.lookahead.clone()).into()
                        );
                    }

                    debug!("Matched {}", self.lookahead);

                    listener.on_match(&self.lookahead)?;

                    if expected != TokenKind::EOF {
                        self.advance()?;
                    }
                }

                StackSymbol::NonTerminal(nt) => {
                    let Some(rhs) = nt.expand(self.lookahead.kind) else {
                        debug!("No production of {:?} for {}", nt, self.lookahead);

                        return Err(SyntacticError::not_in_firsts(
                            nt,
                            nt.expected(),
                            self.lookahead.clone(),
                        )
                        .into());
                    };

                    debug!("Expanding {:?} with {} symbol(s)", nt, rhs.len());

                    listener.on_expand(nt, &self.lookahead)?;

                    self.stack.push(StackSymbol::Complete(nt));
                    self.stack
                        .extend(rhs.iter().rev().map(|symbol| StackSymbol::from(*symbol)));
                }

                StackSymbol::Complete(nt) => listener.on_complete(nt)?,
            }
        }

        if self.lookahead.kind != TokenKind::EOF {
            debug!("Input left after the derivation: {}", self.lookahead);

            return Err(SyntacticError::not_in_firsts(
                NonTerminal::Initial,
                vec![TokenKind::EOF],
                self.lookahead.clone(),
            )
            .into());
        }

        info!("Parse completed");

        Ok(())
    }
}

/// Convenience: grammar-check a whole source without building anything.
pub fn validate<S: CharSource>(source: S) -> Result<()> {
    let mut parser = Parser::new(Scanner::new(source))?;

    parser.parse_unit(&mut ())
}
