//! Centralised error hierarchy for the **Lox interpreter**.
//!
//! All subsystems (scanner, parser, resolver, runtime, CLI) convert their
//! internal failure modes into one of the variants defined here.  This enables a
//! uniform `Result<T>` alias throughout the crate and ergonomic inter‑operation
//! with `anyhow`, while still preserving rich diagnostic detail.
//!
//! The static phases never stop at their first error: they hand every
//! [`LoxError`] to a [`Diagnostics`] collector owned by the caller, which the
//! pipeline inspects between phases.
//!
//! The module **does not** print diagnostics itself

use std::fmt;
use std::io;

use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::token::{Token, TokenType};

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error anchored at a token.
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        message: String,

        /// ` at 'lexeme'`, ` at end`, or empty.
        location: String,
        line: usize,
    },

    /// Static‑analysis failure (scoping rules, misplaced `return`/`this`/`super`).
    #[error("[line {line}] Error{location}: {message}")]
    Resolve {
        message: String,
        location: String,
        line: usize,
    },

    /// Runtime evaluation error.  Halts execution immediately.
    #[error("{message}\n[line {line}]")]
    Runtime { message: String, line: usize },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Renders the ` at '…'` suffix used by token‑anchored diagnostics.
fn location_of(token: &Token) -> String {
    if token.token_type == TokenType::EOF {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        LoxError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", token.line, message);

        LoxError::Parse {
            message,
            location: location_of(token),
            line: token.line,
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!(
            "Creating Resolve error: line={}, msg={}",
            token.line, message
        );

        LoxError::Resolve {
            message,
            location: location_of(token),
            line: token.line,
        }
    }

    /// Helper constructor for the **interpreter**.  The token is the
    /// operator / identifier that the failing step is attributed to.
    pub fn runtime<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!(
            "Creating Runtime error: line={}, msg={}",
            token.line, message
        );

        LoxError::Runtime {
            message,
            line: token.line,
        }
    }

    /// Which pipeline phase produced this error.  Host I/O failures count as
    /// runtime failures: they can only surface while a program is executing.
    pub fn phase(&self) -> Phase {
        match self {
            LoxError::Lex { .. } => Phase::Lex,
            LoxError::Parse { .. } => Phase::Parse,
            LoxError::Resolve { .. } => Phase::Resolve,
            LoxError::Runtime { .. } | LoxError::Io(_) => Phase::Runtime,
        }
    }

    /// Source line the error is attributed to (0 when unknown).
    pub fn line(&self) -> usize {
        match self {
            LoxError::Lex { line, .. }
            | LoxError::Parse { line, .. }
            | LoxError::Resolve { line, .. }
            | LoxError::Runtime { line, .. } => *line,
            LoxError::Io(_) => 0,
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;

/// Pipeline phase a diagnostic originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Lex,
    Parse,
    Resolve,
    Runtime,
}

impl Phase {
    /// Lexing, parsing and resolution all block execution.
    pub fn is_compile_time(self) -> bool {
        !matches!(self, Phase::Runtime)
    }
}

/// A reported problem, detached from the error value that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub phase: Phase,
    pub line: usize,
    pub message: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,
}

impl From<LoxError> for Diagnostic {
    fn from(err: LoxError) -> Self {
        let phase = err.phase();
        let line = err.line();

        match err {
            LoxError::Lex { message, .. } | LoxError::Runtime { message, .. } => Diagnostic {
                phase,
                line,
                message,
                location: String::new(),
            },
            LoxError::Parse {
                message, location, ..
            }
            | LoxError::Resolve {
                message, location, ..
            } => Diagnostic {
                phase,
                line,
                message,
                location,
            },
            other => Diagnostic {
                phase,
                line,
                message: other.to_string(),
                location: String::new(),
            },
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Phase::Runtime => write!(f, "{}\n[line {}]", self.message, self.line),
            _ => write!(
                f,
                "[line {}] Error{}: {}",
                self.line, self.location, self.message
            ),
        }
    }
}

/// Ordered collector handed to every phase in turn.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error.  Never aborts the calling phase.
    pub fn report(&mut self, err: LoxError) {
        info!("Reporting diagnostic: {}", err);

        self.entries.push(Diagnostic::from(err));
    }

    /// True once any lexical, syntax or resolution error was recorded.
    pub fn has_compile_errors(&self) -> bool {
        self.entries.iter().any(|d| d.phase.is_compile_time())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
