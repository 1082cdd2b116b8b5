use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::token::{Token, TokenKind};

static HAD_ERROR: AtomicBool = AtomicBool::new(false);
static HAD_RUNTIME_ERROR: AtomicBool = AtomicBool::new(false);

/// True if a scan, parse, resolve, or runtime error has been reported since the last reset.
pub fn did_error() -> bool {
    HAD_ERROR.load(Ordering::Relaxed) || HAD_RUNTIME_ERROR.load(Ordering::Relaxed)
}

pub fn did_runtime_error() -> bool {
    HAD_RUNTIME_ERROR.load(Ordering::Relaxed)
}

/// Resets both error flags. Used by the REPL between lines.
pub fn reset_error() {
    HAD_ERROR.store(false, Ordering::Relaxed);
    HAD_RUNTIME_ERROR.store(false, Ordering::Relaxed);
}

/// Every diagnosable error in the pipeline reports itself and flips the
/// matching flag. `throw` is the only entry point; nothing else touches
/// the flags directly.
pub trait Error {
    fn throw(&self);
}

#[derive(Debug, Error)]
#[error("[line {line}] Error: {message}")]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Error for ScanError {
    fn throw(&self) {
        log::debug!("scan error at line {}: {}", self.line, self.message);
        eprintln!("{self}");
        HAD_ERROR.store(true, Ordering::Relaxed);
    }
}

#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.token.kind == TokenKind::EOF {
            write!(f, "[line {}] Error at end: {}", self.token.line, self.message)
        } else {
            write!(f, "[line {}] Error at '{}': {}", self.token.line, self.token.lexeme, self.message)
        }
    }
}

impl std::error::Error for ParseError {}

impl Error for ParseError {
    fn throw(&self) {
        log::debug!("parse error at line {}: {}", self.token.line, self.message);
        eprintln!("{self}");
        HAD_ERROR.store(true, Ordering::Relaxed);
    }
}

#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}] Error at '{}': {}", self.token.line, self.token.lexeme, self.message)
    }
}

impl std::error::Error for ResolveError {}

impl Error for ResolveError {
    fn throw(&self) {
        log::debug!("resolve error at line {}: {}", self.token.line, self.message);
        eprintln!("{self}");
        HAD_ERROR.store(true, Ordering::Relaxed);
    }
}

#[derive(Debug)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}] Error at '{}': {}", self.token.line, self.token.lexeme, self.message)
    }
}

impl std::error::Error for RuntimeError {}

impl Error for RuntimeError {
    fn throw(&self) {
        log::warn!("runtime error at line {}: {}", self.token.line, self.message);
        eprintln!("{self}");
        HAD_RUNTIME_ERROR.store(true, Ordering::Relaxed);
    }
}
