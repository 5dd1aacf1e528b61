//! Pluggable collaborators of the design system.
//!
//! The caches in [`DesignSystem`] sit in front of four functions: candidate
//! parsing, variant parsing, AST compilation and function substitution. They
//! are reached through the [`Backend`] trait so that they can be replaced, for
//! example by a wrapper that counts calls.
//!
//! Every method has a default implementation calling the standard one, so an
//! implementation only overrides what it needs:
//!
//! ```rust
//! use std::cell::Cell;
//!
//! use classcss::candidate::{self, Candidate};
//! use classcss::design_system::{Backend, DesignSystem};
//!
//! #[derive(Default)]
//! struct Counting {
//!     parses: Cell<usize>,
//! }
//!
//! impl Backend for Counting {
//!     fn parse_candidate(&self, input: &str, ds: &DesignSystem) -> Vec<Candidate> {
//!         self.parses.set(self.parses.get() + 1);
//!         candidate::parse_candidate(input, ds)
//!     }
//! }
//! ```

use crate::ast::AstNode;
use crate::candidate::{self, Candidate, Variant};
use crate::compile::{self, CompiledNode};
use crate::error::CompileError;
use crate::functions;

use super::DesignSystem;

/// The functions behind the design system's caches.
pub trait Backend {
    /// Parses a class name into candidates. Unparseable input yields an
    /// empty list.
    fn parse_candidate(&self, input: &str, ds: &DesignSystem) -> Vec<Candidate> {
        candidate::parse_candidate(input, ds)
    }

    /// Parses a variant prefix. Unparseable input yields `None`.
    fn parse_variant(&self, input: &str, ds: &DesignSystem) -> Option<Variant> {
        candidate::parse_variant(input, ds)
    }

    /// Compiles a candidate. Candidates that cannot render yield an empty
    /// list.
    fn compile_ast_nodes(&self, candidate: &Candidate, ds: &DesignSystem) -> Vec<CompiledNode> {
        compile::compile_ast_nodes(candidate, ds)
    }

    /// Substitutes build-time functions in a compiled node.
    fn substitute_functions(
        &self,
        node: &AstNode,
        ds: &DesignSystem,
    ) -> Result<AstNode, CompileError> {
        functions::substitute_functions(node, ds)
    }
}

/// The built-in backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardBackend;

impl Backend for StandardBackend {}
