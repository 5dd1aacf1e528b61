//! Theme storage and value resolution.
//!
//! This module provides:
//!
//! - [`Theme`]: An ordered collection of custom-property design tokens
//!   (`--color-red-500: oklch(...)`) with a fluent builder API
//! - [`ThemeOptions`]: Per-value flags controlling how a token is emitted
//! - [`with_alpha`]: The opacity-modifier transform applied to resolved colors
//! - [`ThemeError`]: Errors from loading theme input
//!
//! Themes are immutable once handed to a design system, with one exception:
//! the set of variables marked as used, which drives dead-variable elimination.

mod alpha;
mod error;
mod load;
#[allow(clippy::module_inception)]
mod theme;

pub use alpha::{alpha_from_modifier, with_alpha};
pub use error::ThemeError;
pub use theme::{Theme, ThemeOptions};
