//! # classcss - memoizing utility-class CSS compiler
//!
//! `classcss` turns utility class names such as `md:hover:bg-red-500/50` into
//! CSS. The work is split into a few stages, each memoized by a
//! [`DesignSystem`]:
//!
//! 1. **Parsing**: class name → candidates ([`candidate`]). One class may
//!    yield several candidates when more than one utility root matches.
//! 2. **Compilation**: candidate → rule ([`compile`]), including variants
//!    ([`variants`]) and build-time functions such as `theme()`
//!    ([`functions`]).
//! 3. **Output**: rules are sorted, optimized and printed ([`ast`]).
//!
//! Invalid input never produces an error from the compilation entry points;
//! it simply produces no CSS.
//!
//! ## Quick start
//!
//! ```rust
//! use classcss::{DesignSystem, Theme};
//!
//! let theme = Theme::from_css(
//!     "@theme { --color-red-500: #ef4444; --breakpoint-md: 48rem; }",
//! )
//! .unwrap();
//! let ds = DesignSystem::new(theme);
//!
//! let css = ds.candidates_to_css(&["md:bg-red-500"]);
//! assert_eq!(
//!     css[0].as_deref(),
//!     Some(concat!(
//!         "@media (width >= 48rem) {\n",
//!         "  .md\\:bg-red-500 {\n",
//!         "    background-color: var(--color-red-500);\n",
//!         "  }\n",
//!         "}\n",
//!     ))
//! );
//! ```
//!
//! ## Stylesheets
//!
//! [`DesignSystem::build_css`] produces a whole stylesheet: the theme
//! variables actually referenced by the generated utilities, followed by the
//! utilities in a deterministic order.
//!
//! ## Configuration
//!
//! Themes are built in code ([`Theme::add`]), loaded from CSS
//! ([`Theme::from_css_file`]) or described by a YAML/JSON [`Config`].

pub mod ast;
pub mod candidate;
pub mod compile;
pub mod config;
pub mod design_system;
pub mod error;
pub mod functions;
pub mod intern;
pub mod theme;
pub mod utilities;
pub mod value;
pub mod variants;

pub use ast::AstNode;
pub use candidate::{Candidate, CandidateKind, CandidateValue, Variant};
pub use compile::{CompiledCandidates, CompiledNode};
pub use config::{Config, ConfigError};
pub use design_system::{Backend, DesignSystem, DesignSystemBuilder, StandardBackend, VariantOrder};
pub use error::CompileError;
pub use theme::{with_alpha, Theme, ThemeError, ThemeOptions};
pub use utilities::Utilities;
pub use variants::Variants;
