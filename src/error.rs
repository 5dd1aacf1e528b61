//! Compilation errors.
//!
//! [`CompileError`] is produced while substituting functions such as
//! `theme()` inside compiled declarations. It never escapes the public
//! compilation API: the compiled-AST cache catches it and records the
//! candidate as producing no output.

/// Error raised while substituting functions in compiled CSS values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// A theme path did not resolve and no fallback was given.
    #[error("could not resolve theme value '{path}'")]
    UnresolvedThemeValue { path: String },

    /// A function was called with arguments it cannot use.
    #[error("invalid arguments for {function}(): {reason}")]
    InvalidArguments {
        function: &'static str,
        reason: String,
    },

    /// A `--*()` function that is not known was called.
    #[error("unknown function {0}()")]
    UnknownFunction(String),
}
