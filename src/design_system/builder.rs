use crate::theme::Theme;
use crate::utilities::Utilities;
use crate::variants::Variants;

use super::backend::{Backend, StandardBackend};
use super::DesignSystem;

/// Builder for [`DesignSystem`].
///
/// Registries default to the built-in sets; the variant registry is derived
/// from the theme (breakpoints) unless one is given explicitly.
///
/// # Example
///
/// ```rust
/// use classcss::{DesignSystem, Theme};
///
/// let ds = DesignSystem::builder()
///     .theme(Theme::new().add("--color-red-500", "#ef4444"))
///     .important(true)
///     .build();
///
/// assert!(ds.is_important());
/// ```
#[derive(Default)]
pub struct DesignSystemBuilder {
    theme: Theme,
    important: bool,
    utilities: Option<Utilities>,
    variants: Option<Variants>,
    backend: Option<Box<dyn Backend>>,
}

impl DesignSystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Marks every generated declaration `!important`.
    pub fn important(mut self, important: bool) -> Self {
        self.important = important;
        self
    }

    /// Replaces the utility registry.
    pub fn utilities(mut self, utilities: Utilities) -> Self {
        self.utilities = Some(utilities);
        self
    }

    /// Replaces the variant registry.
    pub fn variants(mut self, variants: Variants) -> Self {
        self.variants = Some(variants);
        self
    }

    /// Replaces the parse/compile backend.
    pub fn backend(mut self, backend: impl Backend + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    pub fn build(self) -> DesignSystem {
        let variants = self
            .variants
            .unwrap_or_else(|| Variants::standard(&self.theme));
        DesignSystem::from_parts(
            self.theme,
            self.utilities.unwrap_or_else(Utilities::standard),
            variants,
            self.important,
            self.backend
                .unwrap_or_else(|| Box::new(StandardBackend)),
        )
    }
}
