//! Opacity modifiers.

/// Applies an opacity modifier to a color value.
///
/// Bare numbers are treated as fractions (`0.5` becomes `50%`); anything else
/// (`50%`, `var(--opacity)`) is used as-is. A fully opaque modifier returns
/// the value unchanged.
///
/// ```rust
/// use classcss::theme::with_alpha;
///
/// assert_eq!(
///     with_alpha("var(--color-red-500)", "50%"),
///     "color-mix(in oklab, var(--color-red-500) 50%, transparent)"
/// );
/// assert_eq!(with_alpha("red", "0.25"), "color-mix(in oklab, red 25%, transparent)");
/// assert_eq!(with_alpha("red", "100%"), "red");
/// ```
pub fn with_alpha(value: &str, alpha: &str) -> String {
    let alpha = alpha.trim();
    if alpha.is_empty() {
        return value.to_string();
    }

    let alpha = match alpha.parse::<f64>() {
        Ok(fraction) if fraction.is_finite() => format_percentage(fraction * 100.0),
        _ => alpha.to_string(),
    };

    if alpha == "100%" {
        return value.to_string();
    }

    format!("color-mix(in oklab, {} {}, transparent)", value, alpha)
}

/// Converts a named utility modifier (`50`, `2.5`) into a percentage.
///
/// Returns `None` for modifiers that are not plain numbers.
pub fn alpha_from_modifier(modifier: &str) -> Option<String> {
    let number = modifier.parse::<f64>().ok()?;
    if !number.is_finite() || number < 0.0 {
        return None;
    }
    Some(format_percentage(number))
}

fn format_percentage(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    format!("{}%", rounded)
}
