//! Loading themes from CSS.
//!
//! Tokens are read from `@theme { ... }` blocks (optionally followed by the
//! `inline`, `reference` or `static` keywords) and from `:root { ... }` rules.
//! Everything else in the stylesheet is ignored.
//!
//! ```css
//! @theme {
//!   --color-red-500: oklch(63.7% 0.237 25.331);
//!   --spacing: 0.25rem;
//! }
//!
//! @theme inline {
//!   --font-sans: "Inter", sans-serif;
//! }
//! ```

use std::path::Path;

use cssparser::{Parser, ParserInput, Token};

use super::error::ThemeError;
use super::theme::{Theme, ThemeOptions};

/// What the tokens seen so far at the top level introduce.
enum Prelude {
    None,
    Theme(ThemeOptions),
    Colon,
    Root,
}

struct Entry {
    name: String,
    value: String,
    options: ThemeOptions,
}

impl Theme {
    /// Parses theme tokens from CSS source.
    ///
    /// # Errors
    ///
    /// Returns an error if an `@theme` block declares a property that is not
    /// a custom property, or uses an unknown option keyword.
    ///
    /// # Example
    ///
    /// ```rust
    /// use classcss::Theme;
    ///
    /// let theme = Theme::from_css("@theme { --color-red-500: #ef4444; }").unwrap();
    /// assert_eq!(theme.get("--color-red-500"), Some("#ef4444"));
    /// ```
    pub fn from_css(css: &str) -> Result<Self, ThemeError> {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let mut entries = Vec::new();
        let mut errors = Vec::new();
        let mut prelude = Prelude::None;

        loop {
            let token = match parser.next() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };

            prelude = match (prelude, token) {
                (_, Token::AtKeyword(name)) if name.eq_ignore_ascii_case("theme") => {
                    Prelude::Theme(ThemeOptions::default())
                }
                (Prelude::Theme(mut options), Token::Ident(word)) => {
                    match &*word {
                        "inline" => options.inline = true,
                        "reference" => options.reference = true,
                        "static" => options.is_static = true,
                        other => errors.push(ThemeError::UnknownOption(other.to_string())),
                    }
                    Prelude::Theme(options)
                }
                (Prelude::None, Token::Colon) => Prelude::Colon,
                (Prelude::Colon, Token::Ident(word)) if word.eq_ignore_ascii_case("root") => {
                    Prelude::Root
                }
                (Prelude::Theme(options), Token::CurlyBracketBlock) => {
                    let _ = parser.parse_nested_block::<_, _, ()>(|nested| {
                        read_declarations(nested, options, true, &mut entries, &mut errors);
                        Ok(())
                    });
                    Prelude::None
                }
                (Prelude::Root, Token::CurlyBracketBlock) => {
                    let _ = parser.parse_nested_block::<_, _, ()>(|nested| {
                        read_declarations(
                            nested,
                            ThemeOptions::default(),
                            false,
                            &mut entries,
                            &mut errors,
                        );
                        Ok(())
                    });
                    Prelude::None
                }
                // Any other block (or statement end) resets the prelude; the
                // parser skips unread block contents on its own.
                _ => Prelude::None,
            };
        }

        if let Some(err) = errors.into_iter().next() {
            return Err(err);
        }

        let mut theme = Theme::new();
        for entry in entries {
            theme.insert(entry.name, entry.value, entry.options);
        }
        Ok(theme)
    }

    /// Reads a theme from a CSS file.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Io`] if the file cannot be read, or any error
    /// from [`Theme::from_css`].
    pub fn from_css_file(path: impl AsRef<Path>) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let css = std::fs::read_to_string(path).map_err(|e| ThemeError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_css(&css)
    }
}

fn read_declarations(
    parser: &mut Parser<'_, '_>,
    options: ThemeOptions,
    strict: bool,
    entries: &mut Vec<Entry>,
    errors: &mut Vec<ThemeError>,
) {
    loop {
        let token = match parser.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        let Token::Ident(name) = token else {
            continue;
        };

        if parser.expect_colon().is_err() {
            skip_to_semicolon(parser);
            continue;
        }

        let start = parser.position();
        let mut end = start;
        loop {
            let before = parser.position();
            match parser.next_including_whitespace_and_comments() {
                Ok(Token::Semicolon) | Err(_) => {
                    end = before;
                    break;
                }
                Ok(_) => {}
            }
        }

        if !name.starts_with("--") {
            if strict {
                errors.push(ThemeError::InvalidName(name.to_string()));
            }
            continue;
        }

        entries.push(Entry {
            name: name.to_string(),
            value: parser.slice(start..end).trim().to_string(),
            options,
        });
    }
}

fn skip_to_semicolon(parser: &mut Parser<'_, '_>) {
    while let Ok(token) = parser.next() {
        if matches!(token, Token::Semicolon) {
            break;
        }
    }
}
