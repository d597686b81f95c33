//! Option prototype grammar.
//!
//! A prototype is a `|`-separated list of aliases. Each alias may end with a
//! type marker (`=` for a required value, `:` for an optional one) followed
//! by key/value separators:
//!
//! ```text
//! prototype ::= alias ('|' alias)*
//! alias     ::= name (marker sepspec)?
//! marker    ::= '=' | ':'
//! sepspec   ::= (plainchar | '{' text '}')*
//! ```
//!
//! The alias `<>` names the default handler, which receives every token no
//! other option claims.

use crate::error::{Error, Result};

/// Alias reserved for the default handler.
pub const DEFAULT_HANDLER: &str = "<>";

/// Separators used for multi-value options that do not declare their own.
pub const DEFAULT_SEPARATORS: [&str; 2] = [":", "="];

/// Whether an option takes no value, an optional value, or a required value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueArity {
    None,
    Optional,
    Required,
}

impl ValueArity {
    fn from_marker(marker: char) -> Self {
        if marker == '=' {
            Self::Required
        } else {
            Self::Optional
        }
    }

    pub fn takes_value(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// A compiled option prototype. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    prototype: String,
    names: Vec<String>,
    value_arity: ValueArity,
    max_value_count: usize,
    value_separators: Option<Vec<String>>,
    description: Option<String>,
}

impl OptionSpec {
    /// Compile `prototype` for an option holding up to `max_value_count` values.
    pub fn compile(prototype: &str, max_value_count: usize) -> Result<Self> {
        if prototype.is_empty() {
            return Err(Error::EmptyPrototype);
        }

        let mut names = Vec::new();
        let mut marker: Option<char> = None;
        let mut separators: Vec<String> = Vec::new();

        for segment in prototype.split('|') {
            if segment.is_empty() {
                return Err(Error::EmptyName {
                    prototype: prototype.to_string(),
                });
            }

            let Some(end) = segment.find(['=', ':']) else {
                names.push(segment.to_string());
                continue;
            };

            let found = char::from(segment.as_bytes()[end]);
            match marker {
                Some(prev) if prev != found => {
                    return Err(Error::ConflictingTypes {
                        prototype: prototype.to_string(),
                        first: prev,
                        second: found,
                    });
                }
                _ => marker = Some(found),
            }

            if end == 0 {
                return Err(Error::EmptyName {
                    prototype: prototype.to_string(),
                });
            }
            names.push(segment[..end].to_string());
            separators.extend(parse_separators(segment, &segment[end + 1..])?);
        }

        let value_arity = marker.map_or(ValueArity::None, ValueArity::from_marker);

        if max_value_count == 0 && value_arity.takes_value() {
            return Err(Error::ValueCountRequired {
                prototype: prototype.to_string(),
            });
        }
        if !value_arity.takes_value() && max_value_count > 1 {
            return Err(Error::FlagValueCount {
                prototype: prototype.to_string(),
                max_value_count,
            });
        }

        let value_separators = if !value_arity.takes_value() {
            None
        } else if max_value_count <= 1 {
            if !separators.is_empty() {
                return Err(Error::SeparatorsNotAllowed {
                    prototype: prototype.to_string(),
                    max_value_count,
                });
            }
            None
        } else if separators.is_empty() {
            Some(DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect())
        } else if separators.len() == 1 && separators[0].is_empty() {
            None
        } else {
            Some(separators)
        };

        let has_default = names.iter().any(|n| n == DEFAULT_HANDLER);
        if has_default
            && ((names.len() == 1 && value_arity.takes_value())
                || (names.len() > 1 && max_value_count > 1))
        {
            return Err(Error::DefaultHandlerCannotRequireValues {
                prototype: prototype.to_string(),
            });
        }

        Ok(Self {
            prototype: prototype.to_string(),
            names,
            value_arity,
            max_value_count,
            value_separators,
            description: None,
        })
    }

    /// Attach help text; see [`crate::help`] for the `{name}` markup.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// The prototype text this spec was compiled from.
    pub fn prototype(&self) -> &str {
        &self.prototype
    }

    /// All aliases, primary name first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn primary_name(&self) -> &str {
        // `compile` rejects empty prototypes, so there is always one name.
        self.names.first().map(String::as_str).unwrap_or_default()
    }

    pub fn value_arity(&self) -> ValueArity {
        self.value_arity
    }

    pub fn max_value_count(&self) -> usize {
        self.max_value_count
    }

    /// Separators used to split a supplied value, or `None` when every
    /// supplied token is a single value.
    pub fn value_separators(&self) -> Option<&[String]> {
        self.value_separators.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether `<>` is one of this option's aliases.
    pub fn is_default_handler(&self) -> bool {
        self.names.iter().any(|n| n == DEFAULT_HANDLER)
    }
}

impl std::fmt::Display for OptionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.prototype)
    }
}

/// Split the text after a type marker into separator tokens.
///
/// `{...}` collects a multi-character token verbatim; any other character is
/// a token on its own. `segment` is only used for error reporting.
pub fn parse_separators(segment: &str, spec: &str) -> Result<Vec<String>> {
    let ill_formed = || Error::IllFormedSeparator {
        segment: segment.to_string(),
    };

    let mut tokens = Vec::new();
    let mut open: Option<String> = None;

    for c in spec.chars() {
        match c {
            '{' if open.is_some() => return Err(ill_formed()),
            '{' => open = Some(String::new()),
            '}' => match open.take() {
                Some(token) => tokens.push(token),
                None => return Err(ill_formed()),
            },
            c => match open.as_mut() {
                Some(buf) => buf.push(c),
                None => tokens.push(c.to_string()),
            },
        }
    }

    if open.is_some() {
        return Err(ill_formed());
    }
    Ok(tokens)
}
