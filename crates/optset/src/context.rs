//! Per-parse state: the option being satisfied and its accumulated values.

use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::prototype::{OptionSpec, ValueArity};

/// Mutable state threaded through one call to [`OptionSet::parse`].
///
/// Handlers registered with [`OptionSet::add_with_context`] receive it when
/// their option completes.
///
/// [`OptionSet::parse`]: crate::OptionSet::parse
/// [`OptionSet::add_with_context`]: crate::OptionSet::add_with_context
#[derive(Debug, Clone)]
pub struct OptionContext {
    option: Option<Rc<OptionSpec>>,
    option_name: Option<String>,
    option_index: isize,
    values: Vec<Option<String>>,
}

impl Default for OptionContext {
    fn default() -> Self {
        Self {
            option: None,
            option_name: None,
            option_index: -1,
            values: Vec::new(),
        }
    }
}

/// Whether an option has everything it is going to get from the current token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fill {
    Complete,
    Pending,
}

impl OptionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The option currently being satisfied.
    pub fn option(&self) -> Option<&OptionSpec> {
        self.option.as_deref()
    }

    /// The flag and name that triggered the current option, e.g. `--color`.
    ///
    /// `None` for tokens routed to the default handler.
    pub fn option_name(&self) -> Option<&str> {
        self.option_name.as_deref()
    }

    /// Zero-based index of the token being processed; `-1` before the first.
    pub fn option_index(&self) -> isize {
        self.option_index
    }

    pub fn values(&self) -> OptionValues<'_> {
        OptionValues { ctx: self }
    }

    pub(crate) fn is_bound(&self) -> bool {
        self.option.is_some()
    }

    pub(crate) fn bind(&mut self, spec: Rc<OptionSpec>, name: Option<String>) {
        self.option = Some(spec);
        self.option_name = name;
    }

    pub(crate) fn advance(&mut self) {
        self.option_index += 1;
    }

    /// Append one value slot verbatim, without splitting.
    pub(crate) fn push_value(&mut self, value: Option<String>) {
        self.values.push(value);
    }

    /// Feed a supplied value (or its absence) to the bound option.
    ///
    /// Values are split on the option's separators when it has any. An absent
    /// value is never stored, so the option keeps waiting for one. Returns
    /// [`Fill::Complete`] once the option has all its values, or straight
    /// away for optional-value options.
    pub(crate) fn add_value(&mut self, raw: Option<&str>) -> Result<Fill> {
        let spec = self.option.clone().ok_or(Error::NoActiveOption)?;

        if let Some(raw) = raw {
            match spec.value_separators() {
                Some(separators) => {
                    for piece in split_values(raw, separators) {
                        self.values.push(Some(piece.to_string()));
                    }
                }
                None => self.values.push(Some(raw.to_string())),
            }
        }

        let count = self.values.len();
        if count == spec.max_value_count() || spec.value_arity() == ValueArity::Optional {
            Ok(Fill::Complete)
        } else if count > spec.max_value_count() {
            Err(Error::TooManyValues {
                option: self.display_name(),
                found: count,
                expected: spec.max_value_count(),
            })
        } else {
            Ok(Fill::Pending)
        }
    }

    /// Clear the bound option and its values after it has been invoked.
    pub(crate) fn reset(&mut self) {
        self.option = None;
        self.option_name = None;
        self.values.clear();
    }

    /// Name used in error messages: the triggering text, else the primary name.
    pub(crate) fn display_name(&self) -> String {
        match (&self.option_name, &self.option) {
            (Some(name), _) => name.clone(),
            (None, Some(spec)) => spec.primary_name().to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Split `raw` on any of `separators`, trying them in order at each position.
///
/// Empty pieces are kept; empty separators never match.
pub(crate) fn split_values<'v>(raw: &'v str, separators: &[String]) -> Vec<&'v str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut at = 0;

    while at < raw.len() {
        let rest = &raw[at..];
        let hit = separators
            .iter()
            .find(|sep| !sep.is_empty() && rest.starts_with(sep.as_str()));
        match hit {
            Some(sep) => {
                pieces.push(&raw[start..at]);
                at += sep.len();
                start = at;
            }
            None => at += rest.chars().next().map_or(1, char::len_utf8),
        }
    }
    pieces.push(&raw[start..]);
    pieces
}

/// Checked, read-only view of the values accumulated for the current option.
#[derive(Clone, Copy)]
pub struct OptionValues<'c> {
    ctx: &'c OptionContext,
}

impl<'c> OptionValues<'c> {
    /// Value slot `index`.
    ///
    /// A missing value for a required-value option is reported here, on
    /// access, rather than while tokens are consumed. Unfilled slots of
    /// optional-value options read as `None`.
    pub fn get(&self, index: usize) -> Result<Option<&'c str>> {
        let spec = self.ctx.option().ok_or(Error::NoActiveOption)?;
        if index >= spec.max_value_count() {
            return Err(Error::IndexOutOfRange {
                index,
                max_value_count: spec.max_value_count(),
            });
        }
        if spec.value_arity() == ValueArity::Required && index >= self.ctx.values.len() {
            return Err(Error::MissingRequiredValue {
                option: self.ctx.display_name(),
            });
        }
        Ok(self.ctx.values.get(index).and_then(|v| v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.ctx.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ctx.values.is_empty()
    }

    /// Accumulated values in order, unchecked.
    pub fn iter(&self) -> impl Iterator<Item = Option<&'c str>> + use<'c> {
        self.ctx.values.iter().map(|v| v.as_deref())
    }

    pub fn to_vec(&self) -> Vec<Option<String>> {
        self.ctx.values.clone()
    }
}

impl fmt::Debug for OptionValues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for OptionValues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(value.unwrap_or_default())?;
        }
        Ok(())
    }
}
