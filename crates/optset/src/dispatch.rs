//! Token-by-token dispatch for a single parse.
//!
//! A [`Dispatcher`] lives for one call to [`OptionSet::parse`]. Its state is
//! derived from the context: an option that is still bound after its token
//! was consumed is waiting for more values, and once the `--` sentinel has
//! been seen every remaining token is passed through untouched.
//!
//! [`OptionSet::parse`]: crate::OptionSet::parse

use std::rc::Rc;

use crate::context::{Fill, OptionContext};
use crate::error::{Error, Result};
use crate::prototype::{DEFAULT_HANDLER, OptionSpec, ValueArity};
use crate::registry::Registry;
use crate::set::Entry;
use crate::token::OptionParts;

/// Token that ends option processing.
pub(crate) const SENTINEL: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    Scanning,
    InValue,
    PassThrough,
}

pub(crate) struct Dispatcher<'r, 'a> {
    registry: &'r mut Registry<Entry<'a>>,
    default: Option<Rc<OptionSpec>>,
    ctx: OptionContext,
    passthrough: bool,
    extras: Vec<String>,
}

impl<'r, 'a> Dispatcher<'r, 'a> {
    pub(crate) fn new(registry: &'r mut Registry<Entry<'a>>) -> Self {
        let default = registry
            .get(DEFAULT_HANDLER)
            .map(|entry| Rc::clone(&entry.spec));
        Self {
            registry,
            default,
            ctx: OptionContext::new(),
            passthrough: false,
            extras: Vec::new(),
        }
    }

    pub(crate) fn state(&self) -> State {
        if self.passthrough {
            State::PassThrough
        } else if self.ctx.is_bound() {
            State::InValue
        } else {
            State::Scanning
        }
    }

    /// Process the next token.
    pub(crate) fn feed(&mut self, token: String) -> Result<()> {
        self.ctx.advance();
        let index = self.ctx.option_index();

        match self.state() {
            State::Scanning if token == SENTINEL => {
                tracing::trace!(index, "sentinel, passing remaining tokens through");
                self.passthrough = true;
                Ok(())
            }
            State::PassThrough => self.unprocessed(token),
            State::InValue => {
                tracing::trace!(index, option = %self.ctx.display_name(), "value");
                self.accept(Some(&token))
            }
            State::Scanning => {
                if self.dispatch_option(&token)? {
                    Ok(())
                } else {
                    self.unprocessed(token)
                }
            }
        }
    }

    /// Flush an option still waiting for values and hand back the extras.
    pub(crate) fn finish(mut self) -> Result<Vec<String>> {
        if self.ctx.is_bound() {
            tracing::trace!(option = %self.ctx.display_name(), "completing at end of input");
            self.complete()?;
        }
        Ok(self.extras)
    }

    /// Returns `false` when `token` is not an option this set knows about.
    fn dispatch_option(&mut self, token: &str) -> Result<bool> {
        let Some(parts) = OptionParts::parse(token) else {
            return Ok(false);
        };

        let Some(spec) = self.lookup(parts.name) else {
            return Ok(self.boolean(token, parts.name)?
                || self.bundle(parts.flag, &parts.name_and_value())?);
        };

        tracing::trace!(
            index = self.ctx.option_index(),
            option = parts.name,
            "exact match"
        );
        let arity = spec.value_arity();
        self.ctx
            .bind(spec, Some(format!("{}{}", parts.flag, parts.name)));
        if arity == ValueArity::None {
            self.ctx.push_value(Some(parts.name.to_string()));
            self.complete()?;
        } else {
            self.accept(parts.value)?;
        }
        Ok(true)
    }

    /// `-name+` / `-name-` for a registered flag.
    fn boolean(&mut self, token: &str, name: &str) -> Result<bool> {
        let (prefix, enabled) = match (name.strip_suffix('+'), name.strip_suffix('-')) {
            (Some(prefix), _) => (prefix, true),
            (_, Some(prefix)) => (prefix, false),
            _ => return Ok(false),
        };
        let Some(spec) = self
            .lookup(prefix)
            .filter(|spec| spec.value_arity() == ValueArity::None)
        else {
            return Ok(false);
        };

        tracing::trace!(index = self.ctx.option_index(), option = prefix, enabled, "boolean");
        self.ctx.bind(spec, Some(token.to_string()));
        self.ctx.push_value(enabled.then(|| token.to_string()));
        self.complete()?;
        Ok(true)
    }

    /// `-abc`, `-ofile`: single-character options packed behind one dash.
    fn bundle(&mut self, flag: &str, text: &str) -> Result<bool> {
        if flag != "-" {
            return Ok(false);
        }

        for (position, (at, letter)) in text.char_indices().enumerate() {
            let end = at + letter.len_utf8();
            let name = &text[at..end];
            let option = format!("{flag}{letter}");

            let Some(spec) = self.lookup(name) else {
                if position == 0 {
                    return Ok(false);
                }
                return Err(Error::UnregisteredBundle { option });
            };

            tracing::trace!(index = self.ctx.option_index(), option = %option, "bundle");
            let arity = spec.value_arity();
            self.ctx.bind(spec, Some(option));
            if arity == ValueArity::None {
                self.ctx.push_value(Some(text.to_string()));
                self.complete()?;
                continue;
            }

            let rest = &text[end..];
            self.accept((!rest.is_empty()).then_some(rest))?;
            return Ok(true);
        }

        Ok(true)
    }

    /// Route a token nobody claimed to the default handler or the extras.
    fn unprocessed(&mut self, token: String) -> Result<()> {
        let index = self.ctx.option_index();
        match self.default.clone() {
            Some(spec) => {
                tracing::trace!(index, token = %token, "default handler");
                self.ctx.bind(spec, None);
                self.ctx.push_value(Some(token));
                self.complete()
            }
            None => {
                tracing::trace!(index, token = %token, "extra");
                self.extras.push(token);
                Ok(())
            }
        }
    }

    fn accept(&mut self, value: Option<&str>) -> Result<()> {
        match self.ctx.add_value(value)? {
            Fill::Complete => self.complete(),
            Fill::Pending => Ok(()),
        }
    }

    /// Run the bound option's action, then clear the context for the next one.
    fn complete(&mut self) -> Result<()> {
        let primary = self
            .ctx
            .option()
            .map(|spec| spec.primary_name().to_string())
            .ok_or(Error::NoActiveOption)?;

        let result = match self.registry.get_mut(&primary) {
            Some(entry) => entry.action.invoke(&self.ctx),
            None => Err(Error::NoActiveOption),
        };
        self.ctx.reset();
        result
    }

    fn lookup(&self, name: &str) -> Option<Rc<OptionSpec>> {
        self.registry.get(name).map(|entry| Rc::clone(&entry.spec))
    }
}
