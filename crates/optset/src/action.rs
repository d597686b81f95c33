//! Completion handlers.

use std::fmt;
use std::str::FromStr;

use crate::context::OptionContext;
use crate::error::{BoxError, Error, Result};

type SingleFn<'a> = Box<dyn FnMut(Option<&str>) + 'a>;
type PairFn<'a> = Box<dyn FnMut(Option<&str>, Option<&str>) + 'a>;
type ContextFn<'a> = Box<dyn FnMut(&OptionContext) -> Result<()> + 'a>;

/// What runs when an option occurrence is complete.
///
/// `Single` and `Pair` read their slots through the checked accessor, so a
/// required value that never arrived surfaces as
/// [`Error::MissingRequiredValue`]. `Context` handlers decide for themselves
/// which slots to read.
pub enum Action<'a> {
    Single(SingleFn<'a>),
    Pair(PairFn<'a>),
    Context(ContextFn<'a>),
}

impl<'a> Action<'a> {
    pub fn single(f: impl FnMut(Option<&str>) + 'a) -> Self {
        Self::Single(Box::new(f))
    }

    pub fn pair(f: impl FnMut(Option<&str>, Option<&str>) + 'a) -> Self {
        Self::Pair(Box::new(f))
    }

    pub fn context(f: impl FnMut(&OptionContext) -> Result<()> + 'a) -> Self {
        Self::Context(Box::new(f))
    }

    /// A one-value handler whose value goes through `converter` first.
    pub fn converted<T, E>(
        converter: impl Fn(&str) -> Result<T, E> + 'a,
        mut f: impl FnMut(Option<T>) + 'a,
    ) -> Self
    where
        T: 'a,
        E: Into<BoxError> + 'a,
    {
        Self::context(move |ctx| {
            let value = convert_slot(ctx, 0, &converter)?;
            f(value);
            Ok(())
        })
    }

    /// A one-value handler parsing its value with [`FromStr`].
    pub fn typed<T>(f: impl FnMut(Option<T>) + 'a) -> Self
    where
        T: FromStr + 'a,
        T::Err: Into<BoxError>,
    {
        Self::converted(T::from_str, f)
    }

    /// A key/value handler parsing both slots with [`FromStr`].
    pub fn typed_pair<K, V>(mut f: impl FnMut(Option<K>, Option<V>) + 'a) -> Self
    where
        K: FromStr + 'a,
        K::Err: Into<BoxError>,
        V: FromStr + 'a,
        V::Err: Into<BoxError>,
    {
        Self::context(move |ctx| {
            let key = convert_slot(ctx, 0, &K::from_str)?;
            let value = convert_slot(ctx, 1, &V::from_str)?;
            f(key, value);
            Ok(())
        })
    }

    pub(crate) fn invoke(&mut self, ctx: &OptionContext) -> Result<()> {
        match self {
            Self::Single(f) => {
                let value = ctx.values().get(0)?;
                f(value);
                Ok(())
            }
            Self::Pair(f) => {
                let values = ctx.values();
                let key = values.get(0)?;
                let value = values.get(1)?;
                f(key, value);
                Ok(())
            }
            Self::Context(f) => f(ctx),
        }
    }
}

impl fmt::Debug for Action<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            Self::Single(_) => "Single",
            Self::Pair(_) => "Pair",
            Self::Context(_) => "Context",
        };
        write!(f, "Action::{shape}")
    }
}

/// Read slot `index` and run it through `converter`.
///
/// An empty slot converts to `None` without calling the converter.
fn convert_slot<T, E>(
    ctx: &OptionContext,
    index: usize,
    converter: &impl Fn(&str) -> Result<T, E>,
) -> Result<Option<T>>
where
    E: Into<BoxError>,
{
    let Some(raw) = ctx.values().get(index)? else {
        return Ok(None);
    };
    converter(raw).map(Some).map_err(|e| Error::ConversionFailed {
        value: raw.to_string(),
        type_name: short_type_name::<T>(),
        option: ctx.display_name(),
        source: e.into(),
    })
}

/// `alloc::string::String` -> `String`, keeping generic arguments intact.
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(at) => &full[at + 2..],
        None => full,
    }
}
