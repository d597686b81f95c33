//! Error type shared by registration, parsing and value access.

use thiserror::Error;

/// Boxed error returned by value converters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed prototype or registry conflict (raised while registering).
    Grammar,
    /// Inconsistent value count (raised while registering).
    Arity,
    /// Bad input tokens (raised while parsing).
    Parse,
    /// Accumulator or renderer used outside its protocol.
    Usage,
}

/// Everything that can go wrong while registering options, parsing
/// arguments, reading values or rendering help.
#[derive(Debug, Error)]
pub enum Error {
    /// The prototype string was empty.
    #[error("option prototype cannot be the empty string")]
    EmptyPrototype,

    /// A `|`-separated segment had no name before its type marker.
    #[error("empty option names are not supported in prototype '{prototype}'")]
    EmptyName { prototype: String },

    /// Two aliases disagree on `=` vs. `:`.
    #[error("conflicting option types in prototype '{prototype}': '{first}' vs. '{second}'")]
    ConflictingTypes {
        prototype: String,
        first: char,
        second: char,
    },

    /// Unbalanced or nested `{`/`}` in a separator list.
    #[error("ill-formed name/value separator found in \"{segment}\"")]
    IllFormedSeparator { segment: String },

    /// Separators given for an option with at most one value.
    #[error(
        "cannot provide key/value separators for options taking {max_value_count} value(s) (prototype '{prototype}')"
    )]
    SeparatorsNotAllowed {
        prototype: String,
        max_value_count: usize,
    },

    /// `<>` declared with a value requirement.
    #[error("the default option handler '<>' cannot require values (prototype '{prototype}')")]
    DefaultHandlerCannotRequireValues { prototype: String },

    /// An alias is already owned by another option.
    #[error("option name '{name}' is already registered")]
    DuplicateName { name: String },

    /// A value-taking option declared with zero value slots.
    #[error(
        "cannot provide a max value count of 0 for an option taking values (prototype '{prototype}')"
    )]
    ValueCountRequired { prototype: String },

    /// A flag declared with more than one value slot.
    #[error(
        "cannot provide a max value count of {max_value_count} for an option without values (prototype '{prototype}')"
    )]
    FlagValueCount {
        prototype: String,
        max_value_count: usize,
    },

    /// A handler read a required slot that was never filled.
    #[error("missing required value for option '{option}'")]
    MissingRequiredValue { option: String },

    /// More values arrived than the option has slots.
    #[error("found {found} option values for '{option}' when expecting {expected}")]
    TooManyValues {
        option: String,
        found: usize,
        expected: usize,
    },

    /// A letter after the first in `-abc` is not registered.
    #[error("cannot bundle unregistered option '{option}'")]
    UnregisteredBundle { option: String },

    /// A typed handler's converter rejected a value.
    #[error("could not convert string `{value}' to type {type_name} for option `{option}'")]
    ConversionFailed {
        value: String,
        type_name: &'static str,
        option: String,
        #[source]
        source: BoxError,
    },

    /// Values were read with no option bound.
    #[error("no option is currently being parsed")]
    NoActiveOption,

    /// A value index past the option's slot count.
    #[error("value index {index} is out of range for an option taking {max_value_count} value(s)")]
    IndexOutOfRange {
        index: usize,
        max_value_count: usize,
    },

    /// A description with an unmatched `}`.
    #[error("invalid option description: {description}")]
    InvalidDescription { description: String },
}

impl Error {
    /// Which stage of use produced this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyPrototype
            | Self::EmptyName { .. }
            | Self::ConflictingTypes { .. }
            | Self::IllFormedSeparator { .. }
            | Self::SeparatorsNotAllowed { .. }
            | Self::DefaultHandlerCannotRequireValues { .. }
            | Self::DuplicateName { .. } => ErrorKind::Grammar,
            Self::ValueCountRequired { .. } | Self::FlagValueCount { .. } => ErrorKind::Arity,
            Self::MissingRequiredValue { .. }
            | Self::TooManyValues { .. }
            | Self::UnregisteredBundle { .. }
            | Self::ConversionFailed { .. } => ErrorKind::Parse,
            Self::NoActiveOption | Self::IndexOutOfRange { .. } | Self::InvalidDescription { .. } => {
                ErrorKind::Usage
            }
        }
    }

    /// Display name of the option a parse error refers to.
    pub fn option_name(&self) -> Option<&str> {
        match self {
            Self::MissingRequiredValue { option }
            | Self::TooManyValues { option, .. }
            | Self::UnregisteredBundle { option }
            | Self::ConversionFailed { option, .. } => Some(option.as_str()),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
