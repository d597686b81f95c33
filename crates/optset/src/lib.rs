//! Prototype-driven command-line option parsing.
//!
//! Options are declared with compact prototype strings and a handler:
//!
//! - `v|verbose` is a flag with two names.
//! - `o|output=` takes a required value (`-o file`, `-ofile`, `--output=file`).
//! - `color:` takes an optional value that must be attached (`--color=auto`).
//! - `D=` with two value slots takes key/value pairs (`-Dkey=value`).
//! - `<>` receives every token no other option claims.
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//!
//! let defines = RefCell::new(Vec::new());
//! let mut set = optset::OptionSet::new();
//! set.add_pair("D|define=", |k, v| {
//!     defines.borrow_mut().push(format!("{}={}", k.unwrap_or_default(), v.unwrap_or_default()))
//! })?;
//!
//! let extras = set.parse(["-DA=1", "--define", "B:2", "--", "-DC=3"])?;
//! drop(set);
//!
//! assert_eq!(*defines.borrow(), ["A=1", "B=2"]);
//! assert_eq!(extras, ["-DC=3"]);
//! # Ok::<(), optset::Error>(())
//! ```

mod action;
mod context;
mod dispatch;
mod error;
pub mod help;
mod prototype;
mod registry;
mod set;
mod token;

pub use action::Action;
pub use context::{OptionContext, OptionValues};
pub use error::{BoxError, Error, ErrorKind, Result};
pub use prototype::{DEFAULT_HANDLER, DEFAULT_SEPARATORS, OptionSpec, ValueArity, parse_separators};
pub use registry::{Keyed, Registry};
pub use set::{OptionDecl, OptionSet};
pub use token::OptionParts;
