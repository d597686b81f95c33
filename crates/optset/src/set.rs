//! The public option set: registration and parsing.

use std::rc::Rc;
use std::str::FromStr;

use crate::action::Action;
use crate::context::OptionContext;
use crate::dispatch::Dispatcher;
use crate::error::{BoxError, Result};
use crate::help;
use crate::prototype::OptionSpec;
use crate::registry::{Keyed, Registry};

/// A registered option and what to do when it completes.
#[derive(Debug)]
pub(crate) struct Entry<'a> {
    pub(crate) spec: Rc<OptionSpec>,
    pub(crate) action: Action<'a>,
}

impl Keyed for Entry<'_> {
    fn spec(&self) -> &OptionSpec {
        &self.spec
    }
}

/// Prototype plus optional help text, as accepted by the `add*` methods.
///
/// A bare `&str` is a prototype without description; a `(prototype,
/// description)` tuple carries both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDecl {
    prototype: String,
    description: Option<String>,
}

impl OptionDecl {
    pub fn new(prototype: impl Into<String>) -> Self {
        Self {
            prototype: prototype.into(),
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn compile(self, max_value_count: usize) -> Result<OptionSpec> {
        Ok(OptionSpec::compile(&self.prototype, max_value_count)?
            .with_description(self.description))
    }
}

impl From<&str> for OptionDecl {
    fn from(prototype: &str) -> Self {
        Self::new(prototype)
    }
}

impl From<String> for OptionDecl {
    fn from(prototype: String) -> Self {
        Self::new(prototype)
    }
}

impl From<(&str, &str)> for OptionDecl {
    fn from((prototype, description): (&str, &str)) -> Self {
        Self::new(prototype).description(description)
    }
}

/// A set of options and the handlers they feed.
///
/// ```
/// use std::cell::RefCell;
///
/// let verbose = RefCell::new(0);
/// let mut output = None;
///
/// let mut set = optset::OptionSet::new();
/// set.add("v|verbose", |_| *verbose.borrow_mut() += 1)?
///     .add("o|output=", |v| output = v.map(str::to_string))?;
///
/// let extras = set.parse(["-vv", "--output=out.txt", "input.txt"])?;
/// drop(set);
///
/// assert_eq!(*verbose.borrow(), 2);
/// assert_eq!(output.as_deref(), Some("out.txt"));
/// assert_eq!(extras, ["input.txt"]);
/// # Ok::<(), optset::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct OptionSet<'a> {
    registry: Registry<Entry<'a>>,
}

impl<'a> OptionSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single-value option. Flags receive their own name when
    /// present.
    pub fn add(
        &mut self,
        decl: impl Into<OptionDecl>,
        f: impl FnMut(Option<&str>) + 'a,
    ) -> Result<&mut Self> {
        let spec = decl.into().compile(1)?;
        self.insert(spec, Action::single(f))
    }

    /// Register a key/value option (two value slots).
    pub fn add_pair(
        &mut self,
        decl: impl Into<OptionDecl>,
        f: impl FnMut(Option<&str>, Option<&str>) + 'a,
    ) -> Result<&mut Self> {
        let spec = decl.into().compile(2)?;
        self.insert(spec, Action::pair(f))
    }

    /// Register a single-value option parsed with [`FromStr`].
    pub fn add_typed<T>(
        &mut self,
        decl: impl Into<OptionDecl>,
        f: impl FnMut(Option<T>) + 'a,
    ) -> Result<&mut Self>
    where
        T: FromStr + 'a,
        T::Err: Into<BoxError>,
    {
        let spec = decl.into().compile(1)?;
        self.insert(spec, Action::typed(f))
    }

    /// Register a key/value option whose slots are parsed with [`FromStr`].
    pub fn add_typed_pair<K, V>(
        &mut self,
        decl: impl Into<OptionDecl>,
        f: impl FnMut(Option<K>, Option<V>) + 'a,
    ) -> Result<&mut Self>
    where
        K: FromStr + 'a,
        K::Err: Into<BoxError>,
        V: FromStr + 'a,
        V::Err: Into<BoxError>,
    {
        let spec = decl.into().compile(2)?;
        self.insert(spec, Action::typed_pair(f))
    }

    /// Register a single-value option with a custom string conversion.
    pub fn add_converted<T, E>(
        &mut self,
        decl: impl Into<OptionDecl>,
        converter: impl Fn(&str) -> Result<T, E> + 'a,
        f: impl FnMut(Option<T>) + 'a,
    ) -> Result<&mut Self>
    where
        T: 'a,
        E: Into<BoxError> + 'a,
    {
        let spec = decl.into().compile(1)?;
        self.insert(spec, Action::converted(converter, f))
    }

    /// Register an option with any number of value slots whose handler reads
    /// the raw [`OptionContext`].
    pub fn add_with_context(
        &mut self,
        decl: impl Into<OptionDecl>,
        max_value_count: usize,
        f: impl FnMut(&OptionContext) -> Result<()> + 'a,
    ) -> Result<&mut Self> {
        let spec = decl.into().compile(max_value_count)?;
        self.insert(spec, Action::context(f))
    }

    /// Register an already compiled option.
    ///
    /// Fails if any of its names is taken; nothing is registered then.
    pub fn insert(&mut self, spec: OptionSpec, action: Action<'a>) -> Result<&mut Self> {
        let prototype = spec.prototype().to_string();
        self.registry.insert(Entry {
            spec: Rc::new(spec),
            action,
        })?;
        tracing::debug!(%prototype, "registered option");
        Ok(self)
    }

    /// Unregister the option that owns `name`, under all of its names.
    pub fn remove(&mut self, name: &str) -> Option<OptionSpec> {
        let entry = self.registry.remove(name)?;
        tracing::debug!(prototype = %entry.spec, "removed option");
        Some(Rc::unwrap_or_clone(entry.spec))
    }

    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.registry.get(name).map(Keyed::spec)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Registered options in registration order.
    pub fn options(&self) -> impl Iterator<Item = &OptionSpec> {
        self.registry.iter().map(Keyed::spec)
    }

    /// Run every token through the registered options, invoking handlers in
    /// token order, and return the tokens nothing claimed.
    ///
    /// The first error aborts the parse; handlers that already ran are not
    /// undone.
    pub fn parse<I>(&mut self, tokens: I) -> Result<Vec<String>>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        tracing::debug!(options = self.registry.len(), "parsing arguments");

        let mut dispatcher = Dispatcher::new(&mut self.registry);
        let mut consumed = 0usize;
        for token in tokens {
            dispatcher.feed(token.into())?;
            consumed += 1;
        }
        let extras = dispatcher.finish()?;

        tracing::debug!(tokens = consumed, extras = extras.len(), "parse finished");
        Ok(extras)
    }

    /// Help text for every registered option; see [`crate::help`].
    pub fn option_descriptions(&self) -> Result<String> {
        help::render(self.options())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::{BTreeMap, HashMap};

    use super::*;
    use crate::error::Error;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Level {
        A,
        B,
    }

    impl FromStr for Level {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "A" => Ok(Self::A),
                "B" => Ok(Self::B),
                other => Err(format!("unknown level {other}")),
            }
        }
    }

    type KvLog = RefCell<Vec<(String, Option<String>)>>;

    fn record(log: &KvLog) -> impl FnMut(Option<&str>, Option<&str>) + '_ {
        move |k, v| {
            log.borrow_mut()
                .push((k.unwrap_or_default().to_string(), v.map(str::to_string)))
        }
    }

    fn take(log: &KvLog) -> Vec<(String, Option<String>)> {
        std::mem::take(&mut *log.borrow_mut())
    }

    fn pairs(items: &[(&str, Option<&str>)]) -> Vec<(String, Option<String>)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    fn owned(v: Option<&str>) -> Option<String> {
        v.map(str::to_string)
    }

    #[test]
    fn boolean_values() {
        let a = Cell::new(false);
        let mut set = OptionSet::new();
        set.add("a", |v| a.set(v.is_some())).unwrap();

        set.parse(["-a"]).unwrap();
        assert!(a.get());
        set.parse(["-a+"]).unwrap();
        assert!(a.get());
        set.parse(["-a-"]).unwrap();
        assert!(!a.get());
    }

    #[test]
    fn bundled_values() {
        let defines = RefCell::new(Vec::new());
        let libs = RefCell::new(Vec::new());
        let debug = Cell::new(false);

        let mut set = OptionSet::new();
        set.add("D|define=", |v| defines.borrow_mut().push(owned(v)))
            .unwrap()
            .add("L|library:", |v| libs.borrow_mut().push(owned(v)))
            .unwrap()
            .add("Debug", |v| debug.set(v.is_some()))
            .unwrap()
            .add("E", |_| {})
            .unwrap();

        let extras = set
            .parse([
                "-DNAME", "-D", "NAME2", "-Debug", "-L/foo", "-L", "/bar", "-EDNAME3",
            ])
            .unwrap();
        assert_eq!(extras, ["/bar"]);
        assert_eq!(
            *defines.borrow(),
            [owned(Some("NAME")), owned(Some("NAME2")), owned(Some("NAME3"))]
        );
        assert!(debug.get());
        assert_eq!(*libs.borrow(), [owned(Some("/foo")), None]);

        let err = set.parse(["-EVALUENOTSUP"]).unwrap_err();
        assert_eq!(err.to_string(), "cannot bundle unregistered option '-V'");
    }

    #[test]
    fn combination_platter() {
        let a = RefCell::new(None);
        let b = RefCell::new(Some("unset".to_string()));
        let level = Cell::new(None);
        let help = Cell::new(0u8);
        let verbose = Cell::new(0);

        let mut set = OptionSet::new();
        set.add("a=", |v| *a.borrow_mut() = owned(v))
            .unwrap()
            .add(("b", "desc"), |v| *b.borrow_mut() = owned(v))
            .unwrap()
            .add_typed("f=", |v: Option<Level>| level.set(v))
            .unwrap()
            .add("v", |_| verbose.set(verbose.get() + 1))
            .unwrap()
            .add("h|?|help", |v| {
                let bit = match v {
                    Some("h") => 0x1,
                    Some("?") => 0x2,
                    Some("help") => 0x4,
                    _ => 0,
                };
                help.set(help.get() | bit);
            })
            .unwrap();

        let extras = set
            .parse([
                "foo", "-v", "-a=42", "/b-", "-a", "64", "bar", "--f", "B", "/h", "-?", "--help",
                "-v",
            ])
            .unwrap();

        assert_eq!(extras, ["foo", "bar"]);
        assert_eq!(a.borrow().as_deref(), Some("64"));
        assert_eq!(*b.borrow(), None);
        assert_eq!(verbose.get(), 2);
        assert_eq!(help.get(), 0x7);
        assert_eq!(level.get(), Some(Level::B));
    }

    #[test]
    fn custom_key_value() {
        let a = RefCell::new(HashMap::new());
        let b = RefCell::new(HashMap::new());

        let mut set = OptionSet::new();
        set.add_with_context("a==:", 2, |ctx| {
            let v = ctx.values();
            let key = v.get(0)?.unwrap_or_default().to_string();
            let value = v.get(1)?.unwrap_or_default().to_string();
            a.borrow_mut().insert(key, value);
            Ok(())
        })
        .unwrap()
        .add_with_context("b==:", 3, |ctx| {
            let v = ctx.values();
            let key = v.get(0)?.unwrap_or_default().to_string();
            let rest = [v.get(1)?, v.get(2)?].map(|s| s.unwrap_or_default().to_string());
            b.borrow_mut().insert(key, rest);
            Ok(())
        })
        .unwrap();

        set.parse([
            "-a=b=c", "-a=d", "e", "-a:f=g", "-a:h:i", "-a", "j=k", "-a", "l:m",
        ])
        .unwrap();
        {
            let a = a.borrow();
            assert_eq!(a.len(), 6);
            for (k, v) in [("b", "c"), ("d", "e"), ("f", "g"), ("h", "i"), ("j", "k"), ("l", "m")] {
                assert_eq!(a[k], v);
            }
        }

        let err = set.parse(["-a=b"]).unwrap_err();
        assert_eq!(err.to_string(), "missing required value for option '-a'");

        set.parse(["-b", "a", "b", "c", "-b:d:e:f", "-b=g=h:i", "-b:j=k:l"])
            .unwrap();
        let b = b.borrow();
        assert_eq!(b.len(), 4);
        assert_eq!(b["a"], ["b", "c"]);
        assert_eq!(b["d"], ["e", "f"]);
        assert_eq!(b["g"], ["h", "i"]);
        assert_eq!(b["j"], ["k", "l"]);
    }

    #[test]
    fn default_handler() {
        let seen = RefCell::new(Vec::new());
        let mut set = OptionSet::new();
        set.add("<>", |v| seen.borrow_mut().push(owned(v))).unwrap();

        let extras = set.parse(["-a", "b", "--c=D", "E"]).unwrap();
        assert!(extras.is_empty());
        assert_eq!(
            *seen.borrow(),
            ["-a", "b", "--c=D", "E"].map(|s| Some(s.to_string()))
        );
    }

    #[test]
    fn default_handler_sees_state_set_by_other_options() {
        let format = RefCell::new("foo".to_string());
        let formats: RefCell<BTreeMap<String, Vec<String>>> = RefCell::default();

        let mut set = OptionSet::new();
        set.add("f|format=", |v| *format.borrow_mut() = v.unwrap_or_default().to_string())
            .unwrap()
            .add("<>", |v| {
                formats
                    .borrow_mut()
                    .entry(format.borrow().clone())
                    .or_default()
                    .push(v.unwrap_or_default().to_string());
            })
            .unwrap();

        let extras = set
            .parse(["a", "b", "-fbar", "c", "d", "--format=baz", "e", "f"])
            .unwrap();
        assert!(extras.is_empty());

        let formats = formats.borrow();
        assert_eq!(formats.len(), 3);
        assert_eq!(formats["foo"], ["a", "b"]);
        assert_eq!(formats["bar"], ["c", "d"]);
        assert_eq!(formats["baz"], ["e", "f"]);
    }

    #[test]
    fn errors() {
        let a = RefCell::new(None);
        let mut set = OptionSet::new();
        set.add("a=", |v| *a.borrow_mut() = owned(v))
            .unwrap()
            .add("b", |_| {})
            .unwrap()
            .add("c", |_| {})
            .unwrap()
            .add_typed("n=", |_: Option<i32>| {})
            .unwrap()
            .add_typed("f=", |_: Option<Level>| {})
            .unwrap();

        let err = set.parse(["-a"]).unwrap_err();
        assert_eq!(err.to_string(), "missing required value for option '-a'");

        // A pending value swallows whatever comes next, flags included.
        set.parse(["-a", "-a"]).unwrap();
        assert_eq!(a.borrow().as_deref(), Some("-a"));
        set.parse(["-a", "-b"]).unwrap();
        assert_eq!(a.borrow().as_deref(), Some("-b"));

        let err = set.parse(["-n", "value"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "could not convert string `value' to type i32 for option `-n'"
        );
        let err = set.parse(["--f", "invalid"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "could not convert string `invalid' to type Level for option `--f'"
        );
        assert!(std::error::Error::source(&err).is_some());

        let err = set.parse(["-cz", "extra"]).unwrap_err();
        assert_eq!(err.to_string(), "cannot bundle unregistered option '-z'");

        let err = set.add_pair("foo", |_, _| {}).unwrap_err();
        assert!(matches!(err, Error::FlagValueCount { max_value_count: 2, .. }));
        assert!(!set.contains("foo"));
    }

    #[test]
    fn halt_processing() {
        let mut set = OptionSet::new();
        set.add("a", |_| {}).unwrap().add("b", |_| {}).unwrap();
        let extras = set.parse(["-a", "-b", "--", "-a", "-b"]).unwrap();
        assert_eq!(extras, ["-a", "-b"]);
    }

    #[test]
    fn key_value_options() {
        let a = KvLog::default();
        let b = RefCell::new(Vec::new());

        let mut set = OptionSet::new();
        set.add_pair("a=", record(&a))
            .unwrap()
            .add_typed_pair("b=", |k: Option<i32>, v: Option<char>| {
                b.borrow_mut().push((k.unwrap(), v.unwrap()))
            })
            .unwrap()
            .add_pair("c:", |k, v| {
                if k.is_some() {
                    record(&a)(k, v);
                }
            })
            .unwrap()
            .add_pair("d={=>}{-->}", record(&a))
            .unwrap()
            .add_pair("e={}", record(&a))
            .unwrap()
            .add_pair("f=+/", record(&a))
            .unwrap();

        set.parse([
            "-a", "A", "B", "-a", "C", "D", "-a=E=F", "-a:G:H", "-aI=J", "-b", "1", "a", "-b",
            "2", "b",
        ])
        .unwrap();
        assert_eq!(
            take(&a),
            pairs(&[
                ("A", Some("B")),
                ("C", Some("D")),
                ("E", Some("F")),
                ("G", Some("H")),
                ("I", Some("J")),
            ])
        );
        assert_eq!(*b.borrow(), [(1, 'a'), (2, 'b')]);

        set.parse(["-c"]).unwrap();
        assert!(a.borrow().is_empty());
        assert_eq!(set.parse(["-c", "a"]).unwrap(), ["a"]);
        assert!(a.borrow().is_empty());
        set.parse(["-ca"]).unwrap();
        assert_eq!(take(&a), pairs(&[("a", None)]));
        set.parse(["-ca=b"]).unwrap();
        assert_eq!(take(&a), pairs(&[("a", Some("b"))]));

        set.parse(["-dA=>B", "-d", "C-->D", "-d:E", "F", "-d", "G", "H", "-dJ-->K"])
            .unwrap();
        assert_eq!(
            take(&a),
            pairs(&[
                ("A", Some("B")),
                ("C", Some("D")),
                ("E", Some("F")),
                ("G", Some("H")),
                ("J", Some("K")),
            ])
        );

        set.parse(["-eA=B", "-eC=D", "-eE", "F", "-e:G", "H"]).unwrap();
        assert_eq!(
            take(&a),
            pairs(&[("A=B", Some("-eC=D")), ("E", Some("F")), ("G", Some("H"))])
        );

        set.parse(["-f1/2", "-f=3/4", "-f:5+6", "-f7", "8", "-f9=10", "-f11=12"])
            .unwrap();
        assert_eq!(
            take(&a),
            pairs(&[
                ("1", Some("2")),
                ("3", Some("4")),
                ("5", Some("6")),
                ("7", Some("8")),
                ("9=10", Some("-f11=12")),
            ])
        );
    }

    #[test]
    fn mixed_default_handler() {
        let seen = RefCell::new(Vec::new());
        let mut set = OptionSet::new();
        set.add("t|<>=", |v| seen.borrow_mut().push(v.unwrap_or_default().to_string()))
            .unwrap();

        let extras = set.parse(["-tA", "-t:B", "-t=C", "D", "--E=F"]).unwrap();
        assert!(extras.is_empty());
        assert_eq!(*seen.borrow(), ["A", "B", "C", "D", "--E=F"]);
    }

    #[test]
    fn optional_values() {
        let a = RefCell::new(None);
        let n = Cell::new(None);
        let level = Cell::new(None);

        let mut set = OptionSet::new();
        set.add("a:", |v| *a.borrow_mut() = owned(v))
            .unwrap()
            .add_typed("n:", |v: Option<i32>| n.set(v))
            .unwrap()
            .add_typed("f:", |v: Option<Level>| level.set(v))
            .unwrap();

        set.parse(["-a=s"]).unwrap();
        assert_eq!(a.borrow().as_deref(), Some("s"));
        set.parse(["-a"]).unwrap();
        assert_eq!(a.borrow().as_deref(), None);
        set.parse(["-a="]).unwrap();
        assert_eq!(a.borrow().as_deref(), Some(""));

        assert_eq!(set.parse(["-f", "A"]).unwrap(), ["A"]);
        assert_eq!(level.get(), None);
        set.parse(["-f=A"]).unwrap();
        assert_eq!(level.get(), Some(Level::A));
        level.set(None);
        set.parse(["-fA"]).unwrap();
        assert_eq!(level.get(), Some(Level::A));

        set.parse(["-n42"]).unwrap();
        assert_eq!(n.get(), Some(42));
        set.parse(["-n", "42"]).unwrap();
        assert_eq!(n.get(), None);
        set.parse(["-n=42"]).unwrap();
        assert_eq!(n.get(), Some(42));
    }

    #[test]
    fn option_bundling() {
        let flags = RefCell::new(String::new());
        let f = RefCell::new(None);

        let mut set = OptionSet::new();
        for letter in ["a", "b", "c"] {
            set.add(letter, |v| flags.borrow_mut().push_str(v.unwrap_or_default()))
                .unwrap();
        }
        set.add("f=", |v| *f.borrow_mut() = owned(v)).unwrap();

        let extras = set.parse(["-abcf", "foo", "bar"]).unwrap();
        assert_eq!(extras, ["bar"]);
        assert_eq!(*flags.borrow(), "abcf".repeat(3));
        assert_eq!(f.borrow().as_deref(), Some("foo"));
    }

    #[test]
    fn context_reports_name_value_index_and_description() {
        type Seen = (Option<String>, Option<String>, isize, Option<String>);
        let seen: RefCell<Vec<Seen>> = RefCell::default();

        let mut set = OptionSet::new();
        for decl in [("a=", "a desc"), ("b", "b desc"), ("c=", "c desc"), ("d", "d desc")] {
            set.add_with_context(decl, 1, |ctx| {
                seen.borrow_mut().push((
                    ctx.option_name().map(str::to_string),
                    owned(ctx.values().get(0)?),
                    ctx.option_index(),
                    ctx.option().and_then(OptionSpec::description).map(str::to_string),
                ));
                Ok(())
            })
            .unwrap();
        }
        assert_eq!(set.len(), 4);

        set.parse(["/a", "a-val", "--b+", "--c=C", "/d-"]).unwrap();

        let s = |v: &str| Some(v.to_string());
        assert_eq!(
            *seen.borrow(),
            [
                (s("/a"), s("a-val"), 1, s("a desc")),
                (s("--b+"), s("--b+"), 2, s("b desc")),
                (s("--c"), s("C"), 3, s("c desc")),
                (s("/d-"), None, 4, s("d desc")),
            ]
        );
    }

    #[test]
    fn required_values() {
        let a = RefCell::new(None);
        let n = Cell::new(0);

        let mut set = OptionSet::new();
        set.add("a=", |v| *a.borrow_mut() = owned(v))
            .unwrap()
            .add_typed("n=", |v: Option<i32>| n.set(v.unwrap_or_default()))
            .unwrap();

        let extras = set.parse(["a", "-a", "s", "-n=42", "n"]).unwrap();
        assert_eq!(extras, ["a", "n"]);
        assert_eq!(a.borrow().as_deref(), Some("s"));
        assert_eq!(n.get(), 42);

        assert!(set.parse(["-a="]).unwrap().is_empty());
        assert_eq!(a.borrow().as_deref(), Some(""));
    }

    #[test]
    fn inline_attached_and_separate_values_agree() {
        for tokens in [&["-a", "X"][..], &["-a=X"][..], &["-aX"][..]] {
            let a = RefCell::new(None);
            let mut set = OptionSet::new();
            set.add("a=", |v| *a.borrow_mut() = owned(v)).unwrap();
            set.parse(tokens.iter().copied()).unwrap();
            drop(set);
            assert_eq!(a.into_inner().as_deref(), Some("X"), "tokens {tokens:?}");
        }
    }

    #[test]
    fn unread_required_value_does_not_fail() {
        let mut set = OptionSet::new();
        set.add_with_context("a=", 1, |_| Ok(())).unwrap();
        set.parse(["-a"]).unwrap();
    }

    #[test]
    fn converter_is_injected() {
        let seen = Cell::new(None);
        let mut set = OptionSet::new();
        set.add_converted(
            "x=",
            |raw: &str| u8::from_str_radix(raw.trim_start_matches("0x"), 16),
            |v| seen.set(v),
        )
        .unwrap();

        set.parse(["-x", "0xff"]).unwrap();
        assert_eq!(seen.get(), Some(255));
        let err = set.parse(["-x", "zz"]).unwrap_err();
        assert!(matches!(err, Error::ConversionFailed { type_name: "u8", .. }));
    }

    #[test]
    fn registry_management() {
        let mut set = OptionSet::new();
        set.add(("h|?|help", "show help"), |_| {}).unwrap();
        set.add("v|verbose", |_| {}).unwrap();

        let err = set.add("x|help", |_| {}).unwrap_err();
        assert!(matches!(err, Error::DuplicateName { ref name } if name == "help"));
        assert!(!set.contains("x"));

        assert_eq!(set.get("?").map(OptionSpec::primary_name), Some("h"));
        let order: Vec<_> = set.options().map(OptionSpec::prototype).collect();
        assert_eq!(order, ["h|?|help", "v|verbose"]);

        let removed = set.remove("help").unwrap();
        assert_eq!(removed.description(), Some("show help"));
        assert_eq!(set.len(), 1);
        assert!(!set.contains("?"));

        // The freed names behave as unknown tokens again.
        assert_eq!(set.parse(["--help"]).unwrap(), ["--help"]);
    }

    #[test]
    fn descriptions_cover_registered_options() {
        let mut set = OptionSet::new();
        set.add(("v|verbose", "be chatty"), |_| {})
            .unwrap()
            .add(("o|output=", "write to {FILE}"), |_| {})
            .unwrap()
            .add("<>", |_| {})
            .unwrap();

        let help = set.option_descriptions().unwrap();
        let lines: Vec<&str> = help.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].trim_end(), "  -v, --verbose              be chatty");
        assert_eq!(lines[1].trim_end(), "  -o, --output=FILE          write to FILE");
    }
}
