//! Classification of a single raw argument.

/// Leading flags, longest first.
const FLAGS: [&str; 3] = ["--", "-", "/"];

/// The pieces of an option-shaped argument such as `--name=value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionParts<'a> {
    /// `--`, `-` or `/`.
    pub flag: &'a str,
    /// Everything up to the first `:` or `=`; never empty.
    pub name: &'a str,
    /// The `:`/`=` that introduced an inline value.
    pub separator: Option<char>,
    /// Text after the separator, possibly empty.
    pub value: Option<&'a str>,
}

impl<'a> OptionParts<'a> {
    /// Split `argument` into flag, name and inline value.
    ///
    /// Returns `None` when the argument does not start with a flag or has no
    /// name after it. `--` is tried before `-`, falling back to `-` when
    /// nothing usable follows the double dash (so `--=x` is `-` + `-` + `x`).
    pub fn parse(argument: &'a str) -> Option<Self> {
        FLAGS.into_iter().find_map(|flag| {
            let rest = argument.strip_prefix(flag)?;
            let (name, separator, value) = match rest.find([':', '=']) {
                Some(at) => (
                    &rest[..at],
                    Some(char::from(rest.as_bytes()[at])),
                    Some(&rest[at + 1..]),
                ),
                None => (rest, None, None),
            };
            if name.is_empty() {
                return None;
            }
            Some(Self {
                flag,
                name,
                separator,
                value,
            })
        })
    }

    /// Name, separator and value glued back together (no flag).
    pub(crate) fn name_and_value(&self) -> String {
        let mut out = String::from(self.name);
        if let (Some(sep), Some(value)) = (self.separator, self.value) {
            out.push(sep);
            out.push_str(value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::OptionParts;

    fn check(arg: &str, flag: &str, name: &str, sep: Option<char>, value: Option<&str>) {
        let parts = OptionParts::parse(arg)
            .unwrap_or_else(|| panic!("{arg:?} should look like an option"));
        assert_eq!(parts.flag, flag, "flag of {arg:?}");
        assert_eq!(parts.name, name, "name of {arg:?}");
        assert_eq!(parts.separator, sep, "separator of {arg:?}");
        assert_eq!(parts.value, value, "value of {arg:?}");
    }

    #[test]
    fn rejects_plain_words() {
        assert_eq!(OptionParts::parse("A"), None);
        assert_eq!(OptionParts::parse("A=B"), None);
        assert_eq!(OptionParts::parse("-"), None);
        assert_eq!(OptionParts::parse("/"), None);
        assert_eq!(OptionParts::parse("-=x"), None);
        assert_eq!(OptionParts::parse(""), None);
    }

    #[test]
    fn splits_flag_name_and_value() {
        for flag in ["-", "--", "/"] {
            for sep in ['=', ':'] {
                check(&format!("{flag}A{sep}B"), flag, "A", Some(sep), Some("B"));
                check(&format!("{flag}A{sep}B=C"), flag, "A", Some(sep), Some("B=C"));
                check(&format!("{flag}A{sep}B:C"), flag, "A", Some(sep), Some("B:C"));
            }
        }
        check("-AB=C", "-", "AB", Some('='), Some("C"));
        check("-AB:C", "-", "AB", Some(':'), Some("C"));
    }

    #[test]
    fn bare_and_empty_values() {
        check("--help", "--", "help", None, None);
        check("-a=", "-", "a", Some('='), Some(""));
        check("/h", "/", "h", None, None);
    }

    #[test]
    fn double_dash_falls_back_to_single() {
        check("--", "-", "-", None, None);
        check("--=x", "-", "-", Some('='), Some("x"));
        check("---a", "--", "-a", None, None);
    }

    #[test]
    fn rebuilds_name_and_value() {
        let parts = OptionParts::parse("-Dname=value").unwrap();
        assert_eq!(parts.name_and_value(), "Dname=value");
        let parts = OptionParts::parse("-abc").unwrap();
        assert_eq!(parts.name_and_value(), "abc");
    }
}
