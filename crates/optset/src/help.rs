//! Option description rendering.
//!
//! Descriptions may name value placeholders inline: `{0:key}` and
//! `{1:value}` name the first and second value slots, and a single-value
//! option may also use `{name}`. The braces are stripped from the rendered
//! text. `{{` and `}}` produce literal braces.

use crate::error::{Error, Result};
use crate::prototype::{DEFAULT_HANDLER, OptionSpec, ValueArity};

/// Width of the prototype column.
const OPTION_WIDTH: usize = 29;
/// Width available to description text.
const DESCRIPTION_WIDTH: usize = 80 - OPTION_WIDTH - 2;

/// Render one block per option, in the given order.
///
/// Options whose only name is `<>` are skipped.
pub fn render<'s>(options: impl IntoIterator<Item = &'s OptionSpec>) -> Result<String> {
    let mut out = String::new();

    for spec in options {
        let Some(prototype) = format_prototype(spec) else {
            continue;
        };

        let written = prototype.chars().count();
        out.push_str(&prototype);
        if written < OPTION_WIDTH {
            pad(&mut out, OPTION_WIDTH - written);
        } else {
            out.push('\n');
            pad(&mut out, OPTION_WIDTH);
        }

        let description = strip_markup(spec.description().unwrap_or_default())?;
        let mut lines = wrap(&description).into_iter();
        out.push_str(&lines.next().unwrap_or_default());
        out.push('\n');
        for line in lines {
            pad(&mut out, OPTION_WIDTH + 2);
            out.push_str(&line);
            out.push('\n');
        }
    }

    Ok(out)
}

fn pad(out: &mut String, n: usize) {
    out.extend(std::iter::repeat_n(' ', n));
}

/// `  -p, --indicator-style=VALUE`, or `None` for a bare default handler.
fn format_prototype(spec: &OptionSpec) -> Option<String> {
    let mut names = spec.names().iter().filter(|n| *n != DEFAULT_HANDLER);
    let first = names.next()?;

    let dash = |name: &str| if name.chars().count() == 1 { "-" } else { "--" };

    let mut out = String::new();
    if dash(first) == "-" {
        out.push_str("  -");
    } else {
        out.push_str("      --");
    }
    out.push_str(first);

    for name in names {
        out.push_str(", ");
        out.push_str(dash(name));
        out.push_str(name);
    }

    if !spec.value_arity().takes_value() {
        return Some(out);
    }

    let optional = spec.value_arity() == ValueArity::Optional;
    let max = spec.max_value_count();
    if optional {
        out.push('[');
    }
    out.push('=');
    out.push_str(&argument_name(0, max, spec.description()));

    let sep = spec
        .value_separators()
        .and_then(|s| s.first())
        .map_or(" ", String::as_str);
    for index in 1..max {
        out.push_str(sep);
        out.push_str(&argument_name(index, max, spec.description()));
    }
    if optional {
        out.push(']');
    }

    Some(out)
}

/// Placeholder for value slot `index`: `{index:name}` from the description,
/// else `VALUE` / `VALUEn`.
fn argument_name(index: usize, max: usize, description: Option<&str>) -> String {
    let fallback = || {
        if max == 1 {
            "VALUE".to_string()
        } else {
            format!("VALUE{}", index + 1)
        }
    };

    let Some(description) = description else {
        return fallback();
    };

    let openers = if max == 1 {
        vec!["{0:".to_string(), "{".to_string()]
    } else {
        vec![format!("{{{index}:")]
    };

    for opener in &openers {
        let Some(start) = description.find(opener.as_str()) else {
            continue;
        };
        let Some(len) = description[start..].find('}') else {
            continue;
        };
        return description[start + opener.len()..start + len].to_string();
    }

    fallback()
}

/// Remove placeholder markup, keeping placeholder names.
fn strip_markup(description: &str) -> Result<String> {
    let chars: Vec<char> = description.chars().collect();
    let mut out = String::with_capacity(description.len());
    let mut start: Option<usize> = None;

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '{' => match start {
                Some(s) if s == i => {
                    out.push('{');
                    start = None;
                }
                Some(_) => {}
                None => start = Some(i + 1),
            },
            '}' => match start {
                Some(s) => {
                    out.extend(&chars[s..i]);
                    start = None;
                }
                None if chars.get(i + 1) == Some(&'}') => {
                    out.push('}');
                    i += 1;
                }
                None => {
                    return Err(Error::InvalidDescription {
                        description: description.to_string(),
                    });
                }
            },
            ':' if start.is_some() => start = Some(i + 1),
            c => {
                if start.is_none() {
                    out.push(c);
                }
            }
        }
        i += 1;
    }

    Ok(out)
}

/// Break `description` into lines of at most [`DESCRIPTION_WIDTH`] characters.
///
/// Breaks prefer whitespace and `-,.;`, honor embedded newlines, and
/// hyphenate words that have to be split.
fn wrap(description: &str) -> Vec<String> {
    let chars: Vec<char> = description.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut start = 0;
    loop {
        let mut end = line_end(&chars, start, DESCRIPTION_WIDTH);
        let mut hyphenate = false;
        if let Some(&c) = chars.get(end) {
            if c == '-' || (c.is_whitespace() && c != '\n') {
                end += 1;
            } else if c != '\n' && end > start + 1 {
                hyphenate = true;
                end -= 1;
            }
        }
        if end <= start {
            // A break character at the very start of the line; cut the word instead.
            end = (start + DESCRIPTION_WIDTH - 1).min(chars.len());
            hyphenate = end < chars.len();
        }

        let mut line: String = chars[start..end].iter().collect();
        if hyphenate {
            line.push('-');
        }
        lines.push(line);

        start = end;
        if chars.get(start) == Some(&'\n') {
            start += 1;
        }
        if end >= chars.len() {
            break;
        }
    }

    lines
}

fn line_end(chars: &[char], start: usize, length: usize) -> usize {
    let end = (start + length).min(chars.len());
    let mut sep = None;
    for (i, c) in chars.iter().enumerate().take(end).skip(start) {
        match c {
            ' ' | '\t' | '\u{b}' | '-' | ',' | '.' | ';' => sep = Some(i),
            '\n' => return i,
            _ => {}
        }
    }
    match sep {
        Some(sep) if end != chars.len() => sep,
        _ => end,
    }
}
