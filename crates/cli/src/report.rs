use anyhow::{Context, Result};
use optset::{OptionContext, OptionSet, OptionSpec, ValueArity};
use serde::Serialize;
use std::cell::RefCell;
use std::path::Path;

use crate::manifest::Manifest;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub manifest: String,
    pub options: Vec<OptionReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionReport {
    pub prototype: String,
    pub names: Vec<String>,
    pub value_arity: &'static str,
    pub max_values: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separators: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    pub manifest: String,
    pub invocations: Vec<Invocation>,
    pub extras: Vec<String>,
}

/// One completed option occurrence.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    pub option: String,
    pub name: Option<String>,
    pub index: isize,
    pub values: Vec<Option<String>>,
}

fn arity_label(arity: ValueArity) -> &'static str {
    match arity {
        ValueArity::None => "none",
        ValueArity::Optional => "optional",
        ValueArity::Required => "required",
    }
}

impl From<&OptionSpec> for OptionReport {
    fn from(spec: &OptionSpec) -> Self {
        Self {
            prototype: spec.prototype().to_string(),
            names: spec.names().to_vec(),
            value_arity: arity_label(spec.value_arity()),
            max_values: spec.max_value_count(),
            separators: spec.value_separators().map(<[String]>::to_vec),
        }
    }
}

impl From<&OptionContext> for Invocation {
    fn from(ctx: &OptionContext) -> Self {
        Self {
            option: ctx
                .option()
                .map(|spec| spec.primary_name().to_string())
                .unwrap_or_default(),
            name: ctx.option_name().map(str::to_string),
            index: ctx.option_index(),
            values: ctx.values().to_vec(),
        }
    }
}

pub fn check_options(manifest_path: &Path, manifest: &Manifest) -> Result<CheckReport> {
    let specs = manifest.compile()?;

    // Registering catches names shared between entries.
    let mut set = OptionSet::new();
    for spec in &specs {
        set.insert(spec.clone(), optset::Action::context(|_| Ok(())))
            .with_context(|| format!("cannot register `{}`", spec.prototype()))?;
    }

    Ok(CheckReport {
        manifest: manifest_path.display().to_string(),
        options: specs.iter().map(OptionReport::from).collect(),
    })
}

pub fn describe_options(manifest: &Manifest) -> Result<String> {
    let specs = manifest.compile()?;
    optset::help::render(&specs).context("failed to render option descriptions")
}

/// Parse `tokens` against the manifest, recording every completed option.
pub fn trace_parse(
    manifest_path: &Path,
    manifest: &Manifest,
    tokens: &[String],
) -> Result<ParseReport> {
    let invocations = RefCell::new(Vec::new());

    let mut set = OptionSet::new();
    for spec in manifest.compile()? {
        let prototype = spec.prototype().to_string();
        let record = optset::Action::context(|ctx| {
            invocations.borrow_mut().push(Invocation::from(ctx));
            Ok(())
        });
        set.insert(spec, record)
            .with_context(|| format!("cannot register `{prototype}`"))?;
    }

    let extras = set.parse(tokens.iter().cloned())?;
    drop(set);

    Ok(ParseReport {
        manifest: manifest_path.display().to_string(),
        invocations: invocations.into_inner(),
        extras,
    })
}
