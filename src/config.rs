//! Style-sheet loading.
//!
//! A sheet is a JSON (or JSON5) document mapping style names to component
//! blocks:
//!
//! ```json5
//! {
//!   styles: {
//!     publication: {
//!       extends: "default",
//!       canvas: { left_margin: 0.02 },
//!       layout: { text_size: 24 },
//!     },
//!   },
//! }
//! ```
//!
//! The reserved `extends` key starts a style from a deep copy of an already
//! registered one before the sheet's own components are merged in.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;
use crate::log::debug;
use crate::stack::StyleSet;
use crate::style::{PropValue, Style};

#[derive(Debug, Deserialize)]
struct SheetFile {
    styles: BTreeMap<String, Value>,
}

/// Reads a sheet file and registers every style it defines, returning the
/// registered names.
pub fn load_sheet(set: &mut StyleSet, path: &Path) -> anyhow::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    register_sheet(set, &contents)
}

/// Parses sheet text (strict JSON first, JSON5 as fallback) and registers
/// every style it defines.
pub fn register_sheet(set: &mut StyleSet, input: &str) -> anyhow::Result<Vec<String>> {
    let sheet: SheetFile = match serde_json::from_str(input) {
        Ok(sheet) => sheet,
        Err(_) => json5::from_str(input)?,
    };

    let mut names = Vec::new();
    for (name, value) in sheet.styles {
        let style = style_from_value(set, &name, value)?;
        debug!(style = name.as_str(), "registered sheet style");
        set.register(name.clone(), style);
        names.push(name);
    }
    Ok(names)
}

fn style_from_value(set: &StyleSet, name: &str, value: Value) -> anyhow::Result<Style> {
    let components = match value {
        Value::Object(components) => components,
        other => {
            return Err(Error::DuplicateOrInvalid(format!(
                "style '{name}' must be an object, got {}",
                kind_of(&other)
            ))
            .into());
        }
    };

    let mut style = Style::new();
    if let Some(base) = components.get("extends") {
        let Value::String(base) = base else {
            return Err(Error::DuplicateOrInvalid(format!(
                "style '{name}': extends must name a style"
            ))
            .into());
        };
        style = set.get(base)?.clone();
    }

    for (key, block) in components {
        if key == "extends" {
            continue;
        }
        let entries = match block {
            Value::Object(entries) => entries,
            other => {
                return Err(Error::DuplicateOrInvalid(format!(
                    "style '{name}': component '{key}' must be an object, got {}",
                    kind_of(&other)
                ))
                .into());
            }
        };
        let target = style.component_mut(&key);
        for (prop, raw) in entries {
            let value = prop_from_value(name, &key, &prop, raw)?;
            target.insert(prop, value);
        }
    }
    Ok(style)
}

fn prop_from_value(
    style: &str,
    component: &str,
    prop: &str,
    value: Value,
) -> anyhow::Result<PropValue> {
    let parsed = match value {
        Value::Bool(flag) => PropValue::Bool(flag),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                PropValue::Int(int)
            } else if let Some(float) = number.as_f64() {
                PropValue::Float(float)
            } else {
                return Err(invalid_prop(style, component, prop, "an unrepresentable number"));
            }
        }
        Value::String(text) => PropValue::Text(text),
        Value::Array(items) => {
            let mut tuple = Vec::with_capacity(items.len());
            for item in items {
                match prop_from_value(style, component, prop, item)? {
                    PropValue::Tuple(_) => {
                        return Err(invalid_prop(style, component, prop, "a nested array"));
                    }
                    scalar => tuple.push(scalar),
                }
            }
            PropValue::Tuple(tuple)
        }
        other => return Err(invalid_prop(style, component, prop, kind_of(&other))),
    };
    Ok(parsed)
}

fn invalid_prop(style: &str, component: &str, prop: &str, kind: &str) -> anyhow::Error {
    Error::DuplicateOrInvalid(format!(
        "style '{style}': property '{component}.{prop}' must be a scalar or array of scalars, got {kind}"
    ))
    .into()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
