//! Property application through per-kind setter tables.
//!
//! A backend registers one [`PropertyTable`] per object kind it exposes,
//! mapping property names to typed setter closures. Tables are built once at
//! configuration-load time; application then merges style layers with rear
//! precedence and dispatches by name, silently skipping names the target kind
//! does not know.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::style::{merge_props, PropMap, PropValue};

type BoxedSetter<T> = Box<dyn Fn(&mut T, &PropValue) -> Result<()> + Send + Sync>;

pub struct PropertyTable<T> {
    setters: BTreeMap<&'static str, BoxedSetter<T>>,
}

impl<T> PropertyTable<T> {
    pub fn new() -> Self {
        Self {
            setters: BTreeMap::new(),
        }
    }

    /// Registers a setter for `name`, replacing any previous one.
    pub fn with<F>(mut self, name: &'static str, setter: F) -> Self
    where
        F: Fn(&mut T, &PropValue) -> Result<()> + Send + Sync + 'static,
    {
        self.setters.insert(name, Box::new(setter));
        self
    }

    pub fn knows(&self, name: &str) -> bool {
        self.setters.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.setters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.setters.is_empty()
    }

    /// Applies every property of `props` that this kind knows a setter for.
    pub fn apply(&self, target: &mut T, props: &PropMap) -> Result<()> {
        for (name, value) in props.iter() {
            if let Some(setter) = self.setters.get(name.as_str()) {
                setter(target, value)?;
            }
        }
        Ok(())
    }

    /// Merges `layers` with rear precedence, then applies the result.
    pub fn apply_layers(&self, target: &mut T, layers: &[&PropMap]) -> Result<()> {
        self.apply(target, &merge_props(layers))
    }
}

impl<T> Default for PropertyTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Coercion helpers for setter bodies; a mismatch is an InvalidArgument naming
// the offending value.

pub fn number(value: &PropValue) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| Error::invalid(format!("expected a number, got {value:?}")))
}

pub fn integer(value: &PropValue) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| Error::invalid(format!("expected an integer, got {value:?}")))
}

pub fn flag(value: &PropValue) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| Error::invalid(format!("expected a flag, got {value:?}")))
}

pub fn text(value: &PropValue) -> Result<&str> {
    value
        .as_str()
        .ok_or_else(|| Error::invalid(format!("expected text, got {value:?}")))
}

pub fn number_pair(value: &PropValue) -> Result<(f64, f64)> {
    value
        .as_f64_pair()
        .ok_or_else(|| Error::invalid(format!("expected a number pair, got {value:?}")))
}

pub fn flag_pair(value: &PropValue) -> Result<(bool, bool)> {
    value
        .as_bool_pair()
        .ok_or_else(|| Error::invalid(format!("expected a flag pair, got {value:?}")))
}

/// Which color-bearing properties a color assignment touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorFlags {
    pub line: bool,
    pub marker: bool,
    pub fill: bool,
    pub text: bool,
}

impl FromStr for ColorFlags {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let mut flags = Self::default();
        for ch in input.chars() {
            match ch {
                'l' => flags.line = true,
                'm' => flags.marker = true,
                'f' => flags.fill = true,
                't' => flags.text = true,
                _ => return Err(Error::invalid(format!("unknown color flag '{ch}'"))),
            }
        }
        Ok(flags)
    }
}

/// Expands a color value into the property assignments selected by `flags`.
/// The `t` flag covers both text and axis-label color.
pub fn color_props(color: &PropValue, flags: ColorFlags) -> PropMap {
    let mut props = PropMap::new();
    if flags.line {
        props.insert("line_color", color.clone());
    }
    if flags.marker {
        props.insert("marker_color", color.clone());
    }
    if flags.fill {
        props.insert("fill_color", color.clone());
    }
    if flags.text {
        props.insert("text_color", color.clone());
        props.insert("label_color", color.clone());
    }
    props
}

/// Applies `color` to the targets selected by the flag string, skipping
/// properties the kind does not carry.
pub fn set_color<T>(
    table: &PropertyTable<T>,
    target: &mut T,
    color: &PropValue,
    flags: &str,
) -> Result<()> {
    let flags: ColorFlags = flags.parse()?;
    table.apply(target, &color_props(color, flags))
}
