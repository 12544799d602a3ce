use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single property value: a scalar or a fixed-size tuple of scalars.
///
/// Tuples map onto backend setters that take more than one argument, e.g. a
/// pad rectangle `(x1, y1, x2, y2)` or a `(tick_x, tick_y)` flag pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Tuple(Vec<PropValue>),
}

impl PropValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropValue::Float(v) => Some(*v),
            PropValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[PropValue]> {
        match self {
            PropValue::Tuple(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_f64_pair(&self) -> Option<(f64, f64)> {
        match self.as_tuple()? {
            [a, b] => Some((a.as_f64()?, b.as_f64()?)),
            _ => None,
        }
    }

    pub fn as_bool_pair(&self) -> Option<(bool, bool)> {
        match self.as_tuple()? {
            [a, b] => Some((a.as_bool()?, b.as_bool()?)),
            _ => None,
        }
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}

impl From<f32> for PropValue {
    fn from(value: f32) -> Self {
        PropValue::Float(value as f64)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Int(value as i64)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

impl From<(f64, f64)> for PropValue {
    fn from((a, b): (f64, f64)) -> Self {
        PropValue::Tuple(vec![a.into(), b.into()])
    }
}

impl From<(bool, bool)> for PropValue {
    fn from((a, b): (bool, bool)) -> Self {
        PropValue::Tuple(vec![a.into(), b.into()])
    }
}

impl From<(f64, f64, f64, f64)> for PropValue {
    fn from((a, b, c, d): (f64, f64, f64, f64)) -> Self {
        PropValue::Tuple(vec![a.into(), b.into(), c.into(), d.into()])
    }
}

/// A flat property name to value mapping for one component kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropMap(BTreeMap<String, PropValue>);

impl PropMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder form of [`PropMap::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.0.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(PropValue::as_f64)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(PropValue::as_i64)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(PropValue::as_bool)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropValue::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Copies every entry of `other` into `self`, overwriting collisions.
    pub fn update(&mut self, other: &PropMap) {
        for (name, value) in other.iter() {
            self.0.insert(name.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Merges property maps in order; values of rear maps win on collisions.
pub fn merge_props(layers: &[&PropMap]) -> PropMap {
    let mut merged = PropMap::new();
    for layer in layers {
        merged.update(layer);
    }
    merged
}

/// A named configuration bundle: component key to property map.
///
/// Styles are plain owned data, so `Clone` is a deep copy and no two styles
/// ever share nested mutable state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style(BTreeMap<String, PropMap>);

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn component(&self, key: &str) -> Option<&PropMap> {
        self.0.get(key)
    }

    pub fn component_mut(&mut self, key: &str) -> &mut PropMap {
        self.0.entry(key.to_string()).or_default()
    }

    pub fn insert_component(&mut self, key: impl Into<String>, props: PropMap) {
        self.0.insert(key.into(), props);
    }

    /// Builder form of [`Style::insert_component`].
    pub fn with_component(mut self, key: impl Into<String>, props: PropMap) -> Self {
        self.insert_component(key, props);
        self
    }

    pub fn number(&self, component: &str, name: &str) -> Option<f64> {
        self.component(component)?.number(name)
    }

    pub fn text(&self, component: &str, name: &str) -> Option<&str> {
        self.component(component)?.text(name)
    }

    /// Merges `other` into `self` component by component; `other` wins on
    /// property collisions.
    pub fn update(&mut self, other: &Style) {
        for (key, props) in other.iter() {
            self.component_mut(key).update(props);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropMap)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
