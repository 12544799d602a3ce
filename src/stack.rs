use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use crate::error::{Error, Result};
use crate::log::debug;
use crate::style::{PropMap, PropValue, Style};

/// Name of the style that is active whenever the stack is empty.
pub const DEFAULT_STYLE: &str = "default";

/// Registry of named styles plus a save/restore stack of active names.
///
/// A `StyleSet` is an owned context object handed to the calls that need the
/// active style; it is not shared global state. Callers that want cross-thread
/// plotting must serialize access themselves.
#[derive(Debug)]
pub struct StyleSet {
    styles: BTreeMap<String, Style>,
    stack: Vec<String>,
}

impl StyleSet {
    /// Creates a set with the built-in default style registered.
    pub fn new() -> Self {
        let mut set = Self::empty();
        set.register(DEFAULT_STYLE, crate::defaults::default_style());
        set
    }

    /// Creates a set whose default style is empty.
    pub fn empty() -> Self {
        let mut styles = BTreeMap::new();
        styles.insert(DEFAULT_STYLE.to_string(), Style::new());
        Self {
            styles,
            stack: Vec::new(),
        }
    }

    /// Stores `style` under `name`, replacing any previous registration, and
    /// returns a mutable handle to the stored style.
    pub fn register(&mut self, name: impl Into<String>, style: Style) -> &mut Style {
        let name = name.into();
        debug!(style = name.as_str(), "registering style");
        let slot = self.styles.entry(name).or_default();
        *slot = style;
        slot
    }

    pub fn get(&self, name: &str) -> Result<&Style> {
        self.styles
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Style> {
        self.styles
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Deep-copies the style registered at `src` and registers the copy under
    /// `dst`.
    pub fn clone_style(&mut self, src: &str, dst: impl Into<String>) -> Result<&mut Style> {
        let copy = self.get(src)?.clone();
        Ok(self.register(dst, copy))
    }

    /// Appends `name` to the stack of active styles.
    pub fn push(&mut self, name: &str) -> Result<()> {
        if !self.styles.contains_key(name) {
            return Err(Error::NotFound(name.to_string()));
        }
        debug!(style = name, "pushing style");
        self.stack.push(name.to_string());
        Ok(())
    }

    /// Removes and returns the top of the stack.
    pub fn pop(&mut self) -> Result<String> {
        let name = self.stack.pop().ok_or(Error::EmptyStack)?;
        debug!(style = name.as_str(), "popped style");
        Ok(name)
    }

    /// Name of the active style: the top of the stack, or the default style
    /// when the stack is empty.
    pub fn current_name(&self) -> &str {
        self.stack
            .last()
            .map(String::as_str)
            .unwrap_or(DEFAULT_STYLE)
    }

    /// The active style. Never fails: pushed names are validated and styles
    /// are never removed, and the default style is registered on
    /// construction.
    pub fn current(&self) -> &Style {
        self.styles
            .get(self.current_name())
            .expect("active style name is always registered")
    }

    /// Pushes `name` and returns a guard that pops it again when dropped, so
    /// the previous style is restored on every exit path.
    pub fn use_style(&mut self, name: &str) -> Result<StyleGuard<'_>> {
        self.push(name)?;
        Ok(StyleGuard { set: self })
    }

    /// Runs `body` with `name` active, restoring the previous style
    /// afterwards whether `body` returns `Ok` or `Err`.
    pub fn with_style<T>(
        &mut self,
        name: &str,
        body: impl FnOnce(&mut StyleSet) -> Result<T>,
    ) -> Result<T> {
        let mut guard = self.use_style(name)?;
        body(&mut guard)
    }

    // Forwarding lookups into the active style; call sites can treat the set
    // as the style itself.

    pub fn component(&self, key: &str) -> Option<&PropMap> {
        self.current().component(key)
    }

    pub fn number(&self, component: &str, name: &str) -> Option<f64> {
        self.current().number(component, name)
    }

    pub fn text(&self, component: &str, name: &str) -> Option<&str> {
        self.current().text(component, name)
    }

    /// Scalar lookup in the active style's `layout` component, the home of
    /// flat values such as `canvas_width` or `legend_dy`.
    pub fn layout_number(&self, name: &str) -> Option<f64> {
        self.number("layout", name)
    }

    /// Named color lookup in the active style's `colors` component.
    pub fn color(&self, name: &str) -> Option<&PropValue> {
        self.component("colors")?.get(name)
    }

    /// Resolves a color spec: a text value naming an entry of the `colors`
    /// component is replaced by that entry, anything else passes through.
    pub fn resolve_color(&self, value: &PropValue) -> PropValue {
        if let Some(name) = value.as_str()
            && let Some(color) = self.color(name)
        {
            return color.clone();
        }
        value.clone()
    }
}

impl Default for StyleSet {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII token returned by [`StyleSet::use_style`]; dropping it pops the
/// style that was pushed, including during unwinding.
#[derive(Debug)]
pub struct StyleGuard<'a> {
    set: &'a mut StyleSet,
}

impl Deref for StyleGuard<'_> {
    type Target = StyleSet;

    fn deref(&self) -> &StyleSet {
        self.set
    }
}

impl DerefMut for StyleGuard<'_> {
    fn deref_mut(&mut self) -> &mut StyleSet {
        self.set
    }
}

impl Drop for StyleGuard<'_> {
    fn drop(&mut self) {
        // The guard's own push guarantees the stack is non-empty here.
        let _ = self.set.pop();
    }
}
