//! Notification configuration: typed model, defaults and partial overrides.
//!
//! The effective configuration is always fully populated — a [`Patch`]
//! supplies only the fields the caller wants to change, and is deep-merged
//! over the default tree before anything reaches rendering logic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::InformerError;

/// Compass corner the overlay is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopRight,
    #[default]
    BottomLeft,
    BottomRight,
}

impl Position {
    /// Hyphenated lowercase form, e.g. `"bottom-left"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }

    /// The two CSS offset properties this corner maps to.
    ///
    /// `"bottom-left"` positions the node via the `bottom` and `left`
    /// offsets; the configured margin is applied to both.
    pub fn axes(&self) -> (&'static str, &'static str) {
        match self {
            Self::TopLeft => ("top", "left"),
            Self::TopRight => ("top", "right"),
            Self::BottomLeft => ("bottom", "left"),
            Self::BottomRight => ("bottom", "right"),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = InformerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-left" => Ok(Self::TopLeft),
            "top-right" => Ok(Self::TopRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-right" => Ok(Self::BottomRight),
            other => Err(InformerError::InvalidPosition(other.to_string())),
        }
    }
}

/// CSS properties applied to the overlay node.
///
/// Field names serialize to the style property names (`fontFamily`,
/// `zIndex`, ...) so the merged tree's `css` keys are exactly what gets
/// written to the node's style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CssOptions {
    pub background: String,
    pub color: String,
    pub font_family: String,
    pub font_size: String,
    pub padding: String,
    pub margin: String,
    /// CSS positioning mode, not the compass corner.
    pub position: String,
    pub z_index: i64,
}

impl Default for CssOptions {
    fn default() -> Self {
        Self {
            background: "#000".into(),
            color: "#FFF".into(),
            font_family: "sans-serif".into(),
            font_size: "18px".into(),
            padding: "15px".into(),
            margin: "10px".into(),
            position: "fixed".into(),
            z_index: 1,
        }
    }
}

/// A lifecycle callback. Must not call back into the owning notifier.
pub type Hook = Box<dyn FnMut() + Send + 'static>;

/// Lifecycle callbacks fired on show, hide and reset.
///
/// Hooks are atomic with respect to the merge: a patch either replaces a
/// hook wholesale or leaves the default (absent, nothing fired).
#[derive(Default)]
pub struct Hooks {
    pub show: Option<Hook>,
    pub hide: Option<Hook>,
    pub reset: Option<Hook>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("show", &self.show.is_some())
            .field("hide", &self.hide.is_some())
            .field("reset", &self.reset.is_some())
            .finish()
    }
}

/// Fully populated notification configuration.
///
/// Never constructed from partial data directly — produced by merging a
/// [`Patch`] over the default tree.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Options {
    pub pos: Position,
    pub css: CssOptions,
    /// Auto-hide delay in milliseconds. Zero disables auto-hide.
    pub delay: u64,
    /// Whether the close control is rendered.
    pub close: bool,
    #[serde(skip)]
    pub on: Hooks,
}

impl Options {
    /// Defaults with the given stacking value baked in.
    pub fn with_layer(z_index: i64) -> Self {
        Self {
            pos: Position::BottomLeft,
            css: CssOptions {
                z_index,
                ..CssOptions::default()
            },
            delay: 0,
            close: true,
            on: Hooks::default(),
        }
    }
}

/// The default configuration as a mergeable value tree.
///
/// Kept structurally identical to [`Options::with_layer`]; the hooks live
/// outside the tree since callables cannot be represented in it.
pub(crate) fn default_tree(z_index: i64) -> Value {
    json!({
        "pos": "bottom-left",
        "css": {
            "background": "#000",
            "color": "#FFF",
            "fontFamily": "sans-serif",
            "fontSize": "18px",
            "padding": "15px",
            "margin": "10px",
            "position": "fixed",
            "zIndex": z_index,
        },
        "delay": 0,
        "close": true,
    })
}

/// Partial configuration override.
///
/// Built with chainable setters, or from a raw value tree for callers that
/// already hold one. Extra `css` keys beyond the typed set are carried
/// through the merge and applied to the node's style verbatim.
#[derive(Debug)]
pub struct Patch {
    overrides: Value,
    on: Hooks,
}

impl Default for Patch {
    fn default() -> Self {
        Self::new()
    }
}

impl Patch {
    /// Empty patch — merging it yields the defaults.
    pub fn new() -> Self {
        Self {
            overrides: Value::Object(Map::new()),
            on: Hooks::default(),
        }
    }

    /// Wrap a raw override tree. A non-object value is treated as empty.
    pub fn from_value(overrides: Value) -> Self {
        let overrides = if overrides.is_object() {
            overrides
        } else {
            Value::Object(Map::new())
        };
        Self {
            overrides,
            on: Hooks::default(),
        }
    }

    /// Anchor corner.
    pub fn pos(mut self, pos: Position) -> Self {
        self.overrides["pos"] = json!(pos.as_str());
        self
    }

    /// Single CSS property override, e.g. `css("background", "#300")`.
    pub fn css(mut self, property: &str, value: impl Into<Value>) -> Self {
        self.overrides["css"][property] = value.into();
        self
    }

    /// Auto-hide delay in milliseconds. Zero disables auto-hide.
    pub fn delay(mut self, ms: u64) -> Self {
        self.overrides["delay"] = json!(ms);
        self
    }

    /// Whether the close control is rendered.
    pub fn close(mut self, close: bool) -> Self {
        self.overrides["close"] = json!(close);
        self
    }

    /// Callback fired after the notification is shown.
    pub fn on_show(mut self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on.show = Some(Box::new(hook));
        self
    }

    /// Callback fired after the notification is hidden.
    pub fn on_hide(mut self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on.hide = Some(Box::new(hook));
        self
    }

    /// Callback fired after styling is cleared.
    pub fn on_reset(mut self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on.reset = Some(Box::new(hook));
        self
    }

    pub(crate) fn into_parts(self) -> (Value, Hooks) {
        (self.overrides, self.on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tree_matches_typed_defaults() {
        let opts: Options =
            serde_json::from_value(default_tree(7)).expect("default tree deserializes");
        assert_eq!(opts.pos, Position::BottomLeft);
        assert_eq!(opts.css, CssOptions { z_index: 7, ..CssOptions::default() });
        assert_eq!(opts.delay, 0);
        assert!(opts.close);
        assert!(opts.on.show.is_none());
    }

    #[test]
    fn test_position_round_trip() {
        for s in ["top-left", "top-right", "bottom-left", "bottom-right"] {
            let pos: Position = s.parse().expect("valid position");
            assert_eq!(pos.as_str(), s);
        }
    }

    #[test]
    fn test_position_rejects_malformed() {
        assert!(matches!(
            "bottom".parse::<Position>(),
            Err(InformerError::InvalidPosition(_))
        ));
        assert!(matches!(
            "bottom-left-ish".parse::<Position>(),
            Err(InformerError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_position_axes() {
        assert_eq!(Position::TopRight.axes(), ("top", "right"));
        assert_eq!(Position::BottomLeft.axes(), ("bottom", "left"));
    }

    #[test]
    fn test_patch_builder_matches_raw_tree() {
        let (built, _) = Patch::new()
            .pos(Position::TopRight)
            .css("margin", "5px")
            .delay(1500)
            .close(false)
            .into_parts();
        let raw = serde_json::json!({
            "pos": "top-right",
            "css": { "margin": "5px" },
            "delay": 1500,
            "close": false,
        });
        assert_eq!(built, raw);
    }

    #[test]
    fn test_default_patch_is_an_empty_tree() {
        let (tree, _) = Patch::default().into_parts();
        assert_eq!(tree, serde_json::json!({}));
        let (tree, _) = Patch::from_value(Value::Null).into_parts();
        assert_eq!(tree, serde_json::json!({}));
    }

    #[test]
    fn test_patch_hooks_are_kept_out_of_the_tree() {
        let (tree, hooks) = Patch::new().on_show(|| {}).into_parts();
        assert_eq!(tree, serde_json::json!({}));
        assert!(hooks.show.is_some());
        assert!(hooks.hide.is_none());
    }
}
