//! The notifier instance: one overlay node, its configuration and the
//! deferred-hide timer.
//!
//! State lives behind a shared handle so the auto-hide task and the caller
//! observe the same instance. At most one deferred hide is pending at a
//! time — arming a new one always aborts the previous handle first.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::options::{Hooks, Options, Patch, default_tree};
use crate::surface::{NodeId, Surface, next_highest_layer};
use crate::{InformerError, Result, merge};

/// A transient-notification overlay.
///
/// Cloning yields another handle to the same instance. The overlay node is
/// created lazily on the first [`configure`](Self::configure) or
/// [`show`](Self::show) and mutated in place for the lifetime of the
/// instance.
///
/// Lifecycle hooks run while the instance is locked and must not call back
/// into it. When a non-zero delay is configured, [`show`](Self::show) must
/// be called within a Tokio runtime.
pub struct Informer<S: Surface> {
    inner: Arc<Mutex<Inner<S>>>,
}

impl<S: Surface> Clone for Informer<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<S: Surface> {
    id: String,
    /// Frozen at construction, probe result baked in. Every `configure`
    /// re-merges from this tree, never from the previous effective one.
    defaults: Value,
    tree: Value,
    options: Options,
    hooks: Hooks,
    node: Option<NodeId>,
    visible: bool,
    surface: S,
    hide_timer: Option<JoinHandle<()>>,
}

impl<S: Surface> Informer<S> {
    /// Create a notifier with defaults and a time-derived identifier.
    ///
    /// Probes the surface for the next-highest stacking value and bakes it
    /// into the default configuration. Does not touch the surface's nodes.
    pub fn new(surface: S) -> Self {
        let layer = next_highest_layer(&surface);
        let id = format!("informer-{}", Utc::now().timestamp_millis());
        tracing::debug!(id = %id, layer, "notifier created");
        Self {
            inner: Arc::new(Mutex::new(Inner {
                id,
                defaults: default_tree(layer),
                tree: default_tree(layer),
                options: Options::with_layer(layer),
                hooks: Hooks::default(),
                node: None,
                visible: false,
                surface,
                hide_timer: None,
            })),
        }
    }

    /// Use an explicit element identifier instead of the time-derived one.
    ///
    /// Only meaningful before the node is first created.
    pub fn with_id(self, id: impl Into<String>) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.id = id.into();
        }
        self
    }

    /// Merge an initial configuration over the defaults without rendering.
    ///
    /// An invalid patch is logged and ignored, leaving the defaults in
    /// place — construction never fails.
    pub fn with_options(self, patch: Patch) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            let (overrides, hooks) = patch.into_parts();
            let tree = merge::merged(&inner.defaults, &[&overrides]);
            match serde_json::from_value::<Options>(tree.clone()) {
                Ok(options) => {
                    inner.options = options;
                    inner.tree = tree;
                    inner.hooks = hooks;
                }
                Err(e) => tracing::warn!("ignoring invalid initial options: {e}"),
            }
        }
        self
    }

    /// Recompute the effective configuration and apply it to the node.
    ///
    /// The patch is merged over the original defaults, so reconfiguration
    /// is non-cumulative: `configure(None)` restores the defaults no matter
    /// what previous calls set. Creates the node on first use; rewrites its
    /// inner markup; applies every CSS property plus the two positioning
    /// offsets. Errors with [`InformerError::SurfaceNotReady`] when the
    /// root container does not exist yet.
    pub fn configure(&self, patch: Option<Patch>) -> Result<&Self> {
        let Ok(mut inner) = self.inner.lock() else {
            return Ok(self);
        };
        inner.apply(patch)?;
        Ok(self)
    }

    /// Reset, reconfigure, then make the notification visible with the
    /// given raw markup content (not escaped — caller's responsibility).
    ///
    /// Fires the `show` hook, and when the effective delay is non-zero
    /// replaces any pending auto-hide timer with a fresh one.
    pub fn show(&self, content: &str, patch: Option<Patch>) -> Result<&Self> {
        self.reset();
        let Ok(mut inner) = self.inner.lock() else {
            return Ok(self);
        };
        inner.apply(patch)?;
        let Some(node) = inner.node else {
            return Ok(self);
        };

        inner.surface.set_visible(node, true);
        inner.visible = true;
        inner.surface.set_content(node, content);
        if let Some(hook) = inner.hooks.show.as_mut() {
            hook();
        }

        let delay = inner.options.delay;
        if delay > 0 {
            if let Some(handle) = inner.hide_timer.take() {
                handle.abort();
            }
            let informer = self.clone();
            inner.hide_timer = Some(tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                informer.hide();
            }));
            tracing::debug!(id = %inner.id, delay_ms = delay, "deferred hide armed");
        }
        tracing::info!(id = %inner.id, "notification shown");
        Ok(self)
    }

    /// Make the notification invisible and fire the `hide` hook.
    ///
    /// Idempotent: a no-op when the node does not exist or is already
    /// hidden. Does not cancel a pending auto-hide timer — the timer firing
    /// after an explicit hide is equally a no-op.
    pub fn hide(&self) -> &Self {
        let Ok(mut inner) = self.inner.lock() else {
            return self;
        };
        let Some(node) = inner.node else {
            return self;
        };
        if !inner.visible {
            return self;
        }
        inner.surface.set_visible(node, false);
        inner.visible = false;
        if let Some(hook) = inner.hooks.hide.as_mut() {
            hook();
        }
        tracing::debug!(id = %inner.id, "notification hidden");
        self
    }

    /// Clear all previously applied positioning and CSS styling, restoring
    /// the node to its unstyled state, and fire the `reset` hook.
    ///
    /// Visibility is unaffected. A no-op when the node does not exist.
    /// Runs as the first step of [`show`](Self::show) so stale styling
    /// never leaks into the next notification.
    pub fn reset(&self) -> &Self {
        let Ok(mut inner) = self.inner.lock() else {
            return self;
        };
        inner.clear_styles();
        self
    }

    /// The close control's action, promoted to a named operation.
    ///
    /// Equivalent to [`hide`](Self::hide); the rendered close anchor
    /// dispatches here.
    pub fn close(&self) -> &Self {
        self.hide()
    }

    /// Element identifier the overlay node is (or will be) created with.
    pub fn id(&self) -> String {
        self.inner
            .lock()
            .map(|inner| inner.id.clone())
            .unwrap_or_default()
    }

    /// Inspect the surface with a closure — the test seam.
    pub fn with_surface<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&S) -> R,
    {
        self.inner.lock().ok().map(|inner| f(&inner.surface))
    }
}

impl<S: Surface> Inner<S> {
    /// Re-merge from the defaults and render the result onto the node.
    fn apply(&mut self, patch: Option<Patch>) -> Result<()> {
        let (overrides, hooks) = patch.unwrap_or_default().into_parts();
        let tree = merge::merged(&self.defaults, &[&overrides]);
        let options: Options = serde_json::from_value(tree.clone())
            .map_err(|e| InformerError::Options(e.to_string()))?;
        self.options = options;
        self.tree = tree;
        self.hooks = hooks;
        self.render()
    }

    fn render(&mut self) -> Result<()> {
        if !self.surface.is_ready() {
            return Err(InformerError::SurfaceNotReady);
        }

        if let Some(handle) = self.hide_timer.take() {
            handle.abort();
        }

        let node = match self.node {
            Some(node) => node,
            None => {
                let node = self.surface.create_node(&self.id);
                self.node = Some(node);
                // A freshly attached node starts out visible.
                self.visible = true;
                node
            }
        };

        self.surface
            .set_markup(node, &template(self.options.close, &self.options.css.color));

        if let Some(css) = self.tree.get("css").and_then(Value::as_object) {
            for (property, value) in css {
                self.surface.set_style(node, property, &css_text(value));
            }
        }
        // The compass corner always names two offset properties; both get
        // the configured margin.
        let (vertical, horizontal) = self.options.pos.axes();
        let margin = self.options.css.margin.clone();
        self.surface.set_style(node, vertical, &margin);
        self.surface.set_style(node, horizontal, &margin);

        tracing::debug!(id = %self.id, pos = %self.options.pos, "configuration applied");
        Ok(())
    }

    fn clear_styles(&mut self) {
        let Some(node) = self.node else {
            return;
        };
        for offset in ["top", "left", "bottom", "right"] {
            self.surface.clear_style(node, offset);
        }
        if let Some(css) = self.tree.get("css").and_then(Value::as_object) {
            for property in css.keys() {
                self.surface.clear_style(node, property);
            }
        }
        if let Some(hook) = self.hooks.reset.as_mut() {
            hook();
        }
    }
}

/// Inner markup: content container, with the close control prepended when
/// closability is on.
fn template(close: bool, color: &str) -> String {
    let content = r#"<div class="informer-content" style="float:left; display:inline;"></div>"#;
    if close {
        format!(
            r##"<a href="#close" class="informer-close" style="float:right; display:inline; margin-left:1em; text-decoration:none; color:{color}; font-weight:bold;" onclick="this.parentNode.close()">&times;</a>{content}"##
        )
    } else {
        content.to_string()
    }
}

/// Style text for a merged css leaf: strings verbatim, everything else
/// (the numeric stacking value) via its JSON rendering.
fn css_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
