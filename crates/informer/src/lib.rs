//! Transient notification overlay widget.
//!
//! An [`Informer`] owns a single overlay node on an abstract rendering
//! surface. It injects markup content into the node, optionally auto-hides
//! it after a delay, and can be reconfigured (position, colors, fonts)
//! between calls. Partial configurations are deep-merged over built-in
//! defaults, so callers only ever specify what they want to change.

pub mod merge;
pub mod notifier;
pub mod options;
pub mod surface;

// Re-exports for convenience
pub use notifier::Informer;
pub use options::{CssOptions, Hooks, Options, Patch, Position};
pub use surface::{MemorySurface, NodeId, Surface};

/// Errors that can occur while driving a notification overlay.
#[derive(Debug, thiserror::Error)]
pub enum InformerError {
    /// The rendering surface's root container does not exist yet.
    ///
    /// Raised by `configure` (directly or via `show`) — the overlay node
    /// can only be attached once the root is available. All other
    /// operations degrade to a silent no-op instead.
    #[error("notifications can only be displayed once the rendering surface is ready")]
    SurfaceNotReady,

    #[error("invalid position '{0}': expected 'top-left', 'top-right', 'bottom-left' or 'bottom-right'")]
    InvalidPosition(String),

    /// The merged configuration tree did not deserialize into [`Options`].
    ///
    /// Only reachable through hand-built raw patches carrying wrong-typed
    /// leaves (e.g. a string `delay`).
    #[error("invalid options: {0}")]
    Options(String),
}

/// Result type alias for informer operations.
pub type Result<T> = std::result::Result<T, InformerError>;
