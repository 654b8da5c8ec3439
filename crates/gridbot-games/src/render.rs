//! Rendering seam.
//!
//! Drawing lives in the host. Each adapter owns the [`RenderContext`] of the
//! view surface it was created for and hands it every new state, so two
//! games on one page never share drawing state.

use std::fmt;
use std::sync::Arc;

/// Something that can draw a game state onto a host surface.
pub trait Canvas<S>: Send + Sync {
    fn draw(&self, surface_id: &str, state: &S);
}

/// A canvas bound to one view surface.
pub struct RenderContext<S> {
    surface_id: String,
    canvas: Arc<dyn Canvas<S>>,
}

impl<S> RenderContext<S> {
    pub fn new(surface_id: impl Into<String>, canvas: Arc<dyn Canvas<S>>) -> Self {
        Self {
            surface_id: surface_id.into(),
            canvas,
        }
    }

    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    pub fn render(&self, state: &S) {
        self.canvas.draw(&self.surface_id, state);
    }
}

impl<S> Clone for RenderContext<S> {
    fn clone(&self) -> Self {
        Self {
            surface_id: self.surface_id.clone(),
            canvas: self.canvas.clone(),
        }
    }
}

impl<S> fmt::Debug for RenderContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("surface_id", &self.surface_id)
            .finish()
    }
}
