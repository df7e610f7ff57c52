//! Markup rendering seam.
//!
//! The wiki's markup-to-HTML renderer lives outside this core; the
//! dispatcher only needs something that turns source text into its
//! formatted-for-display form.

/// External markup renderer.
pub trait MarkupRenderer: Send + Sync {
    fn render(&self, source: &str) -> String;
}

/// Renderer that passes source through untouched, for hosts that do not
/// wire a real renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl MarkupRenderer for PlainRenderer {
    fn render(&self, source: &str) -> String {
        source.to_string()
    }
}
