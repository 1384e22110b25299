//! Markdown to HTML conversion for mdoc.
//!
//! [`MarkdownRenderer`] turns a Markdown document into an HTML fragment and,
//! optionally, pulls the first H1 out as the page title. The fragment then goes
//! through a [`Sanitizer`] before it reaches a template.
//!
//! # Example
//!
//! ```
//! use mdoc_renderer::{MarkdownRenderer, PassThrough, Sanitizer};
//!
//! let result = MarkdownRenderer::new()
//!     .with_title_extraction()
//!     .render_markdown("# Hello\n\n**Bold** text");
//!
//! assert_eq!(result.title.as_deref(), Some("Hello"));
//! let html = PassThrough.sanitize(result.html);
//! assert!(html.contains("<strong>Bold</strong>"));
//! ```

mod renderer;
mod sanitize;

pub use renderer::{MarkdownRenderer, RenderResult};
pub use sanitize::{PassThrough, Sanitizer};
