//! Markdown renderer.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

/// Result of rendering markdown.
#[derive(Clone, Debug, Default)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Text of the first H1 heading (if title extraction was enabled).
    pub title: Option<String>,
}

/// Markdown to HTML converter.
///
/// GFM extensions are enabled by default and raw HTML is passed through. Both
/// can be turned off with the builder methods.
#[derive(Clone, Debug)]
pub struct MarkdownRenderer {
    extract_title: bool,
    gfm: bool,
    raw_html: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a new renderer with GFM and raw HTML enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extract_title: false,
            gfm: true,
            raw_html: true,
        }
    }

    /// Enable title extraction from the first H1 heading.
    ///
    /// The heading is still rendered.
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.extract_title = true;
        self
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// When enabled, the parser supports tables, strikethrough (`~~text~~`)
    /// and task lists (`- [ ] item`).
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Pass raw HTML through (`true`) or escape it as text (`false`).
    #[must_use]
    pub fn with_raw_html(mut self, enabled: bool) -> Self {
        self.raw_html = enabled;
        self
    }

    /// Parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Render markdown text.
    #[must_use]
    pub fn render_markdown(&self, markdown: &str) -> RenderResult {
        let mut title = TitleCapture::new(self.extract_title);
        let raw_html = self.raw_html;

        let events = Parser::new_ext(markdown, self.parser_options()).map(|event| {
            title.observe(&event);
            match event {
                Event::Html(raw) | Event::InlineHtml(raw) if !raw_html => Event::Text(raw),
                other => other,
            }
        });

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events);

        RenderResult {
            html: out,
            title: title.finish(),
        }
    }

    /// Render markdown bytes, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn render_bytes(&self, markdown: &[u8]) -> RenderResult {
        self.render_markdown(&String::from_utf8_lossy(markdown))
    }
}

/// Collects the plain text of the first H1.
struct TitleCapture {
    enabled: bool,
    in_h1: bool,
    text: String,
    done: bool,
}

impl TitleCapture {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            in_h1: false,
            text: String::new(),
            done: false,
        }
    }

    fn observe(&mut self, event: &Event<'_>) {
        if !self.enabled || self.done {
            return;
        }
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => self.in_h1 = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) if self.in_h1 => {
                self.in_h1 = false;
                self.done = true;
            }
            Event::Text(text) | Event::Code(text) if self.in_h1 => self.text.push_str(text),
            _ => {}
        }
    }

    fn finish(self) -> Option<String> {
        let title = self.text.trim();
        (self.done && !title.is_empty()).then(|| title.to_owned())
    }
}
