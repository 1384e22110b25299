//! Style bundle templates.
//!
//! A style `S` is a directory `<styles>/S/` holding the template `S.jinja`
//! plus any static assets the template links to. Templates are read from disk
//! on every request, so edits show up without a restart.

use std::path::{Path, PathBuf};

use minijinja::{AutoEscape, Environment, Value, context};
use mdoc_meta::MetaData;

use crate::error::ServerError;

/// Template file extension.
const TEMPLATE_EXTENSION: &str = "jinja";

/// Identity handed to templates until authentication exists.
const PLACEHOLDER_USER: &str = "some_user";

/// Everything a page template can see.
pub(crate) struct PageContext<'a> {
    pub(crate) meta: &'a MetaData,
    /// URL of the site root.
    pub(crate) home: &'a str,
    /// Rendered document, inserted without escaping.
    pub(crate) markdown: String,
    pub(crate) title: Option<String>,
}

/// Loads and renders the template of a style bundle.
#[derive(Clone, Debug)]
pub(crate) struct StyleBundles {
    dir: PathBuf,
}

impl StyleBundles {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Template file name for `style`.
    pub(crate) fn template_name(style: &str) -> String {
        format!("{style}.{TEMPLATE_EXTENSION}")
    }

    /// Path of the template for `style`.
    pub(crate) fn template_path(&self, style: &str) -> PathBuf {
        self.dir.join(style).join(Self::template_name(style))
    }

    /// Read the template source for `style`.
    pub(crate) async fn load(&self, style: &str) -> Result<String, ServerError> {
        let path = self.template_path(style);
        tracing::debug!(style, path = %path.display(), "Loading template");
        tokio::fs::read_to_string(&path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ServerError::StyleNotFound {
                    style: style.to_owned(),
                    path,
                }
            } else {
                ServerError::StyleRead { path, source }
            }
        })
    }

    /// Parse `source` as the template of `style` and render it with `page`.
    pub(crate) fn render(
        &self,
        style: &str,
        source: &str,
        page: PageContext<'_>,
    ) -> Result<String, ServerError> {
        let name = Self::template_name(style);
        let env = environment(&name, source)?;
        let template = env.get_template(&name)?;
        let rendered = template.render(context! {
            meta => page.meta,
            home => page.home,
            auth => context! { user => PLACEHOLDER_USER },
            markdown => Value::from_safe_string(page.markdown),
            title => page.title,
        })?;
        Ok(rendered)
    }

    /// Style bundle directory.
    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Build an environment holding a single template.
fn environment<'s>(name: &'s str, source: &'s str) -> Result<Environment<'s>, ServerError> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.add_function("sub", sub);
    env.add_template(name, source)?;
    Ok(env)
}

/// `sub(y, x)` evaluates to `x - y`.
fn sub(y: i64, x: i64) -> i64 {
    x - y
}
