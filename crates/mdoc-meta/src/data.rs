use serde::{Deserialize, Serialize};

use crate::error::MetaError;

/// Metadata describing one documentation site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaData {
    /// Banner shown on every page of the site.
    pub name: String,
    /// Style bundle name. Empty selects the server's default style.
    pub style: String,
    /// Clickable banner links.
    pub links: Vec<Link>,
    /// Banner menus.
    pub menus: Vec<Menu>,
}

/// A banner link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub name: String,
    pub url: String,
}

/// A banner menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Menu {
    pub name: String,
    pub items: Vec<MenuItem>,
}

/// A clickable entry in a [`Menu`].
///
/// `link` is a path relative to the site root ending in the document extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuItem {
    pub name: String,
    pub link: String,
}

impl MetaData {
    /// Decode metadata without validating it.
    ///
    /// Empty or whitespace-only input yields the default (empty) metadata.
    ///
    /// # Errors
    ///
    /// Returns [`MetaError::Parse`] if the content is not valid YAML for this shape.
    pub fn parse_yaml(bytes: &[u8]) -> Result<Self, MetaError> {
        let text = std::str::from_utf8(bytes).map_err(|e| MetaError::Parse(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| MetaError::Parse(e.to_string()))
    }

    /// Decode and validate metadata whose menu links use `extension`.
    ///
    /// # Errors
    ///
    /// Returns [`MetaError`] if the content does not parse or fails [`validate`](Self::validate).
    pub fn from_yaml(bytes: &[u8], extension: &str) -> Result<Self, MetaError> {
        let meta = Self::parse_yaml(bytes)?;
        meta.validate(extension)?;
        Ok(meta)
    }

    /// Encode as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`MetaError::Encode`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, MetaError> {
        serde_yaml::to_string(self).map_err(|e| MetaError::Encode(e.to_string()))
    }

    /// Check the style name and menu links.
    ///
    /// # Errors
    ///
    /// Returns [`MetaError::InvalidStyle`] for a style that is not a single path
    /// segment, and [`MetaError::InvalidMenuLink`] for an absolute link or one
    /// not ending in `.{extension}`.
    pub fn validate(&self, extension: &str) -> Result<(), MetaError> {
        if !self.style.is_empty() && !is_single_segment(&self.style) {
            return Err(MetaError::InvalidStyle(self.style.clone()));
        }

        let suffix = format!(".{extension}");
        for menu in &self.menus {
            for item in &menu.items {
                let relative = !item.link.starts_with('/') && !item.link.contains("://");
                if !relative || !item.link.ends_with(&suffix) {
                    return Err(MetaError::InvalidMenuLink {
                        menu: menu.name.clone(),
                        link: item.link.clone(),
                        extension: extension.to_owned(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Style to render with, falling back to `default` when unset.
    pub fn effective_style<'a>(&'a self, default: &'a str) -> &'a str {
        if self.style.is_empty() {
            default
        } else {
            &self.style
        }
    }

    /// A filled-in sample, useful as a starting point for new sites.
    #[must_use]
    pub fn example() -> Self {
        Self {
            name: "My Docs".to_owned(),
            style: "base".to_owned(),
            links: vec![
                Link {
                    name: "Owners".to_owned(),
                    url: "https://example.com/owners".to_owned(),
                },
                Link {
                    name: "Authors".to_owned(),
                    url: "https://example.com/authors".to_owned(),
                },
            ],
            menus: vec![Menu {
                name: "Guides".to_owned(),
                items: vec![MenuItem {
                    name: "Getting started".to_owned(),
                    link: "guides/getting-started.mdoc".to_owned(),
                }],
            }],
        }
    }
}

fn is_single_segment(name: &str) -> bool {
    name != "." && name != ".." && !name.contains(['/', '\\'])
}
