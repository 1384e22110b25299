//! Request URL resolution.
//!
//! A request path has the shape `/<scheme>/<address...>/<marker>/<rest>`. The
//! scheme segment is optional: when the first segment is not a registered
//! scheme the whole prefix is an address under the default scheme. `<rest>` is
//! empty for a site index or a document path ending in the document extension.

use mdoc_storage::Location;
use percent_encoding::percent_decode_str;

use crate::error::ServerError;

/// Naming conventions of a site directory.
#[derive(Clone, Debug)]
pub struct SiteLayout {
    /// Path segment marking the root of a site.
    pub marker: String,
    /// Document file extension, without the dot.
    pub extension: String,
    /// Document served for a request ending at the marker.
    pub index: String,
    /// Metadata filename, looked up in the site directory and then in the
    /// marker directory.
    pub meta_filename: String,
    /// Style used when the metadata does not name one.
    pub default_style: String,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            marker: "mdoc".to_owned(),
            extension: "mdoc".to_owned(),
            index: "index.mdoc".to_owned(),
            meta_filename: "meta".to_owned(),
            default_style: "base".to_owned(),
        }
    }
}

/// What a request asks for inside its site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Target {
    /// The site's index document.
    Index,
    /// A document path relative to the marker directory.
    Page(String),
}

/// A request URL resolved against the site layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SitePath {
    /// Backend scheme serving the site.
    pub(crate) scheme: String,
    /// Backend address of the marker directory.
    pub(crate) root: String,
    /// URL of the site root, ending in `<marker>/`.
    pub(crate) home: String,
    pub(crate) target: Target,
}

impl SitePath {
    /// Resolve `path`.
    ///
    /// `is_scheme` reports whether a segment names a registered backend.
    pub(crate) fn parse(
        path: &str,
        layout: &SiteLayout,
        is_scheme: impl Fn(&str) -> bool,
        default_scheme: &str,
    ) -> Result<Self, ServerError> {
        let raw: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let segments = raw
            .iter()
            .map(|s| {
                percent_decode_str(s)
                    .decode_utf8()
                    .map(std::borrow::Cow::into_owned)
                    .map_err(|_| ServerError::BadEncoding(path.to_owned()))
            })
            .collect::<Result<Vec<String>, _>>()?;

        // The last segment is a file name (or empty), never a directory.
        let dirs = &segments[..segments.len() - 1];
        let count = dirs.iter().filter(|s| **s == layout.marker).count();
        let Some(idx) = dirs.iter().position(|s| *s == layout.marker).filter(|_| count == 1)
        else {
            return Err(ServerError::MarkerCount {
                path: path.to_owned(),
                marker: layout.marker.clone(),
                count,
            });
        };

        let rest = segments[idx + 1..].join("/");
        let target = if rest.is_empty() {
            Target::Index
        } else if rest.ends_with(&format!(".{}", layout.extension)) {
            Target::Page(rest)
        } else {
            return Err(ServerError::UnsupportedPath(path.to_owned()));
        };

        let before = &segments[..idx];
        let (scheme, address) = match before.split_first() {
            Some((first, tail)) if is_scheme(first.as_str()) => (first.as_str(), tail),
            _ => (default_scheme, before),
        };
        let mut root: Vec<&str> = address.iter().map(String::as_str).collect();
        root.push(&layout.marker);

        Ok(Self {
            scheme: scheme.to_owned(),
            root: root.join("/"),
            home: format!("/{}/", raw[..=idx].join("/")),
            target,
        })
    }

    /// Candidate locations of the site metadata file, in lookup order: the
    /// directory holding the marker, then the marker directory itself.
    pub(crate) fn meta_locations(&self, layout: &SiteLayout) -> [Location; 2] {
        let site_dir = self.root.rsplit_once('/').map_or("", |(dir, _)| dir);
        let primary = if site_dir.is_empty() {
            Location::from_parts(&self.scheme, &layout.meta_filename)
        } else {
            Location::from_parts(&self.scheme, &format!("{site_dir}/{}", layout.meta_filename))
        };
        [primary, self.location_of(&layout.meta_filename)]
    }

    /// Location of the requested document.
    pub(crate) fn content_location(&self, layout: &SiteLayout) -> Location {
        match &self.target {
            Target::Index => self.location_of(&layout.index),
            Target::Page(page) => self.location_of(page),
        }
    }

    fn location_of(&self, name: &str) -> Location {
        Location::from_parts(&self.scheme, &format!("{}/{name}", self.root))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(path: &str) -> Result<SitePath, ServerError> {
        SitePath::parse(
            path,
            &SiteLayout::default(),
            |s| s == "local" || s == "github",
            "local",
        )
    }

    #[test]
    fn test_index_under_default_scheme() {
        let site = parse("/site/mdoc/").unwrap();

        assert_eq!(
            site,
            SitePath {
                scheme: "local".to_owned(),
                root: "site/mdoc".to_owned(),
                home: "/site/mdoc/".to_owned(),
                target: Target::Index,
            }
        );
        let layout = SiteLayout::default();
        let [primary, fallback] = site.meta_locations(&layout);
        assert_eq!(primary.path(), "/local/site/meta");
        assert_eq!(fallback.path(), "/local/site/mdoc/meta");
        assert_eq!(
            site.content_location(&layout).path(),
            "/local/site/mdoc/index.mdoc"
        );
    }

    #[test]
    fn test_page() {
        let site = parse("/site/mdoc/guides/setup.mdoc").unwrap();

        assert_eq!(site.target, Target::Page("guides/setup.mdoc".to_owned()));
        assert_eq!(
            site.content_location(&SiteLayout::default()).path(),
            "/local/site/mdoc/guides/setup.mdoc"
        );
    }

    #[test]
    fn test_explicit_scheme() {
        let site = parse("/github/owner/proj/docs/mdoc/").unwrap();

        assert_eq!(site.scheme, "github");
        assert_eq!(site.root, "owner/proj/docs/mdoc");
        assert_eq!(site.home, "/github/owner/proj/docs/mdoc/");
        let [primary, _] = site.meta_locations(&SiteLayout::default());
        assert_eq!(primary.path(), "/github/owner/proj/docs/meta");
    }

    #[test]
    fn test_explicit_local_scheme() {
        let site = parse("/local/site/mdoc/").unwrap();

        assert_eq!(site.scheme, "local");
        assert_eq!(site.root, "site/mdoc");
    }

    #[test]
    fn test_marker_at_top_level() {
        let site = parse("/mdoc/").unwrap();

        assert_eq!(site.root, "mdoc");
        assert_eq!(site.home, "/mdoc/");
        let [primary, fallback] = site.meta_locations(&SiteLayout::default());
        assert_eq!(primary.path(), "/local/meta");
        assert_eq!(fallback.path(), "/local/mdoc/meta");
    }

    #[test]
    fn test_marker_count() {
        for (path, expected) in [
            ("/site/page.mdoc", 0),
            ("/site/mdoc", 0),
            ("/site/xmdoc/", 0),
            ("/a/mdoc/b/mdoc/", 2),
            ("/a/mdoc/b/mdoc/page.mdoc", 2),
        ] {
            match parse(path) {
                Err(ServerError::MarkerCount { count, .. }) => {
                    assert_eq!(count, expected, "path {path}");
                }
                other => panic!("expected MarkerCount for {path}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unsupported_suffix() {
        for path in ["/site/mdoc/notes.txt", "/site/mdoc/sub/", "/site/mdoc/page.mdoc.bak"] {
            assert!(
                matches!(parse(path), Err(ServerError::UnsupportedPath(_))),
                "path {path}"
            );
        }
    }

    #[test]
    fn test_percent_decoding() {
        let site = parse("/my%20site/mdoc/read%20me.mdoc").unwrap();

        assert_eq!(site.root, "my site/mdoc");
        assert_eq!(site.home, "/my%20site/mdoc/");
        assert_eq!(site.target, Target::Page("read me.mdoc".to_owned()));
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(
            parse("/site/mdoc/%ff.mdoc"),
            Err(ServerError::BadEncoding(_))
        ));
    }
}
