/// Errors produced while decoding or validating site metadata.
#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    /// The metadata text is not valid YAML or has the wrong shape.
    #[error("Invalid metadata YAML: {0}")]
    Parse(String),
    /// Metadata could not be encoded.
    #[error("Could not encode metadata: {0}")]
    Encode(String),
    /// The style does not name a single directory.
    #[error("Invalid style '{0}': must be a single path segment")]
    InvalidStyle(String),
    /// A menu item link is absolute or has the wrong extension.
    #[error("Invalid link '{link}' in menu '{menu}': must be a relative path ending in .{extension}")]
    InvalidMenuLink {
        menu: String,
        link: String,
        extension: String,
    },
}
