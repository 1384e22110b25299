/// Post-processing stage applied to every rendered HTML fragment.
///
/// The server always runs exactly one sanitizer between conversion and
/// templating. Implementations must be thread-safe since one instance serves
/// all requests.
pub trait Sanitizer: Send + Sync {
    /// Return the fragment to hand to the template.
    fn sanitize(&self, html: String) -> String;
}

/// Sanitizer that trusts converter output and returns it unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl Sanitizer for PassThrough {
    fn sanitize(&self, html: String) -> String {
        html
    }
}
