use crate::pipeline::RenderPipeline;

/// Everything the page handler needs, shared by all requests.
pub(crate) struct AppState {
    pub(crate) pipeline: RenderPipeline,
}
