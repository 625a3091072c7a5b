//! Error types for template resolution and rendering

use thiserror::Error;

use crate::engine::EngineError;

/// Errors surfaced to the caller of `Adapter::render`.
///
/// None of these are retried automatically: retrying a template resolution
/// without fixing the reference would reproduce the same failure.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// A rooted location has no path segment matching a configured category.
    /// The loader converts this into `NotFound` before it reaches the caller.
    #[error("cannot resolve '{location}': no path segment matches a configured category")]
    Resolution { location: String },

    /// No view could be located for the given reference by any lookup branch.
    #[error(
        "no view matches '{location}'; retry with a reference rooted at the \
         library (e.g. '/atoms/button/button.html') or a handle"
    )]
    NotFound { location: String },

    /// The evaluator raised during compilation or evaluation.
    #[error("render of '{location}' failed: {source}")]
    Render {
        location: String,
        #[source]
        source: EngineError,
    },
}
