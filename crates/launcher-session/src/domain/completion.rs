//! Single-use completion handlers.

use std::fmt;

use launcher_core::options::CompletionResult;
use tokio::sync::oneshot;

/// The host's handler for a session's final result.
///
/// Invocation consumes the handler, so a handler that has run cannot run
/// again. Dropping it without invoking is how teardown discards it.
pub struct CompletionHandler(Box<dyn FnOnce(CompletionResult) + Send>);

impl CompletionHandler {
    /// Wraps a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(CompletionResult) + Send + 'static,
    {
        Self(Box::new(callback))
    }

    /// A handler that forwards the result into a oneshot channel.
    ///
    /// The paired receiver yields an error if the handler is discarded.
    #[must_use]
    pub fn channel() -> (Self, oneshot::Receiver<CompletionResult>) {
        let (tx, rx) = oneshot::channel();
        let handler = Self::new(move |result| {
            if tx.send(result).is_err() {
                tracing::debug!("completion receiver dropped before the result arrived");
            }
        });
        (handler, rx)
    }

    /// Runs the handler.
    pub fn invoke(self, result: CompletionResult) {
        (self.0)(result);
    }
}

impl fmt::Debug for CompletionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CompletionHandler")
    }
}
