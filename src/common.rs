use crate::Executor;
use std::sync::Arc;

/// Helper trait for [`Executor::request`] generic returns.
/// Must be implemented for every struct which is used as generic parameter for
/// [`Executor::request`].
#[doc(hidden)]
pub trait Request {
    /// Set a usable [`Executor`] instance to the struct if required
    fn __set_executor(&mut self, _: Arc<Executor>) {}
}

/// Implement [`Request`] for cases where only the request must be done without needing an
/// explicit result.
impl Request for () {}

impl Request for serde_json::Value {}

/// The items endpoint always answers with an array, even if only one id was requested.
impl<T: Request> Request for Vec<T> {
    fn __set_executor(&mut self, executor: Arc<Executor>) {
        for item in self.iter_mut() {
            item.__set_executor(executor.clone())
        }
    }
}
