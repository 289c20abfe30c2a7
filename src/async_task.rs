use std::task::{Context, Poll, Waker};

use futures::{FutureExt, future::BoxFuture};

/// A boxed future driven by the frame loop instead of an executor.
pub struct AsyncTask<T> {
    future: Option<BoxFuture<'static, T>>,
}

impl<T> AsyncTask<T> {
    pub fn new(future: BoxFuture<'static, T>) -> Self {
        Self {
            future: Some(future),
        }
    }

    /// Polls once. The output is handed out on the call that resolves the
    /// future; the task is spent afterwards and keeps returning `None`.
    pub fn poll_once(&mut self) -> Option<T> {
        let future = self.future.as_mut()?;
        let mut cx = Context::from_waker(Waker::noop());
        match future.poll_unpin(&mut cx) {
            Poll::Ready(output) => {
                self.future = None;
                Some(output)
            }
            Poll::Pending => None,
        }
    }

    pub fn is_spent(&self) -> bool {
        self.future.is_none()
    }
}

impl<T> std::fmt::Debug for AsyncTask<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncTask")
            .field("spent", &self.is_spent())
            .finish()
    }
}
