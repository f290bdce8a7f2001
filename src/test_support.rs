//! Helpers shared by unit tests.

use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use bytes::Bytes;
use hyper::body::Frame;
use tracing::subscriber::DefaultGuard;

/// Collects formatted log lines from the current thread.
#[derive(Clone, Default)]
pub(crate) struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Routes this thread's events into the capture until the guard drops.
    /// Tokio tests run on one thread, so async code is covered too.
    pub(crate) fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        (capture, tracing::subscriber::set_default(subscriber))
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf).lines().map(str::to_owned).collect()
    }

    /// The single line containing `needle`.
    pub(crate) fn line(&self, needle: &str) -> String {
        let matching: Vec<String> = self.lines().into_iter().filter(|l| l.contains(needle)).collect();
        assert_eq!(matching.len(), 1, "expected one `{needle}` line in {:#?}", self.lines());
        matching.into_iter().next().unwrap()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A body whose first poll fails, like a connection reset mid-upload.
pub(crate) struct Reset;

impl hyper::body::Body for Reset {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, Self::Error>>> {
        Poll::Ready(Some(Err(io::Error::other("connection reset"))))
    }
}
