//! Line input shared between the region prompt and the quit watcher.

use std::io::{self, BufRead, Read};
use std::sync::{Arc, Mutex, MutexGuard};

/// A buffered reader that several consumers take turns on.
///
/// Every clone reads from the same underlying buffer, so bytes buffered while
/// one consumer reads a line stay available to the next one. Consumers are
/// expected to read one after another; concurrent reads interleave at
/// buffer-fill granularity.
#[derive(Debug)]
pub struct SharedInput<R> {
    inner: Arc<Mutex<R>>,
    peek: Vec<u8>,
}

impl<R> Clone for SharedInput<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            peek: Vec::new(),
        }
    }
}

impl<R: BufRead> SharedInput<R> {
    pub fn new(input: R) -> Self {
        Self {
            inner: Arc::new(Mutex::new(input)),
            peek: Vec::new(),
        }
    }
}

fn lock<R>(inner: &Mutex<R>) -> io::Result<MutexGuard<'_, R>> {
    inner
        .lock()
        .map_err(|_| io::Error::other("shared input poisoned"))
}

impl<R: BufRead> Read for SharedInput<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.peek.clear();
        lock(&self.inner)?.read(buf)
    }
}

impl<R: BufRead> BufRead for SharedInput<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        let mut inner = lock(&self.inner)?;
        let available = inner.fill_buf()?;
        self.peek.clear();
        self.peek.extend_from_slice(available);
        drop(inner);
        Ok(&self.peek)
    }

    fn consume(&mut self, amt: usize) {
        if let Ok(mut inner) = lock(&self.inner) {
            inner.consume(amt);
        }
        let amt = amt.min(self.peek.len());
        self.peek.drain(..amt);
    }
}
