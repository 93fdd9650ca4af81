//! In-memory stand-ins for the device link and console.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Cloneable in-memory sink; every clone appends to the same buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Everything written so far, decoded as UTF-8.
    pub fn contents(&self) -> String {
        let bytes = self.inner.lock().expect("buffer mutex poisoned").clone();
        String::from_utf8(bytes).expect("buffer holds UTF-8")
    }

    /// Written lines without terminators.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .expect("buffer mutex poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer whose every write fails as if the link had been unplugged.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }
}

/// Reader that replays a fixed script of chunks and errors, then reports
/// end of stream.
#[derive(Debug)]
pub struct ScriptedReader {
    steps: VecDeque<Result<Vec<u8>, io::ErrorKind>>,
}

impl ScriptedReader {
    pub fn new(steps: Vec<Result<Vec<u8>, io::ErrorKind>>) -> Self {
        Self {
            steps: steps.into(),
        }
    }
}

impl Read for ScriptedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.steps.pop_front() {
            None => Ok(0),
            Some(Err(kind)) => Err(io::Error::from(kind)),
            Some(Ok(mut chunk)) => {
                let count = chunk.len().min(buf.len());
                buf[..count].copy_from_slice(&chunk[..count]);
                if count < chunk.len() {
                    self.steps.push_front(Ok(chunk.split_off(count)));
                }
                Ok(count)
            }
        }
    }
}

/// Serial-like reader that never delivers data and times out on every read.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleLink;

impl Read for IdleLink {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        thread::sleep(Duration::from_millis(5));
        Err(io::Error::from(io::ErrorKind::TimedOut))
    }
}
