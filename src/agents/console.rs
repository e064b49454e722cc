//! One stdin shared by the console collaborators (wake word, camera operator, voice).

use std::cell::RefCell;
use std::io::{self, BufRead, Read, StdinLock};
use std::rc::Rc;

/// Clonable line reader over the locked stdin.
///
/// Each handle pulls at most one line from the shared lock at a time, so no
/// handle ever buffers input meant for another one.
#[derive(Clone)]
pub struct SharedStdin {
    inner: Rc<RefCell<StdinLock<'static>>>,
    line: Vec<u8>,
    pos: usize,
}

impl SharedStdin {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(io::stdin().lock())),
            line: Vec::new(),
            pos: 0,
        }
    }
}

impl Default for SharedStdin {
    fn default() -> Self {
        Self::new()
    }
}

impl Read for SharedStdin {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for SharedStdin {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.line.len() {
            self.line.clear();
            self.pos = 0;
            self.inner.borrow_mut().read_until(b'\n', &mut self.line)?;
        }
        Ok(&self.line[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.line.len());
    }
}
