use super::{Record, Recorder};
use std::{cell::RefCell, rc::Rc};

/// Buffered recorder.
///
/// Records are kept in a buffer shared by clones of the recorder, so that
/// a clone handed over to an [`Agent`](crate::Agent) can be inspected
/// from outside.
#[derive(Default, Clone)]
pub struct BufferedRecorder {
    buf: Rc<RefCell<Vec<Record>>>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records written so far.
    pub fn len(&self) -> usize {
        self.buf.borrow().len()
    }

    /// Returns `true` if no record has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.borrow().is_empty()
    }

    /// Takes out all records written so far.
    pub fn take(&self) -> Vec<Record> {
        self.buf.borrow_mut().drain(..).collect()
    }
}

impl Recorder for BufferedRecorder {
    /// Write a [`Record`] to the buffer.
    fn write(&mut self, record: Record) {
        self.buf.borrow_mut().push(record);
    }
}
