//! In-memory sink for dispatcher tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::SinkError;
use crate::sink::{Batch, Sink};

/// Records every batch it is handed; fails the calls whose index is listed.
#[derive(Default)]
pub(crate) struct RecordingSink {
    batches: Mutex<Vec<Batch>>,
    fail_on: Vec<usize>,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_on(calls: &[usize]) -> Self {
        Self {
            batches: Mutex::default(),
            fail_on: calls.to_vec(),
        }
    }

    pub(crate) fn batches(&self) -> Vec<Batch> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn write(&self, batch: &Batch) -> Result<(), SinkError> {
        let mut batches = self.batches.lock().unwrap();
        let call = batches.len();
        batches.push(batch.clone());
        if self.fail_on.contains(&call) {
            return Err(SinkError::Status {
                status: 500,
                body: "injected".into(),
            });
        }
        Ok(())
    }
}
