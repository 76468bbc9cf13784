use crate::report::{MismatchRecord, ReconError};

/// Trait for streaming mismatch records to a consumer.
pub trait MismatchSink {
    /// Called once before any records are emitted.
    ///
    /// Default is a no-op so sinks that don't need setup can ignore it.
    fn begin(&mut self) -> Result<(), ReconError> {
        Ok(())
    }

    fn emit(&mut self, record: &MismatchRecord) -> Result<(), ReconError>;

    fn finish(&mut self) -> Result<(), ReconError> {
        Ok(())
    }
}

/// A sink that collects records into a Vec.
#[derive(Default)]
pub struct VecSink {
    records: Vec<MismatchRecord>,
}

impl VecSink {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn into_records(self) -> Vec<MismatchRecord> {
        self.records
    }
}

impl MismatchSink for VecSink {
    fn emit(&mut self, record: &MismatchRecord) -> Result<(), ReconError> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// A sink that forwards records to a callback.
pub struct CallbackSink<F: FnMut(&MismatchRecord)> {
    f: F,
}

impl<F: FnMut(&MismatchRecord)> CallbackSink<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F: FnMut(&MismatchRecord)> MismatchSink for CallbackSink<F> {
    fn emit(&mut self, record: &MismatchRecord) -> Result<(), ReconError> {
        (self.f)(record);
        Ok(())
    }
}
