use crate::detection::domain::detection_result::DetectionResult;
use crate::sink::domain::result_sink::{PersistenceError, ResultSink};

/// Fans a result out to several sinks.
///
/// Every sink is tried even if an earlier one fails; failures are collected
/// into [`PersistenceError::Multiple`] (or returned as-is when only one
/// sink failed).
pub struct CompositeSink {
    sinks: Vec<Box<dyn ResultSink>>,
}

impl CompositeSink {
    pub fn new(sinks: Vec<Box<dyn ResultSink>>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn for_each(
        &mut self,
        mut op: impl FnMut(&mut dyn ResultSink) -> Result<(), PersistenceError>,
    ) -> Result<(), PersistenceError> {
        let mut errors: Vec<PersistenceError> = self
            .sinks
            .iter_mut()
            .filter_map(|sink| op(sink.as_mut()).err())
            .collect();
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(PersistenceError::Multiple(errors)),
        }
    }
}

impl ResultSink for CompositeSink {
    fn store(&mut self, result: &DetectionResult) -> Result<(), PersistenceError> {
        self.for_each(|sink| sink.store(result))
    }

    fn close(&mut self) -> Result<(), PersistenceError> {
        self.for_each(|sink| sink.close())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Log {
        stored: Vec<(&'static str, usize)>,
        closed: Vec<&'static str>,
    }

    struct RecordingSink {
        name: &'static str,
        fail: bool,
        log: Arc<Mutex<Log>>,
    }

    impl ResultSink for RecordingSink {
        fn store(&mut self, result: &DetectionResult) -> Result<(), PersistenceError> {
            self.log.lock().unwrap().stored.push((self.name, result.frame_index));
            if self.fail {
                Err(PersistenceError::Disconnected)
            } else {
                Ok(())
            }
        }

        fn close(&mut self) -> Result<(), PersistenceError> {
            self.log.lock().unwrap().closed.push(self.name);
            Ok(())
        }
    }

    fn sink(name: &'static str, fail: bool, log: &Arc<Mutex<Log>>) -> Box<dyn ResultSink> {
        Box::new(RecordingSink {
            name,
            fail,
            log: log.clone(),
        })
    }

    #[test]
    fn test_stores_to_all_in_order() {
        let log = Arc::new(Mutex::new(Log::default()));
        let mut composite = CompositeSink::new(vec![sink("fs", false, &log), sink("db", false, &log)]);
        composite.store(&DetectionResult::empty(5)).unwrap();
        composite.close().unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.stored, vec![("fs", 5), ("db", 5)]);
        assert_eq!(log.closed, vec!["fs", "db"]);
    }

    #[test]
    fn test_failure_does_not_starve_later_sinks() {
        let log = Arc::new(Mutex::new(Log::default()));
        let mut composite = CompositeSink::new(vec![sink("fs", true, &log), sink("db", false, &log)]);
        let err = composite.store(&DetectionResult::empty(10)).unwrap_err();
        assert!(matches!(err, PersistenceError::Disconnected));
        assert_eq!(log.lock().unwrap().stored.len(), 2);
    }

    #[test]
    fn test_multiple_failures_are_collected() {
        let log = Arc::new(Mutex::new(Log::default()));
        let mut composite = CompositeSink::new(vec![sink("a", true, &log), sink("b", true, &log)]);
        let err = composite.store(&DetectionResult::empty(10)).unwrap_err();
        assert!(matches!(err, PersistenceError::Multiple(ref e) if e.len() == 2));
        assert_eq!(err.to_string(), "2 sink(s) failed");
    }

    #[test]
    fn test_empty_composite_is_noop() {
        let mut composite = CompositeSink::new(Vec::new());
        assert!(composite.is_empty());
        composite.store(&DetectionResult::empty(1)).unwrap();
    }
}
