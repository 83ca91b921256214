use std::sync::{Arc, Mutex};

use termwatch::errors::NotifyError;
use termwatch::exec::RunResult;
use termwatch::notify::Notifier;

/// A notifier that:
/// - records every `RunResult` it is handed
/// - optionally fails (or panics) after recording.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    calls: Arc<Mutex<Vec<RunResult>>>,
    behaviour: Behaviour,
}

#[derive(Clone, Copy, Default)]
enum Behaviour {
    #[default]
    Succeed,
    Fail,
    Panic,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records, then returns an error.
    pub fn failing() -> Self {
        Self {
            behaviour: Behaviour::Fail,
            ..Self::default()
        }
    }

    /// Records, then panics.
    pub fn panicking() -> Self {
        Self {
            behaviour: Behaviour::Panic,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RunResult> {
        self.calls.lock().unwrap().clone()
    }

    /// The single recorded call; panics if there were zero or several.
    pub fn only_call(&self) -> RunResult {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one notification, got {calls:?}");
        calls.into_iter().next().unwrap()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, result: &RunResult) -> Result<(), NotifyError> {
        self.calls.lock().unwrap().push(result.clone());
        match self.behaviour {
            Behaviour::Succeed => Ok(()),
            Behaviour::Fail => Err(NotifyError::Toast("simulated failure".into())),
            Behaviour::Panic => panic!("simulated notifier panic"),
        }
    }
}
