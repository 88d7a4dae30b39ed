use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use crate::{
    backend::EventSource,
    error::{Error, Result},
    event::Event,
};

/// One scripted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Return this event.
    Event(Event),
    /// Report nothing pending once.
    Idle,
}

/// Shared handle for feeding a [`ScriptedSource`].
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Steps not yet consumed.
    steps: Arc<Mutex<VecDeque<Step>>>,
}

impl Script {
    /// Append an event.
    pub fn push(&self, event: impl Into<Event>) {
        self.push_step(Step::Event(event.into()));
    }

    /// Append an idle report.
    pub fn push_idle(&self) {
        self.push_step(Step::Idle);
    }

    /// Append a step.
    pub fn push_step(&self, step: Step) {
        if let Ok(mut steps) = self.steps.lock() {
            steps.push_back(step);
        }
    }

    /// Steps not yet consumed.
    pub fn len(&self) -> usize {
        self.steps.lock().map_or(0, |s| s.len())
    }

    /// Has the script run out?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An event source replaying a script. Once the script runs out it reports
/// `Error::SourceClosed`.
#[derive(Debug)]
pub struct ScriptedSource {
    /// Steps to replay.
    script: Script,
}

impl ScriptedSource {
    /// Create a source and the handle that feeds it.
    pub fn create() -> (Script, Self) {
        let script = Script::default();
        (
            script.clone(),
            Self {
                script,
            },
        )
    }
}

impl EventSource for ScriptedSource {
    fn get_event(&mut self) -> Result<Option<Event>> {
        let step = self
            .script
            .steps
            .lock()
            .map_err(|e| Error::Backend(e.to_string()))?
            .pop_front();
        match step {
            Some(Step::Event(e)) => Ok(Some(e)),
            Some(Step::Idle) => Ok(None),
            None => Err(Error::SourceClosed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands;

    #[test]
    fn replays_then_closes() {
        let (script, mut src) = ScriptedSource::create();
        script.push(Event::key('a'));
        script.push_idle();
        script.push(Event::command(commands::OK));
        assert_eq!(script.len(), 3);
        assert_eq!(src.get_event().unwrap(), Some(Event::key('a')));
        assert_eq!(src.get_event().unwrap(), None);
        assert_eq!(src.get_event().unwrap(), Some(Event::command(commands::OK)));
        assert_eq!(src.get_event(), Err(Error::SourceClosed));
        assert!(script.is_empty());
    }
}
