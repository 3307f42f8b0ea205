use std::{fs::OpenOptions, io::Write, sync::Mutex};

use crate::trace::trace::{Phase, TraceEvent};

/// Logging capability threaded explicitly through tool calls and pipeline runs.
pub trait Logger: Send + Sync {
    fn log(&self, event: &TraceEvent);
}

/// Appends one JSON object per event to a JSONL file.
pub struct TraceLogger {
    file: Option<Mutex<std::fs::File>>,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        let file = OpenOptions::new().create(true).append(true).open(path);

        match file {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
            },
            Err(e) => {
                tracing::warn!("could not open trace file '{}': {}", path, e);
                Self { file: None }
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }
}

impl Logger for TraceLogger {
    fn log(&self, event: &TraceEvent) {
        let file_mutex = match &self.file {
            Some(f) => f,
            None => return, // tracing disabled
        };

        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!("failed to serialize trace event: {}", e);
                return;
            }
        };

        let mut file = match file_mutex.lock() {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("trace logger lock poisoned: {}", e);
                return;
            }
        };

        if let Err(e) = writeln!(file, "{}", json) {
            tracing::warn!("failed to write trace event: {}", e);
        }
    }
}

/// Forwards events to the `tracing` subscriber installed by the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, event: &TraceEvent) {
        let line = event.render();
        match event.phase {
            Phase::Failed => tracing::error!(target: "scenario_scaffold", "{}", line),
            Phase::Start => tracing::debug!(target: "scenario_scaffold", "{}", line),
            Phase::End | Phase::Note => tracing::info!(target: "scenario_scaffold", "{}", line),
        }
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    events: Mutex<Vec<TraceEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &TraceEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}

/// Sends each event to every wrapped logger.
pub struct TeeLogger {
    sinks: Vec<Box<dyn Logger>>,
}

impl TeeLogger {
    pub fn new(sinks: Vec<Box<dyn Logger>>) -> Self {
        Self { sinks }
    }
}

impl Logger for TeeLogger {
    fn log(&self, event: &TraceEvent) {
        for sink in &self.sinks {
            sink.log(event);
        }
    }
}
