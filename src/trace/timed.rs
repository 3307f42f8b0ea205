use std::fmt::Display;
use std::time::Instant;

use crate::trace::logger::Logger;
use crate::trace::trace::{Phase, TraceEvent};

/// Anything a timed operation can return that may represent a failure.
pub trait Outcome {
    fn failure(&self) -> Option<String>;
}

impl<T, E: Display> Outcome for Result<T, E> {
    fn failure(&self) -> Option<String> {
        self.as_ref().err().map(|e| e.to_string())
    }
}

/// Run `f` between a START and an END/FAILED event carrying the elapsed time.
///
/// The result is returned untouched; logging never changes control flow.
pub fn timed<T: Outcome>(
    logger: &dyn Logger,
    category: &str,
    operation: &str,
    f: impl FnOnce() -> T,
) -> T {
    logger.log(&TraceEvent::now(category, operation, Phase::Start));
    let start = Instant::now();

    let outcome = f();
    let elapsed = start.elapsed().as_millis();

    let event = match outcome.failure() {
        Some(reason) => TraceEvent::now(category, operation, Phase::Failed)
            .with_duration(elapsed)
            .with_detail(reason),
        None => TraceEvent::now(category, operation, Phase::End).with_duration(elapsed),
    };
    logger.log(&event);

    outcome
}

/// Emit a free-standing note event.
pub fn note(logger: &dyn Logger, category: &str, operation: &str, detail: impl ToString) {
    logger.log(&TraceEvent::now(category, operation, Phase::Note).with_detail(detail));
}
