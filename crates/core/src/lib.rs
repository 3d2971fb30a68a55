//! Core vocabulary shared between the scheduling engine and its consumers.
//!
//! The engine never formats or persists anything. It reports facts as
//! [`SchedEvent`]s to an [`EventSink`]; loggers, chart renderers and test
//! recorders are all sinks.

mod event;
mod sinks;
mod traits;

pub use event::{EventKind, SchedEvent, TaskSnapshot};
pub use sinks::{CpuSlice, NullSink, RecordingSink, TracingSink};
pub use traits::EventSink;
