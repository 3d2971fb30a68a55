//! Input validation.

use crate::ValidationError;
use indexmap::IndexMap;
use simcfs_types::{Task, TaskDescriptor, TaskId, TypeError};

/// Validate raw descriptors and turn them into tasks.
///
/// Returns the tasks stable-sorted by arrival time (input order preserved
/// among equal arrivals) together with each identifier's input position.
/// The first problem found aborts validation.
pub fn validate_tasks(
    descriptors: impl IntoIterator<Item = TaskDescriptor>,
) -> Result<(Vec<Task>, IndexMap<TaskId, usize>), ValidationError> {
    let mut order = IndexMap::new();
    let mut tasks = Vec::new();

    for (index, desc) in descriptors.into_iter().enumerate() {
        if desc.id.as_str().trim().is_empty() {
            return Err(ValidationError::EmptyId { index });
        }
        if order.contains_key(&desc.id) {
            return Err(ValidationError::DuplicateId(desc.id));
        }
        if !(desc.arrival_time.is_finite() && desc.arrival_time >= 0.0) {
            return Err(ValidationError::InvalidArrival {
                task: desc.id,
                arrival: desc.arrival_time,
            });
        }
        let task = desc.to_task().map_err(|err| match err {
            TypeError::NiceOutOfRange { nice, .. } => ValidationError::NiceOutOfRange {
                task: desc.id.clone(),
                nice,
            },
            TypeError::NonPositiveDuration { kind, duration } => {
                // The first burst rejected is the first one equal to it.
                let index = desc
                    .bursts
                    .iter()
                    .position(|b| b.kind == kind && b.duration.total_cmp(&duration).is_eq())
                    .unwrap_or_default();
                ValidationError::NonPositiveBurst {
                    task: desc.id.clone(),
                    index,
                    kind,
                    duration,
                }
            }
        })?;

        order.insert(desc.id, index);
        tasks.push(task);
    }

    // `sort_by` is stable.
    tasks.sort_by(|a, b| a.arrival_time().total_cmp(&b.arrival_time()));
    Ok((tasks, order))
}
