//! Operation deadlines: the racer and the per-operation resolver.

mod deadline;
mod resolver;

pub use deadline::{with_deadline, Deadline};
pub use resolver::TimeoutResolver;
