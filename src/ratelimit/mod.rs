//! Rate limiting logic and state management.

mod guard;
mod limiter;
mod registry;
mod window;

pub use guard::check_admission;
pub use limiter::{AdmissionInfo, FixedWindowLimiter, LimiterConfig};
pub use registry::LimiterRegistry;
pub use window::{WindowRecord, WindowStore};
