// Pipeline orchestration: batch in, report out.

pub mod models;
pub mod normalize;
pub mod registry;
pub mod run;

pub use models::{Outcome, RawIncident, Report};
pub use registry::{ModelRegistry, Models};
pub use run::Pipeline;
