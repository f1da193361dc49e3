mod constants;
pub use constants::{CPUS, MEM, PORTS};

mod ids;
pub use ids::{AgentId, OfferId, TaskId};

mod resource;
pub use resource::{Resource, ResourceValue, ValueRange};

mod offer;
pub use offer::Offer;

mod requirement;
pub use requirement::ResourceRequirement;

mod filters;
pub use filters::Filters;

mod task_state;
pub use task_state::TaskState;

mod status;
pub use status::StatusReport;

mod task_record;
pub use task_record::TaskRecord;

mod task_query;
pub use task_query::{TaskPage, TaskQuery};

/// Hostname of the agent an offer (and therefore a task) belongs to.
pub type Hostname = String;
