mod plan;

pub use plan::{ParsedPlan, PlanMetadata, ScheduleItem};
