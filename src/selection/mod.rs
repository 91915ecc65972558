pub mod eligibility;

pub use eligibility::{draw_activity, eligible_activities, EligibilityContext};
