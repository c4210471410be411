//! Training plan generation: requests, the linear model builder and the
//! calendar formatter.

pub mod builder;
pub mod calendar;
pub mod formatter;
pub mod request;
pub mod schedule;

pub use builder::{resolve_workouts, LinearModelBuilder, ModelBuilder};
pub use calendar::CalendarPolicy;
pub use formatter::ScheduleFormatter;
pub use request::{ScheduleRequest, SessionLayout};
pub use schedule::{Day, Schedule, Week};

use tracing::info;

use crate::error::Result;
use crate::random::RandomSource;

/// Build a model with `builder`, generate one emission per calendar slot and
/// format the result.
pub fn generate_plan<B: ModelBuilder>(
    builder: &B,
    request: &ScheduleRequest,
    source: &mut dyn RandomSource,
) -> Result<Schedule> {
    let model = builder.build(request)?;
    let schedule = model.generate_formatted_emissions(
        request.slot_count(),
        &ScheduleFormatter::new(request),
        source,
    )?;
    info!(
        start = %request.start(),
        end = %request.end(),
        weeks = schedule.weeks().len(),
        minutes = schedule.total_minutes(),
        "generated training plan"
    );
    Ok(schedule)
}

/// [`generate_plan`] with the [`LinearModelBuilder`].
pub fn generate_linear_plan(
    request: &ScheduleRequest,
    source: &mut dyn RandomSource,
) -> Result<Schedule> {
    generate_plan(&LinearModelBuilder::new(), request, source)
}
