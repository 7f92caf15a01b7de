//! Early-withdrawal penalties by year of holding

mod schedule;

pub use schedule::{
    elapsed_years, holding_year, holding_year_for_years, resolve_penalty_percentage,
    GraduatedPenaltySchedule,
};
