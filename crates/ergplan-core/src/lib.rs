//! # ergplan Core Library
//!
//! Generates rowing training plans with a hidden Markov model and lays them
//! onto a calendar. The `ergplan-cli` binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Distributions**: validation and weighted sampling over an injectable
//!   [`RandomSource`]
//! - **Markov model**: closed set of hidden states that emit workouts
//! - **Plan**: request validation, the linear-progression model builder and
//!   the schedule formatter
//! - **Config**: TOML-based planner tunables
//!
//! ## Key Components
//!
//! - [`MarkovModel`]: validated model and sequence generation
//! - [`LinearModelBuilder`]: request to model
//! - [`ScheduleFormatter`]: emissions to [`Schedule`]
//! - [`PlanConfig`]: planner configuration

pub mod config;
pub mod distribution;
pub mod emission;
pub mod error;
pub mod markov;
pub mod plan;
pub mod random;
pub mod workout;

pub use config::PlanConfig;
pub use distribution::{Distribution, PROBABILITY_TOLERANCE};
pub use emission::Emission;
pub use error::{ConfigError, CoreError, PlanError, Result};
pub use markov::{EmissionFormatter, HiddenState, MarkovModel, RawFormatter, StateKey};
pub use plan::{
    generate_linear_plan, generate_plan, CalendarPolicy, Day, LinearModelBuilder, ModelBuilder,
    Schedule, ScheduleFormatter, ScheduleRequest, SessionLayout, Week,
};
pub use random::{reseed_shared, with_shared_source, FixedDraws, RandomSource, SeededSource};
pub use workout::{Intensity, Workout};
