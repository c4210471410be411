//! Hidden Markov model core: states, the validated model and the formatter seam.

pub mod formatter;
pub mod model;
pub mod state;

pub use formatter::{EmissionFormatter, RawFormatter};
pub use model::MarkovModel;
pub use state::{HiddenState, StateKey};
