pub mod config;
pub mod degree_steps;
pub mod form;
pub mod logging;
pub mod routing;
pub mod storage;
pub mod sync;
pub mod validate;

pub use degree_steps::DegreeStepSet;
pub use form::{FormState, RangeInputs};
pub use routing::{ClimatologyType, CycloneAvoidance, Integrator, RoutingConfiguration, TimeStep};
pub use sync::{pull, push, ConfigurationSlot, CurrentConfiguration, Pulled, Rejected, SyncController};
pub use validate::{Advisory, ConfigError, Verdict};
