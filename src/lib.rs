// Library interface for planrs modules
// This allows integration tests to access the core functionality

pub mod catalog;
pub mod config;
pub mod error;
pub mod execution;
pub mod export;
pub mod logging;
pub mod models;
pub mod planner;
pub mod profile;
pub mod stats;
pub mod store;

// Re-export commonly used types for convenience
pub use catalog::{CatalogStats, ExerciseCatalog, ExerciseFilter};
pub use error::{PlanrsError, Result};
pub use execution::{SetOutcome, WorkoutExecution};
pub use logging::{init_logging, LogConfig, LogLevel};
pub use models::*;
pub use planner::{today, WorkoutBuilder};
pub use profile::{calculate_bmi, BmiCategory};
pub use stats::{StatsCalculator, StatsPeriod, StatsSummary};
pub use store::{BlobStore, FileStore, MemoryStore};
