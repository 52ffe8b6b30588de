pub mod completion;
pub mod error;
pub mod gate;
pub mod runner;
pub mod state;
pub mod storage;
pub mod task;
pub mod tasks;
pub mod weather;
pub mod workflow;

// Re-export commonly used types
pub use completion::{DEFAULT_MODEL, TextCompletion};
#[cfg(feature = "rig")]
pub use completion::OpenRouterCompletion;
pub use error::{FlowError, Result};
pub use gate::{ACCEPT_RATING, Decision, decide, decision_log};
pub use runner::FlowRunner;
pub use state::{DEFAULT_MAX_ATTEMPTS, OutfitRequest, OutfitState, StateUpdate, Weather, WeatherSource};
pub use storage::{InMemorySessionStorage, Session, SessionStorage};
pub use task::{Task, TaskResult};
pub use weather::{FallbackTable, StaticWeather, WeatherProvider};
pub use workflow::{ExecutionResult, ExecutionStatus, Step, Workflow, WorkflowBuilder};
