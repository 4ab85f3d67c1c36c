pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod policy;
pub mod schema;

pub use config::PolicyConfig;
pub use error::AuditError;
pub use model::{Finding, SchemaKind, Severity, SeverityCounts};
pub use pipeline::AuditOutcome;
pub use policy::Verdict;
