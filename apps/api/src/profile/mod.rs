// Versioned profile schema plus the assembly/validation layer between
// extractor output and the stored profile record.

pub mod schema;
pub mod validator;

pub use schema::{ProfileRecord, SCHEMA_VERSION};
pub use validator::{transform, validate_profile, ValidationOutcome};
