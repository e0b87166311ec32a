//! formgate - schema-driven form validation
//!
//! Compiles a declarative field/constraint schema into a pure validator and
//! wraps it in a controller that tracks values, derives whether submission
//! is allowed, and runs a single-flight async submission.

pub mod backend;
pub mod config;
pub mod form;
pub mod presets;
pub mod schema;
