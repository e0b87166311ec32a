//! Schema layer
//!
//! Declarative field and rule definitions, compiled into a pure validator:
//! - `field`: field specs, constraints and values
//! - `rule`: cross-field rules
//! - `snapshot`: immutable value snapshots
//! - `validator`: compilation and the validation pass

mod field;
mod rule;
mod snapshot;
mod validator;

pub use field::{Constraint, FieldKind, FieldSpec, FieldValue, Visibility, REQUIRED_MESSAGE};
pub use rule::CrossFieldRule;
pub use snapshot::ValueSnapshot;
pub use validator::{FormSchema, SchemaError, SchemaValidator, ValidationResult, ROOT_FIELD};
