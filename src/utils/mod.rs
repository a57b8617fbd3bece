//! Shared utilities: parameter and placement validation.

pub mod validation;

pub use validation::{
    check_count, check_positive_real, validate_bunching, validate_explicit_positions,
    validate_vehicle_types, ParamError,
};
