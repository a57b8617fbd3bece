//! Configuration validation utilities.
//!
//! This module provides the field-level checks used when turning raw
//! `net_params` into validated geometry, plus consistency checks for
//! vehicle types and initial placement.

use std::collections::BTreeMap;

use crate::config::{PositionSpec, ValidationError, VehicleTypeConfig};
use crate::topology::NetParam;

/// A single problem with one `net_params` field
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("{0} not supplied")]
    Missing(NetParam),
    #[error("{param} must be a finite number, got {value}")]
    NotFinite { param: NetParam, value: f64 },
    #[error("{param} must be positive, got {value}")]
    NotPositive { param: NetParam, value: f64 },
    #[error("{param} = {value} makes the circuit length overflow")]
    Overflow { param: NetParam, value: f64 },
}

impl ParamError {
    /// The field this problem concerns
    pub fn param(&self) -> NetParam {
        match self {
            ParamError::Missing(param)
            | ParamError::NotFinite { param, .. }
            | ParamError::NotPositive { param, .. }
            | ParamError::Overflow { param, .. } => *param,
        }
    }
}

/// Check that a real-valued field is present, finite and strictly positive,
/// returning its value
///
/// # Examples
/// ```
/// use circuitnet::topology::NetParam;
/// use circuitnet::utils::validation::check_positive_real;
///
/// assert!(check_positive_real(NetParam::RadiusRing, Some(20.0)).is_ok());
/// assert!(check_positive_real(NetParam::RadiusRing, Some(0.0)).is_err());
/// assert!(check_positive_real(NetParam::RadiusRing, None).is_err());
/// ```
pub fn check_positive_real(param: NetParam, value: Option<f64>) -> Result<f64, ParamError> {
    let value = value.ok_or(ParamError::Missing(param))?;
    if !value.is_finite() {
        return Err(ParamError::NotFinite { param, value });
    }
    if value <= 0.0 {
        return Err(ParamError::NotPositive { param, value });
    }
    Ok(value)
}

/// Check that an integer field is present and at least 1, returning its value
pub fn check_count(param: NetParam, value: Option<u32>) -> Result<u32, ParamError> {
    match value {
        None => Err(ParamError::Missing(param)),
        Some(0) => Err(ParamError::NotPositive { param, value: 0.0 }),
        Some(count) => Ok(count),
    }
}

/// Validate vehicle type definitions
///
/// Checks for:
/// - Non-empty type names (they prefix vehicle ids)
/// - Non-empty controller and lane changer model names
/// - Finite extra parameter
///
/// A type with a zero count is allowed but logged, since it adds no vehicles.
pub fn validate_vehicle_types(
    types: &BTreeMap<String, VehicleTypeConfig>,
) -> Result<(), ValidationError> {
    for (name, vehicle_type) in types {
        let invalid = |reason: &str| ValidationError::InvalidVehicleType {
            name: name.clone(),
            reason: reason.to_string(),
        };

        if name.trim().is_empty() {
            return Err(invalid("type name cannot be empty"));
        }
        if vehicle_type.controller.model.trim().is_empty() {
            return Err(invalid("controller model cannot be empty"));
        }
        if vehicle_type.lane_changer.model.trim().is_empty() {
            return Err(invalid("lane changer model cannot be empty"));
        }
        if !vehicle_type.extra.is_finite() {
            return Err(invalid("extra parameter must be finite"));
        }
        if vehicle_type.count == 0 {
            log::warn!("Vehicle type '{}' has count 0 and adds no vehicles", name);
        }
    }
    Ok(())
}

/// Validate explicit initial positions against the circuit's edges
///
/// `edge_lengths` maps every edge id of the circuit to its length. Each
/// position must name a known edge, lie before that edge's end, use a lane
/// the circuit has, and not coincide with another vehicle.
pub fn validate_explicit_positions(
    positions: &[PositionSpec],
    vehicle_count: usize,
    edge_lengths: &BTreeMap<String, f64>,
    lanes: u32,
) -> Result<(), ValidationError> {
    if positions.len() != vehicle_count {
        return Err(ValidationError::InvalidInitialConfig(format!(
            "{} explicit positions given for {} vehicles",
            positions.len(),
            vehicle_count
        )));
    }

    for (i, spec) in positions.iter().enumerate() {
        let Some(&length) = edge_lengths.get(&spec.edge) else {
            return Err(ValidationError::InvalidInitialConfig(format!(
                "unknown edge '{}' in explicit positions",
                spec.edge
            )));
        };
        if spec.position >= length {
            return Err(ValidationError::InvalidInitialConfig(format!(
                "position {} is past the end of edge '{}' (length {:.2})",
                spec.position, spec.edge, length
            )));
        }
        if spec.lane >= lanes {
            return Err(ValidationError::InvalidInitialConfig(format!(
                "lane {} on edge '{}' out of range (circuit has {} lanes)",
                spec.lane, spec.edge, lanes
            )));
        }
        let taken = positions[..i]
            .iter()
            .any(|p| p.edge == spec.edge && p.lane == spec.lane && p.position == spec.position);
        if taken {
            return Err(ValidationError::InvalidInitialConfig(format!(
                "two vehicles start at position {} of edge '{}', lane {}",
                spec.position, spec.edge, spec.lane
            )));
        }
    }
    Ok(())
}

/// Validate that bunching leaves room for the vehicles on the circuit
pub fn validate_bunching(bunching: f64, total_length: f64) -> Result<(), ValidationError> {
    if bunching >= total_length {
        return Err(ValidationError::InvalidInitialConfig(format!(
            "bunching {:.2} leaves no room on a circuit of length {:.2}",
            bunching, total_length
        )));
    }
    Ok(())
}
