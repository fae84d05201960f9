//! Orrery: orbital keyframe schedules and planetary age scaling
//!
//! This crate computes the host-independent part of a procedurally built
//! solar-system scene: for every body in a catalog, the two rotation
//! keyframes that drive one full revolution of its orbit center, and the
//! age a person of a given Earth age would have on that body. The results
//! are handed to a [`scene::SceneHost`], which owns geometry, materials,
//! hierarchy and playback.

use std::fmt;
use thiserror::Error;

pub mod age;
pub mod bodies;
pub mod config;
pub mod constants;
pub mod orbit;
pub mod plan;
pub mod scene;

// Re-export commonly used types
pub use age::{equivalent_age, AgeResult};
pub use bodies::{BodyCatalog, CelestialBody, PeriodPreset};
pub use config::PlanConfig;
pub use orbit::{compute_schedule, negotiate_loop, AnimationSchedule, Interpolation, LoopStrategy};
pub use plan::{plan_body, plan_catalog, BodyPlan, CatalogPlan};
pub use scene::{build_scene, RecordingHost, SceneHost, SceneReport};

/// Numeric inputs that are validated before any computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    OrbitalPeriodDays,
    AnimationPeriodDays,
    OrbitRadius,
    FramesPerDay,
    EarthYearLengthDays,
    ReferenceAgeYears,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Parameter::OrbitalPeriodDays => "orbital_period_days",
            Parameter::AnimationPeriodDays => "animation_period_days",
            Parameter::OrbitRadius => "orbit_radius",
            Parameter::FramesPerDay => "frames_per_day",
            Parameter::EarthYearLengthDays => "earth_year_length_days",
            Parameter::ReferenceAgeYears => "reference_age_years",
        };
        f.write_str(name)
    }
}

/// A numeric input outside its valid range
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{parameter} = {value}: {reason}")]
pub struct ParameterError {
    /// Which input was rejected
    pub parameter: Parameter,
    /// The offending value
    pub value: f64,
    /// Short explanation of the constraint
    pub reason: &'static str,
}

impl ParameterError {
    /// Require `value` to be finite and strictly positive
    pub fn check_positive(parameter: Parameter, value: f64) -> std::result::Result<f64, Self> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(Self {
                parameter,
                value,
                reason: "must be positive and finite",
            })
        }
    }

    /// Require `value` to be finite and not negative
    pub fn check_non_negative(parameter: Parameter, value: f64) -> std::result::Result<f64, Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(Self {
                parameter,
                value,
                reason: "must be non-negative and finite",
            })
        }
    }
}

/// Main error type for the orrery library
#[derive(Debug, Error)]
pub enum OrreryError {
    #[error("Invalid parameter for body '{body}': {source}")]
    InvalidBodyParameter {
        /// Name of the offending body
        body: String,
        source: ParameterError,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),

    #[error("Duplicate body name: {0}")]
    DuplicateBody(String),

    #[error("Body '{body}' references unknown parent '{parent}'")]
    UnknownParent { body: String, parent: String },

    #[error("Body '{0}' is part of a parent cycle")]
    ParentCycle(String),

    #[error("Host supports none of the requested loop strategies {requested:?}")]
    UnsupportedLoopStrategy { requested: Vec<LoopStrategy> },

    #[error("Scene host error: {0}")]
    Host(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OrreryError {
    /// Attach a body name to a bare parameter error
    pub fn for_body(body: &str, source: ParameterError) -> Self {
        OrreryError::InvalidBodyParameter {
            body: body.to_string(),
            source,
        }
    }

    /// Name of the body this error concerns, if any
    pub fn body(&self) -> Option<&str> {
        match self {
            OrreryError::InvalidBodyParameter { body, .. } => Some(body),
            OrreryError::UnknownParent { body, .. } => Some(body),
            OrreryError::DuplicateBody(body) => Some(body),
            OrreryError::ParentCycle(body) => Some(body),
            _ => None,
        }
    }
}

/// Result type for orrery operations
pub type Result<T> = std::result::Result<T, OrreryError>;
