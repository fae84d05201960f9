//! Constants module for orbit planning and age scaling

use std::f64::consts::PI;

// Angles
/// Tau (2*PI) for a full revolution
pub const TAU: f64 = 2.0 * PI;

// Time constants
/// Length of the Earth year in days (Julian year)
pub const EARTH_YEAR_DAYS: f64 = 365.25;

// Animation defaults
/// Animation frames per simulated Earth day
pub const DEFAULT_FRAMES_PER_DAY: f64 = 24.0;
/// First keyframe of every orbit schedule
pub const DEFAULT_START_FRAME: i64 = 1;
/// Shortest frame span a schedule may have
pub const MIN_FRAME_SPAN: i64 = 1;

// Age scaling
/// Reference Earth age used when none is given
pub const DEFAULT_REFERENCE_AGE_YEARS: f64 = 20.0;
