//! Planning configuration
//!
//! Every knob that is not a property of a single body: how days map to
//! frames, where the animation starts, which Earth age is scaled and how a
//! host should make the orbits repeat.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::{
    DEFAULT_FRAMES_PER_DAY, DEFAULT_REFERENCE_AGE_YEARS, DEFAULT_START_FRAME, EARTH_YEAR_DAYS,
};
use crate::orbit::{LoopStrategy, DEFAULT_LOOP_PREFERENCE};
use crate::{Parameter, ParameterError, Result};

/// Configuration shared by every body in a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Animation frames per Earth day
    pub frames_per_day: f64,
    /// Frame of the first keyframe
    pub start_frame: i64,
    /// Earth age to scale onto every body
    pub reference_age_years: f64,
    /// Length of the Earth year in days
    pub earth_year_length_days: f64,
    /// Loop strategies to try, most preferred first
    pub loop_preference: Vec<LoopStrategy>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            frames_per_day: DEFAULT_FRAMES_PER_DAY,
            start_frame: DEFAULT_START_FRAME,
            reference_age_years: DEFAULT_REFERENCE_AGE_YEARS,
            earth_year_length_days: EARTH_YEAR_DAYS,
            loop_preference: DEFAULT_LOOP_PREFERENCE.to_vec(),
        }
    }
}

impl PlanConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of animation frames per Earth day
    pub fn with_frames_per_day(mut self, frames_per_day: f64) -> Self {
        self.frames_per_day = frames_per_day;
        self
    }

    /// Set the frame of the first keyframe
    pub fn with_start_frame(mut self, start_frame: i64) -> Self {
        self.start_frame = start_frame;
        self
    }

    /// Set the Earth age to scale
    pub fn with_reference_age(mut self, years: f64) -> Self {
        self.reference_age_years = years;
        self
    }

    /// Set the length of the Earth year in days
    pub fn with_earth_year_length(mut self, days: f64) -> Self {
        self.earth_year_length_days = days;
        self
    }

    /// Set the loop strategy preference order
    pub fn with_loop_preference(mut self, preference: Vec<LoopStrategy>) -> Self {
        self.loop_preference = preference;
        self
    }

    /// Check every numeric value at once.
    ///
    /// Planning reports these per body anyway; this lets a caller stop
    /// before planning anything.
    pub fn validate(&self) -> Result<()> {
        self.check()?;
        Ok(())
    }

    pub(crate) fn check(&self) -> std::result::Result<(), ParameterError> {
        ParameterError::check_positive(Parameter::FramesPerDay, self.frames_per_day)?;
        ParameterError::check_positive(Parameter::ReferenceAgeYears, self.reference_age_years)?;
        ParameterError::check_positive(
            Parameter::EarthYearLengthDays,
            self.earth_year_length_days,
        )?;
        Ok(())
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded plan configuration from {}", path.as_ref().display());
        Ok(config)
    }
}
