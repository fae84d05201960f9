//! Age scaling between planetary years
//!
//! "Your age on Mars" is the number of Martian years that pass during a
//! given number of Earth years, so an Earth age is scaled by the ratio of
//! the two year lengths.

use serde::{Deserialize, Serialize};

use crate::bodies::CelestialBody;
use crate::{OrreryError, Parameter, ParameterError, Result};

/// Scale `reference_age_years` from Earth years to years of a body with
/// the given orbital period.
///
/// # Examples
///
/// ```rust
/// use orrery::age::equivalent_age;
///
/// let on_mercury = equivalent_age(20.0, 88.0, 365.25).unwrap();
/// assert!((on_mercury - 83.01).abs() < 0.01);
/// ```
pub fn equivalent_age(
    reference_age_years: f64,
    orbital_period_days: f64,
    earth_year_length_days: f64,
) -> Result<f64> {
    let reference =
        ParameterError::check_positive(Parameter::ReferenceAgeYears, reference_age_years)?;
    let scale = scale_factor(orbital_period_days, earth_year_length_days)?;
    Ok(reference * scale)
}

fn scale_factor(
    orbital_period_days: f64,
    earth_year_length_days: f64,
) -> std::result::Result<f64, ParameterError> {
    let period = ParameterError::check_positive(Parameter::OrbitalPeriodDays, orbital_period_days)?;
    let year =
        ParameterError::check_positive(Parameter::EarthYearLengthDays, earth_year_length_days)?;
    if period == year {
        return Ok(1.0);
    }
    Ok(year / period)
}

/// Equivalent age of a reference Earth age on one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeResult {
    pub reference_age_years: f64,
    /// Earth year length divided by the body's orbital period
    pub scale_factor: f64,
    pub equivalent_age_years: f64,
}

impl AgeResult {
    /// Scale a reference age onto `body`.
    ///
    /// The central body does not orbit anything, so its years are Earth
    /// years and the reference age is returned unchanged.
    pub fn for_body(
        body: &CelestialBody,
        reference_age_years: f64,
        earth_year_length_days: f64,
    ) -> Result<Self> {
        body.validate()?;
        Self::compute(body, reference_age_years, earth_year_length_days)
            .map_err(|e| OrreryError::for_body(&body.name, e))
    }

    fn compute(
        body: &CelestialBody,
        reference_age_years: f64,
        earth_year_length_days: f64,
    ) -> std::result::Result<Self, ParameterError> {
        let reference_age_years =
            ParameterError::check_positive(Parameter::ReferenceAgeYears, reference_age_years)?;
        let scale_factor = if body.is_central() {
            ParameterError::check_positive(Parameter::EarthYearLengthDays, earth_year_length_days)?;
            1.0
        } else {
            scale_factor(body.orbital_period_days, earth_year_length_days)?
        };

        Ok(Self {
            reference_age_years,
            scale_factor,
            equivalent_age_years: reference_age_years * scale_factor,
        })
    }

    /// Text of the label a host shows next to the body
    pub fn label(&self, name: &str, is_central: bool) -> String {
        if is_central {
            format!("{}\n(Our Star)", name)
        } else {
            format!("{}\nAge: {:.1} years", name, self.equivalent_age_years)
        }
    }
}
