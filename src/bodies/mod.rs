//! Celestial body catalog
//!
//! A [`BodyCatalog`] is the ordered, name-unique list of bodies a scene is
//! built from. It is loaded once (from JSON or from the built-in solar
//! system) and only read afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::constants::EARTH_YEAR_DAYS;
use crate::{OrreryError, Parameter, ParameterError, Result};

/// A body in the scene: the central star, a planet or a moon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelestialBody {
    /// Name of the body, unique within its catalog
    pub name: String,
    /// Time for one full revolution in Earth days
    pub orbital_period_days: f64,
    /// Distance from the orbit center in scene units
    pub orbit_radius: f64,
    /// Body this one orbits, `None` for bodies orbiting the system origin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Period used to pace the animation instead of the real one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_period_days: Option<f64>,
    /// Brief description shown next to the body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CelestialBody {
    /// Create a new body orbiting the system origin
    pub fn new(name: &str, orbital_period_days: f64, orbit_radius: f64) -> Self {
        Self {
            name: name.to_string(),
            orbital_period_days,
            orbit_radius,
            parent: None,
            animation_period_days: None,
            description: None,
        }
    }

    /// Create the central body of a system (radius 0, no parent)
    pub fn central(name: &str) -> Self {
        Self::new(name, EARTH_YEAR_DAYS, 0.0)
    }

    /// Make this body orbit another body
    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    /// Pace the animation with a different period than the real one
    pub fn with_animation_period(mut self, days: f64) -> Self {
        self.animation_period_days = Some(days);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether this body sits at the origin of the system.
    ///
    /// A catalog accepts only one such body, see [`BodyCatalog::central_body`];
    /// it is never animated.
    pub fn is_central(&self) -> bool {
        self.orbit_radius == 0.0 && self.parent.is_none()
    }

    /// Period that drives the keyframe schedule
    pub fn schedule_period_days(&self) -> f64 {
        self.animation_period_days.unwrap_or(self.orbital_period_days)
    }

    /// Check the numeric fields of this body
    pub fn validate(&self) -> Result<()> {
        self.check().map_err(|e| OrreryError::for_body(&self.name, e))
    }

    fn check(&self) -> std::result::Result<(), ParameterError> {
        ParameterError::check_positive(Parameter::OrbitalPeriodDays, self.orbital_period_days)?;
        if let Some(days) = self.animation_period_days {
            ParameterError::check_positive(Parameter::AnimationPeriodDays, days)?;
        }
        ParameterError::check_non_negative(Parameter::OrbitRadius, self.orbit_radius)?;
        if !self.is_central() {
            // Only the central body may sit on its orbit center
            ParameterError::check_positive(Parameter::OrbitRadius, self.orbit_radius)?;
        }
        Ok(())
    }
}

/// Which orbital periods pace the built-in solar system animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodPreset {
    /// Real orbital periods, so every revolution keeps the true ratios
    #[default]
    Real,
    /// Compressed periods so the outer planets visibly move in a short render
    Dramatized,
}

/// On-disk layout of a catalog file
#[derive(Serialize, Deserialize)]
struct CatalogFile {
    bodies: Vec<CelestialBody>,
}

/// Ordered collection of bodies with unique names
#[derive(Debug, Clone, PartialEq)]
pub struct BodyCatalog {
    bodies: Vec<CelestialBody>,
    index: HashMap<String, usize>,
}

impl BodyCatalog {
    /// Build a catalog, keeping the given order
    pub fn from_bodies(bodies: Vec<CelestialBody>) -> Result<Self> {
        let mut index = HashMap::with_capacity(bodies.len());
        for (i, body) in bodies.iter().enumerate() {
            if index.insert(body.name.clone(), i).is_some() {
                return Err(OrreryError::DuplicateBody(body.name.clone()));
            }
        }
        Ok(Self { bodies, index })
    }

    /// Parse a catalog from a JSON string of the form `{"bodies": [...]}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_bodies(file.bodies)
    }

    /// Load a catalog from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json_str(&json)?;
        log::info!("Loaded {} bodies from {}", catalog.len(), path.as_ref().display());
        Ok(catalog)
    }

    /// Serialize the catalog as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        let file = CatalogFile {
            bodies: self.bodies.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Get a body by name
    pub fn get(&self, name: &str) -> Option<&CelestialBody> {
        self.index.get(name).map(|&i| &self.bodies[i])
    }

    /// The central body: the first body in catalog order with no parent
    /// and a zero orbit radius
    pub fn central_body(&self) -> Option<&CelestialBody> {
        self.bodies.iter().find(|body| body.is_central())
    }

    /// Whether `name` is the catalog's central body
    pub fn is_central_body(&self, name: &str) -> bool {
        self.central_body().is_some_and(|body| body.name == name)
    }

    /// Position of a body in catalog order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Iterate over bodies in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    /// Number of bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// The Sun, eight planets and the Moon, laid out on scene-sized orbits
    pub fn solar_system(preset: PeriodPreset) -> Self {
        let bodies = solar_system_bodies(preset);
        // Names in the built-in table are unique
        let index = bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (b.name.clone(), i))
            .collect();
        Self { bodies, index }
    }
}

impl Default for BodyCatalog {
    fn default() -> Self {
        Self::solar_system(PeriodPreset::Real)
    }
}

impl<'a> IntoIterator for &'a BodyCatalog {
    type Item = &'a CelestialBody;
    type IntoIter = std::slice::Iter<'a, CelestialBody>;

    fn into_iter(self) -> Self::IntoIter {
        self.bodies.iter()
    }
}

/// (name, real period in days, dramatized period, orbit radius, parent, description)
type BodyRow = (&'static str, f64, f64, f64, Option<&'static str>, &'static str);

const SOLAR_SYSTEM: [BodyRow; 9] = [
    (
        "Mercury",
        88.0,
        2.0,
        4.0,
        None,
        "Mercury is the smallest planet and closest to the Sun with extreme temperature variations.",
    ),
    (
        "Venus",
        225.0,
        5.0,
        6.0,
        None,
        "Venus is the hottest planet with a thick, toxic atmosphere.",
    ),
    (
        "Earth",
        EARTH_YEAR_DAYS,
        8.0,
        8.0,
        None,
        "Earth is our home planet, the only known world with life and liquid water on its surface.",
    ),
    (
        "Moon",
        27.3,
        0.7,
        0.6,
        Some("Earth"),
        "The Moon is Earth's natural satellite, influencing tides and stabilizing Earth's rotation.",
    ),
    (
        "Mars",
        687.0,
        15.0,
        10.0,
        None,
        "Mars is the Red Planet with polar ice caps, ancient riverbeds and the largest volcano in the solar system.",
    ),
    (
        "Jupiter",
        4333.0,
        95.0,
        13.0,
        None,
        "Jupiter is the largest planet, a gas giant with the Great Red Spot storm.",
    ),
    (
        "Saturn",
        10759.0,
        236.0,
        16.0,
        None,
        "Saturn is famous for its ring system and is the least dense planet in the solar system.",
    ),
    (
        "Uranus",
        30687.0,
        673.0,
        19.0,
        None,
        "Uranus is an ice giant that rotates on its side and has a faint ring system.",
    ),
    (
        "Neptune",
        60190.0,
        1320.0,
        22.0,
        None,
        "Neptune is the windiest planet, colored deep blue by methane.",
    ),
];

fn solar_system_bodies(preset: PeriodPreset) -> Vec<CelestialBody> {
    let sun = CelestialBody::central("Sun").with_description(
        "The Sun is a massive ball of hot plasma that provides light and heat to the solar system.",
    );

    let mut bodies = vec![sun];
    for (name, real, dramatized, radius, parent, description) in SOLAR_SYSTEM {
        let mut body = CelestialBody::new(name, real, radius).with_description(description);
        if let Some(parent) = parent {
            body = body.with_parent(parent);
        }
        if preset == PeriodPreset::Dramatized {
            body = body.with_animation_period(dramatized);
        }
        bodies.push(body);
    }
    bodies
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_solar_system_catalog() {
        let catalog = BodyCatalog::solar_system(PeriodPreset::Real);
        assert_eq!(catalog.len(), 10);

        let sun = catalog.get("Sun").unwrap();
        assert!(sun.is_central());

        let moon = catalog.get("Moon").unwrap();
        assert_eq!(moon.parent.as_deref(), Some("Earth"));
        assert!(!moon.is_central());

        // Parents precede their children
        assert!(catalog.position("Earth").unwrap() < catalog.position("Moon").unwrap());

        for body in &catalog {
            body.validate().unwrap();
        }
    }

    #[test]
    fn test_central_body_is_first_at_origin() {
        let catalog = BodyCatalog::from_bodies(vec![
            CelestialBody::new("Mercury", 88.0, 4.0),
            CelestialBody::central("Sun"),
            CelestialBody::new("Mars", 687.0, 0.0),
        ])
        .unwrap();

        assert_eq!(catalog.central_body().unwrap().name, "Sun");
        assert!(catalog.is_central_body("Sun"));
        assert!(!catalog.is_central_body("Mars"));
        assert!(!catalog.is_central_body("Mercury"));

        let empty = BodyCatalog::from_bodies(Vec::new()).unwrap();
        assert!(empty.central_body().is_none());
    }

    #[test]
    fn test_dramatized_preset_keeps_real_periods() {
        let catalog = BodyCatalog::solar_system(PeriodPreset::Dramatized);
        let neptune = catalog.get("Neptune").unwrap();

        assert_eq!(neptune.orbital_period_days, 60190.0);
        assert_eq!(neptune.schedule_period_days(), 1320.0);

        let real = BodyCatalog::solar_system(PeriodPreset::Real);
        assert_eq!(real.get("Neptune").unwrap().schedule_period_days(), 60190.0);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let bodies = vec![
            CelestialBody::new("Mars", 687.0, 10.0),
            CelestialBody::new("Mars", 700.0, 11.0),
        ];
        match BodyCatalog::from_bodies(bodies) {
            Err(OrreryError::DuplicateBody(name)) => assert_eq!(name, "Mars"),
            other => panic!("Expected DuplicateBody, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let zero_period = CelestialBody::new("Vulcan", 0.0, 2.0);
        match zero_period.validate() {
            Err(OrreryError::InvalidBodyParameter { body, source }) => {
                assert_eq!(body, "Vulcan");
                assert_eq!(source.parameter, Parameter::OrbitalPeriodDays);
            }
            other => panic!("Expected InvalidBodyParameter, got {:?}", other),
        }

        // A moon cannot sit on top of its planet
        let moon = CelestialBody::new("Moon", 27.3, 0.0).with_parent("Earth");
        match moon.validate() {
            Err(OrreryError::InvalidBodyParameter { source, .. }) => {
                assert_eq!(source.parameter, Parameter::OrbitRadius);
            }
            other => panic!("Expected InvalidBodyParameter, got {:?}", other),
        }

        let negative = CelestialBody::new("Rock", 10.0, -1.0);
        assert!(negative.validate().is_err());

        let bad_pacing = CelestialBody::new("Rock", 10.0, 1.0).with_animation_period(-2.0);
        match bad_pacing.validate() {
            Err(OrreryError::InvalidBodyParameter { source, .. }) => {
                assert_eq!(source.parameter, Parameter::AnimationPeriodDays);
            }
            other => panic!("Expected InvalidBodyParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let catalog = BodyCatalog::solar_system(PeriodPreset::Dramatized);
        let json = catalog.to_json().unwrap();

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = BodyCatalog::from_json_file(file.path()).unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_json_optional_fields_default() {
        let json = r#"{"bodies": [
            {"name": "Star", "orbital_period_days": 365.25, "orbit_radius": 0.0},
            {"name": "Rock", "orbital_period_days": 40.0, "orbit_radius": 3.5, "parent": "Star"}
        ]}"#;

        let catalog = BodyCatalog::from_json_str(json).unwrap();
        let star = catalog.get("Star").unwrap();
        assert!(star.is_central());
        assert!(star.description.is_none());
        assert_eq!(catalog.get("Rock").unwrap().parent.as_deref(), Some("Star"));
    }

    #[test]
    fn test_json_malformed() {
        let result = BodyCatalog::from_json_str("{\"bodies\": [{\"name\": 3}]}");
        assert!(matches!(result, Err(OrreryError::Json(_))));
    }
}
