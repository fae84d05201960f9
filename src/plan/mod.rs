//! Catalog planning
//!
//! Runs the orbit and age computations over a whole catalog and gathers
//! one [`BodyPlan`] per body. A body that fails validation is reported and
//! left out; the rest of the catalog is still planned.

use serde::{Serialize, Serializer};

use crate::age::AgeResult;
use crate::bodies::{BodyCatalog, CelestialBody};
use crate::config::PlanConfig;
use crate::orbit::{compute_schedule, AnimationSchedule};
use crate::{OrreryError, Parameter, ParameterError, Result};

/// Everything a scene host needs to build one body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyPlan {
    /// Name of the body this plan belongs to
    pub name: String,
    /// Body whose orbit center carries this body's orbit center
    pub parent: Option<String>,
    /// Whether this is the unanimated body at the origin
    pub central: bool,
    /// Distance of the body from its orbit center
    pub orbit_radius: f64,
    /// Distance of the orbit center from its parent's orbit center
    pub center_offset: f64,
    pub description: Option<String>,
    /// Rotation keyframes of the orbit center, `None` for the central body
    pub schedule: Option<AnimationSchedule>,
    pub age: AgeResult,
    /// Text shown next to the body
    pub label: String,
}

/// A body left out of a plan and why
#[derive(Debug, Serialize)]
pub struct Rejection {
    pub body: String,
    #[serde(serialize_with = "serialize_error")]
    pub error: OrreryError,
}

fn serialize_error<S: Serializer>(
    error: &OrreryError,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Planned bodies in catalog order plus the bodies that were rejected
#[derive(Debug, Default, Serialize)]
pub struct CatalogPlan {
    pub bodies: Vec<BodyPlan>,
    pub rejected: Vec<Rejection>,
}

impl CatalogPlan {
    /// Get the plan of a body by name
    pub fn get(&self, name: &str) -> Option<&BodyPlan> {
        self.bodies.iter().find(|plan| plan.name == name)
    }

    /// Whether every body in the catalog was planned
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }

    /// First and last keyed frame over all schedules.
    ///
    /// The scene should play at least this range so the slowest orbit
    /// completes one revolution.
    pub fn frame_range(&self) -> Option<(i64, i64)> {
        self.bodies
            .iter()
            .filter_map(|plan| plan.schedule.as_ref())
            .fold(None, |range, schedule| {
                let (start, end) = range.unwrap_or((schedule.start_frame, schedule.end_frame));
                Some((start.min(schedule.start_frame), end.max(schedule.end_frame)))
            })
    }
}

/// Plan a single body of `catalog`
pub fn plan_body(
    catalog: &BodyCatalog,
    body: &CelestialBody,
    config: &PlanConfig,
) -> Result<BodyPlan> {
    body.validate()?;
    config.check().map_err(|e| OrreryError::for_body(&body.name, e))?;

    let central = body.is_central();
    if central && !catalog.is_central_body(&body.name) {
        // A second body at the origin is an orbiting body missing its radius
        return Err(OrreryError::for_body(
            &body.name,
            ParameterError {
                parameter: Parameter::OrbitRadius,
                value: body.orbit_radius,
                reason: "only the central body may have a zero orbit radius",
            },
        ));
    }

    let center_offset = match &body.parent {
        Some(parent_name) => resolve_parent(catalog, body, parent_name)?.orbit_radius,
        None => 0.0,
    };

    let schedule = if central {
        None
    } else {
        Some(compute_schedule(body, config.frames_per_day, config.start_frame)?)
    };

    let age = AgeResult::for_body(body, config.reference_age_years, config.earth_year_length_days)?;

    Ok(BodyPlan {
        name: body.name.clone(),
        parent: body.parent.clone(),
        central,
        orbit_radius: body.orbit_radius,
        center_offset,
        description: body.description.clone(),
        schedule,
        label: age.label(&body.name, central),
        age,
    })
}

fn resolve_parent<'a>(
    catalog: &'a BodyCatalog,
    body: &CelestialBody,
    parent_name: &str,
) -> Result<&'a CelestialBody> {
    let unknown = || OrreryError::UnknownParent {
        body: body.name.clone(),
        parent: parent_name.to_string(),
    };
    if parent_name == body.name {
        return Err(unknown());
    }
    let parent = catalog.get(parent_name).ok_or_else(unknown)?;

    // Walk up the ancestry; a chain longer than the catalog must loop
    let mut ancestor = parent;
    for _ in 0..catalog.len() {
        match ancestor.parent.as_deref().and_then(|name| catalog.get(name)) {
            Some(next) if next.name == body.name => {
                return Err(OrreryError::ParentCycle(body.name.clone()));
            }
            Some(next) => ancestor = next,
            None => return Ok(parent),
        }
    }
    Err(OrreryError::ParentCycle(body.name.clone()))
}

/// Plan every body of `catalog`, in catalog order
pub fn plan_catalog(catalog: &BodyCatalog, config: &PlanConfig) -> CatalogPlan {
    let mut plan = CatalogPlan::default();

    for body in catalog {
        match plan_body(catalog, body, config) {
            Ok(body_plan) => plan.bodies.push(body_plan),
            Err(error) => {
                log::warn!("Skipping {}: {}", body.name, error);
                plan.rejected.push(Rejection {
                    body: body.name.clone(),
                    error,
                });
            }
        }
    }

    log::info!("Planned {} of {} bodies", plan.bodies.len(), catalog.len());
    plan
}
