//! Scene host boundary
//!
//! A [`SceneHost`] is the 3D application that turns a plan into objects:
//! it creates geometry and materials, builds the orbit-center hierarchy,
//! keys the rotations and plays them back. [`build_scene`] drives any host
//! through a [`CatalogPlan`] in an order the host can follow without looking
//! objects up by name.

use std::collections::HashMap;
use std::fmt;

use crate::config::PlanConfig;
use crate::orbit::{negotiate_loop, AnimationSchedule, Interpolation, LoopStrategy};
use crate::plan::{BodyPlan, CatalogPlan};
use crate::{OrreryError, Result};

/// Handle to a transform node owned by the host
pub type NodeId = usize;

/// Operations a 3D host must provide to build a planned system
pub trait SceneHost {
    /// Loop strategies the host can apply to an animation curve
    fn supported_loop_strategies(&self) -> Vec<LoopStrategy>;

    /// Create the transform node a body orbits on.
    ///
    /// The node sits `offset` units along +X from `parent`, or from the
    /// origin when there is no parent.
    fn create_orbit_center(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        offset: f64,
    ) -> Result<NodeId>;

    /// Create the body itself, `plan.orbit_radius` units along +X of its
    /// orbit center (or at the origin for the central body), together with
    /// its label and description.
    fn attach_body(&mut self, center: Option<NodeId>, plan: &BodyPlan) -> Result<()>;

    /// Key the Z rotation of a node at a frame
    fn insert_rotation_keyframe(
        &mut self,
        node: NodeId,
        frame: i64,
        angle_radians: f64,
    ) -> Result<()>;

    /// Set the interpolation of every key on a node
    fn set_interpolation(&mut self, node: NodeId, interpolation: Interpolation) -> Result<()>;

    /// Make the node's rotation repeat after its last key
    fn loop_animation(&mut self, node: NodeId, strategy: LoopStrategy) -> Result<()>;

    /// Set the playback range of the scene
    fn set_frame_range(&mut self, start: i64, end: i64) -> Result<()>;
}

/// What [`build_scene`] handed to the host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneReport {
    /// Bodies created, in creation order
    pub built: Vec<String>,
    /// Bodies left out because their parent was never built
    pub skipped: Vec<String>,
    /// Schedules as keyed on the host
    pub schedules: Vec<(String, AnimationSchedule)>,
    /// Loop strategy applied to every orbit
    pub loop_strategy: Option<LoopStrategy>,
    /// Orbits were keyed but could not be made to repeat
    pub degraded: bool,
}

/// Build every planned body on `host`.
///
/// Parents are built before their children. When the host supports none of
/// the configured loop strategies the orbits are keyed without looping and
/// the report is marked degraded.
pub fn build_scene<H: SceneHost + ?Sized>(
    host: &mut H,
    plan: &CatalogPlan,
    config: &PlanConfig,
) -> Result<SceneReport> {
    let mut report = SceneReport::default();

    match negotiate_loop(&config.loop_preference, &host.supported_loop_strategies()) {
        Ok(strategy) => report.loop_strategy = Some(strategy),
        Err(e) => {
            report.degraded = plan.bodies.iter().any(|b| b.schedule.is_some());
            if report.degraded {
                log::warn!("{}; orbits will play once", e);
            }
        }
    }

    // Orbit center of every built body; `None` for the central body
    let mut centers: HashMap<&str, Option<NodeId>> = HashMap::new();
    let mut pending: Vec<&BodyPlan> = plan.bodies.iter().collect();

    while !pending.is_empty() {
        let before = pending.len();
        let mut deferred = Vec::new();

        for body in pending {
            let parent_node = match body.parent.as_deref() {
                None => None,
                Some(parent) => match centers.get(parent) {
                    Some(node) => *node,
                    None => {
                        deferred.push(body);
                        continue;
                    }
                },
            };
            let center = build_body(host, body, parent_node, &mut report)?;
            centers.insert(&body.name, center);
        }

        if deferred.len() == before {
            for body in &deferred {
                log::warn!("Skipping {}: parent {:?} was not built", body.name, body.parent);
                report.skipped.push(body.name.clone());
            }
            break;
        }
        pending = deferred;
    }

    // Only bodies that were actually keyed count toward the scene range
    let range = report.schedules.iter().fold(None, |range, (_, schedule)| {
        let (start, end) = range.unwrap_or((schedule.start_frame, schedule.end_frame));
        Some((start.min(schedule.start_frame), end.max(schedule.end_frame)))
    });
    if let Some((start, end)) = range {
        host.set_frame_range(start, end)?;
    }

    Ok(report)
}

fn build_body<H: SceneHost + ?Sized>(
    host: &mut H,
    body: &BodyPlan,
    parent: Option<NodeId>,
    report: &mut SceneReport,
) -> Result<Option<NodeId>> {
    let Some(schedule) = body.schedule else {
        host.attach_body(None, body)?;
        report.built.push(body.name.clone());
        return Ok(None);
    };

    let center = host.create_orbit_center(&body.name, parent, body.center_offset)?;
    host.attach_body(Some(center), body)?;

    host.insert_rotation_keyframe(center, schedule.start_frame, schedule.start_angle_radians)?;
    host.insert_rotation_keyframe(center, schedule.end_frame, schedule.end_angle_radians)?;
    host.set_interpolation(center, schedule.interpolation)?;

    let keyed = match report.loop_strategy {
        Some(strategy) => {
            host.loop_animation(center, strategy)?;
            schedule
        }
        None => schedule.without_looping(),
    };

    report.built.push(body.name.clone());
    report.schedules.push((body.name.clone(), keyed));
    Ok(Some(center))
}

/// A call made on a [`RecordingHost`]
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    CreateOrbitCenter {
        node: NodeId,
        name: String,
        parent: Option<NodeId>,
        offset: f64,
    },
    AttachBody {
        center: Option<NodeId>,
        body: String,
        label: String,
    },
    InsertKeyframe {
        node: NodeId,
        frame: i64,
        angle_radians: f64,
    },
    SetInterpolation {
        node: NodeId,
        interpolation: Interpolation,
    },
    LoopAnimation {
        node: NodeId,
        strategy: LoopStrategy,
    },
    SetFrameRange {
        start: i64,
        end: i64,
    },
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostCommand::CreateOrbitCenter {
                node,
                name,
                parent,
                offset,
            } => match parent {
                Some(p) => write!(
                    f,
                    "node {}: {}_Orbit_Center under node {} at x={}",
                    node, name, p, offset
                ),
                None => write!(f, "node {}: {}_Orbit_Center at x={}", node, name, offset),
            },
            HostCommand::AttachBody {
                center,
                body,
                label,
            } => {
                let label = label.replace('\n', " / ");
                match center {
                    Some(c) => write!(f, "attach {} to node {} [{}]", body, c, label),
                    None => write!(f, "attach {} at origin [{}]", body, label),
                }
            }
            HostCommand::InsertKeyframe {
                node,
                frame,
                angle_radians,
            } => write!(f, "key node {} rot_z={:.6} @ frame {}", node, angle_radians, frame),
            HostCommand::SetInterpolation {
                node,
                interpolation,
            } => write!(f, "node {} interpolation {:?}", node, interpolation),
            HostCommand::LoopAnimation { node, strategy } => {
                write!(f, "node {} loop {:?}", node, strategy)
            }
            HostCommand::SetFrameRange { start, end } => {
                write!(f, "frame range {}..={}", start, end)
            }
        }
    }
}

/// In-memory host that records every call
#[derive(Debug, Clone)]
pub struct RecordingHost {
    supported: Vec<LoopStrategy>,
    commands: Vec<HostCommand>,
    next_node: NodeId,
}

impl RecordingHost {
    /// Create a host supporting every loop strategy
    pub fn new() -> Self {
        Self::with_loop_strategies(vec![LoopStrategy::Cycles, LoopStrategy::Repeat])
    }

    /// Create a host supporting only the given loop strategies
    pub fn with_loop_strategies(supported: Vec<LoopStrategy>) -> Self {
        Self {
            supported,
            commands: Vec::new(),
            next_node: 0,
        }
    }

    /// Calls recorded so far
    pub fn commands(&self) -> &[HostCommand] {
        &self.commands
    }

    fn check_node(&self, node: NodeId) -> Result<()> {
        if node < self.next_node {
            Ok(())
        } else {
            Err(OrreryError::Host(format!("unknown node {}", node)))
        }
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneHost for RecordingHost {
    fn supported_loop_strategies(&self) -> Vec<LoopStrategy> {
        self.supported.clone()
    }

    fn create_orbit_center(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        offset: f64,
    ) -> Result<NodeId> {
        if let Some(parent) = parent {
            self.check_node(parent)?;
        }
        let node = self.next_node;
        self.next_node += 1;
        self.commands.push(HostCommand::CreateOrbitCenter {
            node,
            name: name.to_string(),
            parent,
            offset,
        });
        Ok(node)
    }

    fn attach_body(&mut self, center: Option<NodeId>, plan: &BodyPlan) -> Result<()> {
        if let Some(center) = center {
            self.check_node(center)?;
        }
        self.commands.push(HostCommand::AttachBody {
            center,
            body: plan.name.clone(),
            label: plan.label.clone(),
        });
        Ok(())
    }

    fn insert_rotation_keyframe(
        &mut self,
        node: NodeId,
        frame: i64,
        angle_radians: f64,
    ) -> Result<()> {
        self.check_node(node)?;
        self.commands.push(HostCommand::InsertKeyframe {
            node,
            frame,
            angle_radians,
        });
        Ok(())
    }

    fn set_interpolation(&mut self, node: NodeId, interpolation: Interpolation) -> Result<()> {
        self.check_node(node)?;
        self.commands.push(HostCommand::SetInterpolation {
            node,
            interpolation,
        });
        Ok(())
    }

    fn loop_animation(&mut self, node: NodeId, strategy: LoopStrategy) -> Result<()> {
        self.check_node(node)?;
        if !self.supported.contains(&strategy) {
            return Err(OrreryError::Host(format!("{:?} is not supported", strategy)));
        }
        self.commands.push(HostCommand::LoopAnimation { node, strategy });
        Ok(())
    }

    fn set_frame_range(&mut self, start: i64, end: i64) -> Result<()> {
        self.commands.push(HostCommand::SetFrameRange { start, end });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::{BodyCatalog, CelestialBody, PeriodPreset};
    use crate::constants::TAU;
    use crate::plan::plan_catalog;

    fn solar_plan() -> CatalogPlan {
        plan_catalog(
            &BodyCatalog::solar_system(PeriodPreset::Real),
            &PlanConfig::default(),
        )
    }

    fn center_of(commands: &[HostCommand], body: &str) -> NodeId {
        commands
            .iter()
            .find_map(|c| match c {
                HostCommand::CreateOrbitCenter { node, name, .. } if name == body => Some(*node),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no orbit center for {}", body))
    }

    #[test]
    fn test_build_solar_system() {
        let plan = solar_plan();
        let mut host = RecordingHost::new();
        let report = build_scene(&mut host, &plan, &PlanConfig::default()).unwrap();

        assert_eq!(report.built.len(), 10);
        assert!(report.skipped.is_empty());
        assert_eq!(report.loop_strategy, Some(LoopStrategy::Cycles));
        assert!(!report.degraded);

        let commands = host.commands();

        // The Sun is attached directly, without an orbit center
        assert!(commands.contains(&HostCommand::AttachBody {
            center: None,
            body: "Sun".to_string(),
            label: "Sun\n(Our Star)".to_string(),
        }));

        // The Moon's orbit center hangs off Earth's, offset by Earth's radius
        let earth = center_of(commands, "Earth");
        let moon = commands
            .iter()
            .find(|c| matches!(c, HostCommand::CreateOrbitCenter { name, .. } if name == "Moon"))
            .unwrap();
        match moon {
            HostCommand::CreateOrbitCenter { parent, offset, .. } => {
                assert_eq!(*parent, Some(earth));
                assert_eq!(*offset, 8.0);
            }
            _ => unreachable!(),
        }

        let mars = center_of(commands, "Mars");
        let mars_keys: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                HostCommand::InsertKeyframe {
                    node,
                    frame,
                    angle_radians,
                } if *node == mars => Some((*frame, *angle_radians)),
                _ => None,
            })
            .collect();
        assert_eq!(mars_keys, vec![(1, 0.0), (16489, TAU)]);
        assert!(commands.contains(&HostCommand::LoopAnimation {
            node: mars,
            strategy: LoopStrategy::Cycles,
        }));
        assert!(commands.contains(&HostCommand::SetInterpolation {
            node: mars,
            interpolation: Interpolation::Linear,
        }));

        assert_eq!(
            commands.last(),
            Some(&HostCommand::SetFrameRange {
                start: 1,
                end: 1 + (60190 * 24),
            })
        );
    }

    #[test]
    fn test_loop_falls_back_to_repeat() {
        let plan = solar_plan();
        let mut host = RecordingHost::with_loop_strategies(vec![LoopStrategy::Repeat]);
        let report = build_scene(&mut host, &plan, &PlanConfig::default()).unwrap();

        assert_eq!(report.loop_strategy, Some(LoopStrategy::Repeat));
        assert!(report.schedules.iter().all(|(_, s)| s.looping));
    }

    #[test]
    fn test_no_loop_support_degrades() {
        let plan = solar_plan();
        let mut host = RecordingHost::with_loop_strategies(Vec::new());
        let report = build_scene(&mut host, &plan, &PlanConfig::default()).unwrap();

        assert!(report.degraded);
        assert_eq!(report.loop_strategy, None);
        assert_eq!(report.built.len(), 10);
        assert!(report.schedules.iter().all(|(_, s)| !s.looping));
        assert!(!host
            .commands()
            .iter()
            .any(|c| matches!(c, HostCommand::LoopAnimation { .. })));
    }

    #[test]
    fn test_children_wait_for_parents() {
        let catalog = BodyCatalog::from_bodies(vec![
            CelestialBody::new("Moonlet", 3.0, 0.5).with_parent("Planet"),
            CelestialBody::new("Planet", 100.0, 5.0),
        ])
        .unwrap();
        let plan = plan_catalog(&catalog, &PlanConfig::default());
        let mut host = RecordingHost::new();
        let report = build_scene(&mut host, &plan, &PlanConfig::default()).unwrap();

        assert_eq!(report.built, vec!["Planet".to_string(), "Moonlet".to_string()]);
        let planet = center_of(host.commands(), "Planet");
        assert!(host.commands().contains(&HostCommand::CreateOrbitCenter {
            node: planet + 1,
            name: "Moonlet".to_string(),
            parent: Some(planet),
            offset: 5.0,
        }));
    }

    #[test]
    fn test_child_of_rejected_parent_is_skipped() {
        let catalog = BodyCatalog::from_bodies(vec![
            CelestialBody::new("Planet", 0.0, 5.0),
            CelestialBody::new("Moonlet", 3.0, 0.5).with_parent("Planet"),
            CelestialBody::new("Other", 50.0, 7.0),
        ])
        .unwrap();
        let plan = plan_catalog(&catalog, &PlanConfig::default());
        let mut host = RecordingHost::new();
        let report = build_scene(&mut host, &plan, &PlanConfig::default()).unwrap();

        assert_eq!(report.built, vec!["Other".to_string()]);
        assert_eq!(report.skipped, vec!["Moonlet".to_string()]);
    }

    #[test]
    fn test_frame_range_ignores_skipped_bodies() {
        let catalog = BodyCatalog::from_bodies(vec![
            CelestialBody::new("Planet", 0.0, 5.0),
            CelestialBody::new("Moonlet", 1000.0, 0.5).with_parent("Planet"),
            CelestialBody::new("Other", 50.0, 7.0),
        ])
        .unwrap();
        let plan = plan_catalog(&catalog, &PlanConfig::default());
        assert_eq!(plan.frame_range(), Some((1, 1 + 1000 * 24)));

        let mut host = RecordingHost::new();
        let report = build_scene(&mut host, &plan, &PlanConfig::default()).unwrap();

        assert_eq!(report.skipped, vec!["Moonlet".to_string()]);
        assert_eq!(
            host.commands().last(),
            Some(&HostCommand::SetFrameRange { start: 1, end: 1 + 50 * 24 })
        );
    }

    #[test]
    fn test_nothing_built_sets_no_frame_range() {
        let catalog = BodyCatalog::from_bodies(vec![
            CelestialBody::new("Planet", 0.0, 5.0),
            CelestialBody::new("Moonlet", 30.0, 0.5).with_parent("Planet"),
        ])
        .unwrap();
        let plan = plan_catalog(&catalog, &PlanConfig::default());
        let mut host = RecordingHost::new();
        build_scene(&mut host, &plan, &PlanConfig::default()).unwrap();

        assert!(!host
            .commands()
            .iter()
            .any(|command| matches!(command, HostCommand::SetFrameRange { .. })));
    }

    #[test]
    fn test_child_of_central_body_orbits_origin() {
        let catalog = BodyCatalog::from_bodies(vec![
            CelestialBody::central("Star"),
            CelestialBody::new("Rock", 40.0, 3.5).with_parent("Star"),
        ])
        .unwrap();
        let plan = plan_catalog(&catalog, &PlanConfig::default());
        let mut host = RecordingHost::new();
        build_scene(&mut host, &plan, &PlanConfig::default()).unwrap();

        assert!(host.commands().contains(&HostCommand::CreateOrbitCenter {
            node: 0,
            name: "Rock".to_string(),
            parent: None,
            offset: 0.0,
        }));
    }

    struct FailingHost;

    impl SceneHost for FailingHost {
        fn supported_loop_strategies(&self) -> Vec<LoopStrategy> {
            vec![LoopStrategy::Cycles]
        }

        fn create_orbit_center(&mut self, name: &str, _: Option<NodeId>, _: f64) -> Result<NodeId> {
            Err(OrreryError::Host(format!("cannot create {}", name)))
        }

        fn attach_body(&mut self, _: Option<NodeId>, _: &BodyPlan) -> Result<()> {
            Ok(())
        }

        fn insert_rotation_keyframe(&mut self, _: NodeId, _: i64, _: f64) -> Result<()> {
            Ok(())
        }

        fn set_interpolation(&mut self, _: NodeId, _: Interpolation) -> Result<()> {
            Ok(())
        }

        fn loop_animation(&mut self, _: NodeId, _: LoopStrategy) -> Result<()> {
            Ok(())
        }

        fn set_frame_range(&mut self, _: i64, _: i64) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_host_errors_propagate() {
        let plan = solar_plan();
        let result = build_scene(&mut FailingHost, &plan, &PlanConfig::default());
        match result {
            Err(OrreryError::Host(msg)) => assert!(msg.contains("Mercury")),
            other => panic!("Expected Host error, got {:?}", other),
        }
    }

    #[test]
    fn test_command_display() {
        let cmd = HostCommand::AttachBody {
            center: Some(2),
            body: "Mars".to_string(),
            label: "Mars\nAge: 10.6 years".to_string(),
        };
        assert_eq!(cmd.to_string(), "attach Mars to node 2 [Mars / Age: 10.6 years]");
    }
}
