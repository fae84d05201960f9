//! Orbital animation schedules
//!
//! Every orbiting body hangs off an orbit center that is rotated once per
//! orbital period. The rotation is described by two keyframes: angle 0 at
//! the start frame and angle 2π one period later, interpolated linearly and
//! repeated forever. The period only stretches or compresses the frame span;
//! the angular distance is always one full revolution.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::bodies::CelestialBody;
use crate::constants::{MIN_FRAME_SPAN, TAU};
use crate::{OrreryError, Parameter, ParameterError, Result};

/// Interpolation between the two keyframes of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Constant angular velocity
    #[default]
    Linear,
}

/// Ways a host can make an animation curve repeat after its last keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopStrategy {
    /// Cycle the whole curve, offsetting nothing
    Cycles,
    /// Repeat the keyed range as a separate modifier
    Repeat,
}

/// Order in which loop strategies are tried when none is configured
pub const DEFAULT_LOOP_PREFERENCE: [LoopStrategy; 2] = [LoopStrategy::Cycles, LoopStrategy::Repeat];

/// Keyframes driving one revolution of an orbit center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationSchedule {
    pub start_frame: i64,
    pub end_frame: i64,
    pub start_angle_radians: f64,
    pub end_angle_radians: f64,
    pub interpolation: Interpolation,
    /// Whether the progression repeats after `end_frame`
    pub looping: bool,
}

impl AnimationSchedule {
    /// Number of frames in one revolution
    pub fn frame_span(&self) -> i64 {
        self.end_frame - self.start_frame
    }

    /// Angular distance covered by one revolution
    pub fn sweep_radians(&self) -> f64 {
        self.end_angle_radians - self.start_angle_radians
    }

    /// Angular velocity in radians per frame
    pub fn radians_per_frame(&self) -> f64 {
        self.sweep_radians() / self.frame_span() as f64
    }

    /// Rotation of the orbit center at a (possibly fractional) frame.
    ///
    /// Looping schedules wrap into `[start_angle, end_angle)`, also for
    /// frames before `start_frame`. Non-looping schedules hold their first
    /// and last keyframe values outside the keyed range.
    pub fn angle_at_frame(&self, frame: f64) -> f64 {
        let progress = (frame - self.start_frame as f64) / self.frame_span() as f64;
        let progress = if self.looping {
            progress.rem_euclid(1.0)
        } else {
            progress.clamp(0.0, 1.0)
        };
        match self.interpolation {
            Interpolation::Linear => self.start_angle_radians + progress * self.sweep_radians(),
        }
    }

    /// Offset of a body from its orbit center at a given frame.
    ///
    /// The body starts on the +X axis and the center rotates about Z.
    pub fn position_at_frame(&self, orbit_radius: f64, frame: f64) -> Vector3<f64> {
        let angle = self.angle_at_frame(frame);
        Vector3::new(orbit_radius * angle.cos(), orbit_radius * angle.sin(), 0.0)
    }

    /// Copy of this schedule with looping switched off
    pub fn without_looping(mut self) -> Self {
        self.looping = false;
        self
    }
}

/// Compute the keyframe schedule for one revolution of `body`.
///
/// The span is `round(period * frames_per_day)` frames with a floor of one
/// frame, so very short periods never produce a zero-length animation.
pub fn compute_schedule(
    body: &CelestialBody,
    frames_per_day: f64,
    start_frame: i64,
) -> Result<AnimationSchedule> {
    body.validate()?;
    let frames_per_day = ParameterError::check_positive(Parameter::FramesPerDay, frames_per_day)
        .map_err(|e| OrreryError::for_body(&body.name, e))?;

    let period = body.schedule_period_days();
    let span = frame_span(period, frames_per_day)
        .and_then(|span| start_frame.checked_add(span).map(|end| (span, end)));
    let Some((span, end_frame)) = span else {
        return Err(OrreryError::for_body(
            &body.name,
            ParameterError {
                parameter: period_parameter(body),
                value: period,
                reason: "frame span does not fit the frame range",
            },
        ));
    };

    log::debug!(
        "{}: {} frames per revolution ({} -> {})",
        body.name,
        span,
        start_frame,
        end_frame
    );

    Ok(AnimationSchedule {
        start_frame,
        end_frame,
        start_angle_radians: 0.0,
        end_angle_radians: TAU,
        interpolation: Interpolation::Linear,
        looping: true,
    })
}

fn frame_span(period_days: f64, frames_per_day: f64) -> Option<i64> {
    let frames = (period_days * frames_per_day).round();
    // i64::MAX as f64 rounds up to 2^63, which no longer fits
    if !frames.is_finite() || frames >= i64::MAX as f64 {
        return None;
    }
    Some((frames as i64).max(MIN_FRAME_SPAN))
}

fn period_parameter(body: &CelestialBody) -> Parameter {
    if body.animation_period_days.is_some() {
        Parameter::AnimationPeriodDays
    } else {
        Parameter::OrbitalPeriodDays
    }
}

/// Pick the first preferred loop strategy the host supports
pub fn negotiate_loop(
    preference: &[LoopStrategy],
    supported: &[LoopStrategy],
) -> Result<LoopStrategy> {
    preference
        .iter()
        .copied()
        .find(|strategy| supported.contains(strategy))
        .ok_or_else(|| OrreryError::UnsupportedLoopStrategy {
            requested: preference.to_vec(),
        })
}
