//! # Autonomous Spin Animations
//!
//! Models spin on their own while nobody is holding them. The animations live
//! in an arena owned by the scene; everything else refers to them through a
//! copyable [`AnimationHandle`] and only ever toggles their play state.

use cgmath::{Quaternion, Rad, Rotation3};
use std::f32::consts::TAU;

/// Index of an animation inside a [`SpinAnimator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(pub(crate) usize);

impl AnimationHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Play/pause access to externally owned animations.
pub trait AnimationControl {
    fn play(&mut self, handle: AnimationHandle);
    fn pause(&mut self, handle: AnimationHandle);
    fn is_playing(&self, handle: AnimationHandle) -> bool;
}

/// A looping rotation about the stage Y axis.
#[derive(Debug, Clone, Copy)]
pub struct SpinAnimation {
    /// Seconds per full turn
    pub period: f32,
    /// `1.0` spins one way, `-1.0` the other
    pub direction: f32,
    orientation: Quaternion<f32>,
    playing: bool,
}

impl SpinAnimation {
    pub fn new(period: f32, direction: f32) -> Self {
        Self {
            period,
            direction,
            orientation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            playing: false,
        }
    }

    pub fn orientation(&self) -> Quaternion<f32> {
        self.orientation
    }

    fn advance(&mut self, delta_time: f32) {
        if !self.playing || self.period <= 0.0 {
            return;
        }
        let step = Quaternion::from_angle_y(Rad(self.direction * TAU * delta_time / self.period));
        self.orientation = step * self.orientation;
    }
}

/// Arena of spin animations, one per model slot.
#[derive(Debug, Default)]
pub struct SpinAnimator {
    animations: Vec<SpinAnimation>,
}

impl SpinAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an animation and returns its handle. It starts paused.
    pub fn spawn(&mut self, animation: SpinAnimation) -> AnimationHandle {
        self.animations.push(animation);
        AnimationHandle(self.animations.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn get(&self, handle: AnimationHandle) -> Option<&SpinAnimation> {
        self.animations.get(handle.0)
    }

    /// Current orientation of the animated property.
    pub fn orientation(&self, handle: AnimationHandle) -> Quaternion<f32> {
        self.get(handle)
            .map(SpinAnimation::orientation)
            .unwrap_or(Quaternion::new(1.0, 0.0, 0.0, 0.0))
    }

    /// Overwrites the animated orientation; a resumed spin continues from here.
    pub fn set_orientation(&mut self, handle: AnimationHandle, orientation: Quaternion<f32>) {
        if let Some(animation) = self.animations.get_mut(handle.0) {
            animation.orientation = orientation;
        }
    }

    /// Advances every playing animation.
    pub fn tick(&mut self, delta_time: f32) {
        for animation in self.animations.iter_mut() {
            animation.advance(delta_time);
        }
    }
}

impl AnimationControl for SpinAnimator {
    fn play(&mut self, handle: AnimationHandle) {
        if let Some(animation) = self.animations.get_mut(handle.0) {
            animation.playing = true;
        }
    }

    fn pause(&mut self, handle: AnimationHandle) {
        if let Some(animation) = self.animations.get_mut(handle.0) {
            animation.playing = false;
        }
    }

    fn is_playing(&self, handle: AnimationHandle) -> bool {
        self.get(handle).map_or(false, |animation| animation.playing)
    }
}
