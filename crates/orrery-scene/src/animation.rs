//! The per-frame orbital step and its run state.

use orrery_config::AnimationConfig;

use crate::body::{CelestialBody, Sun};
use crate::speed::SpeedRegistry;

/// Whether ticks advance the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Stopped,
    Running,
}

/// Advances the sun and planets once per tick while running.
#[derive(Debug, Clone)]
pub struct AnimationLoop {
    state: LoopState,
    sun_spin: f32,
    planet_spin: f32,
    ticks: u64,
}

impl AnimationLoop {
    pub fn new(sun_spin: f32, planet_spin: f32) -> Self {
        Self {
            state: LoopState::Stopped,
            sun_spin,
            planet_spin,
            ticks: 0,
        }
    }

    pub fn from_config(config: &AnimationConfig) -> Self {
        Self::new(config.sun_spin, config.planet_spin)
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Ticks that actually advanced the scene.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn start(&mut self) {
        self.state = LoopState::Running;
    }

    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
    }

    /// Swap in new spin rates. Run state and tick count are kept.
    pub fn set_spins(&mut self, config: &AnimationConfig) {
        self.sun_spin = config.sun_spin;
        self.planet_spin = config.planet_spin;
    }

    /// Advance every body once, reading multipliers fresh from `speeds`.
    /// Does nothing and returns `false` while stopped.
    pub fn advance(&mut self, sun: &mut Sun, bodies: &mut [CelestialBody], speeds: &SpeedRegistry) -> bool {
        if self.state == LoopState::Stopped {
            return false;
        }

        sun.spin(self.sun_spin);
        for body in bodies.iter_mut() {
            body.advance(speeds.get(body.id()), self.planet_spin);
        }
        self.ticks += 1;
        true
    }
}

impl Default for AnimationLoop {
    fn default() -> Self {
        Self::from_config(&AnimationConfig::default())
    }
}
