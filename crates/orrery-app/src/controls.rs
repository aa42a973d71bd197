//! Keyboard control panel: planet selection, per-planet speed, pause.
//!
//! The panel owns its own copy of every planet's speed so each change can be
//! sent to the scene as one complete mapping.

use std::collections::HashMap;

use orrery_scene::speed::clamp_to_controls;
use orrery_scene::{BodyId, SPEED_STEP};
use winit::keyboard::{Key, NamedKey};

/// Keys the panel reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKey {
    /// 1 through 8, innermost planet first.
    Select(BodyId),
    Space,
    Faster,
    Slower,
    Reset,
    Escape,
    Quit,
}

impl PanelKey {
    /// Map a winit logical key. Unbound keys yield `None`.
    pub fn from_winit(key: &Key) -> Option<Self> {
        match key {
            Key::Named(NamedKey::Space) => Some(PanelKey::Space),
            Key::Named(NamedKey::Escape) => Some(PanelKey::Escape),
            Key::Character(text) => Self::from_char(text.chars().next()?),
            _ => None,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => BodyId::from_index(c as usize - '1' as usize).map(PanelKey::Select),
            '+' | '=' => Some(PanelKey::Faster),
            '-' | '_' => Some(PanelKey::Slower),
            'r' | 'R' => Some(PanelKey::Reset),
            'q' | 'Q' => Some(PanelKey::Quit),
            ' ' => Some(PanelKey::Space),
            _ => None,
        }
    }

    /// Held-key repeats only make sense for speed changes.
    pub fn repeats(self) -> bool {
        matches!(self, PanelKey::Faster | PanelKey::Slower)
    }
}

/// What the host should do in response to a key.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    Focus(BodyId),
    TogglePause,
    /// Full mapping of every planet name to its multiplier.
    SetSpeeds(HashMap<String, f32>),
    ClearSelection,
    Quit,
}

#[derive(Debug, Clone)]
pub struct ControlPanel {
    selected: Option<BodyId>,
    speeds: HashMap<String, f32>,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self {
            selected: None,
            speeds: default_speeds(),
        }
    }

    pub fn selected(&self) -> Option<BodyId> {
        self.selected
    }

    pub fn speed(&self, id: BodyId) -> f32 {
        self.speeds.get(id.name()).copied().unwrap_or(1.0)
    }

    pub fn speeds(&self) -> &HashMap<String, f32> {
        &self.speeds
    }

    pub fn handle(&mut self, key: PanelKey) -> Option<PanelCommand> {
        match key {
            PanelKey::Select(id) => {
                self.selected = Some(id);
                Some(PanelCommand::Focus(id))
            }
            PanelKey::Space => Some(PanelCommand::TogglePause),
            PanelKey::Faster => self.nudge(SPEED_STEP),
            PanelKey::Slower => self.nudge(-SPEED_STEP),
            PanelKey::Reset => {
                self.speeds = default_speeds();
                Some(PanelCommand::SetSpeeds(self.speeds.clone()))
            }
            PanelKey::Escape => {
                self.selected = None;
                Some(PanelCommand::ClearSelection)
            }
            PanelKey::Quit => Some(PanelCommand::Quit),
        }
    }

    fn nudge(&mut self, delta: f32) -> Option<PanelCommand> {
        let Some(id) = self.selected else {
            tracing::debug!("speed change ignored: no planet selected");
            return None;
        };
        let current = self.speed(id);
        let next = clamp_to_controls(current + delta);
        if next == current {
            return None;
        }
        self.speeds.insert(id.name().to_string(), next);
        Some(PanelCommand::SetSpeeds(self.speeds.clone()))
    }

    /// Window title including the selected planet and its speed.
    pub fn title(&self, base: &str) -> String {
        match self.selected {
            Some(id) => format!("{base} | {} · {:.1}x", id.label(), self.speed(id)),
            None => base.to_string(),
        }
    }
}

fn default_speeds() -> HashMap<String, f32> {
    BodyId::ALL
        .into_iter()
        .map(|id| (id.name().to_string(), 1.0))
        .collect()
}
