use std::time::Instant;

use minifb::Key;

use crate::camera::CameraMovement;

/// Turns absolute cursor positions into look deltas. The first sample only
/// records the baseline so the view does not jump when the cursor enters.
#[derive(Debug, Clone, Default)]
pub struct MouseTracker {
    last: Option<(f32, f32)>,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        let delta = self.last.map(|(last_x, last_y)| (x - last_x, last_y - y));
        self.last = Some((x, y));
        delta
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[derive(Debug)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Seconds since the previous tick, 0 on the first one.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = self
            .last
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

pub const MOVEMENT_KEYS: [(Key, CameraMovement); 6] = [
    (Key::W, CameraMovement::Forward),
    (Key::S, CameraMovement::Backward),
    (Key::A, CameraMovement::Left),
    (Key::D, CameraMovement::Right),
    (Key::Q, CameraMovement::Up),
    (Key::E, CameraMovement::Down),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Perspective,
    Orthographic,
    ToggleLighting,
    Screenshot,
    Quit,
}

pub fn movements(held: &[Key]) -> Vec<CameraMovement> {
    MOVEMENT_KEYS
        .iter()
        .filter(|(key, _)| held.contains(key))
        .map(|(_, movement)| *movement)
        .collect()
}

pub fn command_for(key: Key) -> Option<Command> {
    match key {
        Key::P => Some(Command::Perspective),
        Key::O => Some(Command::Orthographic),
        Key::L => Some(Command::ToggleLighting),
        Key::F12 => Some(Command::Screenshot),
        Key::Escape => Some(Command::Quit),
        _ => None,
    }
}
