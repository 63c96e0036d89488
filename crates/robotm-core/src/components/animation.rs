//! Sprite frame sequences.
//!
//! Frames are (col, row) cell offsets relative to the sprite's base region.

use std::collections::HashMap;

/// Definition of a single animation sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDef {
    pub frames: Vec<(f32, f32)>,
    /// Seconds per frame.
    pub frame_duration: f32,
    pub looping: bool,
}

impl AnimationDef {
    /// Consecutive columns on one row, looping.
    pub fn horizontal_strip(row: f32, start_col: f32, frame_count: u32, fps: f32) -> Self {
        let frames: Vec<(f32, f32)> = (0..frame_count)
            .map(|i| (start_col + i as f32, row))
            .collect();
        Self {
            frames,
            frame_duration: 1.0 / fps,
            looping: true,
        }
    }

    /// A one-frame "animation" for static poses.
    pub fn still(col: f32, row: f32) -> Self {
        Self {
            frames: vec![(col, row)],
            frame_duration: 1.0,
            looping: true,
        }
    }

    /// Play through once and hold the last frame.
    pub fn once(mut self) -> Self {
        self.looping = false;
        self
    }

    pub fn total_duration(&self) -> f32 {
        self.frame_duration * self.frames.len() as f32
    }
}

/// Animation state for an entity.
#[derive(Debug, Clone, Default)]
pub struct AnimationComponent {
    pub animations: HashMap<String, AnimationDef>,
    /// Currently playing animation name.
    pub current: String,
    pub frame_index: usize,
    /// Time accumulated in current frame.
    pub frame_timer: f32,
    pub playing: bool,
}

impl AnimationComponent {
    /// Create with a single animation, already playing.
    pub fn single(name: impl Into<String>, def: AnimationDef) -> Self {
        let mut anim = Self::default();
        anim.add(name, def);
        anim.playing = true;
        anim
    }

    /// Builder form of [`add`](Self::add).
    pub fn with(mut self, name: impl Into<String>, def: AnimationDef) -> Self {
        self.add(name, def);
        self
    }

    /// Add an animation. The first one added becomes current.
    pub fn add(&mut self, name: impl Into<String>, def: AnimationDef) {
        let name = name.into();
        if self.current.is_empty() {
            self.current = name.clone();
            self.playing = true;
        }
        self.animations.insert(name, def);
    }

    /// Play a named animation from the beginning. Unknown names are ignored.
    pub fn play(&mut self, name: &str) {
        if self.animations.contains_key(name) {
            self.current = name.to_string();
            self.frame_index = 0;
            self.frame_timer = 0.0;
            self.playing = true;
        }
    }

    /// Play animation only if it's different from current.
    pub fn play_if_different(&mut self, name: &str) {
        if self.current != name {
            self.play(name);
        }
    }

    pub fn current_def(&self) -> Option<&AnimationDef> {
        self.animations.get(&self.current)
    }

    /// Current frame (col, row) for the sprite.
    pub fn current_frame(&self) -> Option<(f32, f32)> {
        self.current_def()
            .and_then(|def| def.frames.get(self.frame_index).copied())
    }

    /// Check if a non-looping animation has reached its last frame.
    pub fn is_finished(&self) -> bool {
        match self.current_def() {
            Some(def) => !def.looping && !self.playing,
            None => true,
        }
    }

    /// Advance animation by dt seconds. Returns true if frame changed.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.playing {
            return false;
        }

        let Some(def) = self.animations.get(&self.current) else {
            return false;
        };

        if def.frames.is_empty() {
            return false;
        }

        self.frame_timer += dt;
        let mut frame_changed = false;

        while self.frame_timer >= def.frame_duration {
            self.frame_timer -= def.frame_duration;
            self.frame_index += 1;
            frame_changed = true;

            if self.frame_index >= def.frames.len() {
                if def.looping {
                    self.frame_index = 0;
                } else {
                    self.frame_index = def.frames.len() - 1;
                    self.playing = false;
                    break;
                }
            }
        }

        frame_changed
    }
}
