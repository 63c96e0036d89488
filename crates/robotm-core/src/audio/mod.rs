//! Audio commands produced by game logic.
//!
//! Mixing and playback happen in the host. The core only records what should
//! be played this frame; looping sounds are addressed by a `LoopHandle` so
//! the host can pause and resume the same voice.

use bytemuck::{Pod, Zeroable};

/// Sounds the game can trigger. The discriminant is the id the host maps to
/// an audio file (see the `sounds` table of the asset manifest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Sound {
    Jump = 1,
    CantJump = 2,
    Damaged = 3,
    Explode = 4,
}

impl Sound {
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Manifest key for this sound.
    pub fn name(self) -> &'static str {
        match self {
            Sound::Jump => "jump",
            Sound::CantJump => "cant_jump",
            Sound::Damaged => "damaged",
            Sound::Explode => "explode",
        }
    }
}

/// Identifies one looping voice started with [`AudioQueue::start_loop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCommand {
    /// Fire-and-forget playback.
    Play(Sound),
    /// Start a new looping voice.
    Loop { sound: Sound, handle: LoopHandle },
    Pause(LoopHandle),
    Resume(LoopHandle),
}

/// Wire form of an [`AudioCommand`]: `kind, sound, handle` as floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct AudioRecord {
    pub kind: f32,
    pub sound: f32,
    pub handle: f32,
}

impl AudioRecord {
    pub const FLOATS: usize = 3;
}

impl From<AudioCommand> for AudioRecord {
    fn from(cmd: AudioCommand) -> Self {
        match cmd {
            AudioCommand::Play(sound) => Self { kind: 1.0, sound: sound.id() as f32, handle: -1.0 },
            AudioCommand::Loop { sound, handle } => Self {
                kind: 2.0,
                sound: sound.id() as f32,
                handle: handle.0 as f32,
            },
            AudioCommand::Pause(handle) => Self { kind: 3.0, sound: 0.0, handle: handle.0 as f32 },
            AudioCommand::Resume(handle) => Self { kind: 4.0, sound: 0.0, handle: handle.0 as f32 },
        }
    }
}

/// Per-frame list of audio commands.
pub struct AudioQueue {
    commands: Vec<AudioCommand>,
    next_handle: u32,
}

impl AudioQueue {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(16),
            next_handle: 1,
        }
    }

    pub fn play(&mut self, sound: Sound) {
        self.commands.push(AudioCommand::Play(sound));
    }

    /// Start a looping voice and return its handle.
    pub fn start_loop(&mut self, sound: Sound) -> LoopHandle {
        let handle = LoopHandle(self.next_handle);
        self.next_handle += 1;
        self.commands.push(AudioCommand::Loop { sound, handle });
        handle
    }

    pub fn pause(&mut self, handle: LoopHandle) {
        self.commands.push(AudioCommand::Pause(handle));
    }

    pub fn resume(&mut self, handle: LoopHandle) {
        self.commands.push(AudioCommand::Resume(handle));
    }

    pub fn commands(&self) -> &[AudioCommand] {
        &self.commands
    }

    /// Drop this frame's commands. Handles stay unique across frames.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for AudioQueue {
    fn default() -> Self {
        Self::new()
    }
}
