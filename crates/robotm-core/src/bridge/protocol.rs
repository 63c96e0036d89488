//! Frame buffer layout shared with the host page.
//! Must stay in sync with the host's `protocol.ts`.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 16 floats]
//! [Instances: max_instances × 10 floats]
//! [Audio: max_audio × 3 floats]
//! [Events: max_events × 4 floats]
//! [HUD: 8 floats]
//! ```
//!
//! Capacities are written into the header of every frame.
//! The host reads them from the header to compute offsets dynamically.

use std::borrow::Cow;

use crate::api::game::GameConfig;
use crate::api::types::GameEvent;
use crate::audio::{AudioCommand, AudioRecord};
use crate::core::session::HudSnapshot;
use crate::renderer::instance::RenderInstance;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_MAX_AUDIO: usize = 4;
pub const HEADER_AUDIO_COUNT: usize = 5;
pub const HEADER_MAX_EVENTS: usize = 6;
pub const HEADER_EVENT_COUNT: usize = 7;
pub const HEADER_WORLD_WIDTH: usize = 8;
pub const HEADER_WORLD_HEIGHT: usize = 9;
pub const HEADER_CAMERA_Y: usize = 10;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per render instance (wire format, never changes).
pub const INSTANCE_FLOATS: usize = RenderInstance::FLOATS;

/// Floats per audio command: kind, sound, handle.
pub const AUDIO_FLOATS: usize = AudioRecord::FLOATS;

/// Floats per game event: kind, a, b, c.
pub const EVENT_FLOATS: usize = GameEvent::FLOATS;

/// Floats in the HUD snapshot.
pub const HUD_FLOATS: usize = HudSnapshot::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    /// Maximum audio commands per frame.
    pub max_audio: usize,
    /// Maximum game events per frame.
    pub max_events: usize,

    pub instance_data_offset: usize,
    pub audio_data_offset: usize,
    pub event_data_offset: usize,
    pub hud_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

/// Everything the host needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameData<'a> {
    pub frame_counter: u32,
    pub instances: &'a [RenderInstance],
    pub audio: &'a [AudioCommand],
    pub events: &'a [GameEvent],
    pub hud: HudSnapshot,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_instances: usize, max_audio: usize, max_events: usize) -> Self {
        let instance_data_offset = HEADER_FLOATS;
        let audio_data_offset = instance_data_offset + max_instances * INSTANCE_FLOATS;
        let event_data_offset = audio_data_offset + max_audio * AUDIO_FLOATS;
        let hud_data_offset = event_data_offset + max_events * EVENT_FLOATS;

        let buffer_total_floats = hud_data_offset + HUD_FLOATS;

        Self {
            max_instances,
            max_audio,
            max_events,
            instance_data_offset,
            audio_data_offset,
            event_data_offset,
            hud_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_instances, config.max_audio, config.max_events)
    }

    /// Write `frame` into `out`, resizing it to the full buffer size.
    /// Sections longer than their capacity are truncated.
    pub fn pack(&self, frame: &FrameData, out: &mut Vec<f32>) {
        out.clear();
        out.resize(self.buffer_total_floats, 0.0);

        let instances = &frame.instances[..frame.instances.len().min(self.max_instances)];
        let audio = fit_audio(frame.audio, self.max_audio);
        if audio.len() < frame.audio.len() {
            log::warn!("dropping {} audio commands", frame.audio.len() - audio.len());
        }
        let events = &frame.events[..frame.events.len().min(self.max_events)];
        if events.len() < frame.events.len() {
            log::warn!("dropping {} game events", frame.events.len() - events.len());
        }

        out[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        out[HEADER_FRAME_COUNTER] = frame.frame_counter as f32;
        out[HEADER_MAX_INSTANCES] = self.max_instances as f32;
        out[HEADER_INSTANCE_COUNT] = instances.len() as f32;
        out[HEADER_MAX_AUDIO] = self.max_audio as f32;
        out[HEADER_AUDIO_COUNT] = audio.len() as f32;
        out[HEADER_MAX_EVENTS] = self.max_events as f32;
        out[HEADER_EVENT_COUNT] = events.len() as f32;
        out[HEADER_WORLD_WIDTH] = frame.hud.screen_width;
        out[HEADER_WORLD_HEIGHT] = frame.hud.screen_height;
        out[HEADER_CAMERA_Y] = frame.hud.camera_y;

        let floats: &[f32] = bytemuck::cast_slice(instances);
        out[self.instance_data_offset..self.instance_data_offset + floats.len()].copy_from_slice(floats);

        for (i, cmd) in audio.iter().enumerate() {
            let record: [f32; AUDIO_FLOATS] = bytemuck::cast(AudioRecord::from(*cmd));
            let at = self.audio_data_offset + i * AUDIO_FLOATS;
            out[at..at + AUDIO_FLOATS].copy_from_slice(&record);
        }

        let floats: &[f32] = bytemuck::cast_slice(events);
        out[self.event_data_offset..self.event_data_offset + floats.len()].copy_from_slice(floats);

        let hud: [f32; HUD_FLOATS] = bytemuck::cast(frame.hud);
        out[self.hud_data_offset..].copy_from_slice(&hud);
    }
}

/// Cut `audio` down to `max` commands, keeping `Loop` starts first. A dropped
/// start would leave later pause/resume commands addressing a voice the host
/// never created.
fn fit_audio(audio: &[AudioCommand], max: usize) -> Cow<'_, [AudioCommand]> {
    if audio.len() <= max {
        return Cow::Borrowed(audio);
    }

    let is_loop = |cmd: &AudioCommand| matches!(cmd, AudioCommand::Loop { .. });
    let mut loops_left = audio.iter().filter(|c| is_loop(*c)).count().min(max);
    let mut others_left = max - loops_left;
    let kept = audio
        .iter()
        .copied()
        .filter(|cmd| {
            let budget = if is_loop(cmd) { &mut loops_left } else { &mut others_left };
            if *budget == 0 {
                return false;
            }
            *budget -= 1;
            true
        })
        .collect();
    Cow::Owned(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{LoopHandle, Sound};
    use crate::core::session::GameSession;

    #[test]
    fn from_default_config_matches_expected_sizes() {
        let layout = ProtocolLayout::from_config(&GameConfig::default());

        assert_eq!(layout.max_instances, 512);
        assert_eq!(layout.max_audio, 32);
        assert_eq!(layout.max_events, 32);
        assert_eq!(layout.instance_data_offset, 16);
        assert_eq!(layout.audio_data_offset, 16 + 512 * 10);
        assert_eq!(layout.event_data_offset, 16 + 512 * 10 + 32 * 3);
        assert_eq!(layout.hud_data_offset, 16 + 512 * 10 + 32 * 3 + 32 * 4);
        assert_eq!(layout.buffer_total_floats, layout.hud_data_offset + 8);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(100, 10, 20);

        assert_eq!(layout.instance_data_offset, HEADER_FLOATS);
        assert_eq!(layout.audio_data_offset, layout.instance_data_offset + 100 * INSTANCE_FLOATS);
        assert_eq!(layout.event_data_offset, layout.audio_data_offset + 10 * AUDIO_FLOATS);
        assert_eq!(layout.hud_data_offset, layout.event_data_offset + 20 * EVENT_FLOATS);
    }

    #[test]
    fn pack_writes_every_section() {
        let layout = ProtocolLayout::new(4, 4, 4);
        let instances = [RenderInstance { x: 3.0, alpha: 1.0, ..Default::default() }];
        let audio = [
            AudioCommand::Play(Sound::Jump),
            AudioCommand::Loop { sound: Sound::Damaged, handle: LoopHandle(7) },
        ];
        let events = [GameEvent::game_over()];
        let mut session = GameSession::default();
        session.player_hp = 42.0;

        let mut out = Vec::new();
        layout.pack(
            &FrameData {
                frame_counter: 9,
                instances: &instances,
                audio: &audio,
                events: &events,
                hud: session.snapshot(),
            },
            &mut out,
        );

        assert_eq!(out.len(), layout.buffer_total_floats);
        assert_eq!(out[HEADER_FRAME_COUNTER], 9.0);
        assert_eq!(out[HEADER_INSTANCE_COUNT], 1.0);
        assert_eq!(out[HEADER_AUDIO_COUNT], 2.0);
        assert_eq!(out[HEADER_EVENT_COUNT], 1.0);
        assert_eq!(out[HEADER_WORLD_HEIGHT], 15.0);

        assert_eq!(out[layout.instance_data_offset], 3.0);
        assert_eq!(out[layout.instance_data_offset + 9], 1.0);

        let a = layout.audio_data_offset;
        assert_eq!(&out[a..a + 3], &[1.0, 1.0, -1.0]);
        assert_eq!(&out[a + 3..a + 6], &[2.0, 3.0, 7.0]);

        assert_eq!(out[layout.event_data_offset], GameEvent::GAME_OVER);
        assert_eq!(out[layout.hud_data_offset], 42.0);
    }

    #[test]
    fn pack_truncates_to_capacity() {
        let layout = ProtocolLayout::new(1, 1, 1);
        let instances = [RenderInstance::default(); 3];
        let events = [GameEvent::round_started(), GameEvent::game_over()];

        let mut out = Vec::new();
        layout.pack(
            &FrameData {
                frame_counter: 0,
                instances: &instances,
                audio: &[],
                events: &events,
                hud: HudSnapshot::default(),
            },
            &mut out,
        );

        assert_eq!(out[HEADER_INSTANCE_COUNT], 1.0);
        assert_eq!(out[HEADER_EVENT_COUNT], 1.0);
        assert_eq!(out[layout.event_data_offset], GameEvent::ROUND_STARTED);
        assert_eq!(out.len(), layout.buffer_total_floats);
    }

    #[test]
    fn audio_overflow_keeps_loop_starts() {
        let layout = ProtocolLayout::new(1, 2, 1);
        let audio = [
            AudioCommand::Play(Sound::Jump),
            AudioCommand::Pause(LoopHandle(1)),
            AudioCommand::Loop { sound: Sound::Damaged, handle: LoopHandle(2) },
            AudioCommand::Resume(LoopHandle(2)),
        ];

        let mut out = Vec::new();
        layout.pack(
            &FrameData {
                frame_counter: 0,
                instances: &[],
                audio: &audio,
                events: &[],
                hud: HudSnapshot::default(),
            },
            &mut out,
        );

        let a = layout.audio_data_offset;
        assert_eq!(out[HEADER_AUDIO_COUNT], 2.0);
        assert_eq!(&out[a..a + 3], &[1.0, 1.0, -1.0]);
        assert_eq!(&out[a + 3..a + 6], &[2.0, 3.0, 2.0]);
    }

    #[test]
    fn audio_within_capacity_is_untouched() {
        let audio = [AudioCommand::Resume(LoopHandle(4)), AudioCommand::Play(Sound::Explode)];
        let fitted = fit_audio(&audio, 2);
        assert!(matches!(fitted, Cow::Borrowed(_)));
        assert_eq!(&*fitted, &audio[..]);
    }
}
