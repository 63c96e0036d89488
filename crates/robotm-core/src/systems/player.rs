//! Per-frame player status: movement intent, ground state, damage,
//! regeneration and the death sequence.

use glam::Vec2;

use crate::api::game::EngineContext;
use crate::api::types::{EntityId, GameEvent};
use crate::audio::{AudioQueue, Sound};
use crate::components::animation::AnimationComponent;
use crate::components::player::{Facing, PlayerState};
use crate::components::sprite::SpriteComponent;
use crate::core::physics::{PhysicsBody, PhysicsWorld};
use crate::core::session::GameSession;
use crate::input::keyboard::InputSnapshot;
use crate::systems::ground_probe;
use crate::world::builder::WorldBuilder;
use crate::world::categories::{CATEGORY_NOTHING, MASK_PLAYER, MASK_PLAYER_AFTER_HITTING_CEILING};

/// Horizontal speed below which the robot keeps its current facing.
const FACING_DEAD_ZONE: f32 = 0.1;

/// Engine services the resolver reads and writes.
pub struct PlayerServices<'a> {
    pub physics: &'a mut PhysicsWorld,
    pub audio: &'a mut AudioQueue,
    pub session: &'a mut GameSession,
}

/// Changes to the entity store requested by [`resolve`]. The resolver holds
/// borrows into the entity, so the caller applies these afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerOutcome {
    /// Spawn the explosion effect here.
    pub explosion_at: Option<Vec2>,
    /// Stop drawing the player.
    pub detach_sprite: bool,
    /// The death countdown ran out this frame.
    pub game_over: bool,
}

/// Advance one player by `dt` seconds.
pub fn resolve(
    state: &mut PlayerState,
    body: &PhysicsBody,
    mut animation: Option<&mut AnimationComponent>,
    mut sprite: Option<&mut SpriteComponent>,
    services: &mut PlayerServices,
    input: &InputSnapshot,
    dt: f32,
) -> PlayerOutcome {
    let mut outcome = PlayerOutcome::default();
    let tuning = state.tuning;
    let physics = &mut *services.physics;

    let position = physics.body_position(body);
    let ground = ground_probe::probe(
        position,
        tuning.probe_half_width,
        tuning.scale,
        physics,
        body.body_handle,
    );
    let in_air = ground.in_air;
    let can_jump = ground.can_jump && !state.hit_ceiling;

    // Input
    let mut moving = false;
    if !state.is_dead() && !services.session.ready {
        let mass = physics.mass(body);
        let velocity = physics.velocity(body);
        if input.jump_just_pressed {
            if can_jump {
                physics.apply_impulse(body, Vec2::new(0.0, mass * (tuning.jump_force - velocity.y)));
                services.audio.play(Sound::Jump);
            } else if !in_air {
                services.audio.play(Sound::CantJump);
            }
        } else if input.left_held {
            physics.apply_impulse(body, Vec2::new(mass * (-tuning.move_speed - velocity.x), 0.0));
            moving = true;
        } else if input.right_held {
            physics.apply_impulse(body, Vec2::new(mass * (tuning.move_speed - velocity.x), 0.0));
            moving = true;
        }
    }

    let vx = physics.velocity(body).x;
    if vx > FACING_DEAD_ZONE {
        state.facing = Facing::Right;
    } else if vx < -FACING_DEAD_ZONE {
        state.facing = Facing::Left;
    }
    if let Some(sprite) = sprite.as_deref_mut() {
        sprite.flip_x = state.facing == Facing::Left;
    }

    if let Some(animation) = animation.as_deref_mut() {
        let name = if in_air {
            "fall"
        } else if moving {
            "move"
        } else {
            "idle"
        };
        animation.play_if_different(name);
    }

    // Ceiling knock-back
    if state.hit_ceiling {
        state.hit_ceiling_countdown -= dt;
        physics.set_collision_mask(body, MASK_PLAYER_AFTER_HITTING_CEILING);
        if state.hit_ceiling_countdown <= 0.0 {
            state.hit_ceiling_countdown = tuning.hit_ceiling_duration;
            state.hit_ceiling = false;
            physics.set_collision_mask(body, MASK_PLAYER);
            log::debug!("ceiling recovery finished");
        }
    }

    // Damage and regeneration
    if state.is_hurting() {
        state.hp -= tuning.damage_per_second * dt;
        if !state.is_dead() {
            match state.damaged_loop {
                Some(handle) => services.audio.resume(handle),
                None => state.damaged_loop = Some(services.audio.start_loop(Sound::Damaged)),
            }
        }
        state.hp_regen_cooldown = tuning.hp_regen_cooldown;
    } else {
        if let Some(handle) = state.damaged_loop {
            services.audio.pause(handle);
        }
        state.hp_regen_cooldown -= dt;
        if state.hp_regen_cooldown <= 0.0 && !state.is_dead() {
            state.hp = (state.hp + tuning.hp_regen_per_second * dt).min(tuning.full_hp);
        }
    }

    if state.hit_spring {
        let velocity = physics.velocity(body);
        let mass = physics.mass(body);
        physics.apply_impulse(body, Vec2::new(0.0, mass * (tuning.jump_force - velocity.y)));
        state.hit_spring = false;
        services.audio.play(Sound::Jump);
    }

    if position.y < services.session.kill_line() {
        state.hp = 0.0;
    }

    state.hp = state.hp.clamp(0.0, tuning.full_hp);
    services.session.player_hp = state.hp;

    if state.is_dead() {
        if !state.explosion_effect_triggered {
            state.explosion_effect_triggered = true;
            outcome.explosion_at = Some(position);
            physics.set_collision_category(body, CATEGORY_NOTHING);
            services.audio.play(Sound::Explode);
            outcome.detach_sprite = true;
        }
        state.dead_countdown -= dt;
        if state.dead_countdown <= 0.0 && !state.game_over_signalled {
            state.game_over_signalled = true;
            services.session.game_over = true;
            outcome.game_over = true;
        }
    }

    outcome
}

/// Run [`resolve`] for every player in the scene and apply the outcomes.
pub fn update_players(ctx: &mut EngineContext, input: &InputSnapshot, dt: f32) {
    let mut outcomes: Vec<(EntityId, PlayerOutcome)> = Vec::new();
    {
        let mut services = PlayerServices {
            physics: &mut ctx.physics,
            audio: &mut ctx.audio,
            session: &mut ctx.session,
        };
        for entity in ctx.scene.iter_mut() {
            let Some(state) = entity.player.as_mut() else {
                continue;
            };
            let Some(body) = entity.body else {
                log::error!("player {:?} has no physics body", entity.id);
                continue;
            };
            let outcome = resolve(
                state,
                &body,
                entity.animation.as_mut(),
                entity.sprite.as_mut(),
                &mut services,
                input,
                dt,
            );
            outcomes.push((entity.id, outcome));
        }
    }

    for (id, outcome) in outcomes {
        if let Some(pos) = outcome.explosion_at {
            WorldBuilder::new(ctx).create_player_explosion_effect(pos.x, pos.y);
            ctx.emit_event(GameEvent::player_died(pos.x, pos.y));
            log::info!("player {:?} exploded at ({:.2}, {:.2})", id, pos.x, pos.y);
        }
        if outcome.detach_sprite {
            if let Some(entity) = ctx.scene.get_mut(id) {
                entity.detach_sprite();
            }
        }
        if outcome.game_over {
            ctx.emit_event(GameEvent::game_over());
            log::info!("game over");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::game::GameConfig;
    use crate::audio::AudioCommand;
    use crate::components::player::PlayerTuning;
    use crate::core::physics::CollisionFilter;
    use crate::world::categories::CATEGORY_PLAYER;
    use crate::world::level::FloorKind;
    use crate::world::tags;

    const DT: f32 = 1.0 / 60.0;

    /// A zero-gravity world with one player at `pos`, input enabled and mass
    /// properties settled by a first step.
    fn setup(pos: Vec2, tuning: PlayerTuning, floor: Option<FloorKind>) -> (EngineContext, EntityId) {
        let config = GameConfig {
            gravity: Vec2::ZERO,
            player: tuning,
            ..Default::default()
        };
        let mut ctx = EngineContext::new(&config);
        if let Some(kind) = floor {
            WorldBuilder::new(&mut ctx).create_floor(pos.x - 1.0, pos.y - 0.9, 3, kind);
        }
        let id = WorldBuilder::new(&mut ctx)
            .with_tuning(tuning)
            .create_player(pos.x, pos.y);
        ctx.step_physics();
        ctx.session.ready = false;
        ctx.audio.clear();
        (ctx, id)
    }

    fn run(ctx: &mut EngineContext, id: EntityId, input: InputSnapshot, dt: f32) -> PlayerOutcome {
        let mut services = PlayerServices {
            physics: &mut ctx.physics,
            audio: &mut ctx.audio,
            session: &mut ctx.session,
        };
        let entity = ctx.scene.get_mut(id).unwrap();
        let body = entity.body.unwrap();
        resolve(
            entity.player.as_mut().unwrap(),
            &body,
            entity.animation.as_mut(),
            entity.sprite.as_mut(),
            &mut services,
            &input,
            dt,
        )
    }

    fn state(ctx: &EngineContext, id: EntityId) -> &PlayerState {
        ctx.scene.get(id).unwrap().player.as_ref().unwrap()
    }

    fn state_mut(ctx: &mut EngineContext, id: EntityId) -> &mut PlayerState {
        ctx.scene.get_mut(id).unwrap().player.as_mut().unwrap()
    }

    fn body(ctx: &EngineContext, id: EntityId) -> PhysicsBody {
        ctx.scene.get(id).unwrap().body.unwrap()
    }

    fn count(ctx: &EngineContext, cmd: AudioCommand) -> usize {
        ctx.audio.commands().iter().filter(|c| **c == cmd).count()
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::default()
    }

    #[test]
    fn contact_damage_scenario() {
        let tuning = PlayerTuning {
            damage_per_second: 10.0,
            ..Default::default()
        };
        let (mut ctx, id) = setup(Vec2::ZERO, tuning, None);
        state_mut(&mut ctx, id).lethal_contact_count = 1;
        state_mut(&mut ctx, id).hp_regen_cooldown = 0.5;

        run(&mut ctx, id, idle(), 0.5);

        let s = state(&ctx, id);
        assert!((s.hp - 95.0).abs() < 1e-4, "hp = {}", s.hp);
        assert_eq!(s.hp_regen_cooldown, tuning.hp_regen_cooldown);
        let handle = s.damaged_loop.expect("damaged loop started");
        assert_eq!(count(&ctx, AudioCommand::Loop { sound: Sound::Damaged, handle }), 1);
        assert!((ctx.session.player_hp - 95.0).abs() < 1e-4);
    }

    #[test]
    fn damaged_loop_resumes_and_pauses() {
        let (mut ctx, id) = setup(Vec2::ZERO, PlayerTuning::default(), None);
        state_mut(&mut ctx, id).lethal_contact_count = 1;
        run(&mut ctx, id, idle(), DT);
        run(&mut ctx, id, idle(), DT);
        let handle = state(&ctx, id).damaged_loop.unwrap();
        assert_eq!(count(&ctx, AudioCommand::Resume(handle)), 1);

        state_mut(&mut ctx, id).lethal_contact_count = 0;
        run(&mut ctx, id, idle(), DT);
        assert_eq!(count(&ctx, AudioCommand::Pause(handle)), 1);
        assert_eq!(state(&ctx, id).damaged_loop, Some(handle));
    }

    #[test]
    fn hp_stays_within_bounds() {
        let (mut ctx, id) = setup(Vec2::ZERO, PlayerTuning::default(), None);
        state_mut(&mut ctx, id).lethal_contact_count = 3;
        for _ in 0..10 {
            run(&mut ctx, id, idle(), 1.0);
            let hp = state(&ctx, id).hp;
            assert!((0.0..=100.0).contains(&hp), "hp = {hp}");
        }
        assert_eq!(state(&ctx, id).hp, 0.0);

        let (mut ctx, id) = setup(Vec2::ZERO, PlayerTuning::default(), None);
        state_mut(&mut ctx, id).hp = 150.0;
        run(&mut ctx, id, idle(), DT);
        assert_eq!(state(&ctx, id).hp, 100.0);
    }

    #[test]
    fn regeneration_waits_for_cooldown() {
        let (mut ctx, id) = setup(Vec2::ZERO, PlayerTuning::default(), None);
        state_mut(&mut ctx, id).hp = 50.0;

        run(&mut ctx, id, idle(), 1.0);
        let s = state(&ctx, id);
        assert_eq!(s.hp, 50.0);
        assert!((s.hp_regen_cooldown - 2.0).abs() < 1e-5);
    }

    #[test]
    fn regeneration_is_monotone_up_to_full() {
        let (mut ctx, id) = setup(Vec2::ZERO, PlayerTuning::default(), None);
        state_mut(&mut ctx, id).hp = 50.0;
        state_mut(&mut ctx, id).hp_regen_cooldown = 0.0;

        let mut last = 50.0;
        for _ in 0..8 {
            run(&mut ctx, id, idle(), 1.0);
            let hp = state(&ctx, id).hp;
            assert!(hp >= last);
            assert!(hp <= 100.0);
            last = hp;
        }
        assert_eq!(last, 100.0);
    }

    #[test]
    fn ceiling_mask_round_trip() {
        let (mut ctx, id) = setup(Vec2::ZERO, PlayerTuning::default(), None);
        let body = body(&ctx, id);
        state_mut(&mut ctx, id).hit_ceiling = true;

        run(&mut ctx, id, idle(), 0.1);
        assert!(state(&ctx, id).hit_ceiling);
        assert_eq!(
            ctx.physics.collision_filter(&body),
            Some(CollisionFilter::new(CATEGORY_PLAYER, MASK_PLAYER_AFTER_HITTING_CEILING))
        );
        assert!((state(&ctx, id).hp - 96.0).abs() < 1e-4, "ceiling hurts");

        run(&mut ctx, id, idle(), 0.25);
        let s = state(&ctx, id);
        assert!(!s.hit_ceiling);
        assert_eq!(s.hit_ceiling_countdown, s.tuning.hit_ceiling_duration);
        assert_eq!(
            ctx.physics.collision_filter(&body),
            Some(CollisionFilter::new(CATEGORY_PLAYER, MASK_PLAYER))
        );
    }

    #[test]
    fn death_latch_fires_once() {
        let (mut ctx, id) = setup(Vec2::new(1.0, 2.0), PlayerTuning::default(), None);
        let body = body(&ctx, id);
        state_mut(&mut ctx, id).hp = 0.0;

        let first = run(&mut ctx, id, idle(), DT);
        let at = first.explosion_at.expect("explosion requested");
        assert!((at - Vec2::new(1.0, 2.0)).length() < 1e-4, "at = {at}");
        assert!(first.detach_sprite);
        assert!(state(&ctx, id).explosion_effect_triggered);
        assert_eq!(ctx.physics.collision_filter(&body).unwrap().category, CATEGORY_NOTHING);

        for _ in 0..5 {
            let again = run(&mut ctx, id, idle(), DT);
            assert_eq!(again.explosion_at, None);
            assert!(!again.detach_sprite);
        }
        assert_eq!(count(&ctx, AudioCommand::Play(Sound::Explode)), 1);
    }

    #[test]
    fn game_over_signalled_once() {
        let (mut ctx, id) = setup(Vec2::ZERO, PlayerTuning::default(), None);
        state_mut(&mut ctx, id).hp = 0.0;

        assert!(!run(&mut ctx, id, idle(), 1.0).game_over);
        assert!(!ctx.session.game_over);
        assert!(run(&mut ctx, id, idle(), 1.0).game_over);
        assert!(ctx.session.game_over);
        for _ in 0..3 {
            assert!(!run(&mut ctx, id, idle(), 1.0).game_over);
        }
        assert!(state(&ctx, id).dead_countdown < 0.0);
    }

    #[test]
    fn falling_out_of_the_world_kills() {
        let (mut ctx, id) = setup(Vec2::ZERO, PlayerTuning::default(), None);
        let body = body(&ctx, id);
        let below = ctx.session.camera_y - ctx.session.screen_height / 2.0 - 2.0;
        ctx.physics.set_body_position(&body, Vec2::new(0.0, below));

        let outcome = run(&mut ctx, id, idle(), DT);
        assert_eq!(state(&ctx, id).hp, 0.0);
        assert!(outcome.explosion_at.is_some());
        assert_eq!(ctx.session.player_hp, 0.0);
    }

    #[test]
    fn jump_from_grass() {
        let (mut ctx, id) = setup(Vec2::new(0.0, 0.4), PlayerTuning::default(), Some(FloorKind::Grass));
        let body = body(&ctx, id);
        let input = InputSnapshot {
            jump_just_pressed: true,
            ..Default::default()
        };

        run(&mut ctx, id, input, DT);
        let vy = ctx.physics.velocity(&body).y;
        assert!((vy - 7.0).abs() < 1e-3, "vy = {vy}");
        assert_eq!(count(&ctx, AudioCommand::Play(Sound::Jump)), 1);
    }

    #[test]
    fn stone_refuses_jump() {
        let (mut ctx, id) = setup(Vec2::new(0.0, 0.4), PlayerTuning::default(), Some(FloorKind::Stone));
        let body = body(&ctx, id);
        let input = InputSnapshot {
            jump_just_pressed: true,
            ..Default::default()
        };

        run(&mut ctx, id, input, DT);
        assert!(ctx.physics.velocity(&body).y.abs() < 1e-3);
        assert_eq!(count(&ctx, AudioCommand::Play(Sound::CantJump)), 1);
        assert_eq!(count(&ctx, AudioCommand::Play(Sound::Jump)), 0);
    }

    #[test]
    fn ceiling_hit_blocks_jump() {
        let (mut ctx, id) = setup(Vec2::new(0.0, 0.4), PlayerTuning::default(), Some(FloorKind::Grass));
        state_mut(&mut ctx, id).hit_ceiling = true;
        let input = InputSnapshot {
            jump_just_pressed: true,
            ..Default::default()
        };

        run(&mut ctx, id, input, DT);
        assert_eq!(count(&ctx, AudioCommand::Play(Sound::CantJump)), 1);
    }

    #[test]
    fn jump_in_air_is_silent_and_beats_movement() {
        let (mut ctx, id) = setup(Vec2::ZERO, PlayerTuning::default(), None);
        let body = body(&ctx, id);
        let input = InputSnapshot {
            jump_just_pressed: true,
            left_held: true,
            right_held: false,
        };

        run(&mut ctx, id, input, DT);
        assert_eq!(ctx.physics.velocity(&body), Vec2::ZERO);
        assert!(ctx.audio.is_empty());
    }

    #[test]
    fn left_beats_right() {
        let (mut ctx, id) = setup(Vec2::ZERO, PlayerTuning::default(), None);
        let body = body(&ctx, id);
        let input = InputSnapshot {
            jump_just_pressed: false,
            left_held: true,
            right_held: true,
        };

        run(&mut ctx, id, input, DT);
        let vx = ctx.physics.velocity(&body).x;
        assert!((vx + 4.0).abs() < 1e-3, "vx = {vx}");
        let entity = ctx.scene.get(id).unwrap();
        assert_eq!(entity.player.as_ref().unwrap().facing, Facing::Left);
        assert!(entity.sprite.as_ref().unwrap().flip_x);
    }

    #[test]
    fn right_held_moves_right_and_turns() {
        let tuning = PlayerTuning::default();
        let (mut ctx, id) = setup(Vec2::ZERO, tuning, None);
        let body = body(&ctx, id);
        state_mut(&mut ctx, id).facing = Facing::Left;
        let input = InputSnapshot {
            right_held: true,
            ..Default::default()
        };

        run(&mut ctx, id, input, DT);
        let vx = ctx.physics.velocity(&body).x;
        assert!((vx - tuning.move_speed).abs() < 1e-3, "vx = {vx}");
        let entity = ctx.scene.get(id).unwrap();
        assert_eq!(entity.player.as_ref().unwrap().facing, Facing::Right);
        assert!(!entity.sprite.as_ref().unwrap().flip_x);
    }

    #[test]
    fn facing_ignores_slow_drift() {
        let (mut ctx, id) = setup(Vec2::ZERO, PlayerTuning::default(), None);
        let body = body(&ctx, id);
        state_mut(&mut ctx, id).facing = Facing::Left;

        ctx.physics.set_velocity(&body, Vec2::new(0.05, 0.0));
        run(&mut ctx, id, idle(), DT);
        assert_eq!(state(&ctx, id).facing, Facing::Left);

        ctx.physics.set_velocity(&body, Vec2::new(0.5, 0.0));
        run(&mut ctx, id, idle(), DT);
        assert_eq!(state(&ctx, id).facing, Facing::Right);
        assert!(!ctx.scene.get(id).unwrap().sprite.as_ref().unwrap().flip_x);
    }

    #[test]
    fn input_ignored_while_getting_ready() {
        let (mut ctx, id) = setup(Vec2::ZERO, PlayerTuning::default(), None);
        let body = body(&ctx, id);
        ctx.session.ready = true;
        let input = InputSnapshot {
            right_held: true,
            ..Default::default()
        };

        run(&mut ctx, id, input, DT);
        assert_eq!(ctx.physics.velocity(&body), Vec2::ZERO);
    }

    #[test]
    fn spring_bounces_once() {
        let (mut ctx, id) = setup(Vec2::ZERO, PlayerTuning::default(), None);
        let body = body(&ctx, id);
        ctx.physics.set_velocity(&body, Vec2::new(0.0, -3.0));
        state_mut(&mut ctx, id).hit_spring = true;

        run(&mut ctx, id, idle(), DT);
        let vy = ctx.physics.velocity(&body).y;
        assert!((vy - 7.0).abs() < 1e-3, "vy = {vy}");
        assert!(!state(&ctx, id).hit_spring);
        assert_eq!(count(&ctx, AudioCommand::Play(Sound::Jump)), 1);
    }

    #[test]
    fn animation_follows_state() {
        let current = |ctx: &EngineContext, id| ctx.scene.get(id).unwrap().animation.as_ref().unwrap().current.clone();

        let (mut ctx, id) = setup(Vec2::ZERO, PlayerTuning::default(), None);
        run(&mut ctx, id, idle(), DT);
        assert_eq!(current(&ctx, id), "fall");

        let (mut ctx, id) = setup(Vec2::new(0.0, 0.4), PlayerTuning::default(), Some(FloorKind::Grass));
        run(&mut ctx, id, idle(), DT);
        assert_eq!(current(&ctx, id), "idle");
        let input = InputSnapshot {
            right_held: true,
            ..Default::default()
        };
        run(&mut ctx, id, input, DT);
        assert_eq!(current(&ctx, id), "move");
    }

    #[test]
    fn update_players_applies_death_outcome() {
        let (mut ctx, id) = setup(Vec2::ZERO, PlayerTuning::default(), None);
        state_mut(&mut ctx, id).hp = 0.0;

        update_players(&mut ctx, &idle(), DT);

        assert!(ctx.scene.get(id).unwrap().sprite.is_none());
        assert!(ctx.scene.find_by_tag(tags::EXPLOSION).is_some());
        assert_eq!(ctx.events.len(), 1);
        assert_eq!(ctx.events[0].kind, GameEvent::PLAYER_DIED);
    }

    #[test]
    fn update_players_skips_bodiless_player() {
        let mut ctx = EngineContext::default();
        let id = ctx.next_id();
        ctx.scene.spawn(
            crate::components::entity::Entity::new(id).with_player(PlayerState::default()),
        );
        update_players(&mut ctx, &idle(), DT);
        assert!(ctx.events.is_empty());
        assert_eq!(state(&ctx, id).hp, 100.0);
    }
}
