use glam::Vec2;
use rapier2d::prelude::*;
use std::sync::Mutex;

use crate::api::types::EntityId;

// ---------------------------------------------------------------------------
// glam <-> nalgebra conversion helpers
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn vec2_to_point(v: Vec2) -> nalgebra::Point2<f32> {
    nalgebra::Point2::new(v.x, v.y)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// Shape description for a collider, in body-local coordinates.
#[derive(Debug, Clone, Copy)]
pub enum ColliderDesc {
    Cuboid { half_width: f32, half_height: f32 },
    /// A one-sided edge, used for the player's feet.
    Segment { a: Vec2, b: Vec2 },
}

impl ColliderDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Cuboid { half_width, half_height } => {
                ColliderBuilder::cuboid(half_width, half_height)
            }
            ColliderDesc::Segment { a, b } => {
                ColliderBuilder::segment(vec2_to_point(a), vec2_to_point(b))
            }
        }
    }
}

/// Category/mask bit pair deciding which colliders may touch.
///
/// Two colliders interact when each one's category intersects the other's
/// mask. Maps onto rapier's `InteractionGroups` (memberships = category,
/// filter = mask).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionFilter {
    pub category: u32,
    pub mask: u32,
}

impl CollisionFilter {
    pub const fn new(category: u32, mask: u32) -> Self {
        Self { category, mask }
    }

    fn to_groups(self) -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_truncate(self.category),
            Group::from_bits_truncate(self.mask),
        )
    }

    fn from_groups(groups: InteractionGroups) -> Self {
        Self {
            category: groups.memberships.bits(),
            mask: groups.filter.bits(),
        }
    }
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            category: u32::MAX,
            mask: u32::MAX,
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.0,
            friction: 0.2,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub velocity: Vec2,
    pub gravity_scale: f32,
    pub fixed_rotation: bool,
    /// Primary collider. Its handle is kept on the returned `PhysicsBody`.
    pub collider: ColliderDesc,
    /// Additional colliders attached to the same body.
    pub extra_colliders: Vec<ColliderDesc>,
    pub filter: CollisionFilter,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
            fixed_rotation: false,
            collider,
            extra_colliders: Vec::new(),
            filter: CollisionFilter::default(),
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            gravity_scale: 0.0,
            fixed_rotation: true,
            collider,
            extra_colliders: Vec::new(),
            filter: CollisionFilter::default(),
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }

    pub fn with_extra_collider(mut self, collider: ColliderDesc) -> Self {
        self.extra_colliders.push(collider);
        self
    }

    /// Collision filter applied to every collider of the body.
    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Handle pair stored on an Entity, referencing Rapier internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// A collision event between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    /// `true` when the collision just started, `false` when it ended.
    pub started: bool,
}

impl CollisionPair {
    /// The other participant if `id` is one of the two, otherwise `None`.
    pub fn other(&self, id: EntityId) -> Option<EntityId> {
        if self.entity_a == id {
            Some(self.entity_b)
        } else if self.entity_b == id {
            Some(self.entity_a)
        } else {
            None
        }
    }
}

/// One ray/collider intersection handed to a ray-cast visitor.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub body_handle: Option<RigidBodyHandle>,
    pub entity: Option<EntityId>,
    pub point: Vec2,
    pub normal: Vec2,
    /// Position along the ray, 0.0 at the origin and 1.0 at the end point.
    pub fraction: f32,
    pub filter: CollisionFilter,
}

/// What a ray-cast visitor wants to happen after seeing a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayControl {
    /// Ignore this hit and keep going.
    Skip,
    /// Terminate the cast.
    Stop,
    /// Keep going, but only report hits up to this fraction.
    ContinueUntil(f32),
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        match self.collisions.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let Ok(mut events) = self.collisions.lock() {
            events.push(event);
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps the Rapier2D pipeline. The game uses a Y-up world in metres,
/// so gravity is negative Y.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// Create a rigid body with its colliders and return handles.
    /// The EntityId is stored in the body's `user_data` for collision lookups.
    pub fn create_body(
        &mut self,
        entity_id: EntityId,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec2_to_na(desc.position))
            .linvel(vec2_to_na(desc.velocity))
            .gravity_scale(desc.gravity_scale)
            .locked_axes(if desc.fixed_rotation {
                LockedAxes::ROTATION_LOCKED
            } else {
                LockedAxes::empty()
            })
            .user_data(entity_id.0 as u128)
            .build();

        let body_handle = self.bodies.insert(rb);

        let collider_handle = self.attach_collider(body_handle, &desc.collider, desc.filter, material);
        for shape in &desc.extra_colliders {
            self.attach_collider(body_handle, shape, desc.filter, material);
        }

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Rebuild the ray-cast acceleration structure from current collider
    /// positions. `step_into` does this automatically; call it after building
    /// a level and before the first ray cast.
    pub fn update_queries(&mut self) {
        self.query_pipeline.update(&self.colliders);
    }

    /// Step the simulation and collect collision events into the provided Vec.
    pub fn step_into(&mut self, collision_events: &mut Vec<CollisionPair>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        // Resolve collider handles → body handles → entity IDs
        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };

            let entity_a = self.collider_to_entity(h1);
            let entity_b = self.collider_to_entity(h2);

            if let (Some(a), Some(b)) = (entity_a, entity_b) {
                collision_events.push(CollisionPair {
                    entity_a: a,
                    entity_b: b,
                    started,
                });
            }
        }
    }

    /// Apply an instantaneous impulse at the body's centre of mass.
    pub fn apply_impulse(&mut self, body: &PhysicsBody, impulse: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.apply_impulse(vec2_to_na(impulse), true);
        }
    }

    /// Set the linear velocity of a body directly.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    /// Get the current linear velocity of a body.
    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Get the current position of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.translation()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Teleport a body. Used by tests and level resets.
    pub fn set_body_position(&mut self, body: &PhysicsBody, pos: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_translation(vec2_to_na(pos), true);
        }
    }

    pub fn mass(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.mass())
            .unwrap_or(0.0)
    }

    /// Whether the body still exists in the simulation.
    pub fn contains(&self, body: &PhysicsBody) -> bool {
        self.bodies.contains(body.body_handle)
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Filter of the body's primary collider.
    pub fn collision_filter(&self, body: &PhysicsBody) -> Option<CollisionFilter> {
        self.colliders
            .get(body.collider_handle)
            .map(|c| CollisionFilter::from_groups(c.collision_groups()))
    }

    /// Replace the mask on every collider of the body, keeping categories.
    pub fn set_collision_mask(&mut self, body: &PhysicsBody, mask: u32) {
        self.update_filters(body, |filter| filter.mask = mask);
    }

    /// Replace the category on every collider of the body, keeping masks.
    pub fn set_collision_category(&mut self, body: &PhysicsBody, category: u32) {
        self.update_filters(body, |filter| filter.category = category);
    }

    /// Cast a ray from `from` to `to` and hand each hit, nearest first, to
    /// `visitor`. Fractions are relative to the segment, so 1.0 is `to`.
    ///
    /// Filters are not applied: every collider crossing the segment is
    /// reported and the visitor decides what counts.
    pub fn ray_cast(&self, from: Vec2, to: Vec2, mut visitor: impl FnMut(&RayHit) -> RayControl) {
        let ray = Ray::new(vec2_to_point(from), vec2_to_na(to - from));

        let mut hits: Vec<(ColliderHandle, RayIntersection)> = Vec::new();
        self.query_pipeline.intersections_with_ray(
            &self.bodies,
            &self.colliders,
            &ray,
            1.0,
            true,
            QueryFilter::default(),
            |handle, intersection| {
                hits.push((handle, intersection));
                true
            },
        );
        hits.sort_by(|a, b| a.1.time_of_impact.total_cmp(&b.1.time_of_impact));

        let mut max_fraction = 1.0_f32;
        for (handle, intersection) in hits {
            let fraction = intersection.time_of_impact;
            if fraction > max_fraction {
                break;
            }
            let Some(collider) = self.colliders.get(handle) else {
                continue;
            };
            let hit = RayHit {
                body_handle: collider.parent(),
                entity: self.collider_to_entity(handle),
                point: from + (to - from) * fraction,
                normal: na_to_vec2(&intersection.normal),
                fraction,
                filter: CollisionFilter::from_groups(collider.collision_groups()),
            };
            match visitor(&hit) {
                RayControl::Skip => continue,
                RayControl::Stop => break,
                RayControl::ContinueUntil(limit) => max_fraction = max_fraction.min(limit),
            }
        }
    }

    // -- private helpers --

    fn attach_collider(
        &mut self,
        body_handle: RigidBodyHandle,
        shape: &ColliderDesc,
        filter: CollisionFilter,
        material: ColliderMaterial,
    ) -> ColliderHandle {
        let collider = shape
            .build_collider()
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .collision_groups(filter.to_groups())
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        self.colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies)
    }

    fn update_filters(&mut self, body: &PhysicsBody, mut edit: impl FnMut(&mut CollisionFilter)) {
        let Some(rb) = self.bodies.get(body.body_handle) else {
            return;
        };
        for handle in rb.colliders() {
            if let Some(collider) = self.colliders.get_mut(*handle) {
                let mut filter = CollisionFilter::from_groups(collider.collision_groups());
                edit(&mut filter);
                collider.set_collision_groups(filter.to_groups());
            }
        }
    }

    fn collider_to_entity(&self, collider_handle: ColliderHandle) -> Option<EntityId> {
        let collider = self.colliders.get(collider_handle)?;
        let body_handle = collider.parent()?;
        let body = self.bodies.get(body_handle)?;
        Some(EntityId(body.user_data as u32))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
