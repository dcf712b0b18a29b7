//! 物理世界管理器
//!
//! 使用 Rapier2D 实现，对外只暴露句柄和 glam 向量。
//!
//! ## 职责
//! | 概念 | Rapier |
//! |------|--------|
//! | 刚体 (Body) | RigidBodySet 中的 RigidBody |
//! | 夹具 (Fixture) | ColliderSet 中挂在刚体上的 Collider |
//! | 关节 (Joint) | ImpulseJointSet（焊接 = FixedJoint，铰链 = RevoluteJoint） |
//! | 接触回调 | EventHandler 收集 CollisionEvent，步进后统一分发 |
//!
//! 接触事件在步进期间只做缓冲，步进结束后转换为不可变的 [`ContactEvent`]
//! 交给帧循环分发，监听者永远拿不到世界的可变引用。

use glam::Vec2;
use parking_lot::Mutex;
use rapier2d::na::{Isometry2, Point2, UnitComplex, Vector2};
use rapier2d::prelude::*;

use super::config::get_config;

/// 物体类别，写入刚体的 user_data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// 静态平台
    Platform,
    /// 玩家角色
    Seamstress,
    /// 缎带链节
    RibbonLink,
    /// 轨道上的运动学铰点
    TrackHinge,
    /// 轨道托板
    Carriage,
    /// 图钉
    Pin,
}

impl ObjectKind {
    /// 是否属于缎带（角色站上去即视为“挂在缎带上”）
    pub fn is_ribbon(self) -> bool {
        matches!(self, ObjectKind::RibbonLink | ObjectKind::Carriage)
    }

    fn to_user_data(self) -> u128 {
        match self {
            ObjectKind::Platform => 1,
            ObjectKind::Seamstress => 2,
            ObjectKind::RibbonLink => 3,
            ObjectKind::TrackHinge => 4,
            ObjectKind::Carriage => 5,
            ObjectKind::Pin => 6,
        }
    }

    fn from_user_data(data: u128) -> Option<Self> {
        match data {
            1 => Some(ObjectKind::Platform),
            2 => Some(ObjectKind::Seamstress),
            3 => Some(ObjectKind::RibbonLink),
            4 => Some(ObjectKind::TrackHinge),
            5 => Some(ObjectKind::Carriage),
            6 => Some(ObjectKind::Pin),
            _ => None,
        }
    }
}

/// 夹具标签，写入碰撞体的 user_data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FixtureTag {
    /// 普通实体碰撞体
    #[default]
    Solid,
    /// 角色脚底的地面传感器
    GroundSensor,
}

impl FixtureTag {
    fn to_user_data(self) -> u128 {
        match self {
            FixtureTag::Solid => 0,
            FixtureTag::GroundSensor => 1,
        }
    }

    fn from_user_data(data: u128) -> Self {
        match data {
            1 => FixtureTag::GroundSensor,
            _ => FixtureTag::Solid,
        }
    }
}

/// 刚体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyType {
    /// 静态，不受力
    #[default]
    Static,
    /// 运动学，由速度驱动
    Kinematic,
    /// 动态，完全由物理驱动
    Dynamic,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Static => RigidBodyType::Fixed,
            BodyType::Kinematic => RigidBodyType::KinematicVelocityBased,
            BodyType::Dynamic => RigidBodyType::Dynamic,
        }
    }

    fn from_rapier(body_type: RigidBodyType) -> Self {
        match body_type {
            RigidBodyType::Fixed => BodyType::Static,
            RigidBodyType::KinematicVelocityBased | RigidBodyType::KinematicPositionBased => {
                BodyType::Kinematic
            }
            RigidBodyType::Dynamic => BodyType::Dynamic,
        }
    }
}

/// 创建刚体所需的参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDef {
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub body_type: BodyType,
    pub gravity_scale: f32,
    pub fixed_rotation: bool,
}

impl Default for BodyDef {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            body_type: BodyType::Static,
            gravity_scale: 1.0,
            fixed_rotation: false,
        }
    }
}

/// 碰撞形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeKind {
    /// 矩形
    #[default]
    Cuboid,
    /// 圆形，半径取半宽
    Ball,
}

/// 创建碰撞体所需的参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderDef {
    pub shape: ShapeKind,
    pub half_extents: Vec2,
    /// 相对刚体的局部偏移
    pub offset: Vec2,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub sensor: bool,
    pub tag: FixtureTag,
}

impl ColliderDef {
    pub fn cuboid(half_extents: Vec2) -> Self {
        Self {
            shape: ShapeKind::Cuboid,
            half_extents,
            offset: Vec2::ZERO,
            density: 1.0,
            friction: 0.0,
            restitution: 0.0,
            sensor: false,
            tag: FixtureTag::Solid,
        }
    }

    fn build(&self) -> Collider {
        let builder = match self.shape {
            ShapeKind::Cuboid => ColliderBuilder::cuboid(self.half_extents.x, self.half_extents.y),
            ShapeKind::Ball => ColliderBuilder::ball(self.half_extents.x),
        };

        builder
            .translation(vec2_to_rapier(self.offset))
            .density(self.density)
            .friction(self.friction)
            .restitution(self.restitution)
            .sensor(self.sensor)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .user_data(self.tag.to_user_data())
            .build()
    }
}

/// 接触阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Begin,
    End,
}

/// 接触事件中的一方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureRef {
    pub collider: ColliderHandle,
    /// 碰撞体已被移除时为 None
    pub body: Option<RigidBodyHandle>,
    pub tag: FixtureTag,
    pub owner: Option<ObjectKind>,
}

/// 步进后分发的不可变接触记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub phase: ContactPhase,
    pub a: FixtureRef,
    pub b: FixtureRef,
    /// 因碰撞体被移除而结束的接触
    pub removed: bool,
}

/// 步进期间的事件缓冲
struct ContactCollector {
    events: Mutex<Vec<CollisionEvent>>,
}

impl ContactCollector {
    fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    fn drain(&self) -> Vec<CollisionEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventHandler for ContactCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.events.lock().push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// 物理世界
///
/// 帧循环是唯一所有者：施力 → `step` → 分发接触事件 → 对象更新。
pub struct PhysicsWorld {
    physics_pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    gravity: Vector<Real>,
    /// 刚体预算
    max_bodies: usize,
    fps: f32,
    event_collector: ContactCollector,
}

impl PhysicsWorld {
    /// 按全局配置创建
    pub fn new() -> Self {
        let config = get_config();
        let mut world = Self::with_gravity(Vec2::new(0.0, config.gravity_y));
        world.max_bodies = config.max_bodies;
        world.fps = config.physics_fps.max(1.0);
        world.integration_parameters.dt = 1.0 / world.fps;

        if config.debug_log {
            log::info!(
                "[物理世界] FPS={}, 重力Y={}, 刚体上限={}",
                config.physics_fps, config.gravity_y, config.max_bodies
            );
        }

        world
    }

    /// 使用指定重力创建
    pub fn with_gravity(gravity: Vec2) -> Self {
        Self {
            physics_pipeline: PhysicsPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity: vec2_to_rapier(gravity),
            max_bodies: usize::MAX,
            fps: 60.0,
            event_collector: ContactCollector::new(),
        }
    }

    /// 设置刚体上限
    pub fn set_max_bodies(&mut self, max_bodies: usize) {
        self.max_bodies = max_bodies;
    }

    /// 设置重力
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = vec2_to_rapier(gravity);
    }

    /// 获取重力
    pub fn gravity(&self) -> Vec2 {
        rapier_to_vec2(&self.gravity)
    }

    /// 刚体数量
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// 碰撞体数量
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// 关节数量
    pub fn joint_count(&self) -> usize {
        self.impulse_joint_set.len()
    }

    // ========== 刚体 ==========

    /// 创建刚体
    ///
    /// 超出刚体预算或参数非有限值时返回 None，调用方保持缓冲模式。
    pub fn create_body(&mut self, def: &BodyDef, kind: ObjectKind) -> Option<RigidBodyHandle> {
        if self.rigid_body_set.len() >= self.max_bodies {
            log::warn!(
                "[物理世界] 刚体数量已达上限 {}，{:?} 创建失败",
                self.max_bodies, kind
            );
            return None;
        }
        if !def.position.is_finite() || !def.velocity.is_finite() || !def.rotation.is_finite() {
            log::warn!("[物理世界] {:?} 的初始状态不是有限值，创建失败", kind);
            return None;
        }

        let locked_axes = if def.fixed_rotation {
            LockedAxes::ROTATION_LOCKED
        } else {
            LockedAxes::empty()
        };

        let body = RigidBodyBuilder::new(def.body_type.to_rapier())
            .translation(vec2_to_rapier(def.position))
            .rotation(def.rotation)
            .linvel(vec2_to_rapier(def.velocity))
            .gravity_scale(def.gravity_scale)
            .locked_axes(locked_axes)
            .user_data(kind.to_user_data())
            .build();

        Some(self.rigid_body_set.insert(body))
    }

    /// 移除刚体及其所有碰撞体和关节
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some()
    }

    pub fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set.contains(handle)
    }

    pub fn body_kind(&self, handle: RigidBodyHandle) -> Option<ObjectKind> {
        self.rigid_body_set
            .get(handle)
            .and_then(|rb| ObjectKind::from_user_data(rb.user_data))
    }

    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.rigid_body_set
            .get(handle)
            .map(|rb| rapier_to_vec2(rb.translation()))
    }

    pub fn set_body_position(&mut self, handle: RigidBodyHandle, position: Vec2) {
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.set_translation(vec2_to_rapier(position), true);
        }
    }

    pub fn body_rotation(&self, handle: RigidBodyHandle) -> Option<f32> {
        self.rigid_body_set.get(handle).map(|rb| rb.rotation().angle())
    }

    pub fn set_body_rotation(&mut self, handle: RigidBodyHandle, rotation: f32) {
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.set_rotation(UnitComplex::new(rotation), true);
        }
    }

    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.rigid_body_set
            .get(handle)
            .map(|rb| rapier_to_vec2(rb.linvel()))
    }

    pub fn set_linear_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec2) {
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.set_linvel(vec2_to_rapier(velocity), true);
        }
    }

    pub fn body_type(&self, handle: RigidBodyHandle) -> Option<BodyType> {
        self.rigid_body_set
            .get(handle)
            .map(|rb| BodyType::from_rapier(rb.body_type()))
    }

    pub fn set_body_type(&mut self, handle: RigidBodyHandle, body_type: BodyType) {
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.set_body_type(body_type.to_rapier(), true);
        }
    }

    /// 旋转是否被锁定
    pub fn is_rotation_locked(&self, handle: RigidBodyHandle) -> Option<bool> {
        self.rigid_body_set
            .get(handle)
            .map(|rb| rb.locked_axes().contains(LockedAxes::ROTATION_LOCKED))
    }

    pub fn gravity_scale(&self, handle: RigidBodyHandle) -> Option<f32> {
        self.rigid_body_set.get(handle).map(|rb| rb.gravity_scale())
    }

    pub fn set_gravity_scale(&mut self, handle: RigidBodyHandle, scale: f32) {
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.set_gravity_scale(scale, true);
        }
    }

    /// 持续力（Rapier 的力会一直保留到 `reset_forces`）
    pub fn add_force(&mut self, handle: RigidBodyHandle, force: Vec2) {
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.add_force(vec2_to_rapier(force), true);
        }
    }

    pub fn reset_forces(&mut self, handle: RigidBodyHandle) {
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.reset_forces(true);
        }
    }

    /// 瞬时冲量
    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec2) {
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.apply_impulse(vec2_to_rapier(impulse), true);
        }
    }

    // ========== 夹具 ==========

    /// 给刚体挂一个碰撞体
    pub fn attach_collider(
        &mut self,
        parent: RigidBodyHandle,
        def: &ColliderDef,
    ) -> Option<ColliderHandle> {
        if !self.rigid_body_set.contains(parent) {
            return None;
        }
        let collider = def.build();
        Some(
            self.collider_set
                .insert_with_parent(collider, parent, &mut self.rigid_body_set),
        )
    }

    /// 拆下并销毁碰撞体
    pub fn detach_collider(&mut self, handle: ColliderHandle) -> bool {
        self.collider_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.rigid_body_set,
                true,
            )
            .is_some()
    }

    pub fn contains_collider(&self, handle: ColliderHandle) -> bool {
        self.collider_set.contains(handle)
    }

    /// 窄相中当前与传感器相交的碰撞体
    ///
    /// 只反映最近一次步进的结果；刚挂上的传感器在下一次步进前没有相交对。
    pub fn sensor_overlaps(&self, sensor: ColliderHandle) -> Vec<FixtureRef> {
        self.narrow_phase
            .intersection_pairs_with(sensor)
            .filter(|&(_, _, intersecting)| intersecting)
            .map(|(h1, h2, _)| if h1 == sensor { h2 } else { h1 })
            .map(|other| self.fixture_ref(other))
            .collect()
    }

    pub fn set_collider_friction(&mut self, handle: ColliderHandle, friction: f32) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_friction(friction);
        }
    }

    pub fn set_collider_restitution(&mut self, handle: ColliderHandle, restitution: f32) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_restitution(restitution);
        }
    }

    /// 碰撞体的半尺寸（仅矩形和圆形）
    pub fn collider_half_extents(&self, handle: ColliderHandle) -> Option<Vec2> {
        let shape = self.collider_set.get(handle)?.shape();
        if let Some(cuboid) = shape.as_cuboid() {
            Some(rapier_to_vec2(&cuboid.half_extents))
        } else {
            shape.as_ball().map(|ball| Vec2::splat(ball.radius))
        }
    }

    pub fn collider_density(&self, handle: ColliderHandle) -> Option<f32> {
        self.collider_set.get(handle).map(|c| c.density())
    }

    // ========== 关节 ==========

    /// 焊接关节
    ///
    /// `frame_a` / `frame_b` 为各自刚体局部空间下的锚点和角度，
    /// 两帧在世界空间重合即为静止状态。
    pub fn create_weld_joint(
        &mut self,
        body_a: RigidBodyHandle,
        body_b: RigidBodyHandle,
        frame_a: (Vec2, f32),
        frame_b: (Vec2, f32),
    ) -> Option<ImpulseJointHandle> {
        if !self.rigid_body_set.contains(body_a) || !self.rigid_body_set.contains(body_b) {
            return None;
        }
        let joint = FixedJointBuilder::new()
            .local_frame1(Isometry2::new(vec2_to_rapier(frame_a.0), frame_a.1))
            .local_frame2(Isometry2::new(vec2_to_rapier(frame_b.0), frame_b.1))
            .contacts_enabled(false)
            .build();
        Some(self.impulse_joint_set.insert(body_a, body_b, joint, true))
    }

    /// 铰链关节
    pub fn create_revolute_joint(
        &mut self,
        body_a: RigidBodyHandle,
        body_b: RigidBodyHandle,
        anchor_a: Vec2,
        anchor_b: Vec2,
    ) -> Option<ImpulseJointHandle> {
        if !self.rigid_body_set.contains(body_a) || !self.rigid_body_set.contains(body_b) {
            return None;
        }
        let joint = RevoluteJointBuilder::new()
            .local_anchor1(Point2::new(anchor_a.x, anchor_a.y))
            .local_anchor2(Point2::new(anchor_b.x, anchor_b.y))
            .contacts_enabled(false)
            .build();
        Some(self.impulse_joint_set.insert(body_a, body_b, joint, true))
    }

    pub fn remove_joint(&mut self, handle: ImpulseJointHandle) -> bool {
        self.impulse_joint_set.remove(handle, true).is_some()
    }

    pub fn contains_joint(&self, handle: ImpulseJointHandle) -> bool {
        self.impulse_joint_set.get(handle).is_some()
    }

    // ========== 步进 ==========

    /// 执行一次物理步进，返回本步产生的接触事件
    ///
    /// `dt <= 0` 时使用配置的固定步长。
    pub fn step(&mut self, dt: f32) -> Vec<ContactEvent> {
        self.integration_parameters.dt = if dt > 0.0 { dt } else { 1.0 / self.fps };

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &self.event_collector,
        );

        self.event_collector
            .drain()
            .into_iter()
            .map(|event| ContactEvent {
                phase: if event.started() {
                    ContactPhase::Begin
                } else {
                    ContactPhase::End
                },
                a: self.fixture_ref(event.collider1()),
                b: self.fixture_ref(event.collider2()),
                removed: event.removed(),
            })
            .collect()
    }

    fn fixture_ref(&self, collider: ColliderHandle) -> FixtureRef {
        match self.collider_set.get(collider) {
            Some(c) => {
                let body = c.parent();
                FixtureRef {
                    collider,
                    body,
                    tag: FixtureTag::from_user_data(c.user_data),
                    owner: body.and_then(|h| self.body_kind(h)),
                }
            }
            None => FixtureRef {
                collider,
                body: None,
                tag: FixtureTag::Solid,
                owner: None,
            },
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// 将 glam Vec2 转换为 Rapier Vector
pub fn vec2_to_rapier(v: Vec2) -> Vector2<Real> {
    Vector2::new(v.x, v.y)
}

/// 将 Rapier Vector 转换为 glam Vec2
pub fn rapier_to_vec2(v: &Vector2<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> PhysicsWorld {
        PhysicsWorld::with_gravity(Vec2::new(0.0, 10.0))
    }

    #[test]
    fn test_body_budget_refuses_creation() {
        let mut world = world();
        world.set_max_bodies(1);
        assert!(world.create_body(&BodyDef::default(), ObjectKind::Platform).is_some());
        assert!(world.create_body(&BodyDef::default(), ObjectKind::Platform).is_none());
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn test_non_finite_body_refused() {
        let mut world = world();
        let def = BodyDef {
            position: Vec2::new(f32::NAN, 0.0),
            ..BodyDef::default()
        };
        assert!(world.create_body(&def, ObjectKind::Platform).is_none());
    }

    #[test]
    fn test_body_kind_round_trip() {
        let mut world = world();
        let handle = world
            .create_body(&BodyDef::default(), ObjectKind::RibbonLink)
            .unwrap();
        assert_eq!(world.body_kind(handle), Some(ObjectKind::RibbonLink));
        assert!(ObjectKind::RibbonLink.is_ribbon());
        assert!(ObjectKind::Carriage.is_ribbon());
        assert!(!ObjectKind::Platform.is_ribbon());
    }

    #[test]
    fn test_dynamic_body_falls_along_positive_y() {
        let mut world = world();
        let def = BodyDef {
            body_type: BodyType::Dynamic,
            ..BodyDef::default()
        };
        let handle = world.create_body(&def, ObjectKind::Pin).unwrap();
        world.attach_collider(handle, &ColliderDef::cuboid(Vec2::splat(0.5)));
        for _ in 0..10 {
            world.step(1.0 / 60.0);
        }
        assert!(world.body_position(handle).unwrap().y > 0.0);
    }

    #[test]
    fn test_sensor_reports_begin_with_tags() {
        let mut world = world();
        let ground = world
            .create_body(
                &BodyDef {
                    position: Vec2::new(0.0, 2.0),
                    ..BodyDef::default()
                },
                ObjectKind::Platform,
            )
            .unwrap();
        world.attach_collider(ground, &ColliderDef::cuboid(Vec2::new(5.0, 0.5)));

        let feet = world
            .create_body(
                &BodyDef {
                    position: Vec2::new(0.0, 1.2),
                    body_type: BodyType::Dynamic,
                    gravity_scale: 0.0,
                    ..BodyDef::default()
                },
                ObjectKind::Seamstress,
            )
            .unwrap();
        world.attach_collider(feet, &ColliderDef::cuboid(Vec2::splat(0.2)));
        let sensor = world
            .attach_collider(
                feet,
                &ColliderDef {
                    sensor: true,
                    tag: FixtureTag::GroundSensor,
                    ..ColliderDef::cuboid(Vec2::new(0.5, 0.5))
                },
            )
            .unwrap();

        let mut events = Vec::new();
        for _ in 0..3 {
            events.extend(world.step(1.0 / 60.0));
        }
        let begin = events
            .iter()
            .find(|e| {
                e.phase == ContactPhase::Begin && (e.a.collider == sensor || e.b.collider == sensor)
            })
            .expect("sensor overlap should begin");
        let (mine, other) = if begin.a.collider == sensor {
            (begin.a, begin.b)
        } else {
            (begin.b, begin.a)
        };
        assert_eq!(mine.tag, FixtureTag::GroundSensor);
        assert_eq!(mine.owner, Some(ObjectKind::Seamstress));
        assert_eq!(other.owner, Some(ObjectKind::Platform));
        assert_eq!(other.body, Some(ground));

        let overlaps = world.sensor_overlaps(sensor);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].body, Some(ground));
        assert_eq!(overlaps[0].owner, Some(ObjectKind::Platform));
    }

    #[test]
    fn test_joint_requires_live_bodies() {
        let mut world = world();
        let a = world.create_body(&BodyDef::default(), ObjectKind::Pin).unwrap();
        let b = world.create_body(&BodyDef::default(), ObjectKind::Pin).unwrap();
        let joint = world.create_revolute_joint(a, b, Vec2::ZERO, Vec2::ZERO);
        assert!(joint.is_some());
        assert_eq!(world.joint_count(), 1);

        world.remove_body(b);
        assert_eq!(world.joint_count(), 0);
        assert!(world
            .create_weld_joint(a, b, (Vec2::ZERO, 0.0), (Vec2::ZERO, 0.0))
            .is_none());
    }
}
