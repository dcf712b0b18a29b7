//! 缓冲式物理对象
//!
//! 一个刚体加一个碰撞形状。刚体创建前，所有属性写入待提交的 [`BodyDef`]；
//! 刚体创建后，位置/速度/角度/类型直接读写活动刚体，缓冲值被丢弃。
//!
//! 密度和尺寸例外：改变它们需要销毁并重建碰撞形状，所以只记录并标记
//! `dirty`，由下一次 [`PhysicsBox::update`] 统一重建，绝不在 setter 里
//! 同步修改形状（避免在碰撞处理途中改动物理世界）。

use glam::Vec2;
use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

use super::config::get_config;
use super::world::{BodyDef, BodyType, ColliderDef, FixtureTag, ObjectKind, PhysicsWorld, ShapeKind};
use crate::game::GameObject;
use crate::render::{Color, RenderSurface, SpriteDraw, TextureId, TextureInfo};

/// 刚体阶段：待提交 / 已提交
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyPhase {
    /// 尚无刚体，属性都在缓冲里
    Pending(BodyDef),
    /// 活动刚体是唯一数据源
    Committed(RigidBodyHandle),
}

/// 碰撞材质（始终缓冲，形状重建时使用）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for Material {
    fn default() -> Self {
        let config = get_config();
        Self {
            density: config.default_density,
            friction: config.default_friction,
            restitution: config.default_restitution,
        }
    }
}

/// 缓冲式物理对象
#[derive(Debug, Clone)]
pub struct PhysicsBox {
    kind: ObjectKind,
    phase: BodyPhase,
    collider: Option<ColliderHandle>,
    shape: ShapeKind,
    material: Material,
    /// 世界单位尺寸
    dimension: Vec2,
    texture: Option<TextureId>,
    /// 贴图像素尺寸
    texture_size: Vec2,
    /// 每纹素对应的世界单位：dimension / texture_size
    scale: Vec2,
    /// 每世界单位的像素数
    draw_scale: f32,
    tint: Color,
    dirty: bool,
    remove: bool,
}

impl PhysicsBox {
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            phase: BodyPhase::Pending(BodyDef::default()),
            collider: None,
            shape: ShapeKind::Cuboid,
            material: Material::default(),
            dimension: Vec2::ONE,
            texture: None,
            texture_size: Vec2::ZERO,
            scale: Vec2::ONE,
            draw_scale: 1.0,
            tint: Color::WHITE,
            dirty: false,
            remove: false,
        }
    }

    // ========== 激活前的构造辅助 ==========

    pub fn with_position(mut self, position: Vec2) -> Self {
        if let BodyPhase::Pending(def) = &mut self.phase {
            def.position = position;
        }
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        if let BodyPhase::Pending(def) = &mut self.phase {
            def.rotation = rotation;
        }
        self
    }

    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        if let BodyPhase::Pending(def) = &mut self.phase {
            def.body_type = body_type;
        }
        self
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        if let BodyPhase::Pending(def) = &mut self.phase {
            def.fixed_rotation = fixed;
        }
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        if let BodyPhase::Pending(def) = &mut self.phase {
            def.gravity_scale = scale;
        }
        self
    }

    pub fn with_shape(mut self, shape: ShapeKind) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Material {
            density: material.density.max(0.0),
            friction: material.friction.max(0.0),
            restitution: material.restitution.max(0.0),
        };
        self
    }

    pub fn with_texture(mut self, texture: TextureInfo) -> Self {
        self.texture = Some(texture.id);
        self.texture_size = texture.size;
        self
    }

    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    // ========== 生命周期 ==========

    /// 创建刚体和初始形状
    ///
    /// 尺寸 = `sizing / draw_scale`。刚体创建失败时保持纯缓冲模式并返回 false，
    /// 不创建形状，绘制继续使用缓冲位置。
    pub fn activate_physics(&mut self, world: &mut PhysicsWorld, sizing: Vec2, draw_scale: f32) -> bool {
        if let BodyPhase::Committed(_) = self.phase {
            return true;
        }
        if !(draw_scale > 0.0 && draw_scale.is_finite()) {
            log::warn!("[物理对象] {:?} 的绘制比例无效: {}", self.kind, draw_scale);
            return false;
        }

        self.draw_scale = draw_scale;
        self.texture_size = sizing;
        self.dimension = sizing / draw_scale;
        self.scale = Vec2::new(
            axis_scale(self.dimension.x, sizing.x),
            axis_scale(self.dimension.y, sizing.y),
        );

        let BodyPhase::Pending(mut def) = self.phase else {
            return true;
        };
        if self.material.density == 0.0 {
            def.body_type = BodyType::Static;
            self.phase = BodyPhase::Pending(def);
        }

        let Some(handle) = world.create_body(&def, self.kind) else {
            log::warn!("[物理对象] {:?} 刚体创建失败，保持缓冲模式", self.kind);
            return false;
        };

        self.phase = BodyPhase::Committed(handle);
        self.create_shape(world)
    }

    /// 重建碰撞形状
    ///
    /// 先拆掉旧形状，再按当前半尺寸和密度挂上新形状，应用摩擦与弹性，清除 dirty。
    /// 可重复调用，每次都完整替换。
    pub fn create_shape(&mut self, world: &mut PhysicsWorld) -> bool {
        let BodyPhase::Committed(handle) = self.phase else {
            return false;
        };
        if let Some(old) = self.collider.take() {
            world.detach_collider(old);
        }

        let def = ColliderDef {
            shape: self.shape,
            half_extents: self.dimension * 0.5,
            offset: Vec2::ZERO,
            density: self.material.density,
            friction: self.material.friction,
            restitution: self.material.restitution,
            sensor: false,
            tag: FixtureTag::Solid,
        };
        self.collider = world.attach_collider(handle, &def);
        self.dirty = false;
        self.collider.is_some()
    }

    /// 每 tick 更新：唯一重建形状的地方
    pub fn update(&mut self, world: &mut PhysicsWorld) {
        if !self.dirty {
            return;
        }
        if self.material.density == 0.0 {
            self.set_body_type(world, BodyType::Static);
        }
        match self.phase {
            BodyPhase::Committed(_) => {
                self.create_shape(world);
            }
            BodyPhase::Pending(_) => self.dirty = false,
        }
    }

    /// 基础绘制记录（使用活动位置，若无刚体则使用缓冲位置）
    pub fn sprite(&self, world: &PhysicsWorld, texture: TextureId) -> SpriteDraw {
        SpriteDraw {
            texture,
            position: self.position(world) * self.draw_scale,
            scale: self.scale * self.draw_scale,
            rotation: self.rotation(world),
            flip_horizontal: false,
            frame: None,
            tint: self.tint,
        }
    }

    pub fn draw(&self, world: &PhysicsWorld, surface: &mut dyn RenderSurface) {
        if let Some(texture) = self.texture {
            surface.draw_sprite(&self.sprite(world, texture));
        }
    }

    /// 销毁活动刚体，恢复为缓冲模式（保留最后的状态）
    pub fn destroy(&mut self, world: &mut PhysicsWorld) {
        if let BodyPhase::Committed(handle) = self.phase {
            let def = self.snapshot(world);
            world.remove_body(handle);
            self.phase = BodyPhase::Pending(def);
            self.collider = None;
        }
    }

    fn snapshot(&self, world: &PhysicsWorld) -> BodyDef {
        match self.phase {
            BodyPhase::Pending(def) => def,
            BodyPhase::Committed(handle) => BodyDef {
                position: world.body_position(handle).unwrap_or_default(),
                velocity: world.linear_velocity(handle).unwrap_or_default(),
                rotation: world.body_rotation(handle).unwrap_or_default(),
                body_type: world.body_type(handle).unwrap_or_default(),
                gravity_scale: world.gravity_scale(handle).unwrap_or(1.0),
                fixed_rotation: world.is_rotation_locked(handle).unwrap_or(false),
            },
        }
    }

    // ========== 代理属性 ==========

    pub fn position(&self, world: &PhysicsWorld) -> Vec2 {
        match self.phase {
            BodyPhase::Pending(def) => def.position,
            BodyPhase::Committed(handle) => world.body_position(handle).unwrap_or_default(),
        }
    }

    pub fn set_position(&mut self, world: &mut PhysicsWorld, position: Vec2) {
        match &mut self.phase {
            BodyPhase::Pending(def) => def.position = position,
            BodyPhase::Committed(handle) => world.set_body_position(*handle, position),
        }
    }

    pub fn velocity(&self, world: &PhysicsWorld) -> Vec2 {
        match self.phase {
            BodyPhase::Pending(def) => def.velocity,
            BodyPhase::Committed(handle) => world.linear_velocity(handle).unwrap_or_default(),
        }
    }

    pub fn set_velocity(&mut self, world: &mut PhysicsWorld, velocity: Vec2) {
        match &mut self.phase {
            BodyPhase::Pending(def) => def.velocity = velocity,
            BodyPhase::Committed(handle) => world.set_linear_velocity(*handle, velocity),
        }
    }

    pub fn rotation(&self, world: &PhysicsWorld) -> f32 {
        match self.phase {
            BodyPhase::Pending(def) => def.rotation,
            BodyPhase::Committed(handle) => world.body_rotation(handle).unwrap_or_default(),
        }
    }

    pub fn set_rotation(&mut self, world: &mut PhysicsWorld, rotation: f32) {
        match &mut self.phase {
            BodyPhase::Pending(def) => def.rotation = rotation,
            BodyPhase::Committed(handle) => world.set_body_rotation(*handle, rotation),
        }
    }

    pub fn body_type(&self, world: &PhysicsWorld) -> BodyType {
        match self.phase {
            BodyPhase::Pending(def) => def.body_type,
            BodyPhase::Committed(handle) => world.body_type(handle).unwrap_or_default(),
        }
    }

    pub fn set_body_type(&mut self, world: &mut PhysicsWorld, body_type: BodyType) {
        match &mut self.phase {
            BodyPhase::Pending(def) => def.body_type = body_type,
            BodyPhase::Committed(handle) => world.set_body_type(*handle, body_type),
        }
    }

    pub fn gravity_scale(&self, world: &PhysicsWorld) -> f32 {
        match self.phase {
            BodyPhase::Pending(def) => def.gravity_scale,
            BodyPhase::Committed(handle) => world.gravity_scale(handle).unwrap_or(1.0),
        }
    }

    pub fn set_gravity_scale(&mut self, world: &mut PhysicsWorld, scale: f32) {
        match &mut self.phase {
            BodyPhase::Pending(def) => def.gravity_scale = scale,
            BodyPhase::Committed(handle) => world.set_gravity_scale(*handle, scale),
        }
    }

    // ========== 缓冲属性 ==========

    pub fn density(&self) -> f32 {
        self.material.density
    }

    /// 设置密度，下次 update 重建形状；密度为 0 时强制为静态刚体
    pub fn set_density(&mut self, density: f32) {
        self.material.density = density.max(0.0);
        self.dirty = true;
        if self.material.density == 0.0 {
            if let BodyPhase::Pending(def) = &mut self.phase {
                def.body_type = BodyType::Static;
            }
        }
    }

    pub fn friction(&self) -> f32 {
        self.material.friction
    }

    pub fn set_friction(&mut self, world: &mut PhysicsWorld, friction: f32) {
        self.material.friction = friction.max(0.0);
        if let Some(collider) = self.collider {
            world.set_collider_friction(collider, self.material.friction);
        }
    }

    pub fn restitution(&self) -> f32 {
        self.material.restitution
    }

    pub fn set_restitution(&mut self, world: &mut PhysicsWorld, restitution: f32) {
        self.material.restitution = restitution.max(0.0);
        if let Some(collider) = self.collider {
            world.set_collider_restitution(collider, self.material.restitution);
        }
    }

    pub fn dimension(&self) -> Vec2 {
        self.dimension
    }

    pub fn width(&self) -> f32 {
        self.dimension.x
    }

    pub fn height(&self) -> f32 {
        self.dimension.y
    }

    /// 只重算 X 方向的缩放
    pub fn set_width(&mut self, width: f32) {
        self.dimension.x = width;
        self.scale.x = axis_scale(width, self.texture_size.x);
        self.dirty = true;
    }

    /// 只重算 Y 方向的缩放
    pub fn set_height(&mut self, height: f32) {
        self.dimension.y = height;
        self.scale.y = axis_scale(height, self.texture_size.y);
        self.dirty = true;
    }

    pub fn set_dimension(&mut self, dimension: Vec2) {
        self.set_width(dimension.x);
        self.set_height(dimension.y);
    }

    // ========== 状态 ==========

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn phase(&self) -> BodyPhase {
        self.phase
    }

    pub fn body_handle(&self) -> Option<RigidBodyHandle> {
        match self.phase {
            BodyPhase::Committed(handle) => Some(handle),
            BodyPhase::Pending(_) => None,
        }
    }

    pub fn collider_handle(&self) -> Option<ColliderHandle> {
        self.collider
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, BodyPhase::Committed(_))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn texture_size(&self) -> Vec2 {
        self.texture_size
    }

    pub fn draw_scale(&self) -> f32 {
        self.draw_scale
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    /// 标记移除，由所属集合在下一次清扫时销毁刚体
    pub fn mark_removed(&mut self) {
        self.remove = true;
    }

    pub fn is_removed(&self) -> bool {
        self.remove
    }
}

fn axis_scale(dimension: f32, texels: f32) -> f32 {
    if texels > 0.0 {
        dimension / texels
    } else {
        0.0
    }
}

impl GameObject for PhysicsBox {
    fn update(&mut self, world: &mut PhysicsWorld, _dt: f32) {
        PhysicsBox::update(self, world);
    }

    fn draw(&self, world: &PhysicsWorld, surface: &mut dyn RenderSurface) {
        PhysicsBox::draw(self, world, surface);
    }

    fn mark_removed(&mut self) {
        PhysicsBox::mark_removed(self);
    }

    fn is_removed(&self) -> bool {
        self.remove
    }

    fn destroy(&mut self, world: &mut PhysicsWorld) {
        PhysicsBox::destroy(self, world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::RecordingSurface;

    fn world() -> PhysicsWorld {
        PhysicsWorld::with_gravity(Vec2::new(0.0, 10.0))
    }

    fn texture() -> TextureInfo {
        TextureInfo {
            id: TextureId(7),
            size: Vec2::new(64.0, 32.0),
            frames: 1,
        }
    }

    #[test]
    fn test_buffered_values_copied_on_activation() {
        let mut world = world();
        let mut obj = PhysicsBox::new(ObjectKind::Platform)
            .with_body_type(BodyType::Dynamic)
            .with_rotation(0.5);
        obj.set_position(&mut world, Vec2::new(3.0, 4.0));
        obj.set_velocity(&mut world, Vec2::new(1.0, 0.0));
        assert_eq!(obj.position(&world), Vec2::new(3.0, 4.0));
        assert!(!obj.is_active());

        assert!(obj.activate_physics(&mut world, Vec2::new(64.0, 32.0), 32.0));
        let handle = obj.body_handle().unwrap();
        assert_eq!(world.body_position(handle), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(world.linear_velocity(handle), Some(Vec2::new(1.0, 0.0)));
        assert!((obj.rotation(&world) - 0.5).abs() < 1e-5);
        assert_eq!(obj.dimension(), Vec2::new(2.0, 1.0));
        let half = world.collider_half_extents(obj.collider_handle().unwrap()).unwrap();
        assert!((half - Vec2::new(1.0, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_setters_proxy_to_live_body() {
        let mut world = world();
        let mut obj = PhysicsBox::new(ObjectKind::Platform);
        obj.activate_physics(&mut world, Vec2::splat(32.0), 32.0);
        obj.set_position(&mut world, Vec2::new(-2.0, 1.0));
        let handle = obj.body_handle().unwrap();
        assert_eq!(world.body_position(handle), Some(Vec2::new(-2.0, 1.0)));
    }

    #[test]
    fn test_failed_activation_stays_buffered() {
        let mut world = world();
        world.set_max_bodies(0);
        let mut obj = PhysicsBox::new(ObjectKind::Platform)
            .with_texture(texture())
            .with_position(Vec2::new(1.0, 2.0));

        assert!(!obj.activate_physics(&mut world, Vec2::new(64.0, 32.0), 32.0));
        assert!(obj.body_handle().is_none());
        assert!(obj.collider_handle().is_none());
        assert_eq!(world.collider_count(), 0);

        obj.set_position(&mut world, Vec2::new(5.0, 6.0));
        let mut surface = RecordingSurface::default();
        obj.draw(&world, &mut surface);
        assert_eq!(surface.sprites.len(), 1);
        assert_eq!(surface.sprites[0].position, Vec2::new(160.0, 192.0));
    }

    #[test]
    fn test_density_change_deferred_to_update() {
        let mut world = world();
        let mut obj = PhysicsBox::new(ObjectKind::Platform).with_body_type(BodyType::Dynamic);
        obj.activate_physics(&mut world, Vec2::splat(32.0), 32.0);
        let before = obj.collider_handle().unwrap();

        obj.set_density(5.0);
        assert!(obj.is_dirty());
        assert_eq!(obj.collider_handle(), Some(before));
        assert!((world.collider_density(before).unwrap() - 1.0).abs() < 1e-6);

        obj.update(&mut world);
        let after = obj.collider_handle().unwrap();
        assert!(!obj.is_dirty());
        assert!(!world.contains_collider(before));
        assert!((world.collider_density(after).unwrap() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_density_forces_static() {
        let mut world = world();
        let mut live = PhysicsBox::new(ObjectKind::Platform).with_body_type(BodyType::Dynamic);
        live.activate_physics(&mut world, Vec2::splat(32.0), 32.0);
        live.set_density(0.0);
        live.update(&mut world);
        assert_eq!(live.body_type(&world), BodyType::Static);

        let mut pending = PhysicsBox::new(ObjectKind::Platform).with_body_type(BodyType::Dynamic);
        pending.set_density(0.0);
        pending.update(&mut world);
        assert_eq!(pending.body_type(&world), BodyType::Static);
    }

    #[test]
    fn test_create_shape_is_idempotent() {
        let mut world = world();
        let mut obj = PhysicsBox::new(ObjectKind::Platform);
        obj.activate_physics(&mut world, Vec2::splat(32.0), 32.0);
        for _ in 0..3 {
            assert!(obj.create_shape(&mut world));
        }
        assert_eq!(world.collider_count(), 1);
    }

    #[test]
    fn test_scale_independent_of_mutation_order() {
        let base = PhysicsBox::new(ObjectKind::Platform).with_texture(texture());

        let mut a = base.clone();
        a.set_width(3.0);
        a.set_height(5.0);
        a.set_width(4.0);

        let mut b = base;
        b.set_height(5.0);
        b.set_width(4.0);

        for obj in [&a, &b] {
            let expected = obj.dimension() / obj.texture_size();
            assert!((obj.scale() - expected).length() < 1e-6);
        }
        assert_eq!(a.scale(), b.scale());
        assert!((a.scale().x - 4.0 / 64.0).abs() < 1e-6);
        assert!((a.scale().y - 5.0 / 32.0).abs() < 1e-6);
    }

    #[test]
    fn test_draw_uses_live_position() {
        let mut world = world();
        let mut obj = PhysicsBox::new(ObjectKind::Platform)
            .with_texture(texture())
            .with_position(Vec2::new(1.0, 1.0));
        obj.activate_physics(&mut world, Vec2::new(64.0, 32.0), 32.0);
        world.set_body_position(obj.body_handle().unwrap(), Vec2::new(2.0, 3.0));

        let mut surface = RecordingSurface::default();
        obj.draw(&world, &mut surface);
        let sprite = surface.sprites[0];
        assert_eq!(sprite.position, Vec2::new(64.0, 96.0));
        assert!((sprite.scale - Vec2::ONE).length() < 1e-6);
    }

    #[test]
    fn test_destroy_releases_body() {
        let mut world = world();
        let mut obj = PhysicsBox::new(ObjectKind::Platform).with_position(Vec2::new(4.0, 0.0));
        obj.activate_physics(&mut world, Vec2::splat(32.0), 32.0);
        obj.mark_removed();
        obj.destroy(&mut world);
        assert_eq!(world.body_count(), 0);
        assert!(!obj.is_active());
        assert_eq!(obj.position(&world), Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_reactivation_keeps_rotation_lock() {
        let mut world = world();
        let mut obj = PhysicsBox::new(ObjectKind::Carriage)
            .with_body_type(BodyType::Dynamic)
            .with_fixed_rotation(true);
        obj.activate_physics(&mut world, Vec2::splat(32.0), 32.0);
        assert_eq!(world.is_rotation_locked(obj.body_handle().unwrap()), Some(true));

        obj.destroy(&mut world);
        assert!(obj.activate_physics(&mut world, Vec2::splat(32.0), 32.0));
        assert_eq!(world.is_rotation_locked(obj.body_handle().unwrap()), Some(true));

        let mut free = PhysicsBox::new(ObjectKind::Pin).with_body_type(BodyType::Dynamic);
        free.activate_physics(&mut world, Vec2::splat(32.0), 32.0);
        free.destroy(&mut world);
        free.activate_physics(&mut world, Vec2::splat(32.0), 32.0);
        assert_eq!(world.is_rotation_locked(free.body_handle().unwrap()), Some(false));
    }
}
