//! 女裁缝（玩家角色）
//!
//! 一个锁定旋转的动态 [`PhysicsBox`]，脚下挂一块很薄的传感器，
//! 加上移动意图、起跳冷却和行走动画。

mod animation;
mod controller;
mod sensor;

use glam::Vec2;
use rapier2d::prelude::ColliderHandle;

pub use animation::{select_sprite, JumpCooldown, SeamstressSprite, WalkAnimation};
pub use controller::{ControlInput, ControlOutput, SeamstressForceController};
pub use sensor::{ContactSensor, GroundState};

use crate::game::GameObject;
use crate::physics::{
    get_config, BodyType, ColliderDef, ContactEvent, FixtureTag, Material, ObjectKind, PhysicsBox,
    PhysicsWorld, ShapeKind,
};
use crate::render::{RenderSurface, SpriteFrame, TextureInfo};

/// 女裁缝的四套贴图
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeamstressSprites {
    pub standing: TextureInfo,
    pub jumping: TextureInfo,
    pub falling: TextureInfo,
    /// 横向序列帧
    pub walking: TextureInfo,
}

#[derive(Debug)]
pub struct Seamstress {
    body: PhysicsBox,
    sensor: ContactSensor,
    sensor_collider: Option<ColliderHandle>,
    /// 传感器重建后，下一次步进完用窄相结果校正接触
    resync_pending: bool,
    sensor_height: f32,
    sensor_width_coef: f32,
    movement: f32,
    jump_requested: bool,
    facing_right: bool,
    cooldown: JumpCooldown,
    animation: WalkAnimation,
    walk_threshold: f32,
    sprites: Option<SeamstressSprites>,
    start: Vec2,
    remove: bool,
}

impl Seamstress {
    /// 创建并激活女裁缝
    ///
    /// `size` 为像素尺寸，世界尺寸 = `size / draw_scale`。
    pub fn new(
        world: &mut PhysicsWorld,
        start: Vec2,
        size: Vec2,
        sprites: Option<SeamstressSprites>,
        draw_scale: f32,
    ) -> Self {
        let config = get_config();
        let mut body = PhysicsBox::new(ObjectKind::Seamstress)
            .with_body_type(BodyType::Dynamic)
            .with_fixed_rotation(true)
            .with_position(start)
            .with_material(Material {
                density: config.seamstress_density,
                ..Material::default()
            });
        if let Some(sprites) = sprites {
            body = body.with_texture(sprites.standing);
        }

        let mut seamstress = Self {
            body,
            sensor: ContactSensor::new(),
            sensor_collider: None,
            resync_pending: false,
            sensor_height: config.sensor_height,
            sensor_width_coef: config.sensor_width_coef,
            movement: 0.0,
            jump_requested: false,
            facing_right: true,
            cooldown: JumpCooldown::new(config.seamstress_jump_cooldown),
            animation: WalkAnimation::new(config.walk_frame_ticks, config.walk_frame_count),
            walk_threshold: config.walk_speed_threshold,
            sprites,
            start,
            remove: false,
        };

        if seamstress.body.activate_physics(world, size, draw_scale) {
            seamstress.attach_sensor(world);
        } else {
            log::warn!("[女裁缝] 刚体创建失败，传感器未挂载");
        }
        seamstress
    }

    /// 在脚底挂传感器：宽度为身体宽度乘系数，中心在底边
    fn attach_sensor(&mut self, world: &mut PhysicsWorld) {
        let Some(body) = self.body.body_handle() else {
            return;
        };
        if let Some(old) = self.sensor_collider.take() {
            world.detach_collider(old);
        }

        let dimension = self.body.dimension();
        let def = ColliderDef {
            shape: ShapeKind::Cuboid,
            half_extents: Vec2::new(
                dimension.x * self.sensor_width_coef * 0.5,
                self.sensor_height * 0.5,
            ),
            offset: Vec2::new(0.0, dimension.y * 0.5),
            density: 0.0,
            friction: 0.0,
            restitution: 0.0,
            sensor: true,
            tag: FixtureTag::GroundSensor,
        };
        self.sensor_collider = world.attach_collider(body, &def);
        match self.sensor_collider {
            Some(collider) => {
                self.sensor.rebind(collider, body);
                self.resync_pending = true;
            }
            None => self.sensor.unbind(),
        }
    }

    /// 传感器重建后的第一次步进结束时，用窄相相交对校正接触集合
    pub fn sync_contacts(&mut self, world: &PhysicsWorld) {
        if !self.resync_pending {
            return;
        }
        self.resync_pending = false;
        if let Some(sensor) = self.sensor_collider {
            let overlaps = world.sensor_overlaps(sensor);
            self.sensor.resync(&overlaps);
        }
    }

    /// 转发一条接触事件给脚底传感器
    pub fn handle_contact(&mut self, event: &ContactEvent) -> bool {
        let was_grounded = self.sensor.is_grounded();
        let relevant = self.sensor.handle(event);
        if relevant && was_grounded != self.sensor.is_grounded() && get_config().debug_log {
            log::debug!("[女裁缝] 着地状态: {:?}", self.sensor.state());
        }
        relevant
    }

    // ========== 移动意图 ==========

    pub fn movement(&self) -> f32 {
        self.movement
    }

    /// 设置水平推力；非零时更新朝向，零时保持原朝向
    pub fn set_movement(&mut self, movement: f32) {
        self.movement = movement;
        if movement < 0.0 {
            self.facing_right = false;
        } else if movement > 0.0 {
            self.facing_right = true;
        }
    }

    pub fn request_jump(&mut self, requested: bool) {
        self.jump_requested = requested;
    }

    pub fn jump_requested(&self) -> bool {
        self.jump_requested
    }

    /// 请求起跳、冷却结束且着地时才真正起跳
    pub fn is_jumping(&self) -> bool {
        self.jump_requested && self.cooldown.is_ready() && self.sensor.is_grounded()
    }

    pub fn tick_cooldown(&mut self, honored: bool) {
        self.cooldown.tick(honored);
    }

    pub fn cooldown(&self) -> &JumpCooldown {
        &self.cooldown
    }

    pub fn facing_right(&self) -> bool {
        self.facing_right
    }

    // ========== 状态 ==========

    pub fn is_grounded(&self) -> bool {
        self.sensor.is_grounded()
    }

    pub fn ground_state(&self) -> GroundState {
        self.sensor.state()
    }

    pub fn is_ribboned(&self) -> bool {
        self.sensor.is_ribboned()
    }

    pub fn sensor(&self) -> &ContactSensor {
        &self.sensor
    }

    pub fn sensor_collider(&self) -> Option<ColliderHandle> {
        self.sensor_collider
    }

    pub fn body(&self) -> &PhysicsBox {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut PhysicsBox {
        &mut self.body
    }

    pub fn position(&self, world: &PhysicsWorld) -> Vec2 {
        self.body.position(world)
    }

    pub fn velocity(&self, world: &PhysicsWorld) -> Vec2 {
        self.body.velocity(world)
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn animation_frame(&self) -> u32 {
        self.animation.frame()
    }

    pub fn current_sprite(&self, world: &PhysicsWorld) -> SeamstressSprite {
        select_sprite(
            self.sensor.is_grounded(),
            self.body.velocity(world),
            self.animation.frame(),
            self.walk_threshold,
        )
    }

    /// 关卡重开：回到起点，清空速度、力、冷却和意图
    pub fn reset(&mut self, world: &mut PhysicsWorld) {
        self.body.set_position(world, self.start);
        self.body.set_velocity(world, Vec2::ZERO);
        if let Some(body) = self.body.body_handle() {
            world.reset_forces(body);
        }
        self.set_movement(0.0);
        self.jump_requested = false;
        self.cooldown.reset();
        self.animation.reset();
        log::info!("[女裁缝] 重置到 ({:.2}, {:.2})", self.start.x, self.start.y);
    }

    pub fn mark_removed(&mut self) {
        self.remove = true;
    }
}

impl GameObject for Seamstress {
    fn update(&mut self, world: &mut PhysicsWorld, _dt: f32) {
        // 尺寸变化时传感器也要跟着重建
        let rebuild_sensor = self.body.is_dirty();
        self.body.update(world);
        if rebuild_sensor {
            self.attach_sensor(world);
        }
        self.animation.tick();
    }

    fn draw(&self, world: &PhysicsWorld, surface: &mut dyn RenderSurface) {
        let Some(sprites) = self.sprites else {
            return;
        };
        let (texture, frame) = match self.current_sprite(world) {
            SeamstressSprite::Standing => (sprites.standing, None),
            SeamstressSprite::Jumping => (sprites.jumping, None),
            SeamstressSprite::Falling => (sprites.falling, None),
            SeamstressSprite::Walking(index) => (
                sprites.walking,
                Some(SpriteFrame {
                    index: index % sprites.walking.frames.max(1),
                    count: sprites.walking.frames,
                }),
            ),
        };

        let mut sprite = self.body.sprite(world, texture.id);
        sprite.flip_horizontal = !self.facing_right;
        sprite.frame = frame;
        surface.draw_sprite(&sprite);
    }

    fn mark_removed(&mut self) {
        Seamstress::mark_removed(self);
    }

    fn is_removed(&self) -> bool {
        self.remove
    }

    fn destroy(&mut self, world: &mut PhysicsWorld) {
        self.body.destroy(world);
        self.sensor_collider = None;
        self.resync_pending = false;
        self.sensor.unbind();
    }
}
