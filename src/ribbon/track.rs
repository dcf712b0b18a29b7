//! 缎带轨道
//!
//! 一条折线轨道，上面有若干运动学铰点，托板通过铰链挂在铰点上。
//! 玩家站在托板上时可以驱动铰点沿轨道左右移动，到端点自动停下。

use glam::Vec2;
use rapier2d::prelude::{ImpulseJointHandle, RigidBodyHandle};

use crate::game::GameObject;
use crate::physics::{
    get_config, BodyDef, BodyType, Material, ObjectKind, PhysicsBox, PhysicsWorld,
};
use crate::render::{Color, RenderSurface, TextureInfo};
use crate::{Result, RibbonsError};

/// 轨道指令
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackCommand {
    /// 沿轨道反向（朝起点）
    Left,
    /// 沿轨道正向（朝终点）
    Right,
    #[default]
    Stop,
}

impl TrackCommand {
    fn sign(self) -> f32 {
        match self {
            TrackCommand::Left => -1.0,
            TrackCommand::Right => 1.0,
            TrackCommand::Stop => 0.0,
        }
    }
}

/// 折线的弧长参数化
#[derive(Debug, Clone)]
struct Polyline {
    points: Vec<Vec2>,
    /// 每个点处的累计弧长
    cumulative: Vec<f32>,
}

impl Polyline {
    fn new(points: Vec<Vec2>) -> Self {
        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        cumulative.push(0.0);
        for pair in points.windows(2) {
            total += (pair[1] - pair[0]).length();
            cumulative.push(total);
        }
        Self { points, cumulative }
    }

    fn length(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    fn point_at(&self, distance: f32) -> Vec2 {
        let distance = distance.clamp(0.0, self.length());
        for i in 0..self.points.len() - 1 {
            let (start, end) = (self.cumulative[i], self.cumulative[i + 1]);
            if distance <= end {
                let span = end - start;
                if span <= f32::EPSILON {
                    return self.points[i];
                }
                let t = (distance - start) / span;
                return self.points[i].lerp(self.points[i + 1], t);
            }
        }
        self.points[self.points.len() - 1]
    }
}

#[derive(Debug, Clone, Copy)]
struct Hinge {
    body: Option<RigidBodyHandle>,
    /// 沿轨道的弧长位置
    distance: f32,
}

/// 缎带轨道
#[derive(Debug)]
pub struct RibbonTrack {
    track: Polyline,
    hinges: Vec<Hinge>,
    carriage: PhysicsBox,
    joints: Vec<ImpulseJointHandle>,
    speed: f32,
    command: TrackCommand,
    line_color: Color,
    remove: bool,
}

impl RibbonTrack {
    /// 创建铰点、托板及两者之间的铰链
    ///
    /// `hinge_distances` 是各铰点在轨道上的弧长位置，超出范围的会被夹到端点。
    /// 托板中心 = 铰点平均位置 + `carriage_offset`。
    pub fn new(
        world: &mut PhysicsWorld,
        points: Vec<Vec2>,
        hinge_distances: &[f32],
        carriage_sprite: TextureInfo,
        carriage_offset: Vec2,
        draw_scale: f32,
    ) -> Result<Self> {
        if points.len() < 2 {
            return Err(RibbonsError::PathTooShort { points: points.len() });
        }
        let size = carriage_sprite.size;
        if !(size.x > 0.0 && size.y > 0.0 && size.is_finite()) {
            return Err(RibbonsError::InvalidLinkSize {
                width: size.x,
                height: size.y,
            });
        }

        let config = get_config();
        let track = Polyline::new(points);

        let mut hinges = Vec::with_capacity(hinge_distances.len());
        for &distance in hinge_distances {
            let distance = distance.clamp(0.0, track.length());
            let def = BodyDef {
                position: track.point_at(distance),
                body_type: BodyType::Kinematic,
                ..BodyDef::default()
            };
            let body = world.create_body(&def, ObjectKind::TrackHinge);
            if body.is_none() {
                log::warn!("[缎带] 轨道铰点创建失败（弧长 {:.3}）", distance);
            }
            hinges.push(Hinge { body, distance });
        }

        let center = if hinges.is_empty() {
            track.point_at(0.0)
        } else {
            hinges.iter().map(|h| track.point_at(h.distance)).sum::<Vec2>() / hinges.len() as f32
        } + carriage_offset;

        let mut carriage = PhysicsBox::new(ObjectKind::Carriage)
            .with_body_type(BodyType::Dynamic)
            .with_position(center)
            .with_fixed_rotation(true)
            .with_material(Material {
                density: config.carriage_density,
                ..Material::default()
            })
            .with_texture(carriage_sprite);
        carriage.activate_physics(world, size, draw_scale);

        let mut joints = Vec::new();
        if let Some(carriage_body) = carriage.body_handle() {
            for hinge in &hinges {
                let Some(hinge_body) = hinge.body else {
                    continue;
                };
                let anchor = track.point_at(hinge.distance) - center;
                if let Some(joint) =
                    world.create_revolute_joint(hinge_body, carriage_body, Vec2::ZERO, anchor)
                {
                    joints.push(joint);
                }
            }
        }

        log::info!(
            "[缎带] 轨道长度 {:.3}，{} 个铰点，{} 个铰链",
            track.length(),
            hinges.len(),
            joints.len()
        );

        Ok(Self {
            track,
            hinges,
            carriage,
            joints,
            speed: config.track_speed,
            command: TrackCommand::Stop,
            line_color: Color::RED,
            remove: false,
        })
    }

    /// 按指令驱动铰点一个 tick
    ///
    /// 铰点速度取“目标弧长位置 - 当前位置”/ dt，拐角和端点都自然处理，
    /// 到达端点后速度为零。
    pub fn drive(&mut self, world: &mut PhysicsWorld, command: TrackCommand, dt: f32) {
        self.command = command;
        let length = self.track.length();
        let sign = command.sign();

        for hinge in &mut self.hinges {
            let Some(body) = hinge.body else {
                continue;
            };
            if sign == 0.0 || dt <= 0.0 {
                world.set_linear_velocity(body, Vec2::ZERO);
                continue;
            }
            let target = (hinge.distance + sign * self.speed * dt).clamp(0.0, length);
            let current = world.body_position(body).unwrap_or_else(|| self.track.point_at(hinge.distance));
            world.set_linear_velocity(body, (self.track.point_at(target) - current) / dt);
            hinge.distance = target;
        }
    }

    /// 当前指令下托板是否真的在动（停在端点时为 false）
    pub fn is_moving(&self) -> bool {
        let length = self.track.length();
        match self.command {
            TrackCommand::Stop => false,
            TrackCommand::Left => self.hinges.iter().any(|h| h.distance > 0.0),
            TrackCommand::Right => self.hinges.iter().any(|h| h.distance < length),
        }
    }

    pub fn command(&self) -> TrackCommand {
        self.command
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn length(&self) -> f32 {
        self.track.length()
    }

    pub fn points(&self) -> &[Vec2] {
        &self.track.points
    }

    pub fn hinge_distances(&self) -> Vec<f32> {
        self.hinges.iter().map(|h| h.distance).collect()
    }

    pub fn hinge_position(&self, world: &PhysicsWorld, index: usize) -> Option<Vec2> {
        self.hinges.get(index)?.body.and_then(|b| world.body_position(b))
    }

    pub fn carriage(&self) -> &PhysicsBox {
        &self.carriage
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn mark_removed(&mut self) {
        self.remove = true;
    }
}

impl GameObject for RibbonTrack {
    fn update(&mut self, world: &mut PhysicsWorld, _dt: f32) {
        self.carriage.update(world);
    }

    fn draw(&self, world: &PhysicsWorld, surface: &mut dyn RenderSurface) {
        let scale = self.carriage.draw_scale();
        for pair in self.track.points.windows(2) {
            surface.draw_line(pair[0] * scale, pair[1] * scale, self.line_color);
        }
        self.carriage.draw(world, surface);
    }

    fn mark_removed(&mut self) {
        RibbonTrack::mark_removed(self);
    }

    fn is_removed(&self) -> bool {
        self.remove
    }

    fn destroy(&mut self, world: &mut PhysicsWorld) {
        for joint in self.joints.drain(..) {
            world.remove_joint(joint);
        }
        for hinge in &mut self.hinges {
            if let Some(body) = hinge.body.take() {
                world.remove_body(body);
            }
        }
        self.carriage.destroy(world);
    }
}
