//! 女裁缝施力控制器
//!
//! 每个物理步进前调用一次 [`SeamstressForceController::apply`]：
//! - 无水平输入：施加与水平速度成正比的反向阻尼力（空中系数更大）
//! - 有输入且已达最大速度（同方向）：直接改写水平速度，不再施力
//! - 否则：施加输入方向的推力
//! - 本 tick 起跳被允许时额外施加一次向上冲量

use glam::Vec2;

use super::Seamstress;
use crate::physics::{get_config, PhysicsWorld};

/// 控制器一次计算的输入
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlInput {
    /// 水平推力（输入乘以力系数）
    pub movement: f32,
    pub velocity: Vec2,
    pub grounded: bool,
    /// 本 tick 起跳是否被允许
    pub jump: bool,
}

/// 控制器一次计算的结果
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlOutput {
    pub force: Vec2,
    /// 需要直接写回的速度（超速钳制）
    pub velocity: Option<Vec2>,
    pub impulse: Option<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeamstressForceController {
    ground_damping: f32,
    air_damping: f32,
    max_speed: f32,
    jump_impulse: f32,
}

impl Default for SeamstressForceController {
    fn default() -> Self {
        Self::new()
    }
}

impl SeamstressForceController {
    pub fn new() -> Self {
        let config = get_config();
        Self {
            ground_damping: config.seamstress_ground_damping,
            air_damping: config.seamstress_air_damping,
            max_speed: config.seamstress_max_speed,
            jump_impulse: config.seamstress_jump_impulse,
        }
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn damping(&self, grounded: bool) -> f32 {
        if grounded {
            self.ground_damping
        } else {
            self.air_damping
        }
    }

    /// 纯计算，不触碰物理世界
    pub fn compute(&self, input: &ControlInput) -> ControlOutput {
        let mut output = ControlOutput::default();
        let vx = input.velocity.x;

        if input.movement == 0.0 {
            output.force.x = -self.damping(input.grounded) * vx;
        } else if vx.abs() >= self.max_speed && vx.signum() == input.movement.signum() {
            output.velocity = Some(Vec2::new(self.max_speed.copysign(vx), input.velocity.y));
        } else {
            output.force.x = input.movement;
        }

        if input.jump {
            output.impulse = Some(Vec2::new(0.0, -self.jump_impulse));
        }
        output
    }

    /// 对女裁缝施加本 tick 的力，并推进起跳冷却
    ///
    /// Rapier 的力在步进之间保留，所以先清零再施加。
    /// 返回本 tick 是否起跳。
    pub fn apply(&self, world: &mut PhysicsWorld, seamstress: &mut Seamstress) -> bool {
        let honored = seamstress.is_jumping();
        let Some(body) = seamstress.body().body_handle() else {
            seamstress.tick_cooldown(false);
            return false;
        };

        let output = self.compute(&ControlInput {
            movement: seamstress.movement(),
            velocity: seamstress.body().velocity(world),
            grounded: seamstress.is_grounded(),
            jump: honored,
        });

        world.reset_forces(body);
        if let Some(velocity) = output.velocity {
            world.set_linear_velocity(body, velocity);
        }
        if output.force != Vec2::ZERO {
            world.add_force(body, output.force);
        }
        if let Some(impulse) = output.impulse {
            world.apply_impulse(body, impulse);
            log::debug!("[女裁缝] 起跳");
        }

        seamstress.tick_cooldown(honored);
        honored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::GameplayConfig;

    fn controller() -> SeamstressForceController {
        let config = GameplayConfig::default();
        SeamstressForceController {
            ground_damping: config.seamstress_ground_damping,
            air_damping: config.seamstress_air_damping,
            max_speed: config.seamstress_max_speed,
            jump_impulse: config.seamstress_jump_impulse,
        }
    }

    #[test]
    fn test_grounded_damping() {
        let c = controller();
        let out = c.compute(&ControlInput {
            movement: 0.0,
            velocity: Vec2::new(3.0, 0.0),
            grounded: true,
            jump: false,
        });
        assert!((out.force.x - (-c.damping(true) * 3.0)).abs() < 1e-6);
        assert_eq!(out.velocity, None);
        assert_eq!(out.impulse, None);
    }

    #[test]
    fn test_airborne_damping_uses_air_coefficient() {
        let c = controller();
        let out = c.compute(&ControlInput {
            movement: 0.0,
            velocity: Vec2::new(-2.0, 4.0),
            grounded: false,
            jump: false,
        });
        assert!((out.force.x - c.damping(false) * 2.0).abs() < 1e-6);
        assert_eq!(out.force.y, 0.0);
    }

    #[test]
    fn test_over_max_speed_is_clamped() {
        let c = controller();
        for sign in [1.0f32, -1.0] {
            let out = c.compute(&ControlInput {
                movement: 20.0 * sign,
                velocity: Vec2::new((c.max_speed() + 1.0) * sign, -2.0),
                grounded: true,
                jump: false,
            });
            assert_eq!(out.velocity, Some(Vec2::new(c.max_speed() * sign, -2.0)));
            assert_eq!(out.force, Vec2::ZERO);
        }
    }

    #[test]
    fn test_reversing_at_max_speed_applies_force() {
        let c = controller();
        let out = c.compute(&ControlInput {
            movement: -20.0,
            velocity: Vec2::new(c.max_speed() + 1.0, 0.0),
            grounded: true,
            jump: false,
        });
        assert_eq!(out.velocity, None);
        assert_eq!(out.force.x, -20.0);
    }

    #[test]
    fn test_jump_impulse_points_up() {
        let c = controller();
        let out = c.compute(&ControlInput {
            movement: 0.0,
            velocity: Vec2::ZERO,
            grounded: true,
            jump: true,
        });
        let impulse = out.impulse.unwrap();
        assert_eq!(impulse.x, 0.0);
        assert!(impulse.y < 0.0);
    }
}
