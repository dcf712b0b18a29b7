//! 玩法与物理配置
//!
//! 所有参数扁平化，直接在代码中修改默认值即可。
//! 各组件在构造时读取一次快照，运行中的世界不会在步进途中被改参。

use once_cell::sync::Lazy;
use std::sync::RwLock;

/// 玩法配置（扁平化，不嵌套）
#[derive(Debug, Clone)]
pub struct GameplayConfig {
    // ========== 物理世界 ==========
    /// 重力 Y 分量（Y 轴向下，正数向下）
    pub gravity_y: f32,
    /// 物理 FPS，`dt <= 0` 时使用 `1 / physics_fps` 作为步长
    pub physics_fps: f32,
    /// 世界允许的最大刚体数，超出后创建刚体失败（对象退化为纯缓冲模式）
    pub max_bodies: usize,

    // ========== 默认材质 ==========
    /// 默认密度
    pub default_density: f32,
    /// 默认摩擦
    pub default_friction: f32,
    /// 默认弹性
    pub default_restitution: f32,

    // ========== 女裁缝移动 ==========
    /// 水平输入乘以此力
    pub seamstress_force: f32,
    /// 着地时无输入的阻尼系数
    pub seamstress_ground_damping: f32,
    /// 空中无输入的阻尼系数
    pub seamstress_air_damping: f32,
    /// 水平最大速度（不限制竖直方向）
    pub seamstress_max_speed: f32,
    /// 起跳冲量大小（向上，即 -Y）
    pub seamstress_jump_impulse: f32,
    /// 起跳冷却（tick 数）
    pub seamstress_jump_cooldown: i32,
    /// 女裁缝密度
    pub seamstress_density: f32,

    // ========== 脚底传感器 ==========
    /// 传感器高度（世界单位）
    pub sensor_height: f32,
    /// 传感器宽度占身体宽度的比例
    pub sensor_width_coef: f32,

    // ========== 行走动画 ==========
    /// 每隔多少 tick 前进一帧
    pub walk_frame_ticks: u32,
    /// 行走序列帧数
    pub walk_frame_count: u32,
    /// 水平速度超过此值才算行走
    pub walk_speed_threshold: f32,

    // ========== 缎带 ==========
    /// 缎带链节密度（很重，角色踩上去不会压弯）
    pub ribbon_link_density: f32,
    /// 链节沿路径方向的对齐偏移（经验值，让贴图边缘相接而不重叠）
    pub ribbon_link_offset: f32,
    /// 轨道缎带的移动速度
    pub track_speed: f32,
    /// 轨道托板密度
    pub carriage_density: f32,

    // ========== 绘制 ==========
    /// 每世界单位的像素数
    pub draw_scale: f32,

    // ========== 调试 ==========
    /// 是否输出调试日志
    pub debug_log: bool,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            // ====== 物理世界 ======
            // 原作在像素坐标下用 1000，这里是世界单位
            gravity_y: 30.0,
            physics_fps: 60.0,
            max_bodies: 4096,

            // ====== 默认材质 ======
            default_density: 1.0,
            default_friction: 0.1,
            default_restitution: 0.0,

            // ====== 女裁缝移动 ======
            seamstress_force: 20.0,
            seamstress_ground_damping: 10.0,
            // 空中阻尼系数更大
            seamstress_air_damping: 15.0,
            seamstress_max_speed: 6.0,
            seamstress_jump_impulse: 18.0,
            seamstress_jump_cooldown: 30,
            seamstress_density: 1.0,

            // ====== 脚底传感器 ======
            sensor_height: 0.05,
            sensor_width_coef: 0.7,

            // ====== 行走动画 ======
            walk_frame_ticks: 10,
            walk_frame_count: 8,
            walk_speed_threshold: 0.1,

            // ====== 缎带 ======
            ribbon_link_density: 100_000.0,
            ribbon_link_offset: 0.05,
            track_speed: 10.0,
            carriage_density: 1.0,

            // ====== 绘制 ======
            draw_scale: 32.0,

            // ====== 调试 ======
            debug_log: false,
        }
    }
}

/// 全局配置实例
static GAMEPLAY_CONFIG: Lazy<RwLock<GameplayConfig>> = Lazy::new(|| {
    RwLock::new(GameplayConfig::default())
});

/// 获取当前配置（只读快照）
pub fn get_config() -> GameplayConfig {
    GAMEPLAY_CONFIG
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// 手动设置配置（用于运行时调试）
pub fn set_config(config: GameplayConfig) {
    *GAMEPLAY_CONFIG
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) = config;
}

/// 重置为默认配置
pub fn reset_config() {
    set_config(GameplayConfig::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning() {
        let config = GameplayConfig::default();
        assert_eq!(config.seamstress_jump_cooldown, 30);
        assert_eq!(config.walk_frame_ticks, 10);
        assert!(config.seamstress_air_damping > config.seamstress_ground_damping);
        assert!(config.gravity_y > 0.0);
    }
}
