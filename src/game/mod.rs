//! 帧循环与关卡
//!
//! 每个 tick 严格按顺序执行：
//! 清扫已移除对象 → 读取输入 → 女裁缝意图 → 轨道指令 → 施力 → 物理步进
//! → 分发接触事件 → 对象更新（重建脏形状、推进动画）。
//! 绘制在 tick 之外单独调用。

mod engine;
mod level;

pub use engine::{FrameSignal, GameEngine};
pub use level::{LevelAssets, LevelDesc, LevelState, PlatformDesc, TrackDesc};

use crate::physics::PhysicsWorld;
use crate::render::RenderSurface;

/// 可更新、可绘制的游戏对象
///
/// 对象自己从不销毁刚体：`mark_removed` 只做标记，
/// 由持有它的集合在 tick 之间清扫时调用 `destroy`。
pub trait GameObject {
    /// 步进之后调用
    fn update(&mut self, world: &mut PhysicsWorld, dt: f32);

    fn draw(&self, world: &PhysicsWorld, surface: &mut dyn RenderSurface);

    fn mark_removed(&mut self);

    fn is_removed(&self) -> bool;

    /// 释放物理世界中的刚体和关节
    fn destroy(&mut self, world: &mut PhysicsWorld);
}
