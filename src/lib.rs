//! Ribbons 玩法引擎
//!
//! 横版物理平台跳跃游戏 Ribbons 的核心玩法层，运行在 Rapier2D 之上：
//! - 缓冲式物理对象（激活前后统一读写，形状重建延迟到 update）
//! - 复合物理对象与缎带链构建（路径细分、链节焊接）
//! - 基于传感器的着地 / 挂缎带状态机
//! - 女裁缝的施力控制器、起跳冷却与行走动画
//! - 帧循环：输入 → 施力 → 步进 → 接触分发 → 更新 → 绘制

pub mod game;
pub mod input;
pub mod physics;
pub mod render;
pub mod ribbon;
pub mod seamstress;

pub use game::{FrameSignal, GameEngine, GameObject, LevelDesc};
pub use input::{InputSource, MainInputController, PlayerIntent, RawInput};
pub use physics::{
    BodyType, CompositePhysicsObject, ContactEvent, GameplayConfig, ObjectKind, PhysicsBox,
    PhysicsWorld,
};
pub use render::{Color, Gradient, RenderSurface, SpriteDraw, TextureRegistry};
pub use ribbon::{ChainPath, Pin, RibbonChain, RibbonTrack, TrackCommand};
pub use seamstress::{ContactSensor, GroundState, Seamstress, SeamstressForceController};

use glam::Vec2;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RibbonsError {
    #[error("Gradient stopper out of range: {percent} (expected 0..=1)")]
    GradientStopper { percent: f32 },

    #[error("Gradient needs at least one color")]
    EmptyGradient,

    #[error("Gradient has {colors} colors but {percents} percents")]
    GradientLength { colors: usize, percents: usize },

    #[error("Path needs at least 2 waypoints, got {points}")]
    PathTooShort { points: usize },

    #[error("Segment {index} is not axis-aligned: {from} -> {to}")]
    DiagonalSegment { index: usize, from: Vec2, to: Vec2 },

    #[error("Invalid link size: {width} x {height}")]
    InvalidLinkSize { width: f32, height: f32 },

    #[error("Unknown texture: {0}")]
    UnknownTexture(String),

    #[error("Texture registered after loading finished: {0}")]
    TexturesLocked(String),
}

pub type Result<T> = std::result::Result<T, RibbonsError>;
