//! 缎带路径

use glam::Vec2;

use crate::{Result, RibbonsError};

/// 线段方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentAxis {
    Horizontal,
    Vertical,
}

/// 路径线段
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
    pub axis: SegmentAxis,
}

impl Segment {
    pub fn delta(&self) -> Vec2 {
        self.to - self.from
    }

    pub fn length(&self) -> f32 {
        self.delta().length()
    }

    /// 单位方向，零长度线段返回零向量
    pub fn direction(&self) -> Vec2 {
        self.delta().normalize_or_zero()
    }
}

/// 轴对齐折线，至少两个点
///
/// 每段必须是纯水平或纯竖直；斜线段在构造时直接拒绝。
/// 零长度线段是合法输入，只是不会放置任何链节。
#[derive(Debug, Clone, PartialEq)]
pub struct ChainPath {
    points: Vec<Vec2>,
}

impl ChainPath {
    pub fn new(points: Vec<Vec2>) -> Result<Self> {
        if points.len() < 2 {
            return Err(RibbonsError::PathTooShort { points: points.len() });
        }
        for (index, pair) in points.windows(2).enumerate() {
            let delta = pair[1] - pair[0];
            if delta.x != 0.0 && delta.y != 0.0 {
                return Err(RibbonsError::DiagonalSegment {
                    index,
                    from: pair[0],
                    to: pair[1],
                });
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points.windows(2).map(|pair| {
            let delta = pair[1] - pair[0];
            let axis = if delta.x == 0.0 && delta.y != 0.0 {
                SegmentAxis::Vertical
            } else {
                SegmentAxis::Horizontal
            };
            Segment {
                from: pair[0],
                to: pair[1],
                axis,
            }
        })
    }

    pub fn length(&self) -> f32 {
        self.segments().map(|s| s.length()).sum()
    }
}
