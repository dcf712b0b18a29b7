//! 绘制接口
//!
//! 渲染后端是外部协作者，这里只定义绘制调用的形状。

mod gradient;
mod texture;

use glam::Vec2;

pub use gradient::{Gradient, GradientStopper};
pub use texture::{TextureId, TextureInfo, TextureRegistry};

/// RGBA 颜色，分量取值 [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// 线性插值，`t` 不做截断
    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// 横向序列帧中的某一帧
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteFrame {
    pub index: u32,
    pub count: u32,
}

/// 一次精灵绘制
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    pub texture: TextureId,
    /// 屏幕像素坐标（精灵中心）
    pub position: Vec2,
    /// 纹素到像素的缩放
    pub scale: Vec2,
    pub rotation: f32,
    pub flip_horizontal: bool,
    pub frame: Option<SpriteFrame>,
    pub tint: Color,
}

/// 渲染表面
pub trait RenderSurface {
    fn draw_sprite(&mut self, sprite: &SpriteDraw);

    /// 像素坐标下画线
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// 记录所有绘制调用
    #[derive(Default)]
    pub struct RecordingSurface {
        pub sprites: Vec<SpriteDraw>,
        pub lines: Vec<(Vec2, Vec2, Color)>,
    }

    impl RenderSurface for RecordingSurface {
        fn draw_sprite(&mut self, sprite: &SpriteDraw) {
            self.sprites.push(*sprite);
        }

        fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
            self.lines.push((from, to, color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_lerp_midpoint() {
        let c = Color::BLACK.lerp(Color::WHITE, 0.5);
        assert!((c.r - 0.5).abs() < 1e-6);
        assert!((c.g - 0.5).abs() < 1e-6);
        assert!((c.a - 1.0).abs() < 1e-6);
    }
}
