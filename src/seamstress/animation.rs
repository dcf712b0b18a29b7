//! 起跳冷却与行走动画

use glam::Vec2;

/// 起跳冷却计数器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpCooldown {
    remaining: i32,
    duration: i32,
}

impl JumpCooldown {
    pub fn new(duration: i32) -> Self {
        Self {
            remaining: 0,
            duration: duration.max(0),
        }
    }

    /// 冷却结束，可以起跳
    pub fn is_ready(&self) -> bool {
        self.remaining <= 0
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    /// 每 tick 调用一次：本 tick 起跳则重置，否则向 0 递减
    pub fn tick(&mut self, honored: bool) {
        if honored {
            self.remaining = self.duration;
        } else if self.remaining > 0 {
            self.remaining -= 1;
        }
    }

    pub fn reset(&mut self) {
        self.remaining = 0;
    }
}

/// 行走序列帧
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkAnimation {
    ticks: u32,
    frame: u32,
    cadence: u32,
    count: u32,
}

impl WalkAnimation {
    pub fn new(cadence: u32, count: u32) -> Self {
        Self {
            ticks: 0,
            frame: 0,
            cadence: cadence.max(1),
            count: count.max(1),
        }
    }

    /// 每 `cadence` 个 tick 前进一帧，循环
    pub fn tick(&mut self) {
        self.ticks += 1;
        if self.ticks >= self.cadence {
            self.ticks = 0;
            self.frame = (self.frame + 1) % self.count;
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn frame_count(&self) -> u32 {
        self.count
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
        self.frame = 0;
    }
}

/// 用哪张贴图画女裁缝
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeamstressSprite {
    Standing,
    Jumping,
    Falling,
    /// 行走序列中的某一帧
    Walking(u32),
}

/// 根据着地状态、速度和当前行走帧选择贴图
///
/// Y 轴向下，所以空中 `velocity.y < 0` 是上升。
pub fn select_sprite(grounded: bool, velocity: Vec2, frame: u32, walk_threshold: f32) -> SeamstressSprite {
    if !grounded {
        if velocity.y < 0.0 {
            SeamstressSprite::Jumping
        } else {
            SeamstressSprite::Falling
        }
    } else if velocity.x.abs() > walk_threshold {
        SeamstressSprite::Walking(frame)
    } else {
        SeamstressSprite::Standing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_after_honored_jump() {
        let mut cooldown = JumpCooldown::new(30);
        assert!(cooldown.is_ready());

        cooldown.tick(true);
        assert_eq!(cooldown.remaining(), 30);
        for expected in (0..30).rev() {
            cooldown.tick(false);
            assert_eq!(cooldown.remaining(), expected);
        }
        cooldown.tick(false);
        assert_eq!(cooldown.remaining(), 0);
        assert!(cooldown.is_ready());
    }

    #[test]
    fn test_cooldown_rearmed_by_new_jump() {
        let mut cooldown = JumpCooldown::new(30);
        cooldown.tick(true);
        for _ in 0..5 {
            cooldown.tick(false);
        }
        cooldown.tick(true);
        assert_eq!(cooldown.remaining(), 30);
    }

    #[test]
    fn test_walk_frame_cadence() {
        let mut anim = WalkAnimation::new(10, 8);
        for _ in 0..9 {
            anim.tick();
        }
        assert_eq!(anim.frame(), 0);
        anim.tick();
        assert_eq!(anim.frame(), 1);
        for _ in 0..70 {
            anim.tick();
        }
        assert_eq!(anim.frame(), 0);
    }

    #[test]
    fn test_sprite_selection() {
        let t = 0.1;
        assert_eq!(select_sprite(true, Vec2::ZERO, 3, t), SeamstressSprite::Standing);
        assert_eq!(select_sprite(true, Vec2::new(-2.0, 0.0), 3, t), SeamstressSprite::Walking(3));
        assert_eq!(select_sprite(false, Vec2::new(0.0, -5.0), 3, t), SeamstressSprite::Jumping);
        assert_eq!(select_sprite(false, Vec2::new(4.0, 5.0), 3, t), SeamstressSprite::Falling);
    }
}
