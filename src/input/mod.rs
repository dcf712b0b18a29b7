//! 输入控制
//!
//! 输入设备是外部协作者，每 tick 轮询一次 [`InputSource`] 得到按键快照
//! [`RawInput`]；[`MainInputController`] 做按下沿检测并换算成玩家意图。

use std::collections::HashSet;

use crate::physics::get_config;
use crate::ribbon::TrackCommand;

/// 逻辑按键（与具体设备无关）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Reset,
    Next,
    Previous,
    Exit,
    Left,
    Right,
    Jump,
    RibbonLeft,
    RibbonRight,
}

/// 一次轮询得到的按键状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInput {
    held: HashSet<Button>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, button: Button) -> Self {
        self.held.insert(button);
        self
    }

    pub fn press(&mut self, button: Button) {
        self.held.insert(button);
    }

    pub fn release(&mut self, button: Button) {
        self.held.remove(&button);
    }

    pub fn is_held(&self, button: Button) -> bool {
        self.held.contains(&button)
    }
}

/// 输入设备
pub trait InputSource {
    fn poll(&mut self) -> RawInput;
}

/// 本 tick 的玩家意图
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerIntent {
    /// 水平推力 = 水平输入 × 女裁缝力系数
    pub movement: f32,
    pub jump: bool,
    pub track: TrackCommand,
    pub reset: bool,
    pub next: bool,
    pub previous: bool,
    pub exit: bool,
}

/// 主输入控制器
#[derive(Debug, Clone)]
pub struct MainInputController {
    current: RawInput,
    previous: RawInput,
    force: f32,
}

impl Default for MainInputController {
    fn default() -> Self {
        Self::new()
    }
}

impl MainInputController {
    pub fn new() -> Self {
        Self {
            current: RawInput::default(),
            previous: RawInput::default(),
            force: get_config().seamstress_force,
        }
    }

    /// 读入新的快照并换算意图
    ///
    /// `ribboned` 为真且缎带在左右移动时，女裁缝额外获得同方向的一个单位输入。
    pub fn read(&mut self, raw: RawInput, ribboned: bool) -> PlayerIntent {
        self.previous = std::mem::replace(&mut self.current, raw);

        let track = match (
            self.current.is_held(Button::RibbonLeft),
            self.current.is_held(Button::RibbonRight),
        ) {
            (true, false) => TrackCommand::Left,
            (false, true) => TrackCommand::Right,
            _ => TrackCommand::Stop,
        };

        let mut horizontal = self.horizontal();
        if ribboned {
            match track {
                TrackCommand::Left => horizontal -= 1.0,
                TrackCommand::Right => horizontal += 1.0,
                TrackCommand::Stop => {}
            }
        }

        PlayerIntent {
            movement: horizontal * self.force,
            jump: self.current.is_held(Button::Jump),
            track,
            reset: self.pressed(Button::Reset),
            next: self.pressed(Button::Next),
            previous: self.pressed(Button::Previous),
            exit: self.pressed(Button::Exit),
        }
    }

    /// 右减左
    pub fn horizontal(&self) -> f32 {
        let mut horizontal = 0.0;
        if self.current.is_held(Button::Right) {
            horizontal += 1.0;
        }
        if self.current.is_held(Button::Left) {
            horizontal -= 1.0;
        }
        horizontal
    }

    /// 本 tick 刚按下（按住不重复触发）
    pub fn pressed(&self, button: Button) -> bool {
        self.current.is_held(button) && !self.previous.is_held(button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> MainInputController {
        MainInputController {
            current: RawInput::default(),
            previous: RawInput::default(),
            force: 20.0,
        }
    }

    #[test]
    fn test_edge_detection() {
        let mut input = controller();
        let held = RawInput::new().with(Button::Reset).with(Button::Next);

        let intent = input.read(held.clone(), false);
        assert!(intent.reset && intent.next);
        assert!(!intent.previous && !intent.exit);

        let intent = input.read(held, false);
        assert!(!intent.reset && !intent.next);

        input.read(RawInput::new(), false);
        let intent = input.read(RawInput::new().with(Button::Reset), false);
        assert!(intent.reset);
    }

    #[test]
    fn test_horizontal_movement_and_jump() {
        let mut input = controller();
        let intent = input.read(RawInput::new().with(Button::Left).with(Button::Jump), false);
        assert_eq!(intent.movement, -20.0);
        assert!(intent.jump);

        let both = RawInput::new().with(Button::Left).with(Button::Right);
        assert_eq!(input.read(both, false).movement, 0.0);
    }

    #[test]
    fn test_jump_is_level_not_edge() {
        let mut input = controller();
        let jump = RawInput::new().with(Button::Jump);
        assert!(input.read(jump.clone(), false).jump);
        assert!(input.read(jump, false).jump);
    }

    #[test]
    fn test_riding_the_ribbon() {
        let mut input = controller();
        let raw = RawInput::new().with(Button::RibbonRight);

        let intent = input.read(raw.clone(), false);
        assert_eq!(intent.track, TrackCommand::Right);
        assert_eq!(intent.movement, 0.0);

        let intent = input.read(raw.with(Button::Left), true);
        assert_eq!(intent.movement, 0.0);

        let intent = input.read(RawInput::new().with(Button::RibbonLeft), true);
        assert_eq!(intent.track, TrackCommand::Left);
        assert_eq!(intent.movement, -20.0);
    }

    #[test]
    fn test_conflicting_ribbon_buttons_stop() {
        let mut input = controller();
        let raw = RawInput::new().with(Button::RibbonLeft).with(Button::RibbonRight);
        assert_eq!(input.read(raw, true).track, TrackCommand::Stop);
    }
}
