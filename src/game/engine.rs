//! 游戏引擎（帧循环）

use super::level::{LevelAssets, LevelDesc, LevelState};
use super::GameObject;
use crate::input::{MainInputController, RawInput};
use crate::physics::{get_config, PhysicsWorld};
use crate::render::RenderSurface;
use crate::seamstress::{Seamstress, SeamstressForceController};
use crate::ribbon::{RibbonChain, RibbonTrack, TrackCommand};
use crate::Result;

/// 一个 tick 结束后告诉外层的信号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSignal {
    Continue,
    /// 玩家按了退出
    Exit,
    /// 女裁缝回到了起点
    Reset,
    /// 切换到了另一个关卡（新的下标）
    LevelChanged(usize),
}

/// 游戏引擎
///
/// 物理世界的唯一所有者。接触事件在步进结束后按顺序转发给女裁缝的传感器，
/// 任何监听者都拿不到世界的可变引用。
pub struct GameEngine {
    world: PhysicsWorld,
    levels: Vec<LevelDesc>,
    level_index: usize,
    level: LevelState,
    assets: LevelAssets,
    draw_scale: f32,
    fixed_dt: f32,
    input: MainInputController,
    controller: SeamstressForceController,
    ticks: u64,
}

impl GameEngine {
    /// 载入第一个关卡；关卡列表为空时使用默认关卡
    pub fn new(levels: Vec<LevelDesc>, assets: LevelAssets) -> Result<Self> {
        let config = get_config();
        let levels = if levels.is_empty() {
            vec![LevelDesc::default()]
        } else {
            levels
        };

        let mut world = PhysicsWorld::new();
        let level = LevelState::build(&mut world, &levels[0], &assets, config.draw_scale)?;

        Ok(Self {
            world,
            levels,
            level_index: 0,
            level,
            assets,
            draw_scale: config.draw_scale,
            fixed_dt: 1.0 / config.physics_fps.max(1.0),
            input: MainInputController::new(),
            controller: SeamstressForceController::new(),
            ticks: 0,
        })
    }

    /// 推进一帧
    ///
    /// 重置、切关和退出在步进之前处理，本 tick 不再步进。
    pub fn tick(&mut self, raw: RawInput, dt: f32) -> FrameSignal {
        let dt = if dt > 0.0 { dt } else { self.fixed_dt };

        let swept = self.level.sweep(&mut self.world);
        if swept > 0 {
            log::debug!("[关卡] 清扫 {} 个对象", swept);
        }

        let intent = self.input.read(raw, self.level.seamstress.is_ribboned());
        if intent.exit {
            return FrameSignal::Exit;
        }
        if intent.next {
            return self.change_level(self.level_index + 1);
        }
        if intent.previous {
            return self.change_level(self.level_index + self.levels.len() - 1);
        }
        if intent.reset {
            self.reset();
            return FrameSignal::Reset;
        }

        let seamstress = &mut self.level.seamstress;
        seamstress.set_movement(intent.movement);
        seamstress.request_jump(intent.jump);

        if let Some(track) = &mut self.level.track {
            track.drive(&mut self.world, intent.track, dt);
        }
        self.controller.apply(&mut self.world, &mut self.level.seamstress);

        for event in self.world.step(dt) {
            self.level.seamstress.handle_contact(&event);
        }
        self.level.seamstress.sync_contacts(&self.world);

        self.level.update(&mut self.world, dt);
        self.ticks += 1;
        FrameSignal::Continue
    }

    /// 绘制当前关卡
    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        self.level.draw(&self.world, surface);
    }

    /// 女裁缝回到起点，轨道停下
    pub fn reset(&mut self) {
        self.level.seamstress.reset(&mut self.world);
        if let Some(track) = &mut self.level.track {
            track.drive(&mut self.world, TrackCommand::Stop, self.fixed_dt);
        }
    }

    pub fn next_level(&mut self) -> FrameSignal {
        self.change_level(self.level_index + 1)
    }

    pub fn previous_level(&mut self) -> FrameSignal {
        self.change_level(self.level_index + self.levels.len() - 1)
    }

    /// 用新的物理世界重建关卡（下标循环）；失败时保留当前关卡
    fn change_level(&mut self, index: usize) -> FrameSignal {
        let index = index % self.levels.len();
        let mut world = PhysicsWorld::new();
        match LevelState::build(&mut world, &self.levels[index], &self.assets, self.draw_scale) {
            Ok(level) => {
                self.world = world;
                self.level = level;
                self.level_index = index;
                self.ticks = 0;
                log::info!("[关卡] 切换到第 {} 关 '{}'", index, self.levels[index].name);
                FrameSignal::LevelChanged(index)
            }
            Err(err) => {
                log::warn!("[关卡] 第 {} 关载入失败，保留当前关卡: {}", index, err);
                FrameSignal::Continue
            }
        }
    }

    /// 追加一个运行时对象，返回它在对象列表中的下标
    pub fn add_object(&mut self, object: Box<dyn GameObject>) -> usize {
        self.level.objects.push(object);
        self.level.objects.len() - 1
    }

    pub fn objects_mut(&mut self) -> &mut [Box<dyn GameObject>] {
        &mut self.level.objects
    }

    pub fn object_count(&self) -> usize {
        self.level.objects.len()
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn seamstress(&self) -> &Seamstress {
        &self.level.seamstress
    }

    pub fn seamstress_mut(&mut self) -> &mut Seamstress {
        &mut self.level.seamstress
    }

    pub fn ribbon(&self) -> Option<&RibbonChain> {
        self.level.ribbon.as_ref()
    }

    pub fn ribbon_mut(&mut self) -> Option<&mut RibbonChain> {
        self.level.ribbon.as_mut()
    }

    pub fn track(&self) -> Option<&RibbonTrack> {
        self.level.track.as_ref()
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
