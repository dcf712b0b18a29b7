//! 关卡描述与关卡内容

use glam::Vec2;

use super::GameObject;
use crate::physics::{BodyType, ObjectKind, PhysicsBox, PhysicsWorld};
use crate::render::{RenderSurface, TextureInfo, TextureRegistry};
use crate::ribbon::{ChainPath, Pin, RibbonChain, RibbonTrack};
use crate::seamstress::{Seamstress, SeamstressSprites};
use crate::Result;

/// 静态平台（世界单位）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformDesc {
    pub position: Vec2,
    pub size: Vec2,
}

/// 移动缎带的轨道
#[derive(Debug, Clone, PartialEq)]
pub struct TrackDesc {
    pub points: Vec<Vec2>,
    /// 各铰点的弧长位置
    pub hinges: Vec<f32>,
    /// 托板相对铰点中心的偏移
    pub carriage_offset: Vec2,
}

/// 关卡描述
#[derive(Debug, Clone, PartialEq)]
pub struct LevelDesc {
    pub name: String,
    pub seamstress_start: Vec2,
    pub platforms: Vec<PlatformDesc>,
    /// 焊接缎带的路径
    pub ribbon: Option<Vec<Vec2>>,
    pub track: Option<TrackDesc>,
    pub pins: Vec<Vec2>,
}

impl Default for LevelDesc {
    /// 默认关卡：一块地面、一条 L 形缎带和一条 U 形轨道
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            seamstress_start: Vec2::new(2.0, 2.0),
            platforms: vec![
                PlatformDesc {
                    position: Vec2::new(17.0, 24.0),
                    size: Vec2::new(34.0, 1.0),
                },
                PlatformDesc {
                    position: Vec2::new(2.0, 10.0),
                    size: Vec2::new(2.0, 1.0),
                },
            ],
            ribbon: Some(vec![
                Vec2::new(8.0, 12.0),
                Vec2::new(8.0, 18.0),
                Vec2::new(20.0, 18.0),
            ]),
            track: Some(TrackDesc {
                points: vec![
                    Vec2::new(4.0, 5.0),
                    Vec2::new(4.0, 22.0),
                    Vec2::new(30.0, 22.0),
                    Vec2::new(30.0, 5.0),
                ],
                hinges: vec![2.0, 4.0],
                carriage_offset: Vec2::new(1.0, 0.0),
            }),
            pins: vec![Vec2::new(24.0, 10.0)],
        }
    }
}

/// 关卡用到的贴图
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelAssets {
    pub platform: TextureInfo,
    pub ribbon_link: TextureInfo,
    pub carriage: TextureInfo,
    pub pin: Option<TextureInfo>,
    pub seamstress: SeamstressSprites,
    /// 女裁缝的像素尺寸
    pub seamstress_size: Vec2,
}

impl LevelAssets {
    /// 按约定的名字从注册表取贴图
    pub fn from_registry(registry: &TextureRegistry) -> Result<Self> {
        let standing = registry.get("standing")?;
        Ok(Self {
            platform: registry.get("64x64platform")?,
            ribbon_link: registry.get("ribbon_link")?,
            carriage: registry.get("carriage")?,
            pin: registry.get("pin").ok(),
            seamstress: SeamstressSprites {
                standing,
                jumping: registry.get("spritejump")?,
                falling: registry.get("spritefall")?,
                walking: registry.get("walkfstrip")?,
            },
            seamstress_size: standing.size,
        })
    }
}

/// 一个已经载入物理世界的关卡
pub struct LevelState {
    pub seamstress: Seamstress,
    pub ribbon: Option<RibbonChain>,
    pub track: Option<RibbonTrack>,
    /// 平台、图钉以及运行中追加的对象
    pub objects: Vec<Box<dyn GameObject>>,
}

impl LevelState {
    /// 在给定世界中创建关卡的全部对象
    ///
    /// 缎带先激活所有链节再焊接；平台的尺寸改动在这里直接 `update` 一次，
    /// 保证第一步物理步进时形状已经是最终尺寸。
    pub fn build(
        world: &mut PhysicsWorld,
        desc: &LevelDesc,
        assets: &LevelAssets,
        draw_scale: f32,
    ) -> Result<Self> {
        let mut objects: Vec<Box<dyn GameObject>> = Vec::new();

        for platform in &desc.platforms {
            let mut body = PhysicsBox::new(ObjectKind::Platform)
                .with_body_type(BodyType::Static)
                .with_position(platform.position)
                .with_texture(assets.platform);
            body.activate_physics(world, assets.platform.size, draw_scale);
            body.set_dimension(platform.size);
            body.update(world);
            objects.push(Box::new(body));
        }

        for &position in &desc.pins {
            objects.push(Box::new(Pin::new(world, position, assets.pin, draw_scale)));
        }

        let ribbon = match &desc.ribbon {
            Some(points) => {
                let path = ChainPath::new(points.clone())?;
                let mut chain = RibbonChain::new(world, path, assets.ribbon_link, draw_scale)?;
                chain.create_joints(world);
                Some(chain)
            }
            None => None,
        };

        let track = match &desc.track {
            Some(track) => Some(RibbonTrack::new(
                world,
                track.points.clone(),
                &track.hinges,
                assets.carriage,
                track.carriage_offset,
                draw_scale,
            )?),
            None => None,
        };

        let seamstress = Seamstress::new(
            world,
            desc.seamstress_start,
            assets.seamstress_size,
            Some(assets.seamstress),
            draw_scale,
        );

        log::info!(
            "[关卡] 载入 '{}'：{} 个对象，刚体 {} 个，关节 {} 个",
            desc.name,
            objects.len(),
            world.body_count(),
            world.joint_count()
        );

        Ok(Self {
            seamstress,
            ribbon,
            track,
            objects,
        })
    }

    /// 清扫已标记移除的对象，返回清掉的数量
    pub fn sweep(&mut self, world: &mut PhysicsWorld) -> usize {
        let mut swept = 0;
        self.objects.retain_mut(|object| {
            if object.is_removed() {
                object.destroy(world);
                swept += 1;
                false
            } else {
                true
            }
        });
        if self.ribbon.as_ref().is_some_and(|r| r.is_removed()) {
            if let Some(mut ribbon) = self.ribbon.take() {
                ribbon.destroy(world);
                swept += 1;
            }
        }
        if self.track.as_ref().is_some_and(|t| t.is_removed()) {
            if let Some(mut track) = self.track.take() {
                track.destroy(world);
                swept += 1;
            }
        }
        swept
    }

    /// 步进之后的对象更新
    pub fn update(&mut self, world: &mut PhysicsWorld, dt: f32) {
        for object in &mut self.objects {
            object.update(world, dt);
        }
        if let Some(ribbon) = &mut self.ribbon {
            ribbon.update(world, dt);
        }
        if let Some(track) = &mut self.track {
            track.update(world, dt);
        }
        self.seamstress.update(world, dt);
    }

    pub fn draw(&self, world: &PhysicsWorld, surface: &mut dyn RenderSurface) {
        for object in &self.objects {
            object.draw(world, surface);
        }
        if let Some(ribbon) = &self.ribbon {
            ribbon.draw(world, surface);
        }
        if let Some(track) = &self.track {
            track.draw(world, surface);
        }
        self.seamstress.draw(world, surface);
    }
}
