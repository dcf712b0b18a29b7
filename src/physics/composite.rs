//! 复合物理对象
//!
//! 有序的链节（[`PhysicsBox`]）加有序的关节。两阶段构造：
//! 先激活所有刚体，再 [`CompositePhysicsObject::create_joints`]。
//! 关节按下标引用链节刚体，必须等所有链节都存在、位置稳定后才能创建。

use glam::Vec2;
use rapier2d::prelude::ImpulseJointHandle;

use super::body::PhysicsBox;
use super::world::PhysicsWorld;
use crate::game::GameObject;
use crate::render::RenderSurface;

/// 两个相邻链节之间的关节描述
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointDesc {
    /// 刚性焊接，锚点和角度在各自局部空间
    Weld {
        frame_a: (Vec2, f32),
        frame_b: (Vec2, f32),
    },
    /// 铰链
    Revolute { anchor_a: Vec2, anchor_b: Vec2 },
}

/// 复合物理对象
#[derive(Debug, Default)]
pub struct CompositePhysicsObject {
    links: Vec<PhysicsBox>,
    joints: Vec<ImpulseJointHandle>,
    remove: bool,
}

impl CompositePhysicsObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加链节（按遍历顺序）
    pub fn push_link(&mut self, link: PhysicsBox) -> usize {
        self.links.push(link);
        self.links.len() - 1
    }

    /// 第一阶段：激活全部链节刚体，全部成功时返回 true
    pub fn activate_physics(&mut self, world: &mut PhysicsWorld, sizing: Vec2, draw_scale: f32) -> bool {
        let mut all = true;
        for link in &mut self.links {
            all &= link.activate_physics(world, sizing, draw_scale);
        }
        all
    }

    /// 第二阶段：为每对相邻链节创建关节
    ///
    /// 链节少于 2 个时什么都不做并返回 true。任一链节没有刚体时跳过该对并返回 false。
    pub fn create_joints<F>(&mut self, world: &mut PhysicsWorld, mut describe: F) -> bool
    where
        F: FnMut(&PhysicsWorld, usize, &PhysicsBox, &PhysicsBox) -> JointDesc,
    {
        if self.links.len() < 2 {
            return true;
        }

        let mut all = true;
        for i in 0..self.links.len() - 1 {
            let (a, b) = (&self.links[i], &self.links[i + 1]);
            let (Some(body_a), Some(body_b)) = (a.body_handle(), b.body_handle()) else {
                all = false;
                continue;
            };

            let handle = match describe(&*world, i, a, b) {
                JointDesc::Weld { frame_a, frame_b } => {
                    world.create_weld_joint(body_a, body_b, frame_a, frame_b)
                }
                JointDesc::Revolute { anchor_a, anchor_b } => {
                    world.create_revolute_joint(body_a, body_b, anchor_a, anchor_b)
                }
            };
            match handle {
                Some(handle) => self.joints.push(handle),
                None => all = false,
            }
        }
        all
    }

    pub fn links(&self) -> &[PhysicsBox] {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut [PhysicsBox] {
        &mut self.links
    }

    pub fn joints(&self) -> &[ImpulseJointHandle] {
        &self.joints
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn update(&mut self, world: &mut PhysicsWorld) {
        for link in &mut self.links {
            link.update(world);
        }
    }

    pub fn draw(&self, world: &PhysicsWorld, surface: &mut dyn RenderSurface) {
        for link in &self.links {
            link.draw(world, surface);
        }
    }

    /// 销毁所有关节和链节刚体
    pub fn destroy(&mut self, world: &mut PhysicsWorld) {
        for joint in self.joints.drain(..) {
            world.remove_joint(joint);
        }
        for link in &mut self.links {
            link.destroy(world);
        }
    }

    pub fn mark_removed(&mut self) {
        self.remove = true;
    }

    pub fn is_removed(&self) -> bool {
        self.remove
    }
}

impl GameObject for CompositePhysicsObject {
    fn update(&mut self, world: &mut PhysicsWorld, _dt: f32) {
        CompositePhysicsObject::update(self, world);
    }

    fn draw(&self, world: &PhysicsWorld, surface: &mut dyn RenderSurface) {
        CompositePhysicsObject::draw(self, world, surface);
    }

    fn mark_removed(&mut self) {
        CompositePhysicsObject::mark_removed(self);
    }

    fn is_removed(&self) -> bool {
        self.remove
    }

    fn destroy(&mut self, world: &mut PhysicsWorld) {
        CompositePhysicsObject::destroy(self, world);
    }
}
