//! 脚底传感器的接触状态机
//!
//! 跟踪当前与传感器重叠的碰撞体集合（引用计数）：
//! 集合非空即着地，只有最后一个接触结束时才回到空中，
//! 同时站在两块平台交界处时离开其中一块不会误判为离地。

use std::collections::HashSet;

use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

use crate::physics::{ContactEvent, ContactPhase, FixtureRef};

/// 着地状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundState {
    Airborne,
    Grounded,
}

/// 接触传感器
#[derive(Debug, Clone, Default)]
pub struct ContactSensor {
    sensor: Option<ColliderHandle>,
    owner: Option<RigidBodyHandle>,
    touching: HashSet<ColliderHandle>,
    /// touching 中属于缎带的子集
    ribbons: HashSet<ColliderHandle>,
}

impl ContactSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 绑定传感器碰撞体及其所属刚体，清空已有接触
    pub fn bind(&mut self, sensor: ColliderHandle, owner: RigidBodyHandle) {
        self.sensor = Some(sensor);
        self.owner = Some(owner);
        self.clear();
    }

    /// 换一个传感器碰撞体
    ///
    /// 所属刚体不变时保留已有接触，直到 [`ContactSensor::resync`] 用窄相结果校正；
    /// 旧传感器被移除产生的结束事件不再匹配，不会清掉接触。
    pub fn rebind(&mut self, sensor: ColliderHandle, owner: RigidBodyHandle) {
        if self.owner == Some(owner) {
            self.sensor = Some(sensor);
        } else {
            self.bind(sensor, owner);
        }
    }

    /// 以窄相中当前的相交列表重建接触集合
    pub fn resync<'a>(&mut self, overlaps: impl IntoIterator<Item = &'a FixtureRef>) {
        self.clear();
        for other in overlaps {
            self.begin(other);
        }
    }

    pub fn unbind(&mut self) {
        self.sensor = None;
        self.owner = None;
        self.clear();
    }

    pub fn clear(&mut self) {
        self.touching.clear();
        self.ribbons.clear();
    }

    /// 处理一条接触事件，事件与本传感器有关时返回 true
    ///
    /// 引擎不保证两方的顺序，所以 A 是传感器和 B 是传感器两种情况对称检查。
    pub fn handle(&mut self, event: &ContactEvent) -> bool {
        let Some(sensor) = self.sensor else {
            return false;
        };

        let mut relevant = false;
        for (mine, other) in [(&event.a, &event.b), (&event.b, &event.a)] {
            if mine.collider != sensor {
                continue;
            }
            relevant = true;
            match event.phase {
                ContactPhase::Begin => self.begin(other),
                ContactPhase::End => self.end(other),
            }
        }
        relevant
    }

    fn begin(&mut self, other: &FixtureRef) {
        // 自身刚体上的其他碰撞体不算地面
        if other.body.is_none() || other.body == self.owner {
            return;
        }
        self.touching.insert(other.collider);
        if other.owner.is_some_and(|kind| kind.is_ribbon()) {
            self.ribbons.insert(other.collider);
        }
    }

    fn end(&mut self, other: &FixtureRef) {
        self.touching.remove(&other.collider);
        self.ribbons.remove(&other.collider);
    }

    pub fn state(&self) -> GroundState {
        if self.touching.is_empty() {
            GroundState::Airborne
        } else {
            GroundState::Grounded
        }
    }

    pub fn is_grounded(&self) -> bool {
        !self.touching.is_empty()
    }

    /// 是否站在缎带上
    pub fn is_ribboned(&self) -> bool {
        !self.ribbons.is_empty()
    }

    pub fn contact_count(&self) -> usize {
        self.touching.len()
    }

    pub fn sensor(&self) -> Option<ColliderHandle> {
        self.sensor
    }
}
