//! 物理对象层
//!
//! 使用 Rapier2D 物理引擎实现。
//!
//! ## 概念对应关系
//! | 游戏概念 | Rapier |
//! |----------|--------|
//! | Body | RigidBody |
//! | Fixture | Collider（可为 sensor） |
//! | 焊接关节 | FixedJoint |
//! | 铰链关节 | RevoluteJoint |
//! | BeginContact / EndContact | CollisionEvent::Started / Stopped |

mod body;
mod composite;
mod world;
pub mod config;

pub use body::{BodyPhase, Material, PhysicsBox};
pub use composite::{CompositePhysicsObject, JointDesc};
pub use config::{GameplayConfig, get_config, set_config, reset_config};
pub use world::{
    rapier_to_vec2, vec2_to_rapier, BodyDef, BodyType, ColliderDef, ContactEvent, ContactPhase,
    FixtureRef, FixtureTag, ObjectKind, PhysicsWorld, ShapeKind,
};
