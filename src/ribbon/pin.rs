//! 图钉：一小一大两个圆，用铰链钉在同一点

use glam::Vec2;

use crate::game::GameObject;
use crate::physics::{
    BodyType, CompositePhysicsObject, JointDesc, ObjectKind, PhysicsBox, PhysicsWorld, ShapeKind,
};
use crate::render::{RenderSurface, TextureInfo};

/// 针尖半径
pub const PIN_POINT_RADIUS: f32 = 0.1;
/// 针帽半径
pub const PIN_HEAD_RADIUS: f32 = 0.25;

#[derive(Debug)]
pub struct Pin {
    parts: CompositePhysicsObject,
}

impl Pin {
    pub fn new(
        world: &mut PhysicsWorld,
        position: Vec2,
        texture: Option<TextureInfo>,
        draw_scale: f32,
    ) -> Self {
        let mut parts = CompositePhysicsObject::new();
        for (radius, textured) in [(PIN_POINT_RADIUS, false), (PIN_HEAD_RADIUS, true)] {
            let mut part = PhysicsBox::new(ObjectKind::Pin)
                .with_shape(ShapeKind::Ball)
                .with_body_type(BodyType::Dynamic)
                .with_position(position);
            if let (Some(texture), true) = (texture, textured) {
                part = part.with_texture(texture);
            }
            part.activate_physics(world, Vec2::splat(radius * 2.0 * draw_scale), draw_scale);
            parts.push_link(part);
        }

        parts.create_joints(world, |_, _, _, _| JointDesc::Revolute {
            anchor_a: Vec2::ZERO,
            anchor_b: Vec2::ZERO,
        });

        Self { parts }
    }

    pub fn position(&self, world: &PhysicsWorld) -> Vec2 {
        self.parts
            .links()
            .first()
            .map(|p| p.position(world))
            .unwrap_or_default()
    }

    pub fn parts(&self) -> &[PhysicsBox] {
        self.parts.links()
    }

    pub fn joint_count(&self) -> usize {
        self.parts.joint_count()
    }

    pub fn mark_removed(&mut self) {
        self.parts.mark_removed();
    }
}

impl GameObject for Pin {
    fn update(&mut self, world: &mut PhysicsWorld, _dt: f32) {
        self.parts.update(world);
    }

    fn draw(&self, world: &PhysicsWorld, surface: &mut dyn RenderSurface) {
        self.parts.draw(world, surface);
    }

    fn mark_removed(&mut self) {
        Pin::mark_removed(self);
    }

    fn is_removed(&self) -> bool {
        self.parts.is_removed()
    }

    fn destroy(&mut self, world: &mut PhysicsWorld) {
        self.parts.destroy(world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_has_two_circles_and_a_hinge() {
        let mut world = PhysicsWorld::with_gravity(Vec2::ZERO);
        let pin = Pin::new(&mut world, Vec2::new(2.0, 3.0), None, 32.0);
        assert_eq!(pin.parts().len(), 2);
        assert_eq!(pin.joint_count(), 1);

        let radii: Vec<f32> = pin
            .parts()
            .iter()
            .map(|p| world.collider_half_extents(p.collider_handle().unwrap()).unwrap().x)
            .collect();
        assert!((radii[0] - PIN_POINT_RADIUS).abs() < 1e-5);
        assert!((radii[1] - PIN_HEAD_RADIUS).abs() < 1e-5);
        assert_eq!(pin.position(&world), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_parts_stay_together_under_gravity() {
        let mut world = PhysicsWorld::with_gravity(Vec2::new(0.0, 10.0));
        let pin = Pin::new(&mut world, Vec2::ZERO, None, 32.0);
        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        let a = pin.parts()[0].position(&world);
        let b = pin.parts()[1].position(&world);
        assert!((a - b).length() < 0.01);
        assert!(a.y > 0.5);
    }
}
