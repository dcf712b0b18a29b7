//! 缎带链构建
//!
//! 把轴对齐折线细分成等长链节：每段取 `floor(距离 / 链节长度)` 个链节，
//! 沿线段均匀摆放；竖直段的链节旋转 90°。所有链节按遍历顺序加入复合对象，
//! 然后相邻链节两两焊接并关闭重力（缎带在视觉上是刚性的，不应下垂）。

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use super::path::{ChainPath, SegmentAxis};
use crate::game::GameObject;
use crate::physics::{
    get_config, BodyType, CompositePhysicsObject, JointDesc, Material, ObjectKind, PhysicsBox,
    PhysicsWorld,
};
use crate::render::{RenderSurface, TextureInfo};
use crate::{Result, RibbonsError};

/// 整除判定的容差（以 f32 ulp 计）
const LINK_COUNT_ULPS: f32 = 4.0;

/// 单段线段能放下的链节数：`floor(距离 / 链节长度)`
///
/// 比值离整数只差几个 ulp 时按整数计（`0.3 / 0.1` 之类），
/// 其余情况严格向下取整，最后一个链节不会越过线段终点。
pub fn links_for_distance(distance: f32, link_length: f32) -> usize {
    if !(link_length > 0.0) || !(distance > 0.0) {
        return 0;
    }
    let ratio = distance / link_length;
    if !ratio.is_finite() {
        return 0;
    }
    let nearest = ratio.round();
    if (ratio - nearest).abs() <= ratio * f32::EPSILON * LINK_COUNT_ULPS {
        nearest as usize
    } else {
        ratio.floor() as usize
    }
}

/// 缎带链
#[derive(Debug)]
pub struct RibbonChain {
    path: ChainPath,
    links: CompositePhysicsObject,
    /// 每个链节所在线段的遍历方向
    headings: Vec<Vec2>,
    link_length: f32,
    link_sprite: TextureInfo,
    draw_scale: f32,
}

impl RibbonChain {
    /// 细分路径并激活全部链节刚体
    ///
    /// 链节长度 = 贴图宽度 / `draw_scale`。
    pub fn new(
        world: &mut PhysicsWorld,
        path: ChainPath,
        link_sprite: TextureInfo,
        draw_scale: f32,
    ) -> Result<Self> {
        let size = link_sprite.size;
        if !(size.x > 0.0 && size.y > 0.0 && size.is_finite())
            || !(draw_scale > 0.0 && draw_scale.is_finite())
        {
            return Err(RibbonsError::InvalidLinkSize {
                width: size.x,
                height: size.y,
            });
        }

        let config = get_config();
        let link_length = size.x / draw_scale;
        let material = Material {
            density: config.ribbon_link_density,
            ..Material::default()
        };

        let mut links = CompositePhysicsObject::new();
        let mut headings = Vec::new();

        'segments: for (index, segment) in path.segments().enumerate() {
            let count = links_for_distance(segment.length(), link_length);
            let direction = segment.direction();
            let rotation = match segment.axis {
                SegmentAxis::Vertical => FRAC_PI_2,
                SegmentAxis::Horizontal => 0.0,
            };

            if count == 0 && config.debug_log {
                log::debug!(
                    "[缎带] 第 {} 段长度 {:.3} 小于链节长度 {:.3}，不放置链节",
                    index,
                    segment.length(),
                    link_length
                );
            }

            for i in 0..count {
                let along = link_length * (i as f32 + 0.5) + config.ribbon_link_offset;
                let center = segment.from + direction * along;
                let mut link = PhysicsBox::new(ObjectKind::RibbonLink)
                    .with_body_type(BodyType::Dynamic)
                    .with_position(center)
                    .with_rotation(rotation)
                    .with_material(material)
                    .with_texture(link_sprite);
                if !link.activate_physics(world, size, draw_scale) {
                    log::warn!(
                        "[缎带] 第 {} 段第 {} 个链节创建失败，停止放置（已放置 {} 个）",
                        index,
                        i,
                        links.link_count()
                    );
                    break 'segments;
                }
                links.push_link(link);
                headings.push(direction);
            }
        }

        log::info!(
            "[缎带] 路径 {} 个点，放置 {} 个链节（链节长度 {:.3}）",
            path.points().len(),
            links.link_count(),
            link_length
        );

        Ok(Self {
            path,
            links,
            headings,
            link_length,
            link_sprite,
            draw_scale,
        })
    }

    /// 相邻链节两两焊接，并关闭被焊接链节的重力
    ///
    /// 锚点取前一链节前缘与后一链节后缘的中点（直线段上即各自 ±半链节长），
    /// 焊接时保持两者当前的相对角度。链节少于 2 个时什么都不做。
    pub fn create_joints(&mut self, world: &mut PhysicsWorld) -> bool {
        if self.links.link_count() < 2 {
            return true;
        }

        let half = self.link_length * 0.5;
        let headings = &self.headings;
        let ok = self.links.create_joints(world, |world, i, a, b| {
            let (pa, ra) = (a.position(world), a.rotation(world));
            let (pb, rb) = (b.position(world), b.rotation(world));
            let leading = pa + headings[i] * half;
            let trailing = pb - headings[i + 1] * half;
            let anchor = (leading + trailing) * 0.5;

            JointDesc::Weld {
                frame_a: (Vec2::from_angle(-ra).rotate(anchor - pa), 0.0),
                frame_b: (Vec2::from_angle(-rb).rotate(anchor - pb), ra - rb),
            }
        });

        for link in self.links.links_mut() {
            link.set_gravity_scale(world, 0.0);
        }

        log::info!("[缎带] 焊接 {} 个关节", self.links.joint_count());
        ok
    }

    pub fn path(&self) -> &ChainPath {
        &self.path
    }

    pub fn links(&self) -> &[PhysicsBox] {
        self.links.links()
    }

    pub fn link_count(&self) -> usize {
        self.links.link_count()
    }

    pub fn joint_count(&self) -> usize {
        self.links.joint_count()
    }

    pub fn link_length(&self) -> f32 {
        self.link_length
    }

    pub fn link_sprite(&self) -> TextureInfo {
        self.link_sprite
    }

    pub fn draw_scale(&self) -> f32 {
        self.draw_scale
    }

    pub fn mark_removed(&mut self) {
        self.links.mark_removed();
    }
}

impl GameObject for RibbonChain {
    fn update(&mut self, world: &mut PhysicsWorld, _dt: f32) {
        self.links.update(world);
    }

    fn draw(&self, world: &PhysicsWorld, surface: &mut dyn RenderSurface) {
        self.links.draw(world, surface);
    }

    fn mark_removed(&mut self) {
        RibbonChain::mark_removed(self);
    }

    fn is_removed(&self) -> bool {
        self.links.is_removed()
    }

    fn destroy(&mut self, world: &mut PhysicsWorld) {
        self.links.destroy(world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TextureId;

    fn link_sprite() -> TextureInfo {
        TextureInfo {
            id: TextureId(1),
            size: Vec2::new(64.0, 16.0),
            frames: 1,
        }
    }

    fn build(points: Vec<Vec2>, world: &mut PhysicsWorld) -> RibbonChain {
        let path = ChainPath::new(points).unwrap();
        RibbonChain::new(world, path, link_sprite(), 32.0).unwrap()
    }

    #[test]
    fn test_link_count_is_floor_of_ratio() {
        assert_eq!(links_for_distance(10.0, 2.0), 5);
        assert_eq!(links_for_distance(7.9, 2.0), 3);
        assert_eq!(links_for_distance(1.9, 2.0), 0);
        assert_eq!(links_for_distance(0.0, 2.0), 0);
        assert_eq!(links_for_distance(0.3, 0.1), 3);
        assert_eq!(links_for_distance(9.9999, 2.0), 4);
    }

    #[test]
    fn test_links_stay_inside_segment_just_below_integer() {
        let mut world = PhysicsWorld::with_gravity(Vec2::ZERO);
        let chain = build(vec![Vec2::ZERO, Vec2::new(9.9999, 0.0)], &mut world);
        assert_eq!(chain.link_count(), 4);
        let offset = get_config().ribbon_link_offset;
        let last = chain.links()[3].position(&world).x;
        assert!((last - (7.0 + offset)).abs() < 1e-4);
        assert!(last + chain.link_length() * 0.5 < 9.9999);
    }

    #[test]
    fn test_placement_stops_when_world_is_full() {
        let mut world = PhysicsWorld::with_gravity(Vec2::ZERO);
        world.set_max_bodies(16);
        let chain = build(vec![Vec2::ZERO, Vec2::new(1.0e9, 0.0)], &mut world);
        assert_eq!(chain.link_count(), 16);
        assert_eq!(world.body_count(), 16);
    }

    #[test]
    fn test_vertical_path_scenario() {
        let mut world = PhysicsWorld::with_gravity(Vec2::new(0.0, 10.0));
        let mut chain = build(vec![Vec2::ZERO, Vec2::new(0.0, 10.0)], &mut world);
        assert_eq!(chain.link_count(), 5);
        assert!((chain.link_length() - 2.0).abs() < 1e-6);

        let mut previous_y = f32::MIN;
        for link in chain.links() {
            assert!((link.rotation(&world) - FRAC_PI_2).abs() < 1e-5);
            let p = link.position(&world);
            assert!(p.x.abs() < 1e-5);
            assert!(p.y > previous_y);
            previous_y = p.y;
        }

        assert!(chain.create_joints(&mut world));
        assert_eq!(chain.joint_count(), 4);
        assert_eq!(world.joint_count(), 4);
        for link in chain.links() {
            assert_eq!(link.gravity_scale(&world), 0.0);
        }
    }

    #[test]
    fn test_short_segment_leaves_gap() {
        let mut world = PhysicsWorld::with_gravity(Vec2::ZERO);
        let chain = build(
            vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(1.0, 4.0)],
            &mut world,
        );
        assert_eq!(chain.link_count(), 2);
        for link in chain.links() {
            assert!((link.rotation(&world) - FRAC_PI_2).abs() < 1e-5);
        }
    }

    #[test]
    fn test_direction_follows_delta_sign() {
        let mut world = PhysicsWorld::with_gravity(Vec2::ZERO);
        let chain = build(vec![Vec2::new(10.0, 0.0), Vec2::ZERO], &mut world);
        let xs: Vec<f32> = chain.links().iter().map(|l| l.position(&world).x).collect();
        assert_eq!(xs.len(), 5);
        assert!(xs.windows(2).all(|w| w[1] < w[0]));
        assert!(xs[0] < 10.0 && xs[0] > 8.0);
        for link in chain.links() {
            assert_eq!(link.rotation(&world), 0.0);
        }
    }

    #[test]
    fn test_single_link_chain_has_no_joints() {
        let mut world = PhysicsWorld::with_gravity(Vec2::ZERO);
        let mut chain = build(vec![Vec2::ZERO, Vec2::new(3.0, 0.0)], &mut world);
        assert_eq!(chain.link_count(), 1);
        assert!(chain.create_joints(&mut world));
        assert_eq!(chain.joint_count(), 0);
    }

    #[test]
    fn test_corner_chain_welds_across_turn() {
        let mut world = PhysicsWorld::with_gravity(Vec2::new(0.0, 10.0));
        let mut chain = build(
            vec![Vec2::ZERO, Vec2::new(0.0, 4.0), Vec2::new(4.0, 4.0)],
            &mut world,
        );
        assert_eq!(chain.link_count(), 4);
        assert!(chain.create_joints(&mut world));
        assert_eq!(chain.joint_count(), 3);

        let before: Vec<Vec2> = chain.links().iter().map(|l| l.position(&world)).collect();
        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        for (link, start) in chain.links().iter().zip(before) {
            assert!((link.position(&world) - start).length() < 0.05);
        }
    }

    #[test]
    fn test_invalid_link_size() {
        let mut world = PhysicsWorld::with_gravity(Vec2::ZERO);
        let path = ChainPath::new(vec![Vec2::ZERO, Vec2::X]).unwrap();
        let sprite = TextureInfo {
            size: Vec2::new(0.0, 16.0),
            ..link_sprite()
        };
        assert!(matches!(
            RibbonChain::new(&mut world, path, sprite, 32.0),
            Err(RibbonsError::InvalidLinkSize { .. })
        ));
    }
}
