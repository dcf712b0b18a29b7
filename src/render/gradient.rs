//! 颜色渐变
//!
//! 由若干“停靠点”定义，每个停靠点指定某个位置（[0, 1]）上的确切颜色。

use std::fmt;

use super::Color;
use crate::{Result, RibbonsError};

/// 渐变停靠点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStopper {
    pub color: Color,
    pub percent: f32,
}

impl GradientStopper {
    pub fn new(percent: f32, color: Color) -> Self {
        Self { color, percent }
    }
}

impl fmt::Display for GradientStopper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{({:.2}, {:.2}, {:.2}, {:.2}) {}}}",
            self.color.r, self.color.g, self.color.b, self.color.a, self.percent
        )
    }
}

/// 平滑颜色渐变，停靠点按位置升序保存
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stoppers: Vec<GradientStopper>,
}

impl Gradient {
    /// 起止两色
    pub fn two_color(start: Color, end: Color) -> Self {
        Self {
            stoppers: vec![GradientStopper::new(0.0, start), GradientStopper::new(1.0, end)],
        }
    }

    /// 自定义停靠点，位置必须在 [0, 1] 内
    pub fn from_stoppers(stoppers: &[GradientStopper]) -> Result<Self> {
        if stoppers.is_empty() {
            return Err(RibbonsError::EmptyGradient);
        }
        if let Some(bad) = stoppers.iter().find(|s| !(0.0..=1.0).contains(&s.percent)) {
            return Err(RibbonsError::GradientStopper { percent: bad.percent });
        }
        let mut stoppers = stoppers.to_vec();
        stoppers.sort_by(|a, b| a.percent.total_cmp(&b.percent));
        Ok(Self { stoppers })
    }

    /// 均匀分布的颜色，至少一种
    pub fn evenly_spaced(colors: &[Color]) -> Result<Self> {
        match colors {
            [] => Err(RibbonsError::EmptyGradient),
            [single] => Ok(Self::two_color(*single, *single)),
            _ => {
                let last = (colors.len() - 1) as f32;
                let stoppers = colors
                    .iter()
                    .enumerate()
                    .map(|(i, c)| GradientStopper::new(i as f32 / last, *c))
                    .collect();
                Ok(Self { stoppers })
            }
        }
    }

    /// 颜色与位置一一对应
    pub fn with_percents(colors: &[Color], percents: &[f32]) -> Result<Self> {
        if colors.len() != percents.len() {
            return Err(RibbonsError::GradientLength {
                colors: colors.len(),
                percents: percents.len(),
            });
        }
        match colors {
            [] => Err(RibbonsError::EmptyGradient),
            [single] => Ok(Self::two_color(*single, *single)),
            _ => {
                let stoppers: Vec<_> = colors
                    .iter()
                    .zip(percents)
                    .map(|(c, p)| GradientStopper::new(*p, *c))
                    .collect();
                Self::from_stoppers(&stoppers)
            }
        }
    }

    /// 插入颜色；位置不在 (0, 1) 内（含 NaN）时什么都不做
    pub fn add_color(&mut self, color: Color, percent: f32) {
        if !(percent > 0.0 && percent < 1.0) {
            return;
        }
        let index = self
            .stoppers
            .iter()
            .position(|s| s.percent >= percent)
            .unwrap_or(self.stoppers.len());
        self.stoppers.insert(index, GradientStopper::new(percent, color));
    }

    /// 采样，位置截断到 [0, 1]
    pub fn color_at(&self, percent: f32) -> Color {
        let first = self.stoppers[0];
        let last = self.stoppers[self.stoppers.len() - 1];
        if percent <= first.percent {
            return first.color;
        }
        if percent >= last.percent {
            return last.color;
        }

        for pair in self.stoppers.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if percent <= hi.percent {
                let span = hi.percent - lo.percent;
                if span <= f32::EPSILON {
                    return hi.color;
                }
                return lo.color.lerp(hi.color, (percent - lo.percent) / span);
            }
        }
        last.color
    }

    pub fn stoppers(&self) -> &[GradientStopper] {
        &self.stoppers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_stopper_fails_fast() {
        let err = Gradient::from_stoppers(&[
            GradientStopper::new(0.0, Color::BLACK),
            GradientStopper::new(1.5, Color::WHITE),
        ])
        .unwrap_err();
        assert!(matches!(err, RibbonsError::GradientStopper { percent } if percent == 1.5));
    }

    #[test]
    fn test_empty_and_mismatched_inputs() {
        assert!(matches!(Gradient::evenly_spaced(&[]), Err(RibbonsError::EmptyGradient)));
        assert!(matches!(
            Gradient::with_percents(&[Color::RED], &[0.1, 0.2]),
            Err(RibbonsError::GradientLength { colors: 1, percents: 2 })
        ));
    }

    #[test]
    fn test_single_color_is_flat() {
        let g = Gradient::evenly_spaced(&[Color::RED]).unwrap();
        assert_eq!(g.color_at(0.0), Color::RED);
        assert_eq!(g.color_at(0.7), Color::RED);
        assert_eq!(g.stoppers().len(), 2);
    }

    #[test]
    fn test_sampling_clamps_and_interpolates() {
        let g = Gradient::evenly_spaced(&[Color::BLACK, Color::WHITE, Color::BLACK]).unwrap();
        assert_eq!(g.color_at(-1.0), Color::BLACK);
        assert_eq!(g.color_at(2.0), Color::BLACK);
        assert!((g.color_at(0.5).r - 1.0).abs() < 1e-6);
        assert!((g.color_at(0.25).r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_add_color_keeps_order_and_ignores_edges() {
        let mut g = Gradient::two_color(Color::BLACK, Color::WHITE);
        g.add_color(Color::RED, 0.0);
        g.add_color(Color::RED, 1.0);
        g.add_color(Color::RED, f32::NAN);
        assert_eq!(g.stoppers().len(), 2);
        assert!(g.stoppers().iter().all(|s| !s.percent.is_nan()));

        g.add_color(Color::RED, 0.5);
        assert_eq!(g.stoppers()[1].percent, 0.5);
        assert_eq!(g.color_at(0.5), Color::RED);
    }
}
