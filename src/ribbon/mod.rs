//! 缎带
//!
//! - [`ChainPath`] / [`RibbonChain`]：轴对齐路径细分成焊接链节
//! - [`RibbonTrack`]：沿轨道移动的托板
//! - [`Pin`]：图钉

mod chain;
mod path;
mod pin;
mod track;

pub use chain::{links_for_distance, RibbonChain};
pub use path::{ChainPath, Segment, SegmentAxis};
pub use pin::{Pin, PIN_HEAD_RADIUS, PIN_POINT_RADIUS};
pub use track::{RibbonTrack, TrackCommand};
