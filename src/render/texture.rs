//! 纹理登记表
//!
//! 只记录纹理名、像素尺寸和帧数；像素数据由外部内容管线负责。

use std::collections::HashMap;

use glam::Vec2;

use crate::{Result, RibbonsError};

/// 纹理句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// 纹理描述
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureInfo {
    pub id: TextureId,
    /// 单帧像素尺寸
    pub size: Vec2,
    /// 横向序列帧数，普通贴图为 1
    pub frames: u32,
}

/// 纹理登记表
#[derive(Debug, Default)]
pub struct TextureRegistry {
    textures: Vec<TextureInfo>,
    name_to_index: HashMap<String, usize>,
    /// 设置后不能再登记新纹理
    loaded: bool,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记纹理，同名覆盖
    pub fn register(&mut self, name: &str, size: Vec2, frames: u32) -> Result<TextureInfo> {
        if self.loaded {
            return Err(RibbonsError::TexturesLocked(name.to_string()));
        }
        let index = match self.name_to_index.get(name) {
            Some(&index) => index,
            None => {
                self.textures.push(TextureInfo {
                    id: TextureId(self.textures.len() as u32),
                    size,
                    frames: 1,
                });
                self.name_to_index.insert(name.to_string(), self.textures.len() - 1);
                self.textures.len() - 1
            }
        };
        let info = &mut self.textures[index];
        info.size = size;
        info.frames = frames.max(1);
        Ok(*info)
    }

    /// 内容加载结束
    pub fn finish_loading(&mut self) {
        self.loaded = true;
    }

    pub fn get(&self, name: &str) -> Result<TextureInfo> {
        self.name_to_index
            .get(name)
            .map(|&i| self.textures[i])
            .ok_or_else(|| RibbonsError::UnknownTexture(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
