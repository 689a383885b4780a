//! # Surface 模块
//!
//! 宿主层需要实现的表面接口定义。
//!
//! ## 核心概念
//!
//! - `SurfaceId`: 宿主分配的表面身份标识（非拥有型）
//! - `BlurTarget`: 被模糊的目标表面
//! - `RootSurface`: 目标所在的顶层表面，用于挂载遮罩层
//! - `OverlaySurface`: 全屏遮罩层
//!
//! 所有方法都接收 `&self`，实现方通过 `Cell` / `RefCell` 提供内部可变性，
//! 与控制器一样只在 UI 线程上使用。

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::effects::BlurEffect;
use crate::error::SurfaceError;

/// 表面唯一标识符
///
/// 由宿主分配，只用于身份比较，不持有表面本身。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

impl SurfaceId {
    /// 创建新的表面 ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// 表面渲染模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    /// 不使用离屏层
    #[default]
    None,
    /// 软件离屏层
    Software,
    /// 硬件加速离屏层（应用模糊效果的前提）
    Hardware,
}

/// RGBA 颜色
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// 遮罩层外观
///
/// 由控制器在首次创建遮罩时传给 [`RootSurface::attach_overlay`]。
/// 遮罩始终铺满根表面。
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    /// 填充颜色
    pub color: Color,
    /// 初始透明度
    pub initial_alpha: f32,
    /// 遮罩自身的渲染模式
    pub layer_type: LayerType,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            initial_alpha: 0.0,
            layer_type: LayerType::Hardware,
        }
    }
}

/// 模糊目标接口
///
/// ## 实现示例
///
/// ```rust,ignore
/// struct Panel {
///     id: SurfaceId,
///     layer: Cell<LayerType>,
///     effect: RefCell<Option<BlurEffect>>,
///     window: Rc<Window>,
/// }
///
/// impl BlurTarget for Panel {
///     fn surface_id(&self) -> SurfaceId { self.id }
///     fn layer_type(&self) -> LayerType { self.layer.get() }
///     fn set_layer_type(&self, layer_type: LayerType) -> Result<(), SurfaceError> {
///         self.layer.set(layer_type);
///         Ok(())
///     }
///     fn set_blur_effect(&self, effect: Option<&BlurEffect>) -> Result<(), SurfaceError> {
///         *self.effect.borrow_mut() = effect.cloned();
///         Ok(())
///     }
///     fn root_surface(&self) -> Option<Rc<dyn RootSurface>> {
///         Some(self.window.clone())
///     }
/// }
/// ```
pub trait BlurTarget {
    /// 表面身份
    fn surface_id(&self) -> SurfaceId;

    /// 当前渲染模式
    fn layer_type(&self) -> LayerType;

    /// 切换渲染模式
    fn set_layer_type(&self, layer_type: LayerType) -> Result<(), SurfaceError>;

    /// 应用模糊效果，`None` 表示清除
    fn set_blur_effect(&self, effect: Option<&BlurEffect>) -> Result<(), SurfaceError>;

    /// 目标所在的顶层表面
    ///
    /// 目标已分离时返回 `None`。
    fn root_surface(&self) -> Option<Rc<dyn RootSurface>>;
}

/// 顶层表面接口
pub trait RootSurface {
    /// 挂载一个铺满自身的遮罩子表面
    fn attach_overlay(&self, style: &OverlayStyle)
    -> Result<Rc<dyn OverlaySurface>, SurfaceError>;
}

/// 遮罩层接口
pub trait OverlaySurface {
    /// 设置透明度
    fn set_alpha(&self, alpha: f32);

    /// 设置可见性
    fn set_visible(&self, visible: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_id() {
        let id1 = SurfaceId::new(1);
        let id2 = SurfaceId::new(2);

        assert_eq!(id1, SurfaceId(1));
        assert_ne!(id1, id2);
        assert_eq!(id1.value(), 1);
        assert_eq!(id1.to_string(), "surface#1");
    }

    #[test]
    fn test_overlay_style_default() {
        let style = OverlayStyle::default();
        assert_eq!(style.color, Color::BLACK);
        assert_eq!(style.initial_alpha, 0.0);
        assert_eq!(style.layer_type, LayerType::Hardware);
    }
}
