//! # Effect Registry
//!
//! 模糊描述符定义与默认参数。

use serde::{Deserialize, Serialize};

/// 边缘平铺模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileMode {
    /// 拉伸边缘像素
    Clamp,
    /// 重复平铺
    Repeat,
    /// 镜像平铺
    #[default]
    Mirror,
    /// 边缘外透明
    Decal,
}

/// 模糊效果链底层的颜色滤镜
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorFilter {
    /// 单位颜色矩阵（不改变颜色）
    #[default]
    Identity,
}

/// 模糊描述符
///
/// 两个轴向使用相同半径。描述符是纯数据，由宿主在
/// [`BlurTarget::set_blur_effect`](crate::surface::BlurTarget::set_blur_effect)
/// 中翻译为平台效果对象。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurEffect {
    /// 模糊半径
    pub radius: f32,
    /// 边缘平铺模式
    pub tile_mode: TileMode,
    /// 底层颜色滤镜
    pub base: ColorFilter,
}

impl BlurEffect {
    /// 创建给定半径的模糊描述符（镜像平铺，单位滤镜）
    pub fn with_radius(radius: f32) -> Self {
        Self {
            radius,
            tile_mode: TileMode::Mirror,
            base: ColorFilter::Identity,
        }
    }
}

/// 默认参数
///
/// 这些常量是控制器参数的**唯一来源**，
/// [`BlurConfig::default`](crate::config::BlurConfig) 也从这里取值。
pub mod defaults {
    /// 量化步长（同时也是每帧更新阈值的两倍）
    pub const STEP: f32 = 3.0;
    /// 最大模糊半径
    pub const MAX_RADIUS: f32 = 90.0;
    /// 正向动画时长（毫秒）
    pub const FORWARD_DURATION_MS: u64 = 310;
    /// 反向动画时长（毫秒）
    pub const REVERSE_DURATION_MS: u64 = 100;
    /// 遮罩延迟隐藏时长（毫秒）
    pub const OVERLAY_HIDE_DELAY_MS: u64 = 2000;
    /// 遮罩最大透明度
    pub const MAX_DIM_ALPHA: f32 = 0.5;
}
