//! # Error 模块
//!
//! 定义 blur-fx 中使用的错误类型。
//!
//! 控制器对外从不抛出错误：这些类型只在内部作为每次操作的结果，
//! 用于记录日志后降级为"跳过本次视觉更新"。

use thiserror::Error;

use crate::surface::SurfaceId;

/// 宿主表面返回的错误
///
/// 由 [`BlurTarget`](crate::surface::BlurTarget) / [`RootSurface`](crate::surface::RootSurface)
/// 的实现方产生。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// 表面已从界面树中分离
    #[error("表面 {id} 已分离")]
    Detached { id: SurfaceId },

    /// 平台拒绝了该操作
    #[error("平台拒绝操作: {message}")]
    Rejected { message: String },
}

/// 模糊控制器错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlurError {
    /// 应用缓存的模糊效果失败
    #[error("应用模糊效果失败（半径 {radius}）: {source}")]
    EffectApplication { radius: f32, source: SurfaceError },

    /// 清理阶段恢复目标状态失败
    #[error("恢复表面 {id} 失败: {source}")]
    Restoration { id: SurfaceId, source: SurfaceError },

    /// 根表面拒绝挂载遮罩层
    #[error("挂载遮罩层失败: {0}")]
    OverlayAttach(SurfaceError),
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 量化步长必须为正数
    #[error("量化步长必须大于 0，实际为 {0}")]
    InvalidStep(f32),

    /// 最大半径不能为负
    #[error("最大模糊半径不能为负，实际为 {0}")]
    InvalidMaxRadius(f32),

    /// 量化后的描述符表项数超过上限
    #[error("描述符表项数超过上限（max_radius = {max_radius}, step = {step}）")]
    TableTooLarge { step: f32, max_radius: f32 },

    /// 遮罩最大透明度必须在 [0, 1] 内
    #[error("遮罩最大透明度必须在 0.0..=1.0 内，实际为 {0}")]
    InvalidDimAlpha(f32),
}

/// Result 类型别名
pub type BlurResult<T> = Result<T, BlurError>;
