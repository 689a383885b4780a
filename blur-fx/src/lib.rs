//! # blur-fx
//!
//! 渐进模糊动画控制器：在目标表面上播放"正向模糊 → 反向恢复"的两阶段动画，
//! 同步驱动一层全屏变暗遮罩，并保证无论动画如何被打断，目标都会被干净地恢复。
//!
//! ## 架构概述
//!
//! `blur-fx` 是纯逻辑核心，不依赖任何渲染引擎。
//! 宿主实现 [`surface`] 中的表面接口，并在 UI 线程的帧循环中驱动控制器：
//!
//! ```text
//! Host                              BlurController
//!   │                                     │
//!   │──── start(&target) ───────────────►│ 取消旧会话 → 显示遮罩 → 切换硬件层 → 正向会话
//!   │                                     │
//!   │──── update(dt) ───────────────────►│ 推进会话 / 遮罩延迟隐藏
//!   │◄─── Vec<BlurEvent> ─────────────────│
//!   │                                     │
//! ```
//!
//! ## 核心类型
//!
//! - [`BlurController`]：两阶段插值状态机
//! - [`ControllerHandle`]：控制器共享句柄
//! - [`EffectTable`]：量化模糊描述符表
//! - [`BlurConfig`]：控制器配置
//! - [`BlurTarget`] / [`RootSurface`] / [`OverlaySurface`]：宿主表面接口
//!
//! ## 使用示例
//!
//! ```ignore
//! use blur_fx::{BlurController, ControllerHandle};
//!
//! let blur = ControllerHandle::new(BlurController::new());
//!
//! // 点击事件中
//! blur.start(&panel);
//!
//! // 每帧
//! for event in blur.update(frame_dt) {
//!     tracing::debug!(%event, "blur");
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`controller`]：状态机与共享句柄
//! - [`effects`]：模糊描述符与量化表
//! - [`animation`]：单值插值与缓动
//! - [`overlay`]：遮罩管理
//! - [`layer`]：渲染模式记录
//! - [`surface`]：宿主接口
//! - [`headless`]：无界面表面实现
//! - [`config`] / [`error`]：配置与错误类型

pub mod animation;
pub mod config;
pub mod controller;
pub mod effects;
pub mod error;
pub mod headless;
pub mod layer;
pub mod overlay;
pub mod surface;

// 重导出核心类型
pub use animation::{AnimationState, Direction, EasingFunction, ValueAnimation};
pub use config::BlurConfig;
pub use controller::{BlurController, BlurEvent, ControllerHandle, DriverPhase};
pub use effects::{BlurEffect, ColorFilter, EffectTable, TileMode};
pub use error::{BlurError, BlurResult, ConfigError, SurfaceError};
pub use layer::LayerTracker;
pub use overlay::OverlayManager;
pub use surface::{
    BlurTarget, Color, LayerType, OverlayStyle, OverlaySurface, RootSurface, SurfaceId,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        // 验证所有公共类型都可以正常使用
        let _controller = BlurController::new();
        let _handle = ControllerHandle::default();
        let _config = BlurConfig::default();
        let _effect = BlurEffect::with_radius(3.0);
        let _phase = DriverPhase::Idle;
        let _id = SurfaceId::new(1);
    }
}
