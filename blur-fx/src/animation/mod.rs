//! # Animation 模块
//!
//! 单值插值会话，负责模糊半径的时间轴管理。
//!
//! 动画只关注 f32 值从 A 到 B 在 duration 内的变化，由宿主帧循环通过
//! `update(dt)` 推进；如何使用当前值由 [`BlurController`](crate::BlurController) 决定。
//!
//! ```rust,ignore
//! let mut anim = ValueAnimation::new(0.0, 90.0, Duration::from_millis(310));
//! while anim.update(frame_dt) {
//!     apply(anim.current_value());
//! }
//! ```

mod animation;
mod easing;

pub use animation::{AnimationState, Direction, ValueAnimation};
pub use easing::EasingFunction;
