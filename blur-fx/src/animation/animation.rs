//! # Animation 模块
//!
//! 单向插值会话定义。

use std::time::Duration;

use super::EasingFunction;

/// 插值方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// 正向：0 → 最大半径
    Forward,
    /// 反向：最大半径 → 0
    Reverse,
}

/// 动画状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    /// 正在播放
    #[default]
    Playing,
    /// 已播放到终点
    Completed,
}

impl AnimationState {
    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        *self == Self::Completed
    }
}

/// 单值插值会话
///
/// 管理单个 f32 值从 `from` 到 `to` 在 `duration` 时间内的变化。
#[derive(Debug, Clone)]
pub struct ValueAnimation {
    /// 起始值
    pub from: f32,
    /// 目标值
    pub to: f32,
    /// 动画时长
    pub duration: Duration,
    /// 缓动函数
    pub easing: EasingFunction,
    /// 当前状态
    pub state: AnimationState,
    /// 当前进度（0.0 - 1.0，已应用缓动）
    pub progress: f32,
    /// 已经过的时间
    elapsed: Duration,
}

impl ValueAnimation {
    /// 创建新的插值会话
    ///
    /// 时长为 0 时直接处于完成状态。
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        let (state, progress) = if duration.is_zero() {
            (AnimationState::Completed, 1.0)
        } else {
            (AnimationState::Playing, 0.0)
        };

        Self {
            from,
            to,
            duration,
            easing: EasingFunction::default(),
            state,
            progress,
            elapsed: Duration::ZERO,
        }
    }

    /// 设置缓动函数
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// 推进动画
    ///
    /// # 返回
    /// - `true`: 动画仍在进行中
    /// - `false`: 动画已结束
    pub fn update(&mut self, dt: Duration) -> bool {
        if self.state.is_finished() {
            return false;
        }

        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.progress = 1.0;
            self.state = AnimationState::Completed;
            false
        } else {
            let raw_progress = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
            self.progress = self.easing.apply(raw_progress);
            true
        }
    }

    /// 获取当前值
    pub fn current_value(&self) -> f32 {
        self.from + (self.to - self.from) * self.progress
    }

    /// 获取最终值
    pub fn final_value(&self) -> f32 {
        self.to
    }

    /// 获取初始值
    pub fn initial_value(&self) -> f32 {
        self.from
    }

    /// 已经过的时间
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn create_test_animation() -> ValueAnimation {
        ValueAnimation::new(0.0, 90.0, ms(100)).with_easing(EasingFunction::Linear)
    }

    #[test]
    fn test_animation_creation() {
        let anim = create_test_animation();
        assert_eq!(anim.state, AnimationState::Playing);
        assert_eq!(anim.progress, 0.0);
        assert_eq!(anim.current_value(), 0.0);
        assert_eq!(anim.initial_value(), 0.0);
        assert_eq!(anim.final_value(), 90.0);
    }

    #[test]
    fn test_animation_update() {
        let mut anim = create_test_animation();

        assert!(anim.update(ms(50)));
        assert!((anim.current_value() - 45.0).abs() < 1e-3);

        // 恰好到达时长即完成
        assert!(!anim.update(ms(50)));
        assert!(anim.state.is_finished());
        assert_eq!(anim.current_value(), 90.0);

        // 完成后不再推进
        assert!(!anim.update(ms(50)));
        assert_eq!(anim.elapsed(), ms(100));
    }

    #[test]
    fn test_reverse_values_decrease() {
        let mut anim = ValueAnimation::new(90.0, 0.0, ms(100));
        let mut prev = anim.current_value();
        while anim.update(ms(10)) {
            let value = anim.current_value();
            assert!(value <= prev);
            prev = value;
        }
        assert_eq!(anim.current_value(), 0.0);
    }

    #[test]
    fn test_zero_duration() {
        let anim = ValueAnimation::new(0.0, 1.0, Duration::ZERO);
        assert_eq!(anim.state, AnimationState::Completed);
        assert_eq!(anim.current_value(), 1.0);
    }
}
