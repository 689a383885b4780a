//! # Config 模块
//!
//! 控制器参数，集中管理所有可调项。
//!
//! 默认值即 [`effects::defaults`](crate::effects::defaults) 中的固定常量；
//! 宿主可以把 `BlurConfig` 嵌入自己的配置文件，缺省字段回落到默认值。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::EasingFunction;
use crate::effects::{EffectTable, defaults};
use crate::error::ConfigError;

/// 模糊控制器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlurConfig {
    /// 量化步长
    ///
    /// 描述符表每 `step` 一项；每帧半径变化小于 `step / 2` 时不重新应用效果。
    #[serde(default = "default_step")]
    pub step: f32,

    /// 最大模糊半径
    #[serde(default = "default_max_radius")]
    pub max_radius: f32,

    /// 正向动画时长（毫秒）
    #[serde(default = "default_forward_duration_ms")]
    pub forward_duration_ms: u64,

    /// 反向动画时长（毫秒）
    #[serde(default = "default_reverse_duration_ms")]
    pub reverse_duration_ms: u64,

    /// 周期结束后遮罩延迟隐藏时长（毫秒）
    #[serde(default = "default_overlay_hide_delay_ms")]
    pub overlay_hide_delay_ms: u64,

    /// 遮罩最大透明度 (0.0 - 1.0)
    #[serde(default = "default_max_dim_alpha")]
    pub max_dim_alpha: f32,

    /// 正向缓动
    #[serde(default)]
    pub forward_easing: EasingFunction,

    /// 反向缓动
    #[serde(default)]
    pub reverse_easing: EasingFunction,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            step: default_step(),
            max_radius: default_max_radius(),
            forward_duration_ms: default_forward_duration_ms(),
            reverse_duration_ms: default_reverse_duration_ms(),
            overlay_hide_delay_ms: default_overlay_hide_delay_ms(),
            max_dim_alpha: default_max_dim_alpha(),
            forward_easing: EasingFunction::default(),
            reverse_easing: EasingFunction::default(),
        }
    }
}

impl BlurConfig {
    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(ConfigError::InvalidStep(self.step));
        }
        if !self.max_radius.is_finite() || self.max_radius < 0.0 {
            return Err(ConfigError::InvalidMaxRadius(self.max_radius));
        }
        if EffectTable::entry_count(self.step, self.max_radius).is_none() {
            return Err(ConfigError::TableTooLarge {
                step: self.step,
                max_radius: self.max_radius,
            });
        }
        if !(0.0..=1.0).contains(&self.max_dim_alpha) {
            return Err(ConfigError::InvalidDimAlpha(self.max_dim_alpha));
        }
        Ok(())
    }

    /// 是否与共享默认描述符表的参数一致
    pub(crate) fn uses_default_table(&self) -> bool {
        self.step == defaults::STEP && self.max_radius == defaults::MAX_RADIUS
    }

    /// 正向动画时长
    pub fn forward_duration(&self) -> Duration {
        Duration::from_millis(self.forward_duration_ms)
    }

    /// 反向动画时长
    pub fn reverse_duration(&self) -> Duration {
        Duration::from_millis(self.reverse_duration_ms)
    }

    /// 遮罩延迟隐藏时长
    pub fn overlay_hide_delay(&self) -> Duration {
        Duration::from_millis(self.overlay_hide_delay_ms)
    }

    /// 半径对应的遮罩透明度：`clamp(radius / max_radius, 0, 1) * max_dim_alpha`
    pub fn dim_alpha_for(&self, radius: f32) -> f32 {
        if self.max_radius.is_nan() || self.max_radius <= 0.0 {
            return 0.0;
        }
        (radius / self.max_radius).clamp(0.0, 1.0) * self.max_dim_alpha
    }
}

fn default_step() -> f32 {
    defaults::STEP
}

fn default_max_radius() -> f32 {
    defaults::MAX_RADIUS
}

fn default_forward_duration_ms() -> u64 {
    defaults::FORWARD_DURATION_MS
}

fn default_reverse_duration_ms() -> u64 {
    defaults::REVERSE_DURATION_MS
}

fn default_overlay_hide_delay_ms() -> u64 {
    defaults::OVERLAY_HIDE_DELAY_MS
}

fn default_max_dim_alpha() -> f32 {
    defaults::MAX_DIM_ALPHA
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BlurConfig::default();
        assert_eq!(config.step, 3.0);
        assert_eq!(config.max_radius, 90.0);
        assert_eq!(config.forward_duration(), Duration::from_millis(310));
        assert_eq!(config.reverse_duration(), Duration::from_millis(100));
        assert_eq!(config.overlay_hide_delay(), Duration::from_millis(2000));
        assert_eq!(config.max_dim_alpha, 0.5);
        assert!(config.validate().is_ok());
        assert!(config.uses_default_table());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: BlurConfig =
            serde_json::from_str(r#"{ "step": 5.0, "reverse_easing": "linear" }"#).unwrap();
        assert_eq!(config.step, 5.0);
        assert_eq!(config.max_radius, 90.0);
        assert_eq!(config.forward_duration_ms, 310);
        assert_eq!(config.reverse_easing, EasingFunction::Linear);
        assert_eq!(config.forward_easing, EasingFunction::EaseInOut);
        assert!(!config.uses_default_table());
    }

    #[test]
    fn test_validate_rejects_invalid_values() {
        let config = BlurConfig {
            step: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidStep(0.0)));

        let config = BlurConfig {
            max_radius: -1.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidMaxRadius(-1.0)));

        let config = BlurConfig {
            max_dim_alpha: 1.5,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidDimAlpha(1.5)));
    }

    #[test]
    fn test_validate_rejects_oversized_table() {
        let config = BlurConfig {
            max_radius: 1.0e30,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TableTooLarge {
                step: 3.0,
                max_radius: 1.0e30,
            })
        );

        let config = BlurConfig {
            step: 1.0e-6,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TableTooLarge { .. })
        ));

        // 恰好 MAX_ENTRIES 项仍然合法
        let config = BlurConfig {
            step: 1.0,
            max_radius: 4095.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dim_alpha_for() {
        let config = BlurConfig::default();
        assert_eq!(config.dim_alpha_for(0.0), 0.0);
        assert!((config.dim_alpha_for(90.0) - 0.5).abs() < 1e-6);
        assert!((config.dim_alpha_for(45.0) - 0.25).abs() < 1e-6);
        assert!((config.dim_alpha_for(200.0) - 0.5).abs() < 1e-6);
        assert_eq!(config.dim_alpha_for(-10.0), 0.0);
    }
}
