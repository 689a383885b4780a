//! # Effect Table
//!
//! 按量化半径索引的预计算模糊描述符表。

use std::sync::{Arc, OnceLock};

use super::registry::{BlurEffect, defaults};

/// 默认参数的共享描述符表
static DEFAULT_TABLE: OnceLock<Arc<EffectTable>> = OnceLock::new();

/// 模糊描述符表
///
/// 共 `ceil(max_radius / step) + 1` 项，第 `i` 项对应半径 `i * step`。
/// 构造后不可变，可跨线程共享只读访问。
#[derive(Debug, Clone, PartialEq)]
pub struct EffectTable {
    step: f32,
    effects: Vec<BlurEffect>,
}

impl EffectTable {
    /// 表项数量上限
    pub const MAX_ENTRIES: usize = 4096;

    /// 参数对应的表项数量
    ///
    /// `step` 非正时为 1；超过 [`MAX_ENTRIES`](Self::MAX_ENTRIES) 时返回 `None`。
    pub fn entry_count(step: f32, max_radius: f32) -> Option<usize> {
        if step.is_nan() || step <= 0.0 {
            return Some(1);
        }

        let steps = (f64::from(max_radius.max(0.0)) / f64::from(step)).ceil();
        if steps.is_finite() && steps < Self::MAX_ENTRIES as f64 {
            Some(steps as usize + 1)
        } else {
            None
        }
    }

    /// 预计算描述符表
    ///
    /// 调用方需保证参数已通过 [`BlurConfig::validate`](crate::config::BlurConfig::validate)。
    /// `step` 非正时只生成半径为 0 的单项表；表项过多时截断到
    /// [`MAX_ENTRIES`](Self::MAX_ENTRIES) 项，查找时超出部分夹到最后一项。
    pub fn build(step: f32, max_radius: f32) -> Self {
        let count = Self::entry_count(step, max_radius).unwrap_or_else(|| {
            tracing::warn!(step, max_radius, "描述符表项数超过上限，已截断");
            Self::MAX_ENTRIES
        });

        let effects = (0..count)
            .map(|i| BlurEffect::with_radius(i as f32 * step))
            .collect();

        Self { step, effects }
    }

    /// 默认参数（step = 3, max_radius = 90）的共享表
    ///
    /// 首次访问时构造，之后所有控制器共享同一份；多线程同时首次访问也只构造一次。
    pub fn shared_default() -> Arc<EffectTable> {
        DEFAULT_TABLE
            .get_or_init(|| {
                tracing::debug!(
                    step = defaults::STEP,
                    max_radius = defaults::MAX_RADIUS,
                    "构造默认模糊描述符表"
                );
                Arc::new(EffectTable::build(defaults::STEP, defaults::MAX_RADIUS))
            })
            .clone()
    }

    /// 量化步长
    pub fn step(&self) -> f32 {
        self.step
    }

    /// 描述符数量
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// 表是否为空（构造保证至少一项）
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// 半径对应的索引：`clamp(round(radius / step), 0, len - 1)`
    ///
    /// 负数与 NaN 映射到 0。
    pub fn index_for(&self, radius: f32) -> usize {
        let last = self.effects.len().saturating_sub(1);
        if self.step.is_nan() || self.step <= 0.0 {
            return 0;
        }

        let scaled = (radius / self.step).round();
        if scaled > 0.0 {
            (scaled as usize).min(last)
        } else {
            0
        }
    }

    /// 查找半径对应的描述符
    pub fn lookup(&self, radius: f32) -> &BlurEffect {
        &self.effects[self.index_for(radius)]
    }

    /// 按索引获取描述符
    pub fn get(&self, index: usize) -> Option<&BlurEffect> {
        self.effects.get(index)
    }

    /// 遍历所有描述符
    pub fn iter(&self) -> impl Iterator<Item = &BlurEffect> {
        self.effects.iter()
    }
}
