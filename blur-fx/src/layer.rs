//! # Layer 模块
//!
//! 记录目标在动画前的渲染模式，动画结束或取消后恢复。
//!
//! 记录表以 [`SurfaceId`] 为键，不持有目标本身；目标被宿主销毁时，
//! 宿主可调用 [`LayerTracker::forget`] 立即清除，控制器在弱引用失效时也会自动丢弃记录。

use std::collections::HashMap;

use crate::error::SurfaceError;
use crate::surface::{BlurTarget, LayerType, SurfaceId};

/// 渲染模式记录表
#[derive(Debug, Default)]
pub struct LayerTracker {
    /// 目标 ID -> 动画前的渲染模式
    original: HashMap<SurfaceId, LayerType>,
}

impl LayerTracker {
    /// 创建空记录表
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录当前渲染模式并切换到硬件加速层
    ///
    /// 已有记录时保留旧值：同一目标的周期被重新开始时，
    /// 强制切换出的 `Hardware` 不会被当作原始模式记下。
    pub fn prepare(&mut self, target: &dyn BlurTarget) -> Result<(), SurfaceError> {
        let current = target.layer_type();
        self.original
            .entry(target.surface_id())
            .or_insert(current);

        if current != LayerType::Hardware {
            target.set_layer_type(LayerType::Hardware)?;
        }
        Ok(())
    }

    /// 移除记录并恢复原始渲染模式
    ///
    /// # 返回
    /// - `Ok(Some(layer))`: 已恢复为 `layer`
    /// - `Ok(None)`: 无记录，或当前模式已与原始模式一致
    pub fn restore(&mut self, target: &dyn BlurTarget) -> Result<Option<LayerType>, SurfaceError> {
        let Some(original) = self.original.remove(&target.surface_id()) else {
            return Ok(None);
        };

        if target.layer_type() == original {
            return Ok(None);
        }

        target.set_layer_type(original)?;
        Ok(Some(original))
    }

    /// 丢弃目标的记录（目标已销毁）
    pub fn forget(&mut self, id: SurfaceId) -> Option<LayerType> {
        self.original.remove(&id)
    }

    /// 获取目标的原始渲染模式记录
    pub fn recorded(&self, id: SurfaceId) -> Option<LayerType> {
        self.original.get(&id).copied()
    }

    /// 是否正在跟踪该目标
    pub fn is_tracking(&self, id: SurfaceId) -> bool {
        self.original.contains_key(&id)
    }

    /// 记录数量
    pub fn len(&self) -> usize {
        self.original.len()
    }

    /// 是否没有任何记录
    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessTarget;

    #[test]
    fn test_prepare_forces_hardware() {
        let mut tracker = LayerTracker::new();
        let target = HeadlessTarget::detached(1, LayerType::None);

        tracker.prepare(&target).unwrap();
        assert_eq!(target.layer_type(), LayerType::Hardware);
        assert_eq!(tracker.recorded(SurfaceId(1)), Some(LayerType::None));
    }

    #[test]
    fn test_prepare_hardware_target_unchanged() {
        let mut tracker = LayerTracker::new();
        let target = HeadlessTarget::detached(1, LayerType::Hardware);

        tracker.prepare(&target).unwrap();
        assert_eq!(tracker.recorded(SurfaceId(1)), Some(LayerType::Hardware));
        assert_eq!(target.layer_changes(), 0);

        // 原始模式就是 Hardware，无需恢复
        assert_eq!(tracker.restore(&target), Ok(None));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_restore_original() {
        let mut tracker = LayerTracker::new();
        let target = HeadlessTarget::detached(1, LayerType::Software);

        tracker.prepare(&target).unwrap();
        assert_eq!(tracker.restore(&target), Ok(Some(LayerType::Software)));
        assert_eq!(target.layer_type(), LayerType::Software);
        assert!(!tracker.is_tracking(SurfaceId(1)));

        // 记录已移除，再次恢复是空操作
        assert_eq!(tracker.restore(&target), Ok(None));
    }

    #[test]
    fn test_repeated_prepare_keeps_first_record() {
        let mut tracker = LayerTracker::new();
        let target = HeadlessTarget::detached(1, LayerType::None);

        tracker.prepare(&target).unwrap();
        tracker.prepare(&target).unwrap();
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.recorded(SurfaceId(1)), Some(LayerType::None));
    }

    #[test]
    fn test_forget() {
        let mut tracker = LayerTracker::new();
        let target = HeadlessTarget::detached(7, LayerType::None);

        tracker.prepare(&target).unwrap();
        assert_eq!(tracker.forget(SurfaceId(7)), Some(LayerType::None));
        assert!(tracker.is_empty());
        assert_eq!(tracker.forget(SurfaceId(7)), None);
    }

    #[test]
    fn test_prepare_error_keeps_record() {
        let mut tracker = LayerTracker::new();
        let target = HeadlessTarget::detached(1, LayerType::None);
        target.fail_layer_changes(true);

        assert!(tracker.prepare(&target).is_err());
        // 记录仍在，清理阶段会尝试恢复并移除
        assert!(tracker.is_tracking(SurfaceId(1)));
    }
}
