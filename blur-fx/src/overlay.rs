//! # Overlay 模块
//!
//! 全屏变暗遮罩的管理：按需创建一次、之后复用，显示/隐藏带去抖的延迟隐藏。
//!
//! 周期结束后不立即隐藏遮罩，而是等待一段时间：
//! 新的模糊动画紧接着开始时遮罩仍在，不会闪烁。

use std::rc::Rc;
use std::time::Duration;

use crate::error::{BlurError, BlurResult};
use crate::surface::{OverlayStyle, OverlaySurface, RootSurface};

/// 遮罩管理器
pub struct OverlayManager {
    /// 遮罩表面（首次 ensure 时创建）
    surface: Option<Rc<dyn OverlaySurface>>,
    /// 创建遮罩时使用的外观
    style: OverlayStyle,
    /// 是否可见
    visible: bool,
    /// 当前透明度
    alpha: f32,
    /// 待执行的延迟隐藏（剩余时间）
    pending_hide: Option<Duration>,
}

impl Default for OverlayManager {
    fn default() -> Self {
        Self::new(OverlayStyle::default())
    }
}

impl std::fmt::Debug for OverlayManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayManager")
            .field("created", &self.surface.is_some())
            .field("visible", &self.visible)
            .field("alpha", &self.alpha)
            .field("pending_hide", &self.pending_hide)
            .finish()
    }
}

impl OverlayManager {
    /// 创建遮罩管理器（此时尚未创建遮罩表面）
    pub fn new(style: OverlayStyle) -> Self {
        Self {
            surface: None,
            style,
            visible: false,
            alpha: 0.0,
            pending_hide: None,
        }
    }

    /// 确保遮罩已创建
    ///
    /// 只在首次调用时向 `root` 挂载遮罩，初始为隐藏、透明度取自外观的 `initial_alpha`；
    /// 之后的调用是空操作。
    ///
    /// # 返回
    /// - `Ok(true)`: 本次新建了遮罩
    /// - `Ok(false)`: 遮罩已存在
    pub fn ensure(&mut self, root: &dyn RootSurface) -> BlurResult<bool> {
        if self.surface.is_some() {
            return Ok(false);
        }

        let surface = root
            .attach_overlay(&self.style)
            .map_err(BlurError::OverlayAttach)?;
        let alpha = self.style.initial_alpha;
        surface.set_alpha(alpha);
        surface.set_visible(false);

        self.surface = Some(surface);
        self.alpha = alpha;
        self.visible = false;
        tracing::debug!("遮罩层已创建");
        Ok(true)
    }

    /// 显示遮罩并取消待执行的延迟隐藏
    pub fn show(&mut self) {
        self.cancel_pending_hide();
        if let Some(surface) = &self.surface {
            surface.set_visible(true);
            self.visible = true;
        }
    }

    /// 设置遮罩透明度
    pub fn set_alpha(&mut self, alpha: f32) {
        if let Some(surface) = &self.surface {
            surface.set_alpha(alpha);
            self.alpha = alpha;
        }
    }

    /// 安排延迟隐藏
    ///
    /// 已有待执行的隐藏时替换之（去抖）。遮罩尚未创建时不做任何事。
    pub fn schedule_hide(&mut self, delay: Duration) {
        if self.surface.is_none() {
            return;
        }
        self.pending_hide = Some(delay);
    }

    /// 取消待执行的延迟隐藏
    ///
    /// # 返回
    /// 是否确实取消了一个待执行的隐藏
    pub fn cancel_pending_hide(&mut self) -> bool {
        self.pending_hide.take().is_some()
    }

    /// 推进延迟隐藏计时
    ///
    /// # 返回
    /// 本次是否执行了隐藏
    pub fn advance(&mut self, dt: Duration) -> bool {
        let Some(remaining) = self.pending_hide else {
            return false;
        };

        let remaining = remaining.saturating_sub(dt);
        if !remaining.is_zero() {
            self.pending_hide = Some(remaining);
            return false;
        }

        self.pending_hide = None;
        if let Some(surface) = &self.surface {
            surface.set_visible(false);
        }
        self.visible = false;
        true
    }

    /// 遮罩是否已创建
    pub fn is_created(&self) -> bool {
        self.surface.is_some()
    }

    /// 遮罩是否可见
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// 当前透明度
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// 距离延迟隐藏执行的剩余时间
    pub fn pending_hide_remaining(&self) -> Option<Duration> {
        self.pending_hide
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessRoot;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_ensure_creates_once() {
        let root = HeadlessRoot::new();
        let mut overlay = OverlayManager::default();

        assert_eq!(overlay.ensure(&root), Ok(true));
        assert_eq!(overlay.ensure(&root), Ok(false));
        assert_eq!(root.overlay_count(), 1);

        let surface = root.last_overlay().unwrap();
        assert!(!surface.is_visible());
        assert_eq!(surface.alpha(), 0.0);
        assert_eq!(surface.style(), &OverlayStyle::default());
    }

    #[test]
    fn test_ensure_uses_style_initial_alpha() {
        let root = HeadlessRoot::new();
        let mut overlay = OverlayManager::new(OverlayStyle {
            initial_alpha: 0.2,
            ..Default::default()
        });

        assert_eq!(overlay.ensure(&root), Ok(true));
        assert_eq!(overlay.alpha(), 0.2);
        let surface = root.last_overlay().unwrap();
        assert_eq!(surface.alpha(), 0.2);
        assert_eq!(surface.alpha_history(), vec![0.2]);
        assert!(!surface.is_visible());
    }

    #[test]
    fn test_ensure_refused() {
        let root = HeadlessRoot::new();
        root.refuse_overlays(true);
        let mut overlay = OverlayManager::default();

        assert!(matches!(
            overlay.ensure(&root),
            Err(BlurError::OverlayAttach(_))
        ));
        assert!(!overlay.is_created());

        // 之后仍可重试
        root.refuse_overlays(false);
        assert_eq!(overlay.ensure(&root), Ok(true));
    }

    #[test]
    fn test_operations_before_creation_are_noops() {
        let mut overlay = OverlayManager::default();
        overlay.show();
        overlay.set_alpha(0.3);
        overlay.schedule_hide(ms(100));

        assert!(!overlay.is_visible());
        assert_eq!(overlay.alpha(), 0.0);
        assert_eq!(overlay.pending_hide_remaining(), None);
    }

    #[test]
    fn test_delayed_hide() {
        let root = HeadlessRoot::new();
        let mut overlay = OverlayManager::default();
        overlay.ensure(&root).unwrap();
        overlay.show();
        let surface = root.last_overlay().unwrap();
        assert!(surface.is_visible());

        overlay.schedule_hide(ms(100));
        assert!(!overlay.advance(ms(60)));
        assert!(surface.is_visible());
        assert_eq!(overlay.pending_hide_remaining(), Some(ms(40)));

        assert!(overlay.advance(ms(40)));
        assert!(!surface.is_visible());
        assert!(!overlay.is_visible());
        assert_eq!(overlay.pending_hide_remaining(), None);

        // 已执行，不再触发
        assert!(!overlay.advance(ms(100)));
    }

    #[test]
    fn test_reschedule_replaces_pending_hide() {
        let root = HeadlessRoot::new();
        let mut overlay = OverlayManager::default();
        overlay.ensure(&root).unwrap();
        overlay.show();

        overlay.schedule_hide(ms(100));
        overlay.advance(ms(80));
        overlay.schedule_hide(ms(100));
        assert!(!overlay.advance(ms(80)));
        assert!(overlay.is_visible());
        assert!(overlay.advance(ms(20)));
    }

    #[test]
    fn test_show_cancels_pending_hide() {
        let root = HeadlessRoot::new();
        let mut overlay = OverlayManager::default();
        overlay.ensure(&root).unwrap();
        overlay.schedule_hide(ms(100));

        overlay.show();
        assert_eq!(overlay.pending_hide_remaining(), None);
        assert!(!overlay.advance(ms(200)));
        assert!(overlay.is_visible());
    }

    #[test]
    fn test_set_alpha() {
        let root = HeadlessRoot::new();
        let mut overlay = OverlayManager::default();
        overlay.ensure(&root).unwrap();

        overlay.set_alpha(0.25);
        assert_eq!(overlay.alpha(), 0.25);
        assert_eq!(root.last_overlay().unwrap().alpha(), 0.25);
    }
}
