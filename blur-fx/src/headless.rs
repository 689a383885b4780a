//! # Headless 模块
//!
//! 不依赖真实界面的表面实现，记录控制器对表面做过的所有操作。
//! 用于测试以及无界面宿主（例如服务端预览、回放工具）。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::effects::BlurEffect;
use crate::error::SurfaceError;
use crate::surface::{BlurTarget, LayerType, OverlayStyle, OverlaySurface, RootSurface, SurfaceId};

/// 无界面的模糊目标
#[derive(Debug)]
pub struct HeadlessTarget {
    id: SurfaceId,
    layer: Cell<LayerType>,
    layer_changes: Cell<usize>,
    effect: Cell<Option<BlurEffect>>,
    applied: RefCell<Vec<f32>>,
    clears: Cell<usize>,
    fail_effects: Cell<bool>,
    fail_layer: Cell<bool>,
    root: Option<Rc<HeadlessRoot>>,
}

impl HeadlessTarget {
    /// 创建挂在 `root` 下的目标
    pub fn new(id: u64, layer: LayerType, root: &Rc<HeadlessRoot>) -> Self {
        Self {
            root: Some(root.clone()),
            ..Self::detached(id, layer)
        }
    }

    /// 创建没有顶层表面的目标
    pub fn detached(id: u64, layer: LayerType) -> Self {
        Self {
            id: SurfaceId(id),
            layer: Cell::new(layer),
            layer_changes: Cell::new(0),
            effect: Cell::new(None),
            applied: RefCell::new(Vec::new()),
            clears: Cell::new(0),
            fail_effects: Cell::new(false),
            fail_layer: Cell::new(false),
            root: None,
        }
    }

    /// 当前生效的模糊效果
    pub fn effect(&self) -> Option<BlurEffect> {
        self.effect.get()
    }

    /// 按顺序记录的每次成功应用的半径
    pub fn applied_radii(&self) -> Vec<f32> {
        self.applied.borrow().clone()
    }

    /// 成功清除效果的次数
    pub fn clear_count(&self) -> usize {
        self.clears.get()
    }

    /// 渲染模式被成功修改的次数
    pub fn layer_changes(&self) -> usize {
        self.layer_changes.get()
    }

    /// 让之后的效果操作（应用与清除）失败
    pub fn fail_effects(&self, fail: bool) {
        self.fail_effects.set(fail);
    }

    /// 让之后的渲染模式修改失败
    pub fn fail_layer_changes(&self, fail: bool) {
        self.fail_layer.set(fail);
    }
}

impl BlurTarget for HeadlessTarget {
    fn surface_id(&self) -> SurfaceId {
        self.id
    }

    fn layer_type(&self) -> LayerType {
        self.layer.get()
    }

    fn set_layer_type(&self, layer_type: LayerType) -> Result<(), SurfaceError> {
        if self.fail_layer.get() {
            return Err(SurfaceError::Rejected {
                message: format!("{} 拒绝切换渲染模式", self.id),
            });
        }
        self.layer.set(layer_type);
        self.layer_changes.set(self.layer_changes.get() + 1);
        Ok(())
    }

    fn set_blur_effect(&self, effect: Option<&BlurEffect>) -> Result<(), SurfaceError> {
        if self.fail_effects.get() {
            return Err(SurfaceError::Detached { id: self.id });
        }
        match effect {
            Some(effect) => self.applied.borrow_mut().push(effect.radius),
            None => self.clears.set(self.clears.get() + 1),
        }
        self.effect.set(effect.copied());
        Ok(())
    }

    fn root_surface(&self) -> Option<Rc<dyn RootSurface>> {
        self.root.clone().map(|root| root as Rc<dyn RootSurface>)
    }
}

/// 无界面的顶层表面
#[derive(Debug, Default)]
pub struct HeadlessRoot {
    overlays: RefCell<Vec<Rc<HeadlessOverlay>>>,
    refuse: Cell<bool>,
}

impl HeadlessRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已挂载的遮罩数量
    pub fn overlay_count(&self) -> usize {
        self.overlays.borrow().len()
    }

    /// 最近挂载的遮罩
    pub fn last_overlay(&self) -> Option<Rc<HeadlessOverlay>> {
        self.overlays.borrow().last().cloned()
    }

    /// 让之后的遮罩挂载失败
    pub fn refuse_overlays(&self, refuse: bool) {
        self.refuse.set(refuse);
    }
}

impl RootSurface for HeadlessRoot {
    fn attach_overlay(
        &self,
        style: &OverlayStyle,
    ) -> Result<Rc<dyn OverlaySurface>, SurfaceError> {
        if self.refuse.get() {
            return Err(SurfaceError::Rejected {
                message: "根表面拒绝挂载子表面".to_string(),
            });
        }

        let overlay = Rc::new(HeadlessOverlay {
            style: style.clone(),
            alpha: Cell::new(style.initial_alpha),
            visible: Cell::new(true),
            alpha_history: RefCell::new(Vec::new()),
        });
        self.overlays.borrow_mut().push(overlay.clone());
        Ok(overlay)
    }
}

/// 无界面的遮罩层
#[derive(Debug)]
pub struct HeadlessOverlay {
    style: OverlayStyle,
    alpha: Cell<f32>,
    visible: Cell<bool>,
    alpha_history: RefCell<Vec<f32>>,
}

impl HeadlessOverlay {
    /// 创建时使用的外观
    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// 当前透明度
    pub fn alpha(&self) -> f32 {
        self.alpha.get()
    }

    /// 是否可见
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// 所有设置过的透明度
    pub fn alpha_history(&self) -> Vec<f32> {
        self.alpha_history.borrow().clone()
    }
}

impl OverlaySurface for HeadlessOverlay {
    fn set_alpha(&self, alpha: f32) {
        self.alpha.set(alpha);
        self.alpha_history.borrow_mut().push(alpha);
    }

    fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }
}
