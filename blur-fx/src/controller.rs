//! # Controller 模块
//!
//! 模糊动画控制器：正向/反向两阶段插值状态机。
//!
//! ## 状态转换
//!
//! ```text
//!            start                 正向完成                反向完成
//!   Idle ───────────► Forward ───────────────► Reverse ───────────► Idle
//!                       ▲  │                      │
//!                       │  └── start / cancel ────┴──► 取消清理 ──► (start 时重新进入 Forward)
//!                       └───────────────────────────────────────────┘
//! ```
//!
//! 取消与正常完成走同一条清理路径：清除效果、恢复渲染模式、半径归零、安排遮罩延迟隐藏。
//! 被新 `start` 打断或被外部取消的动画不会让目标停留在半模糊状态。
//!
//! ## 驱动方式
//!
//! 控制器不自己调度定时器。宿主在 UI 线程的帧循环中调用 [`BlurController::update`]，
//! 控制器据此推进当前会话与遮罩的延迟隐藏，并返回期间产生的事件。

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::animation::{Direction, ValueAnimation};
use crate::config::BlurConfig;
use crate::effects::EffectTable;
use crate::error::{BlurError, BlurResult, ConfigError};
use crate::layer::LayerTracker;
use crate::overlay::OverlayManager;
use crate::surface::{BlurTarget, OverlayStyle, SurfaceId};

/// 驱动阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverPhase {
    /// 空闲
    #[default]
    Idle,
    /// 正向插值中（0 → 最大半径）
    Forward,
    /// 反向插值中（最大半径 → 0）
    Reverse,
}

impl From<Direction> for DriverPhase {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Forward => DriverPhase::Forward,
            Direction::Reverse => DriverPhase::Reverse,
        }
    }
}

impl std::fmt::Display for DriverPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DriverPhase::Idle => "idle",
            DriverPhase::Forward => "forward",
            DriverPhase::Reverse => "reverse",
        };
        f.write_str(name)
    }
}

/// 控制器事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurEvent {
    /// 正向会话开始
    ForwardStarted { target: SurfaceId },
    /// 正向完成，反向会话开始
    ReverseStarted { target: SurfaceId },
    /// 反向完成，目标已恢复
    Finished { target: SurfaceId },
    /// 会话被取消，目标已恢复
    Cancelled {
        target: SurfaceId,
        phase: DriverPhase,
    },
    /// 遮罩延迟隐藏已执行
    OverlayHidden,
}

impl std::fmt::Display for BlurEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlurEvent::ForwardStarted { target } => write!(f, "forward_started {target}"),
            BlurEvent::ReverseStarted { target } => write!(f, "reverse_started {target}"),
            BlurEvent::Finished { target } => write!(f, "finished {target}"),
            BlurEvent::Cancelled { target, phase } => write!(f, "cancelled {target} ({phase})"),
            BlurEvent::OverlayHidden => f.write_str("overlay_hidden"),
        }
    }
}

/// 单向插值会话
struct Session {
    direction: Direction,
    animation: ValueAnimation,
    /// 不持有目标，目标销毁后会话只更新遮罩
    target: Weak<dyn BlurTarget>,
    target_id: SurfaceId,
}

/// 模糊动画控制器
///
/// 每个 UI 线程只应创建一个，通过 [`ControllerHandle`] 在调用点之间共享。
/// 同一时刻最多只有一个活跃会话；对外的任何操作都不会返回错误，
/// 失败只记录日志并跳过对应的视觉更新。
pub struct BlurController {
    config: BlurConfig,
    effects: Arc<EffectTable>,
    session: Option<Session>,
    /// 最近一次应用到目标上的半径
    current_radius: f32,
    overlay: OverlayManager,
    layers: LayerTracker,
    events: Vec<BlurEvent>,
}

impl Default for BlurController {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BlurController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlurController")
            .field("phase", &self.phase())
            .field("current_radius", &self.current_radius)
            .field("overlay", &self.overlay)
            .field("tracked_layers", &self.layers.len())
            .finish()
    }
}

impl BlurController {
    /// 使用默认配置创建控制器，共享进程级默认描述符表
    pub fn new() -> Self {
        Self::from_parts(BlurConfig::default(), EffectTable::shared_default())
    }

    /// 使用自定义配置创建控制器
    pub fn with_config(config: BlurConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let effects = if config.uses_default_table() {
            EffectTable::shared_default()
        } else {
            Arc::new(EffectTable::build(config.step, config.max_radius))
        };
        Ok(Self::from_parts(config, effects))
    }

    fn from_parts(config: BlurConfig, effects: Arc<EffectTable>) -> Self {
        Self {
            config,
            effects,
            session: None,
            current_radius: 0.0,
            overlay: OverlayManager::new(OverlayStyle::default()),
            layers: LayerTracker::new(),
            events: Vec::new(),
        }
    }

    // ========== 控制 ==========

    /// 在 `target` 上开始正向模糊
    ///
    /// 已有会话时先取消它（其取消清理先执行），再立即开始新的正向会话。
    pub fn start<T: BlurTarget + 'static>(&mut self, target: &Rc<T>) {
        let target: Rc<dyn BlurTarget> = target.clone();
        self.begin_forward(&target);
    }

    /// 兼容入口：忽略 `duration`，行为与 [`start`](Self::start) 相同
    pub fn start_with_duration<T: BlurTarget + 'static>(
        &mut self,
        target: &Rc<T>,
        _duration: Duration,
    ) {
        self.start(target);
    }

    /// 通过弱引用开始
    ///
    /// 弱引用已失效视为空目标：不改变任何状态，也不报错。
    pub fn start_weak(&mut self, target: &Weak<dyn BlurTarget>) {
        match target.upgrade() {
            Some(target) => self.begin_forward(&target),
            None => debug!("目标为空，忽略 start"),
        }
    }

    /// 取消当前会话
    ///
    /// 执行与正常完成相同的清理。
    ///
    /// # 返回
    /// 是否确实取消了一个会话
    pub fn cancel(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        self.on_cancel(session);
        true
    }

    /// 推进会话与遮罩延迟隐藏
    ///
    /// # 返回
    /// 自上次取出以来产生的事件（包括 `start` / `cancel` 产生的）
    pub fn update(&mut self, dt: Duration) -> Vec<BlurEvent> {
        if self.overlay.advance(dt) {
            debug!("遮罩已隐藏");
            self.events.push(BlurEvent::OverlayHidden);
        }

        if let Some(session) = self.session.as_mut() {
            let running = session.animation.update(dt);
            let value = session.animation.current_value();
            self.on_tick(value);
            if !running {
                self.on_complete();
            }
        }

        std::mem::take(&mut self.events)
    }

    /// 取出待处理的事件
    pub fn drain_events(&mut self) -> Vec<BlurEvent> {
        std::mem::take(&mut self.events)
    }

    /// 目标已被宿主销毁，丢弃其渲染模式记录
    pub fn forget_target(&mut self, id: SurfaceId) {
        if self.layers.forget(id).is_some() {
            debug!(surface = %id, "已丢弃目标的渲染模式记录");
        }
    }

    // ========== 状态转换 ==========

    fn begin_forward(&mut self, target: &Rc<dyn BlurTarget>) {
        let id = target.surface_id();

        // 先走旧会话的取消清理，再准备新会话
        self.cancel();
        self.prepare_overlay(target.as_ref());
        if let Err(e) = self.layers.prepare(target.as_ref()) {
            warn!(surface = %id, error = %e, "切换硬件加速层失败");
        }

        let animation = ValueAnimation::new(
            0.0,
            self.config.max_radius,
            self.config.forward_duration(),
        )
        .with_easing(self.config.forward_easing);

        self.session = Some(Session {
            direction: Direction::Forward,
            animation,
            target: Rc::downgrade(target),
            target_id: id,
        });
        self.events.push(BlurEvent::ForwardStarted { target: id });
        debug!(surface = %id, "开始正向模糊");
    }

    fn prepare_overlay(&mut self, target: &dyn BlurTarget) {
        if !self.overlay.is_created() {
            match target.root_surface() {
                Some(root) => {
                    if let Err(e) = self.overlay.ensure(root.as_ref()) {
                        warn!(error = %e, "遮罩层不可用，本次动画不变暗");
                    }
                }
                None => debug!(surface = %target.surface_id(), "目标没有顶层表面，跳过遮罩"),
            }
        }
        self.overlay.show();
    }

    /// 每帧：变化达到半个量化步长才应用缓存效果，无条件更新遮罩透明度
    fn on_tick(&mut self, value: f32) {
        let Some((target, id)) = self
            .session
            .as_ref()
            .map(|s| (s.target.clone(), s.target_id))
        else {
            return;
        };

        if (value - self.current_radius).abs() >= self.effects.step() / 2.0 {
            if let Some(target) = target.upgrade()
                && let Err(e) = self.apply_cached_effect(target.as_ref(), value)
            {
                warn!(surface = %id, error = %e, "跳过本帧模糊");
            }
            self.current_radius = value;
        }

        self.overlay.set_alpha(self.config.dim_alpha_for(value));
    }

    fn on_complete(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        match session.direction {
            Direction::Forward => {
                let animation = ValueAnimation::new(
                    self.config.max_radius,
                    0.0,
                    self.config.reverse_duration(),
                )
                .with_easing(self.config.reverse_easing);

                let id = session.target_id;
                self.session = Some(Session {
                    direction: Direction::Reverse,
                    animation,
                    ..session
                });
                self.events.push(BlurEvent::ReverseStarted { target: id });
                debug!(surface = %id, "正向完成，开始反向");
            }
            Direction::Reverse => {
                self.reset_effect(&session);
                self.events.push(BlurEvent::Finished {
                    target: session.target_id,
                });
                debug!(surface = %session.target_id, "模糊周期完成");
            }
        }
    }

    fn on_cancel(&mut self, session: Session) {
        self.reset_effect(&session);
        self.events.push(BlurEvent::Cancelled {
            target: session.target_id,
            phase: session.direction.into(),
        });
        debug!(surface = %session.target_id, phase = ?session.direction, "会话已取消");
    }

    /// 清理：恢复目标，半径归零，安排遮罩延迟隐藏
    fn reset_effect(&mut self, session: &Session) {
        let result = match session.target.upgrade() {
            Some(target) => self.restore_target(target.as_ref()),
            None => {
                self.layers.forget(session.target_id);
                debug!(surface = %session.target_id, "目标已释放，跳过恢复");
                Ok(())
            }
        };

        if let Err(e) = result {
            error!(error = %e, "清理失败");
        }

        self.current_radius = 0.0;
        self.overlay.schedule_hide(self.config.overlay_hide_delay());
    }

    fn apply_cached_effect(&self, target: &dyn BlurTarget, radius: f32) -> BlurResult<()> {
        let effect = self.effects.lookup(radius);
        target
            .set_blur_effect(Some(effect))
            .map_err(|source| BlurError::EffectApplication { radius, source })
    }

    fn restore_target(&mut self, target: &dyn BlurTarget) -> BlurResult<()> {
        let id = target.surface_id();
        // 清除失败也要恢复渲染模式并移除记录
        let cleared = target.set_blur_effect(None);
        let restored = self.layers.restore(target).map(|_| ());
        cleared
            .and(restored)
            .map_err(|source| BlurError::Restoration { id, source })
    }

    // ========== 查询方法 ==========

    /// 当前驱动阶段
    pub fn phase(&self) -> DriverPhase {
        self.session
            .as_ref()
            .map_or(DriverPhase::Idle, |s| s.direction.into())
    }

    /// 当前会话的插值值
    pub fn session_value(&self) -> Option<f32> {
        self.session.as_ref().map(|s| s.animation.current_value())
    }

    /// 当前会话的目标
    pub fn active_target(&self) -> Option<SurfaceId> {
        self.session.as_ref().map(|s| s.target_id)
    }

    /// 最近一次应用的半径（清理后为 0）
    pub fn current_radius(&self) -> f32 {
        self.current_radius
    }

    /// 遮罩当前透明度
    pub fn overlay_alpha(&self) -> f32 {
        self.overlay.alpha()
    }

    /// 遮罩是否可见
    pub fn is_overlay_visible(&self) -> bool {
        self.overlay.is_visible()
    }

    /// 遮罩是否已创建
    pub fn is_overlay_created(&self) -> bool {
        self.overlay.is_created()
    }

    /// 遮罩延迟隐藏的剩余时间
    pub fn pending_hide_remaining(&self) -> Option<Duration> {
        self.overlay.pending_hide_remaining()
    }

    /// 是否持有目标的渲染模式记录
    pub fn is_tracking(&self, id: SurfaceId) -> bool {
        self.layers.is_tracking(id)
    }

    /// 控制器配置
    pub fn config(&self) -> &BlurConfig {
        &self.config
    }

    /// 描述符表
    pub fn effects(&self) -> &EffectTable {
        &self.effects
    }
}

/// 控制器共享句柄
///
/// 宿主创建一次，克隆后分发给各调用点；所有克隆指向同一个控制器。
/// 只能在创建它的线程上使用。
///
/// 表面实现在回调中再次调用句柄时，该次调用会被忽略并记录警告。
#[derive(Debug, Clone, Default)]
pub struct ControllerHandle {
    inner: Rc<RefCell<BlurController>>,
}

impl ControllerHandle {
    /// 包装控制器
    pub fn new(controller: BlurController) -> Self {
        Self {
            inner: Rc::new(RefCell::new(controller)),
        }
    }

    /// 见 [`BlurController::start`]
    pub fn start<T: BlurTarget + 'static>(&self, target: &Rc<T>) {
        self.with_mut(|c| c.start(target));
    }

    /// 见 [`BlurController::start_with_duration`]
    pub fn start_with_duration<T: BlurTarget + 'static>(&self, target: &Rc<T>, duration: Duration) {
        self.with_mut(|c| c.start_with_duration(target, duration));
    }

    /// 见 [`BlurController::start_weak`]
    pub fn start_weak(&self, target: &Weak<dyn BlurTarget>) {
        self.with_mut(|c| c.start_weak(target));
    }

    /// 见 [`BlurController::cancel`]
    pub fn cancel(&self) -> bool {
        self.with_mut(|c| c.cancel()).unwrap_or(false)
    }

    /// 见 [`BlurController::update`]
    pub fn update(&self, dt: Duration) -> Vec<BlurEvent> {
        self.with_mut(|c| c.update(dt)).unwrap_or_default()
    }

    /// 只读访问控制器
    pub fn with<R>(&self, f: impl FnOnce(&BlurController) -> R) -> Option<R> {
        match self.inner.try_borrow() {
            Ok(controller) => Some(f(&controller)),
            Err(_) => {
                warn!("控制器正在被修改，忽略只读访问");
                None
            }
        }
    }

    /// 可变访问控制器
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut BlurController) -> R) -> Option<R> {
        match self.inner.try_borrow_mut() {
            Ok(mut controller) => Some(f(&mut controller)),
            Err(_) => {
                warn!("控制器重入调用，已忽略");
                None
            }
        }
    }

    /// 两个句柄是否指向同一个控制器
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
