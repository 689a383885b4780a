//! # Effects 模块（量化模糊效果缓存）
//!
//! 每帧重新创建模糊描述符代价较高。本模块把半径按 `step` 量化，
//! 在控制器构造时一次性预计算整张表，之后每帧 O(1) 查表。
//! 量化误差不超过 `step / 2`，肉眼不可见。
//!
//! ## 核心组件
//!
//! - [`BlurEffect`]：单个模糊描述符（半径、平铺模式、底层滤镜）
//! - [`EffectTable`]：按量化半径索引的不可变描述符表
//! - [`defaults`]：默认参数，所有默认值的**唯一来源**
//!
//! ## 使用流程
//!
//! ```text
//! BlurConfig { step, max_radius }
//!   → EffectTable::build() / EffectTable::shared_default()
//!   → BlurController 每帧 lookup(radius) → BlurTarget::set_blur_effect()
//! ```

mod registry;
mod table;

pub use registry::{BlurEffect, ColorFilter, TileMode, defaults};
pub use table::EffectTable;
