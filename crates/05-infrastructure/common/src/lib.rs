//! # DI Common
//!
//! 这个 crate 提供了 Lorn DI 各层共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`TypeInfo`] - 运行时类型信息（类型ID + 完整类型名）
//! - [`GenericDefinition`] - 泛型定义，用于开放泛型匹配
//! - [`Lifetime`] - 服务生命周期
//! - [`conventions`] - 命名空间与命名约定
//! - [`RegistrationError`] / [`ResolveError`] - 错误类型
//!
//! ## 设计原则
//!
//! - 模块路径即命名空间，crate 即程序集
//! - 约定优于配置

pub mod conventions;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use conventions::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
