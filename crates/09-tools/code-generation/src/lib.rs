//! # DI Codegen
//!
//! 在构建期扫描 crate 源码，按扫描计划生成服务注册代码，
//! 结果与运行时扫描一致而不需要运行时类型目录。
//!
//! ## 流程
//!
//! 1. [`SourceParser`] 读取模块树，得到 [`SourceCrate`]
//! 2. [`ScanPlan`] 描述筛选、服务选择、生命周期与注册策略
//! 3. [`select`] 得到注册列表，[`emit`] 生成 `register_services` 函数
//!
//! [`Generator`] 把以上步骤组合为构建脚本接口。

pub mod emitter;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod plan;
pub mod selection;

pub use emitter::emit;
pub use error::{ScanError, ScanResult};
pub use generator::{GeneratedCode, Generator};
pub use model::{SourceCrate, SourceDescriptor, SourceType, TypeRef};
pub use parser::SourceParser;
pub use plan::{
    FilterSpec, RegistrationSpec, ReplaceBehaviorSpec, ScanPlan, ScanRule, ServiceSpec,
    StrategySpec,
};
pub use selection::{select, select_rule, Registration, RegistrationKind};
