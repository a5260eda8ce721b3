//! # 依赖注入具体实现
//!
//! 提供消费 [`ServiceCollection`](di_abstractions::ServiceCollection) 的参考解析器，
//! 用于端到端验证扫描、装饰、聚合与适配生成的注册。
//!
//! - 同一服务类型多次注册时，单个解析以最后一个注册为准
//! - 单例缓存由根解析器及其所有作用域共享
//! - 作用域实例在各自的作用域内缓存
//! - 解析深度超过 [`ProviderOptions::max_resolution_depth`] 时报错

pub mod options;
pub mod provider;

pub use options::ProviderOptions;
pub use provider::ServiceProviderImpl;
