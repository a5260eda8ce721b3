//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义服务描述、服务集合和类型反射记录。
//!
//! ## 核心接口
//!
//! - [`ServiceCollection`] - 有序的服务描述符列表，供容器消费
//! - [`ServiceDescriptor`] - 服务类型、生命周期与实现方式
//! - [`ServiceProvider`] - 服务解析接口
//! - [`Injectable`] - 可由容器构造的类型
//! - [`TypeMetadata`] / [`TypeCatalog`] - 可扫描类型的反射记录

pub mod collection;
pub mod descriptor;
pub mod discovery;
pub mod factory;
pub mod instance;
pub mod reflection;
pub mod resolver;

pub use collection::*;
pub use descriptor::*;
pub use discovery::*;
pub use factory::*;
pub use instance::*;
pub use reflection::*;
pub use resolver::*;

pub use di_common::{
    GenericDefinition, Lifetime, RegistrationError, RegistrationResult, ResolveError,
    ResolveResult, TypeInfo,
};
