//! # DI Scanning
//!
//! 基于约定的服务注册，以及对已注册服务的装饰、聚合与适配。
//!
//! ## 扫描
//!
//! 选择链依次确定类型来源（crate）、实现类型、服务类型和生命周期，
//! 最终按注册策略写入 [`ServiceCollection`](di_abstractions::ServiceCollection)：
//!
//! ```ignore
//! services.scan(|scan| {
//!     scan.from_crate_of::<OrderService>()
//!         .add_classes_where(|classes| classes.in_namespace_of::<OrderService>())
//!         .using_registration_strategy(Skip)
//!         .as_implemented_services()
//!         .with_scoped_lifetime();
//! })?;
//! ```
//!
//! ## 装饰
//!
//! [`DecorateExt`] 将匹配的注册原位替换为包装原实现的工厂，支持封闭类型与开放泛型。

pub mod adaptation;
pub mod aggregation;
pub mod decoration;
pub mod filter;
pub mod scan;
pub mod selector;
pub mod strategy;

pub use adaptation::AdaptExt;
pub use aggregation::AggregateExt;
pub use decoration::{
    decorate_fn, ClosedTypeDecoration, DecorateExt, DecorateFn, DecorationStrategy, Decorator,
    GenericDecorator, GenericDecoratorTable, OpenGenericDecoration,
};
pub use filter::TypeFilter;
pub use scan::ScanExt;
pub use selector::{
    ChainClasses, ChainServices, ChainSources, ImplementationTypeSelector, LifetimeSelector,
    ServiceTypeSelector, TypeSourceSelector,
};
pub use strategy::{Append, RegistrationStrategy, Replace, ReplacementBehavior, Skip, Throw};

/// 常用类型与扩展 trait
pub mod prelude {
    pub use crate::{
        AdaptExt, AggregateExt, Append, ChainClasses, ChainServices, ChainSources, DecorateExt,
        Decorator, GenericDecorator, GenericDecoratorTable, RegistrationStrategy, Replace,
        ReplacementBehavior, ScanExt, Skip, Throw, TypeFilter,
    };
}
