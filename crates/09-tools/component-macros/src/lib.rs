//! # Component Macros
//!
//! 为类型生成构造与反射代码，使其可以被约定扫描发现。
//!
//! ## 核心宏
//!
//! - [`injectable`] - 生成 `Reflect` 实现并在启动时登记到全局类型目录
//! - [`Injectable`] - 按字段类型从容器解析依赖
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::{injectable, Injectable};
//! use std::sync::Arc;
//!
//! #[injectable(implements(dyn Mailer), descriptor(service = dyn Mailer, lifetime = scoped))]
//! #[derive(Injectable)]
//! pub struct SmtpMailer {
//!     clock: Arc<dyn Clock>,
//!     retries: u32,
//! }
//! ```
//!
//! 使用 `#[injectable]` 的 crate 需要依赖 `ctor` 与 `di-abstractions`。

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod injectable;
mod utils;

/// 可扫描类型宏
///
/// 为结构体实现 `di_abstractions::Reflect`，并在程序启动时登记到全局类型目录。
/// 结构体本身需要实现 `Injectable`。
///
/// # 参数
///
/// - `implements(dyn A, dyn B)` - 实现的服务类型
/// - `attribute(expr)` - 属性值，可重复
/// - `descriptor(service = dyn A, lifetime = scoped)` - 服务描述属性，可重复；
///   省略 `service` 表示自身及所有实现的服务
/// - `private` - 扫描时视为非公开类型（非 `pub` 结构体始终为非公开）
///
/// # 示例
///
/// ```rust,ignore
/// #[injectable(implements(dyn Clock), attribute(Experimental))]
/// #[derive(Injectable)]
/// pub struct SystemClock;
/// ```
#[proc_macro_attribute]
pub fn injectable(args: TokenStream, input: TokenStream) -> TokenStream {
    injectable::injectable_impl(args, input)
}

/// 可注入类型派生宏
///
/// 字段按类型解析：
///
/// - `Arc<T>` - `provider.get::<T>()`
/// - `Option<Arc<T>>` - `provider.try_get::<T>()`
/// - `Vec<Arc<T>>` - `provider.get_all::<T>()`
/// - 其他类型或标注 `#[inject(default)]` 的字段 - `Default::default()`
///
/// # 示例
///
/// ```rust,ignore
/// #[derive(Injectable)]
/// pub struct Reception {
///     clock: Arc<dyn Clock>,
///     #[inject(default)]
///     visits: AtomicUsize,
/// }
/// ```
#[proc_macro_derive(Injectable, attributes(inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::derive_injectable_impl(input)
}
