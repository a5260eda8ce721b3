//! # Component Syntax
//!
//! `#[injectable(...)]` 的参数语法。过程宏在展开时解析，代码生成器在
//! 读取源文件时解析，两者共用同一份定义以保证结果一致。
//!
//! ```text
//! #[injectable(
//!     implements(dyn Mailer, dyn Audited),
//!     attribute(Cached { seconds: 30 }),
//!     descriptor(service = dyn Mailer, lifetime = scoped),
//!     private
//! )]
//! ```

use di_common::Lifetime;
use proc_macro2::TokenStream;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, Ident, Meta, Path, Result, Token, Type};

/// 属性名称
pub const ATTRIBUTE_NAME: &str = "injectable";

/// `#[injectable]` 参数
#[derive(Debug, Clone, Default)]
pub struct InjectableArgs {
    /// 实现的服务类型
    pub implements: Vec<Type>,
    /// 属性值表达式
    pub attributes: Vec<Expr>,
    /// 服务描述属性
    pub descriptors: Vec<DescriptorArg>,
    /// 是否在扫描中视为非公开类型
    pub private: bool,
}

/// `descriptor(...)` 参数
#[derive(Debug, Clone)]
pub struct DescriptorArg {
    /// 服务类型，缺省时注册为自身及所有实现的服务
    pub service: Option<Type>,
    /// 生命周期
    pub lifetime: Lifetime,
}

impl InjectableArgs {
    /// 从属性宏参数解析
    pub fn from_tokens(tokens: TokenStream) -> Result<Self> {
        let mut args = Self::default();
        syn::meta::parser(|meta| args.apply(meta)).parse2(tokens)?;
        Ok(args)
    }

    /// 从单个 `#[injectable(...)]` 属性解析
    pub fn from_attribute(attribute: &Attribute) -> Result<Self> {
        let mut args = Self::default();
        if !matches!(attribute.meta, Meta::Path(_)) {
            attribute.parse_nested_meta(|meta| args.apply(meta))?;
        }
        Ok(args)
    }

    /// 从属性列表中查找并合并所有 `#[injectable]`，没有时返回 `None`
    pub fn from_attributes(attributes: &[Attribute]) -> Result<Option<Self>> {
        let mut merged: Option<Self> = None;
        for attribute in attributes
            .iter()
            .filter(|attribute| attribute.path().is_ident(ATTRIBUTE_NAME))
        {
            let args = Self::from_attribute(attribute)?;
            match merged.as_mut() {
                Some(existing) => existing.merge(args),
                None => merged = Some(args),
            }
        }
        Ok(merged)
    }

    fn merge(&mut self, other: Self) {
        self.implements.extend(other.implements);
        self.attributes.extend(other.attributes);
        self.descriptors.extend(other.descriptors);
        self.private |= other.private;
    }

    fn apply(&mut self, meta: ParseNestedMeta<'_>) -> Result<()> {
        if meta.path.is_ident("implements") {
            let content;
            syn::parenthesized!(content in meta.input);
            self.implements
                .extend(Punctuated::<Type, Token![,]>::parse_terminated(&content)?);
        } else if meta.path.is_ident("attribute") {
            let content;
            syn::parenthesized!(content in meta.input);
            self.attributes.push(content.parse::<Expr>()?);
        } else if meta.path.is_ident("descriptor") {
            self.descriptors.push(parse_descriptor(&meta)?);
        } else if meta.path.is_ident("private") {
            self.private = true;
        } else {
            return Err(meta.error("不支持的 injectable 参数，可用参数: implements, attribute, descriptor, private"));
        }
        Ok(())
    }
}

fn parse_descriptor(meta: &ParseNestedMeta<'_>) -> Result<DescriptorArg> {
    let mut descriptor = DescriptorArg {
        service: None,
        lifetime: Lifetime::default(),
    };
    if !meta.input.peek(syn::token::Paren) {
        return Ok(descriptor);
    }

    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("service") {
            descriptor.service = Some(inner.value()?.parse::<Type>()?);
        } else if inner.path.is_ident("lifetime") {
            let ident: Ident = inner.value()?.parse()?;
            descriptor.lifetime = parse_lifetime(&ident)?;
        } else {
            return Err(inner.error("不支持的 descriptor 参数，可用参数: service, lifetime"));
        }
        Ok(())
    })?;
    Ok(descriptor)
}

/// 解析生命周期标识符（`singleton`、`scoped`、`transient`）
pub fn parse_lifetime(ident: &Ident) -> Result<Lifetime> {
    match ident.to_string().as_str() {
        "singleton" => Ok(Lifetime::Singleton),
        "scoped" => Ok(Lifetime::Scoped),
        "transient" => Ok(Lifetime::Transient),
        other => Err(syn::Error::new(
            ident.span(),
            format!("未知的生命周期: {other}，可用值: singleton, scoped, transient"),
        )),
    }
}

/// 生成生命周期的代码
pub fn lifetime_tokens(lifetime: Lifetime) -> TokenStream {
    match lifetime {
        Lifetime::Singleton => quote! { ::di_abstractions::Lifetime::Singleton },
        Lifetime::Scoped => quote! { ::di_abstractions::Lifetime::Scoped },
        Lifetime::Transient => quote! { ::di_abstractions::Lifetime::Transient },
    }
}

/// 服务类型对应的路径：`dyn A + Send` 取 `A`，普通类型取自身路径
pub fn service_path(ty: &Type) -> Option<&Path> {
    match ty {
        Type::TraitObject(object) => object.bounds.iter().find_map(|bound| match bound {
            syn::TypeParamBound::Trait(trait_bound) => Some(&trait_bound.path),
            _ => None,
        }),
        Type::Path(type_path) if type_path.qself.is_none() => Some(&type_path.path),
        Type::Paren(paren) => service_path(&paren.elem),
        Type::Group(group) => service_path(&group.elem),
        _ => None,
    }
}

/// 属性值表达式的类型路径
///
/// `Marker` 与 `Cached { .. }` 取自身路径；`Cached::new(..)` 去掉函数名。
pub fn attribute_path(expr: &Expr) -> Option<Path> {
    match expr {
        Expr::Path(path) => Some(path.path.clone()),
        Expr::Struct(object) => Some(object.path.clone()),
        Expr::Call(call) => match call.func.as_ref() {
            Expr::Path(func) => {
                let mut path = func.path.clone();
                let is_function = path
                    .segments
                    .last()
                    .map_or(false, |segment| {
                        segment.ident.to_string().starts_with(char::is_lowercase)
                    });
                if is_function && path.segments.len() > 1 {
                    path.segments.pop();
                    path.segments.pop_punct();
                }
                Some(path)
            }
            _ => None,
        },
        Expr::Paren(paren) => attribute_path(&paren.expr),
        _ => None,
    }
}
