//! 宏工具函数

use proc_macro2::Span;
use syn::{Attribute, Field, Ident, Result, Type};

/// 字段的注入方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectKind<'a> {
    /// `Arc<T>`：解析必需服务
    Required(&'a Type),
    /// `Option<Arc<T>>`：服务未注册时为 `None`
    Optional(&'a Type),
    /// `Vec<Arc<T>>`：解析服务的所有注册
    All(&'a Type),
    /// 其他类型：使用 `Default`
    Default,
}

/// 按字段类型确定注入方式，`#[inject(default)]` 强制使用 `Default`
pub fn inject_kind(field: &Field) -> Result<InjectKind<'_>> {
    if has_default_marker(&field.attrs)? {
        return Ok(InjectKind::Default);
    }

    let ty = &field.ty;
    if let Some(inner) = wrapped_type(ty, "Arc") {
        return Ok(InjectKind::Required(inner));
    }
    if let Some(inner) = wrapped_type(ty, "Option").and_then(|inner| wrapped_type(inner, "Arc")) {
        return Ok(InjectKind::Optional(inner));
    }
    if let Some(inner) = wrapped_type(ty, "Vec").and_then(|inner| wrapped_type(inner, "Arc")) {
        return Ok(InjectKind::All(inner));
    }
    Ok(InjectKind::Default)
}

fn has_default_marker(attributes: &[Attribute]) -> Result<bool> {
    let mut marked = false;
    for attribute in attributes.iter().filter(|a| a.path().is_ident("inject")) {
        attribute.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                marked = true;
                Ok(())
            } else {
                Err(meta.error("不支持的 inject 参数，可用参数: default"))
            }
        })?;
    }
    Ok(marked)
}

/// 若类型为 `Wrapper<T>`，返回 `T`
pub fn wrapped_type<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) if args.args.len() == 1 => {
            match args.args.first() {
                Some(syn::GenericArgument::Type(inner)) => Some(inner),
                _ => None,
            }
        }
        _ => None,
    }
}

/// 生成登记函数名
pub fn registration_fn_name(ident: &Ident) -> Ident {
    Ident::new(
        &format!("__register_type_{}", to_snake_case(&ident.to_string())),
        Span::call_site(),
    )
}

/// 转换为 snake_case
pub fn to_snake_case(name: &str) -> String {
    let mut result = String::new();
    for (index, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if index > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn field(field: Field) -> Field {
        field
    }

    #[test]
    fn test_inject_kinds() {
        let required = field(parse_quote!(clock: Arc<dyn Clock>));
        assert!(matches!(inject_kind(&required).unwrap(), InjectKind::Required(_)));

        let optional = field(parse_quote!(cache: Option<std::sync::Arc<dyn Cache>>));
        assert!(matches!(inject_kind(&optional).unwrap(), InjectKind::Optional(_)));

        let all = field(parse_quote!(sinks: Vec<Arc<dyn Sink>>));
        assert!(matches!(inject_kind(&all).unwrap(), InjectKind::All(_)));

        let plain = field(parse_quote!(retries: u32));
        assert_eq!(inject_kind(&plain).unwrap(), InjectKind::Default);

        let plain_option = field(parse_quote!(label: Option<String>));
        assert_eq!(inject_kind(&plain_option).unwrap(), InjectKind::Default);
    }

    #[test]
    fn test_default_marker() {
        let marked = field(parse_quote!(#[inject(default)] clock: Arc<Clock>));
        assert_eq!(inject_kind(&marked).unwrap(), InjectKind::Default);

        let invalid = field(parse_quote!(#[inject(lazy)] clock: Arc<Clock>));
        assert!(inject_kind(&invalid).is_err());
    }

    #[test]
    fn test_registration_fn_name() {
        let ident = Ident::new("SmtpMailer", Span::call_site());
        assert_eq!(registration_fn_name(&ident).to_string(), "__register_type_smtp_mailer");
        assert_eq!(to_snake_case("Clock"), "clock");
    }
}
