//! 注册代码生成
//!
//! 生成的函数只使用 `di_abstractions` 与 `di_scanning` 的公开接口，
//! 通过 `include!` 引入目标 crate。

use crate::plan::{ReplaceBehaviorSpec, StrategySpec};
use crate::selection::{Registration, RegistrationKind};
use component_syntax::lifetime_tokens;
use proc_macro2::TokenStream;
use quote::quote;
use syn::Type;

/// 生成文件头
pub const HEADER: &str = "// 由 di-codegen 生成，请勿手动修改。\n";

/// 生成的函数名
pub const FUNCTION_NAME: &str = "register_services";

/// 生成 `register_services` 函数源码
pub fn emit(registrations: &[Registration]) -> syn::Result<String> {
    let mut source = String::from(HEADER);
    source.push('\n');
    source.push_str("#[allow(unused_variables)]\n");
    source.push_str(&format!(
        "pub fn {FUNCTION_NAME}(services: &mut ::di_abstractions::ServiceCollection) -> \
         ::std::result::Result<(), ::di_abstractions::RegistrationError> {{\n"
    ));
    for registration in registrations {
        let statement = emit_registration(registration)?;
        source.push_str("    ");
        source.push_str(&statement.to_string());
        source.push('\n');
    }
    source.push_str("    ::std::result::Result::Ok(())\n}\n");
    Ok(source)
}

/// 生成一条注册语句
pub fn emit_registration(registration: &Registration) -> syn::Result<TokenStream> {
    let implementation: Type = syn::parse_str(&registration.implementation.to_code())?;
    let service: Type = syn::parse_str(&registration.service.to_code())?;
    let lifetime = lifetime_tokens(registration.lifetime);
    let strategy = strategy_tokens(registration.strategy);

    let descriptor = match registration.kind {
        RegistrationKind::Direct if registration.service == registration.implementation => quote! {
            ::di_abstractions::ServiceDescriptor::of_type::<#implementation>(#lifetime)
        },
        RegistrationKind::Direct => quote! {
            ::di_abstractions::ServiceDescriptor::implementation::<#service, #implementation>(
                #lifetime,
                |instance: ::std::sync::Arc<#implementation>| -> ::std::sync::Arc<#service> { instance },
            )
        },
        RegistrationKind::Forwarded => quote! {
            ::di_abstractions::ServiceDescriptor::factory::<#service, _>(
                #lifetime,
                |provider: &dyn ::di_abstractions::ServiceProvider|
                    -> ::di_abstractions::ResolveResult<::std::sync::Arc<#service>> {
                    let instance = ::di_abstractions::ServiceProviderExt::get::<#implementation>(provider)?;
                    ::std::result::Result::Ok(instance as ::std::sync::Arc<#service>)
                },
            )
        },
    };

    Ok(quote! {
        ::di_scanning::RegistrationStrategy::apply(&#strategy, services, #descriptor)?;
    })
}

fn strategy_tokens(strategy: StrategySpec) -> TokenStream {
    match strategy {
        StrategySpec::Append => quote! { ::di_scanning::Append },
        StrategySpec::Skip => quote! { ::di_scanning::Skip },
        StrategySpec::Throw => quote! { ::di_scanning::Throw },
        StrategySpec::Replace { behavior } => {
            let behavior = match behavior {
                ReplaceBehaviorSpec::ServiceType => quote! { ServiceType },
                ReplaceBehaviorSpec::ImplementationType => quote! { ImplementationType },
                ReplaceBehaviorSpec::All => quote! { All },
            };
            quote! {
                ::di_scanning::Replace::new(::di_scanning::ReplacementBehavior::#behavior)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeRef;
    use di_common::Lifetime;

    fn type_ref(path: &str, object: bool) -> TypeRef {
        TypeRef {
            path: format!("demo::{path}"),
            code_path: format!("crate::{path}"),
            arguments: Vec::new(),
            object,
        }
    }

    fn registration(service: TypeRef, kind: RegistrationKind) -> Registration {
        Registration {
            implementation: type_ref("infra::SystemClock", false),
            service,
            lifetime: Lifetime::Singleton,
            kind,
            strategy: StrategySpec::Append,
        }
    }

    #[test]
    fn test_emit_self_registration() {
        let statement = emit_registration(&registration(
            type_ref("infra::SystemClock", false),
            RegistrationKind::Direct,
        ))
        .unwrap()
        .to_string();
        assert!(statement.contains("of_type :: < crate :: infra :: SystemClock >"));
        assert!(statement.contains("Lifetime :: Singleton"));
        assert!(statement.contains(":: di_scanning :: Append"));
    }

    #[test]
    fn test_emit_service_registrations() {
        let direct = emit_registration(&registration(type_ref("Clock", true), RegistrationKind::Direct))
            .unwrap()
            .to_string();
        assert!(direct.contains("implementation :: < dyn crate :: Clock , crate :: infra :: SystemClock >"));

        let forwarded =
            emit_registration(&registration(type_ref("Clock", true), RegistrationKind::Forwarded))
                .unwrap()
                .to_string();
        assert!(forwarded.contains("factory :: < dyn crate :: Clock , _ >"));
        assert!(forwarded.contains("get :: < crate :: infra :: SystemClock >"));
    }

    #[test]
    fn test_emit_function() {
        let mut replace = registration(type_ref("Clock", true), RegistrationKind::Direct);
        replace.strategy = StrategySpec::Replace {
            behavior: ReplaceBehaviorSpec::All,
        };
        let source = emit(&[replace]).unwrap();

        assert!(source.starts_with(HEADER));
        assert!(source.contains("pub fn register_services"));
        assert!(source.contains("ReplacementBehavior :: All"));
        assert!(syn::parse_file(&source).is_ok());
    }

    #[test]
    fn test_emit_empty_function() {
        let source = emit(&[]).unwrap();
        assert!(syn::parse_file(&source).is_ok());
    }
}
