//! 可扫描类型宏实现

use crate::utils::{inject_kind, registration_fn_name, InjectKind};
use component_syntax::{lifetime_tokens, InjectableArgs};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, ItemStruct, Result, Visibility};

/// 实现 `#[injectable]` 宏
pub fn injectable_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let item = match syn::parse::<ItemStruct>(input) {
        Ok(item) => item,
        Err(e) => return e.to_compile_error().into(),
    };
    match expand_injectable(args.into(), &item) {
        Ok(expanded) => expanded.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand_injectable(args: TokenStream2, item: &ItemStruct) -> Result<TokenStream2> {
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new(
            item.generics.span(),
            "#[injectable] 不支持泛型类型，请为每个封闭类型手动实现 Reflect",
        ));
    }

    let args = InjectableArgs::from_tokens(args)?;
    let struct_name = &item.ident;
    let is_public = matches!(item.vis, Visibility::Public(_)) && !args.private;

    let implements = args.implements.iter().map(|service| {
        quote! {
            .implements::<#service>(|instance: ::std::sync::Arc<Self>| -> ::std::sync::Arc<#service> { instance })
        }
    });
    let attributes = args.attributes.iter().map(|value| quote! { .attribute(#value) });
    let descriptors = args.descriptors.iter().map(|descriptor| {
        let lifetime = lifetime_tokens(descriptor.lifetime);
        let service = match &descriptor.service {
            Some(service) => quote! { ::std::option::Option::Some(::di_abstractions::TypeInfo::of::<#service>()) },
            None => quote! { ::std::option::Option::None },
        };
        quote! { .descriptor(#service, #lifetime) }
    });

    let registration_fn = registration_fn_name(struct_name);

    Ok(quote! {
        #item

        impl ::di_abstractions::Reflect for #struct_name {
            fn type_metadata() -> ::di_abstractions::TypeMetadata {
                ::di_abstractions::TypeMetadata::builder::<Self>()
                    .public(#is_public)
                    #(#implements)*
                    #(#attributes)*
                    #(#descriptors)*
                    .build()
            }
        }

        // 程序启动时登记到全局类型目录
        #[ctor::ctor]
        fn #registration_fn() {
            ::di_abstractions::register_type(
                <#struct_name as ::di_abstractions::Reflect>::type_metadata(),
            );
        }
    })
}

/// 实现 `#[derive(Injectable)]` 宏
pub fn derive_injectable_impl(input: DeriveInput) -> TokenStream {
    match expand_derive(&input) {
        Ok(expanded) => expanded.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand_derive(input: &DeriveInput) -> Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new(
            input.ident.span(),
            "Injectable 只能用于结构体",
        ));
    };

    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let body = match &data.fields {
        Fields::Unit => quote! { Self },
        Fields::Named(fields) => {
            let values = fields
                .named
                .iter()
                .map(|field| {
                    let name = &field.ident;
                    let value = field_value(field)?;
                    Ok(quote! { #name: #value })
                })
                .collect::<Result<Vec<_>>>()?;
            quote! { Self { #(#values),* } }
        }
        Fields::Unnamed(fields) => {
            let values = fields
                .unnamed
                .iter()
                .map(field_value)
                .collect::<Result<Vec<_>>>()?;
            quote! { Self(#(#values),*) }
        }
    };

    Ok(quote! {
        impl #impl_generics ::di_abstractions::Injectable for #struct_name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn construct(
                provider: &dyn ::di_abstractions::ServiceProvider,
            ) -> ::di_abstractions::ResolveResult<Self> {
                use ::di_abstractions::ServiceProviderExt as _;
                ::std::result::Result::Ok(#body)
            }
        }
    })
}

fn field_value(field: &syn::Field) -> Result<TokenStream2> {
    let span = field.ty.span();
    Ok(match inject_kind(field)? {
        InjectKind::Required(service) => quote_spanned! {span=> provider.get::<#service>()? },
        InjectKind::Optional(service) => quote_spanned! {span=> provider.try_get::<#service>()? },
        InjectKind::All(service) => quote_spanned! {span=> provider.get_all::<#service>()? },
        InjectKind::Default => quote_spanned! {span=> ::std::default::Default::default() },
    })
}
