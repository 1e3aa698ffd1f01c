extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Expr, Fields, ItemStruct, Lit, Meta};

/// Implements `CookieName` for a struct: `#[cookie(name = "session")]`
#[proc_macro_attribute]
pub fn cookie(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);

    let parsed_attr = parse_macro_input!(attr as Meta);

    if !parsed_attr.path().is_ident("name") {
        return syn::Error::new_spanned(
            parsed_attr.path(),
            "Expected `name` parameter: #[cookie(name = \"...\")]",
        )
        .into_compile_error()
        .into();
    }

    let cookie_name = match &parsed_attr {
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(expr) => match &expr.lit {
                Lit::Str(lit_str) => lit_str.value(),
                _ => String::new(),
            },
            _ => String::new(),
        },
        _ => String::new(),
    };

    if cookie_name.is_empty() {
        return syn::Error::new_spanned(
            &parsed_attr,
            "The cookie name must be a non-empty string literal",
        )
        .into_compile_error()
        .into();
    }

    if cookie_name
        .chars()
        .any(|c| c.is_control() || c.is_whitespace() || c == '=' || c == ';')
    {
        return syn::Error::new_spanned(
            &parsed_attr,
            "The cookie name cannot contain `=`, `;`, whitespace or control characters",
        )
        .into_compile_error()
        .into();
    }

    let cookie_struct = &input.ident;

    let expanded = quote! {
        #input

        impl CookieName for #cookie_struct {
            const COOKIE_NAME: &'static str = #cookie_name;
        }
    };

    expanded.into()
}

/// Implements `actix_web::FromRequest` for a struct whose fields are all
/// `isocookie::cookies::Cookie<T>`, building each one from the request's `Storage`.
#[proc_macro_derive(FromRequest)]
pub fn from_request(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return syn::Error::new_spanned(&input.ident, "FromRequest can only be derived for structs")
                .into_compile_error()
                .into();
        }
    };

    let construct = match fields {
        Fields::Named(named) => {
            let names = named.named.iter().map(|field| &field.ident);
            quote! { Self { #( #names: ::isocookie::cookies::Cookie::new(&storage), )* } }
        }
        Fields::Unnamed(unnamed) => {
            let cookies = unnamed
                .unnamed
                .iter()
                .map(|_| quote! { ::isocookie::cookies::Cookie::new(&storage) });
            quote! { Self( #( #cookies, )* ) }
        }
        Fields::Unit => quote! { Self },
    };

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::actix_web::FromRequest for #name #ty_generics #where_clause {
            type Error = ::actix_web::Error;
            type Future = ::std::future::Ready<::std::result::Result<Self, Self::Error>>;

            fn from_request(req: &::actix_web::HttpRequest, _payload: &mut ::actix_web::dev::Payload) -> Self::Future {
                use ::actix_web::HttpMessage;

                let storage = match req.extensions().get::<::isocookie::Storage>() {
                    Some(storage) => storage.clone(),
                    None => {
                        return ::std::future::ready(::std::result::Result::Err(
                            ::actix_web::error::ErrorInternalServerError(
                                "Cookie storage is missing, is CookieMiddleware registered?",
                            ),
                        ));
                    }
                };

                ::std::future::ready(::std::result::Result::Ok(#construct))
            }
        }
    };

    expanded.into()
}
