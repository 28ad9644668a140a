use crate::controller::{middleware_vec, parse_middleware};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, Attribute, Expr, FnArg, ImplItem,
    ImplItemFn, ItemImpl, LitStr, Token,
};

/// Verb tags and the `HttpMethod` variant each one maps to
const METHODS: &[(&str, &str)] = &[
    ("GET", "Get"),
    ("POST", "Post"),
    ("HEAD", "Head"),
    ("OPTIONS", "Options"),
    ("PUT", "Put"),
    ("PATCH", "Patch"),
    ("DELITE", "Delite"),
    ("DEL", "Del"),
    ("ALL", "All"),
    ("RESOURCES", "Resources"),
];

struct RouteArgs {
    path: String,
    method: syn::Ident,
    middleware: Vec<Expr>,
}

impl Parse for RouteArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut path = None;
        let mut method = None;
        let mut middleware = Vec::new();

        while !input.is_empty() {
            if input.peek(LitStr) {
                let lit: LitStr = input.parse()?;
                path = Some(lit.value());
            } else {
                let name: syn::Ident = input.parse()?;
                if input.peek(Token![=]) {
                    input.parse::<Token![=]>()?;
                    if name == "path" {
                        let lit: LitStr = input.parse()?;
                        path = Some(lit.value());
                    } else if name == "method" {
                        method = Some(variant_for(&input.parse()?)?);
                    } else if name == "middleware" {
                        middleware = parse_middleware(input)?;
                    } else {
                        return Err(syn::Error::new(
                            name.span(),
                            "expected `path`, `method` or `middleware`",
                        ));
                    }
                } else {
                    method = Some(variant_for(&name)?);
                }
            }
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(RouteArgs {
            path: path.unwrap_or_default(),
            method: method.unwrap_or_else(|| format_ident!("Get")),
            middleware,
        })
    }
}

fn variant_for(tag: &syn::Ident) -> syn::Result<syn::Ident> {
    let upper = tag.to_string().to_uppercase();
    METHODS
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, variant)| syn::Ident::new(variant, tag.span()))
        .ok_or_else(|| {
            let known: Vec<&str> = METHODS.iter().map(|(name, _)| *name).collect();
            syn::Error::new(
                tag.span(),
                format!("unknown HTTP method `{}`, expected one of {}", tag, known.join(", ")),
            )
        })
}

struct RouteInfo {
    args: RouteArgs,
    fn_name: syn::Ident,
    takes_request: bool,
    is_async: bool,
}

pub fn routes_attribute(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemImpl);
    match generate_routes_impl(input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn generate_routes_impl(mut input: ItemImpl) -> syn::Result<TokenStream2> {
    let mut routes: Vec<RouteInfo> = Vec::new();

    for item in input.items.iter_mut() {
        if let ImplItem::Fn(method) = item {
            if let Some(args) = take_route_attr(method)? {
                routes.push(route_info(args, method)?);
            }
        }
    }

    let declarations = routes.iter().map(|route| {
        let path = &route.args.path;
        let method = &route.args.method;
        let middleware = middleware_vec(&route.args.middleware);
        let handler = route.fn_name.to_string();
        quote! {
            registry.declare_route::<Self>(
                #path,
                ::route_mapping::HttpMethod::#method,
                #middleware,
                #handler,
            );
        }
    });

    let dispatch_arms = routes.iter().map(|route| {
        let fn_name = &route.fn_name;
        let handler = fn_name.to_string();
        let call = if route.takes_request {
            quote! { self.#fn_name(__request) }
        } else {
            quote! { self.#fn_name() }
        };
        let call = if route.is_async {
            quote! { #call.await }
        } else {
            call
        };
        quote! {
            #handler => ::std::boxed::Box::pin(async move {
                let __response = #call;
                ::std::result::Result::Ok(
                    ::route_mapping::axum::response::IntoResponse::into_response(__response),
                )
            }) as ::route_mapping::middleware::HandlerFuture,
        }
    });

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #input

        impl #impl_generics ::route_mapping::RouteHandlers for #self_ty #where_clause {
            fn declare_routes(registry: &mut ::route_mapping::RouteRegistry) {
                #(#declarations)*
            }

            fn invoke(
                self,
                handler: &str,
                __request: ::route_mapping::axum::http::Request<::route_mapping::axum::body::Body>,
            ) -> ::route_mapping::middleware::HandlerFuture {
                match handler {
                    #(#dispatch_arms)*
                    _ => ::route_mapping::controller::unknown_handler::<Self>(handler),
                }
            }
        }
    })
}

/// Removes the `#[route(...)]` attribute from `method` and parses it
fn take_route_attr(method: &mut ImplItemFn) -> syn::Result<Option<RouteArgs>> {
    let Some(index) = method.attrs.iter().position(is_route_attr) else {
        return Ok(None);
    };
    let attr = method.attrs.remove(index);
    if method.attrs.iter().any(is_route_attr) {
        return Err(syn::Error::new_spanned(
            &method.sig.ident,
            "a handler can carry only one #[route] attribute",
        ));
    }
    let args = match &attr.meta {
        syn::Meta::Path(_) => RouteArgs {
            path: String::new(),
            method: format_ident!("Get"),
            middleware: Vec::new(),
        },
        _ => attr.parse_args::<RouteArgs>()?,
    };
    Ok(Some(args))
}

fn route_info(args: RouteArgs, method: &ImplItemFn) -> syn::Result<RouteInfo> {
    let sig = &method.sig;
    match sig.inputs.first() {
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() => {}
        _ => {
            return Err(syn::Error::new_spanned(
                &sig.ident,
                "route handlers must take `&self`",
            ))
        }
    }
    let typed = sig
        .inputs
        .iter()
        .filter(|arg| matches!(arg, FnArg::Typed(_)))
        .count();
    if typed > 1 {
        return Err(syn::Error::new_spanned(
            &sig.inputs,
            "route handlers take at most one argument, the request",
        ));
    }
    Ok(RouteInfo {
        args,
        fn_name: sig.ident.clone(),
        takes_request: typed == 1,
        is_async: sig.asyncness.is_some(),
    })
}

fn is_route_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("route")
}
