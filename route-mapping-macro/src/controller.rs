use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse::Parse, parse::ParseStream, parse_macro_input, Expr, ItemStruct, LitStr, Token};

struct ControllerArgs {
    path: String,
    middleware: Vec<Expr>,
}

impl Parse for ControllerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut path = None;
        let mut middleware = Vec::new();
        while !input.is_empty() {
            let name: syn::Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            if name == "path" {
                let lit: LitStr = input.parse()?;
                path = Some(lit.value());
            } else if name == "middleware" {
                middleware = parse_middleware(input)?;
            } else {
                return Err(syn::Error::new(
                    name.span(),
                    "expected `path` or `middleware`",
                ));
            }
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }
        // An empty path is rejected when the class route is declared
        Ok(ControllerArgs {
            path: path.unwrap_or_default(),
            middleware,
        })
    }
}

/// Parses `[expr, expr, ...]`
pub(crate) fn parse_middleware(input: ParseStream) -> syn::Result<Vec<Expr>> {
    let content;
    syn::bracketed!(content in input);
    let items = content.parse_terminated(Expr::parse, Token![,])?;
    Ok(items.into_iter().collect())
}

/// `vec![shared(a), shared(b), ...]`
pub(crate) fn middleware_vec(middleware: &[Expr]) -> TokenStream2 {
    quote! {
        ::std::vec![#(::route_mapping::middleware::shared(#middleware)),*]
    }
}

pub fn controller_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ControllerArgs);
    let input = parse_macro_input!(item as ItemStruct);
    let expanded = generate_class_route(&args, &input);
    TokenStream::from(expanded)
}

fn generate_class_route(args: &ControllerArgs, input: &ItemStruct) -> TokenStream2 {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let path = &args.path;
    let middleware = middleware_vec(&args.middleware);
    quote! {
        #input

        impl #impl_generics ::route_mapping::ClassRoute for #struct_name #ty_generics #where_clause {
            fn declare_class(
                registry: &mut ::route_mapping::RouteRegistry,
            ) -> ::route_mapping::Result<()> {
                registry.declare_class::<Self>(#path, #middleware)
            }
        }
    }
}
