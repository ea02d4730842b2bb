use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, FnArg, GenericArgument, ItemFn, LitStr, PatType, PathArguments, Type,
};

#[derive(Clone, Copy, PartialEq)]
enum ArgKind {
    Required,
    Optional,
    Rest,
}

fn inner_is_f64(args: &PathArguments) -> bool {
    if let PathArguments::AngleBracketed(generic) = args {
        if let Some(GenericArgument::Type(Type::Path(inner))) = generic.args.first() {
            return inner.path.is_ident("f64");
        }
    }
    false
}

fn classify(ty: &Type) -> Option<ArgKind> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    match segment.ident.to_string().as_str() {
        "f64" => Some(ArgKind::Required),
        "Option" if inner_is_f64(&segment.arguments) => Some(ArgKind::Optional),
        "Vec" if inner_is_f64(&segment.arguments) => Some(ArgKind::Rest),
        _ => None,
    }
}

fn expected_msg(min: usize, max: Option<usize>) -> String {
    match max {
        Some(max) if max == min => format!("expected {} argument(s)", min),
        Some(max) => format!("expected {} to {} arguments", min, max),
        None => format!("expected at least {} argument(s)", min),
    }
}

/// Turns a typed built-in (`f64`, trailing `Option<f64>`, or a final `Vec<f64>`
/// rest parameter) into a `fn(&[f64]) -> Result<f64, FormulaError>` with
/// argument-count checking, plus a `<NAME>_ARITY` constant.
///
/// The formula name defaults to the upper-cased Rust name and can be given
/// explicitly: `#[formula_fn("IF")]`.
#[proc_macro_attribute]
pub fn formula_fn(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    let fn_name = &input.sig.ident;
    let fn_attrs = &input.attrs;
    let fn_vis = &input.vis;
    let fn_body = &input.block;
    let fn_output = &input.sig.output;

    let formula_name = if attr.is_empty() {
        fn_name.to_string().to_uppercase()
    } else {
        parse_macro_input!(attr as LitStr).value()
    };

    let mut arg_extractions = Vec::new();
    let mut min = 0usize;
    let mut max = Some(0usize);
    let mut previous = ArgKind::Required;

    for (i, arg) in input.sig.inputs.iter().enumerate() {
        let FnArg::Typed(PatType { pat, ty, .. }) = arg else {
            return syn::Error::new_spanned(arg, "formula functions cannot take self")
                .to_compile_error()
                .into();
        };
        let arg_name = match **pat {
            syn::Pat::Ident(ref ident) => &ident.ident,
            _ => {
                return syn::Error::new_spanned(pat, "unsupported argument pattern")
                    .to_compile_error()
                    .into()
            }
        };
        let Some(kind) = classify(ty) else {
            return syn::Error::new_spanned(ty, "expected f64, Option<f64> or Vec<f64>")
                .to_compile_error()
                .into();
        };
        if previous == ArgKind::Rest
            || (previous == ArgKind::Optional && kind != ArgKind::Optional)
        {
            return syn::Error::new_spanned(
                arg,
                "optional arguments must trail and a Vec<f64> rest argument must be last",
            )
            .to_compile_error()
            .into();
        }

        let extract_code = match kind {
            ArgKind::Required => {
                min += 1;
                max = max.map(|m| m + 1);
                quote! { let #arg_name: f64 = args[#i]; }
            }
            ArgKind::Optional => {
                max = max.map(|m| m + 1);
                quote! { let #arg_name: Option<f64> = args.get(#i).copied(); }
            }
            ArgKind::Rest => {
                max = None;
                quote! { let #arg_name: Vec<f64> = args[#i..].to_vec(); }
            }
        };
        arg_extractions.push(extract_code);
        previous = kind;
    }

    // A rest parameter always needs at least one value.
    if max.is_none() && min == 0 {
        min = 1;
    }

    let arity_const = format_ident!("{}_ARITY", formula_name);
    let expected = expected_msg(min, max);
    let max_tokens = match max {
        Some(max) => quote! { Some(#max) },
        None => quote! { None },
    };
    let upper_check = match max {
        Some(max) => quote! { || args.len() > #max },
        None => quote! {},
    };

    let expanded = quote! {
        pub const #arity_const: Arity = Arity { min: #min, max: #max_tokens };

        #(#fn_attrs)*
        #fn_vis fn #fn_name(args: &[f64]) #fn_output {
            if args.len() < #min #upper_check {
                return Err(FormulaError::FunctionArgument {
                    function: #formula_name.to_string(),
                    detail: format!("{}, got {}", #expected, args.len()),
                });
            }

            #(#arg_extractions)*

            #fn_body
        }
    };

    TokenStream::from(expanded)
}
