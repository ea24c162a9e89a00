use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{parse_macro_input, FnArg, ItemFn, LitStr, PatType, Type};

fn unsupported_type_error(ty: &Type) -> syn::Error {
    syn::Error::new(
        ty.span(),
        "calc_fn parameters must be `f64`",
    )
}

/// Turns a fixed-arity numeric function into a registry function.
///
/// ```ignore
/// #[calc_fn("power operator")]
/// pub fn pow(base: f64, exponent: f64) -> Result<f64, OperatorError> {
///     Ok(base.powf(exponent))
/// }
/// ```
///
/// expands to `pub fn pow(args: &[f64]) -> Result<f64, OperatorError>`, which fails with
/// `OperatorError::ArgumentCount` unless exactly two arguments are passed. The optional
/// string names the operator in that error and defaults to the function name. Every
/// parameter must be `f64` and receives its argument unchanged, so integer semantics
/// (truncation, range) are left to the body. `OperatorError` must be in scope.
#[proc_macro_attribute]
pub fn calc_fn(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    let fn_name = &input.sig.ident;

    let label = if attr.is_empty() {
        fn_name.to_string()
    } else {
        parse_macro_input!(attr as LitStr).value()
    };

    let mut arg_extractions = Vec::new();

    for (i, arg) in input.sig.inputs.iter().enumerate() {
        let FnArg::Typed(PatType { pat, ty, .. }) = arg else {
            return syn::Error::new(arg.span(), "calc_fn cannot be used on methods")
                .to_compile_error()
                .into();
        };

        let extract_code = match **ty {
            Type::Path(ref type_path) => {
                let Some(segment) = type_path.path.segments.last() else {
                    return unsupported_type_error(ty).to_compile_error().into();
                };
                match segment.ident.to_string().as_str() {
                    "f64" => quote! {
                        let #pat: f64 = args[#i];
                    },
                    _ => return unsupported_type_error(ty).to_compile_error().into(),
                }
            }
            _ => return unsupported_type_error(ty).to_compile_error().into(),
        };

        arg_extractions.push(extract_code);
    }

    let attrs = &input.attrs;
    let vis = &input.vis;
    let fn_output = &input.sig.output;
    let fn_body = &input.block;
    let args_len = arg_extractions.len();

    let expanded = quote! {
        #(#attrs)*
        #vis fn #fn_name(args: &[f64]) #fn_output {
            if args.len() != #args_len {
                return Err(OperatorError::ArgumentCount {
                    operator: #label.to_string(),
                    expected: #args_len,
                    actual: args.len(),
                });
            }

            #(#arg_extractions)*

            #fn_body
        }
    };

    TokenStream::from(expanded)
}
