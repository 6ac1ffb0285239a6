//! Proc macros for the plugin SDK.
//!
//! Provides `#[plugin_tap]` and `#[plugin_tap_result]` attribute macros that
//! generate WASM export wrappers with JSON serialization/deserialization.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{FnArg, ItemFn, PatType, parse_macro_input};

/// Marks a function as a tap implementation.
///
/// Generates a WASM export wrapper that:
/// 1. Reads JSON input from WASM memory (ptr, len)
/// 2. Deserializes to the function's input type (if any)
/// 3. Calls the user's function
/// 4. Serializes the result to JSON
/// 5. Returns ptr<<32|len encoding (negative len = error payload)
///
/// The original body stays callable as `__inner_<name>` for native tests.
///
/// # Example
///
/// ```ignore
/// #[plugin_tap]
/// fn tap_module_settings_form_alter(input: ModuleFormInput) -> SettingsForm {
///     input.form
/// }
/// ```
#[proc_macro_attribute]
pub fn plugin_tap(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input_fn = parse_macro_input!(item as ItemFn);
    expand(&input_fn, Output::Value)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Marks a function as a tap that returns a Result.
///
/// Similar to `#[plugin_tap]` but handles `Result<T, E>` return types,
/// encoding `Err` as `{"error": "<Display of E>"}` with a negative length.
#[proc_macro_attribute]
pub fn plugin_tap_result(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input_fn = parse_macro_input!(item as ItemFn);
    expand(&input_fn, Output::Result)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// How the tap's return value is encoded.
enum Output {
    /// Serialize the value as-is.
    Value,
    /// Serialize `Ok`, report `Err` as an error payload.
    Result,
}

fn expand(input_fn: &ItemFn, output: Output) -> syn::Result<TokenStream2> {
    let fn_name = &input_fn.sig.ident;
    let inner_fn_name = format_ident!("__inner_{}", fn_name);

    let fn_vis = &input_fn.vis;
    let fn_block = &input_fn.block;
    let fn_output = &input_fn.sig.output;

    let mut params = input_fn.sig.inputs.iter();
    let first_param = params.next();
    if let Some(extra) = params.next() {
        return Err(syn::Error::new(
            extra.span(),
            "plugin taps take at most one input parameter",
        ));
    }

    let (inner_fn, call) = match first_param {
        None => {
            let inner = quote! {
                #[inline]
                fn #inner_fn_name() #fn_output #fn_block
            };
            let call = quote! {
                let _ = (ptr, len); // Silence unused warnings
                let result = #inner_fn_name();
            };
            (inner, call)
        }
        Some(FnArg::Receiver(receiver)) => {
            return Err(syn::Error::new(
                receiver.span(),
                "plugin_tap functions cannot have self parameters",
            ));
        }
        Some(FnArg::Typed(PatType {
            pat: param_name,
            ty: param_type,
            ..
        })) => {
            let inner = quote! {
                #[inline]
                fn #inner_fn_name(#param_name: #param_type) #fn_output #fn_block
            };
            let call = quote! {
                // Read input JSON from memory
                let bytes = unsafe {
                    core::slice::from_raw_parts(ptr as *const u8, len as usize)
                };
                let input_json = match core::str::from_utf8(bytes) {
                    Ok(s) => s,
                    Err(e) => return write_output(&error_json("input", &e), true),
                };

                let input: #param_type = match related_items_sdk::serde_json::from_str(input_json) {
                    Ok(v) => v,
                    Err(e) => return write_output(&error_json("deserialize", &e), true),
                };

                let result = #inner_fn_name(input);
            };
            (inner, call)
        }
    };

    let encode = match output {
        Output::Value => quote! {
            match related_items_sdk::serde_json::to_string(&result) {
                Ok(json) => write_output(&json, false),
                Err(e) => write_output(&error_json("serialize", &e), true),
            }
        },
        Output::Result => quote! {
            match result {
                Ok(value) => match related_items_sdk::serde_json::to_string(&value) {
                    Ok(json) => write_output(&json, false),
                    Err(e) => write_output(&error_json("serialize", &e), true),
                },
                Err(e) => write_output(&error_json("", &e), true),
            }
        },
    };

    Ok(quote! {
        #inner_fn

        #[doc(hidden)]
        #[unsafe(no_mangle)]
        #fn_vis extern "C" fn #fn_name(ptr: i32, len: i32) -> i64 {
            use related_items_sdk::abi::{error_json, write_output};

            #call

            #encode
        }
    })
}
