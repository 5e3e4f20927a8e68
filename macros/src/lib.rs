use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Ident, ItemFn, LitStr};

const USAGE: &str = "rxsubject_macro::test only accepts: #[rxsubject_macro::test], \
                     #[rxsubject_macro::test(local)], #[rxsubject_macro::test(shared)], or \
                     string equivalents";

/// Test attribute for subject tests.
///
/// - sync fn: `#[test]` natively, `wasm_bindgen_test` on wasm32.
/// - async fn: `#[tokio::test]`; `local` picks the current-thread runtime and
///   `shared` the multi-thread runtime, so `Shared*` subjects can be driven
///   from spawned tasks.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);
  let is_async = input.sig.asyncness.is_some();
  let raw_args = proc_macro2::TokenStream::from(attr);

  let tokio_args = if raw_args.is_empty() {
    proc_macro2::TokenStream::new()
  } else if !is_async {
    return error(
      raw_args.span(),
      "rxsubject_macro::test flavor args are only supported for async tests",
    );
  } else {
    let flavor = if let Ok(ident) = syn::parse2::<Ident>(raw_args.clone()) {
      ident.to_string()
    } else if let Ok(lit) = syn::parse2::<LitStr>(raw_args.clone()) {
      lit.value()
    } else {
      return error(raw_args.span(), USAGE);
    };
    match flavor.as_str() {
      "local" => quote!(flavor = "current_thread"),
      "shared" => quote!(flavor = "multi_thread", worker_threads = 4),
      _ => return error(raw_args.span(), USAGE),
    }
  };

  let wasm_attr = if is_async {
    quote!(wasm_bindgen_test::wasm_bindgen_test(async))
  } else {
    quote!(wasm_bindgen_test::wasm_bindgen_test)
  };
  let native_attr = if is_async { quote!(tokio::test(#tokio_args)) } else { quote!(test) };

  TokenStream::from(quote! {
      #[cfg_attr(target_arch = "wasm32", #wasm_attr)]
      #[cfg_attr(not(target_arch = "wasm32"), #native_attr)]
      #input
  })
}

fn error(span: proc_macro2::Span, msg: &str) -> TokenStream {
  TokenStream::from(syn::Error::new(span, msg).to_compile_error())
}
