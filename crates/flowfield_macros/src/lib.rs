use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, LitInt, Pat, Type};

/// Time a system when the `perf_stats` feature is enabled.
///
/// The function body runs unchanged; a guard logs the elapsed time with
/// `bevy::log::info!` when it exceeds the threshold. Nothing is emitted
/// without `perf_stats`.
///
/// If the function takes `tick: Res<SimTick>`, the timing is also logged
/// every 100 ticks so steady-state cost shows up in the log.
///
/// ```ignore
/// #[profile]      // 1ms threshold
/// #[profile(4)]   // 4ms threshold
/// pub fn process_move_orders(tick: Res<SimTick>, /* ... */) { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn profile(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let threshold_ms: u128 = if attr.is_empty() {
        1
    } else {
        match syn::parse::<LitInt>(attr).and_then(|lit| lit.base10_parse()) {
            Ok(ms) => ms,
            Err(e) => return e.to_compile_error().into(),
        }
    };

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let name = sig.ident.to_string();

    let guard = timing_guard(&name, threshold_ms, has_sim_tick_param(&input));

    quote! {
        #(#attrs)*
        #vis #sig {
            #[cfg(feature = "perf_stats")]
            let _profile_timer = { #guard };

            #block
        }
    }
    .into()
}

/// True for a parameter spelled `tick: Res<SimTick>` (any path prefix).
fn has_sim_tick_param(input: &ItemFn) -> bool {
    input.sig.inputs.iter().any(|arg| {
        let FnArg::Typed(pat_type) = arg else { return false };
        let Pat::Ident(pat_ident) = &*pat_type.pat else { return false };
        if pat_ident.ident != "tick" {
            return false;
        }
        let Type::Path(type_path) = &*pat_type.ty else { return false };
        quote!(#type_path).to_string().contains("SimTick")
    })
}

fn timing_guard(name: &str, threshold_ms: u128, with_tick: bool) -> TokenStream2 {
    let (tick_field, tick_init, tick_check) = if with_tick {
        (
            quote! { tick_value: u64, },
            quote! { tick_value: tick.0, },
            quote! { || self.tick_value % 100 == 0 },
        )
    } else {
        (quote! {}, quote! {}, quote! {})
    };

    quote! {
        struct ProfileGuard {
            name: &'static str,
            start: std::time::Instant,
            #tick_field
        }
        impl Drop for ProfileGuard {
            fn drop(&mut self) {
                let elapsed = self.start.elapsed();
                if elapsed.as_millis() > #threshold_ms #tick_check {
                    bevy::log::info!("[PERF] {}: {:?}", self.name, elapsed);
                }
            }
        }
        ProfileGuard {
            name: #name,
            start: std::time::Instant::now(),
            #tick_init
        }
    }
}
