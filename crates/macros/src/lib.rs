// Path: crates/macros/src/lib.rs
//! Procedural macros for dwork services.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, FnArg, ImplItem,
    ItemImpl, LitInt, LitStr, Meta, Token,
};

struct ServiceAttributes {
    id: LitStr,
    abi_version: LitInt,
    state_schema: LitStr,
    capabilities: Option<LitStr>,
}

fn lit_str(value: syn::Expr) -> Option<LitStr> {
    match value {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Str(lit),
            ..
        }) => Some(lit),
        _ => None,
    }
}

impl Parse for ServiceAttributes {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut id = None;
        let mut abi_version = None;
        let mut state_schema = None;
        let mut capabilities = None;

        let vars = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;

        for var in vars {
            if let Meta::NameValue(nv) = var {
                if nv.path.is_ident("id") {
                    id = lit_str(nv.value);
                } else if nv.path.is_ident("abi_version") {
                    if let syn::Expr::Lit(expr_lit) = nv.value {
                        if let syn::Lit::Int(lit) = expr_lit.lit {
                            abi_version = Some(lit);
                        }
                    }
                } else if nv.path.is_ident("state_schema") {
                    state_schema = lit_str(nv.value);
                } else if nv.path.is_ident("capabilities") {
                    capabilities = lit_str(nv.value);
                }
            }
        }

        Ok(ServiceAttributes {
            id: id.ok_or_else(|| input.error("Missing `id` attribute"))?,
            abi_version: abi_version
                .ok_or_else(|| input.error("Missing `abi_version` attribute"))?,
            state_schema: state_schema
                .ok_or_else(|| input.error("Missing `state_schema` attribute"))?,
            capabilities,
        })
    }
}

/// Generates the `BlockchainService` implementation for an impl block.
///
/// Every function tagged `#[method]` becomes callable as `"<name>@v1"`. The expected
/// signature is `fn name(&self, state: &mut dyn StateAccess, params: P, ctx: &mut TxContext)`
/// where `P` is SCALE-decodable, or `fn name(&self, state, ctx)` for methods without
/// parameters. The return type must be `Result<(), E>` with `E: Into<TransactionError>`.
///
/// Listing `NATIVE_RECEIVER` in `capabilities` also wires `as_native_receiver`, so the
/// type must implement `NativeReceiver`.
#[proc_macro_attribute]
pub fn service_interface(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as ServiceAttributes);
    let mut item_impl = parse_macro_input!(input as ItemImpl);

    let struct_name = &item_impl.self_ty;
    let service_id = args.id.value();
    let abi_version = args.abi_version;
    let state_schema = args.state_schema;
    let caps_string = args
        .capabilities
        .as_ref()
        .map(|l| l.value())
        .unwrap_or_default();

    let mut cap_flags = quote! { dwork_types::service_configs::Capabilities::empty() };
    for cap in caps_string.split(',') {
        let trimmed = cap.trim();
        if !trimmed.is_empty() {
            let cap_ident = format_ident!("{}", trimmed);
            cap_flags =
                quote! { #cap_flags | dwork_types::service_configs::Capabilities::#cap_ident };
        }
    }

    let as_native_receiver = if caps_string.contains("NATIVE_RECEIVER") {
        quote! {
            fn as_native_receiver(&self) -> Option<&dyn dwork_api::services::NativeReceiver> {
                Some(self)
            }
        }
    } else {
        quote! {}
    };

    let mut match_arms = Vec::new();

    for item in &mut item_impl.items {
        if let ImplItem::Fn(method) = item {
            let mut is_service_method = false;
            method.attrs.retain(|attr| {
                if attr.path().is_ident("method") {
                    is_service_method = true;
                    false
                } else {
                    true
                }
            });

            if !is_service_method {
                continue;
            }

            let method_name = &method.sig.ident;
            let method_str = format!("{}@v1", method_name);

            // (&self, state, params, ctx) carries a parameter struct; (&self, state, ctx) does not.
            let param_type = if method.sig.inputs.len() == 4 {
                method.sig.inputs.iter().nth(2).and_then(|arg| match arg {
                    FnArg::Typed(pat_type) => Some(*pat_type.ty.clone()),
                    FnArg::Receiver(_) => None,
                })
            } else {
                None
            };

            if let Some(p_type) = param_type {
                match_arms.push(quote! {
                    #method_str => {
                        let p: #p_type = dwork_types::codec::from_bytes_canonical(params)?;
                        self.#method_name(state, p, ctx)
                            .map_err(dwork_types::error::TransactionError::from)?;
                        Ok(())
                    }
                });
            } else {
                match_arms.push(quote! {
                    #method_str => {
                        self.#method_name(state, ctx)
                            .map_err(dwork_types::error::TransactionError::from)?;
                        Ok(())
                    }
                });
            }
        }
    }

    let dispatch_impl = quote! {
        #[async_trait::async_trait]
        impl dwork_api::services::BlockchainService for #struct_name {
            fn id(&self) -> &str {
                #service_id
            }

            fn abi_version(&self) -> u32 {
                #abi_version
            }

            fn state_schema(&self) -> &str {
                #state_schema
            }

            fn capabilities(&self) -> dwork_types::service_configs::Capabilities {
                #cap_flags
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            #as_native_receiver

            async fn handle_service_call(
                &self,
                state: &mut dyn dwork_api::state::StateAccess,
                method: &str,
                params: &[u8],
                ctx: &mut dwork_api::transaction::context::TxContext<'_>,
            ) -> Result<(), dwork_types::error::TransactionError> {
                match method {
                    #(#match_arms)*
                    _ => Err(dwork_types::error::TransactionError::Unsupported(format!(
                        "Service '{}' does not support method '{}'",
                        self.id(),
                        method
                    ))),
                }
            }
        }
    };

    let output = quote! {
        #item_impl
        #dispatch_impl
    };

    TokenStream::from(output)
}
