use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input};

/// Derives the `ParamKeyword` trait for enums.
///
/// Each variant carries one or more `#[keyword("...")]` attributes naming the
/// textual keyword(s) that map to it on the wire. The first keyword is the
/// canonical one returned by `keyword()`; any further keywords are intentional
/// aliases that resolve to the same variant (the classic "two mnemonics, one
/// parameter slot" pattern of AT-style command sets).
///
/// # Example
///
/// ```ignore
/// use cfg_shell_macros::ParamKeyword;
///
/// #[derive(Copy, Clone, PartialEq, Eq, ParamKeyword)]
/// pub enum ParamKey {
///     #[keyword("CH")]
///     #[keyword("CMODE")]   // alias: command mode shares the channel slot
///     Channel,
///     #[keyword("PERIOD")]
///     Period,
/// }
/// ```
///
/// This generates:
///
/// ```ignore
/// impl ParamKeyword for ParamKey {
///     fn from_keyword(token: &[u8]) -> Option<Self> {
///         if token.eq_ignore_ascii_case(b"CH") { return Some(Self::Channel); }
///         if token.eq_ignore_ascii_case(b"CMODE") { return Some(Self::Channel); }
///         if token.eq_ignore_ascii_case(b"PERIOD") { return Some(Self::Period); }
///         None
///     }
///
///     fn keyword(&self) -> &'static str {
///         match self {
///             Self::Channel => "CH",
///             Self::Period => "PERIOD",
///         }
///     }
/// }
/// ```
///
/// Matching is ASCII case-insensitive because keywords can appear inside value
/// payloads (after `=`), where the input normalizer no longer upper-cases.
///
/// # Requirements
///
/// - The type must be an enum
/// - All variants must be unit variants (no fields)
/// - Every variant must carry at least one `#[keyword("...")]` attribute
#[proc_macro_derive(ParamKeyword, attributes(keyword))]
pub fn derive_param_keyword(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    // Extract enum variants
    let variants = match &input.data {
        Data::Enum(data_enum) => &data_enum.variants,
        _ => {
            return syn::Error::new_spanned(&input.ident, "ParamKeyword can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    let mut match_arms = Vec::new();
    let mut keyword_arms = Vec::new();

    for variant in variants {
        let variant_name = &variant.ident;

        // Only unit variants are supported
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new_spanned(
                variant,
                "ParamKeyword only supports unit variants (no fields)",
            )
            .to_compile_error()
            .into();
        }

        let mut keywords: Vec<LitStr> = Vec::new();
        for attr in &variant.attrs {
            if attr.path().is_ident("keyword") {
                match attr.parse_args::<LitStr>() {
                    Ok(lit) => keywords.push(lit),
                    Err(e) => return e.to_compile_error().into(),
                }
            }
        }

        if keywords.is_empty() {
            return syn::Error::new_spanned(
                variant,
                "every variant needs at least one #[keyword(\"...\")] attribute",
            )
            .to_compile_error()
            .into();
        }

        // Canonical keyword is the first one listed
        let canonical = &keywords[0];
        keyword_arms.push(quote! {
            Self::#variant_name => #canonical,
        });

        for kw in &keywords {
            let bytes = syn::LitByteStr::new(kw.value().as_bytes(), kw.span());
            match_arms.push(quote! {
                if token.eq_ignore_ascii_case(#bytes) {
                    return Some(Self::#variant_name);
                }
            });
        }
    }

    let expanded = quote! {
        impl ParamKeyword for #name {
            fn from_keyword(token: &[u8]) -> Option<Self> {
                #(#match_arms)*
                None
            }

            fn keyword(&self) -> &'static str {
                match self {
                    #(#keyword_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}
