use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{Ident, LitStr, Result};

use proc_macro_crate::{crate_name, FoundCrate};

/// Maximum number of segments in a path.
const MAX_SEGMENTS: usize = 16;

/// Size of the packed data region in bytes.
const DATA_LEN: usize = 16;

/// Input: a single string literal, e.g. `"1.2.300"`.
struct PathInput {
    lit: LitStr,
}

impl Parse for PathInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let lit: LitStr = input.parse()?;
        // Allow a trailing comma
        if input.peek(syn::Token![,]) {
            input.parse::<syn::Token![,]>()?;
        }
        Ok(Self { lit })
    }
}

// =============================================================================
// Validation (runs at macro expansion time)
// =============================================================================

/// Validate path text with the runtime construction rules.
///
/// Mirrors `ITree::parse`: trims, checks the segment count, then splits on
/// `.` and checks segment range and the packed byte budget in one pass.
fn validate(text: &str) -> std::result::Result<Vec<u16>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("itree path cannot be empty".into());
    }
    if text.split('.').count() > MAX_SEGMENTS {
        return Err(format!("itree must have at most {} segments", MAX_SEGMENTS));
    }

    let mut segments = Vec::new();
    let mut bytes = 0;
    for (position, part) in text.split('.').enumerate() {
        if part.is_empty() {
            return Err(format!("empty segment at position {}", position));
        }
        let value: i64 = part
            .parse()
            .map_err(|_| format!("segment '{}' is not a valid integer", part))?;
        let value = match u16::try_from(value) {
            Ok(v) if v != 0 => v,
            _ => return Err(format!("segment '{}' must be in range 1..65535", part)),
        };
        bytes += if value > 0xFF { 2 } else { 1 };
        if bytes > DATA_LEN {
            return Err(format!(
                "segment at position {} exceeds the {}-byte budget",
                position, DATA_LEN
            ));
        }
        segments.push(value);
    }
    Ok(segments)
}

// =============================================================================
// Crate path resolution
// =============================================================================

fn itree_crate_path() -> TokenStream2 {
    match crate_name("itree") {
        Ok(FoundCrate::Itself) => {
            quote!(::itree)
        }
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Err(_) => quote!(::itree),
    }
}

// =============================================================================
// Code generation
// =============================================================================

fn expand(input: PathInput, itree_crate: &TokenStream2) -> TokenStream2 {
    let segments = match validate(&input.lit.value()) {
        Ok(segments) => segments,
        Err(msg) => {
            return syn::Error::new(input.lit.span(), format!("invalid itree literal: {}", msg))
                .to_compile_error();
        }
    };

    quote! {
        {
            const PATH: #itree_crate::ITree = #itree_crate::ITree::__from_validated(&[#(#segments),*]);
            PATH
        }
    }
}

/// Build an `ITree` from a path literal checked at compile time.
///
/// The literal follows the same rules as `ITree::parse`; an invalid literal
/// is a compile error pointing at the string. The result is a constant, so
/// the macro works in `const` and `static` items too.
///
/// ```ignore
/// use itree::{itree, ITree};
///
/// const ROOT: ITree = itree!("1.2");
/// let team = itree!("1.2.300");
/// assert!(team.is_descendant_of(&ROOT));
///
/// // itree!("1..2");   // error: invalid itree literal: empty segment at position 1
/// ```
#[proc_macro]
pub fn itree(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as PathInput);
    let itree_crate = itree_crate_path();
    expand(input, &itree_crate).into()
}
