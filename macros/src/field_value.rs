use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Error, Fields};

pub fn proc_macro_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> Result<proc_macro2::TokenStream, Error> {
    let DeriveInput { ident, generics, data, .. } = input;
    let Data::Enum(data) = data else {
        return Err(Error::new(ident.span(), "`FieldValue` can only be derived for enums"));
    };
    if !generics.params.is_empty() {
        return Err(Error::new(generics.span(), "`FieldValue` enums must not be generic"));
    }
    if data.variants.is_empty() {
        return Err(Error::new(ident.span(), "`FieldValue` enums must have at least one variant"));
    }
    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new(variant.span(), "`FieldValue` variants must not carry data"));
        }
        variants.push(&variant.ident);
    }
    Ok(quote! {
        impl<R: ::xmega_core::reg::Bits> ::xmega_core::reg::FieldValue<R> for #ident {
            type Output = ::core::option::Option<Self>;

            #[inline(always)]
            fn into_bits(self) -> R {
                R::from_u32(self as u32)
            }

            #[inline(always)]
            fn from_bits(bits: R) -> Self::Output {
                let bits = R::into_u32(bits);
                #(
                    if bits == Self::#variants as u32 {
                        return ::core::option::Option::Some(Self::#variants);
                    }
                )*
                ::core::option::Option::None
            }
        }
    })
}
