use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr};

pub fn derive_document(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let attrs = match StructAttrs::parse(&input) {
        Ok(attrs) => attrs,
        Err(err) => return err.to_compile_error().into(),
    };

    let collection = attrs
        .collection
        .unwrap_or_else(|| format!("{}s", to_camel_case(&name.to_string())));

    let id_path = match attrs.id_path {
        Some(path) => path,
        None => match extract_id_field(&input) {
            Some(ident) => vec![ident],
            None => {
                return syn::Error::new_spanned(
                    name,
                    "Document derive: no field marked with #[document(id)], no `id = \"...\"` \
                     path and no field named `id`",
                )
                .to_compile_error()
                .into()
            }
        },
    };

    let expanded = quote! {
        impl ::tcg_binder::Document for #name {
            const COLLECTION: &'static str = #collection;

            fn id(&self) -> &str {
                &self.#(#id_path).*
            }
        }
    };

    TokenStream::from(expanded)
}

#[derive(Default)]
struct StructAttrs {
    collection: Option<String>,
    id_path: Option<Vec<Ident>>,
}

impl StructAttrs {
    fn parse(input: &DeriveInput) -> syn::Result<Self> {
        let mut attrs = StructAttrs::default();
        for attr in &input.attrs {
            if !attr.path().is_ident("document") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("collection") {
                    let value: LitStr = meta.value()?.parse()?;
                    attrs.collection = Some(value.value());
                    return Ok(());
                }
                if meta.path.is_ident("id") {
                    // `id = "card.id"` reaches through flattened fields.
                    let value: LitStr = meta.value()?.parse()?;
                    let path = value
                        .value()
                        .split('.')
                        .map(|segment| Ident::new(segment.trim(), Span::call_site()))
                        .collect();
                    attrs.id_path = Some(path);
                    return Ok(());
                }
                Err(meta.error("unsupported document attribute"))
            })?;
        }
        Ok(attrs)
    }
}

fn extract_id_field(input: &DeriveInput) -> Option<Ident> {
    let Data::Struct(data_struct) = &input.data else {
        return None;
    };
    let Fields::Named(fields) = &data_struct.fields else {
        return None;
    };

    for field in &fields.named {
        for attr in &field.attrs {
            if !attr.path().is_ident("document") {
                continue;
            }
            let mut is_id = false;
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    is_id = true;
                }
                Ok(())
            });
            if is_id {
                return field.ident.clone();
            }
        }
    }

    fields
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref())
        .find(|ident| *ident == "id")
        .cloned()
}

fn to_camel_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
