mod document;

use proc_macro::TokenStream;

/// Derive macro for the `Document` trait.
///
/// Generates the collection name and the id accessor used to address the
/// record inside its parent collection.
///
/// # Usage
///
/// ```ignore
/// use serde::{Deserialize, Serialize};
/// use tcg_binder::Document;
///
/// #[derive(Clone, Serialize, Deserialize, Document)]
/// #[document(collection = "decks")]
/// struct Deck {
///     #[document(id)]
///     pub id: String,
///     pub name: String,
/// }
///
/// // Id reached through a flattened field:
/// #[derive(Clone, Serialize, Deserialize, Document)]
/// #[document(collection = "cards", id = "card.id")]
/// struct Entry {
///     #[serde(flatten)]
///     pub card: Card,
/// }
/// ```
///
/// Without `collection`, the lower camel-case struct name plus `s` is used.
/// Without an explicit id, a field named `id` is used.
#[proc_macro_derive(Document, attributes(document))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    document::derive_document(input)
}
