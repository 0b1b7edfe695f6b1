use crate::TableMetadata;
use proc_macro2::TokenStream;
use quote::quote;
use syn::LitStr;

/// One `Column<Entity, FieldType>` associated constant per field, named after
/// the field.
pub(crate) fn column_consts(table: &TableMetadata) -> TokenStream {
    let struct_name = &table.item.ident;
    let columns = table.fields.iter().map(|field| {
        let ident = &field.ident;
        let ty = &field.ty;
        let name = LitStr::new(&ident.to_string(), ident.span());
        quote! {
            #[allow(non_upper_case_globals)]
            pub const #ident: ::stow::Column<#struct_name, #ty> = ::stow::Column::new(#name);
        }
    });
    quote! {
        impl #struct_name {
            #(#columns)*
        }
    }
}
