mod column_consts;
mod decode_expression;
mod decode_field;
mod decode_table;

use column_consts::column_consts;
use decode_expression::decode_expression;
use decode_table::{TableMetadata, decode_table};
use proc_macro::TokenStream;
use quote::quote;
use syn::{Expr, ItemStruct, LitStr, parse_macro_input};

fn quote_option(value: &Option<String>) -> proc_macro2::TokenStream {
    match value {
        None => quote! { None },
        Some(v) => quote! { Some(#v) },
    }
}

#[proc_macro_derive(Entity, attributes(stow))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let table = decode_table(parse_macro_input!(input as ItemStruct));
    let name = &table.item.ident;
    let table_name = quote_option(&table.name);
    let table_primary_key = quote_option(&table.primary_key);
    let fields_declarations = table.fields.iter().map(|f| {
        let field_name = LitStr::new(&f.ident.to_string(), f.ident.span());
        let ty = &f.ty;
        let column = quote_option(&f.column);
        let primary_key = f.primary_key;
        let unique = f.unique;
        let not_null = f.not_null;
        let dedup = f.dedup;
        let order_by = match f.order_by {
            Some(order) => quote! { Some(#order) },
            None => quote! { None },
        };
        quote! {
            ::stow::FieldDeclaration {
                name: #field_name,
                column: #column,
                value: <#ty as ::stow::AsValue>::as_empty_value(),
                primary_key: #primary_key,
                constraints: ::stow::Constraints {
                    unique: #unique,
                    not_null: #not_null,
                },
                dedup: #dedup,
                order_by: #order_by,
            }
        }
    });
    let values = table.fields.iter().map(|f| {
        let ident = &f.ident;
        quote! { ::stow::AsValue::as_value(::std::clone::Clone::clone(&self.#ident)) }
    });
    let assignments = table.fields.iter().enumerate().map(|(i, f)| {
        let ident = &f.ident;
        let ty = &f.ty;
        quote! {
            #i => self.#ident = <#ty as ::stow::AsValue>::try_from_value(value)?,
        }
    });
    let columns = column_consts(&table);
    quote! {
        impl ::stow::Entity for #name {
            fn table() -> ::stow::TableDeclaration {
                ::stow::TableDeclaration {
                    name: #table_name,
                    primary_key: #table_primary_key,
                }
            }

            fn fields() -> &'static [::stow::FieldDeclaration] {
                static RESULT: ::std::sync::LazyLock<Box<[::stow::FieldDeclaration]>> =
                    ::std::sync::LazyLock::new(|| vec![#(#fields_declarations),*].into_boxed_slice());
                &RESULT
            }

            fn values(&self) -> Vec<::stow::Value> {
                vec![#(#values),*]
            }

            fn set_value(&mut self, index: usize, value: ::stow::Value) -> ::stow::Result<()> {
                match index {
                    #(#assignments)*
                    _ => {
                        return Err(::stow::Error::Configuration(format!(
                            "`{}` has no field at index {}",
                            stringify!(#name),
                            index
                        )));
                    }
                }
                Ok(())
            }
        }
        #columns
    }
    .into()
}

/// Builds a `::stow::Expression` out of a Rust expression, to be used as a
/// predicate: `expr!(username == "rick")`, `expr!(User::score >= { min })`.
#[proc_macro]
pub fn expr(input: TokenStream) -> TokenStream {
    let expr = parse_macro_input!(input as Expr);
    decode_expression(&expr).into()
}
