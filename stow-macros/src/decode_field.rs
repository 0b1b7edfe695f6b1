use proc_macro2::TokenStream;
use quote::{ToTokens, TokenStreamExt, quote};
use syn::{Field, Ident, LitStr, Type, parse::ParseBuffer};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dedup {
    #[default]
    None,
    Key,
    Field,
}

impl ToTokens for Dedup {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.append_all(match self {
            Dedup::None => quote!(::stow::DedupRole::None),
            Dedup::Key => quote!(::stow::DedupRole::Key),
            Dedup::Field => quote!(::stow::DedupRole::Field),
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Order {
    Asc,
    Desc,
}

impl ToTokens for Order {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.append_all(match self {
            Order::Asc => quote!(::stow::Order::Asc),
            Order::Desc => quote!(::stow::Order::Desc),
        });
    }
}

pub(crate) struct FieldMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) column: Option<String>,
    pub(crate) primary_key: bool,
    pub(crate) unique: bool,
    pub(crate) not_null: bool,
    pub(crate) dedup: Dedup,
    pub(crate) order_by: Option<Order>,
}

/// Reads the `#[stow(..)]` annotations of a field, `None` for skipped fields.
pub fn decode_field(field: &Field) -> Option<FieldMetadata> {
    let ident = field
        .ident
        .clone()
        .expect("Entity can be derived only on structs with named fields");
    let mut skip = false;
    let mut metadata = FieldMetadata {
        ident,
        ty: field.ty.clone(),
        column: None,
        primary_key: false,
        unique: false,
        not_null: false,
        dedup: Dedup::None,
        order_by: None,
    };
    for attr in &field.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("stow") {
            let Ok(list) = meta.require_list() else {
                panic!("Error while parsing `stow`, use it like: `#[stow(attribute = value, ...)]`",);
            };
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("column") {
                    let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!(
                            "Error while parsing `column`, use it like: `#[stow(column = \"my_column\")]`"
                        );
                    };
                    metadata.column = Some(v.value());
                } else if arg.path.is_ident("primary_key") {
                    let Err(..) = arg.value() else {
                        // value() is Err for Meta::Path
                        panic!(
                            "Error while parsing `primary_key`, use it like: `#[stow(primary_key)]`"
                        );
                    };
                    metadata.primary_key = true;
                } else if arg.path.is_ident("unique") {
                    let Err(..) = arg.value() else {
                        panic!("Error while parsing `unique`, use it like: `#[stow(unique)]`");
                    };
                    metadata.unique = true;
                } else if arg.path.is_ident("not_null") {
                    let Err(..) = arg.value() else {
                        panic!("Error while parsing `not_null`, use it like: `#[stow(not_null)]`");
                    };
                    metadata.not_null = true;
                } else if arg.path.is_ident("skip") {
                    let Err(..) = arg.value() else {
                        panic!("Error while parsing `skip`, use it like: `#[stow(skip)]`");
                    };
                    skip = true;
                } else if arg.path.is_ident("dedup") {
                    let value = arg.value().and_then(ParseBuffer::parse::<LitStr>);
                    metadata.dedup = match value.as_ref().map(LitStr::value).as_deref() {
                        Ok("key") => Dedup::Key,
                        Ok("field") => Dedup::Field,
                        _ => panic!(
                            "Error while parsing `dedup`, use it like: `#[stow(dedup = \"key\")]` or `#[stow(dedup = \"field\")]`"
                        ),
                    };
                } else if arg.path.is_ident("order_by") {
                    let value = arg.value().and_then(ParseBuffer::parse::<LitStr>);
                    metadata.order_by = match value.as_ref().map(LitStr::value).as_deref() {
                        Ok("asc") => Some(Order::Asc),
                        Ok("desc") => Some(Order::Desc),
                        _ => panic!(
                            "Error while parsing `order_by`, use it like: `#[stow(order_by = \"asc\")]` or `#[stow(order_by = \"desc\")]`"
                        ),
                    };
                } else {
                    panic!(
                        "Unknown attribute `{}` inside stow macro",
                        arg.path.to_token_stream()
                    );
                }
                Ok(())
            });
        }
    }
    if skip { None } else { Some(metadata) }
}
