use crate::decode_field::{FieldMetadata, decode_field};
use quote::ToTokens;
use syn::{ItemStruct, LitStr, parse::ParseBuffer};

pub(crate) struct TableMetadata {
    pub(crate) item: ItemStruct,
    pub(crate) name: Option<String>,
    pub(crate) primary_key: Option<String>,
    pub(crate) fields: Vec<FieldMetadata>,
}

pub fn decode_table(item: ItemStruct) -> TableMetadata {
    let fields = item.fields.iter().filter_map(decode_field).collect();
    let mut name = None;
    let mut primary_key = None;
    for attr in &item.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("stow") {
            let Ok(list) = meta.require_list() else {
                panic!("Error while parsing `stow`, use it like: `#[stow(attribute = value, ..)]`",);
            };
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("table") {
                    let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!(
                            "Error while parsing `table`, use it like: `#[stow(table = \"my_table\")]`"
                        );
                    };
                    name = Some(value.value());
                } else if arg.path.is_ident("primary_key") {
                    let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!(
                            "Error while parsing `primary_key`, use it like: `#[stow(primary_key = \"my_table_id\")]`"
                        );
                    };
                    primary_key = Some(value.value());
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
    TableMetadata {
        item,
        name,
        primary_key,
        fields,
    }
}
