use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, spanned::Spanned, Attribute, Data, DeriveInput, Fields, Ident, Type};

#[proc_macro_derive(ClosureTableModel, attributes(closure_table))]
pub fn derive_closure_table_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match impl_closure_table_model(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}

#[derive(Default)]
struct Options {
    id_field: Option<String>,
    id_type: Option<Type>,
    closure_table: Option<String>,
    primary_key: Option<String>,
    ancestor_column: Option<String>,
    descendant_column: Option<String>,
    depth_column: Option<String>,
    position_column: Option<String>,
    order: Option<String>,
}

fn impl_closure_table_model(input: &DeriveInput) -> syn::Result<TokenStream> {
    let struct_ident = &input.ident;

    let data_struct = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new(
                input.span(),
                "ClosureTableModel can only be derived for structs",
            ))
        }
    };

    let mut options = Options::default();
    let mut table_name: Option<String> = None;

    for attr in &input.attrs {
        if attr.path().is_ident("closure_table") {
            parse_closure_table_attr(attr, &mut options)?;
        }

        if attr.path().is_ident("sea_orm") {
            if let Some(name) = parse_sea_orm_table_name(attr)? {
                table_name = Some(name);
            }
        }
    }

    let id_field_name = options.id_field.unwrap_or_else(|| "id".to_string());
    let id_field_ident = Ident::new(&id_field_name, struct_ident.span());

    let mut id_field_type: Option<Type> = options.id_type.clone();

    if let Fields::Named(ref fields) = data_struct.fields {
        for field in &fields.named {
            if let Some(ident) = &field.ident {
                if ident == &id_field_ident && id_field_type.is_none() {
                    id_field_type = Some(field.ty.clone());
                }
            }
        }
    } else {
        return Err(syn::Error::new(
            data_struct.fields.span(),
            "ClosureTableModel requires named fields",
        ));
    }

    let id_type = id_field_type.ok_or_else(|| {
        syn::Error::new(
            struct_ident.span(),
            "Unable to determine id field type; specify `id_type = ...` in #[closure_table]",
        )
    })?;

    let entity_table = table_name.unwrap_or_else(|| struct_ident.unraw().to_string());
    let closure_table = options
        .closure_table
        .unwrap_or_else(|| format!("{}_closure", entity_table));
    let primary_key = options.primary_key.unwrap_or_else(|| id_field_name.clone());

    let order_strategy = match options.order.as_deref() {
        None | Some("unordered") => quote!(::closure_table::OrderStrategy::Unordered),
        Some("position") => quote!(::closure_table::OrderStrategy::Position),
        Some(other) => {
            return Err(syn::Error::new(
                struct_ident.span(),
                format!("Unsupported closure_table order `{other}`; expected `position` or `unordered`"),
            ))
        }
    };

    let column_overrides = [
        ("ancestor_column", options.ancestor_column),
        ("descendant_column", options.descendant_column),
        ("depth_column", options.depth_column),
        ("position_column", options.position_column),
    ]
    .into_iter()
    .filter_map(|(setter, value)| {
        value.map(|value| {
            let setter = Ident::new(setter, struct_ident.span());
            quote!(.#setter(#value))
        })
    });

    let generated = quote! {
        impl ::closure_table::ClosureTableModel for #struct_ident {
            type Id = #id_type;

            fn closure_table_config() -> &'static ::closure_table::ClosureTableConfig {
                static CONFIG: ::closure_table::__private::once_cell::sync::Lazy<
                    ::closure_table::ClosureTableConfig,
                > = ::closure_table::__private::once_cell::sync::Lazy::new(|| {
                    let base = ::closure_table::ClosureTableConfig::new(
                        #entity_table,
                        #closure_table,
                    );
                    ::closure_table::ClosureTableOptions::default()
                        .primary_key(#primary_key)
                        #(#column_overrides)*
                        .order_strategy(#order_strategy)
                        .apply(base)
                });
                &CONFIG
            }

            fn id(&self) -> Self::Id {
                self.#id_field_ident.clone()
            }

            fn id_to_value(id: &Self::Id) -> ::sea_orm::Value {
                ::sea_orm::Value::from(id.clone())
            }
        }
    };

    Ok(generated.into())
}

fn parse_closure_table_attr(attr: &Attribute, options: &mut Options) -> syn::Result<()> {
    attr.parse_nested_meta(|meta| {
        let ident = meta
            .path
            .get_ident()
            .ok_or_else(|| syn::Error::new(meta.path.span(), "Invalid option key"))?
            .to_string();

        if ident == "id_type" {
            let ty: Type = meta.value()?.parse()?;
            options.id_type = Some(ty);
            return Ok(());
        }

        let slot = match ident.as_str() {
            "id_field" => &mut options.id_field,
            "closure_table" => &mut options.closure_table,
            "primary_key" => &mut options.primary_key,
            "ancestor_column" => &mut options.ancestor_column,
            "descendant_column" => &mut options.descendant_column,
            "depth_column" => &mut options.depth_column,
            "position_column" => &mut options.position_column,
            "order" => &mut options.order,
            other => {
                return Err(syn::Error::new(
                    meta.path.span(),
                    format!("Unsupported closure_table option `{other}`"),
                ));
            }
        };

        let value: syn::LitStr = meta.value()?.parse()?;
        *slot = Some(value.value());
        Ok(())
    })
}

fn parse_sea_orm_table_name(attr: &Attribute) -> syn::Result<Option<String>> {
    let mut table_name: Option<String> = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("table_name") {
            let value: syn::LitStr = meta.value()?.parse()?;
            table_name = Some(value.value());
        } else if meta.input.peek(syn::Token![=]) {
            let _: syn::Expr = meta.value()?.parse()?;
        } else if meta.input.peek(syn::token::Paren) {
            let _nested;
            syn::parenthesized!(_nested in meta.input);
        }
        Ok(())
    })?;
    Ok(table_name)
}
