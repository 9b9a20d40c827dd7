use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Derive macro for bean schemas.
///
/// Generates two impls on the annotated struct:
///
/// - `morph_api::bean::Bean`: a static `BeanClass` (name, properties in
///   field order, default constructor) plus by-name getters and setters.
/// - `morph_api::bean::PropertyValue`: so the bean can itself be a
///   property of another bean.
///
/// The struct must implement `Default` (used as the default constructor),
/// `Clone`, `PartialEq` and `Debug`. Every field type must implement
/// `PropertyValue`.
///
/// # Example
///
/// ```ignore
/// #[derive(Bean, Debug, Clone, PartialEq, Default)]
/// #[bean(name = "Order")]
/// pub struct Order {
///     pub id: i64,
///     #[bean(rename = "customerName")]
///     pub customer: Option<String>,
///     #[bean(read_only)]
///     pub checksum: String,
///     #[bean(skip)]
///     pub cache: Vec<u8>,
/// }
/// ```
///
/// Field attributes: `rename = "..."`, `read_only`, `write_only`, `skip`.
#[proc_macro_derive(Bean, attributes(bean))]
pub fn derive_bean(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

struct FieldAttrs {
    rename: Option<String>,
    read_only: bool,
    write_only: bool,
    skip: bool,
}

fn parse_field_attrs(field: &syn::Field) -> Result<FieldAttrs, syn::Error> {
    let mut attrs = FieldAttrs {
        rename: None,
        read_only: false,
        write_only: false,
        skip: false,
    };

    for attr in &field.attrs {
        if !attr.path().is_ident("bean") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.rename = Some(value.value());
            } else if meta.path.is_ident("read_only") {
                attrs.read_only = true;
            } else if meta.path.is_ident("write_only") {
                attrs.write_only = true;
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
            } else {
                return Err(meta.error("unknown bean attribute"));
            }
            Ok(())
        })?;
    }

    if attrs.read_only && attrs.write_only {
        return Err(syn::Error::new_spanned(
            field,
            "a property can not be both read_only and write_only",
        ));
    }

    Ok(attrs)
}

fn parse_class_name(input: &DeriveInput) -> Result<String, syn::Error> {
    let mut class_name = input.ident.to_string();
    for attr in &input.attrs {
        if !attr.path().is_ident("bean") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                class_name = value.value();
                Ok(())
            } else {
                Err(meta.error("unknown bean attribute (expected `name`)"))
            }
        })?;
    }
    Ok(class_name)
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Bean does not support generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Bean only supports structs with named fields",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(name, "Bean only supports structs")),
    };

    let class_name = parse_class_name(input)?;

    let mut descriptor_tokens = Vec::new();
    let mut getter_arms = Vec::new();
    let mut setter_arms = Vec::new();

    for field in fields {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let field_ty = &field.ty;
        let attrs = parse_field_attrs(field)?;
        if attrs.skip {
            continue;
        }

        let prop_name = attrs.rename.unwrap_or_else(|| field_name.to_string());
        let readable = !attrs.write_only;
        let writable = !attrs.read_only;

        descriptor_tokens.push(quote! {
            morph_api::bean::PropertyDescriptor::new(
                #prop_name,
                <#field_ty as morph_api::bean::PropertyValue>::type_descriptor(),
            )
            .readable(#readable)
            .writable(#writable)
        });

        if readable {
            getter_arms.push(quote! {
                #prop_name => ::std::result::Result::Ok(
                    morph_api::bean::PropertyValue::into_value(
                        ::std::clone::Clone::clone(&self.#field_name),
                    ),
                ),
            });
        }

        if writable {
            setter_arms.push(quote! {
                #prop_name => {
                    self.#field_name =
                        <#field_ty as morph_api::bean::PropertyValue>::from_value(__value)
                            .map_err(|e| morph_api::error::MorphError::property(
                                #class_name,
                                #prop_name,
                                e.to_string(),
                            ))?;
                    ::std::result::Result::Ok(())
                }
            });
        }
    }

    let expanded = quote! {
        impl morph_api::bean::Bean for #name {
            fn bean_class() -> &'static morph_api::bean::BeanClass {
                static CLASS: ::std::sync::OnceLock<morph_api::bean::BeanClass> =
                    ::std::sync::OnceLock::new();
                CLASS.get_or_init(|| {
                    morph_api::bean::BeanClass::new(
                        #class_name,
                        vec![
                            #(#descriptor_tokens),*
                        ],
                    )
                    .with_constructor(|| -> ::std::boxed::Box<dyn morph_api::bean::BeanObject> {
                        ::std::boxed::Box::new(<#name as ::std::default::Default>::default())
                    })
                })
            }

            fn get_property(
                &self,
                __name: &str,
            ) -> ::std::result::Result<morph_api::value::Value, morph_api::error::MorphError> {
                match __name {
                    #(#getter_arms)*
                    _ => ::std::result::Result::Err(morph_api::error::MorphError::property(
                        #class_name,
                        __name,
                        "no readable property with this name",
                    )),
                }
            }

            #[allow(unused_variables)]
            fn set_property(
                &mut self,
                __name: &str,
                __value: morph_api::value::Value,
            ) -> ::std::result::Result<(), morph_api::error::MorphError> {
                match __name {
                    #(#setter_arms)*
                    _ => ::std::result::Result::Err(morph_api::error::MorphError::property(
                        #class_name,
                        __name,
                        "no writable property with this name",
                    )),
                }
            }
        }

        impl morph_api::bean::PropertyValue for #name {
            fn type_descriptor() -> morph_api::descriptor::TypeDescriptor {
                morph_api::descriptor::TypeDescriptor::bean(
                    <#name as morph_api::bean::Bean>::bean_class(),
                )
            }

            fn into_value(self) -> morph_api::value::Value {
                morph_api::value::Value::Bean(morph_api::bean::BeanRef::new(self))
            }

            fn from_value(
                __value: morph_api::value::Value,
            ) -> ::std::result::Result<Self, morph_api::error::MorphError> {
                match __value {
                    morph_api::value::Value::Bean(bean) => bean.downcast::<#name>().ok_or_else(|| {
                        morph_api::error::MorphError::unsupported(
                            <#name as morph_api::bean::PropertyValue>::type_descriptor(),
                            "bean of another class",
                        )
                    }),
                    other => ::std::result::Result::Err(morph_api::error::MorphError::unsupported(
                        <#name as morph_api::bean::PropertyValue>::type_descriptor(),
                        format!("can not assign {} value", other.type_of()),
                    )),
                }
            }
        }
    };

    Ok(TokenStream::from(expanded))
}
