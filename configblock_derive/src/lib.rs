extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Type};

/// Derives the `FormBlock` shape contract for a named-field struct.
///
/// Every field must be one of the supported leaf types: `Option<String>`,
/// `Option<i64>` or `Option<bool>`. Fields carrying secrets are marked with
/// the `#[sensitive]` attribute and are routed through the credential store
/// instead of the plain property store.
///
/// The expansion refers to `FormBlock`, `InputSpec`, `InputKind`,
/// `InputValue` and `MalformedConfigError` by name, so those must be in
/// scope at the derive site.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(FormBlock, Default)]
/// struct LinkForm {
///     jdbc_driver: Option<String>,
///     connection_string: Option<String>,
///
///     #[sensitive]
///     password: Option<String>,
/// }
/// ```
#[proc_macro_derive(FormBlock, attributes(sensitive))]
pub fn derive_form_block(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("FormBlock can only be derived for structs with named fields"),
        },
        _ => panic!("FormBlock can only be derived for structs"),
    };

    if fields.is_empty() {
        panic!("FormBlock requires at least one input field");
    }

    let mut specs = Vec::new();
    let mut value_arms = Vec::new();
    let mut assign_arms = Vec::new();

    for field in fields {
        let field_name = field.ident.as_ref().unwrap();
        let field_name_str = field_name.to_string();

        let sensitive = field
            .attrs
            .iter()
            .any(|attr| attr.path().is_ident("sensitive"));

        let kind = match leaf_kind(&field.ty) {
            Some(kind) => kind,
            None => panic!(
                "Field {} has an unsupported input type; expected Option<String>, Option<i64> or Option<bool>",
                field_name
            ),
        };

        let kind_ident = kind.kind_tokens();
        let variant_ident = kind.variant_tokens();

        specs.push(quote! {
            InputSpec {
                name: #field_name_str,
                kind: InputKind::#kind_ident,
                sensitive: #sensitive,
            }
        });

        // Text values are cloned out; integer and boolean leaves are Copy.
        let extract = match kind {
            LeafKind::Text => quote! { self.#field_name.clone() },
            _ => quote! { self.#field_name },
        };

        value_arms.push(quote! {
            #field_name_str => Ok(#extract.map(InputValue::#variant_ident)),
        });

        assign_arms.push(quote! {
            #field_name_str => match value {
                None => {
                    self.#field_name = None;
                    Ok(())
                }
                Some(InputValue::#variant_ident(v)) => {
                    self.#field_name = Some(v);
                    Ok(())
                }
                Some(other) => Err(MalformedConfigError::TypeMismatch {
                    input: #field_name_str.to_string(),
                    expected: InputKind::#kind_ident,
                    found: other.kind(),
                }),
            },
        });
    }

    let expanded = quote! {
        impl FormBlock for #name {
            fn inputs(&self) -> &'static [InputSpec] {
                const INPUTS: &[InputSpec] = &[
                    #(#specs),*
                ];
                INPUTS
            }

            fn input_value(&self, input: &str) -> Result<Option<InputValue>, MalformedConfigError> {
                match input {
                    #(#value_arms)*
                    other => Err(MalformedConfigError::UnknownInput {
                        input: other.to_string(),
                    }),
                }
            }

            fn set_input(
                &mut self,
                input: &str,
                value: Option<InputValue>,
            ) -> Result<(), MalformedConfigError> {
                match input {
                    #(#assign_arms)*
                    other => Err(MalformedConfigError::UnknownInput {
                        input: other.to_string(),
                    }),
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Derives the `ConfigBlock` contract for a configuration root struct.
///
/// Every field must be a type implementing `FormBlock`; the field name
/// becomes the form name in the flattened property namespace. The expansion
/// refers to `ConfigBlock` and `FormBlock` by name, so both must be in
/// scope at the derive site.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(ConfigBlock, Default)]
/// struct ConnectionConfig {
///     link: LinkForm,
/// }
/// ```
#[proc_macro_derive(ConfigBlock)]
pub fn derive_config_block(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("ConfigBlock can only be derived for structs with named fields"),
        },
        _ => panic!("ConfigBlock can only be derived for structs"),
    };

    if fields.is_empty() {
        panic!("ConfigBlock requires at least one form field");
    }

    let mut form_entries = Vec::new();
    let mut form_entries_mut = Vec::new();

    for field in fields {
        let field_name = field.ident.as_ref().unwrap();
        let field_name_str = field_name.to_string();

        form_entries.push(quote! {
            (#field_name_str, &self.#field_name as &dyn FormBlock)
        });
        form_entries_mut.push(quote! {
            (#field_name_str, &mut self.#field_name as &mut dyn FormBlock)
        });
    }

    let expanded = quote! {
        impl ConfigBlock for #name {
            fn forms(&self) -> Vec<(&'static str, &dyn FormBlock)> {
                vec![
                    #(#form_entries),*
                ]
            }

            fn forms_mut(&mut self) -> Vec<(&'static str, &mut dyn FormBlock)> {
                vec![
                    #(#form_entries_mut),*
                ]
            }
        }
    };

    TokenStream::from(expanded)
}

#[derive(Clone, Copy, PartialEq)]
enum LeafKind {
    Text,
    Integer,
    Boolean,
}

impl LeafKind {
    fn kind_tokens(self) -> TokenStream2 {
        match self {
            LeafKind::Text => quote! { Text },
            LeafKind::Integer => quote! { Integer },
            LeafKind::Boolean => quote! { Boolean },
        }
    }

    fn variant_tokens(self) -> TokenStream2 {
        // InputValue variants share the InputKind names
        self.kind_tokens()
    }
}

/// Maps a leaf field type to its input kind; `None` for anything that is
/// not `Option<String>`, `Option<i64>` or `Option<bool>`.
fn leaf_kind(ty: &Type) -> Option<LeafKind> {
    let inner = option_inner(ty)?;
    let path = match inner {
        Type::Path(path) => path,
        _ => return None,
    };
    let segment = path.path.segments.last()?;
    if segment.ident == "String" {
        Some(LeafKind::Text)
    } else if segment.ident == "i64" {
        Some(LeafKind::Integer)
    } else if segment.ident == "bool" {
        Some(LeafKind::Boolean)
    } else {
        None
    }
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let path = match ty {
        Type::Path(path) => path,
        _ => return None,
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let args = match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => args,
        _ => return None,
    };
    match args.args.first() {
        Some(syn::GenericArgument::Type(inner)) => Some(inner),
        _ => None,
    }
}
