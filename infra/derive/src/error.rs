use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Field, Fields, Ident, LitStr, Type, Variant};

struct VariantSpec {
    ident: Ident,
    source: Option<(Ident, Type)>,
    has_context: bool,
    hint: Option<LitStr>,
    cfg_attrs: Vec<Attribute>,
}

pub fn expand(mut input: DeriveInput) -> TokenStream {
    let name = input.ident.clone();
    let ext = format_ident!("{}Ext", name);

    let Data::Enum(data) = &mut input.data else {
        return syn::Error::new_spanned(&name, "vitrine_error can only be applied to enums")
            .to_compile_error();
    };

    let mut specs = Vec::with_capacity(data.variants.len());
    for variant in &mut data.variants {
        match inspect_variant(variant) {
            Ok(spec) => specs.push(spec),
            Err(err) => return err.to_compile_error(),
        }
    }

    let derives = missing_derives(&input);
    let context_trait = context_trait(&name, &ext, &specs);
    let from_impls = specs.iter().filter_map(|spec| from_impl(&name, &ext, spec));
    let internal_impls = internal_impls(&name, &specs);
    let hint_impl = hint_impl(&name, &specs);

    quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #input

        #context_trait
        #(#from_impls)*
        #internal_impls
        #hint_impl

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
        }
    }
}

fn inspect_variant(variant: &mut Variant) -> syn::Result<VariantSpec> {
    let hint = take_hint(&mut variant.attrs)?;

    let Fields::Named(fields) = &variant.fields else {
        return Err(syn::Error::new_spanned(
            &variant.ident,
            "vitrine_error requires named fields so source/context can be wired",
        ));
    };

    let mut has_context = false;
    for field in &fields.named {
        if field.ident.as_ref().is_some_and(|ident| ident == "context") {
            if !is_context_type(&field.ty) {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "context field must be Option<Cow<'static, str>>",
                ));
            }
            has_context = true;
        }
    }

    let source = fields
        .named
        .iter()
        .find(|field| is_source_field(field))
        .and_then(|field| field.ident.clone().map(|ident| (ident, field.ty.clone())));

    if source.is_some() && !has_context {
        return Err(syn::Error::new_spanned(
            &variant.ident,
            "vitrine_error requires `context: Option<Cow<'static, str>>` for variants with a source",
        ));
    }

    let cfg_attrs = variant.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).cloned().collect();

    Ok(VariantSpec { ident: variant.ident.clone(), source, has_context, hint, cfg_attrs })
}

/// Removes `#[hint("...")]` from the variant so it never reaches `thiserror`.
fn take_hint(attrs: &mut Vec<Attribute>) -> syn::Result<Option<LitStr>> {
    let mut hint: Option<LitStr> = None;
    let mut failure: Option<syn::Error> = None;

    attrs.retain(|attr| {
        if !attr.path().is_ident("hint") {
            return true;
        }
        match attr.parse_args::<LitStr>() {
            Ok(_) if hint.is_some() => {
                failure.get_or_insert_with(|| {
                    syn::Error::new_spanned(attr, "only one #[hint] is allowed per variant")
                });
            },
            Ok(lit) => hint = Some(lit),
            Err(err) => {
                failure.get_or_insert(err);
            },
        }
        false
    });

    failure.map_or(Ok(hint), Err)
}

fn context_trait(name: &Ident, ext: &Ident, specs: &[VariantSpec]) -> TokenStream {
    let arms = specs.iter().filter(|spec| spec.has_context).map(|spec| {
        let cfg_attrs = &spec.cfg_attrs;
        let ident = &spec.ident;
        quote! { #(#cfg_attrs)* #name::#ident { context: c, .. } => *c = Some(context.into()), }
    });

    quote! {
        pub trait #ext<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut e| {
                    match &mut e {
                        #( #arms )*
                        _ => {}
                    }
                    e
                })
            }
        }
    }
}

fn from_impl(name: &Ident, ext: &Ident, spec: &VariantSpec) -> Option<TokenStream> {
    if spec.ident == "Internal" {
        return None;
    }
    let (field, ty) = spec.source.as_ref()?;
    let ident = &spec.ident;
    let cfg_attrs = &spec.cfg_attrs;

    Some(quote! {
        #(#cfg_attrs)*
        #[automatically_derived]
        impl From<#ty> for #name {
            #[inline]
            fn from(#field: #ty) -> Self { Self::#ident { #field, context: None } }
        }

        #(#cfg_attrs)*
        impl<T> #ext<T> for std::result::Result<T, #ty> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                self.map_err(|#field| #name::#ident { #field, context: Some(context.into()) })
            }
        }
    })
}

fn internal_impls(name: &Ident, specs: &[VariantSpec]) -> TokenStream {
    let Some(internal) = specs.iter().find(|spec| spec.ident == "Internal") else {
        return quote!();
    };
    let cfg_attrs = &internal.cfg_attrs;

    quote! {
        #(#cfg_attrs)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(s: &'static str) -> Self { Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None } }
        }
        #(#cfg_attrs)*
        impl From<String> for #name {
            #[inline]
            fn from(s: String) -> Self { Self::Internal { message: std::borrow::Cow::Owned(s), context: None } }
        }
    }
}

fn hint_impl(name: &Ident, specs: &[VariantSpec]) -> TokenStream {
    let arms = specs.iter().filter_map(|spec| {
        let hint = spec.hint.as_ref()?;
        let ident = &spec.ident;
        let cfg_attrs = &spec.cfg_attrs;
        Some(quote! { #(#cfg_attrs)* Self::#ident { .. } => Some(#hint), })
    });

    quote! {
        #[automatically_derived]
        impl #name {
            /// Operator-facing remediation text for this error, if the variant defines one.
            #[must_use]
            #[allow(unreachable_patterns, clippy::match_single_binding, clippy::missing_const_for_fn)]
            pub const fn hint(&self) -> Option<&'static str> {
                match self {
                    #( #arms )*
                    _ => None,
                }
            }
        }
    }
}

fn is_source_field(field: &Field) -> bool {
    field.ident.as_ref().is_some_and(|ident| ident == "source")
        || field.attrs.iter().any(|attr| attr.path().is_ident("source") || attr.path().is_ident("from"))
}

fn missing_derives(input: &DeriveInput) -> TokenStream {
    let mut present = FxHashSet::default();
    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                present.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }

    let mut derives = Vec::new();
    if !present.contains("Debug") {
        derives.push(quote! { Debug });
    }
    if !present.contains("Error") {
        derives.push(quote! { ::thiserror::Error });
    }

    if derives.is_empty() { quote!() } else { quote! { #[derive(#(#derives),*)] } }
}

fn is_context_type(ty: &Type) -> bool {
    let Some(option) = last_segment(ty).filter(|seg| seg.ident == "Option") else {
        return false;
    };
    let syn::PathArguments::AngleBracketed(args) = &option.arguments else {
        return false;
    };
    let Some(syn::GenericArgument::Type(inner)) = args.args.first() else {
        return false;
    };
    let Some(cow) = last_segment(inner).filter(|seg| seg.ident == "Cow") else {
        return false;
    };
    let syn::PathArguments::AngleBracketed(cow_args) = &cow.arguments else {
        return false;
    };

    let mut cow_args = cow_args.args.iter();
    let static_lifetime = matches!(
        cow_args.next(),
        Some(syn::GenericArgument::Lifetime(lt)) if lt.ident == "static"
    );
    let str_target = matches!(
        cow_args.next(),
        Some(syn::GenericArgument::Type(target)) if last_segment(target).is_some_and(|seg| seg.ident == "str")
    );

    static_lifetime && str_target
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    let Type::Path(path) = ty else {
        return None;
    };
    path.path.segments.last()
}
