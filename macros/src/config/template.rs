//! Template generation code for Config derive macro.

use proc_macro2::TokenStream;
use quote::quote;

use super::FieldInfo;

/// Generate template code (TokenStream) for fields
pub fn generate_template_code(fields: &[&FieldInfo]) -> TokenStream {
    let field_codes = fields.iter().map(|f| generate_field_template_code(f));
    quote! {
        #(#field_codes)*
    }
}

fn generate_field_template_code(info: &FieldInfo) -> TokenStream {
    let field_name = &info.name;
    let toml_name = &info.toml_name;
    let ty = &info.ty;

    let doc_code = match &info.doc {
        Some(doc) => {
            let doc_str: String = doc.lines().map(|l| format!("# {}\n", l.trim())).collect();
            quote! { out.push_str(#doc_str); }
        }
        None => quote! {},
    };

    // Nested section: render with its own header after a blank line
    if info.sub {
        return quote! {
            out.push('\n');
            out.push_str(&<#ty>::template_with_header());
        };
    }

    let trailer = match &info.inline_doc {
        Some(inline) => format!("  # {inline}\n"),
        None => "\n".to_string(),
    };

    let ty_str = quote!(#ty).to_string().replace(' ', "");
    if ty_str.starts_with("Option<") && info.default.is_none() {
        let line = format!("# {toml_name} = \"\"{trailer}");
        return quote! {
            #doc_code
            out.push_str(#line);
        };
    }

    if let Some(default_val) = &info.default {
        let line = format!("{toml_name} = {default_val}{trailer}");
        return quote! {
            #doc_code
            out.push_str(#line);
        };
    }

    // Runtime default from Default::default()
    quote! {
        #doc_code
        out.push_str(#toml_name);
        out.push_str(" = ");
        out.push_str(&toml::Value::try_from(default.#field_name.clone())
            .map(|v| v.to_string())
            .unwrap_or_default());
        out.push_str(#trailer);
    }
}
