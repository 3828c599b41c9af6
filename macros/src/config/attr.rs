//! `#[config(..)]` and doc attribute parsing.

use syn::{Attribute, Expr, Lit, LitStr, Meta, Token};

/// Everything `#[config(..)]` can carry, gathered in one pass.
#[derive(Default)]
pub struct ConfigAttrs {
    pub section: Option<String>,
    pub name: Option<String>,
    pub default: Option<String>,
    pub inline_doc: Option<String>,
    pub skip: bool,
    pub sub: bool,
}

impl ConfigAttrs {
    /// Unknown keys are ignored; their values are consumed so parsing continues.
    pub fn parse(attrs: &[Attribute]) -> Self {
        let mut out = Self::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("config")) {
            let _ = attr.parse_nested_meta(|meta| {
                let key = meta.path.get_ident().map(ToString::to_string).unwrap_or_default();
                let value = if meta.input.peek(Token![=]) {
                    Some(meta.value()?.parse::<LitStr>()?.value())
                } else {
                    None
                };

                match (key.as_str(), value) {
                    ("section", Some(v)) => out.section = Some(v),
                    ("name", Some(v)) => out.name = Some(v),
                    ("default", Some(v)) => out.default = Some(v),
                    ("inline_doc", Some(v)) => out.inline_doc = Some(v),
                    ("skip", None) => out.skip = true,
                    ("sub", None) => out.sub = true,
                    _ => {}
                }
                Ok(())
            });
        }

        out
    }
}

/// `///` lines joined with newlines, trimmed. `None` when there are none.
pub fn doc_comment(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(expr) => match &expr.lit {
                    Lit::Str(s) => Some(s.value()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect();

    let joined = lines.join("\n");
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
