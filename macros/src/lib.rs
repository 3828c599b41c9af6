//! Proc macros for kiln.
//!
//! # Config derive macro
//!
//! Generates field path accessors and a commented TOML template.
//!
//! ```ignore
//! #[derive(Config)]
//! #[config(section = "build.images")]
//! /// Image pipeline settings.
//! pub struct ImagesConfig {
//!     /// Derived format written next to every raster source.
//!     pub derived: DerivedFormat,
//!
//!     /// JPEG quality (1-100).
//!     #[config(inline_doc = "1-100")]
//!     pub jpeg_quality: u8,
//!
//!     #[config(skip)]
//!     pub internal: String,
//! }
//!
//! // Generates:
//! // - ImagesConfig::FIELDS.derived -> FieldPath("build.images.derived")
//! // - ImagesConfig::template() -> TOML string with comments
//! // - ImagesConfig::template_with_header() -> with [section] header
//! ```
//!
//! # Attributes
//!
//! Struct-level:
//! - `#[config(section = "path")]` - TOML section path
//!
//! Field-level:
//! - `#[config(skip)]` - Skip from FIELDS and template
//! - `#[config(sub)]` - Nested config section, rendered with its own header
//! - `#[config(name = "x")]` - Custom TOML field name
//! - `#[config(default = "x")]` - Default value in template
//! - `#[config(inline_doc = "x")]` - Trailing comment after the value
//!
//! # Section inference
//!
//! Without `section` attribute, inferred from struct name:
//! - `ServeConfig` → `serve`
//! - `SassConfig` → `sass`

mod config;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derive macro that generates FIELDS and template().
#[proc_macro_derive(Config, attributes(config))]
pub fn derive_config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    config::derive(&input).into()
}
