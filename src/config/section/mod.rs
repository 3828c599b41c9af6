//! Configuration section definitions.
//!
//! Each module corresponds to a section in `kiln.toml`:
//!
//! | Module   | TOML Section       | Purpose                              |
//! |----------|--------------------|--------------------------------------|
//! | `build`  | `[build]`          | Source/output roots, html exclusions |
//! | `js`     | `[build.js]`       | Script copy                          |
//! | `sass`   | `[build.sass]`     | Sass compile and CSS post-processing |
//! | `images` | `[build.images]`   | Image compression and derivation     |
//! | `serve`  | `[serve]`          | Development server                   |

mod build;
mod images;
mod js;
mod sass;
mod serve;

pub use build::BuildConfig;
pub use images::{DerivedFormat, ImagesConfig};
pub use js::JsConfig;
pub use sass::SassConfig;
pub use serve::ServeConfig;
