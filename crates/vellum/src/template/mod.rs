//! Template loading, composition and rendering.
//!
//! ## Key Types
//!
//! - [`TemplateManager`]: configures, loads and renders a template set
//! - [`TemplateEngine`]: the engine seam, implemented by [`MiniJinjaEngine`]
//! - [`ErrorTemplate`]: static fallback page for when rendering cannot proceed
//! - [`HelperFn`]: signature of helpers callable from templates
//!
//! ## Built-in Helpers
//!
//! | Helper | Result |
//! |--------|--------|
//! | `baseurl(uri)` | `uri` joined onto the base URL |
//! | `staticurl(uri)` | `uri` joined onto the static-asset URL |

pub mod engine;
mod error_page;
mod functions;
mod manager;

pub use engine::{EngineOptions, HelperFn, MiniJinjaEngine, TemplateEngine};
pub use error_page::{ErrorTemplate, ERROR_PAGE_SOURCE};
pub use functions::{helper, BASE_URL_HELPER, STATIC_URL_HELPER};
pub use manager::{TemplateManager, ROOT_TEMPLATE};
