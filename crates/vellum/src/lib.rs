//! # Vellum - Layout-Driven HTML Templates
//!
//! `vellum` manages a named set of layout and content templates on top of
//! MiniJinja. It resolves logical template names to files, injects global and
//! per-render data, exposes URL helpers, and renders a composed page to any
//! [`std::io::Write`].
//!
//! ## Core Concepts
//!
//! - [`TemplateManager`]: owns the template set, helpers and global data
//! - Layout: the composition root, loaded first and registered as [`ROOT_TEMPLATE`]
//! - [`GlobalData`]: string pairs merged into every render
//! - Render data: any `Serialize` map, overriding global data per call
//! - [`ErrorTemplate`]: a static page to show when the template set is broken
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use serde::Serialize;
//! use vellum::TemplateManager;
//!
//! #[derive(Serialize)]
//! struct Page {
//!     title: String,
//! }
//!
//! // templates/base.html:    <title>{{ title }}</title>{% include "home" %}
//! // templates/home.html:    <a href="{{ baseurl('about') }}">{{ site_name }}</a>
//! let mut manager = TemplateManager::new("templates", "https://example.com", "https://cdn.example.com");
//! manager.set_layout("base").set_data("site_name", "Example");
//! manager.add_templates(["home"])?;
//!
//! let mut out = std::io::stdout();
//! manager.execute(&mut out, &Page { title: "Home".into() })?;
//! # Ok::<(), vellum::TemplateError>(())
//! ```
//!
//! ## Handling Failures
//!
//! Every error can render the fallback page, so a caller always has something
//! to send back:
//!
//! ```rust,no_run
//! # use vellum::TemplateManager;
//! # let manager = TemplateManager::new("templates", "", "");
//! let mut out = Vec::new();
//! if let Err(err) = manager.execute_named(&mut out, "home", &()) {
//!     out.clear();
//!     err.render_fallback(&mut out)?;
//! }
//! # Ok::<(), vellum::TemplateError>(())
//! ```
//!
//! ## Custom Delimiters
//!
//! Delimiters are a parse-time property and must be set before the first load:
//!
//! ```rust,no_run
//! # use vellum::TemplateManager;
//! let mut manager = TemplateManager::new("templates", "", "");
//! manager.set_delimiters("<%", "%>")?;
//! manager.add_templates(["page"])?; // page.html uses <% name %>
//! # Ok::<(), vellum::TemplateError>(())
//! ```

pub mod config;
pub mod data;
mod error;
pub mod prelude;
pub mod template;
mod url;

pub use config::{Delimiters, TemplateManagerConfig, DEFAULT_EXTENSION};
pub use data::{merge_data, to_render_data, GlobalData, RenderData};
pub use error::{Result, TemplateError};
pub use template::{
    helper, EngineOptions, ErrorTemplate, HelperFn, MiniJinjaEngine, TemplateEngine,
    TemplateManager, BASE_URL_HELPER, ERROR_PAGE_SOURCE, ROOT_TEMPLATE, STATIC_URL_HELPER,
};
pub use url::join_url;
