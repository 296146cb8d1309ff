//! Common imports.
//!
//! ```rust,ignore
//! use vellum::prelude::*;
//!
//! let mut manager = TemplateManager::new("./templates", "", "/static");
//! manager.add_func("year", helper(|_| Ok(Value::from(2024))));
//! ```

pub use crate::config::{Delimiters, TemplateManagerConfig};
pub use crate::error::{Result, TemplateError};
pub use crate::template::{helper, ErrorTemplate, HelperFn, TemplateManager, ROOT_TEMPLATE};
pub use minijinja::Value;
