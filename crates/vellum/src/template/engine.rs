//! Template engine abstraction.
//!
//! This module defines the [`TemplateEngine`] trait, the seam between the
//! manager and the engine that actually parses and executes templates. The
//! default implementation is [`MiniJinjaEngine`].
//!
//! The manager only needs an engine that can:
//! - parse a string into a named template of one shared set,
//! - use custom expression delimiters,
//! - expose registered helper functions to template expressions,
//! - execute a named template against a key-value context into a writer,
//! - report parse and execute failures as errors.

use std::io;
use std::sync::Arc;

use minijinja::syntax::SyntaxConfig;
use minijinja::value::Rest;
use minijinja::{AutoEscape, Environment, ErrorKind, Value};

use crate::config::Delimiters;
use crate::data::RenderData;
use crate::error::{Result, TemplateError};

/// A helper callable from template expressions.
///
/// Helpers receive their positional arguments and return a renderable value
/// or an error, which aborts the render.
pub type HelperFn =
    Arc<dyn Fn(&[Value]) -> std::result::Result<Value, minijinja::Error> + Send + Sync>;

/// Parse-time settings applied once, before the first template is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub delimiters: Delimiters,
    /// File extension of the templates; selects the auto-escape mode.
    pub extension: String,
}

/// A template engine holding one set of named templates.
pub trait TemplateEngine: Send + Sync {
    /// Applies parse-time settings. Called once, before any template is added.
    fn configure(&mut self, options: &EngineOptions) -> Result<()>;

    /// Registers (or replaces) a helper function.
    fn add_function(&mut self, name: &str, func: HelperFn);

    /// Parses `source` and registers it under `name`, replacing any template
    /// of the same name. On error the set is left unchanged.
    fn add_template(&mut self, name: &str, source: &str) -> Result<()>;

    /// Removes a template from the set. Unknown names are ignored.
    fn remove_template(&mut self, name: &str);

    /// Checks if a template with the given name exists.
    fn has_template(&self, name: &str) -> bool;

    /// Executes the named template against `data`, writing into `out`.
    fn render_named(&self, name: &str, data: &RenderData, out: &mut dyn io::Write) -> Result<()>;
}

/// MiniJinja-based template engine.
///
/// Templates share one [`Environment`], so any template can `include` or
/// `extend` any other registered template by name.
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Returns a reference to the underlying MiniJinja environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Returns a mutable reference to the underlying MiniJinja environment.
    ///
    /// This allows registering filters or tests, or tuning the environment
    /// beyond what the manager configures.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MiniJinjaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiniJinjaEngine").finish_non_exhaustive()
    }
}

/// Builds the syntax config for a delimiter pair.
pub(crate) fn syntax_for(delimiters: &Delimiters) -> Result<SyntaxConfig> {
    delimiters.validate()?;
    SyntaxConfig::builder()
        .variable_delimiters(delimiters.left.clone(), delimiters.right.clone())
        .build()
        .map_err(|e| {
            TemplateError::invalid_delimiters(&delimiters.left, &delimiters.right, e.to_string())
        })
}

/// Auto-escape mode for templates stored with the given file extension.
pub(crate) fn auto_escape_for(extension: &str) -> AutoEscape {
    minijinja::default_auto_escape_callback(&format!("template.{}", extension))
}

impl TemplateEngine for MiniJinjaEngine {
    fn configure(&mut self, options: &EngineOptions) -> Result<()> {
        if !options.delimiters.is_default() {
            self.env.set_syntax(syntax_for(&options.delimiters)?);
        }
        // Logical names carry no extension, so escaping follows the configured one.
        let escape = auto_escape_for(&options.extension);
        self.env
            .set_auto_escape_callback(move |_name: &str| escape.clone());
        Ok(())
    }

    fn add_function(&mut self, name: &str, func: HelperFn) {
        self.env
            .add_function(name.to_string(), move |args: Rest<Value>| func(&args.0));
    }

    fn add_template(&mut self, name: &str, source: &str) -> Result<()> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())
            .map_err(|source| TemplateError::Parse {
                name: name.to_string(),
                source,
            })
    }

    fn remove_template(&mut self, name: &str) {
        self.env.remove_template(name);
    }

    fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    fn render_named(&self, name: &str, data: &RenderData, out: &mut dyn io::Write) -> Result<()> {
        let tmpl = self.env.get_template(name).map_err(|err| match err.kind() {
            ErrorKind::TemplateNotFound => TemplateError::NotFound {
                name: name.to_string(),
            },
            _ => TemplateError::Execute {
                name: name.to_string(),
                source: err,
            },
        })?;
        tmpl.render_to_write(Value::from_serialize(data), out)
            .map_err(|source| TemplateError::Execute {
                name: name.to_string(),
                source,
            })?;
        Ok(())
    }
}
