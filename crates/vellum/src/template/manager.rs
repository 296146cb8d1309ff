//! The template manager.
//!
//! [`TemplateManager`] ties configuration, loading and rendering together:
//!
//! 1. Configure: template directory, extension, delimiters, helpers, layout,
//!    global data and URLs, in any order.
//! 2. Load: [`add_templates`](TemplateManager::add_templates) reads the layout
//!    first (registered as [`ROOT_TEMPLATE`]) and then each named template.
//! 3. Render: [`execute`](TemplateManager::execute) runs the layout,
//!    [`execute_named`](TemplateManager::execute_named) any loaded template.
//!
//! # Composition
//!
//! All templates live in one set, so the layout pulls content in by name:
//!
//! ```jinja
//! <html>
//!   <head><link rel="stylesheet" href="{{ staticurl('css/site.css') }}"></head>
//!   <body>{% include "content" %}</body>
//! </html>
//! ```
//!
//! Pages can also `{% extends "layout" %}` and override blocks.
//!
//! # Loading is transactional per call
//!
//! If any file of an `add_templates` call fails to read or parse, every
//! template registered by that call is removed again and any template it
//! replaced is restored. Templates from earlier successful calls stay.
//!
//! # Sharing
//!
//! Configuration and loading take `&mut self`; rendering takes `&self`. A
//! loaded manager can go behind an `Arc` and render from many threads. Changing
//! global data afterwards needs `&mut`, so wrap it in a `RwLock` if renders
//! and updates overlap.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use super::engine::{syntax_for, EngineOptions, HelperFn, MiniJinjaEngine, TemplateEngine};
use super::error_page::ErrorTemplate;
use super::functions::{url_helper, BASE_URL_HELPER, STATIC_URL_HELPER};
use crate::config::{Delimiters, TemplateManagerConfig};
use crate::data::{merge_data, to_render_data, GlobalData};
use crate::error::{Result, TemplateError};
use crate::url::join_url;

/// Name the layout is registered under, and the template `execute` runs.
pub const ROOT_TEMPLATE: &str = "layout";

#[derive(Debug, Clone)]
struct LoadedTemplate {
    /// Logical name the file was resolved from.
    logical: String,
    path: PathBuf,
    source: String,
}

/// Templates touched by one load call, with what they replaced.
type Journal = Vec<(String, Option<LoadedTemplate>)>;

/// Manages a set of layout and content templates and renders them.
///
/// # Example
///
/// ```rust,no_run
/// use serde_json::json;
/// use vellum::TemplateManager;
///
/// let mut manager = TemplateManager::new("./templates", "https://example.com", "https://cdn.example.com");
/// manager.set_layout("base").set_data("site_name", "Example");
/// manager.add_templates(["content", "sidebar"])?;
///
/// let mut out = Vec::new();
/// manager.execute(&mut out, &json!({"title": "Home"}))?;
/// # Ok::<(), vellum::TemplateError>(())
/// ```
pub struct TemplateManager {
    config: TemplateManagerConfig,
    global_data: GlobalData,
    helpers: BTreeMap<String, HelperFn>,
    engine: Box<dyn TemplateEngine>,
    /// Registered name to loaded file.
    loaded: BTreeMap<String, LoadedTemplate>,
    /// Set once the engine has received its parse-time options.
    configured: bool,
}

impl TemplateManager {
    /// Creates a manager for the given template directory and URLs.
    pub fn new(
        template_dir: impl Into<PathBuf>,
        base_url: impl Into<String>,
        static_url: impl Into<String>,
    ) -> Self {
        Self::from_config(TemplateManagerConfig::new(template_dir, base_url, static_url))
    }

    /// Creates a manager from a full configuration. The config's `data`
    /// seeds the global data.
    pub fn from_config(config: TemplateManagerConfig) -> Self {
        Self::with_engine(config, Box::new(MiniJinjaEngine::new()))
    }

    /// Creates a manager with a custom template engine.
    pub fn with_engine(config: TemplateManagerConfig, engine: Box<dyn TemplateEngine>) -> Self {
        let global_data = config.data.clone();
        Self {
            config,
            global_data,
            helpers: BTreeMap::new(),
            engine,
            loaded: BTreeMap::new(),
            configured: false,
        }
    }

    /// Sets the directory logical names are resolved against.
    pub fn set_template_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.config.template_dir = path.into();
        self
    }

    /// Sets the file suffix appended to logical names. A leading dot is ignored.
    pub fn set_file_extension(&mut self, ext: impl Into<String>) -> &mut Self {
        let ext = ext.into();
        self.config.extension = ext.strip_prefix('.').unwrap_or(&ext).to_string();
        self
    }

    /// Sets the expression delimiters for templates loaded from now on.
    ///
    /// # Errors
    ///
    /// Delimiters are a parse-time property: once loading has started they are
    /// locked and this returns [`TemplateError::DelimitersLocked`]. A pair the
    /// engine cannot parse with (empty, containing whitespace, or clashing
    /// with the block and comment markers) returns
    /// [`TemplateError::InvalidDelimiters`].
    pub fn set_delimiters(
        &mut self,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Result<&mut Self> {
        if self.configured {
            return Err(TemplateError::DelimitersLocked);
        }
        let delimiters = Delimiters::new(left, right);
        syntax_for(&delimiters)?;
        self.config.delimiters = delimiters;
        Ok(self)
    }

    /// Registers a helper callable from templates as `name(...)`.
    ///
    /// Helpers are looked up when a template runs, so a template calling an
    /// unregistered helper fails at render time with an error naming it.
    pub fn add_func(&mut self, name: impl Into<String>, func: HelperFn) -> &mut Self {
        let name = name.into();
        if self.configured {
            self.engine.add_function(&name, func.clone());
        }
        self.helpers.insert(name, func);
        self
    }

    /// Designates the layout template, loaded first and executed by [`execute`](Self::execute).
    pub fn set_layout(&mut self, name: impl Into<String>) -> &mut Self {
        self.config.layout = Some(name.into());
        self
    }

    /// Sets one global data entry, replacing any previous value for `key`.
    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.global_data.insert(key.into(), value.into());
        self
    }

    /// Sets the prefix joined by `baseurl`, including in loaded templates.
    pub fn set_base_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.config.base_url = url.into();
        if self.configured {
            self.register_url_helpers();
        }
        self
    }

    /// Sets the prefix joined by `staticurl`, including in loaded templates.
    pub fn set_static_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.config.static_url = url.into();
        if self.configured {
            self.register_url_helpers();
        }
        self
    }

    /// Joins `uri` onto the base URL. Exposed to templates as `baseurl`.
    pub fn base_url(&self, uri: &str) -> String {
        join_url(&self.config.base_url, uri)
    }

    /// Joins `uri` onto the static-asset URL. Exposed to templates as `staticurl`.
    pub fn static_url(&self, uri: &str) -> String {
        join_url(&self.config.static_url, uri)
    }

    /// The current configuration.
    pub fn config(&self) -> &TemplateManagerConfig {
        &self.config
    }

    /// Global data merged into every render.
    pub fn global_data(&self) -> &GlobalData {
        &self.global_data
    }

    /// Resolves a logical name to its file path.
    pub fn template_path(&self, name: &str) -> PathBuf {
        self.config.template_path(name)
    }

    /// Names of all registered templates, including [`ROOT_TEMPLATE`] once
    /// the layout is loaded.
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.loaded.keys().map(String::as_str)
    }

    /// Whether a template is registered under `name`.
    pub fn has_template(&self, name: &str) -> bool {
        self.engine.has_template(name)
    }

    /// The static fallback page.
    pub fn error_template(&self) -> ErrorTemplate {
        ErrorTemplate::new()
    }

    /// Loads the layout (if configured and not loaded yet) and the named templates.
    ///
    /// Each name resolves to `{template_dir}/{name}.{extension}` and is
    /// registered under the logical name. Names are loaded in order; a later
    /// name may replace an earlier one. While a layout is set, [`ROOT_TEMPLATE`]
    /// belongs to it and cannot be loaded by name.
    ///
    /// # Errors
    ///
    /// [`TemplateError::FileRead`] or [`TemplateError::Parse`] for the first
    /// failing file, [`TemplateError::ReservedName`] for a name that would
    /// replace the layout. The whole call is rolled back in either case.
    pub fn add_templates<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_configured()?;

        let mut journal = Vec::new();
        let result = self.load_all(names, &mut journal);
        if let Err(err) = &result {
            warn!(error = %err, rolled_back = journal.len(), "template load failed");
            self.roll_back(journal);
        }
        result
    }

    /// Executes the layout against global data merged with `data`.
    pub fn execute<W, S>(&self, out: W, data: &S) -> Result<()>
    where
        W: io::Write,
        S: Serialize + ?Sized,
    {
        self.execute_named(out, ROOT_TEMPLATE, data)
    }

    /// Executes a loaded template against global data merged with `data`.
    ///
    /// Data is serialized and merged before anything is written. Failures in
    /// the middle of execution may leave partial output in `out`; they are
    /// returned, not hidden.
    pub fn execute_named<W, S>(&self, mut out: W, name: &str, data: &S) -> Result<()>
    where
        W: io::Write,
        S: Serialize + ?Sized,
    {
        if !self.engine.has_template(name) {
            return Err(TemplateError::NotFound {
                name: name.to_string(),
            });
        }
        let context = merge_data(&self.global_data, &to_render_data(data)?);
        debug!(template = name, keys = context.len(), "rendering template");
        self.engine.render_named(name, &context, &mut out)?;
        out.flush().map_err(TemplateError::Write)
    }

    /// Renders a loaded template to a string.
    pub fn render<S: Serialize + ?Sized>(&self, name: &str, data: &S) -> Result<String> {
        let mut out = Vec::new();
        self.execute_named(&mut out, name, data)?;
        String::from_utf8(out).map_err(|e| TemplateError::Data(e.to_string()))
    }

    fn ensure_configured(&mut self) -> Result<()> {
        if self.configured {
            return Ok(());
        }
        self.engine.configure(&EngineOptions {
            delimiters: self.config.delimiters.clone(),
            extension: self.config.extension.clone(),
        })?;
        self.configured = true;
        self.register_url_helpers();
        for (name, func) in &self.helpers {
            self.engine.add_function(name, func.clone());
        }
        debug!(
            delimiters = ?self.config.delimiters,
            extension = %self.config.extension,
            helpers = self.helpers.len(),
            "template engine configured"
        );
        Ok(())
    }

    fn register_url_helpers(&mut self) {
        self.engine.add_function(
            BASE_URL_HELPER,
            url_helper(BASE_URL_HELPER, self.config.base_url.clone()),
        );
        self.engine.add_function(
            STATIC_URL_HELPER,
            url_helper(STATIC_URL_HELPER, self.config.static_url.clone()),
        );
    }

    fn load_all<I, S>(&mut self, names: I, journal: &mut Journal) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(layout) = self.config.layout.clone() {
            let current = self.loaded.get(ROOT_TEMPLATE).map(|t| t.logical.as_str());
            if current != Some(layout.as_str()) {
                self.load_one(ROOT_TEMPLATE, &layout, journal)?;
            }
        }
        for name in names {
            let name = name.as_ref();
            if name == ROOT_TEMPLATE && self.config.layout.is_some() {
                return Err(TemplateError::ReservedName {
                    name: name.to_string(),
                });
            }
            self.load_one(name, name, journal)?;
        }
        Ok(())
    }

    fn load_one(
        &mut self,
        register_as: &str,
        logical: &str,
        journal: &mut Journal,
    ) -> Result<()> {
        let path = self.template_path(logical);
        let source = read_template(logical, &path)?;

        journal.push((register_as.to_string(), self.loaded.get(register_as).cloned()));
        self.engine.add_template(register_as, &source)?;
        debug!(template = register_as, path = %path.display(), "loaded template");

        self.loaded.insert(
            register_as.to_string(),
            LoadedTemplate {
                logical: logical.to_string(),
                path,
                source,
            },
        );
        Ok(())
    }

    fn roll_back(&mut self, journal: Journal) {
        for (name, previous) in journal.into_iter().rev() {
            match previous {
                Some(template) => {
                    if let Err(err) = self.engine.add_template(&name, &template.source) {
                        warn!(template = %name, error = %err, "could not restore template");
                        self.loaded.remove(&name);
                        continue;
                    }
                    self.loaded.insert(name, template);
                }
                None => {
                    self.engine.remove_template(&name);
                    self.loaded.remove(&name);
                }
            }
        }
    }
}

fn read_template(name: &str, path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| TemplateError::FileRead {
        name: name.to_string(),
        path: path.to_path_buf(),
        source,
    })
}

impl fmt::Debug for TemplateManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateManager")
            .field("config", &self.config)
            .field("global_data", &self.global_data)
            .field("helpers", &self.helpers.keys().collect::<Vec<_>>())
            .field(
                "templates",
                &self
                    .loaded
                    .iter()
                    .map(|(name, t)| (name.as_str(), t.path.as_path()))
                    .collect::<Vec<_>>(),
            )
            .field("configured", &self.configured)
            .finish()
    }
}
