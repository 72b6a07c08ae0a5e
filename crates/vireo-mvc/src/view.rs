//! Views and view renderers.
//!
//! An action that returns a [`View`] has its content produced by the first
//! registered [`ViewRenderer`] whose extension matches an existing file at
//! `<view path>/<controller name>/<view name>.<extension>`.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use vireo_core::ContentEncodingError;

use crate::application::Application;
use crate::error::ViewError;

/// A model to render, optionally with an explicit view file name.
///
/// Without a file name the view is named after the action.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct View {
    model: Value,
    file: Option<String>,
}

impl View {
    /// Creates a view over `model`.
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    /// use vireo_mvc::View;
    ///
    /// let view = View::new(json!({"title": "Home"})).with_file("landing");
    /// assert_eq!(view.model()["title"], "Home");
    /// assert_eq!(view.file(), Some("landing"));
    /// ```
    #[must_use]
    pub fn new(model: impl Into<Value>) -> Self {
        Self {
            model: model.into(),
            file: None,
        }
    }

    /// Creates a view without a model.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a view over any serializable model.
    ///
    /// # Errors
    ///
    /// Returns [`ContentEncodingError`] if the model cannot be serialized.
    pub fn from_serialize<T: Serialize + ?Sized>(model: &T) -> Result<Self, ContentEncodingError> {
        Ok(Self::new(serde_json::to_value(model)?))
    }

    /// Renders `file` instead of the action's own view.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Returns the model.
    #[must_use]
    pub const fn model(&self) -> &Value {
        &self.model
    }

    /// Returns the explicit view file name, if any.
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}

/// Per-request values made available to views next to the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ViewItems(IndexMap<String, Value>);

impl ViewItems {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an item, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Returns an item.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Removes an item, returning it.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.shift_remove(name)
    }

    /// Iterates items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Renders view files of one extension.
pub trait ViewRenderer: Send + Sync {
    /// Extension of the files this renderer handles, without the dot.
    fn view_file_extension(&self) -> &str;

    /// Renders `view_file` (relative to `views_dir`) with `model` and
    /// `view_items`.
    fn render_view(
        &self,
        application: &Application,
        views_dir: &Path,
        view_file: &Path,
        model: &Value,
        view_items: &ViewItems,
    ) -> Result<String, ViewError>;
}

impl fmt::Debug for dyn ViewRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRenderer")
            .field("extension", &self.view_file_extension())
            .finish()
    }
}

/// Renders `view` for `controller`/`action` with the application's
/// renderers, in registration order.
pub(crate) fn render(
    application: &Application,
    controller: &str,
    action: &str,
    view: &View,
    view_items: &ViewItems,
) -> Result<String, ViewError> {
    let renderers = application.view_renderers();
    if renderers.is_empty() {
        return Err(ViewError::NoRenderers);
    }

    let name = view.file().unwrap_or(action);
    let views_dir = application.view_path();

    for renderer in renderers {
        let view_file: PathBuf = Path::new(controller)
            .join(format!("{name}.{}", renderer.view_file_extension()));
        if views_dir.join(&view_file).is_file() {
            debug!(view = %view_file.display(), "rendering view");
            return renderer.render_view(application, views_dir, &view_file, view.model(), view_items);
        }
    }

    Err(ViewError::ViewFileNotFound {
        controller: controller.to_string(),
        action: name.to_string(),
    })
}
