//! A small placeholder-substituting view renderer.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::application::Application;
use crate::error::ViewError;
use crate::view::{ViewItems, ViewRenderer};

/// Default extension handled by [`TemplateRenderer`].
pub const DEFAULT_TEMPLATE_EXTENSION: &str = "tpl";

/// Renders `{{ placeholder }}` templates.
///
/// | Placeholder | Value |
/// |-------------|-------|
/// | `{{ model }}` | the whole model |
/// | `{{ model.a.b }}` | a path into the model; numeric parts index arrays |
/// | `{{ items.key }}` | a view item, optionally followed by a path |
/// | `{{ name }}` | the model field `name`, else the view item `name` |
///
/// Strings are HTML-escaped; numbers and booleans are written as-is,
/// arrays and objects as escaped JSON, and missing values as nothing.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    extension: String,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a renderer for `.tpl` files.
    #[must_use]
    pub fn new() -> Self {
        Self::with_extension(DEFAULT_TEMPLATE_EXTENSION)
    }

    /// Creates a renderer for files with `extension`.
    #[must_use]
    pub fn with_extension(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Substitutes placeholders in `template`.
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    /// use vireo_mvc::{TemplateRenderer, ViewItems};
    ///
    /// let mut items = ViewItems::new();
    /// items.set("site", "Vireo");
    ///
    /// let text = TemplateRenderer::new()
    ///     .render_str("{{ site }}: {{ model.user.name }} <{{ missing }}>", &json!({"user": {"name": "Ada"}}), &items)
    ///     .unwrap();
    /// assert_eq!(text, "Vireo: Ada <>");
    /// ```
    pub fn render_str(
        &self,
        template: &str,
        model: &Value,
        view_items: &ViewItems,
    ) -> Result<String, ViewError> {
        let placeholder = placeholder_pattern()
            .ok_or_else(|| ViewError::render("<template>", "placeholder pattern unavailable"))?;
        let items = serde_json::to_value(view_items)
            .map_err(|e| ViewError::render("<template>", e.to_string()))?;

        let rendered = placeholder.replace_all(template, |caps: &Captures<'_>| {
            lookup(&caps[1], model, &items).map(format_value).unwrap_or_default()
        });
        Ok(rendered.into_owned())
    }
}

impl ViewRenderer for TemplateRenderer {
    fn view_file_extension(&self) -> &str {
        &self.extension
    }

    fn render_view(
        &self,
        _application: &Application,
        views_dir: &Path,
        view_file: &Path,
        model: &Value,
        view_items: &ViewItems,
    ) -> Result<String, ViewError> {
        let path = views_dir.join(view_file);
        let template = fs::read_to_string(&path).map_err(|source| ViewError::Io {
            file: path.clone(),
            source,
        })?;
        self.render_str(&template, model, view_items)
            .map_err(|e| match e {
                ViewError::Render { reason, .. } => ViewError::render(path, reason),
                other => other,
            })
    }
}

fn placeholder_pattern() -> Option<&'static Regex> {
    static PLACEHOLDER: OnceLock<Option<Regex>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").ok())
        .as_ref()
}

fn lookup<'v>(path: &str, model: &'v Value, items: &'v Value) -> Option<&'v Value> {
    let mut parts = path.split('.');
    let head = parts.next()?;
    let root = match head {
        "model" => model,
        "items" => items,
        name => model.get(name).or_else(|| items.get(name))?,
    };
    parts.try_fold(root, |value, part| match value {
        Value::Object(map) => map.get(part),
        Value::Array(list) => part.parse::<usize>().ok().and_then(|i| list.get(i)),
        _ => None,
    })
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => escape_html(s),
        other => escape_html(&other.to_string()),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
