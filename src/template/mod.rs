//! Request body templating.
//!
//! Bodies are rendered with minijinja when a descriptor carries body
//! variables. Templates use `{{ name }}` for substitution and support the
//! usual control flow (`{% if %}`, `{% for %}`), the built-in filters
//! (`upper`, `lower`, `trim`, `replace`, `default`, `tojson`, `urlencode`,
//! ...) and the helpers registered in [`functions`].
//!
//! Undefined variables render as the empty string. Output is never
//! HTML-escaped.
//!
//! # Examples
//!
//! ```
//! use requester::template::render_body;
//! use std::collections::HashMap;
//!
//! let vars = HashMap::from([("name".to_string(), "ann".to_string())]);
//! let body = render_body(r#"{"name": "{{ name | upper }}"}"#, &vars).unwrap();
//! assert_eq!(body, r#"{"name": "ANN"}"#);
//! ```

pub mod functions;

use minijinja::{AutoEscape, Environment};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Shared template environment with all helpers registered.
static TEMPLATE_ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    functions::register(&mut env);
    env
});

/// Renders `template` with `variables` as the top-level namespace.
///
/// # Errors
///
/// Returns the engine error for syntax errors and for helpers that fail
/// (for example `b64dec` on invalid input).
pub fn render_body(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, minijinja::Error> {
    TEMPLATE_ENV.render_str(template, variables)
}
