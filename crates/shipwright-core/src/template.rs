//! `${path}` string templates
//!
//! Templates are plain strings containing `${dotted.path}` placeholders. Each
//! placeholder is looked up in a JSON data context; missing or null values
//! render as an empty string. Nothing inside a placeholder is evaluated
//! beyond the path lookup.

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::TemplateError;

const OPEN: &str = "${";
const CLOSE: char = '}';

/// Render `template` against `context`
pub fn render(template: &str, context: &Value) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        output.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];

        match after.find(CLOSE) {
            Some(end) => {
                let path = after[..end].trim();
                if let Some(value) = lookup(context, path) {
                    push_value(&mut output, value);
                } else {
                    trace!(path, "template placeholder unresolved");
                }
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated placeholder stays literal
                output.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    output.push_str(rest);
    output
}

/// Render a template taken from configuration.
///
/// Configuration keeps templates as raw values so that a misconfigured,
/// non-string template surfaces here as an error instead of being replaced by
/// a default.
pub fn render_value(name: &str, template: &Value, context: &Value) -> Result<String, TemplateError> {
    let source = template_str(name, template)?;
    Ok(render(source, context))
}

/// Borrow the string inside a raw template value
pub fn template_str<'a>(name: &str, template: &'a Value) -> Result<&'a str, TemplateError> {
    template.as_str().ok_or_else(|| TemplateError::NotAString {
        name: name.to_string(),
        found: type_name(template),
    })
}

/// Resolve a dotted path such as `commitlint.scope` or `packages.0.name`
pub fn lookup<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    path.split('.').try_fold(context, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn push_value(output: &mut String, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => output.push_str(s),
        Value::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => output.push_str(&n.to_string()),
        Value::Array(_) | Value::Object(_) => output.push_str(&value.to_string()),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Builder for the flat variable maps handed to [`render`]
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    vars: Map<String, Value>,
}

impl TemplateContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Copy every entry of `extra`, overriding existing keys
    pub fn extend(mut self, extra: &Map<String, Value>) -> Self {
        for (key, value) in extra {
            self.vars.insert(key.clone(), value.clone());
        }
        self
    }

    /// Finish into a JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_simple() {
        let ctx = json!({"name": "ui", "version": "1.0.0"});
        assert_eq!(render("${name}@${version}", &ctx), "ui@1.0.0");
    }

    #[test]
    fn test_render_dotted_path() {
        let ctx = json!({"commitlint": {"message": "add x", "scope": null}});
        assert_eq!(render("- ${commitlint.message}", &ctx), "- add x");
        assert_eq!(render("[${commitlint.scope}]", &ctx), "[]");
    }

    #[test]
    fn test_missing_path_renders_empty() {
        let ctx = json!({"a": {"b": 1}});
        assert_eq!(render("x${a.c}y${nope}z${a.b.c}", &ctx), "xyz");
    }

    #[test]
    fn test_numbers_and_arrays() {
        let ctx = json!({"length": 3, "items": ["a", "b"], "flag": true});
        assert_eq!(render("${length}-${items.1}-${flag}", &ctx), "3-b-true");
        assert_eq!(render("${items}", &ctx), r#"["a","b"]"#);
    }

    #[test]
    fn test_unterminated_placeholder_kept() {
        let ctx = json!({"a": "1"});
        assert_eq!(render("${a} and ${b", &ctx), "1 and ${b");
    }

    #[test]
    fn test_whitespace_inside_placeholder() {
        let ctx = json!({"a": "1"});
        assert_eq!(render("${ a }", &ctx), "1");
    }

    #[test]
    fn test_no_expression_evaluation() {
        let ctx = json!({"a": 1});
        assert_eq!(render("${a + 1}", &ctx), "");
    }

    #[test]
    fn test_render_value_rejects_non_string() {
        let ctx = json!({});
        let err = render_value("branch", &json!(42), &ctx).unwrap_err();
        assert!(matches!(
            err,
            TemplateError::NotAString { ref name, found: "a number" } if name == "branch"
        ));
        assert_eq!(render_value("branch", &json!("b"), &ctx).unwrap(), "b");
    }

    #[test]
    fn test_context_extend_overrides() {
        let mut shared = Map::new();
        shared.insert("tagName".to_string(), json!("override"));
        shared.insert("team".to_string(), json!("web"));

        let ctx = TemplateContext::new()
            .with("tagName", "v1")
            .extend(&shared)
            .into_value();

        assert_eq!(render("${tagName}/${team}", &ctx), "override/web");
    }
}
