//! Email body rendering for dispatched notifications.

use minijinja::Environment;
use serde_json::{Map, Value};
use thiserror::Error;

/// Plain-text body sent alongside an in-app notification.
const NOTIFICATION_EMAIL_TEMPLATE: &str = "\
Hello {{ name }},

{{ message }}
{% if link %}
View the task: {{ link }}
{% endif %}
Task Management";

/// Error raised when a template fails to render.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("email template render failed: {0}")]
pub struct TemplateError(pub String);

/// Renders the notification email body for one recipient.
///
/// # Errors
///
/// Returns [`TemplateError`] when the template engine rejects the context.
pub fn render_notification_email(
    name: &str,
    message: &str,
    link: Option<&str>,
) -> Result<String, TemplateError> {
    let environment = Environment::new();
    let mut context = Map::new();
    context.insert("name".to_owned(), Value::String(name.to_owned()));
    context.insert("message".to_owned(), Value::String(message.to_owned()));
    context.insert(
        "link".to_owned(),
        link.map_or(Value::Null, |value| Value::String(value.to_owned())),
    );

    environment
        .render_str(NOTIFICATION_EMAIL_TEMPLATE, context)
        .map_err(|error| TemplateError(error.to_string()))
}
