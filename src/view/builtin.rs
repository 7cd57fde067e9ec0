//! Built-in views

use async_trait::async_trait;
use maud::html;

use super::{Markup, View, ViewContext, ViewError, ViewResult};

/// Escape text for insertion into markup (`&`, `<`, `>` and `"`)
pub fn escape_html(text: &str) -> String {
    html! { (text) }.into_string()
}

/// Mounted when no route matches and no custom not-found view was given
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPageNotFound;

#[async_trait]
impl View for DefaultPageNotFound {
    async fn render(&self, ctx: &ViewContext) -> ViewResult<Markup> {
        let path = ctx.param("path").unwrap_or_default();
        let page = html! {
            title { "Page Not Found" }
            p { "The page " (path) " could not be found." }
        };
        Ok(Markup::from(page.into_string()))
    }
}

/// Renders a fixed template, substituting `{name}` with route parameters.
///
/// Parameter values are HTML-escaped. Placeholders without a matching
/// parameter render as empty text.
#[derive(Debug, Clone)]
pub struct TemplateView {
    template: String,
}

impl TemplateView {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

#[async_trait]
impl View for TemplateView {
    async fn render(&self, ctx: &ViewContext) -> ViewResult<Markup> {
        let re = regex::Regex::new(r"\{(\w+)\}")
            .map_err(|e| ViewError::Render(format!("template pattern: {}", e)))?;

        let rendered = re.replace_all(&self.template, |caps: &regex::Captures<'_>| {
            escape_html(ctx.param(&caps[1]).unwrap_or_default())
        });

        Ok(Markup::from(rendered.into_owned()))
    }
}
