//! MiniJinja template engine wrapper

use minijinja::{Environment, Error, ErrorKind, Value};
use pulldown_cmark::{html, Event, Options, Parser};

pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new() -> Result<Self, Error> {
        let mut env = Environment::new();

        // Configure MiniJinja
        env.set_debug(cfg!(debug_assertions));

        // Templates are compiled into the binary
        env.add_template("chat.html", include_str!("../../web/templates/chat.html"))?;
        env.add_template(
            "components/turn.html",
            include_str!("../../web/templates/components/turn.html"),
        )?;
        env.add_template(
            "components/notice.html",
            include_str!("../../web/templates/components/notice.html"),
        )?;

        // Add custom filters
        env.add_filter("markdown", markdown_filter);
        env.add_filter("datetime", format_datetime);

        Ok(Self { env })
    }

    /// Render a template with context
    pub fn render<S: serde::Serialize>(&self, template_name: &str, ctx: S) -> Result<String, Error> {
        let template = self.env.get_template(template_name)?;
        template.render(ctx)
    }
}

/// Convert markdown to HTML, escaping any raw HTML in the source
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH)
        .map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

// Filter functions
fn markdown_filter(value: &str) -> Value {
    Value::from_safe_string(markdown_to_html(value))
}

fn format_datetime(value: &str) -> Result<String, Error> {
    let dt = chrono::DateTime::parse_from_rfc3339(value)
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, format!("invalid timestamp: {}", e)))?;
    Ok(dt.format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_markdown_escapes_raw_html() {
        let html = markdown_to_html("**bold** <script>alert(1)</script>");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_markdown_code_block() {
        let html = markdown_to_html("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre><code class=\"language-rust\">"));
    }

    #[test]
    fn test_notice_template() {
        let engine = TemplateEngine::new().unwrap();
        let html = engine
            .render(
                "components/notice.html",
                context! { kind => "success", text => "Chat history cleared!", clear_transcript => true },
            )
            .unwrap();
        assert!(html.contains("Chat history cleared!"));
        assert!(html.contains("hx-swap-oob=\"innerHTML\""));
    }

    #[test]
    fn test_datetime_filter() {
        assert_eq!(format_datetime("2024-05-01T13:45:10Z").unwrap(), "13:45");
        assert!(format_datetime("yesterday").is_err());
    }
}
