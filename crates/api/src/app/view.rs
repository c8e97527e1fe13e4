//! Views and their HTML rendering.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::app::flash::Flash;

pub const PRODUCT_INDEX: &str = "product/index";
pub const PRODUCT_CREATE: &str = "product/create";
pub const PRODUCT_EDIT: &str = "product/edit";
pub const PRODUCT_DISABLED: &str = "product/disabled";
pub const PRODUCT_MISSING_ASSOCIATION: &str = "product/missing_association";

const KNOWN_TEMPLATES: &[&str] = &[
    PRODUCT_INDEX,
    PRODUCT_CREATE,
    PRODUCT_EDIT,
    PRODUCT_DISABLED,
    PRODUCT_MISSING_ASSOCIATION,
];

/// A template name plus its parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub template: &'static str,
    pub params: Value,
    /// Filled in from the flash store right before rendering.
    pub flashes: Vec<Flash>,
}

impl View {
    pub fn new(template: &'static str, params: Value) -> Self {
        Self {
            template,
            params,
            flashes: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("failed to serialize view parameters: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub trait TemplateRenderer: Send + Sync {
    fn render(&self, view: &View) -> Result<String, RenderError>;
}

/// Minimal HTML shell: the template name on `<body data-template>`, the
/// flashes as a list and the parameters as embedded JSON for the front end.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl TemplateRenderer for HtmlRenderer {
    fn render(&self, view: &View) -> Result<String, RenderError> {
        if !KNOWN_TEMPLATES.contains(&view.template) {
            return Err(RenderError::UnknownTemplate(view.template.to_string()));
        }

        let flashes: String = view
            .flashes
            .iter()
            .map(|f| {
                let kind = serde_json::to_value(f.kind)?;
                Ok(format!(
                    "<li class=\"flash flash-{}\">{}</li>",
                    kind.as_str().unwrap_or("info"),
                    escape_html(&f.message)
                ))
            })
            .collect::<Result<_, serde_json::Error>>()?;

        // `</` would close the script element early.
        let params = serde_json::to_string(&view.params)?.replace("</", "<\\/");

        Ok(format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
             <body data-template=\"{title}\">\n<ul class=\"flashes\">{flashes}</ul>\n\
             <script type=\"application/json\" id=\"view-params\">{params}</script>\n</body>\n</html>\n",
            title = escape_html(view.template),
        ))
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
