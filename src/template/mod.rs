//! Text templates for page bodies.
//!
//! Thin wrapper over `handlebars` with the console's built-in templates
//! registered up front. Output goes to a terminal, so HTML escaping is off.

use handlebars::{
    no_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext,
};
use serde::Serialize;
use thiserror::Error;

const HOME: &str = "\
{{welcome}}

{{modules_title}}
{{#each modules}}
  F{{key}}  {{title}}  {{route}}
{{/each}}

{{help_keys}}
{{help_commands}}";

const SALE_DETAIL: &str = "\
{{labels.customer}}: {{sale.customer}}
{{labels.total}}: {{money sale.total}}
{{labels.payment}}: {{money sale.total_payment}}
{{labels.payment_type}}: {{sale.payment_type}}
{{labels.created}}: {{sale.created}}
{{#if sale.note}}

{{sale.note}}
{{/if}}
{{#if sale.detail}}

{{#each sale.detail}}
  {{qty}} x {{title}}  {{money price}}
{{/each}}
{{/if}}";

const ABOUT: &str = "\
{{name}} {{version}}

API:     {{base_url}}
Config:  {{config_path}}
Route:   {{default_route}} (default)
Page:    {{page_length}} rows";

/// Two-decimal amount. Numeric strings are accepted, other values pass
/// through as-is and missing ones render empty.
fn money(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let Some(value) = h.param(0).map(|p| p.value()) else {
        return Ok(());
    };
    let amount = value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()));
    match (amount, value.as_str()) {
        (Some(amount), _) => out.write(&format!("{:.2}", amount))?,
        (None, Some(raw)) => out.write(raw)?,
        (None, None) => {}
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template '{name}' failed to compile: {reason}")]
    Compile { name: String, reason: String },
    #[error("template '{name}' failed to render: {reason}")]
    Render { name: String, reason: String },
}

pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, TemplateError> {
        let mut templates = Self::empty();
        for (name, source) in [("home", HOME), ("sale_detail", SALE_DETAIL), ("about", ABOUT)] {
            templates.register(name, source)?;
        }
        Ok(templates)
    }

    pub fn empty() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);
        registry.register_helper("money", Box::new(money));
        Self { registry }
    }

    pub fn register(&mut self, name: &str, source: &str) -> Result<(), TemplateError> {
        self.registry
            .register_template_string(name, source)
            .map_err(|e| TemplateError::Compile {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, TemplateError> {
        self.registry
            .render(name, data)
            .map_err(|e| TemplateError::Render {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn has(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }
}
