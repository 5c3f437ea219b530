//! Version and connection facts.

use super::{Module, ModuleContext};
use crate::loader::{LoadError, Route};
use crate::view::Page;
use serde::Serialize;
use serde_json::json;

/// Facts fixed at build time. Everything configurable is read from the
/// context on each load.
#[derive(Debug, Clone, Serialize)]
pub struct AboutInfo {
    pub name: String,
    pub version: String,
    pub config_path: String,
}

pub struct AboutModule {
    info: AboutInfo,
}

impl AboutModule {
    pub fn new(info: AboutInfo) -> Self {
        Self { info }
    }
}

impl Module for AboutModule {
    fn name(&self) -> &str {
        "about"
    }

    fn title_key(&self) -> &str {
        "module.about"
    }

    fn load(&self, route: &Route, ctx: &ModuleContext) -> Result<Page, LoadError> {
        if route.action != "index" {
            return Err(LoadError::ActionNotFound {
                module: self.name().to_string(),
                action: route.action.clone(),
            });
        }

        let body = ctx.templates.render(
            "about",
            &json!({
                "name": self.info.name,
                "version": self.info.version,
                "config_path": self.info.config_path,
                "base_url": ctx.config.api.base_url,
                "default_route": ctx.config.ui.default_route,
                "page_length": ctx.config.ui.page_length,
            }),
        )?;
        Ok(Page::new(ctx.language.get("module.about")).text(body))
    }
}
