//! Landing page: greeting, module list and key help.

use super::{Module, ModuleContext};
use crate::loader::{LoadError, Route};
use crate::view::Page;
use serde_json::json;

pub struct HomeModule;

impl Module for HomeModule {
    fn name(&self) -> &str {
        "home"
    }

    fn title_key(&self) -> &str {
        "module.home"
    }

    fn load(&self, route: &Route, ctx: &ModuleContext) -> Result<Page, LoadError> {
        if route.action != "index" {
            return Err(LoadError::ActionNotFound {
                module: self.name().to_string(),
                action: route.action.clone(),
            });
        }

        let lang = ctx.language;
        let modules: Vec<_> = ctx
            .modules
            .iter()
            .enumerate()
            .map(|(i, m)| {
                json!({
                    "key": i + 1,
                    "title": lang.get(m.title_key()),
                    "route": format!("#/{}", m.name()),
                })
            })
            .collect();

        let body = ctx.templates.render(
            "home",
            &json!({
                "welcome": lang.get("app.welcome"),
                "modules_title": lang.get("nav.modules"),
                "modules": modules,
                "help_keys": lang.get("help.keys"),
                "help_commands": lang.get("help.commands"),
            }),
        )?;

        Ok(Page::new(lang.get("module.home")).text(body))
    }
}
