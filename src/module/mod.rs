//! Screen modules and the registry the loader resolves them from.

pub mod about;
pub mod home;
pub mod sales;

use crate::app::event::RequestId;
use crate::config::AppConfig;
use crate::http::{ApiSuccess, Http, HttpError};
use crate::language::Language;
use crate::loader::{LoadError, Route};
use crate::nav::Navigator;
use crate::notify::Notify;
use crate::tablegrid::TableGrid;
use crate::template::Templates;
use crate::view::{Page, View};
use std::rc::Rc;

/// Everything a module may touch while loading or handling a response.
pub struct ModuleContext<'a> {
    /// Settings in force for this load.
    pub config: &'a AppConfig,
    pub navigator: &'a Navigator,
    pub modules: &'a ModuleRegistry,
    pub view: &'a View,
    pub grid: &'a TableGrid,
    pub http: &'a Http,
    pub notify: &'a Notify,
    pub language: &'a Language,
    pub templates: &'a Templates,
}

pub trait Module {
    /// First route segment, lowercase.
    fn name(&self) -> &str;

    /// Language key for the sidebar label.
    fn title_key(&self) -> &str;

    fn load(&self, route: &Route, ctx: &ModuleContext) -> Result<Page, LoadError>;

    fn on_response(
        &self,
        _route: &Route,
        _id: RequestId,
        _result: Result<ApiSuccess, HttpError>,
        _ctx: &ModuleContext,
    ) -> Result<(), LoadError> {
        Ok(())
    }
}

/// Modules in registration order.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Vec<Rc<dyn Module>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `module`, replacing any module with the same name in place.
    pub fn register(&mut self, module: Rc<dyn Module>) {
        match self.modules.iter().position(|m| m.name() == module.name()) {
            Some(i) => self.modules[i] = module,
            None => self.modules.push(module),
        }
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn Module>> {
        self.modules
            .iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.name().to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<dyn Module>> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Route that opens the `index`-th module (0-based).
    pub fn route_of(&self, index: usize) -> Option<String> {
        self.modules.get(index).map(|m| format!("#/{}", m.name()))
    }
}

/// Owned subsystems for driving a module directly in tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    pub struct Fixture {
        pub config: AppConfig,
        pub navigator: Navigator,
        pub modules: ModuleRegistry,
        pub view: View,
        pub grid: TableGrid,
        pub http: Http,
        pub notify: Notify,
        pub language: Language,
        pub templates: Templates,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self::with_modules(ModuleRegistry::new())
        }

        pub fn with_modules(modules: ModuleRegistry) -> Self {
            let config = AppConfig::default();
            Self {
                navigator: Navigator::new(""),
                modules,
                view: View::new(),
                grid: TableGrid::new(config.ui.page_length),
                http: Http::new(&config.api).unwrap(),
                notify: Notify::new(config.ui.toast_ticks),
                language: Language::english(),
                templates: Templates::new().unwrap(),
                config,
            }
        }

        pub fn ctx(&self) -> ModuleContext<'_> {
            ModuleContext {
                config: &self.config,
                navigator: &self.navigator,
                modules: &self.modules,
                view: &self.view,
                grid: &self.grid,
                http: &self.http,
                notify: &self.notify,
                language: &self.language,
                templates: &self.templates,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str, &'static str);

    impl Module for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn title_key(&self) -> &str {
            self.1
        }

        fn load(&self, _route: &Route, _ctx: &ModuleContext) -> Result<Page, LoadError> {
            Ok(Page::new(self.1))
        }
    }

    #[test]
    fn test_register_keeps_order_and_replaces_in_place() {
        let mut registry = ModuleRegistry::new();
        registry.register(Rc::new(Named("home", "first")));
        registry.register(Rc::new(Named("sales", "sales")));
        registry.register(Rc::new(Named("home", "second")));

        assert_eq!(registry.names(), vec!["home", "sales"]);
        assert_eq!(registry.get("home").unwrap().title_key(), "second");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_lookup_and_routes() {
        let mut registry = ModuleRegistry::new();
        assert!(registry.is_empty());
        registry.register(Rc::new(Named("sales", "sales")));
        assert!(registry.get("SALES").is_some());
        assert!(registry.get("nope").is_none());
        assert_eq!(registry.route_of(0).as_deref(), Some("#/sales"));
        assert_eq!(registry.route_of(1), None);
    }
}
