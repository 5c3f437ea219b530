//! Resolves the current location to a module and puts its page on screen.

pub mod route;

use crate::app::event::RequestId;
use crate::config::{AppConfig, SharedConfig};
use crate::http::{ApiSuccess, Http, HttpError};
use crate::language::Language;
use crate::module::{ModuleContext, ModuleRegistry};
use crate::nav::Navigator;
use crate::notify::Notify;
use crate::tablegrid::TableGrid;
use crate::template::{TemplateError, Templates};
use crate::view::{Page, View};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

pub use route::Route;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no route to load and no default route configured")]
    NoRoute,
    #[error("module '{0}' not found")]
    ModuleNotFound(String),
    #[error("module '{module}' has no action '{action}'")]
    ActionNotFound { module: String, action: String },
    #[error("invalid {name} '{value}'")]
    InvalidParam { name: String, value: String },
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Http(#[from] HttpError),
}

/// The one call the application root makes on navigation.
pub trait RouteLoader {
    fn load(&self) -> Result<(), LoadError>;

    /// Deliver a finished HTTP request to whatever is on screen.
    fn on_response(
        &self,
        _id: RequestId,
        _result: Result<ApiSuccess, HttpError>,
    ) -> Result<(), LoadError> {
        Ok(())
    }
}

pub struct Loader {
    pub navigator: Navigator,
    pub modules: Rc<ModuleRegistry>,
    pub view: Rc<View>,
    pub grid: Rc<TableGrid>,
    pub http: Rc<Http>,
    pub notify: Rc<Notify>,
    pub language: Rc<Language>,
    pub templates: Rc<Templates>,
    pub config: SharedConfig,
    active: RefCell<Option<Route>>,
}

impl Loader {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        navigator: Navigator,
        modules: Rc<ModuleRegistry>,
        view: Rc<View>,
        grid: Rc<TableGrid>,
        http: Rc<Http>,
        notify: Rc<Notify>,
        language: Rc<Language>,
        templates: Rc<Templates>,
        config: SharedConfig,
    ) -> Self {
        Self {
            navigator,
            modules,
            view,
            grid,
            http,
            notify,
            language,
            templates,
            config,
            active: RefCell::new(None),
        }
    }

    pub fn active_route(&self) -> Option<Route> {
        self.active.borrow().clone()
    }

    fn context<'a>(&'a self, config: &'a AppConfig) -> ModuleContext<'a> {
        ModuleContext {
            config,
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

    fn resolve(&self, config: &AppConfig) -> Result<Route, LoadError> {
        let location = self.navigator.location();
        Route::parse(&location.fragment)
            .or_else(|| Route::parse(&config.ui.default_route))
            .ok_or(LoadError::NoRoute)
    }

    fn load_route(&self, route: &Route, config: &AppConfig) -> Result<Page, LoadError> {
        let module = self
            .modules
            .get(&route.module)
            .ok_or_else(|| LoadError::ModuleNotFound(route.module.clone()))?;
        let page = module.load(route, &self.context(config))?;
        Ok(page)
    }
}

impl RouteLoader for Loader {
    fn load(&self) -> Result<(), LoadError> {
        let config = self.config.get();
        let route = self.resolve(&config)?;
        tracing::info!(route = %route.fragment(), "loading route");

        *self.active.borrow_mut() = Some(route.clone());
        match self.load_route(&route, &config) {
            Ok(mut page) => {
                page.route = route.fragment();
                if !page.has_grid() {
                    self.grid.unbind();
                }
                self.view.show(page);
                Ok(())
            }
            Err(e) => {
                self.grid.unbind();
                let mut page =
                    Page::new(self.language.get("error.load_failed")).text(e.to_string());
                page.route = route.fragment();
                self.view.show(page);
                Err(e)
            }
        }
    }

    fn on_response(
        &self,
        id: RequestId,
        result: Result<ApiSuccess, HttpError>,
    ) -> Result<(), LoadError> {
        if let Ok(ok) = &result {
            self.http.set_token(ok.token.clone());
        }
        let Some(route) = self.active_route() else {
            return Ok(());
        };
        let Some(module) = self.modules.get(&route.module) else {
            return Ok(());
        };
        let config = self.config.get();
        module.on_response(&route, id, result, &self.context(&config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::ApiConfig;
    use crate::module::Module;
    use crate::view::Section;
    use std::cell::Cell;
    use std::sync::Arc;

    struct Echo {
        loads: Cell<usize>,
        responses: RefCell<Vec<RequestId>>,
    }

    impl Module for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn title_key(&self) -> &str {
            "module.echo"
        }

        fn load(&self, route: &Route, _ctx: &ModuleContext) -> Result<Page, LoadError> {
            self.loads.set(self.loads.get() + 1);
            match route.action.as_str() {
                "index" => Ok(Page::new("Echo").text(route.params.join(","))),
                "fail" => Err(LoadError::InvalidParam {
                    name: "uid".into(),
                    value: "x".into(),
                }),
                other => Err(LoadError::ActionNotFound {
                    module: "echo".into(),
                    action: other.into(),
                }),
            }
        }

        fn on_response(
            &self,
            _route: &Route,
            id: RequestId,
            _result: Result<ApiSuccess, HttpError>,
            _ctx: &ModuleContext,
        ) -> Result<(), LoadError> {
            self.responses.borrow_mut().push(id);
            Ok(())
        }
    }

    fn config_with_route(route: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.ui.default_route = route.to_string();
        config
    }

    fn loader(start: &str, default_route: &str) -> (Loader, Rc<Echo>) {
        let echo = Rc::new(Echo {
            loads: Cell::new(0),
            responses: RefCell::new(Vec::new()),
        });
        let mut modules = ModuleRegistry::new();
        modules.register(echo.clone());
        let http = Http::new(&ApiConfig::default()).unwrap();
        let loader = Loader::new(
            Navigator::new(start),
            Rc::new(modules),
            Rc::new(View::new()),
            Rc::new(TableGrid::new(25)),
            Rc::new(http),
            Rc::new(Notify::new(10)),
            Rc::new(Language::english()),
            Rc::new(Templates::new().unwrap()),
            SharedConfig::new(Arc::new(config_with_route(default_route))),
        );
        (loader, echo)
    }

    #[test]
    fn test_empty_location_uses_default_route() {
        let (loader, echo) = loader("", "#/echo");
        loader.load().unwrap();
        assert_eq!(echo.loads.get(), 1);
        assert_eq!(loader.view.current().route, "#/echo");
        assert_eq!(loader.navigator.location().fragment, "");
    }

    #[test]
    fn test_params_reach_module() {
        let (loader, _echo) = loader("#/echo/index/a/b", "#/echo");
        loader.load().unwrap();
        assert_eq!(loader.view.current().body, vec![Section::Text("a,b".into())]);
    }

    #[test]
    fn test_unknown_module_shows_error_page() {
        let (loader, _echo) = loader("#/reports", "#/echo");
        let err = loader.load().unwrap_err();
        assert!(matches!(err, LoadError::ModuleNotFound(ref m) if m == "reports"));
        let page = loader.view.current();
        assert_eq!(page.route, "#/reports");
        assert_eq!(page.body, vec![Section::Text("module 'reports' not found".into())]);
    }

    #[test]
    fn test_default_route_is_read_at_load_time() {
        let (loader, echo) = loader("", "#/missing");
        assert!(matches!(loader.load(), Err(LoadError::ModuleNotFound(_))));

        loader.config.set(Arc::new(config_with_route("#/echo/index/x")));
        loader.load().unwrap();
        assert_eq!(echo.loads.get(), 1);
        assert_eq!(loader.view.current().route, "#/echo/index/x");
    }

    #[test]
    fn test_no_route_at_all() {
        let (loader, _echo) = loader("", "");
        assert!(matches!(loader.load(), Err(LoadError::NoRoute)));
    }

    #[test]
    fn test_module_errors_propagate() {
        let (loader, _echo) = loader("#/echo/fail", "#/echo");
        assert!(matches!(loader.load(), Err(LoadError::InvalidParam { .. })));
        loader.navigator.navigate("#/echo/zap");
        assert!(matches!(loader.load(), Err(LoadError::ActionNotFound { .. })));
    }

    #[test]
    fn test_responses_go_to_active_module_and_keep_token() {
        let (loader, echo) = loader("#/echo", "#/echo");
        loader.on_response(3, Ok(ApiSuccess::default())).unwrap();
        assert!(echo.responses.borrow().is_empty());

        loader.load().unwrap();
        let ok = ApiSuccess {
            data: Vec::new(),
            token: Some("tok".into()),
        };
        loader.on_response(4, Ok(ok)).unwrap();
        assert_eq!(*echo.responses.borrow(), vec![4]);
        assert_eq!(loader.http.token().as_deref(), Some("tok"));
    }
}
