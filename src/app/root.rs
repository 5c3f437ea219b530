//! The application root.
//!
//! [`Services`] bundles the shared subsystems every part of the console
//! reaches for. [`AppRoot`] owns one `Services`, and [`AppRoot::start`] does
//! three things in order: it stores the configuration and pushes it into the
//! subsystems, hooks the loader up to location changes, and loads the
//! current route once so the first frame is not blank.
//!
//! The root keeps exactly one navigation hook. Starting again swaps it for a
//! new one, and dropping the old [`Subscription`] unregisters it. Loader
//! failures go to the configured [`ErrorReporter`] and never unwind out of a
//! navigation callback.

use crate::config::{AppConfig, SharedConfig};
use crate::http::{Http, HttpError};
use crate::language::Language;
use crate::loader::{LoadError, Loader, RouteLoader};
use crate::module::about::{AboutInfo, AboutModule};
use crate::module::home::HomeModule;
use crate::module::sales::SalesModule;
use crate::module::ModuleRegistry;
use crate::nav::{Navigator, Subscription};
use crate::notify::{ErrorReporter, Notify};
use crate::tablegrid::TableGrid;
use crate::template::{TemplateError, Templates};
use crate::view::View;
use std::rc::Rc;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Shared subsystem handles. Cloning shares, it never copies the subsystems.
#[derive(Clone)]
pub struct Services {
    pub config: SharedConfig,
    pub navigator: Navigator,
    pub view: Rc<View>,
    pub loader: Rc<dyn RouteLoader>,
    pub table_grid: Rc<TableGrid>,
    pub notify: Rc<Notify>,
    pub http: Rc<Http>,
    pub modules: Rc<ModuleRegistry>,
    pub language: Rc<Language>,
    pub templates: Rc<Templates>,
}

impl Services {
    /// Wire up the built-in modules and the concrete loader.
    pub fn build(
        config: &AppConfig,
        language: Language,
        about: AboutInfo,
    ) -> Result<Self, BuildError> {
        let shared = SharedConfig::new(Arc::new(config.clone()));
        let navigator = Navigator::new("");
        let view = Rc::new(View::new());
        let table_grid = Rc::new(TableGrid::new(config.ui.page_length));
        let notify = Rc::new(Notify::new(config.ui.toast_ticks));
        let http = Rc::new(Http::new(&config.api)?);
        let language = Rc::new(language);
        let templates = Rc::new(Templates::new()?);

        let mut modules = ModuleRegistry::new();
        modules.register(Rc::new(HomeModule));
        modules.register(Rc::new(SalesModule::new()));
        modules.register(Rc::new(AboutModule::new(about)));
        let modules = Rc::new(modules);

        let loader: Rc<dyn RouteLoader> = Rc::new(Loader::new(
            navigator.clone(),
            Rc::clone(&modules),
            Rc::clone(&view),
            Rc::clone(&table_grid),
            Rc::clone(&http),
            Rc::clone(&notify),
            Rc::clone(&language),
            Rc::clone(&templates),
            shared.clone(),
        ));

        Ok(Self {
            config: shared,
            navigator,
            view,
            loader,
            table_grid,
            notify,
            http,
            modules,
            language,
            templates,
        })
    }

    /// Make `config` the settings in force. Grid and toast settings apply
    /// from the next bind or toast; the API client is rebuilt right away.
    pub fn apply_config(&self, config: &Arc<AppConfig>) -> Result<(), LoadError> {
        self.config.set(Arc::clone(config));
        self.table_grid.set_page_length(config.ui.page_length);
        self.notify.set_ttl(config.ui.toast_ticks);
        self.http.configure(&config.api)?;
        Ok(())
    }
}

pub struct AppRoot {
    services: Services,
    reporter: Rc<dyn ErrorReporter>,
    config: Option<Arc<AppConfig>>,
    hook: Option<Subscription>,
}

impl AppRoot {
    /// Root reporting load failures through the notify subsystem.
    pub fn new(services: Services) -> Self {
        let reporter: Rc<dyn ErrorReporter> = services.notify.clone();
        Self::with_reporter(services, reporter)
    }

    pub fn with_reporter(services: Services, reporter: Rc<dyn ErrorReporter>) -> Self {
        Self {
            services,
            reporter,
            config: None,
            hook: None,
        }
    }

    /// Store `config`, route location changes to the loader, and load the
    /// current route once. Returns the root for chaining.
    pub fn start(&mut self, config: Arc<AppConfig>) -> &mut Self {
        if let Err(e) = self.services.apply_config(&config) {
            self.reporter.report(&e);
        }
        self.config = Some(config);

        let dispatch = self.dispatcher();
        // Replacing the token drops the previous hook.
        self.hook = Some(self.services.navigator.subscribe(move |_| dispatch()));

        tracing::info!("application started");
        (self.dispatcher())();
        self
    }

    /// The loader call shared by the cold start and every navigation.
    fn dispatcher(&self) -> impl Fn() + 'static {
        let loader = Rc::clone(&self.services.loader);
        let reporter = Rc::clone(&self.reporter);
        move || {
            if let Err(e) = loader.load() {
                reporter.report(&e);
            }
        }
    }

    pub fn config(&self) -> Option<&Arc<AppConfig>> {
        self.config.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.hook.as_ref().is_some_and(Subscription::is_active)
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn reporter(&self) -> &Rc<dyn ErrorReporter> {
        &self.reporter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Section;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct CountingLoader {
        calls: Cell<usize>,
        fail: Cell<bool>,
    }

    impl RouteLoader for CountingLoader {
        fn load(&self) -> Result<(), LoadError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(LoadError::ModuleNotFound("broken".into()));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        seen: RefCell<Vec<String>>,
    }

    impl ErrorReporter for RecordingReporter {
        fn report(&self, error: &LoadError) {
            self.seen.borrow_mut().push(error.to_string());
        }
    }

    fn about() -> AboutInfo {
        AboutInfo {
            name: "linq-console".into(),
            version: "test".into(),
            config_path: "config.toml".into(),
        }
    }

    fn stubbed_root() -> (AppRoot, Rc<CountingLoader>, Rc<RecordingReporter>) {
        let mut services =
            Services::build(&AppConfig::default(), Language::english(), about()).unwrap();
        let loader = Rc::new(CountingLoader::default());
        services.loader = Rc::clone(&loader) as Rc<dyn RouteLoader>;
        let reporter = Rc::new(RecordingReporter::default());
        let root = AppRoot::with_reporter(services, reporter.clone());
        (root, loader, reporter)
    }

    fn config_with_route(route: &str) -> Arc<AppConfig> {
        let mut config = AppConfig::default();
        config.ui.default_route = route.to_string();
        Arc::new(config)
    }

    #[test]
    fn test_config_absent_until_start() {
        let (root, loader, _) = stubbed_root();
        assert!(root.config().is_none());
        assert!(!root.is_started());
        assert_eq!(loader.calls.get(), 0);
    }

    #[test]
    fn test_start_stores_the_same_config() {
        let (mut root, _, _) = stubbed_root();
        let config = config_with_route("#/sales");
        root.start(Arc::clone(&config));
        assert!(Arc::ptr_eq(root.config().unwrap(), &config));
    }

    #[test]
    fn test_last_start_wins() {
        let (mut root, _, _) = stubbed_root();
        let first = config_with_route("#/home");
        let second = config_with_route("#/sales");
        root.start(Arc::clone(&first));
        root.start(Arc::clone(&second));
        assert!(Arc::ptr_eq(root.config().unwrap(), &second));
    }

    #[test]
    fn test_start_loads_once_and_returns_self() {
        let (mut root, loader, _) = stubbed_root();
        let root_ptr: *const AppRoot = &root;
        let returned: *const AppRoot = root.start(config_with_route("#/home"));
        assert!(std::ptr::eq(returned, root_ptr));
        assert_eq!(loader.calls.get(), 1);
        assert!(root.is_started());
    }

    #[test]
    fn test_chained_access() {
        let (mut root, _, _) = stubbed_root();
        let names = root.start(config_with_route("#/home")).services().modules.names();
        assert_eq!(names, vec!["home", "sales", "about"]);
    }

    #[test]
    fn test_navigation_before_start_does_nothing() {
        let (root, loader, _) = stubbed_root();
        root.services().navigator.navigate("#/sales");
        assert_eq!(loader.calls.get(), 0);
    }

    #[test]
    fn test_navigation_after_start_reloads() {
        let (mut root, loader, _) = stubbed_root();
        root.start(config_with_route("#/home"));
        root.services().navigator.navigate("#/sales");
        root.services().navigator.navigate("#/about");
        assert_eq!(loader.calls.get(), 3);
    }

    #[test]
    fn test_restart_does_not_stack_hooks() {
        let (mut root, loader, _) = stubbed_root();
        root.start(config_with_route("#/home"));
        root.start(config_with_route("#/home"));
        assert_eq!(loader.calls.get(), 2);
        assert_eq!(root.services().navigator.handler_count(), 1);

        root.services().navigator.navigate("#/sales");
        assert_eq!(loader.calls.get(), 3);
    }

    #[test]
    fn test_load_failures_are_reported() {
        let (mut root, loader, reporter) = stubbed_root();
        loader.fail.set(true);
        root.start(config_with_route("#/home"));
        root.services().navigator.navigate("#/sales");
        assert_eq!(reporter.seen.borrow().len(), 2);
        assert!(reporter.seen.borrow()[0].contains("broken"));
    }

    #[test]
    fn test_real_loader_cold_start_renders_default_route() {
        let services =
            Services::build(&AppConfig::default(), Language::english(), about()).unwrap();
        let mut root = AppRoot::new(services);
        root.start(Arc::new(AppConfig::default()));

        let page = root.services().view.current();
        assert_eq!(page.route, "#/home");
        assert_eq!(page.title, "Home");
        assert_eq!(root.services().notify.len(), 0);
    }

    #[test]
    fn test_start_config_reaches_the_subsystems() {
        let services =
            Services::build(&AppConfig::default(), Language::english(), about()).unwrap();
        let mut root = AppRoot::new(services);

        let mut config = AppConfig::default();
        config.api.base_url = "http://pos.test:9000/v2/".into();
        config.ui.default_route = "#/about".into();
        config.ui.page_length = 7;
        config.ui.toast_ticks = 3;
        root.start(Arc::new(config));

        let services = root.services();
        let page = services.view.current();
        assert_eq!(page.route, "#/about");
        let Section::Text(body) = &page.body[0] else {
            panic!("expected text body");
        };
        assert!(body.contains("Page:    7 rows"));
        assert_eq!(services.config.get().ui.default_route, "#/about");
        assert_eq!(services.http.base_url(), "http://pos.test:9000/v2");

        services.navigator.navigate("#/sales");
        assert_eq!(services.table_grid.paging().unwrap().length, 7);
        let sent = services.http.drain();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].query.contains(&("length".into(), "7".into())));

        services.notify.info("hello");
        for _ in 0..3 {
            services.notify.tick();
        }
        assert!(services.notify.visible().is_empty());
    }

    #[test]
    fn test_real_loader_reports_unknown_module_as_toast() {
        let services =
            Services::build(&AppConfig::default(), Language::english(), about()).unwrap();
        let mut root = AppRoot::new(services);
        root.start(Arc::new(AppConfig::default()));
        root.services().navigator.navigate("#/reports");

        let toasts = root.services().notify.visible();
        assert_eq!(toasts.len(), 1);
        assert!(toasts[0].text.contains("reports"));
    }
}
