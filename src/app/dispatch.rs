//! Applies handler actions to the shared services.

use crate::app::action::Action;
use crate::app::root::AppRoot;
use crate::app::state::AppState;

pub fn perform(root: &AppRoot, state: &mut AppState, action: Action) {
    let services = root.services();
    let grid = &services.table_grid;
    let lang = &services.language;

    match action {
        Action::Navigate { fragment } => {
            services.navigator.navigate(&fragment);
        }
        Action::OpenModule { index } => {
            if let Some(route) = services.modules.route_of(index) {
                services.navigator.navigate(&route);
            }
        }
        Action::Back => {
            services.navigator.back();
        }
        Action::Reload => services.navigator.reload(),
        Action::Search { keyword } => {
            if !grid.is_bound() {
                services.notify.warning(lang.get("error.no_list"));
            } else if grid.search(&keyword) {
                grid.fetch(&services.http);
            }
        }
        Action::Help => {
            services.notify.info(lang.get("help.commands"));
            services.notify.info(lang.get("help.keys"));
        }
        Action::UnknownCommand { name } => {
            services
                .notify
                .warning(format!("{}: /{}", lang.get("error.unknown_command"), name));
        }
        Action::GridNext => grid.select_next(),
        Action::GridPrev => grid.select_prev(),
        Action::GridNextPage => {
            if grid.next_page() {
                grid.fetch(&services.http);
            }
        }
        Action::GridPrevPage => {
            if grid.prev_page() {
                grid.fetch(&services.http);
            }
        }
        Action::GridSort { column } => {
            if grid.sort_by(column) {
                grid.fetch(&services.http);
            }
        }
        Action::GridOpen => {
            if let Some(route) = grid.route_for_selected() {
                services.navigator.navigate(&route);
            }
        }
        Action::GridToggleMark => {
            grid.toggle_mark();
        }
        Action::DeleteMarked => match grid.delete_route() {
            Some(route) => {
                services.navigator.navigate(&route);
            }
            None => services.notify.warning(lang.get("error.nothing_to_delete")),
        },
        Action::Deliver { id, result } => {
            if let Err(e) = services.loader.on_response(id, result) {
                root.reporter().report(&e);
            }
        }
        Action::Tick => services.notify.tick(),
        Action::Quit => {
            tracing::info!("quit requested");
            state.should_quit = true;
        }
    }
}
