//! Sales: paged list, single-sale detail and soft delete.
//!
//! Routes:
//! - `#/sales[?keyword=..]` lists sales in the table grid
//! - `#/sales/detail/<uid>` shows one sale
//! - `#/sales/delete/<uid>[/<uid>..]` deletes one or more sales and returns
//!   to the list once every request has answered

use super::{Module, ModuleContext};
use crate::app::event::RequestId;
use crate::http::{ApiSuccess, HttpError};
use crate::loader::{LoadError, Route};
use crate::tablegrid::{Column, GridSpec};
use crate::view::Page;
use serde_json::json;
use std::cell::RefCell;
use std::collections::BTreeSet;
use uuid::Uuid;

const SOURCE: &str = "/sales";
const SOURCE_ROUTE: &str = "#/sales";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    Detail(RequestId),
    Delete {
        waiting: BTreeSet<RequestId>,
        deleted: usize,
    },
}

#[derive(Default)]
pub struct SalesModule {
    pending: RefCell<Option<Pending>>,
}

impl SalesModule {
    pub fn new() -> Self {
        Self::default()
    }

    fn parse_uid(raw: &str) -> Result<Uuid, LoadError> {
        Uuid::parse_str(raw).map_err(|_| LoadError::InvalidParam {
            name: "sale id".to_string(),
            value: raw.to_string(),
        })
    }

    fn uid_param(route: &Route) -> Result<Uuid, LoadError> {
        Self::parse_uid(route.param(0).unwrap_or_default())
    }

    /// Every param as a sale id. All must parse before anything is sent.
    fn uid_params(route: &Route) -> Result<Vec<Uuid>, LoadError> {
        if route.params.is_empty() {
            return Self::uid_param(route).map(|uid| vec![uid]);
        }
        route.params.iter().map(|raw| Self::parse_uid(raw)).collect()
    }

    fn set_pending(&self, pending: Option<Pending>) {
        *self.pending.borrow_mut() = pending;
    }

    fn load_index(&self, route: &Route, ctx: &ModuleContext) -> Page {
        let lang = ctx.language;
        ctx.grid.bind(GridSpec {
            source: SOURCE.to_string(),
            columns: vec![
                Column::new("customer", lang.get("sales.customer"), 24),
                Column::new("total", lang.get("sales.total"), 12),
                Column::new("total_payment", lang.get("sales.payment"), 12),
                Column::new("payment_type", lang.get("sales.payment_type"), 10),
                Column::new("created", lang.get("sales.created"), 20),
            ],
            row_route: Some("#/sales/detail/{uid}".to_string()),
            row_key: Some("uid".to_string()),
            delete_route: Some("#/sales/delete".to_string()),
        });
        if let Some(keyword) = route.query.get("keyword") {
            ctx.grid.search(keyword);
        }
        ctx.grid.fetch(ctx.http);
        Page::new(lang.get("sales.list")).grid()
    }

    fn load_detail(&self, route: &Route, ctx: &ModuleContext) -> Result<Page, LoadError> {
        let uid = Self::uid_param(route)?;
        let id = ctx.http.get(&format!("{}/{}", SOURCE, uid), Vec::new());
        self.set_pending(Some(Pending::Detail(id)));
        Ok(Page::new(ctx.language.get("sales.detail")).text(ctx.language.get("sales.loading")))
    }

    fn load_delete(&self, route: &Route, ctx: &ModuleContext) -> Result<Page, LoadError> {
        let uids = Self::uid_params(route)?;
        let waiting = uids
            .iter()
            .map(|uid| ctx.http.delete(&format!("{}/{}", SOURCE, uid)))
            .collect();
        self.set_pending(Some(Pending::Delete { waiting, deleted: 0 }));
        tracing::info!(count = uids.len(), "deleting sales");

        let lines: Vec<String> = uids.iter().map(|uid| format!("{} ...", uid)).collect();
        Ok(Page::new(ctx.language.get("sales.delete")).text(lines.join("\n")))
    }

    /// Count one delete answer. Once every request has answered, the list
    /// comes back if anything was deleted.
    fn delete_answered(
        &self,
        id: RequestId,
        mut waiting: BTreeSet<RequestId>,
        mut deleted: usize,
        result: Result<ApiSuccess, HttpError>,
        ctx: &ModuleContext,
    ) -> Result<(), LoadError> {
        waiting.remove(&id);
        if result.is_ok() {
            deleted += 1;
        }
        if !waiting.is_empty() {
            self.set_pending(Some(Pending::Delete { waiting, deleted }));
            result?;
            return Ok(());
        }

        self.set_pending(None);
        if deleted > 0 {
            let lang = ctx.language;
            let message = if deleted == 1 {
                lang.get("sales.deleted").to_string()
            } else {
                format!("{}: {}", lang.get("sales.deleted_many"), deleted)
            };
            ctx.notify.success(message);
            ctx.navigator.navigate(SOURCE_ROUTE);
        }
        result?;
        Ok(())
    }

    fn show_detail(&self, ok: ApiSuccess, ctx: &ModuleContext) -> Result<(), LoadError> {
        let lang = ctx.language;
        let Some(sale) = ok.data.into_iter().next() else {
            ctx.view.replace_text(lang.get("sales.empty"));
            return Ok(());
        };
        let body = ctx.templates.render(
            "sale_detail",
            &json!({
                "labels": {
                    "customer": lang.get("sales.customer"),
                    "total": lang.get("sales.total"),
                    "payment": lang.get("sales.payment"),
                    "payment_type": lang.get("sales.payment_type"),
                    "created": lang.get("sales.created"),
                },
                "sale": sale,
            }),
        )?;
        ctx.view.replace_text(body);
        Ok(())
    }
}

impl Module for SalesModule {
    fn name(&self) -> &str {
        "sales"
    }

    fn title_key(&self) -> &str {
        "module.sales"
    }

    fn load(&self, route: &Route, ctx: &ModuleContext) -> Result<Page, LoadError> {
        self.set_pending(None);
        match route.action.as_str() {
            "index" | "list" => Ok(self.load_index(route, ctx)),
            "detail" => self.load_detail(route, ctx),
            "delete" => self.load_delete(route, ctx),
            other => Err(LoadError::ActionNotFound {
                module: self.name().to_string(),
                action: other.to_string(),
            }),
        }
    }

    fn on_response(
        &self,
        _route: &Route,
        id: RequestId,
        result: Result<ApiSuccess, HttpError>,
        ctx: &ModuleContext,
    ) -> Result<(), LoadError> {
        if ctx.grid.is_pending(id) {
            return match result {
                Ok(ok) => {
                    ctx.grid.apply(id, ok.data);
                    Ok(())
                }
                Err(e) => {
                    ctx.grid.fail(id);
                    Err(e.into())
                }
            };
        }

        // Cloned so no borrow is held if answering navigates.
        let pending = self.pending.borrow().clone();
        match pending {
            Some(Pending::Detail(pending)) if pending == id => {
                self.set_pending(None);
                match result {
                    Ok(ok) => self.show_detail(ok, ctx),
                    Err(e) => {
                        ctx.view.replace_text(e.to_string());
                        Err(e.into())
                    }
                }
            }
            Some(Pending::Delete { waiting, deleted }) if waiting.contains(&id) => {
                self.delete_answered(id, waiting, deleted, result, ctx)
            }
            _ => {
                tracing::debug!(id, "ignoring response for a page no longer shown");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ApiError, Method};
    use crate::module::testing::Fixture;
    use crate::notify::Level;
    use crate::view::Section;

    const UID: &str = "0b6f2b7e-3c53-4d0e-9a49-57b2e4f1a3c1";

    fn route(fragment: &str) -> Route {
        Route::parse(fragment).unwrap()
    }

    #[test]
    fn test_index_binds_grid_and_fetches() {
        let fx = Fixture::new();
        let sales = SalesModule::new();
        let page = sales.load(&route("#/sales?keyword=ana"), &fx.ctx()).unwrap();
        assert!(page.has_grid());
        assert_eq!(fx.grid.source().as_deref(), Some("/sales"));

        let sent = fx.http.drain();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::Get);
        assert!(sent[0].query.contains(&("keyword".into(), "ana".into())));
        assert!(fx.grid.is_pending(sent[0].id));
    }

    #[test]
    fn test_index_response_fills_grid() {
        let fx = Fixture::new();
        let sales = SalesModule::new();
        let r = route("#/sales");
        sales.load(&r, &fx.ctx()).unwrap();
        let id = fx.http.drain()[0].id;

        let ok = ApiSuccess {
            data: vec![json!({"uid": UID, "customer": "Ana", "total": 12.5})],
            token: None,
        };
        sales.on_response(&r, id, Ok(ok), &fx.ctx()).unwrap();
        assert_eq!(fx.grid.row_count(), 1);
        assert_eq!(
            fx.grid.route_for_selected(),
            Some(format!("#/sales/detail/{}", UID))
        );
    }

    #[test]
    fn test_index_failure_clears_loading() {
        let fx = Fixture::new();
        let sales = SalesModule::new();
        let r = route("#/sales");
        sales.load(&r, &fx.ctx()).unwrap();
        let id = fx.http.drain()[0].id;

        let err = sales
            .on_response(&r, id, Err(HttpError::Transport("refused".into())), &fx.ctx())
            .unwrap_err();
        assert!(matches!(err, LoadError::Http(_)));
        assert!(!fx.grid.is_loading());
    }

    #[test]
    fn test_detail_rejects_bad_uid() {
        let fx = Fixture::new();
        let sales = SalesModule::new();
        let err = sales.load(&route("#/sales/detail/42"), &fx.ctx()).err().unwrap();
        assert!(matches!(err, LoadError::InvalidParam { ref value, .. } if value == "42"));
        assert!(fx.http.drain().is_empty());
    }

    #[test]
    fn test_detail_renders_response() {
        let fx = Fixture::new();
        let sales = SalesModule::new();
        let r = route(&format!("#/sales/detail/{}", UID));
        let page = sales.load(&r, &fx.ctx()).unwrap();
        fx.view.show(page);
        let sent = fx.http.drain();
        assert_eq!(sent[0].path, format!("/sales/{}", UID));

        let ok = ApiSuccess {
            data: vec![json!({"customer": "Ana", "total": 10, "total_payment": 20,
                              "payment_type": "cash", "created": "2024-01-01"})],
            token: None,
        };
        sales.on_response(&r, sent[0].id, Ok(ok), &fx.ctx()).unwrap();
        let Section::Text(body) = &fx.view.current().body[0] else {
            panic!("expected text");
        };
        assert!(body.contains("Customer: Ana"));
        assert!(body.contains("Payment: cash"));
    }

    #[test]
    fn test_stale_detail_response_is_ignored() {
        let fx = Fixture::new();
        let sales = SalesModule::new();
        let r = route(&format!("#/sales/detail/{}", UID));
        sales.load(&r, &fx.ctx()).unwrap();
        let first = fx.http.drain()[0].id;
        sales.load(&r, &fx.ctx()).unwrap();

        let err = HttpError::Api(ApiError {
            status: 404,
            ..ApiError::default()
        });
        assert!(sales.on_response(&r, first, Err(err), &fx.ctx()).is_ok());
    }

    #[test]
    fn test_delete_returns_to_list() {
        let fx = Fixture::new();
        let sales = SalesModule::new();
        let r = route(&format!("#/sales/delete/{}", UID));
        sales.load(&r, &fx.ctx()).unwrap();
        let sent = fx.http.drain();
        assert_eq!(sent[0].method, Method::Delete);

        sales
            .on_response(&r, sent[0].id, Ok(ApiSuccess::default()), &fx.ctx())
            .unwrap();
        assert_eq!(fx.navigator.location().fragment, "#/sales");
        let toasts = fx.notify.visible();
        assert_eq!(toasts[0].level, Level::Success);
        assert_eq!(toasts[0].text, "Sale deleted");
    }

    const BATCH: [&str; 3] = [
        "6a1f4c0e-2b7d-4f5e-8c3a-1d9e0f2a4b6c",
        "7b2e5d1f-3c8e-4a6f-9d4b-2e0f1a3b5c7d",
        "8c3f6e2a-4d9f-4b7a-ae5c-3f1a2b4c6d8e",
    ];

    #[test]
    fn test_bulk_delete_waits_for_every_answer() {
        let fx = Fixture::new();
        let sales = SalesModule::new();
        let r = route(&format!("#/sales/delete/{}", BATCH.join("/")));
        let page = sales.load(&r, &fx.ctx()).unwrap();
        assert_eq!(page.title, "Delete sales");

        let sent = fx.http.drain();
        assert_eq!(sent.len(), 3);
        assert!(sent.iter().all(|request| request.method == Method::Delete));
        assert_eq!(sent[2].path, format!("/sales/{}", BATCH[2]));

        let ok = || Ok(ApiSuccess::default());
        sales.on_response(&r, sent[1].id, ok(), &fx.ctx()).unwrap();
        let failed = Err(HttpError::Transport("refused".into()));
        assert!(sales.on_response(&r, sent[0].id, failed, &fx.ctx()).is_err());
        assert_eq!(fx.navigator.location().fragment, "");

        sales.on_response(&r, sent[2].id, ok(), &fx.ctx()).unwrap();
        assert_eq!(fx.navigator.location().fragment, "#/sales");
        let toasts = fx.notify.visible();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].text, "Sales deleted: 2");

        // Late duplicates are ignored once the batch is done.
        assert!(sales.on_response(&r, sent[2].id, ok(), &fx.ctx()).is_ok());
        assert_eq!(fx.notify.visible().len(), 1);
    }

    #[test]
    fn test_bulk_delete_sends_nothing_if_any_id_is_bad() {
        let fx = Fixture::new();
        let sales = SalesModule::new();
        let r = route(&format!("#/sales/delete/{}/nope", UID));
        let err = sales.load(&r, &fx.ctx()).err().unwrap();
        assert!(matches!(err, LoadError::InvalidParam { ref value, .. } if value == "nope"));
        assert!(fx.http.drain().is_empty());
    }

    #[test]
    fn test_failed_delete_stays_put() {
        let fx = Fixture::new();
        let sales = SalesModule::new();
        let r = route(&format!("#/sales/delete/{}", UID));
        sales.load(&r, &fx.ctx()).unwrap();
        let id = fx.http.drain()[0].id;

        let failed = Err(HttpError::Transport("refused".into()));
        assert!(matches!(
            sales.on_response(&r, id, failed, &fx.ctx()),
            Err(LoadError::Http(_))
        ));
        assert_eq!(fx.navigator.location().fragment, "");
        assert!(fx.notify.visible().is_empty());
    }

    #[test]
    fn test_unknown_action() {
        let fx = Fixture::new();
        let sales = SalesModule::new();
        assert!(matches!(
            sales.load(&route("#/sales/refund"), &fx.ctx()),
            Err(LoadError::ActionNotFound { .. })
        ));
    }
}
