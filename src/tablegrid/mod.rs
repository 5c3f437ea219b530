//! Server-paged data grid.
//!
//! One grid is shared by whichever module is on screen. A module binds it to
//! an API collection with [`TableGrid::bind`], asks for
//! [`TableGrid::request_query`] to build the fetch, and registers the
//! outstanding request with [`TableGrid::await_request`]. Rows only land via
//! [`TableGrid::apply`] when the response id matches, so a slow response for
//! a page the user already left is dropped.

use crate::app::event::RequestId;
use crate::http::Http;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

pub const DEFAULT_PAGE_LENGTH: usize = 25;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub key: String,
    pub title: String,
    pub width: u16,
}

impl Column {
    pub fn new(key: &str, title: &str, width: u16) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

/// Paging state sent to the API.
#[derive(Debug, Clone, PartialEq)]
pub struct Paging {
    pub length: usize,
    pub page: usize,
    pub keyword: String,
    pub order: Option<usize>,
    pub dir: SortDir,
}

impl Paging {
    pub fn new(length: usize) -> Self {
        Self {
            length: if length == 0 { DEFAULT_PAGE_LENGTH } else { length },
            page: 0,
            keyword: String::new(),
            order: None,
            dir: SortDir::Asc,
        }
    }
}

/// What a module wants the grid to show.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    pub source: String,
    pub columns: Vec<Column>,
    /// Route opened for the selected row; `{field}` is filled from the row.
    pub row_route: Option<String>,
    /// Row field that identifies a record. Rows can only be marked when set.
    pub row_key: Option<String>,
    /// Route that deletes records; the marked keys are appended as params.
    pub delete_route: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct GridState {
    spec: Option<GridSpec>,
    paging: Option<Paging>,
    rows: Vec<Value>,
    selected: usize,
    pending: Option<RequestId>,
    loaded: bool,
    /// Keys of marked rows. Survives paging and sorting, not a rebind.
    marked: BTreeSet<String>,
}

pub struct TableGrid {
    state: RefCell<GridState>,
    page_length: Cell<usize>,
    generation: Cell<u64>,
    dirty: Cell<bool>,
}

impl TableGrid {
    pub fn new(page_length: usize) -> Self {
        Self {
            state: RefCell::new(GridState::default()),
            page_length: Cell::new(page_length),
            generation: Cell::new(0),
            dirty: Cell::new(false),
        }
    }

    /// Reset the grid for a new collection. Keeps the keyword when the
    /// source is unchanged, so returning to a list keeps its search.
    pub fn bind(&self, spec: GridSpec) {
        let mut state = self.state.borrow_mut();
        let keyword = match (&state.spec, &state.paging) {
            (Some(old), Some(paging)) if old.source == spec.source => paging.keyword.clone(),
            _ => String::new(),
        };
        let mut paging = Paging::new(self.page_length.get());
        paging.keyword = keyword;
        *state = GridState {
            spec: Some(spec),
            paging: Some(paging),
            ..GridState::default()
        };
        self.generation.set(self.generation.get() + 1);
        self.dirty.set(true);
    }

    /// Page length for the next [`TableGrid::bind`]. The bound page keeps
    /// its length until then.
    pub fn set_page_length(&self, length: usize) {
        self.page_length.set(length);
    }

    pub fn unbind(&self) {
        *self.state.borrow_mut() = GridState::default();
        self.dirty.set(true);
    }

    pub fn is_bound(&self) -> bool {
        self.state.borrow().spec.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    pub fn source(&self) -> Option<String> {
        self.state.borrow().spec.as_ref().map(|s| s.source.clone())
    }

    pub fn columns(&self) -> Vec<Column> {
        self.state
            .borrow()
            .spec
            .as_ref()
            .map(|s| s.columns.clone())
            .unwrap_or_default()
    }

    pub fn paging(&self) -> Option<Paging> {
        self.state.borrow().paging.clone()
    }

    /// Query pairs for the current page.
    pub fn request_query(&self) -> Vec<(String, String)> {
        let state = self.state.borrow();
        let Some(paging) = &state.paging else {
            return Vec::new();
        };
        let mut query = vec![
            ("length".to_string(), paging.length.to_string()),
            ("page".to_string(), paging.page.to_string()),
        ];
        if !paging.keyword.is_empty() {
            query.push(("keyword".to_string(), paging.keyword.clone()));
        }
        if let Some(order) = paging.order {
            query.push(("order".to_string(), (order + 1).to_string()));
            query.push(("dir".to_string(), paging.dir.as_str().to_string()));
        }
        query
    }

    /// Queue a fetch of the current page and wait for its response.
    pub fn fetch(&self, http: &Http) -> Option<RequestId> {
        let source = self.source()?;
        let id = http.get(&source, self.request_query());
        self.await_request(id);
        self.dirty.set(true);
        Some(id)
    }

    pub fn await_request(&self, id: RequestId) {
        self.state.borrow_mut().pending = Some(id);
    }

    pub fn is_pending(&self, id: RequestId) -> bool {
        self.state.borrow().pending == Some(id)
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().pending.is_some()
    }

    pub fn is_loaded(&self) -> bool {
        self.state.borrow().loaded
    }

    /// Accept rows for request `id`. Returns false for stale responses.
    pub fn apply(&self, id: RequestId, rows: Vec<Value>) -> bool {
        let mut state = self.state.borrow_mut();
        if state.pending != Some(id) {
            tracing::debug!(id, "dropping stale grid response");
            return false;
        }
        state.pending = None;
        state.loaded = true;
        state.rows = rows;
        state.selected = state.selected.min(state.rows.len().saturating_sub(1));
        self.dirty.set(true);
        true
    }

    /// Clear the pending marker after a failed fetch.
    pub fn fail(&self, id: RequestId) -> bool {
        let mut state = self.state.borrow_mut();
        if state.pending != Some(id) {
            return false;
        }
        state.pending = None;
        self.dirty.set(true);
        true
    }

    pub fn row_count(&self) -> usize {
        self.state.borrow().rows.len()
    }

    pub fn selected(&self) -> usize {
        self.state.borrow().selected
    }

    pub fn select_next(&self) {
        let mut state = self.state.borrow_mut();
        if state.selected + 1 < state.rows.len() {
            state.selected += 1;
            self.dirty.set(true);
        }
    }

    pub fn select_prev(&self) {
        let mut state = self.state.borrow_mut();
        if state.selected > 0 {
            state.selected -= 1;
            self.dirty.set(true);
        }
    }

    /// Advance one server page. Returns whether a refetch is needed.
    pub fn next_page(&self) -> bool {
        let mut state = self.state.borrow_mut();
        let full_page = state
            .paging
            .as_ref()
            .map(|p| state.rows.len() >= p.length)
            .unwrap_or(false);
        if !full_page {
            return false;
        }
        if let Some(paging) = state.paging.as_mut() {
            paging.page += 1;
        }
        state.selected = 0;
        true
    }

    pub fn prev_page(&self) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(paging) = state.paging.as_mut() else {
            return false;
        };
        if paging.page == 0 {
            return false;
        }
        paging.page -= 1;
        state.selected = 0;
        true
    }

    /// Order by column `index`; choosing the same column again flips the
    /// direction. Returns whether a refetch is needed.
    pub fn sort_by(&self, index: usize) -> bool {
        let mut state = self.state.borrow_mut();
        let column_count = state.spec.as_ref().map(|s| s.columns.len()).unwrap_or(0);
        if index >= column_count {
            return false;
        }
        let Some(paging) = state.paging.as_mut() else {
            return false;
        };
        if paging.order == Some(index) {
            paging.dir = match paging.dir {
                SortDir::Asc => SortDir::Desc,
                SortDir::Desc => SortDir::Asc,
            };
        } else {
            paging.order = Some(index);
            paging.dir = SortDir::Asc;
        }
        paging.page = 0;
        true
    }

    /// Set the search keyword. Returns whether a refetch is needed.
    pub fn search(&self, keyword: &str) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(paging) = state.paging.as_mut() else {
            return false;
        };
        let keyword = keyword.trim();
        if paging.keyword == keyword {
            return false;
        }
        paging.keyword = keyword.to_string();
        paging.page = 0;
        state.selected = 0;
        true
    }

    /// Rendered cells, one `Vec` per row, in column order.
    pub fn cell_rows(&self) -> Vec<Vec<String>> {
        let state = self.state.borrow();
        let Some(spec) = &state.spec else {
            return Vec::new();
        };
        state
            .rows
            .iter()
            .map(|row| spec.columns.iter().map(|c| cell_text(row.get(&c.key))).collect())
            .collect()
    }

    /// Mark or unmark the selected row. Returns whether it is now marked.
    pub fn toggle_mark(&self) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(key) = selected_key(&state) else {
            return false;
        };
        let marked = if state.marked.remove(&key) {
            false
        } else {
            state.marked.insert(key)
        };
        self.dirty.set(true);
        marked
    }

    /// Whether each displayed row is marked, in row order.
    pub fn row_marks(&self) -> Vec<bool> {
        let state = self.state.borrow();
        let Some(field) = state.spec.as_ref().and_then(|s| s.row_key.as_ref()) else {
            return vec![false; state.rows.len()];
        };
        state
            .rows
            .iter()
            .map(|row| state.marked.contains(&cell_text(row.get(field))))
            .collect()
    }

    pub fn marked_count(&self) -> usize {
        self.state.borrow().marked.len()
    }

    /// Delete route for the marked rows, or for the selected row when
    /// nothing is marked. `None` when the grid has nothing to delete.
    pub fn delete_route(&self) -> Option<String> {
        let state = self.state.borrow();
        let base = state.spec.as_ref()?.delete_route.as_ref()?;
        let keys: Vec<String> = if state.marked.is_empty() {
            vec![selected_key(&state)?]
        } else {
            state.marked.iter().cloned().collect()
        };
        Some(format!("{}/{}", base.trim_end_matches('/'), keys.join("/")))
    }

    pub fn route_for_selected(&self) -> Option<String> {
        let state = self.state.borrow();
        let template = state.spec.as_ref()?.row_route.as_ref()?;
        let row = state.rows.get(state.selected)?;
        Some(fill_route(template, row))
    }

    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }
}

fn selected_key(state: &GridState) -> Option<String> {
    let field = state.spec.as_ref()?.row_key.as_ref()?;
    let key = cell_text(state.rows.get(state.selected)?.get(field));
    (!key.is_empty()).then_some(key)
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) => format!("{:.2}", f),
            _ => n.to_string(),
        },
        Some(Value::Bool(b)) => if *b { "yes" } else { "no" }.to_string(),
        Some(other) => other.to_string(),
    }
}

fn fill_route(template: &str, row: &Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let key = &rest[start + 1..start + len];
        out.push_str(&cell_text(row.get(key)));
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    out
}
