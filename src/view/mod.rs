//! The page currently on screen.

use std::cell::{Cell, RefCell};

#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Text(String),
    /// Placeholder for the shared table grid.
    Grid,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub title: String,
    pub route: String,
    pub body: Vec<Section>,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.body.push(Section::Text(text.into()));
        self
    }

    pub fn grid(mut self) -> Self {
        self.body.push(Section::Grid);
        self
    }

    pub fn has_grid(&self) -> bool {
        self.body.contains(&Section::Grid)
    }
}

pub struct View {
    page: RefCell<Page>,
    dirty: Cell<bool>,
}

impl View {
    pub fn new() -> Self {
        Self {
            page: RefCell::new(Page::default()),
            dirty: Cell::new(true),
        }
    }

    pub fn show(&self, page: Page) {
        tracing::debug!(title = %page.title, route = %page.route, "showing page");
        *self.page.borrow_mut() = page;
        self.dirty.set(true);
    }

    /// Add a section below the current content, e.g. once async data lands.
    pub fn append_text(&self, text: impl Into<String>) {
        self.page.borrow_mut().body.push(Section::Text(text.into()));
        self.dirty.set(true);
    }

    /// Swap the first text section, or add one if there is none.
    pub fn replace_text(&self, text: impl Into<String>) {
        let mut page = self.page.borrow_mut();
        let text = text.into();
        match page.body.iter_mut().find(|s| matches!(s, Section::Text(_))) {
            Some(section) => *section = Section::Text(text),
            None => page.body.push(Section::Text(text)),
        }
        self.dirty.set(true);
    }

    pub fn current(&self) -> Page {
        self.page.borrow().clone()
    }

    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}
