//! Transient on-screen notifications.
//!
//! Toasts are stacked newest-last and age by one per UI tick. The queue also
//! serves as the error-reporting channel for route loads: a failed load ends
//! up here and in the diagnostic log instead of unwinding the event loop.

use crate::loader::LoadError;
use chrono::{DateTime, Local};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: Level,
    pub text: String,
    pub created: DateTime<Local>,
    pub ticks_left: u32,
}

/// Receives failures that would otherwise have nowhere to go.
pub trait ErrorReporter {
    fn report(&self, error: &LoadError);
}

pub struct Notify {
    toasts: RefCell<VecDeque<Toast>>,
    ttl: Cell<u32>,
    dirty: Cell<bool>,
}

impl Notify {
    pub fn new(ttl_ticks: u32) -> Self {
        Self {
            toasts: RefCell::new(VecDeque::new()),
            ttl: Cell::new(ttl_ticks.max(1)),
            dirty: Cell::new(false),
        }
    }

    /// Lifetime of toasts pushed from now on.
    pub fn set_ttl(&self, ttl_ticks: u32) {
        self.ttl.set(ttl_ticks.max(1));
    }

    pub fn push(&self, level: Level, text: impl Into<String>) {
        let mut toasts = self.toasts.borrow_mut();
        toasts.push_back(Toast {
            level,
            text: text.into(),
            created: Local::now(),
            ticks_left: self.ttl.get(),
        });
        while toasts.len() > MAX_TOASTS {
            toasts.pop_front();
        }
        self.dirty.set(true);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.push(Level::Info, text);
    }

    pub fn success(&self, text: impl Into<String>) {
        self.push(Level::Success, text);
    }

    pub fn warning(&self, text: impl Into<String>) {
        self.push(Level::Warning, text);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(Level::Error, text);
    }

    /// Age every toast by one tick and drop the expired ones.
    pub fn tick(&self) {
        let mut toasts = self.toasts.borrow_mut();
        if toasts.is_empty() {
            return;
        }
        let before = toasts.len();
        for toast in toasts.iter_mut() {
            toast.ticks_left = toast.ticks_left.saturating_sub(1);
        }
        toasts.retain(|t| t.ticks_left > 0);
        if toasts.len() != before {
            self.dirty.set(true);
        }
    }

    pub fn visible(&self) -> Vec<Toast> {
        self.toasts.borrow().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.toasts.borrow().len()
    }

    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }
}

impl ErrorReporter for Notify {
    fn report(&self, error: &LoadError) {
        tracing::error!(error = %error, "route load failed");
        self.error(error.to_string());
    }
}
