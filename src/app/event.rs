use crate::http::{ApiSuccess, HttpError};
use crossterm::event::Event as CrosstermEvent;

pub type RequestId = u64;

#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    /// A queued API request finished
    HttpResponse {
        id: RequestId,
        result: Result<ApiSuccess, HttpError>,
    },

    /// Tick for UI refresh
    Tick,
}
