use crate::app::event::RequestId;
use crate::http::{ApiSuccess, HttpError};

#[derive(Debug)]
pub enum Action {
    Navigate { fragment: String },
    OpenModule { index: usize },
    Back,
    Reload,
    Search { keyword: String },
    Help,
    UnknownCommand { name: String },
    GridNext,
    GridPrev,
    GridNextPage,
    GridPrevPage,
    GridSort { column: usize },
    GridOpen,
    GridToggleMark,
    /// Delete the marked rows, or the selected one.
    DeleteMarked,
    Deliver { id: RequestId, result: Result<ApiSuccess, HttpError> },
    Tick,
    Quit,
}
