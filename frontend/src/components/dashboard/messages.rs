use crate::api::Download;
use common::model::submission::Submission;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Pdf,
    Snapshot,
}

pub enum Msg {
    SelectWeek(String),
    /// Every submission of the selected week, pushed on each change.
    Week(Vec<Submission>),
    /// Shows or hides the free-text details of one location card.
    ToggleDetails(String),
    Export(ExportKind),
    Exported(Result<Download, String>),
}
