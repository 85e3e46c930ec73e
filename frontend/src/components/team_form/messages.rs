use common::autosave::SaveTicket;
use common::model::submission::Submission;
use common::requests::SaveSubmissionResponse;

pub enum Msg {
    SelectLocation(String),
    SelectWeek(String),
    /// Pushed by the subscription: the stored document, `None` if absent.
    Remote(Option<Submission>),
    History(Vec<Submission>),
    Edit {
        field: String,
        value: String,
    },
    TimerFired,
    SaveNow,
    MarkSubmitted,
    Saved {
        /// Selection the save was started for; stale results are ignored.
        generation: u64,
        ticket: Option<SaveTicket>,
        submitted: bool,
        result: Result<SaveSubmissionResponse, String>,
    },
}
