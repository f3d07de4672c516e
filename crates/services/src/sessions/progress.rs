/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    /// Zero-based index of the question on screen.
    pub current: usize,
    /// `None` when the session has no time limit.
    pub remaining_seconds: Option<u32>,
    pub is_submitted: bool,
}
