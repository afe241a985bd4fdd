//! Winner selection.

use rc_02_commit_store::DriverCommit;

/// Picks the eligible commit minimising `(eta, submitted_at, driver)`.
///
/// Commits with `eta > max_driver_eta` are ignored. Input order is
/// irrelevant; the key is total because drivers are unique per request.
#[must_use]
pub fn select_winner(commits: &[DriverCommit], max_driver_eta: u32) -> Option<&DriverCommit> {
    commits
        .iter()
        .filter(|c| c.eta <= max_driver_eta)
        .min_by_key(|c| (c.eta, c.submitted_at, c.driver))
}
