//! Admin point assignment.

use record_store::RecordStore;

use crate::error::ServerResult;
use crate::state::AppState;

/// Outcome of an admin point assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    /// Points were credited.
    Assigned {
        /// Member email.
        email: String,
        /// Points added.
        amount: u64,
        /// Balance after the assignment.
        balance: u64,
    },
    /// No ledger row has that email.
    NotFound,
    /// The amount is not an integer of at least 1.
    InvalidAmount,
}

/// Parses an amount field; only integers of at least 1 are accepted.
pub fn parse_amount(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|amount| *amount >= 1)
}

/// Credits `amount` points to the member registered under `email`.
///
/// The caller must already have checked the admin gate. Assignments are not
/// written to the registration log.
pub async fn assign_points<S: RecordStore>(
    state: &AppState<S>,
    email: &str,
    amount: u64,
) -> ServerResult<AssignOutcome> {
    if amount < 1 {
        return Ok(AssignOutcome::InvalidAmount);
    }

    let credited = state.store.update_points(email, amount).await?;
    if credited == 0 {
        tracing::info!(amount, "Point assignment rejected: email not found");
        return Ok(AssignOutcome::NotFound);
    }

    let balance = state
        .store
        .list_users()
        .await?
        .into_iter()
        .find(|u| u.email == email)
        .map_or(amount, |u| u.points);

    tracing::info!(amount, balance, credited, "Points assigned");

    Ok(AssignOutcome::Assigned {
        email: email.to_string(),
        amount,
        balance,
    })
}
