//! Member registration.

use chrono::NaiveDateTime;
use entities::{Program, RegistrationLogEntry, UserRecord, next_user_id};
use record_store::RecordStore;

use crate::error::{ServerError, ServerResult};
use crate::services::qr;
use crate::state::AppState;

/// Registration form input.
#[derive(Debug, Clone, Default)]
pub struct RegistrationInput {
    /// Full name, required.
    pub name: String,
    /// Email, required and unique in the ledger.
    pub email: String,
    /// Program name; blank or absent selects the default program.
    pub program: Option<String>,
}

/// Outcome of a registration attempt.
#[derive(Debug, Clone)]
pub enum RegistrationOutcome {
    /// The member was written to the ledger and the registration log.
    Registered {
        /// The new ledger row.
        user: UserRecord,
        /// URL encoded in the QR code.
        lookup_url: String,
        /// QR code PNG.
        qr_png: Vec<u8>,
    },
    /// Name or email was empty.
    MissingFields,
    /// The program is not one of the fixed programs.
    UnknownProgram(String),
    /// The email is already in the ledger.
    DuplicateEmail,
}

/// Resolves the program field, treating blank as the default program.
fn parse_program(raw: Option<&str>) -> Result<Program, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Program::default()),
        Some(name) => name.parse().map_err(|_| name.to_string()),
    }
}

/// Registers a new member.
///
/// Rejections happen before any write. Once the ledger row is written the
/// log entry always follows; a failure between the two is not rolled back.
pub async fn register<S: RecordStore>(
    state: &AppState<S>,
    input: RegistrationInput,
    at: NaiveDateTime,
) -> ServerResult<RegistrationOutcome> {
    if input.name.is_empty() || input.email.is_empty() {
        return Ok(RegistrationOutcome::MissingFields);
    }

    let program = match parse_program(input.program.as_deref()) {
        Ok(program) => program,
        Err(name) => return Ok(RegistrationOutcome::UnknownProgram(name)),
    };

    let _guard = state.registration_lock.lock().await;

    let users = state.store.list_users().await?;
    if users.iter().any(|u| u.email == input.email) {
        tracing::info!("Registration rejected: email already registered");
        return Ok(RegistrationOutcome::DuplicateEmail);
    }

    let id = next_user_id(&users).ok_or(ServerError::IdsExhausted)?;
    let user = UserRecord::new(id, input.name, input.email, program);
    state.store.append_user(user.clone()).await?;

    let entry = RegistrationLogEntry::new(at, &user.name, &user.email, program);
    state.store.append_registration(entry).await?;

    let lookup_url = state.config.lookup_url(user.id);
    let qr_png = qr::encode_png(&lookup_url)?;

    tracing::info!(user_id = user.id, program = %program, "Member registered");

    Ok(RegistrationOutcome::Registered {
        user,
        lookup_url,
        qr_png,
    })
}
