//! Server-rendered page endpoints.
//!
//! Every request renders the whole page from scratch: the banner is loaded,
//! the ledger is read once, and an `id` query parameter short-circuits
//! everything else into an identifier lookup.

use std::sync::Arc;

use axum::{
    Form,
    extract::{RawQuery, State},
    response::Html,
};
use entities::UserRecord;
use record_store::RecordStore;
use serde::Deserialize;

use crate::error::ServerResult;
use crate::render::{AdminView, BannerView, MainSections, Notice, Page, PageBody};
use crate::services::{
    admin::{self, AssignOutcome},
    banner::load_banner,
    lookup::{self, ID_PARAM, IdLookup},
    qr,
    registration::{self, RegistrationInput, RegistrationOutcome},
};
use crate::state::AppState;

/// Registration form fields.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub program: Option<String>,
}

/// Point lookup form fields.
#[derive(Debug, Default, Deserialize)]
pub struct LookupForm {
    #[serde(default)]
    pub email: String,
}

/// Admin gate form fields.
#[derive(Debug, Default, Deserialize)]
pub struct AdminLoginForm {
    #[serde(default)]
    pub admin_email: String,
}

/// Admin point assignment form fields.
#[derive(Debug, Default, Deserialize)]
pub struct AssignForm {
    #[serde(default)]
    pub admin_email: String,
    #[serde(default)]
    pub target_email: String,
    #[serde(default)]
    pub amount: String,
}

/// The form submitted with this render, if any.
enum PageAction {
    View,
    Register(RegisterForm),
    Lookup(LookupForm),
    AdminLogin(AdminLoginForm),
    Assign(AssignForm),
}

/// Renders the page.
pub async fn home<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    RawQuery(query): RawQuery,
) -> ServerResult<Html<String>> {
    render(&state, query.as_deref(), PageAction::View).await
}

/// Handles the registration form.
pub async fn register<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    RawQuery(query): RawQuery,
    Form(form): Form<RegisterForm>,
) -> ServerResult<Html<String>> {
    render(&state, query.as_deref(), PageAction::Register(form)).await
}

/// Handles the point lookup form.
pub async fn lookup<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    RawQuery(query): RawQuery,
    Form(form): Form<LookupForm>,
) -> ServerResult<Html<String>> {
    render(&state, query.as_deref(), PageAction::Lookup(form)).await
}

/// Handles the admin gate form.
pub async fn admin_login<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    RawQuery(query): RawQuery,
    Form(form): Form<AdminLoginForm>,
) -> ServerResult<Html<String>> {
    render(&state, query.as_deref(), PageAction::AdminLogin(form)).await
}

/// Handles the admin point assignment form.
pub async fn assign_points<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    RawQuery(query): RawQuery,
    Form(form): Form<AssignForm>,
) -> ServerResult<Html<String>> {
    render(&state, query.as_deref(), PageAction::Assign(form)).await
}

async fn render<S: RecordStore + 'static>(
    state: &AppState<S>,
    query: Option<&str>,
    action: PageAction,
) -> ServerResult<Html<String>> {
    let banner = match load_banner(&state.config.banner_path).await {
        Ok(banner) => BannerView::Image(banner.data_url()),
        Err(e) => {
            tracing::warn!(path = %state.config.banner_path.display(), error = %e, "Welcome banner unavailable");
            BannerView::Missing
        }
    };

    let users = state.store.list_users().await?;

    let body = match lookup::first_query_param(query, ID_PARAM) {
        Some(raw_id) => lookup_body(&users, &raw_id),
        None => PageBody::Main(main_sections(state, &users, action).await?),
    };

    let page = Page {
        title: state.config.site_title.clone(),
        banner,
        body,
    };

    Ok(Html(page.to_html()))
}

fn lookup_body(users: &[UserRecord], raw_id: &str) -> PageBody {
    match lookup::lookup_by_id(users, raw_id) {
        IdLookup::Found(user) => PageBody::Lookup {
            greeting: Some(format!("Hello, {}!", user.name)),
            notice: Notice::Success(format!("You have {} points", user.points)),
        },
        IdLookup::NotFound => PageBody::Lookup {
            greeting: None,
            notice: Notice::Error("User not found.".to_string()),
        },
        IdLookup::Invalid => PageBody::Lookup {
            greeting: None,
            notice: Notice::Error("Invalid ID.".to_string()),
        },
    }
}

async fn main_sections<S: RecordStore + 'static>(
    state: &AppState<S>,
    users: &[UserRecord],
    action: PageAction,
) -> ServerResult<MainSections> {
    let mut sections = MainSections::default();

    match action {
        PageAction::View => {}
        PageAction::Register(form) => {
            let input = RegistrationInput {
                name: form.name,
                email: form.email,
                program: form.program,
            };
            let now = chrono::Local::now().naive_local();

            match registration::register(state, input, now).await? {
                RegistrationOutcome::Registered { user, qr_png, .. } => {
                    sections.registration = Some(Notice::Success(format!(
                        "Registration successful! Welcome, {}",
                        user.name
                    )));
                    sections.registration_qr = Some(qr::data_url("image/png", &qr_png));
                }
                RegistrationOutcome::MissingFields => {
                    sections.registration =
                        Some(Notice::Error("Please fill in name and email.".to_string()));
                }
                RegistrationOutcome::UnknownProgram(program) => {
                    sections.registration =
                        Some(Notice::Error(format!("Unknown program: {program}")));
                }
                RegistrationOutcome::DuplicateEmail => {
                    sections.registration =
                        Some(Notice::Error("This email is already registered.".to_string()));
                }
            }
        }
        PageAction::Lookup(form) => {
            sections.search = Some(match lookup::lookup_by_email(users, &form.email) {
                Some(user) => {
                    Notice::Success(format!("{}, you have {} points", user.name, user.points))
                }
                None => Notice::Error(
                    "We could not find that email. Have you registered?".to_string(),
                ),
            });
        }
        PageAction::AdminLogin(form) => {
            sections.admin = admin_view(state, form.admin_email, None);
        }
        PageAction::Assign(form) => {
            if state.config.is_admin(&form.admin_email) {
                let notice = assign_notice(state, &form).await?;
                sections.admin = admin_view(state, form.admin_email, Some(notice));
            } else {
                tracing::warn!("Point assignment attempted without admin access");
            }
        }
    }

    Ok(sections)
}

fn admin_view<S: RecordStore + 'static>(
    state: &AppState<S>,
    admin_email: String,
    notice: Option<Notice>,
) -> AdminView {
    if state.config.is_admin(&admin_email) {
        tracing::info!("Admin panel unlocked");
        AdminView::Unlocked {
            admin_email,
            notice,
        }
    } else {
        tracing::info!("Admin gate denied");
        AdminView::Locked
    }
}

async fn assign_notice<S: RecordStore + 'static>(
    state: &AppState<S>,
    form: &AssignForm,
) -> ServerResult<Notice> {
    let Some(amount) = admin::parse_amount(&form.amount) else {
        return Ok(Notice::Error(
            "Points must be a whole number of at least 1.".to_string(),
        ));
    };

    Ok(
        match admin::assign_points(state, &form.target_email, amount).await? {
            AssignOutcome::Assigned { email, amount, .. } => {
                Notice::Success(format!("Assigned {amount} points to {email}!"))
            }
            AssignOutcome::NotFound => Notice::Error("Email not found.".to_string()),
            AssignOutcome::InvalidAmount => Notice::Error(
                "Points must be a whole number of at least 1.".to_string(),
            ),
        },
    )
}
