//! HTML rendering of the points page.
//!
//! The page is a plain server-rendered document. Handlers build a [`Page`]
//! describing which sections are visible and what each one says, and
//! [`Page::to_html`] turns it into markup.

use std::fmt;

use entities::Program;

/// A user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    fn class(&self) -> &'static str {
        match self {
            Notice::Success(_) => "success",
            Notice::Info(_) => "info",
            Notice::Warning(_) => "warning",
            Notice::Error(_) => "error",
        }
    }

    /// Returns the message text.
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(text)
            | Notice::Info(text)
            | Notice::Warning(text)
            | Notice::Error(text) => text,
        }
    }
}

/// Top-of-page banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BannerView {
    /// Inline image source.
    Image(String),
    /// The banner could not be loaded.
    Missing,
}

/// Admin panel state for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminView {
    /// Gate not passed: only the login field and the private notice render.
    Locked,
    /// Gate passed for `admin_email`.
    Unlocked {
        admin_email: String,
        notice: Option<Notice>,
    },
}

/// Sections shown when no lookup identifier is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainSections {
    pub registration: Option<Notice>,
    /// Inline QR image for a fresh registration.
    pub registration_qr: Option<String>,
    pub search: Option<Notice>,
    pub admin: AdminView,
}

impl Default for MainSections {
    fn default() -> Self {
        Self {
            registration: None,
            registration_qr: None,
            search: None,
            admin: AdminView::Locked,
        }
    }
}

/// Page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBody {
    /// Identifier lookup result; nothing else renders.
    Lookup {
        greeting: Option<String>,
        notice: Notice,
    },
    Main(MainSections),
}

/// A full page render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub banner: BannerView,
    pub body: PageBody,
}

pub const BANNER_MISSING: &str = "Welcome image not found.";
pub const QR_CAPTION: &str = "Scan this QR code to see your points";
pub const ADMIN_PRIVATE: &str = "This panel is private.";
pub const ADMIN_ACTIVE: &str = "Admin panel enabled";

/// Escapes text for use in HTML content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn notice_html(f: &mut fmt::Formatter<'_>, notice: &Notice) -> fmt::Result {
    writeln!(
        f,
        r#"<p class="notice {}">{}</p>"#,
        notice.class(),
        escape(notice.text())
    )
}

impl Page {
    /// Renders the page to an HTML document.
    pub fn to_html(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = escape(&self.title);

        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, r#"<html lang="en"><head><meta charset="utf-8">"#)?;
        writeln!(
            f,
            r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#
        )?;
        writeln!(f, "<title>{title}</title>")?;
        writeln!(f, "<style>{STYLE}</style></head><body><main>")?;

        match &self.banner {
            BannerView::Image(src) => {
                writeln!(f, r#"<img class="banner" src="{}" alt="">"#, escape(src))?;
            }
            BannerView::Missing => notice_html(f, &Notice::Warning(BANNER_MISSING.into()))?,
        }

        writeln!(f, "<h1>{title}</h1>")?;

        match &self.body {
            PageBody::Lookup { greeting, notice } => {
                if let Some(greeting) = greeting {
                    writeln!(f, "<h2>{}</h2>", escape(greeting))?;
                }
                notice_html(f, notice)?;
            }
            PageBody::Main(sections) => render_main(f, sections)?,
        }

        writeln!(f, "</main></body></html>")
    }
}

fn render_main(f: &mut fmt::Formatter<'_>, sections: &MainSections) -> fmt::Result {
    writeln!(f, "<section id=\"register\"><h2>Register</h2>")?;
    writeln!(f, r#"<form method="post" action="/register">"#)?;
    writeln!(f, r#"<label>Full name <input name="name"></label>"#)?;
    writeln!(f, r#"<label>Email <input name="email" type="email"></label>"#)?;
    writeln!(f, r#"<label>Program <select name="program">"#)?;
    for program in Program::ALL {
        writeln!(f, "<option>{}</option>", escape(program.as_str()))?;
    }
    writeln!(f, "</select></label><button>Register</button></form>")?;
    if let Some(notice) = &sections.registration {
        notice_html(f, notice)?;
    }
    if let Some(src) = &sections.registration_qr {
        writeln!(
            f,
            r#"<figure><img src="{}" width="200" alt="QR code"><figcaption>{QR_CAPTION}</figcaption></figure>"#,
            escape(src)
        )?;
    }
    writeln!(f, "</section>")?;

    writeln!(f, "<section id=\"lookup\"><h2>Check your points</h2>")?;
    writeln!(f, r#"<form method="post" action="/lookup">"#)?;
    writeln!(f, r#"<label>Your email <input name="email"></label>"#)?;
    writeln!(f, "<button>Search</button></form>")?;
    if let Some(notice) = &sections.search {
        notice_html(f, notice)?;
    }
    writeln!(f, "</section>")?;

    writeln!(f, "<section id=\"admin\"><h2>Admin access</h2>")?;
    writeln!(f, r#"<form method="post" action="/admin">"#)?;
    writeln!(
        f,
        r#"<label>Admins only: enter your email <input name="admin_email"></label>"#
    )?;
    writeln!(f, "<button>Enter</button></form>")?;
    match &sections.admin {
        AdminView::Locked => notice_html(f, &Notice::Info(ADMIN_PRIVATE.into()))?,
        AdminView::Unlocked {
            admin_email,
            notice,
        } => render_admin_panel(f, admin_email, notice.as_ref())?,
    }
    writeln!(f, "</section>")
}

fn render_admin_panel(
    f: &mut fmt::Formatter<'_>,
    admin_email: &str,
    notice: Option<&Notice>,
) -> fmt::Result {
    notice_html(f, &Notice::Success(ADMIN_ACTIVE.into()))?;

    writeln!(f, r#"<form method="post" action="/admin/assign">"#)?;
    writeln!(
        f,
        r#"<input type="hidden" name="admin_email" value="{}">"#,
        escape(admin_email)
    )?;
    writeln!(f, r#"<label>Member email <input name="target_email"></label>"#)?;
    writeln!(
        f,
        r#"<label>Points to add <input name="amount" type="number" min="1" step="1" value="1"></label>"#
    )?;
    writeln!(f, "<button>Assign</button></form>")?;
    if let Some(notice) = notice {
        notice_html(f, notice)?;
    }

    let encoded = urlencoding::encode(admin_email);
    writeln!(
        f,
        r#"<p><a download href="/admin/export/users.csv?admin_email={encoded}">Download members (users.csv)</a></p>"#
    )?;
    writeln!(
        f,
        r#"<p><a download href="/admin/export/registrations.csv?admin_email={encoded}">Download registrations (registrations.csv)</a></p>"#
    )
}

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:auto;padding:1rem}\
label{display:block;margin:.5rem 0}\
.banner{width:100%}\
.notice{padding:.5rem;border-radius:.25rem}\
.success{background:#e6f4ea}.info{background:#e8f0fe}\
.warning{background:#fef7e0}.error{background:#fce8e6}";
