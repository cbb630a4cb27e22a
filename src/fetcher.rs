//! Pull the full CSV export from Instapaper and archive it.
//!
//! The web flow is: log in through the regular form, open the account page,
//! then submit its "Download .CSV file" form. Instapaper offers no API for the
//! export, so this mirrors what a browser does.

use crate::error::{Error, Result};
use crate::store;
use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.instapaper.com/";

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
const LOGIN_PATH: &str = "/user/login";
const ACCOUNT_PATH: &str = "/user";
const EXPORT_ACTION: &str = "/export/csv";

static FORM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<form\b([^>]*)>(.*?)</form>"#).expect("static form pattern")
});
static INPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<input\b[^>]*>"#).expect("static input pattern"));
static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\baction\s*=\s*["']([^"']*)["']"#).expect("static action pattern")
});
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bname\s*=\s*["']([^"']*)["']"#).expect("static name pattern")
});
static VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bvalue\s*=\s*["']([^"']*)["']"#).expect("static value pattern")
});

/// Login pair read from a `user|password` file.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    /// Parse `user|password`. Both fields are trimmed and anything after a
    /// second `|` is ignored.
    pub fn parse(line: &str) -> Result<Self> {
        let mut fields = line.split('|').map(str::trim);
        let username = fields.next().unwrap_or_default().to_string();
        let password = fields
            .next()
            .ok_or_else(|| Error::FetchFailed("credentials must look like user|password".into()))?
            .to_string();
        if username.is_empty() {
            return Err(Error::FetchFailed("credentials file has no username".into()));
        }
        Ok(Self { username, password })
    }

    pub fn from_file(path: Option<&Path>) -> Result<Self> {
        let path = path
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| Error::FetchFailed("need credentials file".into()))?;
        let raw = fs::read_to_string(path).map_err(|e| {
            Error::FetchFailed(format!("cannot read credentials {}: {}", path.display(), e))
        })?;
        Self::parse(&raw)
    }
}

/// Source of a full reading-list export.
///
/// An empty string means the export was not offered, typically because the
/// login was silently rejected.
pub trait Fetcher {
    fn fetch(&self, credentials: &Credentials) -> Result<String>;
}

pub struct InstapaperFetcher {
    client: reqwest::blocking::Client,
    base: Url,
}

impl InstapaperFetcher {
    pub fn new(base: Url) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .map_err(http_error("build HTTP client"))?;
        Ok(Self { client, base })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::FetchFailed(format!("bad url {}: {}", path, e)))
    }

    fn get_text(&self, path: &str) -> Result<String> {
        let url = self.url(path)?;
        tracing::debug!(%url, "GET");
        self.client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(http_error("GET"))
    }

    fn post_form(&self, path: &str, form: &[(String, String)]) -> Result<String> {
        let url = self.url(path)?;
        tracing::debug!(%url, "POST");
        self.client
            .post(url)
            .form(form)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(http_error("POST"))
    }
}

impl Fetcher for InstapaperFetcher {
    fn fetch(&self, credentials: &Credentials) -> Result<String> {
        // Also sets the session cookie the login form expects.
        let login_page = self.get_text(LOGIN_PATH)?;
        self.post_form(LOGIN_PATH, &login_form(&login_page, credentials))?;

        let account = self.get_text(ACCOUNT_PATH)?;
        match form_fields(&account, EXPORT_ACTION) {
            Some(fields) => self.post_form(EXPORT_ACTION, &fields),
            None => {
                tracing::warn!("export form not found on account page");
                Ok(String::new())
            }
        }
    }
}

fn http_error(what: &'static str) -> impl Fn(reqwest::Error) -> Error {
    move |e| Error::FetchFailed(format!("{}: {}", what, e))
}

/// Named inputs of the form posting to `action`, if the page has one.
pub fn form_fields(html: &str, action: &str) -> Option<Vec<(String, String)>> {
    let body = FORM_RE.captures_iter(html).find_map(|caps| {
        let found = ACTION_RE.captures(&caps[1])?;
        (&found[1] == action).then(|| caps.get(2).map_or("", |m| m.as_str()))
    })?;

    Some(
        INPUT_RE
            .find_iter(body)
            .filter_map(|tag| {
                let name = NAME_RE.captures(tag.as_str())?[1].to_string();
                let value = VALUE_RE
                    .captures(tag.as_str())
                    .map(|v| v[1].to_string())
                    .unwrap_or_default();
                Some((name, value))
            })
            .collect(),
    )
}

/// Login form contents: every input the page carries (hidden `form_key`
/// included) with the username and password filled in.
pub fn login_form(html: &str, credentials: &Credentials) -> Vec<(String, String)> {
    let mut fields = form_fields(html, LOGIN_PATH).unwrap_or_default();
    for (name, value) in [
        ("username", &credentials.username),
        ("password", &credentials.password),
    ] {
        match fields.iter_mut().find(|(n, _)| n == name) {
            Some(field) => field.1 = value.clone(),
            None => fields.push((name.to_string(), value.clone())),
        }
    }
    fields
}

/// Fetch a fresh export and store it as the snapshot for `date`.
/// A blank export is a failure and leaves the archive untouched.
pub fn archive(
    fetcher: &dyn Fetcher,
    credentials: &Credentials,
    dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf> {
    let csv = fetcher.fetch(credentials)?;
    if csv.trim().is_empty() {
        return Err(Error::FetchFailed(
            "export came back empty (login rejected or export form missing)".into(),
        ));
    }
    store::write_snapshot(dir, date, &csv)
}
