//! Search-and-pick dialogs for users, roles and permissions.
//!
//! A dialog is rebuilt from the query string on every request: opening it
//! loads the candidates, `dq` narrows them, `pick` marks the pending choice and
//! the confirm link hands the chosen key back to the page that opened it.

use serde::Deserialize;

use crate::models::{Permission, Role, User};
use crate::views::ListState;

/// Something a selection dialog can list and filter.
pub trait Searchable {
    fn key(&self) -> &str;
    /// Fields matched against the search term.
    fn search_fields(&self) -> Vec<&str>;
    fn title(&self) -> String;
    fn subtitle(&self) -> String;
}

impl Searchable for User {
    fn key(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn subtitle(&self) -> String {
        self.email.clone()
    }
}

impl Searchable for Role {
    fn key(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn subtitle(&self) -> String {
        self.description.clone()
    }
}

impl Searchable for Permission {
    fn key(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.url.as_str(), self.method.as_str()]
    }

    fn title(&self) -> String {
        self.url.clone()
    }

    fn subtitle(&self) -> String {
        self.method.to_string()
    }
}

/// Case-insensitive substring match on any field. An empty query matches everything.
pub fn matches(query: &str, fields: &[&str]) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    fields.iter().any(|f| f.to_lowercase().contains(&query))
}

pub fn filter<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| matches(query, &item.search_fields()))
        .collect()
}

/// Query-string state of whichever dialog is open on a page.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DialogQuery {
    pub dialog: Option<String>,
    /// Search term typed inside the dialog.
    #[serde(rename = "dq", default)]
    pub q: String,
    pub pick: Option<String>,
}

impl DialogQuery {
    pub fn is_open(&self, name: &str) -> bool {
        self.dialog.as_deref() == Some(name)
    }
}

/// An open dialog. Closing it is navigation: the confirm link carries the
/// pending choice back to the page, the cancel link drops it.
#[derive(Debug, Clone)]
pub struct SelectionDialog<T> {
    candidates: ListState<T>,
    query: String,
    pending: Option<String>,
}

impl<T: Searchable> SelectionDialog<T> {
    /// Open over a collection the page already loaded. Search and pending
    /// choice always start empty.
    pub fn open(candidates: ListState<T>) -> Self {
        Self { candidates, query: String::new(), pending: None }
    }

    /// Rebuild an open dialog from its query-string state.
    pub fn restore(candidates: ListState<T>, state: &DialogQuery) -> Self {
        let mut dialog = Self::open(candidates);
        dialog.search(&state.q);
        if let Some(key) = state.pick.as_deref() {
            dialog.select(key);
        }
        dialog
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn error(&self) -> Option<&str> {
        self.candidates.error()
    }

    pub fn search(&mut self, query: &str) {
        self.query = query.trim().to_string();
    }

    pub fn visible(&self) -> Vec<&T> {
        filter(self.candidates.items(), &self.query)
    }

    /// Mark a candidate as the pending choice. Unknown keys are ignored.
    pub fn select(&mut self, key: &str) -> bool {
        let known = self.candidates.items().iter().any(|c| c.key() == key);
        if known {
            self.pending = Some(key.to_string());
        }
        known
    }

    pub fn pending(&self) -> Option<&T> {
        let key = self.pending.as_deref()?;
        self.candidates.items().iter().find(|c| c.key() == key)
    }
}

/// One candidate row in a rendered dialog.
#[derive(Debug, Clone)]
pub struct SelectionRow {
    pub title: String,
    pub subtitle: String,
    pub href: String,
    pub selected: bool,
}

/// Render data for an open dialog.
#[derive(Debug, Clone)]
pub struct SelectionPanel {
    pub title: String,
    pub base: String,
    pub dialog: String,
    pub query: String,
    /// Page state preserved by every link and by the search form.
    pub hidden: Vec<(String, String)>,
    pub rows: Vec<SelectionRow>,
    pub error: Option<String>,
    pub pending_title: Option<String>,
    pub confirm_href: Option<String>,
    pub cancel_href: String,
}

/// Append percent-encoded path segments to `base`.
pub fn url_path(base: &str, segments: &[&str]) -> String {
    let mut out = base.to_string();
    for segment in segments {
        out.push('/');
        out.push_str(&urlencoding::encode(segment));
    }
    out
}

/// Build a link to `base` with the given query pairs.
pub fn link(base: &str, params: &[(&str, &str)]) -> String {
    let params: Vec<(&str, &str)> = params.iter().copied().filter(|(_, v)| !v.is_empty()).collect();
    match serde_urlencoded::to_string(&params) {
        Ok(qs) if !qs.is_empty() => format!("{base}?{qs}"),
        _ => base.to_string(),
    }
}

impl SelectionPanel {
    pub fn build<T, F>(
        dialog: &SelectionDialog<T>,
        title: &str,
        base: &str,
        name: &str,
        keep: &[(&str, &str)],
        confirm_href: F,
    ) -> Self
    where
        T: Searchable,
        F: Fn(&T) -> String,
    {
        let with = |extra: &[(&str, &str)]| {
            let mut params: Vec<(&str, &str)> = keep.to_vec();
            params.extend_from_slice(extra);
            link(base, &params)
        };

        let pending_key = dialog.pending().map(|p| p.key().to_string());
        let rows = dialog
            .visible()
            .into_iter()
            .map(|item| SelectionRow {
                title: item.title(),
                subtitle: item.subtitle(),
                href: with(&[("dialog", name), ("dq", dialog.query()), ("pick", item.key())]),
                selected: pending_key.as_deref() == Some(item.key()),
            })
            .collect();

        Self {
            title: title.to_string(),
            base: base.to_string(),
            dialog: name.to_string(),
            query: dialog.query().to_string(),
            hidden: keep
                .iter()
                .filter(|(_, v)| !v.is_empty())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            rows,
            error: dialog.error().map(String::from),
            pending_title: dialog.pending().map(Searchable::title),
            confirm_href: dialog.pending().map(confirm_href),
            cancel_href: with(&[]),
        }
    }
}
