use askama::Template;

use super::PageContext;

/// One overview card. `count` is `None` when the collection failed to load.
pub struct CountCard {
    pub label: &'static str,
    pub href: &'static str,
    pub count: Option<usize>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub cards: Vec<CountCard>,
    pub assignments: usize,
}

