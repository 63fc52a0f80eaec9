use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::api::ApiClient;
use crate::auth::session::api_for;
use crate::errors::{AppError, render};
use crate::store::Directory;
use crate::templates_structs::{CountCard, DashboardTemplate, PageContext};
use crate::views::ListState;

fn card<T>(label: &'static str, href: &'static str, state: &ListState<T>) -> CountCard {
    CountCard {
        label,
        href,
        count: state.is_loaded().then(|| state.items().len()),
        error: state.error().map(String::from),
    }
}

pub async fn index(
    api: web::Data<ApiClient>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let api = api_for(&api, &session);
    let directory = Directory::load(&api).await?;

    let ctx = PageContext::build(&session, "/dashboard");
    let cards = vec![
        card("Users", "/dashboard/users", directory.users_state()),
        card("Roles", "/dashboard/roles", directory.roles_state()),
        card("Permissions", "/dashboard/permissions", directory.permissions_state()),
    ];
    let tmpl = DashboardTemplate {
        ctx,
        cards,
        assignments: directory.user_roles().len(),
    };
    render(tmpl)
}
