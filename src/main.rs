use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use travel_admin::api::ApiClient;
use travel_admin::config::Settings;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let settings = Settings::from_env();
    let api = ApiClient::new(&settings).expect("Failed to configure backend client");
    log::info!("Using backend at {}", api.base_url());

    // Session encryption key: SESSION_KEY keeps sessions valid across restarts
    let secret_key = match &settings.session_key {
        Some(val) => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        None => {
            log::warn!("No usable SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let api = web::Data::new(api);
    let cookie_secure = settings.cookie_secure;

    log::info!("Starting server at http://{}", settings.bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(travel_admin::session_middleware(secret_key.clone(), cookie_secure))
            .wrap(middleware::Logger::default())
            .app_data(api.clone())
            .service(actix_files::Files::new("/static", "./static"))
            .configure(travel_admin::routes)
            // Default 404 handler (must be registered last)
            .default_service(web::to(travel_admin::not_found))
    })
    .bind(&settings.bind_addr)?
    .run()
    .await
}
