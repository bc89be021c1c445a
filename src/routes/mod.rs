// Route exports
pub mod errors;
pub mod locations;

use actix_web::web;

pub use locations::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        .app_data(web::JsonConfig::default().error_handler(errors::handle_json_payload_error))
        .app_data(web::QueryConfig::default().error_handler(errors::handle_query_payload_error))
        .service(
            web::scope("/api")
                .configure(locations::configure),
        );
}
