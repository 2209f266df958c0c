// API route configuration

use crate::api::handlers;
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health_check))
        .route("/status", web::get().to(handlers::get_status))
        .service(
            web::scope("/countries")
                // Literal segments must register ahead of the {name} matcher.
                .route("/refresh", web::post().to(handlers::refresh_countries))
                .route("/image", web::get().to(handlers::summary_image))
                .route("", web::get().to(handlers::list_countries))
                .route("/{name}", web::get().to(handlers::get_country))
                .route("/{name}", web::delete().to(handlers::delete_country)),
        );
}
