// Logging, compression and CORS middleware.

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::{Compress, Logger};

pub fn setup_middleware() -> (Logger, Compress) {
    let logger = Logger::default();
    let compress = Compress::default();
    (logger, compress)
}

/// Comma-separated origin list; an unset list allows any origin.
pub fn setup_cors(allowed_origins: Option<&str>) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "DELETE"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600);

    match allowed_origins {
        Some(origins) => {
            for origin in origins.split(',').filter(|s| !s.trim().is_empty()) {
                cors = cors.allowed_origin(origin.trim());
            }
        }
        None => {
            cors = cors.allow_any_origin();
        }
    }

    cors
}
