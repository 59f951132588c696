use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{
    app_state::AppState,
    config::{ApplicationSettings, ImageSettings},
    routes,
};

pub fn create(
    app_state: AppState,
    application: &ApplicationSettings,
    images: &ImageSettings,
) -> Router<()> {
    let app = Router::new()
        .route("/", get(|| async { "Hello, little Phonebook!" }))
        .nest(
            "/phonebooks",
            routes::phonebooks::router(images.max_upload_bytes),
        );

    // Finally, wrap the app with tracing layer, state and CORS
    app.with_state(app_state)
        .layer(cors_layer(&application.cors_allowed_origins))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins = allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("ignoring invalid CORS origin {:?}", origin);
                    None
                }
            })
            .collect::<Vec<_>>();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(allow_origin)
}
