mod change_feed;
mod config;
mod error;
mod services;
mod state;
mod store;

use crate::config::ServerSettings;
use crate::state::AppState;
use crate::store::Store;
use actix_files::NamedFile;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use env_logger::Env;
use log::{error, info};
use std::path::{Component, Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Resolves a request path inside `root`, rejecting anything that could
/// escape it.
fn static_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = Path::new(request_path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(root.join(relative))
}

/// Serves the built frontend, falling back to `index.html` for client routes.
async fn serve_static(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let root = &state.settings.static_dir;
    let candidate = match req.path().trim_start_matches('/') {
        "" => None,
        path => static_path(root, path).filter(|p| p.is_file()),
    };
    let file = candidate.unwrap_or_else(|| root.join("index.html"));

    match NamedFile::open_async(&file).await {
        Ok(named) => named.into_response(&req),
        Err(_) => HttpResponse::NotFound().body("Not Found"),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = match ServerSettings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    env_logger::init_from_env(Env::default().default_filter_or(settings.log_level.as_str()));

    let store = match Store::open(&settings.database_path) {
        Ok(store) => store,
        Err(e) => {
            error!("cannot open {}: {}", settings.database_path.display(), e);
            std::process::exit(1);
        }
    };
    if let Err(e) = store.load_config() {
        error!("cannot load configuration: {}", e);
        std::process::exit(1);
    }

    let url = settings.url();
    if settings.open_browser {
        let url = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&url);
        });
    }

    let bind = (settings.host.clone(), settings.port);
    let json_limit = settings.json_limit_bytes;
    let state = AppState::new(store, settings);

    info!("Server running at {}", url);

    HttpServer::new({
        let state = state.clone();
        move || {
            App::new()
                .app_data(web::JsonConfig::default().limit(json_limit))
                .app_data(web::Data::new(state.clone()))
                .service(services::config::configure_routes())
                .service(services::submissions::configure_routes())
                .service(services::weeks::configure_routes())
                .service(services::export::configure_routes())
                .default_service(web::route().to(serve_static))
        }
    })
    .bind(bind)?
    .run()
    .await?;

    info!(
        "Server stopped, closing {} open subscriptions",
        state.feed.subscriber_count()
    );
    drop(state);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_path_rejects_traversal() {
        let root = Path::new("/srv/static");
        assert_eq!(
            static_path(root, "/assets/app.js"),
            Some(PathBuf::from("/srv/static/assets/app.js"))
        );
        assert_eq!(static_path(root, "/../secret"), None);
        assert_eq!(static_path(root, "/assets/../../etc/passwd"), None);
    }

    #[actix_web::test]
    async fn unknown_route_falls_back_to_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>kpi</html>").unwrap();
        let settings = ServerSettings {
            static_dir: dir.path().to_path_buf(),
            ..ServerSettings::default()
        };
        let state = AppState::new(Store::open_in_memory().unwrap(), settings);
        let app = actix_web::test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .default_service(web::route().to(serve_static)),
        )
        .await;

        let req = actix_web::test::TestRequest::get()
            .uri("/dashboard")
            .to_request();
        let body = actix_web::test::call_and_read_body(&app, req).await;
        assert_eq!(body, "<html>kpi</html>");
    }
}
