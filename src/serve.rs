// Local preview server for a generated report directory.
//
// Blocks until the process is terminated. Only reachable from the `serve`
// subcommand; `build` never starts it.
use actix_web::{web, App, HttpResponse, HttpServer};
use log::{debug, info, warn};
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BIND: &str = "127.0.0.1";

#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub dir: PathBuf,
    pub bind: String,
    pub port: u16,
}

pub fn serve(config: ServeConfig) -> io::Result<()> {
    actix_web::rt::System::new().block_on(run(config))
}

async fn run(config: ServeConfig) -> io::Result<()> {
    let root = web::Data::new(config.dir.clone());
    info!(
        "Serving {} at http://{}:{}/ (Ctrl+C to stop)",
        config.dir.display(),
        config.bind,
        config.port
    );
    HttpServer::new(move || {
        App::new()
            .app_data(root.clone())
            .route("/{tail:.*}", web::get().to(serve_file))
    })
    .workers(1)
    .bind((config.bind.as_str(), config.port))?
    .run()
    .await
}

pub(crate) async fn serve_file(tail: web::Path<String>, root: web::Data<PathBuf>) -> HttpResponse {
    let Some(path) = resolve(root.get_ref(), &tail) else {
        debug!("Rejected path {:?}", tail.as_str());
        return HttpResponse::NotFound().finish();
    };
    let file = path.clone();
    match web::block(move || std::fs::read(file)).await {
        Ok(Ok(body)) => HttpResponse::Ok()
            .content_type(content_type(&path))
            .body(body),
        Ok(Err(e)) => {
            debug!("{}: {}", path.display(), e);
            HttpResponse::NotFound().finish()
        }
        Err(e) => {
            warn!("{}: blocking read failed: {}", path.display(), e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Map a request path onto a file under `root`. `..` is refused outright;
/// directories fall back to their `index.html`.
pub fn resolve(root: &Path, request: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for part in request.split('/') {
        match part {
            "" | "." => continue,
            ".." => return None,
            p if p.contains('\\') => return None,
            p => path.push(p),
        }
    }
    if path.is_dir() {
        path.push("index.html");
    }
    Some(path)
}

pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("csv") => "text/csv; charset=utf-8",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::{call_service, init_service, read_body, TestRequest};
    use std::fs;

    fn site(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("sped_gap_serve_{}", name));
        let _ = fs::remove_dir_all(&p);
        fs::create_dir_all(&p).unwrap();
        fs::write(p.join("index.html"), "<h1>report</h1>").unwrap();
        p
    }

    #[test]
    fn resolve_refuses_traversal() {
        let root = Path::new("/srv/report");
        assert_eq!(resolve(root, "../etc/passwd"), None);
        assert_eq!(resolve(root, "a/../../b"), None);
        assert_eq!(
            resolve(root, "img/logo.png"),
            Some(PathBuf::from("/srv/report/img/logo.png"))
        );
    }

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type(Path::new("index.HTML")), "text/html; charset=utf-8");
        assert_eq!(content_type(Path::new("favicon.ico")), "image/x-icon");
        assert_eq!(content_type(Path::new("blob")), "application/octet-stream");
    }

    #[actix_web::test]
    async fn root_serves_index_html() {
        let root = site("index");
        let app = init_service(
            App::new()
                .app_data(web::Data::new(root))
                .route("/{tail:.*}", web::get().to(serve_file)),
        )
        .await;

        let resp = call_service(&app, TestRequest::get().uri("/").to_request()).await;
        assert!(resp.status().is_success());
        let body = read_body(resp).await;
        assert_eq!(&body[..], b"<h1>report</h1>");

        let missing =
            call_service(&app, TestRequest::get().uri("/nope.png").to_request()).await;
        assert_eq!(missing.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn nested_file_served_with_its_content_type() {
        let root = site("nested");
        fs::create_dir_all(root.join("img")).unwrap();
        fs::write(root.join("img").join("logo.png"), [0x89u8, b'P', b'N', b'G']).unwrap();
        let app = init_service(
            App::new()
                .app_data(web::Data::new(root))
                .route("/{tail:.*}", web::get().to(serve_file)),
        )
        .await;

        let resp =
            call_service(&app, TestRequest::get().uri("/img/logo.png").to_request()).await;
        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers().get(actix_web::http::header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
        let body = read_body(resp).await;
        assert_eq!(&body[..], &[0x89u8, b'P', b'N', b'G'][..]);
    }
}
