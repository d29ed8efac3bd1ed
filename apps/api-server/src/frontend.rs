//! Static files: uploaded media and the single-page frontend shell.

use std::path::{Path, PathBuf};

use actix_files::{Files, NamedFile};
use actix_web::dev::{ServiceRequest, ServiceResponse, fn_service};
use actix_web::web;

/// Mount `/uploads` and the frontend at `/`. Must be registered after the API routes.
pub fn configure(cfg: &mut web::ServiceConfig, uploads_dir: &Path, frontend_dir: &Path) {
    let index: PathBuf = frontend_dir.join("index.html");

    cfg.service(Files::new("/uploads", uploads_dir))
        .service(
            Files::new("/", frontend_dir)
                .index_file("index.html")
                // Client-side routes fall back to the shell.
                .default_handler(fn_service(move |req: ServiceRequest| {
                    let index = index.clone();
                    async move {
                        let (req, _) = req.into_parts();
                        let file = NamedFile::open_async(index).await?;
                        let res = file.into_response(&req);
                        Ok(ServiceResponse::new(req, res))
                    }
                })),
        );
}
