//! Serving the built single-page front end in production.

use std::path::Path;

use actix_files::{Files, NamedFile};
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};

/// Serves files from `dir`. Paths that match no file get `index.html`, so
/// client-side routes survive a reload. Register after the API scope.
pub fn spa_service(dir: impl AsRef<Path>) -> Files {
    let dir = dir.as_ref().to_path_buf();
    let index = dir.join("index.html");

    Files::new("/", dir)
        .index_file("index.html")
        .default_handler(fn_service(move |req: ServiceRequest| {
            let index = index.clone();
            async move {
                let (req, _) = req.into_parts();
                let file = NamedFile::open_async(&index).await?;
                let res = file.into_response(&req);
                Ok(ServiceResponse::new(req, res))
            }
        }))
}
