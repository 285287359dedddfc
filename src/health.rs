//! Liveness and readiness probes.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Is the post store attached? Failure → no traffic. |

use http::StatusCode;

use crate::store::SharedStore;
use crate::{Request, Response};

/// Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// `200 OK` with body `"ready"` once the router carries a post store,
/// `503` otherwise.
pub async fn readiness(req: Request) -> Response {
    if req.state::<SharedStore>().is_some() {
        Response::text("ready")
    } else {
        Response::status(StatusCode::SERVICE_UNAVAILABLE)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use http::Method;

    use super::*;
    use crate::store::PostStore;
    use crate::Router;

    fn probe() -> http::Request<Bytes> {
        http::Request::get("/readyz").body(Bytes::new()).unwrap()
    }

    #[tokio::test]
    async fn not_ready_without_store() {
        let app = Router::new().on(Method::GET, "/readyz", readiness);
        assert_eq!(app.handle(probe()).await.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn ready_with_store() {
        let app = Router::new()
            .on(Method::GET, "/readyz", readiness)
            .with_state(Arc::new(PostStore::new()));
        let res = app.handle(probe()).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), b"ready");
    }
}
