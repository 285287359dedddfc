//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. A path that exists under
//! some other method answers `405` with an `allow` header; anything else is
//! `404`.
//!
//! Handlers of different types share one tree by being erased into an
//! [`Endpoint`] when they are registered. At request time the router merges
//! its shared state into the request's extensions and calls the endpoint:
//!
//! ```text
//! .on(GET, "/posts/{post_id}", get_post)    get_post.into_endpoint()
//! handle(GET /posts/2)                      tree lookup → Route { pattern, endpoint }
//!                                           parts.extensions ⊇ state
//! (route.endpoint)(Request)                 get_post(req).await.into_response()
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::{Extensions, Method, StatusCode};
use matchit::Router as MatchitRouter;
use tracing::info;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

#[doc(hidden)]
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// A registered handler with its concrete type erased.
#[doc(hidden)]
pub type Endpoint = Arc<dyn Fn(Request) -> BoxFuture + Send + Sync + 'static>;

/// Any `async fn(Request) -> impl IntoResponse`.
///
/// Sealed: the blanket impl below is the only way to satisfy it.
pub trait Handler: sealed::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_endpoint(self) -> Endpoint;
}

mod sealed {
    pub trait Sealed {}
}

impl<F, Fut, R> sealed::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_endpoint(self) -> Endpoint {
        Arc::new(move |req| {
            let fut = self(req);
            Box::pin(async move { fut.await.into_response() })
        })
    }
}

/// What a tree leaf holds: the pattern it was registered under, for the
/// request log, and the endpoint to call.
#[derive(Clone)]
struct Route {
    pattern: Arc<str>,
    endpoint: Endpoint,
}

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve),
/// or drive it in-process with [`Router::handle`].
pub struct Router {
    routes: HashMap<Method, MatchitRouter<Route>>,
    state: Extensions,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), state: Extensions::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax and are read with `req.param("name")`.
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with an existing route.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        let route = Route { pattern: Arc::from(path), endpoint: handler.into_endpoint() };
        self.routes
            .entry(method)
            .or_default()
            .insert(path, route)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Attaches a value every handler can read through [`Request::state`].
    ///
    /// One value per type; attaching the same type twice keeps the last.
    pub fn with_state<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.state.insert(value);
        self
    }

    /// Routes one buffered request and produces one response.
    pub async fn handle(&self, req: http::Request<Bytes>) -> Response {
        let started = Instant::now();
        let (mut parts, body) = req.into_parts();
        let method = parts.method.clone();
        let path = parts.uri.path().to_owned();

        let (route, response) = match self.lookup(&method, &path) {
            Some((route, params)) => {
                parts.extensions.extend(self.state.clone());
                let response = (route.endpoint)(Request::new(parts, body, params)).await;
                (Some(route.pattern), response)
            }
            None => (None, self.fallback(&path)),
        };

        info!(
            %method,
            %path,
            route = route.as_deref().unwrap_or("-"),
            status = response.status_code().as_u16(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "request"
        );
        response
    }

    fn lookup(&self, method: &Method, path: &str) -> Option<(Route, HashMap<String, String>)> {
        let matched = self.routes.get(method)?.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((matched.value.clone(), params))
    }

    fn fallback(&self, path: &str) -> Response {
        let mut allowed: Vec<&str> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(method, _)| method.as_str())
            .collect();

        if allowed.is_empty() {
            return Response::builder()
                .status(StatusCode::NOT_FOUND)
                .json(br#"{"detail":"Not Found"}"#.to_vec());
        }

        allowed.sort_unstable();
        Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header("allow", &allowed.join(", "))
            .json(br#"{"detail":"Method Not Allowed"}"#.to_vec())
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn echo_id(req: Request) -> String {
        req.param("id").unwrap_or("none").to_owned()
    }

    async fn read_state(req: Request) -> String {
        req.state::<&'static str>().copied().unwrap_or("missing").to_owned()
    }

    fn get(path: &str) -> http::Request<Bytes> {
        http::Request::get(path).body(Bytes::new()).unwrap()
    }

    #[tokio::test]
    async fn extracts_path_params() {
        let app = Router::new().on(Method::GET, "/items/{id}", echo_id);
        let res = app.handle(get("/items/42")).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), b"42");
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let app = Router::new().on(Method::GET, "/items/{id}", echo_id);
        let res = app.handle(get("/nope")).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn other_method_is_405_with_allow() {
        let app = Router::new()
            .on(Method::GET, "/items/{id}", echo_id)
            .on(Method::DELETE, "/items/{id}", echo_id);
        let req = http::Request::post("/items/1").body(Bytes::new()).unwrap();
        let res = app.handle(req).await;
        assert_eq!(res.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.header("allow"), Some("DELETE, GET"));
    }

    #[tokio::test]
    async fn state_reaches_handlers() {
        let app = Router::new()
            .on(Method::GET, "/", read_state)
            .with_state("shared");
        let res = app.handle(get("/")).await;
        assert_eq!(res.body(), b"shared");
    }

    #[tokio::test]
    async fn closures_register_like_async_fns() {
        let app = Router::new()
            .on(Method::GET, "/accepted", |_req: Request| async { StatusCode::ACCEPTED })
            .on(Method::GET, "/items/{id}", echo_id);
        assert_eq!(app.handle(get("/accepted")).await.status_code(), StatusCode::ACCEPTED);
        assert_eq!(app.handle(get("/items/7")).await.body(), b"7");
    }
}
