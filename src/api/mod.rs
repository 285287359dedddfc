//! The blog's HTTP surface.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/` | [`posts::home`] |
//! | GET | `/posts` | [`posts::list_posts`] |
//! | POST | `/posts` | [`posts::create_post`] |
//! | GET | `/posts/{post_id}` | [`posts::get_post`] |
//! | PUT | `/posts/{post_id}` | [`posts::update_post`] |
//! | DELETE | `/posts/{post_id}` | [`posts::delete_post`] |
//! | GET | `/posts/{post_id}/detail` | [`posts::get_post_detail`] |
//! | GET | `/healthz`, `/readyz` | [`health`](crate::health) probes |

mod error;
mod params;
pub mod posts;

pub use error::ApiError;

use http::Method;

use crate::health;
use crate::router::Router;
use crate::store::SharedStore;

/// Every route, with `store` attached as shared state.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .on(Method::GET,    "/",                       posts::home)
        .on(Method::GET,    "/posts",                  posts::list_posts)
        .on(Method::POST,   "/posts",                  posts::create_post)
        .on(Method::GET,    "/posts/{post_id}",        posts::get_post)
        .on(Method::PUT,    "/posts/{post_id}",        posts::update_post)
        .on(Method::DELETE, "/posts/{post_id}",        posts::delete_post)
        .on(Method::GET,    "/posts/{post_id}/detail", posts::get_post_detail)
        .on(Method::GET,    "/healthz",                health::liveness)
        .on(Method::GET,    "/readyz",                 health::readiness)
        .with_state(store)
}
