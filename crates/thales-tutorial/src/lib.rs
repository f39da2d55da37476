//! # Thales Tutorial
//!
//! The classic path, query and body tutorial endpoints, each declared as a
//! [`Schema`](thales_core::Schema) plus an echo handler and served through a
//! synchronous `Request<Bytes> -> Response<Bytes>` dispatch function.
//!
//! - [`router`] - Method and `{param}` path template matching
//! - [`handlers`] - Endpoint schemas and handlers
//! - [`models`] - Shared `Item` / `User` body models and [`ModelName`]
//! - [`TutorialApp`] - Routing, validation, handler call and logging
//!
//! ```rust
//! use bytes::Bytes;
//! use http::{Request, StatusCode};
//! use thales_config::ThalesConfig;
//! use thales_tutorial::TutorialApp;
//!
//! let app = TutorialApp::new(&ThalesConfig::default()).unwrap();
//!
//! let response = app.handle(Request::get("/items/foo").body(Bytes::new()).unwrap());
//! assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
//! ```

#![doc(html_root_url = "https://docs.rs/thales-tutorial/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
pub mod handlers;
pub mod models;
pub mod router;

pub use app::{AppError, TutorialApp};
pub use handlers::{Endpoint, HandlerError};
pub use models::ModelName;
