#![forbid(unsafe_code)]

pub mod app_services;
pub mod content_loader;
pub mod error;
pub mod navigation;
pub mod remote_content_service;
pub mod styling;

pub use learn_core::Clock;

pub use app_services::{AppServices, ContentConfig};
pub use error::{NavigationError, RemoteContentError};
pub use navigation::{LessonState, NavigationSession, NavigationSnapshot, TestState, TestSummary};
pub use remote_content_service::{RemoteContentConfig, RemoteContentService};
pub use styling::{HtmlRenderer, Styler};
