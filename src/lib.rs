// Library surface for headless/integration tests and reuse.
// The binary only adds terminal setup and the CLI on top of this.
pub mod app;
pub mod app_dirs;
pub mod celebration;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod question;
pub mod quiz;
pub mod runtime;
pub mod session;
pub mod summary;
pub mod surface;
pub mod timers;
pub mod ui;
pub mod view;

pub use error::{QuizError, Result};
pub use quiz::{QuizController, SubmitResult};
