//! Presentation model of the tool window
//!
//! The window holds one integer field (the cap, minimum 1, default 1) and one
//! button that runs the limiter on the host selection. It is a plain value:
//! the caller creates it from a [`ToolState`], shows it, and disposes of it.
//! Rendering is left to whatever toolkit the host offers; feedback goes
//! through a [`Notifier`].

use crate::{
    config::LimiterConfig,
    error::{ErrorKind, Result},
    host::SkinHost,
    limiter::{LimitReport, Limiter},
    logging::Logger,
    pruner::MaxInfluences,
};

/// Window title
pub const WINDOW_TITLE: &str =
    "Remove joint influences of set number for each vertex on each selected object.";

/// Label of the cap field
pub const CAP_LABEL: &str = "Max Number of Influencing Joints: ";

/// Label of the apply button
pub const APPLY_LABEL: &str = "Apply Max Joints";

/// Smallest value the cap field offers
pub const CAP_MINIMUM: i64 = 1;

/// Receives the outcome of an apply action
pub trait Notifier {
    /// Confirm a successful run
    fn confirm(&mut self, message: &str);

    /// Report a failure; hosts show this as a blocking message
    fn alert(&mut self, kind: ErrorKind, message: &str);
}

/// A notification recorded by [`RecordingNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A confirmation message
    Confirmation(String),
    /// A failure message and its kind
    Alert {
        /// The failure kind
        kind: ErrorKind,
        /// The full message
        message: String,
    },
}

/// A notifier that keeps every notification
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Vec<Notification>,
}

impl RecordingNotifier {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notification, in order
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// The latest notification
    pub fn last(&self) -> Option<&Notification> {
        self.notifications.last()
    }
}

impl Notifier for RecordingNotifier {
    fn confirm(&mut self, message: &str) {
        self.notifications
            .push(Notification::Confirmation(message.to_string()));
    }

    fn alert(&mut self, kind: ErrorKind, message: &str) {
        self.notifications.push(Notification::Alert {
            kind,
            message: message.to_string(),
        });
    }
}

/// Application state the window is built from
#[derive(Debug, Clone)]
pub struct ToolState {
    /// Raw value of the cap field
    pub cap_input: i64,
    /// Settings other than the cap
    pub config: LimiterConfig,
    /// Where run messages go
    pub logger: Logger,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            cap_input: CAP_MINIMUM,
            config: LimiterConfig::default(),
            logger: Logger::new(),
        }
    }
}

/// The tool window
#[derive(Debug)]
pub struct ToolWindow {
    state: ToolState,
    visible: bool,
}

impl ToolWindow {
    /// Build a hidden window from `state`
    pub fn create(state: ToolState) -> Self {
        Self {
            state,
            visible: false,
        }
    }

    /// Display the window
    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Whether the window is displayed
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Close the window and hand its state back to the caller
    pub fn dispose(self) -> ToolState {
        self.state
    }

    /// The window title
    pub fn title(&self) -> &'static str {
        WINDOW_TITLE
    }

    /// Current value of the cap field
    pub fn cap_input(&self) -> i64 {
        self.state.cap_input
    }

    /// Type a value into the cap field
    pub fn set_cap_input(&mut self, value: i64) {
        self.state.cap_input = value;
    }

    /// The state backing the window
    pub fn state(&self) -> &ToolState {
        &self.state
    }

    /// Press the apply button
    ///
    /// Runs the limiter on the host selection with the cap from the field,
    /// then confirms or alerts through `notifier`.
    pub fn apply<H: SkinHost + ?Sized>(
        &mut self,
        host: &mut H,
        notifier: &mut dyn Notifier,
    ) -> Result<LimitReport> {
        let result = MaxInfluences::new(self.state.cap_input).and_then(|max_influences| {
            Limiter::builder()
                .with_config(self.state.config.clone().with_max_influences(max_influences))
                .with_logger(self.state.logger.clone())
                .build()
                .run(host)
        });
        match &result {
            Ok(report) => notifier.confirm(&report.summary()),
            Err(error) => notifier.alert(error.kind(), &error.to_string()),
        }
        result
    }
}
