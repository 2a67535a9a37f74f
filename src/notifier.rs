//! # Transient Notifier
//!
//! Holds at most one notice. Each notice is removed after a fixed delay; a
//! newer notice cancels the pending removal of the one it replaces.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Default display time of a notice.
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(3000);

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Success,
    Error,
}

impl NoticeKind {
    /// Title shown above the message.
    pub fn title(&self) -> &'static str {
        match self {
            NoticeKind::Info => "Info",
            NoticeKind::Warning => "Warning",
            NoticeKind::Success => "Success",
            NoticeKind::Error => "Error",
        }
    }
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A displayed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub kind: NoticeKind,
}

#[derive(Debug, Default)]
struct NotifierState {
    current: Option<Notice>,
    next_id: u64,
    pending_removal: Option<JoinHandle<()>>,
}

/// Shared handle; clones display into the same slot.
#[derive(Debug, Clone)]
pub struct Notifier {
    duration: Duration,
    state: Arc<Mutex<NotifierState>>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_DURATION)
    }
}

impl Notifier {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            state: Arc::new(Mutex::new(NotifierState::default())),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    fn state(&self) -> MutexGuard<'_, NotifierState> {
        self.state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    /// Replaces the displayed notice and schedules its removal.
    ///
    /// Outside a tokio runtime the notice stays until replaced or dismissed.
    pub fn notify(&self, message: impl Into<String>, kind: NoticeKind) -> Notice {
        let message = message.into();
        match kind {
            NoticeKind::Error => error!(%message, "Notice"),
            NoticeKind::Warning => warn!(%message, "Notice"),
            NoticeKind::Info | NoticeKind::Success => info!(%message, %kind, "Notice"),
        }

        let mut state = self.state();
        state.next_id += 1;
        let notice = Notice {
            id: state.next_id,
            message,
            kind,
        };
        state.current = Some(notice.clone());

        if let Some(pending) = state.pending_removal.take() {
            pending.abort();
        }

        match Handle::try_current() {
            Ok(runtime) => {
                let shared = Arc::clone(&self.state);
                let id = notice.id;
                let delay = self.duration;
                state.pending_removal = Some(runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    let mut state = shared.lock().unwrap_or_else(|poison| poison.into_inner());
                    if state.current.as_ref().is_some_and(|current| current.id == id) {
                        state.current = None;
                        state.pending_removal = None;
                    }
                }));
            }
            Err(_) => debug!("No runtime available; notice will not expire"),
        }

        notice
    }

    pub fn info(&self, message: impl Into<String>) -> Notice {
        self.notify(message, NoticeKind::Info)
    }

    pub fn warning(&self, message: impl Into<String>) -> Notice {
        self.notify(message, NoticeKind::Warning)
    }

    pub fn success(&self, message: impl Into<String>) -> Notice {
        self.notify(message, NoticeKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> Notice {
        self.notify(message, NoticeKind::Error)
    }

    /// The notice currently on display, if any.
    pub fn current(&self) -> Option<Notice> {
        self.state().current.clone()
    }

    /// Removes the displayed notice immediately.
    pub fn dismiss(&self) {
        let mut state = self.state();
        state.current = None;
        if let Some(pending) = state.pending_removal.take() {
            pending.abort();
        }
    }
}
