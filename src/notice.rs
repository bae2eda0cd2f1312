//! Transient operator notices.
//!
//! Anything that wants to tell the operator something gets a [`Notifier`];
//! the UI loop owns the single [`NoticeBoard`] that receives and displays
//! them.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

/// How long a notice stays on screen
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl Notifier {
    pub fn post(&self, level: NoticeLevel, message: impl Into<String>) {
        let notice = Notice {
            level,
            message: message.into(),
        };
        tracing::debug!(level = ?notice.level, message = %notice.message, "notice");
        // The board only goes away when the UI shuts down.
        let _ = self.tx.send(notice);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.post(NoticeLevel::Success, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.post(NoticeLevel::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.post(NoticeLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.post(NoticeLevel::Error, message);
    }
}

pub struct NoticeBoard {
    rx: mpsc::UnboundedReceiver<Notice>,
    current: Option<(Notice, Instant)>,
}

impl NoticeBoard {
    pub fn channel() -> (Notifier, NoticeBoard) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Notifier { tx },
            NoticeBoard { rx, current: None },
        )
    }

    /// Everything posted since the last call, oldest first.
    pub fn take_pending(&mut self) -> Vec<Notice> {
        let mut pending = Vec::new();
        while let Ok(notice) = self.rx.try_recv() {
            pending.push(notice);
        }
        pending
    }

    /// Show the newest posted notice and expire the shown one after
    /// [`NOTICE_TTL`].
    pub fn poll(&mut self, now: Instant) {
        if let Some(latest) = self.take_pending().pop() {
            self.current = Some((latest, now));
        } else if let Some((_, shown_at)) = &self.current {
            if now.duration_since(*shown_at) >= NOTICE_TTL {
                self.current = None;
            }
        }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref().map(|(notice, _)| notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_notice_wins_and_expires() {
        let (notifier, mut board) = NoticeBoard::channel();
        let start = Instant::now();

        notifier.info("Processing Split Sheet Agreement...");
        notifier.success("Split Sheet Agreement Generated");
        board.poll(start);
        assert_eq!(board.current().unwrap().message, "Split Sheet Agreement Generated");

        board.poll(start + Duration::from_secs(1));
        assert!(board.current().is_some());

        board.poll(start + NOTICE_TTL);
        assert!(board.current().is_none());
    }

    #[test]
    fn cloned_notifiers_share_one_board() {
        let (notifier, mut board) = NoticeBoard::channel();
        let other = notifier.clone();

        notifier.warning("first");
        other.error("second");

        let pending = board.take_pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[1].level, NoticeLevel::Error);
    }
}
