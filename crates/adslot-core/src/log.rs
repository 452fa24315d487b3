use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
};

thread_local! {
    static LOG_BUFFER: RefCell<VecDeque<LogEntry>> = const { RefCell::new(VecDeque::new()) };
    static LOG_CAPACITY: Cell<usize> = const { Cell::new(DEFAULT_CAPACITY) };
    static LOG_CONFIGURED: Cell<bool> = const { Cell::new(false) };
    static LOG_SEQ: Cell<u64> = const { Cell::new(0) };
}

const DEFAULT_CAPACITY: usize = 1_000;

///
/// Level
///

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Display, Serialize, Deserialize)]
pub enum Level {
    Debug, // least severe
    Info,
    Ok,
    Warn,
    Error, // most severe
}

///
/// Topic
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum Topic {
    Boot,
    Config,
    Consent,
    Modal,
    OutOfPage,
    Queue,
    Refresh,
    Registry,
    Slot,
}

///
/// LogEntry
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub seq: u64,
    pub level: Level,
    pub topic: Option<String>,
    pub message: String,
}

#[macro_export]
macro_rules! log {
    // =========================================
    // (1) With topic (normal + trailing comma)
    // =========================================
    ($topic:expr, $level:ident, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        $crate::log!(@inner Some(&$topic.to_string()), $crate::log::Level::$level, $fmt $(, $arg)*);
    }};

    // =========================================
    // (2) No topic (normal + trailing comma)
    // =========================================
    ($level:ident, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        $crate::log!(@inner None::<&str>, $crate::log::Level::$level, $fmt $(, $arg)*);
    }};

    // =========================================
    // INTERNAL
    // =========================================
    (@inner $topic:expr, $level:expr, $fmt:expr $(, $arg:expr)*) => {{
        let level = $level;
        let topic_opt: Option<&str> = $topic;
        let message = format!($fmt $(, $arg)*);

        $crate::log::LogBuffer::append(topic_opt, level, &message);
        $crate::log::__emit(&$crate::log::__line(topic_opt, level, &message));
    }};
}

/// Render one stderr line: `LEVEL| [topic] message`, the level colored.
#[doc(hidden)]
#[must_use]
pub fn __line(topic: Option<&str>, level: Level, message: &str) -> String {
    let (color, reset) = match level {
        Level::Ok => ("\x1b[32m", "\x1b[0m"),
        Level::Info => ("\x1b[34m", "\x1b[0m"),
        Level::Warn => ("\x1b[33m", "\x1b[0m"),
        Level::Error => ("\x1b[31m", "\x1b[0m"),
        Level::Debug => ("", ""),
    };
    let label = format!("{color}{:^5}{reset}", level.to_string().to_uppercase());

    match topic {
        Some(topic) => format!("{label}| [{topic}] {message}"),
        None => format!("{label}| {message}"),
    }
}

#[doc(hidden)]
pub fn __emit(line: &str) {
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{line}");

    #[cfg(target_arch = "wasm32")]
    let _ = line;
}

///
/// LogBuffer
///
/// Bounded, volatile log of recent entries for the current thread.
/// The oldest entries are evicted once the configured capacity is reached.
///

pub struct LogBuffer;

impl LogBuffer {
    pub fn append(topic: Option<&str>, level: Level, message: &str) {
        let seq = LOG_SEQ.with(|seq| {
            let next = seq.get().saturating_add(1);
            seq.set(next);
            next
        });
        let capacity = LOG_CAPACITY.with(Cell::get);

        LOG_BUFFER.with_borrow_mut(|buf| {
            if capacity == 0 {
                return;
            }
            while buf.len() >= capacity {
                buf.pop_front();
            }
            buf.push_back(LogEntry {
                seq,
                level,
                topic: topic.map(str::to_string),
                message: message.to_string(),
            });
        });
    }

    /// Apply `capacity` unless this thread's buffer was already configured.
    /// The buffer is shared by every session on the thread, so the first
    /// configuration wins. Returns true when it was applied.
    pub fn configure(capacity: usize) -> bool {
        if LOG_CONFIGURED.with(Cell::get) {
            return false;
        }
        Self::set_capacity(capacity);

        true
    }

    /// Set the retention capacity, evicting the oldest entries if needed.
    pub fn set_capacity(capacity: usize) {
        LOG_CONFIGURED.with(|configured| configured.set(true));
        LOG_CAPACITY.with(|cap| cap.set(capacity));
        LOG_BUFFER.with_borrow_mut(|buf| {
            while buf.len() > capacity {
                buf.pop_front();
            }
        });
    }

    #[must_use]
    pub fn capacity() -> usize {
        LOG_CAPACITY.with(Cell::get)
    }

    #[must_use]
    pub fn entries() -> Vec<LogEntry> {
        LOG_BUFFER.with_borrow(|buf| buf.iter().cloned().collect())
    }

    /// Entries recorded under `topic`, oldest first.
    #[must_use]
    pub fn entries_for(topic: Topic) -> Vec<LogEntry> {
        let topic = topic.to_string();
        LOG_BUFFER.with_borrow(|buf| {
            buf.iter()
                .filter(|entry| entry.topic.as_deref() == Some(topic.as_str()))
                .cloned()
                .collect()
        })
    }

    pub fn clear() {
        LOG_BUFFER.with_borrow_mut(VecDeque::clear);
    }
}

///
/// TESTS
///
