//! Price-lookup screen state.
//!
//! Holds what the barcode reader screen is showing. In fullscreen (kiosk)
//! mode every result is cleared again after [`AUTO_CLEAR_DELAY`]; a newer
//! scan pushes the deadline back. Time is passed in by the caller, which
//! polls [`PriceReader::tick`] from its event loop.

use crate::database::{Product, ProductDatabase};
use std::time::{Duration, Instant};
use tracing::debug;

/// How long a result stays on screen in fullscreen mode.
pub const AUTO_CLEAR_DELAY: Duration = Duration::from_secs(5);

/// What the screen currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ReaderDisplay {
    /// Instructions, waiting for a scan.
    Idle,
    /// A product was found.
    Product(Product),
    /// Lookup failed; user-facing message.
    Error(String),
}

/// One-shot deadline that a newer schedule replaces.
#[derive(Debug, Clone, Copy)]
pub struct AutoClear {
    delay: Duration,
    deadline: Option<Instant>,
}

impl AutoClear {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arms the timer relative to `now`, replacing any pending deadline.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once when the deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// State of the price-lookup screen.
#[derive(Debug)]
pub struct PriceReader {
    database: ProductDatabase,
    display: ReaderDisplay,
    auto_clear: AutoClear,
    fullscreen: bool,
}

impl PriceReader {
    #[must_use]
    pub fn new(database: ProductDatabase) -> Self {
        Self {
            database,
            display: ReaderDisplay::Idle,
            auto_clear: AutoClear::new(AUTO_CLEAR_DELAY),
            fullscreen: false,
        }
    }

    #[must_use]
    pub fn display(&self) -> &ReaderDisplay {
        &self.display
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    #[must_use]
    pub fn database(&self) -> &ProductDatabase {
        &self.database
    }

    /// Looks up `barcode` and shows the result. Blank input is ignored.
    pub fn scan(&mut self, barcode: &str, now: Instant) -> &ReaderDisplay {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return &self.display;
        }

        self.display = match self.database.search_product(barcode) {
            Ok(product) => ReaderDisplay::Product(product),
            Err(e) => {
                debug!(barcode, error = %e, "Lookup failed");
                ReaderDisplay::Error(e.user_message())
            }
        };

        if self.fullscreen {
            self.auto_clear.schedule(now);
        }
        &self.display
    }

    /// Clears the screen if the auto-clear deadline has passed.
    ///
    /// Returns true when the display was reset.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.auto_clear.fire_if_due(now) && self.fullscreen {
            self.display = ReaderDisplay::Idle;
            return true;
        }
        false
    }

    /// Switches between windowed and fullscreen mode, resetting the screen.
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
        self.display = ReaderDisplay::Idle;
        self.auto_clear.cancel();
    }
}
