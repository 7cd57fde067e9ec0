//! Loading spinner handle

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Something that can display and dismiss a loading indicator
pub trait Spinner: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// Spinner that only tracks visibility; useful headless
#[derive(Debug, Default)]
pub struct FlagSpinner {
    visible: AtomicBool,
    shown: AtomicUsize,
}

impl FlagSpinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// How many times `show` was called
    pub fn times_shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }
}

impl Spinner for FlagSpinner {
    fn show(&self) {
        // Showing an already visible spinner is a no-op
        if !self.visible.swap(true, Ordering::SeqCst) {
            self.shown.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_hide() {
        let spinner = FlagSpinner::new();
        spinner.show();
        spinner.show();
        assert!(spinner.is_visible());
        assert_eq!(spinner.times_shown(), 1);

        spinner.hide();
        assert!(!spinner.is_visible());
        spinner.hide();
        assert_eq!(spinner.times_shown(), 1);
    }
}
