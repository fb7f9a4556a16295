//! Theme preference persistence.
//!
//! The `theme` slot is independent of `todoTasks`; an unreadable or unknown
//! value falls back to `Theme::Light`.

use crate::model::theme::Theme;
use crate::repo::slot_store::{SlotResult, SlotStore};
use log::warn;

/// Slot key holding the theme preference.
pub const THEME_SLOT: &str = "theme";

pub struct ThemeRepository<S: SlotStore> {
    slots: S,
}

impl<S: SlotStore> ThemeRepository<S> {
    pub fn new(slots: S) -> Self {
        Self { slots }
    }

    pub fn load_theme(&self) -> Theme {
        match self.slots.read_slot(THEME_SLOT) {
            Ok(Some(value)) => value.parse().unwrap_or_else(|err| {
                warn!("event=theme_load module=repo status=fallback error={err}");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(err) => {
                warn!("event=theme_load module=repo status=fallback error={err}");
                Theme::default()
            }
        }
    }

    pub fn save_theme(&self, theme: Theme) -> SlotResult<()> {
        self.slots.write_slot(THEME_SLOT, theme.as_str())
    }

    /// Flips the stored theme and returns the new value.
    pub fn toggle_theme(&self) -> SlotResult<Theme> {
        let next = self.load_theme().toggled();
        self.save_theme(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::{ThemeRepository, THEME_SLOT};
    use crate::model::theme::Theme;
    use crate::repo::slot_store::{MemorySlotStore, SlotStore};

    #[test]
    fn missing_or_unknown_theme_falls_back_to_light() {
        let slots = MemorySlotStore::new();
        let repo = ThemeRepository::new(&slots);
        assert_eq!(repo.load_theme(), Theme::Light);

        slots.write_slot(THEME_SLOT, "sepia").unwrap();
        assert_eq!(repo.load_theme(), Theme::Light);
    }

    #[test]
    fn toggle_persists_plain_string() {
        let slots = MemorySlotStore::new();
        let repo = ThemeRepository::new(&slots);

        assert_eq!(repo.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(slots.read_slot(THEME_SLOT).unwrap().as_deref(), Some("dark"));
        assert_eq!(repo.toggle_theme().unwrap(), Theme::Light);
    }
}
