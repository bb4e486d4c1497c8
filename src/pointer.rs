//! Mouse button identity and pressed-button sets.
//!
//! Buttons follow the DOM numbering used by host pointer and mouse events:
//! `0` primary, `1` auxiliary, `2` secondary, `3`/`4` back and forward.

use bitflags::bitflags;

/// A single mouse (or mouse-like) button.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Ord, PartialOrd, Default)]
pub enum MouseButton {
    #[default]
    Primary,
    Secondary,
    Auxiliary,
    X1,
    X2,
    /// No button changed state, e.g. a plain move (`button == -1`).
    None,
}

impl MouseButton {
    /// Convert a DOM `button` index.
    pub fn from_index(index: i16) -> Self {
        match index {
            0 => MouseButton::Primary,
            1 => MouseButton::Auxiliary,
            2 => MouseButton::Secondary,
            3 => MouseButton::X1,
            4 => MouseButton::X2,
            _ => MouseButton::None,
        }
    }

    /// The DOM `button` index for this button.
    pub fn index(self) -> i16 {
        match self {
            MouseButton::Primary => 0,
            MouseButton::Auxiliary => 1,
            MouseButton::Secondary => 2,
            MouseButton::X1 => 3,
            MouseButton::X2 => 4,
            MouseButton::None => -1,
        }
    }

    /// The flag this button sets in a [`PointerButtons`] set.
    pub fn flag(self) -> PointerButtons {
        match self {
            MouseButton::Primary => PointerButtons::PRIMARY,
            MouseButton::Secondary => PointerButtons::SECONDARY,
            MouseButton::Auxiliary => PointerButtons::AUXILIARY,
            MouseButton::X1 => PointerButtons::X1,
            MouseButton::X2 => PointerButtons::X2,
            MouseButton::None => PointerButtons::empty(),
        }
    }

    pub fn is_primary(&self) -> bool {
        self == &MouseButton::Primary
    }

    pub fn is_secondary(&self) -> bool {
        self == &MouseButton::Secondary
    }

    pub fn is_auxiliary(&self) -> bool {
        self == &MouseButton::Auxiliary
    }
}

bitflags! {
    /// The set of buttons held down, laid out like the DOM `buttons` mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PointerButtons: u16 {
        const PRIMARY = 1;
        const SECONDARY = 1 << 1;
        const AUXILIARY = 1 << 2;
        const X1 = 1 << 3;
        const X2 = 1 << 4;
    }
}

impl PointerButtons {
    /// Build a set from a raw DOM `buttons` mask, ignoring unknown bits.
    pub fn from_mask(mask: u16) -> Self {
        Self::from_bits_truncate(mask)
    }

    /// Whether `button` is held in this set.
    pub fn is_pressed(self, button: MouseButton) -> bool {
        let flag = button.flag();
        !flag.is_empty() && self.contains(flag)
    }
}
