//! Operator input collaborators
//!
//! Button debouncing, gesture detection and analog filtering happen outside
//! this crate. The scheduler only sees one already-leveled sample per tick.

/// Button gesture recognized since the previous sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClickGesture {
    /// Short press: advance the displayed digit
    Single,
    /// Two short presses: toggle normal/reverse polarity
    Double,
    /// Long press: reset the displayed digit
    Long,
}

/// One tick's worth of operator input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlSample {
    /// Leveled analog reading, stretches the update interval
    pub level: u16,
    /// Requested brightness (0-15; larger values are ignored by the display)
    pub brightness: u8,
    /// Gesture, if one completed
    pub click: Option<ClickGesture>,
}

/// Source of operator input
pub trait ControlInput {
    /// Take the current sample; a reported click is consumed
    fn sample(&mut self) -> ControlSample;
}

impl<T: ControlInput + ?Sized> ControlInput for &mut T {
    fn sample(&mut self) -> ControlSample {
        (**self).sample()
    }
}
