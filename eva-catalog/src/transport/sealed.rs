//! Sealed trait marker for Transport implementations.
//!
//! Keeps `Transport` implementable only inside this crate, so every way of reaching EVA
//! goes through the header and URL checks in [`super::http`].

pub(crate) mod private {
    /// Sealed trait marker.
    pub trait Sealed {}
}
