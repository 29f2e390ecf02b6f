//! Reactive text bindings.
//!
//! A reactive leaf is not diffed by value: the diff engine subscribes to the
//! binding and patches the text node whenever it changes.

use core::fmt::{self, Debug, Display};

use nami::{Computed, Signal, SignalExt, signal::IntoComputed};

/// A cloneable handle to a reactive string.
#[derive(Clone)]
pub struct ReactiveBinding(Computed<String>);

impl ReactiveBinding {
    /// Creates a binding from any string signal.
    pub fn new(source: impl IntoComputed<String>) -> Self {
        Self(source.into_computed())
    }

    /// Creates a binding from any signal whose output implements `Display`.
    pub fn display<T: Display>(source: impl Signal<Output = T>) -> Self {
        Self::new(source.map(|value| value.to_string()))
    }

    /// Reads the current value without subscribing.
    #[must_use]
    pub fn current(&self) -> String {
        self.0.get()
    }

    /// The underlying computed signal.
    #[must_use]
    pub const fn computed(&self) -> &Computed<String> {
        &self.0
    }
}

impl Debug for ReactiveBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReactiveBinding").field(&self.current()).finish()
    }
}
