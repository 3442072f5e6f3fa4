//! Retrieval instrumentation.
//!
//! With the `tracing` feature the macros below forward to `tracing`. Without
//! it they expand to [`DisabledSpan`] guards and discarded field values, so
//! call sites never need their own `cfg`.

/// Opens an info span named after a retrieval stage.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::DisabledSpan
    };
}

/// Records a named event with `key = value` fields at `level`.
#[cfg(feature = "tracing")]
macro_rules! trace_at {
    ($level:ident, $name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::event!(name: $name, tracing::Level::$level, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_at {
    ($level:ident, $name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

/// Measurements: window sizes, detection counts.
macro_rules! trace_event {
    ($name:expr, $($fields:tt)+) => {
        $crate::trace::trace_at!(INFO, $name, $($fields)+)
    };
}

/// Inputs that were corrected instead of rejected.
macro_rules! trace_warn {
    ($name:expr, $($fields:tt)+) => {
        $crate::trace::trace_at!(WARN, $name, $($fields)+)
    };
}

pub(crate) use trace_at;
pub(crate) use trace_event;
pub(crate) use trace_span;
pub(crate) use trace_warn;

/// Stand-in for `tracing::span::EnteredSpan` when instrumentation is off.
#[cfg(not(feature = "tracing"))]
pub struct DisabledSpan;

#[cfg(not(feature = "tracing"))]
impl DisabledSpan {
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
