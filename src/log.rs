// Subject lifecycle events go to `tracing` only when the `tracing` feature is
// enabled; otherwise the macros expand to nothing.

#[cfg(feature = "tracing")]
macro_rules! log_trace {
  ($($arg:tt)*) => {
    tracing::trace!($($arg)*)
  };
}

#[cfg(not(feature = "tracing"))]
macro_rules! log_trace {
  ($($arg:tt)*) => {{}};
}

#[cfg(feature = "tracing")]
macro_rules! log_warn {
  ($($arg:tt)*) => {
    tracing::warn!($($arg)*)
  };
}

#[cfg(not(feature = "tracing"))]
macro_rules! log_warn {
  ($($arg:tt)*) => {{}};
}

pub(crate) use log_trace;
pub(crate) use log_warn;
