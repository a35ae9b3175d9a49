//! Single-line, in-place terminal progress bars.
//!
//! A [`Bar`] renders amounts from a bounded range as a fixed-width bracketed
//! bar with a centered percent label, overwriting its own terminal line on
//! each update:
//!
//! ```text
//!   [=========>           21.0%                  ]
//! ```
//!
//! Bars are sized explicitly through [`BarConfig`], to the current terminal
//! via [`BarConfig::sized_to_terminal`], or to a file's byte length via
//! [`BarConfig::for_file`] for progress-while-reading loops.
//!
//! ```no_run
//! use linegauge::{Bar, BarConfig};
//!
//! let mut bar = Bar::new(BarConfig::default())?;
//! for amount in 0..=100 {
//!     bar.write(amount);
//! }
//! bar.close();
//! # Ok::<(), linegauge::BarError>(())
//! ```

pub mod bar;
pub mod term;

pub use bar::{Bar, BarConfig, BarError};
pub use term::terminal_size;
