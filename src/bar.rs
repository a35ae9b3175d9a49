//! Single-line, in-place progress bar rendering.
//!
//! A [`Bar`] maps amounts in `min..=max` onto a fixed-width bracketed bar
//! with a centered percent label, and overwrites the current terminal line
//! on each update via a carriage return. Rendering is cached: the bar body
//! is only rebuilt when the displayed label or fill length actually changes.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::term;

/// Errors surfaced by bar construction.
#[derive(Debug, Error)]
pub enum BarError {
    /// The requested geometry leaves no room for even a bare percent label.
    #[error("bar interior of {width} columns is too narrow (need at least 4)")]
    TooNarrow { width: i64 },
    /// The file backing a size-derived bar could not be stat'd.
    #[error("failed to stat {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Options for constructing a [`Bar`].
#[derive(Debug, Clone)]
pub struct BarConfig {
    /// Label prefixed to the bar line; empty means no prefix.
    pub title: String,
    /// Inclusive lower bound of the progress range.
    pub min: u64,
    /// Inclusive upper bound; clamped up to `min` when smaller.
    pub max: u64,
    /// Blank padding columns outside the bracketed bar, both sides.
    pub offset: usize,
    /// Overall character width for padding, title, and bar.
    pub total_width: usize,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            min: 0,
            max: 100,
            offset: 0,
            total_width: 80,
        }
    }
}

impl BarConfig {
    /// Config for a bar spanning the current terminal width.
    pub fn sized_to_terminal(title: impl Into<String>, size: u64, offset: usize) -> Self {
        let (cols, _) = term::terminal_size();
        Self {
            title: title.into(),
            max: size,
            offset,
            total_width: cols as usize,
            ..Self::default()
        }
    }

    /// Config for tracking a read through the file at `path`: the range is
    /// the file's byte length and the title is its file name.
    pub fn for_file(path: &Path, offset: usize) -> Result<Self, BarError> {
        let meta = std::fs::metadata(path).map_err(|source| BarError::Stat {
            path: path.to_path_buf(),
            source,
        })?;
        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::sized_to_terminal(title, meta.len(), offset))
    }
}

/// Tracks render state and writes single-line progress output.
#[derive(Debug)]
pub struct Bar<W: Write = io::Stderr> {
    /// Formatted title prefix (`"name: "`), possibly empty.
    title: String,
    min: u64,
    max: u64,
    /// Padding columns to the left of the title.
    offset: usize,
    /// Columns strictly between the brackets; fixed for the bar's lifetime.
    width: usize,
    /// Last rendered percent label; the fast-path comparison key.
    percent: String,
    /// Fill length of the last rendered arrow, `None` before the first build.
    arrow: Option<usize>,
    /// Last rendered bar body (brackets, fill, spliced label).
    body: String,
    /// Writer for output.
    out: W,
    closed: bool,
}

impl Bar<io::Stderr> {
    /// Construct a bar writing to stderr.
    pub fn new(config: BarConfig) -> Result<Self, BarError> {
        Self::with_writer(config, io::stderr())
    }
}

impl<W: Write> Bar<W> {
    /// Construct a bar writing to `out`.
    ///
    /// Fails with [`BarError::TooNarrow`] when `total_width` minus padding,
    /// brackets, and title leaves an interior of 3 columns or fewer. A
    /// too-small interior with a nonzero offset is first rescued by
    /// shrinking the offset.
    pub fn with_writer(config: BarConfig, out: W) -> Result<Self, BarError> {
        let BarConfig {
            title,
            min,
            max,
            mut offset,
            total_width,
        } = config;
        let max = max.max(min);
        let title = if title.is_empty() {
            title
        } else {
            format!("{title}: ")
        };

        let title_cols = title.width() as i64;
        // -2 for the surrounding brackets
        let interior = |offset: usize| total_width as i64 - 2 * offset as i64 - 2 - title_cols;
        let mut width = interior(offset);
        if width < 3 && offset > 0 {
            // 3: columns of "100"; 1: bracket that won't be drawn
            offset = offset.saturating_sub((3 - width - 1) as usize);
            width = interior(offset);
        }
        if width <= 3 {
            return Err(BarError::TooNarrow { width });
        }

        debug!(min, max, offset, width, "bar geometry");

        let mut bar = Self {
            title,
            min,
            max,
            offset,
            width: width as usize,
            percent: String::new(),
            arrow: None,
            body: String::new(),
            out,
            closed: false,
        };
        bar.render(min);
        Ok(bar)
    }

    /// Columns between the brackets; fixed at construction.
    pub fn interior_width(&self) -> usize {
        self.width
    }

    /// Resolved padding columns after any construction-time rescue.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Render the line for `amount`, updating the internal caches.
    ///
    /// Amounts outside `min..=max` clamp to the nearer bound. When the
    /// formatted percent label matches the previous call's, the cached line
    /// is returned unchanged: two amounts that display identically produce
    /// identical output, and rapid updates skip the rebuild entirely.
    pub fn render(&mut self, amount: u64) -> String {
        let amount = amount.clamp(self.min, self.max);
        let fraction = self.fraction(amount);
        let arrow = self.arrow_len(fraction);
        let percent = self.percent_label(fraction);

        if percent == self.percent {
            return self.line();
        }
        self.percent = percent;

        if self.width < 4 {
            // No room for brackets; the "bar" is a bare right-justified
            // number. Only reachable through the offset rescue.
            self.body = format!("{:>3}", self.percent);
            return self.line();
        }

        if self.arrow != Some(arrow) {
            self.arrow = Some(arrow);
            self.body = if arrow == 0 && fraction == 0.0 {
                format!("[{}]", " ".repeat(self.width))
            } else if arrow == self.width {
                format!("[{}]", "=".repeat(self.width))
            } else {
                // The `>` marks the advancing edge and consumes one fill slot.
                format!(
                    "[{}>{}]",
                    "=".repeat(arrow),
                    " ".repeat(self.width - arrow - 1)
                )
            };
        }

        // Splice the label over the center of the body. Everything in the
        // body is ASCII, so byte indices are column positions.
        let pos = self.body.len() as i64 / 2 - self.percent.len() as i64 / 2;
        if pos > 0 {
            let pos = pos as usize;
            self.body
                .replace_range(pos..pos + self.percent.len(), &self.percent);
        } else {
            self.body = self.percent.clone();
        }
        self.line()
    }

    /// Write the line for `amount` over the current terminal line.
    ///
    /// Emits a carriage return first so the terminal rewinds to column 0,
    /// then flushes. I/O failures are swallowed: progress output is
    /// best-effort and must never take down the caller.
    pub fn write(&mut self, amount: u64) {
        let line = self.render(amount);
        write!(self.out, "\r{line}").ok();
        self.out.flush().ok();
    }

    /// Terminate the bar's line with a newline, exactly once.
    ///
    /// Runs automatically when the bar is dropped; call it directly to free
    /// the line early.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.out.write_all(b"\n").ok();
            self.out.flush().ok();
        }
    }

    /// Fraction of the range covered by `amount`.
    ///
    /// A degenerate `min == max` range returns the raw numerator rather
    /// than dividing by zero; with clamping applied first this is `0.0`.
    fn fraction(&self, amount: u64) -> f64 {
        let done = (amount - self.min) as f64;
        let span = (self.max - self.min) as f64;
        if span == 0.0 { done } else { done / span }
    }

    /// Fill-character count for `fraction`, in `0..=width`.
    fn arrow_len(&self, fraction: f64) -> usize {
        (fraction * self.width as f64).round() as usize
    }

    /// The widest percent label the interior can hold.
    fn percent_label(&self, fraction: f64) -> String {
        let percent = fraction * 100.0;
        if self.width > 5 {
            format!("{percent:.1}%")
        } else if self.width > 3 {
            format!("{}%", percent.round() as i64)
        } else {
            format!("{}", percent.round() as i64)
        }
    }

    /// Compose padding, title, and cached body into the full line.
    fn line(&self) -> String {
        format!("{}{}{}", " ".repeat(self.offset), self.title, self.body)
    }
}

impl<W: Write> Drop for Bar<W> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bar(config: BarConfig) -> Bar<Vec<u8>> {
        Bar::with_writer(config, Vec::new()).unwrap()
    }

    /// A bar in a state construction forbids, for exercising the
    /// rescue-only narrow paths.
    fn narrow_bar(width: usize) -> Bar<Vec<u8>> {
        Bar {
            title: String::new(),
            min: 0,
            max: 100,
            offset: 1,
            width,
            percent: String::new(),
            arrow: None,
            body: String::new(),
            out: Vec::new(),
            closed: false,
        }
    }

    #[test]
    fn wide_interior_gets_one_decimal_label() {
        let mut bar = bar(BarConfig::default());
        assert!(bar.render(50).contains("50.0%"));
    }

    #[test]
    fn five_column_interior_gets_integer_label() {
        // total 7, no offset, no title: interior 5
        let mut bar = bar(BarConfig {
            total_width: 7,
            ..BarConfig::default()
        });
        assert_eq!(bar.interior_width(), 5);
        let line = bar.render(50);
        assert!(line.contains("50%"));
        assert!(!line.contains("50.0%"));
    }

    #[test]
    fn sub_bracket_interior_renders_bare_number() {
        let mut bar = narrow_bar(3);
        // offset 1 + the number right-justified in 3 columns
        assert_eq!(bar.render(50), "  50");
        assert_eq!(bar.render(100), " 100");
    }

    #[test]
    fn full_bar_is_solid_fill_with_centered_label() {
        let mut bar = bar(BarConfig {
            total_width: 12,
            ..BarConfig::default()
        });
        assert_eq!(bar.render(100), "[==100.0%==]");
    }

    #[test]
    fn empty_bar_is_blank_with_centered_label() {
        let mut bar = bar(BarConfig {
            total_width: 12,
            ..BarConfig::default()
        });
        assert_eq!(bar.render(0), "[   0.0%   ]");
    }

    #[test]
    fn partial_bar_marks_advancing_edge() {
        let mut bar = bar(BarConfig {
            total_width: 22,
            ..BarConfig::default()
        });
        // interior 20, arrow round(0.25 * 20) = 5
        let line = bar.render(25);
        assert!(line.starts_with("[=====>"));
        assert!(line.ends_with(']'));
        assert!(line.contains("25.0%"));
    }

    #[test]
    fn arrow_fill_is_monotone_in_amount() {
        let mut bar = bar(BarConfig {
            total_width: 50,
            ..BarConfig::default()
        });
        let mut last = 0;
        for amount in 0..=100 {
            bar.render(amount);
            let arrow = bar.arrow.unwrap();
            assert!(arrow >= last, "fill shrank at {amount}");
            last = arrow;
        }
        assert_eq!(last, bar.interior_width());
    }

    #[test]
    fn title_counts_against_interior() {
        let mut bar = bar(BarConfig {
            title: "data".to_string(),
            total_width: 20,
            ..BarConfig::default()
        });
        // 20 - 2 brackets - 6 for "data: "
        assert_eq!(bar.interior_width(), 12);
        let line = bar.render(0);
        assert!(line.starts_with("data: ["));
        assert_eq!(line.len(), 20);
    }

    #[test]
    fn max_below_min_is_clamped_up() {
        let mut bar = bar(BarConfig {
            min: 20,
            max: 10,
            ..BarConfig::default()
        });
        // Degenerate range renders deterministically at zero.
        assert!(bar.render(20).contains("0.0%"));
    }

    #[test]
    fn fraction_handles_degenerate_range() {
        let bar = bar(BarConfig {
            min: 5,
            max: 5,
            ..BarConfig::default()
        });
        assert_eq!(bar.fraction(5), 0.0);
    }
}
