// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::sync::Arc;

/// A strategy that shortens or pads a caller function or file name for display.
pub type NameFormatter = Arc<dyn Fn(&str) -> String + Send + Sync + 'static>;

/// Column widths used by the default caller name shortening.
///
/// Each layout owns its widths; share one value between layouts to keep their columns aligned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallerWidths {
    /// Width of the function name column. Default to 25.
    pub function: usize,
    /// Width of the file name column. Default to 20.
    pub file: usize,
}

impl Default for CallerWidths {
    fn default() -> Self {
        Self {
            function: 25,
            file: 20,
        }
    }
}

/// Fit `name` into a column of `width` characters.
///
/// Longer names keep their last `width - 1` characters behind a leading `.` marker; shorter names
/// are left-padded with spaces. The result is always `width` characters wide, except that a zero
/// width still keeps the marker.
///
/// # Examples
///
/// ```
/// use logforth_layout_template::layout::shorten_name;
///
/// assert_eq!(shorten_name("main", 6), "  main");
/// assert_eq!(shorten_name("crate::module::function", 10), ".:function");
/// ```
pub fn shorten_name(name: &str, width: usize) -> String {
    let len = name.chars().count();
    if len > width {
        let keep = width.saturating_sub(1);
        let tail = name.char_indices().nth(len - keep).map_or("", |(idx, _)| &name[idx..]);
        format!(".{tail}")
    } else {
        format!("{name:>width$}")
    }
}

/// Caller name formatting: an optional custom strategy, falling back to [`shorten_name`].
#[derive(Clone, Default)]
pub(crate) struct NameFormat {
    custom: Option<NameFormatter>,
}

impl NameFormat {
    pub(crate) fn new(custom: NameFormatter) -> Self {
        Self {
            custom: Some(custom),
        }
    }

    pub(crate) fn format(&self, name: &str, width: usize) -> String {
        match &self.custom {
            Some(custom) => custom(name),
            None => shorten_name(name, width),
        }
    }
}

impl fmt::Debug for NameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.custom {
            Some(_) => f.write_str("Custom"),
            None => f.write_str("Default"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_names() {
        assert_eq!(shorten_name("main.rs", 10), "   main.rs");
        assert_eq!(shorten_name("exactly_10", 10), "exactly_10");
        assert_eq!(shorten_name("", 3), "   ");
    }

    #[test]
    fn padding_is_idempotent() {
        let once = shorten_name("handler", 25);
        assert_eq!(shorten_name(&once, 25), once);
        assert_eq!(once.len(), 25);
    }

    #[test]
    fn truncates_long_names() {
        let name = "app::handlers::process_incoming_request";
        let short = shorten_name(name, 25);
        assert_eq!(short, ".process_incoming_request");
        assert_eq!(short.chars().count(), 25);

        let short = shorten_name("/very/long/path/to/src/main.rs", 20);
        assert_eq!(short, ".path/to/src/main.rs");
        assert_eq!(short.chars().count(), 20);
    }

    #[test]
    fn truncates_by_character() {
        assert_eq!(shorten_name("日本語のファイル名", 5), ".ァイル名");
        assert_eq!(shorten_name("日本語のファイル名", 5).chars().count(), 5);
    }

    #[test]
    fn degenerate_widths() {
        assert_eq!(shorten_name("ab", 1), ".");
        assert_eq!(shorten_name("ab", 0), ".");
        assert_eq!(shorten_name("", 0), "");
    }

    #[test]
    fn custom_strategy_wins() {
        let format = NameFormat::new(Arc::new(|name: &str| name.to_uppercase()));
        assert_eq!(format.format("main", 10), "MAIN");
        assert_eq!(NameFormat::default().format("main", 6), "  main");
    }
}
