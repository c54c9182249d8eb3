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

use std::fmt::Write;

/// When values rendered by a [`TemplateLayout`](super::TemplateLayout) are wrapped in quotes.
///
/// A value is quoted if it is empty and `quote_empty_fields` is set, or, unless `disable_quote`
/// is set, if it contains any character outside `A-Za-z0-9` and `-._/@^+`. Quoted values are
/// escaped with [`str::escape_debug`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Quoting {
    /// Wrap empty values in quotes.
    pub quote_empty_fields: bool,
    /// Never quote non-empty values.
    pub disable_quote: bool,
}

impl Quoting {
    /// Whether `text` must be quoted under this policy.
    pub fn needs_quoting(&self, text: &str) -> bool {
        if self.quote_empty_fields && text.is_empty() {
            return true;
        }
        if self.disable_quote {
            return false;
        }
        !text.chars().all(is_unquoted_safe)
    }

    pub(crate) fn write_value(&self, buf: &mut String, text: &str) {
        if self.needs_quoting(text) {
            write_quoted(buf, text);
        } else {
            buf.push_str(text);
        }
    }
}

fn is_unquoted_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '/' | '@' | '^' | '+')
}

pub(crate) fn write_quoted(buf: &mut String, text: &str) {
    // SAFETY: write to a string always succeeds
    write!(buf, "\"{}\"", text.escape_debug()).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(quoting: Quoting, text: &str) -> String {
        let mut buf = String::new();
        quoting.write_value(&mut buf, text);
        buf
    }

    #[test]
    fn safe_values_stay_bare() {
        let quoting = Quoting::default();
        assert_eq!(render(quoting, "walrus"), "walrus");
        assert_eq!(render(quoting, "a-b.c_d/e@f^g+h09"), "a-b.c_d/e@f^g+h09");
        assert_eq!(render(quoting, ""), "");
    }

    #[test]
    fn unsafe_values_are_quoted() {
        let quoting = Quoting::default();
        assert_eq!(render(quoting, "hello world"), r#""hello world""#);
        assert_eq!(render(quoting, "a=b"), r#""a=b""#);
        assert_eq!(render(quoting, "say \"hi\"\n"), r#""say \"hi\"\n""#);
        assert_eq!(render(quoting, "tab\there"), r#""tab\there""#);
        assert_eq!(render(quoting, "café"), r#""café""#);
    }

    #[test]
    fn quote_empty_fields() {
        let quoting = Quoting {
            quote_empty_fields: true,
            ..Quoting::default()
        };
        assert_eq!(render(quoting, ""), r#""""#);
        assert_eq!(render(quoting, "walrus"), "walrus");
    }

    #[test]
    fn disable_quote() {
        let quoting = Quoting {
            disable_quote: true,
            ..Quoting::default()
        };
        assert_eq!(render(quoting, "hello world"), "hello world");
        assert_eq!(render(quoting, ""), "");

        let both = Quoting {
            quote_empty_fields: true,
            disable_quote: true,
        };
        assert_eq!(render(both, ""), r#""""#);
    }
}
