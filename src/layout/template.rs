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
use std::fmt::Write;
use std::sync::Arc;
use std::time::SystemTime;

use jiff::Timestamp;
use jiff::Zoned;
use jiff::fmt::strtime;
use jiff::tz::TimeZone;

use crate::Error;
use crate::kv::Key;
use crate::kv::Value;
use crate::kv::Visitor;
use crate::layout::CallerWidths;
use crate::layout::Layout;
use crate::layout::Quoting;
use crate::layout::caller::NameFormat;
use crate::layout::quote::write_quoted;
use crate::record::Record;
use crate::template::Template;
use crate::template::Token;

const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// A layout that renders each log record as one line, following a [`Template`].
///
/// Output format with the template `[time] level file:func:line msg`:
///
/// ```text
/// [2024-08-11T22:44:57+08:00] INFO     examples/main.rs:                main::run:12   "server started"
/// [2024-08-11T22:44:57+08:00] WARN     examples/main.rs:.andlers::process_request:48   retrying (attempt=2)
/// ```
///
/// Fields that are not placed by the template are appended as a trailing `(key="value" ...)`
/// group. Caller file and function names are shortened or padded to fixed widths so that
/// columns line up across lines.
///
/// # Examples
///
/// ```
/// use logforth_layout_template::TemplateLayout;
/// use logforth_layout_template::record::Level;
/// use logforth_layout_template::record::Record;
///
/// let layout = TemplateLayout::default().template(["[", "level", "]", "msg"]);
/// let record = Record::builder().level(Level::DEBUG).payload("test").build();
/// assert_eq!(layout.render(&record), b"[DEBG] test\n");
/// ```
#[derive(Clone)]
pub struct TemplateLayout {
    template: Template,
    timezone: TimeZone,
    timestamp_format: Option<String>,
    quoting: Quoting,
    widths: CallerWidths,
    function_format: NameFormat,
    file_format: NameFormat,
    inline_fields: Vec<String>,
    tag_source: bool,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self {
            template: Template::default(),
            timezone: TimeZone::system(),
            timestamp_format: None,
            quoting: Quoting::default(),
            widths: CallerWidths::default(),
            function_format: NameFormat::default(),
            file_format: NameFormat::default(),
            inline_fields: vec![],
            tag_source: false,
        }
    }
}

impl fmt::Debug for TemplateLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateLayout")
            .field("template", &self.template.to_string())
            .field("timestamp_format", &self.timestamp_format)
            .field("quoting", &self.quoting)
            .field("widths", &self.widths)
            .field("function_format", &self.function_format)
            .field("file_format", &self.file_format)
            .field("inline_fields", &self.inline_fields)
            .field("tag_source", &self.tag_source)
            .finish_non_exhaustive()
    }
}

impl TemplateLayout {
    /// Replace the template.
    ///
    /// Tokens that are neither separators, field keys nor registered inline fields are rendered
    /// as literal text.
    ///
    /// # Examples
    ///
    /// ```
    /// use logforth_layout_template::TemplateLayout;
    /// use logforth_layout_template::template::Template;
    ///
    /// let layout = TemplateLayout::default().template(["[", "time", "]", "level", "msg"]);
    ///
    /// let template: Template = "[time] level file:func:line msg".parse().unwrap();
    /// let layout = TemplateLayout::default().template(template);
    /// ```
    pub fn template(mut self, template: impl Into<Template>) -> Self {
        self.template = template.into();
        self
    }

    /// Set the timezone for timestamps.
    ///
    /// Defaults to the system timezone if not set.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::tz::TimeZone;
    /// use logforth_layout_template::TemplateLayout;
    ///
    /// let layout = TemplateLayout::default().timezone(TimeZone::UTC);
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.timezone = tz;
        self
    }

    /// Set the [strftime](jiff::fmt::strtime) pattern for timestamps.
    ///
    /// Default to RFC 3339 with second precision, `%Y-%m-%dT%H:%M:%S%:z`. A pattern that cannot
    /// be formatted falls back to the default.
    ///
    /// # Examples
    ///
    /// ```
    /// use logforth_layout_template::TemplateLayout;
    ///
    /// let layout = TemplateLayout::default().timestamp_format("%Y-%m-%d %H:%M:%S%.3f");
    /// ```
    pub fn timestamp_format(mut self, pattern: impl Into<String>) -> Self {
        self.timestamp_format = Some(pattern.into());
        self
    }

    /// Replace the quoting policy for the message and inline fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use logforth_layout_template::TemplateLayout;
    /// use logforth_layout_template::layout::Quoting;
    ///
    /// let layout = TemplateLayout::default().quoting(Quoting {
    ///     quote_empty_fields: true,
    ///     disable_quote: true,
    /// });
    /// ```
    pub fn quoting(mut self, quoting: Quoting) -> Self {
        self.quoting = quoting;
        self
    }

    /// Wrap empty values in quotes. Default to `false`.
    pub fn quote_empty_fields(mut self, yes: bool) -> Self {
        self.quoting.quote_empty_fields = yes;
        self
    }

    /// Never quote non-empty values. Default to `false`.
    pub fn disable_quote(mut self, yes: bool) -> Self {
        self.quoting.disable_quote = yes;
        self
    }

    /// Register field names rendered at their template position instead of the trailing group.
    ///
    /// # Examples
    ///
    /// ```
    /// use logforth_layout_template::TemplateLayout;
    ///
    /// let layout = TemplateLayout::default()
    ///     .template(["level", "request_id", "msg"])
    ///     .inline_fields(["request_id"]);
    /// ```
    pub fn inline_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.inline_fields.contains(&name) {
                self.inline_fields.push(name);
            }
        }
        self
    }

    /// Open the trailing group with `source=<file>:<function>:<line>` when the record has a
    /// caller. Default to `false`.
    pub fn tag_source(mut self, yes: bool) -> Self {
        self.tag_source = yes;
        self
    }

    /// Set the widths used by the default caller name shortening.
    ///
    /// No effect on a name that has a custom formatter.
    pub fn caller_widths(mut self, widths: CallerWidths) -> Self {
        self.widths = widths;
        self
    }

    /// Set a user-defined formatter for the caller function name.
    ///
    /// Default to [`shorten_name`](crate::layout::shorten_name) with the function width.
    ///
    /// # Examples
    ///
    /// ```
    /// use logforth_layout_template::TemplateLayout;
    ///
    /// // keep the last path segment only
    /// let layout = TemplateLayout::default()
    ///     .function_formatter(|name| name.rsplit("::").next().unwrap_or(name).to_string());
    /// ```
    pub fn function_formatter(
        mut self,
        format: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.function_format = NameFormat::new(Arc::new(format));
        self
    }

    /// Set a user-defined formatter for the caller file name.
    ///
    /// Default to [`shorten_name`](crate::layout::shorten_name) with the file width.
    pub fn file_formatter(mut self, format: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.file_format = NameFormat::new(Arc::new(format));
        self
    }

    /// Render a record as one newline-terminated line.
    ///
    /// Never fails: a missing caller leaves caller tokens empty and an unrecognized level renders
    /// as `unknown`.
    pub fn render(&self, record: &Record) -> Vec<u8> {
        let mut text = String::new();

        let tokens = self.template.tokens();
        for (idx, token) in tokens.iter().enumerate() {
            self.write_token(&mut text, token, record);

            let Some(next) = tokens.get(idx + 1) else {
                break;
            };
            if is_spaced_after(token) && !is_glued_to_previous(next) {
                text.push(' ');
            }
        }

        self.write_trailing_fields(&mut text, record);

        text.push('\n');
        if self.template.has_line_break() {
            text.push('\n');
        }
        text.into_bytes()
    }

    fn write_token(&self, text: &mut String, token: &Token, record: &Record) {
        match token {
            Token::Separator(sep) => text.push_str(sep.as_str()),
            Token::Time => text.push_str(&self.format_time(record.time())),
            Token::Level => text.push_str(record.level().as_str()),
            Token::Message => self.quoting.write_value(text, record.payload()),
            Token::Function => {
                if let Some(caller) = record.caller() {
                    let name = caller.function();
                    text.push_str(&self.function_format.format(name, self.widths.function));
                }
            }
            Token::File => {
                if let Some(caller) = record.caller() {
                    let name = caller.file();
                    text.push_str(&self.file_format.format(name, self.widths.file));
                }
            }
            Token::Line => {
                if let Some(caller) = record.caller() {
                    // SAFETY: write to a string always succeeds
                    write!(text, "{:<4}", caller.line()).unwrap();
                }
            }
            Token::Text(name) if self.is_inline(name) => {
                if let Some(value) = record.key_values().get(name) {
                    self.write_inline_value(text, &value);
                }
            }
            Token::Text(literal) => text.push_str(literal),
        }
    }

    fn write_inline_value(&self, text: &mut String, value: &Value) {
        match value.to_borrowed_str() {
            Some(s) => self.quoting.write_value(text, s),
            None => self.quoting.write_value(text, &value.to_string()),
        }
    }

    fn write_trailing_fields(&self, text: &mut String, record: &Record) {
        let mut open = false;

        if self.tag_source {
            if let Some(caller) = record.caller() {
                // SAFETY: write to a string always succeeds
                write!(
                    text,
                    " (source={}:{}:{}",
                    caller.file(),
                    caller.function(),
                    caller.line()
                )
                .unwrap();
                open = true;
            }
        }

        let mut tail = TrailingFields {
            layout: self,
            text,
            open,
        };
        // visiting never fails: the writer only appends to a string
        record.key_values().visit(&mut tail).ok();

        if tail.open {
            tail.text.push(')');
        }
    }

    fn is_inline(&self, name: &str) -> bool {
        self.inline_fields.iter().any(|field| field == name)
    }

    // A registered field leaves the trailing group only if the template renders it. Names that
    // spell a built-in key (`file`, `level`, ...) never do, as the built-in takes the position.
    fn is_placed_inline(&self, name: &str) -> bool {
        self.is_inline(name)
            && self
                .template
                .tokens()
                .iter()
                .any(|token| matches!(token, Token::Text(text) if text == name))
    }

    fn format_time(&self, time: SystemTime) -> String {
        // jiff::Timestamp::try_from only fails if the time is out of jiff's range
        let ts = Timestamp::try_from(time).unwrap_or(Timestamp::UNIX_EPOCH);
        let zoned = ts.to_zoned(self.timezone.clone());
        match self.timestamp_format.as_deref() {
            Some(pattern) => try_format_time(pattern, &zoned)
                .unwrap_or_else(|_| default_timestamp_format(&zoned)),
            None => default_timestamp_format(&zoned),
        }
    }
}

struct TrailingFields<'a> {
    layout: &'a TemplateLayout,
    text: &'a mut String,
    open: bool,
}

impl Visitor for TrailingFields<'_> {
    fn visit(&mut self, key: Key<'_>, value: Value<'_>) -> Result<(), Error> {
        if self.layout.is_placed_inline(key.as_str()) {
            return Ok(());
        }

        self.text.push_str(if self.open { " " } else { " (" });
        self.open = true;

        self.text.push_str(key.as_str());
        self.text.push('=');
        match value.to_borrowed_str() {
            Some(s) => write_quoted(self.text, s),
            // SAFETY: write to a string always succeeds
            None => write!(self.text, "{value}").unwrap(),
        }
        Ok(())
    }
}

fn try_format_time(pattern: &str, zoned: &Zoned) -> Result<String, Error> {
    strtime::format(pattern, zoned).map_err(|err| {
        Error::new("failed to format timestamp")
            .with_context("pattern", pattern)
            .with_source(err)
    })
}

fn default_timestamp_format(zoned: &Zoned) -> String {
    zoned.strftime(DEFAULT_TIMESTAMP_FORMAT).to_string()
}

// A space follows every token but `[`, `:`, `|` and literal line breaks.
fn is_spaced_after(token: &Token) -> bool {
    match token {
        Token::Separator(sep) => sep.is_spaced_after(),
        Token::Text(text) => !text.ends_with('\n'),
        _ => true,
    }
}

fn is_glued_to_previous(token: &Token) -> bool {
    match token {
        Token::Separator(sep) => sep.is_non_spacing(),
        Token::Text(text) => text.starts_with('\n'),
        _ => false,
    }
}

impl Layout for TemplateLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        Ok(self.render(record))
    }
}
