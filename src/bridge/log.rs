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

use std::borrow::Cow;

use crate::Error;
use crate::Layout;
use crate::kv::Key;
use crate::kv::Value;
use crate::record::CallSite;
use crate::record::Level;
use crate::record::RecordBuilder;

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::ERROR,
            log::Level::Warn => Self::WARN,
            log::Level::Info => Self::INFO,
            log::Level::Debug => Self::DEBUG,
            log::Level::Trace => Self::TRACE,
        }
    }
}

/// Format a [`log::Record`] with the given layout.
///
/// The record has a caller when both its file and line are known. As `log` does not carry
/// function names, the module path stands in for the function.
///
/// # Examples
///
/// ```
/// use logforth_layout_template::TemplateLayout;
/// use logforth_layout_template::bridge::format_log_record;
///
/// let layout = TemplateLayout::default().template(["level", "msg"]);
/// let bytes = format_log_record(
///     &layout,
///     &log::Record::builder()
///         .args(format_args!("hello"))
///         .level(log::Level::Warn)
///         .build(),
/// )
/// .unwrap();
/// assert_eq!(bytes, b"WARN hello\n");
/// ```
pub fn format_log_record(layout: &dyn Layout, record: &log::Record) -> Result<Vec<u8>, Error> {
    let payload = match record.args().as_str() {
        Some(s) => Cow::Borrowed(s),
        None => Cow::Owned(record.args().to_string()),
    };
    let caller = match (record.file(), record.line()) {
        (Some(file), Some(line)) => Some(CallSite::new(
            file,
            record.module_path().unwrap_or_default(),
            line,
        )),
        _ => None,
    };

    // key-values
    let mut kvs = Vec::new();

    struct KeyValueVisitor<'a, 'b> {
        kvs: &'b mut Vec<(log::kv::Key<'a>, log::kv::Value<'a>)>,
    }

    impl<'a, 'b> log::kv::VisitSource<'a> for KeyValueVisitor<'a, 'b> {
        fn visit_pair(
            &mut self,
            key: log::kv::Key<'a>,
            value: log::kv::Value<'a>,
        ) -> Result<(), log::kv::Error> {
            self.kvs.push((key, value));
            Ok(())
        }
    }

    let mut visitor = KeyValueVisitor { kvs: &mut kvs };
    record
        .key_values()
        .visit(&mut visitor)
        .map_err(|err| Error::new("failed to visit key-values").with_context("cause", err))?;

    let new_kvs = kvs
        .iter()
        .map(|(k, v)| {
            let value = match v.to_borrowed_str() {
                Some(s) => Value::from(s),
                None => Value::from_display(v),
            };
            (Key::new(k.as_str()), value)
        })
        .collect::<Vec<_>>();

    let record = RecordBuilder::default()
        .level(record.level().into())
        .target(record.target())
        .caller(caller)
        .payload(payload)
        .key_values(new_kvs)
        .build();
    layout.format(&record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TemplateLayout;

    fn layout() -> TemplateLayout {
        TemplateLayout::default()
            .template(["level", "file", ":", "line", "msg"])
            .file_formatter(|name| name.to_string())
    }

    fn format(record: &log::Record) -> String {
        String::from_utf8(format_log_record(&layout(), record).unwrap()).unwrap()
    }

    #[test]
    fn level_mapping() {
        assert_eq!(Level::from(log::Level::Error), Level::ERROR);
        assert_eq!(Level::from(log::Level::Warn), Level::WARN);
        assert_eq!(Level::from(log::Level::Info), Level::INFO);
        assert_eq!(Level::from(log::Level::Debug), Level::DEBUG);
        assert_eq!(Level::from(log::Level::Trace), Level::TRACE);
    }

    #[test]
    fn string_key_values() {
        let kvs = vec![("user", "alice")];
        let text = format(
            &log::Record::builder()
                .args(format_args!("hello"))
                .level(log::Level::Warn)
                .file(Some("src/main.rs"))
                .line(Some(10))
                .module_path(Some("app"))
                .key_values(&kvs)
                .build(),
        );
        assert_eq!(text, "WARN src/main.rs:10   hello (user=\"alice\")\n");
    }

    #[test]
    fn scalar_key_values() {
        let kvs = vec![("attempt", 3u32)];
        let attempt = 2;
        let text = format(
            &log::Record::builder()
                .args(format_args!("retry {attempt}"))
                .level(log::Level::Debug)
                .key_values(&kvs)
                .build(),
        );
        assert_eq!(text, "DEBG : \"retry 2\" (attempt=3)\n");
    }

    #[test]
    fn source_tag_uses_module_path() {
        let layout = TemplateLayout::default()
            .template(["level", "msg"])
            .tag_source(true);
        let bytes = format_log_record(
            &layout,
            &log::Record::builder()
                .args(format_args!("ready"))
                .file(Some("src/lib.rs"))
                .line(Some(3))
                .module_path(Some("app::server"))
                .build(),
        )
        .unwrap();
        assert_eq!(bytes, b"INFO ready (source=src/lib.rs:app::server:3)\n");
    }
}
