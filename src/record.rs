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

//! Log record and its severity level.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use crate::Error;
use crate::kv::KeyValues;

/// The payload of a log message.
///
/// A record is read-only input to a [`Layout`](crate::Layout); it is never mutated while being
/// formatted.
#[derive(Clone, Debug)]
pub struct Record<'a> {
    // the observed time
    now: SystemTime,

    // the metadata
    level: Level,
    target: &'a str,
    caller: Option<CallSite<'a>>,

    // the payload
    payload: Cow<'a, str>,

    // structural logging
    kvs: KeyValues<'a>,
}

impl<'a> Record<'a> {
    /// The observed time.
    pub fn time(&self) -> SystemTime {
        self.now
    }

    /// The severity level of the message.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The name of the target of the directive.
    pub fn target(&self) -> &'a str {
        self.target
    }

    /// The call site that emitted the message, if it was reported.
    pub fn caller(&self) -> Option<&CallSite<'a>> {
        self.caller.as_ref()
    }

    /// The message body.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// The key-values.
    pub fn key_values(&self) -> &KeyValues<'a> {
        &self.kvs
    }

    /// Returns a new builder.
    pub fn builder() -> RecordBuilder<'a> {
        RecordBuilder::default()
    }
}

/// Builder for [`Record`].
#[derive(Debug)]
pub struct RecordBuilder<'a> {
    record: Record<'a>,
}

impl Default for RecordBuilder<'_> {
    fn default() -> Self {
        RecordBuilder {
            record: Record {
                now: SystemTime::now(),
                level: Level::INFO,
                target: "",
                caller: None,
                payload: Cow::Borrowed(""),
                kvs: KeyValues::default(),
            },
        }
    }
}

impl<'a> RecordBuilder<'a> {
    /// Set [`time`](Record::time).
    pub fn time(mut self, now: SystemTime) -> Self {
        self.record.now = now;
        self
    }

    /// Set [`level`](Record::level).
    pub fn level(mut self, level: Level) -> Self {
        self.record.level = level;
        self
    }

    /// Set [`target`](Record::target).
    pub fn target(mut self, target: &'a str) -> Self {
        self.record.target = target;
        self
    }

    /// Set [`caller`](Record::caller).
    pub fn caller(mut self, caller: Option<CallSite<'a>>) -> Self {
        self.record.caller = caller;
        self
    }

    /// Set [`payload`](Record::payload).
    pub fn payload(mut self, payload: impl Into<Cow<'a, str>>) -> Self {
        self.record.payload = payload.into();
        self
    }

    /// Set [`key_values`](Record::key_values).
    pub fn key_values(mut self, kvs: impl Into<KeyValues<'a>>) -> Self {
        self.record.kvs = kvs.into();
        self
    }

    /// Invoke the builder and return a `Record`.
    pub fn build(self) -> Record<'a> {
        self.record
    }
}

/// The source location that emitted a log record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallSite<'a> {
    file: &'a str,
    function: &'a str,
    line: u32,
}

impl<'a> CallSite<'a> {
    /// Create a call site from its file path, function name and line number.
    pub const fn new(file: &'a str, function: &'a str, line: u32) -> Self {
        Self {
            file,
            function,
            line,
        }
    }

    /// The source file path.
    pub fn file(&self) -> &'a str {
        self.file
    }

    /// The fully qualified function name.
    pub fn function(&self) -> &'a str {
        self.function
    }

    /// The line number.
    pub fn line(&self) -> u32 {
        self.line
    }
}

/// The severity level of a log record.
///
/// Seven levels are recognized, from [`Level::PANIC`] (most severe) to [`Level::TRACE`]. A level
/// can also carry any other raw value handed over by a logging framework; such a level has no
/// abbreviation and displays as `unknown`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u32);

impl Level {
    /// Designates errors after which the application panics.
    pub const PANIC: Level = Level(0);
    /// Designates errors after which the application exits.
    pub const FATAL: Level = Level(1);
    /// Designates very serious errors.
    pub const ERROR: Level = Level(2);
    /// Designates hazardous situations.
    pub const WARN: Level = Level(3);
    /// Designates useful information.
    pub const INFO: Level = Level(4);
    /// Designates lower priority information.
    pub const DEBUG: Level = Level(5);
    /// Designates very low priority, often extremely verbose, information.
    pub const TRACE: Level = Level(6);

    const NAMES: [(&'static str, &'static str); 7] = [
        ("panic", "PANC"),
        ("fatal", "FATA"),
        ("error", "ERRO"),
        ("warn", "WARN"),
        ("info", "INFO"),
        ("debug", "DEBG"),
        ("trace", "TRAC"),
    ];

    /// Create a level from its raw severity value. Values above 6 are unrecognized.
    pub const fn from_u32(value: u32) -> Level {
        Level(value)
    }

    /// The raw severity value.
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Whether this is one of the seven recognized levels.
    pub fn is_recognized(&self) -> bool {
        (self.0 as usize) < Self::NAMES.len()
    }

    /// The lowercase name of the level, e.g. `"debug"`.
    pub fn name(&self) -> Option<&'static str> {
        Self::NAMES.get(self.0 as usize).map(|(name, _)| *name)
    }

    /// The 4-character uppercase abbreviation, e.g. `"DEBG"` for debug and `"PANC"` for panic.
    ///
    /// Fails for unrecognized levels. The [`fmt::Display`] implementation maps that failure to
    /// `"unknown"`.
    pub fn abbreviation(&self) -> Result<&'static str, Error> {
        Self::NAMES
            .get(self.0 as usize)
            .map(|(_, abbr)| *abbr)
            .ok_or_else(|| {
                Error::new("not a valid level").with_context("level", self.0)
            })
    }

    /// Return the display text of the level: its abbreviation, or `"unknown"`.
    pub fn as_str(&self) -> &'static str {
        self.abbreviation().unwrap_or("unknown")
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.pad(name),
            None => write!(f, "Level({})", self.0),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;
    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for (value, (name, abbr)) in Self::NAMES.iter().enumerate() {
            if s.eq_ignore_ascii_case(name) || s.eq_ignore_ascii_case(abbr) {
                return Ok(Level(value as u32));
            }
        }

        Err(Error::new(format!("malformed level: {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviations_are_exact() {
        let cases = [
            (Level::TRACE, "TRAC"),
            (Level::DEBUG, "DEBG"),
            (Level::INFO, "INFO"),
            (Level::WARN, "WARN"),
            (Level::ERROR, "ERRO"),
            (Level::FATAL, "FATA"),
            (Level::PANIC, "PANC"),
        ];
        for (level, expected) in cases {
            assert_eq!(level.abbreviation().unwrap(), expected);
            assert_eq!(level.to_string(), expected);
            assert!(level.is_recognized());
        }
    }

    #[test]
    fn unrecognized_level_displays_unknown() {
        let level = Level::from_u32(7);
        assert!(!level.is_recognized());
        assert_eq!(level.to_string(), "unknown");
        assert_eq!(level.name(), None);
        assert_eq!(format!("{level:?}"), "Level(7)");

        let err = level.abbreviation().unwrap_err();
        assert_eq!(err.to_string(), "not a valid level, context: { level: 7 }");
    }

    #[test]
    fn parse_level() {
        assert_eq!("warn".parse::<Level>().unwrap(), Level::WARN);
        assert_eq!("PANIC".parse::<Level>().unwrap(), Level::PANIC);
        assert_eq!("DEBG".parse::<Level>().unwrap(), Level::DEBUG);
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn severity_order() {
        assert!(Level::PANIC < Level::ERROR);
        assert!(Level::INFO < Level::TRACE);
        assert_eq!(Level::INFO.as_u32(), 4);
    }

    #[test]
    fn builder_defaults() {
        let record = Record::builder().payload("hello").build();
        assert_eq!(record.level(), Level::INFO);
        assert_eq!(record.payload(), "hello");
        assert!(record.caller().is_none());
        assert!(record.key_values().is_empty());
    }
}
