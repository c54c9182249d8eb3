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

//! A template-driven text layout that renders each log record as one column-aligned line.
//!
//! # Overview
//!
//! A [`TemplateLayout`] owns a [`Template`](template::Template): an ordered list of field keys
//! (`time`, `level`, `msg`, `func`, `file`, `line`), separators (`[`, `]`, `:`, `|`), registered
//! inline field names and literal text. Rendering a [`Record`](record::Record) walks the template
//! once and appends the remaining key-values as a trailing `(key="value" ...)` group.
//!
//! Rendering never fails and never mutates the record or the layout, so a configured layout can
//! be shared across threads.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use std::time::SystemTime;
//!
//! use jiff::tz::TimeZone;
//! use logforth_layout_template::TemplateLayout;
//! use logforth_layout_template::kv::Value;
//! use logforth_layout_template::record::CallSite;
//! use logforth_layout_template::record::Level;
//! use logforth_layout_template::record::Record;
//! use logforth_layout_template::template::Template;
//!
//! let layout = TemplateLayout::default()
//!     .template("[time] level func:line msg".parse::<Template>().unwrap())
//!     .timezone(TimeZone::UTC)
//!     .timestamp_format("%H:%M:%S");
//!
//! let record = Record::builder()
//!     .time(SystemTime::UNIX_EPOCH + Duration::from_secs(3600))
//!     .level(Level::WARN)
//!     .payload("disk almost full")
//!     .caller(Some(CallSite::new("src/disk.rs", "disk::check", 42)))
//!     .key_values([("free", Value::from(3u64))])
//!     .build();
//!
//! assert_eq!(
//!     String::from_utf8(layout.render(&record)).unwrap(),
//!     "[01:00:00] WARN               disk::check:42   \"disk almost full\" (free=3)\n",
//! );
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub extern crate jiff;

mod error;
pub use error::Error;

pub mod bridge;
pub mod kv;
pub mod layout;
pub mod record;
pub mod template;

pub use layout::Layout;
pub use layout::TemplateLayout;
