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

/// The error struct of the template layout.
///
/// Rendering itself never fails; errors surface only from fallible helpers such as
/// [`Level::abbreviation`](crate::record::Level::abbreviation) and are swallowed by the layout.
pub struct Error {
    message: String,
    sources: Vec<anyhow::Error>,
    context: Vec<(&'static str, String)>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            write!(
                f,
                "{}",
                self.context
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
            write!(f, " }}")?;
        }

        if !self.sources.is_empty() {
            write!(f, ", sources: [")?;
            for (i, source) in self.sources.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{source}")?;
            }
            write!(f, "]")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, we will print like Debug.
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("message", &self.message);
            de.field("context", &self.context);
            de.field("sources", &self.sources);
            return de.finish();
        }

        writeln!(f, "{}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }
        if !self.sources.is_empty() {
            writeln!(f)?;
            writeln!(f, "Sources:")?;
            for source in self.sources.iter() {
                writeln!(f, "   {source:#}")?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.sources.first().map(|v| v.as_ref())
    }
}

impl Error {
    /// Create a new Error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sources: vec![],
            context: vec![],
        }
    }

    /// Add one more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Add one more source in error.
    pub fn with_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        self.sources.push(src.into());
        self
    }

    /// The error message, without context or sources.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Return an iterator over all sources of this error.
    pub fn sources(&self) -> impl ExactSizeIterator<Item = &(dyn std::error::Error + 'static)> {
        self.sources.iter().map(|v| v.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context_and_sources() {
        let err = Error::new("failed to format timestamp")
            .with_context("pattern", "%Q")
            .with_source(anyhow::anyhow!("unrecognized directive"));

        assert_eq!(
            err.to_string(),
            "failed to format timestamp, context: { pattern: %Q }, sources: [unrecognized directive]"
        );
        assert_eq!(err.message(), "failed to format timestamp");
        assert_eq!(err.sources().len(), 1);
    }

    #[test]
    fn display_bare_message() {
        let err = Error::new("malformed level");
        assert_eq!(err.to_string(), "malformed level");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn debug_lists_context_and_sources() {
        let err = Error::new("failed to format timestamp")
            .with_context("pattern", "%Y %")
            .with_source(anyhow::anyhow!("unexpected end of format string"));

        assert_eq!(
            format!("{err:?}"),
            "failed to format timestamp\n\nContext:\n   pattern: %Y %\n\nSources:\n   unexpected end of format string\n"
        );
    }

    #[test]
    fn alternate_debug_is_structural() {
        let err = Error::new("malformed level").with_context("level", 9);
        assert_eq!(
            format!("{err:#?}"),
            "Error {\n    message: \"malformed level\",\n    context: [\n        (\n            \"level\",\n            \"9\",\n        ),\n    ],\n    sources: [],\n}"
        );
    }
}
