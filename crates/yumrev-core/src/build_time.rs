//! Decoding of the `%{BUILDTIME}` tag.
//!
//! Depending on the dnf/yum version, repoquery prints the build time either
//! as epoch seconds or as a `YYYY-MM-DD H:MM` calendar string in UTC. Each
//! accepted shape is one [`BuildTimeFormat`]; they are tried in order and
//! the first whose recognizer matches decides the outcome.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use crate::{error::QueryError, QueryResult};

const RHEL_8_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One accepted build time shape: a recognizer paired with its parser.
pub struct BuildTimeFormat {
    pub description: &'static str,
    recognizer: Regex,
    parser: fn(&str) -> QueryResult<DateTime<Utc>>,
}

impl BuildTimeFormat {
    pub fn matches(&self, token: &str) -> bool {
        self.recognizer.is_match(token)
    }

    /// Parses a token already accepted by [`BuildTimeFormat::matches`].
    pub fn parse(&self, token: &str) -> QueryResult<DateTime<Utc>> {
        (self.parser)(token)
    }
}

/// Accepted formats in the order they are tried.
pub static BUILD_TIME_FORMATS: LazyLock<Vec<BuildTimeFormat>> = LazyLock::new(|| {
    vec![
        BuildTimeFormat {
            description: "epoch seconds",
            recognizer: Regex::new(r"^[0-9]+$").expect("unable to compile epoch regex"),
            parser: parse_epoch_seconds,
        },
        BuildTimeFormat {
            description: RHEL_8_FORMAT,
            recognizer: Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{1,2}:[0-9]{2}$")
                .expect("unable to compile rhel 8 build time regex"),
            parser: parse_rhel8,
        },
    ]
});

fn parse_epoch_seconds(token: &str) -> QueryResult<DateTime<Utc>> {
    token
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| {
            QueryError::UnparseableTimestamp {
                token: token.to_string(),
                expected: "epoch seconds within the supported date range".into(),
                source: None,
            }
        })
}

fn parse_rhel8(token: &str) -> QueryResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(token, RHEL_8_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|err| {
            QueryError::UnparseableTimestamp {
                token: token.to_string(),
                expected: RHEL_8_FORMAT.into(),
                source: Some(err),
            }
        })
}

/// Converts a `%{BUILDTIME}` token into a UTC instant.
pub fn parse_build_time(token: &str) -> QueryResult<DateTime<Utc>> {
    let format = BUILD_TIME_FORMATS
        .iter()
        .find(|format| format.matches(token))
        .ok_or_else(|| {
            QueryError::UnparseableTimestamp {
                token: token.to_string(),
                expected: BUILD_TIME_FORMATS
                    .iter()
                    .map(|format| format.description)
                    .collect::<Vec<_>>()
                    .join(" or "),
                source: None,
            }
        })?;

    format.parse(token)
}
