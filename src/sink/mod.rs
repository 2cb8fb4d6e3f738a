//! Sink adapters: turn solar events into InfluxDB writes.
//!
//! ## Contents
//! - [`Point`], [`Annotation`], [`Batch`] wire-neutral payload model
//! - [`Sink`] write contract, shared as [`SinkRef`]
//! - [`AnnotationSink`] one JSON annotation per event
//! - [`LineProtocolSink`] one line-protocol batch per dispatch
//! - [`build`] picks the variant from [`SinkSettings`]
//!
//! The HTTP client is created once in [`build`] and reused for every write.

mod annotation;
mod http;
mod line_protocol;
mod point;
#[allow(clippy::module_inception)]
mod sink;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

pub use annotation::{ANNOTATIONS_PATH, AnnotationSink};
pub use http::{HttpTarget, USER_AGENT};
pub use line_protocol::{LineProtocolSink, WRITE_PATH};
pub use point::{Annotation, Batch, FIELD, MEASUREMENT, PRECISION, Point};
pub use sink::{Sink, SinkRef};

use crate::config::{SinkKind, SinkSettings};
use crate::error::ConfigError;

/// Builds the configured sink. Fails fast on a malformed address.
pub fn build(settings: &SinkSettings) -> Result<SinkRef, ConfigError> {
    let target = HttpTarget::new(settings)?;
    Ok(match settings.kind {
        SinkKind::Annotation => Arc::new(AnnotationSink::new(target)),
        SinkKind::Points => {
            if settings.database.trim().is_empty() {
                return Err(ConfigError::MissingDatabase);
            }
            Arc::new(LineProtocolSink::new(target))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_selects_variant() {
        let mut settings = SinkSettings::default();
        assert_eq!(build(&settings).unwrap().name(), "annotations");

        settings.kind = SinkKind::Points;
        assert_eq!(build(&settings).unwrap().name(), "points");

        settings.database = String::new();
        assert!(matches!(build(&settings), Err(ConfigError::MissingDatabase)));
    }

    #[test]
    fn test_build_fails_on_bad_address() {
        let settings = SinkSettings {
            addr: "::not-a-url::".into(),
            ..SinkSettings::default()
        };
        assert!(matches!(
            build(&settings),
            Err(ConfigError::InvalidAddress { .. })
        ));
    }
}
