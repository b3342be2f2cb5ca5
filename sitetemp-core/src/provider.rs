use crate::model::{Coordinate, TemperatureSeries};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod power;

/// Remote source of site temperature data.
///
/// The two lookups are independent and independently fallible; callers
/// issue them concurrently and proceed with whichever succeeds.
/// `resolve_current` surfaces HTTP failures so the presentation layer can
/// show an inline notice; an extraction miss is `Ok(None)`.
/// `resolve_hourly` never fails: any network or structural problem
/// degrades to `None` with a diagnostic log.
#[async_trait]
pub trait TemperatureProvider: Send + Sync + Debug {
    async fn resolve_current(&self, coord: Coordinate) -> Result<Option<f64>, ResolverError>;

    async fn resolve_hourly(&self, coord: Coordinate) -> Option<TemperatureSeries>;
}

#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    #[error("Provider request failed with status {status}: {excerpt}")]
    Http {
        status: reqwest::StatusCode,
        excerpt: String,
    },

    #[error("Provider request failed: {0}")]
    Network(#[from] reqwest::Error),
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_caps_long_excerpts() {
        let body = "x".repeat(500);
        let excerpt = truncate_body(&body);
        assert_eq!(excerpt.len(), 203);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn truncate_body_keeps_short_bodies_intact() {
        assert_eq!(truncate_body("not found"), "not found");
    }
}
