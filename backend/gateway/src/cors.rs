//! CORS policy built from the configured origin allow-list.

use anyhow::{Context, Result, bail};
use axum::http::{HeaderName, HeaderValue};
use labelscan_config::CorsConfig;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::extract_api::REQUEST_ID_HEADER;

/// Methods and headers are mirrored from the request, which allows all of
/// them while staying valid alongside credentials.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let origin = if config.allowed_origins.iter().any(|o| o == "*") {
        if config.allow_credentials {
            bail!("Wildcard CORS origin cannot be combined with credentials");
        }
        AllowOrigin::any()
    } else {
        let origins = config
            .allowed_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin: {o:?}"))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.allow_credentials)
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allow_list_builds() {
        assert!(cors_layer(&CorsConfig::default()).is_ok());
    }

    #[test]
    fn wildcard_with_credentials_is_rejected() {
        let cfg = CorsConfig {
            allowed_origins: vec!["*".into()],
            allow_credentials: true,
        };
        assert!(cors_layer(&cfg).is_err());
    }

    #[test]
    fn wildcard_without_credentials_is_allowed() {
        let cfg = CorsConfig {
            allowed_origins: vec!["*".into()],
            allow_credentials: false,
        };
        assert!(cors_layer(&cfg).is_ok());
    }
}
