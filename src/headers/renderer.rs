//! Per-request header templating.
//!
//! Each configured (header name, template) pair is rendered against the
//! incoming request and set on it before the redirect decision runs. The
//! delimiters are configurable and default to `[[` / `]]` so templates pass
//! untouched through layers that treat `{{`/`}}` as their own syntax.
//!
//! Templates are compiled per request, matching the render contract: a
//! broken template is a deployment bug and must fail the request loudly
//! (500) rather than silently pass traffic through.

use std::collections::HashMap;

use axum::http::{
    header::{HeaderName, HeaderValue},
    Request,
};
use minijinja::syntax::SyntaxConfig;
use minijinja::{context, Environment, UndefinedBehavior, Value};
use thiserror::Error;

use crate::config::TemplateConfig;
use crate::http::request;

/// Failure to turn a configured template into a concrete header.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("header template '{header}' failed: {source}")]
    Template {
        header: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("invalid header name '{header}'")]
    InvalidName { header: String },

    #[error("header '{header}' rendered to an invalid value")]
    InvalidValue { header: String },
}

/// Renders configured header templates against incoming requests.
///
/// Immutable after construction and shared read-only across concurrent
/// requests.
pub struct HeaderRenderer {
    env: Environment<'static>,
    headers: HashMap<String, String>,
}

impl HeaderRenderer {
    /// Build a renderer for the given header map and delimiter markers.
    pub fn new(
        headers: HashMap<String, String>,
        template: &TemplateConfig,
    ) -> Result<Self, minijinja::Error> {
        // Only expression markers are remapped; header values have no use
        // for block or comment syntax.
        let syntax = SyntaxConfig::builder()
            .variable_delimiters(
                template.open_delimiter.clone(),
                template.close_delimiter.clone(),
            )
            .build()?;

        let mut env = Environment::new();
        env.set_syntax(syntax);
        // A typo'd field must fail the request, not render as an empty
        // header value.
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        Ok(Self { env, headers })
    }

    /// Render every configured template and set the results on the request,
    /// overwriting any prior values. The first failure aborts the whole
    /// request; callers must not forward after an error.
    pub fn apply<B>(&self, req: &mut Request<B>) -> Result<(), RenderError> {
        let ctx = Self::request_context(req);

        for (name, template) in &self.headers {
            let rendered =
                self.env
                    .render_str(template, &ctx)
                    .map_err(|source| RenderError::Template {
                        header: name.clone(),
                        source,
                    })?;

            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                RenderError::InvalidName {
                    header: name.clone(),
                }
            })?;
            let header_value =
                HeaderValue::from_str(&rendered).map_err(|_| RenderError::InvalidValue {
                    header: name.clone(),
                })?;

            req.headers_mut().insert(header_name, header_value);
        }

        Ok(())
    }

    /// Snapshot of the request fields templates can reference.
    fn request_context<B>(req: &Request<B>) -> Value {
        let headers: HashMap<String, String> = req
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        context! {
            method => req.method().as_str(),
            host => request::host(req),
            path => req.uri().path(),
            query => req.uri().query().unwrap_or(""),
            uri => req.uri().to_string(),
            headers => headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn renderer(headers: &[(&str, &str)]) -> HeaderRenderer {
        let map = headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        HeaderRenderer::new(map, &TemplateConfig::default()).unwrap()
    }

    fn request() -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri("/products/42?ref=mail")
            .header("host", "shop.example.com")
            .header("user-agent", "test-agent")
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn renders_request_fields() {
        let renderer = renderer(&[("X-Origin", "[[ method ]] [[ host ]][[ path ]]")]);
        let mut req = request();
        renderer.apply(&mut req).unwrap();
        assert_eq!(
            req.headers().get("X-Origin").unwrap(),
            "GET shop.example.com/products/42"
        );
    }

    #[test]
    fn overwrites_existing_header() {
        let renderer = renderer(&[("user-agent", "[[ method ]]")]);
        let mut req = request();
        renderer.apply(&mut req).unwrap();
        assert_eq!(req.headers().get("user-agent").unwrap(), "GET");
    }

    #[test]
    fn exposes_incoming_headers() {
        let renderer = renderer(&[("X-Agent", "[[ headers['user-agent'] ]]")]);
        let mut req = request();
        renderer.apply(&mut req).unwrap();
        assert_eq!(req.headers().get("X-Agent").unwrap(), "test-agent");
    }

    #[test]
    fn default_engine_delimiters_are_inert() {
        let renderer = renderer(&[("X-Mixed", "{{ method }} [[ method ]]")]);
        let mut req = request();
        renderer.apply(&mut req).unwrap();
        assert_eq!(req.headers().get("X-Mixed").unwrap(), "{{ method }} GET");
    }

    #[test]
    fn custom_delimiters() {
        let map = [("X-Custom".to_string(), "<< method >>".to_string())]
            .into_iter()
            .collect();
        let template = TemplateConfig {
            open_delimiter: "<<".to_string(),
            close_delimiter: ">>".to_string(),
        };
        let renderer = HeaderRenderer::new(map, &template).unwrap();
        let mut req = request();
        renderer.apply(&mut req).unwrap();
        assert_eq!(req.headers().get("X-Custom").unwrap(), "GET");
    }

    #[test]
    fn undefined_variable_is_an_error() {
        let renderer = renderer(&[("X-Typo", "[[ methd ]]")]);
        let mut req = request();
        let err = renderer.apply(&mut req).unwrap_err();
        assert!(matches!(err, RenderError::Template { .. }));
        assert!(req.headers().get("X-Typo").is_none(), "no header on failure");
    }

    #[test]
    fn broken_template_is_an_error() {
        let renderer = renderer(&[("X-Broken", "[[ unclosed")]);
        let mut req = request();
        let err = renderer.apply(&mut req).unwrap_err();
        assert!(matches!(err, RenderError::Template { .. }));
    }

    #[test]
    fn one_broken_template_fails_the_batch() {
        let renderer = renderer(&[("X-Good", "[[ method ]]"), ("X-Broken", "[[ |bad ]]")]);
        let mut req = request();
        assert!(renderer.apply(&mut req).is_err());
    }

    #[test]
    fn control_characters_rejected_as_header_value() {
        let renderer = renderer(&[("X-Bad", "line1\nline2")]);
        let mut req = request();
        let err = renderer.apply(&mut req).unwrap_err();
        assert!(matches!(err, RenderError::InvalidValue { .. }));
    }
}
