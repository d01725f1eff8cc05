//! axum integration: the locale middleware and the strings routes.

use crate::i18n::{
    BoundHelpers, LocaleResolver, LookupOptions, PreferredLocale, RequestLocale, StringTable,
    TranslationStore,
};
use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderValue, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, warn};

static CALLBACK_REGEX: OnceLock<Regex> = OnceLock::new();

/// Key added to development string bundles with the build time in epoch ms.
pub const BUILD_DATE_KEY: &str = "__build__date__";

/// Wrap `app` so every request is resolved to a locale before routing.
///
/// The locale prefix is stripped from the path before `app` routes the
/// request, so `/en-CA/test` reaches the `/test` handler. Handlers read the
/// result as `Extension<RequestLocale>`.
pub fn localize(app: Router, resolver: Arc<LocaleResolver>) -> Router {
    Router::new()
        .fallback_service(app)
        .layer(middleware::from_fn_with_state(resolver, locale_middleware))
}

/// Resolve the request's locale and attach a [`RequestLocale`] extension.
///
/// Reads the session hint from a [`PreferredLocale`] extension, lookup
/// options from a [`LookupOptions`] extension, and helper names bound by
/// earlier middleware from a [`BoundHelpers`] extension.
pub async fn locale_middleware(
    State(resolver): State<Arc<LocaleResolver>>,
    mut request: Request,
    next: Next,
) -> Response {
    let accept_language = request
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let session_hint = request
        .extensions()
        .get::<PreferredLocale>()
        .map(|preferred| preferred.0.clone());

    let overrides = resolver.apply_overrides(
        request.uri().path(),
        accept_language.as_deref(),
        session_hint.as_deref(),
    );

    if overrides.path != request.uri().path() {
        match rewrite_path(request.uri(), &overrides.path) {
            Ok(uri) => *request.uri_mut() = uri,
            Err(e) => warn!("Could not strip locale from [{}]: {}", request.uri(), e),
        }
    }
    if overrides.accept_language != accept_language {
        if let Some(value) = overrides
            .accept_language
            .as_deref()
            .and_then(|lang| HeaderValue::from_str(lang).ok())
        {
            request.headers_mut().insert(header::ACCEPT_LANGUAGE, value);
        }
    }

    let context = resolver.negotiate(overrides.accept_language.as_deref());
    debug!("Resolved {} to locale {}", request.uri(), context.locale);

    let options = request
        .extensions()
        .get::<LookupOptions>()
        .copied()
        .unwrap_or_default();
    let bound = request.extensions().get::<BoundHelpers>();
    let locale = match resolver.bind(context, options, bound) {
        Ok(locale) => locale,
        Err(e) => {
            error!("Locale middleware misconfigured: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    request.extensions_mut().insert(locale);
    next.run(request).await
}

fn rewrite_path(uri: &Uri, path: &str) -> Result<Uri, axum::http::Error> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse()?);
    Ok(Uri::from_parts(parts)?)
}

#[derive(Debug, Default, Deserialize)]
pub struct JsonpQuery {
    pub callback: Option<String>,
}

/// Serialize `body` as JSON, or as a JSONP call when `callback` is valid.
pub fn jsonp(body: Value, callback: Option<&str>) -> Response {
    let regex = CALLBACK_REGEX.get_or_init(|| Regex::new(r"^[\[\]\w$.]+$").unwrap());

    match callback.filter(|cb| regex.is_match(cb)) {
        Some(cb) => (
            [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
            format!("/**/ typeof {cb} === 'function' && {cb}({body});"),
        )
            .into_response(),
        None => Json(body).into_response(),
    }
}

/// Language for a strings request: path param, then the request's locale,
/// then the route default.
fn requested_language(
    lang: Option<Path<String>>,
    locale: Option<Extension<RequestLocale>>,
    default_language: &str,
) -> String {
    lang.map(|Path(lang)| lang)
        .or_else(|| locale.map(|Extension(locale)| locale.context.language))
        .unwrap_or_else(|| default_language.to_string())
}

#[derive(Debug)]
struct StringsRoute {
    store: Arc<TranslationStore>,
    default_language: String,
    options: LookupOptions,
}

/// `GET /strings/:lang?` serving every string of a language as JSON.
///
/// `default_language` defaults to the store's default language.
pub fn strings_router(
    store: Arc<TranslationStore>,
    default_language: Option<&str>,
    options: LookupOptions,
) -> Router {
    let default_language = default_language
        .unwrap_or(store.default_language())
        .to_string();
    let route = Arc::new(StringsRoute {
        store,
        default_language,
        options,
    });

    Router::new()
        .route("/strings", get(strings_handler))
        .route("/strings/:lang", get(strings_handler))
        .with_state(route)
}

async fn strings_handler(
    State(route): State<Arc<StringsRoute>>,
    lang: Option<Path<String>>,
    locale: Option<Extension<RequestLocale>>,
    Query(query): Query<JsonpQuery>,
) -> Response {
    let lang = requested_language(lang, locale, &route.default_language);
    let strings = route.store.get_strings(&lang, route.options);
    jsonp(Value::Object(strings), query.callback.as_deref())
}

#[derive(Debug)]
struct DevStringsRoute {
    default_language: String,
    alternative_paths: Vec<PathBuf>,
}

/// Development variant of [`strings_router`] that rereads files on every
/// request.
///
/// Each alternative path ending in `.json` is read as is; any other path is
/// treated as a directory holding `locale/<lang>.json`. Files are merged in
/// order and the bundle is stamped with [`BUILD_DATE_KEY`].
pub fn dev_strings_router(default_language: &str, alternative_paths: Vec<PathBuf>) -> Router {
    let route = Arc::new(DevStringsRoute {
        default_language: default_language.to_string(),
        alternative_paths,
    });

    Router::new()
        .route("/strings", get(dev_strings_handler))
        .route("/strings/:lang", get(dev_strings_handler))
        .with_state(route)
}

async fn dev_strings_handler(
    State(route): State<Arc<DevStringsRoute>>,
    lang: Option<Path<String>>,
    locale: Option<Extension<RequestLocale>>,
    Query(query): Query<JsonpQuery>,
) -> Response {
    let lang = requested_language(lang, locale, &route.default_language);

    let mut aggregate = StringTable::new();
    for path in &route.alternative_paths {
        let file = if path.extension().is_some_and(|ext| ext == "json") {
            path.clone()
        } else {
            path.join("locale").join(format!("{}.json", lang))
        };

        let data = match tokio::fs::read_to_string(&file).await {
            Ok(data) => data,
            Err(e) => {
                error!("could not read [{}]: {}", file.display(), e);
                continue;
            }
        };
        match serde_json::from_str::<StringTable>(&data) {
            Ok(strings) => aggregate.extend(strings),
            Err(e) => error!("could not parse data from [{}] as JSON: {}", file.display(), e),
        }
    }
    aggregate.insert(BUILD_DATE_KEY.to_string(), json!(Utc::now().timestamp_millis()));

    jsonp(Value::Object(aggregate), query.callback.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_path_keeps_query() {
        let uri: Uri = "/en-CA/test?x=1".parse().unwrap();
        let rewritten = rewrite_path(&uri, "/test").unwrap();
        assert_eq!(rewritten.path(), "/test");
        assert_eq!(rewritten.query(), Some("x=1"));
    }

    #[test]
    fn test_rewrite_path_without_query() {
        let uri: Uri = "/en-CA".parse().unwrap();
        assert_eq!(rewrite_path(&uri, "/").unwrap(), "/");
    }

    #[test]
    fn test_jsonp_rejects_invalid_callback() {
        let response = jsonp(json!({}), Some("alert(1)"));
        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert_eq!(content_type, "application/json");
    }

    #[test]
    fn test_jsonp_valid_callback() {
        let response = jsonp(json!({}), Some("window.cb"));
        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert_eq!(content_type, "text/javascript; charset=utf-8");
    }

    #[test]
    fn test_requested_language_precedence() {
        assert_eq!(
            requested_language(Some(Path("th".to_string())), None, "en-US"),
            "th"
        );
        assert_eq!(requested_language(None, None, "en-US"), "en-US");
    }
}
