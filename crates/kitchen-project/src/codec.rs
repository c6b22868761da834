// ABOUTME: Wire encoding of projects: format projections, dependency scan, response parsing
// ABOUTME: Pure functions over project fields, shared by the repository and the transports

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ProjectError, Result};
use kitchen_types::{Format, ProjectValues};

/// Prefix some responses carry to defeat JSON hijacking
pub const ANTI_HIJACK_PREFIX: &str = "while(1);";

static REQUIRE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)(?:^|;)\s*goog\s*\.\s*require\s*\(['"]([^'"]+)['"]\)"#)
        .unwrap_or_else(|e| panic!("require pattern must compile: {e}"))
});

/// Namespaces declared with `goog.require(...)` at statement start, sorted
pub fn extract_requires(js: &str) -> Vec<String> {
    let mut requires: Vec<String> = REQUIRE_PATTERN
        .captures_iter(js)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect();
    requires.sort();
    requires
}

#[derive(Serialize)]
struct FullBody<'a> {
    n: Option<&'a str>,
    j: Option<&'a str>,
    h: Option<&'a str>,
}

#[derive(Serialize)]
struct NameBody<'a> {
    n: Option<&'a str>,
}

#[derive(Serialize)]
struct RequiresBody {
    requires: Vec<String>,
}

/// Borrowed view of the fields a serialization needs
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    pub is_new: bool,
    pub name: Option<&'a str>,
    pub js: Option<&'a str>,
    pub html: Option<&'a str>,
}

/// Encode a request body for `format`
pub fn serialize(fields: Fields<'_>, format: Format) -> String {
    let full = || FullBody {
        n: fields.name,
        j: fields.js,
        h: fields.html,
    };

    let encoded = match format {
        Format::All | Format::Publish => serde_json::to_string(&full()),
        Format::Rename if fields.is_new => serde_json::to_string(&full()),
        Format::Rename => serde_json::to_string(&NameBody { n: fields.name }),
        Format::Requires => serde_json::to_string(&RequiresBody {
            requires: extract_requires(fields.js.unwrap_or_default()),
        }),
        Format::Compile => return fields.js.unwrap_or_default().to_string(),
    };

    // Serializing plain string options cannot fail
    encoded.unwrap_or_else(|e| panic!("project body must serialize: {e}"))
}

/// Strip the anti-hijacking prefix, if present
pub fn strip_prefix(raw: &str) -> &str {
    raw.strip_prefix(ANTI_HIJACK_PREFIX).unwrap_or(raw)
}

/// Parse a state-carrying response into project values. JSON that is not an
/// object carries nothing to merge and yields empty values.
pub fn parse_values(raw: &str, format: Format) -> Result<ProjectValues> {
    match parse_value(raw, format)? {
        value @ Value::Object(_) => {
            serde_json::from_value(value).map_err(|e| ProjectError::json(format, e))
        }
        _ => {
            kitchen_logging::debug!(%format, "Response is not a JSON object, nothing to merge");
            Ok(ProjectValues::default())
        }
    }
}

/// Parse any response into a loose JSON value
pub fn parse_value(raw: &str, format: Format) -> Result<Value> {
    serde_json::from_str(strip_prefix(raw)).map_err(|e| ProjectError::json(format, e))
}
