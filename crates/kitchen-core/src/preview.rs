// ABOUTME: Preview document composition and the console bridge between the preview frame and the app
// ABOUTME: Parses compile reports into console lines and splices compiled code into the user's HTML

use kitchen_logging::Level;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use serde::Deserialize;
use serde_json::Value;

/// Script run ahead of the user's code inside the preview frame.
///
/// Forwards console output and uncaught exceptions to the host page as
/// JSON messages understood by [`BridgeMessage::parse`].
pub const BRIDGE_SCRIPT: &str = r#"(function() {
  var post = function(message) {
    try { window.parent.postMessage(JSON.stringify(message), '*'); } catch (e) {}
  };
  var levels = { log: 'INFO', info: 'INFO', debug: 'FINE', warn: 'WARNING', error: 'SEVERE' };
  Object.keys(levels).forEach(function(name) {
    var original = window.console && window.console[name];
    window.console = window.console || {};
    window.console[name] = function() {
      var msg = Array.prototype.slice.call(arguments).join(' ');
      post({ type: 'log', level: levels[name], msg: msg, loggerName: 'preview' });
      if (original) { original.apply(window.console, arguments); }
    };
  });
  window.onerror = function(message, source, line) {
    post({ type: 'exception', line: line || 0, message: String(message) });
    return false;
  };
})();
"#;

const LOGGER_WARNING: &str = "warning";
const LOGGER_ERROR: &str = "error";
const LOGGER_EXCEPTION: &str = "uncaught exception";

static SCRIPT_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\{\{\s*script\s*\}\}")
        .unwrap_or_else(|e| panic!("script token pattern must compile: {e}"))
});

static SCRIPT_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</(script)")
        .unwrap_or_else(|e| panic!("script end pattern must compile: {e}"))
});

/// A line destined for the console pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub level: Level,
    pub message: String,
    pub logger: String,
}

impl ConsoleLine {
    fn new(level: Level, message: String, logger: &str) -> Self {
        Self {
            level,
            message,
            logger: logger.to_string(),
        }
    }
}

/// Keep compiled code from closing the surrounding `<script>` element
pub fn escape_script_end(code: &str) -> String {
    SCRIPT_END.replace_all(code, r"<\/$1").into_owned()
}

/// Build the document shown in the preview frame.
///
/// The bridge script and the compiled code replace the first `{{ script }}`
/// token of `html`; HTML without the token is shown unchanged.
pub fn compose_document(compiled: &str, html: &str) -> String {
    let script = escape_script_end(&format!("{BRIDGE_SCRIPT}{compiled}"));
    SCRIPT_TOKEN
        .replacen(html, 1, NoExpand(&script))
        .into_owned()
}

/// Compiler diagnostics and output for one preview request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    pub code: String,
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u64,
    pub message: String,
}

impl Diagnostic {
    fn from_record(record: &Value, message_field: &str) -> Self {
        match record {
            Value::String(message) => Self {
                line: 0,
                message: message.clone(),
            },
            _ => Self {
                line: record.get("lineno").and_then(Value::as_u64).unwrap_or(0),
                message: record
                    .get(message_field)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
        }
    }

    pub fn to_line(&self) -> String {
        format!("line {} : {}", self.line, self.message)
    }
}

fn diagnostics(body: &Value, field: &str, message_field: &str) -> Vec<Diagnostic> {
    body.get(field)
        .and_then(Value::as_array)
        .map(|records| {
            records
                .iter()
                .map(|record| Diagnostic::from_record(record, message_field))
                .collect()
        })
        .unwrap_or_default()
}

impl CompileReport {
    /// Read a `/compile` answer: `{compiledCode, errors, warnings}`
    pub fn from_compile(body: &Value) -> Self {
        Self {
            code: body
                .get("compiledCode")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            warnings: diagnostics(body, "warnings", "warning"),
            errors: diagnostics(body, "errors", "error"),
        }
    }

    /// Read a `/js` answer and run the bundle ahead of the raw source
    pub fn from_requires(body: &Value, source: &str) -> Self {
        let bundle = body
            .get("code")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Self {
            code: format!("{bundle}\n{source}"),
            warnings: Vec::new(),
            errors: diagnostics(body, "errors", "error"),
        }
    }

    /// Console lines for every diagnostic, warnings first
    pub fn console_lines(&self) -> Vec<ConsoleLine> {
        let warnings = self
            .warnings
            .iter()
            .map(|d| ConsoleLine::new(Level::WARN, d.to_line(), LOGGER_WARNING));
        let errors = self
            .errors
            .iter()
            .map(|d| ConsoleLine::new(Level::ERROR, d.to_line(), LOGGER_ERROR));
        warnings.chain(errors).collect()
    }
}

/// Message posted by [`BRIDGE_SCRIPT`] from inside the preview frame
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BridgeMessage {
    Log {
        #[serde(default)]
        level: String,
        #[serde(default)]
        msg: String,
        #[serde(rename = "loggerName", default)]
        logger_name: String,
    },
    Exception {
        #[serde(default)]
        line: u64,
        #[serde(default)]
        message: String,
    },
}

impl BridgeMessage {
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn into_console_line(self) -> ConsoleLine {
        match self {
            BridgeMessage::Log {
                level,
                msg,
                logger_name,
            } => ConsoleLine::new(bridge_level(&level), msg, &logger_name),
            BridgeMessage::Exception { line, message } => ConsoleLine::new(
                Level::ERROR,
                format!("line {line} : {message}"),
                LOGGER_EXCEPTION,
            ),
        }
    }
}

/// Map the frame's logger level names onto tracing levels
fn bridge_level(name: &str) -> Level {
    match name.to_ascii_uppercase().as_str() {
        "SHOUT" | "SEVERE" | "ERROR" => Level::ERROR,
        "WARNING" | "WARN" => Level::WARN,
        "FINE" | "FINER" | "DEBUG" => Level::DEBUG,
        "FINEST" | "TRACE" => Level::TRACE,
        _ => Level::INFO,
    }
}
