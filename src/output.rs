use serde::Serialize;
use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `HRDESK_QUIET=1` drops decorative headers from human output
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("HRDESK_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }

    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

/// `{"ok": true, "command": .., "data": ..}`
pub fn envelope<T: Serialize>(command: &str, data: &T) -> serde_json::Result<serde_json::Value> {
    Ok(serde_json::json!({
        "ok": true,
        "command": command,
        "data": serde_json::to_value(data)?,
    }))
}

pub fn error_envelope(command: &str, error: &anyhow::Error) -> serde_json::Value {
    let kind = error
        .downcast_ref::<crate::Error>()
        .map(|e| if e.is_recoverable() { "recoverable" } else { "fatal" })
        .unwrap_or("fatal");
    serde_json::json!({
        "ok": false,
        "command": command,
        "error": format!("{:#}", error),
        "kind": kind,
    })
}

pub fn emit_success<T: Serialize>(mode: OutputMode, command: &str, data: &T) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        println!("{}", serde_json::to_string_pretty(&envelope(command, data)?)?);
    }
    Ok(())
}

pub fn emit_error(command: &str, error: &anyhow::Error) {
    let value = error_envelope(command, error);
    match serde_json::to_string_pretty(&value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}
