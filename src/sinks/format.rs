use std::fmt::Write as _;

use crate::error::{AppError, AppResult, SinkError};

pub(super) fn write_line(output: &mut String, line: &str) -> AppResult<()> {
    writeln!(output, "{}", line).map_err(|err| AppError::sink(SinkError::WriteLine { source: err }))
}

pub(super) fn format_ms(value: f64) -> String {
    format!("{:.2}ms", value)
}

pub(super) fn to_json<T>(value: &T, pretty: bool) -> AppResult<String>
where
    T: serde::Serialize + ?Sized,
{
    let encoded = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    encoded.map_err(|err| AppError::sink(SinkError::SerializeReport { source: err }))
}
