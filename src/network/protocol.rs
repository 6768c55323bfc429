// Analysis backend wire protocol
// Endpoint paths and decoding of the JSON bodies the backend returns

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::AnalysisResult;
use crate::error::{Error, Result};
use crate::visual::VisualParams;

pub const UPLOAD_PATH: &str = "/upload_song";
pub const VISUALS_PATH: &str = "/get_visuals";
pub const INITIALIZE_PATH: &str = "/initialize";

/// Name of the multipart field carrying the song
pub const FILE_FIELD: &str = "file";

/// Reply of the `/initialize` probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Decodes an `/upload_song` reply.
///
/// A usable reply carries a non-zero numeric `tempo` and a non-empty `mood`.
/// Anything else (a non-JSON body, a missing or zero field) is a format error.
/// Negative tempos are kept; the mapper extrapolates them.
pub fn parse_upload_response(status: u16, body: &str) -> Result<AnalysisResult> {
    let value = parse_body(status, body)?;

    let tempo = value
        .get("tempo")
        .and_then(Value::as_f64)
        .filter(|t| *t != 0.0);
    let mood = value
        .get("mood")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty());

    match (tempo, mood) {
        (Some(tempo), Some(mood)) => Ok(AnalysisResult::new(tempo, mood)),
        (None, None) => Err(Error::Format("missing tempo and mood".to_string())),
        (None, Some(_)) => Err(Error::Format("missing or invalid tempo".to_string())),
        (Some(_), None) => Err(Error::Format("missing or empty mood".to_string())),
    }
}

/// Decodes a `/get_visuals` reply straight into [`VisualParams`]
pub fn parse_visuals_response(status: u16, body: &str) -> Result<VisualParams> {
    let value = parse_body(status, body)?;
    serde_json::from_value(value).map_err(|e| Error::Format(e.to_string()))
}

/// Decodes an `/initialize` reply
pub fn parse_status_response(status: u16, body: &str) -> Result<ServerStatus> {
    let value = parse_body(status, body)?;
    serde_json::from_value(value).map_err(|e| Error::Format(e.to_string()))
}

/// Turns error statuses into [`Error::Server`], using the backend's
/// `{"error": ...}` message when there is one, and parses the rest as JSON.
fn parse_body(status: u16, body: &str) -> Result<Value> {
    let parsed = serde_json::from_str::<Value>(body);

    if !(200..300).contains(&status) {
        let message = parsed
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(Error::Server { status, message });
    }

    parsed.map_err(|e| Error::Format(format!("response is not JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::Rgb;

    #[test]
    fn upload_reply_with_both_fields() {
        let result = parse_upload_response(200, r#"{"tempo": 120.0, "mood": "Calm"}"#).unwrap();
        assert_eq!(result, AnalysisResult::new(120.0, "Calm"));
    }

    #[test]
    fn integer_tempo_is_accepted() {
        let result = parse_upload_response(200, r#"{"tempo": 96, "mood": "Sad"}"#).unwrap();
        assert_eq!(result.tempo, 96.0);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let body = r#"{"tempo": 140, "mood": "Happy", "additional_data": "..."}"#;
        assert!(parse_upload_response(200, body).is_ok());
    }

    #[test]
    fn empty_object_is_a_format_error() {
        let err = parse_upload_response(200, "{}").unwrap_err();
        assert!(matches!(err, Error::Format(ref m) if m == "missing tempo and mood"));
    }

    #[test]
    fn either_field_missing_is_a_format_error() {
        assert!(matches!(
            parse_upload_response(200, r#"{"mood": "Calm"}"#),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            parse_upload_response(200, r#"{"tempo": 120}"#),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn zero_tempo_and_empty_mood_count_as_missing() {
        assert!(matches!(
            parse_upload_response(200, r#"{"tempo": 0, "mood": "Calm"}"#),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            parse_upload_response(200, r#"{"tempo": 120, "mood": ""}"#),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn negative_tempo_is_accepted() {
        let result = parse_upload_response(200, r#"{"tempo": -10, "mood": "Calm"}"#).unwrap();
        assert_eq!(result, AnalysisResult::new(-10.0, "Calm"));

        let params = crate::visual::map_params(&result);
        assert!(params.size <= 0.0);
        assert_eq!(params.color, Rgb::new(0, 255, 127));
    }

    #[test]
    fn wrongly_typed_fields_are_rejected() {
        assert!(matches!(
            parse_upload_response(200, r#"{"tempo": "fast", "mood": "Calm"}"#),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            parse_upload_response(200, r#"{"tempo": 120, "mood": 3}"#),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn non_json_body_is_a_format_error() {
        let err = parse_upload_response(200, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn backend_error_message_is_surfaced() {
        let err = parse_upload_response(400, r#"{"error": "No file part"}"#).unwrap_err();
        match err {
            Error::Server { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "No file part");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_status_without_body_uses_status_code() {
        let err = parse_upload_response(502, "Bad Gateway").unwrap_err();
        assert!(matches!(err, Error::Server { status: 502, ref message } if message == "HTTP 502"));
    }

    #[test]
    fn visuals_reply_is_read_as_params() {
        let params =
            parse_visuals_response(200, r#"{"size": 220.5, "color": [10, 20, 30]}"#).unwrap();
        assert_eq!(params.size, 220.5);
        assert_eq!(params.color, Rgb::new(10, 20, 30));
    }

    #[test]
    fn visuals_reply_without_params_is_a_format_error() {
        let body = r#"{"visualization_type": "waveform", "color": "blue"}"#;
        assert!(matches!(
            parse_visuals_response(200, body),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn status_reply() {
        let status = parse_status_response(
            200,
            r#"{"status": "ready", "message": "Welcome to the Music Visualizer!"}"#,
        )
        .unwrap();
        assert_eq!(status.status, "ready");
    }
}
