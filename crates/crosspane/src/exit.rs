use std::fmt;

use crosspane_codec::CodecError;
use crosspane_peer::PeerError;
use crosspane_schema::SchemaError;
use crosspane_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: std::io::Error) -> CliError {
    let code = match err.kind() {
        std::io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        std::io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Refused { .. } => {
            CliError::new(PERMISSION_DENIED, format!("{context}: {err}"))
        }
        TransportError::Disconnected => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

pub fn codec_error(context: &str, err: CodecError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn peer_error(context: &str, err: PeerError) -> CliError {
    match err {
        PeerError::Transport(err) => transport_error(context, err),
        PeerError::Codec(err) => codec_error(context, err),
        PeerError::Schema(err) => schema_error(context, err),
        PeerError::MalformedAppend(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refused_post_maps_to_permission_denied() {
        let err = transport_error(
            "post failed",
            TransportError::Refused {
                target_origin: "https://a".to_string(),
                destination: "https://b".to_string(),
            },
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }

    #[test]
    fn codec_errors_map_to_data_invalid() {
        let parse = crosspane_codec::decode_message("{broken").unwrap_err();
        assert_eq!(codec_error("decode failed", parse).code, DATA_INVALID);
    }

    #[test]
    fn peer_internal_states_map_to_internal() {
        assert_eq!(peer_error("pump failed", PeerError::NotBound).code, INTERNAL);
        assert_eq!(
            peer_error("bind failed", PeerError::AlreadyBound).code,
            INTERNAL
        );
    }
}
