#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use path_defence_core::LevelBlueprint;

const TRANSFER_DOMAIN: &str = "level";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded blueprint payload.
pub(crate) const TRANSFER_HEADER: &str = "level:v1";
/// Delimiter used to separate the prefix, waypoint count and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a blueprint into a single-line string suitable for clipboard transfer.
pub(crate) fn encode(blueprint: &LevelBlueprint) -> String {
    let json = serde_json::to_vec(blueprint).expect("blueprint serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    format!(
        "{TRANSFER_HEADER}:{}:{encoded}",
        blueprint.path.len()
    )
}

/// Decodes a blueprint from the provided string representation.
pub(crate) fn decode(value: &str) -> Result<LevelBlueprint, LevelTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LevelTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LevelTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LevelTransferError::MissingVersion)?;
    let waypoints = parts.next().ok_or(LevelTransferError::MissingWaypointCount)?;
    let payload = parts.next().ok_or(LevelTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(LevelTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(LevelTransferError::UnsupportedVersion(version.to_owned()));
    }

    let expected_waypoints: usize = waypoints
        .parse()
        .map_err(|_| LevelTransferError::InvalidWaypointCount(waypoints.to_owned()))?;

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LevelTransferError::InvalidEncoding)?;
    let decoded: LevelBlueprint =
        serde_json::from_slice(&bytes).map_err(LevelTransferError::InvalidPayload)?;

    if decoded.path.len() != expected_waypoints {
        return Err(LevelTransferError::WaypointCountMismatch {
            declared: expected_waypoints,
            actual: decoded.path.len(),
        });
    }

    Ok(decoded)
}

/// Errors that can occur while decoding level transfer strings.
#[derive(Debug)]
pub(crate) enum LevelTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded blueprint.
    MissingPrefix,
    /// The encoded blueprint did not contain a version segment.
    MissingVersion,
    /// The encoded blueprint did not include a waypoint count.
    MissingWaypointCount,
    /// The encoded blueprint did not include the payload segment.
    MissingPayload,
    /// The encoded blueprint used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded blueprint used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The waypoint count could not be parsed from the encoded blueprint.
    InvalidWaypointCount(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
    /// The declared waypoint count disagrees with the decoded path.
    WaypointCountMismatch {
        /// Waypoint count declared in the transfer string.
        declared: usize,
        /// Waypoints actually present in the decoded path.
        actual: usize,
    },
}

impl fmt::Display for LevelTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "transfer string is empty"),
            Self::MissingPrefix => write!(f, "transfer string is missing its prefix"),
            Self::MissingVersion => write!(f, "transfer string is missing its version"),
            Self::MissingWaypointCount => {
                write!(f, "transfer string is missing its waypoint count")
            }
            Self::MissingPayload => write!(f, "transfer string is missing its payload"),
            Self::InvalidPrefix(prefix) => {
                write!(f, "unexpected transfer prefix `{prefix}`")
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "unsupported transfer version `{version}`")
            }
            Self::InvalidWaypointCount(count) => {
                write!(f, "invalid waypoint count `{count}`")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "payload is not valid base64: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "payload is not a valid blueprint: {error}")
            }
            Self::WaypointCountMismatch { declared, actual } => {
                write!(
                    f,
                    "declared waypoint count {declared} does not match decoded path of {actual}"
                )
            }
        }
    }
}

impl Error for LevelTransferError {}

#[cfg(test)]
mod tests {
    use super::{decode, encode, LevelTransferError, TRANSFER_HEADER};
    use path_defence_core::{LevelBlueprint, Position};

    fn blueprint() -> LevelBlueprint {
        LevelBlueprint {
            path: vec![Position::new(0.0, 0.0), Position::new(200.0, 150.0)],
            start: Position::new(0.0, 0.0),
            end: Position::new(200.0, 150.0),
            towers: vec![Position::new(100.0, 50.0)],
        }
    }

    #[test]
    fn encoded_blueprints_decode_to_the_same_level() {
        let original = blueprint();
        let encoded = encode(&original);
        assert!(encoded.starts_with(TRANSFER_HEADER));

        let decoded = decode(&encoded).expect("round trip");
        assert_eq!(decoded, original);
    }

    #[test]
    fn decoding_rejects_foreign_prefixes_and_versions() {
        assert!(matches!(
            decode("maze:v1:2:abcd"),
            Err(LevelTransferError::InvalidPrefix(_))
        ));
        assert!(matches!(
            decode("level:v9:2:abcd"),
            Err(LevelTransferError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            decode("   "),
            Err(LevelTransferError::EmptyPayload)
        ));
    }

    #[test]
    fn decoding_rejects_a_mismatched_waypoint_count() {
        let encoded = encode(&blueprint());
        let tampered = encoded.replacen(":2:", ":3:", 1);
        assert!(matches!(
            decode(&tampered),
            Err(LevelTransferError::WaypointCountMismatch {
                declared: 3,
                actual: 2,
            })
        ));
    }

    #[test]
    fn decoding_rejects_malformed_payloads() {
        assert!(matches!(
            decode("level:v1:2:!!!"),
            Err(LevelTransferError::InvalidEncoding(_))
        ));
        assert!(matches!(
            decode("level:v1:x:abcd"),
            Err(LevelTransferError::InvalidWaypointCount(_))
        ));
    }
}
