//! Direction commands and signal messages

use crate::errors::BenchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Actions the simulated classifier knows about
pub const ACTIONS: &[&str] = &["push", "pull", "left", "right", "lift", "drop", "neutral"];

/// Returns true if `action` is one of [`ACTIONS`]
pub fn is_known_action(action: &str) -> bool {
    ACTIONS.contains(&action)
}

/// A directional command held by the relay
///
/// Serialized as its single uppercase letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "U")]
    Up,
    #[serde(rename = "D")]
    Down,
}

impl Direction {
    /// The full command alphabet, in display order
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Single-letter wire code
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "L",
            Direction::Right => "R",
            Direction::Up => "U",
            Direction::Down => "D",
        }
    }

    /// Parse an already-extracted candidate
    ///
    /// The candidate is uppercased and must then be exactly one letter of
    /// the alphabet. Surrounding whitespace is NOT stripped here; callers
    /// decide whether their input format trims.
    pub fn parse_candidate(candidate: &str) -> Result<Self, BenchError> {
        match candidate.to_uppercase().as_str() {
            "L" => Ok(Direction::Left),
            "R" => Ok(Direction::Right),
            "U" => Ok(Direction::Up),
            "D" => Ok(Direction::Down),
            _ => Err(BenchError::InvalidCommand(candidate.to_string())),
        }
    }
}

impl FromStr for Direction {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_candidate(s)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A simulated classifier output: `action,confidence`
#[derive(Debug, Clone, PartialEq)]
pub struct SignalMessage {
    action: String,
    confidence: f64,
}

impl SignalMessage {
    /// Create a message
    ///
    /// Any action is accepted as long as it is non-empty and contains no
    /// comma; the confidence only has to be finite.
    pub fn new(action: impl Into<String>, confidence: f64) -> Result<Self, BenchError> {
        let action = action.into();
        if action.is_empty() || action.contains(',') {
            return Err(BenchError::InvalidAction(action));
        }
        if !confidence.is_finite() {
            return Err(BenchError::InvalidConfidence(confidence.to_string()));
        }
        Ok(Self { action, confidence })
    }

    /// Create a message whose confidence must lie in `[0.0, 1.0]`
    pub fn bounded(action: impl Into<String>, confidence: f64) -> Result<Self, BenchError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(BenchError::InvalidConfidence(confidence.to_string()));
        }
        Self::new(action, confidence)
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Wire form: confidence with exactly two decimals, no trailing newline
    pub fn encode(&self) -> String {
        format!("{},{:.2}", self.action, self.confidence)
    }
}

impl fmt::Display for SignalMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{:.2}", self.action, self.confidence)
    }
}

impl FromStr for SignalMessage {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (action, confidence) = s
            .split_once(',')
            .ok_or_else(|| BenchError::InvalidAction(s.to_string()))?;
        let confidence: f64 = confidence
            .trim()
            .parse()
            .map_err(|_| BenchError::InvalidConfidence(confidence.to_string()))?;
        Self::new(action.trim(), confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse_is_case_insensitive() {
        assert_eq!(Direction::parse_candidate("l").unwrap(), Direction::Left);
        assert_eq!(Direction::parse_candidate("R").unwrap(), Direction::Right);
        assert_eq!(Direction::parse_candidate("u").unwrap(), Direction::Up);
        assert_eq!(Direction::parse_candidate("D").unwrap(), Direction::Down);
    }

    #[test]
    fn test_direction_rejects_everything_else() {
        for bad in ["", "X", "LR", " L", "left", "1"] {
            assert!(
                Direction::parse_candidate(bad).is_err(),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_direction_serializes_as_letter() {
        let json = serde_json::to_string(&Direction::Up).unwrap();
        assert_eq!(json, "\"U\"");
        let back: Direction = serde_json::from_str("\"D\"").unwrap();
        assert_eq!(back, Direction::Down);
    }

    #[test]
    fn test_signal_encoding_has_two_decimals() {
        assert_eq!(SignalMessage::new("push", 0.85).unwrap().encode(), "push,0.85");
        assert_eq!(SignalMessage::new("neutral", 0.3).unwrap().encode(), "neutral,0.30");
        assert_eq!(SignalMessage::new("lift", 1.0).unwrap().encode(), "lift,1.00");
        assert_eq!(SignalMessage::new("drop", 0.0).unwrap().encode(), "drop,0.00");
    }

    #[test]
    fn test_signal_display_matches_encode() {
        let msg = SignalMessage::new("left", 0.75).unwrap();
        assert_eq!(msg.to_string(), msg.encode());
    }

    #[test]
    fn test_signal_rejects_bad_action() {
        assert!(matches!(
            SignalMessage::new("", 0.5),
            Err(BenchError::InvalidAction(_))
        ));
        assert!(matches!(
            SignalMessage::new("a,b", 0.5),
            Err(BenchError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_signal_bounded_confidence() {
        assert!(SignalMessage::bounded("push", 1.0).is_ok());
        assert!(SignalMessage::bounded("push", 0.0).is_ok());
        assert!(SignalMessage::bounded("push", 1.01).is_err());
        assert!(SignalMessage::bounded("push", -0.1).is_err());
        assert!(SignalMessage::new("push", 1.5).is_ok());
        assert!(SignalMessage::new("push", f64::NAN).is_err());
    }

    #[test]
    fn test_signal_parse() {
        let msg: SignalMessage = "push,0.85".parse().unwrap();
        assert_eq!(msg.action(), "push");
        assert!((msg.confidence() - 0.85).abs() < 1e-9);
        assert!("push".parse::<SignalMessage>().is_err());
        assert!("push,high".parse::<SignalMessage>().is_err());
    }

    #[test]
    fn test_known_actions() {
        assert!(is_known_action("neutral"));
        assert!(is_known_action("lift"));
        assert!(!is_known_action("jump"));
        assert!(!is_known_action("Push"));
    }
}
