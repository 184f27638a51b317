//! Textual command decoding.

use crate::config::units::Degrees;
use crate::error::CommandError;

use super::Command;

/// Token on the control topic that starts a homing run.
pub const CALIBRATE_TOKEN: &str = "calibrate";

/// Read the first integer in `text`.
///
/// Characters before the first digit or `-` are skipped. An optional `-` and
/// the following digit run are read; everything after is ignored. Values too
/// large for `i32` saturate.
///
/// # Errors
///
/// [`CommandError::Malformed`] if no digit follows the skipped prefix.
pub fn parse_degrees(text: &str) -> Result<Degrees, CommandError> {
    let bytes = text.as_bytes();
    let start = bytes
        .iter()
        .position(|b| *b == b'-' || b.is_ascii_digit())
        .ok_or(CommandError::Malformed)?;

    let (negative, digits) = match bytes[start] {
        b'-' => (true, &bytes[start + 1..]),
        _ => (false, &bytes[start..]),
    };

    let mut value: i32 = 0;
    let mut seen = false;
    for b in digits.iter().take_while(|b| b.is_ascii_digit()) {
        seen = true;
        value = value.saturating_mul(10).saturating_add(i32::from(b - b'0'));
    }

    if !seen {
        return Err(CommandError::Malformed);
    }

    Ok(Degrees(if negative { -value } else { value }))
}

/// Decode a position request into `Move` or `Reject`.
pub fn decode_position(text: &str) -> Command {
    match parse_degrees(text) {
        Ok(degrees) if degrees.is_commandable() => Command::Move(degrees),
        Ok(degrees) => Command::Reject(CommandError::OutOfRange {
            degrees: degrees.value(),
        }),
        Err(e) => Command::Reject(e),
    }
}

/// Decode a control-topic payload. Anything but the calibrate token is ignored.
pub fn decode_control(payload: &str) -> Option<Command> {
    (payload.trim() == CALIBRATE_TOKEN).then_some(Command::Calibrate {
        return_to_last: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_plain_integers() {
        assert_eq!(parse_degrees("45"), Ok(Degrees(45)));
        assert_eq!(parse_degrees("-85"), Ok(Degrees(-85)));
        assert_eq!(parse_degrees("0"), Ok(Degrees(0)));
    }

    #[test]
    fn test_parse_skips_prefix_and_ignores_suffix() {
        assert_eq!(parse_degrees("  12\r"), Ok(Degrees(12)));
        assert_eq!(parse_degrees("deg=-30;"), Ok(Degrees(-30)));
        assert_eq!(parse_degrees("7.9"), Ok(Degrees(7)));
        assert_eq!(parse_degrees("+20"), Ok(Degrees(20)));
    }

    #[test]
    fn test_parse_without_digits_is_malformed() {
        assert_eq!(parse_degrees(""), Err(CommandError::Malformed));
        assert_eq!(parse_degrees("abc"), Err(CommandError::Malformed));
        assert_eq!(parse_degrees("-"), Err(CommandError::Malformed));
        assert_eq!(parse_degrees("--5"), Err(CommandError::Malformed));
    }

    #[test]
    fn test_parse_saturates() {
        assert_eq!(parse_degrees("99999999999"), Ok(Degrees(i32::MAX)));
    }

    #[test]
    fn test_decode_position_range() {
        assert_eq!(decode_position("85"), Command::Move(Degrees(85)));
        assert_eq!(decode_position("-85"), Command::Move(Degrees(-85)));
        assert_eq!(
            decode_position("86"),
            Command::Reject(CommandError::OutOfRange { degrees: 86 })
        );
        assert_eq!(
            decode_position("-90"),
            Command::Reject(CommandError::OutOfRange { degrees: -90 })
        );
        assert_eq!(
            decode_position("north"),
            Command::Reject(CommandError::Malformed)
        );
    }

    #[test]
    fn test_decode_control() {
        let calibrate = Some(Command::Calibrate {
            return_to_last: true,
        });
        assert_eq!(decode_control("calibrate"), calibrate);
        assert_eq!(decode_control(" calibrate\n"), calibrate);
        assert_eq!(decode_control("Calibrate"), None);
        assert_eq!(decode_control("calibrate now"), None);
        assert_eq!(decode_control(""), None);
    }

    proptest! {
        #[test]
        fn prop_parse_reads_any_i32(value in any::<i32>().prop_filter("MIN has no positive", |v| *v != i32::MIN)) {
            prop_assert_eq!(parse_degrees(&value.to_string()), Ok(Degrees(value)));
        }

        #[test]
        fn prop_decode_matches_range(value in -200i32..=200) {
            let command = decode_position(&value.to_string());
            if (-85..=85).contains(&value) {
                prop_assert_eq!(command, Command::Move(Degrees(value)));
            } else {
                prop_assert_eq!(command, Command::Reject(CommandError::OutOfRange { degrees: value }));
            }
        }
    }
}
