//! Remote command protocol.
//!
//! The command socket carries whitespace-delimited ASCII tokens, each one of:
//!
//! ```text
//! K_DOWN|<n>      press key with wire index n
//! K_UP|<n>        release key with wire index n
//! L_STICK|<x>|<y> set the left stick's normalized vector
//! R_STICK|<x>|<y> set the right stick's normalized vector
//! ```

use std::str::FromStr;

use thiserror::Error;

use crate::key::GamepadKey;

/// Which logical analog stick a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickSide {
    Left,
    Right,
}

/// A parsed remote command token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Key { key: GamepadKey, pressed: bool },
    Stick { side: StickSide, x: f32, y: f32 },
}

/// Why a command token failed to parse.
///
/// None of these are fatal: the session logs the token and keeps reading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("malformed command token: {0:?}")]
    Malformed(String),

    #[error("key index out of range: {0}")]
    KeyIndexOutOfRange(u32),

    #[error("invalid number in command: {0:?}")]
    InvalidNumber(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = token.split('|').collect();

        match parts.as_slice() {
            [ev @ ("K_DOWN" | "K_UP"), index] => {
                let index: u32 = index
                    .parse()
                    .map_err(|_| CommandError::InvalidNumber(token.to_string()))?;
                let key = GamepadKey::from_index(index)
                    .ok_or(CommandError::KeyIndexOutOfRange(index))?;
                Ok(Self::Key {
                    key,
                    pressed: *ev == "K_DOWN",
                })
            }
            [ev @ ("L_STICK" | "R_STICK"), x, y] => {
                let x: f32 = x
                    .parse()
                    .map_err(|_| CommandError::InvalidNumber(token.to_string()))?;
                let y: f32 = y
                    .parse()
                    .map_err(|_| CommandError::InvalidNumber(token.to_string()))?;
                let side = if *ev == "L_STICK" {
                    StickSide::Left
                } else {
                    StickSide::Right
                };
                Ok(Self::Stick { side, x, y })
            }
            _ => Err(CommandError::Malformed(token.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_parses() {
        let cmd: Command = "K_DOWN|3".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Key {
                key: GamepadKey::A,
                pressed: true,
            }
        );
    }

    #[test]
    fn key_up_parses() {
        let cmd: Command = "K_UP|12".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Key {
                key: GamepadKey::LeftTrigger,
                pressed: false,
            }
        );
    }

    #[test]
    fn stick_parses() {
        let cmd: Command = "L_STICK|0.5|-0.25".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Stick {
                side: StickSide::Left,
                x: 0.5,
                y: -0.25,
            }
        );

        let cmd: Command = "R_STICK|-1|1".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Stick {
                side: StickSide::Right,
                x: -1.0,
                y: 1.0,
            }
        );
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let err = "K_DOWN|999".parse::<Command>().unwrap_err();
        assert_eq!(err, CommandError::KeyIndexOutOfRange(999));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert!("".parse::<Command>().is_err());
        assert!("K_DOWN".parse::<Command>().is_err());
        assert!("K_DOWN|1|2".parse::<Command>().is_err());
        assert!("L_STICK|0.5".parse::<Command>().is_err());
        assert!("JUMP|1".parse::<Command>().is_err());
        assert!("K_DOWN|x".parse::<Command>().is_err());
        assert!("L_STICK|a|b".parse::<Command>().is_err());
    }
}
