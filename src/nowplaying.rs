//! Client for the shell.fm network interface.
//!
//! One request per poll: connect, send the info command, read until the peer
//! closes, split on `||`. The connection never outlives a single call, so a
//! failed poll cannot leak a stale socket.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::{Error, Result};

/// Request line understood by shell.fm: artist, title, remaining seconds.
pub const REQUEST: &str = "info %a||%t||%R\n";

const FIELD_DELIMITER: &str = "||";

/// One now-playing reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub artist: String,
    pub title: String,
    pub remaining_seconds: i64,
}

impl TrackInfo {
    /// Placeholder shown whenever the query fails.
    pub fn fallback() -> Self {
        Self {
            artist: String::new(),
            title: "shell.fm stopped.".to_string(),
            remaining_seconds: 0,
        }
    }
}

/// Query the now-playing service once.
pub fn fetch(host: &str, port: u16, timeout: Duration) -> Result<TrackInfo> {
    let addr = (host, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| Error::InvalidArgs(format!("cannot resolve {host}:{port}")))?;
    let mut stream = TcpStream::connect_timeout(&addr, timeout)?;
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    stream.write_all(REQUEST.as_bytes())?;
    let mut response = String::new();
    stream.read_to_string(&mut response)?;
    parse_response(&response)
}

/// Split an `artist||title||remaining` response into its fields. shell.fm
/// reports remaining seconds as a decimal number; fractions are dropped.
pub fn parse_response(raw: &str) -> Result<TrackInfo> {
    let trimmed = raw.trim_end_matches(['\r', '\n']);
    let mut fields = trimmed.split(FIELD_DELIMITER);
    let (Some(artist), Some(title), Some(remaining), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(Error::Parse(format!(
            "expected 3 '||'-separated fields, got '{trimmed}'"
        )));
    };
    let remaining_seconds = remaining
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::Parse(format!("remaining seconds not numeric: '{remaining}'")))?
        as i64;

    Ok(TrackInfo {
        artist: artist.to_string(),
        title: title.to_string(),
        remaining_seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn parses_three_fields() {
        let track = parse_response("The Beatles||Help!||125\n").unwrap();
        assert_eq!(track.artist, "The Beatles");
        assert_eq!(track.title, "Help!");
        assert_eq!(track.remaining_seconds, 125);
    }

    #[test]
    fn parses_fractional_remaining() {
        let track = parse_response("A||B||90.7").unwrap();
        assert_eq!(track.remaining_seconds, 90);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(parse_response("no delimiters here").is_err());
        assert!(parse_response("a||b").is_err());
        assert!(parse_response("a||b||c||d").is_err());
    }

    #[test]
    fn rejects_non_numeric_remaining() {
        let err = parse_response("a||b||soon").unwrap_err();
        assert!(format!("{err}").contains("not numeric"));
    }

    #[test]
    fn fallback_matches_stopped_player() {
        let track = TrackInfo::fallback();
        assert_eq!(track.artist, "");
        assert_eq!(track.title, "shell.fm stopped.");
        assert_eq!(track.remaining_seconds, 0);
    }

    #[test]
    fn fetch_round_trips_over_local_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut byte = [0u8; 1];
            loop {
                let n = stream.read(&mut byte).unwrap();
                if n == 0 || byte[0] == b'\n' {
                    break;
                }
                request.push(byte[0]);
            }
            assert_eq!(request, b"info %a||%t||%R");
            stream.write_all(b"The Beatles||Help!||125").unwrap();
            // dropping the stream closes the connection, signalling EOF
        });

        let track = fetch("127.0.0.1", port, Duration::from_secs(2)).unwrap();
        assert_eq!(track.artist, "The Beatles");
        assert_eq!(track.title, "Help!");
        assert_eq!(track.remaining_seconds, 125);
        server.join().unwrap();
    }
}
