use super::{MalformedResponse, RawVariableSet};
use crate::status::{PlayState, Playback, StatusRecord};
use crate::variant_db::Quirks;

/// Turn scraped variables into a status record.
///
/// An empty page or a duration of `"0"` means nothing is loaded (or the
/// player has just started and not populated the page yet).
pub fn normalize(vars: &RawVariableSet, quirks: &Quirks) -> Result<StatusRecord, MalformedResponse> {
    if vars.is_empty() || vars.get("duration") == Some("0") {
        return Ok(StatusRecord::Empty);
    }

    let mut state = PlayState(parse_int(vars, "state")?);
    let position = millis_to_secs(parse_int(vars, "position")?);
    let duration = millis_to_secs(parse_int(vars, "duration")?);

    // Compared on the player's own formatting: that is what it emits at EOF.
    if quirks.stop_at_end && vars.require("positionstring")? == vars.require("durationstring")? {
        state = PlayState::STOPPED;
    }

    let file_path = vars.require("filepath")?.to_string();

    Ok(StatusRecord::Loaded(Playback {
        state,
        position,
        duration,
        file_path,
    }))
}

fn parse_int(vars: &RawVariableSet, key: &str) -> Result<i64, MalformedResponse> {
    let raw = vars.require(key)?;
    raw.trim()
        .parse()
        .map_err(|_| MalformedResponse::invalid(key, raw))
}

fn millis_to_secs(ms: i64) -> f64 {
    ms as f64 / 1000.0
}
