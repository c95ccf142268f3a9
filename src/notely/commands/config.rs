use std::path::Path;

use crate::commands::{CmdMessage, CmdResult};
use crate::config::NotelyConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Reads or updates `config.json` in `dir`. Bad keys and values come back as
/// error messages rather than `Err`, and nothing is saved for them. Output
/// never contains the raw token.
pub fn run(dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = NotelyConfig::load(dir)?;
    let mut result = CmdResult::default();

    let message = match action {
        ConfigAction::ShowAll => return Ok(result.with_config(config)),
        ConfigAction::ShowKey(key) => config
            .display_value(&key)
            .map(CmdMessage::info)
            .unwrap_or_else(|| unknown_key(&key)),
        ConfigAction::Set(key, value) => match config.set(&key, &value) {
            Ok(()) => {
                config.save(dir)?;
                let shown = config.display_value(&key).unwrap_or_default();
                result = result.with_config(config);
                CmdMessage::success(format!("{} set to {}", key, shown))
            }
            Err(reason) => CmdMessage::error(reason),
        },
    };

    result.add_message(message);
    Ok(result)
}

fn unknown_key(key: &str) -> CmdMessage {
    CmdMessage::error(format!("Unknown config key: {}", key))
}
