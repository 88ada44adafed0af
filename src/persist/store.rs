//! Loading and saving games, and the session that owns a save file.
//!
//! ## Session
//!
//! A [`Session`] ties one game to one path for its whole life: it loads (or
//! creates) the game when opened and writes it back when dropped. An
//! abandoned game is never written, which leaves the previous file as the
//! authoritative state. No locking is done; one session per file at a time.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{error, info, warn};

use super::document::Document;
use super::migrate::upgrade;
use crate::cards::Card;
use crate::commands::Outcome;
use crate::core::config::GameConfig;
use crate::core::error::{EngineResult, ErrorCode, PersistError};
use crate::core::state::Game;

/// Decode a document from JSON text, upgrading older schemas.
pub fn from_json(text: &str) -> Result<Game, PersistError> {
    let mut raw: Value = serde_json::from_str(text)?;
    let found = upgrade(&mut raw)?;
    let doc: Document = serde_json::from_value(raw)?;
    info!(
        game = found.game,
        card = found.card,
        power = found.power,
        "Decoded game document"
    );
    doc.into_game()
}

/// Encode a game as JSON text in the current schema.
pub fn to_json(game: &Game) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(&Document::from_game(game))?)
}

/// Load a game from a file.
pub fn load(path: &Path) -> Result<Game, PersistError> {
    let text = fs::read_to_string(path)?;
    let game = from_json(&text)?;
    info!(path = %path.display(), powers = game.power_count(), "Loaded game");
    Ok(game)
}

/// Overwrite a file with the game.
///
/// Returns `false` without touching the file if the game is abandoned.
pub fn save(game: &Game, path: &Path) -> Result<bool, PersistError> {
    if game.is_abandoned() {
        warn!(path = %path.display(), "Game abandoned, not saving");
        return Ok(false);
    }
    fs::write(path, to_json(game)?)?;
    info!(path = %path.display(), "Saved game");
    Ok(true)
}

/// A game bound to its save file.
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    game: Game,
}

impl Session {
    /// Bind an existing game to a path.
    pub fn new(path: impl Into<PathBuf>, game: Game) -> Self {
        Self {
            path: path.into(),
            game,
        }
    }

    /// Load the game at `path`, or start an empty one if the file does not
    /// exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let path = path.into();
        let game = if path.exists() {
            load(&path)?
        } else {
            info!(path = %path.display(), "No save file, starting empty game");
            Game::new(GameConfig::default())
        };
        Ok(Self { path, game })
    }

    /// Build a fresh game for `path`. Nothing is written until the session
    /// saves or drops.
    pub fn create(
        path: impl Into<PathBuf>,
        config: GameConfig,
        cards: Vec<Card>,
        powers: Vec<String>,
    ) -> EngineResult<Self> {
        let game = Game::create(config, cards, powers)?;
        Ok(Self::new(path, game))
    }

    /// Save file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The game.
    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The game, mutably.
    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// Write the game now. Returns `false` if the game is abandoned.
    pub fn save(&self) -> Result<bool, PersistError> {
        save(&self.game, &self.path)
    }

    /// Mark the game so it is never saved.
    pub fn abandon(&mut self) {
        self.game.abandon();
    }

    /// React to a command's control code: save on `SaveRequested`, abandon
    /// on any abortable code. Returns true if the shell should stop.
    pub fn handle(&mut self, outcome: &Outcome) -> Result<bool, PersistError> {
        match outcome.code {
            ErrorCode::SaveRequested => {
                self.save()?;
                Ok(false)
            }
            ErrorCode::QuitRequested => Ok(true),
            code if code.is_abortable() => {
                self.abandon();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(err) = save(&self.game, &self.path) {
            error!(path = %self.path.display(), error = %err, "Failed to save game on exit");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardType;
    use crate::core::player::PowerId;
    use crate::core::rng::GameRng;

    fn game() -> Game {
        Game::create_with_rng(
            GameConfig::default(),
            vec![
                Card::new("Ochre", 1, 2, CardType::Normal),
                Card::new("Salt", 2, 3, CardType::Normal),
            ],
            vec!["Egypt".into(), "Crete".into()],
            GameRng::new(6),
        )
        .unwrap()
    }

    #[test]
    fn test_json_round_trip() {
        let mut game = game();
        game.pick(2, PowerId::new(1));
        game.vars.set("name", "Test");

        let text = to_json(&game).unwrap();
        let back = from_json(&text).unwrap();

        assert_eq!(back.power(PowerId::new(1)).hand, game.power(PowerId::new(1)).hand);
        assert_eq!(back.deck(2), game.deck(2));
        assert_eq!(back.vars.get("NAME"), Some("Test"));
        assert!(!back.is_abandoned());
    }

    #[test]
    fn test_abandoned_game_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");

        let mut game = game();
        game.abandon();
        assert!(!save(&game, &path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_session_saves_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");

        {
            let mut session = Session::new(&path, game());
            session.game_mut().vars.set("name", "Dropped");
        }

        let session = Session::open(&path).unwrap();
        assert_eq!(session.game().vars.get("name"), Some("Dropped"));
        assert_eq!(session.game().power_count(), 2);
    }

    #[test]
    fn test_handle_control_codes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        let mut session = Session::new(&path, game());

        assert!(!session.handle(&crate::commands::save()).unwrap());
        assert!(path.exists());
        assert!(session.handle(&crate::commands::quit()).unwrap());

        let abort = Outcome::signal(ErrorCode::AbortRequested);
        assert!(session.handle(&abort).unwrap());
        assert!(session.game().is_abandoned());
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.json");

        let mut session = Session::open(&path).unwrap();
        assert_eq!(session.game().power_count(), 0);
        session.abandon();
        drop(session);
        assert!(!path.exists());
    }
}
