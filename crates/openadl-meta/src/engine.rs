//! Engine instantiation
//!
//! Each game type is backed by a factory registered by the host. Creating an
//! instance looks the detected game's type up in the registry instead of
//! switching over the known types.

use std::collections::HashMap;

use openadl_common::{GameConfig, GameType};
use openadl_savefile::SaveSlots;

use crate::detection::GameDescription;
use crate::{EngineError, Result};

/// A running game
pub trait Engine {
    fn target(&self) -> &str;
    fn game_type(&self) -> GameType;
    fn run(&mut self) -> Result<()>;
}

/// Everything an engine gets from the host at construction
#[derive(Clone)]
pub struct EngineContext {
    pub config: GameConfig,
    pub saves: SaveSlots,
}

impl EngineContext {
    pub fn new(config: GameConfig, saves: SaveSlots) -> Self {
        Self { config, saves }
    }

    pub fn target(&self) -> &str {
        &self.config.target
    }
}

pub type EngineFactory =
    Box<dyn Fn(EngineContext, &'static GameDescription) -> Result<Box<dyn Engine>> + Send + Sync>;

/// Game type to engine constructor
#[derive(Default)]
pub struct EngineRegistry {
    factories: HashMap<GameType, EngineFactory>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the constructor for a game type, replacing any previous one
    pub fn register<F>(&mut self, game_type: GameType, factory: F)
    where
        F: Fn(EngineContext, &'static GameDescription) -> Result<Box<dyn Engine>>
            + Send
            + Sync
            + 'static,
    {
        if self.factories.insert(game_type, Box::new(factory)).is_some() {
            tracing::debug!("Replaced engine factory for {:?}", game_type);
        }
    }

    pub fn is_registered(&self, game_type: GameType) -> bool {
        self.factories.contains_key(&game_type)
    }

    /// Build the engine for a detected game
    pub fn create_instance(
        &self,
        ctx: EngineContext,
        desc: Option<&'static GameDescription>,
    ) -> Result<Box<dyn Engine>> {
        let desc = desc.ok_or(EngineError::NoGameDescription)?;
        // No engine exists for an undetected game, whatever is registered
        if desc.game_type == GameType::None {
            return Err(EngineError::UnknownGameType(GameType::None));
        }
        let factory = self
            .factories
            .get(&desc.game_type)
            .ok_or(EngineError::UnknownGameType(desc.game_type))?;

        tracing::info!(
            "Creating {:?} engine for '{}'",
            desc.game_type,
            ctx.target()
        );
        factory(ctx, desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{Language, Platform, GAME_DESCRIPTIONS};
    use openadl_common::GameId;
    use openadl_savefile::MemorySaveFileManager;
    use std::sync::Arc;

    struct StubEngine {
        target: String,
        game_type: GameType,
    }

    impl Engine for StubEngine {
        fn target(&self) -> &str {
            &self.target
        }

        fn game_type(&self) -> GameType {
            self.game_type
        }

        fn run(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn ctx() -> EngineContext {
        EngineContext::new(
            GameConfig::new("hires1-test", GameId::Hires1),
            SaveSlots::new(Arc::new(MemorySaveFileManager::new())),
        )
    }

    #[test]
    fn creates_registered_engine() {
        let mut registry = EngineRegistry::new();
        registry.register(GameType::Hires1, |ctx, desc| {
            Ok(Box::new(StubEngine {
                target: ctx.target().to_string(),
                game_type: desc.game_type,
            }))
        });

        let mut engine = registry
            .create_instance(ctx(), Some(&GAME_DESCRIPTIONS[0]))
            .unwrap();
        assert_eq!(engine.target(), "hires1-test");
        assert_eq!(engine.game_type(), GameType::Hires1);
        engine.run().unwrap();
    }

    #[test]
    fn unregistered_type_is_an_error() {
        let registry = EngineRegistry::new();
        let err = registry
            .create_instance(ctx(), Some(&GAME_DESCRIPTIONS[0]))
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::UnknownGameType(GameType::Hires1)));
    }

    #[test]
    fn missing_description_is_an_error() {
        let registry = EngineRegistry::new();
        let err = registry.create_instance(ctx(), None).err().unwrap();
        assert!(matches!(err, EngineError::NoGameDescription));
    }

    #[test]
    fn none_type_is_rejected_even_when_registered() {
        static UNTYPED: GameDescription = GameDescription {
            game_id: GameId::Hires1,
            extra: "",
            files: &[],
            language: Language::English,
            platform: Platform::Apple2GS,
            gui_options: &[],
            game_type: GameType::None,
        };

        let mut registry = EngineRegistry::new();
        registry.register(GameType::None, |ctx, desc| {
            Ok(Box::new(StubEngine {
                target: ctx.target().to_string(),
                game_type: desc.game_type,
            }))
        });
        assert!(registry.is_registered(GameType::None));

        let err = registry.create_instance(ctx(), Some(&UNTYPED)).err().unwrap();
        assert!(matches!(err, EngineError::UnknownGameType(GameType::None)));
    }
}
