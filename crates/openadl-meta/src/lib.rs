//! Meta engine for ADL games
//!
//! This module handles:
//! - Game detection from host-provided file fingerprints
//! - Save slot listing, metadata queries and removal for a target
//! - Creating the engine for a detected game
//! - The descriptor through which the host discovers the plugin

pub mod detection;
pub mod engine;

pub use detection::{detect, FileFingerprint, GameDescription, GAME_DESCRIPTIONS};
pub use engine::{Engine, EngineContext, EngineFactory, EngineRegistry};

use openadl_common::{GameId, GameType, GuiOption, MetaEngineFeature};
use openadl_savefile::{SaveSlots, SaveStateDescriptor};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No game description given")]
    NoGameDescription,

    #[error("Unknown game type: {0:?}")]
    UnknownGameType(GameType),

    #[error("Engine failed: {0}")]
    Failed(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Detection and save management surface of the ADL engine
pub struct AdlMetaEngine {
    saves: SaveSlots,
    registry: EngineRegistry,
}

impl AdlMetaEngine {
    pub fn new(saves: SaveSlots) -> Self {
        Self {
            saves,
            registry: EngineRegistry::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        "ADL"
    }

    pub fn original_copyright(&self) -> &'static str {
        "Copyright (C) Sierra On-Line"
    }

    pub fn has_feature(&self, feature: MetaEngineFeature) -> bool {
        matches!(
            feature,
            MetaEngineFeature::SupportsListSaves
                | MetaEngineFeature::SupportsLoadingDuringStartup
                | MetaEngineFeature::SupportsDeleteSave
                | MetaEngineFeature::SavesSupportMetaInfo
                | MetaEngineFeature::SavesSupportThumbnail
                | MetaEngineFeature::SavesSupportCreationDate
                | MetaEngineFeature::SavesSupportPlayTime
        )
    }

    /// Games this engine can run, as (id, display name)
    pub fn supported_games(&self) -> Vec<(&'static str, &'static str)> {
        GameId::all()
            .into_iter()
            .map(|g| (g.id(), g.display_name()))
            .collect()
    }

    pub fn game_descriptions(&self) -> &'static [GameDescription] {
        GAME_DESCRIPTIONS
    }

    /// Options shown in the game's settings in addition to the host's
    pub fn extra_gui_options(&self) -> Vec<GuiOption> {
        GuiOption::all()
    }

    pub fn detect(&self, files: &[FileFingerprint]) -> Vec<&'static GameDescription> {
        detect(files)
    }

    pub fn query_save_meta_infos(&self, target: &str, slot: i32) -> Option<SaveStateDescriptor> {
        self.saves.query_one(target, slot)
    }

    pub fn list_saves(&self, target: &str) -> Vec<SaveStateDescriptor> {
        self.saves.list_all(target)
    }

    /// Returns whether a save file was deleted
    pub fn remove_save_state(&self, target: &str, slot: i32) -> bool {
        self.saves.remove(target, slot)
    }

    pub fn maximum_save_slot(&self) -> i32 {
        self.saves.maximum_slot()
    }

    pub fn registry_mut(&mut self) -> &mut EngineRegistry {
        &mut self.registry
    }

    pub fn create_instance(
        &self,
        ctx: EngineContext,
        desc: Option<&'static GameDescription>,
    ) -> Result<Box<dyn Engine>> {
        self.registry.create_instance(ctx, desc)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginType {
    Engine,
}

/// What the host needs to discover and bind the plugin
#[derive(Debug, Clone, Copy)]
pub struct PluginDescriptor {
    pub id: &'static str,
    pub plugin_type: PluginType,
    pub create: fn(SaveSlots) -> AdlMetaEngine,
}

pub static PLUGIN: PluginDescriptor = PluginDescriptor {
    id: "ADL",
    plugin_type: PluginType::Engine,
    create: AdlMetaEngine::new,
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use openadl_savefile::{MemorySaveFileManager, SaveHeader};
    use std::sync::Arc;

    fn meta() -> AdlMetaEngine {
        (PLUGIN.create)(SaveSlots::new(Arc::new(MemorySaveFileManager::new())))
    }

    #[test]
    fn names() {
        let meta = meta();
        assert_eq!(meta.name(), "ADL");
        assert_eq!(meta.original_copyright(), "Copyright (C) Sierra On-Line");
        assert_eq!(PLUGIN.id, meta.name());
        assert_eq!(
            meta.supported_games(),
            vec![("hires1", "Hi-Res Adventure #1: Mystery House")]
        );
    }

    #[test]
    fn feature_flags() {
        let meta = meta();
        let supported: Vec<MetaEngineFeature> = MetaEngineFeature::all()
            .into_iter()
            .filter(|&f| meta.has_feature(f))
            .collect();
        assert_eq!(supported.len(), 7);
        assert!(meta.has_feature(MetaEngineFeature::SavesSupportThumbnail));
        assert!(!meta.has_feature(MetaEngineFeature::SimpleSavesNames));
        assert!(!meta.has_feature(MetaEngineFeature::SavesUseExtendedFormat));
    }

    #[test]
    fn save_surface_delegates_to_slots() {
        let saves = SaveSlots::new(Arc::new(MemorySaveFileManager::new()));
        let meta = AdlMetaEngine::new(saves.clone());
        let at = NaiveDate::from_ymd_opt(1999, 9, 9)
            .unwrap()
            .and_hms_opt(9, 9, 0)
            .unwrap();
        saves.save_one("hires1", 4, &SaveHeader::new("Tower", at, 60), None).unwrap();

        let listed = meta.list_saves("hires1");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].description, "Tower");
        assert_eq!(meta.query_save_meta_infos("hires1", 4).unwrap().play_time, Some(60));

        assert!(meta.remove_save_state("hires1", 4));
        assert!(meta.list_saves("hires1").is_empty());
        assert_eq!(meta.maximum_save_slot(), 14);
    }

    struct Hires1 {
        ctx: EngineContext,
    }

    impl Engine for Hires1 {
        fn target(&self) -> &str {
            self.ctx.target()
        }

        fn game_type(&self) -> GameType {
            GameType::Hires1
        }

        fn run(&mut self) -> Result<()> {
            Err(EngineError::Failed("no interpreter".to_string()))
        }
    }

    #[test]
    fn detected_game_gets_its_engine() {
        let mut meta = meta();
        meta.registry_mut()
            .register(GameType::Hires1, |ctx, _| Ok(Box::new(Hires1 { ctx })));

        let files = [
            FileFingerprint::new("ADVENTURE", "22d9e63a11d69fa033ba1738715ad09a", 29952),
            FileFingerprint::new("AUTO LOAD OBJ", "23bfccfe9fcff9b22cf6c41bde9078ac", 12291),
            FileFingerprint::new("MYSTERY.HELLO", "2289b7fea300b506e902a4c597968369", 836),
        ];
        let desc = meta.detect(&files).first().copied();
        assert!(desc.is_some());

        let ctx = EngineContext::new(
            openadl_common::GameConfig::new("mystery", GameId::Hires1),
            SaveSlots::new(Arc::new(MemorySaveFileManager::new())),
        );
        let mut engine = meta.create_instance(ctx, desc).unwrap();
        assert_eq!(engine.target(), "mystery");
        assert!(matches!(engine.run(), Err(EngineError::Failed(_))));
    }

    #[test]
    fn extra_options() {
        let keys: Vec<&str> = meta().extra_gui_options().iter().map(|o| o.config_key()).collect();
        assert_eq!(keys, vec!["color", "scanlines"]);
    }
}
