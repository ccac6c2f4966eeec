//! # Collaborators
//!
//! Everything the evaluator reads from the outside world goes through the
//! traits in this module: sheet storage, sheet redirects, noun declension,
//! character and player state, global parameters, the macro clock, id
//! remapping and UI settings.
//!
//! All traits are `Send + Sync` so one evaluator can serve several threads.
//! The name cache, player state and global parameters describe live game state
//! that is only meaningful on the main thread; see
//! [`crate::thread_safety::ThreadAffinity`].
//!
//! [`in_memory`] and [`defaults`] provide implementations usable without a
//! running game client: JSON sheet fixtures, identity redirects, a system-time
//! macro clock and empty state stores.

pub mod defaults;
pub mod in_memory;

use bitflags::bitflags;
use chrono::NaiveDateTime;

use crate::kinds::{ActionKind, ObjectKind};
use crate::language::ClientLanguage;
use crate::sheets::SheetRow;
use crate::text::EncodedText;

pub use crate::clock::SystemMacroClock;
pub use defaults::{
    IdentityRedirect, KindOffsetRemapper, PlainNounProcessor, StaticGlobalParameters,
    StaticNameCache, StaticPlayerState, StaticUiConfig,
};
pub use in_memory::InMemorySheets;

/// Localized, row-indexed game data.
#[mockall::automock]
pub trait SheetRowProvider: Send + Sync {
    fn has_sheet(&self, sheet: &str) -> bool;

    fn get_row(&self, sheet: &str, row_id: u32, language: ClientLanguage) -> Option<SheetRow>;

    /// Row ids of a sheet in ascending order. Empty for unknown sheets.
    fn row_ids(&self, sheet: &str, language: ClientLanguage) -> Vec<u32>;
}

bitflags! {
    /// Facts about a redirected sheet reference.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SheetRedirectFlags: u32 {
        /// The row is an item and gets rarity color plus an item link.
        const ITEM = 1 << 0;
        /// Key items: fixed rarity, never linked.
        const EVENT_ITEM = 1 << 1;
        const HIGH_QUALITY = 1 << 2;
        const COLLECTIBLE = 1 << 3;
        /// The row belongs to an action-like sheet (affects noun declension).
        const ACTION = 1 << 4;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRedirect {
    pub sheet_name: String,
    pub row_id: u32,
    pub column: u32,
    pub flags: SheetRedirectFlags,
}

/// Maps a requested `(sheet, row, column)` to where the data is actually
/// stored. An empty resulting sheet name means the reference cannot be
/// resolved.
#[mockall::automock]
pub trait SheetRedirectResolver: Send + Sync {
    fn resolve(&self, sheet_name: &str, row_id: u32, column: u32) -> SheetRedirect;
}

/// Input of a noun declension request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NounParams {
    pub language: ClientLanguage,
    pub sheet_name: String,
    pub row_id: u32,
    pub quantity: i32,
    pub article_type: i32,
    /// Zero-based grammatical case.
    pub grammatical_case: i32,
    pub is_action_sheet: bool,
}

/// German article type selecting the bare noun without article.
pub const GERMAN_ZERO_ARTICLE: i32 = 5;

#[mockall::automock]
pub trait NounProcessor: Send + Sync {
    fn process_noun(&self, params: &NounParams) -> EncodedText;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterInfo {
    pub name: EncodedText,
    pub home_world_id: u32,
    /// 0 is male, anything else female.
    pub sex: u8,
}

/// Characters the client currently knows about, by entity id.
#[mockall::automock]
pub trait NameCache: Send + Sync {
    fn character_info(&self, entity_id: u32) -> Option<CharacterInfo>;
}

#[mockall::automock]
pub trait PlayerState: Send + Sync {
    fn entity_id(&self) -> u32;

    fn home_world_id(&self) -> u32;

    fn is_in_cross_world_duty(&self) -> bool;
}

/// A host-exposed text parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalParameter {
    Integer(i32),
    String(EncodedText),
    ReferencedString(EncodedText),
    Uninitialized,
}

impl GlobalParameter {
    pub fn kind_name(&self) -> &'static str {
        match self {
            GlobalParameter::Integer(_) => "integer",
            GlobalParameter::String(_) => "string",
            GlobalParameter::ReferencedString(_) => "referenced string",
            GlobalParameter::Uninitialized => "uninitialized",
        }
    }
}

/// Zero-based array of global parameters. `None` means out of range.
#[mockall::automock]
pub trait GlobalParameterStore: Send + Sync {
    fn get(&self, index: u32) -> Option<GlobalParameter>;
}

/// The clock read by time placeholders and written by `SetTime` and
/// `SetResetTime`.
#[mockall::automock]
pub trait MacroClock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn set(&self, time: NaiveDateTime);

    /// Millisecond of the wall clock. The macro clock itself has second
    /// resolution.
    fn millisecond(&self) -> u32;
}

/// Maps kind-qualified ids to the local parameter expected by the ActStr and
/// ObjStr addon texts.
#[mockall::automock]
pub trait IdRemapper: Send + Sync {
    fn act_str_id(&self, kind: ActionKind, id: u32) -> u32;

    fn obj_str_id(&self, kind: ObjectKind, id: u32) -> u32;
}

/// Numeric game UI settings, by option name.
#[mockall::automock]
pub trait UiConfig: Send + Sync {
    fn get_uint(&self, name: &str) -> Option<u32>;
}
