//! Stand-alone collaborator implementations for tools and tests.

use std::collections::HashMap;
use std::sync::Arc;

use super::{
    CharacterInfo, GlobalParameter, GlobalParameterStore, IdRemapper, NameCache, NounParams,
    NounProcessor, PlayerState, SheetRedirect, SheetRedirectFlags, SheetRedirectResolver,
    SheetRowProvider, UiConfig,
};
use crate::kinds::{ActionKind, ObjectKind};
use crate::text::{EncodedText, Payload};

/// Leaves every sheet reference where it is.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityRedirect;

impl SheetRedirectResolver for IdentityRedirect {
    fn resolve(&self, sheet_name: &str, row_id: u32, column: u32) -> SheetRedirect {
        SheetRedirect {
            sheet_name: sheet_name.to_string(),
            row_id,
            column,
            flags: SheetRedirectFlags::empty(),
        }
    }
}

/// `kind * 1_000_000 + id`.
#[derive(Debug, Default, Clone, Copy)]
pub struct KindOffsetRemapper;

const KIND_OFFSET: u32 = 1_000_000;

impl IdRemapper for KindOffsetRemapper {
    fn act_str_id(&self, kind: ActionKind, id: u32) -> u32 {
        kind.code().wrapping_mul(KIND_OFFSET).wrapping_add(id)
    }

    fn obj_str_id(&self, kind: ObjectKind, id: u32) -> u32 {
        kind.code().wrapping_mul(KIND_OFFSET).wrapping_add(id)
    }
}

#[derive(Debug, Default, Clone)]
pub struct StaticNameCache {
    characters: HashMap<u32, CharacterInfo>,
}

impl StaticNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_character(mut self, entity_id: u32, info: CharacterInfo) -> Self {
        self.characters.insert(entity_id, info);
        self
    }
}

impl NameCache for StaticNameCache {
    fn character_info(&self, entity_id: u32) -> Option<CharacterInfo> {
        self.characters.get(&entity_id).cloned()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StaticPlayerState {
    pub entity_id: u32,
    pub home_world_id: u32,
    pub cross_world_duty: bool,
}

impl PlayerState for StaticPlayerState {
    fn entity_id(&self) -> u32 {
        self.entity_id
    }

    fn home_world_id(&self) -> u32 {
        self.home_world_id
    }

    fn is_in_cross_world_duty(&self) -> bool {
        self.cross_world_duty
    }
}

#[derive(Debug, Default, Clone)]
pub struct StaticGlobalParameters {
    parameters: Vec<GlobalParameter>,
}

impl StaticGlobalParameters {
    pub fn new(parameters: Vec<GlobalParameter>) -> Self {
        Self { parameters }
    }
}

impl GlobalParameterStore for StaticGlobalParameters {
    fn get(&self, index: u32) -> Option<GlobalParameter> {
        self.parameters.get(index as usize).cloned()
    }
}

#[derive(Debug, Default, Clone)]
pub struct StaticUiConfig {
    options: HashMap<String, u32>,
}

impl StaticUiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_option(mut self, name: &str, value: u32) -> Self {
        self.options.insert(name.to_string(), value);
        self
    }
}

impl UiConfig for StaticUiConfig {
    fn get_uint(&self, name: &str) -> Option<u32> {
        self.options.get(name).copied()
    }
}

const SINGULAR_COLUMN: usize = 0;
const PLURAL_COLUMN: usize = 2;
const GRAMMAR_MARKERS: [&str; 4] = ["[t]", "[a]", "[pa]", "[p]"];

/// Declension without articles: the singular column for a quantity of one,
/// the plural column otherwise, with `[n]` replaced by the quantity and the
/// remaining grammar markers removed.
#[derive(Clone)]
pub struct PlainNounProcessor {
    sheets: Arc<dyn SheetRowProvider>,
}

impl PlainNounProcessor {
    pub fn new(sheets: Arc<dyn SheetRowProvider>) -> Self {
        Self { sheets }
    }
}

impl NounProcessor for PlainNounProcessor {
    fn process_noun(&self, params: &NounParams) -> EncodedText {
        let Some(row) = self
            .sheets
            .get_row(&params.sheet_name, params.row_id, params.language)
        else {
            return EncodedText::empty();
        };
        let column = if params.quantity == 1 {
            SINGULAR_COLUMN
        } else {
            PLURAL_COLUMN
        };
        let mut text = row.read_text(column);
        if text.is_empty() {
            text = row.read_text(SINGULAR_COLUMN);
        }
        let quantity = params.quantity.to_string();
        text.iter()
            .map(|payload| match payload {
                Payload::Text(run) => {
                    let mut run = run.replace("[n]", &quantity);
                    for marker in GRAMMAR_MARKERS {
                        run = run.replace(marker, "");
                    }
                    Payload::Text(run)
                }
                other => other.clone(),
            })
            .collect()
    }
}
