//! Action and object kinds addressed by the cached display-name lookups.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[repr(u8)]
pub enum ActionKind {
    None = 0,
    Action = 1,
    Item = 2,
    EventItem = 3,
    EventAction = 4,
    GeneralAction = 5,
    BuddyAction = 6,
    MainCommand = 7,
    Companion = 8,
    CraftAction = 9,
    PetAction = 11,
    CompanyAction = 12,
    Mount = 13,
    PvPAction = 14,
    FieldMarker = 15,
    ChocoboRaceAbility = 16,
    ChocoboRaceItem = 17,
    DeepDungeonEquipment = 18,
    DeepDungeonMagicStone = 19,
    DeepDungeonDemiclone = 20,
    Ornament = 21,
}

impl ActionKind {
    pub fn code(self) -> u32 {
        self as u8 as u32
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[repr(u8)]
pub enum ObjectKind {
    None = 0,
    Pc = 1,
    BattleNpc = 2,
    EventNpc = 3,
    Treasure = 4,
    Aetheryte = 5,
    GatheringPoint = 6,
    EventObj = 7,
    MountType = 8,
    Companion = 9,
    Retainer = 10,
    AreaObject = 11,
    HousingEventObject = 12,
    Cutscene = 13,
    ReactionEventObject = 14,
    Ornament = 15,
    CardStand = 16,
}

impl ObjectKind {
    pub fn code(self) -> u32 {
        self as u8 as u32
    }
}
