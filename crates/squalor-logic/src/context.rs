//! Per-visit host inputs.
//!
//! Everything the host knows about the interior being entered travels in one
//! [`InteriorContext`] value, built fresh for every interior-entry event.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;

/// Building classification supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingType {
    Alchemist,
    Armorer,
    Bank,
    Bookseller,
    ClothingStore,
    FurnitureStore,
    GemStore,
    GeneralStore,
    GuildHall,
    HouseForSale,
    House1,
    House2,
    House3,
    House4,
    House5,
    House6,
    Library,
    Palace,
    PawnShop,
    Ship,
    Tavern,
    Temple,
    WeaponSmith,
}

impl BuildingType {
    /// Inns and ordinary dwellings.
    pub const RESIDENCES: [BuildingType; 5] = [
        BuildingType::Tavern,
        BuildingType::House1,
        BuildingType::House2,
        BuildingType::House3,
        BuildingType::House4,
    ];

    pub fn is_residence(self) -> bool {
        Self::RESIDENCES.contains(&self)
    }
}

/// Climate of the surrounding region. Carried through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Climate {
    Desert,
    Mountain,
    #[default]
    Temperate,
    Swamp,
}

/// Stable identity of one interior instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InteriorIdentity {
    pub name: String,
}

impl InteriorIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Deterministic hash of this interior and a location inside it.
    ///
    /// Coordinates are quantized to tenths so the same spot always hashes
    /// the same across visits.
    pub fn location_hash(&self, location: Vec3) -> u32 {
        let mut hash = fnv1a(self.name.as_bytes());
        hash = hash.wrapping_add(quantize(location.x));
        hash = hash.wrapping_add(quantize(location.y));
        hash = hash.wrapping_add(quantize(location.z));
        hash
    }
}

fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for &b in bytes {
        hash ^= b as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

fn quantize(value: f32) -> u32 {
    (value * 10.0) as i32 as u32
}

/// A doorway transform: position plus facing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Doorway {
    pub position: Vec3,
    pub facing: Vec3,
}

impl Doorway {
    pub fn new(position: Vec3, facing: Vec3) -> Self {
        Self { position, facing }
    }
}

/// Host state for a single interior-entry event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteriorContext {
    pub identity: InteriorIdentity,
    /// Wealth/upkeep level; lower means shabbier.
    pub quality: u8,
    pub building_type: BuildingType,
    #[serde(default)]
    pub climate: Climate,
    /// Where the proprietor stands, if the building has one.
    #[serde(default)]
    pub proprietor: Option<Vec3>,
    /// Day of the year; keeps a building's dressing stable through one day.
    #[serde(default)]
    pub day_of_year: u16,
}

impl InteriorContext {
    pub fn new(identity: InteriorIdentity, quality: u8, building_type: BuildingType) -> Self {
        Self {
            identity,
            quality,
            building_type,
            climate: Climate::default(),
            proprietor: None,
            day_of_year: 0,
        }
    }

    pub fn with_proprietor(mut self, position: Vec3) -> Self {
        self.proprietor = Some(position);
        self
    }

    pub fn with_day(mut self, day_of_year: u16) -> Self {
        self.day_of_year = day_of_year;
        self
    }

    /// RNG seed for this visit.
    pub fn seed(&self) -> u64 {
        self.identity.location_hash(Vec3::ZERO) as u64 + self.day_of_year as u64
    }
}
