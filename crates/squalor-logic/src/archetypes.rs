//! Visual archetypes for placed props.
//!
//! Maps each prop kind to the visual the host should instantiate plus the
//! physical numbers placement needs (native height, scale). Hosts swap art by
//! editing this table, not the placement code.

use serde::{Deserialize, Serialize};

/// Category of clutter prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropKind {
    FoodBit,
    Stain,
    Waste,
    Skeleton,
}

/// What the host should draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visual {
    /// A billboard from the host's archive/record catalogue.
    Billboard { archive: u16, record: u16 },
    /// A texture shipped alongside the host's assets, by name.
    Texture(String),
}

/// Host-facing description of one prop kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropProfile {
    pub visual: Visual,
    /// Height before scaling.
    pub height: f32,
    pub scale: f32,
}

impl PropProfile {
    pub fn billboard(archive: u16, record: u16, height: f32, scale: f32) -> Self {
        Self {
            visual: Visual::Billboard { archive, record },
            height,
            scale,
        }
    }

    pub fn texture(name: &str, height: f32) -> Self {
        Self {
            visual: Visual::Texture(name.to_string()),
            height,
            scale: 1.0,
        }
    }

    /// Height once scaled.
    pub fn scaled_height(&self) -> f32 {
        self.height * self.scale
    }
}

/// Prop kind → profile lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeTable {
    pub food_bit: PropProfile,
    pub stain: PropProfile,
    pub waste: PropProfile,
    pub skeleton: PropProfile,
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self {
            // Food bits and stains get a random size per instance; height here
            // is only the fallback.
            food_bit: PropProfile::texture("FoodBit", 0.1),
            stain: PropProfile::texture("Stain", 0.0),
            waste: PropProfile::billboard(253, 21, 0.5, 0.6),
            skeleton: PropProfile::billboard(306, 1, 0.6, 1.0),
        }
    }
}

impl ArchetypeTable {
    pub fn get(&self, kind: PropKind) -> &PropProfile {
        match kind {
            PropKind::FoodBit => &self.food_bit,
            PropKind::Stain => &self.stain,
            PropKind::Waste => &self.waste,
            PropKind::Skeleton => &self.skeleton,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_waste_is_scaled_billboard() {
        let table = ArchetypeTable::default();
        let waste = table.get(PropKind::Waste);
        assert_eq!(waste.visual, Visual::Billboard { archive: 253, record: 21 });
        assert!((waste.scaled_height() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_partial_override_from_json() {
        let json = r#"{ "skeleton": { "visual": { "Billboard": { "archive": 306, "record": 4 } }, "height": 1.2, "scale": 1.0 } }"#;
        let table: ArchetypeTable = serde_json::from_str(json).unwrap();
        assert_eq!(
            table.get(PropKind::Skeleton).visual,
            Visual::Billboard { archive: 306, record: 4 }
        );
        assert_eq!(table.get(PropKind::Waste), ArchetypeTable::default().get(PropKind::Waste));
    }
}
