//! Level content
//!
//! A [`LevelDescriptor`] is the external, authored description of a level
//! (usually JSON). Building a session validates it and fails fast on anything
//! unknown: a typo in an archetype name must not silently become a skeleton.

use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::Archetype;
use super::geom::Rect;
use super::player::Weapon;
use crate::error::ContentError;

/// Visual style of a platform. Rendering only; physics ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformStyle {
    #[default]
    Stone,
    Wood,
    Fortress,
}

/// Static, immutable level geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub style: PlatformStyle,
}

impl Platform {
    pub fn new(rect: Rect, style: PlatformStyle) -> Self {
        Self { rect, style }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Health,
    Stamina,
}

impl PickupKind {
    /// Health restored or stamina granted
    pub fn amount(self) -> f32 {
        match self {
            PickupKind::Health => 25.0,
            PickupKind::Stamina => 30.0,
        }
    }
}

impl FromStr for PickupKind {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "health" => Ok(PickupKind::Health),
            "stamina" => Ok(PickupKind::Stamina),
            other => Err(ContentError::UnknownPickup(other.to_string())),
        }
    }
}

pub const PICKUP_SIZE: f32 = 16.0;
pub const GEM_SIZE: f32 = 12.0;
pub const DEFAULT_GEM_VALUE: u32 = 50;

/// A consumable potion. Stays in the level after use with `active == false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    pub pos: Vec2,
    pub active: bool,
    /// Cosmetic bob phase
    pub bob: f32,
}

impl Pickup {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PICKUP_SIZE, PICKUP_SIZE)
    }

    pub fn update(&mut self) {
        self.bob += 0.05;
    }
}

/// Gem rarity, derived from value (drives colour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GemTier {
    Common,
    Rare,
    Epic,
}

/// A score gem. Stays in the level after collection with `active == false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreGem {
    pub pos: Vec2,
    pub value: u32,
    pub active: bool,
    pub bob: f32,
}

impl ScoreGem {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, GEM_SIZE, GEM_SIZE)
    }

    pub fn tier(&self) -> GemTier {
        match self.value {
            v if v >= 200 => GemTier::Epic,
            v if v >= 100 => GemTier::Rare,
            _ => GemTier::Common,
        }
    }

    pub fn update(&mut self) {
        self.bob += 0.06;
    }
}

/// Authored platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Falls back to the level's `platform_style`
    #[serde(default)]
    pub style: Option<PlatformStyle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub archetype: String,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupSpawn {
    pub kind: String,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GemSpawn {
    pub pos: Vec2,
    #[serde(default)]
    pub value: Option<u32>,
}

/// Authored description of one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub width: f32,
    pub height: f32,
    pub spawn: Vec2,
    /// Centre of the exit portal
    pub exit: Vec2,
    /// Target completion time in frames
    pub par_frames: u32,
    #[serde(default)]
    pub platform_style: PlatformStyle,
    #[serde(default)]
    pub starting_weapon: Option<String>,
    #[serde(default)]
    pub platforms: Vec<PlatformSpec>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub pickups: Vec<PickupSpawn>,
    #[serde(default)]
    pub gems: Vec<GemSpawn>,
}

impl LevelDescriptor {
    /// Parse and validate a JSON level
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let descriptor: LevelDescriptor = serde_json::from_str(json)?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Check everything that does not need the simulation to be built
    pub fn validate(&self) -> Result<(), ContentError> {
        let invalid = |msg: String| Err(ContentError::InvalidLevel(msg));

        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return invalid(format!("world size {}x{} must be positive", self.width, self.height));
        }
        if self.par_frames == 0 {
            return invalid("par time must be positive".to_string());
        }
        if !self.spawn.is_finite() || !self.exit.is_finite() {
            return invalid("spawn and exit must be finite".to_string());
        }
        for (i, p) in self.platforms.iter().enumerate() {
            let finite = p.x.is_finite() && p.y.is_finite() && p.w.is_finite() && p.h.is_finite();
            if !finite || p.w <= 0.0 || p.h <= 0.0 {
                return invalid(format!("platform {i} has a degenerate rectangle"));
            }
        }
        for (i, e) in self.enemies.iter().enumerate() {
            if !e.pos.is_finite() {
                return invalid(format!("enemy {i} has a non-finite position"));
            }
            Archetype::from_str(&e.archetype)?;
        }
        for (i, p) in self.pickups.iter().enumerate() {
            if !p.pos.is_finite() {
                return invalid(format!("pickup {i} has a non-finite position"));
            }
            PickupKind::from_str(&p.kind)?;
        }
        for (i, g) in self.gems.iter().enumerate() {
            if !g.pos.is_finite() {
                return invalid(format!("gem {i} has a non-finite position"));
            }
        }
        if let Some(weapon) = &self.starting_weapon {
            Weapon::from_str(weapon)?;
        }
        Ok(())
    }
}

/// Runtime level: geometry plus the consumables that gameplay mutates
#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub spawn: Vec2,
    pub exit: Vec2,
    pub par_frames: u32,
    pub starting_weapon: Weapon,
    pub platforms: Vec<Platform>,
    pub pickups: Vec<Pickup>,
    pub gems: Vec<ScoreGem>,
}

impl Level {
    /// Build runtime geometry and consumables; `bob_phase` seeds the
    /// cosmetic bobbing so items do not move in lockstep
    pub fn build(
        descriptor: &LevelDescriptor,
        mut bob_phase: impl FnMut() -> f32,
    ) -> Result<Self, ContentError> {
        descriptor.validate()?;

        let platforms = descriptor
            .platforms
            .iter()
            .map(|p| {
                Platform::new(
                    Rect::new(p.x, p.y, p.w, p.h),
                    p.style.unwrap_or(descriptor.platform_style),
                )
            })
            .collect();

        let pickups = descriptor
            .pickups
            .iter()
            .map(|p| {
                Ok(Pickup {
                    kind: p.kind.parse()?,
                    pos: p.pos,
                    active: true,
                    bob: bob_phase(),
                })
            })
            .collect::<Result<Vec<_>, ContentError>>()?;

        let gems = descriptor
            .gems
            .iter()
            .map(|g| ScoreGem {
                pos: g.pos,
                value: g.value.unwrap_or(DEFAULT_GEM_VALUE),
                active: true,
                bob: bob_phase(),
            })
            .collect();

        let starting_weapon = match &descriptor.starting_weapon {
            Some(w) => w.parse()?,
            None => Weapon::default(),
        };

        Ok(Self {
            name: descriptor.name.clone(),
            width: descriptor.width,
            height: descriptor.height,
            spawn: descriptor.spawn,
            exit: descriptor.exit,
            par_frames: descriptor.par_frames,
            starting_weapon,
            platforms,
            pickups,
            gems,
        })
    }

    /// World size as a vector
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "width": 1000, "height": 600,
        "spawn": [50, 400], "exit": [900, 400],
        "par_frames": 3600,
        "platforms": [
            { "x": 0, "y": 500, "w": 1000, "h": 100 },
            { "x": 300, "y": 380, "w": 100, "h": 20, "style": "wood" }
        ],
        "enemies": [ { "archetype": "skeleton", "pos": [600, 460] } ],
        "pickups": [ { "kind": "health", "pos": [200, 470] } ],
        "gems": [ { "pos": [320, 360], "value": 200 }, { "pos": [100, 470] } ]
    }"#;

    #[test]
    fn test_parse_and_build() {
        let descriptor = LevelDescriptor::from_json(MINIMAL).unwrap();
        let level = Level::build(&descriptor, || 0.0).unwrap();
        assert_eq!(level.platforms.len(), 2);
        assert_eq!(level.platforms[0].style, PlatformStyle::Stone);
        assert_eq!(level.platforms[1].style, PlatformStyle::Wood);
        assert_eq!(level.pickups[0].kind, PickupKind::Health);
        assert_eq!(level.gems[0].tier(), GemTier::Epic);
        assert_eq!(level.gems[1].value, DEFAULT_GEM_VALUE);
        assert_eq!(level.gems[1].tier(), GemTier::Common);
        assert_eq!(level.starting_weapon, Weapon::Sword);
    }

    #[test]
    fn test_unknown_archetype_rejected() {
        let json = MINIMAL.replace("\"skeleton\"", "\"dragon\"");
        match LevelDescriptor::from_json(&json) {
            Err(ContentError::UnknownArchetype(name)) => assert_eq!(name, "dragon"),
            other => panic!("expected unknown archetype, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_pickup_rejected() {
        let json = MINIMAL.replace("\"health\"", "\"mana\"");
        assert!(matches!(
            LevelDescriptor::from_json(&json),
            Err(ContentError::UnknownPickup(_))
        ));
    }

    #[test]
    fn test_unknown_weapon_rejected() {
        let json = MINIMAL.replace("\"par_frames\"", "\"starting_weapon\": \"axe\", \"par_frames\"");
        assert!(matches!(
            LevelDescriptor::from_json(&json),
            Err(ContentError::UnknownWeapon(_))
        ));
    }

    #[test]
    fn test_degenerate_geometry_rejected() {
        let json = MINIMAL.replace("\"w\": 100, ", "\"w\": 0, ");
        assert!(matches!(
            LevelDescriptor::from_json(&json),
            Err(ContentError::InvalidLevel(_))
        ));
        let json = MINIMAL.replace("3600", "0");
        assert!(matches!(
            LevelDescriptor::from_json(&json),
            Err(ContentError::InvalidLevel(_))
        ));
    }

    #[test]
    fn test_non_finite_consumables_rejected() {
        let mut descriptor = LevelDescriptor::from_json(MINIMAL).unwrap();
        descriptor.pickups[0].pos = Vec2::new(f32::NAN, 470.0);
        assert!(matches!(descriptor.validate(), Err(ContentError::InvalidLevel(_))));

        let mut descriptor = LevelDescriptor::from_json(MINIMAL).unwrap();
        descriptor.gems[1].pos = Vec2::new(100.0, f32::INFINITY);
        assert!(matches!(descriptor.validate(), Err(ContentError::InvalidLevel(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            LevelDescriptor::from_json("{ not json"),
            Err(ContentError::Malformed(_))
        ));
    }

    #[test]
    fn test_consumables_bob() {
        let descriptor = LevelDescriptor::from_json(MINIMAL).unwrap();
        let mut level = Level::build(&descriptor, || 1.0).unwrap();
        level.pickups[0].update();
        level.gems[0].update();
        assert!((level.pickups[0].bob - 1.05).abs() < 1e-6);
        assert!((level.gems[0].bob - 1.06).abs() < 1e-6);
    }
}
