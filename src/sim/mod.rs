//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed frame step only; every rate is per frame
//! - Seeded RNG only
//! - Stable iteration order (list order of enemies, pickups and projectiles)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combat;
pub mod enemy;
pub mod geom;
pub mod input;
pub mod level;
pub mod player;
pub mod projectile;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod view;

pub use collision::Body;
pub use combat::{DamageOutcome, HitLedger, Hitbox, Knockback, Vitals};
pub use enemy::{Archetype, AttackStyle, Enemy, EnemyParams, Target};
pub use geom::Rect;
pub use input::{FrameInput, InputSnapshot, InputTracker, Keys};
pub use level::{
    GemTier, Level, LevelDescriptor, Pickup, PickupKind, Platform, PlatformStyle, ScoreGem,
};
pub use player::{Player, Weapon};
pub use projectile::{Projectile, ProjectileKind};
pub use snapshot::FrameSnapshot;
pub use state::{GameEvent, LevelState, SessionPhase};
pub use tick::tick;
pub use view::{FollowCamera, Viewport};
