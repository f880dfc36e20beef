use serde::{Deserialize, Serialize};

use shadowswap_core::world::World;

use crate::entities::{Door, Enemy, Key, Platform};
use crate::levels::LevelDefinition;

/// Live entities for one attempt at a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelEntities {
    pub light: Vec<Platform>,
    pub shadow: Vec<Platform>,
    pub keys: Vec<Key>,
    pub enemies: Vec<Enemy>,
    pub door: Door,
}

impl LevelEntities {
    /// The platform collection the player collides with in `world`.
    pub fn platforms(&self, world: World) -> &[Platform] {
        match world {
            World::Light => &self.light,
            World::Shadow => &self.shadow,
        }
    }

    pub fn platforms_mut(&mut self, world: World) -> &mut [Platform] {
        match world {
            World::Light => &mut self.light,
            World::Shadow => &mut self.shadow,
        }
    }
}

/// Instantiate fresh entities from a definition. Every call restores motion
/// phase, fade opacity and key presence to their initial values.
pub fn build_level(def: &LevelDefinition) -> LevelEntities {
    LevelEntities {
        light: def
            .light
            .iter()
            .map(|spec| Platform::from_spec(spec, World::Light))
            .collect(),
        shadow: def
            .shadow
            .iter()
            .map(|spec| Platform::from_spec(spec, World::Shadow))
            .collect(),
        keys: def.keys.iter().map(Key::from_spec).collect(),
        enemies: def.enemies.iter().map(Enemy::from_spec).collect(),
        door: Door::from_spec(&def.door),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::OPAQUE;
    use crate::levels::Campaign;

    #[test]
    fn builds_every_entity_of_first_level() {
        let campaign = Campaign::embedded();
        let level = campaign.get(0).unwrap();
        let entities = build_level(level);
        assert_eq!(entities.light.len(), level.light.len());
        assert_eq!(entities.shadow.len(), level.shadow.len());
        assert_eq!(entities.keys.len(), level.keys.len());
        assert_eq!(entities.enemies.len(), level.enemies.len());
        assert_eq!(entities.door.rect.x, 700.0);
    }

    #[test]
    fn platforms_are_tagged_with_their_world() {
        let entities = build_level(Campaign::embedded().get(0).unwrap());
        assert!(entities.light.iter().all(|p| p.world == World::Light));
        assert!(entities.shadow.iter().all(|p| p.world == World::Shadow));
        assert_eq!(entities.platforms(World::Shadow).len(), entities.shadow.len());
    }

    #[test]
    fn rebuild_restores_initial_state() {
        let campaign = Campaign::embedded();
        let level = campaign.get(1).unwrap();
        let fresh = build_level(level);

        let mut played = fresh.clone();
        for _ in 0..37 {
            for p in played.platforms_mut(World::Light) {
                p.update(World::Light, 5, 50);
            }
            for e in &mut played.enemies {
                e.update();
            }
        }
        played.keys.clear();
        assert_ne!(played, fresh);

        let rebuilt = build_level(level);
        assert_eq!(rebuilt, fresh);
        assert!(rebuilt.light.iter().all(|p| p.opacity == OPAQUE));
    }

    #[test]
    fn builds_are_independent() {
        let level = Campaign::embedded().get(0).unwrap().clone();
        let mut a = build_level(&level);
        let b = build_level(&level);
        a.keys.pop();
        assert_eq!(b.keys.len(), level.keys.len());
    }
}
