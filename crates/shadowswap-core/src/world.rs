use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two parallel layouts a level presents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum World {
    #[default]
    Light,
    Shadow,
}

impl World {
    pub fn toggled(self) -> Self {
        match self {
            World::Light => World::Shadow,
            World::Shadow => World::Light,
        }
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            World::Light => write!(f, "Light"),
            World::Shadow => write!(f, "Shadow"),
        }
    }
}

/// Which world(s) an entity can be seen and touched in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Light,
    Shadow,
    #[default]
    Both,
}

impl Visibility {
    pub fn is_visible_in(self, world: World) -> bool {
        match (self, world) {
            (Visibility::Both, _) => true,
            (Visibility::Light, World::Light) => true,
            (Visibility::Shadow, World::Shadow) => true,
            (Visibility::Light, World::Shadow) | (Visibility::Shadow, World::Light) => false,
        }
    }
}

impl From<World> for Visibility {
    fn from(world: World) -> Self {
        match world {
            World::Light => Visibility::Light,
            World::Shadow => Visibility::Shadow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_alternates() {
        assert_eq!(World::Light.toggled(), World::Shadow);
        assert_eq!(World::Shadow.toggled(), World::Light);
        assert_eq!(World::Light.toggled().toggled(), World::Light);
    }

    #[test]
    fn both_is_visible_everywhere() {
        assert!(Visibility::Both.is_visible_in(World::Light));
        assert!(Visibility::Both.is_visible_in(World::Shadow));
    }

    #[test]
    fn single_world_visibility() {
        assert!(Visibility::Light.is_visible_in(World::Light));
        assert!(!Visibility::Light.is_visible_in(World::Shadow));
        assert!(Visibility::Shadow.is_visible_in(World::Shadow));
        assert!(!Visibility::Shadow.is_visible_in(World::Light));
    }

    #[test]
    fn world_converts_to_matching_visibility() {
        assert_eq!(Visibility::from(World::Light), Visibility::Light);
        assert_eq!(Visibility::from(World::Shadow), Visibility::Shadow);
    }

    #[test]
    fn defaults() {
        assert_eq!(World::default(), World::Light);
        assert_eq!(Visibility::default(), Visibility::Both);
    }
}
