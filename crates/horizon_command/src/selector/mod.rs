//! # Entity Selectors
//!
//! Selectors are the `@`-prefixed expressions command users type in place of
//! an entity name: `@p`, `@a`, `@r`, `@e` and `@s`, optionally followed by a
//! bracketed argument list such as `@e[type=zombie,r=10,limit=3]`.
//!
//! A [`Selector`] is parsed once and then resolved against a
//! [`CommandSource`], which provides both the world state and the origin for
//! distance-based arguments.
//!
//! ## Arguments
//!
//! | key | meaning |
//! |-----|---------|
//! | `x`, `y`, `z` | search center (defaults to the source position) |
//! | `r`, `rm` | maximum / minimum distance from the center |
//! | `dx`, `dy`, `dz` | box extending from the center |
//! | `type` | entity type, `!` negates |
//! | `name` | entity name, `!` negates |
//! | `tag` | repeatable; `tag=` means untagged, `tag=!` means tagged |
//! | `limit`, `c` | maximum result count; negative `c` counts from the furthest |
//! | `sort` | `nearest`, `furthest`, `random` or `arbitrary` |

mod parser;

use crate::entity::{Entity, EntityRef, EntityType};
use crate::error::SelectorError;
use crate::source::CommandSource;
use crate::types::Position;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::debug;

/// The kind of a selector, given by the character after `@`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    /// `@p`
    NearestPlayer,
    /// `@a`
    AllPlayers,
    /// `@r`
    RandomPlayer,
    /// `@e`
    AllEntities,
    /// `@s`
    Source,
}

impl SelectorKind {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'p' => Some(SelectorKind::NearestPlayer),
            'a' => Some(SelectorKind::AllPlayers),
            'r' => Some(SelectorKind::RandomPlayer),
            'e' => Some(SelectorKind::AllEntities),
            's' => Some(SelectorKind::Source),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            SelectorKind::NearestPlayer => 'p',
            SelectorKind::AllPlayers => 'a',
            SelectorKind::RandomPlayer => 'r',
            SelectorKind::AllEntities => 'e',
            SelectorKind::Source => 's',
        }
    }

    fn default_sort(&self) -> SortMode {
        match self {
            SelectorKind::NearestPlayer => SortMode::Nearest,
            SelectorKind::RandomPlayer => SortMode::Random,
            _ => SortMode::Arbitrary,
        }
    }

    fn default_limit(&self) -> Option<usize> {
        match self {
            SelectorKind::NearestPlayer | SelectorKind::RandomPlayer => Some(1),
            _ => None,
        }
    }
}

/// Result ordering applied before the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortMode {
    Nearest,
    Furthest,
    Random,
    /// Spawn order
    Arbitrary,
}

impl std::str::FromStr for SortMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest" => Ok(SortMode::Nearest),
            "furthest" => Ok(SortMode::Furthest),
            "random" => Ok(SortMode::Random),
            "arbitrary" => Ok(SortMode::Arbitrary),
            _ => Err(()),
        }
    }
}

/// A filter value that may be inverted with a leading `!`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negatable<T> {
    pub value: T,
    pub negated: bool,
}

impl<T> Negatable<T> {
    pub fn new(value: T, negated: bool) -> Self {
        Self { value, negated }
    }

    fn accepts(&self, matched: bool) -> bool {
        matched != self.negated
    }
}

/// Parsed selector arguments. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectorArguments {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub radius_max: Option<f64>,
    pub radius_min: Option<f64>,
    pub dx: Option<f64>,
    pub dy: Option<f64>,
    pub dz: Option<f64>,
    pub entity_type: Option<Negatable<EntityType>>,
    pub name: Option<Negatable<String>>,
    pub tags: Vec<Negatable<String>>,
    pub limit: Option<usize>,
    pub count_from_furthest: bool,
    pub sort: Option<SortMode>,
}

impl SelectorArguments {
    /// Whether any argument refers to a place in the world.
    pub fn is_positional(&self) -> bool {
        self.x.is_some()
            || self.y.is_some()
            || self.z.is_some()
            || self.radius_max.is_some()
            || self.radius_min.is_some()
            || self.has_volume()
    }

    fn has_volume(&self) -> bool {
        self.dx.is_some() || self.dy.is_some() || self.dz.is_some()
    }
}

/// A parsed entity selector.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    kind: SelectorKind,
    arguments: SelectorArguments,
    raw: String,
}

impl Selector {
    /// Parses a selector expression such as `@e[type=zombie,r=10]`.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        parser::parse(input)
    }

    pub fn kind(&self) -> SelectorKind {
        self.kind
    }

    pub fn arguments(&self) -> &SelectorArguments {
        &self.arguments
    }

    /// Resolves the selector into the set of matching entities.
    ///
    /// Entities are returned de-duplicated, in the selector's sort order and
    /// cut to its limit.
    pub fn resolve(&self, source: &dyn CommandSource) -> Result<Vec<EntityRef>, SelectorError> {
        let args = &self.arguments;
        let location = source.location();

        let origin = location
            .as_ref()
            .map(|l| l.position)
            .unwrap_or_default();
        let center = Position::new(
            args.x.unwrap_or(origin.x),
            args.y.unwrap_or(origin.y),
            args.z.unwrap_or(origin.z),
        );

        let world = if self.kind == SelectorKind::NearestPlayer || args.is_positional() {
            location.as_ref().map(|l| l.world.clone())
        } else {
            None
        };

        let candidates = match self.kind {
            SelectorKind::Source => source.entity().into_iter().collect(),
            SelectorKind::NearestPlayer
            | SelectorKind::AllPlayers
            | SelectorKind::RandomPlayer => source.registry().players(),
            SelectorKind::AllEntities => source.registry().all(),
        };

        let mut seen = HashSet::new();
        let mut matched: Vec<EntityRef> = candidates
            .into_iter()
            .filter(|e| seen.insert(e.id))
            .filter(|e| world.as_deref().map_or(true, |w| e.world() == w))
            .filter(|e| self.matches(e, &center))
            .collect();

        let sort = args.sort.unwrap_or(if args.count_from_furthest {
            SortMode::Furthest
        } else {
            self.kind.default_sort()
        });
        sort_entities(&mut matched, sort, &center);

        if let Some(limit) = args.limit.or(self.kind.default_limit()) {
            matched.truncate(limit);
        }

        debug!(
            "Selector {} from {} matched {} entities",
            self.raw,
            source.name(),
            matched.len()
        );

        Ok(matched)
    }

    fn matches(&self, entity: &Entity, center: &Position) -> bool {
        let args = &self.arguments;

        if let Some(filter) = &args.entity_type {
            if !filter.accepts(entity.entity_type == filter.value) {
                return false;
            }
        }

        if let Some(filter) = &args.name {
            if !filter.accepts(entity.name == filter.value) {
                return false;
            }
        }

        for tag in &args.tags {
            let matched = if tag.value.is_empty() {
                // `tag=` selects untagged entities, `tag=!` tagged ones
                entity.tags.is_empty()
            } else {
                entity.tags.contains(&tag.value)
            };
            if !tag.accepts(matched) {
                return false;
            }
        }

        let position = entity.position();
        let distance_squared = position.distance_squared(center);

        if let Some(max) = args.radius_max {
            if distance_squared > max * max {
                return false;
            }
        }

        if let Some(min) = args.radius_min {
            if distance_squared < min * min {
                return false;
            }
        }

        if args.has_volume() {
            let within = |value: f64, from: f64, extent: Option<f64>| {
                let extent = extent.unwrap_or(0.0);
                let (low, high) = if extent < 0.0 {
                    (from + extent, from)
                } else {
                    (from, from + extent)
                };
                value >= low && value <= high + 1.0
            };
            if !within(position.x, center.x, args.dx)
                || !within(position.y, center.y, args.dy)
                || !within(position.z, center.z, args.dz)
            {
                return false;
            }
        }

        true
    }
}

fn sort_entities(entities: &mut [EntityRef], sort: SortMode, center: &Position) {
    let distance = |e: &EntityRef| e.position().distance_squared(center);
    match sort {
        SortMode::Nearest => entities.sort_by(|a, b| distance(a).total_cmp(&distance(b))),
        SortMode::Furthest => entities.sort_by(|a, b| distance(b).total_cmp(&distance(a))),
        SortMode::Random => entities.shuffle(&mut rand::thread_rng()),
        SortMode::Arbitrary => {}
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::EntityRegistry;
    use crate::source::{ConsoleSource, EntitySource};
    use std::sync::Arc;

    struct World {
        registry: Arc<EntityRegistry>,
        steve: EntityRef,
        alex: EntityRef,
        herobrine: EntityRef,
        zombie: EntityRef,
        boss: EntityRef,
        cow: EntityRef,
    }

    fn world() -> World {
        let registry = Arc::new(EntityRegistry::new());
        let steve = registry.spawn(Entity::player("Steve").at("overworld", Position::new(0.0, 64.0, 0.0)));
        let alex = registry.spawn(Entity::player("Alex").at("overworld", Position::new(10.0, 64.0, 0.0)));
        let herobrine =
            registry.spawn(Entity::player("Herobrine").at("nether", Position::new(1.0, 64.0, 0.0)));
        let zombie = registry.spawn(
            Entity::new(EntityType::Zombie, "").at("overworld", Position::new(3.0, 64.0, 0.0)),
        );
        let boss = registry.spawn(
            Entity::new(EntityType::Zombie, "Big Bob")
                .at("overworld", Position::new(50.0, 64.0, 0.0))
                .with_tag("boss"),
        );
        let cow = registry.spawn(
            Entity::new(EntityType::Cow, "").at("overworld", Position::new(-5.0, 64.0, 0.0)),
        );
        World {
            registry,
            steve,
            alex,
            herobrine,
            zombie,
            boss,
            cow,
        }
    }

    fn names(entities: &[EntityRef]) -> Vec<&str> {
        entities.iter().map(|e| e.display_name()).collect()
    }

    fn resolve(raw: &str, source: &dyn CommandSource) -> Vec<EntityRef> {
        Selector::parse(raw).unwrap().resolve(source).unwrap()
    }

    #[test]
    fn test_all_players_and_all_entities() {
        let w = world();
        let console = ConsoleSource::new(w.registry.clone());

        assert_eq!(names(&resolve("@a", &console)), ["Steve", "Alex", "Herobrine"]);
        assert_eq!(resolve("@e", &console).len(), 6);
    }

    #[test]
    fn test_nearest_player_stays_in_source_world() {
        let w = world();
        let source = EntitySource::new(w.zombie.clone(), w.registry.clone());

        // Herobrine is closer but in another world
        let nearest = resolve("@p", &source);
        assert_eq!(names(&nearest), ["Steve"]);
    }

    #[test]
    fn test_self_selector() {
        let w = world();
        let source = EntitySource::new(w.alex.clone(), w.registry.clone());
        let console = ConsoleSource::new(w.registry.clone());

        assert_eq!(resolve("@s", &source)[0].id, w.alex.id);
        assert!(resolve("@s[type=zombie]", &source).is_empty());
        assert!(resolve("@s", &console).is_empty());
    }

    #[test]
    fn test_type_name_and_tag_filters() {
        let w = world();
        let console = ConsoleSource::new(w.registry.clone());

        let zombies = resolve("@e[type=zombie]", &console);
        assert_eq!(zombies.iter().map(|e| e.id).collect::<Vec<_>>(), [w.zombie.id, w.boss.id]);

        let not_players = resolve("@e[type=!player]", &console);
        assert_eq!(not_players.len(), 3);

        assert_eq!(names(&resolve(r#"@e[name="Big Bob"]"#, &console)), ["Big Bob"]);
        assert_eq!(resolve("@a[name=!Steve]", &console).len(), 2);

        assert_eq!(resolve("@e[tag=boss]", &console)[0].id, w.boss.id);
        assert_eq!(resolve("@e[tag=!boss]", &console).len(), 5);
        assert_eq!(resolve("@e[tag=!]", &console)[0].id, w.boss.id);
        assert_eq!(resolve("@e[tag=]", &console).len(), 5);
    }

    #[test]
    fn test_radius_and_sorting() {
        let w = world();
        let source = EntitySource::new(w.steve.clone(), w.registry.clone());

        let near = resolve("@e[r=5,sort=nearest]", &source);
        assert_eq!(
            near.iter().map(|e| e.id).collect::<Vec<_>>(),
            [w.steve.id, w.zombie.id, w.cow.id]
        );

        let ring = resolve("@e[rm=4,r=20]", &source);
        assert_eq!(ring.iter().map(|e| e.id).collect::<Vec<_>>(), [w.alex.id, w.cow.id]);

        let furthest = resolve("@e[c=-1]", &source);
        assert_eq!(furthest[0].id, w.boss.id);

        let two_nearest = resolve("@e[r=100,limit=2,sort=nearest]", &source);
        assert_eq!(two_nearest.len(), 2);
        assert_eq!(two_nearest[1].id, w.zombie.id);
    }

    #[test]
    fn test_explicit_center_and_volume() {
        let w = world();
        let console = ConsoleSource::new(w.registry.clone());

        let around_boss = resolve("@e[x=50,y=64,z=0,r=1]", &console);
        assert_eq!(around_boss[0].id, w.boss.id);

        let boxed = resolve("@e[x=0,y=60,z=-1,dx=10,dy=10,dz=2]", &console);
        let ids: Vec<_> = boxed.iter().map(|e| e.id).collect();
        assert!(ids.contains(&w.steve.id));
        assert!(ids.contains(&w.alex.id));
        assert!(ids.contains(&w.zombie.id));
        assert!(ids.contains(&w.herobrine.id));
        assert!(!ids.contains(&w.cow.id));
        assert!(!ids.contains(&w.boss.id));
    }

    #[test]
    fn test_random_player_picks_one_player() {
        let w = world();
        let console = ConsoleSource::new(w.registry.clone());

        for _ in 0..10 {
            let picked = resolve("@r", &console);
            assert_eq!(picked.len(), 1);
            assert!(picked[0].is_player());
        }
        assert_eq!(resolve("@r[limit=5]", &console).len(), 3);
    }

    #[test]
    fn test_empty_world_resolves_to_nothing() {
        let console = ConsoleSource::new(Arc::new(EntityRegistry::new()));
        assert!(resolve("@p", &console).is_empty());
        assert!(resolve("@e[type=zombie]", &console).is_empty());
    }
}
