//! Built-in placeholders.
//!
//! Most built-ins are thin lookups of a context attribute of the same name
//! (`{player_name}` reads attribute `player_name`), with a fixed fallback when
//! the host does not provide it. A few are derived from other attributes:
//!
//! | placeholder           | derived from                           |
//! |-----------------------|----------------------------------------|
//! | `{player_location}`   | `player_x`, `player_y`, `player_z`     |
//! | `{player_uuid_short}` | first segment of `player_uuid`         |
//! | `{world_weather}`     | `world_storm` (`"true"` → `Raining`)   |
//! | `{time_*}`            | `Context::now()`                       |

use super::registry::PlaceholderRegistry;
use super::timezone::{self, NAMED_ZONES};
use crate::Context;
use chrono::{Local, Utc};

bitflags::bitflags! {
    /// Groups of built-in placeholders.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Categories: u8 {
        /// `{nearby_*}` entity counts and details.
        const ENTITY = 1 << 0;
        /// `{player_*}` and `{item_in_hand}`.
        const ACTOR  = 1 << 1;
        /// `{world_*}`.
        const WORLD  = 1 << 2;
        /// `{time_*}` fixed and named zones.
        const TIME   = 1 << 3;
    }
}

/// Entity kinds that get `{nearby_<kind>_count}` / `{nearby_<kind>_detail}`.
pub const ENTITY_TYPES: &[&str] = &[
    "allay", "armadillo", "axolotl", "bat", "bee", "blaze", "bogged", "breeze", "camel", "cat", "cave_spider",
    "chicken", "cod", "cow", "creeper", "dolphin", "donkey", "drowned", "elder_guardian", "ender_dragon",
    "endermite", "evoker", "fox", "frog", "ghast", "glow_squid", "goat", "guardian", "hoglin", "horse", "husk",
    "illusioner", "iron_golem", "llama", "magma_cube", "mooshroom", "mule", "ocelot", "panda", "parrot", "phantom",
    "pig", "piglin", "piglin_brute", "pillager", "polar_bear", "pufferfish", "rabbit", "ravager", "salmon", "sheep",
    "shulker", "silverfish", "skeleton", "skeleton_horse", "slime", "sniffer", "snow_golem", "spider", "squid",
    "stray", "strider", "trader_llama", "tropical_fish", "turtle", "vex", "vindicator", "warden", "witch", "wither",
    "wither_skeleton", "wolf", "zoglin", "zombie", "zombie_horse", "zombie_villager", "zombified_piglin",
];

const UNKNOWN: &str = "unknown";

impl PlaceholderRegistry {
    /// Registry holding the built-in placeholders of `categories`.
    pub fn builtin(categories: Categories) -> Self {
        let mut registry = Self::new();
        if categories.contains(Categories::ENTITY) {
            register_entities(&mut registry);
        }
        if categories.contains(Categories::ACTOR) {
            register_actor(&mut registry);
        }
        if categories.contains(Categories::WORLD) {
            register_world(&mut registry);
        }
        if categories.contains(Categories::TIME) {
            register_time(&mut registry);
        }
        registry
    }
}

fn define<F>(registry: &mut PlaceholderRegistry, name: &str, value: F)
where
    F: Fn(&dyn Context) -> String + Send + Sync + 'static,
{
    if let Err(e) = registry.register(name, value) {
        log::warn!("Skipping built-in placeholder: {e}");
    }
}

/// Attribute lookup with a fallback.
fn attribute(registry: &mut PlaceholderRegistry, name: &str, fallback: &'static str) {
    let key = name.to_string();
    define(registry, name, move |ctx| ctx.attribute(&key).unwrap_or_else(|| fallback.to_string()));
}

fn register_entities(registry: &mut PlaceholderRegistry) {
    attribute(registry, "nearby_entities_count", "0");
    attribute(registry, "nearby_entities_detail", "No entities nearby.");
    for kind in ENTITY_TYPES {
        attribute(registry, &format!("nearby_{kind}_count"), "0");
        attribute(registry, &format!("nearby_{kind}_detail"), "None nearby.");
    }
}

fn register_actor(registry: &mut PlaceholderRegistry) {
    attribute(registry, "item_in_hand", "No item in hand.");
    attribute(registry, "player_displayname", UNKNOWN);
    attribute(registry, "player_exp_level", "0");
    attribute(registry, "player_food_level", UNKNOWN);
    attribute(registry, "player_gamemode", UNKNOWN);
    attribute(registry, "player_health", UNKNOWN);
    attribute(registry, "player_inventory", "Inventory is empty.");
    attribute(registry, "player_ip", UNKNOWN);
    define(registry, "player_location", location);
    attribute(registry, "player_max_health", UNKNOWN);
    attribute(registry, "player_name", UNKNOWN);
    attribute(registry, "player_uuid", UNKNOWN);
    define(registry, "player_uuid_short", |ctx| {
        ctx.attribute("player_uuid")
            .and_then(|uuid| uuid.split('-').next().map(str::to_string))
            .unwrap_or_else(|| UNKNOWN.to_string())
    });
    attribute(registry, "player_world", UNKNOWN);
}

fn location(ctx: &dyn Context) -> String {
    let coord = |axis: &str| ctx.attribute(&format!("player_{axis}"))?.trim().parse::<f64>().ok();
    match (coord("x"), coord("y"), coord("z")) {
        (Some(x), Some(y), Some(z)) => format!("X: {x:.1}, Y: {y:.1}, Z: {z:.1}"),
        _ => UNKNOWN.to_string(),
    }
}

fn register_world(registry: &mut PlaceholderRegistry) {
    attribute(registry, "world_difficulty", UNKNOWN);
    attribute(registry, "world_entity_count", "0");
    attribute(registry, "world_loaded_chunks", "0");
    attribute(registry, "world_seed", UNKNOWN);
    attribute(registry, "world_time", UNKNOWN);
    define(registry, "world_weather", |ctx| {
        match ctx.attribute("world_storm").map(|s| s.trim().eq_ignore_ascii_case("true")) {
            Some(true) => "Raining".to_string(),
            Some(false) => "Clear".to_string(),
            None => UNKNOWN.to_string(),
        }
    });
}

fn register_time(registry: &mut PlaceholderRegistry) {
    define(registry, "time_gmt", |ctx| timezone::format_in(ctx.now(), &Utc));
    define(registry, "time_server", |ctx| timezone::format_in(ctx.now(), &Local));
    define(registry, "time_utc", |ctx| timezone::format_in(ctx.now(), &Utc));
    for (name, zone) in NAMED_ZONES {
        let zone = *zone;
        define(registry, &format!("time_{name}"), move |ctx| timezone::format_in(ctx.now(), &zone));
    }
}
