//! The default rule document.
//!
//! Seeded into an empty rule tree so a fresh installation answers common
//! questions out of the box. The rules cover every built-in placeholder
//! category (see `placeholders::builtin`).

use super::record::RuleRecord;
use crate::placeholders::builtin::ENTITY_TYPES;

/// File name of the seeded document, relative to the tree root.
pub const DEFAULT_DOCUMENT_NAME: &str = "data.json";

/// Build the default rule set.
pub fn records() -> Vec<RuleRecord> {
    let mut out = vec![
        RuleRecord::new(["What mobs are near me?", "List nearby entities"], "Nearby entities:\n{nearby_entities_count}"),
        RuleRecord::new(
            ["Show nearby entities detail", "List nearby entity details"],
            "Nearby entities:\n{nearby_entities_detail}",
        ),
    ];

    for kind in ENTITY_TYPES {
        let name = kind.replace('_', " ");
        let plural = if name.ends_with('s') { name.clone() } else { format!("{name}s") };
        out.push(RuleRecord::new(
            [format!("How many {plural} nearby?"), format!("Nearby {name} count")],
            format!("There are {{nearby_{kind}_count}} {plural} near you."),
        ));
        out.push(RuleRecord::new(
            [format!("Show nearby {name} detail"), format!("Nearby {name} details")],
            format!("Nearby {plural}:\n{{nearby_{kind}_detail}}"),
        ));
    }

    let simple: &[(&[&str], &str)] = &[
        (&["What is in my hand?", "Show my held item"], "You are holding: {item_in_hand}"),
        (&["What is my display name?", "Show display name"], "Your display name is {player_displayname}."),
        (&["How much XP do I have?", "What is my level?"], "Your experience level is {player_exp_level}."),
        (&["How hungry am I?", "What is my food level?"], "Your food level is {player_food_level}."),
        (&["What mode am I in?", "Tell me my game mode"], "You are in {player_gamemode} mode."),
        (&["How much health do I have?", "Tell me my health"], "You have {player_health} health."),
        (&["What is in my inventory?", "List my items"], "Inventory contents:\n{player_inventory}"),
        (&["What is my IP address?", "Tell me my IP"], "Your IP address is {player_ip}."),
        (&["Where am I?", "Tell me my location"], "You are at {player_location} in world {player_world}."),
        (&["What is my max health?", "Max HP"], "Your max health is {player_max_health}."),
        (&["What is my name?", "Who am I?"], "Your name is {player_name}."),
        (&["What is my UUID?", "Tell me my player ID"], "Your UUID is {player_uuid}."),
        (&["What is my short UUID?", "Shorten my UUID"], "Short UUID: {player_uuid_short}"),
        (&["What world am I in?", "Tell me my world"], "You are in world: {player_world}."),
        (&["How hard is this world?", "Tell me world difficulty"], "World difficulty: {world_difficulty}"),
        (&["How many entities are in the world?"], "Entities in world: {world_entity_count}"),
        (&["How many chunks are loaded?"], "Loaded chunks: {world_loaded_chunks}"),
        (&["What is the seed?", "World seed?"], "World seed: {world_seed}"),
        (&["What time is it in-game?", "Tell me in-game time"], "World time: {world_time}"),
        (&["What is the weather like?", "Current weather?"], "World weather: {world_weather}"),
        (&["What is the server time?", "Current server time"], "Server time is {time_server}."),
        (&["What is the UTC time?", "Tell me UTC time"], "UTC time is {time_utc}."),
        (&["What is GMT time?", "Time in GMT?"], "GMT time is {time_gmt}."),
        (&["Bangkok time?", "What time is it in Bangkok?"], "Bangkok time is {time_bangkok}."),
        (&["Berlin time?", "What time is it in Berlin?"], "Berlin time is {time_berlin}."),
        (&["London time?", "What time is it in London?"], "London time is {time_london}."),
        (&["LA time?", "What time is it in Los Angeles?"], "Los Angeles time is {time_los_angeles}."),
        (&["New York time?", "What time is it in New York?"], "New York time is {time_new_york}."),
        (&["Paris time?", "What time is it in Paris?"], "Paris time is {time_paris}."),
        (&["Singapore time?", "What time is it in Singapore?"], "Singapore time is {time_singapore}."),
        (&["Sydney time?", "What time is it in Sydney?"], "Sydney time is {time_sydney}."),
        (&["Tokyo time?", "What time is it in Tokyo?"], "Tokyo time is {time_tokyo}."),
        (&["Toronto time?", "What time is it in Toronto?"], "Toronto time is {time_toronto}."),
        (&["What is time in GMT+7?", "Time in UTC+7?"], "Time in GMT+7 is {time_gmt_plus_07_00}."),
    ];
    out.extend(simple.iter().map(|(phrases, response)| RuleRecord::new(phrases.iter().copied(), *response)));

    out.push(RuleRecord::new(
        ["Tell me all placeholders", "Show me the AI variables"],
        "Placeholders: {player_name}, {player_uuid}, {player_displayname}, {player_ip}, {player_gamemode}, \
         {player_health}, {player_max_health}, {player_food_level}, {player_exp_level}, {player_location}, \
         {player_world}, {item_in_hand}, {player_inventory}, {time_server}, {time_utc}, {time_gmt}, \
         {time_bangkok}, {time_berlin}, {time_london}, {time_los_angeles}, {time_new_york}, {time_paris}, \
         {time_singapore}, {time_sydney}, {time_tokyo}, {time_toronto}, {time_gmt_plus_07_00}",
    ));

    out
}

/// The default rule set rendered as a pretty-printed JSON document.
pub fn document() -> String {
    // Serializing plain strings cannot fail.
    serde_json::to_string_pretty(&records()).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_round_trips_to_the_same_records() {
        let parsed: Vec<RuleRecord> = serde_json::from_str(&document()).unwrap();
        assert_eq!(parsed, records());
    }

    #[test]
    fn every_record_has_phrases() {
        let recs = records();
        assert!(recs.len() > ENTITY_TYPES.len() * 2);
        assert!(recs.iter().all(|r| !r.match_phrases.is_empty()));
    }

    #[test]
    fn entity_count_phrases_use_the_response_plural() {
        let recs = records();
        for kind in ENTITY_TYPES {
            let placeholder = format!("{{nearby_{kind}_count}}");
            let rule = recs.iter().find(|r| r.response_template.contains(&placeholder)).unwrap();
            let prefix = format!("There are {placeholder} ");
            let plural = rule.response_template.trim_start_matches(&prefix).trim_end_matches(" near you.");
            assert_eq!(rule.match_phrases[0], format!("How many {plural} nearby?"));
        }
        let zombie = recs.iter().find(|r| r.response_template.contains("{nearby_zombie_count}")).unwrap();
        assert_eq!(zombie.match_phrases[0], "How many zombies nearby?");
    }

    #[test]
    fn covers_each_placeholder_category() {
        let all: String = records().iter().map(|r| r.response_template.as_str()).collect();
        for needle in ["{nearby_", "{player_", "{item_in_hand}", "{world_", "{time_utc}", "{time_tokyo}", "_plus_"] {
            assert!(all.contains(needle), "default document lacks {needle}");
        }
    }
}
