//! Fixed MusicBrainz identifier tables

/// Work types as (id, name)
pub const WORK_TYPES: &[(u32, &str)] = &[
    (1, "Aria"),
    (2, "Ballet"),
    (3, "Cantata"),
    (4, "Concerto"),
    (5, "Sonata"),
    (6, "Suite"),
    (7, "Madrigal"),
    (8, "Mass"),
    (9, "Motet"),
    (10, "Opera"),
    (11, "Oratorio"),
    (12, "Overture"),
    (13, "Partita"),
    (14, "Quartet"),
    (15, "Song-cycle"),
    (16, "Symphony"),
    (17, "Song"),
    (18, "Symphonic poem"),
    (19, "Zarzuela"),
    (20, "Étude"),
];

/// Relationship link types as (source entity, target entity, name, link type id)
pub const RELATIONSHIP_TYPES: &[(&str, &str, &str, u32)] = &[("artist", "work", "composer", 168), ("artist", "work", "lyricist", 165)];

pub fn work_type_name(id: u32) -> Option<&'static str> {
    WORK_TYPES.iter().find(|(i, _)| *i == id).map(|(_, name)| *name)
}

pub fn work_type_id(name: &str) -> Option<u32> {
    WORK_TYPES.iter().find(|(_, n)| *n == name).map(|(id, _)| *id)
}

/// Link type id for a relationship, e.g. `("artist", "work", "composer")`
pub fn relationship_type_id(source: &str, target: &str, name: &str) -> Option<u32> {
    RELATIONSHIP_TYPES
        .iter()
        .find(|(s, t, n, _)| *s == source && *t == target && *n == name)
        .map(|(_, _, _, id)| *id)
}
