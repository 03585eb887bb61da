//! # Catalog Store
//!
//! The authoritative in-memory mixtape. The wire format is three arrays; the store
//! keeps id-keyed indexes for O(1) lookups and for referential integrity.
//!
//! ## Dual Representation
//!
//! - **Users and songs** are immutable after load. They are kept as the original
//!   ordered `Vec` (so output reproduces them verbatim) plus an id → position map.
//! - **Playlists** live only in a `BTreeMap` keyed by numeric id. The array form
//!   is rebuilt at serialization time, sorted by id.
//!
//! ## Identity
//!
//! Every id is a decimal string that must fit in a `u32`. Lookups are numeric,
//! so `"07"` and `"7"` name the same entity.
//!
//! ## Invariants
//!
//! After [`Catalog::from_mixtape`] and after every successful mutation:
//! - ids are unique per entity kind
//! - every playlist's `user_id` resolves to a user
//! - every playlist's `song_ids` resolve to songs, without repeats
//! - `next_playlist_id` is at least the largest playlist id ever seen

use crate::error::{CatalogError, MixtapeError, Result};
use crate::model::{Mixtape, Playlist, Song, User};
use crate::schema::{summarize, SchemaKind, SchemaValidator};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Upper bound on `song_ids` per playlist, shared with the input schema.
pub const MAX_PLAYLIST_SONGS: usize = 512;

/// Parse a catalog id: one or more ASCII digits, fitting in a `u32`.
pub fn parse_id(id: &str) -> Option<u32> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}

fn require_id(kind: &'static str, id: &str) -> std::result::Result<u32, CatalogError> {
    parse_id(id).ok_or_else(|| CatalogError::InvalidId {
        kind,
        id: id.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct Catalog {
    users: Vec<User>,
    songs: Vec<Song>,
    user_index: HashMap<u32, usize>,
    song_index: HashMap<u32, usize>,
    playlists: BTreeMap<u32, Playlist>,
    next_playlist_id: u32,
}

impl Catalog {
    /// Validate raw input bytes against the input schema and build the store.
    pub fn load(validator: &SchemaValidator, bytes: &[u8]) -> Result<Self> {
        if let Err(violations) = validator.validate(SchemaKind::Input, bytes) {
            for violation in &violations {
                debug!("input schema violation: {}", violation);
            }
            return Err(MixtapeError::InvalidInput(summarize(&violations)));
        }

        let mixtape: Mixtape = serde_json::from_slice(bytes)
            .map_err(|e| MixtapeError::InvalidInput(e.to_string()))?;
        let catalog =
            Self::from_mixtape(mixtape).map_err(|e| MixtapeError::InvalidInput(e.to_string()))?;

        info!(
            users = catalog.users.len(),
            songs = catalog.songs.len(),
            playlists = catalog.playlists.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Build the indexes from an already deserialized catalog.
    ///
    /// Checks run in a fixed order: users, songs, then playlists. For each
    /// record the numeric id is checked before uniqueness.
    pub fn from_mixtape(mixtape: Mixtape) -> std::result::Result<Self, CatalogError> {
        let Mixtape {
            users,
            playlists,
            songs,
        } = mixtape;

        let mut user_index = HashMap::with_capacity(users.len());
        for (pos, user) in users.iter().enumerate() {
            let id = require_id("User", &user.id)?;
            if user_index.insert(id, pos).is_some() {
                return Err(CatalogError::DuplicateUser(user.id.clone()));
            }
        }

        let mut song_index = HashMap::with_capacity(songs.len());
        for (pos, song) in songs.iter().enumerate() {
            let id = require_id("Song", &song.id)?;
            if song_index.insert(id, pos).is_some() {
                return Err(CatalogError::DuplicateSong(song.id.clone()));
            }
        }

        let mut catalog = Self {
            users,
            songs,
            user_index,
            song_index,
            playlists: BTreeMap::new(),
            next_playlist_id: 0,
        };

        for playlist in playlists {
            let id = require_id("Playlist", &playlist.id)?;
            if catalog.playlists.contains_key(&id) {
                return Err(CatalogError::DuplicatePlaylist(playlist.id));
            }
            catalog.check_references(&playlist)?;
            catalog.next_playlist_id = catalog.next_playlist_id.max(id);
            catalog.playlists.insert(id, playlist);
        }

        Ok(catalog)
    }

    /// The user must exist and every song must exist exactly once.
    fn check_references(&self, playlist: &Playlist) -> std::result::Result<(), CatalogError> {
        if self.user(&playlist.user_id).is_none() {
            return Err(CatalogError::DanglingUserRef(playlist.user_id.clone()));
        }

        let mut seen = Vec::with_capacity(playlist.song_ids.len());
        for song_id in &playlist.song_ids {
            let id = parse_id(song_id)
                .filter(|id| self.song_index.contains_key(id))
                .ok_or_else(|| CatalogError::DanglingSongRef(song_id.clone()))?;
            if seen.contains(&id) {
                return Err(CatalogError::SongAlreadyInPlaylist {
                    playlist: playlist.id.clone(),
                    song: song_id.clone(),
                });
            }
            seen.push(id);
        }
        Ok(())
    }

    /// Insert a new playlist, assigning it the next id.
    ///
    /// Whatever `id` the caller supplied is overwritten. Returns the new id.
    pub fn add_playlist(&mut self, mut playlist: Playlist) -> std::result::Result<u32, CatalogError> {
        self.check_references(&playlist)?;

        if self.next_playlist_id == u32::MAX {
            return Err(CatalogError::IdExhausted);
        }
        self.next_playlist_id += 1;

        let id = self.next_playlist_id;
        playlist.id = id.to_string();
        self.playlists.insert(id, playlist);
        Ok(id)
    }

    /// Delete a playlist. Users and songs are left untouched.
    pub fn remove_playlist(&mut self, playlist_id: &str) -> std::result::Result<Playlist, CatalogError> {
        parse_id(playlist_id)
            .and_then(|id| self.playlists.remove(&id))
            .ok_or_else(|| CatalogError::UnknownPlaylist(playlist_id.to_string()))
    }

    /// Append an existing song to an existing playlist.
    pub fn add_song_to_playlist(
        &mut self,
        playlist_id: &str,
        song_id: &str,
    ) -> std::result::Result<(), CatalogError> {
        let key = parse_id(playlist_id)
            .filter(|id| self.playlists.contains_key(id))
            .ok_or_else(|| CatalogError::UnknownPlaylist(playlist_id.to_string()))?;

        let song = parse_id(song_id)
            .filter(|id| self.song_index.contains_key(id))
            .ok_or_else(|| CatalogError::UnknownSong(song_id.to_string()))?;

        let Some(playlist) = self.playlists.get_mut(&key) else {
            return Err(CatalogError::UnknownPlaylist(playlist_id.to_string()));
        };
        if playlist.song_ids.iter().any(|s| parse_id(s) == Some(song)) {
            return Err(CatalogError::SongAlreadyInPlaylist {
                playlist: playlist_id.to_string(),
                song: song_id.to_string(),
            });
        }
        if playlist.song_ids.len() >= MAX_PLAYLIST_SONGS {
            return Err(CatalogError::PlaylistFull(playlist_id.to_string()));
        }

        playlist.song_ids.push(song_id.to_string());
        Ok(())
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        parse_id(id)
            .and_then(|id| self.user_index.get(&id))
            .map(|&pos| &self.users[pos])
    }

    pub fn song(&self, id: &str) -> Option<&Song> {
        parse_id(id)
            .and_then(|id| self.song_index.get(&id))
            .map(|&pos| &self.songs[pos])
    }

    pub fn playlist(&self, id: &str) -> Option<&Playlist> {
        parse_id(id).and_then(|id| self.playlists.get(&id))
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Playlists in ascending numeric id order.
    pub fn playlists(&self) -> impl Iterator<Item = &Playlist> {
        self.playlists.values()
    }

    pub fn playlist_count(&self) -> usize {
        self.playlists.len()
    }

    /// The id most recently allocated, or the largest loaded id.
    pub fn last_playlist_id(&self) -> u32 {
        self.next_playlist_id
    }

    /// Rebuild the wire shape.
    pub fn to_mixtape(&self) -> Mixtape {
        Mixtape {
            users: self.users.clone(),
            playlists: self.playlists.values().cloned().collect(),
            songs: self.songs.clone(),
        }
    }

    /// Pretty-printed JSON, two-space indent.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.to_mixtape())?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    pub(crate) fn sample_mixtape() -> Mixtape {
        Mixtape {
            users: vec![
                User {
                    id: "1".into(),
                    name: "Albin Jaye".into(),
                },
                User {
                    id: "2".into(),
                    name: "Dipika Crescentia".into(),
                },
            ],
            playlists: vec![Playlist {
                id: "3".into(),
                user_id: "1".into(),
                song_ids: vec!["10".into()],
            }],
            songs: ["10", "11", "12"]
                .iter()
                .map(|id| Song {
                    id: id.to_string(),
                    artist: format!("Artist {}", id),
                    title: format!("Title {}", id),
                })
                .collect(),
        }
    }

    fn sample() -> Catalog {
        Catalog::from_mixtape(sample_mixtape()).unwrap()
    }

    fn strings(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_id_accepts_only_digits() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("007"), Some(7));
        assert_eq!(parse_id("4294967295"), Some(u32::MAX));
        assert_eq!(parse_id("4294967296"), None);
        assert_eq!(parse_id("+4"), None);
        assert_eq!(parse_id("-1"), None);
        assert_eq!(parse_id("x"), None);
        assert_eq!(parse_id(""), None);
    }

    #[test]
    fn test_load_seeds_generator_from_max_id() {
        let mut mixtape = sample_mixtape();
        mixtape.playlists.push(Playlist {
            id: "9".into(),
            user_id: "2".into(),
            song_ids: strings(&["11"]),
        });
        let catalog = Catalog::from_mixtape(mixtape).unwrap();
        assert_eq!(catalog.last_playlist_id(), 9);
        assert_eq!(catalog.playlist_count(), 2);
    }

    #[test]
    fn test_load_empty_catalog() {
        let catalog = Catalog::from_mixtape(Mixtape::default()).unwrap();
        assert_eq!(catalog.last_playlist_id(), 0);
        assert_eq!(catalog.playlist_count(), 0);
    }

    #[test]
    fn test_load_rejects_non_numeric_user() {
        let mut mixtape = sample_mixtape();
        mixtape.users[0].id = "abc".into();
        assert_eq!(
            Catalog::from_mixtape(mixtape).unwrap_err(),
            CatalogError::InvalidId {
                kind: "User",
                id: "abc".into()
            }
        );
    }

    #[test]
    fn test_load_checks_numeric_before_duplicate() {
        let mut mixtape = sample_mixtape();
        mixtape.songs[1].id = "x".into();
        mixtape.songs[2].id = "x".into();
        assert!(matches!(
            Catalog::from_mixtape(mixtape),
            Err(CatalogError::InvalidId { kind: "Song", .. })
        ));
    }

    #[test]
    fn test_load_rejects_duplicate_users() {
        let mut mixtape = sample_mixtape();
        mixtape.users[1].id = "01".into();
        assert_eq!(
            Catalog::from_mixtape(mixtape).unwrap_err(),
            CatalogError::DuplicateUser("01".into())
        );
    }

    #[test]
    fn test_load_rejects_duplicate_songs() {
        let mut mixtape = sample_mixtape();
        mixtape.songs[2].id = "10".into();
        assert_eq!(
            Catalog::from_mixtape(mixtape).unwrap_err(),
            CatalogError::DuplicateSong("10".into())
        );
    }

    #[test]
    fn test_load_rejects_duplicate_playlists() {
        let mut mixtape = sample_mixtape();
        mixtape.playlists.push(mixtape.playlists[0].clone());
        assert_eq!(
            Catalog::from_mixtape(mixtape).unwrap_err(),
            CatalogError::DuplicatePlaylist("3".into())
        );
    }

    #[test]
    fn test_load_rejects_dangling_user() {
        let mut mixtape = sample_mixtape();
        mixtape.playlists[0].user_id = "99".into();
        assert_eq!(
            Catalog::from_mixtape(mixtape).unwrap_err(),
            CatalogError::DanglingUserRef("99".into())
        );
    }

    #[test]
    fn test_load_rejects_dangling_song() {
        let mut mixtape = sample_mixtape();
        mixtape.playlists[0].song_ids.push("999".into());
        assert_eq!(
            Catalog::from_mixtape(mixtape).unwrap_err(),
            CatalogError::DanglingSongRef("999".into())
        );
    }

    #[test]
    fn test_load_rejects_same_song_spelled_twice() {
        let mut mixtape = sample_mixtape();
        mixtape.playlists[0].song_ids = strings(&["10", "010"]);
        assert!(matches!(
            Catalog::from_mixtape(mixtape),
            Err(CatalogError::SongAlreadyInPlaylist { .. })
        ));
    }

    #[test]
    fn test_add_playlist_assigns_next_id() {
        let mut catalog = sample();
        let mut playlist = Playlist::new("2", strings(&["11", "12"]));
        playlist.id = "ignored".into();

        let id = catalog.add_playlist(playlist).unwrap();
        assert_eq!(id, 4);

        let stored = catalog.playlist("4").unwrap();
        assert_eq!(stored.id, "4");
        assert_eq!(stored.user_id, "2");
        assert_eq!(stored.song_ids, strings(&["11", "12"]));
    }

    #[test]
    fn test_add_playlist_rejects_dangling_refs() {
        let mut catalog = sample();
        assert_eq!(
            catalog.add_playlist(Playlist::new("99", strings(&["10"]))),
            Err(CatalogError::DanglingUserRef("99".into()))
        );
        assert_eq!(
            catalog.add_playlist(Playlist::new("1", strings(&["10", "404"]))),
            Err(CatalogError::DanglingSongRef("404".into()))
        );
        // Failed adds do not consume ids.
        assert_eq!(catalog.last_playlist_id(), 3);
        assert_eq!(catalog.playlist_count(), 1);
    }

    #[test]
    fn test_add_playlist_fails_when_ids_run_out() {
        let mut mixtape = sample_mixtape();
        mixtape.playlists[0].id = u32::MAX.to_string();
        let mut catalog = Catalog::from_mixtape(mixtape).unwrap();

        assert_eq!(
            catalog.add_playlist(Playlist::new("1", strings(&["10"]))),
            Err(CatalogError::IdExhausted)
        );
    }

    #[test]
    fn test_removed_id_is_not_reused() {
        let mut catalog = sample();
        catalog.remove_playlist("3").unwrap();
        let id = catalog.add_playlist(Playlist::new("1", strings(&["10"]))).unwrap();
        assert_eq!(id, 4);
    }

    #[test]
    fn test_remove_playlist_keeps_songs() {
        let mut catalog = sample();
        let removed = catalog.remove_playlist("3").unwrap();
        assert_eq!(removed.song_ids, strings(&["10"]));
        assert!(catalog.song("10").is_some());
        assert!(catalog.user("1").is_some());
        assert_eq!(catalog.playlist_count(), 0);
    }

    #[test]
    fn test_remove_unknown_playlist() {
        let mut catalog = sample();
        assert_eq!(
            catalog.remove_playlist("8"),
            Err(CatalogError::UnknownPlaylist("8".into()))
        );
        assert_eq!(
            catalog.remove_playlist("99999999999"),
            Err(CatalogError::UnknownPlaylist("99999999999".into()))
        );
    }

    #[test]
    fn test_add_song_appends() {
        let mut catalog = sample();
        catalog.add_song_to_playlist("3", "12").unwrap();
        assert_eq!(catalog.playlist("3").unwrap().song_ids, strings(&["10", "12"]));
    }

    #[test]
    fn test_add_song_errors() {
        let mut catalog = sample();
        assert_eq!(
            catalog.add_song_to_playlist("7", "12"),
            Err(CatalogError::UnknownPlaylist("7".into()))
        );
        assert_eq!(
            catalog.add_song_to_playlist("3", "999"),
            Err(CatalogError::UnknownSong("999".into()))
        );
        assert_eq!(
            catalog.add_song_to_playlist("3", "10"),
            Err(CatalogError::SongAlreadyInPlaylist {
                playlist: "3".into(),
                song: "10".into()
            })
        );
        assert_eq!(catalog.playlist("3").unwrap().song_ids, strings(&["10"]));
    }

    #[test]
    fn test_add_song_respects_capacity() {
        let songs: Vec<Song> = (1..=(MAX_PLAYLIST_SONGS as u32 + 1))
            .map(|i| Song {
                id: i.to_string(),
                artist: "A".into(),
                title: "T".into(),
            })
            .collect();
        let mixtape = Mixtape {
            users: vec![User {
                id: "1".into(),
                name: "U".into(),
            }],
            playlists: vec![Playlist {
                id: "1".into(),
                user_id: "1".into(),
                song_ids: (1..=MAX_PLAYLIST_SONGS).map(|i| i.to_string()).collect(),
            }],
            songs,
        };
        let mut catalog = Catalog::from_mixtape(mixtape).unwrap();
        let last = (MAX_PLAYLIST_SONGS + 1).to_string();
        assert_eq!(
            catalog.add_song_to_playlist("1", &last),
            Err(CatalogError::PlaylistFull("1".into()))
        );
    }

    #[test]
    fn test_serialize_is_pretty_and_sorted() {
        let mut catalog = sample();
        catalog
            .add_playlist(Playlist::new("2", strings(&["11"])))
            .unwrap();

        let bytes = catalog.serialize().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("{\n  \"users\": [\n    {\n"));

        let back: Mixtape = serde_json::from_str(&text).unwrap();
        let ids: Vec<&str> = back.playlists.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "4"]);
        assert_eq!(back.users, sample_mixtape().users);
        assert_eq!(back.songs, sample_mixtape().songs);
    }

    #[test]
    fn test_mutations_leave_users_and_songs_alone() {
        let mut catalog = sample();
        catalog
            .add_playlist(Playlist::new("2", strings(&["11", "12"])))
            .unwrap();
        catalog.add_song_to_playlist("3", "12").unwrap();
        catalog.remove_playlist("3").unwrap();

        let original = sample_mixtape();
        assert_eq!(catalog.users(), original.users.as_slice());
        assert_eq!(catalog.songs(), original.songs.as_slice());
    }

    #[test]
    fn test_load_validates_schema_first() {
        let validator = SchemaValidator::new().unwrap();
        let err = Catalog::load(&validator, br#"{"users":[]}"#).unwrap_err();
        assert!(matches!(err, MixtapeError::InvalidInput(_)));

        let err = Catalog::load(
            &validator,
            br#"{"users":[{"id":"1","name":"a"}],"songs":[],
                "playlists":[{"id":"1","user_id":"2","song_ids":["1"]}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("User ID 2 does not exist"));
    }

    #[derive(Debug, Clone)]
    enum Mutation {
        Add { user: u8, songs: Vec<u8> },
        Remove(u8),
        Append { playlist: u8, song: u8 },
    }

    fn mutation() -> impl Strategy<Value = Mutation> {
        prop_oneof![
            (0u8..4, proptest::collection::vec(9u8..14, 1..4))
                .prop_map(|(user, songs)| Mutation::Add { user, songs }),
            (0u8..10).prop_map(Mutation::Remove),
            (0u8..10, 9u8..14).prop_map(|(playlist, song)| Mutation::Append { playlist, song }),
        ]
    }

    fn apply(catalog: &mut Catalog, m: &Mutation) {
        match m {
            Mutation::Add { user, songs } => {
                let mut ids: Vec<String> = songs.iter().map(|s| s.to_string()).collect();
                ids.dedup();
                let _ = catalog.add_playlist(Playlist::new(user.to_string(), ids));
            }
            Mutation::Remove(id) => {
                let _ = catalog.remove_playlist(&id.to_string());
            }
            Mutation::Append { playlist, song } => {
                let _ = catalog.add_song_to_playlist(&playlist.to_string(), &song.to_string());
            }
        }
    }

    fn assert_integrity(catalog: &Catalog) {
        for playlist in catalog.playlists() {
            assert!(catalog.user(&playlist.user_id).is_some());
            let mut seen = Vec::new();
            for song in &playlist.song_ids {
                assert!(catalog.song(song).is_some());
                let id = parse_id(song).unwrap();
                assert!(!seen.contains(&id));
                seen.push(id);
            }
        }
    }

    proptest! {
        #[test]
        fn test_integrity_holds_after_any_mutations(ms in proptest::collection::vec(mutation(), 0..30)) {
            let mut catalog = sample();
            for m in &ms {
                apply(&mut catalog, m);
                assert_integrity(&catalog);
            }
        }

        #[test]
        fn test_new_ids_exceed_all_existing(ms in proptest::collection::vec(mutation(), 0..30)) {
            let mut catalog = sample();
            for m in &ms {
                let before: Vec<u32> = catalog
                    .playlists()
                    .map(|p| parse_id(&p.id).unwrap())
                    .collect();
                if let Mutation::Add { user, songs } = m {
                    let mut ids: Vec<String> = songs.iter().map(|s| s.to_string()).collect();
                    ids.dedup();
                    if let Ok(id) = catalog.add_playlist(Playlist::new(user.to_string(), ids)) {
                        prop_assert!(before.iter().all(|&b| id > b));
                    }
                } else {
                    apply(&mut catalog, m);
                }
            }
        }

        #[test]
        fn test_second_remove_fails(id in 0u8..10) {
            let mut catalog = sample();
            let key = id.to_string();
            let _ = catalog.remove_playlist(&key);
            prop_assert_eq!(
                catalog.remove_playlist(&key),
                Err(CatalogError::UnknownPlaylist(key.clone()))
            );
        }
    }
}
