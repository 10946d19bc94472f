use std::time::Duration;

use super::*;

fn song(artist: &str, title: &str) -> Track {
    Track::new(artist, title, format!("/songs/{artist}/{title}.mp3"))
}

#[test]
fn create_rejects_duplicate_names() {
    let mut reg = PlaylistRegistry::new();
    reg.create("gym").unwrap();
    assert!(matches!(reg.create("gym"), Err(PlayerError::PlaylistExists(n)) if n == "gym"));
    assert_eq!(reg.len(), 1);
}

#[test]
fn names_are_sorted() {
    let mut reg = PlaylistRegistry::new();
    for name in ["zeta", "alpha", "mid"] {
        reg.create(name).unwrap();
    }
    assert_eq!(reg.names().collect::<Vec<_>>(), vec!["alpha", "mid", "zeta"]);
}

#[test]
fn missing_playlist_is_reported() {
    let mut reg = PlaylistRegistry::new();
    assert!(matches!(reg.get("x"), Err(PlayerError::PlaylistNotFound(_))));
    assert!(matches!(reg.delete("x"), Err(PlayerError::PlaylistNotFound(_))));
    assert!(matches!(
        reg.add("x", song("a", "b")),
        Err(PlayerError::PlaylistNotFound(_))
    ));
    assert!(matches!(reg.remove("x", 0), Err(PlayerError::PlaylistNotFound(_))));
}

#[test]
fn remove_returns_the_track_and_validates_index() {
    let mut reg = PlaylistRegistry::new();
    reg.create("p").unwrap();
    reg.add("p", song("A", "One")).unwrap();
    reg.add("p", song("B", "Two")).unwrap();

    assert!(matches!(
        reg.remove("p", 2),
        Err(PlayerError::InvalidIndex { index: 2, len: 2 })
    ));
    let removed = reg.remove("p", 0).unwrap();
    assert_eq!(removed.title, "One");
    assert_eq!(reg.get("p").unwrap().tracks, vec![song("B", "Two")]);
}

#[test]
fn parse_reads_blocks_and_skips_junk() {
    let text = "\
stray|line|outside
[PLAYLIST]night
Camellia|Exit This Earth's Atomosphere|/s/1/audio.mp3
broken line
[END]
[PLAYLIST]empty
[END]
[PLAYLIST]night
ForeverBound|Stereo Madness|C:\\GD\\500476.mp3
[END]
";
    let reg = parse(text);
    assert_eq!(reg.names().collect::<Vec<_>>(), vec!["empty", "night"]);
    let night = reg.get("night").unwrap();
    assert_eq!(night.len(), 2);
    assert_eq!(night.tracks[0].artist, "Camellia");
    assert_eq!(night.tracks[1].path.to_string_lossy(), "C:\\GD\\500476.mp3");
    assert!(reg.get("empty").unwrap().is_empty());
}

#[test]
fn path_may_contain_the_separator() {
    let reg = parse("[PLAYLIST]p\nA|T|/odd|dir/a.mp3\n[END]\n");
    let t = &reg.get("p").unwrap().tracks[0];
    assert_eq!(t.path.to_string_lossy(), "/odd|dir/a.mp3");
}

#[test]
fn render_matches_file_format() {
    let mut reg = PlaylistRegistry::new();
    reg.create("b").unwrap();
    reg.create("a").unwrap();
    reg.add("a", Track::new("Art", "Song", "/x/y.mp3")).unwrap();

    assert_eq!(render(&reg), "[PLAYLIST]a\nArt|Song|/x/y.mp3\n[END]\n[PLAYLIST]b\n[END]\n");
}

#[test]
fn save_then_load_restores_playlists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("playlists.txt");

    let mut reg = PlaylistRegistry::new();
    reg.create("mix").unwrap();
    reg.add("mix", song("A", "One")).unwrap();
    save(&path, &reg).unwrap();

    let loaded = load(&path).unwrap();
    assert_eq!(loaded.get("mix").unwrap(), reg.get("mix").unwrap());
}

#[test]
fn loading_a_missing_file_gives_an_empty_registry() {
    let dir = tempfile::tempdir().unwrap();
    let reg = load(&dir.path().join("none.txt")).unwrap();
    assert!(reg.is_empty());
}

#[test]
fn resolve_against_recovers_ids_from_the_catalog() {
    let mut known = song("A", "One");
    known.id = 7;
    known.duration = Some(Duration::from_secs(90));

    let mut reg = PlaylistRegistry::new();
    reg.create("p").unwrap();
    reg.add("p", Track::new("A", "One", "/moved/elsewhere.mp3")).unwrap();
    reg.add("p", song("Gone", "Missing")).unwrap();

    let unmatched = reg.resolve_against(&[known]);
    assert_eq!(unmatched, 1);
    let tracks = &reg.get("p").unwrap().tracks;
    assert_eq!(tracks[0].id, 7);
    assert_eq!(tracks[0].duration, Some(Duration::from_secs(90)));
    assert_eq!(tracks[0].path.to_string_lossy(), "/moved/elsewhere.mp3");
    assert_eq!(tracks[1].id, 0);
}
