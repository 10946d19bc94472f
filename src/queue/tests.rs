use std::collections::HashSet;

use super::*;

fn tracks(n: u32) -> Vec<Track> {
    (1..=n)
        .map(|id| {
            let mut t = Track::new("Artist", format!("Song {id}"), format!("/songs/{id}.mp3"));
            t.id = id;
            t
        })
        .collect()
}

fn queue_of(n: u32) -> Queue {
    let mut q = Queue::new();
    q.replace(tracks(n), QueueSource::AllSongs);
    q
}

#[test]
fn first_next_starts_at_the_top() {
    let mut q = queue_of(3);
    assert_eq!(q.current_index(), None);
    let adv = q.advance_next().unwrap();
    assert_eq!(adv.index, 0);
    assert!(!adv.wrapped);
    assert_eq!(q.current().map(|t| t.id), Some(1));
}

#[test]
fn linear_next_wraps_back_to_start_after_len_steps() {
    for n in 1..=6 {
        for start in 0..n as usize {
            let mut q = queue_of(n);
            q.select(start).unwrap();
            for _ in 0..n {
                q.advance_next().unwrap();
            }
            assert_eq!(q.current_index(), Some(start), "n={n} start={start}");
        }
    }
}

#[test]
fn linear_next_reports_wrap_at_the_end() {
    let mut q = queue_of(3);
    q.select(2).unwrap();
    let adv = q.advance_next().unwrap();
    assert_eq!(adv.index, 0);
    assert!(adv.wrapped);
}

#[test]
fn linear_prev_wraps_to_last() {
    let mut q = queue_of(4);
    q.select(0).unwrap();
    let adv = q.advance_prev().unwrap();
    assert_eq!(adv.index, 3);
    assert!(adv.wrapped);

    let adv = q.advance_prev().unwrap();
    assert_eq!(adv.index, 2);
    assert!(!adv.wrapped);
}

#[test]
fn empty_queue_rejects_advance_and_keeps_cursor_unset() {
    let mut q = Queue::new();
    assert!(matches!(q.advance_next(), Err(PlayerError::EmptyQueue)));
    assert!(matches!(q.advance_prev(), Err(PlayerError::EmptyQueue)));
    assert_eq!(q.current_index(), None);

    q.set_random(true);
    assert!(matches!(q.advance_next(), Err(PlayerError::EmptyQueue)));
    assert_eq!(q.current_index(), None);

    assert!(matches!(q.select(0), Err(PlayerError::EmptyQueue)));
    assert_eq!(q.current_index(), None);
}

#[test]
fn select_out_of_range_changes_nothing() {
    let mut q = queue_of(2);
    q.select(1).unwrap();
    let err = q.select(2).unwrap_err();
    assert!(matches!(err, PlayerError::InvalidIndex { index: 2, len: 2 }));
    assert_eq!(err.to_string(), "invalid song index 3 (valid range is 1-2)");
    assert_eq!(q.current_index(), Some(1));
}

#[test]
fn random_next_visits_every_index_once_per_permutation() {
    for n in [1u32, 2, 5, 17] {
        let mut q = queue_of(n);
        q.set_random(true);

        let seen: HashSet<usize> = (0..n)
            .map(|_| {
                let adv = q.advance_next().unwrap();
                assert!(!adv.reshuffled);
                adv.index
            })
            .collect();
        assert_eq!(seen.len(), n as usize);

        // The next step begins a fresh permutation.
        assert!(q.advance_next().unwrap().reshuffled);
    }
}

#[test]
fn random_cursor_follows_its_permutation() {
    let mut cursor = RandomCursor::from_order(vec![2, 0, 3, 1]);
    let picked: Vec<usize> = (0..4).map(|_| cursor.next().index).collect();
    assert_eq!(picked, vec![2, 0, 3, 1]);
    assert_eq!(cursor.position(), Some(3));
}

#[test]
fn random_prev_wraps_without_reshuffling() {
    let mut cursor = RandomCursor::from_order(vec![2, 0, 3, 1]);
    cursor.sync_to(2);
    assert_eq!(cursor.position(), Some(0));

    let adv = cursor.prev();
    assert_eq!(adv.index, 1);
    assert!(adv.wrapped);
    assert!(!adv.reshuffled);
    assert_eq!(cursor.order(), &[2, 0, 3, 1]);
}

#[test]
fn random_reshuffle_keeps_a_full_permutation() {
    let mut cursor = RandomCursor::from_order(vec![1, 0, 2]);
    cursor.sync_to(2);
    let adv = cursor.next();
    assert!(adv.reshuffled);
    assert_eq!(cursor.position(), Some(0));

    let mut order = cursor.order().to_vec();
    order.sort_unstable();
    assert_eq!(order, vec![0, 1, 2]);
}

#[test]
fn enabling_random_keeps_the_playing_track() {
    let mut q = queue_of(8);
    q.select(5).unwrap();
    q.set_random(true);

    assert_eq!(q.current_index(), Some(5));
    let cursor = q.random.as_ref().unwrap();
    let slot = cursor.position().unwrap();
    assert_eq!(cursor.order()[slot], 5);
}

#[test]
fn select_in_random_mode_resyncs_cursor() {
    let mut q = queue_of(6);
    q.set_random(true);
    q.select(4).unwrap();

    let cursor = q.random.as_ref().unwrap();
    assert_eq!(cursor.order()[cursor.position().unwrap()], 4);
}

#[test]
fn replacing_the_queue_resets_cursor_and_permutation() {
    let mut q = queue_of(4);
    q.set_random(true);
    q.advance_next().unwrap();

    q.replace(tracks(2), QueueSource::Playlist("chill".into()));
    assert_eq!(q.current_index(), None);
    assert_eq!(q.playlist_name(), Some("chill"));
    let cursor = q.random.as_ref().unwrap();
    assert_eq!(cursor.order().len(), 2);
    assert_eq!(cursor.position(), None);
}

#[test]
fn toggle_random_off_returns_to_linear_order() {
    let mut q = queue_of(3);
    assert!(q.toggle_random());
    q.select(1).unwrap();
    assert!(!q.toggle_random());
    assert_eq!(q.advance_next().unwrap().index, 2);
}

#[test]
fn duplicate_tracks_are_distinct_slots() {
    let mut q = Queue::new();
    let t = Track::new("A", "Same", "/a.mp3");
    q.replace(vec![t.clone(), t], QueueSource::AllSongs);
    assert_eq!(q.advance_next().unwrap().index, 0);
    assert_eq!(q.advance_next().unwrap().index, 1);
}
