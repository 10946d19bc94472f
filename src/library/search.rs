use super::Track;

/// Indices of tracks whose `Artist - Title` contains `query`, ignoring case.
pub fn search(tracks: &[Track], query: &str) -> Vec<usize> {
    let query = query.trim().to_lowercase();
    tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.display_name().to_lowercase().contains(&query))
        .map(|(i, _)| i)
        .collect()
}
