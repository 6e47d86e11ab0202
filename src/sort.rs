use std::cmp::Ordering;

use crate::models::Hit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    None,
    Title,
    Author,
    Comments,
    Points,
}

impl SortKey {
    // Sortable columns in header order
    pub const COLUMNS: [SortKey; 4] = [SortKey::Title, SortKey::Author, SortKey::Comments, SortKey::Points];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::None => "",
            SortKey::Title => "Title",
            SortKey::Author => "Author",
            SortKey::Comments => "Comments",
            SortKey::Points => "Points",
        }
    }

    fn is_numeric(self) -> bool {
        matches!(self, SortKey::Comments | SortKey::Points)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Up,
    Down,
}

impl Arrow {
    pub fn glyph(self) -> &'static str {
        match self {
            Arrow::Up => "⏶",
            Arrow::Down => "⏷",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: SortKey,
    pub reversed: bool,
}

impl SortState {
    /// Same key flips the direction, a different key starts unreversed.
    pub fn toggle(&mut self, key: SortKey) {
        self.reversed = key == self.key && !self.reversed;
        self.key = key;
    }

    pub fn apply(&self, hits: &[Hit]) -> Vec<Hit> {
        let mut sorted = sort_hits(self.key, hits);
        if self.reversed {
            sorted.reverse();
        }
        sorted
    }

    pub fn arrow_for(&self, column: SortKey) -> Option<Arrow> {
        if column != self.key || column == SortKey::None {
            return None;
        }

        let arrow = match (column.is_numeric(), self.reversed) {
            (true, false) | (false, true) => Arrow::Up,
            (true, true) | (false, false) => Arrow::Down,
        };
        Some(arrow)
    }
}

/// Sorts a copy of `hits` by `key`. `Vec::sort_by` is stable, so ties keep arrival order.
pub fn sort_hits(key: SortKey, hits: &[Hit]) -> Vec<Hit> {
    let mut sorted = hits.to_vec();
    match key {
        SortKey::None => {}
        SortKey::Title => sorted.sort_by(|a, b| ascending(&a.title, &b.title)),
        SortKey::Author => sorted.sort_by(|a, b| ascending(&a.author, &b.author)),
        SortKey::Comments => sorted.sort_by(|a, b| descending(a.num_comments, b.num_comments)),
        SortKey::Points => sorted.sort_by(|a, b| descending(a.points, b.points)),
    }
    sorted
}

// Missing values go last for text, first for counts.
fn ascending(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn descending(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str, title: &str, author: &str, comments: i64, points: i64) -> Hit {
        Hit {
            object_id: id.to_string(),
            title: Some(title.to_string()),
            url: None,
            author: Some(author.to_string()),
            num_comments: Some(comments),
            points: Some(points),
            created_at: None,
        }
    }

    fn ids(hits: &[Hit]) -> Vec<&str> {
        hits.iter().map(|h| h.object_id.as_str()).collect()
    }

    fn sample() -> Vec<Hit> {
        vec![
            hit("a", "Zig", "carol", 3, 10),
            hit("b", "Alpha", "alice", 7, 5),
            hit("c", "Mojo", "bob", 3, 20),
            hit("d", "Alpha", "dave", 1, 5),
        ]
    }

    #[test]
    fn none_keeps_arrival_order() {
        assert_eq!(ids(&sort_hits(SortKey::None, &sample())), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn text_keys_sort_ascending_and_stable() {
        assert_eq!(ids(&sort_hits(SortKey::Title, &sample())), vec!["b", "d", "c", "a"]);
        assert_eq!(ids(&sort_hits(SortKey::Author, &sample())), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn numeric_keys_sort_descending_and_stable() {
        assert_eq!(ids(&sort_hits(SortKey::Comments, &sample())), vec!["b", "a", "c", "d"]);
        assert_eq!(ids(&sort_hits(SortKey::Points, &sample())), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn reversed_is_end_to_end_reverse_of_sorted() {
        let state = SortState { key: SortKey::Points, reversed: true };
        // Ties stay in mirrored order rather than being re-sorted ascending
        assert_eq!(ids(&state.apply(&sample())), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn missing_text_sorts_last() {
        let mut hits = sample();
        hits[1].title = None;
        assert_eq!(ids(&sort_hits(SortKey::Title, &hits)), vec!["d", "c", "a", "b"]);
    }

    #[test]
    fn missing_counts_sort_first() {
        let mut hits = sample();
        hits[0].points = None;
        assert_eq!(ids(&sort_hits(SortKey::Points, &hits)), vec!["a", "c", "b", "d"]);

        hits[2].num_comments = None;
        hits[3].num_comments = None;
        assert_eq!(ids(&sort_hits(SortKey::Comments, &hits)), vec!["c", "d", "b", "a"]);

        // Reversed, they end up at the bottom
        let state = SortState { key: SortKey::Points, reversed: true };
        assert_eq!(ids(&state.apply(&hits)), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn reversing_twice_restores_order() {
        for key in SortKey::COLUMNS {
            let once = SortState { key, reversed: true }.apply(&sample());
            let mut twice = once.clone();
            twice.reverse();
            twice.reverse();
            assert_eq!(once, twice);

            let mut back = once;
            back.reverse();
            assert_eq!(back, SortState { key, reversed: false }.apply(&sample()));
        }
    }

    #[test]
    fn toggle_flips_same_key_and_resets_on_new_key() {
        let mut state = SortState::default();
        assert_eq!(state, SortState { key: SortKey::None, reversed: false });

        state.toggle(SortKey::Points);
        assert_eq!(state, SortState { key: SortKey::Points, reversed: false });
        state.toggle(SortKey::Points);
        assert!(state.reversed);
        state.toggle(SortKey::Points);
        assert!(!state.reversed);

        state.toggle(SortKey::Points);
        state.toggle(SortKey::Title);
        assert_eq!(state, SortState { key: SortKey::Title, reversed: false });
    }

    #[test]
    fn arrows_follow_column_direction() {
        let mut state = SortState::default();
        assert_eq!(state.arrow_for(SortKey::Title), None);

        state.toggle(SortKey::Title);
        assert_eq!(state.arrow_for(SortKey::Title), Some(Arrow::Down));
        assert_eq!(state.arrow_for(SortKey::Points), None);
        state.toggle(SortKey::Title);
        assert_eq!(state.arrow_for(SortKey::Title), Some(Arrow::Up));

        state.toggle(SortKey::Comments);
        assert_eq!(state.arrow_for(SortKey::Comments), Some(Arrow::Up));
        state.toggle(SortKey::Comments);
        assert_eq!(state.arrow_for(SortKey::Comments), Some(Arrow::Down));
    }
}
