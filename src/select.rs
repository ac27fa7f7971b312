use movie_db::Movie;

/// The kind a candidate must have to be considered at all.
pub const MOVIE_KIND: &str = "movie";

/// The number of leading movie candidates that are compared against the
/// query.
///
/// Candidates ranked lower by the database are never chosen, even when their
/// title is a closer match.
pub const MATCH_WINDOW: usize = 2;

/// A search result that can take part in best match selection.
pub trait Candidate {
    /// The classifier of this candidate, e.g., `movie` or `tv series`.
    fn kind(&self) -> &str;

    /// The title of this candidate, if it has one.
    fn title(&self) -> Option<&str>;
}

impl Candidate for Movie {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

/// A candidate together with its edit distance from a query.
#[derive(Debug)]
pub struct Ranked<'a, T> {
    candidate: &'a T,
    distance: usize,
}

// Derived impls would require `T: Clone`, which we don't need since we only
// hold a reference.
impl<'a, T> Clone for Ranked<'a, T> {
    fn clone(&self) -> Ranked<'a, T> {
        Ranked { candidate: self.candidate, distance: self.distance }
    }
}

impl<'a, T> Copy for Ranked<'a, T> {}

impl<'a, T> Ranked<'a, T> {
    /// Return the candidate that was ranked.
    pub fn candidate(&self) -> &'a T {
        self.candidate
    }

    /// Return the Levenshtein distance between the lowercased query and the
    /// lowercased title of this candidate.
    pub fn distance(&self) -> usize {
        self.distance
    }
}

/// Rank the candidates that best match selection looks at.
///
/// These are the first `MATCH_WINDOW` candidates whose kind is exactly
/// `movie`, in their original order. Each is paired with the edit distance
/// between the lowercased query and its lowercased title, where a missing
/// title counts as the empty string.
pub fn rank_window<'a, T: Candidate>(
    query: &str,
    candidates: &'a [T],
) -> Vec<Ranked<'a, T>> {
    let query = query.to_lowercase();
    candidates
        .iter()
        .filter(|c| c.kind() == MOVIE_KIND)
        .take(MATCH_WINDOW)
        .map(|candidate| {
            let title = candidate.title().unwrap_or("").to_lowercase();
            let distance = strsim::levenshtein(&query, &title);
            log::debug!("distance({:?}, {:?}) = {}", query, title, distance);
            Ranked { candidate, distance }
        })
        .collect()
}

/// Choose the best match for `query` among `candidates`.
///
/// The winner is the candidate in `rank_window` with the smallest distance.
/// When two candidates are equally close, the one that comes first wins.
///
/// If there are no movie candidates, then `None` is returned.
pub fn select_best<'a, T: Candidate>(
    query: &str,
    candidates: &'a [T],
) -> Option<Ranked<'a, T>> {
    // `min_by_key` returns the first of several equal minimums.
    rank_window(query, candidates).into_iter().min_by_key(|r| r.distance())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Cand {
        title: Option<&'static str>,
        kind: &'static str,
    }

    impl Candidate for Cand {
        fn kind(&self) -> &str {
            self.kind
        }

        fn title(&self) -> Option<&str> {
            self.title
        }
    }

    fn movie(title: &'static str) -> Cand {
        Cand { title: Some(title), kind: "movie" }
    }

    fn tv(title: &'static str) -> Cand {
        Cand { title: Some(title), kind: "tv series" }
    }

    #[test]
    fn empty() {
        let cands: Vec<Cand> = vec![];
        assert!(select_best("matrix", &cands).is_none());
        assert!(rank_window("matrix", &cands).is_empty());
    }

    #[test]
    fn only_tv_series() {
        let cands = vec![tv("The Matrix"), tv("Matrix")];
        assert!(select_best("matrix", &cands).is_none());
    }

    #[test]
    fn kind_is_case_sensitive() {
        let cands = vec![Cand { title: Some("Matrix"), kind: "Movie" }];
        assert!(select_best("matrix", &cands).is_none());
    }

    #[test]
    fn single_candidate_always_wins() {
        let cands = vec![movie("Something Else Entirely")];
        let best = select_best("matrix", &cands).unwrap();
        assert!(std::ptr::eq(best.candidate(), &cands[0]));
        assert_eq!(best.distance(), 20);
    }

    #[test]
    fn case_is_folded() {
        let cands = vec![movie("MATRIX")];
        let best = select_best("Matrix", &cands).unwrap();
        assert_eq!(best.candidate(), &cands[0]);
        assert_eq!(best.distance(), 0);
    }

    #[test]
    fn only_first_two_are_compared() {
        let cands = vec![
            movie("The Matrix"),
            movie("Matrix Reloaded"),
            movie("Matrix"),
        ];
        let window = rank_window("matrix", &cands);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].distance(), 4);
        assert_eq!(window[1].distance(), 9);

        let best = select_best("matrix", &cands).unwrap();
        assert!(std::ptr::eq(best.candidate(), &cands[0]));
        assert_eq!(best.distance(), 4);
    }

    #[test]
    fn window_counts_movies_only() {
        // The TV series and the person don't use up the window, but the
        // exact match is still third among movies.
        let cands = vec![
            tv("Matrix"),
            movie("Matrix Reloaded"),
            Cand { title: Some("Matrix"), kind: "person" },
            movie("The Matrix"),
            movie("Matrix"),
        ];
        let best = select_best("matrix", &cands).unwrap();
        assert!(std::ptr::eq(best.candidate(), &cands[3]));
        assert_eq!(best.distance(), 4);
    }

    #[test]
    fn tie_goes_to_first() {
        let cands = vec![movie("abd"), movie("abe")];
        let best = select_best("abc", &cands).unwrap();
        assert!(std::ptr::eq(best.candidate(), &cands[0]));
        assert_eq!(best.distance(), 1);
    }

    #[test]
    fn missing_title_is_empty() {
        let cands = vec![
            Cand { title: None, kind: "movie" },
            movie("Upside Down"),
        ];
        let window = rank_window("up", &cands);
        assert_eq!(window[0].distance(), 2);
        assert_eq!(window[1].distance(), 9);
        let best = select_best("up", &cands).unwrap();
        assert!(std::ptr::eq(best.candidate(), &cands[0]));
    }

    #[test]
    fn no_unicode_normalization() {
        // "é" precomposed versus "e" followed by a combining accent.
        let cands = vec![movie("Am\u{e9}lie")];
        let best = select_best("Ame\u{301}lie", &cands).unwrap();
        assert_eq!(best.distance(), 2);
    }

    #[test]
    fn idempotent() {
        let cands = vec![movie("Alien"), movie("Aliens"), movie("Alien 3")];
        let first = select_best("aliens", &cands).unwrap();
        let second = select_best("aliens", &cands).unwrap();
        assert!(std::ptr::eq(first.candidate(), second.candidate()));
        assert_eq!(first.distance(), second.distance());
        assert!(std::ptr::eq(first.candidate(), &cands[1]));
    }

    #[test]
    fn movie_records() {
        let cands = vec![
            Movie::new("1", "tv series", Some("Heat".to_string())),
            Movie::new("949", "movie", Some("Heat".to_string())),
        ];
        let best = select_best("HEAT", &cands).unwrap();
        assert_eq!(best.candidate().id, "949");
        assert_eq!(best.distance(), 0);
    }
}
