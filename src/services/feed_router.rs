use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::{
    config::FeedTuning,
    models::{Preferences, Video},
};

/// Orders candidate videos for a user's feed
///
/// Blocked videos are always dropped, and watched videos are dropped unless surprise mode is
/// on. Survivors are scored by the normalized weight of their suit, plus a bonus when liked,
/// plus uniform jitter in surprise mode, and returned highest score first. Equal scores keep
/// their input order. When every suit weight is zero the survivors are shuffled instead.
///
/// All randomness comes from `rng`.
pub fn route<R: Rng + ?Sized>(
    candidates: Vec<Video>,
    prefs: &Preferences,
    tuning: &FeedTuning,
    rng: &mut R,
) -> Vec<Video> {
    let total_candidates = candidates.len();
    let mut eligible = filter_eligible(candidates, prefs);

    let total_weight = prefs.suits.total();
    if total_weight == 0 {
        eligible.shuffle(rng);
        tracing::debug!(
            candidates = total_candidates,
            eligible = eligible.len(),
            "All suit weights are zero, shuffling feed"
        );
        return eligible;
    }

    let liked: HashSet<&str> = prefs.liked.iter().map(String::as_str).collect();

    let mut scored: Vec<(f64, Video)> = eligible
        .into_iter()
        .map(|video| {
            let suit_weight = prefs.suits.get(video.suit) as f64 / total_weight as f64;
            let liked_bonus = if liked.contains(video.id.as_str()) {
                tuning.liked_bonus
            } else {
                0.0
            };
            let random_factor = if prefs.surprise_me {
                rng.gen::<f64>() * tuning.surprise_factor
            } else {
                0.0
            };
            (suit_weight + liked_bonus + random_factor, video)
        })
        .collect();

    // sort_by is stable, which keeps input order among equal scores
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    tracing::debug!(
        candidates = total_candidates,
        eligible = scored.len(),
        surprise_me = prefs.surprise_me,
        "Feed routed"
    );

    scored.into_iter().map(|(_, video)| video).collect()
}

/// Routes with the thread-local random generator
pub fn route_videos(candidates: Vec<Video>, prefs: &Preferences, tuning: &FeedTuning) -> Vec<Video> {
    route(candidates, prefs, tuning, &mut rand::thread_rng())
}

fn filter_eligible(candidates: Vec<Video>, prefs: &Preferences) -> Vec<Video> {
    let blocked: HashSet<&str> = prefs.blocked.iter().map(String::as_str).collect();
    let watched: HashSet<&str> = prefs.watched.iter().map(String::as_str).collect();

    candidates
        .into_iter()
        .filter(|video| {
            let id = video.id.as_str();
            !blocked.contains(id) && (prefs.surprise_me || !watched.contains(id))
        })
        .collect()
}
