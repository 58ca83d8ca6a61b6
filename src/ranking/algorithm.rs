//! Feed ordering algorithms.
//!
//! Every ordering is a stable sort over borrowed items, so ties keep the
//! order the store returned them in and the caller's slice is left alone.

use chrono::{DateTime, Utc};

use crate::model::Scored;

use super::sort::SortType;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Fractional hours elapsed between `then` and `now`.
///
/// Timestamps in the future (clock skew between store and caller) count as
/// zero hours old.
pub fn hours_since(then: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - then).num_milliseconds().max(0);
    millis as f64 / MILLIS_PER_HOUR
}

/// Time-decayed score: `score / (hours_since(created_at, now) + 1)`.
///
/// The `+ 1` keeps brand-new items finite. Negative scores shrink toward
/// zero as they age, so a downvoted item climbs relative to fresh
/// downvoted ones.
pub fn hot_score<T: Scored + ?Sized>(item: &T, now: DateTime<Utc>) -> f64 {
    item.score() as f64 / (hours_since(item.created_at(), now) + 1.0)
}

/// Order `items` by `sort`, returning references in ranked order.
///
/// `now` is only consulted for [`SortType::Hot`]. The result is a
/// permutation of the input; empty input yields an empty vector.
pub fn rank<'a, T: Scored>(items: &'a [T], sort: SortType, now: DateTime<Utc>) -> Vec<&'a T> {
    let mut ranked: Vec<&T> = items.iter().collect();
    sort_in_place(&mut ranked, sort, now);
    ranked
}

/// Owned variant of [`rank`]: consumes the snapshot and returns it reordered.
pub fn rank_owned<T: Scored>(mut items: Vec<T>, sort: SortType, now: DateTime<Utc>) -> Vec<T> {
    sort_in_place(&mut items, sort, now);
    items
}

fn sort_in_place<T: Scored>(items: &mut Vec<T>, sort: SortType, now: DateTime<Utc>) {
    match sort {
        SortType::New => items.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
        SortType::Top => items.sort_by(|a, b| b.score().cmp(&a.score())),
        SortType::Hot => {
            // Score once per item rather than once per comparison
            let mut keyed: Vec<(f64, T)> = items
                .drain(..)
                .map(|item| (hot_score(&item, now), item))
                .collect();
            keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
            items.extend(keyed.into_iter().map(|(_, item)| item));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        upvotes: u32,
        downvotes: u32,
        created_at: DateTime<Utc>,
    }

    impl Scored for Item {
        fn upvotes(&self) -> u32 {
            self.upvotes
        }

        fn downvotes(&self) -> u32 {
            self.downvotes
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn make_item(id: u32, upvotes: u32, downvotes: u32, hours_ago: i64) -> Item {
        Item {
            id,
            upvotes,
            downvotes,
            created_at: now() - Duration::hours(hours_ago),
        }
    }

    fn ids(items: &[&Item]) -> Vec<u32> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_hours_since() {
        assert_eq!(hours_since(now(), now()), 0.0);
        assert_eq!(hours_since(now() - Duration::minutes(90), now()), 1.5);
        // Future timestamps are clamped
        assert_eq!(hours_since(now() + Duration::hours(3), now()), 0.0);
    }

    #[test]
    fn test_hot_score_values() {
        let fresh = make_item(1, 10, 0, 0);
        assert_eq!(hot_score(&fresh, now()), 10.0);

        let day_old = make_item(2, 30, 5, 24);
        assert_eq!(hot_score(&day_old, now()), 1.0);
    }

    #[test]
    fn test_hot_prefers_recent_high_score() {
        let items = vec![make_item(2, 5, 0, 10), make_item(1, 10, 0, 1)];
        let ranked = rank(&items, SortType::Hot, now());
        // 10 / 2 = 5 beats 5 / 11
        assert_eq!(ids(&ranked), vec![1, 2]);
    }

    #[test]
    fn test_hot_negative_scores_improve_with_age() {
        let items = vec![make_item(1, 0, 10, 0), make_item(2, 0, 10, 9)];
        let ranked = rank(&items, SortType::Hot, now());
        // -10 / 1 = -10 ranks below -10 / 10 = -1
        assert_eq!(ids(&ranked), vec![2, 1]);
    }

    #[test]
    fn test_hot_future_item_is_finite() {
        let item = make_item(1, 4, 0, -5);
        let score = hot_score(&item, now());
        assert!(score.is_finite());
        assert_eq!(score, 4.0);
    }

    #[test]
    fn test_new_orders_by_created_at_desc() {
        let items = vec![
            make_item(1, 0, 0, 5),
            make_item(2, 0, 0, 1),
            make_item(3, 0, 0, 3),
        ];
        let ranked = rank(&items, SortType::New, now());
        assert_eq!(ids(&ranked), vec![2, 3, 1]);
    }

    #[test]
    fn test_top_orders_by_score_and_is_stable() {
        let items = vec![
            make_item(1, 5, 0, 1),
            make_item(2, 9, 1, 2),
            make_item(3, 6, 1, 3),
            make_item(4, 1, 4, 4),
        ];
        let ranked = rank(&items, SortType::Top, now());
        // Items 1 and 3 tie at 5 and keep input order
        assert_eq!(ids(&ranked), vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_rank_empty() {
        let items: Vec<Item> = Vec::new();
        for sort in SortType::ALL {
            assert!(rank(&items, sort, now()).is_empty());
        }
    }

    #[test]
    fn test_rank_does_not_touch_input() {
        let items = vec![make_item(1, 0, 0, 5), make_item(2, 0, 0, 1)];
        let before = items.clone();
        let _ = rank(&items, SortType::New, now());
        assert_eq!(items, before);
    }

    #[test]
    fn test_rank_owned_matches_rank() {
        let items = vec![
            make_item(1, 3, 0, 2),
            make_item(2, 8, 2, 7),
            make_item(3, 1, 0, 0),
            make_item(4, 12, 1, 30),
        ];
        for sort in SortType::ALL {
            let borrowed = ids(&rank(&items, sort, now()));
            let owned: Vec<u32> = rank_owned(items.clone(), sort, now())
                .iter()
                .map(|i| i.id)
                .collect();
            assert_eq!(borrowed, owned, "mismatch for {sort}");
        }
    }

    #[test]
    fn test_rank_over_references() {
        let items = vec![make_item(1, 1, 0, 1), make_item(2, 4, 0, 1)];
        let refs: Vec<&Item> = items.iter().collect();
        let ranked = rank_owned(refs, SortType::Top, now());
        assert!(std::ptr::eq(ranked[0], &items[1]));
    }
}
