//! Descriptive statistics over a loaded timeline: frequency distributions, unique authors and
//! per-author sentiment rankings. Every function is pure and returns a materialized result.

use itertools::Itertools;
use serde::Serialize;

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{Error, Result};
use crate::model::{Post, ScoreField, User};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FrequencyRecord<K> {
    pub value: K,
    pub count: usize,
    /// Sum of `count` over this record and every record before it.
    pub cumulative_count: usize,
    /// `cumulative_count` as a percentage of all counted items, not only the emitted ones.
    pub cumulative_percentage: f64,
}

/// The most common values of a field, most common first.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FrequencySeries<K> {
    pub records: Vec<FrequencyRecord<K>>,
    /// Number of items the frequencies were counted over.
    pub total_items: usize,
}

impl<K> FrequencySeries<K> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrequencyRecord<K>> {
        self.records.iter()
    }
}

impl<'a, K> IntoIterator for &'a FrequencySeries<K> {
    type Item = &'a FrequencyRecord<K>;
    type IntoIter = std::slice::Iter<'a, FrequencyRecord<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Count `extractor(item)` over `items` and keep the `top_count` most common values.
/// Values with equal counts keep the order in which they first appear in `items`.
pub fn distribution<T, K, F>(items: &[T], extractor: F, top_count: usize) -> Result<FrequencySeries<K>>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    if items.is_empty() {
        return Err(Error::NoData("cannot count values of an empty collection".to_string()));
    }

    // 1. Count values in order of first occurrence
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();
    for item in items {
        let value = extractor(item);
        match index.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    // 2. Rank by count, the stable sort keeps first occurrence order within ties
    let total_items = items.len();
    let mut cumulative_count = 0;
    let records = counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .take(top_count)
        .map(|(value, count)| {
            cumulative_count += count;
            FrequencyRecord {
                value,
                count,
                cumulative_count,
                cumulative_percentage: 100.0 * cumulative_count as f64 / total_items as f64,
            }
        })
        .collect();

    Ok(FrequencySeries { records, total_items })
}

/// One record per distinct screen name, holding the author snapshot of the last post by that
/// screen name. Users are listed in order of their first post.
pub fn unique_users(posts: &[Post]) -> Vec<User> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut users: Vec<User> = Vec::new();
    for post in posts {
        match index.get(post.user.screen_name.as_str()) {
            Some(&i) => users[i] = post.user.clone(),
            None => {
                index.insert(&post.user.screen_name, users.len());
                users.push(post.user.clone());
            }
        }
    }
    users
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UserSentimentScore {
    pub mean_score: f64,
    pub user: User,
}

/// Mean of `field` over each author's posts, highest first.
/// Equal means are ordered by descending user id.
pub fn average_by_user(posts: &[Post], field: ScoreField) -> Result<Vec<UserSentimentScore>> {
    if posts.is_empty() {
        return Err(Error::NoData(format!("cannot average {} of an empty collection", field)));
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    // (latest snapshot, sum, count)
    let mut totals: Vec<(&User, f64, usize)> = Vec::new();
    for post in posts {
        let score = field.of(post);
        match index.get(post.user.screen_name.as_str()) {
            Some(&i) => {
                let total = &mut totals[i];
                total.0 = &post.user;
                total.1 += score;
                total.2 += 1;
            }
            None => {
                index.insert(&post.user.screen_name, totals.len());
                totals.push((&post.user, score, 1));
            }
        }
    }

    let mut scores = totals
        .into_iter()
        .map(|(user, sum, count)| UserSentimentScore {
            mean_score: sum / count as f64,
            user: user.clone(),
        })
        .collect::<Vec<_>>();
    scores.sort_by(|a, b| {
        a.mean_score
            .total_cmp(&b.mean_score)
            .then_with(|| a.user.id.cmp(&b.user.id))
    });
    scores.reverse();
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn user(id: u64, screen_name: &str, location: &str) -> User {
        User {
            id,
            name: screen_name.to_uppercase(),
            screen_name: screen_name.to_string(),
            location: Some(location.to_string()),
            time_zone: None,
        }
    }

    fn post(id: u64, author: User, lang: &str, polarity: f64) -> Post {
        Post {
            id,
            text: String::new(),
            created_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            lang: Some(lang.to_string()),
            source: "web".to_string(),
            user: author,
            retweet_of: None,
            polarity,
            subjectivity: (polarity + 1.0) / 2.0,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn test_distribution_languages() {
        let a = user(1, "a", "x");
        let posts = vec![
            post(3, a.clone(), "en", 0.0),
            post(2, a.clone(), "en", 0.0),
            post(1, a, "fr", 0.0),
        ];
        let series = distribution(&posts, |p| p.lang.clone(), 2).unwrap();
        assert_eq!(series.total_items, 3);
        assert_eq!(series.len(), 2);

        let en = &series.records[0];
        assert_eq!((en.value.as_deref(), en.count, en.cumulative_count), (Some("en"), 2, 2));
        assert_eq!(format!("{:.1}", en.cumulative_percentage), "66.7");
        let fr = &series.records[1];
        assert_eq!((fr.value.as_deref(), fr.count, fr.cumulative_count), (Some("fr"), 1, 3));
        assert_close(fr.cumulative_percentage, 100.0);
    }

    #[test]
    fn test_distribution_ties_keep_first_occurrence() {
        let values = ["b", "a", "c", "a", "b", "d"];
        let series = distribution(&values, |v| *v, 10).unwrap();
        let ranked = series.iter().map(|r| (r.value, r.count)).collect::<Vec<_>>();
        assert_eq!(ranked, vec![("b", 2), ("a", 2), ("c", 1), ("d", 1)]);
    }

    #[test]
    fn test_distribution_truncated_percentage_uses_total() {
        let values = ["x", "x", "y", "z", "w"];
        let series = distribution(&values, |v| *v, 2).unwrap();
        assert_eq!(series.len(), 2);
        let last = series.records.last().unwrap();
        assert_eq!(last.cumulative_count, 3);
        assert_close(last.cumulative_percentage, 60.0);
    }

    #[test]
    fn test_distribution_properties() {
        let values = (0..97u32).map(|i| (i * i + 3 * i) % 13).collect::<Vec<_>>();
        let distinct = values.iter().unique().count();
        for top_count in [0, 1, 5, distinct, distinct + 4] {
            let series = distribution(&values, |v| *v, top_count).unwrap();
            assert_eq!(series.len(), top_count.min(distinct));

            let emitted: usize = series.iter().map(|r| r.count).sum();
            if let Some(last) = series.records.last() {
                assert_eq!(last.cumulative_count, emitted);
            }
            for pair in series.records.windows(2) {
                assert!(pair[0].count >= pair[1].count);
                assert!(pair[0].cumulative_count <= pair[1].cumulative_count);
                assert!(pair[0].cumulative_percentage <= pair[1].cumulative_percentage);
            }
            assert!(series.iter().all(|r| r.cumulative_percentage <= 100.0));
        }
    }

    #[test]
    fn test_distribution_is_restartable() {
        let values = ["a", "b", "a"];
        let series = distribution(&values, |v| *v, 5).unwrap();
        let first = (&series).into_iter().map(|r| r.value).collect::<Vec<_>>();
        let second = (&series).into_iter().map(|r| r.value).collect::<Vec<_>>();
        assert_eq!(first, second);
    }

    #[test]
    fn test_distribution_empty_input() {
        let values: [&str; 0] = [];
        assert!(matches!(distribution(&values, |v| *v, 5), Err(Error::NoData(_))));
    }

    #[test]
    fn test_unique_users_keeps_last_snapshot() {
        let posts = vec![
            post(5, user(1, "alice", "Paris"), "en", 0.0),
            post(4, user(2, "bob", "Rome"), "en", 0.0),
            post(3, user(1, "alice", "Berlin"), "en", 0.0),
            post(2, user(3, "carol", "Oslo"), "en", 0.0),
            post(1, user(2, "bob", "Madrid"), "en", 0.0),
        ];
        let users = unique_users(&posts);
        assert_eq!(
            users,
            vec![
                user(1, "alice", "Berlin"),
                user(2, "bob", "Madrid"),
                user(3, "carol", "Oslo"),
            ]
        );
        assert!(unique_users(&[]).is_empty());
    }

    #[test]
    fn test_average_by_user() {
        let a = user(1, "A", "x");
        let b = user(2, "B", "y");
        let posts = vec![
            post(3, a.clone(), "en", 0.5),
            post(2, a.clone(), "en", 0.3),
            post(1, b.clone(), "en", 0.9),
        ];
        let scores = average_by_user(&posts, ScoreField::Polarity).unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].user, b);
        assert_close(scores[0].mean_score, 0.9);
        assert_eq!(scores[1].user, a);
        assert_close(scores[1].mean_score, 0.4);

        let scores = average_by_user(&posts, ScoreField::Subjectivity).unwrap();
        assert_close(scores[0].mean_score, 0.95);
        assert_close(scores[1].mean_score, 0.7);
    }

    #[test]
    fn test_average_ties_by_descending_user_id() {
        let posts = vec![
            post(4, user(10, "ten", "x"), "en", 0.2),
            post(3, user(30, "thirty", "x"), "en", 0.2),
            post(2, user(20, "twenty", "x"), "en", 0.2),
            post(1, user(5, "five", "x"), "en", 0.8),
        ];
        let ids = average_by_user(&posts, ScoreField::Polarity)
            .unwrap()
            .iter()
            .map(|s| s.user.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![5, 30, 20, 10]);
    }

    #[test]
    fn test_average_reports_last_snapshot() {
        let posts = vec![
            post(2, user(1, "a", "new"), "en", 0.0),
            post(1, user(1, "a", "old"), "en", 1.0),
        ];
        let scores = average_by_user(&posts, ScoreField::Polarity).unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].user.location.as_deref(), Some("old"));
        assert_close(scores[0].mean_score, 0.5);
    }

    #[test]
    fn test_average_empty_input() {
        assert!(matches!(
            average_by_user(&[], ScoreField::Polarity),
            Err(Error::NoData(_))
        ));
    }
}
