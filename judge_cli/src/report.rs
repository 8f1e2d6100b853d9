use std::io::Write;

use judge_core::stats::{self, FrequencySeries, UserSentimentScore};
use judge_core::{Post, ScoreField};

const NONE_LABEL: &str = "(none)";

/// Write the text report of a timeline, `top_count` entries per section.
pub fn write_report<W: Write>(out: &mut W, posts: &[Post], top_count: usize) -> anyhow::Result<()> {
    writeln!(out, "Post count: {}", posts.len())?;
    let (Some(newest), Some(oldest)) = (posts.first(), posts.last()) else {
        return Ok(());
    };
    writeln!(out, "Newest post: {}", newest.created_at)?;
    writeln!(out, "Oldest post: {}", oldest.created_at)?;
    writeln!(out)?;

    // 1. Authors over all posts
    let series = stats::distribution(posts, |p| p.user.screen_name.clone(), top_count)?;
    write_series(out, "Most common screen name:", &series, String::as_str)?;

    // 2. Unique authors
    let users = stats::unique_users(posts);
    let series = stats::distribution(&users, |u| u.time_zone.clone(), top_count)?;
    write_series(out, "Most common unique user time_zone:", &series, optional)?;
    let series = stats::distribution(&users, |u| u.location.clone(), top_count)?;
    write_series(out, "Most common unique user location:", &series, optional)?;

    // 3. Posts
    let series = stats::distribution(posts, |p| p.lang.clone(), top_count)?;
    write_series(out, "Most common lang:", &series, optional)?;
    let series = stats::distribution(posts, |p| p.source.clone(), top_count)?;
    write_series(out, "Most common source:", &series, String::as_str)?;

    // 4. Sentiment per author
    let scores = stats::average_by_user(posts, ScoreField::Polarity)?;
    write_scores(out, "Most positive users:", scores.iter().take(top_count))?;
    write_scores(out, "Most negative users:", scores.iter().rev().take(top_count))?;
    let scores = stats::average_by_user(posts, ScoreField::Subjectivity)?;
    write_scores(out, "Most subjective users:", scores.iter().take(top_count))?;
    write_scores(out, "Most objective users:", scores.iter().rev().take(top_count))?;
    Ok(())
}

fn optional(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NONE_LABEL)
}

fn write_series<W, K, F>(out: &mut W, title: &str, series: &FrequencySeries<K>, label: F) -> anyhow::Result<()>
where
    W: Write,
    F: Fn(&K) -> &str,
{
    writeln!(out, "{}", title)?;
    for record in series {
        writeln!(
            out,
            "  {} ({:.1}%): {}",
            record.count,
            record.cumulative_percentage,
            label(&record.value)
        )?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_scores<'a, W: Write>(
    out: &mut W,
    title: &str,
    scores: impl Iterator<Item = &'a UserSentimentScore>,
) -> anyhow::Result<()> {
    writeln!(out, "{}", title)?;
    for score in scores {
        writeln!(
            out,
            "  {:+.3}: @{} ({})",
            score.mean_score, score.user.screen_name, score.user.name
        )?;
    }
    writeln!(out)?;
    Ok(())
}
