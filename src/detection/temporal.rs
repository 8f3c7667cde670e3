// Review bombing: bursts of reviews at one location.
//
// A window of `burst_window` is anchored on each review of a location in
// time order. The window is a burst when it holds at least the minimum burst
// size and more than `burst_multiplier` times the trailing average of the
// windows before the anchor (never less than the baseline floor). A burst
// keeps absorbing the following windows while they stay above the same
// threshold, so bursts that straddle midnight or run for days are reported
// once, with their own reviews kept out of the baseline.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::models::{clamp01, AnomalyRecord, AnomalyType};

use super::{DetectorConfig, Finding, Timed};

pub fn detect_bursts(timeline: &[Timed<'_>], config: &DetectorConfig) -> Vec<Finding> {
    // location -> reviews in timeline order
    let mut by_location: BTreeMap<&str, Vec<&Timed<'_>>> = BTreeMap::new();
    for item in timeline {
        by_location
            .entry(item.review.location_id.as_str())
            .or_default()
            .push(item);
    }

    let mut findings = Vec::new();
    for items in by_location.values() {
        findings.extend(location_bursts(items, config));
    }
    findings
}

fn location_bursts(items: &[&Timed<'_>], config: &DetectorConfig) -> Vec<Finding> {
    let Some(first) = items.first().map(|t| t.timestamp) else {
        return Vec::new();
    };
    let width = config.burst_window;
    let width_secs = width.num_seconds().max(1) as f64;
    let lookback = width * config.burst_lookback_windows as i32;

    // First position at or after `from` that falls outside the window opened at `open`
    let window_end = |from: usize, open: DateTime<Utc>| {
        let limit = open.checked_add_signed(width).unwrap_or(DateTime::<Utc>::MAX_UTC);
        from + items[from..].partition_point(|t| t.timestamp < limit)
    };

    let mut findings = Vec::new();
    let mut anchor = 0;
    while anchor < items.len() {
        let at = items[anchor].timestamp;
        let mut end = window_end(anchor, at);
        let count = end - anchor;
        if count < config.min_burst_size {
            anchor += 1;
            continue;
        }

        let lower = at.checked_sub_signed(lookback).unwrap_or(first);
        let prior = anchor - items[..anchor].partition_point(|t| t.timestamp < lower);
        let span = ((at - first).num_seconds() as f64 / width_secs)
            .min(config.burst_lookback_windows as f64);
        let trailing_avg = if prior == 0 {
            0.0
        } else {
            prior as f64 / span.max(1.0)
        };
        let threshold = config.burst_multiplier * trailing_avg.max(config.min_burst_baseline);
        if (count as f64) <= threshold {
            anchor += 1;
            continue;
        }

        while end < items.len() {
            let next = window_end(end, items[end].timestamp);
            if ((next - end) as f64) <= threshold {
                break;
            }
            end = next;
        }

        findings.extend(burst(&items[anchor..end], threshold));
        anchor = end.max(anchor + 1);
    }
    findings
}

fn burst(members: &[&Timed<'_>], threshold: f64) -> Option<Finding> {
    let timestamp = members.first()?.timestamp;
    let mut reviewer_ids = BTreeSet::new();
    let mut location_ids = BTreeSet::new();
    for item in members {
        if !item.review.reviewer_id.is_empty() {
            reviewer_ids.insert(item.review.reviewer_id.clone());
        }
        location_ids.insert(item.review.location_id.clone());
    }
    let count = members.len();

    Some(Finding {
        record: AnomalyRecord {
            timestamp,
            anomaly_type: AnomalyType::ReviewBombing,
            severity: clamp01(1.0 - threshold / count as f64),
            review_count: count,
            trust_score: None,
            reviewer_ids: reviewer_ids.into_iter().collect(),
            location_ids: location_ids.into_iter().collect(),
        },
        members: members.iter().map(|t| t.index).collect(),
    })
}
