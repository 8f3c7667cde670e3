// Coordinated networks: groups of distinct reviewers acting in concert.
//
// Two reviews by different reviewers are linked when they were posted within
// the coordination window of each other and either
// - their texts are near-duplicates, or
// - they share a star rating and the same two reviewers also posted
//   matching near-simultaneous ratings at another location.
//
// Linked reviews are merged into clusters with union-find. A cluster that
// spans at least `min_cluster_reviewers` distinct reviewers is reported.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::models::{clamp01, AnomalyRecord, AnomalyType};
use crate::text::similarity::jaccard;

use super::{DetectorConfig, Finding, Timed};

/// Link strength recorded for rating-pattern links with dissimilar text.
const RATING_LINK_STRENGTH: f64 = 0.6;

/// Reviewer count at which cluster size stops adding severity.
const SATURATED_CLUSTER_SIZE: f64 = 10.0;

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Smaller root wins so cluster identity is order-independent
            let (keep, merge) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[merge] = keep;
        }
    }
}

/// `timeline` must be sorted by timestamp.
pub fn detect_coordination(timeline: &[Timed<'_>], config: &DetectorConfig) -> Vec<Finding> {
    let n = timeline.len();
    if n < config.min_cluster_reviewers {
        return Vec::new();
    }

    let token_sets: Vec<HashSet<String>> = timeline
        .iter()
        .map(|t| crate::text::features::tokens(&t.review.text).into_iter().collect())
        .collect();
    let window = config.coordination_window;

    let mut uf = UnionFind::new(n);
    // (position a, position b, strength)
    let mut links: Vec<(usize, usize, f64)> = Vec::new();
    // ordered reviewer pair -> locations with matching near-simultaneous ratings, and the pairs
    let mut rating_pairs: BTreeMap<(&str, &str), (BTreeSet<&str>, Vec<(usize, usize, f64)>)> =
        BTreeMap::new();

    for i in 0..n {
        let a = &timeline[i];
        for j in (i + 1)..n {
            let b = &timeline[j];
            if b.timestamp - a.timestamp > window {
                break;
            }
            let (ra, rb) = (a.review.reviewer_id.as_str(), b.review.reviewer_id.as_str());
            if ra.is_empty() || rb.is_empty() || ra == rb {
                continue;
            }

            let similarity = jaccard(&token_sets[i], &token_sets[j]);
            if similarity >= config.similarity_threshold {
                uf.union(i, j);
                links.push((i, j, similarity));
                continue;
            }

            if a.review.rating.is_some()
                && a.review.rating == b.review.rating
                && a.review.location_id == b.review.location_id
            {
                let key = if ra < rb { (ra, rb) } else { (rb, ra) };
                let entry = rating_pairs.entry(key).or_default();
                entry.0.insert(a.review.location_id.as_str());
                entry.1.push((i, j, similarity.max(RATING_LINK_STRENGTH)));
            }
        }
    }

    for (locations, pairs) in rating_pairs.values() {
        if locations.len() < 2 {
            continue;
        }
        for &(i, j, strength) in pairs {
            uf.union(i, j);
            links.push((i, j, strength));
        }
    }

    if links.is_empty() {
        return Vec::new();
    }

    let mut clusters: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for pos in 0..n {
        let root = uf.find(pos);
        clusters.entry(root).or_default().push(pos);
    }

    let mut strengths: HashMap<usize, (f64, usize)> = HashMap::new();
    for &(i, _, strength) in &links {
        let root = uf.find(i);
        let entry = strengths.entry(root).or_insert((0.0, 0));
        entry.0 += strength;
        entry.1 += 1;
    }

    let mut findings = Vec::new();
    for (root, positions) in clusters {
        if positions.len() < 2 {
            continue;
        }
        let reviewers: BTreeSet<String> = positions
            .iter()
            .map(|&p| timeline[p].review.reviewer_id.clone())
            .collect();
        if reviewers.len() < config.min_cluster_reviewers {
            continue;
        }
        let locations: BTreeSet<String> = positions
            .iter()
            .map(|&p| timeline[p].review.location_id.clone())
            .collect();

        let mean_strength = strengths
            .get(&root)
            .map(|&(sum, count)| sum / count.max(1) as f64)
            .unwrap_or(0.0);
        let size = (reviewers.len() as f64 / SATURATED_CLUSTER_SIZE).min(1.0);

        // Positions are in timeline order, so the first is the earliest
        let timestamp = timeline[positions[0]].timestamp;

        findings.push(Finding {
            record: AnomalyRecord {
                timestamp,
                anomaly_type: AnomalyType::CoordinatedNetwork,
                severity: clamp01(0.5 * size + 0.5 * mean_strength),
                review_count: positions.len(),
                trust_score: None,
                reviewer_ids: reviewers.into_iter().collect(),
                location_ids: locations.into_iter().collect(),
            },
            members: positions.iter().map(|&p| timeline[p].index).collect(),
        });
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_find_merges_transitively() {
        let mut uf = UnionFind::new(4);
        uf.union(3, 2);
        uf.union(2, 1);
        assert_eq!(uf.find(3), uf.find(1));
        assert_ne!(uf.find(0), uf.find(3));
        assert_eq!(uf.find(3), 1);
    }
}
