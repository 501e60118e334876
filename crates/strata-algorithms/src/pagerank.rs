//! PageRank algorithm implementation
//!
//! Node centrality by random surfer model. Weighted snapshots split a vertex's score in
//! proportion to its outgoing edge weights; dangling vertices spread theirs uniformly.

use super::common::{GraphView, NodeId};
use super::error::{illegal, AlgoResult};
use std::collections::HashMap;
use tracing::debug;

/// PageRank configuration
#[derive(Debug, Clone)]
pub struct PageRankConfig {
    /// Damping factor (usually 0.85)
    pub damping_factor: f64,
    /// Maximum number of iterations
    pub iterations: usize,
    /// Stop once the summed absolute change drops below this
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            iterations: 100,
            tolerance: 0.0001,
        }
    }
}

/// Calculate PageRank for the graph view. Scores sum to 1.
pub fn page_rank(view: &GraphView, config: PageRankConfig) -> AlgoResult<HashMap<NodeId, f64>> {
    if !(0.0..=1.0).contains(&config.damping_factor) {
        return Err(illegal(format!(
            "damping factor must be within [0, 1], got {}",
            config.damping_factor
        )));
    }
    if config.iterations == 0 {
        return Err(illegal("PageRank needs at least one iteration"));
    }
    view.require_non_negative_weights("PageRank")?;

    let n = view.node_count;
    if n == 0 {
        return Ok(HashMap::new());
    }

    // Total outgoing weight per vertex
    let out_weight: Vec<f64> = (0..n).map(|i| view.weights(i).iter().sum()).collect();

    let mut scores = vec![1.0 / n as f64; n];
    let mut next_scores = vec![0.0; n];
    let d = config.damping_factor;
    let mut iterations = 0;

    for _ in 0..config.iterations {
        iterations += 1;
        let dangling: f64 = (0..n)
            .filter(|&i| out_weight[i] <= 0.0)
            .map(|i| scores[i])
            .sum();
        let base_score = (1.0 - d) / n as f64 + d * dangling / n as f64;

        let mut total_diff = 0.0;
        for i in 0..n {
            let mut sum_incoming = 0.0;

            // Iterate over incoming edges
            for (source_idx, pos) in view.in_neighbors(i) {
                if out_weight[source_idx] > 0.0 {
                    sum_incoming += scores[source_idx] * view.weight(pos) / out_weight[source_idx];
                }
            }

            next_scores[i] = base_score + d * sum_incoming;
            total_diff += (next_scores[i] - scores[i]).abs();
        }

        // Swap buffers
        std::mem::swap(&mut scores, &mut next_scores);

        // Check convergence
        if total_diff < config.tolerance {
            break;
        }
    }
    debug!(iterations, "pagerank finished");

    Ok(scores
        .into_iter()
        .enumerate()
        .map(|(idx, score)| (view.node(idx), score))
        .collect())
}
