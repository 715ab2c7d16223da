//! Layered (Sugiyama-style) placement of structural nodes.
//!
//! Phases: cycle breaking (DFS back edges are reversed), rank assignment (longest path
//! with sources pulled down next to their children), crossing reduction (alternating
//! barycenter sweeps, best order kept) and coordinate assignment (ordered least-squares
//! alignment against neighbours). Every phase iterates in node-index order, so equal
//! inputs always produce equal output.

use super::{LayoutConfig, Size};
use itertools::Itertools;
use std::collections::BTreeSet;

pub(super) struct LayeredGraph {
    sizes: Vec<Size>,
    succ: Vec<Vec<usize>>,
    pred: Vec<Vec<usize>>,
    layers: Vec<Vec<usize>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Finished,
}

impl LayeredGraph {
    /// `links` index into `sizes`. Self-loops and duplicates are dropped.
    pub(super) fn new(sizes: Vec<Size>, links: &[(usize, usize)]) -> Self {
        let n = sizes.len();
        let mut succ = vec![Vec::new(); n];
        let mut pred = vec![Vec::new(); n];
        for &(u, v) in links.iter().unique() {
            if u == v || u >= n || v >= n {
                continue;
            }
            succ[u].push(v);
            pred[v].push(u);
        }
        Self {
            sizes,
            succ,
            pred,
            layers: Vec::new(),
        }
    }

    pub(super) fn rank_count(&self) -> usize {
        self.layers.len()
    }

    /// Runs every phase and returns the top-left corner of each node, in input order.
    pub(super) fn run(&mut self, config: &LayoutConfig) -> Vec<(f64, f64)> {
        if self.sizes.is_empty() {
            return Vec::new();
        }
        self.break_cycles();
        self.assign_ranks();
        self.reduce_crossings(config.ordering_sweeps);
        self.coordinates(config)
    }

    fn len(&self) -> usize {
        self.sizes.len()
    }

    fn break_cycles(&mut self) {
        let n = self.len();
        let mut mark = vec![Mark::Unvisited; n];
        let mut back_edges = Vec::new();

        for root in 0..n {
            if mark[root] != Mark::Unvisited {
                continue;
            }
            mark[root] = Mark::OnStack;
            let mut stack = vec![(root, 0usize)];
            while let Some(top) = stack.last_mut() {
                let (u, next) = *top;
                if next < self.succ[u].len() {
                    top.1 += 1;
                    let v = self.succ[u][next];
                    match mark[v] {
                        Mark::Unvisited => {
                            mark[v] = Mark::OnStack;
                            stack.push((v, 0));
                        }
                        Mark::OnStack => back_edges.push((u, v)),
                        Mark::Finished => {}
                    }
                } else {
                    mark[u] = Mark::Finished;
                    stack.pop();
                }
            }
        }

        for (u, v) in back_edges {
            self.succ[u].retain(|&w| w != v);
            self.pred[v].retain(|&w| w != u);
            if !self.succ[v].contains(&u) {
                self.succ[v].push(u);
                self.pred[u].push(v);
            }
        }
    }

    fn topological_order(&self) -> Vec<usize> {
        let mut in_degree: Vec<usize> = self.pred.iter().map(Vec::len).collect();
        let mut ready: BTreeSet<usize> = (0..self.len()).filter(|&v| in_degree[v] == 0).collect();
        let mut order = Vec::with_capacity(self.len());

        while let Some(u) = ready.pop_first() {
            order.push(u);
            for &v in &self.succ[u] {
                in_degree[v] -= 1;
                if in_degree[v] == 0 {
                    ready.insert(v);
                }
            }
        }
        order
    }

    fn assign_ranks(&mut self) {
        let order = self.topological_order();
        let mut rank = vec![0usize; self.len()];

        for &v in &order {
            rank[v] = self.pred[v].iter().map(|&u| rank[u] + 1).max().unwrap_or(0);
        }
        // A source is only constrained by its children; keep it directly above them.
        for &v in order.iter().rev() {
            if self.pred[v].is_empty() {
                if let Some(lowest) = self.succ[v].iter().map(|&w| rank[w]).min() {
                    rank[v] = lowest.saturating_sub(1);
                }
            }
        }

        let base = rank.iter().copied().min().unwrap_or(0);
        let rank_count = rank.iter().map(|r| r - base).max().unwrap_or(0) + 1;
        let mut layers = vec![Vec::new(); rank_count];

        // Initial order: depth-first from nodes taken by (rank, index), which keeps
        // siblings contiguous.
        let mut visited = vec![false; self.len()];
        let starts = (0..self.len()).sorted_by_key(|&v| (rank[v], v));
        for start in starts {
            if visited[start] {
                continue;
            }
            let mut stack = vec![start];
            while let Some(v) = stack.pop() {
                if visited[v] {
                    continue;
                }
                visited[v] = true;
                layers[rank[v] - base].push(v);
                stack.extend(self.succ[v].iter().rev().filter(|&&w| !visited[w]));
            }
        }

        self.layers = layers;
    }

    fn reduce_crossings(&mut self, sweeps: usize) {
        let mut best = self.layers.clone();
        let mut best_crossings = self.crossings();

        for sweep in 0..sweeps {
            if best_crossings == 0 {
                break;
            }
            if sweep % 2 == 0 {
                for r in 1..self.layers.len() {
                    self.sort_by_barycenter(r, true);
                }
            } else {
                for r in (0..self.layers.len().saturating_sub(1)).rev() {
                    self.sort_by_barycenter(r, false);
                }
            }

            let crossings = self.crossings();
            if crossings < best_crossings {
                best_crossings = crossings;
                best = self.layers.clone();
            }
        }

        self.layers = best;
    }

    /// Position of every node within its own layer.
    fn layer_positions(&self) -> Vec<usize> {
        let mut position = vec![0usize; self.len()];
        for layer in &self.layers {
            for (p, &v) in layer.iter().enumerate() {
                position[v] = p;
            }
        }
        position
    }

    fn sort_by_barycenter(&mut self, r: usize, downward: bool) {
        let position = self.layer_positions();
        let neighbours = if downward { &self.pred } else { &self.succ };

        let sorted: Vec<usize> = self.layers[r]
            .iter()
            .map(|&v| {
                let adjacent = &neighbours[v];
                let barycenter = if adjacent.is_empty() {
                    position[v] as f64
                } else {
                    adjacent.iter().map(|&u| position[u] as f64).sum::<f64>()
                        / adjacent.len() as f64
                };
                (v, barycenter)
            })
            .sorted_by(|a, b| {
                a.1.total_cmp(&b.1)
                    .then_with(|| position[a.0].cmp(&position[b.0]))
            })
            .map(|(v, _)| v)
            .collect();

        self.layers[r] = sorted;
    }

    /// Edge crossings between adjacent layers. Edges spanning more than one rank are
    /// not counted.
    fn crossings(&self) -> usize {
        let position = self.layer_positions();
        let mut total = 0;
        for (upper, lower) in self.layers.iter().tuple_windows() {
            let mut pairs = Vec::new();
            for &u in upper {
                for &w in &self.succ[u] {
                    if lower.contains(&w) {
                        pairs.push((position[u], position[w]));
                    }
                }
            }
            total += pairs
                .iter()
                .tuple_combinations()
                .filter(|(a, b)| (a.0 < b.0 && a.1 > b.1) || (a.0 > b.0 && a.1 < b.1))
                .count();
        }
        total
    }

    fn coordinates(&self, config: &LayoutConfig) -> Vec<(f64, f64)> {
        let horizontal = config.direction.is_horizontal();
        let (cross_size, rank_size): (Vec<f64>, Vec<f64>) = self
            .sizes
            .iter()
            .map(|s| {
                if horizontal {
                    (s.height, s.width)
                } else {
                    (s.width, s.height)
                }
            })
            .unzip();

        // Rank axis: each layer is as thick as its thickest node, nodes centred in it.
        let mut rank_center = vec![0.0f64; self.len()];
        let mut offset = 0.0f64;
        for layer in &self.layers {
            let thickness = layer
                .iter()
                .map(|&v| rank_size[v])
                .fold(0.0f64, f64::max);
            for &v in layer {
                rank_center[v] = offset + thickness / 2.0;
            }
            offset += thickness + config.rank_sep;
        }
        let extent = (offset - config.rank_sep).max(0.0);

        // Cross axis: pack, then repeatedly pull nodes toward their neighbours.
        let mut cross = vec![0.0f64; self.len()];
        for layer in &self.layers {
            let mut cursor = 0.0;
            for &v in layer {
                cross[v] = cursor + cross_size[v] / 2.0;
                cursor += cross_size[v] + config.node_sep;
            }
        }
        for _ in 0..config.alignment_passes {
            for r in 1..self.layers.len() {
                self.align_layer(r, &self.pred, &cross_size, config.node_sep, &mut cross);
            }
            for r in (0..self.layers.len().saturating_sub(1)).rev() {
                self.align_layer(r, &self.succ, &cross_size, config.node_sep, &mut cross);
            }
        }

        let min_edge = (0..self.len())
            .map(|v| cross[v] - cross_size[v] / 2.0)
            .fold(f64::INFINITY, f64::min);

        (0..self.len())
            .map(|v| {
                let c = cross[v] - min_edge - cross_size[v] / 2.0;
                let center = if config.direction.is_reversed() {
                    extent - rank_center[v]
                } else {
                    rank_center[v]
                };
                let r = center - rank_size[v] / 2.0;
                if horizontal { (r, c) } else { (c, r) }
            })
            .collect()
    }

    fn align_layer(
        &self,
        r: usize,
        neighbours: &[Vec<usize>],
        cross_size: &[f64],
        node_sep: f64,
        cross: &mut [f64],
    ) {
        let layer = &self.layers[r];
        let desired: Vec<f64> = layer
            .iter()
            .map(|&v| {
                let adjacent = &neighbours[v];
                if adjacent.is_empty() {
                    cross[v]
                } else {
                    adjacent.iter().map(|&u| cross[u]).sum::<f64>() / adjacent.len() as f64
                }
            })
            .collect();
        let gaps: Vec<f64> = layer
            .iter()
            .tuple_windows()
            .map(|(&a, &b)| (cross_size[a] + cross_size[b]) / 2.0 + node_sep)
            .collect();

        for (&v, placed) in layer.iter().zip(pack(&desired, &gaps)) {
            cross[v] = placed;
        }
    }
}

/// Places `desired.len()` ordered values as close as possible (least squares) to
/// `desired`, keeping value `i + 1` at least `gaps[i]` after value `i`.
fn pack(desired: &[f64], gaps: &[f64]) -> Vec<f64> {
    let offsets: Vec<f64> = std::iter::once(0.0)
        .chain(gaps.iter().scan(0.0, |acc, g| {
            *acc += g;
            Some(*acc)
        }))
        .take(desired.len())
        .collect();

    // Pool adjacent violators over the offset-free targets.
    let mut blocks: Vec<(f64, usize)> = Vec::with_capacity(desired.len());
    for (d, o) in desired.iter().zip(&offsets) {
        blocks.push((d - o, 1));
        while let [.., (s1, c1), (s2, c2)] = blocks[..] {
            if s1 / c1 as f64 <= s2 / c2 as f64 {
                break;
            }
            blocks.pop();
            let last = blocks.len() - 1;
            blocks[last] = (s1 + s2, c1 + c2);
        }
    }

    blocks
        .into_iter()
        .flat_map(|(sum, count)| std::iter::repeat_n(sum / count as f64, count))
        .zip(&offsets)
        .map(|(base, o)| base + o)
        .collect()
}
