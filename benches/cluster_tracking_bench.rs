use std::collections::VecDeque;
use std::time::Instant;

use bn_rust::bn_clusters::ClusterForest;
use bn_rust::bn_threads::{Thread, ThreadLedger};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest connected component by breadth-first search over every thread
fn largest_by_search(n: usize, ledger: &ThreadLedger) -> usize {
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &Thread { a, b } in ledger.iter() {
        adjacency[a].push(b);
        adjacency[b].push(a);
    }

    let mut seen = vec![false; n];
    let mut largest = 0;
    let mut queue = VecDeque::new();
    for start in 0..n {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        queue.push_back(start);
        let mut size = 0;
        while let Some(node) = queue.pop_front() {
            size += 1;
            for &next in &adjacency[node] {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        largest = largest.max(size);
    }
    largest
}

/// Compare incremental union-find tracking against a full recomputation per step
fn main() {
    std::env::set_var("RUST_LOG", "error");
    let _ = simple_logger::init();

    println!("\n=== Cluster Tracking Benchmark (30 steps, speed 0.05) ===\n");

    let sizes = [100usize, 1_000, 10_000, 100_000];
    let steps = 30;
    let speed = 0.05;

    println!(
        "{:<10} {:>16} {:>16} {:>10}",
        "n", "Union-find (ms)", "Recompute (ms)", "Speedup"
    );
    println!("{}", "-".repeat(56));

    for n in sizes {
        let per_step = (n as f64 * speed).floor() as usize;
        let mut rng = StdRng::from_seed([7u8; 32]);
        let pairs: Vec<(usize, usize)> = (0..per_step * steps)
            .map(|_| {
                let a = rng.gen_range(0..n);
                let mut b = rng.gen_range(0..n);
                while b == a {
                    b = rng.gen_range(0..n);
                }
                (a, b)
            })
            .collect();

        let start = Instant::now();
        let mut forest = ClusterForest::new(n);
        let mut incremental = Vec::with_capacity(steps);
        for chunk in pairs.chunks(per_step.max(1)) {
            for &(a, b) in chunk {
                forest.union(a, b);
            }
            incremental.push(forest.largest());
        }
        let union_find_ms = start.elapsed().as_secs_f64() * 1000.0;

        let start = Instant::now();
        let mut ledger = ThreadLedger::new();
        let mut recomputed = Vec::with_capacity(steps);
        for chunk in pairs.chunks(per_step.max(1)) {
            for &(a, b) in chunk {
                ledger.tie(a, b);
            }
            recomputed.push(largest_by_search(n, &ledger));
        }
        let recompute_ms = start.elapsed().as_secs_f64() * 1000.0;

        assert_eq!(incremental, recomputed, "tracking diverged for n={}", n);

        println!(
            "{:<10} {:>16.3} {:>16.3} {:>9.1}x",
            n,
            union_find_ms,
            recompute_ms,
            recompute_ms / union_find_ms.max(f64::EPSILON)
        );
    }

    println!("\n{}", "=".repeat(56));
}
