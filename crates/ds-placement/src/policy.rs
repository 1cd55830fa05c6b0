//! Stateless selection rules.
//!
//! Each rule walks the catalog in simulator order and returns the catalog
//! position of the chosen server. Feasibility uses all three resource
//! dimensions; the ranking inside best/worst/fair fit looks at cores only.
//! Ties always go to the server that comes first in the catalog.

use ds_core::{Catalog, Dominance, Job, Server};

/// First server that has room for `job` right now.
pub fn first_fit_now(job: &Job, catalog: &Catalog, mode: Dominance) -> Option<usize> {
    catalog
        .iter()
        .position(|s| s.can_accept_now_with(job, mode))
}

/// First server that could ever host `job`.
pub fn first_capable(job: &Job, catalog: &Catalog) -> Option<usize> {
    catalog.iter().position(|s| s.can_accept_eventually(job))
}

/// First fit now, falling back to the first ever-capable server.
pub fn first_fit(job: &Job, catalog: &Catalog, mode: Dominance) -> Option<usize> {
    first_fit_now(job, catalog, mode).or_else(|| first_capable(job, catalog))
}

/// First fit now, falling back to the ever-capable server with the lowest
/// used/total core ratio.
///
/// The fallback starts from the catalog's first server whether or not it is
/// capable, so with no capable server at all the job still lands there.
/// Only an empty catalog yields `None`.
pub fn fair_first_fit(job: &Job, catalog: &Catalog, mode: Dominance) -> Option<usize> {
    if let Some(pos) = first_fit_now(job, catalog, mode) {
        return Some(pos);
    }

    let first = catalog.get(0)?;
    let mut best = 0;
    let mut best_load = core_load(first);
    for (pos, server) in catalog.iter().enumerate() {
        if !server.can_accept_eventually(job) {
            continue;
        }
        let load = core_load(server);
        if load < best_load {
            best = pos;
            best_load = load;
        }
    }
    Some(best)
}

/// Fits now with the fewest free cores, else first ever-capable.
pub fn best_fit(job: &Job, catalog: &Catalog, mode: Dominance) -> Option<usize> {
    first_extreme(catalog, |s| s.can_accept_now_with(job, mode), |s| -s.free().cores)
        .or_else(|| first_capable(job, catalog))
}

/// Fits now with the most free cores, else the ever-capable server with the
/// most total cores.
pub fn worst_fit(job: &Job, catalog: &Catalog, mode: Dominance) -> Option<usize> {
    first_extreme(catalog, |s| s.can_accept_now_with(job, mode), |s| s.free().cores)
        .or_else(|| first_extreme(catalog, |s| s.can_accept_eventually(job), |s| s.total().cores))
}

/// Used cores over total cores. A server with no cores counts as fully loaded.
fn core_load(server: &Server) -> f64 {
    let total = server.total().cores;
    if total <= 0 {
        return f64::INFINITY;
    }
    server.used().cores as f64 / total as f64
}

/// Position of the first eligible server with the largest `key`.
fn first_extreme(
    catalog: &Catalog,
    eligible: impl Fn(&Server) -> bool,
    key: impl Fn(&Server) -> i64,
) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;
    for (pos, server) in catalog.iter().enumerate() {
        if !eligible(server) {
            continue;
        }
        let k = key(server);
        if best.is_none_or(|(_, best_k)| k > best_k) {
            best = Some((pos, k));
        }
    }
    best.map(|(pos, _)| pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ds_core::{ResourceVector, ServerId};

    fn server(kind: &str, index: u32, cores: i64) -> Server {
        Server::new(
            ServerId::new(kind, index),
            ResourceVector::new(cores, cores * 1000, cores * 4000),
        )
    }

    fn job(id: u32, cores: i64) -> Job {
        Job::new(id, 0, ResourceVector::new(cores, cores * 1000, cores * 4000))
    }

    /// Occupy `cores` on the server at `pos` with a filler job.
    fn load(catalog: &mut Catalog, pos: usize, id: u32, cores: i64) {
        let mut filler = job(id, cores);
        catalog.get_mut(pos).unwrap().assign(&mut filler);
    }

    fn catalog(cores: &[i64]) -> Catalog {
        Catalog::new(
            cores
                .iter()
                .enumerate()
                .map(|(i, &c)| server("t", i as u32, c))
                .collect(),
        )
    }

    #[test]
    fn first_fit_takes_first_free_server() {
        let mut c = catalog(&[2, 4, 4]);
        load(&mut c, 1, 100, 3);

        assert_eq!(first_fit(&job(1, 2), &c, Dominance::Weak), Some(0));
        assert_eq!(first_fit(&job(1, 3), &c, Dominance::Weak), Some(2));
    }

    #[test]
    fn first_fit_falls_back_to_first_capable() {
        let mut c = catalog(&[2, 4, 4]);
        load(&mut c, 1, 100, 4);
        load(&mut c, 2, 101, 4);

        assert_eq!(first_fit(&job(1, 3), &c, Dominance::Weak), Some(1));
    }

    #[test]
    fn first_fit_never_picks_incapable_server() {
        let mut c = catalog(&[1, 2, 8, 2, 16]);
        load(&mut c, 2, 100, 8);
        for cores in 1..=16 {
            let j = job(cores as u32, cores);
            let pos = first_fit(&j, &c, Dominance::Weak).unwrap();
            assert!(c.get(pos).unwrap().can_accept_eventually(&j), "{cores} cores -> {pos}");
        }
    }

    #[test]
    fn first_fit_none_when_nothing_capable() {
        let c = catalog(&[2, 4]);
        assert_eq!(first_fit(&job(1, 8), &c, Dominance::Weak), None);
    }

    #[test]
    fn strict_mode_rejects_exact_fit() {
        let c = catalog(&[2, 4]);
        assert_eq!(first_fit_now(&job(1, 2), &c, Dominance::Weak), Some(0));
        assert_eq!(first_fit_now(&job(1, 2), &c, Dominance::Strict), Some(1));
    }

    #[test]
    fn first_capable_ignores_current_load() {
        let mut c = catalog(&[2, 4]);
        load(&mut c, 0, 100, 2);

        assert_eq!(first_capable(&job(1, 2), &c), Some(0));
        assert_eq!(first_capable(&job(1, 3), &c), Some(1));
        assert_eq!(first_capable(&job(1, 5), &c), None);
    }

    #[test]
    fn fair_first_fit_prefers_free_server() {
        let c = catalog(&[4, 4]);
        assert_eq!(fair_first_fit(&job(1, 2), &c, Dominance::Weak), Some(0));
    }

    #[test]
    fn fair_first_fit_falls_back_to_lowest_load() {
        let mut c = catalog(&[4, 8, 8]);
        load(&mut c, 0, 100, 4); // 1.0
        load(&mut c, 1, 101, 6); // 0.75
        load(&mut c, 2, 102, 4); // 0.5

        assert_eq!(fair_first_fit(&job(1, 5), &c, Dominance::Weak), Some(2));
    }

    #[test]
    fn fair_first_fit_seed_is_first_server_even_if_incapable() {
        let mut c = catalog(&[2, 4]);
        load(&mut c, 1, 100, 4);

        // Nothing has room and nothing can ever host 8 cores: the seed wins.
        assert_eq!(fair_first_fit(&job(1, 8), &c, Dominance::Weak), Some(0));
    }

    #[test]
    fn fair_first_fit_seed_wins_ties() {
        let mut c = catalog(&[2, 8]);
        load(&mut c, 1, 100, 8);
        load(&mut c, 0, 101, 2);

        // Both fully loaded, so server 1 never beats the seed.
        assert_eq!(fair_first_fit(&job(1, 4), &c, Dominance::Weak), Some(0));
    }

    #[test]
    fn fair_first_fit_empty_catalog() {
        assert_eq!(fair_first_fit(&job(1, 1), &Catalog::default(), Dominance::Weak), None);
    }

    #[test]
    fn best_fit_picks_fewest_free_cores() {
        let mut c = catalog(&[10, 10, 10]);
        load(&mut c, 0, 100, 5); // free 5
        load(&mut c, 1, 101, 8); // free 2
        load(&mut c, 2, 102, 1); // free 9

        assert_eq!(best_fit(&job(1, 1), &c, Dominance::Weak), Some(1));
    }

    #[test]
    fn best_fit_ties_go_to_first() {
        let c = catalog(&[4, 2, 2]);
        assert_eq!(best_fit(&job(1, 1), &c, Dominance::Weak), Some(1));
    }

    #[test]
    fn best_fit_falls_back_to_first_capable() {
        let mut c = catalog(&[2, 8, 16]);
        load(&mut c, 1, 100, 8);
        load(&mut c, 2, 101, 16);

        assert_eq!(best_fit(&job(1, 4), &c, Dominance::Weak), Some(1));
    }

    #[test]
    fn worst_fit_picks_most_free_cores() {
        let mut c = catalog(&[10, 10, 10]);
        load(&mut c, 0, 100, 5);
        load(&mut c, 1, 101, 8);
        load(&mut c, 2, 102, 1);

        assert_eq!(worst_fit(&job(1, 1), &c, Dominance::Weak), Some(2));
    }

    #[test]
    fn worst_fit_ties_go_to_first() {
        let c = catalog(&[2, 8, 8]);
        assert_eq!(worst_fit(&job(1, 1), &c, Dominance::Weak), Some(1));
    }

    #[test]
    fn worst_fit_falls_back_to_largest_total() {
        let mut c = catalog(&[4, 16, 8]);
        load(&mut c, 0, 100, 4);
        load(&mut c, 1, 101, 16);
        load(&mut c, 2, 102, 8);

        assert_eq!(worst_fit(&job(1, 3), &c, Dominance::Weak), Some(1));
    }

    #[test]
    fn worst_fit_none_when_nothing_capable() {
        let c = catalog(&[2, 4]);
        assert_eq!(worst_fit(&job(1, 8), &c, Dominance::Weak), None);
    }

    #[test]
    fn feasibility_uses_all_dimensions() {
        // Plenty of cores on server 0, but not enough disk.
        let c = Catalog::new(vec![
            Server::new(ServerId::new("cpu", 0), ResourceVector::new(64, 64000, 100)),
            Server::new(ServerId::new("disk", 0), ResourceVector::new(4, 64000, 100000)),
        ]);
        let j = Job::new(1, 0, ResourceVector::new(2, 1000, 5000));

        assert_eq!(first_fit(&j, &c, Dominance::Weak), Some(1));
        assert_eq!(worst_fit(&j, &c, Dominance::Weak), Some(1));
    }
}
