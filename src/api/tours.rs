//! Travelling salesman tours over complete undirected weighted graphs, plus Palmer's
//! Hamiltonian cycle for graphs meeting Ore's condition
//!
//! Every tour is returned as a closed path object.

use crate::algo::timed;
use crate::context::Context;
use crate::error::{GraphResult, Status};
use crate::handle::{Handle, Object};
use strata_algorithms::{tour, AlgoResult, GraphView, PathResult, TwoOptConfig};

impl Context {
    fn tour_exec<F>(&mut self, op: &'static str, algorithm: F, graph: Handle, res: &mut Handle) -> Status
    where
        F: FnOnce(&GraphView) -> AlgoResult<PathResult>,
    {
        self.run(op, |ctx| {
            let view = ctx.view_of(graph)?;
            let tour = timed(op, &view, |v| -> GraphResult<PathResult> { Ok(algorithm(v)?) })?;
            *res = ctx.register(Object::Path(tour))?;
            Ok(())
        })
    }

    pub fn tour_tsp_random(&mut self, graph: Handle, seed: u64, res: &mut Handle) -> Status {
        self.tour_exec("tour_tsp_random", |v| tour::tsp_random(v, seed), graph, res)
    }

    pub fn tour_tsp_nearest_neighbor_heuristic(&mut self, graph: Handle, seed: u64, res: &mut Handle) -> Status {
        self.tour_exec(
            "tour_tsp_nearest_neighbor_heuristic",
            |v| tour::tsp_nearest_neighbor(v, seed),
            graph,
            res,
        )
    }

    pub fn tour_tsp_greedy_heuristic(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.tour_exec("tour_tsp_greedy_heuristic", tour::tsp_greedy, graph, res)
    }

    pub fn tour_tsp_nearest_insertion_heuristic(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.tour_exec("tour_tsp_nearest_insertion_heuristic", tour::tsp_nearest_insertion, graph, res)
    }

    /// Doubled-MST tour; within twice the optimum when weights are metric
    pub fn tour_metric_tsp_two_approx(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.tour_exec("tour_metric_tsp_two_approx", tour::metric_tsp_two_approx, graph, res)
    }

    /// Christofides; within 3/2 of the optimum when weights are metric
    pub fn tour_metric_tsp_christofides(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.tour_exec("tour_metric_tsp_christofides", tour::metric_tsp_christofides, graph, res)
    }

    /// Hamiltonian cycle by Palmer's algorithm; the graph need not be complete but must
    /// satisfy Ore's condition
    pub fn tour_hamiltonian_palmer(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.tour_exec("tour_hamiltonian_palmer", tour::hamiltonian_palmer, graph, res)
    }

    /// Exact dynamic program; small graphs only
    pub fn tour_tsp_held_karp(&mut self, graph: Handle, res: &mut Handle) -> Status {
        self.tour_exec("tour_tsp_held_karp", tour::tsp_held_karp, graph, res)
    }

    pub fn tour_tsp_two_opt_heuristic(
        &mut self,
        graph: Handle,
        passes: usize,
        min_cost_improvement: f64,
        seed: u64,
        res: &mut Handle,
    ) -> Status {
        let config = TwoOptConfig {
            passes,
            min_cost_improvement,
            seed,
        };
        self.tour_exec("tour_tsp_two_opt_heuristic", |v| tour::tsp_two_opt(v, config), graph, res)
    }

    /// 2-opt local search starting from an existing tour
    pub fn tour_tsp_two_opt_heuristic_improve(
        &mut self,
        graph: Handle,
        path: Handle,
        min_cost_improvement: f64,
        res: &mut Handle,
    ) -> Status {
        self.run("tour_tsp_two_opt_heuristic_improve", |ctx| {
            let initial = ctx.registry().path(path)?.clone();
            let view = ctx.view_of(graph)?;
            let tour = timed("two-opt improve", &view, |v| {
                Ok(tour::tsp_two_opt_improve(v, &initial, min_cost_improvement)?)
            })?;
            *res = ctx.register(Object::Path(tour))?;
            Ok(())
        })
    }
}
