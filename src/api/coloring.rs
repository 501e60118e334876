//! Vertex coloring: number of colors plus a vertex to color map

use super::vertex_map;
use crate::algo::timed;
use crate::containers::Element;
use crate::context::Context;
use crate::error::{GraphResult, Status};
use crate::handle::Handle;
use strata_algorithms::{coloring, AlgoResult, ColoringResult, GraphView};

impl Context {
    fn coloring_exec<F>(&mut self, op: &'static str, algorithm: F, graph: Handle, colors: &mut usize, res: &mut Handle) -> Status
    where
        F: FnOnce(&GraphView) -> AlgoResult<ColoringResult>,
    {
        self.run(op, |ctx| {
            let view = ctx.view_of(graph)?;
            let coloring = timed(op, &view, |v| -> GraphResult<ColoringResult> { Ok(algorithm(v)?) })?;
            let map = ctx.register(vertex_map(&view, &coloring.colors, |c| Element::Int(*c as i64)))?;
            *colors = coloring.number_of_colors;
            *res = map;
            Ok(())
        })
    }

    /// Smallest color not used by a neighbour, in vertex order
    pub fn coloring_exec_greedy(&mut self, graph: Handle, colors: &mut usize, res: &mut Handle) -> Status {
        self.coloring_exec("coloring_exec_greedy", coloring::greedy, graph, colors, res)
    }

    pub fn coloring_exec_greedy_largestdegreefirst(&mut self, graph: Handle, colors: &mut usize, res: &mut Handle) -> Status {
        self.coloring_exec(
            "coloring_exec_greedy_largestdegreefirst",
            coloring::greedy_largest_degree_first,
            graph,
            colors,
            res,
        )
    }

    pub fn coloring_exec_greedy_smallestdegreelast(&mut self, graph: Handle, colors: &mut usize, res: &mut Handle) -> Status {
        self.coloring_exec(
            "coloring_exec_greedy_smallestdegreelast",
            coloring::greedy_smallest_degree_last,
            graph,
            colors,
            res,
        )
    }

    pub fn coloring_exec_greedy_random(&mut self, graph: Handle, seed: u64, colors: &mut usize, res: &mut Handle) -> Status {
        self.coloring_exec(
            "coloring_exec_greedy_random",
            |v| coloring::greedy_random(v, seed),
            graph,
            colors,
            res,
        )
    }

    pub fn coloring_exec_greedy_dsatur(&mut self, graph: Handle, colors: &mut usize, res: &mut Handle) -> Status {
        self.coloring_exec("coloring_exec_greedy_dsatur", coloring::dsatur, graph, colors, res)
    }

    pub fn coloring_exec_color_refinement(&mut self, graph: Handle, colors: &mut usize, res: &mut Handle) -> Status {
        self.coloring_exec("coloring_exec_color_refinement", coloring::color_refinement, graph, colors, res)
    }
}
