//! Graph algorithms for the Strata graph engine
//!
//! Every algorithm runs over a [`GraphView`], an immutable CSR snapshot of a graph.

mod blossom;
pub mod centrality;
pub mod clique;
pub mod coloring;
pub mod common;
pub mod community;
pub mod cover;
pub mod cuts;
pub mod cycles;
pub mod error;
pub mod flow;
pub mod isomorphism;
pub mod matching;
pub mod mst;
pub mod pagerank;
pub mod pathfinding;
pub mod planarity;
pub mod spanner;
pub mod topology;
pub mod tour;
pub mod traversal;

pub use common::{Deadline, EdgeId, EdgeRecord, GraphView, NodeId, PathResult};
pub use error::{AlgoError, AlgoResult};

pub use centrality::{AlphaCentralityConfig, CentralityConfig};
pub use clique::CliqueStrategy;
pub use coloring::ColoringResult;
pub use community::{Clustering, LabelPropagationConfig};
pub use cover::VertexCoverResult;
pub use cuts::GlobalCut;
pub use cycles::{CycleBasis, EulerianResult};
pub use flow::{FlowProblem, FlowResult, MinCostFlowResult, MinCutResult};
pub use isomorphism::{GraphMapping, Vf2Mappings};
pub use matching::MatchingResult;
pub use mst::MSTResult;
pub use pagerank::{page_rank, PageRankConfig};
pub use pathfinding::{AllPairsResult, Heuristic, ShortestPathTree};
pub use planarity::{PlanarEmbedding, PlanarityResult};
pub use spanner::SpannerResult;
pub use tour::TwoOptConfig;
pub use traversal::{RandomWalk, RandomWalkConfig};
