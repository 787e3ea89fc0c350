//! A navigable graph over route geometry, with nearest-node snapping and
//! shortest-path search.
//!
//! Node identity is decided once, at construction time, by quantizing
//! coordinates to integer microdegrees (the precision of the polyline6
//! geometry itself), so near-duplicate vertices computed independently by
//! different routes collapse onto a single node instead of hashing apart.

use crate::geodesy::{haversine_km, LatLng};
use crate::route::Route;
use log::info;
use ordered_float::OrderedFloat;
use pathfinding::prelude::{astar, build_path, dijkstra_all};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Index of a node in a [RouteGraph], assigned in insertion order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeIndex(pub u32);

/// A node's quantized identity: (lat, lng) in integer microdegrees.
type NodeKey = (i32, i32);

/// An outgoing edge: target node and weight in km.
type Edge = (NodeIndex, f64);

/// How a [RouteGraph] derives its nodes from the route set.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum GraphStrategy {
    /// Every decoded route vertex is a node; consecutive vertices are
    /// joined by bidirectional edges. The default, and the strategy used
    /// for point-to-point queries.
    #[default]
    VertexChain,
    /// Only route endpoints and vertices shared by two or more routes are
    /// nodes; each edge spans the intervening vertex chain with its
    /// accumulated length. Produces a much smaller graph at the cost of
    /// path detail.
    Intersections,
}

/// A weighted graph whose nodes are (quantized) route vertices.
#[derive(Clone, Debug, Default)]
pub struct RouteGraph {
    /// Node positions, indexed by [NodeIndex].
    nodes: Vec<LatLng>,
    /// Outgoing edges per node. Nearly all polyline vertices have exactly
    /// two neighbours, one per direction along the chain.
    adjacency: Vec<SmallVec<[Edge; 2]>>,
    /// Quantized coordinate → node, built once during construction.
    index: HashMap<NodeKey, NodeIndex>,
}

/// Quantizes a coordinate to its node key.
fn quantize(point: LatLng) -> NodeKey {
    ((point.lat * 1e6).round() as i32, (point.lng * 1e6).round() as i32)
}

impl RouteGraph {
    /// Builds a graph from the route set using the given strategy.
    pub fn build<'a>(
        routes: impl IntoIterator<Item = &'a Route>,
        strategy: GraphStrategy,
    ) -> Self {
        let mut graph = Self::default();
        match strategy {
            GraphStrategy::VertexChain => graph.build_vertex_chain(routes),
            GraphStrategy::Intersections => graph.build_intersections(routes),
        }
        info!(
            "route graph built ({:?}): {} nodes, {} edges",
            strategy,
            graph.node_count(),
            graph.edge_count(),
        );
        graph
    }

    fn build_vertex_chain<'a>(&mut self, routes: impl IntoIterator<Item = &'a Route>) {
        for route in routes {
            let mut prev: Option<NodeIndex> = None;
            for point in route.points() {
                let node = self.add_node(*point);
                if let Some(prev) = prev {
                    if prev != node {
                        let km = haversine_km(self.nodes[prev.0 as usize], *point);
                        self.add_edge(prev, node, km);
                        self.add_edge(node, prev, km);
                    }
                }
                prev = Some(node);
            }
        }
    }

    fn build_intersections<'a>(&mut self, routes: impl IntoIterator<Item = &'a Route>) {
        let routes: Vec<&Route> = routes.into_iter().collect();

        // A vertex anchors the graph if it ends a route or appears in more
        // than one route.
        let mut seen_by: HashMap<NodeKey, u32> = HashMap::new();
        for route in &routes {
            let unique: HashSet<NodeKey> = route.points().iter().copied().map(quantize).collect();
            for key in unique {
                *seen_by.entry(key).or_insert(0) += 1;
            }
        }
        let is_anchor = |route: &Route, index: usize| {
            index == 0
                || index == route.points().len() - 1
                || seen_by[&quantize(route.points()[index])] >= 2
        };

        for route in &routes {
            let mut prev_anchor: Option<NodeIndex> = None;
            let mut chain_km = 0.0;
            for (index, point) in route.points().iter().enumerate() {
                if index > 0 {
                    chain_km += route.cumulative_km()[index] - route.cumulative_km()[index - 1];
                }
                if !is_anchor(route, index) {
                    continue;
                }
                let node = self.add_node(*point);
                if let Some(prev) = prev_anchor {
                    if prev != node && chain_km > 0.0 {
                        self.add_edge(prev, node, chain_km);
                        self.add_edge(node, prev, chain_km);
                    }
                }
                prev_anchor = Some(node);
                chain_km = 0.0;
            }
        }
    }

    /// Adds a node for the coordinate, or returns the existing node when
    /// the quantized position is already present.
    pub fn add_node(&mut self, point: LatLng) -> NodeIndex {
        let key = quantize(point);
        if let Some(node) = self.index.get(&key) {
            return *node;
        }
        let node = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(point);
        self.adjacency.push(SmallVec::new());
        self.index.insert(key, node);
        node
    }

    /// Adds a directed edge with a weight in km.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, km: f64) {
        self.adjacency[from.0 as usize].push((to, km));
    }

    /// The number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The number of directed edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|edges| edges.len()).sum()
    }

    /// The position of a node.
    pub fn position(&self, node: NodeIndex) -> LatLng {
        self.nodes[node.0 as usize]
    }

    /// Finds the node nearest to an arbitrary query coordinate by linear
    /// scan, or `None` when the graph is empty.
    ///
    /// Node counts are bounded by total route geometry (low thousands), so
    /// a scan is adequate; a spatial index would only matter well beyond
    /// that.
    pub fn nearest_node(&self, query: LatLng) -> Option<NodeIndex> {
        self.nodes
            .iter()
            .enumerate()
            .min_by_key(|(_, point)| OrderedFloat(haversine_km(query, **point)))
            .map(|(index, _)| NodeIndex(index as u32))
    }

    /// Runs a single-source shortest-path search (Dijkstra) from a node.
    ///
    /// Equal-cost frontier ties resolve deterministically because node
    /// indices are assigned in insertion order and adjacency lists are
    /// iterated in insertion order.
    pub fn shortest_path_tree(&self, start: NodeIndex) -> ShortestPathTree {
        let parents = dijkstra_all(&start, |node| {
            self.adjacency[node.0 as usize]
                .iter()
                .map(|(to, km)| (*to, OrderedFloat(*km)))
        });
        ShortestPathTree { start, parents }
    }

    /// Answers a point-to-point query: snaps both coordinates to their
    /// nearest nodes, searches from the start, and walks predecessors back
    /// from the end.
    ///
    /// An unsnappable or unreachable query yields an empty path; that is a
    /// normal "no route" outcome, not a failure.
    pub fn shortest_path(&self, start: LatLng, end: LatLng) -> Vec<LatLng> {
        let (Some(from), Some(to)) = (self.nearest_node(start), self.nearest_node(end)) else {
            return Vec::new();
        };
        self.shortest_path_tree(from)
            .path_to(to)
            .into_iter()
            .map(|node| self.position(node))
            .collect()
    }

    /// Heuristic-guided (A*) variant of [Self::shortest_path] for queries
    /// with a fixed destination, using the great-circle distance to the
    /// snapped end node as the admissible heuristic.
    ///
    /// Returns the path and its total cost in km, or `None` when there is
    /// no route. The cost always equals the Dijkstra-derived cost for the
    /// same pair of endpoints.
    pub fn shortest_path_astar(&self, start: LatLng, end: LatLng) -> Option<(Vec<LatLng>, f64)> {
        let (from, to) = (self.nearest_node(start)?, self.nearest_node(end)?);
        let goal = self.position(to);
        let (path, cost) = astar(
            &from,
            |node| {
                self.adjacency[node.0 as usize]
                    .iter()
                    .map(|(to, km)| (*to, OrderedFloat(*km)))
                    .collect::<Vec<_>>()
            },
            |node| OrderedFloat(haversine_km(self.position(*node), goal)),
            |node| *node == to,
        )?;
        Some((
            path.into_iter().map(|node| self.position(node)).collect(),
            cost.into_inner(),
        ))
    }
}

/// The result of a single-source shortest-path search: a distance map and
/// a predecessor map over every reachable node.
pub struct ShortestPathTree {
    start: NodeIndex,
    parents: HashMap<NodeIndex, (NodeIndex, OrderedFloat<f64>)>,
}

impl ShortestPathTree {
    /// The node the search started from.
    pub fn start(&self) -> NodeIndex {
        self.start
    }

    /// The shortest distance to a node in km, or `None` if unreachable.
    pub fn distance_km(&self, node: NodeIndex) -> Option<f64> {
        if node == self.start {
            return Some(0.0);
        }
        self.parents.get(&node).map(|(_, km)| km.into_inner())
    }

    /// The node preceding `node` on its shortest path, or `None` for the
    /// start node and unreachable nodes.
    pub fn predecessor(&self, node: NodeIndex) -> Option<NodeIndex> {
        if node == self.start {
            return None;
        }
        self.parents.get(&node).map(|(parent, _)| *parent)
    }

    /// The full shortest path from the start to `node`, or an empty path
    /// if the node is unreachable.
    pub fn path_to(&self, node: NodeIndex) -> Vec<NodeIndex> {
        if node == self.start {
            return vec![self.start];
        }
        if !self.parents.contains_key(&node) {
            return Vec::new();
        }
        build_path(&node, &self.parents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyline::encode;
    use crate::route::{Route, RouteDefinition};
    use assert_approx_eq::assert_approx_eq;

    fn route_from(id: &str, points: &[LatLng]) -> Route {
        Route::from_definition(&RouteDefinition {
            id: id.to_owned(),
            name: id.to_owned(),
            color: "#000000".to_owned(),
            polyline: encode(points),
            average_speed_kmh: 40.0,
            origin_label: "A".to_owned(),
            destination_label: "B".to_owned(),
        })
        .unwrap()
    }

    #[test]
    fn dijkstra_on_a_three_node_path() {
        let mut graph = RouteGraph::default();
        let a = graph.add_node(LatLng::new(0.0, 0.0));
        let b = graph.add_node(LatLng::new(0.0, 1.0));
        let c = graph.add_node(LatLng::new(0.0, 2.0));
        graph.add_edge(a, b, 2.0);
        graph.add_edge(b, a, 2.0);
        graph.add_edge(b, c, 3.0);
        graph.add_edge(c, b, 3.0);

        let tree = graph.shortest_path_tree(a);
        assert_eq!(tree.distance_km(a), Some(0.0));
        assert_eq!(tree.distance_km(b), Some(2.0));
        assert_eq!(tree.distance_km(c), Some(5.0));
        assert_eq!(tree.predecessor(c), Some(b));
        assert_eq!(tree.predecessor(b), Some(a));
        assert_eq!(tree.predecessor(a), None);
        assert_eq!(tree.path_to(c), vec![a, b, c]);
    }

    #[test]
    fn unreachable_nodes_yield_an_empty_path() {
        let mut graph = RouteGraph::default();
        let a = graph.add_node(LatLng::new(0.0, 0.0));
        let b = graph.add_node(LatLng::new(5.0, 5.0));

        let tree = graph.shortest_path_tree(a);
        assert_eq!(tree.distance_km(b), None);
        assert!(tree.path_to(b).is_empty());
        assert!(graph
            .shortest_path(LatLng::new(0.1, 0.1), LatLng::new(4.9, 4.9))
            .is_empty());
    }

    #[test]
    fn empty_graph_yields_an_empty_path() {
        let graph = RouteGraph::default();
        assert!(graph.nearest_node(LatLng::new(1.0, 1.0)).is_none());
        assert!(graph
            .shortest_path(LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0))
            .is_empty());
    }

    #[test]
    fn shared_vertices_collapse_onto_one_node() {
        let shared = LatLng::new(23.75, 90.40);
        let r1 = route_from("r1", &[LatLng::new(23.70, 90.40), shared, LatLng::new(23.80, 90.40)]);
        let r2 = route_from("r2", &[LatLng::new(23.75, 90.35), shared, LatLng::new(23.75, 90.45)]);

        let graph = RouteGraph::build([&r1, &r2], GraphStrategy::VertexChain);
        // 6 vertices, but the shared midpoint is interned once.
        assert_eq!(graph.node_count(), 5);

        // A path from r1's start to r2's end crosses routes at the shared node.
        let path = graph.shortest_path(LatLng::new(23.70, 90.40), LatLng::new(23.75, 90.45));
        assert_eq!(path.len(), 3);
        assert_eq!(path[1].rounded(), shared.rounded());
    }

    #[test]
    fn snapping_picks_the_nearest_vertex() {
        let r = route_from("r", &[LatLng::new(23.70, 90.40), LatLng::new(23.80, 90.40)]);
        let graph = RouteGraph::build([&r], GraphStrategy::VertexChain);
        let node = graph.nearest_node(LatLng::new(23.79, 90.41)).unwrap();
        let snapped = graph.position(node).rounded();
        assert_eq!(snapped, LatLng::new(23.80, 90.40).rounded());
    }

    #[test]
    fn astar_matches_dijkstra_cost() {
        let shared = LatLng::new(23.75, 90.40);
        let r1 = route_from(
            "r1",
            &[
                LatLng::new(23.70, 90.40),
                LatLng::new(23.72, 90.39),
                shared,
                LatLng::new(23.80, 90.40),
            ],
        );
        let r2 = route_from(
            "r2",
            &[
                LatLng::new(23.75, 90.35),
                shared,
                LatLng::new(23.76, 90.43),
                LatLng::new(23.75, 90.45),
            ],
        );
        let graph = RouteGraph::build([&r1, &r2], GraphStrategy::VertexChain);

        let start = LatLng::new(23.70, 90.40);
        let end = LatLng::new(23.75, 90.45);
        let from = graph.nearest_node(start).unwrap();
        let to = graph.nearest_node(end).unwrap();

        let dijkstra_km = graph.shortest_path_tree(from).distance_km(to).unwrap();
        let (path, astar_km) = graph.shortest_path_astar(start, end).unwrap();
        assert_approx_eq!(dijkstra_km, astar_km, 1e-9);
        assert_eq!(path.len(), graph.shortest_path(start, end).len());
    }

    #[test]
    fn intersection_strategy_keeps_only_anchors() {
        let shared = LatLng::new(23.75, 90.40);
        let r1 = route_from(
            "r1",
            &[
                LatLng::new(23.70, 90.40),
                LatLng::new(23.72, 90.40),
                shared,
                LatLng::new(23.78, 90.40),
                LatLng::new(23.80, 90.40),
            ],
        );
        let r2 = route_from("r2", &[LatLng::new(23.75, 90.35), shared, LatLng::new(23.75, 90.45)]);

        let graph = RouteGraph::build([&r1, &r2], GraphStrategy::Intersections);
        // Anchors: two endpoints per route plus the shared vertex.
        assert_eq!(graph.node_count(), 5);

        // Edge weights span the collapsed chains, so end-to-end distances
        // agree with the full vertex-chain graph.
        let full = RouteGraph::build([&r1, &r2], GraphStrategy::VertexChain);
        for (a, b) in [
            (LatLng::new(23.70, 90.40), LatLng::new(23.80, 90.40)),
            (LatLng::new(23.75, 90.35), LatLng::new(23.80, 90.40)),
        ] {
            let coarse = graph
                .shortest_path_tree(graph.nearest_node(a).unwrap())
                .distance_km(graph.nearest_node(b).unwrap())
                .unwrap();
            let fine = full
                .shortest_path_tree(full.nearest_node(a).unwrap())
                .distance_km(full.nearest_node(b).unwrap())
                .unwrap();
            assert_approx_eq!(coarse, fine, 1e-9);
        }
    }
}
