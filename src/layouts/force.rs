//! Force-directed layout on top of the `force_graph` simulation.
//!
//! Nodes that already have a position start there; the rest are seeded on a
//! circle around the canvas centre. The simulation then runs a fixed number
//! of steps and the final positions are returned.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use crate::graph::{ItemId, LayoutError, LayoutProvider, LayoutRequest, Point};

/// Simulation settings, overridable per run through the layout options
/// (`iterations`, `forceCharge`, `forceSpring`, `forceMax`, `nodeSpeed`,
/// `dampingFactor`).
#[derive(Clone, Debug, PartialEq)]
pub struct ForceLayout {
	/// Simulation steps per run.
	pub iterations: usize,
	/// Seconds per simulation step.
	pub step: f32,
	/// Repulsion between nodes.
	pub force_charge: f32,
	/// Attraction along edges.
	pub force_spring: f32,
	/// Cap on the force applied per step.
	pub force_max: f32,
	/// Speed multiplier.
	pub node_speed: f32,
	/// Velocity kept between steps.
	pub damping_factor: f32,
	/// Radius of the ring unpositioned nodes start on.
	pub seed_radius: f64,
}

impl Default for ForceLayout {
	fn default() -> Self {
		Self {
			iterations: 300,
			step: 0.016,
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			seed_radius: 100.0,
		}
	}
}

impl LayoutProvider for ForceLayout {
	fn layout(&mut self, request: LayoutRequest<'_>) -> Result<HashMap<ItemId, Point>, LayoutError> {
		let config = request.config;
		let opt = |key: &str, fallback: f32| config.f64(key).map_or(fallback, |v| v as f32);
		let iterations = config.usize("iterations").unwrap_or(self.iterations);
		let mut graph: ForceGraph<usize, ()> = ForceGraph::new(SimulationParameters {
			force_charge: opt("forceCharge", self.force_charge),
			force_spring: opt("forceSpring", self.force_spring),
			force_max: opt("forceMax", self.force_max),
			node_speed: opt("nodeSpeed", self.node_speed),
			damping_factor: opt("dampingFactor", self.damping_factor),
		});

		let count = request.nodes.len().max(1) as f64;
		let center = Point::new(request.width / 2.0, request.height / 2.0);
		let mut index = HashMap::with_capacity(request.nodes.len());
		for (i, node) in request.nodes.iter().enumerate() {
			let seed = node.position.unwrap_or_else(|| {
				let angle = i as f64 * 2.0 * PI / count;
				Point::new(
					center.x + self.seed_radius * angle.cos(),
					center.y + self.seed_radius * angle.sin(),
				)
			});
			let idx = graph.add_node(NodeData {
				x: seed.x as f32,
				y: seed.y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: i,
			});
			index.insert(node.id.as_str(), idx);
		}
		for edge in request.edges {
			let (Some(&src), Some(&tgt)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str())) else {
				return Err(LayoutError {
					kind: "force".into(),
					reason: format!("edge {} -> {} references an unknown node", edge.source, edge.target),
				});
			};
			if src != tgt {
				graph.add_edge(src, tgt, EdgeData::default());
			}
		}

		for _ in 0..iterations {
			graph.update(self.step);
		}

		let mut positions = HashMap::with_capacity(request.nodes.len());
		graph.visit_nodes(|node| {
			let i = node.data.user_data;
			let (x, y) = (node.x() as f64, node.y() as f64);
			if let Some(layout_node) = request.nodes.get(i) {
				if x.is_finite() && y.is_finite() {
					positions.insert(layout_node.id.clone(), Point::new(x, y));
				}
			}
		});
		debug!("force layout: {} nodes after {iterations} steps", positions.len());
		Ok(positions)
	}
}
