//! Nodes evenly spaced on a circle, in insertion order.

use std::collections::HashMap;
use std::f64::consts::PI;

use crate::graph::{ItemId, LayoutError, LayoutProvider, LayoutRequest, Point};

/// Options: `radius` (default: fits the canvas), `startAngle` (radians).
#[derive(Clone, Copy, Debug, Default)]
pub struct CircularLayout;

impl LayoutProvider for CircularLayout {
	fn layout(&mut self, request: LayoutRequest<'_>) -> Result<HashMap<ItemId, Point>, LayoutError> {
		let center = Point::new(request.width / 2.0, request.height / 2.0);
		let widest = request.nodes.iter().map(|n| n.radius).fold(0.0, f64::max);
		let radius = request
			.config
			.f64("radius")
			.unwrap_or_else(|| (request.width.min(request.height) / 2.0 - widest).max(widest));
		let start = request.config.f64("startAngle").unwrap_or(0.0);
		let step = 2.0 * PI / request.nodes.len().max(1) as f64;

		Ok(request
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let angle = start + step * i as f64;
				(
					node.id.clone(),
					Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin()),
				)
			})
			.collect())
	}
}
