//! Forces applied by the simulation each tick.
//!
//! Each force only writes velocities; positions are integrated afterwards by the simulation so
//! the order in which forces run does not change what they observe of node positions.

use log::warn;
use rand::Rng;

use super::simulation::{SimLink, SimNode};

/// A tiny offset used in place of an exact zero separation.
pub fn jiggle(random: &mut impl Rng) -> f64 {
	(random.random::<f64>() - 0.5) * 1e-6
}

/// Pairwise charge between all nodes. Negative strengths repel.
///
/// Exact O(n²) summation: fine for the few hundred nodes of a persons network, the limiting
/// factor for anything much larger.
#[derive(Clone, Debug)]
pub struct ManyBody {
	/// Charge of each node, indexed like the simulation's nodes.
	pub strengths: Vec<f64>,
	distance_min2: f64,
	distance_max2: f64,
}

impl ManyBody {
	/// Charges act between `distance_min` (closer pairs are clamped to it) and `distance_max`.
	pub fn new(strengths: Vec<f64>, distance_min: f64, distance_max: f64) -> Self {
		Self {
			strengths,
			distance_min2: distance_min * distance_min,
			distance_max2: distance_max * distance_max,
		}
	}

	/// `(min, max)` distances over which charges act.
	pub fn distance_band(&self) -> (f64, f64) {
		(self.distance_min2.sqrt(), self.distance_max2.sqrt())
	}

	/// Adds every pair's repulsion to node velocities.
	pub fn apply(&self, nodes: &mut [SimNode], alpha: f64, random: &mut impl Rng) {
		let positions: Vec<(f64, f64)> = nodes.iter().map(|n| (n.x, n.y)).collect();
		for (i, node) in nodes.iter_mut().enumerate() {
			for (j, &(ox, oy)) in positions.iter().enumerate() {
				if i == j {
					continue;
				}
				let (mut x, mut y) = (ox - node.x, oy - node.y);
				let mut l = x * x + y * y;
				if l >= self.distance_max2 {
					continue;
				}
				if x == 0.0 {
					x = jiggle(random);
					l += x * x;
				}
				if y == 0.0 {
					y = jiggle(random);
					l += y * y;
				}
				if l < self.distance_min2 {
					l = (self.distance_min2 * l).sqrt();
				}
				let w = self.strengths.get(j).copied().unwrap_or(0.0) * alpha / l;
				node.vx += x * w;
				node.vy += y * w;
			}
		}
	}
}

/// Springs pulling linked nodes toward a rest distance.
#[derive(Clone, Debug)]
pub struct LinkForce {
	/// Rest length of every spring.
	pub distance: f64,
	strengths: Vec<f64>,
	bias: Vec<f64>,
}

impl LinkForce {
	/// `strengths` overrides the default of `1 / min(degree(source), degree(target))`. It is
	/// ignored unless it has exactly one entry per link. Links with an endpoint outside
	/// `0..node_count` add no degree and exert no force.
	pub fn new(
		node_count: usize,
		links: &[SimLink],
		distance: f64,
		strengths: Option<Vec<f64>>,
	) -> Self {
		let mut degree = vec![0usize; node_count];
		for link in links {
			if link.source < node_count && link.target < node_count {
				degree[link.source] += 1;
				degree[link.target] += 1;
			}
		}
		let degree_of = |i: usize| degree.get(i).copied().unwrap_or(0) as f64;
		let bias = links
			.iter()
			.map(|l| {
				let (s, t) = (degree_of(l.source), degree_of(l.target));
				if s + t > 0.0 { s / (s + t) } else { 0.5 }
			})
			.collect();
		let strengths = match strengths {
			Some(strengths) if strengths.len() == links.len() => strengths,
			given => {
				if let Some(given) = given {
					warn!(
						"link force: {} strengths for {} links, using degree defaults",
						given.len(),
						links.len()
					);
				}
				links
					.iter()
					.map(|l| {
						let d = degree_of(l.source).min(degree_of(l.target));
						if d > 0.0 { 1.0 / d } else { 0.0 }
					})
					.collect()
			}
		};
		Self {
			distance,
			strengths,
			bias,
		}
	}

	/// Strength of the spring for `link`.
	pub fn strength(&self, link: usize) -> Option<f64> {
		self.strengths.get(link).copied()
	}

	/// Adds each spring's pull to the velocities of its endpoints.
	pub fn apply(&self, nodes: &mut [SimNode], links: &[SimLink], alpha: f64, random: &mut impl Rng) {
		for (i, link) in links.iter().enumerate() {
			let (Some(source), Some(target)) = (nodes.get(link.source), nodes.get(link.target))
			else {
				continue;
			};
			let (Some(&strength), Some(&b)) = (self.strengths.get(i), self.bias.get(i)) else {
				continue;
			};
			let mut x = target.x + target.vx - source.x - source.vx;
			if x == 0.0 {
				x = jiggle(random);
			}
			let mut y = target.y + target.vy - source.y - source.vy;
			if y == 0.0 {
				y = jiggle(random);
			}
			let l = (x * x + y * y).sqrt();
			let l = (l - self.distance) / l * alpha * strength;
			let (x, y) = (x * l, y * l);

			let target = &mut nodes[link.target];
			target.vx -= x * b;
			target.vy -= y * b;
			let source = &mut nodes[link.source];
			source.vx += x * (1.0 - b);
			source.vy += y * (1.0 - b);
		}
	}
}

/// Weak pull of every node toward the origin, independently per axis.
#[derive(Clone, Debug)]
pub struct Centering {
	/// Pull per unit of horizontal offset.
	pub strength_x: f64,
	/// Pull per unit of vertical offset.
	pub strength_y: f64,
}

impl Centering {
	/// Same strength on both axes.
	pub fn new(strength: f64) -> Self {
		Self {
			strength_x: strength,
			strength_y: strength,
		}
	}

	/// Adds the pull toward the origin to node velocities.
	pub fn apply(&self, nodes: &mut [SimNode], alpha: f64) {
		for node in nodes.iter_mut() {
			node.vx += -node.x * self.strength_x * alpha;
		}
		for node in nodes.iter_mut() {
			node.vy += -node.y * self.strength_y * alpha;
		}
	}
}
