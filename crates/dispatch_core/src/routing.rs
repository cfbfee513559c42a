//! Route composition: chains shortest-path segments across an ordered stop
//! list into one continuous route, with an LRU cache over segment queries.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use bevy_ecs::prelude::Resource;
use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::graph::{NodeId, RoadGraph};

/// Default segment cache capacity.
const DEFAULT_ROUTE_CACHE_CAPACITY: usize = 4_096;

/// An ordered sequence of nodes with an associated total distance.
///
/// An unreachable route carries `distance == f64::INFINITY` and an empty
/// path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub distance: f64,
    pub path: Vec<NodeId>,
}

impl Route {
    /// The zero-distance route with no stops.
    pub fn empty() -> Self {
        Self {
            distance: 0.0,
            path: Vec::new(),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            distance: f64::INFINITY,
            path: Vec::new(),
        }
    }

    pub fn is_unreachable(&self) -> bool {
        self.distance.is_infinite()
    }
}

/// Shortest-path front end shared by the matching strategies.
///
/// Segment results are memoized in an LRU cache keyed by the directional
/// `(from, to)` pair. Only reachable routes are cached; failures are
/// recomputed, which is fine.
#[derive(Resource)]
pub struct RoutePlanner {
    cache: Mutex<LruCache<(NodeId, NodeId), Route>>,
}

impl Default for RoutePlanner {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_ROUTE_CACHE_CAPACITY)
    }
}

impl RoutePlanner {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity.max(1)).expect("cache capacity must be > 0"),
            )),
        }
    }

    /// Cached single-segment shortest path.
    pub fn shortest_path(&self, graph: &RoadGraph, from: &str, to: &str) -> Route {
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(cached) = cache.get(&(from.to_string(), to.to_string())) {
                return cached.clone();
            }
        }

        let route = graph.shortest_path(from, to);
        if !route.is_unreachable() {
            if let Ok(mut cache) = self.cache.lock() {
                cache.put((from.to_string(), to.to_string()), route.clone());
            }
        }
        route
    }

    /// Multi-segment route across an ordered stop list.
    ///
    /// Fewer than two stops compose to the zero-distance empty route. The
    /// first segment contributes its full path; each later segment drops its
    /// leading node, which duplicates the previous segment's trailing node.
    /// An unreachable segment makes the whole route unreachable immediately;
    /// partial distances are never summed.
    pub fn compose(&self, graph: &RoadGraph, stops: &[NodeId]) -> Route {
        if stops.len() < 2 {
            return Route::empty();
        }

        let mut distance = 0.0;
        let mut path: Vec<NodeId> = Vec::new();
        for (index, pair) in stops.windows(2).enumerate() {
            let segment = self.shortest_path(graph, &pair[0], &pair[1]);
            if segment.is_unreachable() {
                return Route::unreachable();
            }
            distance += segment.distance;
            if index == 0 {
                path = segment.path;
            } else {
                path.extend(segment.path.into_iter().skip(1));
            }
        }

        Route { distance, path }
    }
}
