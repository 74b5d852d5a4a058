use serde::Serialize;

/// Position of a route record inside its [`RouteSet`].
pub type RouteIndex = usize;

/// Directed connection between two location names as supplied by the loader.
///
/// Endpoints are kept as names; they are resolved against a registry when a
/// [`RouteNetwork`](crate::graph::RouteNetwork) is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub origin: String,
    pub destination: String,
    /// Free-text mode of transport, informational only.
    pub transport: String,
    /// Travel time in hours.
    pub time: f64,
    /// Monetary cost.
    pub cost: f64,
    pub note: String,
    /// Explicit length in kilometres; when absent the great-circle distance
    /// between the resolved endpoints is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl Route {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        transport: impl Into<String>,
        time: f64,
        cost: f64,
        note: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            transport: transport.into(),
            time,
            cost,
            note: note.into(),
            distance_km: None,
        }
    }

    pub fn with_distance(mut self, distance_km: f64) -> Self {
        self.distance_km = Some(distance_km);
        self
    }
}

/// Append-only collection of directed routes.
#[derive(Debug, Clone, Default)]
pub struct RouteSet {
    routes: Vec<Route>,
}

impl RouteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a route. Endpoints need not exist yet.
    pub fn add_route(
        &mut self,
        origin: &str,
        destination: &str,
        transport: &str,
        time: f64,
        cost: f64,
        note: &str,
    ) -> RouteIndex {
        self.push(Route::new(origin, destination, transport, time, cost, note))
    }

    pub fn push(&mut self, route: Route) -> RouteIndex {
        let index = self.routes.len();
        self.routes.push(route);
        index
    }

    pub fn get(&self, index: RouteIndex) -> Option<&Route> {
        self.routes.get(index)
    }

    /// Lazily yield the records leaving `origin`. Each call starts a fresh scan.
    pub fn outgoing<'a>(
        &'a self,
        origin: &'a str,
    ) -> impl Iterator<Item = (RouteIndex, &'a Route)> + 'a {
        self.iter().filter(move |(_, route)| route.origin == origin)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RouteIndex, &Route)> {
        self.routes.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outgoing_filters_by_origin_and_restarts() {
        let mut routes = RouteSet::new();
        routes.add_route("A", "B", "train", 2.0, 10.0, "");
        routes.add_route("B", "C", "bus", 3.0, 5.0, "");
        routes.add_route("A", "C", "plane", 10.0, 1.0, "red-eye");

        let first: Vec<RouteIndex> = routes.outgoing("A").map(|(index, _)| index).collect();
        let second: Vec<RouteIndex> = routes.outgoing("A").map(|(index, _)| index).collect();
        assert_eq!(first, vec![0, 2]);
        assert_eq!(first, second);
        assert_eq!(routes.outgoing("C").count(), 0);
    }

    #[test]
    fn routes_may_reference_unknown_names() {
        let mut routes = RouteSet::new();
        let index = routes.add_route("Atlantis", "El Dorado", "ship", 1.0, 1.0, "");
        assert_eq!(routes.get(index).unwrap().origin, "Atlantis");
        assert_eq!(routes.len(), 1);
    }

    #[test]
    fn explicit_distance_is_kept() {
        let route = Route::new("A", "B", "road", 1.0, 1.0, "").with_distance(42.0);
        assert_eq!(route.distance_km, Some(42.0));
    }
}
