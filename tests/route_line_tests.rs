//! Route line tests
//!
//! Segment styling, connectors to distant waypoints and touch mapping.

mod fixtures;

use otp_route_adapter::line::{RouteLine, RouteLineOptions, SegmentKind};
use otp_route_adapter::model::Summary;
use otp_route_adapter::{Coordinate, LineStyle, Route, SubRoute, Waypoint};

use fixtures::*;

fn route_through(points: &[(f64, f64)], input: &[(f64, f64)]) -> Route {
    Route {
        summary: Summary::default(),
        coordinates: points.iter().copied().map(Coordinate::from).collect(),
        instructions: Vec::new(),
        unit: "m".to_string(),
        costing: None,
        sub_routes: None,
        input_waypoints: input.iter().copied().map(Waypoint::new).collect(),
        output_waypoints: Vec::new(),
        waypoint_indices: None,
    }
}

fn bus_route() -> Vec<(f64, f64)> {
    coords(BUS_14)
}

#[test]
fn whole_route_drawn_once_per_style() {
    let points = bus_route();
    let route = route_through(&points, &[points[0], points[5]]);

    let line = RouteLine::new(&route, RouteLineOptions::default());

    assert_eq!(line.segments().len(), 2);
    assert!(line.segments().iter().all(|s| s.kind == SegmentKind::Route && s.interactive));
    assert_eq!(line.segments()[1].style.color, "#06a6d4");
    assert_eq!(line.segments()[0].coordinates.len(), points.len());
    assert_eq!(line.waypoint_indices(), &[0, 5]);
}

#[test]
fn distant_waypoint_gets_missing_route_connector() {
    let points = bus_route();
    // ~100 m north of the first route point
    let off_route = (points[0].0 + 0.0009, points[0].1);
    let route = route_through(&points, &[off_route, points[5]]);

    let line = RouteLine::new(&route, RouteLineOptions::default());

    let missing: Vec<_> = line
        .segments()
        .iter()
        .filter(|s| s.kind == SegmentKind::MissingRoute)
        .collect();
    assert_eq!(missing.len(), 3);
    assert!(missing.iter().all(|s| !s.interactive));
    assert_eq!(missing[0].coordinates, vec![Coordinate::from(off_route), Coordinate::from(points[0])]);
    assert_eq!(missing[2].style.dash_array.as_deref(), Some("7,12"));
}

#[test]
fn connectors_can_be_disabled() {
    let points = bus_route();
    let off_route = (points[0].0 + 0.0009, points[0].1);
    let route = route_through(&points, &[off_route, points[5]]);
    let options = RouteLineOptions {
        extend_to_waypoints: false,
        add_waypoints: false,
        ..RouteLineOptions::default()
    };

    let line = RouteLine::new(&route, options);

    assert!(line.segments().iter().all(|s| s.kind == SegmentKind::Route && !s.interactive));
}

#[test]
fn sub_routes_use_own_styles_or_defaults() {
    let walk = coords(WALK_TO_STOP);
    let bus = bus_route();
    let mut route = route_through(&[walk.clone(), bus.clone()].concat(), &[walk[0], bus[5]]);
    route.sub_routes = Some(vec![
        SubRoute {
            coordinates: walk.iter().copied().map(Coordinate::from).collect(),
            travel_type: Some("walk".to_string()),
            styles: None,
        },
        SubRoute {
            coordinates: bus.iter().copied().map(Coordinate::from).collect(),
            travel_type: Some("bus".to_string()),
            styles: Some(vec![LineStyle::casing(), LineStyle::new("#1C4CA5", 1.0, 6.0)]),
        },
    ]);

    let line = RouteLine::new(&route, RouteLineOptions::default());

    let colors: Vec<_> = line.segments().iter().map(|s| s.style.color.as_str()).collect();
    assert_eq!(colors, vec!["white", "#06a6d4", "white", "#1C4CA5"]);
    assert_eq!(line.segments()[3].coordinates.len(), bus.len());
}

#[test]
fn touch_maps_to_preceding_waypoint() {
    let points = bus_route();
    let mut route = route_through(&points, &[points[0], points[3], points[5]]);
    route.waypoint_indices = Some(vec![0, 3, 5]);

    let line = RouteLine::new(&route, RouteLineOptions::default());

    let near_bridge_east = Coordinate::new(points[4].0 + 0.00001, points[4].1);
    let touched = line.line_touched(near_bridge_east).unwrap();
    assert_eq!(touched.after_index, Some(1));
    assert_eq!(touched.latlng, near_bridge_east);

    assert_eq!(line.line_touched(Coordinate::from(points[1])).unwrap().after_index, Some(0));
    assert_eq!(line.line_touched(Coordinate::from(points[5])).unwrap().after_index, Some(2));
}

#[test]
fn touch_before_first_waypoint_has_no_index() {
    let points = bus_route();
    let mut route = route_through(&points, &[points[2], points[5]]);
    route.waypoint_indices = Some(vec![2, 5]);

    let line = RouteLine::new(&route, RouteLineOptions::default());

    assert_eq!(line.nearest_waypoint_before(1), None);
    assert_eq!(line.nearest_waypoint_before(2), Some(0));
}

#[test]
fn bounds_cover_route() {
    let points = bus_route();
    let route = route_through(&points, &[points[0], points[5]]);

    let bounds = RouteLine::new(&route, RouteLineOptions::default()).bounds().unwrap();

    assert_eq!(bounds.south_west, Coordinate::new(45.51231, -122.67811));
    assert_eq!(bounds.north_east, Coordinate::new(45.51723, -122.66103));
}

#[test]
fn empty_route_draws_nothing_touchable() {
    let route = route_through(&[], &[(45.5, -122.6), (45.6, -122.7)]);

    let line = RouteLine::new(&route, RouteLineOptions::default());

    assert!(line.bounds().is_none());
    assert!(line.line_touched(Coordinate::new(45.5, -122.6)).is_none());
    assert!(line.segments().iter().all(|s| s.coordinates.is_empty()));
}
