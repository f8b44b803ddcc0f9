//! Drawable route line.
//!
//! Turns a [`Route`] into styled line segments and maps points touched on
//! the line back to the waypoint they follow.

use crate::haversine::distance_m;
use crate::model::{Coordinate, LineStyle, Route};

#[derive(Debug, Clone, PartialEq)]
pub struct RouteLineOptions {
    pub styles: Vec<LineStyle>,
    /// Styles of the connector drawn between a waypoint and a distant route.
    pub missing_route_styles: Vec<LineStyle>,
    /// Whether route segments react to touches.
    pub add_waypoints: bool,
    pub extend_to_waypoints: bool,
    /// Meters a waypoint may sit from the route before a connector is drawn.
    pub missing_route_tolerance: f64,
}

impl Default for RouteLineOptions {
    fn default() -> Self {
        Self {
            styles: vec![LineStyle::casing(), LineStyle::new("#06a6d4", 1.0, 6.0)],
            missing_route_styles: vec![
                LineStyle::new("black", 0.15, 8.0),
                LineStyle::new("white", 0.6, 6.0),
                LineStyle::new("gray", 0.8, 4.0).dashed("7,12"),
            ],
            add_waypoints: true,
            extend_to_waypoints: true,
            missing_route_tolerance: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Route,
    MissingRoute,
}

/// One polyline drawn with one style.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    pub kind: SegmentKind,
    pub coordinates: Vec<Coordinate>,
    pub style: LineStyle,
    pub interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

/// A touch on the route line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineTouched {
    /// Input waypoint the touched point follows; `None` before the first.
    pub after_index: Option<usize>,
    pub latlng: Coordinate,
}

#[derive(Debug, Clone)]
pub struct RouteLine<'a> {
    route: &'a Route,
    options: RouteLineOptions,
    waypoint_indices: Vec<usize>,
    segments: Vec<LineSegment>,
}

impl<'a> RouteLine<'a> {
    pub fn new(route: &'a Route, options: RouteLineOptions) -> Self {
        let waypoint_indices = route.waypoint_indices.clone().unwrap_or_else(|| {
            route
                .input_waypoints
                .iter()
                .filter_map(|wp| closest_route_point(&route.coordinates, wp.latlng))
                .collect()
        });

        let mut line = Self {
            route,
            options,
            waypoint_indices,
            segments: Vec::new(),
        };
        if line.options.extend_to_waypoints {
            line.extend_to_waypoints();
        }
        line.add_route_segments();
        line
    }

    pub fn route(&self) -> &Route {
        self.route
    }

    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    /// Route coordinate index nearest each input waypoint.
    pub fn waypoint_indices(&self) -> &[usize] {
        &self.waypoint_indices
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let (first, rest) = self.route.coordinates.split_first()?;
        let mut bounds = Bounds {
            south_west: *first,
            north_east: *first,
        };
        for c in rest {
            bounds.south_west.lat = bounds.south_west.lat.min(c.lat);
            bounds.south_west.lng = bounds.south_west.lng.min(c.lng);
            bounds.north_east.lat = bounds.north_east.lat.max(c.lat);
            bounds.north_east.lng = bounds.north_east.lng.max(c.lng);
        }
        Some(bounds)
    }

    /// Maps a touched point to the waypoint it follows.
    pub fn line_touched(&self, latlng: Coordinate) -> Option<LineTouched> {
        let index = closest_route_point(&self.route.coordinates, latlng)?;
        Some(LineTouched {
            after_index: self.nearest_waypoint_before(index),
            latlng,
        })
    }

    /// Last waypoint whose route index is not past `index`.
    pub fn nearest_waypoint_before(&self, index: usize) -> Option<usize> {
        self.waypoint_indices
            .iter()
            .rposition(|&wp_index| wp_index <= index)
    }

    fn extend_to_waypoints(&mut self) {
        let connectors: Vec<[Coordinate; 2]> = self
            .route
            .input_waypoints
            .iter()
            .zip(&self.waypoint_indices)
            .filter_map(|(wp, &index)| {
                let route_point = *self.route.coordinates.get(index)?;
                (distance_m(wp.latlng, route_point) > self.options.missing_route_tolerance)
                    .then_some([wp.latlng, route_point])
            })
            .collect();

        for connector in connectors {
            let styles = self.options.missing_route_styles.clone();
            self.push_segment(SegmentKind::MissingRoute, &connector, &styles, false);
        }
    }

    fn add_route_segments(&mut self) {
        let route = self.route;
        let interactive = self.options.add_waypoints;
        let default_styles = self.options.styles.clone();
        match &route.sub_routes {
            Some(sub_routes) => {
                for sub_route in sub_routes {
                    let styles = sub_route.styles.as_ref().unwrap_or(&default_styles);
                    self.push_segment(SegmentKind::Route, &sub_route.coordinates, styles, interactive);
                }
            }
            None => {
                self.push_segment(SegmentKind::Route, &route.coordinates, &default_styles, interactive);
            }
        }
    }

    fn push_segment(
        &mut self,
        kind: SegmentKind,
        coordinates: &[Coordinate],
        styles: &[LineStyle],
        interactive: bool,
    ) {
        self.segments.extend(styles.iter().map(|style| LineSegment {
            kind,
            coordinates: coordinates.to_vec(),
            style: style.clone(),
            interactive,
        }));
    }
}

/// Index of the route point nearest `latlng`; ties go to the later index.
pub fn closest_route_point(coordinates: &[Coordinate], latlng: Coordinate) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &point) in coordinates.iter().enumerate().rev() {
        let d = distance_m(latlng, point);
        if best.is_none_or(|(_, min)| d < min) {
            best = Some((index, d));
        }
    }
    best.map(|(index, _)| index)
}
