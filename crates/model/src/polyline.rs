use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Coordinate, ExampleData};

/// An ordered path of coordinates, e.g. the overview line of a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Polyline(Vec<Coordinate>);

impl Polyline {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Coordinate> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Coordinate> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coordinate> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Coordinate> {
        self.0
    }

    /// Length of the path in meters, summed over its great circle segments.
    pub fn length_meters(&self) -> f64 {
        self.0
            .windows(2)
            .map(|segment| segment[0].distance_to(&segment[1]))
            .sum()
    }
}

impl From<Vec<Coordinate>> for Polyline {
    fn from(points: Vec<Coordinate>) -> Self {
        Self(points)
    }
}

impl FromIterator<Coordinate> for Polyline {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Polyline {
    type Item = Coordinate;
    type IntoIter = std::vec::IntoIter<Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Polyline {
    type Item = &'a Coordinate;
    type IntoIter = std::slice::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl ExampleData for Polyline {
    fn example_data() -> Self {
        let start = Coordinate::example_data();
        Self(vec![start, start.offset(90.0, 250.0), start.offset(60.0, 600.0)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_of_empty_and_single_point_paths_is_zero() {
        assert_eq!(Polyline::default().length_meters(), 0.0);
        assert_eq!(
            Polyline::new(vec![Coordinate::example_data()]).length_meters(),
            0.0
        );
    }

    #[test]
    fn length_sums_segments() {
        let start = Coordinate::example_data();
        let middle = start.offset(0.0, 300.0);
        let end = middle.offset(90.0, 400.0);
        let polyline: Polyline = vec![start, middle, end].into();
        assert!((polyline.length_meters() - 700.0).abs() < 1e-6);
    }

    #[test]
    fn serializes_as_plain_list() {
        let polyline = Polyline::new(vec![Coordinate::new(1.5, 2.5).unwrap()]);
        assert_eq!(
            serde_json::to_string(&polyline).unwrap(),
            r#"[{"latitude":1.5,"longitude":2.5}]"#
        );
    }
}
