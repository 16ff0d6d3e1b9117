use geo_types::{Coord, LineString, Polygon, Rect, coord};

/// Builds a closed, counter-clockwise rectangle polygon from lat/lon bounds.
pub fn create_rectangle(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = vec![
        coord! { x: lon_min, y: lat_min },
        coord! { x: lon_max, y: lat_min },
        coord! { x: lon_max, y: lat_max },
        coord! { x: lon_min, y: lat_max },
        coord! { x: lon_min, y: lat_min },
    ];
    Polygon::new(LineString::from(coords), vec![])
}

pub fn create_rect(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Rect<f64> {
    Rect::new(
        coord! { x: lon_min, y: lat_min },
        coord! { x: lon_max, y: lat_max },
    )
}
