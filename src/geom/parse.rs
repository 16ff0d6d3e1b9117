use crate::coord::validate_lat_long;
use crate::error::MeshError;
use geo::CoordsIter;
use geo_types::{Geometry, GeometryCollection, Polygon};
use geojson::GeoJson;
use std::fmt::Display;
use std::str::FromStr;
use wkt::{ToWkt, Wkt};

/// Text encoding of a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Well-Known Text format (e.g., "POLYGON((...))")
    Wkt,
    /// GeoJSON format
    GeoJson,
}

impl GeometryFormat {
    /// GeoJSON objects open with `{`, anything else is read as WKT.
    pub fn detect(text: &str) -> Self {
        if text.trim_start().starts_with('{') {
            GeometryFormat::GeoJson
        } else {
            GeometryFormat::Wkt
        }
    }

    /// Renders a square's polygon in this format (lon/lat axis order).
    pub fn write_polygon(self, polygon: &Polygon<f64>) -> String {
        match self {
            GeometryFormat::Wkt => polygon.wkt_string(),
            GeometryFormat::GeoJson => geojson::Geometry::from(polygon).to_string(),
        }
    }
}

fn parse_error(e: impl Display) -> MeshError {
    MeshError::GeometryParseError(e.to_string())
}

/// Parses WKT or GeoJSON text into a WGS84 geometry (x = longitude, y = latitude).
///
/// Every vertex must lie on the globe; a swapped axis order such as
/// `POINT(35 135)` fails with [`MeshError::CoordinateOutOfRange`].
pub fn parse_geometry(text: &str) -> Result<Geometry<f64>, MeshError> {
    let text = text.trim();
    let geometry = match GeometryFormat::detect(text) {
        GeometryFormat::GeoJson => parse_geojson(text)?,
        GeometryFormat::Wkt => parse_wkt(text)?,
    };
    geometry
        .coords_iter()
        .try_for_each(|c| validate_lat_long(c.y, c.x))?;
    Ok(geometry)
}

/// Parses a GeoJSON geometry, feature or feature collection.
///
/// A feature collection becomes a `GeometryCollection` of its features'
/// geometries; features without geometry are skipped.
pub fn parse_geojson(text: &str) -> Result<Geometry<f64>, MeshError> {
    let to_geo = |g: geojson::Geometry| Geometry::<f64>::try_from(g).map_err(parse_error);

    match GeoJson::from_str(text).map_err(parse_error)? {
        GeoJson::Geometry(geometry) => to_geo(geometry),
        GeoJson::Feature(feature) => match feature.geometry {
            Some(geometry) => to_geo(geometry),
            None => Err(parse_error("feature has no geometry")),
        },
        GeoJson::FeatureCollection(collection) => {
            let members = collection
                .features
                .into_iter()
                .filter_map(|feature| feature.geometry)
                .map(to_geo)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Geometry::GeometryCollection(GeometryCollection::from(members)))
        }
    }
}

pub fn parse_wkt(text: &str) -> Result<Geometry<f64>, MeshError> {
    let wkt = Wkt::<f64>::from_str(text).map_err(parse_error)?;
    Geometry::try_from(wkt).map_err(|_| parse_error("WKT has no geo-types equivalent"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::shape::create_rectangle;

    #[test]
    fn test_detect_format() {
        assert_eq!(
            GeometryFormat::detect("  {\"type\":\"Point\"}"),
            GeometryFormat::GeoJson
        );
        assert_eq!(GeometryFormat::detect("POINT(1 2)"), GeometryFormat::Wkt);
    }

    #[test]
    fn test_parse_geojson_point() -> Result<(), MeshError> {
        let geom = parse_geometry(r#"{"type":"Point","coordinates":[135.74,34.97]}"#)?;
        let Geometry::Point(pt) = geom else {
            panic!("Expected Point");
        };
        assert!((pt.x() - 135.74).abs() < 0.001);
        assert!((pt.y() - 34.97).abs() < 0.001);
        Ok(())
    }

    #[test]
    fn test_parse_geojson_feature() -> Result<(), MeshError> {
        let json = r#"{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[139.7,35.6]}}"#;
        assert!(matches!(parse_geometry(json)?, Geometry::Point(_)));
        Ok(())
    }

    #[test]
    fn test_parse_geojson_feature_collection() -> Result<(), MeshError> {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[139.7,35.6]}},
            {"type":"Feature","properties":{},"geometry":null},
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[-58.4,-34.6]}}
        ]}"#;
        let Geometry::GeometryCollection(collection) = parse_geometry(json)? else {
            panic!("Expected GeometryCollection");
        };
        assert_eq!(collection.0.len(), 2);
        Ok(())
    }

    #[test]
    fn test_parse_wkt_linestring() -> Result<(), MeshError> {
        let geom = parse_geometry("LINESTRING(135.7 34.9, 135.8 35.0)")?;
        let Geometry::LineString(line) = geom else {
            panic!("Expected LineString");
        };
        assert_eq!(line.0.len(), 2);
        Ok(())
    }

    #[test]
    fn test_rejects_coordinates_off_the_globe() {
        // latitude and longitude swapped
        assert!(matches!(
            parse_geometry("POINT(35 135)"),
            Err(MeshError::CoordinateOutOfRange { .. })
        ));
        assert!(matches!(
            parse_geometry(r#"{"type":"LineString","coordinates":[[135.0,35.0],[181.0,35.0]]}"#),
            Err(MeshError::CoordinateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_geometry("not a geometry"),
            Err(MeshError::GeometryParseError(_))
        ));
    }

    #[test]
    fn test_write_polygon() {
        let poly = create_rectangle(34.975, 34.98, 135.7375, 135.75);
        assert!(GeometryFormat::Wkt.write_polygon(&poly).starts_with("POLYGON"));
        assert!(GeometryFormat::GeoJson.write_polygon(&poly).contains("\"Polygon\""));
    }
}
