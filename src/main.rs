use tracing::info;
use tracing_subscriber::EnvFilter;
use worldmesh_rs::{MeshCell, MeshError, MeshLevel, encode, latlong_to_ucode};

fn main() -> Result<(), MeshError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let lat = 34.9773063;
    let lon = 135.7402153;

    for level in MeshLevel::ALL {
        let code = encode(lat, lon, level)?;
        println!("{level:>5}: {code}");
    }

    let cell = MeshCell::from_lat_long(lat, lon, MeshLevel::Km1)?;
    info!(code = cell.code, "decoded 1km square");

    let bounds = &cell.bounds;
    println!("NW: ({}, {})", bounds.nw.latitude, bounds.nw.longitude);
    println!("SE: ({}, {})", bounds.se.latitude, bounds.se.longitude);
    println!("Center: ({}, {})", bounds.center.latitude, bounds.center.longitude);

    let polygon = cell.to_polygon();
    println!("Polygon: {:?}", polygon);

    println!("ucode: {}", latlong_to_ucode(&(lon, lat))?);

    Ok(())
}
