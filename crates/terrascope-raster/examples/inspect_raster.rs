//! Example: Print the georeferencing and band summary of a GeoTIFF.
//!
//! Usage: cargo run --example inspect_raster -- <file.tif>

use std::env;
use std::time::Instant;
use terrascope_raster::read_raster_file;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <file.tif>", args[0]);
        eprintln!("Example: {} ./assets/dem.tif", args[0]);
        std::process::exit(1);
    }

    let start = Instant::now();
    let raster = match read_raster_file(&args[1]) {
        Ok(raster) => raster,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    println!(
        "Decoded {}x{} raster in {:.3}s",
        raster.width(),
        raster.height(),
        start.elapsed().as_secs_f64()
    );

    let bbox = raster.bounding_box();
    println!(
        "Bounds: lon {:.5}° to {:.5}°, lat {:.5}° to {:.5}°",
        bbox.west, bbox.east, bbox.south, bbox.north
    );
    let (lon_res, lat_res) = raster.resolution();
    println!("Resolution: {:.8}° x {:.8}° per pixel", lon_res, lat_res);
    if let Some(no_data) = raster.no_data() {
        println!("No-data value: {}", no_data);
    }

    for (i, band) in raster.bands().iter().enumerate() {
        match band.min_max() {
            Some((lo, hi)) => println!("Band {}: {} range {} .. {}", i, band.sample_type(), lo, hi),
            None => println!("Band {}: {} (no finite samples)", i, band.sample_type()),
        }
    }
}
