//! Print the volumes of the canonical clusters and of an octahedral
//! molecule stored across the cell boundary.
//!
//! Usage:
//!   cargo run -p polyvol --example cluster_volumes

use polyvol::periodic::MinimumImage;
use polyvol::prelude::*;
use polyvol::special;

fn main() -> Result<(), VolumeError> {
    let tetra = special::regular_tetrahedron(1.0);
    println!("regular tetrahedron (edge 1): {:.6}", tetrahedron_volume(&tetra)?);

    let octa = special::regular_octahedron(1.0);
    println!("regular octahedron (r = 1):   {:.6}", fan_volume(&octa, &OCTAHEDRON_FACES)?);
    println!("  canonical split:            {:.6}", octahedron_volume_canonical(&octa)?);

    let cube = special::cuboid(1.0, 1.0, 1.0);
    println!("unit cube:                    {:.6}", fan_volume(&cube, &CUBE_FACES)?);

    let Some((structure, sites)) = special::corner_octahedron_structure(10.0, 1.6) else {
        return Ok(());
    };
    let naive = PolyhedralVolume::new(&structure).cluster(&sites)?;
    let image = MinimumImage::about_site(&structure, sites[0])?;
    let unwrapped = PolyhedralVolume::new(&image).cluster(&sites)?;
    println!("XY6 across the cell corner:   stored {naive:.3}, minimum image {unwrapped:.3}");
    Ok(())
}
