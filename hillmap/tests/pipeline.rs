use approx::assert_relative_eq;
use hillmap::{
    dem::{Grid, Tile},
    geo::{geometry::Coord, line_string},
    misery::{MiseryModel, MiseryTable, Params},
    segments, Compositor, HillmapError,
};

fn flat_tile(elevation: f32, sw_corner: Coord<f64>) -> Result<Tile, HillmapError> {
    Ok(Tile::new(
        vec![elevation; 100 * 100],
        (100, 100),
        1.0,
        sw_corner,
    )?)
}

fn default_table() -> Result<MiseryTable, HillmapError> {
    Ok(MiseryModel::new(Params::default())?.table()?)
}

#[test]
fn flat_road_across_a_tile_seam() -> Result<(), HillmapError> {
    let grid = Grid::builder()
        .tile(flat_tile(10.0, Coord { x: 0.0, y: 0.0 })?)
        .tile(flat_tile(10.0, Coord { x: 100.0, y: 0.0 })?)
        .build()?;
    let table = default_table()?;

    let road = line_string![(x: 25.0, y: 50.0), (x: 175.0, y: 50.0)];
    let segs = segments(&[road], 100.0, &grid)?;
    assert_eq!(segs.len(), 2);
    for seg in &segs {
        assert_relative_eq!(seg.length, 75.0);
        assert_relative_eq!(seg.el1, 10.0);
        assert_relative_eq!(seg.el2, 10.0);
        assert_relative_eq!(seg.slope, 0.0);
        assert_relative_eq!(table.interpolate(seg.slope), 0.0);
    }
    assert_eq!(segs[0].line.0[1], Coord { x: 100.0, y: 50.0 });

    let raster = Compositor::builder()
        .extent(grid.extent())
        .resolution(50.0)
        .blur(0.0)
        .table(table)
        .build()?
        .composite(&segs);
    assert_eq!((raster.width(), raster.height()), (5, 3));
    assert_eq!(raster.get((1, 1)), Some(0.0));
    assert_eq!(raster.get((2, 1)), Some(0.0));
    assert_eq!(raster.get((0, 0)), None);
    Ok(())
}

#[test]
fn uniform_grade() -> Result<(), HillmapError> {
    // Rises 5 per 100 eastward.
    let samples = (0..100)
        .flat_map(|_row| (0..200).map(|col| col as f32 * 0.05))
        .collect();
    let tile = Tile::new(samples, (200, 100), 1.0, Coord { x: 0.0, y: 0.0 })?;
    let grid = Grid::builder().tile(tile).build()?;
    let table = default_table()?;

    let road = line_string![(x: 10.5, y: 50.0), (x: 110.5, y: 50.0)];
    let segs = segments(&[road], 50.0, &grid)?;
    assert_eq!(segs.len(), 2);
    for seg in &segs {
        assert_relative_eq!(seg.slope, 0.05, epsilon = 1e-6);
    }
    let mi = table.interpolate(0.05);
    assert_relative_eq!(mi, 0.798, epsilon = 0.01);

    let raster = Compositor::builder()
        .extent(grid.extent())
        .resolution(100.0)
        .blur(0.0)
        .table(table)
        .build()?
        .composite(&segs);
    assert_eq!((raster.width(), raster.height()), (3, 2));
    // Both centroids fall in the SW pixel.
    let value = raster.get((0, 1)).expect("pixel has a value");
    assert_relative_eq!(value, mi, epsilon = 1e-6);
    assert_eq!(raster.values().iter().filter(|v| v.is_some()).count(), 1);
    Ok(())
}

#[test]
fn table_survives_json() -> Result<(), HillmapError> {
    let table = default_table()?;
    let mut buf = Vec::new();
    table.to_writer(&mut buf)?;
    let reloaded = MiseryTable::from_reader(buf.as_slice())?;
    assert_eq!(reloaded.entries().len(), table.entries().len());
    for slope in [0.0, 0.0123, 0.1, 0.25] {
        assert_relative_eq!(
            reloaded.interpolate(slope),
            table.interpolate(slope),
            epsilon = 1e-12
        );
    }
    Ok(())
}
