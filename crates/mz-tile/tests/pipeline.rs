use mz_core::config::Geometry;
use mz_core::frame::{IndexGrid, RgbFrame};
use mz_core::gradient::GlyphGradient;
use mz_core::palette::Palette;
use mz_export::mzm::{HEADER_LEN, read_mzm, write_mzm};
use mz_tile::layer::{build_layer, reduce_grid};
use mz_tile::quantize::FloydSteinberg;

#[test]
fn default_grid_writes_4020_bytes() {
    let geometry = Geometry::new(80, 25, 8, 14).unwrap();
    let (pw, ph) = geometry.pixel_size();
    let mut grid = IndexGrid::new(pw, ph);
    for y in 0..ph {
        for x in 0..pw {
            grid.set(x, y, ((x / 8 + y / 14) % 16) as u8);
        }
    }
    let layer = reduce_grid(&grid, &GlyphGradient::default(), &geometry).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.mzm");
    write_mzm(&path, &layer).unwrap();

    let raw = std::fs::read(&path).unwrap();
    assert_eq!(raw.len(), 20 + 2 * 80 * 25);
    // cellule (x=3, y=2) → couleur 5 unie
    let cell = HEADER_LEN + (2 * 80 + 3) * 2;
    assert_eq!(&raw[cell..cell + 2], &[219, 5 + 5 * 16]);
}

#[test]
fn image_to_file_round_trip() {
    let table = Palette::default().expand().diffusion_table();
    let geometry = Geometry::new(4, 2, 8, 14).unwrap();

    // Moitié gauche bleu foncé, moitié droite blanche.
    let mut frame = RgbFrame::new(64, 56);
    for y in 0..56 {
        for x in 0..64 {
            let rgb = if x < 32 { (0, 0, 170) } else { (255, 255, 255) };
            frame.set_pixel(x, y, rgb);
        }
    }

    let layer = build_layer(
        &frame,
        &table,
        &GlyphGradient::default(),
        &FloydSteinberg,
        &geometry,
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("split.mzm");
    write_mzm(&path, &layer).unwrap();
    let (header, back) = read_mzm(&path).unwrap();

    assert_eq!((header.width, header.height), (4, 2));
    assert_eq!(back, layer);
    for y in 0..2 {
        assert_eq!(back.get(0, y).color, 0x11);
        assert_eq!(back.get(3, y).color, 0xFF);
        assert_eq!(back.get(0, y).glyph, 219);
        assert_eq!(back.get(3, y).glyph, 219);
    }
}
