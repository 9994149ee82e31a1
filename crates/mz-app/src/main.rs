use anyhow::{Context, Result};
use clap::Parser;
use mz_core::config::DitherMode;
use mz_core::gradient::GlyphGradient;
use mz_core::palette::Palette;
use mz_core::traits::Quantizer;
use mz_tile::dither::OrderedBayer;
use mz_tile::quantize::FloydSteinberg;

pub mod cli;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .init();

    run(&cli)
}

/// Conversion complète : config → palette → gradient → image → layer → fichier.
fn run(cli: &cli::Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    let geometry = config.geometry()?;
    log::info!("mzm size: {} {}", geometry.grid_width, geometry.grid_height);
    log::info!("char size: {} {}", geometry.cell_width, geometry.cell_height);

    // Palette et gradient sont validés avant de toucher à l'image.
    log::info!(
        "palette: {}",
        config
            .palette
            .as_deref()
            .map_or_else(|| "défaut".to_string(), |p| p.display().to_string())
    );
    let palette = Palette::load(config.palette.as_deref())?;
    log::debug!("palette 6 bits : {:?}", palette.colors());
    let expanded = palette.expand();
    log::debug!("palette 8 bits : {:?}", expanded.colors());
    let table = expanded.diffusion_table();

    let gradient = GlyphGradient::parse(&config.chars)?;
    log::debug!("glyphes : {:?}", gradient.glyphs());

    let frame = mz_source::image::load_image(&cli.input)?;

    let bayer = OrderedBayer::default();
    let quantizer: &dyn Quantizer = match config.dither {
        DitherMode::FloydSteinberg => &FloydSteinberg,
        DitherMode::Bayer => &bayer,
    };
    let layer = mz_tile::layer::build_layer(&frame, &table, &gradient, quantizer, &geometry)
        .with_context(|| format!("Conversion de {}", cli.input.display()))?;

    log::info!("output filename: {}", cli.output.display());
    mz_export::mzm::write_mzm(&cli.output, &layer)
        .with_context(|| format!("Écriture de {}", cli.output.display()))?;

    log::info!("done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mz_core::error::MzmError;
    use std::path::Path;

    fn write_png(path: &Path, w: u32, h: u32, rgb: [u8; 3]) {
        image::RgbImage::from_pixel(w, h, image::Rgb(rgb))
            .save(path)
            .unwrap();
    }

    fn args(args: &[&str]) -> cli::Cli {
        cli::Cli::parse_from(std::iter::once("image2mzm").chain(args.iter().copied()))
    }

    #[test]
    fn uniform_dark_image_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("dark.png");
        let output = dir.path().join("dark.mzm");
        write_png(&input, 50, 30, [0, 0, 170]);

        run(&args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "--width",
            "6",
            "--height",
            "3",
        ]))
        .unwrap();

        let raw = std::fs::read(&output).unwrap();
        assert_eq!(raw.len(), 20 + 2 * 6 * 3);
        assert_eq!(&raw[..4], b"MZM3");
        for pair in raw[20..].chunks_exact(2) {
            assert_eq!(pair, &[219, 1 + 16]);
        }
    }

    #[test]
    fn short_palette_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.mzm");
        let palette = dir.path().join("short.pal");
        write_png(&input, 16, 16, [255, 255, 255]);
        std::fs::write(&palette, [0u8; 30]).unwrap();

        let err = run(&args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "--palette",
            palette.to_str().unwrap(),
        ]))
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<MzmError>(),
            Some(MzmError::MalformedPalette(_))
        ));
        assert!(!output.exists());
    }

    #[test]
    fn single_glyph_gradient_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.mzm");
        write_png(&input, 16, 16, [0, 0, 0]);

        let err = run(&args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "--chars",
            "1",
        ]))
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<MzmError>(),
            Some(MzmError::InvalidGradient(_))
        ));
        assert!(!output.exists());
    }

    #[test]
    fn zero_char_height_is_degenerate() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&args(&[
            dir.path().join("in.png").to_str().unwrap(),
            dir.path().join("out.mzm").to_str().unwrap(),
            "--char-height",
            "0",
        ]))
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<MzmError>(),
            Some(MzmError::DegenerateCell { .. })
        ));
    }

    #[test]
    fn undecodable_image_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        std::fs::write(&input, b"GIF89a garbage").unwrap();
        let output = dir.path().join("out.mzm");

        let err = run(&args(&[input.to_str().unwrap(), output.to_str().unwrap()])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MzmError>(),
            Some(MzmError::ImageDecode { .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn custom_palette_and_bayer() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.mzm");
        let palette = dir.path().join("gray.pal");
        // 16 gris de 0 à 60 par pas de 4.
        let bytes: Vec<u8> = (0..16u8).flat_map(|i| [i * 4; 3]).collect();
        std::fs::write(&palette, &bytes).unwrap();
        write_png(&input, 16, 28, [0, 0, 0]);

        run(&args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "--width",
            "2",
            "--height",
            "2",
            "--palette",
            palette.to_str().unwrap(),
            "--dither",
            "bayer",
        ]))
        .unwrap();

        let (header, layer) = mz_export::mzm::read_mzm(&output).unwrap();
        assert_eq!((header.width, header.height), (2, 2));
        assert!(layer.cells.iter().all(|c| c.glyph == 219 && c.color == 0));
    }
}
