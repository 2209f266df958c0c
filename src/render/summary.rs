//! Fixed-layout 800x600 summary image: top 5 countries by derived GDP,
//! total record count, and the render timestamp. One well-known path,
//! overwritten on every refresh; no history is kept.

use crate::domain::Country;
use crate::error::ApiError;
use crate::store::CountryStore;
use crate::util::db::Db;
use ab_glyph::{FontRef, PxScale};
use chrono::{DateTime, SecondsFormat, Utc};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::{Path, PathBuf};
use tracing::info;

pub const ARTIFACT_FILE: &str = "summary.png";

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const TOP_N: i64 = 5;

const BG: Rgb<u8> = Rgb([0x1a, 0x1a, 0x2e]);
const WHITE: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const GREY: Rgb<u8> = Rgb([0xa0, 0xa0, 0xa0]);
const GREEN: Rgb<u8> = Rgb([0x4e, 0xcc, 0xa3]);
const GOLD: Rgb<u8> = Rgb([0xff, 0xd7, 0x00]);
const DARK_GREY: Rgb<u8> = Rgb([0x66, 0x66, 0x66]);

static FONT_REGULAR: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
static FONT_BOLD: &[u8] = include_bytes!("../../assets/DejaVuSans-Bold.ttf");

pub fn artifact_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(ARTIFACT_FILE)
}

/// Read the current store contents and (re)write the artifact. The write goes
/// through a temp file so readers never observe a half-written image.
pub async fn generate_summary_image(
    db: &Db,
    rendered_at: DateTime<Utc>,
    cache_dir: &Path,
) -> Result<PathBuf, ApiError> {
    let store = CountryStore::new(db);
    let top = store.top_by_gdp(TOP_N).await?;
    let total = store.count().await?;

    let png = render_summary(&top, total, rendered_at)?;

    tokio::fs::create_dir_all(cache_dir).await?;
    let path = artifact_path(cache_dir);
    let tmp = cache_dir.join(format!("{ARTIFACT_FILE}.tmp"));
    tokio::fs::write(&tmp, &png).await?;
    tokio::fs::rename(&tmp, &path).await?;
    info!(path = %path.display(), top = top.len(), total, "summary image generated");
    Ok(path)
}

/// Pure rendering step: record slice in, encoded PNG out.
pub fn render_summary(
    top: &[Country],
    total: i64,
    rendered_at: DateTime<Utc>,
) -> Result<Vec<u8>, ApiError> {
    let bold = FontRef::try_from_slice(FONT_BOLD)
        .map_err(|e| ApiError::Internal(format!("bold font: {e}")))?;
    let regular = FontRef::try_from_slice(FONT_REGULAR)
        .map_err(|e| ApiError::Internal(format!("regular font: {e}")))?;

    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BG);

    draw_centered(
        &mut img,
        WHITE,
        30,
        PxScale::from(32.0),
        &bold,
        "Country Currency API Summary",
    );
    draw_centered(
        &mut img,
        GREY,
        82,
        PxScale::from(20.0),
        &regular,
        &format!("Total Countries: {total}"),
    );
    draw_text_mut(
        &mut img,
        GREEN,
        50,
        136,
        PxScale::from(24.0),
        &bold,
        "Top 5 Countries by Estimated GDP",
    );

    let mut y = 190;
    for (index, country) in top.iter().enumerate() {
        draw_text_mut(
            &mut img,
            GREEN,
            50,
            y,
            PxScale::from(28.0),
            &bold,
            &format!("{}.", index + 1),
        );
        draw_text_mut(&mut img, WHITE, 90, y + 4, PxScale::from(20.0), &bold, &country.name);

        let gdp = format_gdp(country.estimated_gdp);
        let (gdp_w, _) = text_size(PxScale::from(18.0), &regular, &gdp);
        draw_text_mut(
            &mut img,
            GOLD,
            (WIDTH as i32 - 50) - gdp_w as i32,
            y + 6,
            PxScale::from(18.0),
            &regular,
            &gdp,
        );

        let info = format!(
            "{} | Pop: {}",
            country.currency_code.as_deref().unwrap_or("N/A"),
            group_thousands(country.population)
        );
        draw_text_mut(&mut img, GREY, 90, y + 30, PxScale::from(14.0), &regular, &info);

        y += 70;
    }

    let footer = format!(
        "Last refreshed: {}",
        rendered_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    draw_centered(
        &mut img,
        DARK_GREY,
        HEIGHT as i32 - 40,
        PxScale::from(14.0),
        &regular,
        &footer,
    );

    let mut buf = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| ApiError::Internal(format!("png encode: {e}")))?;
    Ok(buf)
}

fn draw_centered(
    img: &mut RgbImage,
    color: Rgb<u8>,
    y: i32,
    scale: PxScale,
    font: &FontRef<'_>,
    text: &str,
) {
    let (w, _) = text_size(scale, font, text);
    let x = (WIDTH as i32 - w as i32) / 2;
    draw_text_mut(img, color, x.max(0), y, scale, font, text);
}

/// GDP in billions with two decimals and a `$...B` suffix.
pub fn format_gdp(gdp: Option<f64>) -> String {
    match gdp {
        Some(g) if g != 0.0 => format!("${:.2}B", g / 1_000_000_000.0),
        _ => "N/A".to_string(),
    }
}

/// Non-negative integer with comma grouping separators.
pub fn group_thousands(n: i64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
