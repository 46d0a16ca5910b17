use crate::localization::Localizer;
use crate::models::Theme;
use crate::summary::view::OptionResult;
use crate::view::truncate_chars;
use image::{ImageFormat, Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

const WIDTH: u32 = 480;
const PADDING: u32 = 16;
const BAR_HEIGHT: u32 = 24;
const BAR_GAP: u32 = 12;

const TRACK: Rgba<u8> = Rgba([0xE1, 0xDF, 0xDD, 0xFF]);
const FILL: Rgba<u8> = Rgba([0x62, 0x64, 0xA7, 0xFF]);
const LEADER: Rgba<u8> = Rgba([0x46, 0x47, 0x75, 0xFF]);

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn result_file_name(strings: &Localizer, title: &str, max_chars: usize) -> String {
    let name: String = strings
        .format("PollResult", &[&title])
        .chars()
        .map(|c| if is_reserved_in_file_name(c) { '_' } else { c })
        .collect();
    truncate_chars(&name, max_chars)
}

fn is_reserved_in_file_name(c: char) -> bool {
    c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}

pub fn background_for_theme(theme: Theme) -> Rgba<u8> {
    match theme {
        Theme::Default => Rgba([0xFF, 0xFF, 0xFF, 0xFF]),
        Theme::Dark => Rgba([0x2D, 0x2C, 0x2C, 0xFF]),
        Theme::Contrast => Rgba([0x00, 0x00, 0x00, 0xFF]),
    }
}

pub fn draw_results(participation: u64, options: &[OptionResult], theme: Theme) -> RgbaImage {
    let rows = options.len() as u32 + 1;
    let height = PADDING * 2 + rows * BAR_HEIGHT + (rows - 1) * BAR_GAP;
    let mut image = RgbaImage::from_pixel(WIDTH, height, background_for_theme(theme));

    let top_count = options.iter().map(|option| option.count).max().unwrap_or(0);
    draw_bar(&mut image, 0, participation, FILL);
    for (index, option) in options.iter().enumerate() {
        let fill = if top_count > 0 && option.count == top_count {
            LEADER
        } else {
            FILL
        };
        draw_bar(&mut image, index as u32 + 1, option.percentage, fill);
    }
    image
}

fn draw_bar(image: &mut RgbaImage, row: u32, percentage: u64, fill: Rgba<u8>) {
    let track_width = WIDTH - PADDING * 2;
    let filled = (track_width as u64 * percentage.min(100) / 100) as u32;
    let top = PADDING + row * (BAR_HEIGHT + BAR_GAP);

    for y in top..top + BAR_HEIGHT {
        for x in 0..track_width {
            let color = if x < filled { fill } else { TRACK };
            image.put_pixel(PADDING + x, y, color);
        }
    }
}

pub fn save_results_image(image: &RgbaImage, dir: &Path, file_name: &str) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.png", file_name));
    image.save_with_format(&path, ImageFormat::Png)?;
    Ok(path)
}
