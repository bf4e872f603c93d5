use image::imageops::FilterType;
use image::DynamicImage;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

/// Renders a picture with upper half block characters, packing two pixel
/// rows into every terminal row. The picture is scaled to fit the area,
/// keeping its aspect ratio, and centered.
pub struct PicturePreviewWidget<'a> {
    picture: &'a DynamicImage,
}

impl<'a> PicturePreviewWidget<'a> {
    pub fn new(picture: &'a DynamicImage) -> Self {
        Self { picture }
    }
}

impl Widget for PicturePreviewWidget<'_> {
    fn render(self, area: Rect, buffer: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        // A cell is roughly twice as tall as it is wide, so the pixel grid
        // is area.width x area.height * 2.
        let resized = self.picture.resize(
            u32::from(area.width),
            u32::from(area.height) * 2,
            FilterType::Triangle,
        );
        let rgb = resized.to_rgb8();
        let (width, height) = rgb.dimensions();
        let columns = width as u16;
        let rows = height.div_ceil(2) as u16;
        let x0 = area.x + (area.width - columns) / 2;
        let y0 = area.y + (area.height - rows) / 2;
        for y in 0..rows {
            for x in 0..columns {
                let Some(cell) = buffer.cell_mut((x0 + x, y0 + y)) else {
                    continue;
                };
                let top = rgb.get_pixel(u32::from(x), u32::from(y) * 2);
                let mut style = Style::default().fg(Color::Rgb(top[0], top[1], top[2]));
                if u32::from(y) * 2 + 1 < height {
                    let bottom = rgb.get_pixel(u32::from(x), u32::from(y) * 2 + 1);
                    style = style.bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
                }
                cell.set_symbol("▀");
                cell.set_style(style);
            }
        }
    }
}
