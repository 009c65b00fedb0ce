//! Minimal SVG chart surface.
//!
//! A [`Chart`] collects lines and filled regions in data coordinates and
//! lays them out on [`Chart::to_svg`], once the axis limits are known.

use anyhow::Result;
use std::fmt::Write;

pub const WIDTH: f64 = 640.0;
pub const HEIGHT: f64 = 480.0;

const LEFT: f64 = 64.0;
const RIGHT: f64 = 20.0;
const TOP: f64 = 36.0;
const BOTTOM: f64 = 48.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Clone, Debug)]
enum Element {
    Line {
        xs: Vec<f64>,
        ys: Vec<f64>,
        color: Rgba,
        label: String,
    },
    Fill {
        xs: Vec<f64>,
        upper: Vec<f64>,
        lower: Vec<f64>,
        color: Rgba,
        label: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Limits {
    pub min: f64,
    pub max: f64,
}

impl Limits {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn span(self) -> f64 {
        (self.max - self.min).abs().max(1e-9)
    }
}

/// Plot area geometry and the data-to-pixel mapping.
#[derive(Clone, Copy, Debug)]
struct Frame {
    left: f64,
    top: f64,
    plot_w: f64,
    plot_h: f64,
    x: Limits,
    y: Limits,
}

impl Frame {
    fn px(&self, v: f64) -> f64 {
        self.left + (v - self.x.min) / self.x.span() * self.plot_w
    }

    fn py(&self, v: f64) -> f64 {
        self.top + self.plot_h - (v - self.y.min) / self.y.span() * self.plot_h
    }
}

#[derive(Clone, Debug)]
pub struct Chart {
    title: String,
    x_label: String,
    y_label: String,
    x_limits: Limits,
    y_limits: Limits,
    elements: Vec<Element>,
}

impl Chart {
    pub fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            x_limits: Limits::new(0.0, 1.0),
            y_limits: Limits::new(0.0, 1.0),
            elements: Vec::new(),
        }
    }

    pub fn set_xlim(&mut self, min: f64, max: f64) {
        self.x_limits = Limits::new(min, max);
    }

    pub fn set_ylim(&mut self, min: f64, max: f64) {
        self.y_limits = Limits::new(min, max);
    }

    pub fn xlim(&self) -> Limits {
        self.x_limits
    }

    pub fn ylim(&self) -> Limits {
        self.y_limits
    }

    pub fn line(&mut self, xs: &[f64], ys: &[f64], color: Rgba, label: &str) {
        self.elements.push(Element::Line {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            color,
            label: label.to_string(),
        });
    }

    /// Shades the region between two curves sharing `xs`.
    pub fn fill_between(&mut self, xs: &[f64], upper: &[f64], lower: &[f64], color: Rgba, label: &str) {
        self.elements.push(Element::Fill {
            xs: xs.to_vec(),
            upper: upper.to_vec(),
            lower: lower.to_vec(),
            color,
            label: label.to_string(),
        });
    }

    /// Labels in drawing order, as they appear in the legend.
    pub fn legend_labels(&self) -> Vec<&str> {
        self.elements
            .iter()
            .map(|e| match e {
                Element::Line { label, .. } | Element::Fill { label, .. } => label.as_str(),
            })
            .collect()
    }

    pub fn to_svg(&self, transparent: bool) -> Result<String> {
        let frame = Frame {
            left: LEFT,
            top: TOP,
            plot_w: WIDTH - LEFT - RIGHT,
            plot_h: HEIGHT - TOP - BOTTOM,
            x: self.x_limits,
            y: self.y_limits,
        };
        let mut out = String::new();
        writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" font-family=\"DejaVu Sans, Arial, sans-serif\">",
            WIDTH, HEIGHT, WIDTH, HEIGHT
        )?;
        if !transparent {
            writeln!(
                out,
                "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"#fff\"/>",
                WIDTH, HEIGHT
            )?;
        }
        writeln!(
            out,
            "<defs><clipPath id=\"plot\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/></clipPath></defs>",
            frame.left, frame.top, frame.plot_w, frame.plot_h
        )?;
        draw_y_axis_ticks(&mut out, &frame, 6)?;
        draw_x_axis_ticks(&mut out, &frame, 6)?;

        writeln!(out, "<g clip-path=\"url(#plot)\">")?;
        for element in &self.elements {
            match element {
                Element::Line { xs, ys, color, .. } => svg_line(&mut out, &frame, xs, ys, *color)?,
                Element::Fill {
                    xs,
                    upper,
                    lower,
                    color,
                    ..
                } => svg_fill_between(&mut out, &frame, xs, upper, lower, *color)?,
            }
        }
        writeln!(out, "</g>")?;

        writeln!(
            out,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"#000\" stroke-width=\"0.8\"/>",
            frame.left, frame.top, frame.plot_w, frame.plot_h
        )?;
        draw_axis_labels(&mut out, &frame, &self.x_label, &self.y_label)?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"#000\" text-anchor=\"middle\">{}</text>",
            frame.left + frame.plot_w / 2.0,
            frame.top - 12.0,
            escape_xml(&self.title)
        )?;
        draw_legend(&mut out, &frame, &self.elements)?;
        writeln!(out, "</svg>")?;
        Ok(out)
    }
}

fn svg_line(out: &mut String, frame: &Frame, xs: &[f64], ys: &[f64], color: Rgba) -> Result<()> {
    if xs.is_empty() {
        return Ok(());
    }
    let mut path = String::new();
    for (i, (xv, yv)) in xs.iter().zip(ys).enumerate() {
        let cmd = if i == 0 { "M" } else { " L" };
        write!(path, "{} {:.2} {:.2}", cmd, frame.px(*xv), frame.py(*yv))?;
    }
    if xs.len() == 1 {
        // a lone point still gets a visible stub
        write!(path, " h 0.01")?;
    }
    writeln!(
        out,
        "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"1.5\" stroke-linecap=\"round\"/>",
        path,
        color.hex(),
        color.a
    )?;
    Ok(())
}

fn svg_fill_between(
    out: &mut String,
    frame: &Frame,
    xs: &[f64],
    upper: &[f64],
    lower: &[f64],
    color: Rgba,
) -> Result<()> {
    if xs.is_empty() {
        return Ok(());
    }
    let mut path = String::new();
    for (i, (xv, yv)) in xs.iter().zip(upper).enumerate() {
        let cmd = if i == 0 { "M" } else { " L" };
        write!(path, "{} {:.2} {:.2}", cmd, frame.px(*xv), frame.py(*yv))?;
    }
    for (xv, yv) in xs.iter().zip(lower).rev() {
        write!(path, " L {:.2} {:.2}", frame.px(*xv), frame.py(*yv))?;
    }
    path.push_str(" Z");
    writeln!(
        out,
        "<path d=\"{}\" fill=\"{}\" fill-opacity=\"{}\" stroke=\"none\"/>",
        path,
        color.hex(),
        color.a
    )?;
    Ok(())
}

fn draw_y_axis_ticks(out: &mut String, frame: &Frame, ticks: usize) -> Result<()> {
    let (min_y, max_y) = (frame.y.min, frame.y.max);
    if ticks < 2 || (max_y - min_y).abs() < 1e-9 {
        return Ok(());
    }
    let (start, step, count) = nice_ticks(min_y, max_y, ticks);
    for i in 0..count {
        let v = start + step * i as f64;
        if v < min_y - 1e-9 || v > max_y + 1e-9 {
            continue;
        }
        let y = frame.py(v);
        writeln!(
            out,
            "<line x1=\"{}\" y1=\"{:.2}\" x2=\"{}\" y2=\"{:.2}\" stroke=\"#b0b0b0\" stroke-width=\"0.8\"/>",
            frame.left,
            y,
            frame.left + frame.plot_w,
            y
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{:.2}\" font-size=\"10\" fill=\"#000\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>",
            frame.left - 4.0,
            y,
            fmt_tick(v)
        )?;
    }
    Ok(())
}

fn draw_x_axis_ticks(out: &mut String, frame: &Frame, ticks: usize) -> Result<()> {
    let (min_x, max_x) = (frame.x.min, frame.x.max);
    if ticks < 2 || (max_x - min_x).abs() < 1e-9 {
        return Ok(());
    }
    let (start, step, count) = nice_ticks(min_x, max_x, ticks);
    for i in 0..count {
        let v = start + step * i as f64;
        if v < min_x - 1e-9 || v > max_x + 1e-9 {
            continue;
        }
        let x = frame.px(v);
        writeln!(
            out,
            "<line x1=\"{:.2}\" y1=\"{}\" x2=\"{:.2}\" y2=\"{}\" stroke=\"#b0b0b0\" stroke-width=\"0.8\"/>",
            x,
            frame.top,
            x,
            frame.top + frame.plot_h
        )?;
        writeln!(
            out,
            "<text x=\"{:.2}\" y=\"{}\" font-size=\"10\" fill=\"#000\" text-anchor=\"middle\" dominant-baseline=\"hanging\">{}</text>",
            x,
            frame.top + frame.plot_h + 4.0,
            fmt_tick(v)
        )?;
    }
    Ok(())
}

fn draw_axis_labels(out: &mut String, frame: &Frame, x_label: &str, y_label: &str) -> Result<()> {
    let x = frame.left + frame.plot_w / 2.0;
    let y = frame.top + frame.plot_h + 32.0;
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"#000\" text-anchor=\"middle\">{}</text>",
        x,
        y,
        escape_xml(x_label)
    )?;
    let yx = frame.left - 46.0;
    let yy = frame.top + frame.plot_h / 2.0;
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"#000\" text-anchor=\"middle\" transform=\"rotate(-90 {} {})\">{}</text>",
        yx,
        yy,
        yx,
        yy,
        escape_xml(y_label)
    )?;
    Ok(())
}

fn draw_legend(out: &mut String, frame: &Frame, elements: &[Element]) -> Result<()> {
    if elements.is_empty() {
        return Ok(());
    }
    let row_h = 13.0;
    let box_w = 92.0;
    let box_h = row_h * elements.len() as f64 + 8.0;
    let x0 = frame.left + frame.plot_w - box_w - 6.0;
    let y0 = frame.top + 6.0;
    writeln!(
        out,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#fff\" fill-opacity=\"0.8\" stroke=\"#ccc\" rx=\"2\"/>",
        x0, y0, box_w, box_h
    )?;
    for (i, element) in elements.iter().enumerate() {
        let cy = y0 + 4.0 + row_h * (i as f64 + 0.5);
        match element {
            Element::Line { color, label, .. } => {
                writeln!(
                    out,
                    "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"1.5\"/>",
                    x0 + 6.0,
                    cy,
                    x0 + 24.0,
                    cy,
                    color.hex(),
                    color.a
                )?;
                legend_text(out, x0 + 30.0, cy, label)?;
            }
            Element::Fill { color, label, .. } => {
                writeln!(
                    out,
                    "<rect x=\"{}\" y=\"{}\" width=\"18\" height=\"8\" fill=\"{}\" fill-opacity=\"{}\"/>",
                    x0 + 6.0,
                    cy - 4.0,
                    color.hex(),
                    color.a
                )?;
                legend_text(out, x0 + 30.0, cy, label)?;
            }
        }
    }
    Ok(())
}

fn legend_text(out: &mut String, x: f64, y: f64, label: &str) -> Result<()> {
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"8\" fill=\"#000\" dominant-baseline=\"middle\">{}</text>",
        x,
        y,
        escape_xml(label)
    )?;
    Ok(())
}

pub(crate) fn fmt_tick(v: f64) -> String {
    if (v - v.round()).abs() < 0.001 {
        format!("{}", v.round() as i64)
    } else if v.abs() < 10.0 {
        format!("{:.2}", v)
    } else {
        format!("{:.1}", v)
    }
}

fn nice_ticks(min: f64, max: f64, ticks: usize) -> (f64, f64, usize) {
    let range = (max - min).abs().max(1e-9);
    let rough = range / (ticks as f64 - 1.0);
    let mag = 10f64.powf(rough.abs().log10().floor());
    let norm = rough / mag;
    let step = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    } * mag;
    let start = (min / step).floor() * step;
    let end = (max / step).ceil() * step;
    let count = ((end - start) / step).round() as usize + 1;
    (start, step, count)
}

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
